use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::models::UserRecord;

/// The whole store as written to disk, keyed by user ID
pub type Snapshot = BTreeMap<u64, UserRecord>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read warnings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed warnings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode warnings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write warnings file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read a snapshot from disk. A missing file is an empty store.
pub async fn load(path: &Path) -> Result<Snapshot, StoreError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No warnings file at {}, starting empty", path.display());
            return Ok(Snapshot::new());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.trim().is_empty() {
        return Ok(Snapshot::new());
    }

    serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a snapshot, falling back to an empty store on any failure
pub async fn load_or_empty(path: &Path) -> Snapshot {
    match load(path).await {
        Ok(snapshot) => {
            info!("Loaded {} user records from {}", snapshot.len(), path.display());
            snapshot
        }
        Err(e) => {
            warn!("Starting with an empty warning store: {}", e);
            Snapshot::new()
        }
    }
}

/// Write the whole snapshot, replacing the previous file atomically
pub async fn persist(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let encoded = serde_json::to_string_pretty(snapshot)?;
    let tmp_path = temp_path(path);

    tokio::fs::write(&tmp_path, encoded.as_bytes())
        .await
        .map_err(|source| StoreError::Write {
            path: tmp_path.clone(),
            source,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Persisted {} user records to {}", snapshot.len(), path.display());

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
