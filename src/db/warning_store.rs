use std::path::{Path, PathBuf};

use dashmap::DashSet;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::db::models::UserRecord;
use crate::db::snapshot::{self, Snapshot, StoreError};

/// Persistent per-user violation history.
///
/// The mutex is held across the whole read, mutate and persist sequence so
/// two messages from the same user can never lose an increment. Every
/// mutation rewrites the snapshot before returning; if that write fails the
/// in-memory change stays applied and the error is handed back to the caller.
///
/// Users whose restriction is being carried out are tracked in memory only,
/// so a burst of spam crossing the threshold restricts them once.
pub struct WarningStore {
    path: PathBuf,
    default_max_warnings: u32,
    records: Mutex<Snapshot>,
    restricting: DashSet<u64>,
}

impl WarningStore {
    /// Open the store at `path`, starting empty if the file is missing or unreadable
    pub async fn open(path: impl Into<PathBuf>, default_max_warnings: u32) -> Self {
        let path = path.into();
        let records = snapshot::load_or_empty(&path).await;
        Self::with_records(path, default_max_warnings, records)
    }

    pub fn with_records(path: PathBuf, default_max_warnings: u32, records: Snapshot) -> Self {
        Self {
            path,
            default_max_warnings: default_max_warnings.max(1),
            records: Mutex::new(records),
            restricting: DashSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_max_warnings(&self) -> u32 {
        self.default_max_warnings
    }

    /// Get a user's record, or a zero-value record if they have none
    pub async fn get_user(&self, user_id: u64) -> UserRecord {
        self.records
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| UserRecord::empty(self.default_max_warnings))
    }

    /// Current count and resolved threshold for a user
    pub async fn warning_status(&self, user_id: u64) -> (u32, u32) {
        let record = self.get_user(user_id).await;
        (record.count, record.threshold(self.default_max_warnings))
    }

    pub async fn contains(&self, user_id: u64) -> bool {
        self.records.lock().await.contains_key(&user_id)
    }

    /// Record a spam message and return the user's new violation count
    pub async fn log_violation(
        &self,
        user_id: u64,
        username: &str,
        text: &str,
    ) -> Result<u32, StoreError> {
        let mut records = self.records.lock().await;

        let record = records
            .entry(user_id)
            .or_insert_with(|| UserRecord::empty(self.default_max_warnings));
        if !username.is_empty() {
            record.username = username.to_string();
        }
        record.messages.push(text.to_string());
        record.count += 1;
        let count = record.count;

        debug!("Logged violation {} for user {}", count, user_id);

        self.commit(&records).await?;
        Ok(count)
    }

    /// Reset a user's violation count. Returns false if the user is unknown.
    pub async fn reset_count(&self, user_id: u64) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;

        let Some(record) = records.get_mut(&user_id) else {
            return Ok(false);
        };
        record.count = 0;

        info!("Reset violation count for user {}", user_id);

        self.commit(&records).await?;
        Ok(true)
    }

    pub async fn is_banned(&self, user_id: u64) -> bool {
        self.records
            .lock()
            .await
            .get(&user_id)
            .map(|record| record.banned)
            .unwrap_or(false)
    }

    /// Mark a user as banned. Returns false if the user is unknown.
    pub async fn ban_user(&self, user_id: u64) -> Result<bool, StoreError> {
        self.set_banned(user_id, true).await
    }

    /// Clear a user's ban flag. Returns false if the user is unknown.
    pub async fn unban_user(&self, user_id: u64) -> Result<bool, StoreError> {
        self.set_banned(user_id, false).await
    }

    async fn set_banned(&self, user_id: u64, banned: bool) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;

        let Some(record) = records.get_mut(&user_id) else {
            debug!("Ignoring ban flag change for unknown user {}", user_id);
            return Ok(false);
        };
        record.banned = banned;

        info!(
            "User {} marked as {}",
            user_id,
            if banned { "banned" } else { "unbanned" }
        );

        self.commit(&records).await?;
        Ok(true)
    }

    /// Reserve the restriction of a user. Returns false if they are already
    /// banned or another message claimed them first.
    pub async fn claim_restriction(&self, user_id: u64) -> bool {
        let records = self.records.lock().await;

        if records.get(&user_id).is_some_and(|record| record.banned) {
            return false;
        }
        self.restricting.insert(user_id)
    }

    pub fn restriction_pending(&self, user_id: u64) -> bool {
        self.restricting.contains(&user_id)
    }

    /// Drop a claim once the restriction succeeded or failed
    pub fn release_restriction(&self, user_id: u64) {
        self.restricting.remove(&user_id);
    }

    /// First record (by ascending ID) whose stored username matches exactly
    pub async fn find_by_username(&self, username: &str) -> Option<(u64, UserRecord)> {
        self.records
            .lock()
            .await
            .iter()
            .find(|(_, record)| record.username == username)
            .map(|(id, record)| (*id, record.clone()))
    }

    /// Copy of every record, detached from later mutations
    pub async fn get_logs(&self) -> Snapshot {
        self.records.lock().await.clone()
    }

    /// Rewrite the snapshot from the current in-memory state
    pub async fn persist(&self) -> Result<(), StoreError> {
        let records = self.records.lock().await;
        self.commit(&records).await
    }

    async fn commit(&self, records: &Snapshot) -> Result<(), StoreError> {
        snapshot::persist(&self.path, records).await.map_err(|e| {
            error!("Warning store is out of sync with disk: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    async fn temp_store(dir: &tempfile::TempDir) -> WarningStore {
        WarningStore::open(dir.path().join("warnings.json"), 3).await
    }

    #[test]
    fn test_default_threshold_is_at_least_one() {
        let store = WarningStore::with_records(PathBuf::from("unused.json"), 0, Snapshot::new());
        assert_eq!(store.default_max_warnings(), 1);

        let record = tokio_test::block_on(store.get_user(1));
        assert_eq!(record.threshold(store.default_max_warnings()), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_is_zero_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        let record = store.get_user(99).await;
        assert_eq!(record.username, "unknown");
        assert!(!record.banned);
        assert!(record.messages.is_empty());
        assert_eq!(record.count, 0);
        assert_eq!(record.threshold(store.default_max_warnings()), 3);
        assert!(!store.is_banned(99).await);
        assert!(!store.contains(99).await);
    }

    #[tokio::test]
    async fn test_log_violation_increments_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        assert_eq!(store.log_violation(1, "alice", "spam one").await.unwrap(), 1);
        assert_eq!(store.log_violation(1, "alice2", "spam two").await.unwrap(), 2);

        let record = store.get_user(1).await;
        assert_eq!(record.count, 2);
        assert_eq!(record.username, "alice2");
        assert_eq!(record.messages, vec!["spam one", "spam two"]);
    }

    #[tokio::test]
    async fn test_empty_username_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        store.log_violation(1, "alice", "a").await.unwrap();
        store.log_violation(1, "", "b").await.unwrap();

        assert_eq!(store.get_user(1).await.username, "alice");
    }

    #[tokio::test]
    async fn test_reset_count_keeps_ban_flag() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        store.log_violation(1, "alice", "a").await.unwrap();
        store.log_violation(1, "alice", "b").await.unwrap();
        store.ban_user(1).await.unwrap();

        assert!(store.reset_count(1).await.unwrap());
        let record = store.get_user(1).await;
        assert_eq!(record.count, 0);
        assert!(record.banned);
        assert_eq!(record.messages.len(), 2);

        assert!(!store.reset_count(2).await.unwrap());
        assert!(!store.contains(2).await);
    }

    #[tokio::test]
    async fn test_ban_and_unban_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.log_violation(1, "alice", "a").await.unwrap();

        assert!(store.ban_user(1).await.unwrap());
        assert!(store.ban_user(1).await.unwrap());
        assert!(store.is_banned(1).await);

        assert!(store.unban_user(1).await.unwrap());
        assert!(store.unban_user(1).await.unwrap());
        assert!(!store.is_banned(1).await);
    }

    #[tokio::test]
    async fn test_ban_unknown_user_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        assert!(!store.ban_user(5).await.unwrap());
        assert!(!store.is_banned(5).await);
        assert!(store.get_logs().await.is_empty());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.log_violation(10, "bob", "first").await.unwrap();
        store.log_violation(20, "carol", "second").await.unwrap();
        store.ban_user(20).await.unwrap();

        let before = store.get_logs().await;
        let reopened = temp_store(&dir).await;
        assert_eq!(reopened.get_logs().await, before);
    }

    #[tokio::test]
    async fn test_persist_rewrites_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.log_violation(1, "alice", "a").await.unwrap();

        std::fs::remove_file(store.path()).unwrap();
        store.persist().await.unwrap();

        let reopened = temp_store(&dir).await;
        assert_eq!(reopened.warning_status(1).await, (1, 3));
    }

    #[tokio::test]
    async fn test_find_by_username_takes_lowest_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.log_violation(30, "dup", "x").await.unwrap();
        store.log_violation(12, "dup", "y").await.unwrap();

        let (id, record) = store.find_by_username("dup").await.unwrap();
        assert_eq!(id, 12);
        assert_eq!(record.messages, vec!["y"]);
        assert!(store.find_by_username("nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_logs_are_a_detached_copy() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.log_violation(1, "alice", "a").await.unwrap();

        let logs = store.get_logs().await;
        store.log_violation(1, "alice", "b").await.unwrap();

        assert_eq!(logs[&1].count, 1);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("warnings.json");
        let store = WarningStore::open(path, 3).await;

        let result = store.log_violation(1, "alice", "a").await;
        assert!(matches!(result, Err(StoreError::Write { .. })));
        assert_eq!(store.get_user(1).await.count, 1);
    }

    #[tokio::test]
    async fn test_restriction_is_claimed_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.log_violation(1, "alice", "a").await.unwrap();

        assert!(store.claim_restriction(1).await);
        assert!(!store.claim_restriction(1).await);
        assert!(store.restriction_pending(1));

        // a failed restriction can be retried
        store.release_restriction(1);
        assert!(!store.restriction_pending(1));
        assert!(store.claim_restriction(1).await);

        store.ban_user(1).await.unwrap();
        store.release_restriction(1);
        assert!(!store.claim_restriction(1).await);
    }

    #[tokio::test]
    async fn test_concurrent_violations_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(temp_store(&dir).await);

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .log_violation(1, "alice", &format!("spam {}", i))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get_user(1).await.count, 20);
        let reopened = temp_store(&dir).await;
        assert_eq!(reopened.get_user(1).await.count, 20);
    }
}
