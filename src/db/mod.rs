pub mod models;
pub mod snapshot;
pub mod warning_store;

pub use snapshot::StoreError;
pub use warning_store::WarningStore;
