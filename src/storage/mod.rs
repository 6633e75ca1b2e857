pub mod error;
pub mod snapshot;

pub use error::StoreError;
pub use snapshot::SnapshotStore;
