//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic, owns locking, and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;
pub mod snapshot;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use snapshot::{Snapshot, SnapshotFile, SNAPSHOT_VERSION};
