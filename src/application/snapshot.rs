//! TOML snapshot of the category forest
//!
//! The core keeps everything in memory; a snapshot lets the hosting layer
//! seed the forest at startup and write it back afterwards.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::CategoryNode;
use crate::infrastructure::traits::FileSystem;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of the whole forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub categories: Vec<CategoryNode>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            categories: Vec::new(),
        }
    }
}

impl Snapshot {
    pub fn new(categories: Vec<CategoryNode>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            categories,
        }
    }

    pub fn from_toml(content: &str) -> ApplicationResult<Self> {
        let snapshot: Snapshot = toml::from_str(content).map_err(|e| ApplicationError::Snapshot {
            message: format!("parse: {e}"),
        })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ApplicationError::Snapshot {
                message: format!(
                    "unsupported version {} (expected {})",
                    snapshot.version, SNAPSHOT_VERSION
                ),
            });
        }
        Ok(snapshot)
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Snapshot {
            message: format!("serialize: {e}"),
        })
    }
}

/// Reads and writes snapshot files through the [`FileSystem`] boundary.
pub struct SnapshotFile {
    fs: Arc<dyn FileSystem>,
}

impl SnapshotFile {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Loads a snapshot; a missing file yields an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Snapshot> {
        if !self.fs.exists(path) {
            debug!("no snapshot at {}, starting empty", path.display());
            return Ok(Snapshot::default());
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read snapshot", path)?;
        Snapshot::from_toml(&content)
    }

    #[instrument(level = "debug", skip(self, snapshot), fields(count = snapshot.categories.len()))]
    pub fn save(&self, path: &Path, snapshot: &Snapshot) -> ApplicationResult<()> {
        let content = snapshot.to_toml()?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create snapshot directory", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write snapshot", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unknown_version_when_parsing_then_rejected() {
        let err = Snapshot::from_toml("version = 7\n").unwrap_err();
        assert!(err.to_string().contains("unsupported version 7"));
    }

    #[test]
    fn given_empty_document_when_parsing_version_only_then_no_categories() {
        let snapshot = Snapshot::from_toml("version = 1\n").unwrap();
        assert!(snapshot.categories.is_empty());
    }
}
