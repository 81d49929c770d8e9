//! Service container for dependency injection
//!
//! Wires up the category service and the snapshot file with their dependencies.
//! This is the one place the category store is created; everything else
//! receives a handle.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::services::CategoryService;
use crate::application::{ApplicationResult, SnapshotFile};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Handle on the category forest
    pub categories: CategoryService,

    /// Snapshot reader/writer
    pub snapshots: SnapshotFile,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let categories = CategoryService::new(settings.limits);
        let snapshots = SnapshotFile::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            categories,
            snapshots,
        }
    }

    /// Snapshot file in effect: `overridden` if given, else the configured one.
    pub fn snapshot_path<'a>(&'a self, overridden: Option<&'a Path>) -> &'a Path {
        overridden.unwrap_or(self.settings.snapshot_file.as_path())
    }

    /// Seeds the category forest from the snapshot file.
    pub fn load_snapshot(&self, path: &Path) -> ApplicationResult<usize> {
        let snapshot = self.snapshots.load(path)?;
        let count = self.categories.restore(snapshot)?;
        debug!("loaded {} categories from {}", count, path.display());
        Ok(count)
    }

    /// Writes the current forest to the snapshot file.
    pub fn save_snapshot(&self, path: &Path) -> ApplicationResult<()> {
        let snapshot = self.categories.snapshot()?;
        self.snapshots.save(path, &snapshot)?;
        info!(
            "saved {} categories to {}",
            snapshot.categories.len(),
            path.display()
        );
        Ok(())
    }
}
