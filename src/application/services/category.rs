//! Category tree service
//!
//! The contract the hosting layer talks to. Owns the single [`NodeStore`]
//! behind a reader/writer lock: every mutation holds the write guard for its
//! full duration, cascade included, so no reader ever sees a half-updated
//! subtree. Queries share the read guard and return owned values.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{instrument, warn};

use crate::application::snapshot::Snapshot;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    CategoryId, CategoryNode, CategoryTreeNode, CategoryUpdate, DomainError, DomainResult,
    FieldLimits, ForestStats, NewCategory, NodeStore, TreeMutator, TreeQuery,
};

/// Thread-safe handle on a category forest.
///
/// Cloning the service yields another handle on the same forest.
#[derive(Debug, Clone)]
pub struct CategoryService {
    store: Arc<RwLock<NodeStore>>,
    limits: FieldLimits,
}

impl Default for CategoryService {
    fn default() -> Self {
        Self::new(FieldLimits::default())
    }
}

impl CategoryService {
    pub fn new(limits: FieldLimits) -> Self {
        Self::with_store(NodeStore::new(), limits)
    }

    pub fn with_store(store: NodeStore, limits: FieldLimits) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            limits,
        }
    }

    // ------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------

    #[instrument(level = "debug", skip(self, data))]
    pub fn create(&self, data: NewCategory) -> ApplicationResult<CategoryNode> {
        self.mutate(|m| m.create(data))
    }

    /// Applies name, description, sort order and active flag changes.
    #[instrument(level = "debug", skip(self, data))]
    pub fn update(&self, id: CategoryId, data: CategoryUpdate) -> ApplicationResult<CategoryNode> {
        self.mutate(|m| m.update(id, data))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn rename(&self, id: CategoryId, new_name: &str) -> ApplicationResult<CategoryNode> {
        self.mutate(|m| m.rename(id, new_name))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_active(&self, id: CategoryId, is_active: bool) -> ApplicationResult<CategoryNode> {
        self.mutate(|m| m.set_active(id, is_active))
    }

    /// Reparents `id` under `new_parent`, or detaches it to a root.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(
        &self,
        id: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> ApplicationResult<CategoryNode> {
        self.mutate(|m| m.move_node(id, new_parent))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: CategoryId) -> ApplicationResult<bool> {
        self.mutate(|m| m.delete(id))
    }

    /// Replaces the forest with the snapshot contents. Returns the number of
    /// categories loaded.
    #[instrument(level = "debug", skip(self, snapshot))]
    pub fn restore(&self, snapshot: Snapshot) -> ApplicationResult<usize> {
        self.mutate(|m| m.rebuild(snapshot.categories))
    }

    // ------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------

    pub fn get(&self, id: CategoryId) -> ApplicationResult<CategoryNode> {
        self.read()?
            .get(id)
            .ok_or_else(|| DomainError::NotFound(id).into())
    }

    /// All categories in insertion order.
    pub fn list(&self) -> ApplicationResult<Vec<CategoryNode>> {
        Ok(self.read()?.all())
    }

    pub fn len(&self) -> ApplicationResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> ApplicationResult<bool> {
        Ok(self.read()?.is_empty())
    }

    pub fn tree(&self) -> ApplicationResult<Vec<CategoryTreeNode>> {
        self.query(|q| Ok(q.build_tree()))
    }

    pub fn subtree(&self, id: CategoryId) -> ApplicationResult<CategoryTreeNode> {
        self.query(|q| q.subtree(id).ok_or(DomainError::NotFound(id)))
    }

    /// Direct children in sibling order; `None` lists the roots.
    pub fn children(&self, parent: Option<CategoryId>) -> ApplicationResult<Vec<CategoryNode>> {
        self.query(|q| {
            if let Some(id) = parent {
                ensure_exists(&q, id)?;
            }
            Ok(q.children_of(parent))
        })
    }

    /// Ancestors from the root down to the direct parent.
    pub fn ancestors(&self, id: CategoryId) -> ApplicationResult<Vec<CategoryNode>> {
        self.query(|q| {
            ensure_exists(&q, id)?;
            Ok(q.ancestors_of(id))
        })
    }

    /// Descendants in pre-order.
    pub fn descendants(&self, id: CategoryId) -> ApplicationResult<Vec<CategoryNode>> {
        self.query(|q| {
            ensure_exists(&q, id)?;
            Ok(q.descendants_of(id))
        })
    }

    pub fn nodes_at_level(&self, level: u32) -> ApplicationResult<Vec<CategoryNode>> {
        self.query(|q| Ok(q.nodes_at_level(level)))
    }

    pub fn max_level(&self) -> ApplicationResult<u32> {
        self.query(|q| Ok(q.max_level()))
    }

    pub fn leaves(&self) -> ApplicationResult<Vec<CategoryNode>> {
        self.query(|q| Ok(q.leaves()))
    }

    pub fn search(&self, term: &str) -> ApplicationResult<Vec<CategoryNode>> {
        self.query(|q| Ok(q.search(term)))
    }

    pub fn find_by_path_prefix(&self, prefix: &str) -> ApplicationResult<Vec<CategoryNode>> {
        self.query(|q| Ok(q.find_by_path_prefix(prefix)))
    }

    pub fn stats(&self) -> ApplicationResult<ForestStats> {
        self.query(|q| Ok(q.stats()))
    }

    /// Point-in-time copy of the whole forest.
    pub fn snapshot(&self) -> ApplicationResult<Snapshot> {
        Ok(Snapshot::new(self.read()?.all()))
    }

    // ------------------------------------------------------------
    // Locking
    // ------------------------------------------------------------

    fn read(&self) -> ApplicationResult<RwLockReadGuard<'_, NodeStore>> {
        self.store.read().map_err(|_| ApplicationError::StatePoisoned)
    }

    fn write(&self) -> ApplicationResult<RwLockWriteGuard<'_, NodeStore>> {
        self.store.write().map_err(|_| ApplicationError::StatePoisoned)
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut TreeMutator<'_>) -> DomainResult<T>,
    ) -> ApplicationResult<T> {
        let mut guard = self.write()?;
        let mut mutator = TreeMutator::new(&mut guard, self.limits);
        op(&mut mutator).map_err(|e| {
            warn!("rejected: {}", e);
            ApplicationError::from(e)
        })
    }

    fn query<T>(&self, op: impl FnOnce(TreeQuery<'_>) -> DomainResult<T>) -> ApplicationResult<T> {
        let guard = self.read()?;
        op(TreeQuery::new(&guard)).map_err(ApplicationError::from)
    }
}

fn ensure_exists(query: &TreeQuery<'_>, id: CategoryId) -> DomainResult<()> {
    if query.contains(id) {
        Ok(())
    } else {
        Err(DomainError::NotFound(id))
    }
}
