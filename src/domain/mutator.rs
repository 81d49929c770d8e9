//! Structural writes: create, update/rename, move, delete.
//!
//! Each operation runs validate -> compute -> commit. The cascade over
//! descendants is computed in full before the first write, so a rejected
//! request leaves the store untouched and an accepted one is written as a
//! whole.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::domain::entities::{CategoryId, CategoryNode, CategoryUpdate, NewCategory};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::query::TreeQuery;
use crate::domain::store::NodeStore;
use crate::domain::validation::{FieldLimits, ValidationGate};

/// Separator between names in a materialized path.
pub const PATH_SEPARATOR: char = '/';

/// Which derived attributes a cascade rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cascade {
    /// Rename: levels are unaffected
    Path,
    /// Move: both change
    LevelAndPath,
}

/// Write access to a [`NodeStore`] that maintains `level` and `path` for
/// every node it touches.
#[derive(Debug)]
pub struct TreeMutator<'a> {
    store: &'a mut NodeStore,
    limits: FieldLimits,
}

impl<'a> TreeMutator<'a> {
    pub fn new(store: &'a mut NodeStore, limits: FieldLimits) -> Self {
        Self { store, limits }
    }

    fn gate(&self) -> ValidationGate<'_> {
        ValidationGate::new(self.store, self.limits)
    }

    #[instrument(level = "debug", skip(self, data), fields(name = ?data.name, code = ?data.code))]
    pub fn create(&mut self, data: NewCategory) -> DomainResult<CategoryNode> {
        let (name, code) = self.gate().validate_create(&data)?;

        let (level, path) = match data.parent_id {
            Some(parent_id) => {
                let parent = self
                    .store
                    .node(parent_id)
                    .ok_or(DomainError::ParentNotFound(parent_id))?;
                (parent.level + 1, join_path(&parent.path, &name))
            }
            None => (1, name.clone()),
        };
        let sort_order = data
            .sort_order
            .unwrap_or_else(|| self.store.child_ids(data.parent_id).len() as i64);
        let now = Utc::now();

        let node = self.store.insert(CategoryNode {
            id: CategoryId::UNASSIGNED,
            name,
            code,
            description: data.description.filter(|d| !d.trim().is_empty()),
            parent_id: data.parent_id,
            level,
            path,
            sort_order,
            is_active: data.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        });
        info!("created category {}", node);
        Ok(node)
    }

    /// Renames a node and rewrites the path of every descendant.
    pub fn rename(&mut self, id: CategoryId, new_name: &str) -> DomainResult<CategoryNode> {
        self.update(id, CategoryUpdate::rename(new_name))
    }

    /// Applies the non-structural fields of `data`. A changed name cascades
    /// the path to all descendants; an empty description clears it.
    #[instrument(level = "debug", skip(self, data))]
    pub fn update(&mut self, id: CategoryId, data: CategoryUpdate) -> DomainResult<CategoryNode> {
        self.gate().validate_update(id, &data)?;
        let mut node = self.store.get(id).ok_or(DomainError::NotFound(id))?;
        let now = Utc::now();

        let mut renamed = false;
        if let Some(name) = data.name.as_deref().map(str::trim) {
            if name != node.name {
                node.name = name.to_string();
                node.path = self.derive_path(node.parent_id, &node.name);
                renamed = true;
            }
        }
        if let Some(description) = data.description {
            node.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(sort_order) = data.sort_order {
            node.sort_order = sort_order;
        }
        if let Some(is_active) = data.is_active {
            node.is_active = is_active;
        }
        node.updated_at = now;

        let descendants = if renamed {
            self.recompute_descendants(&node, Cascade::Path, now)
        } else {
            Vec::new()
        };
        debug!("update of {} touches {} descendants", id, descendants.len());

        self.commit(&node, descendants);
        info!("updated category {}", node);
        Ok(node)
    }

    pub fn set_active(&mut self, id: CategoryId, is_active: bool) -> DomainResult<CategoryNode> {
        self.update(
            id,
            CategoryUpdate {
                is_active: Some(is_active),
                ..CategoryUpdate::default()
            },
        )
    }

    /// Reparents a node (`None` detaches it to a root) and rewrites level
    /// and path of the node and its whole subtree.
    ///
    /// The node is appended after the existing children of its new parent.
    /// Moving a node to the parent it already has changes nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(
        &mut self,
        id: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> DomainResult<CategoryNode> {
        self.gate().validate_move(id, new_parent)?;
        let mut node = self.store.get(id).ok_or(DomainError::NotFound(id))?;
        if node.parent_id == new_parent {
            debug!("{} already under {:?}", id, new_parent);
            return Ok(node);
        }

        let now = Utc::now();
        node.level = match new_parent {
            Some(parent_id) => self
                .store
                .node(parent_id)
                .map(|p| p.level + 1)
                .ok_or(DomainError::ParentNotFound(parent_id))?,
            None => 1,
        };
        node.path = self.derive_path(new_parent, &node.name);
        node.sort_order = self.store.child_ids(new_parent).len() as i64;
        node.parent_id = new_parent;
        node.updated_at = now;

        let descendants = self.recompute_descendants(&node, Cascade::LevelAndPath, now);
        debug!("move of {} touches {} descendants", id, descendants.len());

        self.commit(&node, descendants);
        info!("moved category {} under {:?}", node, new_parent);
        Ok(node)
    }

    /// Removes a childless node. Returns whether it existed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: CategoryId) -> DomainResult<bool> {
        self.gate().validate_delete(id)?;
        let removed = self.store.remove(id);
        info!("deleted category {}", id);
        Ok(removed)
    }

    /// Replaces the whole store with `nodes`, recomputing every derived
    /// attribute from the parent chain.
    ///
    /// Names and codes are trimmed as on create. Rejects duplicate ids or
    /// codes, dangling parents, cycles and fields over the limits. Nothing is
    /// changed on rejection.
    #[instrument(level = "debug", skip(self, nodes), fields(count = nodes.len()))]
    pub fn rebuild(&mut self, mut nodes: Vec<CategoryNode>) -> DomainResult<usize> {
        let mut ids = HashSet::new();
        let mut codes = HashSet::new();
        for node in nodes.iter_mut() {
            // the id counter must be able to move past every restored id
            if !node.id.is_assigned() || node.id.0 == u64::MAX || !ids.insert(node.id) {
                return Err(DomainError::InvalidSnapshot(format!(
                    "missing, out of range or duplicate id {}",
                    node.id
                )));
            }
            let (name, code) = self
                .gate()
                .validate_fields(Some(&node.name), Some(&node.code))
                .map_err(|e| {
                    DomainError::InvalidSnapshot(format!("category {}: {}", node.id, e))
                })?;
            node.name = name;
            node.code = code;
            if !codes.insert(node.code.clone()) {
                return Err(DomainError::InvalidSnapshot(format!(
                    "duplicate code {}",
                    node.code
                )));
            }
        }
        if let Some(orphan) = nodes
            .iter()
            .find(|n| n.parent_id.is_some_and(|p| !ids.contains(&p)))
        {
            return Err(DomainError::InvalidSnapshot(format!(
                "category {} references missing parent {:?}",
                orphan.id, orphan.parent_id
            )));
        }

        let mut fresh = NodeStore::new();
        for node in nodes {
            fresh.insert(node);
        }

        let mut queue: VecDeque<(Option<CategoryId>, u32, String)> =
            VecDeque::from([(None, 0, String::new())]);
        let mut visited = 0usize;
        while let Some((parent, parent_level, parent_path)) = queue.pop_front() {
            for child_id in TreeQuery::new(&fresh).sorted_child_ids(parent) {
                let Some(mut child) = fresh.get(child_id) else {
                    continue;
                };
                child.level = parent_level + 1;
                child.path = if parent.is_none() {
                    child.name.clone()
                } else {
                    join_path(&parent_path, &child.name)
                };
                queue.push_back((Some(child.id), child.level, child.path.clone()));
                fresh.replace(child_id, child);
                visited += 1;
            }
        }
        if visited != fresh.len() {
            return Err(DomainError::InvalidSnapshot(format!(
                "{} categories are part of a parent cycle",
                fresh.len() - visited
            )));
        }

        let count = fresh.len();
        *self.store = fresh;
        info!("rebuilt store with {} categories", count);
        Ok(count)
    }

    fn derive_path(&self, parent: Option<CategoryId>, name: &str) -> String {
        match parent.and_then(|p| self.store.node(p)) {
            Some(parent) => join_path(&parent.path, name),
            None => name.to_string(),
        }
    }

    /// Computes the new state of every descendant of `root`, top-down in
    /// breadth order, each from its parent's freshly computed values.
    fn recompute_descendants(
        &self,
        root: &CategoryNode,
        cascade: Cascade,
        now: DateTime<Utc>,
    ) -> Vec<CategoryNode> {
        let query = TreeQuery::new(self.store);
        let mut updated = Vec::new();
        let mut queue = VecDeque::from([(root.id, root.level, root.path.clone())]);

        while let Some((parent_id, parent_level, parent_path)) = queue.pop_front() {
            for child_id in query.sorted_child_ids(Some(parent_id)) {
                let Some(mut child) = self.store.get(child_id) else {
                    continue;
                };
                if cascade == Cascade::LevelAndPath {
                    child.level = parent_level + 1;
                }
                child.path = join_path(&parent_path, &child.name);
                child.updated_at = now;
                queue.push_back((child.id, child.level, child.path.clone()));
                updated.push(child);
            }
        }
        updated
    }

    fn commit(&mut self, node: &CategoryNode, descendants: Vec<CategoryNode>) {
        self.store.replace(node.id, node.clone());
        for child in descendants {
            self.store.replace(child.id, child);
        }
    }
}

pub fn join_path(parent_path: &str, name: &str) -> String {
    format!("{}{}{}", parent_path, PATH_SEPARATOR, name)
}
