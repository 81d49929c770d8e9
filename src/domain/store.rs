//! Arena-backed storage for category nodes.
//!
//! The store is purely mechanical: it assigns identifiers and keeps its
//! indices in step with the nodes it holds, but enforces no business rules.
//! Reads hand out clones so callers cannot bypass the mutator.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::domain::entities::{CategoryId, CategoryNode};

/// Authoritative collection of category nodes.
///
/// Besides the arena itself the store maintains
/// - an id index for O(1) lookups,
/// - a parent index (`parent_id -> child ids`, insertion order),
/// - a code index for uniqueness checks,
/// - the insertion order of all ids.
#[derive(Debug, Clone)]
pub struct NodeStore {
    arena: Arena<CategoryNode>,
    index: HashMap<CategoryId, Index>,
    children: HashMap<Option<CategoryId>, Vec<CategoryId>>,
    codes: HashMap<String, CategoryId>,
    order: Vec<CategoryId>,
    next_id: u64,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            index: HashMap::new(),
            children: HashMap::new(),
            codes: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Stores a copy of `node` and returns the stored copy.
    ///
    /// A node carrying [`CategoryId::UNASSIGNED`] receives the next unused id.
    /// A node with an explicit id keeps it; if that id is already present the
    /// stored node is overwritten.
    #[instrument(level = "trace", skip(self, node), fields(name = %node.name))]
    pub fn insert(&mut self, mut node: CategoryNode) -> CategoryNode {
        if !node.id.is_assigned() {
            node.id = CategoryId(self.next_id);
        }
        let id = node.id;
        self.next_id = self.next_id.max(id.0.saturating_add(1));

        if self.index.contains_key(&id) {
            self.replace(id, node.clone());
            return node;
        }

        self.children.entry(node.parent_id).or_default().push(id);
        self.codes.insert(node.code.clone(), id);
        self.order.push(id);
        let idx = self.arena.insert(node.clone());
        self.index.insert(id, idx);
        trace!("inserted {} at {:?}", id, idx);
        node
    }

    pub fn get(&self, id: CategoryId) -> Option<CategoryNode> {
        self.node(id).cloned()
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.index.contains_key(&id)
    }

    /// All nodes in insertion order.
    pub fn all(&self) -> Vec<CategoryNode> {
        self.iter().cloned().collect()
    }

    /// Deletes the node if present and reports whether it existed.
    ///
    /// Children of a removed node are left as they are; refusing to delete a
    /// parent is the validation gate's job.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, id: CategoryId) -> bool {
        let Some(idx) = self.index.remove(&id) else {
            return false;
        };
        let Some(node) = self.arena.remove(idx) else {
            return false;
        };
        self.detach(node.parent_id, id);
        if self.codes.get(&node.code) == Some(&id) {
            self.codes.remove(&node.code);
        }
        self.order.retain(|other| *other != id);
        true
    }

    /// Overwrites the stored node with `node`, keeping the parent and code
    /// indices consistent. Returns false if `id` is unknown.
    #[instrument(level = "trace", skip(self, node))]
    pub fn replace(&mut self, id: CategoryId, mut node: CategoryNode) -> bool {
        let Some(&idx) = self.index.get(&id) else {
            return false;
        };
        node.id = id;
        let Some(slot) = self.arena.get_mut(idx) else {
            return false;
        };
        let new_parent = node.parent_id;
        let new_code = node.code.clone();
        let old = std::mem::replace(slot, node);

        if old.parent_id != new_parent {
            self.detach(old.parent_id, id);
            self.children.entry(new_parent).or_default().push(id);
        }
        if old.code != new_code {
            self.codes.remove(&old.code);
            self.codes.insert(new_code, id);
        }
        true
    }

    /// Ids of the direct children of `parent`, in insertion order.
    /// `None` selects the roots.
    pub fn child_ids(&self, parent: Option<CategoryId>) -> &[CategoryId] {
        self.children
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find_by_code(&self, code: &str) -> Option<CategoryId> {
        self.codes.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub(crate) fn node(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.index.get(&id).and_then(|idx| self.arena.get(*idx))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &CategoryNode> + '_ {
        self.order.iter().filter_map(move |id| self.node(*id))
    }

    fn detach(&mut self, parent: Option<CategoryId>, id: CategoryId) {
        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.retain(|other| *other != id);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }
    }
}
