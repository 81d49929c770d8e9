//! Read-only traversals over the node store.

use std::collections::HashSet;

use itertools::Itertools;
use tracing::instrument;

use crate::domain::entities::{CategoryId, CategoryNode, CategoryTreeNode, ForestStats};
use crate::domain::store::NodeStore;

/// Side-effect-free view over a [`NodeStore`].
///
/// Every traversal terminates because the mutator keeps the parent graph
/// acyclic.
#[derive(Debug, Clone, Copy)]
pub struct TreeQuery<'a> {
    store: &'a NodeStore,
}

impl<'a> TreeQuery<'a> {
    pub fn new(store: &'a NodeStore) -> Self {
        Self { store }
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.store.contains(id)
    }

    /// Direct children sorted by `sort_order`, ties broken by id.
    /// `None` selects the roots.
    pub fn children_of(&self, parent: Option<CategoryId>) -> Vec<CategoryNode> {
        self.child_refs(parent).into_iter().cloned().collect()
    }

    /// All descendants in pre-order: each child is emitted before its own
    /// children.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants_of(&self, id: CategoryId) -> Vec<CategoryNode> {
        self.descendant_ids(id)
            .into_iter()
            .filter_map(|d| self.store.get(d))
            .collect()
    }

    /// Ancestors ordered from the root down to the direct parent.
    /// Empty for roots and unknown ids.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestors_of(&self, id: CategoryId) -> Vec<CategoryNode> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.store.node(id).and_then(|n| n.parent_id);
        while let Some(parent_id) = current {
            // a cycle cannot exist, but a corrupted store must not hang us
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.store.node(parent_id) else {
                break;
            };
            chain.push(parent.clone());
            current = parent.parent_id;
        }
        chain.reverse();
        chain
    }

    /// The whole forest as nested nodes, roots and children in sibling order.
    #[instrument(level = "debug", skip(self))]
    pub fn build_tree(&self) -> Vec<CategoryTreeNode> {
        self.child_refs(None)
            .into_iter()
            .map(|root| self.attach_children(root))
            .collect()
    }

    /// The subtree rooted at `id`, if it exists.
    pub fn subtree(&self, id: CategoryId) -> Option<CategoryTreeNode> {
        self.store.node(id).map(|node| self.attach_children(node))
    }

    pub fn nodes_at_level(&self, level: u32) -> Vec<CategoryNode> {
        self.store
            .iter()
            .filter(|n| n.level == level)
            .cloned()
            .collect()
    }

    /// Deepest level in the forest, 0 when empty.
    pub fn max_level(&self) -> u32 {
        self.store.iter().map(|n| n.level).max().unwrap_or(0)
    }

    /// Nodes whose path is `prefix` or lies below it, matching whole path
    /// segments only (`IT` does not match `IT장비`).
    pub fn find_by_path_prefix(&self, prefix: &str) -> Vec<CategoryNode> {
        let prefix = prefix.trim_end_matches('/');
        let below = format!("{}/", prefix);
        self.store
            .iter()
            .filter(|n| n.path == prefix || n.path.starts_with(&below))
            .sorted_by(|a, b| a.path.cmp(&b.path))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over name, code and path.
    pub fn search(&self, term: &str) -> Vec<CategoryNode> {
        let term = term.to_lowercase();
        self.store
            .iter()
            .filter(|n| {
                n.name.to_lowercase().contains(&term)
                    || n.code.to_lowercase().contains(&term)
                    || n.path.to_lowercase().contains(&term)
            })
            .cloned()
            .collect()
    }

    /// Nodes without children, in insertion order.
    pub fn leaves(&self) -> Vec<CategoryNode> {
        self.store
            .iter()
            .filter(|n| self.store.child_ids(Some(n.id)).is_empty())
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> ForestStats {
        let mut stats = ForestStats::default();
        for node in self.store.iter() {
            stats.total += 1;
            if node.is_active {
                stats.active += 1;
            }
            if node.is_root() {
                stats.roots += 1;
            }
            if self.store.child_ids(Some(node.id)).is_empty() {
                stats.leaves += 1;
            }
            stats.max_level = stats.max_level.max(node.level);
        }
        stats
    }

    /// Descendant ids in pre-order, without cloning nodes.
    pub(crate) fn descendant_ids(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut result = Vec::new();
        let mut stack: Vec<CategoryId> = self
            .sorted_child_ids(Some(id))
            .into_iter()
            .rev()
            .collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.sorted_child_ids(Some(current)).into_iter().rev());
        }
        result
    }

    pub(crate) fn sorted_child_ids(&self, parent: Option<CategoryId>) -> Vec<CategoryId> {
        self.child_refs(parent).into_iter().map(|n| n.id).collect()
    }

    fn child_refs(&self, parent: Option<CategoryId>) -> Vec<&'a CategoryNode> {
        let store = self.store;
        store
            .child_ids(parent)
            .iter()
            .filter_map(|id| store.node(*id))
            .sorted_by_key(|n| (n.sort_order, n.id))
            .collect()
    }

    fn attach_children(&self, node: &CategoryNode) -> CategoryTreeNode {
        CategoryTreeNode {
            node: node.clone(),
            children: self
                .child_refs(Some(node.id))
                .into_iter()
                .map(|child| self.attach_children(child))
                .collect(),
        }
    }
}
