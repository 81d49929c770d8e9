//! Domain entities: category nodes and the requests that create or change them

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a category node.
///
/// Assigned by the store on insertion and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl CategoryId {
    /// Placeholder carried by a node that has not been stored yet.
    pub const UNASSIGNED: CategoryId = CategoryId(0);

    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CategoryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A single category in the forest.
///
/// `level` and `path` are derived from the parent chain and stored, never
/// computed on read. They are only written by the mutator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    /// Globally unique, immutable after creation
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` marks a root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    /// 1 for roots, parent level + 1 otherwise
    #[serde(default)]
    pub level: u32,
    /// Slash-joined names from the root down to this node
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl CategoryNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for CategoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.id, self.path, self.code)
    }
}

/// Request to create a category.
///
/// `name` and `code` are optional here so that a missing field can be
/// reported as a validation error instead of failing at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCategory {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            code: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = Some(false);
        self
    }
}

/// Request to change the non-structural fields of a category.
///
/// `code` is immutable and `parent_id` changes go through a move, so
/// neither can be expressed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

impl CategoryUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.sort_order.is_none()
            && self.is_active.is_none()
    }
}

/// A category with its children attached, for full-tree display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTreeNode {
    #[serde(flatten)]
    pub node: CategoryNode,
    pub children: Vec<CategoryTreeNode>,
}

impl CategoryTreeNode {
    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CategoryTreeNode::size).sum::<usize>()
    }

    /// Height of this subtree, a leaf being 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CategoryTreeNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Aggregate figures over the whole forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestStats {
    pub total: usize,
    pub active: usize,
    pub roots: usize,
    pub leaves: usize,
    pub max_level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_builder_helpers_when_building_request_then_fields_are_set() {
        let req = NewCategory::new("컴퓨터", "COMPUTER")
            .with_parent(CategoryId(1))
            .with_description("desktops and laptops")
            .with_sort_order(3)
            .inactive();

        assert_eq!(req.name.as_deref(), Some("컴퓨터"));
        assert_eq!(req.code.as_deref(), Some("COMPUTER"));
        assert_eq!(req.parent_id, Some(CategoryId(1)));
        assert_eq!(req.sort_order, Some(3));
        assert_eq!(req.is_active, Some(false));
    }

    #[test]
    fn given_default_update_when_checking_then_is_empty() {
        assert!(CategoryUpdate::default().is_empty());
        assert!(!CategoryUpdate::rename("x").is_empty());
    }

    #[test]
    fn given_unassigned_id_when_checking_then_reports_unassigned() {
        assert!(!CategoryId::UNASSIGNED.is_assigned());
        assert!(CategoryId(7).is_assigned());
        assert_eq!(CategoryId(7).to_string(), "7");
    }
}
