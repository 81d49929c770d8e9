//! Tree display via termtree

use termtree::Tree;

use crate::domain::CategoryTreeNode;

pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

fn label(node: &CategoryTreeNode) -> String {
    let n = &node.node;
    let mut label = format!("{} [{}] #{}", n.name, n.code, n.id);
    if !n.is_active {
        label.push_str(" (inactive)");
    }
    label
}

impl ToTermTree for CategoryTreeNode {
    fn to_term_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_term_tree()).collect();
        Tree::new(label(self)).with_leaves(leaves)
    }
}

/// A whole forest hangs under a synthetic root.
impl ToTermTree for [CategoryTreeNode] {
    fn to_term_tree(&self) -> Tree<String> {
        let root = if self.is_empty() {
            "(empty)".to_string()
        } else {
            ".".to_string()
        };
        Tree::new(root).with_leaves(self.iter().map(|r| r.to_term_tree()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::CategoryService;
    use crate::domain::NewCategory;

    #[test]
    fn given_nested_categories_when_rendering_then_children_are_indented() {
        let service = CategoryService::default();
        let it = service.create(NewCategory::new("IT장비", "IT_EQUIPMENT")).unwrap();
        service
            .create(NewCategory::new("컴퓨터", "COMPUTER").with_parent(it.id))
            .unwrap();

        let rendered = service.tree().unwrap().to_term_tree().to_string();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], ".");
        assert!(lines[1].ends_with("IT장비 [IT_EQUIPMENT] #1"), "{}", lines[1]);
        assert!(lines[2].ends_with("컴퓨터 [COMPUTER] #2"), "{}", lines[2]);
        assert!(lines[2].starts_with(' '), "child should be indented: {}", lines[2]);
    }

    #[test]
    fn given_empty_forest_when_rendering_then_says_empty() {
        let forest: Vec<CategoryTreeNode> = Vec::new();
        assert_eq!(forest.to_term_tree().to_string().trim(), "(empty)");
    }
}
