//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::domain::CategoryNode;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One-line summary of a category: id, path, code, level, inactive marker.
pub fn node_line(node: &CategoryNode) -> String {
    let mut line = format!(
        "{:>4}  {}  [{}]  L{}",
        node.id.to_string().bold(),
        node.path,
        node.code.cyan(),
        node.level
    );
    if !node.is_active {
        line.push_str(&format!("  {}", "(inactive)".dimmed()));
    }
    line
}

/// Print a list of categories, or a note when it is empty.
pub fn node_list(nodes: &[CategoryNode]) {
    if nodes.is_empty() {
        detail(&"(none)".dimmed());
        return;
    }
    for node in nodes {
        info(&node_line(node));
    }
}

/// Print every field of one category.
pub fn node_details(node: &CategoryNode) {
    header(&node.path);
    detail(&format!("id:          {}", node.id));
    detail(&format!("code:        {}", node.code));
    detail(&format!("name:        {}", node.name));
    detail(&format!(
        "parent:      {}",
        node.parent_id
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    detail(&format!("level:       {}", node.level));
    detail(&format!("sort order:  {}", node.sort_order));
    detail(&format!("active:      {}", node.is_active));
    if let Some(description) = &node.description {
        detail(&format!("description: {}", description));
    }
    detail(&format!("created:     {}", node.created_at.to_rfc3339()));
    detail(&format!("updated:     {}", node.updated_at.to_rfc3339()));
}
