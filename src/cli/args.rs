//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Hierarchical category tree manager: derived levels, materialized paths, cycle-safe moves
#[derive(Parser, Debug)]
#[command(name = "cattree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Snapshot file to load (default: snapshot_file from config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,

    /// Write the snapshot back after a successful change
    #[arg(short, long, global = true)]
    pub write: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a category
    Add {
        /// Display name (max 50 characters)
        name: String,
        /// Unique code (max 20 characters)
        code: String,
        /// Parent category id (omit for a root)
        #[arg(short, long)]
        parent: Option<u64>,
        /// Free-text description
        #[arg(long)]
        description: Option<String>,
        /// Position among siblings (default: last)
        #[arg(long)]
        sort_order: Option<i64>,
        /// Create as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Show one category
    Show {
        /// Category id
        id: u64,
    },

    /// Rename a category (paths of all descendants follow)
    Rename {
        /// Category id
        id: u64,
        /// New name
        name: String,
    },

    /// Change name, description, sort order or active flag
    Update {
        /// Category id
        id: u64,
        #[arg(long)]
        name: Option<String>,
        /// Empty string clears the description
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sort_order: Option<i64>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Move a category under another one (no --parent: make it a root)
    Move {
        /// Category id
        id: u64,
        /// New parent id
        #[arg(short, long)]
        parent: Option<u64>,
    },

    /// Delete a category without children
    Delete {
        /// Category id
        id: u64,
    },

    /// Show the forest (or one subtree) as a tree
    Tree {
        /// Subtree root
        id: Option<u64>,
    },

    /// List direct children (no id: list roots)
    Children {
        /// Parent id
        id: Option<u64>,
    },

    /// List ancestors, root first
    Ancestors {
        /// Category id
        id: u64,
    },

    /// List descendants in pre-order
    Descendants {
        /// Category id
        id: u64,
    },

    /// List categories at a level (roots are level 1)
    Level {
        level: u32,
    },

    /// Search name, code and path (case-insensitive)
    Search {
        term: String,
    },

    /// List a path and everything below it
    Prefix {
        /// Path such as "IT장비/컴퓨터"
        path: String,
    },

    /// Show forest statistics
    Stats,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

impl Commands {
    /// True for commands that change the forest.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Commands::Add { .. }
                | Commands::Rename { .. }
                | Commands::Update { .. }
                | Commands::Move { .. }
                | Commands::Delete { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_move_without_parent_when_parsing_then_parent_is_none() {
        let cli = Cli::parse_from(["cattree", "move", "3"]);
        match cli.command {
            Some(Commands::Move { id, parent }) => {
                assert_eq!(id, 3);
                assert_eq!(parent, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counts() {
        let cli = Cli::parse_from(["cattree", "-ddd", "stats"]);
        assert_eq!(cli.debug, 3);
        assert!(!cli.command.as_ref().is_some_and(Commands::is_mutation));
    }
}
