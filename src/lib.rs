//! Hierarchical category tree manager.
//!
//! A forest of named categories with derived `level` and materialized
//! `path` attributes. Structural changes (create, rename, move, delete) are
//! validated up front and cascade the derived attributes to every
//! descendant, so the forest is consistent after each operation.
//!
//! ```
//! use cattree::application::services::CategoryService;
//! use cattree::domain::NewCategory;
//!
//! let service = CategoryService::default();
//! let it = service.create(NewCategory::new("IT장비", "IT_EQUIPMENT")).unwrap();
//! let pc = service
//!     .create(NewCategory::new("컴퓨터", "COMPUTER").with_parent(it.id))
//!     .unwrap();
//! assert_eq!(pc.level, 2);
//! assert_eq!(pc.path, "IT장비/컴퓨터");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
