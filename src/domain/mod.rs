//! Domain layer: the category forest and its invariants
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading,
//! no locking).

pub mod entities;
pub mod error;
pub mod mutator;
pub mod query;
pub mod store;
pub mod validation;

pub use entities::*;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use mutator::{join_path, TreeMutator, PATH_SEPARATOR};
pub use query::TreeQuery;
pub use store::NodeStore;
pub use validation::{FieldLimits, ValidationGate};
