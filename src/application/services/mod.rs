//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services own shared state and I/O boundary traits but are themselves
//! concrete structs, not traits.

mod category;

pub use category::CategoryService;
