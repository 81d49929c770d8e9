//! Dependency injection: the composition root

mod service_container;

pub use service_container::ServiceContainer;
