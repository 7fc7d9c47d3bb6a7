// modorder-core/src/lib.rs

pub mod dependency;
pub mod iterator;
pub mod module_map;
pub mod provider;

// Re-export key types for easier use by the CLI crate
pub use dependency::{load_order, DependencyModuleIterator, Pass};
pub use iterator::ModuleIterator;
pub use module_map::ModuleMap;
pub use provider::{DeclaredDependencies, DependencyProvider};
