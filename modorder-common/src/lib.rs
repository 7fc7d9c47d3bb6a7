// modorder-common/src/lib.rs
pub mod config;
pub mod error;
pub mod manifest;
pub mod model;

// Re-export key types
pub use config::{Config, DuplicateKeyPolicy, UnknownDependencyPolicy};
pub use error::{ModOrderError, Result};
pub use manifest::{Manifest, ManifestFormat, ValidationReport};
pub use model::{DeclaresDependencies, Module, ModuleSpec};
