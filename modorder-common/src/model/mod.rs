// src/model/mod.rs
pub mod module;

// Re-export
pub use module::{DeclaresDependencies, Module, ModuleSpec};
