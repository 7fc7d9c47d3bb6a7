// modorder-common/src/model/module.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named unit that can be ordered.
///
/// Keys must be stable for the lifetime of a traversal pass and unique within
/// one module list; they are used as map keys for lookups and for the set of
/// already served modules.
pub trait Module {
    fn key(&self) -> &str;
}

/// A module that names its direct dependencies by key.
pub trait DeclaresDependencies: Module {
    /// Dependency keys in declaration order.
    fn dependency_keys(&self) -> &[String];

    /// Builds a stand-in module for a dependency key that has no definition.
    fn placeholder(key: &str) -> Self
    where
        Self: Sized;
}

impl<T: Module + ?Sized> Module for Box<T> {
    fn key(&self) -> &str {
        (**self).key()
    }
}

/// One module entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub key: String,
    #[serde(default, alias = "depends_on")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Set for modules synthesized from an unknown dependency key.
    #[serde(skip)]
    pub placeholder: bool,
}

impl ModuleSpec {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            dependencies: Vec::new(),
            description: None,
            placeholder: false,
        }
    }

    pub fn with_dependencies<I, S>(key: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            ..Self::new(key)
        }
    }

    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.dependencies.push(key.into());
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

impl Module for ModuleSpec {
    fn key(&self) -> &str {
        &self.key
    }
}

impl DeclaresDependencies for ModuleSpec {
    fn dependency_keys(&self) -> &[String] {
        &self.dependencies
    }

    fn placeholder(key: &str) -> Self {
        Self {
            description: Some("Placeholder for undefined module".to_string()),
            placeholder: true,
            ..Self::new(key)
        }
    }
}

impl fmt::Display for ModuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
