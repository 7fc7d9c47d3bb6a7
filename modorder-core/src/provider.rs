// modorder-core/src/provider.rs
use std::collections::HashMap;
use std::sync::Arc;

use modorder_common::{DeclaresDependencies, Module, UnknownDependencyPolicy};
use tracing::debug;

/// Supplies the direct dependencies of a module.
///
/// Dependencies are returned in the order they should be considered. They do
/// not have to come from the traversed module list; modules the list does not
/// contain are served like any other.
pub trait DependencyProvider<M: ?Sized> {
    fn dependencies(&self, module: &M) -> Vec<Arc<M>>;
}

impl<M, F> DependencyProvider<M> for F
where
    M: ?Sized,
    F: Fn(&M) -> Vec<Arc<M>>,
{
    fn dependencies(&self, module: &M) -> Vec<Arc<M>> {
        self(module)
    }
}

/// Resolves the dependency keys a module declares against a module list.
#[derive(Debug)]
pub struct DeclaredDependencies<M> {
    modules: HashMap<String, Arc<M>>,
    policy: UnknownDependencyPolicy,
}

impl<M: DeclaresDependencies> DeclaredDependencies<M> {
    pub fn new(modules: &[Arc<M>]) -> Self {
        let modules = modules
            .iter()
            .map(|m| (m.key().to_string(), Arc::clone(m)))
            .collect();
        Self {
            modules,
            policy: UnknownDependencyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownDependencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnknownDependencyPolicy {
        self.policy
    }

    fn unknown(&self, module: &M, key: &str) -> Option<Arc<M>> {
        match self.policy {
            UnknownDependencyPolicy::Placeholder => {
                debug!(
                    "'{}' depends on undefined '{}', serving a placeholder",
                    module.key(),
                    key
                );
                Some(Arc::new(M::placeholder(key)))
            }
            // Reject is enforced when the manifest is validated.
            UnknownDependencyPolicy::Skip | UnknownDependencyPolicy::Reject => {
                debug!(
                    "'{}' depends on undefined '{}', skipping",
                    module.key(),
                    key
                );
                None
            }
        }
    }
}

impl<M: DeclaresDependencies> DependencyProvider<M> for DeclaredDependencies<M> {
    fn dependencies(&self, module: &M) -> Vec<Arc<M>> {
        module
            .dependency_keys()
            .iter()
            .filter_map(|key| match self.modules.get(key) {
                Some(dependency) => Some(Arc::clone(dependency)),
                None => self.unknown(module, key),
            })
            .collect()
    }
}

impl<M: DeclaresDependencies> DependencyProvider<M> for &DeclaredDependencies<M> {
    fn dependencies(&self, module: &M) -> Vec<Arc<M>> {
        (**self).dependencies(module)
    }
}
