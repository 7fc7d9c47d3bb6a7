// modorder-core/src/module_map.rs
use std::collections::HashMap;
use std::sync::Arc;

use modorder_common::Module;
use once_cell::unsync::OnceCell;
use tracing::{debug, warn};

/// Key -> module lookup derived from a module list.
///
/// The map is built on first read and dropped by [`ModuleMap::invalidate`];
/// the owner must invalidate it whenever the list it was built from changes.
/// When two modules share a key, the later one shadows the earlier one.
#[derive(Debug)]
pub struct ModuleMap<M: ?Sized> {
    map: OnceCell<HashMap<String, Arc<M>>>,
}

impl<M: Module + ?Sized> ModuleMap<M> {
    pub fn new() -> Self {
        Self {
            map: OnceCell::new(),
        }
    }

    /// Returns the map for `modules`, building it if it is not cached.
    ///
    /// `modules` is only read when the map is built. Once built, the cached
    /// map is returned whatever slice is passed, so callers must always pass
    /// the list the map was built from and [`invalidate`](Self::invalidate)
    /// when that list is replaced.
    pub fn get_or_build(&self, modules: &[Arc<M>]) -> &HashMap<String, Arc<M>> {
        self.map.get_or_init(|| Self::build(modules))
    }

    /// Looks `key` up in the map for `modules`. Same precondition as
    /// [`get_or_build`](Self::get_or_build).
    pub fn get<'a>(&'a self, modules: &[Arc<M>], key: &str) -> Option<&'a Arc<M>> {
        self.get_or_build(modules).get(key)
    }

    pub fn invalidate(&mut self) {
        if self.map.take().is_some() {
            debug!("Module map invalidated");
        }
    }

    pub fn is_built(&self) -> bool {
        self.map.get().is_some()
    }

    fn build(modules: &[Arc<M>]) -> HashMap<String, Arc<M>> {
        let mut map = HashMap::with_capacity(modules.len());
        for module in modules {
            if map
                .insert(module.key().to_string(), Arc::clone(module))
                .is_some()
            {
                warn!(
                    "Module key '{}' appears more than once; the later module shadows the earlier one",
                    module.key()
                );
            }
        }
        debug!("Built module map with {} keys", map.len());
        map
    }
}

impl<M: Module + ?Sized> Default for ModuleMap<M> {
    fn default() -> Self {
        Self::new()
    }
}
