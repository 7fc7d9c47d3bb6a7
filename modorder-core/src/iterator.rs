// modorder-core/src/iterator.rs
//! Plain forward traversal over an ordered module list.
use std::sync::Arc;

use modorder_common::Module;

use crate::module_map::ModuleMap;

/// Walks a module list strictly in list order, one module per step.
///
/// The cursor ranges over `0..=len`; `len` means the traversal is exhausted.
/// Nothing here fails: out-of-range positions and unknown keys read as `None`.
#[derive(Debug)]
pub struct ModuleIterator<M: ?Sized> {
    modules: Vec<Arc<M>>,
    map: ModuleMap<M>,
    index: usize,
}

impl<M: Module + ?Sized> ModuleIterator<M> {
    pub fn new(modules: Vec<Arc<M>>) -> Self {
        Self {
            modules,
            map: ModuleMap::new(),
            index: 0,
        }
    }

    /// Replaces the module list and resets the cursor.
    pub fn set_modules<I>(&mut self, modules: I)
    where
        I: IntoIterator<Item = Arc<M>>,
    {
        self.modules = modules.into_iter().collect();
        self.map.invalidate();
        self.index = 0;
    }

    pub fn modules(&self) -> &[Arc<M>] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_by_key(&self, key: &str) -> Option<&Arc<M>> {
        self.map.get(&self.modules, key)
    }

    pub fn module_at(&self, index: usize) -> Option<&Arc<M>> {
        self.modules.get(index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rewind(&mut self) {
        self.index = 0;
    }

    pub fn current(&self) -> Option<&Arc<M>> {
        self.module_at(self.index)
    }

    pub fn key(&self) -> Option<&str> {
        self.current().map(|m| m.key())
    }

    pub fn advance(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    pub fn valid(&self) -> bool {
        self.current().is_some()
    }
}

impl<M: Module + ?Sized> Default for ModuleIterator<M> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<M: Module + ?Sized> FromIterator<Arc<M>> for ModuleIterator<M> {
    fn from_iter<I: IntoIterator<Item = Arc<M>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use modorder_common::ModuleSpec;

    use super::*;

    fn iterator(keys: &[&str]) -> ModuleIterator<ModuleSpec> {
        keys.iter().map(|k| Arc::new(ModuleSpec::new(*k))).collect()
    }

    fn drain(it: &mut ModuleIterator<ModuleSpec>) -> Vec<String> {
        let mut keys = Vec::new();
        it.rewind();
        while it.valid() {
            keys.push(it.key().unwrap().to_string());
            it.advance();
        }
        keys
    }

    #[test]
    fn walks_in_list_order() {
        let mut it = iterator(&["c", "a", "b"]);
        assert_eq!(drain(&mut it), ["c", "a", "b"]);
        assert_eq!(it.index(), 3);
    }

    #[test]
    fn empty_list_is_immediately_exhausted() {
        let mut it = ModuleIterator::<ModuleSpec>::default();
        it.rewind();
        assert!(!it.valid());
        assert!(it.current().is_none());
        assert!(it.key().is_none());
        assert!(it.is_empty());
    }

    #[test]
    fn advancing_past_the_end_stays_invalid() {
        let mut it = iterator(&["a"]);
        it.advance();
        it.advance();
        it.advance();
        assert!(!it.valid());
        assert_eq!(it.index(), 3);
        it.rewind();
        assert_eq!(it.key(), Some("a"));
    }

    #[test]
    fn lookup_by_key() {
        let it = iterator(&["a", "b"]);
        assert_eq!(it.module_by_key("b").map(|m| m.key.as_str()), Some("b"));
        assert!(it.module_by_key("z").is_none());
        assert_eq!(it.module_at(0).map(|m| m.key.as_str()), Some("a"));
        assert!(it.module_at(2).is_none());
    }

    #[test]
    fn set_modules_replaces_list_and_lookup() {
        let mut it = iterator(&["a", "b"]);
        it.advance();
        assert!(it.module_by_key("a").is_some());

        it.set_modules(vec![Arc::new(ModuleSpec::new("x"))]);
        assert_eq!(it.index(), 0);
        assert_eq!(it.len(), 1);
        assert!(it.module_by_key("a").is_none());
        assert!(it.module_by_key("x").is_some());
        assert_eq!(drain(&mut it), ["x"]);
    }

    #[test]
    fn works_with_trait_objects() {
        let modules: Vec<Arc<dyn Module>> = vec![
            Arc::new(ModuleSpec::new("a")),
            Arc::new(ModuleSpec::new("b")),
        ];
        let it = ModuleIterator::new(modules);
        assert_eq!(it.module_by_key("b").map(|m| m.key()), Some("b"));
    }
}
