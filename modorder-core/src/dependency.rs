// modorder-core/src/dependency.rs
//! Dependency-aware traversal.
//!
//! [`DependencyModuleIterator`] walks the same list as [`ModuleIterator`], but
//! at every step it serves the deepest not yet served dependency of the module
//! under the cursor instead of the module itself. Dependencies are asked for
//! lazily, one module at a time, through a [`DependencyProvider`].
//!
//! Every module is served exactly once per pass, and a module is only served
//! after the dependencies reachable from it without going around a cycle.
//! Cycles are not errors: a dependency that is already on the chain being
//! resolved counts as satisfied. With `A -> B -> A` and `A` reached first, `B`
//! is served before `A`.
//!
//! The module list and whatever the provider reads from must not change during
//! a pass. Nothing checks for this; the served set simply stops matching the
//! list.
use std::collections::{HashMap, HashSet};
use std::iter::FusedIterator;
use std::sync::Arc;

use modorder_common::Module;
use tracing::{debug, trace};

use crate::iterator::ModuleIterator;
use crate::provider::DependencyProvider;

/// Stateful, single-pass traversal that serves dependencies first.
///
/// Drive it with [`rewind`](Self::rewind), then [`valid`](Self::valid) /
/// [`current`](Self::current) / [`advance`](Self::advance) until `valid`
/// returns false, or use [`pass`](Self::pass) for a std iterator. Before the
/// first `rewind` there is no current module.
pub struct DependencyModuleIterator<M: ?Sized, P> {
    inner: ModuleIterator<M>,
    provider: P,
    served: HashMap<String, Arc<M>>,
    current: Option<Arc<M>>,
}

impl<M, P> DependencyModuleIterator<M, P>
where
    M: Module + ?Sized,
    P: DependencyProvider<M>,
{
    pub fn new(modules: Vec<Arc<M>>, provider: P) -> Self {
        Self {
            inner: ModuleIterator::new(modules),
            provider,
            served: HashMap::new(),
            current: None,
        }
    }

    /// Replaces the module list. The pass in progress, if any, is discarded.
    pub fn set_modules<I>(&mut self, modules: I)
    where
        I: IntoIterator<Item = Arc<M>>,
    {
        self.inner.set_modules(modules);
        self.served.clear();
        self.current = None;
    }

    pub fn modules(&self) -> &[Arc<M>] {
        self.inner.modules()
    }

    pub fn module_by_key(&self, key: &str) -> Option<&Arc<M>> {
        self.inner.module_by_key(key)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_served(&self, key: &str) -> bool {
        self.served.contains_key(key)
    }

    /// Modules served so far in this pass, in no particular order.
    pub fn served(&self) -> impl Iterator<Item = &Arc<M>> {
        self.served.values()
    }

    pub fn served_len(&self) -> usize {
        self.served.len()
    }

    /// Starts a new pass and moves to the first module to serve.
    pub fn rewind(&mut self) {
        self.inner.rewind();
        self.served.clear();
        self.current = None;
        self.advance();
    }

    pub fn current(&self) -> Option<&Arc<M>> {
        self.current.as_ref()
    }

    pub fn key(&self) -> Option<&str> {
        self.current().map(|m| m.key())
    }

    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    /// Marks the current module as served and moves to the next one.
    pub fn advance(&mut self) {
        if let Some(previous) = self.current.take() {
            trace!("Served '{}'", previous.key());
            self.served.insert(previous.key().to_string(), previous);
        }

        // Modules pulled forward as dependencies are skipped when the cursor reaches them.
        while let Some(raw) = self.inner.current() {
            if !self.is_served(raw.key()) {
                break;
            }
            trace!("Skipping already served '{}'", raw.key());
            self.inner.advance();
        }

        self.current = self
            .inner
            .current()
            .cloned()
            .map(|raw| self.deepest_unserved_dependency(raw));
    }

    /// Starts a new pass and returns it as a std iterator.
    pub fn pass(&mut self) -> Pass<'_, M, P> {
        self.rewind();
        Pass { traversal: self }
    }

    fn unserved_dependencies(&self, module: &M) -> impl Iterator<Item = Arc<M>> + '_ {
        self.provider
            .dependencies(module)
            .into_iter()
            .filter(move |dep| !self.is_served(dep.key()))
    }

    /// Follows the first unserved dependency, depth first, until a module with
    /// no unserved dependencies is reached. `ignore` holds every key on the
    /// chain so far, so a dependency leading back into the chain is passed over.
    fn deepest_unserved_dependency(&self, module: Arc<M>) -> Arc<M> {
        let mut ignore: HashSet<String> = HashSet::new();
        let mut candidate = module;

        loop {
            ignore.insert(candidate.key().to_string());

            let next = self
                .unserved_dependencies(&candidate)
                .find(|dep| !ignore.contains(dep.key()));

            match next {
                Some(dependency) => {
                    debug!(
                        "'{}' needs '{}' first",
                        candidate.key(),
                        dependency.key()
                    );
                    candidate = dependency;
                }
                None => {
                    if ignore.len() > 1 {
                        debug!(
                            "Resolved '{}' after a chain of {} modules",
                            candidate.key(),
                            ignore.len()
                        );
                    }
                    return candidate;
                }
            }
        }
    }
}

impl<M, P> std::fmt::Debug for DependencyModuleIterator<M, P>
where
    M: Module + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyModuleIterator")
            .field("modules", &self.inner.len())
            .field("index", &self.inner.index())
            .field("served", &self.served.len())
            .field("current", &self.current.as_ref().map(|m| m.key()))
            .finish()
    }
}

/// One pass of a [`DependencyModuleIterator`] as a std iterator.
pub struct Pass<'a, M: ?Sized, P> {
    traversal: &'a mut DependencyModuleIterator<M, P>,
}

impl<M, P> Iterator for Pass<'_, M, P>
where
    M: Module + ?Sized,
    P: DependencyProvider<M>,
{
    type Item = Arc<M>;

    fn next(&mut self) -> Option<Arc<M>> {
        let module = self.traversal.current().cloned()?;
        self.traversal.advance();
        Some(module)
    }
}

impl<M, P> FusedIterator for Pass<'_, M, P>
where
    M: Module + ?Sized,
    P: DependencyProvider<M>,
{
}

/// Runs one full pass over `modules` and collects the load order.
pub fn load_order<M, P>(modules: Vec<Arc<M>>, provider: P) -> Vec<Arc<M>>
where
    M: Module + ?Sized,
    P: DependencyProvider<M>,
{
    let mut traversal = DependencyModuleIterator::new(modules, provider);
    let order: Vec<Arc<M>> = traversal.pass().collect();
    debug!(
        "Load order resolved for {} modules ({} served)",
        traversal.modules().len(),
        order.len()
    );
    order
}

#[cfg(test)]
mod tests {
    use modorder_common::ModuleSpec;

    use super::*;
    use crate::provider::DeclaredDependencies;

    type Traversal = DependencyModuleIterator<ModuleSpec, DeclaredDependencies<ModuleSpec>>;

    fn spec(key: &str, deps: &[&str]) -> Arc<ModuleSpec> {
        Arc::new(ModuleSpec::with_dependencies(key, deps.iter().copied()))
    }

    fn traversal(modules: Vec<Arc<ModuleSpec>>) -> Traversal {
        let provider = DeclaredDependencies::new(&modules);
        DependencyModuleIterator::new(modules, provider)
    }

    /// Drives the five-operation protocol by hand.
    fn drain(t: &mut Traversal) -> Vec<String> {
        let mut keys = Vec::new();
        t.rewind();
        while t.valid() {
            keys.push(t.key().unwrap().to_string());
            t.advance();
        }
        keys
    }

    #[test]
    fn nothing_is_current_before_rewind() {
        let t = traversal(vec![spec("a", &[])]);
        assert!(!t.valid());
        assert!(t.current().is_none());
        assert!(t.key().is_none());
    }

    #[test]
    fn rewind_primes_first_module() {
        let mut t = traversal(vec![spec("a", &["b"]), spec("b", &[])]);
        t.rewind();
        assert_eq!(t.key(), Some("b"));
        assert_eq!(t.served_len(), 0);
    }

    #[test]
    fn dependency_is_pulled_forward_and_skipped_later() {
        let mut t = traversal(vec![spec("m1", &["m3"]), spec("m2", &[]), spec("m3", &[])]);
        assert_eq!(drain(&mut t), ["m3", "m1", "m2"]);
        assert_eq!(t.served_len(), 3);
    }

    #[test]
    fn advance_marks_previous_as_served() {
        let mut t = traversal(vec![spec("a", &[]), spec("b", &[])]);
        t.rewind();
        assert!(!t.is_served("a"));
        t.advance();
        assert!(t.is_served("a"));
        assert!(!t.is_served("b"));
        assert_eq!(t.key(), Some("b"));
        t.advance();
        assert!(t.is_served("b"));
        assert!(!t.valid());
    }

    #[test]
    fn advancing_when_exhausted_is_harmless() {
        let mut t = traversal(vec![spec("a", &[])]);
        t.rewind();
        t.advance();
        t.advance();
        t.advance();
        assert!(!t.valid());
        assert_eq!(t.served_len(), 1);
    }

    #[test]
    fn mutual_dependency_serves_second_first() {
        let mut t = traversal(vec![spec("m1", &["m2"]), spec("m2", &["m1"])]);
        assert_eq!(drain(&mut t), ["m2", "m1"]);
    }

    #[test]
    fn self_dependency_is_served_once() {
        let mut t = traversal(vec![spec("a", &["a"]), spec("b", &["a", "b"])]);
        assert_eq!(drain(&mut t), ["a", "b"]);
    }

    #[test]
    fn follows_leftmost_dependency_depth_first() {
        let mut t = traversal(vec![
            spec("a", &["b", "c"]),
            spec("b", &["d"]),
            spec("c", &[]),
            spec("d", &[]),
        ]);
        assert_eq!(drain(&mut t), ["d", "b", "c", "a"]);
    }

    #[test]
    fn longer_cycle_is_broken_at_the_chain_end() {
        // a -> b -> c -> a
        let mut t = traversal(vec![spec("a", &["b"]), spec("b", &["c"]), spec("c", &["a"])]);
        assert_eq!(drain(&mut t), ["c", "b", "a"]);
    }

    #[test]
    fn rewind_mid_pass_restarts_cleanly() {
        let mut t = traversal(vec![spec("a", &["c"]), spec("b", &[]), spec("c", &[])]);
        let full = drain(&mut t);

        t.rewind();
        t.advance();
        assert!(t.served_len() > 0);

        assert_eq!(drain(&mut t), full);
    }

    #[test]
    fn set_modules_discards_the_pass() {
        let mut t = traversal(vec![spec("a", &[]), spec("b", &[])]);
        t.rewind();
        t.advance();
        t.set_modules(vec![Arc::new(ModuleSpec::new("x"))]);
        assert!(!t.valid());
        assert_eq!(t.served_len(), 0);
        assert!(t.module_by_key("a").is_none());
        // The provider still resolves against the list it was built from.
        assert_eq!(drain(&mut t), ["x"]);
    }

    #[test]
    fn pass_matches_manual_protocol() {
        let mut t = traversal(vec![spec("a", &["c"]), spec("b", &["a"]), spec("c", &[])]);
        let manual = drain(&mut t);
        let via_pass: Vec<String> = t.pass().map(|m| m.key.clone()).collect();
        assert_eq!(manual, via_pass);
        assert_eq!(via_pass, ["c", "a", "b"]);
    }

    #[test]
    fn pass_is_fused() {
        let mut t = traversal(vec![spec("a", &[])]);
        let mut pass = t.pass();
        assert!(pass.next().is_some());
        assert!(pass.next().is_none());
        assert!(pass.next().is_none());
    }

    #[test]
    fn load_order_collects_a_full_pass() {
        let modules = vec![
            Arc::new(ModuleSpec::with_dependencies("app", ["db"])),
            Arc::new(ModuleSpec::new("db")),
        ];
        let provider = DeclaredDependencies::new(&modules);
        let order = load_order(modules, provider);
        let keys: Vec<&str> = order.iter().map(|m| m.key()).collect();
        assert_eq!(keys, ["db", "app"]);
    }

    #[test]
    fn debug_output_summarizes_state() {
        let mut t = traversal(vec![spec("a", &[])]);
        t.rewind();
        let rendered = format!("{t:?}");
        assert!(rendered.contains("current: Some(\"a\")"));
    }
}
