use crate::isomorphism;
use crate::{
    AccessDenied, BaseGraph, FilteredIterator, PermissionChecker, PrefixMapping, ReadFilter,
    SecurityEvaluator, Triple,
};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// The core façade (spec.md §4.4, component C4): wraps any [`BaseGraph`]
/// with an [`Arc<dyn SecurityEvaluator>`], the same single-field-newtype
/// shape the teacher uses for its own graph wrappers — generic over the
/// base store, one field for the wrapped value, one for the thing that
/// decides what the caller gets to see.
///
/// `SecuredGraph` owns its base graph directly rather than through
/// `Arc<RwLock<_>>`: every operation here is a single evaluator-gated call
/// into the base, not a multi-step transaction that needs to survive
/// concurrent mutation, so the extra indirection buys nothing. Callers who
/// need to share a `SecuredGraph` across threads wrap the whole façade
/// themselves (`Arc<Mutex<SecuredGraph<G>>>` and similar are ordinary
/// composition, not something this type needs to provide).
pub struct SecuredGraph<G: BaseGraph> {
    base: G,
    checker: PermissionChecker,
    prefix_facade: OnceLock<PrefixMapping>,
}

impl<G: BaseGraph> SecuredGraph<G> {
    pub fn new(base: G, evaluator: Arc<dyn SecurityEvaluator>) -> Self {
        let checker = PermissionChecker::new(evaluator, base.iri().to_string());
        Self {
            base,
            checker,
            prefix_facade: OnceLock::new(),
        }
    }

    pub fn iri(&self) -> &str {
        self.checker.graph_iri()
    }

    pub fn checker(&self) -> &PermissionChecker {
        &self.checker
    }

    pub fn base(&self) -> &G {
        &self.base
    }

    /// `true` iff `other_iri` is this graph or something it was built from
    /// (spec.md §4.4 `dependsOn`), delegated straight to the base graph:
    /// dependency structure isn't access-controlled information by itself.
    pub fn depends_on(&self, other_iri: &str) -> bool {
        self.base.depends_on(other_iri)
    }

    pub fn close(&mut self) {
        self.base.close();
    }

    pub fn is_closed(&self) -> bool {
        self.base.is_closed()
    }

    /// The façade's own [`PrefixMapping`] view, built once on first access
    /// and shared from then on (spec.md §6: prefix mappings are a plain
    /// delegated accessor, not access-controlled, but still worth not
    /// re-cloning on every call).
    pub fn prefix_mapping(&self) -> &PrefixMapping {
        self.prefix_facade
            .get_or_init(|| self.base.get_prefix_mapping().clone())
    }

    /// Add `triple`: requires graph-level Update and triple-level Create
    /// (spec.md §4.4 `add`).
    pub fn add(&mut self, triple: Triple) -> Result<(), AccessDenied> {
        self.checker.check_update_graph()?;
        self.checker.check_create(&triple)?;
        self.base.insert(triple);
        Ok(())
    }

    /// Delete `triple`: requires graph-level Update and triple-level Delete.
    /// Removing an already-absent triple is a no-op, same as the base
    /// graph, once permission is established.
    pub fn delete(&mut self, triple: &Triple) -> Result<(), AccessDenied> {
        self.checker.check_update_graph()?;
        self.checker.check_delete(triple)?;
        self.base.remove(triple);
        Ok(())
    }

    /// `contains(triple)`: checkRead(graph); if the principal may read
    /// anything in the graph, delegate to the base; otherwise a concrete
    /// triple is visible iff it survives the per-triple Read check (spec.md
    /// §4.4, P1).
    pub fn contains(&self, triple: &Triple) -> Result<bool, AccessDenied> {
        if !self.checker.require_read_graph()? {
            return Ok(false);
        }
        if self.checker.can_read_triple(&Triple::any()) {
            Ok(self.base.contains(triple))
        } else {
            Ok(self.checker.can_read_triple(triple) && self.base.contains(triple))
        }
    }

    /// `find(pattern)`: checkRead(graph); the result is wrapped in a
    /// [`FilteredIterator`] unless `canRead(Triple::any())` holds, in which
    /// case every matching base triple is necessarily readable and the
    /// optimization bypass applies (spec.md §4.3/§4.4).
    pub fn find<'a>(&'a self, pattern: Triple) -> Result<FilteredIterator<'a>, AccessDenied> {
        if !self.checker.require_read_graph()? {
            return Ok(FilteredIterator::pass_through(Box::new(std::iter::empty())));
        }
        let base_iter = self.base.find(pattern);
        if self.checker.can_read_triple(&Triple::any()) {
            Ok(FilteredIterator::pass_through(base_iter))
        } else {
            let checker = &self.checker;
            let filter: Arc<dyn ReadFilter + 'a> =
                Arc::new(move |t: &Triple| checker.can_read_triple(t));
            Ok(FilteredIterator::new(base_iter, filter))
        }
    }

    /// `size()`: the count of readable triples (spec.md §4.4, scenario 1/2,
    /// P1). A graph-level Read denial in soft-read mode yields `0` rather
    /// than raising; in hard-read mode it raises.
    pub fn size(&self) -> Result<usize, AccessDenied> {
        if !self.checker.require_read_graph()? {
            return Ok(0);
        }
        if self.checker.can_read_triple(&Triple::any()) {
            Ok(self.base.len())
        } else {
            Ok(self
                .base
                .iter()
                .filter(|t| self.checker.can_read_triple(t))
                .count())
        }
    }

    /// `isEmpty()`: soft-read-denied or genuinely empty both answer `true`
    /// (spec.md §4.4); a hard-read denial still raises.
    pub fn is_empty(&self) -> Result<bool, AccessDenied> {
        if !self.checker.require_read_graph()? {
            return Ok(true);
        }
        Ok(self.size()? == 0)
    }

    /// `clear()`: checkUpdate; if `canDelete(ANY)` delegate straight to
    /// `base.clear()`; otherwise every base triple is `checkDelete`-ed
    /// *before* any is removed, so a denial partway through leaves `base`
    /// untouched (spec.md §4.4 `clear`, §5 failure atomicity, P3).
    pub fn clear(&mut self) -> Result<(), AccessDenied> {
        self.checker.check_update_graph()?;
        if self.checker.can_delete_triple(&Triple::any()) {
            self.base.clear();
            return Ok(());
        }
        let candidates: Vec<Triple> = self.base.iter().collect();
        for triple in &candidates {
            self.checker.check_delete(triple)?;
        }
        self.base.clear();
        Ok(())
    }

    /// Insert `triple` without a per-triple check, for callers that already
    /// established permission against a pattern covering it (spec.md §4.6:
    /// a list/container cell's concrete subject is a "Future" resource whose
    /// identity is irrelevant to the Create decision already made against
    /// the wildcard pattern).
    pub(crate) fn insert_unchecked(&mut self, triple: Triple) {
        self.base.insert(triple);
    }

    /// Symmetric to [`Self::insert_unchecked`], for deletes already
    /// permission-checked by the caller.
    pub(crate) fn delete_unchecked(&mut self, triple: &Triple) {
        self.base.remove(triple);
    }

    /// `remove(pattern)`: checkUpdate; a concrete pattern is a single
    /// `checkDelete`+remove; a pattern containing wildcards is expanded
    /// against the base first and every match is `checkDelete`-ed before
    /// anything is actually removed, so a denial partway through leaves
    /// `base` untouched (spec.md §4.4 `remove`, §5 failure atomicity).
    pub fn remove(&mut self, pattern: Triple) -> Result<(), AccessDenied> {
        self.checker.check_update_graph()?;
        if pattern.is_concrete() {
            self.checker.check_delete(&pattern)?;
            self.base.remove(&pattern);
            return Ok(());
        }
        let matches: Vec<Triple> = self.base.find(pattern).collect();
        for triple in &matches {
            self.checker.check_delete(triple)?;
        }
        for triple in &matches {
            self.base.remove(triple);
        }
        Ok(())
    }

    /// `isIsomorphicWith(other)`: when the principal may read everything,
    /// delegate straight to the base comparison; otherwise compare the
    /// *readable projections* of both sides, per spec.md §9's resolution of
    /// the isomorphism Open Question — never raise on account of what
    /// `other` contains, and report `false` outright on a projected-size
    /// mismatch (P6: isomorphism never leaks more than "these two readable
    /// views match" or "they don't").
    pub fn is_isomorphic_with<H: BaseGraph>(&self, other: &H) -> Result<bool, AccessDenied> {
        if !self.checker.require_read_graph()? {
            return Ok(false);
        }
        if self.checker.can_read_triple(&Triple::any()) {
            if self.base.len() != other.len() {
                return Ok(false);
            }
            let self_set: HashSet<Triple> = self.base.iter().collect();
            let other_set: HashSet<Triple> = other.iter().collect();
            Ok(isomorphism::is_isomorphic(&self_set, &other_set))
        } else {
            let self_set: HashSet<Triple> = self
                .base
                .iter()
                .filter(|t| self.checker.can_read_triple(t))
                .collect();
            let other_set: HashSet<Triple> = other
                .iter()
                .filter(|t| self.checker.can_read_triple(t))
                .collect();
            if self_set.len() != other_set.len() {
                return Ok(false);
            }
            Ok(isomorphism::is_isomorphic(&self_set, &other_set))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticEvaluator, Testbed};
    use crate::{Action, HashGraph, Principal};

    fn secured(testbed: &Testbed, evaluator: StaticEvaluator) -> SecuredGraph<HashGraph> {
        let mut base = HashGraph::new(crate::testing::GRAPH_IRI);
        for triple in testbed.graph.iter() {
            base.insert(triple);
        }
        SecuredGraph::new(base, Arc::new(evaluator))
    }

    #[test]
    fn add_requires_update_and_create() {
        let testbed = Testbed::new();
        let evaluator = StaticEvaluator::new(Principal::from("alice")).allow_all_but_create();
        let mut graph = secured(&testbed, evaluator);

        let new_triple = Triple::new(
            testbed.node_a.clone(),
            testbed.predicate_b.clone(),
            testbed.node_c.clone(),
        );
        let err = graph.add(new_triple).unwrap_err();
        assert!(matches!(err, AccessDenied::AddDenied { .. }));
    }

    #[test]
    fn size_counts_only_readable_triples() {
        let testbed = Testbed::new();
        let hidden = testbed.triple_bc();
        let evaluator = StaticEvaluator::new(Principal::from("alice"))
            .allow_all()
            .deny_read_of(hidden);
        let graph = secured(&testbed, evaluator);

        assert_eq!(2, graph.size().unwrap());
    }

    #[test]
    fn hard_read_denied_graph_raises_on_size() {
        let testbed = Testbed::new();
        let evaluator = StaticEvaluator::new(Principal::from("alice"))
            .deny_graph_action(Action::Read)
            .with_hard_read(true);
        let graph = secured(&testbed, evaluator);

        assert!(graph.size().is_err());
        assert!(graph.is_empty().is_err());
    }

    #[test]
    fn soft_read_denied_graph_behaves_empty() {
        let testbed = Testbed::new();
        let evaluator = StaticEvaluator::new(Principal::from("alice"))
            .deny_graph_action(Action::Read)
            .with_hard_read(false);
        let graph = secured(&testbed, evaluator);

        assert_eq!(0, graph.size().unwrap());
        assert!(graph.is_empty().unwrap());
        assert!(!graph.contains(&testbed.triple_ab()).unwrap());
    }

    #[test]
    fn find_filters_to_readable_triples_only() {
        let testbed = Testbed::new();
        let hidden = testbed.triple_bc();
        let evaluator = StaticEvaluator::new(Principal::from("alice"))
            .allow_all()
            .deny_read_of(hidden.clone());
        let graph = secured(&testbed, evaluator);

        let found: Vec<Triple> = graph.find(Triple::any()).unwrap().collect();
        assert_eq!(2, found.len());
        assert!(!found.contains(&hidden));
    }

    #[test]
    fn clear_is_fail_closed_per_triple() {
        let testbed = Testbed::new();
        let protected = testbed.triple_ca();
        let evaluator = StaticEvaluator::new(Principal::from("alice"))
            .allow_all()
            .deny_action_of(Action::Delete, protected.clone());
        let mut graph = secured(&testbed, evaluator);

        assert!(graph.clear().is_err());
        // fail-closed (P3): a denial anywhere in the precheck leaves every
        // triple in place, not just the protected one.
        assert!(graph.contains(&protected).unwrap());
        assert!(graph.contains(&testbed.triple_ab()).unwrap());
    }

    #[test]
    fn remove_with_pattern_is_fail_closed() {
        let testbed = Testbed::new();
        let protected = testbed.triple_ca();
        let evaluator = StaticEvaluator::new(Principal::from("alice"))
            .allow_all()
            .deny_action_of(Action::Delete, protected.clone());
        let mut graph = secured(&testbed, evaluator);

        let pattern = Triple::new(
            crate::Node::Wildcard,
            testbed.predicate_c.clone(),
            crate::Node::Wildcard,
        );
        assert!(graph.remove(pattern).is_err());
        assert!(graph.contains(&protected).unwrap());
    }

    #[test]
    fn isomorphism_compares_readable_projections() {
        let testbed = Testbed::new();
        let hidden = testbed.triple_bc();
        let evaluator = StaticEvaluator::new(Principal::from("alice"))
            .allow_all()
            .deny_read_of(hidden.clone());
        let graph = secured(&testbed, evaluator);

        let mut other = HashGraph::new("urn:other");
        other.insert(testbed.triple_ab());
        other.insert(testbed.triple_ca());
        assert!(graph.is_isomorphic_with(&other).unwrap());

        other.insert(hidden);
        // other now has a triple the principal can't see; sizes of the
        // readable projections still match (the hidden triple isn't
        // projected from `other` either, since the same checker filters
        // both sides), so comparison is still true.
        assert!(graph.is_isomorphic_with(&other).unwrap());
    }
}
