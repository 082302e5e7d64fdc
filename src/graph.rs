use crate::{BaseEventManager, PrefixMapping, Triple};
use std::sync::Arc;

/// The base, unsecured RDF triple store the façade wraps (spec.md §1,
/// "Out of scope: ... the underlying triple store" — this trait is the
/// interface the core consumes, the implementation behind it is an
/// external collaborator).
///
/// A direct generalization of the teacher's `Graph` trait (`src/graph.rs`):
/// only `iri`, `iter`, `insert`, `remove` are required, everything else has
/// a default implementation in terms of them, so implementing this trait
/// for a new store is a small amount of work.
pub trait BaseGraph {
    /// The IRI identifying this graph, used as the `graph_iri` argument to
    /// every [`crate::SecurityEvaluator`] call.
    fn iri(&self) -> &str;

    /// All triples currently in the store, in no particular order.
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = Triple> + 'a>;

    /// Insert a triple. A graph is a set, so inserting an already-present
    /// triple has no effect.
    fn insert(&mut self, triple: Triple);

    /// Remove a triple. Removing an absent triple has no effect.
    fn remove(&mut self, triple: &Triple);

    fn get_prefix_mapping(&self) -> &PrefixMapping;

    fn get_prefix_mapping_mut(&mut self) -> &mut PrefixMapping;

    fn get_event_manager(&self) -> Arc<dyn BaseEventManager>;

    fn close(&mut self);

    fn is_closed(&self) -> bool;

    /// `true` iff `other_iri` names this graph or a graph this one is
    /// otherwise derived from/dependent on (spec.md §4.4 `dependsOn`).
    /// The default only recognizes self-dependence; composite stores (e.g.
    /// a union graph) should override this.
    fn depends_on(&self, other_iri: &str) -> bool {
        self.iri() == other_iri
    }

    fn len(&self) -> usize {
        self.iter().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, triple: &Triple) -> bool {
        self.iter().any(|t| &t == triple)
    }

    /// All triples matching `pattern` (which may contain
    /// [`crate::Node::Wildcard`] components).
    fn find<'a>(&'a self, pattern: Triple) -> Box<dyn Iterator<Item = Triple> + 'a> {
        Box::new(self.iter().filter(move |t| pattern.matches(t)))
    }

    fn is_valid_graph(&self) -> bool {
        self.iter()
            .all(|t| t.subject.is_valid_subject() && t.predicate.is_valid_predicate())
    }

    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }

    fn remove_all<'a, I: IntoIterator<Item = &'a Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.remove(triple);
        }
    }

    fn retain<F: FnMut(&Triple) -> bool>(&mut self, mut f: F) {
        let removed: Vec<Triple> = self.iter().filter(|t| !f(t)).collect();
        self.remove_all(removed.iter());
    }

    fn clear(&mut self) {
        self.retain(|_| false);
    }

    /// Remove all triples that aren't well-formed, non-generalized RDF
    /// (subject not a literal, predicate an IRI).
    fn sanitize(&mut self) {
        self.retain(|t| t.subject.is_valid_subject() && t.predicate.is_valid_predicate());
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Testbed;
    use crate::{BaseGraph, Node, Triple};

    #[test]
    fn default_len_contains_and_sanitize() {
        let mut testbed = Testbed::new();
        assert_eq!(3, testbed.graph.len());
        assert!(!testbed.graph.is_empty());
        assert!(testbed.graph.contains(&testbed.triple_ab()));

        // node_c is blank, so (node_c, predicate_c, node_a) is well-formed;
        // insert a literal-subject triple to exercise sanitize/is_valid_graph.
        let bogus = Triple::new(
            Node::Literal(crate::Literal::new("not a subject")),
            testbed.predicate_a.clone(),
            testbed.node_a.clone(),
        );
        testbed.graph.insert(bogus);
        assert!(!testbed.graph.is_valid_graph());
        testbed.graph.sanitize();
        assert!(testbed.graph.is_valid_graph());
        assert_eq!(3, testbed.graph.len());
    }

    #[test]
    fn find_respects_wildcards() {
        let testbed = Testbed::new();
        let pattern = Triple::new(Node::Wildcard, testbed.predicate_b.clone(), Node::Wildcard);
        let matches: Vec<Triple> = testbed.graph.find(pattern).collect();
        assert_eq!(vec![testbed.triple_bc()], matches);
    }

    #[test]
    fn clear_empties_the_graph() {
        let mut testbed = Testbed::new();
        testbed.graph.clear();
        assert!(testbed.graph.is_empty());
    }
}
