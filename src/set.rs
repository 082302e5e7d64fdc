use crate::{BaseGraph, Triple};

/// Free set-algebra functions over any two [`BaseGraph`]s, generalized from
/// the teacher's `set.rs` (same shape: `difference`/`symmetric_difference`/
/// `intersection`/`union`/`is_subset`/`is_superset`/`is_disjoint`, each a
/// thin lazy composition of `iter`/`contains`).
///
/// [`crate::SecuredModel`]'s `union`/`intersection`/`difference` operations
/// (spec.md §4.5) are built directly on these, applied to the readable
/// projection of each side rather than the raw base graphs.
pub fn difference<'a, G, H>(lhs: &'a G, rhs: &'a H) -> impl Iterator<Item = Triple> + 'a
where
    G: BaseGraph,
    H: BaseGraph,
{
    lhs.iter().filter(move |t| !rhs.contains(t))
}

pub fn symmetric_difference<'a, G, H>(lhs: &'a G, rhs: &'a H) -> impl Iterator<Item = Triple> + 'a
where
    G: BaseGraph,
    H: BaseGraph,
{
    difference(lhs, rhs).chain(difference(rhs, lhs))
}

pub fn intersection<'a, G, H>(lhs: &'a G, rhs: &'a H) -> impl Iterator<Item = Triple> + 'a
where
    G: BaseGraph,
    H: BaseGraph,
{
    lhs.iter().filter(move |t| rhs.contains(t))
}

pub fn union<'a, G, H>(lhs: &'a G, rhs: &'a H) -> impl Iterator<Item = Triple> + 'a
where
    G: BaseGraph,
    H: BaseGraph,
{
    lhs.iter().chain(difference(rhs, lhs))
}

pub fn is_subset<G, H>(lhs: &G, rhs: &H) -> bool
where
    G: BaseGraph,
    H: BaseGraph,
{
    lhs.iter().all(|t| rhs.contains(&t))
}

pub fn is_superset<G, H>(lhs: &G, rhs: &H) -> bool
where
    G: BaseGraph,
    H: BaseGraph,
{
    is_subset(rhs, lhs)
}

pub fn is_disjoint<G, H>(lhs: &G, rhs: &H) -> bool
where
    G: BaseGraph,
    H: BaseGraph,
{
    intersection(lhs, rhs).next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Testbed;
    use crate::HashGraph;

    fn other_graph(testbed: &Testbed) -> HashGraph {
        let mut other = HashGraph::new("urn:g2");
        other.insert(crate::Triple::new(
            testbed.node_a.clone(),
            testbed.predicate_a.clone(),
            testbed.node_b.clone(),
        ));
        other.insert(crate::Triple::new(
            testbed.node_b.clone(),
            testbed.predicate_a.clone(),
            testbed.node_a.clone(),
        ));
        other
    }

    #[test]
    fn difference_drops_shared_triples() {
        let testbed = Testbed::new();
        let other = other_graph(&testbed);

        let diff: Vec<_> = difference(&testbed.graph, &other).collect();
        assert_eq!(2, diff.len());
        assert!(diff.contains(&testbed.triple_bc()));
        assert!(diff.contains(&testbed.triple_ca()));
    }

    #[test]
    fn union_is_deduplicated() {
        let testbed = Testbed::new();
        let other = other_graph(&testbed);

        let union: Vec<_> = union(&testbed.graph, &other).collect();
        assert_eq!(4, union.len());
    }

    #[test]
    fn subset_superset_disjoint() {
        let testbed = Testbed::new();
        let mut other = other_graph(&testbed);

        assert!(is_subset(&testbed.graph, &testbed.graph));
        assert!(!is_subset(&other, &testbed.graph));
        assert!(!is_disjoint(&testbed.graph, &other));

        other.remove(&crate::Triple::new(
            testbed.node_a.clone(),
            testbed.predicate_a.clone(),
            testbed.node_b.clone(),
        ));
        assert!(is_subset(&other, &testbed.graph));
        assert!(is_superset(&testbed.graph, &other));
    }
}
