use crate::Node;

/// An ordered (subject, predicate, object) of [`Node`]s.
///
/// A triple is *concrete* iff none of its components is [`Node::Wildcard`].
/// Non-concrete triples only ever appear as find/check patterns, never as
/// members of a [`crate::BaseGraph`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The always-matches-everything pattern, used for `size`/`isEmpty`/
    /// `clear` style "does this graph allow reading anything at all" checks
    /// (spec.md §4.3's `canRead(Triple.ANY)`).
    pub fn any() -> Self {
        Self::new(Node::Wildcard, Node::Wildcard, Node::Wildcard)
    }

    pub fn is_concrete(&self) -> bool {
        !self.subject.is_wildcard() && !self.predicate.is_wildcard() && !self.object.is_wildcard()
    }

    /// `true` if every component of `self` that is not a wildcard matches
    /// the corresponding component of `other` (which must be concrete).
    pub fn matches(&self, other: &Triple) -> bool {
        debug_assert!(other.is_concrete());
        component_matches(&self.subject, &other.subject)
            && component_matches(&self.predicate, &other.predicate)
            && component_matches(&self.object, &other.object)
    }
}

fn component_matches(pattern: &Node, concrete: &Node) -> bool {
    pattern.is_wildcard() || pattern == concrete
}

impl From<(Node, Node, Node)> for Triple {
    fn from((subject, predicate, object): (Node, Node, Node)) -> Self {
        Self::new(subject, predicate, object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_vs_pattern() {
        let concrete = Triple::new(
            Node::iri("urn:s"),
            Node::iri("urn:p"),
            Node::iri("urn:o"),
        );
        assert!(concrete.is_concrete());

        let pattern = Triple::new(Node::Wildcard, Node::iri("urn:p"), Node::Wildcard);
        assert!(!pattern.is_concrete());
        assert!(pattern.matches(&concrete));

        let mismatch = Triple::new(Node::Wildcard, Node::iri("urn:other"), Node::Wildcard);
        assert!(!mismatch.matches(&concrete));
    }

    #[test]
    fn any_matches_everything() {
        let concrete = Triple::new(
            Node::iri("urn:s"),
            Node::iri("urn:p"),
            Node::Literal(crate::Literal::new("x")),
        );
        assert!(Triple::any().matches(&concrete));
    }
}
