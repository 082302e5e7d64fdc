use crate::Node;

/// The RDF vocabulary namespace used by reification, lists, and containers
/// (spec.md §3 "Reified Statement", §4.6).
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

fn term(local: &str) -> Node {
    Node::iri(format!("{RDF}{local}"))
}

pub fn type_() -> Node {
    term("type")
}

pub fn statement() -> Node {
    term("Statement")
}

pub fn subject() -> Node {
    term("subject")
}

pub fn predicate() -> Node {
    term("predicate")
}

pub fn object() -> Node {
    term("object")
}

pub fn first() -> Node {
    term("first")
}

pub fn rest() -> Node {
    term("rest")
}

pub fn nil() -> Node {
    term("nil")
}

pub fn bag() -> Node {
    term("Bag")
}

pub fn alt() -> Node {
    term("Alt")
}

pub fn seq() -> Node {
    term("Seq")
}

/// The container membership property `rdf:_i` for 1-based index `i`
/// (spec.md §4.6 "Add of element e at index i creates (container, rdf:_i, e)").
pub fn li(index: usize) -> Node {
    term(&format!("_{index}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn li_indices_are_distinct() {
        assert_ne!(li(1), li(2));
        assert_eq!(li(1), li(1));
    }

    #[test]
    fn terms_are_in_the_rdf_namespace() {
        assert_eq!(Some(format!("{RDF}type").as_str()), type_().referent());
        assert_eq!(Some(format!("{RDF}nil").as_str()), nil().referent());
    }
}
