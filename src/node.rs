use std::rc::Rc;

/// A literal value: a lexical form plus an optional datatype IRI and an
/// optional language tag.
///
/// Per RDF, a literal has either a datatype or a language tag, never both in
/// a meaningful way for the façade's purposes; this type does not enforce
/// that exclusivity, it only stores what the base graph gave it.
#[derive(Clone, Debug, Eq)]
pub struct Literal {
    lexical: Rc<str>,
    datatype: Option<Rc<str>>,
    language: Option<Rc<str>>,
}

impl Literal {
    pub fn new(lexical: impl Into<Rc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn with_datatype(lexical: impl Into<Rc<str>>, datatype: impl Into<Rc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub fn with_language(lexical: impl Into<Rc<str>>, language: impl Into<Rc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// `true` if `tag` (case-insensitive, `""` meaning "no language tag")
    /// matches this literal's language.
    pub fn matches_language(&self, tag: &str) -> bool {
        match (&self.language, tag) {
            (None, "") => true,
            (None, _) => false,
            (Some(_), "") => false,
            (Some(lang), tag) => lang.eq_ignore_ascii_case(tag),
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.lexical == other.lexical
            && self.datatype == other.datatype
            && match (&self.language, &other.language) {
                (None, None) => true,
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                _ => false,
            }
    }
}

impl std::hash::Hash for Literal {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lexical.hash(state);
        self.datatype.hash(state);
        if let Some(language) = &self.language {
            language.to_ascii_lowercase().hash(state);
        }
    }
}

/// A node in an RDF triple: an IRI, a blank node, a literal, or a wildcard
/// that matches any concrete node in a find pattern.
///
/// Blank-node identity is its label, following the teacher's `Rc<str>`
/// interning for cheap cloning; unlike the teacher's model, blank nodes here
/// compare by label rather than by pointer identity, because the façade must
/// be able to re-derive the same pattern (e.g. for a reified statement's
/// constituent triples) across independent calls.
#[derive(Clone, Debug, Eq)]
pub enum Node {
    Iri(Rc<str>),
    Blank(Rc<str>),
    Literal(Literal),
    Wildcard,
}

impl Node {
    pub fn iri(referent: impl Into<Rc<str>>) -> Self {
        Self::Iri(referent.into())
    }

    pub fn blank(label: impl Into<Rc<str>>) -> Self {
        Self::Blank(label.into())
    }

    pub fn literal(literal: Literal) -> Self {
        Self::Literal(literal)
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// The referent string of an IRI or blank node, if any.
    pub fn referent(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Blank(label) => Some(label),
            Self::Literal(_) | Self::Wildcard => None,
        }
    }

    /// `true` iff this node may stand as a valid RDF subject (not a literal,
    /// not a wildcard).
    pub fn is_valid_subject(&self) -> bool {
        matches!(self, Self::Iri(_) | Self::Blank(_))
    }

    /// `true` iff this node may stand as a valid RDF predicate (an IRI).
    pub fn is_valid_predicate(&self) -> bool {
        matches!(self, Self::Iri(_))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Iri(a), Self::Iri(b)) => a == b,
            (Self::Blank(a), Self::Blank(b)) => a == b,
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Wildcard, Self::Wildcard) => true,
            _ => false,
        }
    }
}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Iri(iri) => iri.hash(state),
            Self::Blank(label) => label.hash(state),
            Self::Literal(literal) => literal.hash(state),
            Self::Wildcard => (),
        }
    }
}

impl<'a> From<&'a str> for Node {
    fn from(referent: &'a str) -> Self {
        Self::Iri(Rc::from(referent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn node_equivalence() {
        let blank_a = Node::blank("b1");
        let blank_b = blank_a.clone();
        let blank_c = Node::blank("b2");

        assert_eq!(blank_a, blank_b);
        assert_ne!(blank_a, blank_c);

        let node_a = Node::from("urn:a");
        let node_b = node_a.clone();
        let node_c = Node::from("urn:a");
        let node_d = Node::from("urn:b");

        assert_eq!(node_a, node_b);
        assert_eq!(node_a, node_c);
        assert_ne!(node_a, node_d);

        assert_ne!(node_a, blank_a);
        assert_ne!(node_a, Node::Wildcard);

        let mut map: HashMap<Node, Node> = HashMap::new();
        map.insert(blank_a.clone(), blank_b.clone());
        map.insert(node_a.clone(), node_c.clone());
        assert_eq!(2, map.len());
        assert_eq!(blank_b, map[&blank_a]);
        assert_eq!(node_c, map[&node_a]);
    }

    #[test]
    fn literal_language_matching() {
        let untagged = Literal::new("hello");
        let english = Literal::with_language("hello", "en");
        let english_upper = Literal::with_language("hello", "EN");

        assert!(untagged.matches_language(""));
        assert!(!untagged.matches_language("en"));

        assert!(english.matches_language("en"));
        assert!(english.matches_language("EN"));
        assert!(!english.matches_language(""));
        assert!(!english.matches_language("de"));

        assert_eq!(english, english_upper);
    }

    #[test]
    fn wildcard_matches_nothing_else() {
        assert_eq!(Node::Wildcard, Node::Wildcard);
        assert_ne!(Node::Wildcard, Node::iri("urn:a"));
    }

    #[test]
    fn valid_subject_predicate() {
        assert!(Node::iri("urn:a").is_valid_subject());
        assert!(Node::blank("b").is_valid_subject());
        assert!(!Node::Literal(Literal::new("x")).is_valid_subject());
        assert!(!Node::Wildcard.is_valid_subject());

        assert!(Node::iri("urn:a").is_valid_predicate());
        assert!(!Node::blank("b").is_valid_predicate());
    }
}
