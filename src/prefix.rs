use std::collections::HashMap;

/// A namespace-prefix to IRI mapping carried by a graph (spec.md §3).
///
/// Prefix mappings are not access-controlled by this façade (spec.md §6
/// lists `getPrefixMapping` as a plain delegated accessor); what the façade
/// adds is a lazily-constructed, single-writer-guarded wrapper instance per
/// [`crate::SecuredGraph`], so repeated calls to `prefix_mapping()` don't
/// re-clone the base's mapping on every access.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixMapping {
    prefixes: HashMap<String, String>,
}

impl PrefixMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    pub fn get_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn remove_prefix(&mut self, prefix: &str) {
        self.prefixes.remove(prefix);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, iri)| (p.as_str(), iri.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut mapping = PrefixMapping::new();
        assert!(mapping.is_empty());

        mapping.set_prefix("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        assert_eq!(
            Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            mapping.get_prefix("rdf")
        );

        mapping.remove_prefix("rdf");
        assert_eq!(None, mapping.get_prefix("rdf"));
    }
}
