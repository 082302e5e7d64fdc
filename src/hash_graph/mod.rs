use crate::{BaseEventManager, BaseGraph, InMemoryEventManager, PrefixMapping, Triple};
use std::collections::HashSet;
use std::sync::Arc;


/// A simple in-memory [`BaseGraph`], ported from the teacher's
/// `HashGraph` (`src/hash_graph/mod.rs`): a flat `HashSet` of triples,
/// generalized from the teacher's 3-tuple string nodes to the richer
/// [`crate::Node`] enum and given the IRI/prefix-mapping/event-manager/
/// closed-flag bookkeeping spec.md §6 requires of a base graph.
///
/// This is the reference implementation used by this crate's own tests;
/// downstream users of the façade plug in their own store behind
/// [`BaseGraph`] instead.
pub struct HashGraph {
    iri: String,
    triples: HashSet<Triple>,
    prefixes: PrefixMapping,
    events: Arc<InMemoryEventManager>,
    closed: bool,
}

impl HashGraph {
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            triples: HashSet::new(),
            prefixes: PrefixMapping::new(),
            events: Arc::new(InMemoryEventManager::new()),
            closed: false,
        }
    }
}

impl BaseGraph for HashGraph {
    fn iri(&self) -> &str {
        &self.iri
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = Triple> + 'a> {
        Box::new(self.triples.iter().cloned())
    }

    fn insert(&mut self, triple: Triple) {
        let is_new = self.triples.insert(triple.clone());
        if is_new {
            self.events.emit(crate::Event::AddedTriple(triple));
        }
    }

    fn remove(&mut self, triple: &Triple) {
        if self.triples.remove(triple) {
            self.events.emit(crate::Event::DeletedTriple(triple.clone()));
        }
    }

    fn get_prefix_mapping(&self) -> &PrefixMapping {
        &self.prefixes
    }

    fn get_prefix_mapping_mut(&mut self) -> &mut PrefixMapping {
        &mut self.prefixes
    }

    fn get_event_manager(&self) -> Arc<dyn BaseEventManager> {
        self.events.clone()
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn len(&self) -> usize {
        self.triples.len()
    }

    fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }
}

impl std::iter::FromIterator<Triple> for HashGraph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        let mut graph = HashGraph::new("urn:secured-rdf:anonymous");
        for triple in iter {
            graph.triples.insert(triple);
        }
        graph
    }
}
