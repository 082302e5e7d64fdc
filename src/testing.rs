//! Shared test fixtures, in the same spirit as the teacher's `validator.rs`
//! `Testbed`: a small, fixed three-triple graph plus a scriptable
//! [`StaticEvaluator`] test double, reused across `checker`, `secured_graph`,
//! `model`, `reification`, and `events` test modules so each one isn't
//! re-deriving its own fixture.

use crate::{Action, BaseGraph, HashGraph, Node, Principal, SecurityEvaluator, Triple};
use std::collections::{HashMap, HashSet};

pub const GRAPH_IRI: &str = "urn:secured-rdf:tests:graph";

pub struct Testbed {
    pub predicate_a: Node,
    pub predicate_b: Node,
    pub predicate_c: Node,

    pub node_a: Node,
    pub node_b: Node,
    pub node_c: Node,

    pub graph: HashGraph,
}

impl Testbed {
    pub fn new() -> Self {
        let predicate_a = Node::iri("urn:secured-rdf:tests:predicate:a");
        let predicate_b = Node::iri("urn:secured-rdf:tests:predicate:b");
        let predicate_c = Node::iri("urn:secured-rdf:tests:predicate:c");

        let node_a = Node::iri("urn:secured-rdf:tests:node:a");
        let node_b = Node::iri("urn:secured-rdf:tests:node:b");
        let node_c = Node::blank("tests-node-c");

        let mut graph = HashGraph::new(GRAPH_IRI);
        graph.insert(Triple::new(node_a.clone(), predicate_a.clone(), node_b.clone()));
        graph.insert(Triple::new(node_b.clone(), predicate_b.clone(), node_c.clone()));
        graph.insert(Triple::new(node_c.clone(), predicate_c.clone(), node_a.clone()));

        Self {
            predicate_a,
            predicate_b,
            predicate_c,
            node_a,
            node_b,
            node_c,
            graph,
        }
    }

    pub fn triple_ab(&self) -> Triple {
        Triple::new(self.node_a.clone(), self.predicate_a.clone(), self.node_b.clone())
    }

    pub fn triple_bc(&self) -> Triple {
        Triple::new(self.node_b.clone(), self.predicate_b.clone(), self.node_c.clone())
    }

    pub fn triple_ca(&self) -> Triple {
        Triple::new(self.node_c.clone(), self.predicate_c.clone(), self.node_a.clone())
    }
}

/// A [`SecurityEvaluator`] entirely driven by fixed tables, for use in
/// tests: a default per-[`Action`] answer at the graph level, plus specific
/// triple-level overrides (either forcing a deny or forcing an allow) that
/// take precedence over the default.
pub struct StaticEvaluator {
    principal: Principal,
    requires_auth: bool,
    hard_read: bool,
    graph_allow: HashMap<Action, bool>,
    triple_allow_default: HashMap<Action, bool>,
    denied_triples: HashSet<(Action, Triple)>,
    allowed_triples: HashSet<(Action, Triple)>,
}

impl StaticEvaluator {
    pub fn new(principal: Principal) -> Self {
        let mut graph_allow = HashMap::new();
        let mut triple_allow_default = HashMap::new();
        for action in Action::ALL {
            graph_allow.insert(action, true);
            triple_allow_default.insert(action, true);
        }
        Self {
            principal,
            requires_auth: false,
            hard_read: true,
            graph_allow,
            triple_allow_default,
            denied_triples: HashSet::new(),
            allowed_triples: HashSet::new(),
        }
    }

    pub fn requiring_authentication(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn with_hard_read(mut self, hard: bool) -> Self {
        self.hard_read = hard;
        self
    }

    pub fn allow_all(mut self) -> Self {
        for action in Action::ALL {
            self.graph_allow.insert(action, true);
            self.triple_allow_default.insert(action, true);
        }
        self
    }

    pub fn deny_all(mut self) -> Self {
        for action in Action::ALL {
            self.graph_allow.insert(action, false);
            self.triple_allow_default.insert(action, false);
        }
        self
    }

    pub fn allow_all_but_create(mut self) -> Self {
        self = self.allow_all();
        self.graph_allow.insert(Action::Create, true);
        self.triple_allow_default.insert(Action::Create, false);
        self
    }

    pub fn deny_graph_action(mut self, action: Action) -> Self {
        self.graph_allow.insert(action, false);
        self
    }

    pub fn deny_action_of(mut self, action: Action, triple: Triple) -> Self {
        self.denied_triples.insert((action, triple));
        self
    }

    pub fn allow_action_of(mut self, action: Action, triple: Triple) -> Self {
        self.allowed_triples.insert((action, triple));
        self
    }

    pub fn deny_read_of(self, triple: Triple) -> Self {
        self.deny_action_of(Action::Read, triple)
    }
}

impl SecurityEvaluator for StaticEvaluator {
    fn evaluate_graph(&self, _principal: &Principal, action: Action, _graph_iri: &str) -> bool {
        *self.graph_allow.get(&action).unwrap_or(&false)
    }

    fn evaluate_triple(
        &self,
        _principal: &Principal,
        action: Action,
        _graph_iri: &str,
        triple: &Triple,
    ) -> bool {
        let key = (action, triple.clone());
        if self.denied_triples.contains(&key) {
            false
        } else if self.allowed_triples.contains(&key) {
            true
        } else {
            *self.triple_allow_default.get(&action).unwrap_or(&false)
        }
    }

    fn get_principal(&self) -> Principal {
        self.principal.clone()
    }

    fn is_hard_read_error(&self) -> bool {
        self.hard_read
    }

    fn requires_authentication(&self) -> bool {
        self.requires_auth
    }
}
