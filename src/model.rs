use crate::{BaseGraph, HashGraph, ModelError, Node, SecuredGraph, SecurityEvaluator, Triple};
use std::sync::Arc;

/// A triple reinterpreted with typed roles, value-equal to its underlying
/// [`Triple`] (spec.md §3). A transparent newtype rather than a distinct
/// Resource/Property/RDFNode hierarchy, per spec.md §9 "tagged variants
/// over subtype hierarchies" — the roles are just accessor names over the
/// same three [`Node`]s.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Statement(Triple);

impl Statement {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self(Triple::new(subject, predicate, object))
    }

    pub fn subject(&self) -> &Node {
        &self.0.subject
    }

    pub fn predicate(&self) -> &Node {
        &self.0.predicate
    }

    pub fn object(&self) -> &Node {
        &self.0.object
    }

    pub fn as_triple(&self) -> &Triple {
        &self.0
    }

    pub fn into_triple(self) -> Triple {
        self.0
    }
}

impl From<Triple> for Statement {
    fn from(triple: Triple) -> Self {
        Self(triple)
    }
}

impl From<Statement> for Triple {
    fn from(statement: Statement) -> Self {
        statement.0
    }
}

/// Statement-level façade over a base graph (spec.md §4.5, component C5): a
/// [`SecuredGraph`] plus bulk operations, set algebra, property lookup, and
/// reification conveniences. Composes [`SecuredGraph`] rather than
/// inheriting it, per spec.md §9 "model with a trait/interface and compose
/// by wrapping, not inheriting".
pub struct SecuredModel<G: BaseGraph> {
    graph: SecuredGraph<G>,
}

impl<G: BaseGraph> SecuredModel<G> {
    pub fn new(base: G, evaluator: Arc<dyn SecurityEvaluator>) -> Self {
        Self {
            graph: SecuredGraph::new(base, evaluator),
        }
    }

    pub fn graph(&self) -> &SecuredGraph<G> {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SecuredGraph<G> {
        &mut self.graph
    }

    pub fn add_statement(&mut self, statement: Statement) -> Result<(), ModelError> {
        self.graph.add(statement.into_triple())?;
        Ok(())
    }

    pub fn remove_statement(&mut self, statement: &Statement) -> Result<(), ModelError> {
        self.graph.delete(statement.as_triple())?;
        Ok(())
    }

    pub fn contains_statement(&self, statement: &Statement) -> Result<bool, ModelError> {
        Ok(self.graph.contains(statement.as_triple())?)
    }

    /// Bulk add: every statement's `checkCreate` is evaluated before any is
    /// applied, so a single denial leaves the base graph untouched (spec.md
    /// §4.5 "Bulk add/remove", §5 failure atomicity, P3, scenario 3).
    pub fn add_all<I: IntoIterator<Item = Statement>>(
        &mut self,
        statements: I,
    ) -> Result<(), ModelError> {
        self.graph.checker().check_update_graph()?;
        let triples: Vec<Triple> = statements.into_iter().map(Statement::into_triple).collect();
        for triple in &triples {
            self.graph.checker().check_create(triple)?;
        }
        for triple in triples {
            self.graph_mut().add(triple)?;
        }
        Ok(())
    }

    /// Bulk remove, symmetric to [`Self::add_all`]: every `checkDelete` is
    /// evaluated first.
    pub fn remove_all<I: IntoIterator<Item = Statement>>(
        &mut self,
        statements: I,
    ) -> Result<(), ModelError> {
        self.graph.checker().check_update_graph()?;
        let triples: Vec<Triple> = statements.into_iter().map(Statement::into_triple).collect();
        for triple in &triples {
            self.graph.checker().check_delete(triple)?;
        }
        for triple in triples {
            self.graph_mut().delete(&triple)?;
        }
        Ok(())
    }

    /// `read(...)`: graph Update+Create, equivalent to a bulk add of the
    /// supplied statements (spec.md §4.5 `read`).
    pub fn read<I: IntoIterator<Item = Statement>>(&mut self, statements: I) -> Result<(), ModelError> {
        self.add_all(statements)
    }

    /// `write()`: materializes the content that should be serialized by the
    /// caller's own writer (serialization itself is out of scope, spec.md
    /// §1). When the principal may read everything, the result mirrors the
    /// base graph exactly ("delegate to base writer"); otherwise it's a
    /// readable-only temporary graph (spec.md §4.5 `write`). Per the
    /// documented Open Question resolution (spec.md §9), prefixes are
    /// copied across unconditionally rather than stripped to those still
    /// referenced by a surviving triple.
    pub fn write(&self) -> Result<HashGraph, ModelError> {
        let mut out = HashGraph::new(format!("{}:write-view", self.graph.iri()));
        for (prefix, iri) in self.graph.prefix_mapping().iter() {
            out.get_prefix_mapping_mut().set_prefix(prefix, iri);
        }
        if !self.graph.checker().require_read_graph()? {
            return Ok(out);
        }
        let readable_all = self.graph.checker().can_read_triple(&Triple::any());
        for triple in self.graph.base().iter() {
            if readable_all || self.graph.checker().can_read_triple(&triple) {
                out.insert(triple);
            }
        }
        Ok(out)
    }

    /// `containsAll(other)`: every statement in `other` must be present in
    /// the base *and* Read-permitted (spec.md §4.5).
    pub fn contains_all<H: BaseGraph>(&self, other: &H) -> Result<bool, ModelError> {
        if !self.graph.checker().require_read_graph()? {
            return Ok(other.is_empty());
        }
        for triple in other.iter() {
            if !(self.graph.base().contains(&triple) && self.graph.checker().can_read_triple(&triple)) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `containsAny(other)`: at least one statement in `other` must be
    /// present and readable; an entirely-unreadable argument returns
    /// `false`, not an error (spec.md §4.5).
    pub fn contains_any<H: BaseGraph>(&self, other: &H) -> Result<bool, ModelError> {
        if !self.graph.checker().require_read_graph()? {
            return Ok(false);
        }
        Ok(other
            .iter()
            .any(|t| self.graph.base().contains(&t) && self.graph.checker().can_read_triple(&t)))
    }

    fn readable_projection(&self) -> Result<HashGraph, ModelError> {
        let mut projection = HashGraph::new(format!("{}:readable", self.graph.iri()));
        if !self.graph.checker().require_read_graph()? {
            return Ok(projection);
        }
        for triple in self.graph.base().iter() {
            if self.graph.checker().can_read_triple(&triple) {
                projection.insert(triple);
            }
        }
        Ok(projection)
    }

    /// `difference(other)`: the readable statements of `self` not present in
    /// `other` (spec.md §4.5).
    pub fn difference<H: BaseGraph>(&self, other: &H) -> Result<HashGraph, ModelError> {
        let mine = self.readable_projection()?;
        Ok(crate::set::difference(&mine, other).collect())
    }

    /// `union(other)`: the readable statements of `self` plus the full
    /// content of `other` (spec.md §4.5 — `other` is not access-controlled
    /// by this model, it's a plain [`BaseGraph`]).
    pub fn union<H: BaseGraph>(&self, other: &H) -> Result<HashGraph, ModelError> {
        let mine = self.readable_projection()?;
        Ok(crate::set::union(&mine, other).collect())
    }

    /// `intersection(other)`: readable statements of `self` that are also
    /// present in `other`, filtered through the same Read check (spec.md
    /// §4.5 "readable statements of both projections").
    pub fn intersection<H: BaseGraph>(&self, other: &H) -> Result<HashGraph, ModelError> {
        let mine = self.readable_projection()?;
        let theirs: HashGraph = other
            .iter()
            .filter(|t| self.graph.checker().can_read_triple(t))
            .collect();
        Ok(crate::set::intersection(&mine, &theirs).collect())
    }

    /// `query(selector)`: `selector` runs only over the readable projection
    /// (spec.md §4.5).
    pub fn query<F: Fn(&Triple) -> bool>(&self, selector: F) -> Result<Vec<Triple>, ModelError> {
        if !self.graph.checker().require_read_graph()? {
            return Ok(Vec::new());
        }
        Ok(self
            .graph
            .base()
            .iter()
            .filter(|t| self.graph.checker().can_read_triple(t) && selector(t))
            .collect())
    }

    /// `getProperty(s,p[,lang])`: the first base match for `(subject,
    /// predicate, *)` that is both Read-permitted and language-matching, or
    /// `None` if there isn't one (spec.md §4.5). `lang = Some("")` means
    /// "untagged only"; `lang = None` means "don't filter by language".
    pub fn get_property(
        &self,
        subject: &Node,
        predicate: &Node,
        lang: Option<&str>,
    ) -> Result<Option<Triple>, ModelError> {
        if !self.graph.checker().require_read_graph()? {
            return Ok(None);
        }
        let pattern = Triple::new(subject.clone(), predicate.clone(), Node::Wildcard);
        for triple in self.graph.base().find(pattern) {
            if !self.graph.checker().can_read_triple(&triple) {
                continue;
            }
            if let Some(lang) = lang {
                let matches_lang = match &triple.object {
                    Node::Literal(literal) => literal.matches_language(lang),
                    _ => lang.is_empty(),
                };
                if !matches_lang {
                    continue;
                }
            }
            return Ok(Some(triple));
        }
        Ok(None)
    }

    /// `getRequiredProperty(s,p[,lang])`: like [`Self::get_property`], but
    /// raises [`ModelError::PropertyNotFound`] on a miss — unless the
    /// principal cannot even Read `(subject, predicate, ANY)`, in which case
    /// it raises `ReadDenied` instead, so an absent-and-unreadable triple
    /// doesn't leak its absence through a different exception than a
    /// present-and-unreadable one would (spec.md §4.5, I1, scenario 6).
    pub fn get_required_property(
        &self,
        subject: &Node,
        predicate: &Node,
        lang: Option<&str>,
    ) -> Result<Triple, ModelError> {
        match self.get_property(subject, predicate, lang)? {
            Some(triple) => Ok(triple),
            None => {
                let pattern = Triple::new(subject.clone(), predicate.clone(), Node::Wildcard);
                if !self.graph.checker().can_read_triple(&pattern) {
                    self.graph.checker().check_read_triple(&pattern)?;
                }
                Err(ModelError::PropertyNotFound {
                    subject: format!("{subject:?}"),
                    predicate: format!("{predicate:?}"),
                })
            }
        }
    }

    /// `createResource(...)`: ensures `subject` exists as a described
    /// resource by asserting `statements` about it, requiring Update and
    /// per-triple Create (and, since resources already described are simply
    /// read back, Read of the existing triples — covered by
    /// [`Self::add_all`]'s own checks plus an explicit readability check on
    /// any triple that was already present, per spec.md §4.5).
    pub fn create_resource<I: IntoIterator<Item = Statement>>(
        &mut self,
        statements: I,
    ) -> Result<(), ModelError> {
        self.graph.checker().check_update_graph()?;
        let triples: Vec<Triple> = statements.into_iter().map(Statement::into_triple).collect();
        for triple in &triples {
            if self.graph.base().contains(triple) {
                self.graph.checker().check_read_triple(triple)?;
            } else {
                self.graph.checker().check_create(triple)?;
            }
        }
        for triple in triples {
            self.graph_mut().insert_unchecked(triple);
        }
        Ok(())
    }

    /// `createLiteralStatement(s,p,value)`: asserts `(subject, predicate,
    /// value)` where `value` is already a constructed [`Node::Literal`]
    /// (spec.md §4.5 — canonical-literal construction itself belongs to the
    /// data model, out of scope here).
    pub fn create_literal_statement(
        &mut self,
        subject: Node,
        predicate: Node,
        value: Node,
    ) -> Result<(), ModelError> {
        self.add_statement(Statement::new(subject, predicate, value))
    }
}
