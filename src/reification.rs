//! Reification, list, and container consistency rules (spec.md §4.6,
//! component C6): derived-triple checks decomposed into the underlying
//! per-triple Create/Read/Delete decisions, built directly on
//! [`crate::checker::PermissionChecker`] the same way [`crate::SecuredGraph`]
//! itself is. Lives as its own `impl` block on [`SecuredModel`] rather than
//! folded into `model.rs`, since it is conceptually a distinct piece of the
//! façade (spec.md §2 lists it as its own component).

use crate::{BaseGraph, ModelError, Node, SecuredModel, Statement, Triple};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BLANK: AtomicU64 = AtomicU64::new(0);

/// A fresh blank node to stand in for a not-yet-materialized resource (the
/// "Future" subject of spec.md §4.6): its identity is irrelevant to the
/// Create decision, which is made against a wildcard pattern before this is
/// ever generated.
fn fresh_blank() -> Node {
    let id = NEXT_BLANK.fetch_add(1, Ordering::Relaxed);
    Node::blank(format!("reification-{id}"))
}

/// The four triples that reify `statement` under resource `r` (spec.md §3
/// "Reified Statement").
fn reification_quad(r: &Node, statement: &Statement) -> [Triple; 4] {
    [
        Triple::new(r.clone(), crate::vocab::type_(), crate::vocab::statement()),
        Triple::new(r.clone(), crate::vocab::subject(), statement.subject().clone()),
        Triple::new(r.clone(), crate::vocab::predicate(), statement.predicate().clone()),
        Triple::new(r.clone(), crate::vocab::object(), statement.object().clone()),
    ]
}

impl<G: BaseGraph> SecuredModel<G> {
    /// Every resource `r` in the (unfiltered) base graph that carries all
    /// four reification triples for `statement`, regardless of readability.
    /// Used internally by delete operations, which are gated by Delete
    /// checks on the triples themselves rather than by Read.
    fn reifications_of(&self, statement: &Statement) -> Vec<Node> {
        let by_subject = Triple::new(Node::Wildcard, crate::vocab::subject(), statement.subject().clone());
        let candidates: HashSet<Node> = self
            .graph()
            .base()
            .find(by_subject)
            .map(|t| t.subject)
            .collect();
        candidates
            .into_iter()
            .filter(|r| {
                let quad = reification_quad(r, statement);
                quad.iter().all(|t| self.graph().base().contains(t))
            })
            .collect()
    }

    /// The triples of an existing reification resource `r`, whatever
    /// statement it reifies (used to tear one down without first having to
    /// know its statement).
    fn existing_quad_for(&self, r: &Node) -> Vec<Triple> {
        [
            crate::vocab::type_(),
            crate::vocab::subject(),
            crate::vocab::predicate(),
            crate::vocab::object(),
        ]
        .iter()
        .cloned()
        .filter_map(|p| {
            let pattern = Triple::new(r.clone(), p, Node::Wildcard);
            self.graph().base().find(pattern).next()
        })
        .collect()
    }

    /// Reifications of `statement` whose four triples are each Read-
    /// permitted to the current principal (spec.md I3, P6).
    fn readable_reifications(&self, statement: &Statement) -> Result<Vec<Node>, ModelError> {
        if !self.graph().checker().require_read_graph()? {
            return Ok(Vec::new());
        }
        Ok(self
            .reifications_of(statement)
            .into_iter()
            .filter(|r| {
                reification_quad(r, statement)
                    .iter()
                    .all(|t| self.graph().checker().can_read_triple(t))
            })
            .collect())
    }

    /// `isReified(stmt)`: true iff at least one reification of `stmt` is
    /// readable (spec.md §4.5, scenario 4).
    pub fn is_reified(&self, statement: &Statement) -> Result<bool, ModelError> {
        Ok(!self.readable_reifications(statement)?.is_empty())
    }

    /// `listReifiedStatements(stmt)`: every readable reification resource
    /// for `stmt` (spec.md §4.5, I3).
    pub fn list_reified_statements(&self, statement: &Statement) -> Result<Vec<Node>, ModelError> {
        self.readable_reifications(statement)
    }

    /// `createReifiedStatement(uri, stmt)`: requires Update plus Create for
    /// each of the four constituent triples; `uri` names the reification
    /// resource explicitly, or a fresh blank node is minted (spec.md §4.5).
    pub fn create_reified_statement(
        &mut self,
        uri: Option<Node>,
        statement: &Statement,
    ) -> Result<Node, ModelError> {
        self.graph().checker().check_update_graph()?;
        let r = uri.unwrap_or_else(fresh_blank);
        let quad = reification_quad(&r, statement);
        for t in &quad {
            self.graph().checker().check_create(t)?;
        }
        for t in quad {
            self.graph_mut().insert_unchecked(t);
        }
        Ok(r)
    }

    /// `getAnyReifiedStatement(stmt)`: returns the first readable existing
    /// reification if one exists (Read only, per spec.md §4.5); otherwise
    /// creates a new one, requiring Update+Create as
    /// [`Self::create_reified_statement`] does.
    pub fn get_any_reified_statement(&mut self, statement: &Statement) -> Result<Node, ModelError> {
        if let Some(r) = self.readable_reifications(statement)?.into_iter().next() {
            return Ok(r);
        }
        self.create_reified_statement(None, statement)
    }

    /// `removeReification(r)`: Update + Delete for each of `r`'s four
    /// constituent triples, fail-closed (spec.md §4.5, §5).
    pub fn remove_reification(&mut self, r: &Node) -> Result<(), ModelError> {
        self.graph().checker().check_update_graph()?;
        let quad = self.existing_quad_for(r);
        for t in &quad {
            self.graph().checker().check_delete(t)?;
        }
        for t in &quad {
            self.graph_mut().delete_unchecked(t);
        }
        Ok(())
    }

    /// `removeAllReifications(stmt)`: as [`Self::remove_reification`], but
    /// for every resource reifying `stmt`; every triple across every
    /// matching resource is `checkDelete`-ed before any is removed, so a
    /// single denial leaves the base graph untouched (spec.md §5).
    pub fn remove_all_reifications(&mut self, statement: &Statement) -> Result<(), ModelError> {
        self.graph().checker().check_update_graph()?;
        let quads: Vec<Triple> = self
            .reifications_of(statement)
            .iter()
            .flat_map(|r| self.existing_quad_for(r))
            .collect();
        for t in &quads {
            self.graph().checker().check_delete(t)?;
        }
        for t in &quads {
            self.graph_mut().delete_unchecked(t);
        }
        Ok(())
    }

    /// `createList(members)`: decomposes to a Create check against
    /// `(Wildcard, rdf:first, member)`/`(Wildcard, rdf:rest, Wildcard)` per
    /// element (the cell's own subject is a "Future" resource, spec.md
    /// §4.6) before any cell is actually materialized, so the whole list is
    /// fail-closed as a unit. Returns `rdf:nil` for an empty list, or the
    /// head cell otherwise.
    pub fn create_list<I: IntoIterator<Item = Node>>(&mut self, members: I) -> Result<Node, ModelError> {
        self.graph().checker().check_update_graph()?;
        let members: Vec<Node> = members.into_iter().collect();
        if members.is_empty() {
            let marker = Triple::new(crate::vocab::nil(), Node::Wildcard, Node::Wildcard);
            self.graph().checker().check_create(&marker)?;
            return Ok(crate::vocab::nil());
        }
        for member in &members {
            let first_pattern = Triple::new(Node::Wildcard, crate::vocab::first(), member.clone());
            self.graph().checker().check_create(&first_pattern)?;
            let rest_pattern = Triple::new(Node::Wildcard, crate::vocab::rest(), Node::Wildcard);
            self.graph().checker().check_create(&rest_pattern)?;
        }

        let mut tail = crate::vocab::nil();
        let mut cells = Vec::with_capacity(members.len());
        for member in members.into_iter().rev() {
            let cell = fresh_blank();
            cells.push((cell.clone(), member, tail));
            tail = cell;
        }
        for (cell, member, rest) in cells {
            self.graph_mut().insert_unchecked(Triple::new(cell.clone(), crate::vocab::first(), member));
            self.graph_mut().insert_unchecked(Triple::new(cell, crate::vocab::rest(), rest));
        }
        Ok(tail)
    }

    /// `container.add(index, element)`: asserts `(container, rdf:_index,
    /// element)` (spec.md §4.6).
    pub fn container_add(&mut self, container: &Node, index: usize, element: Node) -> Result<(), ModelError> {
        self.graph().checker().check_update_graph()?;
        let triple = Triple::new(container.clone(), crate::vocab::li(index), element);
        self.graph().checker().check_create(&triple)?;
        self.graph_mut().insert_unchecked(triple);
        Ok(())
    }

    /// `container.remove(index)`: deletes every existing
    /// `(container, rdf:_index, *)` triple (ordinarily at most one).
    pub fn container_remove(&mut self, container: &Node, index: usize) -> Result<(), ModelError> {
        self.graph().checker().check_update_graph()?;
        let pattern = Triple::new(container.clone(), crate::vocab::li(index), Node::Wildcard);
        let matches: Vec<Triple> = self.graph().base().find(pattern).collect();
        for t in &matches {
            self.graph().checker().check_delete(t)?;
        }
        for t in &matches {
            self.graph_mut().delete_unchecked(t);
        }
        Ok(())
    }

    /// `container.contains(element)`: Read on any `(container, rdf:_i,
    /// element)` triple, for any `i` (spec.md §4.6).
    pub fn container_contains(&self, container: &Node, element: &Node) -> Result<bool, ModelError> {
        if !self.graph().checker().require_read_graph()? {
            return Ok(false);
        }
        let pattern = Triple::new(container.clone(), Node::Wildcard, element.clone());
        Ok(self
            .graph()
            .base()
            .find(pattern)
            .any(|t| self.graph().checker().can_read_triple(&t)))
    }

    /// `container.set(index, element)`: replaces whatever currently
    /// occupies `rdf:_index`. Implemented as an atomic `evaluateUpdate`
    /// when a previous occupant exists (spec.md §4.6 "may be implemented as
    /// ... an atomic evaluateUpdate(from,to) when available"), or a plain
    /// Create when the slot was empty.
    pub fn container_set(&mut self, container: &Node, index: usize, element: Node) -> Result<(), ModelError> {
        self.graph().checker().check_update_graph()?;
        let slot = crate::vocab::li(index);
        let pattern = Triple::new(container.clone(), slot.clone(), Node::Wildcard);
        let existing: Vec<Triple> = self.graph().base().find(pattern).collect();
        let new_triple = Triple::new(container.clone(), slot, element);
        match existing.first() {
            Some(old) => {
                self.graph().checker().check_update(old, &new_triple)?;
                self.graph_mut().delete_unchecked(old);
                self.graph_mut().insert_unchecked(new_triple);
            }
            None => {
                self.graph().checker().check_create(&new_triple)?;
                self.graph_mut().insert_unchecked(new_triple);
            }
        }
        Ok(())
    }
}
