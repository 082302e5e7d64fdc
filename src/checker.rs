use crate::{AccessDenied, Action, Principal, SecurityEvaluator, Triple};
use std::rc::Rc;
use std::sync::Arc;

/// Canonical check helpers shared by [`crate::SecuredGraph`] and
/// [`crate::SecuredModel`] (spec.md §4.2, component C2).
///
/// Holds the evaluator and the graph IRI being checked against, but not a
/// principal — the principal is re-fetched from the evaluator on every
/// check (spec.md §9, "Principal as ambient context"), which is what lets a
/// single secured façade be reused safely across callers acting as
/// different principals.
pub struct PermissionChecker {
    evaluator: Arc<dyn SecurityEvaluator>,
    graph_iri: Rc<str>,
}

impl PermissionChecker {
    pub fn new(evaluator: Arc<dyn SecurityEvaluator>, graph_iri: impl Into<Rc<str>>) -> Self {
        Self {
            evaluator,
            graph_iri: graph_iri.into(),
        }
    }

    pub fn graph_iri(&self) -> &str {
        &self.graph_iri
    }

    pub fn evaluator(&self) -> &Arc<dyn SecurityEvaluator> {
        &self.evaluator
    }

    pub fn is_hard_read_error(&self) -> bool {
        self.evaluator.is_hard_read_error()
    }

    fn principal(&self) -> Principal {
        self.evaluator.get_principal()
    }

    /// Authentication is a precondition for *every* check: when the
    /// evaluator requires it, an unauthenticated principal fails closed
    /// here before any authorization outcome is produced (spec.md §4.1).
    fn authenticate(&self, action: Action) -> Result<Principal, AccessDenied> {
        let principal = self.principal();
        if self.evaluator.requires_authentication()
            && !self.evaluator.is_principal_authenticated(&principal)
        {
            log::warn!(
                "authentication required for {action} on graph {}",
                self.graph_iri
            );
            return Err(AccessDenied::AuthenticationRequired {
                graph_iri: self.graph_iri.to_string(),
                action,
            });
        }
        Ok(principal)
    }

    pub fn can_read_graph(&self) -> bool {
        match self.authenticate(Action::Read) {
            Ok(principal) => self
                .evaluator
                .evaluate_graph(&principal, Action::Read, &self.graph_iri),
            Err(_) => false,
        }
    }

    pub fn check_read_graph(&self) -> Result<(), AccessDenied> {
        let principal = self.authenticate(Action::Read)?;
        if self
            .evaluator
            .evaluate_graph(&principal, Action::Read, &self.graph_iri)
        {
            Ok(())
        } else {
            log::warn!("read denied on graph {}", self.graph_iri);
            Err(AccessDenied::ReadDenied {
                graph_iri: self.graph_iri.to_string(),
                triple: None,
            })
        }
    }

    /// `check_read_graph`, but soft-read aware: `Ok(true)` means proceed,
    /// `Ok(false)` means the graph-level Read check failed and the evaluator
    /// is in soft-read mode, so the caller should return its own "empty"
    /// sentinel (`0`, `true` for `isEmpty`, an empty iterator, ...) rather
    /// than raise (spec.md §4.2 "Hard-read mode", §7's sole exception to
    /// never swallowing a denial). `AuthenticationRequired` is a
    /// precondition, not a Read authorization outcome, so it is never
    /// soft-swallowed — only `ReadDenied` is (spec.md §4.1, §7).
    pub fn require_read_graph(&self) -> Result<bool, AccessDenied> {
        match self.check_read_graph() {
            Ok(()) => Ok(true),
            Err(e @ AccessDenied::AuthenticationRequired { .. }) => Err(e),
            Err(e) => {
                if self.is_hard_read_error() {
                    Err(e)
                } else {
                    Ok(false)
                }
            }
        }
    }

    pub fn can_update_graph(&self) -> bool {
        match self.authenticate(Action::Update) {
            Ok(principal) => self
                .evaluator
                .evaluate_graph(&principal, Action::Update, &self.graph_iri),
            Err(_) => false,
        }
    }

    pub fn check_update_graph(&self) -> Result<(), AccessDenied> {
        let principal = self.authenticate(Action::Update)?;
        if self
            .evaluator
            .evaluate_graph(&principal, Action::Update, &self.graph_iri)
        {
            Ok(())
        } else {
            log::warn!("update denied on graph {}", self.graph_iri);
            Err(AccessDenied::UpdateDenied {
                graph_iri: self.graph_iri.to_string(),
            })
        }
    }

    pub fn can_delete_graph(&self) -> bool {
        match self.authenticate(Action::Delete) {
            Ok(principal) => self
                .evaluator
                .evaluate_graph(&principal, Action::Delete, &self.graph_iri),
            Err(_) => false,
        }
    }

    /// `true` iff `triple` (which may contain wildcards, per spec.md §4.2)
    /// is readable. This is the primitive the [`crate::FilteredIterator`]
    /// uses to decide whether per-element filtering is needed at all: when
    /// `can_read_triple(&Triple::any())` is true, every concrete triple is
    /// necessarily also readable and no per-element check is required.
    pub fn can_read_triple(&self, triple: &Triple) -> bool {
        match self.authenticate(Action::Read) {
            Ok(principal) => {
                self.evaluator
                    .evaluate_triple(&principal, Action::Read, &self.graph_iri, triple)
            }
            Err(_) => false,
        }
    }

    pub fn check_read_triple(&self, triple: &Triple) -> Result<(), AccessDenied> {
        let principal = self.authenticate(Action::Read)?;
        if self
            .evaluator
            .evaluate_triple(&principal, Action::Read, &self.graph_iri, triple)
        {
            log::trace!("read permitted for triple {triple:?}");
            Ok(())
        } else {
            log::warn!("read denied for triple {triple:?} on graph {}", self.graph_iri);
            Err(AccessDenied::ReadDenied {
                graph_iri: self.graph_iri.to_string(),
                triple: Some(triple.clone()),
            })
        }
    }

    pub fn check_create(&self, triple: &Triple) -> Result<(), AccessDenied> {
        let principal = self.authenticate(Action::Create)?;
        if self
            .evaluator
            .evaluate_triple(&principal, Action::Create, &self.graph_iri, triple)
        {
            Ok(())
        } else {
            log::warn!("create denied for triple {triple:?} on graph {}", self.graph_iri);
            Err(AccessDenied::AddDenied {
                graph_iri: self.graph_iri.to_string(),
                triple: triple.clone(),
            })
        }
    }

    pub fn can_delete_triple(&self, triple: &Triple) -> bool {
        match self.authenticate(Action::Delete) {
            Ok(principal) => {
                self.evaluator
                    .evaluate_triple(&principal, Action::Delete, &self.graph_iri, triple)
            }
            Err(_) => false,
        }
    }

    pub fn check_delete(&self, triple: &Triple) -> Result<(), AccessDenied> {
        let principal = self.authenticate(Action::Delete)?;
        if self
            .evaluator
            .evaluate_triple(&principal, Action::Delete, &self.graph_iri, triple)
        {
            Ok(())
        } else {
            log::warn!("delete denied for triple {triple:?} on graph {}", self.graph_iri);
            Err(AccessDenied::DeleteDenied {
                graph_iri: self.graph_iri.to_string(),
                triple: triple.clone(),
            })
        }
    }

    pub fn check_update(&self, from: &Triple, to: &Triple) -> Result<(), AccessDenied> {
        let principal = self.authenticate(Action::Update)?;
        if self
            .evaluator
            .evaluate_update(&principal, &self.graph_iri, from, to)
        {
            Ok(())
        } else {
            log::warn!(
                "update denied replacing {from:?} with {to:?} on graph {}",
                self.graph_iri
            );
            Err(AccessDenied::AddDenied {
                graph_iri: self.graph_iri.to_string(),
                triple: to.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticEvaluator;
    use crate::Node;

    fn triple() -> Triple {
        Triple::new(Node::iri("urn:s"), Node::iri("urn:p"), Node::iri("urn:o"))
    }

    #[test]
    fn authentication_required_blocks_before_authorization() {
        let evaluator = StaticEvaluator::new(Principal::unauthenticated())
            .requiring_authentication()
            .allow_all();
        let checker = PermissionChecker::new(Arc::new(evaluator), "urn:g");

        let err = checker.check_read_graph().unwrap_err();
        assert!(matches!(err, AccessDenied::AuthenticationRequired { .. }));
    }

    #[test]
    fn graph_level_denial_carries_no_triple() {
        let evaluator = StaticEvaluator::new(Principal::from("alice")).deny_all();
        let checker = PermissionChecker::new(Arc::new(evaluator), "urn:g");

        let err = checker.check_read_graph().unwrap_err();
        match err {
            AccessDenied::ReadDenied { triple, .. } => assert!(triple.is_none()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn triple_level_denial_carries_triple() {
        let evaluator = StaticEvaluator::new(Principal::from("alice")).allow_all_but_create();
        let checker = PermissionChecker::new(Arc::new(evaluator), "urn:g");

        let t = triple();
        let err = checker.check_create(&t).unwrap_err();
        assert_eq!(Some(&t), err.triple());
    }

    #[test]
    fn require_read_graph_still_raises_authentication_required_under_soft_read() {
        let evaluator = StaticEvaluator::new(Principal::unauthenticated())
            .requiring_authentication()
            .with_hard_read(false)
            .allow_all();
        let checker = PermissionChecker::new(Arc::new(evaluator), "urn:g");

        let err = checker.require_read_graph().unwrap_err();
        assert!(matches!(err, AccessDenied::AuthenticationRequired { .. }));
    }

    #[test]
    fn require_read_graph_swallows_read_denied_under_soft_read() {
        let evaluator = StaticEvaluator::new(Principal::from("alice"))
            .with_hard_read(false)
            .deny_all();
        let checker = PermissionChecker::new(Arc::new(evaluator), "urn:g");

        assert!(!checker.require_read_graph().unwrap());
    }

    #[test]
    fn check_update_denial_carries_the_to_triple() {
        let evaluator = StaticEvaluator::new(Principal::from("alice")).allow_all_but_create();
        let checker = PermissionChecker::new(Arc::new(evaluator), "urn:g");

        let from = triple();
        let to = Triple::new(Node::iri("urn:s2"), Node::iri("urn:p"), Node::iri("urn:o"));
        let err = checker.check_update(&from, &to).unwrap_err();
        match err {
            AccessDenied::AddDenied { triple, .. } => assert_eq!(to, triple),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn can_read_never_raises() {
        let evaluator = StaticEvaluator::new(Principal::unauthenticated())
            .requiring_authentication()
            .allow_all();
        let checker = PermissionChecker::new(Arc::new(evaluator), "urn:g");
        assert!(!checker.can_read_graph());
        assert!(!checker.can_read_triple(&triple()));
    }
}
