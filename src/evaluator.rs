use crate::{Action, Principal, Triple};

/// The pluggable decision surface the façade consults for every operation
/// (spec.md §4.1).
///
/// Implementations are expected to answer in bounded time and must not
/// block indefinitely (spec.md §5); the façade calls these methods
/// synchronously and inline with every checked operation.
///
/// Kept dyn-safe (no generic methods, no `Self: Sized` bounds) so a
/// [`crate::SecuredGraph`]/[`crate::SecuredModel`] can be built generically
/// over `Arc<dyn SecurityEvaluator>`, matching the teacher's own preference
/// for small traits most of whose methods have defaults.
pub trait SecurityEvaluator {
    /// Graph-level authorization: may `principal` perform `action` on the
    /// graph identified by `graph_iri` at all?
    fn evaluate_graph(&self, principal: &Principal, action: Action, graph_iri: &str) -> bool;

    /// Triple-level authorization. Implementations must treat any
    /// [`crate::Node::Wildcard`] component of `triple` as unconstrained
    /// (spec.md §4.2): a wildcard triple asks "is this action permitted on
    /// triples matching this pattern in general", not "on this exact
    /// triple".
    fn evaluate_triple(
        &self,
        principal: &Principal,
        action: Action,
        graph_iri: &str,
        triple: &Triple,
    ) -> bool;

    /// Permission to replace `from` by `to` as a single operation. The
    /// default implementation requires Delete of `from` and Create of `to`
    /// independently; an evaluator with an atomic "update" notion may
    /// override this to be more (or less) permissive.
    fn evaluate_update(
        &self,
        principal: &Principal,
        graph_iri: &str,
        from: &Triple,
        to: &Triple,
    ) -> bool {
        self.evaluate_triple(principal, Action::Delete, graph_iri, from)
            && self.evaluate_triple(principal, Action::Create, graph_iri, to)
    }

    /// `true` iff any of `actions` is permitted on the graph as a whole.
    fn evaluate_any_graph(&self, principal: &Principal, actions: &[Action], graph_iri: &str) -> bool {
        actions
            .iter()
            .any(|action| self.evaluate_graph(principal, *action, graph_iri))
    }

    /// `true` iff any of `actions` is permitted on `triple`.
    fn evaluate_any_triple(
        &self,
        principal: &Principal,
        actions: &[Action],
        graph_iri: &str,
        triple: &Triple,
    ) -> bool {
        actions
            .iter()
            .any(|action| self.evaluate_triple(principal, *action, graph_iri, triple))
    }

    /// The principal to use for the call currently in progress, fetched
    /// fresh from ambient context rather than cached on the façade (spec.md
    /// §9: "Principal as ambient context").
    fn get_principal(&self) -> Principal;

    fn is_principal_authenticated(&self, principal: &Principal) -> bool {
        !principal.is_unauthenticated()
    }

    /// If `true`, a read the principal may not perform raises
    /// [`crate::AccessDenied::ReadDenied`]; if `false`, it silently returns
    /// an empty/zero/false result (spec.md §4.2 "Hard-read mode").
    fn is_hard_read_error(&self) -> bool;

    /// If `true`, every check requires an authenticated principal and fails
    /// with [`crate::AccessDenied::AuthenticationRequired`] otherwise
    /// (spec.md §4.1).
    fn requires_authentication(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AllowAll;

    impl SecurityEvaluator for AllowAll {
        fn evaluate_graph(&self, _: &Principal, _: Action, _: &str) -> bool {
            true
        }

        fn evaluate_triple(&self, _: &Principal, _: Action, _: &str, _: &Triple) -> bool {
            true
        }

        fn get_principal(&self) -> Principal {
            Principal::from("anyone")
        }

        fn is_hard_read_error(&self) -> bool {
            false
        }
    }

    #[test]
    fn default_evaluate_update_decomposes() {
        let evaluator = AllowAll;
        let principal = evaluator.get_principal();
        let triple = Triple::any();
        assert!(evaluator.evaluate_update(&principal, "urn:g", &triple, &triple));
    }

    #[test]
    fn default_evaluate_any_short_circuits_true() {
        let evaluator = AllowAll;
        let principal = evaluator.get_principal();
        assert!(evaluator.evaluate_any_graph(&principal, &Action::ALL, "urn:g"));
    }
}
