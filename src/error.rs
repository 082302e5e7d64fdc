use crate::{Action, Triple};

/// The four per-operation denials a principal can run into, plus the
/// authentication precondition (spec.md §7).
///
/// Each denial that concerns a specific triple carries it, so a caller can
/// log or react to *what* was denied without the façade ever having
/// revealed more about the base graph than the fact that this one operation
/// on this one triple isn't permitted.
#[derive(Clone, Debug, thiserror::Error)]
pub enum AccessDenied {
    #[error("read denied on graph {graph_iri}")]
    ReadDenied {
        graph_iri: String,
        triple: Option<Triple>,
    },

    #[error("update denied on graph {graph_iri}")]
    UpdateDenied { graph_iri: String },

    #[error("create denied on graph {graph_iri} for triple {triple:?}")]
    AddDenied { graph_iri: String, triple: Triple },

    #[error("delete denied on graph {graph_iri} for triple {triple:?}")]
    DeleteDenied { graph_iri: String, triple: Triple },

    #[error("authentication required for {action} on graph {graph_iri}")]
    AuthenticationRequired { graph_iri: String, action: Action },
}

impl AccessDenied {
    pub fn triple(&self) -> Option<&Triple> {
        match self {
            AccessDenied::ReadDenied { triple, .. } => triple.as_ref(),
            AccessDenied::AddDenied { triple, .. } => Some(triple),
            AccessDenied::DeleteDenied { triple, .. } => Some(triple),
            AccessDenied::UpdateDenied { .. } | AccessDenied::AuthenticationRequired { .. } => {
                None
            }
        }
    }
}

/// The crate-wide error type for [`crate::SecuredModel`] operations: a
/// denial from the permission layer, or a not-found from the façade's own
/// bookkeeping (spec.md §7). `BaseGraph`'s own operations are infallible
/// (mirroring the teacher's `Graph` trait, whose `insert`/`remove` return no
/// `Result`), so unlike an earlier draft of this type there is no
/// generic "base error propagated unchanged" variant to carry — there is no
/// base error channel to propagate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    #[error("no matching statement for ({subject:?}, {predicate:?})")]
    PropertyNotFound { subject: String, predicate: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    #[test]
    fn denied_carries_triple() {
        let triple = Triple::new(Node::iri("urn:s"), Node::iri("urn:p"), Node::iri("urn:o"));
        let denied = AccessDenied::AddDenied {
            graph_iri: "urn:g".into(),
            triple: triple.clone(),
        };
        assert_eq!(Some(&triple), denied.triple());

        let read_denied_graph_wide = AccessDenied::ReadDenied {
            graph_iri: "urn:g".into(),
            triple: None,
        };
        assert_eq!(None, read_denied_graph_wide.triple());
    }

    #[test]
    fn denial_converts_via_from() {
        let denied = AccessDenied::UpdateDenied {
            graph_iri: "urn:g".into(),
        };
        let err: ModelError = denied.into();
        assert!(matches!(err, ModelError::Denied(AccessDenied::UpdateDenied { .. })));
    }
}
