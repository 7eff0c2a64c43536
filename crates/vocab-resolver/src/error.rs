use vocab_graph::GraphError;

use crate::config::ConfigError;
use crate::diagnostics::Diagnostics;
use crate::literal::FieldKind;

/// A fault local to one entity, field or relationship.
///
/// Faults never abort a run: the affected entity/field/edge is omitted and
/// the fault is reported as a [`crate::Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveFault {
    #[error("{subject} has no scope annotation")]
    MissingScope { subject: String },

    #[error("{subject} has {count} conflicting scope annotations")]
    AmbiguousScope { subject: String, count: usize },

    #[error("{subject} has {count} values for {field} in language '{language}'")]
    AmbiguousLiteral {
        subject: String,
        field: FieldKind,
        language: String,
        count: usize,
    },

    #[error("{count} reified statements describe {subject} {relation} {target}")]
    AmbiguousReification {
        subject: String,
        relation: String,
        target: String,
        count: usize,
    },

    #[error("{subject} {relation} {target}: target has no assigned URI, directly or via reification")]
    UnresolvedRelationship {
        subject: String,
        relation: String,
        target: String,
    },

    #[error("{subject} is typed as more than one entity kind")]
    ConflictingKind { subject: String },

    #[error("{subject} has {count} values for single-valued {field}")]
    ConflictingValue {
        subject: String,
        field: String,
        count: usize,
    },

    #[error("{subject} has invalid {field} value '{value}'")]
    InvalidValue {
        subject: String,
        field: String,
        value: String,
    },

    #[error("{subject} is in scope but has no assigned URI")]
    MissingAssignedUri { subject: String },
}

/// Outcome of a lookup that can either degrade locally or fail the run.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Fault(#[from] ResolveFault),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl LookupError {
    /// Report a local fault and continue without a value; pass graph
    /// failures through.
    pub fn degrade<T>(self, diagnostics: &Diagnostics) -> Result<Option<T>, GraphError> {
        match self {
            LookupError::Fault(fault) => {
                diagnostics.report(fault);
                Ok(None)
            }
            LookupError::Graph(err) => Err(err),
        }
    }
}

/// Errors that abort a whole resolution run.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("graph query failed: {0}")]
    Structural(#[from] GraphError),

    #[error("{candidates} candidate entities but no triple uses scope predicate <{predicate}>")]
    ScopePredicateUnindexed { predicate: String, candidates: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("resolution run cancelled")]
    Cancelled,
}
