//! Structured diagnostics collected during a run.
//!
//! Workers report concurrently into one [`Diagnostics`] collector; the run
//! drains it once at the end and sorts it so the diagnostics stream is as
//! deterministic as the records.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::ResolveFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    MissingScope,
    AmbiguousScope,
    AmbiguousLiteral,
    AmbiguousReification,
    UnresolvedRelationship,
    ConflictingKind,
    ConflictingValue,
    InvalidValue,
    MissingAssignedUri,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub subject: String,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub message: String,
}

impl From<ResolveFault> for Diagnostic {
    fn from(fault: ResolveFault) -> Self {
        let message = fault.to_string();
        let (kind, severity, subject, field, relation, target) = match fault {
            ResolveFault::MissingScope { subject } => (
                DiagnosticKind::MissingScope,
                Severity::Error,
                subject,
                None,
                None,
                None,
            ),
            ResolveFault::AmbiguousScope { subject, .. } => (
                DiagnosticKind::AmbiguousScope,
                Severity::Error,
                subject,
                None,
                None,
                None,
            ),
            ResolveFault::AmbiguousLiteral {
                subject,
                field,
                language,
                ..
            } => (
                DiagnosticKind::AmbiguousLiteral,
                Severity::Error,
                subject,
                Some(format!("{field}@{language}")),
                None,
                None,
            ),
            ResolveFault::AmbiguousReification {
                subject,
                relation,
                target,
                ..
            } => (
                DiagnosticKind::AmbiguousReification,
                Severity::Error,
                subject,
                None,
                Some(relation),
                Some(target),
            ),
            ResolveFault::UnresolvedRelationship {
                subject,
                relation,
                target,
            } => (
                DiagnosticKind::UnresolvedRelationship,
                Severity::Warning,
                subject,
                None,
                Some(relation),
                Some(target),
            ),
            ResolveFault::ConflictingKind { subject } => (
                DiagnosticKind::ConflictingKind,
                Severity::Error,
                subject,
                None,
                None,
                None,
            ),
            ResolveFault::ConflictingValue { subject, field, .. } => (
                DiagnosticKind::ConflictingValue,
                Severity::Error,
                subject,
                Some(field),
                None,
                None,
            ),
            ResolveFault::InvalidValue { subject, field, .. } => (
                DiagnosticKind::InvalidValue,
                Severity::Warning,
                subject,
                Some(field),
                None,
                None,
            ),
            ResolveFault::MissingAssignedUri { subject } => (
                DiagnosticKind::MissingAssignedUri,
                Severity::Warning,
                subject,
                None,
                None,
                None,
            ),
        };

        Diagnostic {
            subject,
            kind,
            severity,
            field,
            relation,
            target,
            message,
        }
    }
}

/// Many-producer diagnostics sink shared by resolution workers.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, fault: ResolveFault) {
        let diagnostic = Diagnostic::from(fault);
        match diagnostic.severity {
            Severity::Error => tracing::error!(
                subject = %diagnostic.subject,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
            Severity::Warning => tracing::warn!(
                subject = %diagnostic.subject,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
        }
        self.entries.lock().push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drain into a sorted, de-duplicated list. The same target fault can be
    /// hit from several referencing entities.
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut entries = self.entries.into_inner();
        entries.sort();
        entries.dedup();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::FieldKind;
    use std::sync::Arc;

    #[test]
    fn unresolved_relationship_is_a_warning() {
        let d = Diagnostic::from(ResolveFault::UnresolvedRelationship {
            subject: "http://x/C".into(),
            relation: "http://x/sub".into(),
            target: "http://x/P".into(),
        });
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.relation.as_deref(), Some("http://x/sub"));
        assert_eq!(d.target.as_deref(), Some("http://x/P"));
    }

    #[test]
    fn ambiguous_literal_names_field_and_language() {
        let d = Diagnostic::from(ResolveFault::AmbiguousLiteral {
            subject: "http://x/C".into(),
            field: FieldKind::Label,
            language: "nl".into(),
            count: 2,
        });
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.field.as_deref(), Some("label@nl"));
        assert!(d.message.contains("2 values"));
    }

    #[test]
    fn concurrent_reports_are_all_collected_sorted_and_deduplicated() {
        let sink = Arc::new(Diagnostics::new());
        std::thread::scope(|scope| {
            for i in 0..8 {
                let sink = Arc::clone(&sink);
                scope.spawn(move || {
                    sink.report(ResolveFault::MissingScope {
                        subject: format!("http://x/E{}", i % 4),
                    });
                });
            }
        });
        assert_eq!(sink.len(), 8);

        let sink = Arc::try_unwrap(sink).unwrap();
        let sorted = sink.into_sorted();
        let subjects: Vec<_> = sorted.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(
            subjects,
            vec!["http://x/E0", "http://x/E1", "http://x/E2", "http://x/E3"]
        );
    }
}
