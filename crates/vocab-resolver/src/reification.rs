//! Relationship target resolution with a reification fallback.
//!
//! A relationship `(subject, relation, target)` needs the target's published
//! identity (assigned URI + label). When the target lives in another
//! document it often carries neither; the converter then records them on a
//! reified statement describing the edge:
//!
//! ```text
//! _:s a rdf:Statement ;
//!     rdf:subject   <subject> ;
//!     rdf:predicate <relation> ;
//!     rdf:object    <target> ;
//!     ex:assignedUri <published-target-uri> ;
//!     rdfs:label     "label"@nl .
//! ```
//!
//! Resolution order, per field: the target's own annotation wins, the
//! statement node fills the gaps. More than one matching statement node is
//! an error; a target without any assigned URI is dropped, never invented.
//!
//! Nothing here is specific to `rdfs:subClassOf`; any relation predicate
//! goes through the same join.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use vocab_graph::{GraphError, GraphSource, Literal, Term};

use crate::config::Vocabulary;
use crate::diagnostics::Diagnostics;
use crate::error::{LookupError, ResolveFault};
use crate::literal::{select_literal, select_single, FieldKind};

/// Where a resolved relationship's identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolvedVia {
    Direct,
    Reification,
    Mixed,
}

/// Published identity annotations read from one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub uri: Option<String>,
    pub label: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelationship {
    pub source: Term,
    pub relation: String,
    pub target: Term,
    pub id: String,
    pub label: Option<Literal>,
    pub via: ResolvedVia,
}

pub struct ReificationResolver<'a, G: ?Sized> {
    graph: &'a G,
    vocab: &'a Vocabulary,
    language: &'a str,
    diagnostics: &'a Diagnostics,
}

impl<'a, G: GraphSource + ?Sized> ReificationResolver<'a, G> {
    pub fn new(
        graph: &'a G,
        vocab: &'a Vocabulary,
        language: &'a str,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            graph,
            vocab,
            language,
            diagnostics,
        }
    }

    pub fn resolve(
        &self,
        subject: &Term,
        relation: &str,
        target: &Term,
    ) -> Result<ResolvedRelationship, LookupError> {
        let direct = self.annotations_of(target)?;

        if let (Some(uri), Some(label)) = (&direct.uri, &direct.label) {
            return Ok(ResolvedRelationship {
                source: subject.clone(),
                relation: relation.to_string(),
                target: target.clone(),
                id: uri.clone(),
                label: Some(label.clone()),
                via: ResolvedVia::Direct,
            });
        }

        let statements = self.matching_statements(subject, relation, target)?;
        let reified = match statements.as_slice() {
            [] => Annotations::default(),
            [statement] => self.annotations_of(statement)?,
            many => {
                return Err(ResolveFault::AmbiguousReification {
                    subject: subject.key(),
                    relation: relation.to_string(),
                    target: target.key(),
                    count: many.len(),
                }
                .into())
            }
        };

        let uri_direct = direct.uri.is_some();
        let label_direct = direct.label.is_some();
        let Some(id) = direct.uri.or(reified.uri) else {
            return Err(ResolveFault::UnresolvedRelationship {
                subject: subject.key(),
                relation: relation.to_string(),
                target: target.key(),
            }
            .into());
        };
        let label = direct.label.or(reified.label);

        let via = match (uri_direct, label.as_ref().map(|_| label_direct)) {
            (true, None | Some(true)) => ResolvedVia::Direct,
            (false, None | Some(false)) => ResolvedVia::Reification,
            _ => ResolvedVia::Mixed,
        };

        tracing::trace!(
            subject = %subject.key(),
            relation,
            target = %target.key(),
            ?via,
            "resolved relationship"
        );

        Ok(ResolvedRelationship {
            source: subject.clone(),
            relation: relation.to_string(),
            target: target.clone(),
            id,
            label,
            via,
        })
    }

    /// Statement nodes reifying `(subject, relation, target)`, in term order.
    ///
    /// Three predicate-indexed lookups (one per statement component),
    /// intersected on the statement node, then restricted to nodes typed as
    /// a reified statement.
    pub fn matching_statements(
        &self,
        subject: &Term,
        relation: &str,
        target: &Term,
    ) -> Result<Vec<Term>, GraphError> {
        let v = self.vocab;
        let by_subject: BTreeSet<Term> = self
            .graph
            .subjects(&v.statement_subject, subject)?
            .into_iter()
            .collect();
        if by_subject.is_empty() {
            return Ok(Vec::new());
        }

        let by_predicate: BTreeSet<Term> = self
            .graph
            .subjects(&v.statement_predicate, &Term::iri(relation))?
            .into_iter()
            .collect();
        let by_object: BTreeSet<Term> = self
            .graph
            .subjects(&v.statement_object, target)?
            .into_iter()
            .collect();

        let joined: BTreeSet<Term> = by_subject
            .intersection(&by_predicate)
            .filter(|node| by_object.contains(*node))
            .cloned()
            .collect();
        if joined.is_empty() {
            return Ok(Vec::new());
        }

        let typed: BTreeSet<Term> = self
            .graph
            .subjects(&v.rdf_type, &Term::iri(&v.statement))?
            .into_iter()
            .collect();

        Ok(joined.intersection(&typed).cloned().collect())
    }

    /// Assigned URI and label on `node`. A conflicting or unusable value is
    /// reported and left as a gap.
    pub fn annotations_of(&self, node: &Term) -> Result<Annotations, GraphError> {
        let uri = match select_single(self.graph, node, &self.vocab.assigned_uri, "assignedUri") {
            Ok(Some(Term::Iri(iri))) => Some(iri),
            Ok(Some(Term::Literal(lit))) => Some(lit.lexical),
            Ok(Some(other)) => {
                self.diagnostics.report(ResolveFault::InvalidValue {
                    subject: node.key(),
                    field: "assignedUri".to_string(),
                    value: other.key(),
                });
                None
            }
            Ok(None) => None,
            Err(err) => err.degrade(self.diagnostics)?,
        };

        let label = match select_literal(
            self.graph,
            self.vocab,
            node,
            FieldKind::Label,
            self.language,
        ) {
            Ok(label) => label,
            Err(err) => err.degrade(self.diagnostics)?,
        };

        Ok(Annotations { uri, label })
    }
}
