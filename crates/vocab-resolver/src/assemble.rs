//! Model assembly: one documentation record per in-scope entity.
//!
//! Entity-local faults (an ambiguous label, an unresolvable parent, a bad
//! cardinality) degrade that one record and are reported. Only a failing
//! graph aborts the batch.

use rayon::prelude::*;

use vocab_graph::{GraphError, GraphSource, Term};

use crate::cancel::CancellationToken;
use crate::config::{ResolverConfig, Vocabulary};
use crate::diagnostics::Diagnostics;
use crate::entity::EntityRef;
use crate::error::{ResolveError, ResolveFault};
use crate::literal::{select_literal, select_single, FieldKind};
use crate::reification::ReificationResolver;
use crate::record::{LocalizedText, ParentRef, Record, RecordBuilder};

pub struct Assembler<'a, G: ?Sized> {
    graph: &'a G,
    config: &'a ResolverConfig,
    diagnostics: &'a Diagnostics,
}

impl<'a, G: GraphSource + ?Sized> Assembler<'a, G> {
    pub fn new(graph: &'a G, config: &'a ResolverConfig, diagnostics: &'a Diagnostics) -> Self {
        Self {
            graph,
            config,
            diagnostics,
        }
    }

    fn vocab(&self) -> &'a Vocabulary {
        &self.config.vocabulary
    }

    fn language(&self) -> &'a str {
        &self.config.language
    }

    /// Assemble records for already scope-filtered entities, in parallel on
    /// the current rayon pool. Output order is unspecified; see
    /// [`crate::order::order`].
    pub fn assemble(
        &self,
        entities: &[EntityRef],
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, ResolveError> {
        entities
            .par_iter()
            .map(|entity| {
                if cancel.is_cancelled() {
                    return Err(ResolveError::Cancelled);
                }
                Ok(self.assemble_entity(entity)?)
            })
            .collect()
    }

    pub fn assemble_entity(&self, entity: &EntityRef) -> Result<Record, GraphError> {
        let node = &entity.node;
        let id = match self.assigned_uri(node)? {
            Some(uri) => uri,
            None => {
                self.diagnostics.report(ResolveFault::MissingAssignedUri {
                    subject: entity.key(),
                });
                entity.key()
            }
        };

        let mut builder = RecordBuilder::new(entity.kind, id, entity.key())
            .label(self.text(node, FieldKind::Label)?)
            .definition(self.text(node, FieldKind::Definition)?)
            .usage_note(self.text(node, FieldKind::UsageNote)?);

        for parent in self.parents(entity)? {
            builder = builder.parent(parent);
        }

        if entity.kind.is_property() {
            let vocab = self.vocab();
            builder = builder
                .domain(self.reference(node, &vocab.domain, "domain")?)
                .range(self.reference(node, &vocab.range, "range")?)
                .cardinality(
                    self.count(node, &vocab.min_count, "minCount")?,
                    self.count(node, &vocab.max_count, "maxCount")?,
                );
        }

        tracing::debug!(subject = %entity.key(), kind = ?entity.kind, "assembled record");
        Ok(builder.build())
    }

    fn resolver(&self) -> ReificationResolver<'a, G> {
        ReificationResolver::new(self.graph, self.vocab(), self.language(), self.diagnostics)
    }

    fn text(&self, node: &Term, field: FieldKind) -> Result<Option<LocalizedText>, GraphError> {
        let literal = match select_literal(self.graph, self.vocab(), node, field, self.language()) {
            Ok(literal) => literal,
            Err(err) => err.degrade(self.diagnostics)?,
        };
        Ok(literal.map(|l| LocalizedText::from_literal(l, self.language())))
    }

    fn assigned_uri(&self, node: &Term) -> Result<Option<String>, GraphError> {
        let predicate = &self.vocab().assigned_uri;
        let value = match select_single(self.graph, node, predicate, "assignedUri") {
            Ok(value) => value,
            Err(err) => err.degrade(self.diagnostics)?,
        };
        Ok(match value {
            Some(Term::Iri(iri)) => Some(iri),
            Some(Term::Literal(lit)) => Some(lit.lexical),
            _ => None,
        })
    }

    /// Parent edges resolved through the reification resolver. Unresolvable
    /// or ambiguous edges are reported and omitted.
    fn parents(&self, entity: &EntityRef) -> Result<Vec<ParentRef>, GraphError> {
        let relation = entity.kind.parent_relation(self.vocab());
        let resolver = self.resolver();

        let mut out = Vec::new();
        for target in self.graph.objects(&entity.node, relation)? {
            if !target.is_node() {
                self.diagnostics.report(ResolveFault::InvalidValue {
                    subject: entity.key(),
                    field: relation.to_string(),
                    value: target.key(),
                });
                continue;
            }
            match resolver.resolve(&entity.node, relation, &target) {
                Ok(rel) => out.push(ParentRef::from_relationship(rel, self.language())),
                Err(err) => {
                    err.degrade::<()>(self.diagnostics)?;
                }
            }
        }
        Ok(out)
    }

    /// Single-valued reference (domain/range), resolved like a parent edge:
    /// the target's own assigned URI, else one reified statement's. A
    /// target with neither is reported and omitted; its graph IRI is
    /// internal and never published.
    fn reference(
        &self,
        node: &Term,
        predicate: &str,
        field: &str,
    ) -> Result<Option<String>, GraphError> {
        let target = match select_single(self.graph, node, predicate, field) {
            Ok(target) => target,
            Err(err) => err.degrade(self.diagnostics)?,
        };
        let Some(target) = target else {
            return Ok(None);
        };
        if !target.is_node() {
            self.report_invalid(node, field, target.key());
            return Ok(None);
        }
        match self.resolver().resolve(node, predicate, &target) {
            Ok(rel) => Ok(Some(rel.id)),
            Err(err) => err.degrade(self.diagnostics),
        }
    }

    /// Non-negative integer cardinality; `*` and `n` mean unbounded.
    fn count(&self, node: &Term, predicate: &str, field: &str) -> Result<Option<u64>, GraphError> {
        let value = match select_single(self.graph, node, predicate, field) {
            Ok(value) => value,
            Err(err) => err.degrade(self.diagnostics)?,
        };
        let lit = match value {
            Some(Term::Literal(lit)) => lit,
            Some(other) => {
                self.report_invalid(node, field, other.key());
                return Ok(None);
            }
            None => return Ok(None),
        };

        let lexical = lit.lexical.trim();
        if matches!(lexical, "*" | "n") {
            return Ok(None);
        }
        match lexical.parse::<u64>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                self.report_invalid(node, field, lit.lexical.clone());
                Ok(None)
            }
        }
    }

    fn report_invalid(&self, node: &Term, field: &str, value: String) {
        self.diagnostics.report(ResolveFault::InvalidValue {
            subject: node.key(),
            field: field.to_string(),
            value,
        });
    }
}
