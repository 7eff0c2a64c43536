//! Vocabulary model resolution.
//!
//! Turns the RDF graph emitted by the UML-to-RDF conversion into ordered,
//! per-entity documentation records for one language:
//!
//! 1. discover classes and properties ([`entity`])
//! 2. keep those published by this document ([`scope`])
//! 3. pick the one literal per field in the target language ([`literal`])
//! 4. resolve parent edges, falling back to reified statements when the
//!    target is not annotated itself ([`reification`])
//! 5. assemble records ([`assemble`]) and sort them ([`order`])
//!
//! Per-entity problems are reported as [`Diagnostic`]s and never abort the
//! run. Only a graph that cannot answer queries (or a graph that does not
//! carry scope annotations at all) is fatal.

pub mod assemble;
pub mod cancel;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod literal;
pub mod order;
pub mod record;
pub mod reification;
pub mod scope;

use serde::{Deserialize, Serialize};

use vocab_graph::GraphSource;

pub use assemble::Assembler;
pub use cancel::CancellationToken;
pub use config::{ConfigError, DocumentContext, ResolverConfig, Vocabulary};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use entity::{discover_candidates, EntityKind, EntityRef, Scope};
pub use error::{LookupError, ResolveError, ResolveFault};
pub use literal::{select_literal, FieldKind};
pub use order::order;
pub use record::{
    ClassRecord, Documentation, LocalizedText, ParentRef, PropertyRecord, Record, RecordBuilder,
};
pub use reification::{ReificationResolver, ResolvedRelationship, ResolvedVia};
pub use scope::filter_in_scope;

/// Result of one resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutput {
    pub document_url: String,
    pub language: String,
    pub records: Vec<Record>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolutionOutput {
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Resolution engine over one immutable graph snapshot.
///
/// Construction validates the configuration and starts the worker pool, so
/// a resolver that exists is ready to run.
pub struct Resolver<G> {
    graph: G,
    config: ResolverConfig,
    pool: rayon::ThreadPool,
}

impl<G: GraphSource> Resolver<G> {
    pub fn new(graph: G, config: ResolverConfig) -> Result<Self, ResolveError> {
        config.validate()?;

        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("vocab-resolve-{i}"));
        if let Some(workers) = config.parallelism {
            builder = builder.num_threads(workers);
        }
        let pool = builder
            .build()
            .map_err(|e| ResolveError::WorkerPool(e.to_string()))?;

        Ok(Self {
            graph,
            config,
            pool,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn run(&self) -> Result<ResolutionOutput, ResolveError> {
        self.run_with_cancel(&CancellationToken::new())
    }

    pub fn run_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ResolutionOutput, ResolveError> {
        let vocab = &self.config.vocabulary;
        let diagnostics = Diagnostics::new();

        let candidates = discover_candidates(&self.graph, vocab, &diagnostics)?;
        if !candidates.is_empty() && !self.graph.has_predicate(&vocab.scope)? {
            return Err(ResolveError::ScopePredicateUnindexed {
                predicate: vocab.scope.clone(),
                candidates: candidates.len(),
            });
        }

        let records = self.pool.install(|| -> Result<Vec<Record>, ResolveError> {
            let in_scope = filter_in_scope(&self.graph, vocab, &candidates, &diagnostics)?;
            if cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }
            tracing::debug!(
                candidates = candidates.len(),
                in_scope = in_scope.len(),
                "scope filter done"
            );
            Assembler::new(&self.graph, &self.config, &diagnostics).assemble(&in_scope, cancel)
        })?;

        let records = order(records);
        let diagnostics = diagnostics.into_sorted();
        let output = ResolutionOutput {
            document_url: self.config.document.document_url(),
            language: self.config.language.clone(),
            records,
            diagnostics,
        };

        tracing::info!(
            language = %output.language,
            records = output.records.len(),
            errors = output.error_count(),
            warnings = output.warning_count(),
            "vocabulary resolved"
        );
        Ok(output)
    }
}
