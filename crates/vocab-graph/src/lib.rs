//! Read-only RDF graph facade for vocabulary resolution.
//!
//! This crate is the **query boundary** of the workspace:
//!
//! - It parses RDF produced by the UML-to-RDF conversion (untrusted input).
//! - It exposes a single pattern-lookup capability ([`GraphSource`]).
//! - It does *not* interpret vocabulary semantics (`vocab-resolver` does that).
//!
//! Parsing uses **Sophia** for the common serializations:
//! - N-Triples (`.nt`)
//! - Turtle (`.ttl`)
//! - N-Quads (`.nq`)
//! - TriG (`.trig`)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)

pub mod ns;
mod parse;
mod store;
mod term;

pub use parse::{parse_triples, RdfFormat};
pub use store::TripleStore;
pub use term::{Literal, Term, Triple};

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unsupported RDF format: .{0}")]
    UnsupportedFormat(String),
    /// The backing graph cannot answer queries at all.
    #[error("graph unavailable: {0}")]
    Unavailable(String),
}

/// Pattern lookup over an immutable graph snapshot.
///
/// `None` in any position is a wildcard. Implementations must be safe to
/// query from many worker threads at once; nothing here mutates.
pub trait GraphSource: Send + Sync {
    fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Result<Vec<Triple>, GraphError>;

    /// All objects of `(subject, predicate, ?)`.
    fn objects(&self, subject: &Term, predicate: &str) -> Result<Vec<Term>, GraphError> {
        Ok(self
            .triples_matching(Some(subject), Some(predicate), None)?
            .into_iter()
            .map(|t| t.object)
            .collect())
    }

    /// All subjects of `(?, predicate, object)`.
    fn subjects(&self, predicate: &str, object: &Term) -> Result<Vec<Term>, GraphError> {
        Ok(self
            .triples_matching(None, Some(predicate), Some(object))?
            .into_iter()
            .map(|t| t.subject)
            .collect())
    }

    /// Whether any triple matches. Implementations with an index should
    /// answer without materializing the matches.
    fn matches_any(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Result<bool, GraphError> {
        Ok(!self
            .triples_matching(subject, predicate, object)?
            .is_empty())
    }

    fn has_predicate(&self, predicate: &str) -> Result<bool, GraphError> {
        self.matches_any(None, Some(predicate), None)
    }
}

impl<G: GraphSource + ?Sized> GraphSource for &G {
    fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Result<Vec<Triple>, GraphError> {
        (**self).triples_matching(subject, predicate, object)
    }

    fn matches_any(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Result<bool, GraphError> {
        (**self).matches_any(subject, predicate, object)
    }
}

impl<G: GraphSource + ?Sized> GraphSource for std::sync::Arc<G> {
    fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Result<Vec<Triple>, GraphError> {
        (**self).triples_matching(subject, predicate, object)
    }

    fn matches_any(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Result<bool, GraphError> {
        (**self).matches_any(subject, predicate, object)
    }
}
