//! RDF parsing via Sophia.
//!
//! Sophia terms are converted through their N-Triples display form into our
//! owned [`Term`] model. Quads are flattened into the default graph: the
//! resolver works on one closed graph per document.

use sophia::api::prelude::*;
use sophia::api::triple::Triple as _;
use std::path::Path;

use crate::term::parse_term_display;
use crate::{GraphError, Term, Triple, TripleStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    NQuads,
    TriG,
    RdfXml,
}

impl RdfFormat {
    pub fn from_extension(ext: &str) -> Result<Self, GraphError> {
        match ext.to_lowercase().as_str() {
            "nt" | "ntriples" => Ok(RdfFormat::NTriples),
            "ttl" | "turtle" => Ok(RdfFormat::Turtle),
            "nq" | "nquads" => Ok(RdfFormat::NQuads),
            "trig" => Ok(RdfFormat::TriG),
            "rdf" | "owl" | "xml" => Ok(RdfFormat::RdfXml),
            other => Err(GraphError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct SinkError {
    message: String,
}

impl From<GraphError> for SinkError {
    fn from(value: GraphError) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

/// Build one [`Triple`] from display-form components. Non-IRI predicates
/// (generalized RDF) are skipped.
fn triple_from_display(s: &str, p: &str, o: &str) -> Result<Option<Triple>, SinkError> {
    let subject = parse_term_display(s)?;
    if !subject.is_node() {
        return Err(GraphError::Parse(format!("literal in subject position: {s}")).into());
    }
    let Term::Iri(predicate) = parse_term_display(p)? else {
        return Ok(None);
    };
    let object = parse_term_display(o)?;
    Ok(Some(Triple {
        subject,
        predicate,
        object,
    }))
}

pub fn parse_triples(bytes: &[u8], format: RdfFormat) -> Result<Vec<Triple>, GraphError> {
    let reader = std::io::BufReader::new(std::io::Cursor::new(bytes));
    let mut out: Vec<Triple> = Vec::new();

    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), SinkError> {
                    let triple = triple_from_display(
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )?;
                    out.extend(triple);
                    Ok(())
                })
                .map_err(|e| GraphError::Parse(format!("failed to parse N-Triples: {e}")))?;
        }
        RdfFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), SinkError> {
                    let triple = triple_from_display(
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )?;
                    out.extend(triple);
                    Ok(())
                })
                .map_err(|e| GraphError::Parse(format!("failed to parse Turtle: {e}")))?;
        }
        RdfFormat::NQuads => {
            let mut parser = sophia::turtle::parser::nq::parse_bufread(reader);
            parser
                .try_for_each_quad(|q| -> Result<(), SinkError> {
                    let triple = triple_from_display(
                        &q.s().to_string(),
                        &q.p().to_string(),
                        &q.o().to_string(),
                    )?;
                    out.extend(triple);
                    Ok(())
                })
                .map_err(|e| GraphError::Parse(format!("failed to parse N-Quads: {e}")))?;
        }
        RdfFormat::TriG => {
            let mut parser = sophia::turtle::parser::trig::parse_bufread(reader);
            parser
                .try_for_each_quad(|q| -> Result<(), SinkError> {
                    let triple = triple_from_display(
                        &q.s().to_string(),
                        &q.p().to_string(),
                        &q.o().to_string(),
                    )?;
                    out.extend(triple);
                    Ok(())
                })
                .map_err(|e| GraphError::Parse(format!("failed to parse TriG: {e}")))?;
        }
        RdfFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), SinkError> {
                    let triple = triple_from_display(
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )?;
                    out.extend(triple);
                    Ok(())
                })
                .map_err(|e| GraphError::Parse(format!("failed to parse RDF/XML: {e}")))?;
        }
    }

    Ok(out)
}

impl TripleStore {
    pub fn from_bytes(bytes: &[u8], format: RdfFormat) -> Result<Self, GraphError> {
        let triples = parse_triples(bytes, format)?;
        let parsed = triples.len();
        let store: TripleStore = triples.into_iter().collect();
        tracing::debug!(
            parsed,
            stored = store.len(),
            ?format,
            "loaded RDF graph"
        );
        Ok(store)
    }

    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let format = RdfFormat::from_path(path)?;
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, format)
    }
}
