//! RDF term model.
//!
//! Terms are plain owned values: the graph is small enough (one document's
//! vocabulary) that interning happens inside [`crate::TripleStore`] only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::GraphError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Term {
    Iri(String),
    BlankNode(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn bnode(id: impl Into<String>) -> Self {
        Term::BlankNode(id.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// IRI or blank node (anything that may appear in subject position).
    pub fn is_node(&self) -> bool {
        !matches!(self, Term::Literal(_))
    }

    /// Stable textual key: the IRI itself, `_:id` for blank nodes, the
    /// lexical form for literals.
    pub fn key(&self) -> String {
        match self {
            Term::Iri(iri) => iri.clone(),
            Term::BlankNode(id) => format!("_:{id}"),
            Term::Literal(lit) => lit.lexical.clone(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "_:{id}"),
            Term::Literal(lit) => {
                write!(f, "\"{}\"", escape_rdf_string(&lit.lexical))?;
                if let Some(lang) = &lit.language {
                    write!(f, "@{lang}")
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// One asserted fact. Predicates are always IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

fn escape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse the N-Triples-like display form that sophia terms print as.
pub(crate) fn parse_term_display(term: &str) -> Result<Term, GraphError> {
    let s = term.trim();

    if let Some(rest) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(Term::Iri(rest.to_string()));
    }

    if let Some(rest) = s.strip_prefix("_:") {
        return Ok(Term::BlankNode(rest.to_string()));
    }

    if s.starts_with('"') {
        let mut end_quote = None;
        let mut escaped = false;
        for (i, ch) in s.char_indices().skip(1) {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '"' => {
                    end_quote = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let Some(end) = end_quote else {
            return Err(GraphError::Parse(format!(
                "invalid literal term (missing closing quote): {s}"
            )));
        };

        let lexical = unescape_rdf_string(&s[1..end]);
        let rest = s[end + 1..].trim();

        let mut language = None;
        let mut datatype = None;
        if let Some(lang) = rest.strip_prefix('@') {
            language = Some(lang.to_string());
        } else if let Some(dt) = rest.strip_prefix("^^") {
            let dt = dt.trim();
            if let Some(dt_iri) = dt.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
                datatype = Some(dt_iri.to_string());
            } else if !dt.is_empty() {
                datatype = Some(dt.to_string());
            }
        }

        return Ok(Term::Literal(Literal {
            lexical,
            datatype,
            language,
        }));
    }

    Err(GraphError::Parse(format!("unsupported RDF term form: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_tagged_literal() {
        let term = parse_term_display("\"Persoon\"@nl").unwrap();
        assert_eq!(term, Term::Literal(Literal::lang("Persoon", "nl")));
    }

    #[test]
    fn parses_typed_literal_with_escapes() {
        let term =
            parse_term_display(r#""a \"quoted\" word"^^<http://www.w3.org/2001/XMLSchema#string>"#)
                .unwrap();
        let lit = term.as_literal().unwrap();
        assert_eq!(lit.lexical, "a \"quoted\" word");
        assert_eq!(
            lit.datatype.as_deref(),
            Some("http://www.w3.org/2001/XMLSchema#string")
        );
    }

    #[test]
    fn display_then_parse_keeps_term() {
        let term = Term::Literal(Literal::lang("line\nbreak", "en"));
        assert_eq!(parse_term_display(&term.to_string()).unwrap(), term);
    }

    #[test]
    fn rejects_unterminated_literal() {
        assert!(parse_term_display("\"open").is_err());
    }

    #[test]
    fn blank_node_key_is_prefixed() {
        assert_eq!(Term::bnode("b0").key(), "_:b0");
        assert_eq!(Term::iri("http://x/A").key(), "http://x/A");
    }
}
