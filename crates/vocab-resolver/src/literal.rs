//! Localized literal selection.
//!
//! Exactly one literal per `(subject, field, language)` is allowed. There is
//! no fallback chain and no wildcard: a field without a value in the
//! requested language is simply absent.

use serde::{Deserialize, Serialize};
use std::fmt;

use vocab_graph::{GraphSource, Literal, Term};

use crate::config::Vocabulary;
use crate::error::{LookupError, ResolveFault};

/// Language-tagged documentation fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Label,
    Definition,
    UsageNote,
}

impl FieldKind {
    pub fn predicate(self, vocab: &Vocabulary) -> &str {
        match self {
            FieldKind::Label => &vocab.label,
            FieldKind::Definition => &vocab.definition,
            FieldKind::UsageNote => &vocab.usage_note,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Label => "label",
            FieldKind::Definition => "definition",
            FieldKind::UsageNote => "usageNote",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The literal of `field` on `subject` tagged exactly `language`, if any.
pub fn select_literal<G: GraphSource + ?Sized>(
    graph: &G,
    vocab: &Vocabulary,
    subject: &Term,
    field: FieldKind,
    language: &str,
) -> Result<Option<Literal>, LookupError> {
    let mut matches: Vec<Literal> = graph
        .objects(subject, field.predicate(vocab))?
        .into_iter()
        .filter_map(|term| match term {
            Term::Literal(lit) if lit.language.as_deref() == Some(language) => Some(lit),
            _ => None,
        })
        .collect();

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        count => Err(ResolveFault::AmbiguousLiteral {
            subject: subject.key(),
            field,
            language: language.to_string(),
            count,
        }
        .into()),
    }
}

/// The only value of a single-valued, untagged `predicate`, if any.
///
/// `field` names the value in the fault raised when there is more than one.
pub fn select_single<G: GraphSource + ?Sized>(
    graph: &G,
    subject: &Term,
    predicate: &str,
    field: &str,
) -> Result<Option<Term>, LookupError> {
    let mut values = graph.objects(subject, predicate)?;
    match values.len() {
        0 => Ok(None),
        1 => Ok(values.pop()),
        count => Err(ResolveFault::ConflictingValue {
            subject: subject.key(),
            field: field.to_string(),
            count,
        }
        .into()),
    }
}
