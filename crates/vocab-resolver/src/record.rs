//! Documentation records: the engine's output unit.
//!
//! Optional fields are `None` when nothing resolved and are omitted from
//! serialized output; templating consumers rely on "present only if
//! resolved" rather than null checks.

use serde::{Deserialize, Serialize};

use vocab_graph::Literal;

use crate::entity::EntityKind;
use crate::reification::{ResolvedRelationship, ResolvedVia};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalizedText {
    pub value: String,
    pub language: String,
}

impl LocalizedText {
    /// Converts a literal selected for `language`; the selector guarantees
    /// the tag, so `language` is only a fallback for untagged input.
    pub fn from_literal(literal: Literal, language: &str) -> Self {
        Self {
            value: literal.lexical,
            language: literal.language.unwrap_or_else(|| language.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_note: Option<LocalizedText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LocalizedText>,
    pub via: ResolvedVia,
}

impl ParentRef {
    pub fn from_relationship(rel: ResolvedRelationship, language: &str) -> Self {
        Self {
            id: rel.id,
            label: rel.label.map(|l| LocalizedText::from_literal(l, language)),
            via: rel.via,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub id: String,
    /// Graph identifier of the originating subject.
    pub node: String,
    #[serde(flatten)]
    pub docs: Documentation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: String,
    pub node: String,
    #[serde(flatten)]
    pub docs: Documentation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Record {
    Class(ClassRecord),
    DatatypeProperty(PropertyRecord),
    ObjectProperty(PropertyRecord),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::Class(r) => &r.id,
            Record::DatatypeProperty(r) | Record::ObjectProperty(r) => &r.id,
        }
    }

    pub fn node(&self) -> &str {
        match self {
            Record::Class(r) => &r.node,
            Record::DatatypeProperty(r) | Record::ObjectProperty(r) => &r.node,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Class(_) => EntityKind::Class,
            Record::DatatypeProperty(_) => EntityKind::DatatypeProperty,
            Record::ObjectProperty(_) => EntityKind::ObjectProperty,
        }
    }

    pub fn docs(&self) -> &Documentation {
        match self {
            Record::Class(r) => &r.docs,
            Record::DatatypeProperty(r) | Record::ObjectProperty(r) => &r.docs,
        }
    }

    pub fn parents(&self) -> &[ParentRef] {
        match self {
            Record::Class(r) => &r.parents,
            Record::DatatypeProperty(r) | Record::ObjectProperty(r) => &r.parents,
        }
    }

    pub(crate) fn parents_mut(&mut self) -> &mut Vec<ParentRef> {
        match self {
            Record::Class(r) => &mut r.parents,
            Record::DatatypeProperty(r) | Record::ObjectProperty(r) => &mut r.parents,
        }
    }
}

/// Accumulates resolved values for one entity. Property-only setters are
/// ignored when building a class record.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    kind: EntityKind,
    id: String,
    node: String,
    docs: Documentation,
    parents: Vec<ParentRef>,
    domain: Option<String>,
    range: Option<String>,
    min_count: Option<u64>,
    max_count: Option<u64>,
}

impl RecordBuilder {
    pub fn new(kind: EntityKind, id: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            node: node.into(),
            docs: Documentation::default(),
            parents: Vec::new(),
            domain: None,
            range: None,
            min_count: None,
            max_count: None,
        }
    }

    pub fn label(mut self, label: Option<LocalizedText>) -> Self {
        self.docs.label = label;
        self
    }

    pub fn definition(mut self, definition: Option<LocalizedText>) -> Self {
        self.docs.definition = definition;
        self
    }

    pub fn usage_note(mut self, usage_note: Option<LocalizedText>) -> Self {
        self.docs.usage_note = usage_note;
        self
    }

    pub fn parent(mut self, parent: ParentRef) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain;
        self
    }

    pub fn range(mut self, range: Option<String>) -> Self {
        self.range = range;
        self
    }

    pub fn cardinality(mut self, min_count: Option<u64>, max_count: Option<u64>) -> Self {
        self.min_count = min_count;
        self.max_count = max_count;
        self
    }

    pub fn build(self) -> Record {
        let RecordBuilder {
            kind,
            id,
            node,
            docs,
            parents,
            domain,
            range,
            min_count,
            max_count,
        } = self;

        if kind == EntityKind::Class {
            return Record::Class(ClassRecord {
                id,
                node,
                docs,
                parents,
            });
        }

        let property = PropertyRecord {
            id,
            node,
            docs,
            domain,
            range,
            min_count,
            max_count,
            parents,
        };
        if kind == EntityKind::DatatypeProperty {
            Record::DatatypeProperty(property)
        } else {
            Record::ObjectProperty(property)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let record = RecordBuilder::new(EntityKind::Class, "https://pub/C", "http://x/C")
            .label(Some(LocalizedText {
                value: "Klasse".into(),
                language: "nl".into(),
            }))
            .domain(Some("ignored for classes".into()))
            .build();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "class",
                "id": "https://pub/C",
                "node": "http://x/C",
                "label": { "value": "Klasse", "language": "nl" }
            })
        );
    }

    #[test]
    fn property_record_carries_constraints() {
        let record = RecordBuilder::new(EntityKind::ObjectProperty, "https://pub/p", "http://x/p")
            .domain(Some("https://pub/C".into()))
            .cardinality(Some(1), None)
            .build();

        assert_eq!(record.kind(), EntityKind::ObjectProperty);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kind"], "objectProperty");
        assert_eq!(value["domain"], "https://pub/C");
        assert_eq!(value["minCount"], 1);
        assert!(value.get("maxCount").is_none());
        assert!(value.get("parents").is_none());
    }
}
