//! Run configuration: target language, document identity, and the table of
//! IRIs the resolver consults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use vocab_graph::ns::{example, owl, rdf, rdfs, scope, sh, vann};
use vocab_graph::Term;

use crate::entity::Scope;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Identity of the document being published. Only echoed in the output;
/// resolution itself does not read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContext {
    pub base_uri: String,
    pub document_id: String,
}

impl DocumentContext {
    pub fn new(base_uri: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            document_id: document_id.into(),
        }
    }

    pub fn document_url(&self) -> String {
        format!("{}{}", self.base_uri, self.document_id)
    }
}

/// Predicate and class IRIs used to read the graph.
///
/// Defaults follow the conventions of the UML-to-RDF converter. Every field
/// can be overridden from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vocabulary {
    pub rdf_type: String,
    pub class: String,
    pub datatype_property: String,
    pub object_property: String,

    pub scope: String,
    pub assigned_uri: String,
    pub in_package_scopes: Vec<String>,
    pub external_scopes: Vec<String>,

    pub label: String,
    pub definition: String,
    pub usage_note: String,

    pub subclass_of: String,
    pub subproperty_of: String,
    pub domain: String,
    pub range: String,
    pub min_count: String,
    pub max_count: String,

    pub statement: String,
    pub statement_subject: String,
    pub statement_predicate: String,
    pub statement_object: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            rdf_type: rdf::TYPE.to_string(),
            class: owl::CLASS.to_string(),
            datatype_property: owl::DATATYPE_PROPERTY.to_string(),
            object_property: owl::OBJECT_PROPERTY.to_string(),

            scope: example::SCOPE.to_string(),
            assigned_uri: example::ASSIGNED_URI.to_string(),
            in_package_scopes: vec![scope::IN_PACKAGE.to_string()],
            external_scopes: vec![
                scope::EXTERNAL.to_string(),
                scope::IN_PUBLICATION_ENVIRONMENT.to_string(),
            ],

            label: rdfs::LABEL.to_string(),
            definition: rdfs::COMMENT.to_string(),
            usage_note: vann::USAGE_NOTE.to_string(),

            subclass_of: rdfs::SUB_CLASS_OF.to_string(),
            subproperty_of: rdfs::SUB_PROPERTY_OF.to_string(),
            domain: rdfs::DOMAIN.to_string(),
            range: rdfs::RANGE.to_string(),
            min_count: sh::MIN_COUNT.to_string(),
            max_count: sh::MAX_COUNT.to_string(),

            statement: rdf::STATEMENT.to_string(),
            statement_subject: rdf::SUBJECT.to_string(),
            statement_predicate: rdf::PREDICATE.to_string(),
            statement_object: rdf::OBJECT.to_string(),
        }
    }
}

impl Vocabulary {
    /// Classify one scope annotation value. Unknown IRIs and literals are
    /// `Unspecified`.
    pub fn scope_of(&self, value: &Term) -> Scope {
        let Some(iri) = value.as_iri() else {
            return Scope::Unspecified;
        };
        if self.in_package_scopes.iter().any(|s| s == iri) {
            Scope::InPackage
        } else if self.external_scopes.iter().any(|s| s == iri) {
            Scope::External
        } else {
            Scope::Unspecified
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Language tag records are resolved for (exact match, e.g. `nl`).
    pub language: String,
    pub document: DocumentContext,
    pub vocabulary: Vocabulary,
    /// Worker threads; `None` uses available parallelism.
    pub parallelism: Option<usize>,
}

impl ResolverConfig {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn with_document(mut self, document: DocumentContext) -> Self {
        self.document = document;
        self
    }

    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.trim().is_empty() {
            return Err(ConfigError::Invalid("language must not be empty".to_string()));
        }
        if self.parallelism == Some(0) {
            return Err(ConfigError::Invalid(
                "parallelism must be at least 1".to_string(),
            ));
        }
        if self.vocabulary.scope.is_empty() || self.vocabulary.assigned_uri.is_empty() {
            return Err(ConfigError::Invalid(
                "scope and assignedUri predicates must be set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_vocabulary_defaults() {
        let config = ResolverConfig::from_json_str(
            r#"{
                "language": "nl",
                "document": { "baseUri": "https://data.example.be/", "documentId": "persoon" },
                "vocabulary": { "label": "http://www.w3.org/2004/02/skos/core#prefLabel" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.language, "nl");
        assert_eq!(
            config.document.document_url(),
            "https://data.example.be/persoon"
        );
        assert_eq!(
            config.vocabulary.label,
            "http://www.w3.org/2004/02/skos/core#prefLabel"
        );
        assert_eq!(config.vocabulary.definition, rdfs::COMMENT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_language_is_rejected() {
        let config = ResolverConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(ResolverConfig::new("nl").with_parallelism(0).validate().is_err());
    }

    #[test]
    fn scope_values_are_classified() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.scope_of(&Term::iri(scope::IN_PACKAGE)), Scope::InPackage);
        assert_eq!(
            vocab.scope_of(&Term::iri(scope::IN_PUBLICATION_ENVIRONMENT)),
            Scope::External
        );
        assert_eq!(
            vocab.scope_of(&Term::iri("http://x/other")),
            Scope::Unspecified
        );
    }
}
