//! Entity references and candidate discovery.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use vocab_graph::{GraphError, GraphSource, Term};

use crate::config::Vocabulary;
use crate::diagnostics::Diagnostics;
use crate::error::ResolveFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Class,
    DatatypeProperty,
    ObjectProperty,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Class,
        EntityKind::DatatypeProperty,
        EntityKind::ObjectProperty,
    ];

    pub fn is_property(self) -> bool {
        !matches!(self, EntityKind::Class)
    }

    pub fn type_iri(self, vocab: &Vocabulary) -> &str {
        match self {
            EntityKind::Class => &vocab.class,
            EntityKind::DatatypeProperty => &vocab.datatype_property,
            EntityKind::ObjectProperty => &vocab.object_property,
        }
    }

    /// Predicate whose edges become the record's parents.
    pub fn parent_relation(self, vocab: &Vocabulary) -> &str {
        match self {
            EntityKind::Class => &vocab.subclass_of,
            EntityKind::DatatypeProperty | EntityKind::ObjectProperty => &vocab.subproperty_of,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    InPackage,
    External,
    Unspecified,
}

/// A graph subject known to be a class or property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub node: Term,
    pub kind: EntityKind,
}

impl EntityRef {
    pub fn new(node: Term, kind: EntityKind) -> Self {
        Self { node, kind }
    }

    pub fn key(&self) -> String {
        self.node.key()
    }
}

/// Every subject typed as a class or property, in term order.
///
/// A subject typed as more than one kind is reported and skipped.
pub fn discover_candidates<G: GraphSource + ?Sized>(
    graph: &G,
    vocab: &Vocabulary,
    diagnostics: &Diagnostics,
) -> Result<Vec<EntityRef>, GraphError> {
    let mut kinds: BTreeMap<Term, BTreeSet<EntityKind>> = BTreeMap::new();
    for kind in EntityKind::ALL {
        let type_iri = Term::iri(kind.type_iri(vocab));
        for subject in graph.subjects(&vocab.rdf_type, &type_iri)? {
            kinds.entry(subject).or_default().insert(kind);
        }
    }

    let mut out = Vec::with_capacity(kinds.len());
    for (node, kinds) in kinds {
        let mut iter = kinds.into_iter();
        match (iter.next(), iter.next()) {
            (Some(kind), None) => out.push(EntityRef::new(node, kind)),
            _ => diagnostics.report(ResolveFault::ConflictingKind {
                subject: node.key(),
            }),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_graph::ns::{owl, rdf};
    use vocab_graph::TripleStore;

    #[test]
    fn discovers_each_kind_and_rejects_double_typing() {
        let mut store = TripleStore::new();
        store.add(Term::iri("http://x/B"), rdf::TYPE, Term::iri(owl::CLASS));
        store.add(Term::iri("http://x/A"), rdf::TYPE, Term::iri(owl::CLASS));
        store.add(
            Term::iri("http://x/p"),
            rdf::TYPE,
            Term::iri(owl::DATATYPE_PROPERTY),
        );
        store.add(Term::iri("http://x/q"), rdf::TYPE, Term::iri(owl::CLASS));
        store.add(
            Term::iri("http://x/q"),
            rdf::TYPE,
            Term::iri(owl::OBJECT_PROPERTY),
        );

        let diagnostics = Diagnostics::new();
        let found = discover_candidates(&store, &Vocabulary::default(), &diagnostics).unwrap();

        assert_eq!(
            found,
            vec![
                EntityRef::new(Term::iri("http://x/A"), EntityKind::Class),
                EntityRef::new(Term::iri("http://x/B"), EntityKind::Class),
                EntityRef::new(Term::iri("http://x/p"), EntityKind::DatatypeProperty),
            ]
        );
        let reported = diagnostics.into_sorted();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].subject, "http://x/q");
    }
}
