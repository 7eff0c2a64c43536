//! Scope filter: keep only entities published by this document.

use rayon::prelude::*;

use vocab_graph::{GraphError, GraphSource};

use crate::config::Vocabulary;
use crate::diagnostics::Diagnostics;
use crate::entity::{EntityRef, Scope};
use crate::error::{LookupError, ResolveFault};

/// Read the single scope annotation of `entity`.
pub fn resolve_scope<G: GraphSource + ?Sized>(
    graph: &G,
    vocab: &Vocabulary,
    entity: &EntityRef,
) -> Result<Scope, LookupError> {
    let values = graph.objects(&entity.node, &vocab.scope)?;
    match values.as_slice() {
        [] => Err(ResolveFault::MissingScope {
            subject: entity.key(),
        }
        .into()),
        [value] => Ok(vocab.scope_of(value)),
        many => Err(ResolveFault::AmbiguousScope {
            subject: entity.key(),
            count: many.len(),
        }
        .into()),
    }
}

/// Candidates whose scope is exactly `InPackage`, in input order.
///
/// Missing or conflicting scope is reported and the entity dropped; external
/// and unspecified entities are dropped silently (their owning document
/// documents them).
pub fn filter_in_scope<G: GraphSource + ?Sized>(
    graph: &G,
    vocab: &Vocabulary,
    candidates: &[EntityRef],
    diagnostics: &Diagnostics,
) -> Result<Vec<EntityRef>, GraphError> {
    let kept: Vec<Option<EntityRef>> = candidates
        .par_iter()
        .map(|entity| match resolve_scope(graph, vocab, entity) {
            Ok(Scope::InPackage) => Ok(Some(entity.clone())),
            Ok(scope) => {
                tracing::trace!(subject = %entity.key(), ?scope, "out of package");
                Ok(None)
            }
            Err(LookupError::Fault(fault)) => {
                diagnostics.report(fault);
                Ok(None)
            }
            Err(LookupError::Graph(err)) => Err(err),
        })
        .collect::<Result<_, GraphError>>()?;

    Ok(kept.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::entity::EntityKind;
    use vocab_graph::ns::{example, scope};
    use vocab_graph::{Literal, Term, TripleStore};

    fn class(iri: &str) -> EntityRef {
        EntityRef::new(Term::iri(iri), EntityKind::Class)
    }

    #[test]
    fn keeps_only_in_package_entities() {
        let mut store = TripleStore::new();
        store.add(Term::iri("http://x/A"), example::SCOPE, Term::iri(scope::IN_PACKAGE));
        store.add(Term::iri("http://x/B"), example::SCOPE, Term::iri(scope::EXTERNAL));
        store.add(Term::iri("http://x/C"), example::SCOPE, Term::iri(scope::IN_PACKAGE));
        store.add(Term::iri("http://x/C"), example::SCOPE, Term::iri(scope::EXTERNAL));

        let diagnostics = Diagnostics::new();
        let kept = filter_in_scope(
            &store,
            &Vocabulary::default(),
            &[
                class("http://x/A"),
                class("http://x/B"),
                class("http://x/C"),
                class("http://x/D"),
            ],
            &diagnostics,
        )
        .unwrap();

        assert_eq!(kept, vec![class("http://x/A")]);

        let reported = diagnostics.into_sorted();
        let kinds: Vec<_> = reported.iter().map(|d| (d.subject.as_str(), d.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("http://x/C", DiagnosticKind::AmbiguousScope),
                ("http://x/D", DiagnosticKind::MissingScope),
            ]
        );
    }

    #[test]
    fn unknown_and_literal_scopes_are_dropped_without_diagnostics() {
        let mut store = TripleStore::new();
        store.add(Term::iri("http://x/A"), example::SCOPE, Term::iri(scope::IN_PACKAGE));
        store.add(
            Term::iri("http://x/B"),
            example::SCOPE,
            Term::iri("https://data.vlaanderen.be/id/concept/scope/Elders"),
        );
        store.add(
            Term::iri("http://x/C"),
            example::SCOPE,
            Term::Literal(Literal::plain(scope::IN_PACKAGE)),
        );

        let vocab = Vocabulary::default();
        assert_eq!(
            resolve_scope(&store, &vocab, &class("http://x/B")).unwrap(),
            Scope::Unspecified
        );
        assert_eq!(
            resolve_scope(&store, &vocab, &class("http://x/C")).unwrap(),
            Scope::Unspecified
        );

        let diagnostics = Diagnostics::new();
        let kept = filter_in_scope(
            &store,
            &vocab,
            &[class("http://x/A"), class("http://x/B"), class("http://x/C")],
            &diagnostics,
        )
        .unwrap();
        assert_eq!(kept, vec![class("http://x/A")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_scope_is_a_fault_not_a_default() {
        let store = TripleStore::new();
        let err = resolve_scope(&store, &Vocabulary::default(), &class("http://x/A")).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Fault(ResolveFault::MissingScope { .. })
        ));
    }
}
