//! In-memory triple store with per-position bitmap indexes.
//!
//! Every distinct term is interned to a `u32`, every distinct triple gets a
//! `u32` triple id, and three indexes map
//!
//! - `subject id   -> {triple ids}`
//! - `predicate id -> {triple ids}`
//! - `object id    -> {triple ids}`
//!
//! A pattern with any combination of bound positions is answered by
//! intersecting the bitmaps of the bound positions. The store is built once
//! (append-only) and then only queried; it implements [`GraphSource`].

use ahash::{AHashMap, AHashSet};
use roaring::RoaringBitmap;

use crate::{GraphError, GraphSource, Term, Triple};

#[derive(Debug, Default, Clone)]
pub struct TripleStore {
    terms: Vec<Term>,
    term_ids: AHashMap<Term, u32>,
    triples: Vec<[u32; 3]>,
    seen: AHashSet<[u32; 3]>,
    by_subject: AHashMap<u32, RoaringBitmap>,
    by_predicate: AHashMap<u32, RoaringBitmap>,
    by_object: AHashMap<u32, RoaringBitmap>,
}

impl TripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Insert one triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let s = self.intern(triple.subject);
        let p = self.intern(Term::Iri(triple.predicate));
        let o = self.intern(triple.object);

        let key = [s, p, o];
        if !self.seen.insert(key) {
            return false;
        }

        let id = self.triples.len() as u32;
        self.triples.push(key);
        self.by_subject.entry(s).or_default().insert(id);
        self.by_predicate.entry(p).or_default().insert(id);
        self.by_object.entry(o).or_default().insert(id);
        true
    }

    pub fn add(&mut self, subject: Term, predicate: &str, object: Term) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.triples.iter().map(|key| self.materialize(*key))
    }

    fn intern(&mut self, term: Term) -> u32 {
        if let Some(&id) = self.term_ids.get(&term) {
            return id;
        }
        let id = self.terms.len() as u32;
        self.terms.push(term.clone());
        self.term_ids.insert(term, id);
        id
    }

    fn materialize(&self, [s, p, o]: [u32; 3]) -> Triple {
        let predicate = match &self.terms[p as usize] {
            Term::Iri(iri) => iri.clone(),
            other => other.key(),
        };
        Triple {
            subject: self.terms[s as usize].clone(),
            predicate,
            object: self.terms[o as usize].clone(),
        }
    }

    /// Whether any triple matches, stopping at the first common id.
    fn any_match(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> bool {
        let mut bitmaps: Vec<&RoaringBitmap> = Vec::with_capacity(3);
        let bound = [
            (subject.cloned(), &self.by_subject),
            (predicate.map(|p| Term::Iri(p.to_string())), &self.by_predicate),
            (object.cloned(), &self.by_object),
        ];
        for (term, index) in bound {
            let Some(term) = term else { continue };
            match self.term_ids.get(&term).and_then(|id| index.get(id)) {
                Some(bitmap) => bitmaps.push(bitmap),
                None => return false,
            }
        }

        bitmaps.sort_by_key(|b| b.len());
        let Some((first, rest)) = bitmaps.split_first() else {
            return !self.triples.is_empty();
        };
        first.iter().any(|id| rest.iter().all(|b| b.contains(id)))
    }

    /// Triple ids matching the pattern, in insertion order.
    fn matching_ids(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> RoaringBitmap {
        let mut bitmaps: Vec<&RoaringBitmap> = Vec::with_capacity(3);

        if let Some(subject) = subject {
            match self
                .term_ids
                .get(subject)
                .and_then(|id| self.by_subject.get(id))
            {
                Some(bitmap) => bitmaps.push(bitmap),
                None => return RoaringBitmap::new(),
            }
        }
        if let Some(predicate) = predicate {
            let key = Term::Iri(predicate.to_string());
            match self
                .term_ids
                .get(&key)
                .and_then(|id| self.by_predicate.get(id))
            {
                Some(bitmap) => bitmaps.push(bitmap),
                None => return RoaringBitmap::new(),
            }
        }
        if let Some(object) = object {
            match self
                .term_ids
                .get(object)
                .and_then(|id| self.by_object.get(id))
            {
                Some(bitmap) => bitmaps.push(bitmap),
                None => return RoaringBitmap::new(),
            }
        }

        // Smallest first keeps the intersection cheap.
        bitmaps.sort_by_key(|b| b.len());
        let mut iter = bitmaps.into_iter();
        match iter.next() {
            Some(first) => iter.fold(first.clone(), |acc, next| acc & next),
            None => (0..self.triples.len() as u32).collect(),
        }
    }
}

impl Extend<Triple> for TripleStore {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = TripleStore::new();
        store.extend(iter);
        store
    }
}

impl GraphSource for TripleStore {
    fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Result<Vec<Triple>, GraphError> {
        Ok(self
            .matching_ids(subject, predicate, object)
            .iter()
            .map(|id| self.materialize(self.triples[id as usize]))
            .collect())
    }

    fn matches_any(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Result<bool, GraphError> {
        Ok(self.any_match(subject, predicate, object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Literal;

    const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    const SUB: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    fn sample() -> TripleStore {
        let mut store = TripleStore::new();
        store.add(Term::iri("http://x/A"), LABEL, Term::Literal(Literal::lang("A", "nl")));
        store.add(Term::iri("http://x/A"), LABEL, Term::Literal(Literal::lang("A", "en")));
        store.add(Term::iri("http://x/A"), SUB, Term::iri("http://x/B"));
        store.add(Term::iri("http://x/B"), LABEL, Term::Literal(Literal::lang("B", "nl")));
        store
    }

    #[test]
    fn duplicate_triples_are_stored_once() {
        let mut store = sample();
        assert_eq!(store.len(), 4);
        assert!(!store.add(Term::iri("http://x/A"), SUB, Term::iri("http://x/B")));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn pattern_intersection_uses_all_bound_positions() {
        let store = sample();
        let hits = store
            .triples_matching(Some(&Term::iri("http://x/A")), Some(LABEL), None)
            .unwrap();
        assert_eq!(hits.len(), 2);

        let hits = store
            .triples_matching(None, Some(LABEL), Some(&Term::Literal(Literal::lang("B", "nl"))))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].subject, Term::iri("http://x/B"));
    }

    #[test]
    fn unknown_bound_term_matches_nothing() {
        let store = sample();
        let hits = store
            .triples_matching(Some(&Term::iri("http://x/Missing")), None, None)
            .unwrap();
        assert!(hits.is_empty());
        assert!(store
            .triples_matching(None, Some("http://x/unknown"), None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn matches_any_agrees_with_full_lookup() {
        let store = sample();
        let a = Term::iri("http://x/A");
        let b = Term::iri("http://x/B");
        assert!(store.has_predicate(SUB).unwrap());
        assert!(!store.has_predicate("http://x/unknown").unwrap());
        assert!(store.matches_any(Some(&a), Some(SUB), Some(&b)).unwrap());
        assert!(!store.matches_any(Some(&b), Some(SUB), None).unwrap());
        assert!(!store.matches_any(Some(&a), Some(SUB), Some(&a)).unwrap());
        assert!(store.matches_any(None, None, None).unwrap());
        assert!(!TripleStore::new().matches_any(None, None, None).unwrap());
    }

    #[test]
    fn unbound_pattern_returns_everything() {
        let store = sample();
        assert_eq!(store.triples_matching(None, None, None).unwrap().len(), 4);
        assert_eq!(store.iter().count(), 4);
    }
}
