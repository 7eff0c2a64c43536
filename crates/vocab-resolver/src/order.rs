//! Deterministic ordering of assembled records.
//!
//! Graph iteration order depends on insertion order and worker completion
//! order; neither may leak into published artifacts.

use crate::record::Record;

/// Sort records by resolved identifier (lexical), then by graph node and
/// kind to break ties between entities sharing an assigned URI. Parent
/// lists are sorted the same way.
pub fn order(mut records: Vec<Record>) -> Vec<Record> {
    for record in &mut records {
        record.parents_mut().sort();
    }
    records.sort_by(|a, b| {
        a.id()
            .cmp(b.id())
            .then_with(|| a.node().cmp(b.node()))
            .then_with(|| a.kind().cmp(&b.kind()))
    });
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::reification::ResolvedVia;
    use crate::record::{ParentRef, RecordBuilder};

    fn parent(id: &str) -> ParentRef {
        ParentRef {
            id: id.to_string(),
            label: None,
            via: ResolvedVia::Direct,
        }
    }

    #[test]
    fn sorts_by_identifier_then_node() {
        let records = vec![
            RecordBuilder::new(EntityKind::Class, "https://pub/b", "http://x/1").build(),
            RecordBuilder::new(EntityKind::Class, "https://pub/a", "http://x/3").build(),
            RecordBuilder::new(EntityKind::Class, "https://pub/a", "http://x/2").build(),
        ];
        let ordered = order(records);
        let keys: Vec<_> = ordered.iter().map(|r| (r.id(), r.node())).collect();
        assert_eq!(
            keys,
            vec![
                ("https://pub/a", "http://x/2"),
                ("https://pub/a", "http://x/3"),
                ("https://pub/b", "http://x/1"),
            ]
        );
    }

    #[test]
    fn parents_are_sorted() {
        let record = RecordBuilder::new(EntityKind::Class, "https://pub/c", "http://x/c")
            .parent(parent("https://pub/z"))
            .parent(parent("https://pub/m"))
            .build();
        let ordered = order(vec![record]);
        let ids: Vec<_> = ordered[0].parents().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["https://pub/m", "https://pub/z"]);
    }
}
