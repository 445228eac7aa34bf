//! Dedup & final store
//!
//! Finalized records keyed by identity. The first record stored under an
//! identity wins; later ones are dropped. Records without an identity are
//! keyed by their aggregation key instead so they do not collapse into one.

use dex_common::types::{compare_identities, EntityRecord};
use std::collections::HashSet;
use tracing::debug;

/// Outcome of [`FinalStore::put`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Stored,
    Duplicate,
}

#[derive(Debug, Default)]
pub struct FinalStore {
    seen: HashSet<String>,
    records: Vec<EntityRecord>,
}

impl FinalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, record: EntityRecord) -> PutOutcome {
        let identity = dedup_key(&record);
        if !self.seen.insert(identity) {
            debug!(
                number = ?record.number(),
                name = %record.name(),
                "Dropping duplicate record"
            );
            return PutOutcome::Duplicate;
        }

        self.records.push(record);
        PutOutcome::Stored
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by numeric identity; everything else keeps arrival order after them
    pub fn into_sorted(self) -> Vec<EntityRecord> {
        let mut records = self.records;
        // sort_by is stable
        records.sort_by(|a, b| compare_identities(a.number(), b.number()));
        records
    }
}

fn dedup_key(record: &EntityRecord) -> String {
    match record.number() {
        Some(number) => number.to_string(),
        None => record.key().to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dex_common::types::EntityStub;
    use url::Url;

    fn record(number: Option<&str>, name: &str) -> EntityRecord {
        EntityRecord::from_stub(EntityStub {
            number: number.map(str::to_string),
            name: name.to_string(),
            url: Url::parse("https://pokemondb.net/pokedex/").unwrap().join(name).unwrap(),
            types: vec!["Normal".to_string()],
        })
    }

    #[test]
    fn test_first_writer_wins() {
        let mut store = FinalStore::new();
        let mut first = record(Some("0003"), "Venusaur");
        first.height_cm = Some(200.0);
        let mut mega = record(Some("0003"), "Venusaur");
        mega.height_cm = Some(240.0);

        assert_eq!(store.put(first), PutOutcome::Stored);
        assert_eq!(store.put(mega), PutOutcome::Duplicate);
        assert_eq!(store.len(), 1);

        let records = store.into_sorted();
        assert_eq!(records[0].height_cm, Some(200.0));
    }

    #[test]
    fn test_sorted_output() {
        let mut store = FinalStore::new();
        for (number, name) in [("004", "Charmander"), ("002", "Ivysaur"), ("Mew", "Mew"), ("001", "Bulbasaur")] {
            store.put(record(Some(number), name));
        }

        let numbers: Vec<_> = store
            .into_sorted()
            .iter()
            .map(|r| r.number().unwrap().to_string())
            .collect();
        assert_eq!(numbers, vec!["001", "002", "004", "Mew"]);
    }

    #[test]
    fn test_entries_without_identity_are_kept_apart() {
        let mut store = FinalStore::new();
        store.put(record(None, "Zeta"));
        store.put(record(Some("0010"), "Caterpie"));
        store.put(record(None, "Alpha"));
        assert_eq!(store.put(record(None, "Zeta")), PutOutcome::Duplicate);

        let names: Vec<_> = store
            .into_sorted()
            .into_iter()
            .map(|r| r.stub.name)
            .collect();
        // unnumbered entries keep arrival order
        assert_eq!(names, vec!["Caterpie", "Zeta", "Alpha"]);
    }
}
