//! Named character reference table and lookup.
//!
//! The reference data (`data.rs`) is a static asset. The lookup table is
//! built once per process: each name is hashed with CRC-64 and the entries
//! are sorted by hash. Lookup hashes the candidate name, binary-searches the
//! hash array, and confirms by name equality, so two names colliding on the
//! 64-bit hash cannot alias each other.
//!
//! Invariants:
//! - Entries are sorted by `(hash, name)` ascending.
//! - `min_name_len` is the length of the shortest name in the table and is
//!   checked before any hashing happens (fast reject).

use crate::crc64::crc64;
use std::sync::OnceLock;

mod data;

/// One named character reference: hash key, reference name (including any
/// trailing `;`), decoded UTF-8 expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterReference {
    pub hash: u64,
    pub name: &'static str,
    pub expansion: &'static str,
}

pub(crate) struct ReferenceTable {
    entries: Vec<CharacterReference>,
    min_name_len: usize,
}

impl ReferenceTable {
    fn build() -> Self {
        let mut entries: Vec<CharacterReference> = data::NAMED_REFERENCES
            .iter()
            .map(|&(name, expansion)| CharacterReference {
                hash: crc64(name.as_bytes()),
                name,
                expansion,
            })
            .collect();
        entries.sort_unstable_by(|a, b| (a.hash, a.name).cmp(&(b.hash, b.name)));
        let min_name_len = entries.iter().map(|e| e.name.len()).min().unwrap_or(0);
        Self {
            entries,
            min_name_len,
        }
    }

    pub(crate) fn get() -> &'static ReferenceTable {
        static TABLE: OnceLock<ReferenceTable> = OnceLock::new();
        TABLE.get_or_init(ReferenceTable::build)
    }

    pub(crate) fn min_name_len(&self) -> usize {
        self.min_name_len
    }

    pub(crate) fn entries(&self) -> &[CharacterReference] {
        &self.entries
    }

    /// Exact lookup of `name` (including any trailing `;`).
    pub(crate) fn find(&self, name: &str) -> Option<&CharacterReference> {
        if name.len() < self.min_name_len {
            return None;
        }
        let hash = crc64(name.as_bytes());
        let mut index = self.entries.partition_point(|e| e.hash < hash);
        // Hash matches are confirmed by name equality; colliding entries sit
        // adjacent in the sorted array.
        while let Some(entry) = self.entries.get(index) {
            if entry.hash != hash {
                return None;
            }
            if entry.name == name {
                return Some(entry);
            }
            index += 1;
        }
        None
    }
}

/// Look up a named character reference by exact name.
pub fn find_reference(name: &str) -> Option<&'static CharacterReference> {
    ReferenceTable::get().find(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_round_trips_through_lookup() {
        let table = ReferenceTable::get();
        for entry in table.entries() {
            let found = find_reference(entry.name)
                .unwrap_or_else(|| panic!("entry {:?} must be found", entry.name));
            assert_eq!(found.name, entry.name);
            assert_eq!(found.expansion, entry.expansion);
        }
    }

    #[test]
    fn unknown_names_return_none() {
        for name in ["", "a", "zzz", "ampx", "notareal;", "amp ;", "AMP bogus"] {
            assert_eq!(find_reference(name), None, "{name:?} must not resolve");
        }
    }

    #[test]
    fn legacy_and_terminated_forms_both_resolve() {
        assert_eq!(find_reference("amp;").map(|r| r.expansion), Some("&"));
        assert_eq!(find_reference("amp").map(|r| r.expansion), Some("&"));
        assert_eq!(find_reference("not").map(|r| r.expansion), Some("\u{00AC}"));
        assert_eq!(
            find_reference("notin;").map(|r| r.expansion),
            Some("\u{2209}")
        );
        assert_eq!(find_reference("notin"), None, "no legacy form of notin");
    }

    #[test]
    fn table_is_sorted_by_hash_with_unique_names() {
        let table = ReferenceTable::get();
        let entries = table.entries();
        for pair in entries.windows(2) {
            assert!(
                (pair[0].hash, pair[0].name) < (pair[1].hash, pair[1].name),
                "entries must be strictly sorted: {:?} then {:?}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn min_name_len_matches_shortest_entry() {
        let table = ReferenceTable::get();
        assert_eq!(table.min_name_len(), 2);
        assert!(table.entries().iter().all(|e| e.name.len() >= 2));
    }
}
