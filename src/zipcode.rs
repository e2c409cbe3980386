//! Zip index snapshot and zip lookups.

use std::collections::HashMap;

use serde::Serialize;

use crate::geo::{self, StateIndex};
use crate::types::{LocationRecord, ZipEntry};

/// Length of a complete US zip code
pub const ZIP_LEN: usize = 5;

/// Read-only snapshot mapping 5-digit zips to rent data.
#[derive(Debug, Clone, Default)]
pub struct ZipIndex {
    entries: HashMap<String, ZipEntry>,
}

impl ZipIndex {
    /// Build an index, dropping any key that is not exactly five digits.
    pub fn from_map(raw: HashMap<String, ZipEntry>) -> Self {
        let before = raw.len();
        let entries: HashMap<String, ZipEntry> = raw
            .into_iter()
            .filter(|(zip, _)| is_complete_zip(zip))
            .collect();
        if entries.len() != before {
            tracing::warn!(
                "Dropped {} zip index keys that are not 5-digit zips",
                before - entries.len()
            );
        }
        Self { entries }
    }

    /// Parse the compact wire format `{"78701": {"r": .., "s": .., "c": ..}}`
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: HashMap<String, ZipEntry> = serde_json::from_str(json)?;
        Ok(Self::from_map(raw))
    }

    /// Derive the index from per-state city files.
    ///
    /// Cities without a zip or with a zero rent carry no usable data and are
    /// skipped. When two cities share a zip the later state file wins.
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a StateIndex>) -> Self {
        let mut raw = HashMap::new();
        for state in states {
            for (_, city) in state.iter() {
                if city.zip.is_empty() || city.rent == 0 {
                    continue;
                }
                raw.insert(
                    city.zip.clone(),
                    ZipEntry {
                        rent: city.rent,
                        state: state.slug().to_string(),
                        city: city.city.clone(),
                    },
                );
            }
        }
        Self::from_map(raw)
    }

    pub fn get(&self, zip: &str) -> Option<&ZipEntry> {
        self.entries.get(zip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The underlying map, for serialising back to the wire format
    pub fn entries(&self) -> &HashMap<String, ZipEntry> {
        &self.entries
    }
}

/// Outcome of resolving a zip input against the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZipLookup {
    /// Nothing entered yet
    Empty,
    /// Fewer than five characters; no lookup performed
    Incomplete,
    /// Five characters, but the index has not been loaded
    NotReady,
    Found(LocationRecord),
    NotFound,
}

/// Trim the raw input and keep at most the first five characters.
pub fn normalize_zip_input(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.char_indices().nth(ZIP_LEN) {
        Some((cut, _)) => &raw[..cut],
        None => raw,
    }
}

fn is_complete_zip(zip: &str) -> bool {
    zip.len() == ZIP_LEN && zip.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve a zip input against an index snapshot, if one is loaded.
pub fn lookup(index: Option<&ZipIndex>, input: &str) -> ZipLookup {
    let zip = normalize_zip_input(input);
    match zip.chars().count() {
        0 => ZipLookup::Empty,
        n if n < ZIP_LEN => ZipLookup::Incomplete,
        _ => match index {
            None => ZipLookup::NotReady,
            Some(index) => match index.get(zip) {
                Some(entry) => ZipLookup::Found(LocationRecord::from_entry(zip, entry)),
                None => ZipLookup::NotFound,
            },
        },
    }
}

/// A real US zip code that may have no rent data of its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownPlace {
    pub city: String,
    pub state: String,
    pub state_slug: Option<String>,
}

/// Look up city and state from a US zip code
pub fn known_place(zip: &str) -> Option<KnownPlace> {
    if !is_complete_zip(zip) {
        return None;
    }
    // Avoid zipcodes::matching to suppress debug_print output.
    let results = zipcodes::filter_by(vec![|z: &zipcodes::Zipcode| z.zip_code == zip], None).ok()?;
    let info = results.first()?;
    Some(KnownPlace {
        city: info.city.clone(),
        state: info.state.clone(),
        state_slug: geo::state_slug_for_abbrev(&info.state).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ZipIndex {
        ZipIndex::from_json(
            r#"{
                "78701": {"r": 1890, "s": "texas", "c": "Austin"},
                "10001": {"r": 2780, "s": "new-york", "c": "New York"},
                "1234": {"r": 100, "s": "nowhere", "c": "Short"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_drops_malformed_keys() {
        let index = index();
        assert_eq!(index.len(), 2);
        assert!(index.get("1234").is_none());
    }

    #[test]
    fn test_incomplete_never_looks_up() {
        let index = index();
        for input in ["7", "78", "787", "7870"] {
            assert_eq!(lookup(Some(&index), input), ZipLookup::Incomplete);
            assert_eq!(lookup(None, input), ZipLookup::Incomplete);
        }
    }

    #[test]
    fn test_found_is_stable() {
        let index = index();
        let first = lookup(Some(&index), "78701");
        let second = lookup(Some(&index), "78701");
        assert_eq!(first, second);
        match first {
            ZipLookup::Found(loc) => {
                assert_eq!(loc.rent, 1890);
                assert_eq!(loc.state_slug, "texas");
                assert_eq!(loc.city, "Austin");
                assert_eq!(loc.zip, "78701");
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_and_not_ready() {
        let index = index();
        assert_eq!(lookup(Some(&index), "99999"), ZipLookup::NotFound);
        assert_eq!(lookup(Some(&index), "abcde"), ZipLookup::NotFound);
        assert_eq!(lookup(None, "78701"), ZipLookup::NotReady);
    }

    #[test]
    fn test_empty_and_truncation() {
        let index = index();
        assert_eq!(lookup(Some(&index), ""), ZipLookup::Empty);
        assert_eq!(lookup(Some(&index), "   "), ZipLookup::Empty);
        assert_eq!(normalize_zip_input("787019999"), "78701");
        assert!(matches!(
            lookup(Some(&index), "787019999"),
            ZipLookup::Found(_)
        ));
    }

    #[test]
    fn test_from_states_skips_unusable_rows() {
        let texas = StateIndex::from_json(
            "texas",
            r#"{
                "austin-78701": {"city": "Austin", "rent": 1890, "zip": "78701"},
                "ghost-79999": {"city": "Ghost", "rent": 0, "zip": "79999"},
                "nozip": {"city": "Nozip", "rent": 900, "zip": ""}
            }"#,
        )
        .unwrap();
        let index = ZipIndex::from_states([&texas]);
        assert_eq!(index.len(), 1);
        let entry = index.get("78701").unwrap();
        assert_eq!(entry.state, "texas");
        assert_eq!(entry.city, "Austin");
    }

    #[test]
    fn test_known_place_rejects_partial_zip() {
        assert!(known_place("787").is_none());
        assert!(known_place("abcde").is_none());
    }
}
