//! State catalogue and per-state city data.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::{CityData, CityListing};

/// Every state slug the site links to, with its USPS abbreviation
pub const STATES: [(&str, &str); 51] = [
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new-hampshire", "NH"),
    ("new-jersey", "NJ"),
    ("new-mexico", "NM"),
    ("new-york", "NY"),
    ("north-carolina", "NC"),
    ("north-dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode-island", "RI"),
    ("south-carolina", "SC"),
    ("south-dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west-virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
    ("district-of-columbia", "DC"),
];

static UNSAFE_SLUG_CHARS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").ok());

/// Lowercase, then strip everything but `[a-z0-9-]` so a slug can never
/// name a path outside the data directory.
pub fn sanitize_slug(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    match &*UNSAFE_SLUG_CHARS {
        Some(re) => re.replace_all(&lowered, "").into_owned(),
        None => retain_slug_chars(&lowered),
    }
}

fn retain_slug_chars(lowered: &str) -> String {
    lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Map a USPS abbreviation ("TX") to its state slug ("texas")
pub fn state_slug_for_abbrev(abbrev: &str) -> Option<&'static str> {
    let abbrev = abbrev.trim().to_ascii_uppercase();
    STATES
        .iter()
        .find(|(_, code)| *code == abbrev)
        .map(|(slug, _)| *slug)
}

/// "new-york" -> "new york"
pub fn display_name(slug: &str) -> String {
    slug.replace('-', " ")
}

/// All cities of one state, keyed by city slug.
#[derive(Debug, Clone, Default)]
pub struct StateIndex {
    slug: String,
    cities: HashMap<String, CityData>,
}

impl StateIndex {
    pub fn new(slug: impl Into<String>, cities: HashMap<String, CityData>) -> Self {
        Self {
            slug: slug.into(),
            cities,
        }
    }

    /// Parse a per-state JSON document (`{city_slug: {city, rent, zip}}`)
    pub fn from_json(slug: &str, json: &str) -> serde_json::Result<Self> {
        let cities: HashMap<String, CityData> = serde_json::from_str(json)?;
        Ok(Self::new(slug, cities))
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn city(&self, city_slug: &str) -> Option<&CityData> {
        self.cities.get(city_slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CityData)> {
        self.cities.iter()
    }

    /// Every city, sorted by name (slug breaks ties so the order is stable)
    pub fn sorted_cities(&self) -> Vec<CityListing> {
        let mut cities: Vec<CityListing> = self
            .cities
            .iter()
            .map(|(slug, data)| CityListing {
                slug: slug.clone(),
                name: data.city.clone(),
                rent: data.rent,
                zip: data.zip.clone(),
            })
            .collect();
        cities.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        cities
    }
}

/// Summary row for the state list API
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    pub slug: String,
    pub name: String,
    pub abbreviation: String,
    pub cities: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StateIndex {
        StateIndex::from_json(
            "texas",
            r#"{
                "waco-76701": {"city": "Waco", "rent": 1120, "zip": "76701"},
                "austin-78701": {"city": "Austin", "rent": 1890, "zip": "78701"},
                "abilene-79601": {"city": "Abilene", "rent": 1010, "zip": "79601"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_sanitize_slug() {
        assert_eq!(sanitize_slug("new-york"), "new-york");
        assert_eq!(sanitize_slug("../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_slug("Texas"), "texas");
        assert_eq!(sanitize_slug("new york"), "newyork");
        assert_eq!(sanitize_slug("austin-78701"), "austin-78701");
    }

    #[test]
    fn test_slug_filter_matches_regex() {
        for raw in ["new-york", "../etc/passwd", "Coeur d'Alene", "São Paulo", "a_b.c"] {
            let lowered = raw.to_lowercase();
            assert_eq!(retain_slug_chars(&lowered), sanitize_slug(raw), "{}", raw);
        }
    }

    #[test]
    fn test_state_catalogue() {
        assert_eq!(STATES.len(), 51);
        assert_eq!(state_slug_for_abbrev("tx"), Some("texas"));
        assert_eq!(state_slug_for_abbrev("DC"), Some("district-of-columbia"));
        assert_eq!(state_slug_for_abbrev("PR"), None);
        assert_eq!(display_name("north-carolina"), "north carolina");
    }

    #[test]
    fn test_sorted_cities() {
        let names: Vec<String> = sample()
            .sorted_cities()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Abilene", "Austin", "Waco"]);
    }

    #[test]
    fn test_city_lookup() {
        let state = sample();
        assert_eq!(state.city("austin-78701").map(|c| c.rent), Some(1890));
        assert!(state.city("austin").is_none());
        assert_eq!(state.len(), 3);
    }
}
