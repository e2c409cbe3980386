use serde::{Deserialize, Serialize};

/// One entry of the zip index.
///
/// The published index keeps single-letter keys to stay small; the struct
/// exposes them under readable names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipEntry {
    /// Monthly 2-bedroom fair market rent, whole USD
    #[serde(rename = "r")]
    pub rent: u32,
    /// State slug, e.g. `new-york`
    #[serde(rename = "s")]
    pub state: String,
    /// City or metro area name as published
    #[serde(rename = "c")]
    pub city: String,
}

/// A city entry inside a per-state file, keyed by city slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityData {
    pub city: String,
    pub rent: u32,
    pub zip: String,
}

/// A resolved location, as returned by a zip lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRecord {
    pub zip: String,
    pub rent: u32,
    pub state_slug: String,
    pub city: String,
}

impl LocationRecord {
    pub fn from_entry(zip: &str, entry: &ZipEntry) -> Self {
        Self {
            zip: zip.to_string(),
            rent: entry.rent,
            state_slug: entry.state.clone(),
            city: entry.city.clone(),
        }
    }
}

/// A city of a state in display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityListing {
    pub slug: String,
    pub name: String,
    pub rent: u32,
    pub zip: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_entry_uses_compact_keys() {
        let json = r#"{"r": 1540, "s": "texas", "c": "Austin"}"#;
        let entry: ZipEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.rent, 1540);
        assert_eq!(entry.state, "texas");
        assert_eq!(entry.city, "Austin");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["r"], 1540);
        assert_eq!(back["s"], "texas");
        assert!(back.get("rent").is_none());
    }

    #[test]
    fn test_location_from_entry() {
        let entry = ZipEntry {
            rent: 980,
            state: "ohio".to_string(),
            city: "Akron".to_string(),
        };
        let loc = LocationRecord::from_entry("44308", &entry);
        assert_eq!(loc.zip, "44308");
        assert_eq!(loc.state_slug, "ohio");
        assert_eq!(loc.rent, 980);
    }
}
