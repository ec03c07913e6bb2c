//! Catalog records as served by the monster database API.
//!
//! Decoding is lenient: a field that is missing or carries the wrong JSON
//! type decodes to its empty value instead of failing the whole response.
//! Entries that are not objects are skipped, at the top level of a
//! [`Catalog`] as well as in nested lists. Only a body that is not a JSON
//! array is treated as a fetch failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type RecordId = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    Small,
    Large,
    /// Anything the API sends that is not `small` or `large`.
    #[default]
    Unrecognized,
}

impl MonsterKind {
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        match value {
            "small" => Self::Small,
            "large" => Self::Large,
            _ => Self::Unrecognized,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Habitat reference embedded in a monster record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habitat {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub zone_count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::kind")]
    pub kind: MonsterKind,
    #[serde(default, deserialize_with = "lenient::text")]
    pub species: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::texts")]
    pub elements: Vec<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub locations: Vec<Habitat>,
}

impl Monster {
    /// Exact, case-sensitive match against the habitat names.
    #[must_use]
    pub fn inhabits(&self, location_name: &str) -> bool {
        self.locations.iter().any(|l| l.name == location_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub zone: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub zone_count: u32,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub camps: Vec<Camp>,
}

/// Named records, so the filter pipeline can treat monsters and
/// locations uniformly.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Monster {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Location {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A collection response body: a JSON array of records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog<T>(Vec<T>);

impl<T> Catalog<T> {
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Catalog<T> {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let items = Vec::<serde_json::Value>::deserialize(de)?;
        Ok(Self(lenient::objects(items)))
    }
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{MonsterKind, RecordId};

    pub fn text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn id<'de, D: Deserializer<'de>>(de: D) -> Result<RecordId, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Number(n) => n.as_u64().unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
        let raw = id(de)?;
        Ok(u32::try_from(raw).unwrap_or(u32::MAX))
    }

    pub fn kind<'de, D: Deserializer<'de>>(de: D) -> Result<MonsterKind, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::String(s) => MonsterKind::from_api(&s),
            _ => MonsterKind::Unrecognized,
        })
    }

    pub fn texts<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Entries that are not objects are skipped.
    pub fn seq<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(de)? {
            Value::Array(items) => objects(items),
            _ => Vec::new(),
        })
    }

    pub fn objects<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
        items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_monster_decodes_api_shape() {
        let raw = json!({
            "id": 17,
            "name": "Rathalos",
            "type": "large",
            "species": "flying wyvern",
            "description": "A terrible wyvern called \"the King of the Skies.\"",
            "elements": ["fire"],
            "locations": [
                {"id": 1, "name": "Ancient Forest", "zoneCount": 16},
                {"id": 2, "name": "Elder's Recess", "zoneCount": 16}
            ],
            "weaknesses": []
        });

        let monster: Monster = serde_json::from_value(raw).unwrap();
        assert_eq!(monster.id, 17);
        assert_eq!(monster.kind, MonsterKind::Large);
        assert_eq!(monster.elements, vec!["fire".to_string()]);
        assert_eq!(monster.locations.len(), 2);
        assert_eq!(monster.locations[0].zone_count, 16);
        assert!(monster.inhabits("Ancient Forest"));
        assert!(!monster.inhabits("ancient forest"));
    }

    #[test]
    fn test_location_decodes_api_shape() {
        let raw = json!({
            "id": 1,
            "name": "Ancient Forest",
            "zoneCount": 17,
            "camps": [
                {"id": 1, "name": "Southwest Camp", "zone": 1},
                {"id": 2, "name": "Northwest Camp", "zone": 8}
            ]
        });

        let location: Location = serde_json::from_value(raw).unwrap();
        assert_eq!(location.zone_count, 17);
        assert_eq!(location.camps[1].name, "Northwest Camp");
        assert_eq!(location.camps[1].zone, 8);
    }

    #[test]
    fn test_missing_fields_decode_to_empty_values() {
        let monster: Monster = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(monster.name, "");
        assert_eq!(monster.kind, MonsterKind::Unrecognized);
        assert!(monster.locations.is_empty());
    }

    #[test]
    fn test_wrong_types_do_not_fail_decoding() {
        let raw = json!({
            "id": "42",
            "name": null,
            "type": 7,
            "elements": "fire",
            "locations": [null, {"name": "Wildspire Waste"}, 5]
        });

        let monster: Monster = serde_json::from_value(raw).unwrap();
        assert_eq!(monster.id, 42);
        assert_eq!(monster.name, "");
        assert_eq!(monster.kind, MonsterKind::Unrecognized);
        assert!(monster.elements.is_empty());
        assert_eq!(monster.locations.len(), 1);
        assert_eq!(monster.locations[0].name, "Wildspire Waste");
    }

    #[test]
    fn test_unknown_monster_type() {
        let monster: Monster =
            serde_json::from_value(json!({"id": 1, "type": "elder"})).unwrap();
        assert_eq!(monster.kind, MonsterKind::Unrecognized);
    }

    #[test]
    fn test_non_array_body_is_rejected() {
        let parsed = serde_json::from_str::<Catalog<Monster>>(r#"{"error": "nope"}"#);
        assert!(parsed.is_err());
        let parsed = serde_json::from_str::<Catalog<Location>>("<html></html>");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_catalog_skips_null_entries() {
        let body = r#"[null, {"id": 1, "name": "Great Jagras", "type": "large"}]"#;
        let monsters = serde_json::from_str::<Catalog<Monster>>(body)
            .unwrap()
            .into_inner();
        assert_eq!(monsters.len(), 1);
        assert_eq!(monsters[0].name, "Great Jagras");
        assert_eq!(monsters[0].kind, MonsterKind::Large);
    }

    #[test]
    fn test_catalog_skips_scalar_entries() {
        let body = r#"[{"id": 1, "name": "Ancient Forest"}, 5, "x", {"id": 2, "name": "Wildspire Waste"}]"#;
        let locations = serde_json::from_str::<Catalog<Location>>(body)
            .unwrap()
            .into_inner();
        assert_eq!(
            locations.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_empty_catalog() {
        let monsters = serde_json::from_str::<Catalog<Monster>>("[]").unwrap();
        assert!(monsters.into_inner().is_empty());
    }
}
