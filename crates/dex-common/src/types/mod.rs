//! Catalog types shared by the harvester and its output documents

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use url::Url;

/// A catalog entry as it appears on the listing page
///
/// Created while parsing the listing and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStub {
    /// Normalized numeric identity (e.g. "0001"), absent when the row had none
    pub number: Option<String>,

    /// Display name
    pub name: String,

    /// Absolute location of the detail page
    pub url: Url,

    /// Ordered category tags (one or two)
    pub types: Vec<String>,
}

impl EntityStub {
    /// Aggregation key for this entry
    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.number.as_deref(), &self.name)
    }
}

/// Parse an identity string into its numeric value
///
/// Only all-digit identities count; anything else sorts after numeric entries.
pub fn numeric_identity(number: Option<&str>) -> Option<u64> {
    let number = number?;
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// Ordering used for the final document: numeric identities ascending,
/// everything else after them
pub fn compare_identities(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (numeric_identity(a), numeric_identity(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Key under which an entry's pending sub-resource fetches are tracked
///
/// Formatted as `{number}_{name}`; alternate forms sharing both number and
/// name collide on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(number: Option<&str>, name: &str) -> Self {
        Self(format!("{}_{}", number.unwrap_or_default(), name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Another entry linked from the evolution block of a detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    /// Identity resolved through the listing lookup table
    pub number: Option<String>,
    pub name: String,
    pub url: Option<Url>,
    /// Level requirement, e.g. "16"
    pub level: Option<String>,
    /// Item requirement, e.g. "Thunder Stone"
    pub item: Option<String>,
}

/// A fetched sub-resource (ability) attached to an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub url: Url,
    pub description: String,
}

/// Defensive and offensive relationship sets derived from an entry's categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivenessProfile {
    pub weaknesses: Vec<String>,
    pub resistances: Vec<String>,
    pub immunities: Vec<String>,
    pub super_effective_against: Vec<String>,
    pub not_very_effective_against: Vec<String>,
    pub no_effect_against: Vec<String>,
}

/// A fully harvested catalog entry
///
/// Serializes to the flat output shape
/// `number, name, url, types, height_cm, weight_kg, evolutions, abilities, type_effectiveness`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(flatten)]
    pub stub: EntityStub,

    pub height_cm: Option<f64>,

    pub weight_kg: Option<f64>,

    #[serde(default)]
    pub evolutions: Vec<Evolution>,

    #[serde(default)]
    pub abilities: Vec<Ability>,

    #[serde(default)]
    pub type_effectiveness: EffectivenessProfile,
}

impl EntityRecord {
    /// Start a record from a listing stub with every derived field empty
    pub fn from_stub(stub: EntityStub) -> Self {
        Self {
            stub,
            height_cm: None,
            weight_kg: None,
            evolutions: Vec::new(),
            abilities: Vec::new(),
            type_effectiveness: EffectivenessProfile::default(),
        }
    }

    pub fn number(&self) -> Option<&str> {
        self.stub.number.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.stub.name
    }

    pub fn key(&self) -> EntityKey {
        self.stub.key()
    }
}
