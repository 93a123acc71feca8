//! Fixed 58-slot feature schema shared by the normaliser and the classifier.
//!
//! Features are grouped by questionnaire section (`TT1` to `TT7`). Each slot
//! has a canonical position inside [`FeatureVector`] and a canonical name such
//! as `TT1_Mobile` or `TT2_5`.
//!
//! # Examples
//! ```
//! use persona_core::{FeatureGroup, FeatureKey, FeatureVector};
//!
//! let key: FeatureKey = "TT3_2".parse().expect("valid key");
//! assert_eq!(key.group(), FeatureGroup::GameType);
//!
//! let mut vector = FeatureVector::default();
//! vector.set(key, 1.0);
//! assert_eq!(vector.get(key), 1.0);
//! assert_eq!(vector.get(FeatureKey::MOBILE), 0.0);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Total number of feature slots.
pub const FEATURE_COUNT: usize = 58;

/// Questionnaire section a feature slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureGroup {
    /// `TT1`: device preference.
    Device,
    /// `TT2`: opinions on game genres.
    Genre,
    /// `TT3`: preferred game types.
    GameType,
    /// `TT4`: criteria for starting a new game.
    StartCriteria,
    /// `TT5`: paired narrative preferences.
    Narrative,
    /// `TT6`: what matters in narrative games.
    NarrativeImportance,
    /// `TT7`: visual and audio preferences.
    Presentation,
}

impl FeatureGroup {
    /// Every group in schema order.
    pub const ALL: [Self; 7] = [
        Self::Device,
        Self::Genre,
        Self::GameType,
        Self::StartCriteria,
        Self::Narrative,
        Self::NarrativeImportance,
        Self::Presentation,
    ];

    /// Section code used as the key prefix.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Device => "TT1",
            Self::Genre => "TT2",
            Self::GameType => "TT3",
            Self::StartCriteria => "TT4",
            Self::Narrative => "TT5",
            Self::NarrativeImportance => "TT6",
            Self::Presentation => "TT7",
        }
    }

    /// Number of slots in the group.
    #[must_use]
    pub const fn slot_count(self) -> u8 {
        match self {
            Self::Device => 1,
            Self::Genre => 22,
            Self::GameType => 7,
            Self::StartCriteria | Self::Narrative => 8,
            Self::NarrativeImportance | Self::Presentation => 6,
        }
    }

    /// Position of the group's first slot inside the vector.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::Device => 0,
            Self::Genre => 1,
            Self::GameType => 23,
            Self::StartCriteria => 30,
            Self::Narrative => 38,
            Self::NarrativeImportance => 46,
            Self::Presentation => 52,
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.code() == code)
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifier of one slot in the feature schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey {
    group: FeatureGroup,
    slot: u8,
}

impl FeatureKey {
    /// The single device slot, `TT1_Mobile`.
    pub const MOBILE: Self = Self {
        group: FeatureGroup::Device,
        slot: 1,
    };

    /// Build a key from a group and a one-based slot number.
    ///
    /// Returns `None` when the slot lies outside the group.
    #[must_use]
    pub const fn new(group: FeatureGroup, slot: u8) -> Option<Self> {
        if slot == 0 || slot > group.slot_count() {
            return None;
        }
        Some(Self { group, slot })
    }

    /// Group the key belongs to.
    #[must_use]
    pub const fn group(self) -> FeatureGroup {
        self.group
    }

    /// One-based slot number within the group.
    #[must_use]
    pub const fn slot(self) -> u8 {
        self.slot
    }

    /// Canonical position inside a [`FeatureVector`].
    #[must_use]
    pub const fn position(self) -> usize {
        self.group.offset() + self.slot as usize - 1
    }

    /// Iterate over every key in canonical order.
    pub fn all() -> impl Iterator<Item = Self> {
        FeatureGroup::ALL.into_iter().flat_map(|group| {
            (1..=group.slot_count()).map(move |slot| Self { group, slot })
        })
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.group {
            FeatureGroup::Device => write!(f, "{}_Mobile", self.group.code()),
            _ => write!(f, "{}_{}", self.group.code(), self.slot),
        }
    }
}

/// Error returned when a feature name does not match the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature key '{name}'")]
pub struct ParseFeatureKeyError {
    /// The rejected name.
    pub name: String,
}

impl FromStr for FeatureKey {
    type Err = ParseFeatureKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ParseFeatureKeyError { name: s.to_owned() };
        let (code, suffix) = s.split_once('_').ok_or_else(unknown)?;
        let group = FeatureGroup::from_code(code).ok_or_else(unknown)?;
        let slot = match group {
            FeatureGroup::Device if suffix == "Mobile" => 1,
            FeatureGroup::Device => return Err(unknown()),
            _ if suffix.starts_with('0') => return Err(unknown()),
            _ => suffix.parse::<u8>().map_err(|_| unknown())?,
        };
        Self::new(group, slot).ok_or_else(unknown)
    }
}

/// Dense vector holding one value per feature slot.
///
/// Every slot is always present and defaults to `0.0`. The vector serialises
/// as a JSON object keyed by canonical feature name in schema order; on
/// deserialisation missing keys stay at zero and unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }
}

impl FeatureVector {
    /// Value stored for `key`.
    #[must_use]
    pub fn get(&self, key: FeatureKey) -> f64 {
        self.values.get(key.position()).copied().unwrap_or_default()
    }

    /// Overwrite the value stored for `key`.
    pub fn set(&mut self, key: FeatureKey, value: f64) {
        if let Some(slot) = self.values.get_mut(key.position()) {
            *slot = value;
        }
    }

    /// Iterate over `(key, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, f64)> + '_ {
        FeatureKey::all().zip(self.values.iter().copied())
    }

    /// Borrow the raw values in canonical order.
    #[must_use]
    pub const fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(&key.to_string(), &value)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, f64>> for FeatureVector {
    type Error = ParseFeatureKeyError;

    fn try_from(entries: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut vector = Self::default();
        for (name, value) in entries {
            let key: FeatureKey = name.parse()?;
            vector.set(key, value);
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn schema_has_fifty_eight_distinct_positions() {
        let positions: Vec<usize> = FeatureKey::all().map(FeatureKey::position).collect();
        assert_eq!(positions.len(), FEATURE_COUNT);
        assert_eq!(positions, (0..FEATURE_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn group_offsets_are_contiguous() {
        let mut expected = 0;
        for group in FeatureGroup::ALL {
            assert_eq!(group.offset(), expected, "offset of {group}");
            expected += usize::from(group.slot_count());
        }
        assert_eq!(expected, FEATURE_COUNT);
    }

    #[rstest]
    #[case("TT1_Mobile", FeatureGroup::Device, 1)]
    #[case("TT2_1", FeatureGroup::Genre, 1)]
    #[case("TT2_22", FeatureGroup::Genre, 22)]
    #[case("TT5_8", FeatureGroup::Narrative, 8)]
    #[case("TT7_6", FeatureGroup::Presentation, 6)]
    fn parses_canonical_names(#[case] name: &str, #[case] group: FeatureGroup, #[case] slot: u8) {
        let key: FeatureKey = name.parse().expect("valid key");
        assert_eq!(key.group(), group);
        assert_eq!(key.slot(), slot);
        assert_eq!(key.to_string(), name);
    }

    #[rstest]
    #[case("TT1_1")]
    #[case("TT2_0")]
    #[case("TT2_23")]
    #[case("TT2_05")]
    #[case("TT8_1")]
    #[case("TT3")]
    #[case("tt3_1")]
    fn rejects_unknown_names(#[case] name: &str) {
        let err = name.parse::<FeatureKey>().expect_err("invalid key");
        assert_eq!(err.name, name);
    }

    #[test]
    fn serialises_in_schema_order() {
        let mut vector = FeatureVector::default();
        vector.set(FeatureKey::MOBILE, 1.0);
        let json = serde_json::to_string(&vector).expect("serialise vector");
        assert!(json.starts_with("{\"TT1_Mobile\":1.0,\"TT2_1\":0.0"));
        assert!(json.ends_with("\"TT7_6\":0.0}"));
    }

    #[test]
    fn deserialises_partial_maps() {
        let vector: FeatureVector =
            serde_json::from_str(r#"{"TT4_2": 1.0}"#).expect("deserialise vector");
        let key = FeatureKey::new(FeatureGroup::StartCriteria, 2).expect("valid key");
        assert_eq!(vector.get(key), 1.0);
        assert_eq!(vector.iter().filter(|(_, value)| *value != 0.0).count(), 1);
    }

    #[test]
    fn deserialisation_rejects_unknown_keys() {
        let result: Result<FeatureVector, _> = serde_json::from_str(r#"{"TT9_1": 1.0}"#);
        assert!(result.is_err());
    }
}
