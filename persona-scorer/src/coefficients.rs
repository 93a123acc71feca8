//! Per-profile coefficient table applied to feature vectors.
//!
//! Tables are read from JSON shaped either as `{profile: {feature: number}}`
//! or wrapped as `{"coefficients": {...}}`. Profiles may be named in singular
//! or plural form; features without an entry weigh zero. Repeating a profile
//! or a feature key, even verbatim, is rejected.

use std::fmt;
use std::marker::PhantomData;
use std::sync::OnceLock;

use camino::Utf8Path;
use log::debug;
use persona_core::{FEATURE_COUNT, FeatureKey, FeatureVector, Profile};
use persona_fs::read_utf8_to_string;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::CoefficientError;
use crate::mapping::dormant_features;

const BUILTIN_JSON: &str = include_str!("../data/coefficients.json");

/// Object members in document order, repeated keys included.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

struct EntriesVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
    type Value = Entries<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(Entries(entries))
    }
}

type Rows = Entries<Entries<f64>>;

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Wrapped { coefficients: Rows },
    Bare(Rows),
}

impl Document {
    fn into_rows(self) -> Rows {
        match self {
            Self::Wrapped { coefficients } => coefficients,
            Self::Bare(rows) => rows,
        }
    }
}

/// Immutable coefficient rows, one per profile.
///
/// # Examples
/// ```
/// use persona_core::{FeatureKey, FeatureVector, Profile};
/// use persona_scorer::CoefficientTable;
///
/// let table = CoefficientTable::from_json_str(
///     r#"{"Empaths": {"TT1_Mobile": 0.5}, "Pioneers": {}, "Mechanists": {},
///         "Collaborators": {}, "Nesters": {}}"#,
/// )
/// .expect("valid table");
///
/// let mut features = FeatureVector::default();
/// features.set(FeatureKey::MOBILE, 1.0);
/// assert_eq!(table.score(Profile::Empath, &features), 0.5);
/// assert_eq!(table.score(Profile::Nester, &features), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    rows: [[f64; FEATURE_COUNT]; Profile::COUNT],
}

impl CoefficientTable {
    /// A table where every coefficient is zero.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            rows: [[0.0; FEATURE_COUNT]; Profile::COUNT],
        }
    }

    /// Return a copy with `profile`'s coefficient for `key` set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`CoefficientError::NonFinite`] when `value` is NaN or
    /// infinite.
    pub fn with_coefficient(
        mut self,
        profile: Profile,
        key: FeatureKey,
        value: f64,
    ) -> Result<Self, CoefficientError> {
        if !value.is_finite() {
            return Err(CoefficientError::NonFinite {
                profile: profile.as_str(),
                key: key.to_string(),
            });
        }
        if let Some(slot) = self
            .rows
            .get_mut(profile.position())
            .and_then(|row| row.get_mut(key.position()))
        {
            *slot = value;
        }
        Ok(self)
    }

    /// Parse and validate a JSON coefficient document.
    ///
    /// # Errors
    ///
    /// Returns [`CoefficientError`] when the document cannot be decoded,
    /// names an unknown profile or feature, repeats a profile or a feature
    /// within one row, omits a profile, or holds a non-finite coefficient.
    pub fn from_json_str(json: &str) -> Result<Self, CoefficientError> {
        let document: Document = serde_json::from_str(json)
            .map_err(|source| CoefficientError::Decode { source })?;
        let mut table = Self::zeroed();
        let mut seen = [false; Profile::COUNT];

        for (name, row) in document.into_rows().0 {
            let profile = name
                .parse::<Profile>()
                .map_err(|_| CoefficientError::UnknownProfile { name: name.clone() })?;
            if let Some(flag) = seen.get_mut(profile.position()) {
                if *flag {
                    return Err(CoefficientError::DuplicateProfile {
                        profile: profile.as_str(),
                    });
                }
                *flag = true;
            }
            let mut seen_features = [false; FEATURE_COUNT];
            for (raw_key, value) in row.0 {
                let key = raw_key
                    .parse::<FeatureKey>()
                    .map_err(|_| CoefficientError::UnknownFeature {
                        profile: profile.as_str(),
                        key: raw_key.clone(),
                    })?;
                if let Some(flag) = seen_features.get_mut(key.position()) {
                    if *flag {
                        return Err(CoefficientError::DuplicateFeature {
                            profile: profile.as_str(),
                            key: raw_key,
                        });
                    }
                    *flag = true;
                }
                if dormant_features().any(|dormant| dormant == key) {
                    debug!("{profile} weighs dormant feature {key} at {value}; it always scores 0");
                }
                table = table.with_coefficient(profile, key, value)?;
            }
        }

        if let Some(missing) = Profile::ALL
            .into_iter()
            .zip(seen)
            .find_map(|(profile, present)| (!present).then_some(profile))
        {
            return Err(CoefficientError::MissingProfile {
                profile: missing.as_str(),
            });
        }
        Ok(table)
    }

    /// Read and validate a coefficient document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CoefficientError::ReadFile`] when the file cannot be read
    /// and the errors of [`CoefficientTable::from_json_str`] otherwise.
    pub fn from_path(path: &Utf8Path) -> Result<Self, CoefficientError> {
        let json = read_utf8_to_string(path).map_err(|source| CoefficientError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded coefficient table from {path}");
        Self::from_json_str(&json)
    }

    /// The table shipped with the crate, parsed once per process.
    ///
    /// # Errors
    ///
    /// Returns [`CoefficientError`] if the embedded document is invalid.
    pub fn builtin() -> Result<&'static Self, CoefficientError> {
        static BUILTIN: OnceLock<CoefficientTable> = OnceLock::new();
        if let Some(table) = BUILTIN.get() {
            return Ok(table);
        }
        let table = Self::from_json_str(BUILTIN_JSON)?;
        debug!("initialised built-in coefficient table");
        Ok(BUILTIN.get_or_init(|| table))
    }

    /// Coefficient `profile` assigns to `key`.
    #[must_use]
    pub fn coefficient(&self, profile: Profile, key: FeatureKey) -> f64 {
        self.rows
            .get(profile.position())
            .and_then(|row| row.get(key.position()))
            .copied()
            .unwrap_or_default()
    }

    /// Unrounded dot product of `features` with `profile`'s row.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "scores are weighted sums of features"
    )]
    pub fn score(&self, profile: Profile, features: &FeatureVector) -> f64 {
        self.rows.get(profile.position()).map_or(0.0, |row| {
            row.iter()
                .zip(features.as_array())
                .map(|(coefficient, feature)| coefficient * feature)
                .sum()
        })
    }
}
