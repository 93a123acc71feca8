//! Raw questionnaire answers as submitted by a respondent.
//!
//! Answers arrive in seven groups matching the questionnaire sections. Every
//! group is optional and defaults to empty, so partially completed forms still
//! normalise. [`QuestionnaireAnswers::validate`] enforces value ranges at the
//! boundary for callers accepting external input.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FeatureGroup;

/// Lowest genre opinion ("don't know").
pub const LIKERT_MIN: i64 = 1;
/// Highest genre opinion.
pub const LIKERT_MAX: i64 = 5;

/// Answers for every questionnaire section.
///
/// # Examples
/// ```
/// use persona_core::{PairScale, QuestionnaireAnswers};
///
/// let answers: QuestionnaireAnswers = serde_json::from_str(
///     r#"{"tt2Responses": {"rpg": 5}, "tt3Responses": [0, 2]}"#,
/// )
/// .expect("valid answers");
/// assert_eq!(answers.genres.get("rpg"), Some(&5));
/// assert!(answers.narrative_pairs.is_empty());
/// assert!(answers.validate(PairScale::FivePoint).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireAnswers {
    /// Device usage frequency keyed by device name.
    #[serde(rename = "tt1Responses", default)]
    pub devices: BTreeMap<String, i64>,
    /// Genre opinions on a 1 to 5 scale keyed by genre name.
    #[serde(rename = "tt2Responses", default)]
    pub genres: BTreeMap<String, i64>,
    /// Selected game-type option indices.
    #[serde(rename = "tt3Responses", default)]
    pub game_types: Vec<i64>,
    /// Selected start-criteria option indices.
    #[serde(rename = "tt4Responses", default)]
    pub start_criteria: Vec<i64>,
    /// Paired narrative preferences keyed by pair name.
    #[serde(rename = "tt5Responses", default)]
    pub narrative_pairs: BTreeMap<String, i64>,
    /// Selected narrative-importance option indices.
    #[serde(rename = "tt6Responses", default)]
    pub narrative_importance: Vec<i64>,
    /// Selected presentation option indices.
    #[serde(rename = "tt7Responses", default)]
    pub presentation: Vec<i64>,
}

impl QuestionnaireAnswers {
    /// Check every raw value against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns the first [`AnswerValidationError`] found, scanning groups in
    /// section order.
    pub fn validate(&self, scale: PairScale) -> Result<(), AnswerValidationError> {
        if let Some((key, value)) = self.devices.iter().find(|(_, value)| **value < 0) {
            return Err(AnswerValidationError::NegativeDeviceFrequency {
                key: key.clone(),
                value: *value,
            });
        }
        if let Some((key, value)) = self
            .genres
            .iter()
            .find(|(_, value)| !(LIKERT_MIN..=LIKERT_MAX).contains(*value))
        {
            return Err(AnswerValidationError::GenreOutOfRange {
                key: key.clone(),
                value: *value,
            });
        }
        check_indices(FeatureGroup::GameType, &self.game_types)?;
        check_indices(FeatureGroup::StartCriteria, &self.start_criteria)?;
        let (min, max) = scale.bounds();
        if let Some((key, value)) = self
            .narrative_pairs
            .iter()
            .find(|(_, value)| !(min..=max).contains(*value))
        {
            return Err(AnswerValidationError::PairOutOfRange {
                key: key.clone(),
                value: *value,
                scale,
            });
        }
        check_indices(FeatureGroup::NarrativeImportance, &self.narrative_importance)?;
        check_indices(FeatureGroup::Presentation, &self.presentation)
    }
}

fn check_indices(group: FeatureGroup, indices: &[i64]) -> Result<(), AnswerValidationError> {
    match indices.iter().find(|index| **index < 0) {
        Some(index) => Err(AnswerValidationError::NegativeOptionIndex {
            group,
            index: *index,
        }),
        None => Ok(()),
    }
}

/// Errors raised by [`QuestionnaireAnswers::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerValidationError {
    /// A device frequency was negative.
    #[error("TT1 device '{key}' has negative frequency {value}")]
    NegativeDeviceFrequency {
        /// Device name.
        key: String,
        /// Rejected value.
        value: i64,
    },
    /// A genre opinion fell outside 1 to 5.
    #[error("TT2 genre '{key}' has opinion {value}; expected 1 to 5")]
    GenreOutOfRange {
        /// Genre name.
        key: String,
        /// Rejected value.
        value: i64,
    },
    /// A narrative pair value fell outside the configured scale.
    #[error("TT5 pair '{key}' has value {value} outside the {scale} scale")]
    PairOutOfRange {
        /// Pair name.
        key: String,
        /// Rejected value.
        value: i64,
        /// Scale the value was checked against.
        scale: PairScale,
    },
    /// A checklist contained a negative option index.
    #[error("{group} checklist contains negative option index {index}")]
    NegativeOptionIndex {
        /// Section holding the checklist.
        group: FeatureGroup,
        /// Rejected index.
        index: i64,
    },
}

/// Scale used by the paired narrative sliders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairScale {
    /// Values 1 to 5, where 3 is neutral.
    #[default]
    FivePoint,
    /// Values 0 or 1.
    Binary,
}

impl PairScale {
    /// Inclusive `(min, max)` raw bounds.
    #[must_use]
    pub const fn bounds(self) -> (i64, i64) {
        match self {
            Self::FivePoint => (1, 5),
            Self::Binary => (0, 1),
        }
    }

    /// Command-line and configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FivePoint => "five-point",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for PairScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a pair scale name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pair scale '{name}'; expected 'five-point' or 'binary'")]
pub struct ParsePairScaleError {
    /// The rejected name.
    pub name: String,
}

impl FromStr for PairScale {
    type Err = ParsePairScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "five-point" | "fivepoint" | "5" => Ok(Self::FivePoint),
            "binary" | "2" => Ok(Self::Binary),
            _ => Err(ParsePairScaleError { name: s.to_owned() }),
        }
    }
}
