//! Scoring engine for persona questionnaires.
//!
//! The crate turns raw [`QuestionnaireAnswers`] into one of five behavioural
//! profiles in two steps:
//! - **Normalisation** maps each answer group onto the fixed 58-slot feature
//!   schema through an explicit table of slot sources (see [`mapping`]).
//!   Missing answers take neutral values, so every input produces a complete
//!   [`FeatureVector`].
//! - **Classification** takes the dot product of the vector with each
//!   profile's row in a [`CoefficientTable`], rounds to four decimals and
//!   picks the highest score, ties going to the earlier profile.
//!
//! A coefficient table ships with the crate and is parsed once per process;
//! alternative tables can be read from JSON.
//!
//! # Examples
//!
//! ```
//! use persona_core::QuestionnaireAnswers;
//! use persona_scorer::{CoefficientTable, score_answers};
//!
//! let answers: QuestionnaireAnswers = serde_json::from_str(
//!     r#"{"tt2Responses": {"visualNovel": 5, "rpg": 5}, "tt6Responses": [0, 1, 3]}"#,
//! )
//! .expect("valid answers");
//! let table = CoefficientTable::builtin().expect("built-in coefficients");
//!
//! let outcome = score_answers(&answers, table);
//! assert_eq!(outcome.scores.get(outcome.profile_type), outcome.scores.max());
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use persona_core::{FeatureVector, QuestionnaireAnswers, ScoreOutcome};

mod classifier;
mod coefficients;
mod error;
pub mod mapping;
mod normalizer;

pub use classifier::{Classifier, round_score, select_profile};
pub use coefficients::CoefficientTable;
pub use error::CoefficientError;
pub use normalizer::{NEUTRAL_PAIR, Normalizer};

/// Features and outcome produced for one respondent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Normalised features.
    pub features: FeatureVector,
    /// Rounded scores and winning profile.
    pub outcome: ScoreOutcome,
}

/// Normalise `answers` with `normalizer` and classify them against `table`.
#[must_use]
pub fn evaluate(
    normalizer: &Normalizer,
    answers: &QuestionnaireAnswers,
    table: &CoefficientTable,
) -> Evaluation {
    let features = normalizer.normalize(answers);
    let outcome = Classifier::new(table).classify(&features);
    Evaluation { features, outcome }
}

/// Score `answers` with the default normaliser.
#[must_use]
pub fn score_answers(answers: &QuestionnaireAnswers, table: &CoefficientTable) -> ScoreOutcome {
    score_answers_with(&Normalizer::default(), answers, table)
}

/// Score `answers` with an explicitly configured normaliser.
#[must_use]
pub fn score_answers_with(
    normalizer: &Normalizer,
    answers: &QuestionnaireAnswers,
    table: &CoefficientTable,
) -> ScoreOutcome {
    evaluate(normalizer, answers, table).outcome
}
