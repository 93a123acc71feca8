//! Linear profile classifier.

use persona_core::{FeatureVector, Profile, ScoreOutcome, ScoreSet};

use crate::CoefficientTable;

/// Scores a feature vector against every profile and picks the winner.
///
/// Scores are rounded to four decimal places before comparison. The winner
/// is the profile with the strictly greatest rounded score, scanning in
/// canonical order, so ties go to the earlier profile.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'t> {
    table: &'t CoefficientTable,
}

impl<'t> Classifier<'t> {
    /// Build a classifier over `table`.
    #[must_use]
    pub const fn new(table: &'t CoefficientTable) -> Self {
        Self { table }
    }

    /// Rounded score for every profile.
    #[must_use]
    pub fn scores(&self, features: &FeatureVector) -> ScoreSet {
        ScoreSet::from_fn(|profile| round_score(self.table.score(profile, features)))
    }

    /// Rounded scores and the winning profile.
    #[must_use]
    pub fn classify(&self, features: &FeatureVector) -> ScoreOutcome {
        let scores = self.scores(features);
        ScoreOutcome {
            scores,
            profile_type: select_profile(&scores),
        }
    }
}

/// Round to four decimal places, halves away from zero.
///
/// Magnitudes too large to scale are returned unchanged; they carry no
/// fractional digits at that precision anyway.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "rounding scales by a power of ten"
)]
pub fn round_score(score: f64) -> f64 {
    let scaled = score * 10_000.0;
    if !scaled.is_finite() {
        return score;
    }
    scaled.round() / 10_000.0
}

/// First profile, in canonical order, holding the strictly greatest score.
#[must_use]
pub fn select_profile(scores: &ScoreSet) -> Profile {
    let mut best = Profile::Empath;
    let mut best_score = scores.get(best);
    for (profile, score) in scores.iter().skip(1) {
        if score > best_score {
            best = profile;
            best_score = score;
        }
    }
    best
}
