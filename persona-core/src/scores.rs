//! Per-profile scores and the classification outcome.

use serde::{Deserialize, Serialize};

use crate::Profile;

/// One score per profile, indexed by [`Profile::position`].
///
/// Serialises as `{"Empath": .., "Pioneer": .., ...}`.
///
/// # Examples
/// ```
/// use persona_core::{Profile, ScoreSet};
///
/// let scores = ScoreSet::from_fn(|profile| if profile == Profile::Nester { 2.5 } else { 0.0 });
/// assert_eq!(scores.get(Profile::Nester), 2.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScoreSetRepr", into = "ScoreSetRepr")]
pub struct ScoreSet([f64; Profile::COUNT]);

impl ScoreSet {
    /// Build a score set from values in canonical profile order.
    #[must_use]
    pub const fn new(values: [f64; Profile::COUNT]) -> Self {
        Self(values)
    }

    /// Build a score set by evaluating `score` for every profile.
    pub fn from_fn(mut score: impl FnMut(Profile) -> f64) -> Self {
        Self(Profile::ALL.map(&mut score))
    }

    /// Score recorded for `profile`.
    #[must_use]
    pub fn get(&self, profile: Profile) -> f64 {
        self.0.get(profile.position()).copied().unwrap_or_default()
    }

    /// Iterate over `(profile, score)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Profile, f64)> + '_ {
        Profile::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Largest score in the set.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScoreSetRepr {
    empath: f64,
    pioneer: f64,
    mechanist: f64,
    collaborator: f64,
    nester: f64,
}

impl From<ScoreSetRepr> for ScoreSet {
    fn from(repr: ScoreSetRepr) -> Self {
        Self([
            repr.empath,
            repr.pioneer,
            repr.mechanist,
            repr.collaborator,
            repr.nester,
        ])
    }
}

impl From<ScoreSet> for ScoreSetRepr {
    fn from(scores: ScoreSet) -> Self {
        let [empath, pioneer, mechanist, collaborator, nester] = scores.0;
        Self {
            empath,
            pioneer,
            mechanist,
            collaborator,
            nester,
        }
    }
}

/// Rounded scores together with the winning profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutcome {
    /// Scores rounded to four decimals.
    pub scores: ScoreSet,
    /// Profile with the highest score.
    pub profile_type: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_with_profile_names() {
        let scores = ScoreSet::new([1.0, 2.0, 3.0, 4.0, 5.5]);
        let json = serde_json::to_value(scores).expect("serialise scores");
        assert_eq!(json["Empath"], 1.0);
        assert_eq!(json["Nester"], 5.5);

        let back: ScoreSet = serde_json::from_value(json).expect("deserialise scores");
        assert_eq!(back, scores);
    }

    #[test]
    fn outcome_uses_camel_case() {
        let outcome = ScoreOutcome {
            scores: ScoreSet::default(),
            profile_type: Profile::Pioneer,
        };
        let json = serde_json::to_value(outcome).expect("serialise outcome");
        assert_eq!(json["profileType"], "Pioneer");
    }

    #[test]
    fn max_spans_every_profile() {
        let scores = ScoreSet::new([-1.0, -0.5, -3.0, -0.25, -2.0]);
        assert_eq!(scores.max(), -0.25);
    }
}
