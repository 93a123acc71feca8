//! Property-based tests for normalisation and classification.
//!
//! # Invariants tested
//!
//! - **Unit range:** Every normalised feature lies in `0.0..=1.0`.
//! - **Determinism:** Scoring the same answers twice yields the same outcome.
//! - **Winner is maximal:** The chosen profile holds the greatest score and
//!   no earlier profile ties it.
//! - **Rounding:** Every score is a multiple of `0.0001`.
//! - **Likert steps:** Genre features only take the five step values.
//! - **Neutral pairs:** Narrative pairs left unanswered normalise to `0.5`.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use persona_core::{FeatureGroup, Profile, QuestionnaireAnswers};
use persona_scorer::mapping::{SlotSource, mappings};
use persona_scorer::{CoefficientTable, NEUTRAL_PAIR, Normalizer, round_score, score_answers};
use proptest::prelude::*;

const GENRE_KEYS: &[&str] = &[
    "actionRPG",
    "construction",
    "horror",
    "moba",
    "rpg",
    "shooter",
    "strategy",
    "visualNovel",
    "notAGenre",
];

const PAIR_KEYS: &[&str] = &[
    "linearVsBranching",
    "realismVsFantasy",
    "storyVsGameplay",
    "character",
];

fn keyed(
    keys: &'static [&'static str],
    values: RangeInclusive<i64>,
) -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map(
        prop::sample::select(keys).prop_map(str::to_owned),
        values,
        0..keys.len(),
    )
}

fn checklist() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-2_i64..10, 0..6)
}

fn answers_strategy() -> impl Strategy<Value = QuestionnaireAnswers> {
    (
        keyed(&["smartphone", "mobile", "pc"], -1..=7),
        keyed(GENRE_KEYS, -3..=9),
        checklist(),
        checklist(),
        keyed(PAIR_KEYS, -3..=9),
        checklist(),
        checklist(),
    )
        .prop_map(
            |(devices, genres, game_types, start_criteria, narrative_pairs, importance, presentation)| {
                QuestionnaireAnswers {
                    devices,
                    genres,
                    game_types,
                    start_criteria,
                    narrative_pairs,
                    narrative_importance: importance,
                    presentation,
                }
            },
        )
}

fn builtin() -> &'static CoefficientTable {
    CoefficientTable::builtin().expect("built-in coefficients")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: normalised features stay inside the unit interval and
    /// dormant slots stay zero.
    #[test]
    fn features_stay_in_unit_range(answers in answers_strategy()) {
        let features = Normalizer::default().normalize(&answers);
        for (key, value) in features.iter() {
            prop_assert!((0.0..=1.0).contains(&value), "{key} = {value}");
        }
        for mapping in mappings() {
            if mapping.source == SlotSource::Dormant {
                prop_assert_eq!(features.get(mapping.key), 0.0);
            }
        }
    }

    /// Property: scoring is a pure function of the answers.
    #[test]
    fn scoring_is_deterministic(answers in answers_strategy()) {
        prop_assert_eq!(score_answers(&answers, builtin()), score_answers(&answers, builtin()));
    }

    /// Property: the winning profile has the highest score and wins ties
    /// against every later profile.
    #[test]
    fn winner_holds_the_first_maximum(answers in answers_strategy()) {
        let outcome = score_answers(&answers, builtin());
        let best = outcome.scores.max();
        prop_assert_eq!(outcome.scores.get(outcome.profile_type), best);
        for profile in Profile::ALL {
            if profile.position() < outcome.profile_type.position() {
                prop_assert!(outcome.scores.get(profile) < best);
            }
        }
    }

    /// Property: reported scores are already rounded to four decimals.
    #[test]
    fn scores_are_rounded(answers in answers_strategy()) {
        let outcome = score_answers(&answers, builtin());
        for (profile, score) in outcome.scores.iter() {
            prop_assert!(score.is_finite(), "{profile}");
            prop_assert_eq!(round_score(score), score);
        }
    }

    /// Property: genre opinions land on one of the five Likert steps.
    #[test]
    fn genre_features_follow_likert_steps(answers in answers_strategy()) {
        let features = Normalizer::default().normalize(&answers);
        for (key, value) in features.iter() {
            if key.group() == FeatureGroup::Genre {
                prop_assert!([0.0, 0.25, 0.5, 0.75, 1.0].contains(&value), "{key} = {value}");
            }
        }
    }

    /// Property: every collected narrative pair without an answer is neutral.
    #[test]
    fn unanswered_pairs_are_neutral(answers in answers_strategy()) {
        let features = Normalizer::default().normalize(&answers);
        for mapping in mappings() {
            if let SlotSource::Pair(keys) = mapping.source {
                if !keys.iter().any(|key| answers.narrative_pairs.contains_key(*key)) {
                    prop_assert_eq!(features.get(mapping.key), NEUTRAL_PAIR);
                }
            }
        }
    }
}
