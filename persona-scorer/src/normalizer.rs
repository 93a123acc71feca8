//! Turn raw questionnaire answers into a fully populated feature vector.

use std::collections::BTreeMap;

use log::{debug, warn};
use persona_core::answers::{LIKERT_MAX, LIKERT_MIN};
use persona_core::{FeatureGroup, FeatureKey, FeatureVector, PairScale, QuestionnaireAnswers};

use crate::mapping::{SlotSource, is_known_key, mappings};

/// Value given to a narrative pair the respondent skipped.
pub const NEUTRAL_PAIR: f64 = 0.5;

/// Maps [`QuestionnaireAnswers`] onto the 58-slot feature schema.
///
/// The normaliser is total: absent groups and keys fall back to neutral
/// values and out-of-range values are clamped, so every input yields a
/// vector.
///
/// # Examples
/// ```
/// use persona_core::{FeatureKey, QuestionnaireAnswers};
/// use persona_scorer::Normalizer;
///
/// let answers: QuestionnaireAnswers =
///     serde_json::from_str(r#"{"tt1Responses": {"smartphone": 3}}"#).expect("valid answers");
/// let features = Normalizer::default().normalize(&answers);
/// assert_eq!(features.get(FeatureKey::MOBILE), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    pair_scale: PairScale,
}

impl Normalizer {
    /// Build a normaliser reading narrative pairs on `pair_scale`.
    #[must_use]
    pub const fn new(pair_scale: PairScale) -> Self {
        Self { pair_scale }
    }

    /// Scale used for narrative pairs.
    #[must_use]
    pub const fn pair_scale(&self) -> PairScale {
        self.pair_scale
    }

    /// Normalise `answers` into a feature vector.
    #[must_use]
    pub fn normalize(&self, answers: &QuestionnaireAnswers) -> FeatureVector {
        report_unmapped(FeatureGroup::Genre, &answers.genres);
        report_unmapped(FeatureGroup::Narrative, &answers.narrative_pairs);

        let mut features = FeatureVector::default();
        for mapping in mappings() {
            let value = match mapping.source {
                SlotSource::Device(keys) => device_indicator(&answers.devices, keys),
                SlotSource::Likert(keys) => lookup(&answers.genres, keys)
                    .map_or(0.0, |(key, raw)| likert_value(mapping.key, key, raw)),
                SlotSource::Checklist(index) => {
                    checklist_value(checklist(answers, mapping.key.group()), index)
                }
                SlotSource::Pair(keys) => lookup(&answers.narrative_pairs, keys)
                    .map_or(NEUTRAL_PAIR, |(key, raw)| self.pair_value(mapping.key, key, raw)),
                SlotSource::Dormant => 0.0,
            };
            features.set(mapping.key, value);
        }
        features
    }

    fn pair_value(&self, slot: FeatureKey, key: &str, raw: i64) -> f64 {
        let (min, max) = self.pair_scale.bounds();
        let value = clamp_reported(slot, key, raw, min, max);
        match self.pair_scale {
            PairScale::FivePoint => step_value(value),
            PairScale::Binary if value >= 1 => 1.0,
            PairScale::Binary => 0.0,
        }
    }
}

fn lookup<'a>(
    responses: &'a BTreeMap<String, i64>,
    keys: &'static [&'static str],
) -> Option<(&'a str, i64)> {
    keys.iter().find_map(|key| {
        responses
            .get_key_value(*key)
            .map(|(name, value)| (name.as_str(), *value))
    })
}

fn device_indicator(devices: &BTreeMap<String, i64>, keys: &'static [&'static str]) -> f64 {
    let used = keys
        .iter()
        .any(|key| devices.get(*key).is_some_and(|frequency| *frequency > 0));
    if used { 1.0 } else { 0.0 }
}

fn likert_value(slot: FeatureKey, key: &str, raw: i64) -> f64 {
    step_value(clamp_reported(slot, key, raw, LIKERT_MIN, LIKERT_MAX))
}

/// Map a 1 to 5 answer onto `0.0..=1.0`, treating 1 as zero.
const fn step_value(value: i64) -> f64 {
    match value {
        2 => 0.25,
        3 => 0.5,
        4 => 0.75,
        5 => 1.0,
        _ => 0.0,
    }
}

fn clamp_reported(slot: FeatureKey, key: &str, raw: i64, min: i64, max: i64) -> i64 {
    let clamped = raw.clamp(min, max);
    if clamped != raw {
        warn!("clamped {slot} answer '{key}' from {raw} to {clamped}");
    }
    clamped
}

fn checklist(answers: &QuestionnaireAnswers, group: FeatureGroup) -> &[i64] {
    match group {
        FeatureGroup::GameType => &answers.game_types,
        FeatureGroup::StartCriteria => &answers.start_criteria,
        FeatureGroup::NarrativeImportance => &answers.narrative_importance,
        FeatureGroup::Presentation => &answers.presentation,
        FeatureGroup::Device | FeatureGroup::Genre | FeatureGroup::Narrative => &[],
    }
}

fn checklist_value(selected: &[i64], index: i64) -> f64 {
    if selected.contains(&index) { 1.0 } else { 0.0 }
}

fn report_unmapped(group: FeatureGroup, responses: &BTreeMap<String, i64>) {
    for key in responses.keys().filter(|key| !is_known_key(group, key)) {
        debug!("ignoring unmapped {group} answer '{key}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn key(name: &str) -> FeatureKey {
        name.parse().expect("valid feature key")
    }

    #[fixture]
    fn normalizer() -> Normalizer {
        Normalizer::default()
    }

    #[rstest]
    fn empty_answers_give_neutral_vector(normalizer: Normalizer) {
        let features = normalizer.normalize(&QuestionnaireAnswers::default());
        for (slot, value) in features.iter() {
            let expected = match slot.to_string().as_str() {
                "TT5_8" => 0.0,
                name if name.starts_with("TT5_") => NEUTRAL_PAIR,
                _ => 0.0,
            };
            assert_eq!(value, expected, "{slot}");
        }
    }

    #[rstest]
    #[case(1, 0.0)]
    #[case(2, 0.25)]
    #[case(3, 0.5)]
    #[case(4, 0.75)]
    #[case(5, 1.0)]
    #[case(0, 0.0)]
    #[case(9, 1.0)]
    fn genre_opinions_follow_likert_steps(
        normalizer: Normalizer,
        #[case] raw: i64,
        #[case] expected: f64,
    ) {
        let mut answers = QuestionnaireAnswers::default();
        answers.genres.insert(String::from("horror"), raw);
        assert_eq!(normalizer.normalize(&answers).get(key("TT2_7")), expected);
    }

    #[rstest]
    #[case("construction")]
    #[case("buildingManagement")]
    fn genre_aliases_fill_the_same_slot(normalizer: Normalizer, #[case] alias: &str) {
        let mut answers = QuestionnaireAnswers::default();
        answers.genres.insert(alias.to_owned(), 4);
        assert_eq!(normalizer.normalize(&answers).get(key("TT2_4")), 0.75);
    }

    #[rstest]
    fn first_listed_alias_wins(normalizer: Normalizer) {
        let mut answers = QuestionnaireAnswers::default();
        answers.genres.insert(String::from("strategy"), 5);
        answers.genres.insert(String::from("sports2"), 2);
        assert_eq!(normalizer.normalize(&answers).get(key("TT2_20")), 1.0);
    }

    #[rstest]
    #[case("smartphone", 4, 1.0)]
    #[case("mobile", 1, 1.0)]
    #[case("smartphone", 0, 0.0)]
    #[case("tablet", 7, 0.0)]
    fn mobile_indicator(
        normalizer: Normalizer,
        #[case] device: &str,
        #[case] frequency: i64,
        #[case] expected: f64,
    ) {
        let mut answers = QuestionnaireAnswers::default();
        answers.devices.insert(device.to_owned(), frequency);
        assert_eq!(normalizer.normalize(&answers).get(FeatureKey::MOBILE), expected);
    }

    #[rstest]
    fn checklists_mark_selected_options(normalizer: Normalizer) {
        let answers = QuestionnaireAnswers {
            game_types: vec![0, 6, 6, 42],
            presentation: vec![5],
            ..QuestionnaireAnswers::default()
        };
        let features = normalizer.normalize(&answers);
        assert_eq!(features.get(key("TT3_1")), 1.0);
        assert_eq!(features.get(key("TT3_7")), 1.0);
        assert_eq!(features.get(key("TT3_2")), 0.0);
        assert_eq!(features.get(key("TT7_6")), 1.0);
        assert_eq!(features.get(key("TT4_1")), 0.0);
    }

    #[rstest]
    fn five_point_pairs_scale_to_unit_range(normalizer: Normalizer) {
        let mut answers = QuestionnaireAnswers::default();
        answers
            .narrative_pairs
            .insert(String::from("storyVsGameplay"), 4);
        answers
            .narrative_pairs
            .insert(String::from("linearVsBranching"), 1);
        let features = normalizer.normalize(&answers);
        assert_eq!(features.get(key("TT5_7")), 0.75);
        assert_eq!(features.get(key("TT5_1")), 0.0);
        assert_eq!(features.get(key("TT5_2")), NEUTRAL_PAIR);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, 1.0)]
    #[case(3, 1.0)]
    fn binary_pairs(#[case] raw: i64, #[case] expected: f64) {
        let mut answers = QuestionnaireAnswers::default();
        answers
            .narrative_pairs
            .insert(String::from("realismVsFantasy"), raw);
        let features = Normalizer::new(PairScale::Binary).normalize(&answers);
        assert_eq!(features.get(key("TT5_4")), expected);
    }

    #[rstest]
    fn dormant_slot_stays_zero(normalizer: Normalizer) {
        let mut answers = QuestionnaireAnswers::default();
        answers.narrative_pairs.insert(String::from("character"), 5);
        assert_eq!(normalizer.normalize(&answers).get(key("TT5_8")), 0.0);
    }
}
