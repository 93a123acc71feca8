//! Explicit table mapping raw questionnaire answers onto feature slots.
//!
//! Every one of the 58 slots has exactly one entry. Keyed answers list every
//! spelling the questionnaire has used for the same question; checklist slots
//! name the option index they read. Slots the questionnaire never collects are
//! marked [`SlotSource::Dormant`] and always normalise to zero.

use persona_core::{FEATURE_COUNT, FeatureGroup, FeatureKey};

use FeatureGroup::{
    Device, GameType, Genre, Narrative, NarrativeImportance, Presentation, StartCriteria,
};
use SlotSource::{Checklist, Dormant, Likert, Pair};

/// Where a feature slot takes its raw value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSource {
    /// `1` when any listed device has a positive frequency.
    Device(&'static [&'static str]),
    /// Genre opinion on the 1 to 5 scale, read from the first listed key
    /// present.
    Likert(&'static [&'static str]),
    /// `1` when the option index is selected in the slot's checklist.
    Checklist(i64),
    /// Narrative pair slider, read from the first listed key present.
    Pair(&'static [&'static str]),
    /// Never collected; always `0`.
    Dormant,
}

impl SlotSource {
    /// Short name of the normalisation rule.
    #[must_use]
    pub const fn rule(self) -> &'static str {
        match self {
            Self::Device(_) => "indicator",
            Self::Likert(_) => "likert",
            Self::Checklist(_) => "checklist",
            Self::Pair(_) => "pair",
            Self::Dormant => "dormant",
        }
    }

    /// Raw answer keys read by keyed sources.
    #[must_use]
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Device(keys) | Self::Likert(keys) | Self::Pair(keys) => keys,
            Self::Checklist(_) | Self::Dormant => &[],
        }
    }
}

/// One row of the mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMapping {
    /// Target feature slot.
    pub key: FeatureKey,
    /// Raw value source.
    pub source: SlotSource,
}

const fn slot(group: FeatureGroup, index: u8, source: SlotSource) -> SlotMapping {
    let Some(key) = FeatureKey::new(group, index) else {
        panic!("slot outside feature group");
    };
    SlotMapping { key, source }
}

static MAPPINGS: [SlotMapping; FEATURE_COUNT] = [
    slot(Device, 1, SlotSource::Device(&["smartphone", "mobile"])),
    slot(Genre, 1, Likert(&["actionAdventure"])),
    slot(Genre, 2, Likert(&["actionRPG"])),
    slot(Genre, 3, Likert(&["battleRoyale"])),
    slot(Genre, 4, Likert(&["construction", "buildingManagement"])),
    slot(Genre, 5, Likert(&["cardGames", "digitalCardGames"])),
    slot(Genre, 6, Likert(&["fighting"])),
    slot(Genre, 7, Likert(&["horror"])),
    slot(Genre, 8, Likert(&["lifeSimulation"])),
    slot(Genre, 9, Likert(&["mmo"])),
    slot(Genre, 10, Likert(&["moba"])),
    slot(Genre, 11, Likert(&["monsterTaming"])),
    slot(Genre, 12, Likert(&["openWorldSandbox"])),
    slot(Genre, 13, Likert(&["partySocial"])),
    slot(Genre, 14, Likert(&["platformer"])),
    slot(Genre, 15, Likert(&["puzzleCasual", "puzzleCasualArcade"])),
    slot(Genre, 16, Likert(&["racing"])),
    slot(Genre, 17, Likert(&["rpg"])),
    slot(Genre, 18, Likert(&["shooter"])),
    slot(Genre, 19, Likert(&["sports"])),
    slot(Genre, 20, Likert(&["strategy", "sports2"])),
    slot(Genre, 21, Likert(&["survival"])),
    slot(Genre, 22, Likert(&["visualNovel"])),
    slot(GameType, 1, Checklist(0)),
    slot(GameType, 2, Checklist(1)),
    slot(GameType, 3, Checklist(2)),
    slot(GameType, 4, Checklist(3)),
    slot(GameType, 5, Checklist(4)),
    slot(GameType, 6, Checklist(5)),
    slot(GameType, 7, Checklist(6)),
    slot(StartCriteria, 1, Checklist(0)),
    slot(StartCriteria, 2, Checklist(1)),
    slot(StartCriteria, 3, Checklist(2)),
    slot(StartCriteria, 4, Checklist(3)),
    slot(StartCriteria, 5, Checklist(4)),
    slot(StartCriteria, 6, Checklist(5)),
    slot(StartCriteria, 7, Checklist(6)),
    slot(StartCriteria, 8, Checklist(7)),
    slot(Narrative, 1, Pair(&["linearVsBranching"])),
    slot(Narrative, 2, Pair(&["guidedVsFreeExploration"])),
    slot(Narrative, 3, Pair(&["dialogueVsAction"])),
    slot(Narrative, 4, Pair(&["realismVsFantasy"])),
    slot(Narrative, 5, Pair(&["seriousVsHumorous"])),
    slot(Narrative, 6, Pair(&["definedVsCustomizable"])),
    slot(Narrative, 7, Pair(&["storyVsGameplay"])),
    slot(Narrative, 8, Dormant),
    slot(NarrativeImportance, 1, Checklist(0)),
    slot(NarrativeImportance, 2, Checklist(1)),
    slot(NarrativeImportance, 3, Checklist(2)),
    slot(NarrativeImportance, 4, Checklist(3)),
    slot(NarrativeImportance, 5, Checklist(4)),
    slot(NarrativeImportance, 6, Checklist(5)),
    slot(Presentation, 1, Checklist(0)),
    slot(Presentation, 2, Checklist(1)),
    slot(Presentation, 3, Checklist(2)),
    slot(Presentation, 4, Checklist(3)),
    slot(Presentation, 5, Checklist(4)),
    slot(Presentation, 6, Checklist(5)),
];

/// The full mapping table in canonical slot order.
#[must_use]
pub const fn mappings() -> &'static [SlotMapping] {
    &MAPPINGS
}

/// Mapping entry for `key`.
#[must_use]
pub fn mapping_for(key: FeatureKey) -> Option<&'static SlotMapping> {
    MAPPINGS.get(key.position()).filter(|mapping| mapping.key == key)
}

/// Slots the questionnaire never collects.
pub fn dormant_features() -> impl Iterator<Item = FeatureKey> {
    MAPPINGS
        .iter()
        .filter(|mapping| mapping.source == Dormant)
        .map(|mapping| mapping.key)
}

/// Whether `raw_key` is read by any slot of `group`.
#[must_use]
pub fn is_known_key(group: FeatureGroup, raw_key: &str) -> bool {
    MAPPINGS
        .iter()
        .filter(|mapping| mapping.key.group() == group)
        .any(|mapping| mapping.source.keys().contains(&raw_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_covers_every_slot_once_in_order() {
        let keys: Vec<FeatureKey> = mappings().iter().map(|mapping| mapping.key).collect();
        assert_eq!(keys, FeatureKey::all().collect::<Vec<_>>());
    }

    #[test]
    fn only_the_last_narrative_slot_is_dormant() {
        let dormant: Vec<String> = dormant_features().map(|key| key.to_string()).collect();
        assert_eq!(dormant, vec![String::from("TT5_8")]);
    }

    #[test]
    fn keyed_sources_do_not_share_raw_keys() {
        let mut seen = HashSet::new();
        for mapping in mappings() {
            for raw in mapping.source.keys() {
                assert!(
                    seen.insert((mapping.key.group(), *raw)),
                    "{raw} mapped twice in {}",
                    mapping.key.group()
                );
            }
        }
    }

    #[test]
    fn checklist_indices_follow_slot_numbers() {
        for mapping in mappings() {
            if let SlotSource::Checklist(index) = mapping.source {
                assert_eq!(index + 1, i64::from(mapping.key.slot()));
            }
        }
    }

    #[test]
    fn genre_aliases_are_known() {
        assert!(is_known_key(FeatureGroup::Genre, "construction"));
        assert!(is_known_key(FeatureGroup::Genre, "buildingManagement"));
        assert!(!is_known_key(FeatureGroup::Genre, "linearVsBranching"));
    }

    #[test]
    fn lookup_by_key_finds_matching_row() {
        let mapping = mapping_for(FeatureKey::MOBILE).expect("mobile slot mapped");
        assert_eq!(mapping.source.rule(), "indicator");
    }
}
