//! Test-only fixtures and an in-memory `CandidateStore` used by unit and
//! behaviour tests.

use std::collections::BTreeMap;
use std::convert::Infallible;

use chrono::{NaiveDate, Utc};

use crate::candidate::household_key;
use crate::{
    Applicant, CandidateId, CandidateRecord, CandidateStore, CandidateSubmission, FeatureKey,
    FeatureVector, NewCandidate, Profile, QuestionnaireAnswers, ScoreOutcome, ScoreSet,
    ScreeningAnswers,
};

/// In-memory `CandidateStore` implementation used in tests.
///
/// Records are kept in insertion order and identifiers start at 1.
#[derive(Default, Debug)]
pub struct MemoryStore {
    records: Vec<CandidateRecord>,
}

impl CandidateStore for MemoryStore {
    type Error = Infallible;

    fn insert(&mut self, candidate: &NewCandidate) -> Result<CandidateRecord, Self::Error> {
        let next_id = self.records.last().map_or(1, |record| record.id.get() + 1);
        let record = CandidateRecord {
            id: CandidateId::new(next_id),
            applicant: candidate.applicant.clone(),
            answers: candidate.answers.clone(),
            features: candidate.features,
            scores: candidate.outcome.scores,
            profile_type: candidate.outcome.profile_type,
            created_at: Utc::now(),
        };
        self.records.push(record.clone());
        Ok(record)
    }

    fn get(&self, id: CandidateId) -> Result<Option<CandidateRecord>, Self::Error> {
        Ok(self.records.iter().find(|record| record.id == id).cloned())
    }

    fn list(&self, profile: Option<Profile>) -> Result<Vec<CandidateRecord>, Self::Error> {
        Ok(self
            .records
            .iter()
            .rev()
            .filter(|record| profile.is_none_or(|wanted| record.profile_type == wanted))
            .cloned()
            .collect())
    }

    fn household_registered(&self, address: &str, zip_code: &str) -> Result<bool, Self::Error> {
        let key = household_key(address, zip_code);
        Ok(self
            .records
            .iter()
            .any(|record| record.applicant.household_key() == key))
    }
}

fn birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1994, 8, 21).unwrap_or_default()
}

/// Applicant with every field filled in.
#[must_use]
pub fn sample_applicant() -> Applicant {
    Applicant {
        full_name: String::from("Ana Souza"),
        email: String::from("ana.souza@example.com"),
        phone: String::from("+55 11 91234-5678"),
        date_of_birth: birth_date(),
        address: String::from("Rua Augusta, 1500"),
        city: String::from("São Paulo"),
        state: String::from("SP"),
        zip_code: String::from("01304-001"),
        education: String::from("Ensino superior completo"),
        experience: String::from("Testes de usabilidade"),
        languages: String::from("Português, Inglês"),
        availability: String::from("Noites e fins de semana"),
    }
}

/// Questionnaire answers touching every section.
#[must_use]
pub fn sample_answers() -> QuestionnaireAnswers {
    QuestionnaireAnswers {
        devices: BTreeMap::from([
            (String::from("playstation5"), 5),
            (String::from("smartphone"), 7),
        ]),
        genres: BTreeMap::from([
            (String::from("rpg"), 5),
            (String::from("visualNovel"), 4),
            (String::from("shooter"), 1),
        ]),
        game_types: vec![0, 4],
        start_criteria: vec![0, 1],
        narrative_pairs: BTreeMap::from([
            (String::from("linearVsBranching"), 4),
            (String::from("storyVsGameplay"), 2),
        ]),
        narrative_importance: vec![0, 1, 3],
        presentation: vec![1, 4],
    }
}

/// Screening answers that pass every check.
#[must_use]
pub fn sample_screening() -> ScreeningAnswers {
    ScreeningAnswers {
        birth_date: birth_date(),
        subscription_status: String::from("Sim, sou assinante atual"),
        play_frequency: String::from("Semanalmente"),
        recent_participation: false,
        streamer: false,
        social_posting: String::from("Não"),
        household_registered: false,
    }
}

/// Complete, valid submission.
#[must_use]
pub fn sample_submission() -> CandidateSubmission {
    CandidateSubmission {
        applicant: sample_applicant(),
        answers: sample_answers(),
        screening: sample_screening(),
    }
}

/// Scored candidate whose winning profile is `profile`.
#[must_use]
pub fn sample_new_candidate(profile: Profile) -> NewCandidate {
    let mut features = FeatureVector::default();
    features.set(FeatureKey::MOBILE, 1.0);
    let scores = ScoreSet::from_fn(|p| if p == profile { 1.25 } else { 0.5 });
    NewCandidate {
        applicant: sample_applicant(),
        answers: sample_answers(),
        features,
        outcome: ScoreOutcome {
            scores,
            profile_type: profile,
        },
    }
}
