//! Candidate submissions and the records persisted for them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    AnswerValidationError, FeatureGroup, FeatureVector, PairScale, Profile, QuestionnaireAnswers,
    ScoreOutcome, ScoreSet, ScreeningAnswers,
};

/// Identity, contact and professional details of an applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    /// Full legal name.
    pub full_name: String,
    /// Contact e-mail address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Street address; with the zip code it identifies a household.
    pub address: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
    /// Highest education level.
    pub education: String,
    /// Professional experience.
    pub experience: String,
    /// Spoken languages.
    pub languages: String,
    /// Availability for sessions.
    pub availability: String,
}

impl Applicant {
    /// Reject blank fields and malformed e-mail addresses.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::MissingField`] for the first blank field or
    /// [`SubmissionError::InvalidEmail`].
    pub fn validate(&self) -> Result<(), SubmissionError> {
        let fields = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
            ("education", &self.education),
            ("experience", &self.experience),
            ("languages", &self.languages),
            ("availability", &self.availability),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(SubmissionError::MissingField { field: *field });
        }
        if is_plausible_email(&self.email) {
            Ok(())
        } else {
            Err(SubmissionError::InvalidEmail {
                email: self.email.clone(),
            })
        }
    }
}

impl Applicant {
    /// Key identifying the applicant's household.
    #[must_use]
    pub fn household_key(&self) -> String {
        household_key(&self.address, &self.zip_code)
    }
}

/// Normalise an address and zip code into a household key.
///
/// Case and runs of whitespace in the address are ignored, as is
/// punctuation in the zip code, so `"Rua A,  10"`/`"01310-100"` and
/// `"rua a, 10"`/`"01310100"` name the same household.
#[must_use]
pub fn household_key(address: &str, zip_code: &str) -> String {
    let address = address
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    let zip: String = zip_code
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("{zip}|{address}")
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Everything a respondent sends in one submission.
///
/// Applicant fields and questionnaire groups sit at the top level; screening
/// answers are nested under `screening`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    /// Identity and professional details.
    #[serde(flatten)]
    pub applicant: Applicant,
    /// Questionnaire answers.
    #[serde(flatten)]
    pub answers: QuestionnaireAnswers,
    /// Pre-screening answers.
    pub screening: ScreeningAnswers,
}

impl CandidateSubmission {
    /// Validate the submission before it reaches the gate and the scorer.
    ///
    /// Checklist sections must carry at least one selection and every raw
    /// answer must lie within its range.
    ///
    /// # Errors
    ///
    /// Returns the first [`SubmissionError`] found.
    pub fn validate(&self, scale: PairScale) -> Result<(), SubmissionError> {
        self.applicant.validate()?;
        if self.applicant.date_of_birth != self.screening.birth_date {
            return Err(SubmissionError::BirthDateMismatch {
                applicant: self.applicant.date_of_birth,
                screening: self.screening.birth_date,
            });
        }
        let checklists = [
            (FeatureGroup::GameType, &self.answers.game_types),
            (FeatureGroup::StartCriteria, &self.answers.start_criteria),
            (FeatureGroup::NarrativeImportance, &self.answers.narrative_importance),
            (FeatureGroup::Presentation, &self.answers.presentation),
        ];
        if let Some((group, _)) = checklists.iter().find(|(_, picks)| picks.is_empty()) {
            return Err(SubmissionError::EmptyChecklist { group: *group });
        }
        self.answers.validate(scale)?;
        Ok(())
    }
}

/// Errors raised while validating a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// A required text field was blank.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },
    /// The e-mail address is malformed.
    #[error("invalid e-mail address '{email}'")]
    InvalidEmail {
        /// Rejected address.
        email: String,
    },
    /// Applicant and screening birth dates disagree.
    #[error("date of birth {applicant} does not match screening birth date {screening}")]
    BirthDateMismatch {
        /// Date given with the applicant details.
        applicant: NaiveDate,
        /// Date given in the screening answers.
        screening: NaiveDate,
    },
    /// A checklist section had no selections.
    #[error("{group} requires at least one selection")]
    EmptyChecklist {
        /// Section holding the checklist.
        group: FeatureGroup,
    },
    /// A raw answer was out of range.
    #[error("invalid questionnaire answer: {0}")]
    Answers(#[from] AnswerValidationError),
}

/// Identifier assigned to a persisted candidate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CandidateId(i64);

impl CandidateId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scored candidate ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCandidate {
    /// Identity and professional details.
    pub applicant: Applicant,
    /// Raw questionnaire answers.
    pub answers: QuestionnaireAnswers,
    /// Normalised features the scores were computed from.
    pub features: FeatureVector,
    /// Rounded scores and winning profile.
    pub outcome: ScoreOutcome,
}

/// A candidate as persisted by a [`CandidateStore`](crate::CandidateStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    /// Store-assigned identifier.
    pub id: CandidateId,
    /// Identity and professional details.
    #[serde(flatten)]
    pub applicant: Applicant,
    /// Raw questionnaire answers.
    pub answers: QuestionnaireAnswers,
    /// Normalised features.
    pub features: FeatureVector,
    /// Rounded scores.
    pub scores: ScoreSet,
    /// Winning profile.
    pub profile_type: Profile,
    /// Time the record was created.
    pub created_at: DateTime<Utc>,
}

/// Candidate counts for the admin view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStats {
    /// Number of stored candidates.
    pub total: u64,
    /// Candidates per profile; every profile is present.
    pub by_profile: BTreeMap<Profile, u64>,
}

impl Default for CandidateStats {
    fn default() -> Self {
        Self {
            total: 0,
            by_profile: Profile::ALL.into_iter().map(|profile| (profile, 0)).collect(),
        }
    }
}

impl CandidateStats {
    /// Tally the given profiles.
    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let mut stats = Self::default();
        for profile in profiles {
            stats.record(profile, 1);
        }
        stats
    }

    /// Add `count` candidates classified as `profile`.
    pub fn record(&mut self, profile: Profile, count: u64) {
        self.total += count;
        *self.by_profile.entry(profile).or_default() += count;
    }

    /// Number of candidates classified as `profile`.
    #[must_use]
    pub fn count(&self, profile: Profile) -> u64 {
        self.by_profile.get(&profile).copied().unwrap_or_default()
    }
}
