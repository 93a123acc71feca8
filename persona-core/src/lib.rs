//! Core domain types for the persona questionnaire engine.
//!
//! The crate models the questionnaire (raw answers and the 58-slot feature
//! schema), the five behavioural profiles, score sets, the eligibility gate
//! applied before scoring, and the append-only candidate store. Constructors
//! and validators return `Result` so malformed input is rejected at the
//! boundary rather than deep inside scoring.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod answers;
pub mod candidate;
pub mod eligibility;
pub mod feature;
pub mod profile;
pub mod scores;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use answers::{AnswerValidationError, PairScale, ParsePairScaleError, QuestionnaireAnswers};
pub use candidate::{
    Applicant, CandidateId, CandidateRecord, CandidateStats, CandidateSubmission, NewCandidate,
    SubmissionError, household_key,
};
pub use eligibility::{
    DisqualificationReason, Eligibility, EligibilityReport, ScreeningAnswers, age_on, screen,
};
pub use feature::{
    FEATURE_COUNT, FeatureGroup, FeatureKey, FeatureVector, ParseFeatureKeyError,
};
pub use profile::{ParseProfileError, Profile, ProfileDescription};
pub use scores::{ScoreOutcome, ScoreSet};
pub use store::CandidateStore;

#[cfg(feature = "store-sqlite")]
pub use store::{SchemaError, SqliteCandidateStore, SqliteCandidateStoreError};
