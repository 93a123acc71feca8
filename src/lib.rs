//! Facade crate for the Persona recruitment engine.
//!
//! This crate re-exports the core domain types and exposes the scoring engine
//! and the SQLite candidate store behind feature flags.

#![forbid(unsafe_code)]

pub use persona_core::{
    Applicant, CandidateId, CandidateRecord, CandidateStats, CandidateStore, CandidateSubmission,
    DisqualificationReason, Eligibility, EligibilityReport, FEATURE_COUNT, FeatureGroup,
    FeatureKey, FeatureVector, NewCandidate, PairScale, Profile, ProfileDescription,
    QuestionnaireAnswers, ScoreOutcome, ScoreSet, ScreeningAnswers, SubmissionError, screen,
};

#[cfg(feature = "store-sqlite")]
pub use persona_core::{SqliteCandidateStore, SqliteCandidateStoreError};

#[cfg(feature = "scorer")]
pub use persona_scorer::{
    Classifier, CoefficientError, CoefficientTable, Evaluation, Normalizer, evaluate,
    score_answers, score_answers_with,
};
