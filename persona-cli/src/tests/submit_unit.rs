//! Focused unit tests covering the submission pipeline.

use super::helpers::{Workspace, submission_at};
use super::*;
use crate::submit::{
    Pipeline, SubmissionOutcome, SubmitConfig, config_from_layers_for_test, execute_submit,
    process_submission,
};
use chrono::NaiveDate;
use persona_core::test_support::{MemoryStore, sample_submission};
use persona_core::{
    CandidateStore, DisqualificationReason, FeatureGroup, PairScale, SubmissionError,
};
use persona_scorer::{CoefficientTable, Normalizer};
use rstest::{fixture, rstest};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

#[fixture]
fn pipeline() -> Pipeline<'static> {
    Pipeline {
        table: CoefficientTable::builtin().expect("built-in coefficients"),
        normalizer: Normalizer::default(),
        today: as_of(),
    }
}

fn config_for(workspace: &Workspace, submission: &persona_core::CandidateSubmission) -> SubmitConfig {
    SubmitConfig {
        submission_path: workspace.write_json("submission.json", submission),
        database: workspace.path("candidates.db"),
        coefficients: None,
        pair_scale: PairScale::FivePoint,
        as_of: as_of(),
    }
}

fn disqualification(outcome: &SubmissionOutcome) -> DisqualificationReason {
    match outcome {
        SubmissionOutcome::Disqualified { reason, .. } => *reason,
        other => panic!("expected Disqualified, found {other:?}"),
    }
}

#[rstest]
fn eligible_applicants_are_scored_and_stored(pipeline: Pipeline<'static>) {
    let mut store = MemoryStore::default();
    let outcome =
        process_submission(&mut store, &sample_submission(), &pipeline).expect("process");

    let SubmissionOutcome::Classified { id, profile_type, scores, description, .. } = outcome
    else {
        panic!("expected Classified, found {outcome:?}");
    };
    assert_eq!(id.get(), 1);
    assert_eq!(scores.get(profile_type), scores.max());
    assert_eq!(description.name, profile_type.description().name);

    let stored = store.get(id).expect("memory store").expect("stored record");
    assert_eq!(stored.profile_type, profile_type);
    assert_eq!(stored.applicant, sample_submission().applicant);
}

#[rstest]
fn registered_households_are_disqualified(pipeline: Pipeline<'static>) {
    let mut store = MemoryStore::default();
    process_submission(&mut store, &submission_at("Rua Augusta, 1500"), &pipeline)
        .expect("first submission");

    let outcome = process_submission(&mut store, &submission_at("  RUA  augusta, 1500 "), &pipeline)
        .expect("second submission");
    assert_eq!(disqualification(&outcome), DisqualificationReason::DuplicateAddress);
    assert_eq!(store.list(None).expect("memory store").len(), 1);
}

#[rstest]
fn self_declared_household_is_disqualified(pipeline: Pipeline<'static>) {
    let mut submission = sample_submission();
    submission.screening.household_registered = true;
    let mut store = MemoryStore::default();
    let outcome = process_submission(&mut store, &submission, &pipeline).expect("process");
    assert_eq!(disqualification(&outcome), DisqualificationReason::DuplicateAddress);
}

#[rstest]
fn under_age_applicants_are_not_stored(pipeline: Pipeline<'static>) {
    let young = NaiveDate::from_ymd_opt(2010, 1, 1).expect("valid date");
    let mut submission = sample_submission();
    submission.applicant.date_of_birth = young;
    submission.screening.birth_date = young;
    let mut store = MemoryStore::default();

    let outcome = process_submission(&mut store, &submission, &pipeline).expect("process");
    assert_eq!(disqualification(&outcome), DisqualificationReason::AgeUnder);
    assert!(store.list(None).expect("memory store").is_empty());
}

#[rstest]
fn execute_submit_rejects_empty_checklists() {
    let workspace = Workspace::new();
    let mut submission = sample_submission();
    submission.answers.presentation.clear();
    let config = config_for(&workspace, &submission);

    let err = execute_submit(&config, &mut MemoryStore::default()).expect_err("invalid submission");
    match err {
        CliError::InvalidSubmission { source, path } => {
            assert_eq!(path, config.submission_path);
            assert_eq!(
                source,
                SubmissionError::EmptyChecklist {
                    group: FeatureGroup::Presentation
                }
            );
        }
        other => panic!("expected InvalidSubmission, found {other:?}"),
    }
}

#[rstest]
fn execute_submit_rejects_mismatched_birth_dates() {
    let workspace = Workspace::new();
    let mut submission = sample_submission();
    submission.screening.birth_date = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date");
    let config = config_for(&workspace, &submission);

    let err = execute_submit(&config, &mut MemoryStore::default()).expect_err("invalid submission");
    assert!(matches!(
        err,
        CliError::InvalidSubmission {
            source: SubmissionError::BirthDateMismatch { .. },
            ..
        }
    ));
}

#[rstest]
fn outcomes_serialise_with_a_status_tag(pipeline: Pipeline<'static>) {
    let mut store = MemoryStore::default();
    let classified =
        process_submission(&mut store, &sample_submission(), &pipeline).expect("process");
    let json = serde_json::to_value(&classified).expect("serialise outcome");
    assert_eq!(json["status"], "classified");
    assert_eq!(json["id"], 1);
    assert!(json["profileType"].is_string());
    assert!(json["description"]["careerRecommendations"].is_array());

    let disqualified = process_submission(&mut store, &sample_submission(), &pipeline)
        .expect("process duplicate");
    let json = serde_json::to_value(&disqualified).expect("serialise outcome");
    assert_eq!(json["status"], "disqualified");
    assert_eq!(json["reason"], "duplicate_address");
}

#[rstest]
fn submit_config_defaults_database_path() {
    let args = SubmitArgs {
        submission_path: Some("application.json".into()),
        ..SubmitArgs::default()
    };
    let config = SubmitConfig::try_from(args).expect("config should build");
    assert_eq!(config.database.as_str(), DEFAULT_DATABASE);
    assert_eq!(config.pair_scale, PairScale::FivePoint);
}

#[rstest]
fn merge_layers_resolve_database_and_date() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(json!({ "database": "from-file.db" }), None);
    composer.push_environment(json!({
        "submission_path": "application.json",
        "as_of": "2025-06-15",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.database.as_str(), "from-file.db");
    assert_eq!(config.as_of, as_of());
}
