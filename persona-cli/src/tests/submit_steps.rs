//! Behaviour-driven step definitions driving the submit CLI scenarios.

use super::helpers::{Workspace, write_utf8};
use super::*;
use camino::Utf8PathBuf;
use persona_core::test_support::sample_submission;
use persona_core::{CandidateStore, CandidateSubmission, SqliteCandidateStore};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;

struct SubmitWorld {
    workspace: Workspace,
    submission_path: Utf8PathBuf,
    database: Utf8PathBuf,
    submission: RefCell<Option<CandidateSubmission>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SubmitWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let submission_path = workspace.path("application.json");
        let database = workspace.path("candidates.db");
        Self {
            workspace,
            submission_path,
            database,
            submission: RefCell::new(None),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn update(&self, change: impl FnOnce(&mut CandidateSubmission)) {
        let mut slot = self.submission.borrow_mut();
        let submission = slot.as_mut().expect("application prepared");
        change(submission);
    }

    fn flush_submission(&self) {
        if let Some(submission) = self.submission.borrow().as_ref() {
            let written = self.workspace.write_json("application.json", submission);
            assert_eq!(written, self.submission_path);
        }
    }

    fn submit(&self, writer: &mut dyn std::io::Write) -> Result<(), CliError> {
        self.flush_submission();
        let argv = [
            "persona",
            "submit",
            self.submission_path.as_str(),
            "--database",
            self.database.as_str(),
            "--as-of",
            "2025-06-15",
        ];
        let cli = Cli::try_parse_from(argv)?;
        run_command(cli.command, writer)
    }

    fn output(&self) -> Value {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        result.as_ref().expect("expected success");
        serde_json::from_slice(&self.stdout.borrow()).expect("stdout should be JSON")
    }

    fn error_matches(&self, predicate: impl FnOnce(&CliError) -> bool) {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        assert!(predicate(error), "unexpected error {error:?}");
    }
}

#[fixture]
fn world() -> SubmitWorld {
    SubmitWorld::new()
}

#[given("a valid application on disk")]
fn valid_application(#[from(world)] world: &SubmitWorld) {
    world.submission.replace(Some(sample_submission()));
}

#[given("the applicant plays {frequency}")]
fn applicant_plays(#[from(world)] world: &SubmitWorld, frequency: String) {
    world.update(|submission| submission.screening.play_frequency = frequency.trim().to_owned());
}

#[given("the application omits the presentation answers")]
fn omits_presentation(#[from(world)] world: &SubmitWorld) {
    world.update(|submission| submission.answers.presentation.clear());
}

#[given("the application was already submitted once")]
fn already_submitted(#[from(world)] world: &SubmitWorld) {
    let mut discarded = Vec::new();
    world.submit(&mut discarded).expect("first submission succeeds");
}

#[given("the application file contains invalid JSON")]
fn invalid_json(#[from(world)] world: &SubmitWorld) {
    write_utf8(&world.submission_path, b"{ not valid json");
}

#[when("I run the submit command")]
fn run_submit_command(#[from(world)] world: &SubmitWorld) {
    let mut buffer = Vec::new();
    let outcome = world.submit(&mut buffer);
    world.stdout.replace(buffer);
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints a classified candidate")]
fn prints_classified(#[from(world)] world: &SubmitWorld) {
    let output = world.output();
    assert_eq!(output["status"], "classified");
    assert!(output["id"].as_i64().is_some_and(|id| id > 0));
    let profile = output["profileType"].as_str().expect("profile name");
    assert!(output["scores"][profile].is_number());
}

#[then("the command prints a disqualification with reason {code}")]
fn prints_disqualification(#[from(world)] world: &SubmitWorld, code: String) {
    let output = world.output();
    assert_eq!(output["status"], "disqualified");
    assert_eq!(output["reason"], code.trim());
    assert!(output["message"].is_string());
}

#[then("the database holds {count} candidates")]
fn database_holds(#[from(world)] world: &SubmitWorld, count: usize) {
    let store = SqliteCandidateStore::open(world.database.as_std_path()).expect("open database");
    assert_eq!(store.list(None).expect("list candidates").len(), count);
}

#[then("the command fails because the application is invalid")]
fn fails_invalid_application(#[from(world)] world: &SubmitWorld) {
    world.error_matches(|error| matches!(error, CliError::InvalidSubmission { .. }));
}

#[then("the command fails because the application JSON is invalid")]
fn fails_invalid_json(#[from(world)] world: &SubmitWorld) {
    world.error_matches(|error| matches!(error, CliError::ParseInput { .. }));
}

macro_rules! register_submit_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/submit_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SubmitWorld) {
            let _ = world;
        }
    };
}

register_submit_scenario!(submit_happy_path, "classifying and storing a qualifying applicant");
register_submit_scenario!(
    submit_disqualified,
    "reporting disqualified applicants without storing them"
);
register_submit_scenario!(
    submit_duplicate_household,
    "rejecting a second application from the same household"
);
register_submit_scenario!(
    submit_empty_checklist,
    "rejecting applications with unanswered checklists"
);
register_submit_scenario!(submit_invalid_json, "rejecting invalid JSON input");
