//! Command-line interface for the Persona recruitment engine.
//!
//! Every subcommand prints pretty JSON to standard output. Paths and options
//! can come from CLI flags, configuration files or `PERSONA_*` environment
//! variables, merged through `ortho_config`.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod admin;
mod error;
mod files;
mod score;
mod screen;
mod submit;

pub use error::CliError;

use admin::{ListArgs, ShowArgs, StatsArgs, run_list, run_show, run_stats};
use score::{ScoreArgs, run_score};
use screen::{ScreenArgs, run_screen};
use submit::{SubmitArgs, run_submit};

pub(crate) const ARG_SCORE_ANSWERS: &str = "answers-path";
pub(crate) const ARG_SCREENING: &str = "screening-path";
pub(crate) const ARG_SUBMISSION: &str = "submission-path";
pub(crate) const ARG_CANDIDATE_ID: &str = "id";
pub(crate) const ARG_COEFFICIENTS: &str = "coefficients";
pub(crate) const ARG_PAIR_SCALE: &str = "pair-scale";
pub(crate) const ARG_AS_OF: &str = "as-of";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_PROFILE: &str = "profile";
pub(crate) const ENV_SCORE_ANSWERS: &str = "PERSONA_CMDS_SCORE_ANSWERS_PATH";
pub(crate) const ENV_SCREENING: &str = "PERSONA_CMDS_SCREEN_SCREENING_PATH";
pub(crate) const ENV_SUBMISSION: &str = "PERSONA_CMDS_SUBMIT_SUBMISSION_PATH";
pub(crate) const ENV_CANDIDATE_ID: &str = "PERSONA_CMDS_SHOW_ID";
pub(crate) const DEFAULT_DATABASE: &str = "candidates.db";

/// Run the Persona CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration merging or the
/// selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Score(args) => run_score(args, writer),
        Command::Screen(args) => run_screen(args, writer),
        Command::Submit(args) => run_submit(args, writer),
        Command::List(args) => run_list(args, writer),
        Command::Show(args) => run_show(args, writer),
        Command::Stats(args) => run_stats(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "persona",
    about = "Score, screen and store recruitment questionnaire responses",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score questionnaire answers without storing them.
    Score(ScoreArgs),
    /// Check screening answers against the eligibility rules.
    Screen(ScreenArgs),
    /// Screen, score and store a full application.
    Submit(SubmitArgs),
    /// List stored candidates.
    List(ListArgs),
    /// Show one stored candidate.
    Show(ShowArgs),
    /// Count stored candidates per profile.
    Stats(StatsArgs),
}

#[cfg(test)]
mod tests;
