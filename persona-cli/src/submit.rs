//! `submit` command: screen, score and persist a full application.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use persona_core::{
    CandidateId, CandidateStore, CandidateSubmission, DisqualificationReason, Eligibility,
    NewCandidate, PairScale, Profile, ProfileDescription, ScoreSet, screen,
};
use persona_scorer::{CoefficientTable, Normalizer, evaluate};
use serde::{Deserialize, Serialize};

use crate::files::{default_database, load_json, load_table, open_store, require_existing, write_json};
use crate::screen::today;
use crate::{
    ARG_AS_OF, ARG_COEFFICIENTS, ARG_DATABASE, ARG_PAIR_SCALE, ARG_SUBMISSION, CliError,
    ENV_SUBMISSION,
};

/// CLI arguments for the `submit` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Validate a JSON application, run the eligibility gate, \
                 score the questionnaire and store the candidate. \
                 Disqualified applicants are reported but not stored.",
    about = "Submit a candidate application"
)]
#[ortho_config(prefix = "PERSONA")]
pub(crate) struct SubmitArgs {
    /// Path to a JSON file containing the application.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) submission_path: Option<Utf8PathBuf>,
    /// SQLite database holding candidates (`candidates.db` by default).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Coefficient table to use instead of the built-in one.
    #[arg(long = ARG_COEFFICIENTS, value_name = "path")]
    #[serde(default)]
    pub(crate) coefficients: Option<Utf8PathBuf>,
    /// Scale of the narrative pair answers (`five-point` or `binary`).
    #[arg(long = ARG_PAIR_SCALE, value_name = "scale")]
    #[serde(default)]
    pub(crate) pair_scale: Option<PairScale>,
    /// Date to compute the applicant's age on (defaults to today).
    #[arg(long = ARG_AS_OF, value_name = "YYYY-MM-DD")]
    #[serde(default)]
    pub(crate) as_of: Option<NaiveDate>,
}

impl SubmitArgs {
    pub(crate) fn into_config(self) -> Result<SubmitConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SubmitConfig::try_from(merged)
    }
}

/// Resolved `submit` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubmitConfig {
    pub(crate) submission_path: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
    pub(crate) coefficients: Option<Utf8PathBuf>,
    pub(crate) pair_scale: PairScale,
    pub(crate) as_of: NaiveDate,
}

impl SubmitConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.submission_path, ARG_SUBMISSION)?;
        if let Some(path) = &self.coefficients {
            require_existing(path, ARG_COEFFICIENTS)?;
        }
        Ok(())
    }
}

impl TryFrom<SubmitArgs> for SubmitConfig {
    type Error = CliError;

    fn try_from(args: SubmitArgs) -> Result<Self, Self::Error> {
        let submission_path = args.submission_path.ok_or(CliError::MissingArgument {
            field: ARG_SUBMISSION,
            env: ENV_SUBMISSION,
        })?;
        Ok(Self {
            submission_path,
            database: args.database.unwrap_or_else(default_database),
            coefficients: args.coefficients,
            pair_scale: args.pair_scale.unwrap_or_default(),
            as_of: args.as_of.unwrap_or_else(today),
        })
    }
}

/// Result of processing one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "status",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub(crate) enum SubmissionOutcome {
    /// The applicant failed the eligibility gate and was not stored.
    Disqualified {
        reason: DisqualificationReason,
        title: &'static str,
        message: &'static str,
    },
    /// The applicant was scored and stored.
    Classified {
        id: CandidateId,
        profile_type: Profile,
        scores: ScoreSet,
        created_at: DateTime<Utc>,
        description: &'static ProfileDescription,
    },
}

/// Scoring inputs shared by every submission in one run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pipeline<'t> {
    pub(crate) table: &'t CoefficientTable,
    pub(crate) normalizer: Normalizer,
    pub(crate) today: NaiveDate,
}

/// Screen, score and store an already validated submission.
///
/// The household flag is raised when the applicant says so or when `store`
/// already holds a candidate at the same address.
pub(crate) fn process_submission<S: CandidateStore>(
    store: &mut S,
    submission: &CandidateSubmission,
    pipeline: &Pipeline<'_>,
) -> Result<SubmissionOutcome, CliError> {
    let applicant = &submission.applicant;
    let mut screening = submission.screening.clone();
    screening.household_registered |= store
        .household_registered(&applicant.address, &applicant.zip_code)
        .map_err(CliError::store)?;

    if let Eligibility::Ineligible(reason) = screen(&screening, pipeline.today) {
        info!("applicant disqualified: {}", reason.code());
        return Ok(SubmissionOutcome::Disqualified {
            reason,
            title: reason.title(),
            message: reason.message(),
        });
    }

    let evaluation = evaluate(&pipeline.normalizer, &submission.answers, pipeline.table);
    let record = store
        .insert(&NewCandidate {
            applicant: applicant.clone(),
            answers: submission.answers.clone(),
            features: evaluation.features,
            outcome: evaluation.outcome,
        })
        .map_err(CliError::store)?;
    info!("stored candidate {} as {}", record.id, record.profile_type);

    Ok(SubmissionOutcome::Classified {
        id: record.id,
        profile_type: record.profile_type,
        scores: record.scores,
        created_at: record.created_at,
        description: record.profile_type.description(),
    })
}

/// Load, validate and process the submission named by `config`.
pub(crate) fn execute_submit<S: CandidateStore>(
    config: &SubmitConfig,
    store: &mut S,
) -> Result<SubmissionOutcome, CliError> {
    let submission: CandidateSubmission = load_json(&config.submission_path, ARG_SUBMISSION)?;
    submission
        .validate(config.pair_scale)
        .map_err(|source| CliError::InvalidSubmission {
            path: config.submission_path.clone(),
            source,
        })?;
    let table = load_table(config.coefficients.as_deref())?;
    let pipeline = Pipeline {
        table: &table,
        normalizer: Normalizer::new(config.pair_scale),
        today: config.as_of,
    };
    process_submission(store, &submission, &pipeline)
}

pub(crate) fn run_submit(args: SubmitArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let mut store = open_store(&config.database)?;
    let outcome = execute_submit(&config, &mut store)?;
    write_json(writer, &outcome)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SubmitConfig, CliError> {
    let merged = SubmitArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SubmitConfig::try_from(merged)
}
