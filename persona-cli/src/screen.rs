//! `screen` command: run the eligibility gate on its own.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{Local, NaiveDate};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use persona_core::{Eligibility, ScreeningAnswers, screen};
use serde::{Deserialize, Serialize};

use crate::files::{load_json, require_existing, write_json};
use crate::{ARG_AS_OF, ARG_SCREENING, CliError, ENV_SCREENING};

/// CLI arguments for the `screen` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Check JSON screening answers against the eligibility \
                 rules and print the first failing reason, if any.",
    about = "Check a respondent's eligibility"
)]
#[ortho_config(prefix = "PERSONA")]
pub(crate) struct ScreenArgs {
    /// Path to a JSON file containing screening answers.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) screening_path: Option<Utf8PathBuf>,
    /// Date to compute the respondent's age on (defaults to today).
    #[arg(long = ARG_AS_OF, value_name = "YYYY-MM-DD")]
    #[serde(default)]
    pub(crate) as_of: Option<NaiveDate>,
}

impl ScreenArgs {
    pub(crate) fn into_config(self) -> Result<ScreenConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScreenConfig::try_from(merged)
    }
}

/// Resolved `screen` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScreenConfig {
    pub(crate) screening_path: Utf8PathBuf,
    pub(crate) as_of: NaiveDate,
}

impl TryFrom<ScreenArgs> for ScreenConfig {
    type Error = CliError;

    fn try_from(args: ScreenArgs) -> Result<Self, Self::Error> {
        let screening_path = args.screening_path.ok_or(CliError::MissingArgument {
            field: ARG_SCREENING,
            env: ENV_SCREENING,
        })?;
        Ok(Self {
            screening_path,
            as_of: args.as_of.unwrap_or_else(today),
        })
    }
}

/// Today's date in the local time zone.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn run_screen(args: ScreenArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.screening_path, ARG_SCREENING)?;
    let answers: ScreeningAnswers = load_json(&config.screening_path, ARG_SCREENING)?;
    let eligibility: Eligibility = screen(&answers, config.as_of);
    write_json(writer, &eligibility)
}
