//! `score` command: classify a questionnaire without persisting it.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use persona_core::{FeatureVector, PairScale, Profile, QuestionnaireAnswers, ScoreSet};
use persona_scorer::{Normalizer, evaluate};
use serde::{Deserialize, Serialize};

use crate::files::{load_json, load_table, require_existing, write_json};
use crate::{ARG_COEFFICIENTS, ARG_PAIR_SCALE, ARG_SCORE_ANSWERS, CliError, ENV_SCORE_ANSWERS};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Normalise a JSON questionnaire, score it against every \
                 profile and print the rounded scores, the winning profile \
                 and the feature vector. Nothing is stored.",
    about = "Score questionnaire answers"
)]
#[ortho_config(prefix = "PERSONA")]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file containing questionnaire answers.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) answers_path: Option<Utf8PathBuf>,
    /// Coefficient table to use instead of the built-in one.
    #[arg(long = ARG_COEFFICIENTS, value_name = "path")]
    #[serde(default)]
    pub(crate) coefficients: Option<Utf8PathBuf>,
    /// Scale of the narrative pair answers (`five-point` or `binary`).
    #[arg(long = ARG_PAIR_SCALE, value_name = "scale")]
    #[serde(default)]
    pub(crate) pair_scale: Option<PairScale>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    pub(crate) answers_path: Utf8PathBuf,
    pub(crate) coefficients: Option<Utf8PathBuf>,
    pub(crate) pair_scale: PairScale,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.answers_path, ARG_SCORE_ANSWERS)?;
        if let Some(path) = &self.coefficients {
            require_existing(path, ARG_COEFFICIENTS)?;
        }
        Ok(())
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let answers_path = args.answers_path.ok_or(CliError::MissingArgument {
            field: ARG_SCORE_ANSWERS,
            env: ENV_SCORE_ANSWERS,
        })?;
        Ok(Self {
            answers_path,
            coefficients: args.coefficients,
            pair_scale: args.pair_scale.unwrap_or_default(),
        })
    }
}

/// Printed result of the `score` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreReport {
    pub(crate) profile_type: Profile,
    pub(crate) scores: ScoreSet,
    pub(crate) features: FeatureVector,
}

pub(crate) fn run_score(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let report = execute_score(&config)?;
    write_json(writer, &report)
}

pub(crate) fn execute_score(config: &ScoreConfig) -> Result<ScoreReport, CliError> {
    let answers: QuestionnaireAnswers = load_json(&config.answers_path, ARG_SCORE_ANSWERS)?;
    let table = load_table(config.coefficients.as_deref())?;
    let evaluation = evaluate(&Normalizer::new(config.pair_scale), &answers, &table);
    Ok(ScoreReport {
        profile_type: evaluation.outcome.profile_type,
        scores: evaluation.outcome.scores,
        features: evaluation.features,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
