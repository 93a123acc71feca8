//! Read-only admin commands over the candidate database.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use persona_core::{CandidateId, CandidateRecord, CandidateStats, CandidateStore, Profile};
use serde::{Deserialize, Serialize};

use crate::files::{default_database, open_existing_store, write_json};
use crate::{ARG_CANDIDATE_ID, ARG_DATABASE, ARG_PROFILE, CliError, ENV_CANDIDATE_ID};

/// CLI arguments for the `list` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List stored candidates, newest first")]
#[ortho_config(prefix = "PERSONA")]
pub(crate) struct ListArgs {
    /// SQLite database holding candidates (`candidates.db` by default).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Only list candidates classified as this profile.
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<Profile>,
}

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Show one stored candidate")]
#[ortho_config(prefix = "PERSONA")]
pub(crate) struct ShowArgs {
    /// Identifier of the candidate to show.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<i64>,
    /// SQLite database holding candidates (`candidates.db` by default).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `stats` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Count stored candidates per profile")]
#[ortho_config(prefix = "PERSONA")]
pub(crate) struct StatsArgs {
    /// SQLite database holding candidates (`candidates.db` by default).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// Candidates stored in `store`, optionally restricted to one profile.
pub(crate) fn list_candidates<S: CandidateStore>(
    store: &S,
    profile: Option<Profile>,
) -> Result<Vec<CandidateRecord>, CliError> {
    store.list(profile).map_err(CliError::store)
}

/// The candidate stored under `id`.
pub(crate) fn show_candidate<S: CandidateStore>(
    store: &S,
    id: CandidateId,
) -> Result<CandidateRecord, CliError> {
    store
        .get(id)
        .map_err(CliError::store)?
        .ok_or(CliError::CandidateNotFound { id })
}

/// Per-profile candidate counts.
pub(crate) fn candidate_stats<S: CandidateStore>(store: &S) -> Result<CandidateStats, CliError> {
    store.stats().map_err(CliError::store)
}

pub(crate) fn run_list(args: ListArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let database = merged.database.unwrap_or_else(default_database);
    let store = open_existing_store(&database, ARG_DATABASE)?;
    let records = list_candidates(&store, merged.profile)?;
    write_json(writer, &records)
}

pub(crate) fn run_show(args: ShowArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let id = merged.id.map(CandidateId::new).ok_or(CliError::MissingArgument {
        field: ARG_CANDIDATE_ID,
        env: ENV_CANDIDATE_ID,
    })?;
    let database = merged.database.unwrap_or_else(default_database);
    let store = open_existing_store(&database, ARG_DATABASE)?;
    let record = show_candidate(&store, id)?;
    write_json(writer, &record)
}

pub(crate) fn run_stats(args: StatsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let database = merged.database.unwrap_or_else(default_database);
    let store = open_existing_store(&database, ARG_DATABASE)?;
    let stats = candidate_stats(&store)?;
    write_json(writer, &stats)
}
