//! Error types emitted by the Persona CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::error::Error as StdError;
use std::sync::Arc;

use camino::Utf8PathBuf;
use persona_core::{CandidateId, SqliteCandidateStoreError, SubmissionError};
use persona_scorer::CoefficientError;
use thiserror::Error;

/// Errors emitted by the Persona CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading a JSON input file failed.
    #[error("failed to read {field} from {path:?}: {source}")]
    ReadInput {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A JSON input file could not be decoded.
    #[error("failed to parse {field} JSON at {path:?}: {source}")]
    ParseInput {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The coefficient table could not be loaded.
    #[error(transparent)]
    Coefficients(#[from] CoefficientError),
    /// The submission failed validation.
    #[error("submission in {path:?} failed validation: {source}")]
    InvalidSubmission {
        path: Utf8PathBuf,
        #[source]
        source: SubmissionError,
    },
    /// Creating the database's parent directory failed.
    #[error("failed to prepare database directory for {path:?}: {source}")]
    PrepareDatabase {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the candidate database failed.
    #[error(transparent)]
    OpenStore(#[from] SqliteCandidateStoreError),
    /// A candidate store operation failed.
    #[error("candidate store operation failed: {0}")]
    Store(#[source] Box<dyn StdError + Send + Sync>),
    /// No candidate exists with the requested identifier.
    #[error("no candidate with id {id}")]
    CandidateNotFound { id: CandidateId },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl CliError {
    /// Wrap an error raised by any candidate store implementation.
    pub(crate) fn store<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Store(Box::new(source))
    }
}
