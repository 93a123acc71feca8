//! Input and output helpers shared by the subcommands.

use std::borrow::Cow;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use persona_core::SqliteCandidateStore;
use persona_fs::{PathKind, ensure_parent_dir, path_kind, read_utf8_to_string};
use persona_scorer::CoefficientTable;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CliError;

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match path_kind(path) {
        Ok(PathKind::File) => Ok(()),
        Ok(PathKind::Missing) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(PathKind::Directory | PathKind::Other) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read and decode a JSON document from `path`.
pub(crate) fn load_json<T: DeserializeOwned>(
    path: &Utf8Path,
    field: &'static str,
) -> Result<T, CliError> {
    let payload = read_utf8_to_string(path).map_err(|source| CliError::ReadInput {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&payload).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

/// Load the coefficient table at `path`, or the built-in table when absent.
pub(crate) fn load_table(
    path: Option<&Utf8Path>,
) -> Result<Cow<'static, CoefficientTable>, CliError> {
    match path {
        Some(path) => Ok(Cow::Owned(CoefficientTable::from_path(path)?)),
        None => Ok(Cow::Borrowed(CoefficientTable::builtin()?)),
    }
}

/// Open the candidate database, creating it and its directory if needed.
pub(crate) fn open_store(path: &Utf8Path) -> Result<SqliteCandidateStore, CliError> {
    ensure_parent_dir(path).map_err(|source| CliError::PrepareDatabase {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("opening candidate database at {path}");
    Ok(SqliteCandidateStore::open(path.as_std_path())?)
}

/// Open an existing candidate database for read-only admin queries.
pub(crate) fn open_existing_store(
    path: &Utf8Path,
    field: &'static str,
) -> Result<SqliteCandidateStore, CliError> {
    require_existing(path, field)?;
    Ok(SqliteCandidateStore::open(path.as_std_path())?)
}

/// Write `value` to `writer` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

/// Default database location, relative to the working directory.
pub(crate) fn default_database() -> Utf8PathBuf {
    Utf8PathBuf::from(crate::DEFAULT_DATABASE)
}
