//! SQLite schema for the candidate store.

use log::debug;
use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version of the candidate schema created by this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the candidate tables, indexes and guards inside `connection`.
///
/// Existing databases must already be at [`SCHEMA_VERSION`]; other versions
/// are rejected so migrations can be applied explicitly. Updates and deletes
/// on `candidates` are blocked by triggers, keeping the table append-only.
///
/// # Errors
///
/// Returns [`SchemaError`] when a migration step fails or the stored version
/// differs.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use persona_core::store::{SCHEMA_VERSION, initialise_schema};
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create candidate schema");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM persona_schema_version", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, SCHEMA_VERSION);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_candidates_table(&transaction)?;
    create_indexes(&transaction)?;
    create_append_only_guards(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_candidates_table(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create candidates",
        "CREATE TABLE IF NOT EXISTS candidates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            date_of_birth TEXT NOT NULL,
            address TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            zip_code TEXT NOT NULL,
            household_key TEXT NOT NULL,
            education TEXT NOT NULL,
            experience TEXT NOT NULL,
            languages TEXT NOT NULL,
            availability TEXT NOT NULL,
            answers TEXT NOT NULL CHECK (json_valid(answers)),
            features TEXT NOT NULL CHECK (json_valid(features)),
            empath_score REAL NOT NULL,
            pioneer_score REAL NOT NULL,
            mechanist_score REAL NOT NULL,
            collaborator_score REAL NOT NULL,
            nester_score REAL NOT NULL,
            profile_type TEXT NOT NULL CHECK (
                profile_type IN ('Empath', 'Pioneer', 'Mechanist', 'Collaborator', 'Nester')
            ),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index candidates by profile",
        "CREATE INDEX IF NOT EXISTS idx_candidates_profile
            ON candidates(profile_type, created_at)",
    )?;
    run_migration_step(
        transaction,
        "index candidates by household",
        "CREATE INDEX IF NOT EXISTS idx_candidates_household
            ON candidates(household_key)",
    )
}

fn create_append_only_guards(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "guard candidate updates",
        "CREATE TRIGGER IF NOT EXISTS candidates_no_update
            BEFORE UPDATE ON candidates
            BEGIN
                SELECT RAISE(ABORT, 'candidates are append-only');
            END",
    )?;
    run_migration_step(
        transaction,
        "guard candidate deletes",
        "CREATE TRIGGER IF NOT EXISTS candidates_no_delete
            BEFORE DELETE ON candidates
            BEGIN
                SELECT RAISE(ABORT, 'candidates are append-only');
            END",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS persona_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row(
            "SELECT version FROM persona_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => {
            debug!("candidate schema already at version {SCHEMA_VERSION}");
            Ok(())
        }
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO persona_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| debug!("initialised candidate schema version {SCHEMA_VERSION}"))
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the candidate schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A migration statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Human-readable step name.
        step: &'static str,
        /// Driver error.
        #[source]
        source: SqliteError,
    },
    /// The database was created by an incompatible build.
    #[error(
        "expected candidate schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}
