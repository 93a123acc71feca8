//! SQLite-backed candidate store.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rusqlite::{Connection, Row, params};
use thiserror::Error;

use crate::candidate::household_key;
use crate::{
    Applicant, CandidateId, CandidateRecord, CandidateStats, NewCandidate, ParseProfileError,
    Profile, ScoreSet,
};

use super::CandidateStore;
use super::schema::{SchemaError, initialise_schema};

const SELECT_COLUMNS: &str = "id, full_name, email, phone, date_of_birth, address, city, state, \
     zip_code, education, experience, languages, availability, answers, features, empath_score, \
     pioneer_score, mechanist_score, collaborator_score, nester_score, profile_type, created_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error raised by [`SqliteCandidateStore`].
#[derive(Debug, Error)]
pub enum SqliteCandidateStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The schema could not be created or has an unexpected version.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A value could not be encoded as JSON for storage.
    #[error("failed to encode {column} as JSON: {source}")]
    EncodeJson {
        /// Destination column.
        column: &'static str,
        /// Encoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored JSON payload could not be decoded.
    #[error("failed to decode {column} for candidate {id}: {source}")]
    DecodeJson {
        /// Candidate the row belongs to.
        id: i64,
        /// Source column.
        column: &'static str,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored date or timestamp could not be parsed.
    #[error("failed to parse {column} for candidate {id}: {source}")]
    InvalidTimestamp {
        /// Candidate the row belongs to.
        id: i64,
        /// Source column.
        column: &'static str,
        /// Parser failure.
        #[source]
        source: chrono::ParseError,
    },
    /// A stored profile name was not recognised.
    #[error("invalid profile for candidate {id}: {source}")]
    InvalidProfile {
        /// Candidate the row belongs to.
        id: i64,
        /// Parser failure.
        #[source]
        source: ParseProfileError,
    },
    /// A profile name in the per-profile counts was not recognised.
    #[error("invalid stored profile {name:?}: {source}")]
    InvalidStoredProfile {
        /// Name found in the `profile_type` column.
        name: String,
        /// Parser failure.
        #[source]
        source: ParseProfileError,
    },
    /// The row just inserted could not be read back.
    #[error("candidate {id} was not found after insertion")]
    MissingAfterInsert {
        /// Identifier reported by SQLite.
        id: i64,
    },
    /// Generic SQLite error.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Append-only candidate store persisted in SQLite.
pub struct SqliteCandidateStore {
    connection: Connection,
    path: Option<PathBuf>,
}

impl fmt::Debug for SqliteCandidateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCandidateStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteCandidateStore {
    /// Open or create the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteCandidateStoreError::OpenDatabase`] when the file
    /// cannot be opened and [`SqliteCandidateStoreError::Schema`] when the
    /// schema cannot be initialised.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteCandidateStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteCandidateStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error when SQLite cannot allocate the database or the
    /// schema cannot be created.
    pub fn open_in_memory() -> Result<Self, SqliteCandidateStoreError> {
        let connection = Connection::open_in_memory()?;
        Self::with_connection(connection, None)
    }

    fn with_connection(
        mut connection: Connection,
        path: Option<PathBuf>,
    ) -> Result<Self, SqliteCandidateStoreError> {
        initialise_schema(&mut connection)?;
        match &path {
            Some(path) => debug!("opened candidate store at {}", path.display()),
            None => debug!("opened in-memory candidate store"),
        }
        Ok(Self { connection, path })
    }

    /// Location of the database file, if not in memory.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl CandidateStore for SqliteCandidateStore {
    type Error = SqliteCandidateStoreError;

    fn insert(&mut self, candidate: &NewCandidate) -> Result<CandidateRecord, Self::Error> {
        let answers = encode_json("answers", &candidate.answers)?;
        let features = encode_json("features", &candidate.features)?;
        let applicant = &candidate.applicant;
        let scores = candidate.outcome.scores;

        let transaction = self.connection.transaction()?;
        transaction.execute(
            "INSERT INTO candidates (
                full_name, email, phone, date_of_birth, address, city, state, zip_code,
                household_key, education, experience, languages, availability, answers,
                features, empath_score, pioneer_score, mechanist_score, collaborator_score,
                nester_score, profile_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                ?17, ?18, ?19, ?20, ?21)",
            params![
                applicant.full_name,
                applicant.email,
                applicant.phone,
                applicant.date_of_birth.format(DATE_FORMAT).to_string(),
                applicant.address,
                applicant.city,
                applicant.state,
                applicant.zip_code,
                applicant.household_key(),
                applicant.education,
                applicant.experience,
                applicant.languages,
                applicant.availability,
                answers,
                features,
                scores.get(Profile::Empath),
                scores.get(Profile::Pioneer),
                scores.get(Profile::Mechanist),
                scores.get(Profile::Collaborator),
                scores.get(Profile::Nester),
                candidate.outcome.profile_type.as_str(),
            ],
        )?;
        let id = transaction.last_insert_rowid();
        let record = fetch_by_id(&transaction, id)?
            .ok_or(SqliteCandidateStoreError::MissingAfterInsert { id })?;
        transaction.commit()?;
        debug!("inserted candidate {id} as {}", record.profile_type);
        Ok(record)
    }

    fn get(&self, id: CandidateId) -> Result<Option<CandidateRecord>, Self::Error> {
        fetch_by_id(&self.connection, id.get())
    }

    fn list(&self, profile: Option<Profile>) -> Result<Vec<CandidateRecord>, Self::Error> {
        let filter = if profile.is_some() {
            "WHERE profile_type = ?1"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM candidates {filter} ORDER BY created_at DESC, id DESC"
        );
        let mut statement = self.connection.prepare(&sql)?;
        let mut rows = match profile {
            Some(profile) => statement.query([profile.as_str()])?,
            None => statement.query([])?,
        };

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(record_from_row(row)?);
        }
        Ok(records)
    }

    fn stats(&self) -> Result<CandidateStats, Self::Error> {
        let mut statement = self
            .connection
            .prepare("SELECT profile_type, COUNT(*) FROM candidates GROUP BY profile_type")?;
        let mut rows = statement.query([])?;
        let mut stats = CandidateStats::default();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            let profile = name.parse::<Profile>().map_err(|source| {
                SqliteCandidateStoreError::InvalidStoredProfile { name, source }
            })?;
            stats.record(profile, u64::try_from(count).unwrap_or_default());
        }
        Ok(stats)
    }

    fn household_registered(&self, address: &str, zip_code: &str) -> Result<bool, Self::Error> {
        let key = household_key(address, zip_code);
        let exists = self.connection.query_row(
            "SELECT EXISTS(SELECT 1 FROM candidates WHERE household_key = ?1)",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

fn encode_json<T: serde::Serialize>(
    column: &'static str,
    value: &T,
) -> Result<String, SqliteCandidateStoreError> {
    serde_json::to_string(value)
        .map_err(|source| SqliteCandidateStoreError::EncodeJson { column, source })
}

fn fetch_by_id(
    connection: &Connection,
    id: i64,
) -> Result<Option<CandidateRecord>, SqliteCandidateStoreError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM candidates WHERE id = ?1");
    let mut statement = connection.prepare(&sql)?;
    let mut rows = statement.query([id])?;
    rows.next()?.map(record_from_row).transpose()
}

fn record_from_row(row: &Row<'_>) -> Result<CandidateRecord, SqliteCandidateStoreError> {
    let id: i64 = row.get("id")?;

    let decode = |column: &'static str| -> Result<String, SqliteCandidateStoreError> {
        Ok(row.get::<_, String>(column)?)
    };
    let date_of_birth = NaiveDate::parse_from_str(&decode("date_of_birth")?, DATE_FORMAT)
        .map_err(|source| SqliteCandidateStoreError::InvalidTimestamp {
            id,
            column: "date_of_birth",
            source,
        })?;
    let created_at = DateTime::parse_from_rfc3339(&decode("created_at")?)
        .map_err(|source| SqliteCandidateStoreError::InvalidTimestamp {
            id,
            column: "created_at",
            source,
        })?
        .with_timezone(&Utc);
    let answers = serde_json::from_str(&decode("answers")?).map_err(|source| {
        SqliteCandidateStoreError::DecodeJson {
            id,
            column: "answers",
            source,
        }
    })?;
    let features = serde_json::from_str(&decode("features")?).map_err(|source| {
        SqliteCandidateStoreError::DecodeJson {
            id,
            column: "features",
            source,
        }
    })?;
    let profile_type = decode("profile_type")?
        .parse::<Profile>()
        .map_err(|source| SqliteCandidateStoreError::InvalidProfile { id, source })?;

    Ok(CandidateRecord {
        id: CandidateId::new(id),
        applicant: Applicant {
            full_name: decode("full_name")?,
            email: decode("email")?,
            phone: decode("phone")?,
            date_of_birth,
            address: decode("address")?,
            city: decode("city")?,
            state: decode("state")?,
            zip_code: decode("zip_code")?,
            education: decode("education")?,
            experience: decode("experience")?,
            languages: decode("languages")?,
            availability: decode("availability")?,
        },
        answers,
        features,
        scores: ScoreSet::new([
            row.get("empath_score")?,
            row.get("pioneer_score")?,
            row.get("mechanist_score")?,
            row.get("collaborator_score")?,
            row.get("nester_score")?,
        ]),
        profile_type,
        created_at,
    })
}
