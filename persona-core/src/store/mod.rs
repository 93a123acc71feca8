//! Persistence of scored candidates.
//!
//! The [`CandidateStore`] trait describes an append-only store: records are
//! inserted once and never updated or deleted. The SQLite implementation is
//! available behind the `store-sqlite` feature.

use crate::{CandidateId, CandidateRecord, CandidateStats, NewCandidate, Profile};

#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteCandidateStore, SqliteCandidateStoreError};

/// Append-only access to persisted candidates.
///
/// # Examples
///
/// ```rust
/// use persona_core::{CandidateStore, Profile};
/// use persona_core::test_support::{MemoryStore, sample_new_candidate};
///
/// let mut store = MemoryStore::default();
/// let record = store
///     .insert(&sample_new_candidate(Profile::Pioneer))
///     .expect("insert candidate");
///
/// assert_eq!(store.get(record.id).expect("lookup"), Some(record));
/// assert_eq!(store.stats().expect("stats").count(Profile::Pioneer), 1);
/// ```
pub trait CandidateStore {
    /// Error raised by the backing storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist `candidate` and return the stored record, including its
    /// assigned identifier and creation time.
    fn insert(&mut self, candidate: &NewCandidate) -> Result<CandidateRecord, Self::Error>;

    /// Fetch a record by identifier.
    fn get(&self, id: CandidateId) -> Result<Option<CandidateRecord>, Self::Error>;

    /// List records newest first, optionally restricted to one profile.
    fn list(&self, profile: Option<Profile>) -> Result<Vec<CandidateRecord>, Self::Error>;

    /// Count records overall and per profile.
    fn stats(&self) -> Result<CandidateStats, Self::Error> {
        let records = self.list(None)?;
        Ok(CandidateStats::from_profiles(
            records.iter().map(|record| record.profile_type),
        ))
    }

    /// Whether a candidate from the same household is already stored.
    ///
    /// Households are compared by
    /// [`household_key`](crate::candidate::household_key).
    fn household_registered(&self, address: &str, zip_code: &str) -> Result<bool, Self::Error>;
}
