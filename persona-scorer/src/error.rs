//! Error types raised while loading coefficient tables.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating a coefficient table.
#[derive(Debug, Error)]
pub enum CoefficientError {
    /// Reading the coefficient file failed.
    #[error("failed to read coefficient file at {path}")]
    ReadFile {
        /// Requested file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The document was not valid JSON of the expected shape.
    #[error("failed to decode coefficient table")]
    Decode {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A profile name was not recognised.
    #[error("unknown profile '{name}' in coefficient table")]
    UnknownProfile {
        /// Name found in the document.
        name: String,
    },
    /// The same profile appeared twice, for example in singular and plural form.
    #[error("profile {profile} is defined more than once")]
    DuplicateProfile {
        /// Profile defined twice.
        profile: &'static str,
    },
    /// A profile had no coefficient row.
    #[error("coefficient table is missing profile {profile}")]
    MissingProfile {
        /// Profile without a row.
        profile: &'static str,
    },
    /// A feature key did not match the schema.
    #[error("unknown feature '{key}' for profile {profile}")]
    UnknownFeature {
        /// Profile whose row held the key.
        profile: &'static str,
        /// Key found in the document.
        key: String,
    },
    /// A feature key appeared twice in one profile's row.
    #[error("feature '{key}' is defined more than once for profile {profile}")]
    DuplicateFeature {
        /// Profile whose row repeated the key.
        profile: &'static str,
        /// Repeated key.
        key: String,
    },
    /// A coefficient was NaN or infinite.
    #[error("coefficient {key} for profile {profile} is not finite")]
    NonFinite {
        /// Profile whose row held the value.
        profile: &'static str,
        /// Feature key.
        key: String,
    },
}
