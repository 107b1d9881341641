use crate::FlagKind;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors in the flag watch harness.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required environment variable is not set.
    #[error("required environment variable {name} is not set")]
    MissingEnv {
        /// Name of the missing variable.
        name: &'static str,
    },

    /// An environment variable is set but cannot be parsed.
    #[error("environment variable {name} is malformed: {reason}")]
    InvalidEnv {
        /// Name of the offending variable.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Invalid base_url or events_url configuration.
    #[error("invalid url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// A flag resolved to a value of a different kind than the catalog
    /// declares for it.
    #[error("flag {flag_key} resolved as {actual} but {expected} was requested")]
    TypeMismatch {
        /// Key of the offending flag.
        flag_key: String,
        /// Kind declared in the catalog.
        expected: FlagKind,
        /// Kind of the value the client resolved.
        actual: FlagKind,
    },

    /// The evaluation client failed to resolve a flag for a target.
    #[error("evaluation of flag {flag_key} for target {target_id} failed")]
    Evaluation {
        /// Key of the flag being evaluated.
        flag_key: String,
        /// Identifier of the target being evaluated.
        target_id: String,
        /// Underlying client error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
