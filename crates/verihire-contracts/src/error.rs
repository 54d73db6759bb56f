//! Error types for the verihire pipeline.
//!
//! Every fallible operation returns `HireResult<T>`.  Variants carry the path
//! or reason needed to tell an operator which file or input is at fault.

use thiserror::Error;

/// The unified error type for verihire.
#[derive(Debug, Error)]
pub enum HireError {
    /// A persisted file exists but could not be read or parsed.
    ///
    /// Display paths recover from this with an empty default; it is surfaced
    /// through verification reports and `warn!` logs rather than aborting.
    #[error("failed to read '{path}': {reason}")]
    StorageRead { path: String, reason: String },

    /// History or snapshot could not be persisted.
    ///
    /// Always fatal for the evaluation in progress: a record whose audit
    /// trail did not reach disk must not be returned to the caller.
    #[error("failed to write '{path}': {reason}")]
    StorageWrite { path: String, reason: String },

    /// The signing key could not be read, generated, or persisted.
    #[error("signing key error at '{path}': {reason}")]
    KeyStore { path: String, reason: String },

    /// A value could not be serialized for hashing or storage.
    #[error("encoding error: {reason}")]
    Encoding { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The append lock (in-process mutex or advisory file lock) could not be taken.
    #[error("lock acquisition failed: {reason}")]
    LockFailed { reason: String },

    /// Caller-supplied evaluation input was rejected.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

/// Convenience alias used throughout the verihire crates.
pub type HireResult<T> = Result<T, HireError>;
