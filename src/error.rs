//! Error types for hashing and verification.
//!
//! `HashError` is only ever returned by hashing, `VerifyError` only by
//! verification. Option validation failures are shared between both through
//! `OptionsError`.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid derivation parameters, either supplied by a caller or decoded
/// from a stored hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("iterations must be a positive integer")]
    Iterations,

    #[error("keyLength must be a positive integer")]
    KeyLength,

    #[error("iterations must not exceed {max}", max = crate::crypto::MAX_ITERATIONS)]
    IterationsTooLarge,

    #[error("keyLength must not exceed {max}", max = crate::crypto::MAX_KEY_LENGTH)]
    KeyLengthTooLarge,

    #[error("digest must be one of {allowed}", allowed = crate::crypto::Digest::NAMES.join(", "))]
    Digest(String),
}

/// Errors raised while producing an encoded hash.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("password must be a non-empty String")]
    EmptyPassword,

    #[error("{0} algorithm is not supported")]
    UnsupportedAlgorithm(String),

    #[error("salt must be a non-empty hex String")]
    EmptySalt,

    #[error("salt is not valid hex: {0}")]
    InvalidSalt(#[from] hex::FromHexError),

    #[error("error generating salt")]
    SaltGeneration {
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    InvalidOptions(#[from] OptionsError),

    #[error("error hashing password with {algorithm}")]
    Algorithm {
        algorithm: String,
        #[source]
        source: BoxError,
    },
}

/// Errors raised while checking a password against an encoded hash.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("password must be a non-empty String")]
    EmptyPassword,

    #[error("hash must be a non-empty String")]
    EmptyHash,

    #[error("hash not formatted correctly")]
    Malformed,

    #[error("{0} algorithm is not supported")]
    UnsupportedAlgorithm(String),

    #[error("hash uses wrong algorithm")]
    WrongAlgorithm { expected: String, found: String },

    #[error(transparent)]
    InvalidOptions(#[from] OptionsError),

    #[error("hash contains invalid {field} hex")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("error verifying password with {algorithm}")]
    Algorithm {
        algorithm: String,
        #[source]
        source: BoxError,
    },
}

/// Errors raised while assembling a [`crate::Registry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("algorithm '{0}' is already registered")]
    DuplicateAlgorithm(String),
}

impl HashError {
    /// Applies the boundary rule: typed hash errors pass through, anything
    /// else is wrapped with the name of the algorithm that raised it.
    pub(crate) fn from_algorithm(algorithm: &str, err: anyhow::Error) -> Self {
        match err.downcast::<HashError>() {
            Ok(typed) => typed,
            Err(other) => {
                log::warn!("{algorithm}: wrapping untyped hashing failure: {other:#}");
                HashError::Algorithm {
                    algorithm: algorithm.to_string(),
                    source: other.into(),
                }
            }
        }
    }
}

impl VerifyError {
    pub(crate) fn from_algorithm(algorithm: &str, err: anyhow::Error) -> Self {
        match err.downcast::<VerifyError>() {
            Ok(typed) => typed,
            Err(other) => {
                log::warn!("{algorithm}: wrapping untyped verification failure: {other:#}");
                VerifyError::Algorithm {
                    algorithm: algorithm.to_string(),
                    source: other.into(),
                }
            }
        }
    }
}
