//! Pluggable password hashing algorithms.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod pbkdf2;

pub use self::pbkdf2::Pbkdf2;

/// A password hashing algorithm producing self-describing encoded hashes.
///
/// Implementations return typed [`crate::HashError`] / [`crate::VerifyError`]
/// values for failures they recognise. Any other error is wrapped by the
/// [`crate::Hasher`] facade with the algorithm's name.
pub trait Algorithm: Send + Sync {
    /// Registry key, also the first field of every hash this algorithm
    /// produces.
    fn name(&self) -> &str;

    /// Hash `password` with `salt`, merging `options` over the algorithm's
    /// defaults.
    fn hash(&self, password: &str, salt: &[u8], options: &HashOptions) -> Result<String>;

    /// Re-derive the key described by `check_hash` and compare.
    fn verify(&self, password: &str, check_hash: &str) -> Result<bool>;
}

/// Caller supplied hashing parameters. Unset fields take the algorithm's
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct HashOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl HashOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn key_length(mut self, key_length: u32) -> Self {
        self.key_length = Some(key_length);
        self
    }

    pub fn digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    /// Fills every unset field from `fallback`.
    pub fn or(self, fallback: HashOptions) -> Self {
        Self {
            iterations: self.iterations.or(fallback.iterations),
            key_length: self.key_length.or(fallback.key_length),
            digest: self.digest.or(fallback.digest),
        }
    }
}
