//! Encoded hash string handling.
//!
//! Every stored hash is a `$`-delimited tuple carrying all parameters needed
//! to verify it again:
//! ```text
//! NAME $ ITERATIONS $ KEY_LENGTH $ DIGEST $ SALT_HEX $ KEY_HEX
//! ```

use crate::error::VerifyError;

/// Field separator of the encoded hash.
pub const DELIMITER: char = '$';
/// Number of fields in an encoded hash.
pub const FIELD_COUNT: usize = 6;

/// Returns the algorithm name of an encoded hash: everything before the
/// first delimiter, or the whole string if there is none.
pub fn algorithm_name(encoded: &str) -> &str {
    encoded
        .split_once(DELIMITER)
        .map_or(encoded, |(name, _)| name)
}

/// The six raw fields of an encoded hash, borrowed from the input.
///
/// Parsing checks structure only. Numeric fields, the digest and the hex
/// payloads are interpreted by the owning algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedHash<'a> {
    name: &'a str,
    iterations: &'a str,
    key_length: &'a str,
    digest: &'a str,
    salt: &'a str,
    key: &'a str,
}

impl<'a> EncodedHash<'a> {
    /// Splits `encoded` into its fields.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Malformed`] unless there are exactly
    /// [`FIELD_COUNT`] fields and none of them is empty.
    pub fn parse(encoded: &'a str) -> Result<Self, VerifyError> {
        let fields: Vec<&str> = encoded.split(DELIMITER).collect();

        if fields.len() != FIELD_COUNT || fields.iter().any(|f| f.is_empty()) {
            return Err(VerifyError::Malformed);
        }

        let [name, iterations, key_length, digest, salt, key] = fields[..] else {
            return Err(VerifyError::Malformed);
        };

        Ok(Self {
            name,
            iterations,
            key_length,
            digest,
            salt,
            key,
        })
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn iterations(&self) -> &'a str {
        self.iterations
    }

    pub fn key_length(&self) -> &'a str {
        self.key_length
    }

    pub fn digest(&self) -> &'a str {
        self.digest
    }

    pub fn salt(&self) -> &'a str {
        self.salt
    }

    pub fn key(&self) -> &'a str {
        self.key
    }
}

/// Renders the canonical encoded hash. Salt and key are hex encoded in
/// lowercase.
pub fn encode(
    name: &str,
    iterations: u32,
    key_length: u32,
    digest: &str,
    salt: &[u8],
    key: &[u8],
) -> String {
    format!(
        "{name}{d}{iterations}{d}{key_length}{d}{digest}{d}{salt}{d}{key}",
        d = DELIMITER,
        salt = hex::encode(salt),
        key = hex::encode(key),
    )
}
