//! PBKDF2 password hashing.
//!
//! Encoded hashes look like
//! `pbkdf2$100000$256$sha512$<salt hex>$<key hex>`.

use anyhow::Result;

use super::{Algorithm, HashOptions};
use crate::crypto::{DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH, Digest, Pbkdf2Params, derive_key};
use crate::error::{HashError, OptionsError, VerifyError};
use crate::format::{self, EncodedHash};

/// Registry name of [`Pbkdf2`].
pub const NAME: &str = "pbkdf2";

/// PBKDF2 with an HMAC-SHA1/256/512 pseudo-random function.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pbkdf2;

impl Pbkdf2 {
    /// Merges `options` over the defaults and validates the result.
    pub fn params(options: &HashOptions) -> Result<Pbkdf2Params, OptionsError> {
        let digest = match options.digest.as_deref() {
            Some(name) => name.parse()?,
            None => Digest::Sha512,
        };

        Pbkdf2Params::new(
            options.iterations.unwrap_or(DEFAULT_ITERATIONS),
            options.key_length.unwrap_or(DEFAULT_KEY_LENGTH),
            digest,
        )
    }

    fn encode(password: &str, salt: &[u8], params: Pbkdf2Params) -> Result<String> {
        let key = derive_key(password, salt, params)?;

        Ok(format::encode(
            NAME,
            params.iterations(),
            params.key_length(),
            params.digest().as_str(),
            salt,
            &key,
        ))
    }
}

/// Decoded numeric field; unparsable and zero values share one error.
fn parse_positive(field: &str, err: OptionsError) -> Result<u32, OptionsError> {
    match field.parse::<u32>() {
        Ok(0) | Err(_) => Err(err),
        Ok(n) => Ok(n),
    }
}

fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, VerifyError> {
    hex::decode(value).map_err(|source| VerifyError::InvalidHex { field, source })
}

impl Algorithm for Pbkdf2 {
    fn name(&self) -> &str {
        NAME
    }

    fn hash(&self, password: &str, salt: &[u8], options: &HashOptions) -> Result<String> {
        let params = Self::params(options).map_err(HashError::from)?;

        log::debug!(
            "pbkdf2: hashing with {} iterations, {} byte key, {}",
            params.iterations(),
            params.key_length(),
            params.digest()
        );

        Self::encode(password, salt, params)
    }

    fn verify(&self, password: &str, check_hash: &str) -> Result<bool> {
        let parts = EncodedHash::parse(check_hash)?;

        if parts.name() != NAME {
            return Err(VerifyError::WrongAlgorithm {
                expected: NAME.to_string(),
                found: parts.name().to_string(),
            }
            .into());
        }

        let iterations = parse_positive(parts.iterations(), OptionsError::Iterations)
            .map_err(VerifyError::from)?;
        let key_length = parse_positive(parts.key_length(), OptionsError::KeyLength)
            .map_err(VerifyError::from)?;
        let digest = parts.digest().parse::<Digest>().map_err(VerifyError::from)?;
        let params =
            Pbkdf2Params::new(iterations, key_length, digest).map_err(VerifyError::from)?;

        let salt = decode_hex("salt", parts.salt())?;
        decode_hex("key", parts.key())?;

        log::debug!(
            "pbkdf2: verifying with {} iterations, {} byte key, {}",
            iterations,
            key_length,
            digest
        );

        let recomputed = Self::encode(password, &salt, params)?;
        Ok(recomputed == check_hash)
    }
}
