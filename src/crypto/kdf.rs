use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

use super::{DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH, MAX_ITERATIONS, MAX_KEY_LENGTH};
use crate::error::OptionsError;

/// HMAC digest used as the PBKDF2 pseudo-random function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digest {
    Sha1,
    Sha256,
    Sha512,
}

impl Digest {
    /// Wire names of every supported digest, in listing order.
    pub const NAMES: [&'static str; 3] = ["sha1", "sha256", "sha512"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Digest::Sha1 => "sha1",
            Digest::Sha256 => "sha256",
            Digest::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Digest {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(Digest::Sha1),
            "sha256" => Ok(Digest::Sha256),
            "sha512" => Ok(Digest::Sha512),
            other => Err(OptionsError::Digest(other.to_string())),
        }
    }
}

/// Validated PBKDF2 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Params {
    iterations: u32,
    key_length: u32,
    digest: Digest,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            key_length: DEFAULT_KEY_LENGTH,
            digest: Digest::Sha512,
        }
    }
}

impl Pbkdf2Params {
    pub fn new(iterations: u32, key_length: u32, digest: Digest) -> Result<Self, OptionsError> {
        let params = Self {
            iterations,
            key_length,
            digest,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn key_length(&self) -> u32 {
        self.key_length
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.iterations == 0 {
            return Err(OptionsError::Iterations);
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(OptionsError::IterationsTooLarge);
        }
        if self.key_length == 0 {
            return Err(OptionsError::KeyLength);
        }
        if self.key_length > MAX_KEY_LENGTH {
            return Err(OptionsError::KeyLengthTooLarge);
        }
        Ok(())
    }
}

/// Derive `params.key_length()` bytes from `password` and `salt`.
pub fn derive_key(
    password: &str,
    salt: &[u8],
    params: Pbkdf2Params,
) -> Result<Zeroizing<Vec<u8>>> {
    params.validate()?;

    let len = params.key_length as usize;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| anyhow!("cannot allocate {len} byte key: {e}"))?;
    buf.resize(len, 0u8);
    let mut key = Zeroizing::new(buf);
    let password = password.as_bytes();

    let derived = match params.digest {
        Digest::Sha1 => pbkdf2::<Hmac<Sha1>>(password, salt, params.iterations, &mut key),
        Digest::Sha256 => pbkdf2::<Hmac<Sha256>>(password, salt, params.iterations, &mut key),
        Digest::Sha512 => pbkdf2::<Hmac<Sha512>>(password, salt, params.iterations, &mut key),
    };
    derived.map_err(|e| anyhow!("pbkdf2 key derivation failed: {e}"))?;

    Ok(key)
}
