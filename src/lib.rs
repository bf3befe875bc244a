//! Password hashing behind a pluggable algorithm registry.
//!
//! Hashes are self-describing strings such as
//! `pbkdf2$100000$256$sha512$<salt hex>$<key hex>`, so they stay verifiable
//! after defaults change.
//!
//! ```no_run
//! let stored = passhash::hash("correct horse").unwrap();
//! assert!(passhash::verify("correct horse", &stored).unwrap());
//! ```

pub mod algorithm;
pub mod crypto;
mod error;
pub mod format;
mod registry;

pub use crate::algorithm::{Algorithm, HashOptions, Pbkdf2};
pub use crate::crypto::{Digest, OsRandom, SaltSource};
pub use crate::error::{HashError, OptionsError, RegistryError, VerifyError};
pub use crate::registry::Registry;

use once_cell::sync::Lazy;

static DEFAULT_HASHER: Lazy<Hasher> = Lazy::new(Hasher::default);

/// Entry point for hashing and verifying passwords.
///
/// Holds a read-only [`Registry`] and a salt source; a single `Hasher` can be
/// shared across threads.
pub struct Hasher {
    registry: Registry,
    salt_source: Box<dyn SaltSource>,
    salt_len: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

impl Hasher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            salt_source: Box::new(OsRandom),
            salt_len: crypto::SALT_LEN,
        }
    }

    pub fn with_salt_source(mut self, source: impl SaltSource + 'static) -> Self {
        self.salt_source = Box::new(source);
        self
    }

    /// Length of generated salts. A length of zero makes hashing without a
    /// supplied salt fail with [`HashError::EmptySalt`].
    pub fn with_salt_len(mut self, salt_len: usize) -> Self {
        self.salt_len = salt_len;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Hashes with a fresh salt, the default algorithm and its defaults.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        self.hash_with(password, None, None, &HashOptions::default())
    }

    /// Hashes `password`.
    ///
    /// `salt` is hex encoded when supplied; otherwise a random salt is
    /// generated. `algorithm` defaults to the registry's default.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The password is empty
    /// - The algorithm is not registered
    /// - The supplied salt is empty or not hex
    /// - No random salt could be generated
    /// - The options are invalid or the derivation fails
    pub fn hash_with(
        &self,
        password: &str,
        salt: Option<&str>,
        algorithm: Option<&str>,
        options: &HashOptions,
    ) -> Result<String, HashError> {
        if password.is_empty() {
            return Err(HashError::EmptyPassword);
        }

        let name = algorithm.unwrap_or_else(|| self.registry.default_algorithm());
        let implementation = self
            .registry
            .resolve(name)
            .ok_or_else(|| HashError::UnsupportedAlgorithm(name.to_string()))?;

        let salt = match salt {
            Some("") => return Err(HashError::EmptySalt),
            Some(hex_salt) => hex::decode(hex_salt)?,
            None if self.salt_len == 0 => return Err(HashError::EmptySalt),
            None => crypto::generate_salt(&*self.salt_source, self.salt_len)
                .map_err(|e| HashError::SaltGeneration { source: e.into() })?,
        };

        log::debug!("hashing password with {name}");
        implementation
            .hash(password, &salt, options)
            .map_err(|e| HashError::from_algorithm(name, e))
    }

    /// Checks `password` against a stored encoded hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the password or hash is empty, names an
    /// unregistered algorithm, is malformed, or if re-deriving fails.
    pub fn verify(&self, password: &str, check_hash: &str) -> Result<bool, VerifyError> {
        if password.is_empty() {
            return Err(VerifyError::EmptyPassword);
        }

        if check_hash.is_empty() {
            return Err(VerifyError::EmptyHash);
        }

        let name = format::algorithm_name(check_hash);
        let implementation = self
            .registry
            .resolve(name)
            .ok_or_else(|| VerifyError::UnsupportedAlgorithm(name.to_string()))?;

        log::debug!("verifying password with {name}");
        let matched = implementation
            .verify(password, check_hash)
            .map_err(|e| VerifyError::from_algorithm(name, e))?;
        log::debug!(
            "{name}: password {}",
            if matched { "matched" } else { "did not match" }
        );

        Ok(matched)
    }
}

/// Hashes with the default [`Hasher`]; see [`Hasher::hash`].
pub fn hash(password: &str) -> Result<String, HashError> {
    DEFAULT_HASHER.hash(password)
}

/// Hashes with the default [`Hasher`]; see [`Hasher::hash_with`].
pub fn hash_with(
    password: &str,
    salt: Option<&str>,
    algorithm: Option<&str>,
    options: &HashOptions,
) -> Result<String, HashError> {
    DEFAULT_HASHER.hash_with(password, salt, algorithm, options)
}

/// Verifies with the default [`Hasher`]; see [`Hasher::verify`].
pub fn verify(password: &str, check_hash: &str) -> Result<bool, VerifyError> {
    DEFAULT_HASHER.verify(password, check_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn fast() -> HashOptions {
        HashOptions::new().iterations(100)
    }

    fn zero_salt() -> String {
        "00".repeat(64)
    }

    struct Broken;

    impl SaltSource for Broken {
        fn fill(&self, _buf: &mut [u8]) -> anyhow::Result<()> {
            Err(anyhow!("some error"))
        }
    }

    struct Failing;

    impl Algorithm for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn hash(
            &self,
            _password: &str,
            _salt: &[u8],
            _options: &HashOptions,
        ) -> anyhow::Result<String> {
            Err(anyhow!("some error"))
        }

        fn verify(&self, _password: &str, _check_hash: &str) -> anyhow::Result<bool> {
            Err(anyhow!("some error"))
        }
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let stored = hash_with("SuperSecretPassword", None, None, &fast()).unwrap();

        assert!(verify("SuperSecretPassword", &stored).unwrap());
        assert!(!verify("superSecretPassword", &stored).unwrap());
    }

    #[test]
    fn default_options_roundtrip() {
        let stored = hash("pw").unwrap();
        assert!(stored.starts_with("pbkdf2$100000$256$sha512$"));
        assert!(verify("pw", &stored).unwrap());
    }

    #[test]
    fn fresh_salts_differ() {
        let h1 = hash_with("pw", None, None, &fast()).unwrap();
        let h2 = hash_with("pw", None, None, &fast()).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn generated_salt_is_64_bytes() {
        let stored = hash_with("pw", None, None, &fast()).unwrap();
        let parts = format::EncodedHash::parse(&stored).unwrap();
        assert_eq!(parts.salt().len(), 128);
    }

    #[test]
    fn supplied_salt_is_deterministic() {
        let salt = zero_salt();
        let h1 = hash_with("pw", Some(&salt), None, &fast()).unwrap();
        let h2 = hash_with("pw", Some(&salt), None, &fast()).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn concrete_scenario() {
        let salt = zero_salt();
        let options = HashOptions::new().iterations(100).key_length(32).digest("sha256");
        let stored = hash_with("Secret123", Some(&salt), Some("pbkdf2"), &options).unwrap();

        let prefix = format!("pbkdf2$100$32$sha256${salt}$");
        assert!(stored.starts_with(&prefix));
        let key_hex = &stored[prefix.len()..];
        assert_eq!(key_hex.len(), 64);

        let params = crypto::Pbkdf2Params::new(100, 32, Digest::Sha256).unwrap();
        let expected = crypto::derive_key("Secret123", &[0u8; 64], params).unwrap();
        assert_eq!(key_hex, hex::encode(&*expected));
    }

    #[test]
    fn empty_password_fails() {
        let err = hash("").unwrap_err();
        assert!(matches!(err, HashError::EmptyPassword));
        assert!(err.to_string().contains("password must be a non-empty String"));

        let err = verify("", "pbkdf2$1$2$sha1$aa$bb").unwrap_err();
        assert!(matches!(err, VerifyError::EmptyPassword));
        assert!(err.to_string().contains("password must be a non-empty String"));
    }

    #[test]
    fn empty_hash_fails() {
        let err = verify("test", "").unwrap_err();
        assert_eq!(err.to_string(), "hash must be a non-empty String");
    }

    #[test]
    fn unsupported_algorithm_fails() {
        let err = hash_with("pw", None, Some("bcrypt"), &fast()).unwrap_err();
        assert_eq!(err.to_string(), "bcrypt algorithm is not supported");

        let err = verify("p", "unknown$1$2$sha512$aa$bb").unwrap_err();
        assert!(matches!(err, VerifyError::UnsupportedAlgorithm(ref n) if n == "unknown"));
        assert!(err.to_string().contains("algorithm is not supported"));

        let err = verify("test", "bad$two$three").unwrap_err();
        assert!(err.to_string().contains("algorithm is not supported"));
    }

    #[test]
    fn wrong_field_count_fails() {
        let err = verify("p", "pbkdf2$two$three").unwrap_err();
        assert_eq!(err.to_string(), "hash not formatted correctly");

        let err = verify("p", "pbkdf2$100000$aa$bb").unwrap_err();
        assert!(matches!(err, VerifyError::Malformed));

        // A bare registered name is delegated and rejected by the algorithm.
        let err = verify("p", "pbkdf2").unwrap_err();
        assert!(matches!(err, VerifyError::Malformed));
    }

    #[test]
    fn invalid_options_fail() {
        let options = HashOptions::new().iterations(0);
        let err = hash_with("p", None, Some("pbkdf2"), &options).unwrap_err();
        assert_eq!(err.to_string(), "iterations must be a positive integer");

        let options = HashOptions::new().digest("md5");
        let err = hash_with("p", None, Some("pbkdf2"), &options).unwrap_err();
        assert!(matches!(err, HashError::InvalidOptions(OptionsError::Digest(_))));
        assert!(err.to_string().contains("sha1, sha256, sha512"));
    }

    #[test]
    fn invalid_supplied_salt_fails() {
        assert!(matches!(
            hash_with("pw", Some(""), None, &fast()),
            Err(HashError::EmptySalt)
        ));
        assert!(matches!(
            hash_with("pw", Some("xyz"), None, &fast()),
            Err(HashError::InvalidSalt(_))
        ));
    }

    #[test]
    fn tampered_salt_or_key_does_not_verify() {
        let stored = hash_with("pw", Some(&zero_salt()), None, &fast()).unwrap();
        let parts: Vec<&str> = stored.split('$').collect();

        let mut salt = parts.clone();
        let flipped_salt = format!("ff{}", &parts[4][2..]);
        salt[4] = &flipped_salt;
        assert!(!verify("pw", &salt.join("$")).unwrap());

        let key_hex = parts[5];
        let (head, last) = key_hex.split_at(key_hex.len() - 2);
        let flipped_key = format!("{head}{}", if last == "00" { "01" } else { "00" });
        let mut key = parts.clone();
        key[5] = &flipped_key;
        assert!(!verify("pw", &key.join("$")).unwrap());
    }

    #[test]
    fn tampered_parameters_do_not_verify() {
        let stored = hash_with("pw", None, None, &fast()).unwrap();
        let parts: Vec<&str> = stored.split('$').collect();

        for (index, value) in [(1, "101"), (2, "128"), (3, "sha256")] {
            let mut tampered = parts.clone();
            tampered[index] = value;
            assert!(!verify("pw", &tampered.join("$")).unwrap());
        }

        for (index, value) in [
            (1, "0"),
            (1, "5000000000"),
            (1, "4294967295"),
            (2, "x"),
            (2, "4294967295"),
            (2, "99999999999999999999"),
            (3, "md5"),
        ] {
            let mut tampered = parts.clone();
            tampered[index] = value;
            assert!(matches!(
                verify("pw", &tampered.join("$")),
                Err(VerifyError::InvalidOptions(_))
            ));
        }
    }

    #[test]
    fn salt_generation_failure_is_a_hash_error() {
        let hasher = Hasher::default().with_salt_source(Broken);
        let err = hasher.hash("SuperSecretPassword").unwrap_err();
        assert_eq!(err.to_string(), "error generating salt");

        // A supplied salt never touches the random source.
        assert!(hasher.hash_with("pw", Some("00"), None, &fast()).is_ok());
    }

    #[test]
    fn custom_salt_len() {
        let hasher = Hasher::default().with_salt_len(16);
        let stored = hasher.hash_with("pw", None, None, &fast()).unwrap();
        let parts = format::EncodedHash::parse(&stored).unwrap();
        assert_eq!(parts.salt().len(), 32);
    }

    #[test]
    fn zero_salt_len_is_rejected() {
        let hasher = Hasher::default().with_salt_len(0);
        assert!(matches!(
            hasher.hash_with("pw", None, None, &fast()),
            Err(HashError::EmptySalt)
        ));

        // A supplied salt still works and round-trips.
        let stored = hasher.hash_with("pw", Some("00"), None, &fast()).unwrap();
        assert!(hasher.verify("pw", &stored).unwrap());
    }

    #[test]
    fn untyped_algorithm_errors_are_wrapped() {
        let registry = Registry::default().register(Failing).unwrap();
        let hasher = Hasher::new(registry);

        let err = hasher.hash_with("pw", None, Some("failing"), &fast()).unwrap_err();
        assert_eq!(err.to_string(), "error hashing password with failing");

        let err = hasher.verify("pw", "failing$1$2$sha1$aa$bb").unwrap_err();
        assert_eq!(err.to_string(), "error verifying password with failing");
    }

    #[test]
    fn concurrent_calls_share_one_hasher() {
        let hasher = Hasher::default();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let hasher = &hasher;
                    s.spawn(move || {
                        let password = format!("password-{i}");
                        let stored = hasher.hash_with(&password, None, None, &fast()).unwrap();
                        hasher.verify(&password, &stored).unwrap()
                    })
                })
                .collect();

            for handle in handles {
                assert!(handle.join().unwrap());
            }
        });
    }
}
