//! Cryptographic collaborators of the hashing algorithms.
//!
//! Provides secure salt generation and PBKDF2 key derivation.

pub mod kdf;
pub mod random;

pub use kdf::{Digest, Pbkdf2Params, derive_key};
pub use random::{OsRandom, SaltSource, generate_salt};

/// Length of a generated salt (64 bytes).
pub const SALT_LEN: usize = 64;
/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;
/// Default derived key length in bytes.
pub const DEFAULT_KEY_LENGTH: u32 = 256;
/// Upper bound on PBKDF2 iterations (int32 max).
pub const MAX_ITERATIONS: u32 = i32::MAX as u32;
/// Upper bound on the derived key length in bytes (int32 max).
pub const MAX_KEY_LENGTH: u32 = i32::MAX as u32;
