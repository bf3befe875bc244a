use anyhow::{Result, anyhow};
use getrandom::fill;

/// A source of unpredictable bytes for salts.
pub trait SaltSource: Send + Sync {
    /// Fill `buf` completely or fail without partial output being used.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SaltSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        fill(buf).map_err(|e| anyhow!("OS random generator unavailable: {e}"))
    }
}

/// Generate a salt of `len` bytes from `source`
pub fn generate_salt(source: &dyn SaltSource, len: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; len];
    source.fill(&mut salt)?;
    Ok(salt)
}
