use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
mod auth;
use passhash::{HashOptions, Hasher};
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args)]
struct OptionArgs {
    /// JSON file with hash options, e.g. {"iterations": 100000, "keyLength": 256}
    #[arg(long, value_name = "PATH", env = "PASSHASH_OPTIONS")]
    options: Option<PathBuf>,

    /// Key derivation iterations (default: 100000)
    #[arg(long, env = "PASSHASH_ITERATIONS")]
    iterations: Option<u32>,

    /// Derived key length in bytes (default: 256)
    #[arg(long = "key-length", env = "PASSHASH_KEY_LENGTH")]
    key_length: Option<u32>,

    /// Digest: sha1, sha256 or sha512 (default: sha512)
    #[arg(long, env = "PASSHASH_DIGEST")]
    digest: Option<String>,
}

impl OptionArgs {
    fn to_hash_options(&self) -> Result<HashOptions> {
        let explicit = HashOptions {
            iterations: self.iterations,
            key_length: self.key_length,
            digest: self.digest.clone(),
        };

        match &self.options {
            Some(path) => Ok(explicit.or(load_options(path)?)),
            None => Ok(explicit),
        }
    }
}

fn load_options(path: &Path) -> Result<HashOptions> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("invalid options file {}", path.display()))
}

#[derive(Debug, Parser)]
#[command(name = "passhash")]
#[command(version, about = "Hash and verify passwords with self-describing hashes.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the encoded hash
    Hash {
        /// Hex encoded salt; a random 64 byte salt is used otherwise
        #[arg(long)]
        salt: Option<String>,

        /// Algorithm name (default: pbkdf2)
        #[arg(long, env = "PASSHASH_ALGORITHM")]
        algorithm: Option<String>,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Checks a password against an encoded hash
    #[command(arg_required_else_help = true)]
    Verify { hash: String },

    /// Lists supported algorithms
    Algorithms,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Cli::parse();
    let hasher = Hasher::default();

    match args.command {
        Commands::Hash {
            salt,
            algorithm,
            options,
        } => {
            if let Some(name) = algorithm.as_deref() {
                if !hasher.registry().contains(name) {
                    bail!("{name} algorithm is not supported");
                }
            }
            let options = options.to_hash_options()?;
            let password = auth::read_new_password_with_confirmation()?;
            let encoded =
                hasher.hash_with(&password, salt.as_deref(), algorithm.as_deref(), &options)?;
            println!("{encoded}");
        }
        Commands::Verify { hash } => {
            let password = auth::read_password()?;
            if hasher.verify(&password, &hash)? {
                println!("password matches");
            } else {
                bail!("password does not match");
            }
        }
        Commands::Algorithms => {
            let registry = hasher.registry();
            for name in registry.names() {
                if name == registry.default_algorithm() {
                    println!("{name} (default)");
                } else {
                    println!("{name}");
                }
            }
        }
    }

    Ok(())
}
