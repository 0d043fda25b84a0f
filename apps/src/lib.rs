//! Command-line plumbing shared by the withdrawal binaries.

use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use anyhow::{bail, Result};
use clap::Args;
use tracing::debug;
use withdraw_common::{
    typed_data::{DOMAIN_NAME, DOMAIN_VERSION, SEPOLIA_CHAIN_ID},
    PoolDomain,
};

/// Balance pool domain and token, shared by signing and verification.
#[derive(Args, Debug, Clone)]
pub struct PoolArgs {
    /// Address of the balance pool contract (EIP-712 verifying contract).
    #[clap(long, env = "POOL_ADDRESS")]
    pub pool_address: Address,

    /// Address of the token being withdrawn.
    #[clap(long, env = "TOKEN_ADDRESS")]
    pub token_address: Address,

    /// Chain id of the EIP-712 domain.
    #[clap(long, env = "CHAIN_ID", default_value_t = SEPOLIA_CHAIN_ID)]
    pub chain_id: u64,

    /// Name of the EIP-712 domain.
    #[clap(long, env = "DOMAIN_NAME", default_value = DOMAIN_NAME)]
    pub domain_name: String,

    /// Version of the EIP-712 domain.
    #[clap(long, env = "DOMAIN_VERSION", default_value = DOMAIN_VERSION)]
    pub domain_version: String,
}

impl PoolArgs {
    pub fn domain(&self) -> PoolDomain {
        PoolDomain {
            name: self.domain_name.clone(),
            version: self.domain_version.clone(),
            chain_id: self.chain_id,
            verifying_contract: self.pool_address,
        }
    }
}

/// Install the stderr tracing subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Load environment variables from `.env` if present.
///
/// Runs before [`init_tracing`] so `RUST_LOG` may come from the file; the
/// returned path is logged by the caller once tracing is up.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    dotenv_outcome(dotenvy::dotenv())
}

/// Load environment variables from a specific env file, if it exists.
pub fn load_dotenv_from(path: &Path) -> Result<Option<PathBuf>> {
    dotenv_outcome(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn dotenv_outcome(result: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => bail!("failed to load .env file: {}", e),
    }
}

/// Log the outcome of [`load_dotenv`].
pub fn log_dotenv(env_file: Option<&Path>) {
    match env_file {
        Some(path) => debug!("Loaded environment variables from {:?}", path),
        None => debug!("No .env file found"),
    }
}
