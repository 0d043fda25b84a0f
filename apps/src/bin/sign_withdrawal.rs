use std::fmt::Write;
use std::time::Duration;

use alloy_primitives::{hex, Address};
use alloy_signer_local::PrivateKeySigner;
use anyhow::Result;
use clap::Parser;
use tracing::info;

use withdraw_app::{init_tracing, load_dotenv, log_dotenv, PoolArgs};
use withdraw_common::{
    typed_data_digest, typed_data_document, NonceStrategy, WithdrawPayload, WithdrawalSigner,
    DEFAULT_DECIMALS, DEFAULT_VALIDITY,
};

/// CLI to sign an EIP-712 `withdrawTokens` authorization for the balance pool.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Human-readable token amount, e.g. "1" or "0.25".
    #[clap(long)]
    amount: String,

    /// Recipient of the withdrawn tokens.
    #[clap(long)]
    to: Address,

    /// Private key of the pool's authorizing signer.
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: PrivateKeySigner,

    #[clap(flatten)]
    pool: PoolArgs,

    /// Token decimals used to scale `amount` to base units.
    #[clap(long, env = "TOKEN_DECIMALS", default_value_t = DEFAULT_DECIMALS)]
    decimals: u8,

    /// Seconds until the authorization expires.
    #[clap(long, default_value_t = DEFAULT_VALIDITY.as_secs())]
    validity_secs: u64,

    /// Nonce generation scheme.
    #[clap(long, value_enum, default_value_t = NonceStrategy::Timestamp)]
    nonce_strategy: NonceStrategy,

    /// Also print the full EIP-712 typed-data document and its digest.
    #[clap(long)]
    typed_data: bool,
}

async fn sign(args: &Args) -> Result<WithdrawPayload> {
    let signer = WithdrawalSigner::new(
        args.private_key.clone(),
        args.pool.domain(),
        args.pool.token_address,
    )
    .with_decimals(args.decimals)
    .with_validity(Duration::from_secs(args.validity_secs))
    .with_nonce_strategy(args.nonce_strategy);

    info!(
        "Signing withdrawal as {:#x} for pool {:#x} on chain {}",
        signer.address(),
        args.pool.pool_address,
        args.pool.chain_id,
    );

    Ok(signer.sign_withdrawal(&args.amount, args.to).await?)
}

/// Console report: base-unit amount, signature, value, combined payload.
fn report(args: &Args, payload: &WithdrawPayload) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Amount: {}", payload.request.amount)?;
    writeln!(out, "Signature: {}", hex::encode_prefixed(&payload.signature))?;
    writeln!(out, "Value: {}", serde_json::to_string_pretty(&payload.request)?)?;
    writeln!(out, "Withdraw payload: {}", serde_json::to_string_pretty(payload)?)?;

    if args.typed_data {
        let document = typed_data_document(&args.pool.domain(), &payload.request);
        let digest = typed_data_digest(&document.to_string())?;
        writeln!(out, "Typed data: {}", serde_json::to_string_pretty(&document)?)?;
        writeln!(out, "Digest: {digest}")?;
    }
    Ok(out)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_file = load_dotenv()?;
    init_tracing();
    log_dotenv(env_file.as_deref());

    let args = Args::parse();
    let payload = sign(&args).await?;
    print!("{}", report(&args, &payload)?);

    Ok(())
}
