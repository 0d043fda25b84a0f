use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use alloy_primitives::Address;
use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use withdraw_app::{init_tracing, load_dotenv, log_dotenv, PoolArgs};
use withdraw_common::{check_deadline, verify_withdrawal, WithdrawPayload};

/// CLI to check a withdraw payload against the pool domain and an expected signer.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the withdraw payload JSON printed by `sign_withdrawal`.
    #[clap(long, value_name = "FILE")]
    payload: PathBuf,

    /// Address expected to have signed the payload.
    #[clap(long)]
    signer: Address,

    #[clap(flatten)]
    pool: PoolArgs,

    /// Also fail if the payload deadline has passed.
    #[clap(long)]
    check_expiry: bool,
}

fn verify(args: &Args, now: SystemTime) -> Result<WithdrawPayload> {
    let payload: WithdrawPayload = serde_json::from_slice(&fs::read(&args.payload)?)?;

    if payload.request.token != args.pool.token_address {
        bail!(
            "Payload token {:#x} does not match configured token {:#x}",
            payload.request.token,
            args.pool.token_address
        );
    }

    verify_withdrawal(&payload, &args.pool.domain(), args.signer)?;
    if args.check_expiry {
        check_deadline(&payload.request, now)?;
    }
    Ok(payload)
}

fn main() -> Result<()> {
    let env_file = load_dotenv()?;
    init_tracing();
    log_dotenv(env_file.as_deref());

    let args = Args::parse();
    let payload = verify(&args, SystemTime::now())?;

    info!("Verified payload {}", args.payload.display());
    println!("Signer: {:#x}", args.signer);
    println!("Recipient: {:#x}", payload.request.to);
    println!("Amount: {}", payload.request.amount);
    println!("Deadline: {}", payload.request.deadline);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_signer_local::PrivateKeySigner;
    use std::str::FromStr;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::NamedTempFile;
    use withdraw_common::{PoolDomain, WithdrawalSigner};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const POOL: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const TOKEN: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
    const RECIPIENT: &str = "0xd5b4FACFef52Be594F9E4B6d91f1923Ba514fA57";

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    async fn write_payload(signed_at: SystemTime) -> (NamedTempFile, Address) {
        let key = PrivateKeySigner::from_str(TEST_KEY).unwrap();
        let address = key.address();
        let signer = WithdrawalSigner::new(
            key,
            PoolDomain::new(Address::from_str(POOL).unwrap()),
            Address::from_str(TOKEN).unwrap(),
        );
        let payload = signer
            .sign_withdrawal_at("1", Address::from_str(RECIPIENT).unwrap(), signed_at)
            .await
            .unwrap();

        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), serde_json::to_vec_pretty(&payload).unwrap()).unwrap();
        (file, address)
    }

    fn args(file: &NamedTempFile, signer: Address, extra: &[&str]) -> Args {
        for var in ["CHAIN_ID", "DOMAIN_NAME", "DOMAIN_VERSION"] {
            std::env::remove_var(var);
        }
        let path = file.path().to_str().unwrap().to_string();
        let signer = format!("{signer:#x}");
        let mut argv = vec![
            "verify_withdrawal",
            "--payload",
            path.as_str(),
            "--signer",
            signer.as_str(),
            "--pool-address",
            POOL,
            "--token-address",
            TOKEN,
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn accepts_payload_from_expected_signer() {
        let (file, address) = write_payload(at(1_700_000_000)).await;
        let payload = verify(&args(&file, address, &[]), at(1_700_000_000)).unwrap();
        assert_eq!(payload.request.amount.to_string(), "1000000000000000000");
    }

    #[tokio::test]
    async fn rejects_unexpected_signer() {
        let (file, _) = write_payload(at(1_700_000_000)).await;
        let err = verify(&args(&file, Address::repeat_byte(0x99), &[]), at(1_700_000_000)).unwrap_err();
        assert!(format!("{err}").contains("does not match expected address"));
    }

    #[tokio::test]
    async fn rejects_other_chain() {
        let (file, address) = write_payload(at(1_700_000_000)).await;
        let result = verify(&args(&file, address, &["--chain-id", "1"]), at(1_700_000_000));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn expiry_is_only_checked_on_request() {
        let (file, address) = write_payload(at(1_700_000_000)).await;
        let later = at(1_700_000_000 + 7200);

        verify(&args(&file, address, &[]), later).unwrap();
        let err = verify(&args(&file, address, &["--check-expiry"]), later).unwrap_err();
        assert!(format!("{err}").contains("expired"));
    }
}
