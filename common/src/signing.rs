use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, Signature};
use alloy_signer::Signer;
use tracing::{debug, info};

use crate::{
    amount::{parse_amount, DEFAULT_DECIMALS},
    NonceStrategy, PoolDomain, Result, WithdrawError, WithdrawPayload, WithdrawalRequest,
};

/// How long an authorization stays valid after it is signed.
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(3600);

/// Signs `withdrawTokens` authorizations for one pool and token.
///
/// The key is injected as any [`Signer`], so local keys, remote signers and
/// test doubles all go through the same path.
#[derive(Debug, Clone)]
pub struct WithdrawalSigner<S> {
    signer: S,
    domain: PoolDomain,
    token: Address,
    decimals: u8,
    validity: Duration,
    nonce_strategy: NonceStrategy,
}

impl<S> WithdrawalSigner<S>
where
    S: Signer + Send + Sync,
{
    pub fn new(signer: S, domain: PoolDomain, token: Address) -> Self {
        Self {
            signer,
            domain,
            token,
            decimals: DEFAULT_DECIMALS,
            validity: DEFAULT_VALIDITY,
            nonce_strategy: NonceStrategy::default(),
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_nonce_strategy(mut self, nonce_strategy: NonceStrategy) -> Self {
        self.nonce_strategy = nonce_strategy;
        self
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn domain(&self) -> &PoolDomain {
        &self.domain
    }

    /// Assemble the request value for `amount` (human-readable) paid out to `to`.
    ///
    /// Nonce and deadline are derived from `now`; the deadline is whole seconds
    /// plus the validity window.
    pub fn build_request(&self, amount: &str, to: Address, now: SystemTime) -> Result<WithdrawalRequest> {
        let amount = parse_amount(amount, self.decimals)?;
        info!("Amount in base units: {amount}");

        let since_epoch = unix_time(now)?;
        let deadline = since_epoch
            .as_secs()
            .checked_add(self.validity.as_secs())
            .ok_or(WithdrawError::DeadlineOverflow {
                validity: self.validity.as_secs(),
            })?;
        let nonce = self.nonce_strategy.generate(since_epoch);

        Ok(WithdrawalRequest {
            amount,
            token: self.token,
            to,
            nonce,
            deadline,
        })
    }

    /// Sign an already assembled request under this signer's domain.
    pub async fn sign_request(&self, request: WithdrawalRequest) -> Result<WithdrawPayload> {
        let digest = request.signing_hash(&self.domain);
        debug!("EIP-712 digest: {digest}");

        let signature = self.signer.sign_hash(&digest).await?;
        Ok(WithdrawPayload::new(signature, request))
    }

    pub async fn sign_withdrawal_at(
        &self,
        amount: &str,
        to: Address,
        now: SystemTime,
    ) -> Result<WithdrawPayload> {
        let request = self.build_request(amount, to, now)?;
        self.sign_request(request).await
    }

    pub async fn sign_withdrawal(&self, amount: &str, to: Address) -> Result<WithdrawPayload> {
        self.sign_withdrawal_at(amount, to, SystemTime::now()).await
    }
}

/// Recover the address that signed `payload` under `domain`.
pub fn recover_signer(payload: &WithdrawPayload, domain: &PoolDomain) -> Result<Address> {
    let signature = Signature::try_from(payload.signature.as_ref())
        .map_err(|e| WithdrawError::InvalidSignature(e.to_string()))?;
    let prehash = payload.request.signing_hash(domain);

    signature
        .recover_address_from_prehash(&prehash)
        .map_err(|e| WithdrawError::InvalidSignature(format!("recovery failed: {e}")))
}

/// Verify that `payload` was signed by `expected` under `domain`.
pub fn verify_withdrawal(payload: &WithdrawPayload, domain: &PoolDomain, expected: Address) -> Result<()> {
    let recovered = recover_signer(payload, domain)?;
    if recovered != expected {
        return Err(WithdrawError::SignerMismatch { expected, recovered });
    }
    Ok(())
}

/// Reject requests whose deadline has already passed at `now`.
pub fn check_deadline(request: &WithdrawalRequest, now: SystemTime) -> Result<()> {
    let now = unix_time(now)?.as_secs();
    if now > request.deadline {
        return Err(WithdrawError::Expired {
            deadline: request.deadline,
            now,
        });
    }
    Ok(())
}

fn unix_time(now: SystemTime) -> Result<Duration> {
    now.duration_since(UNIX_EPOCH)
        .map_err(|_| WithdrawError::ClockBeforeEpoch)
}
