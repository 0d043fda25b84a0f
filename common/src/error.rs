use alloy_primitives::Address;
use thiserror::Error;

/// Errors produced while building, signing, or checking a withdrawal authorization.
#[derive(Debug, Error)]
pub enum WithdrawError {
    /// The amount could not be scaled to base units.
    #[error("Invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },
    /// The signer failed to produce a signature.
    #[error("Signing failed: {0}")]
    Signing(#[from] alloy_signer::Error),
    /// EIP-712 JSON could not be parsed or hashed.
    #[error("Typed data error: {0}")]
    TypedData(String),
    /// Signature bytes are malformed or recovery failed.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    #[error("Recovered address {recovered:#x} does not match expected address {expected:#x}")]
    SignerMismatch { expected: Address, recovered: Address },
    #[error("Validity window of {validity} seconds overflows the deadline")]
    DeadlineOverflow { validity: u64 },
    #[error("System clock is before the Unix epoch")]
    ClockBeforeEpoch,
    #[error("Authorization expired at {deadline} (now {now})")]
    Expired { deadline: u64, now: u64 },
}

pub type Result<T, E = WithdrawError> = std::result::Result<T, E>;
