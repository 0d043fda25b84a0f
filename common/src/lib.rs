pub mod amount;
pub mod error;
pub mod nonce;
pub mod signing;
pub mod typed_data;

use alloy_primitives::{Address, Bytes, Signature, B256, U256};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

pub use amount::{format_amount, parse_amount, DEFAULT_DECIMALS};
pub use error::{Result, WithdrawError};
pub use nonce::NonceStrategy;
pub use signing::{check_deadline, recover_signer, verify_withdrawal, WithdrawalSigner, DEFAULT_VALIDITY};
pub use typed_data::{typed_data_digest, typed_data_document, withdrawTokens, PoolDomain};

/// Per-call withdrawal value, in the field order of the `withdrawTokens` schema.
///
/// Big integers serialize as decimal strings so the JSON matches what wallets
/// and contract tooling print for `uint256` values.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Amount in token base units.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
    pub token: Address,
    pub to: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub nonce: U256,
    /// Unix timestamp (seconds) after which the pool rejects the authorization.
    pub deadline: u64,
}

impl WithdrawalRequest {
    pub fn to_sol(&self) -> withdrawTokens {
        withdrawTokens {
            amount: self.amount,
            token: self.token,
            to: self.to,
            nonce: self.nonce,
            deadline: U256::from(self.deadline),
        }
    }

    /// keccak256("\x19\x01" || domainSeparator || hashStruct(withdrawTokens)).
    pub fn signing_hash(&self, domain: &PoolDomain) -> B256 {
        use alloy_sol_types::SolStruct;
        self.to_sol().eip712_signing_hash(&domain.eip712_domain())
    }
}

/// Signature bundled with the request fields it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawPayload {
    /// 65-byte r || s || v signature, v in {27, 28}.
    pub signature: Bytes,
    #[serde(flatten)]
    pub request: WithdrawalRequest,
}

impl WithdrawPayload {
    pub fn new(signature: Signature, request: WithdrawalRequest) -> Self {
        Self {
            signature: Bytes::from(signature.as_bytes().to_vec()),
            request,
        }
    }
}
