use std::borrow::Cow;

use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{sol, Eip712Domain};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{Result, WithdrawError, WithdrawalRequest};

pub const DOMAIN_NAME: &str = "HCGBalancePool";
pub const DOMAIN_VERSION: &str = "1";
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
pub const PRIMARY_TYPE: &str = "withdrawTokens";

sol! {
    /// Withdrawal authorization checked by the balance pool contract.
    ///
    /// The struct name and field order are part of the type hash and must match
    /// the contract byte for byte.
    #[derive(Debug, PartialEq, Eq)]
    struct withdrawTokens {
        uint256 amount;
        address token;
        address to;
        uint256 nonce;
        uint256 deadline;
    }
}

/// EIP-712 domain of the balance pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl PoolDomain {
    /// Default name, version and chain for the given pool contract.
    pub fn new(verifying_contract: Address) -> Self {
        Self {
            name: DOMAIN_NAME.to_string(),
            version: DOMAIN_VERSION.to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            verifying_contract,
        }
    }

    pub fn eip712_domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.name.clone())),
            Some(Cow::Owned(self.version.clone())),
            Some(U256::from(self.chain_id)),
            Some(self.verifying_contract),
            None,
        )
    }

    pub fn separator(&self) -> B256 {
        self.eip712_domain().separator()
    }
}

/// Render the `eth_signTypedData_v4` document for a request.
pub fn typed_data_document(domain: &PoolDomain, request: &WithdrawalRequest) -> Value {
    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" }
            ],
            "withdrawTokens": [
                { "name": "amount", "type": "uint256" },
                { "name": "token", "type": "address" },
                { "name": "to", "type": "address" },
                { "name": "nonce", "type": "uint256" },
                { "name": "deadline", "type": "uint256" }
            ]
        },
        "primaryType": PRIMARY_TYPE,
        "domain": domain,
        "message": request
    })
}

/// Compute a generic EIP-712 digest for any compliant typed-data JSON.
/// Input is a JSON string with `types`, `primaryType`, `domain`, and `message`.
/// Returns the bytes32 digest: keccak256("\x19\x01" || domainSeparator || hashStruct(message)).
pub fn typed_data_digest(typed_data_json: &str) -> Result<B256> {
    let typed: TypedData = serde_json::from_str(typed_data_json)
        .map_err(|e| WithdrawError::TypedData(format!("invalid EIP-712 typed data JSON: {e}")))?;
    typed
        .eip712_signing_hash()
        .map_err(|e| WithdrawError::TypedData(format!("failed computing EIP-712 digest: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;
    use alloy_sol_types::SolStruct;
    use std::str::FromStr;

    fn domain() -> PoolDomain {
        PoolDomain::new(Address::from_str("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap())
    }

    fn request() -> WithdrawalRequest {
        WithdrawalRequest {
            amount: U256::from(1_000_000_000_000_000_000u128),
            token: Address::from_str("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512").unwrap(),
            to: Address::from_str("0xd5b4FACFef52Be594F9E4B6d91f1923Ba514fA57").unwrap(),
            nonce: U256::from(1_718_000_000_004u64),
            deadline: 1_718_003_600,
        }
    }

    #[test]
    fn type_hash_matches_contract_schema() {
        let expected = keccak256(
            "withdrawTokens(uint256 amount,address token,address to,uint256 nonce,uint256 deadline)",
        );
        assert_eq!(request().to_sol().eip712_type_hash(), expected);
    }

    #[test]
    fn default_domain_values() {
        let domain = domain();
        assert_eq!(domain.name, "HCGBalancePool");
        assert_eq!(domain.version, "1");
        assert_eq!(domain.chain_id, 11_155_111);
    }

    #[test]
    fn separator_depends_on_chain_and_contract() {
        let base = domain();
        let mut other_chain = base.clone();
        other_chain.chain_id = 1;
        let other_contract = PoolDomain::new(Address::repeat_byte(0x42));

        assert_ne!(base.separator(), other_chain.separator());
        assert_ne!(base.separator(), other_contract.separator());
    }

    #[test]
    fn document_digest_matches_static_struct_hash() {
        let document = typed_data_document(&domain(), &request());
        let digest = typed_data_digest(&document.to_string()).unwrap();
        assert_eq!(digest, request().signing_hash(&domain()));
    }

    #[test]
    fn document_shape() {
        let document = typed_data_document(&domain(), &request());
        assert_eq!(document["primaryType"], "withdrawTokens");
        assert_eq!(document["domain"]["chainId"], 11_155_111u64);
        assert_eq!(document["message"]["amount"], "1000000000000000000");
        assert_eq!(document["types"]["withdrawTokens"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn invalid_document_errors() {
        let err = typed_data_digest("{\"types\":").unwrap_err();
        assert!(format!("{err}").contains("invalid EIP-712 typed data JSON"));
    }
}
