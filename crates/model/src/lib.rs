//! Contains the order model and signature handling shared by the settlement
//! and deployment crates.

pub mod app_data;
pub mod bytes_hex;
pub mod interaction;
pub mod order;
pub mod signature;
pub mod u256_decimal;

use hex::{FromHex, FromHexError};
use lazy_static::lazy_static;
use primitive_types::H160;
use serde::{Deserialize, Serialize};
use std::fmt;
use web3::{
    ethabi::{encode, Token},
    signing,
};

/// The 32 byte EIP-712 domain separator that scopes order signatures to one
/// deployment of the settlement contract on one chain.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct DomainSeparator(pub [u8; 32]);

impl std::str::FromStr for DomainSeparator {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(FromHex::from_hex(s)?))
    }
}

impl std::fmt::Debug for DomainSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hex = [0u8; 64];
        // Unwrap because we know the length is correct.
        hex::encode_to_slice(self.0, &mut hex).unwrap();
        // Unwrap because we know it is valid utf8.
        f.write_str(std::str::from_utf8(&hex).unwrap())
    }
}

impl DomainSeparator {
    pub fn new(chain_id: u64, contract_address: H160) -> Self {
        lazy_static! {
            /// The EIP-712 domain name used for computing the domain separator.
            static ref DOMAIN_NAME: [u8; 32] = signing::keccak256(b"Gnosis Protocol");

            /// The EIP-712 domain version used for computing the domain separator.
            static ref DOMAIN_VERSION: [u8; 32] = signing::keccak256(b"v2");
        }

        Self::compute(&DOMAIN_NAME, &DOMAIN_VERSION, chain_id, contract_address)
    }

    fn compute(name: &[u8; 32], version: &[u8; 32], chain_id: u64, contract: H160) -> Self {
        lazy_static! {
            /// The EIP-712 domain type used for computing the domain separator.
            static ref DOMAIN_TYPE_HASH: [u8; 32] = signing::keccak256(
                b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
            );
        }
        let abi_encode_string = encode(&[
            Token::Uint((*DOMAIN_TYPE_HASH).into()),
            Token::Uint((*name).into()),
            Token::Uint((*version).into()),
            Token::Uint(chain_id.into()),
            Token::Address(contract),
        ]);

        DomainSeparator(signing::keccak256(abi_encode_string.as_slice()))
    }
}

/// The EIP-712 domain parameters of a settlement contract deployment.
///
/// The `verifying_contract` is optional so that setup-only settlements can be
/// encoded against a contract-less domain. Such domains are never signed
/// against; the missing contract encodes as the zero address.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    #[serde(default)]
    pub verifying_contract: Option<H160>,
}

impl Domain {
    pub fn new(chain_id: u64, verifying_contract: H160) -> Self {
        Self {
            name: "Gnosis Protocol".to_string(),
            version: "v2".to_string(),
            chain_id,
            verifying_contract: Some(verifying_contract),
        }
    }

    pub fn separator(&self) -> DomainSeparator {
        DomainSeparator::compute(
            &signing::keccak256(self.name.as_bytes()),
            &signing::keccak256(self.version.as_bytes()),
            self.chain_id,
            self.verifying_contract.unwrap_or_default(),
        )
    }
}
