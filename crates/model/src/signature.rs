use crate::{bytes_hex, DomainSeparator};
use anyhow::{ensure, Context as _, Result};
use primitive_types::{H160, H256};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};
use web3::{
    signing::{self, Key},
    types::Recovery,
};

/// See [`Signature`].
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SigningScheme {
    #[default]
    Eip712,
    EthSign,
    Eip1271,
    PreSign,
}

/// Signature over the order data.
///
/// All variants rely on the EIP-712 hash of the order data, referred to as the
/// order hash.
#[derive(Eq, PartialEq, Clone, Deserialize, Serialize, Hash)]
#[serde(into = "JsonSignature", try_from = "JsonSignature")]
pub enum Signature {
    /// The order struct is signed according to EIP-712.
    ///
    /// https://eips.ethereum.org/EIPS/eip-712
    Eip712(EcdsaSignature),
    /// The order hash is signed according to EIP-191's personal_sign signature
    /// format.
    ///
    /// https://eips.ethereum.org/EIPS/eip-191
    EthSign(EcdsaSignature),
    /// Signature verified according to EIP-1271, which facilitates a way for
    /// contracts to verify signatures using an arbitrary method. This allows
    /// smart contracts to sign and place orders. The order hash is passed to
    /// the verifier contract with the opaque signature bytes.
    ///
    /// https://eips.ethereum.org/EIPS/eip-1271
    Eip1271 {
        verifier: H160,
        signature: Vec<u8>,
    },
    /// For these signatures the signer broadcasts a transaction on chain that
    /// marks the order hash as pre-approved in the settlement contract.
    PreSign(H160),
}

impl Default for Signature {
    fn default() -> Self {
        Self::Eip712(Default::default())
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let scheme = format!("{:?}", self.scheme());
        let bytes = format!("0x{}", hex::encode(self.to_bytes()));
        f.debug_tuple(&scheme).field(&bytes).finish()
    }
}

impl Signature {
    /// Decodes a signature from its settlement calldata representation.
    ///
    /// ECDSA schemes expect the 65 byte r + s + v encoding, EIP-1271 the
    /// verifier address followed by the opaque signature bytes and pre-sign
    /// the address of the signer.
    pub fn from_settlement_bytes(scheme: SigningScheme, bytes: &[u8]) -> Result<Self> {
        Ok(match scheme {
            scheme @ (SigningScheme::Eip712 | SigningScheme::EthSign) => {
                let bytes: [u8; 65] = bytes
                    .try_into()
                    .context("ECDSA signature must be 65 bytes long")?;
                let signature = EcdsaSignature::from_bytes(&bytes);
                match scheme {
                    SigningScheme::Eip712 => Self::Eip712(signature),
                    _ => Self::EthSign(signature),
                }
            }
            SigningScheme::Eip1271 => {
                ensure!(
                    bytes.len() >= 20,
                    "EIP-1271 signature must start with the 20 byte verifier address",
                );
                Self::Eip1271 {
                    verifier: H160::from_slice(&bytes[..20]),
                    signature: bytes[20..].to_vec(),
                }
            }
            SigningScheme::PreSign => {
                ensure!(
                    bytes.len() == 20,
                    "pre-sign signature must be the 20 byte signer address",
                );
                Self::PreSign(H160::from_slice(bytes))
            }
        })
    }

    /// Encodes the signature the way the settlement contract expects it inside
    /// a trade.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Eip712(signature) | Self::EthSign(signature) => signature.to_bytes().to_vec(),
            Self::Eip1271 {
                verifier,
                signature,
            } => [verifier.as_bytes(), signature].concat(),
            Self::PreSign(signer) => signer.as_bytes().to_vec(),
        }
    }

    pub fn scheme(&self) -> SigningScheme {
        match self {
            Signature::Eip712(_) => SigningScheme::Eip712,
            Signature::EthSign(_) => SigningScheme::EthSign,
            Signature::Eip1271 { .. } => SigningScheme::Eip1271,
            Signature::PreSign(_) => SigningScheme::PreSign,
        }
    }

    /// Derives the presumed owner of this signature for the given order hash.
    ///
    /// For ECDSA schemes this recovers the signing address; for the on-chain
    /// schemes it is the verifier respectively signer address carried in the
    /// signature itself.
    pub fn recover_owner(
        &self,
        domain_separator: &DomainSeparator,
        struct_hash: &[u8; 32],
    ) -> Result<H160> {
        match self {
            Self::Eip712(signature) => {
                signature.recover(EcdsaSigningScheme::Eip712, domain_separator, struct_hash)
            }
            Self::EthSign(signature) => {
                signature.recover(EcdsaSigningScheme::EthSign, domain_separator, struct_hash)
            }
            Self::Eip1271 { verifier, .. } => Ok(*verifier),
            Self::PreSign(signer) => Ok(*signer),
        }
    }
}

/// An internal type used for deriving `serde` implementations for the
/// `Signature` type.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSignature {
    signing_scheme: SigningScheme,
    #[serde(with = "bytes_hex")]
    signature: Vec<u8>,
}

impl From<Signature> for JsonSignature {
    fn from(signature: Signature) -> Self {
        Self {
            signing_scheme: signature.scheme(),
            signature: signature.to_bytes(),
        }
    }
}

impl TryFrom<JsonSignature> for Signature {
    type Error = anyhow::Error;

    fn try_from(json: JsonSignature) -> Result<Self, Self::Error> {
        Self::from_settlement_bytes(json.signing_scheme, &json.signature)
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Deserialize, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EcdsaSigningScheme {
    Eip712,
    EthSign,
}

impl From<EcdsaSigningScheme> for SigningScheme {
    fn from(scheme: EcdsaSigningScheme) -> Self {
        match scheme {
            EcdsaSigningScheme::Eip712 => Self::Eip712,
            EcdsaSigningScheme::EthSign => Self::EthSign,
        }
    }
}

impl SigningScheme {
    pub fn is_ecdsa_scheme(&self) -> bool {
        self.try_to_ecdsa_scheme().is_some()
    }

    pub fn try_to_ecdsa_scheme(&self) -> Option<EcdsaSigningScheme> {
        match self {
            Self::Eip712 => Some(EcdsaSigningScheme::Eip712),
            Self::EthSign => Some(EcdsaSigningScheme::EthSign),
            Self::Eip1271 | Self::PreSign => None,
        }
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Hash)]
pub struct EcdsaSignature {
    pub r: H256,
    pub s: H256,
    pub v: u8,
}

pub fn hashed_eip712_message(
    domain_separator: &DomainSeparator,
    struct_hash: &[u8; 32],
) -> [u8; 32] {
    let mut message = [0u8; 66];
    message[0..2].copy_from_slice(&[0x19, 0x01]);
    message[2..34].copy_from_slice(&domain_separator.0);
    message[34..66].copy_from_slice(struct_hash);
    signing::keccak256(&message)
}

fn hashed_ethsign_message(domain_separator: &DomainSeparator, struct_hash: &[u8; 32]) -> [u8; 32] {
    let mut message = [0u8; 60];
    message[..28].copy_from_slice(b"\x19Ethereum Signed Message:\n32");
    message[28..].copy_from_slice(&hashed_eip712_message(domain_separator, struct_hash));
    signing::keccak256(&message)
}

fn hashed_signing_message(
    signing_scheme: EcdsaSigningScheme,
    domain_separator: &DomainSeparator,
    struct_hash: &[u8; 32],
) -> [u8; 32] {
    match signing_scheme {
        EcdsaSigningScheme::Eip712 => hashed_eip712_message(domain_separator, struct_hash),
        EcdsaSigningScheme::EthSign => hashed_ethsign_message(domain_separator, struct_hash),
    }
}

impl EcdsaSignature {
    pub fn to_signature(self, scheme: EcdsaSigningScheme) -> Signature {
        match scheme {
            EcdsaSigningScheme::Eip712 => Signature::Eip712(self),
            EcdsaSigningScheme::EthSign => Signature::EthSign(self),
        }
    }

    /// r + s + v
    pub fn to_bytes(self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_bytes());
        bytes[32..64].copy_from_slice(self.s.as_bytes());
        bytes[64] = self.v;
        bytes
    }

    pub fn from_bytes(bytes: &[u8; 65]) -> Self {
        EcdsaSignature {
            r: H256::from_slice(&bytes[..32]),
            s: H256::from_slice(&bytes[32..64]),
            v: bytes[64],
        }
    }

    pub fn recover(
        &self,
        signing_scheme: EcdsaSigningScheme,
        domain_separator: &DomainSeparator,
        struct_hash: &[u8; 32],
    ) -> Result<H160> {
        let message = hashed_signing_message(signing_scheme, domain_separator, struct_hash);
        let recovery = Recovery::new(message, self.v as u64, self.r, self.s);
        let (signature, recovery_id) = recovery
            .as_signature()
            .context("unexpectedly invalid signature")?;
        Ok(signing::recover(&message, &signature, recovery_id)?)
    }

    /// Signs the order hash with the given key.
    ///
    /// The recovery byte is normalized to the canonical 27/28 convention since
    /// signers are not consistent about whether they pre-add the offset.
    pub fn sign(
        signing_scheme: EcdsaSigningScheme,
        domain_separator: &DomainSeparator,
        struct_hash: &[u8; 32],
        key: impl Key,
    ) -> Result<Self> {
        let message = hashed_signing_message(signing_scheme, domain_separator, struct_hash);
        let signature = key
            .sign(&message, None)
            .context("failed to sign order hash")?;
        let v = match signature.v {
            v @ 0..=26 => v + 27,
            v => v,
        };
        Ok(Self {
            v: v as u8,
            r: signature.r,
            s: signature.s,
        })
    }

    /// Returns an arbitrary non-zero signature that can be used for recovery
    /// when you don't actually care about the owner.
    pub fn non_zero() -> Self {
        Self {
            r: H256([1; 32]),
            s: H256([2; 32]),
            v: 27,
        }
    }
}
