//! EIP-1967 proxy storage slots and reads.

use anyhow::Result;
use async_trait::async_trait;
use lazy_static::lazy_static;
use primitive_types::{H160, H256, U256};
use web3::{signing, Transport, Web3};

/// Derives the storage slot for an EIP-1967 name string, namely the ABI
/// encoded `bytes32(uint256(keccak256(name)) - 1)`.
///
/// https://eips.ethereum.org/EIPS/eip-1967
pub fn slot(name: &str) -> H256 {
    let hash = U256::from_big_endian(&signing::keccak256(name.as_bytes()));
    let mut slot = [0u8; 32];
    (hash - 1).to_big_endian(&mut slot);
    H256(slot)
}

lazy_static! {
    /// The slot holding the address the proxy delegates to.
    pub static ref IMPLEMENTATION_SLOT: H256 = slot("eip1967.proxy.implementation");

    /// The slot holding the address allowed to upgrade the proxy.
    pub static ref OWNER_SLOT: H256 = slot("eip1967.proxy.admin");
}

/// Read-only access to contract storage. Implemented by the node client and
/// injected explicitly by the host.
#[async_trait]
pub trait StorageReading: Send + Sync {
    async fn storage_at(&self, address: H160, slot: H256) -> Result<H256>;
}

#[async_trait]
impl<T> StorageReading for Web3<T>
where
    T: Transport + Send + Sync,
    T::Out: Send,
{
    async fn storage_at(&self, address: H160, slot: H256) -> Result<H256> {
        Ok(self
            .eth()
            .storage(address, U256::from_big_endian(slot.as_bytes()), None)
            .await?)
    }
}

/// The address the proxy currently delegates to.
pub async fn implementation_address(
    reader: &impl StorageReading,
    proxy: H160,
) -> Result<H160> {
    let word = reader.storage_at(proxy, *IMPLEMENTATION_SLOT).await?;
    let implementation = address_from_word(word);
    tracing::debug!(?proxy, ?implementation, "read proxy implementation");
    Ok(implementation)
}

/// The address allowed to upgrade the proxy.
pub async fn owner_address(reader: &impl StorageReading, proxy: H160) -> Result<H160> {
    let word = reader.storage_at(proxy, *OWNER_SLOT).await?;
    let owner = address_from_word(word);
    tracing::debug!(?proxy, ?owner, "read proxy owner");
    Ok(owner)
}

/// An address ABI decodes as the trailing 20 bytes of its storage word.
fn address_from_word(word: H256) -> H160 {
    H160::from_slice(&word.as_bytes()[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use hex_literal::hex;
    use std::collections::HashMap;

    #[test]
    fn slots_match_the_standard_constants() {
        assert_eq!(
            *IMPLEMENTATION_SLOT,
            H256(hex!(
                "360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc"
            )),
        );
        assert_eq!(
            *OWNER_SLOT,
            H256(hex!(
                "b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103"
            )),
        );
    }

    struct FakeStorage(HashMap<(H160, H256), H256>);

    #[async_trait]
    impl StorageReading for FakeStorage {
        async fn storage_at(&self, address: H160, slot: H256) -> Result<H256> {
            self.0
                .get(&(address, slot))
                .copied()
                .ok_or_else(|| anyhow!("no storage at {address:?}:{slot:?}"))
        }
    }

    #[tokio::test]
    async fn reads_and_decodes_proxy_addresses() {
        let proxy = H160([0x42; 20]);
        let implementation = H160([0x11; 20]);
        let owner = H160([0x22; 20]);
        let word = |address: H160| {
            let mut word = H256::zero();
            word.0[12..].copy_from_slice(address.as_bytes());
            word
        };
        let storage = FakeStorage(
            [
                ((proxy, *IMPLEMENTATION_SLOT), word(implementation)),
                ((proxy, *OWNER_SLOT), word(owner)),
            ]
            .into_iter()
            .collect(),
        );

        assert_eq!(
            implementation_address(&storage, proxy).await.unwrap(),
            implementation,
        );
        assert_eq!(owner_address(&storage, proxy).await.unwrap(), owner);
    }

    #[tokio::test]
    async fn read_errors_propagate() {
        let storage = FakeStorage(HashMap::new());
        assert!(implementation_address(&storage, H160::zero())
            .await
            .is_err());
    }
}
