//! Deterministic contract deployment addresses and EIP-1967 proxy storage
//! reads.

pub mod deploy;
pub mod proxy;

pub use deploy::{
    create2_address, deterministic_deployment_address, DEPLOYER_CONTRACT,
    DETERMINISTIC_DEPLOYMENT_SALT,
};
pub use proxy::{implementation_address, owner_address, slot, StorageReading};
