//! CREATE2 based deterministic deployment addresses.

use hex_literal::hex;
use lazy_static::lazy_static;
use primitive_types::{H160, H256};
use web3::{
    ethabi::{encode, Token},
    signing,
};

/// The address of the shared deterministic deployment proxy. All deployments
/// go through this contract so that addresses only depend on the init code
/// and salt, not on the deploying account.
///
/// https://github.com/Arachnid/deterministic-deployment-proxy
pub const DEPLOYER_CONTRACT: H160 = H160(hex!("4e59b44847b379578588920ca78fbf26c0b4956c"));

lazy_static! {
    /// The protocol-wide deployment salt. Interoperable implementations must
    /// derive the identical salt from the identical source string.
    pub static ref DETERMINISTIC_DEPLOYMENT_SALT: H256 = {
        let mut salt = [0u8; 32];
        salt[..21].copy_from_slice(b"Mattresses in Berlin!");
        H256(salt)
    };
}

/// Computes the address a CREATE2 deployment resolves to.
///
/// https://eips.ethereum.org/EIPS/eip-1014
pub fn create2_address(deployer: H160, salt: H256, init_code_hash: H256) -> H160 {
    let mut buffer = [0u8; 85];
    buffer[0] = 0xff;
    buffer[1..21].copy_from_slice(deployer.as_bytes());
    buffer[21..53].copy_from_slice(salt.as_bytes());
    buffer[53..85].copy_from_slice(init_code_hash.as_bytes());
    let hash = signing::keccak256(&buffer);
    H160::from_slice(&hash[12..])
}

/// The address a contract deploys to through the deterministic deployment
/// proxy, given its creation bytecode and ABI encoded constructor arguments.
pub fn deterministic_deployment_address(bytecode: &[u8], constructor_args: &[Token]) -> H160 {
    let mut deploy_data = bytecode.to_vec();
    deploy_data.extend(encode(constructor_args));
    create2_address(
        DEPLOYER_CONTRACT,
        *DETERMINISTIC_DEPLOYMENT_SALT,
        H256(signing::keccak256(&deploy_data)),
    )
}
