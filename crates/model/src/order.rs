//! Contains the order type as signed and verified by the settlement contract.

use crate::{
    app_data::AppDataHash,
    signature::hashed_eip712_message,
    u256_decimal, DomainSeparator,
};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{offset::Utc, DateTime};
use hex_literal::hex;
use primitive_types::{H160, H256, U256};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{self, Debug, Display},
    str::FromStr,
};
use strum::EnumString;
use web3::signing;

/// The complete order data.
///
/// These are the exact fields that get signed and verified by the settlement
/// contract.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub sell_token: H160,
    pub buy_token: H160,
    #[serde(default)]
    pub receiver: Option<H160>,
    #[serde(with = "u256_decimal")]
    pub sell_amount: U256,
    #[serde(with = "u256_decimal")]
    pub buy_amount: U256,
    pub valid_to: u32,
    pub app_data: AppDataHash,
    #[serde(with = "u256_decimal")]
    pub fee_amount: U256,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    #[serde(default)]
    pub sell_token_balance: SellTokenSource,
    #[serde(default)]
    pub buy_token_balance: BuyTokenDestination,
}

impl Order {
    // See <https://github.com/cowprotocol/contracts/blob/v1.1.2/src/contracts/libraries/GPv2Order.sol#L47>
    pub const TYPE_HASH: [u8; 32] =
        hex!("d5a25ba2e97094ad7d83dc28a6572da797d6b3e7fc6663bd93efb789fc17e489");

    // keccak256("erc20")
    pub const BALANCE_ERC20: [u8; 32] =
        hex!("5a28e9363bb942b639270062aa6bb295f434bcdfc42c97267bf003f272060dc9");
    // keccak256("external")
    pub const BALANCE_EXTERNAL: [u8; 32] =
        hex!("abee3b73373acd583a130924aad6dc38cfdc44ba0555ba94ce2ff63980ea0632");
    // keccak256("internal")
    pub const BALANCE_INTERNAL: [u8; 32] =
        hex!("4ac99ace14ee0a5ef932dc609df0943ab7ac16b7583634612f8dc35a4289a6ce");

    /// Returns the value of hashStruct() over the order data as defined by
    /// EIP-712.
    ///
    /// https://eips.ethereum.org/EIPS/eip-712#definition-of-hashstruct
    pub fn hash_struct(&self) -> [u8; 32] {
        let mut hash_data = [0u8; 416];
        hash_data[0..32].copy_from_slice(&Self::TYPE_HASH);
        // Some slots are not assigned (stay 0) because all values are extended to 256 bits.
        hash_data[44..64].copy_from_slice(self.sell_token.as_fixed_bytes());
        hash_data[76..96].copy_from_slice(self.buy_token.as_fixed_bytes());
        hash_data[108..128]
            .copy_from_slice(self.receiver.unwrap_or_else(H160::zero).as_fixed_bytes());
        self.sell_amount.to_big_endian(&mut hash_data[128..160]);
        self.buy_amount.to_big_endian(&mut hash_data[160..192]);
        hash_data[220..224].copy_from_slice(&self.valid_to.to_be_bytes());
        hash_data[224..256].copy_from_slice(&self.app_data.0);
        self.fee_amount.to_big_endian(&mut hash_data[256..288]);
        hash_data[288..320].copy_from_slice(match self.kind {
            OrderKind::Sell => &OrderKind::SELL,
            OrderKind::Buy => &OrderKind::BUY,
        });
        hash_data[351] = self.partially_fillable as u8;
        hash_data[352..384].copy_from_slice(match self.sell_token_balance {
            SellTokenSource::Erc20 => &Self::BALANCE_ERC20,
            SellTokenSource::External => &Self::BALANCE_EXTERNAL,
            SellTokenSource::Internal => &Self::BALANCE_INTERNAL,
        });
        hash_data[384..416].copy_from_slice(match self.buy_token_balance {
            BuyTokenDestination::Erc20 => &Self::BALANCE_ERC20,
            BuyTokenDestination::Internal => &Self::BALANCE_INTERNAL,
        });
        signing::keccak256(&hash_data)
    }

    /// The EIP-712 digest a signer commits to when signing this order.
    ///
    /// Fails for orders that do not normalize, since their digest would be
    /// indistinguishable from that of a well-formed order.
    pub fn signing_digest(&self, domain: &DomainSeparator) -> Result<[u8; 32]> {
        self.normalized_receiver()?;
        Ok(hashed_eip712_message(domain, &self.hash_struct()))
    }

    pub fn uid(&self, domain: &DomainSeparator, owner: &H160) -> Result<OrderUid> {
        Ok(OrderUid::from_parts(
            H256(self.signing_digest(domain)?),
            *owner,
            self.valid_to,
        ))
    }

    /// Resolves the receiver the settlement contract transfers the buy amount
    /// to.
    ///
    /// The zero address tells the contract to pay out to the order owner, so
    /// it is valid as the implicit default but must never appear as an
    /// explicit receiver.
    pub fn normalized_receiver(&self) -> Result<H160> {
        match self.receiver {
            Some(receiver) if receiver == H160::zero() => {
                Err(anyhow!("order receiver cannot be the zero address"))
            }
            Some(receiver) => Ok(receiver),
            None => Ok(H160::zero()),
        }
    }
}

/// Coerces a calendar instant to the epoch seconds `valid_to` representation,
/// truncating sub-second precision.
pub fn timestamp(instant: DateTime<Utc>) -> Result<u32> {
    u32::try_from(instant.timestamp()).context("order expiry does not fit a u32 timestamp")
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OrderBuilder(Order);

impl OrderBuilder {
    pub fn with_sell_token(mut self, sell_token: H160) -> Self {
        self.0.sell_token = sell_token;
        self
    }

    pub fn with_buy_token(mut self, buy_token: H160) -> Self {
        self.0.buy_token = buy_token;
        self
    }

    pub fn with_receiver(mut self, receiver: Option<H160>) -> Self {
        self.0.receiver = receiver;
        self
    }

    pub fn with_sell_amount(mut self, sell_amount: U256) -> Self {
        self.0.sell_amount = sell_amount;
        self
    }

    pub fn with_buy_amount(mut self, buy_amount: U256) -> Self {
        self.0.buy_amount = buy_amount;
        self
    }

    pub fn with_valid_to(mut self, valid_to: u32) -> Self {
        self.0.valid_to = valid_to;
        self
    }

    pub fn with_app_data(mut self, app_data: AppDataHash) -> Self {
        self.0.app_data = app_data;
        self
    }

    pub fn with_fee_amount(mut self, fee_amount: U256) -> Self {
        self.0.fee_amount = fee_amount;
        self
    }

    pub fn with_kind(mut self, kind: OrderKind) -> Self {
        self.0.kind = kind;
        self
    }

    pub fn with_partially_fillable(mut self, partially_fillable: bool) -> Self {
        self.0.partially_fillable = partially_fillable;
        self
    }

    pub fn with_sell_token_balance(mut self, balance: SellTokenSource) -> Self {
        self.0.sell_token_balance = balance;
        self
    }

    pub fn with_buy_token_balance(mut self, balance: BuyTokenDestination) -> Self {
        self.0.buy_token_balance = balance;
        self
    }

    pub fn build(self) -> Order {
        self.0
    }
}

// uid as 56 bytes: 32 for orderDigest, 20 for ownerAddress and 4 for validTo
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct OrderUid(pub [u8; 56]);

impl OrderUid {
    /// Create a UID from its parts.
    pub fn from_parts(hash: H256, owner: H160, valid_to: u32) -> Self {
        let mut uid = [0; 56];
        uid[0..32].copy_from_slice(hash.as_bytes());
        uid[32..52].copy_from_slice(owner.as_bytes());
        uid[52..56].copy_from_slice(&valid_to.to_be_bytes());
        Self(uid)
    }

    /// Splits an order UID into its parts.
    pub fn parts(&self) -> (H256, H160, u32) {
        (
            H256::from_slice(&self.0[0..32]),
            H160::from_slice(&self.0[32..52]),
            // Unwrap because the subslice length is always 4.
            u32::from_be_bytes(self.0[52..].try_into().unwrap()),
        )
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let uid: [u8; 56] = bytes
            .try_into()
            .context("order UID must be exactly 56 bytes long")?;
        Ok(Self(uid))
    }
}

impl FromStr for OrderUid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<OrderUid> {
        let bytes =
            hex::decode(s.strip_prefix("0x").unwrap_or(s)).context("invalid hex order UID")?;
        Self::from_bytes(&bytes)
    }
}

impl Display for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = [0u8; 2 + 56 * 2];
        bytes[..2].copy_from_slice(b"0x");
        // Unwrap because the length is always correct.
        hex::encode_to_slice(self.0, &mut bytes[2..]).unwrap();
        // Unwrap because the string is always valid utf8.
        let str = std::str::from_utf8(&bytes).unwrap();
        f.write_str(str)
    }
}

impl Debug for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Default for OrderUid {
    fn default() -> Self {
        Self([0u8; 56])
    }
}

impl Serialize for OrderUid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

impl<'de> Deserialize<'de> for OrderUid {
    fn deserialize<D>(deserializer: D) -> Result<OrderUid, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor {}
        impl de::Visitor<'_> for Visitor {
            type Value = OrderUid;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an uid with orderDigest_owner_validTo")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let s = s.strip_prefix("0x").ok_or_else(|| {
                    de::Error::custom(format!(
                        "{s:?} can't be decoded as hex uid because it does not start with '0x'"
                    ))
                })?;
                let mut value = [0u8; 56];
                hex::decode_to_slice(s, value.as_mut()).map_err(|err| {
                    de::Error::custom(format!("failed to decode {s:?} as hex uid: {err}"))
                })?;
                Ok(OrderUid(value))
            }
        }

        deserializer.deserialize_str(Visitor {})
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    #[default]
    Sell,
    Buy,
}

impl OrderKind {
    // keccak256("sell")
    pub const SELL: [u8; 32] =
        hex!("f3b277728b3fee749481eb3e0b3b48980dbbab78658fc419025cb16eee346775");
    // keccak256("buy")
    pub const BUY: [u8; 32] =
        hex!("6ed88e868af0a1983e3886d5f3e95a2fafbd6c3450bc229e27342283dc429ccc");

    pub fn label(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    pub fn from_contract_bytes(kind: [u8; 32]) -> Result<Self> {
        match kind {
            Self::SELL => Ok(OrderKind::Sell),
            Self::BUY => Ok(OrderKind::Buy),
            _ => Err(anyhow!("order kind is not well defined")),
        }
    }
}

/// Source from which the sellAmount should be drawn upon order fulfillment.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SellTokenSource {
    /// Direct ERC20 allowances to the Vault relayer contract
    #[default]
    Erc20,
    /// ERC20 allowances to the Vault with GPv2 relayer approval
    External,
    /// Internal balances to the Vault with GPv2 relayer approval
    Internal,
}

impl SellTokenSource {
    pub fn from_contract_bytes(bytes: [u8; 32]) -> Result<Self> {
        match bytes {
            Order::BALANCE_ERC20 => Ok(Self::Erc20),
            Order::BALANCE_EXTERNAL => Ok(Self::External),
            Order::BALANCE_INTERNAL => Ok(Self::Internal),
            _ => Err(anyhow!("order sellTokenBalance is not well defined")),
        }
    }
}

/// Destination to which the buyAmount should be transferred to the order's
/// receiver upon fulfillment.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum BuyTokenDestination {
    /// Pay trade proceeds as an ERC20 token transfer
    #[default]
    Erc20,
    /// Pay trade proceeds as a Vault internal balance transfer
    Internal,
}

impl BuyTokenDestination {
    pub fn from_contract_bytes(bytes: [u8; 32]) -> Result<Self> {
        match bytes {
            Order::BALANCE_ERC20 => Ok(Self::Erc20),
            Order::BALANCE_INTERNAL => Ok(Self::Internal),
            _ => Err(anyhow!("order buyTokenBalance is not well defined")),
        }
    }
}

/// Normalizes a sell balance source into the corresponding buy balance
/// destination. The contract only distinguishes internal buy balances, so
/// everything else maps to plain ERC20 transfers.
impl From<SellTokenSource> for BuyTokenDestination {
    fn from(balance: SellTokenSource) -> Self {
        match balance {
            SellTokenSource::Erc20 | SellTokenSource::External => Self::Erc20,
            SellTokenSource::Internal => Self::Internal,
        }
    }
}

/// Checks that an order's explicit receiver, if any, is usable for settlement.
pub fn normalize_order(order: &Order) -> Result<Order> {
    if order.receiver == Some(H160::zero()) {
        bail!("order receiver cannot be the zero address");
    }
    Ok(*order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{Signature, SigningScheme};
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn deserialization_and_back() {
        let value = json!({
            "sellToken": "0x000000000000000000000000000000000000000a",
            "buyToken": "0x0000000000000000000000000000000000000009",
            "receiver": "0x000000000000000000000000000000000000000b",
            "sellAmount": "1",
            "buyAmount": "0",
            "validTo": 4294967295u32,
            "appData": "0x6000000000000000000000000000000000000000000000000000000000000007",
            "feeAmount": "115792089237316195423570985008687907853269984665640564039457584007913129639935",
            "kind": "buy",
            "partiallyFillable": false,
            "sellTokenBalance": "external",
            "buyTokenBalance": "internal",
        });
        let expected = Order {
            sell_token: H160::from_low_u64_be(10),
            buy_token: H160::from_low_u64_be(9),
            receiver: Some(H160::from_low_u64_be(11)),
            sell_amount: 1.into(),
            buy_amount: 0.into(),
            valid_to: u32::MAX,
            app_data: AppDataHash(hex!(
                "6000000000000000000000000000000000000000000000000000000000000007"
            )),
            fee_amount: U256::MAX,
            kind: OrderKind::Buy,
            partially_fillable: false,
            sell_token_balance: SellTokenSource::External,
            buy_token_balance: BuyTokenDestination::Internal,
        };
        assert_eq!(expected, serde_json::from_value(value.clone()).unwrap());
        assert_eq!(json!(expected), value);
    }

    #[test]
    fn balance_fields_default_to_erc20() {
        let order: Order = serde_json::from_value(json!({
            "sellToken": "0x000000000000000000000000000000000000000a",
            "buyToken": "0x0000000000000000000000000000000000000009",
            "sellAmount": "1",
            "buyAmount": "0",
            "validTo": 0,
            "appData": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "feeAmount": "0",
            "kind": "sell",
            "partiallyFillable": false,
        }))
        .unwrap();
        assert_eq!(order.sell_token_balance, SellTokenSource::Erc20);
        assert_eq!(order.buy_token_balance, BuyTokenDestination::Erc20);
        assert_eq!(order.receiver, None);
    }

    // Taken from the settlement contract test
    // `should recover signing address for all supported ECDSA-based schemes`.
    #[test]
    fn order_signature_recovery() {
        let domain_separator = DomainSeparator(hex!(
            "74e0b11bd18120612556bae4578cfd3a254d7e2495f543c569a92ff5794d9b09"
        ));
        let expected_owner = H160(hex!("70997970C51812dc3A010C7d01b50e0d17dc79C8"));

        for (signing_scheme, signature) in &[
            (
                SigningScheme::Eip712,
                hex!(
                    "59c0f5c151071c1320575f6da826a6c276525bbe733234bad1afb2879657d65d
                     2afe6812746f4cc97f28f3a5dfdbfc7087511695d23da5e9792cd7ed6c9ddeb7
                     1c"
                ),
            ),
            (
                SigningScheme::EthSign,
                hex!(
                    "bf3bc5a9b60d08dc05768320553ba59a6f301d985903618cfc002e8a61cb78b5
                     5d4a474a43a60193d90cda35ff2764f3913b47e5b5b87770064f549fe871afcc
                     1b"
                ),
            ),
        ] {
            let order = sample_order();
            let signature = Signature::from_settlement_bytes(*signing_scheme, signature).unwrap();

            let owner = signature
                .recover_owner(&domain_separator, &order.hash_struct())
                .unwrap();
            assert_eq!(owner, expected_owner);
        }
    }

    fn sample_order() -> Order {
        Order {
            sell_token: hex!("0101010101010101010101010101010101010101").into(),
            buy_token: hex!("0202020202020202020202020202020202020202").into(),
            receiver: Some(hex!("0303030303030303030303030303030303030303").into()),
            sell_amount: 0x0246ddf97976680000_u128.into(),
            buy_amount: 0xb98bc829a6f90000_u128.into(),
            valid_to: 0xffffffff,
            app_data: AppDataHash(hex!(
                "0000000000000000000000000000000000000000000000000000000000000000"
            )),
            fee_amount: 0x0de0b6b3a7640000_u128.into(),
            kind: OrderKind::Sell,
            partially_fillable: false,
            sell_token_balance: SellTokenSource::Erc20,
            buy_token_balance: BuyTokenDestination::Erc20,
        }
    }

    #[test]
    fn compute_order_uid() {
        let domain_separator = DomainSeparator(hex!(
            "74e0b11bd18120612556bae4578cfd3a254d7e2495f543c569a92ff5794d9b09"
        ));
        let owner = hex!("70997970C51812dc3A010C7d01b50e0d17dc79C8").into();
        let order = sample_order();
        assert_eq!(
            order.uid(&domain_separator, &owner).unwrap().0,
            hex!(
                "0e45d31fd31b28c26031cdd81b35a8938b2ccca2cc425fcf440fd3bfed1eede9
                 70997970c51812dc3a010c7d01b50e0d17dc79c8
                 ffffffff"
            ),
        );
    }

    #[test]
    fn order_digest_is_domain_scoped() {
        let domain = crate::Domain::new(1, hex!("cccccccccccccccccccccccccccccccccccccc03").into());
        let order = Order {
            sell_token: hex!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa01").into(),
            buy_token: hex!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb02").into(),
            sell_amount: U256::from(10).pow(18.into()),
            buy_amount: U256::from(2000) * U256::from(10).pow(18.into()),
            valid_to: 1_700_000_000,
            fee_amount: U256::from(5) * U256::from(10).pow(15.into()),
            kind: OrderKind::Sell,
            ..Default::default()
        };
        assert_eq!(
            order.signing_digest(&domain.separator()).unwrap(),
            hex!("8bce5a04f1346e6ce93a5e1bfbc204c3401013c68a8767cdcea807774dabf7cb"),
        );
    }

    #[test]
    fn uid_parts_round_trip() {
        let digest = H256([0x11; 32]);
        let owner = H160([0x22; 20]);
        let valid_to = 0x04030201;
        let uid = OrderUid::from_parts(digest, owner, valid_to);
        assert_eq!(uid.parts(), (digest, owner, valid_to));
    }

    #[test]
    fn uid_from_bytes_requires_56_bytes() {
        assert!(OrderUid::from_bytes(&[0x2a; 2]).is_err());
        assert!(OrderUid::from_bytes(&[0x2a; 55]).is_err());
        assert!(OrderUid::from_bytes(&[0x2a; 57]).is_err());
        assert!(OrderUid::from_bytes(&[0x2a; 56]).is_ok());
        assert!("0x0102".parse::<OrderUid>().is_err());
    }

    #[test]
    fn uid_is_displayed_as_hex() {
        let mut uid = OrderUid([0u8; 56]);
        uid.0[0] = 0x01;
        uid.0[55] = 0xff;
        let expected = "0x01000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000ff";
        assert_eq!(uid.to_string(), expected);
        assert_eq!(format!("{uid}"), expected);
    }

    #[test]
    fn zero_receiver_is_rejected() {
        let order = Order {
            receiver: Some(H160::zero()),
            ..Default::default()
        };
        assert!(order.normalized_receiver().is_err());
        assert!(normalize_order(&order).is_err());

        let order = Order {
            receiver: None,
            ..Default::default()
        };
        assert_eq!(order.normalized_receiver().unwrap(), H160::zero());
        assert!(normalize_order(&order).is_ok());
    }

    #[test]
    fn zero_receiver_order_does_not_hash() {
        let domain_separator = DomainSeparator([0x2a; 32]);
        let order = Order {
            receiver: Some(H160::zero()),
            ..sample_order()
        };
        assert!(order.signing_digest(&domain_separator).is_err());
        assert!(order.uid(&domain_separator, &H160::zero()).is_err());

        // The explicit receiver is otherwise hashed as-is.
        let order = sample_order();
        assert_eq!(
            order.signing_digest(&domain_separator).unwrap(),
            hashed_eip712_message(&domain_separator, &order.hash_struct()),
        );
    }

    #[test]
    fn timestamp_truncates_sub_second_precision() {
        let instant = Utc.timestamp_opt(1_700_000_000, 999_999_999).unwrap();
        assert_eq!(timestamp(instant).unwrap(), 1_700_000_000);
    }

    #[test]
    fn timestamp_rejects_unrepresentable_instants() {
        assert!(timestamp(Utc.timestamp_opt(-1, 0).unwrap()).is_err());
        assert!(timestamp(Utc.timestamp_opt(u32::MAX as i64 + 1, 0).unwrap()).is_err());
    }

    #[test]
    fn buy_token_balance_normalization() {
        assert_eq!(
            BuyTokenDestination::from(SellTokenSource::Erc20),
            BuyTokenDestination::Erc20
        );
        assert_eq!(
            BuyTokenDestination::from(SellTokenSource::External),
            BuyTokenDestination::Erc20
        );
        assert_eq!(
            BuyTokenDestination::from(SellTokenSource::Internal),
            BuyTokenDestination::Internal
        );
    }

    #[test]
    fn from_contract_bytes_rejects_unknown_values() {
        assert!(OrderKind::from_contract_bytes([0xab; 32]).is_err());
        assert!(SellTokenSource::from_contract_bytes([0xab; 32]).is_err());
        assert!(BuyTokenDestination::from_contract_bytes([0xab; 32]).is_err());
        assert!(BuyTokenDestination::from_contract_bytes(Order::BALANCE_EXTERNAL).is_err());
    }

    #[test]
    fn order_builder() {
        let order = OrderBuilder::default()
            .with_sell_token(H160::from_low_u64_be(1))
            .with_buy_token(H160::from_low_u64_be(2))
            .with_sell_amount(3.into())
            .with_buy_amount(4.into())
            .with_valid_to(5)
            .with_app_data(6.into())
            .with_fee_amount(7.into())
            .with_kind(OrderKind::Buy)
            .with_partially_fillable(true)
            .with_sell_token_balance(SellTokenSource::External)
            .with_buy_token_balance(BuyTokenDestination::Internal)
            .build();
        assert_eq!(order.sell_token, H160::from_low_u64_be(1));
        assert_eq!(order.kind, OrderKind::Buy);
        assert!(order.partially_fillable);
        assert_eq!(order.app_data, AppDataHash::from(6u64));
    }
}
