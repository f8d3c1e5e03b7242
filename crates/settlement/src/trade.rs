//! The settlement ready representation of a single order.

use crate::{
    flags::{OrderFlags, TradeFlags},
    tokens::TokenRegistry,
};
use anyhow::{ensure, Context, Result};
use model::{
    app_data::AppDataHash,
    bytes_hex,
    order::Order,
    signature::Signature,
    u256_decimal,
};
use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};

/// One order encoded the way the settlement contract decodes it: tokens are
/// replaced by indices into the settlement token list and all metadata is
/// packed into the flags word.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub sell_token_index: usize,
    pub buy_token_index: usize,
    pub receiver: H160,
    #[serde(with = "u256_decimal")]
    pub sell_amount: U256,
    #[serde(with = "u256_decimal")]
    pub buy_amount: U256,
    pub valid_to: u32,
    pub app_data: AppDataHash,
    #[serde(with = "u256_decimal")]
    pub fee_amount: U256,
    #[serde(with = "u256_decimal")]
    pub flags: U256,
    #[serde(with = "u256_decimal")]
    pub executed_amount: U256,
    #[serde(with = "bytes_hex")]
    pub signature: Vec<u8>,
}

impl Trade {
    /// Encodes an order and its signature as a trade, resolving token indices
    /// through the given registry.
    pub fn encode(
        registry: &mut TokenRegistry,
        order: &Order,
        signature: &Signature,
        executed_amount: U256,
    ) -> Result<Self> {
        let receiver = order.normalized_receiver()?;
        let flags = TradeFlags {
            order_flags: OrderFlags {
                kind: order.kind,
                partially_fillable: order.partially_fillable,
                sell_token_balance: order.sell_token_balance,
                buy_token_balance: order.buy_token_balance,
            },
            signing_scheme: signature.scheme(),
        };
        Ok(Self {
            sell_token_index: registry.index(order.sell_token),
            buy_token_index: registry.index(order.buy_token),
            receiver,
            sell_amount: order.sell_amount,
            buy_amount: order.buy_amount,
            valid_to: order.valid_to,
            app_data: order.app_data,
            fee_amount: order.fee_amount,
            flags: flags.encode()?,
            executed_amount,
            signature: signature.to_bytes(),
        })
    }

    /// Recovers the order and signature this trade was encoded from, given the
    /// settlement's token list.
    pub fn decode_order(&self, tokens: &[H160]) -> Result<(Order, Signature)> {
        let max_token_index = self.sell_token_index.max(self.buy_token_index);
        ensure!(
            max_token_index < tokens.len(),
            "trade references out of range token index {max_token_index}",
        );
        let flags = TradeFlags::decode(self.flags).context("invalid trade flags")?;
        let signature = Signature::from_settlement_bytes(flags.signing_scheme, &self.signature)?;
        let order = Order {
            sell_token: tokens[self.sell_token_index],
            buy_token: tokens[self.buy_token_index],
            receiver: (!self.receiver.is_zero()).then_some(self.receiver),
            sell_amount: self.sell_amount,
            buy_amount: self.buy_amount,
            valid_to: self.valid_to,
            app_data: self.app_data,
            fee_amount: self.fee_amount,
            kind: flags.order_flags.kind,
            partially_fillable: flags.order_flags.partially_fillable,
            sell_token_balance: flags.order_flags.sell_token_balance,
            buy_token_balance: flags.order_flags.buy_token_balance,
        };
        Ok((order, signature))
    }
}
