//! Encoding of a direct order versus AMM pool swap.

use crate::{
    encoder::SettlementEncoder,
    trade::Trade,
};
use anyhow::{Context, Result};
use model::{
    bytes_hex,
    order::{Order, OrderKind},
    signature::{EcdsaSigningScheme, Signature},
    u256_decimal, Domain,
};
use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};
use web3::signing::Key;

/// A user supplied swap against one AMM pool, with assets given by address.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Swap {
    pub pool_id: H256,
    pub asset_in: H160,
    pub asset_out: H160,
    pub amount: U256,
    pub user_data: Vec<u8>,
}

/// A swap step with its assets resolved to settlement token indices, as the
/// vault's `batchSwap` expects it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSwapStep {
    pub pool_id: H256,
    pub asset_in_index: usize,
    pub asset_out_index: usize,
    #[serde(with = "u256_decimal")]
    pub amount: U256,
    #[serde(with = "bytes_hex")]
    pub user_data: Vec<u8>,
}

/// The terminal output of the swap encoder: the swap steps, the token list
/// they index into and the single trade being swapped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedSwap {
    pub steps: Vec<BatchSwapStep>,
    pub tokens: Vec<H160>,
    pub trade: Trade,
}

/// Assembles a single-order swap payload.
///
/// Swap steps and the trade resolve their tokens through the same registry so
/// that all indices agree on one token list.
#[derive(Clone, Debug)]
pub struct SwapEncoder {
    settlement: SettlementEncoder,
    steps: Vec<BatchSwapStep>,
}

impl SwapEncoder {
    pub fn new(domain: Domain) -> Self {
        Self {
            settlement: SettlementEncoder::new(domain),
            steps: Vec::new(),
        }
    }

    /// A snapshot of the token list shared by swap steps and the trade.
    pub fn tokens(&self) -> Vec<H160> {
        self.settlement.tokens()
    }

    pub fn steps(&self) -> &[BatchSwapStep] {
        &self.steps
    }

    pub fn encode_swap_step(&mut self, swap: Swap) -> &BatchSwapStep {
        let registry = self.settlement.token_registry_mut();
        let step = BatchSwapStep {
            pool_id: swap.pool_id,
            asset_in_index: registry.index(swap.asset_in),
            asset_out_index: registry.index(swap.asset_out),
            amount: swap.amount,
            user_data: swap.user_data,
        };
        self.steps.push(step);
        // Unwrap because the step was just pushed.
        self.steps.last().unwrap()
    }

    /// Encodes the swapped order as a trade.
    ///
    /// Unless explicitly overridden, the executed amount is the order's limit
    /// amount: swaps settle against the order's full counter amount, buy
    /// orders by their sell limit and sell orders by their buy limit.
    pub fn encode_trade(
        &mut self,
        order: &Order,
        signature: &Signature,
        executed_amount: Option<U256>,
    ) -> Result<()> {
        let executed_amount = executed_amount.unwrap_or(limit_amount(order));
        self.settlement
            .encode_trade(order, signature, Some(executed_amount))
    }

    /// Signs the order with the given key and encodes it as the swapped trade.
    pub fn sign_encode_trade(
        &mut self,
        order: &Order,
        key: impl Key,
        scheme: EcdsaSigningScheme,
        executed_amount: Option<U256>,
    ) -> Result<Signature> {
        let separator = *self.settlement.domain_separator();
        let signature = model::signature::EcdsaSignature::sign(
            scheme,
            &separator,
            &order.hash_struct(),
            key,
        )?
        .to_signature(scheme);
        self.encode_trade(order, &signature, executed_amount)?;
        Ok(signature)
    }

    /// Assembles the full swap payload.
    pub fn encoded_swap(&self) -> Result<EncodedSwap> {
        let trade = self
            .settlement
            .trades()
            .first()
            .context("swap trade was not encoded")?;
        Ok(EncodedSwap {
            steps: self.steps.clone(),
            tokens: self.settlement.tokens(),
            trade: trade.clone(),
        })
    }
}

fn limit_amount(order: &Order) -> U256 {
    match order.kind {
        OrderKind::Sell => order.buy_amount,
        OrderKind::Buy => order.sell_amount,
    }
}
