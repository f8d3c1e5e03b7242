//! Incremental assembly of a full settlement payload.

use crate::{tokens::TokenRegistry, trade::Trade};
use anyhow::{ensure, Context, Result};
use hex_literal::hex;
use model::{
    interaction::InteractionData,
    order::{Order, OrderUid},
    signature::{EcdsaSignature, EcdsaSigningScheme, Signature},
    Domain, DomainSeparator,
};
use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use web3::{
    ethabi::{encode, Token},
    signing::Key,
};

/// Where in the settlement an interaction executes: before any transfers in,
/// between transfers in and transfers out, or after all transfers out.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionStage {
    Pre = 0,
    #[default]
    Intra = 1,
    Post = 2,
}

/// The terminal output of the encoder, mirroring the argument list of the
/// settlement contract's `settle` function.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedSettlement {
    pub tokens: Vec<H160>,
    pub clearing_prices: Vec<U256>,
    pub trades: Vec<Trade>,
    pub interactions: [Vec<InteractionData>; 3],
}

// keccak256("freeFilledAmountStorage(bytes[])")[..4]
const FREE_FILLED_AMOUNT_STORAGE_SELECTOR: [u8; 4] = hex!("ed9f35ce");
// keccak256("freePreSignatureStorage(bytes[])")[..4]
const FREE_PRE_SIGNATURE_STORAGE_SELECTOR: [u8; 4] = hex!("a2a7d51b");

/// Order UIDs whose settlement contract storage gets freed for a gas refund
/// once their orders can no longer trade.
#[derive(Clone, Debug, Default)]
struct OrderRefunds {
    // The settlement contract the refund calls target. Captured when refunds
    // are queued so that reading interactions stays infallible.
    settlement: Option<H160>,
    filled_amounts: Vec<OrderUid>,
    pre_signatures: Vec<OrderUid>,
}

/// An intermediate settlement representation that can be incrementally
/// constructed.
///
/// Each instance is meant to be built up by a single logical caller; getters
/// hand out snapshots of the current state.
#[derive(Clone, Debug)]
pub struct SettlementEncoder {
    domain: Domain,
    separator: DomainSeparator,
    tokens: TokenRegistry,
    trades: Vec<Trade>,
    interactions: [Vec<InteractionData>; 3],
    refunds: OrderRefunds,
}

impl SettlementEncoder {
    pub fn new(domain: Domain) -> Self {
        let separator = domain.separator();
        Self {
            domain,
            separator,
            tokens: TokenRegistry::default(),
            trades: Vec::new(),
            interactions: Default::default(),
            refunds: OrderRefunds::default(),
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn domain_separator(&self) -> &DomainSeparator {
        &self.separator
    }

    /// A snapshot of the settlement token list in index order.
    pub fn tokens(&self) -> Vec<H160> {
        self.tokens.addresses()
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub(crate) fn token_registry_mut(&mut self) -> &mut TokenRegistry {
        &mut self.tokens
    }

    /// Appends a trade for a signed order.
    ///
    /// The executed amount is required for partially fillable orders since
    /// their fill amount is otherwise ambiguous; fill-or-kill orders ignore
    /// it.
    pub fn encode_trade(
        &mut self,
        order: &Order,
        signature: &Signature,
        executed_amount: Option<U256>,
    ) -> Result<()> {
        ensure!(
            !order.partially_fillable || executed_amount.is_some(),
            "partially fillable order requires an executed amount",
        );
        let trade = Trade::encode(
            &mut self.tokens,
            order,
            signature,
            executed_amount.unwrap_or_default(),
        )?;
        self.trades.push(trade);
        Ok(())
    }

    /// Signs the order with the given key and appends the resulting trade.
    pub fn sign_encode_trade(
        &mut self,
        order: &Order,
        key: impl Key,
        scheme: EcdsaSigningScheme,
        executed_amount: Option<U256>,
    ) -> Result<Signature> {
        let signature = EcdsaSignature::sign(scheme, &self.separator, &order.hash_struct(), key)?
            .to_signature(scheme);
        self.encode_trade(order, &signature, executed_amount)?;
        Ok(signature)
    }

    /// Appends an interaction to the default intra stage.
    pub fn encode_interaction(&mut self, interaction: InteractionData) {
        self.encode_interaction_at(InteractionStage::Intra, interaction);
    }

    pub fn encode_interaction_at(&mut self, stage: InteractionStage, interaction: InteractionData) {
        self.interactions[stage as usize].push(interaction);
    }

    /// Queues order UIDs whose filled amount respectively pre-signature
    /// storage gets freed in the post interaction stage.
    ///
    /// The refund calls target the domain's verifying contract, so the domain
    /// must name one.
    pub fn encode_order_refunds(
        &mut self,
        filled_amounts: &[OrderUid],
        pre_signatures: &[OrderUid],
    ) -> Result<()> {
        let settlement = self
            .domain
            .verifying_contract
            .context("domain without a verifying contract cannot encode order refunds")?;
        self.refunds.settlement = Some(settlement);
        self.refunds.filled_amounts.extend_from_slice(filled_amounts);
        self.refunds.pre_signatures.extend_from_slice(pre_signatures);
        Ok(())
    }

    /// A snapshot of the three interaction stages with any queued order
    /// refund calls appended to the post stage.
    pub fn interactions(&self) -> [Vec<InteractionData>; 3] {
        let mut interactions = self.interactions.clone();
        if let Some(settlement) = self.refunds.settlement {
            for (selector, uids) in [
                (
                    FREE_FILLED_AMOUNT_STORAGE_SELECTOR,
                    &self.refunds.filled_amounts,
                ),
                (
                    FREE_PRE_SIGNATURE_STORAGE_SELECTOR,
                    &self.refunds.pre_signatures,
                ),
            ] {
                if uids.is_empty() {
                    continue;
                }
                interactions[InteractionStage::Post as usize]
                    .push(free_storage_interaction(settlement, selector, uids));
            }
        }
        interactions
    }

    /// Maps the settlement tokens to their clearing prices, in token index
    /// order.
    pub fn clearing_prices(&self, prices: &HashMap<H160, U256>) -> Result<Vec<U256>> {
        self.tokens
            .addresses()
            .iter()
            .map(|token| {
                prices
                    .get(token)
                    .copied()
                    .with_context(|| format!("missing clearing price for token {token:?}"))
            })
            .collect()
    }

    /// Assembles the full settlement payload for the given clearing prices.
    pub fn encoded_settlement(
        &self,
        prices: &HashMap<H160, U256>,
    ) -> Result<EncodedSettlement> {
        Ok(EncodedSettlement {
            tokens: self.tokens.addresses(),
            clearing_prices: self.clearing_prices(prices)?,
            trades: self.trades.clone(),
            interactions: self.interactions(),
        })
    }
}

/// Builds a trade-less settlement that only executes the given interactions.
/// Used for contract setup and maintenance transactions.
pub fn encoded_setup(interactions: impl IntoIterator<Item = InteractionData>) -> EncodedSettlement {
    EncodedSettlement {
        tokens: Vec::new(),
        clearing_prices: Vec::new(),
        trades: Vec::new(),
        interactions: [Vec::new(), interactions.into_iter().collect(), Vec::new()],
    }
}

fn free_storage_interaction(
    settlement: H160,
    selector: [u8; 4],
    order_uids: &[OrderUid],
) -> InteractionData {
    let mut call_data = selector.to_vec();
    call_data.extend(encode(&[Token::Array(
        order_uids
            .iter()
            .map(|uid| Token::Bytes(uid.0.to_vec()))
            .collect(),
    )]));
    InteractionData {
        target: settlement,
        value: U256::zero(),
        call_data,
    }
}
