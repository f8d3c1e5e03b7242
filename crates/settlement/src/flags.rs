//! Bit packing of order and trade metadata into the single flags word the
//! settlement contract decodes.
//!
//! See
//! <https://github.com/cowprotocol/contracts/blob/v1.1.2/src/contracts/libraries/GPv2Trade.sol#L58-L94>
//! for the on-chain layout these tables must reproduce exactly.

use anyhow::{anyhow, Context, Result};
use model::{
    order::{BuyTokenDestination, OrderKind, SellTokenSource},
    signature::SigningScheme,
};
use primitive_types::U256;

/// One bit field inside the flags word: a fixed offset and the ordered list
/// of legal options. `None` marks a slot the contract leaves unused.
struct FlagMask<T: 'static> {
    offset: usize,
    options: &'static [Option<T>],
}

impl<T: Copy + Eq + std::fmt::Debug> FlagMask<T> {
    fn encode(&self, value: T) -> Result<U256> {
        let index = self
            .options
            .iter()
            .position(|option| *option == Some(value))
            .ok_or_else(|| anyhow!("{value:?} cannot be encoded as a flag"))?;
        Ok(U256::from(index) << self.offset)
    }

    fn decode(&self, flags: U256) -> Result<T> {
        let mask = self.options.len().next_power_of_two() - 1;
        let index = ((flags >> self.offset).low_u64() as usize) & mask;
        self.options
            .get(index)
            .copied()
            .flatten()
            .with_context(|| format!("flag field at offset {} has invalid value {index}", self.offset))
    }
}

const KIND: FlagMask<OrderKind> = FlagMask {
    offset: 0,
    options: &[Some(OrderKind::Sell), Some(OrderKind::Buy)],
};

const PARTIALLY_FILLABLE: FlagMask<bool> = FlagMask {
    offset: 1,
    options: &[Some(false), Some(true)],
};

const SELL_TOKEN_BALANCE: FlagMask<SellTokenSource> = FlagMask {
    offset: 2,
    options: &[
        Some(SellTokenSource::Erc20),
        // The contract reserves 0b01 but never assigns it a meaning.
        None,
        Some(SellTokenSource::External),
        Some(SellTokenSource::Internal),
    ],
};

const BUY_TOKEN_BALANCE: FlagMask<BuyTokenDestination> = FlagMask {
    offset: 4,
    options: &[
        Some(BuyTokenDestination::Erc20),
        Some(BuyTokenDestination::Internal),
    ],
};

const SIGNING_SCHEME: FlagMask<SigningScheme> = FlagMask {
    offset: 5,
    options: &[
        Some(SigningScheme::Eip712),
        Some(SigningScheme::EthSign),
        Some(SigningScheme::Eip1271),
        Some(SigningScheme::PreSign),
    ],
};

/// The order metadata bits shared between order and trade flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OrderFlags {
    pub kind: OrderKind,
    pub partially_fillable: bool,
    pub sell_token_balance: SellTokenSource,
    pub buy_token_balance: BuyTokenDestination,
}

impl OrderFlags {
    pub fn encode(&self) -> Result<U256> {
        Ok(KIND.encode(self.kind)?
            | PARTIALLY_FILLABLE.encode(self.partially_fillable)?
            | SELL_TOKEN_BALANCE.encode(self.sell_token_balance)?
            | BUY_TOKEN_BALANCE.encode(self.buy_token_balance)?)
    }

    pub fn decode(flags: U256) -> Result<Self> {
        Ok(Self {
            kind: KIND.decode(flags)?,
            partially_fillable: PARTIALLY_FILLABLE.decode(flags)?,
            sell_token_balance: SELL_TOKEN_BALANCE.decode(flags)?,
            buy_token_balance: BUY_TOKEN_BALANCE.decode(flags)?,
        })
    }
}

/// The full trade flags word: order flags plus the signing scheme.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TradeFlags {
    pub order_flags: OrderFlags,
    pub signing_scheme: SigningScheme,
}

impl TradeFlags {
    pub fn encode(&self) -> Result<U256> {
        Ok(self.order_flags.encode()? | SIGNING_SCHEME.encode(self.signing_scheme)?)
    }

    pub fn decode(flags: U256) -> Result<Self> {
        Ok(Self {
            order_flags: OrderFlags::decode(flags)?,
            signing_scheme: SIGNING_SCHEME.decode(flags)?,
        })
    }
}
