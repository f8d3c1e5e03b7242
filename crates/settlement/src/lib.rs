//! Encoding of settlement calldata: trade flags, token indices, trades and
//! the staged interaction lists the settlement contract executes around them.

pub mod encoder;
pub mod flags;
pub mod swap;
pub mod tokens;
pub mod trade;

pub use encoder::{EncodedSettlement, InteractionStage, SettlementEncoder};
pub use flags::{OrderFlags, TradeFlags};
pub use swap::{BatchSwapStep, EncodedSwap, Swap, SwapEncoder};
pub use tokens::TokenRegistry;
pub use trade::Trade;
