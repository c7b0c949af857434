//! Order-book offers.
//!
//! `buy` is what the offer's creator wants to receive (`TakerPays`) and
//! `sell` is what it gives up (`TakerGets`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xrpl_bridge_types::flags::{TF_FILL_OR_KILL, TF_IMMEDIATE_OR_CANCEL, TF_PASSIVE, TF_SELL};
use xrpl_bridge_types::{AmountSpec, BridgeError, Result, TransactionIntent, TransactionKind};

use crate::TxBuilder;
use crate::builder::{encode_pair, protocol_time, require_positive};

/// A general `OfferCreate` with caller-chosen flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOfferParams {
    pub account: String,
    pub buy: AmountSpec,
    pub sell: AmountSpec,
    pub expiration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub passive: bool,
    #[serde(default)]
    pub immediate_or_cancel: bool,
    #[serde(default)]
    pub fill_or_kill: bool,
    /// tfSell: spend all of `sell` even if that buys more than `buy`.
    #[serde(default)]
    pub sell_all: bool,
    pub fee_drops: Option<u64>,
}

/// A passive offer that rests in the book to provide liquidity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityOfferParams {
    pub account: String,
    pub buy: AmountSpec,
    pub sell: AmountSpec,
    pub expiration: Option<DateTime<Utc>>,
    pub fee_drops: Option<u64>,
}

/// A fill-or-kill swap against the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    pub account: String,
    pub buy: AmountSpec,
    pub sell: AmountSpec,
    /// Spend all of `sell` regardless of how much `buy` it returns.
    #[serde(default)]
    pub swap_all: bool,
    pub fee_drops: Option<u64>,
}

/// Combine the four offer booleans into `OfferCreate` flags.
pub fn offer_flags(
    passive: bool,
    immediate_or_cancel: bool,
    fill_or_kill: bool,
    sell_all: bool,
) -> Result<u32> {
    if immediate_or_cancel && fill_or_kill {
        return Err(BridgeError::InvalidOfferFlags {
            reason: "tfImmediateOrCancel and tfFillOrKill are mutually exclusive".into(),
        });
    }
    if passive && (immediate_or_cancel || fill_or_kill) {
        return Err(BridgeError::InvalidOfferFlags {
            reason: "a tfPassive offer must be able to rest in the book".into(),
        });
    }
    let mut flags = 0;
    for (set, mask) in [
        (passive, TF_PASSIVE),
        (immediate_or_cancel, TF_IMMEDIATE_OR_CANCEL),
        (fill_or_kill, TF_FILL_OR_KILL),
        (sell_all, TF_SELL),
    ] {
        if set {
            flags |= mask;
        }
    }
    Ok(flags)
}

impl TxBuilder {
    fn offer_create(
        &self,
        account: &str,
        buy: &AmountSpec,
        sell: &AmountSpec,
        expiration: Option<DateTime<Utc>>,
        flags: u32,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        require_positive("buy", buy)?;
        require_positive("sell", sell)?;
        let (pair, taker_pays, taker_gets) = encode_pair(buy, sell)?;
        tracing::debug!(pair = %pair, account = %account, "Encoding offer legs");
        self.finish(
            account,
            TransactionKind::OfferCreate {
                taker_gets,
                taker_pays,
                expiration: protocol_time(expiration)?,
                offer_sequence: None,
            },
            fee_drops,
            flags,
        )
    }

    pub fn create_offer(&self, p: &CreateOfferParams) -> Result<TransactionIntent> {
        let flags = offer_flags(p.passive, p.immediate_or_cancel, p.fill_or_kill, p.sell_all)?;
        self.offer_create(&p.account, &p.buy, &p.sell, p.expiration, flags, p.fee_drops)
    }

    /// Passive offer: never consumes offers at exactly its own rate.
    pub fn order_book_liquidity(&self, p: &LiquidityOfferParams) -> Result<TransactionIntent> {
        self.offer_create(&p.account, &p.buy, &p.sell, p.expiration, TF_PASSIVE, p.fee_drops)
    }

    /// Fill-or-kill swap, with tfSell when `swap_all`.
    pub fn order_book_swap(&self, p: &SwapParams) -> Result<TransactionIntent> {
        let mut flags = TF_FILL_OR_KILL;
        if p.swap_all {
            flags |= TF_SELL;
        }
        self.offer_create(&p.account, &p.buy, &p.sell, None, flags, p.fee_drops)
    }

    pub fn cancel_offer(
        &self,
        account: &str,
        offer_sequence: u32,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        self.finish(
            account,
            TransactionKind::OfferCancel { offer_sequence },
            fee_drops,
            0,
        )
    }
}
