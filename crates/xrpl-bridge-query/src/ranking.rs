//! Best-price ranking over an order-book snapshot.
//!
//! - **Best buy**: ascending quality, cheapest for the taker first
//! - **Best sell**: descending quality
//!
//! Offers of equal quality keep their snapshot order. Results are keyed by
//! 1-based rank in a `BTreeMap`, so iteration follows rank order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xrpl_bridge_types::LedgerOffer;

/// Which side of the book to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankSide {
    BestBuy,
    BestSell,
}

/// Rank → offer, rank starting at 1.
pub type RankedOffers = BTreeMap<usize, LedgerOffer>;

/// Both sides of a ranked snapshot; a side that was not requested is
/// `None`, not an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedBook {
    pub best_buy: Option<RankedOffers>,
    pub best_sell: Option<RankedOffers>,
}

/// Rank one side of `offers`, keeping at most `limit` after sorting.
#[must_use]
pub fn rank_offers(offers: &[LedgerOffer], side: RankSide, limit: Option<usize>) -> RankedOffers {
    let mut sorted: Vec<&LedgerOffer> = offers.iter().collect();
    // sort_by is stable: ties keep snapshot order.
    match side {
        RankSide::BestBuy => sorted.sort_by(|a, b| a.quality.cmp(&b.quality)),
        RankSide::BestSell => sorted.sort_by(|a, b| b.quality.cmp(&a.quality)),
    }
    let keep = limit.unwrap_or(sorted.len());
    let ranked: RankedOffers = sorted
        .into_iter()
        .take(keep)
        .cloned()
        .enumerate()
        .map(|(i, offer)| (i + 1, offer))
        .collect();
    tracing::info!(
        side = ?side,
        snapshot = offers.len(),
        ranked = ranked.len(),
        best_quality = ?ranked.get(&1).map(|o| o.quality),
        "Order book ranked"
    );
    ranked
}

/// Rank every requested side into its own collection.
#[must_use]
pub fn rank_book(offers: &[LedgerOffer], sides: &[RankSide], limit: Option<usize>) -> RankedBook {
    let mut book = RankedBook::default();
    for &side in sides {
        let ranked = rank_offers(offers, side, limit);
        match side {
            RankSide::BestBuy => book.best_buy = Some(ranked),
            RankSide::BestSell => book.best_sell = Some(ranked),
        }
    }
    book
}
