//! Order-book offer records.
//!
//! An offer's `buy` side is what its creator receives (`TakerPays`) and its
//! `sell` side is what the creator gives up (`TakerGets`).

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AmountSpec;
use crate::flags::{self, FlagDescriptor, FlagRegistry, LSF_PASSIVE, LSF_SELL};

/// A resting offer as seen in an order-book snapshot or a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerOffer {
    /// Account that placed the offer.
    pub creator: String,
    /// Ledger object id of the offer.
    pub offer_id: String,
    /// Sequence of the creating transaction; used to cancel the offer.
    pub sequence: u32,
    /// Exchange rate: `TakerPays / TakerGets`.
    pub quality: Decimal,
    /// Ledger object flags (`lsfPassive`, `lsfSell`).
    pub flags: u32,
    pub buy: AmountSpec,
    pub sell: AmountSpec,
    /// How much of `sell` the creator currently holds, in human units.
    pub creator_liquidity: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LedgerOffer {
    #[must_use]
    pub fn is_passive(&self) -> bool {
        self.flags & LSF_PASSIVE == LSF_PASSIVE
    }

    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.flags & LSF_SELL == LSF_SELL
    }

    #[must_use]
    pub fn decoded_flags(&self) -> Vec<&'static FlagDescriptor> {
        flags::decode(self.flags, FlagRegistry::OfferObject)
    }

    /// Whether the offer has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }
}

impl fmt::Display for LedgerOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Offer[{}#{}] buy {} {} / sell {} {} @ {}",
            self.creator,
            self.sequence,
            self.buy.value(),
            self.buy.currency(),
            self.sell.value(),
            self.sell.currency(),
            self.quality,
        )
    }
}

/// One of the caller's own offers (`account_offers`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOffer {
    pub sequence: u32,
    pub flags: u32,
    pub quality: Decimal,
    pub buy: AmountSpec,
    pub sell: AmountSpec,
    /// `sell / buy`; absent when `buy` is zero.
    pub rate: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccountOffer {
    #[must_use]
    pub fn is_passive(&self) -> bool {
        self.flags & LSF_PASSIVE == LSF_PASSIVE
    }

    #[must_use]
    pub fn decoded_flags(&self) -> Vec<&'static FlagDescriptor> {
        flags::decode(self.flags, FlagRegistry::OfferObject)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl LedgerOffer {
    /// XRP-for-USD offer with the given quality.
    pub fn dummy(quality: Decimal) -> Self {
        Self::dummy_from("rCreator", quality)
    }

    pub fn dummy_from(creator: &str, quality: Decimal) -> Self {
        Self {
            creator: creator.to_string(),
            offer_id: format!("{creator}-{quality}"),
            sequence: 1,
            quality,
            flags: 0,
            buy: AmountSpec::Native {
                value: Decimal::ONE_HUNDRED,
            },
            sell: AmountSpec::Issued {
                currency: "USD".into(),
                issuer: "rIssuer".into(),
                value: Decimal::TEN,
            },
            creator_liquidity: None,
            expires_at: None,
        }
    }
}
