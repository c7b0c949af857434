//! Owned ledger objects: escrows, checks and NFToken offers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flags::{self, FlagDescriptor, FlagRegistry, TF_SELL_NFTOKEN};
use crate::{AmountSpec, BridgeError, Result};

/// Records split by direction relative to the queried account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directional<T> {
    /// Records the account created.
    pub sent: Vec<T>,
    /// Records addressed to the account by someone else.
    pub received: Vec<T>,
}

impl<T> Default for Directional<T> {
    fn default() -> Self {
        Self {
            sent: Vec::new(),
            received: Vec::new(),
        }
    }
}

impl<T> Directional<T> {
    /// File `item` under `sent` when `sender == owner`, else `received`.
    pub fn push(&mut self, owner: &str, sender: &str, item: T) {
        if sender == owner {
            self.sent.push(item);
        } else {
            self.received.push(item);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.len() + self.received.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Escrow
// ---------------------------------------------------------------------------

/// An escrow held on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    pub escrow_id: String,
    pub sender: String,
    pub receiver: String,
    pub amount: AmountSpec,
    /// Hash of the transaction that last touched the escrow; resolves to
    /// the creating sequence needed to finish or cancel it.
    pub prev_txn_id: Option<String>,
    /// `FinishAfter`: earliest time the escrow can be finished.
    pub redeem_date: Option<DateTime<Utc>>,
    /// `CancelAfter`: time after which the escrow can be cancelled.
    pub expiry_date: Option<DateTime<Utc>>,
    /// PREIMAGE-SHA-256 condition, uppercase hex.
    pub condition: Option<String>,
}

impl EscrowRecord {
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// Check that the escrow can be cancelled at `now`.
    pub fn ensure_cancellable(&self, now: DateTime<Utc>) -> Result<()> {
        match self.expiry_date {
            None => Err(not_ready(format!(
                "escrow {} has no CancelAfter and never expires",
                self.escrow_id
            ))),
            Some(t) if now <= t => Err(not_ready(format!(
                "escrow {} cannot be cancelled before {t}",
                self.escrow_id
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Check that the escrow can be finished at `now`, with or without a
    /// fulfillment.
    pub fn ensure_finishable(&self, now: DateTime<Utc>, has_fulfillment: bool) -> Result<()> {
        if let Some(t) = self.redeem_date {
            if now <= t {
                return Err(not_ready(format!(
                    "escrow {} cannot be finished before {t}",
                    self.escrow_id
                )));
            }
        }
        if let Some(t) = self.expiry_date {
            if now > t {
                return Err(not_ready(format!(
                    "escrow {} expired at {t}; it can only be cancelled",
                    self.escrow_id
                )));
            }
        }
        if self.is_conditional() && !has_fulfillment {
            return Err(not_ready(format!(
                "escrow {} is conditional and needs a fulfillment",
                self.escrow_id
            )));
        }
        Ok(())
    }
}

fn not_ready(reason: String) -> BridgeError {
    BridgeError::EscrowNotReady { reason }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// A check on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub check_id: String,
    pub sender: String,
    pub receiver: String,
    /// `SendMax`: the most the receiver can cash.
    pub amount: AmountSpec,
    pub sequence: Option<u32>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl CheckRecord {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|t| now > t)
    }
}

// ---------------------------------------------------------------------------
// NFToken offers
// ---------------------------------------------------------------------------

/// A buy or sell offer for an NFToken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftOfferRecord {
    pub offer_id: String,
    pub nftoken_id: String,
    pub owner: String,
    pub flags: u32,
    pub amount: AmountSpec,
    /// Only this account may accept the offer.
    pub receiver: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl NftOfferRecord {
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.flags & TF_SELL_NFTOKEN == TF_SELL_NFTOKEN
    }

    #[must_use]
    pub fn decoded_flags(&self) -> Vec<&'static FlagDescriptor> {
        flags::decode(self.flags, FlagRegistry::NfTokenOffer)
    }
}

/// NFToken offers an account created, split on the sell bit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftOfferBook {
    pub created_buy: Vec<NftOfferRecord>,
    pub created_sell: Vec<NftOfferRecord>,
}

impl NftOfferBook {
    pub fn push(&mut self, offer: NftOfferRecord) {
        if offer.is_sell() {
            self.created_sell.push(offer);
        } else {
            self.created_buy.push(offer);
        }
    }
}

/// Every open offer for one NFToken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTokenOffers {
    pub buy: Vec<NftOfferRecord>,
    pub sell: Vec<NftOfferRecord>,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl EscrowRecord {
    pub fn dummy(
        redeem_date: Option<DateTime<Utc>>,
        expiry_date: Option<DateTime<Utc>>,
        condition: Option<String>,
    ) -> Self {
        Self {
            escrow_id: "ESCROW".into(),
            sender: "rSender".into(),
            receiver: "rReceiver".into(),
            amount: AmountSpec::Native {
                value: rust_decimal::Decimal::TEN,
            },
            prev_txn_id: Some("PREV".into()),
            redeem_date,
            expiry_date,
            condition,
        }
    }
}
