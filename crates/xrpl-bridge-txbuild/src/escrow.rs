//! Escrows: XRP locked until a time passes or a condition is fulfilled.
//!
//! Finishing or cancelling an escrow needs the sequence of the transaction
//! that created it. Callers resolve it from the escrow's `PreviousTxnID`
//! (see `parse_escrow_sequence` in the query crate) and pass it in; `None`
//! means it could not be resolved and the builder refuses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use xrpl_bridge_types::{
    AmountSpec, BridgeError, EscrowRecord, Result, TransactionIntent, TransactionKind,
};

use crate::TxBuilder;
use crate::builder::{protocol_time, require_address, require_distinct, require_hex};

// DER framing of a PREIMAGE-SHA-256 condition (fingerprint + cost 32) and
// of its fulfillment (32-byte preimage).
const CONDITION_PREFIX: &str = "A0258020";
const CONDITION_SUFFIX: &str = "810120";
const FULFILLMENT_PREFIX: &str = "A0228020";
const CONDITION_HEX_LEN: usize = 78;
const FULFILLMENT_HEX_LEN: usize = 72;

/// A PREIMAGE-SHA-256 crypto-condition and the fulfillment that unlocks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowCondition {
    /// Goes in `EscrowCreate.Condition`.
    pub condition: String,
    /// Kept secret until `EscrowFinish`.
    pub fulfillment: String,
}

impl EscrowCondition {
    /// Fresh pair from a random 32-byte preimage.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_preimage(rand::random::<[u8; 32]>())
    }

    #[must_use]
    pub fn from_preimage(preimage: [u8; 32]) -> Self {
        let fingerprint = Sha256::digest(preimage);
        Self {
            condition: format!(
                "{CONDITION_PREFIX}{}{CONDITION_SUFFIX}",
                hex::encode_upper(fingerprint)
            ),
            fulfillment: format!("{FULFILLMENT_PREFIX}{}", hex::encode_upper(preimage)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEscrowParams {
    pub account: String,
    pub destination: String,
    /// Amount in whole XRP. Escrows hold XRP only.
    pub amount: Decimal,
    pub finish_after: Option<DateTime<Utc>>,
    pub cancel_after: Option<DateTime<Utc>>,
    /// Hex crypto-condition, e.g. from [`EscrowCondition::generate`].
    pub condition: Option<String>,
    pub destination_tag: Option<u32>,
    pub fee_drops: Option<u64>,
}

/// A payment released at `release_at`, optionally reclaimable after
/// `expire_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePaymentParams {
    pub account: String,
    pub destination: String,
    pub amount: Decimal,
    pub release_at: DateTime<Utc>,
    pub expire_at: Option<DateTime<Utc>>,
    pub destination_tag: Option<u32>,
    pub fee_drops: Option<u64>,
}

/// Finish or cancel an existing escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleEscrowParams {
    pub account: String,
    pub escrow: EscrowRecord,
    /// Sequence of the creating transaction, `None` when unresolved.
    pub sequence: Option<u32>,
    pub now: DateTime<Utc>,
    /// Needed to finish a conditional escrow.
    pub fulfillment: Option<String>,
    pub fee_drops: Option<u64>,
}

impl SettleEscrowParams {
    fn sequence(&self) -> Result<u32> {
        self.sequence.ok_or_else(|| BridgeError::EscrowNotReady {
            reason: format!(
                "creating sequence of escrow {} is unknown",
                self.escrow.escrow_id
            ),
        })
    }
}

impl TxBuilder {
    pub fn create_escrow(&self, p: &CreateEscrowParams) -> Result<TransactionIntent> {
        require_address("destination", &p.destination)?;
        let amount = AmountSpec::native(p.amount)?;
        if amount.value().is_zero() {
            return Err(BridgeError::invalid_param("amount", "escrow of 0 XRP"));
        }
        if p.finish_after.is_none() && p.condition.is_none() {
            return Err(BridgeError::invalid_param(
                "finish_after",
                "an escrow needs a FinishAfter time or a condition",
            ));
        }
        if let (Some(finish), Some(cancel)) = (p.finish_after, p.cancel_after) {
            if cancel <= finish {
                return Err(BridgeError::invalid_param(
                    "cancel_after",
                    format!("{cancel} is not after FinishAfter {finish}"),
                ));
            }
        }
        if let Some(c) = &p.condition {
            require_hex("condition", c, CONDITION_HEX_LEN)?;
        }
        self.finish(
            &p.account,
            TransactionKind::EscrowCreate {
                destination: p.destination.clone(),
                amount: amount.to_wire()?,
                finish_after: protocol_time(p.finish_after)?,
                cancel_after: protocol_time(p.cancel_after)?,
                condition: p.condition.as_ref().map(|c| c.to_ascii_uppercase()),
                destination_tag: p.destination_tag,
            },
            p.fee_drops,
            0,
        )
    }

    /// Time-locked payment to someone else.
    pub fn schedule_payment(&self, p: &SchedulePaymentParams) -> Result<TransactionIntent> {
        require_distinct("destination", &p.account, &p.destination)?;
        self.create_escrow(&CreateEscrowParams {
            account: p.account.clone(),
            destination: p.destination.clone(),
            amount: p.amount,
            finish_after: Some(p.release_at),
            cancel_after: p.expire_at,
            condition: None,
            destination_tag: p.destination_tag,
            fee_drops: p.fee_drops,
        })
    }

    /// Return an expired escrow's XRP to its sender.
    pub fn cancel_escrow(&self, p: &SettleEscrowParams) -> Result<TransactionIntent> {
        let offer_sequence = p.sequence()?;
        p.escrow.ensure_cancellable(p.now)?;
        self.finish(
            &p.account,
            TransactionKind::EscrowCancel {
                owner: p.escrow.sender.clone(),
                offer_sequence,
            },
            p.fee_drops,
            0,
        )
    }

    /// Deliver the escrowed XRP to its receiver.
    pub fn finish_escrow(&self, p: &SettleEscrowParams) -> Result<TransactionIntent> {
        let offer_sequence = p.sequence()?;
        p.escrow.ensure_finishable(p.now, p.fulfillment.is_some())?;
        if let Some(f) = &p.fulfillment {
            require_hex("fulfillment", f, FULFILLMENT_HEX_LEN)?;
        }
        let (condition, fulfillment) = match (&p.escrow.condition, &p.fulfillment) {
            (Some(c), Some(f)) => (Some(c.clone()), Some(f.to_ascii_uppercase())),
            (None, Some(_)) => {
                return Err(BridgeError::invalid_param(
                    "fulfillment",
                    format!("escrow {} has no condition to fulfill", p.escrow.escrow_id),
                ));
            }
            _ => (None, None),
        };
        self.finish(
            &p.account,
            TransactionKind::EscrowFinish {
                owner: p.escrow.sender.clone(),
                offer_sequence,
                condition,
                fulfillment,
            },
            p.fee_drops,
            0,
        )
    }
}
