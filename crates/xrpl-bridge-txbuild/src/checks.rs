//! Checks: deferred payments the receiver cashes later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xrpl_bridge_types::{AmountSpec, Result, TransactionIntent, TransactionKind};

use crate::TxBuilder;
use crate::builder::{protocol_time, require_address, require_distinct, require_hex, require_positive};

const LEDGER_ID_HEX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCheckParams {
    pub account: String,
    pub destination: String,
    /// Most the check can debit from the sender.
    pub send_max: AmountSpec,
    pub expiration: Option<DateTime<Utc>>,
    pub destination_tag: Option<u32>,
    /// 256-bit hash identifying what the check pays for.
    pub invoice_id: Option<String>,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCheckParams {
    /// The check's receiver.
    pub account: String,
    pub check_id: String,
    pub amount: AmountSpec,
    pub fee_drops: Option<u64>,
}

impl TxBuilder {
    pub fn create_check(&self, p: &CreateCheckParams) -> Result<TransactionIntent> {
        require_address("destination", &p.destination)?;
        require_distinct("destination", &p.account, &p.destination)?;
        require_positive("send_max", &p.send_max)?;
        if let Some(id) = &p.invoice_id {
            require_hex("invoice_id", id, LEDGER_ID_HEX_LEN)?;
        }
        self.finish(
            &p.account,
            TransactionKind::CheckCreate {
                destination: p.destination.clone(),
                send_max: p.send_max.to_wire()?,
                expiration: protocol_time(p.expiration)?,
                destination_tag: p.destination_tag,
                invoice_id: p.invoice_id.as_ref().map(|id| id.to_ascii_uppercase()),
            },
            p.fee_drops,
            0,
        )
    }

    /// Cash exactly `amount` from the check.
    pub fn cash_check(&self, p: &CashCheckParams) -> Result<TransactionIntent> {
        require_hex("check_id", &p.check_id, LEDGER_ID_HEX_LEN)?;
        require_positive("amount", &p.amount)?;
        self.finish(
            &p.account,
            TransactionKind::CheckCash {
                check_id: p.check_id.clone(),
                amount: p.amount.to_wire()?,
            },
            p.fee_drops,
            0,
        )
    }

    /// Either party may cancel; anyone may once it has expired.
    pub fn cancel_check(
        &self,
        account: &str,
        check_id: &str,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        require_hex("check_id", check_id, LEDGER_ID_HEX_LEN)?;
        self.finish(
            account,
            TransactionKind::CheckCancel {
                check_id: check_id.to_string(),
            },
            fee_drops,
            0,
        )
    }
}
