//! Direct payments of XRP and issued tokens.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use xrpl_bridge_types::flags::TF_PARTIAL_PAYMENT;
use xrpl_bridge_types::{
    AmountSpec, BridgeError, MemoConfig, Result, TransactionIntent, TransactionKind,
};

use crate::TxBuilder;
use crate::builder::{require_address, require_distinct, require_positive};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendXrpParams {
    pub account: String,
    pub destination: String,
    /// Amount in whole XRP.
    pub amount: Decimal,
    pub destination_tag: Option<u32>,
    /// Replaces the configured default memo.
    pub memo: Option<MemoConfig>,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTokenParams {
    pub account: String,
    pub destination: String,
    pub amount: AmountSpec,
    /// Deliver what the paths allow rather than failing on a shortfall.
    #[serde(default)]
    pub partial: bool,
    pub destination_tag: Option<u32>,
    pub fee_drops: Option<u64>,
}

/// Issuer-side token movement: issuing to a holder or burning back to the
/// issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferParams {
    pub account: String,
    pub currency: String,
    pub issuer: String,
    pub value: Decimal,
    pub fee_drops: Option<u64>,
}

fn issued_only(amount: &AmountSpec) -> Result<()> {
    if amount.is_native() {
        return Err(BridgeError::UnsupportedAmountCombination {
            reason: "send_token carries an issued amount; use send_xrp for XRP".into(),
        });
    }
    Ok(())
}

impl TxBuilder {
    #[allow(clippy::too_many_arguments)]
    fn payment(
        &self,
        account: &str,
        destination: &str,
        amount: &AmountSpec,
        send_max: Option<&AmountSpec>,
        destination_tag: Option<u32>,
        flags: u32,
        fee_drops: Option<u64>,
        memo: Option<&MemoConfig>,
    ) -> Result<TransactionIntent> {
        require_address("destination", destination)?;
        require_distinct("destination", account, destination)?;
        require_positive("amount", amount)?;
        self.finish_with_memo(
            account,
            TransactionKind::Payment {
                destination: destination.to_string(),
                amount: amount.to_wire()?,
                destination_tag,
                send_max: send_max.map(AmountSpec::to_wire).transpose()?,
            },
            fee_drops,
            flags,
            memo,
        )
    }

    pub fn send_xrp(&self, p: &SendXrpParams) -> Result<TransactionIntent> {
        let amount = AmountSpec::native(p.amount)?;
        self.payment(
            &p.account,
            &p.destination,
            &amount,
            None,
            p.destination_tag,
            0,
            p.fee_drops,
            p.memo.as_ref(),
        )
    }

    /// Issued-token payment. `SendMax` equals `Amount` so the sender never
    /// pays more than the face value; `partial` adds tfPartialPayment.
    pub fn send_token(&self, p: &SendTokenParams) -> Result<TransactionIntent> {
        issued_only(&p.amount)?;
        let flags = if p.partial { TF_PARTIAL_PAYMENT } else { 0 };
        self.payment(
            &p.account,
            &p.destination,
            &p.amount,
            Some(&p.amount),
            p.destination_tag,
            flags,
            p.fee_drops,
            None,
        )
    }

    /// Issuer pays fresh tokens to `account`. The intent is signed by the
    /// issuer.
    pub fn issue_token(&self, p: &TokenTransferParams) -> Result<TransactionIntent> {
        let amount = AmountSpec::issued(&p.currency, &p.issuer, p.value)?;
        self.payment(&p.issuer, &p.account, &amount, None, None, 0, p.fee_drops, None)
    }

    /// Holder pays tokens back to their issuer, which removes them from
    /// circulation.
    pub fn burn_token(&self, p: &TokenTransferParams) -> Result<TransactionIntent> {
        let amount = AmountSpec::issued(&p.currency, &p.issuer, p.value)?;
        self.payment(&p.account, &p.issuer, &amount, None, None, 0, p.fee_drops, None)
    }
}
