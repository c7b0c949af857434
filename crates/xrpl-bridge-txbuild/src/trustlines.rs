//! Trust lines: opening, limiting, removing and freezing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use xrpl_bridge_types::constants::DEFAULT_TRUSTLINE_LIMIT;
use xrpl_bridge_types::flags::{TF_CLEAR_FREEZE, TF_CLEAR_NO_RIPPLE, TF_SET_FREEZE, TF_SET_NO_RIPPLE};
use xrpl_bridge_types::{
    BridgeError, IssuedAmount, Result, TransactionIntent, TransactionKind, normalize_currency_code,
};

use crate::TxBuilder;
use crate::builder::{require_address, require_distinct};

/// A trust line from `account` towards `issuer` for `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustlineParams {
    pub account: String,
    pub currency: String,
    pub issuer: String,
    pub fee_drops: Option<u64>,
}

/// Freeze or unfreeze the line an issuer shares with `holder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeParams {
    /// The issuing account.
    pub account: String,
    pub holder: String,
    pub currency: String,
    pub freeze: bool,
    pub fee_drops: Option<u64>,
}

fn limit_amount(currency: &str, issuer: &str, value: String) -> Result<IssuedAmount> {
    Ok(IssuedAmount {
        currency: normalize_currency_code(currency)?,
        issuer: issuer.to_string(),
        value,
    })
}

impl TxBuilder {
    fn trust_set(
        &self,
        p: &TrustlineParams,
        value: String,
        flags: u32,
    ) -> Result<TransactionIntent> {
        require_address("issuer", &p.issuer)?;
        require_distinct("issuer", &p.account, &p.issuer)?;
        self.finish(
            &p.account,
            TransactionKind::TrustSet {
                limit_amount: limit_amount(&p.currency, &p.issuer, value)?,
            },
            p.fee_drops,
            flags,
        )
    }

    /// Trust line with an explicit limit. A zero limit asks the ledger to
    /// delete the line once its balance is zero.
    pub fn create_trustline(
        &self,
        p: &TrustlineParams,
        limit: Decimal,
    ) -> Result<TransactionIntent> {
        if limit.is_sign_negative() && !limit.is_zero() {
            return Err(BridgeError::invalid_param("limit", format!("{limit} is negative")));
        }
        self.trust_set(p, limit.normalize().to_string(), 0)
    }

    /// Start holding a token with the default limit. `rippling` decides
    /// whether balances may ripple through this line.
    pub fn add_token(&self, p: &TrustlineParams, rippling: bool) -> Result<TransactionIntent> {
        let flags = if rippling {
            TF_CLEAR_NO_RIPPLE
        } else {
            TF_SET_NO_RIPPLE
        };
        self.trust_set(p, DEFAULT_TRUSTLINE_LIMIT.to_string(), flags)
    }

    /// Drop the limit to zero so the line can be removed.
    pub fn remove_token(&self, p: &TrustlineParams) -> Result<TransactionIntent> {
        self.trust_set(p, "0".to_string(), 0)
    }

    /// Issuer-side freeze of one holder's line. The issuer field of the
    /// limit names the holder.
    pub fn modify_token_freeze_state(&self, p: &FreezeParams) -> Result<TransactionIntent> {
        require_address("holder", &p.holder)?;
        require_distinct("holder", &p.account, &p.holder)?;
        let flags = if p.freeze {
            TF_SET_FREEZE
        } else {
            TF_CLEAR_FREEZE
        };
        self.finish(
            &p.account,
            TransactionKind::TrustSet {
                limit_amount: limit_amount(&p.currency, &p.holder, "0".to_string())?,
            },
            p.fee_drops,
            flags,
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn line(currency: &str) -> TrustlineParams {
        TrustlineParams {
            account: "rHolder".into(),
            currency: currency.into(),
            issuer: "rIssuer".into(),
            fee_drops: None,
        }
    }

    #[test]
    fn add_token_defaults_to_no_ripple() {
        let intent = TxBuilder::default().add_token(&line("USD"), false).unwrap();
        let v = intent.to_json().unwrap();
        assert_eq!(v["TransactionType"], json!("TrustSet"));
        assert_eq!(
            v["LimitAmount"],
            json!({"currency": "USD", "issuer": "rIssuer", "value": "1000000000"})
        );
        assert_eq!(intent.flags(), TF_SET_NO_RIPPLE);

        let rippling = TxBuilder::default().add_token(&line("USD"), true).unwrap();
        assert_eq!(rippling.flags(), TF_CLEAR_NO_RIPPLE);
    }

    #[test]
    fn long_symbol_is_hex_encoded() {
        let v = TxBuilder::default()
            .create_trustline(&line("BTCX"), Decimal::new(500, 0))
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(
            v["LimitAmount"]["currency"],
            json!("4254435800000000000000000000000000000000")
        );
        assert_eq!(v["LimitAmount"]["value"], json!("500"));
    }

    #[test]
    fn remove_token_zero_limit() {
        let v = TxBuilder::default()
            .remove_token(&line("USD"))
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(v["LimitAmount"]["value"], json!("0"));
    }

    #[test]
    fn negative_limit_rejected() {
        let err = TxBuilder::default()
            .create_trustline(&line("USD"), Decimal::new(-1, 0))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidParameter { field: "limit", .. }));
    }

    #[test]
    fn self_trust_rejected() {
        let mut p = line("USD");
        p.issuer = p.account.clone();
        assert!(TxBuilder::default().add_token(&p, false).is_err());
    }

    #[test]
    fn freeze_names_holder_as_issuer() {
        let p = FreezeParams {
            account: "rIssuer".into(),
            holder: "rHolder".into(),
            currency: "USD".into(),
            freeze: true,
            fee_drops: None,
        };
        let intent = TxBuilder::default().modify_token_freeze_state(&p).unwrap();
        let v = intent.to_json().unwrap();
        assert_eq!(v["Account"], json!("rIssuer"));
        assert_eq!(v["LimitAmount"]["issuer"], json!("rHolder"));
        assert_eq!(intent.flags(), TF_SET_FREEZE);

        let thaw = TxBuilder::default()
            .modify_token_freeze_state(&FreezeParams { freeze: false, ..p })
            .unwrap();
        assert_eq!(thaw.flags(), TF_CLEAR_FREEZE);
    }
}
