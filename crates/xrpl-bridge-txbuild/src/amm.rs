//! AMM pools: create, vote on the trading fee, bid for the auction slot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use xrpl_bridge_types::constants::MAX_AMM_AUTH_ACCOUNTS;
use xrpl_bridge_types::{
    AmountSpec, Asset, AuthAccountEntry, BridgeError, Result, TransactionIntent, TransactionKind,
    amm_fee_to_xrp_format, is_lp_token_code,
};

use crate::TxBuilder;
use crate::builder::{encode_pair, require_address, require_positive};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmCreateParams {
    pub account: String,
    pub amount: AmountSpec,
    pub amount2: AmountSpec,
    /// Percentage, 0..=1.
    pub trading_fee: Decimal,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmVoteParams {
    pub account: String,
    pub asset: Asset,
    pub asset2: Asset,
    /// Percentage, 0..=1.
    pub trading_fee: Decimal,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmBidParams {
    pub account: String,
    pub asset: Asset,
    pub asset2: Asset,
    /// LP tokens; the pool's LP-token currency and AMM account as issuer.
    pub bid_min: Option<AmountSpec>,
    pub bid_max: Option<AmountSpec>,
    /// Accounts that share the discounted fee (at most four).
    #[serde(default)]
    pub auth_accounts: Vec<String>,
    pub fee_drops: Option<u64>,
}

/// Assets are compared in wire form, so `"BTCX"` and its 40-hex code are
/// the same asset.
fn require_distinct_assets(asset: &Asset, asset2: &Asset) -> Result<()> {
    if asset.to_wire()? == asset2.to_wire()? {
        return Err(BridgeError::UnsupportedAmountCombination {
            reason: format!("a pool needs two different assets, got {asset} twice"),
        });
    }
    Ok(())
}

fn require_lp_token(field: &'static str, amount: &AmountSpec) -> Result<()> {
    match amount {
        AmountSpec::Issued { currency, .. } if is_lp_token_code(currency) => Ok(()),
        _ => Err(BridgeError::invalid_param(
            field,
            format!("{} is not an LP token", amount.currency()),
        )),
    }
}

impl TxBuilder {
    pub fn amm_create(&self, p: &AmmCreateParams) -> Result<TransactionIntent> {
        require_distinct_assets(&p.amount.asset(), &p.amount2.asset())?;
        require_positive("amount", &p.amount)?;
        require_positive("amount2", &p.amount2)?;
        let trading_fee = amm_fee_to_xrp_format(p.trading_fee)?;
        let (pair, amount, amount2) = encode_pair(&p.amount, &p.amount2)?;
        tracing::debug!(pair = %pair, trading_fee = trading_fee, "Encoding AMM pool");
        self.finish(
            &p.account,
            TransactionKind::AmmCreate {
                amount,
                amount2,
                trading_fee,
            },
            p.fee_drops,
            0,
        )
    }

    pub fn amm_vote(&self, p: &AmmVoteParams) -> Result<TransactionIntent> {
        require_distinct_assets(&p.asset, &p.asset2)?;
        self.finish(
            &p.account,
            TransactionKind::AmmVote {
                asset: p.asset.to_wire()?,
                asset2: p.asset2.to_wire()?,
                trading_fee: amm_fee_to_xrp_format(p.trading_fee)?,
            },
            p.fee_drops,
            0,
        )
    }

    pub fn amm_bid(&self, p: &AmmBidParams) -> Result<TransactionIntent> {
        require_distinct_assets(&p.asset, &p.asset2)?;
        if p.auth_accounts.len() > MAX_AMM_AUTH_ACCOUNTS {
            return Err(BridgeError::invalid_param(
                "auth_accounts",
                format!(
                    "{} accounts, at most {MAX_AMM_AUTH_ACCOUNTS} allowed",
                    p.auth_accounts.len()
                ),
            ));
        }
        for a in &p.auth_accounts {
            require_address("auth_accounts", a)?;
        }
        if let Some(min) = &p.bid_min {
            require_lp_token("bid_min", min)?;
        }
        if let Some(max) = &p.bid_max {
            require_lp_token("bid_max", max)?;
        }
        if let (Some(min), Some(max)) = (&p.bid_min, &p.bid_max) {
            if min.value() > max.value() {
                return Err(BridgeError::invalid_param(
                    "bid_max",
                    format!("{} is below bid_min {}", max.value(), min.value()),
                ));
            }
        }
        self.finish(
            &p.account,
            TransactionKind::AmmBid {
                asset: p.asset.to_wire()?,
                asset2: p.asset2.to_wire()?,
                bid_min: p.bid_min.as_ref().map(AmountSpec::to_wire).transpose()?,
                bid_max: p.bid_max.as_ref().map(AmountSpec::to_wire).transpose()?,
                auth_accounts: p.auth_accounts.iter().map(AuthAccountEntry::new).collect(),
            },
            p.fee_drops,
            0,
        )
    }
}
