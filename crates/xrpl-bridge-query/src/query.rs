//! Read requests for the transport collaborator.
//!
//! A [`LedgerQuery`] names one JSON-RPC method and its parameters. The
//! transport sends [`LedgerQuery::to_request`] and hands the raw answer to
//! the matching normalizer in this crate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use xrpl_bridge_types::{Asset, BridgeError, Result};

/// Answers are read from the last validated ledger.
const VALIDATED: &str = "validated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum LedgerQuery {
    /// → `parse_account_info`, `parse_account_balance`
    AccountInfo { account: String },
    /// → `parse_account_lines`
    AccountLines { account: String },
    /// → `parse_account_nfts`
    AccountNfts { account: String },
    /// → `parse_account_offers`
    AccountOffers { account: String },
    /// → `parse_account_checks`, `parse_account_escrows`,
    /// `parse_account_nft_offers`. `object_type` uses the RPC filter names
    /// (`check`, `escrow`, `nft_offer`).
    AccountObjects {
        account: String,
        object_type: Option<String>,
    },
    /// → `parse_account_payments`
    AccountTx { account: String, limit: Option<u32> },
    /// → `parse_book_offers`
    BookOffers {
        taker_gets: Asset,
        taker_pays: Asset,
        limit: Option<u32>,
        taker: Option<String>,
    },
    /// → `parse_escrow_entry`, `parse_check_entry`, `parse_offer_entry`
    LedgerEntry { index: String },
    /// → `parse_nft_offers` (buy side)
    NftBuyOffers { nftoken_id: String },
    /// → `parse_nft_offers` (sell side)
    NftSellOffers { nftoken_id: String },
    /// → `parse_payment_tx`, `parse_escrow_sequence`
    Tx { hash: String },
    /// → `parse_gateway_obligations`, `parse_gateway_assets`
    GatewayBalances { account: String },
    /// → `parse_submit_result`
    Submit { tx_blob: String },
}

fn asset_param(asset: &Asset) -> Result<Value> {
    serde_json::to_value(asset.to_wire()?).map_err(|e| BridgeError::Serialization(e.to_string()))
}

impl LedgerQuery {
    /// JSON-RPC method name.
    pub fn method(&self) -> &'static str {
        match self {
            Self::AccountInfo { .. } => "account_info",
            Self::AccountLines { .. } => "account_lines",
            Self::AccountNfts { .. } => "account_nfts",
            Self::AccountOffers { .. } => "account_offers",
            Self::AccountObjects { .. } => "account_objects",
            Self::AccountTx { .. } => "account_tx",
            Self::BookOffers { .. } => "book_offers",
            Self::LedgerEntry { .. } => "ledger_entry",
            Self::NftBuyOffers { .. } => "nft_buy_offers",
            Self::NftSellOffers { .. } => "nft_sell_offers",
            Self::Tx { .. } => "tx",
            Self::GatewayBalances { .. } => "gateway_balances",
            Self::Submit { .. } => "submit",
        }
    }

    /// The single parameter object of the request.
    pub fn params(&self) -> Result<Value> {
        let mut params = Map::new();
        let mut put = |key: &str, value: Value| {
            params.insert(key.to_string(), value);
        };
        match self {
            Self::AccountInfo { account }
            | Self::AccountLines { account }
            | Self::AccountNfts { account }
            | Self::AccountOffers { account } => {
                put("account", json!(account));
                put("ledger_index", json!(VALIDATED));
            }
            Self::AccountObjects {
                account,
                object_type,
            } => {
                put("account", json!(account));
                put("ledger_index", json!(VALIDATED));
                if let Some(kind) = object_type {
                    put("type", json!(kind));
                }
            }
            Self::AccountTx { account, limit } => {
                put("account", json!(account));
                put("ledger_index_min", json!(-1));
                put("ledger_index_max", json!(-1));
                if let Some(limit) = limit {
                    put("limit", json!(limit));
                }
            }
            Self::BookOffers {
                taker_gets,
                taker_pays,
                limit,
                taker,
            } => {
                put("taker_gets", asset_param(taker_gets)?);
                put("taker_pays", asset_param(taker_pays)?);
                put("ledger_index", json!(VALIDATED));
                if let Some(limit) = limit {
                    put("limit", json!(limit));
                }
                if let Some(taker) = taker {
                    put("taker", json!(taker));
                }
            }
            Self::LedgerEntry { index } => {
                put("index", json!(index));
                put("ledger_index", json!(VALIDATED));
            }
            Self::NftBuyOffers { nftoken_id } | Self::NftSellOffers { nftoken_id } => {
                put("nft_id", json!(nftoken_id));
                put("ledger_index", json!(VALIDATED));
            }
            Self::Tx { hash } => put("transaction", json!(hash)),
            Self::GatewayBalances { account } => {
                put("account", json!(account));
                put("ledger_index", json!(VALIDATED));
            }
            Self::Submit { tx_blob } => put("tx_blob", json!(tx_blob)),
        }
        Ok(Value::Object(params))
    }

    /// Full JSON-RPC body: `{"method": ..., "params": [{...}]}`.
    pub fn to_request(&self) -> Result<Value> {
        let request = json!({
            "method": self.method(),
            "params": [self.params()?],
        });
        tracing::debug!(method = self.method(), "Ledger query prepared");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_info_request() {
        let q = LedgerQuery::AccountInfo {
            account: "rAlice".into(),
        };
        assert_eq!(
            q.to_request().unwrap(),
            json!({"method": "account_info",
                   "params": [{"account": "rAlice", "ledger_index": "validated"}]})
        );
    }

    #[test]
    fn book_offers_encodes_assets() {
        let q = LedgerQuery::BookOffers {
            taker_gets: Asset::Native,
            taker_pays: Asset::Issued {
                currency: "GOLD".into(),
                issuer: "rIssuer".into(),
            },
            limit: Some(10),
            taker: None,
        };
        let params = q.params().unwrap();
        assert_eq!(params["taker_gets"], json!({"currency": "XRP"}));
        assert_eq!(
            params["taker_pays"]["currency"],
            "474F4C4400000000000000000000000000000000"
        );
        assert_eq!(params["limit"], 10);
        assert!(params.get("taker").is_none());
    }

    #[test]
    fn book_offers_rejects_issuerless_asset() {
        let q = LedgerQuery::BookOffers {
            taker_gets: Asset::Native,
            taker_pays: Asset::Issued {
                currency: "USD".into(),
                issuer: String::new(),
            },
            limit: None,
            taker: None,
        };
        assert!(q.to_request().is_err());
    }

    #[test]
    fn optional_params_omitted() {
        let objects = LedgerQuery::AccountObjects {
            account: "rAlice".into(),
            object_type: Some("escrow".into()),
        };
        assert_eq!(objects.params().unwrap()["type"], "escrow");

        let tx = LedgerQuery::AccountTx {
            account: "rAlice".into(),
            limit: None,
        };
        let params = tx.params().unwrap();
        assert!(params.get("limit").is_none());
        assert_eq!(params["ledger_index_min"], -1);
    }

    #[test]
    fn method_names() {
        let sell = LedgerQuery::NftSellOffers {
            nftoken_id: "ABC".into(),
        };
        assert_eq!(sell.method(), "nft_sell_offers");
        assert_eq!(sell.params().unwrap()["nft_id"], "ABC");
        let submit = LedgerQuery::Submit {
            tx_blob: "1200".into(),
        };
        assert_eq!(submit.method(), "submit");
        assert!(submit.params().unwrap().get("ledger_index").is_none());
    }
}
