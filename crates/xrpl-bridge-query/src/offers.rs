//! Normalizers for order-book offers: `book_offers`, `account_offers` and
//! offer `ledger_entry` lookups.
//!
//! `TakerPays` maps to `buy` (what the creator receives) and `TakerGets`
//! to `sell` (what the creator gives up).

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use xrpl_bridge_types::constants::DROPS_PER_XRP;
use xrpl_bridge_types::{AccountOffer, AmountSpec, BridgeError, LedgerOffer, Result, drops_to_xrp};

use crate::raw;

/// The amount in ledger units: drops for XRP, value for issued currencies.
fn ledger_units(amount: &AmountSpec) -> Decimal {
    match amount {
        AmountSpec::Native { value } => *value * Decimal::from(DROPS_PER_XRP),
        AmountSpec::Issued { value, .. } => *value,
    }
}

/// `TakerPays / TakerGets` in ledger units, as the ledger reports it.
fn quality_of(buy: &AmountSpec, sell: &AmountSpec) -> Result<Decimal> {
    ledger_units(buy)
        .checked_div(ledger_units(sell))
        .ok_or_else(|| BridgeError::malformed("quality", "not reported and TakerPays / TakerGets is undefined"))
}

fn ledger_offer(entry: &Map<String, Value>, offer_id: &str) -> Result<LedgerOffer> {
    let buy = raw::amount(entry, "TakerPays")?;
    let sell = raw::amount(entry, "TakerGets")?;
    let quality = match raw::opt_decimal(entry, "quality")? {
        Some(q) => q,
        None => quality_of(&buy, &sell)?,
    };
    // owner_funds is in the units of TakerGets.
    let creator_liquidity = match raw::opt_string(entry, "owner_funds")? {
        None => None,
        Some(_) if sell.is_native() => Some(drops_to_xrp(raw::drops(entry, "owner_funds")?)),
        Some(_) => Some(raw::decimal(entry, "owner_funds")?),
    };
    Ok(LedgerOffer {
        creator: raw::string(entry, "Account")?.to_string(),
        offer_id: offer_id.to_string(),
        sequence: raw::uint(entry, "Sequence")?,
        quality,
        flags: raw::flags(entry, "Flags")?,
        buy,
        sell,
        creator_liquidity,
        expires_at: raw::opt_time(entry, "Expiration")?,
    })
}

/// `book_offers` → [`LedgerOffer`]s in ledger order.
pub fn parse_book_offers(response: &Value) -> Result<Vec<LedgerOffer>> {
    raw::objects(raw::result(response)?, "offers")?
        .into_iter()
        .map(|entry| ledger_offer(entry, raw::string(entry, "index")?))
        .collect()
}

/// `ledger_entry` for an offer object → [`LedgerOffer`].
pub fn parse_offer_entry(response: &Value) -> Result<LedgerOffer> {
    let result = raw::result(response)?;
    let node = raw::object(result, "node")?;
    let entry_type = raw::string(node, "LedgerEntryType")?;
    if entry_type != "Offer" {
        return Err(BridgeError::malformed(
            "LedgerEntryType",
            format!("expected Offer, got {entry_type}"),
        ));
    }
    ledger_offer(node, raw::string(result, "index")?)
}

/// `account_offers` → the account's own [`AccountOffer`]s.
pub fn parse_account_offers(response: &Value) -> Result<Vec<AccountOffer>> {
    raw::objects(raw::result(response)?, "offers")?
        .into_iter()
        .map(|entry| {
            let buy = raw::amount(entry, "taker_pays")?;
            let sell = raw::amount(entry, "taker_gets")?;
            let rate = sell.value().checked_div(buy.value());
            Ok(AccountOffer {
                sequence: raw::uint(entry, "seq")?,
                flags: raw::flags(entry, "flags")?,
                quality: raw::decimal(entry, "quality")?,
                buy,
                sell,
                rate,
                expires_at: raw::opt_time(entry, "expiration")?,
            })
        })
        .collect()
}

/// Keep only passive offers.
#[must_use]
pub fn passive_only(offers: Vec<AccountOffer>) -> Vec<AccountOffer> {
    offers.into_iter().filter(AccountOffer::is_passive).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use xrpl_bridge_types::flags::{LSF_PASSIVE, LSF_SELL};

    use super::*;

    fn book() -> Value {
        json!({"result": {"offers": [
            {
                "Account": "rMaker",
                "Flags": 0,
                "LedgerEntryType": "Offer",
                "Sequence": 7,
                "TakerGets": "2000000",
                "TakerPays": {"currency": "USD", "issuer": "rIssuer", "value": "1"},
                "index": "OFFER1",
                "owner_funds": "55000000",
                "quality": "0.0000005"
            },
            {
                "Account": "rOther",
                "Flags": 131072,
                "LedgerEntryType": "Offer",
                "Sequence": 8,
                "TakerGets": {"currency": "USD", "issuer": "rIssuer", "value": "10"},
                "TakerPays": "30000000",
                "index": "OFFER2",
                "owner_funds": "4.5",
                "Expiration": 725846400
            }
        ]}})
    }

    #[test]
    fn book_offer_sides_and_liquidity() {
        let offers = parse_book_offers(&book()).unwrap();
        assert_eq!(offers.len(), 2);

        let first = &offers[0];
        assert_eq!(first.offer_id, "OFFER1");
        assert_eq!(first.buy.currency(), "USD");
        assert_eq!(first.sell.value(), Decimal::TWO);
        assert_eq!(first.creator_liquidity, Some(Decimal::new(55, 0)));
        assert_eq!(first.quality, Decimal::new(5, 7));

        let second = &offers[1];
        assert_eq!(second.creator_liquidity, Some(Decimal::new(45, 1)));
        // No quality field: 30_000_000 drops / 10 USD.
        assert_eq!(second.quality, Decimal::new(3_000_000, 0));
        assert!(second.expires_at.is_some());
    }

    #[test]
    fn bad_amount_names_field() {
        let mut raw = book();
        raw["result"]["offers"][0]["TakerPays"] = json!(12);
        assert!(matches!(
            parse_book_offers(&raw),
            Err(BridgeError::MalformedLedgerResponse { field, .. }) if field == "TakerPays"
        ));
    }

    #[test]
    fn zero_taker_gets_without_quality_rejected() {
        let mut raw = book();
        raw["result"]["offers"][1]["TakerGets"] =
            json!({"currency": "USD", "issuer": "rIssuer", "value": "0"});
        assert!(matches!(
            parse_book_offers(&raw),
            Err(BridgeError::MalformedLedgerResponse { field, .. }) if field == "quality"
        ));
    }

    #[test]
    fn offer_entry() {
        let raw = json!({"result": {
            "index": "96F76F27D8A327FC48753167EC04A46AA0E382E6F57F32FD12274144D00F1797",
            "node": {
                "Account": "rMaker",
                "Flags": 0,
                "LedgerEntryType": "Offer",
                "Sequence": 11,
                "TakerGets": "5000000",
                "TakerPays": {"currency": "USD", "issuer": "rIssuer", "value": "10"}
            }
        }});
        let offer = parse_offer_entry(&raw).unwrap();
        assert_eq!(offer.sequence, 11);
        assert_eq!(offer.quality, Decimal::new(2, 6));
        assert!(offer.creator_liquidity.is_none());

        let wrong = json!({"index": "X", "node": {"LedgerEntryType": "Escrow"}});
        assert!(parse_offer_entry(&wrong).is_err());
    }

    #[test]
    fn offer_entry_sell_bit_decodes_as_sell() {
        let raw = json!({"result": {
            "index": "OFFER",
            "node": {
                "Account": "rMaker",
                "Flags": LSF_SELL,
                "LedgerEntryType": "Offer",
                "Sequence": 12,
                "TakerGets": "5000000",
                "TakerPays": {"currency": "USD", "issuer": "rIssuer", "value": "10"}
            }
        }});
        let offer = parse_offer_entry(&raw).unwrap();
        assert!(offer.is_sell());
        assert!(!offer.is_passive());
        let names: Vec<&str> = offer.decoded_flags().iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["lsfSell"]);
    }

    #[test]
    fn account_offers_rate_and_passive() {
        let raw = json!({"offers": [
            {"flags": LSF_PASSIVE, "quality": "0.5", "seq": 3,
             "taker_gets": {"currency": "USD", "issuer": "rIssuer", "value": "5"},
             "taker_pays": "10000000"},
            {"flags": 0, "quality": "2", "seq": 4,
             "taker_gets": "1000000",
             "taker_pays": {"currency": "USD", "issuer": "rIssuer", "value": "2"}}
        ]});
        let offers = parse_account_offers(&raw).unwrap();
        assert_eq!(offers[0].rate, Some(Decimal::new(5, 1)));
        assert_eq!(offers[1].rate, Some(Decimal::new(5, 1)));

        assert_eq!(offers[0].decoded_flags()[0].name, "lsfPassive");

        let passive = passive_only(offers);
        assert_eq!(passive.len(), 1);
        assert_eq!(passive[0].sequence, 3);
    }
}
