//! Normalizers for owned ledger objects: escrows, checks and NFToken
//! offers, from `ledger_entry`, `account_objects` and
//! `nft_buy_offers` / `nft_sell_offers`.

use serde_json::{Map, Value};
use xrpl_bridge_types::{
    BridgeError, CheckRecord, Directional, EscrowRecord, NftOfferBook, NftOfferRecord,
    NftTokenOffers, Result,
};

use crate::raw;

fn escrow(node: &Map<String, Value>, escrow_id: &str) -> Result<EscrowRecord> {
    Ok(EscrowRecord {
        escrow_id: escrow_id.to_string(),
        sender: raw::string(node, "Account")?.to_string(),
        receiver: raw::string(node, "Destination")?.to_string(),
        amount: raw::amount(node, "Amount")?,
        prev_txn_id: raw::opt_string(node, "PreviousTxnID")?,
        redeem_date: raw::opt_time(node, "FinishAfter")?,
        expiry_date: raw::opt_time(node, "CancelAfter")?,
        condition: raw::opt_string(node, "Condition")?,
    })
}

fn check(node: &Map<String, Value>, check_id: &str) -> Result<CheckRecord> {
    Ok(CheckRecord {
        check_id: check_id.to_string(),
        sender: raw::string(node, "Account")?.to_string(),
        receiver: raw::string(node, "Destination")?.to_string(),
        amount: raw::amount(node, "SendMax")?,
        sequence: raw::opt_uint(node, "Sequence")?,
        expiry_date: raw::opt_time(node, "Expiration")?,
    })
}

fn nft_offer_object(node: &Map<String, Value>, offer_id: &str) -> Result<NftOfferRecord> {
    Ok(NftOfferRecord {
        offer_id: offer_id.to_string(),
        nftoken_id: raw::string(node, "NFTokenID")?.to_string(),
        owner: raw::string(node, "Owner")?.to_string(),
        flags: raw::flags(node, "Flags")?,
        amount: raw::amount(node, "Amount")?,
        receiver: raw::opt_string(node, "Destination")?,
        expiry_date: raw::opt_time(node, "Expiration")?,
    })
}

fn entry_node<'a>(
    response: &'a Value,
    expected: &str,
) -> Result<(&'a Map<String, Value>, &'a str)> {
    let result = raw::result(response)?;
    let node = raw::object(result, "node")?;
    let entry_type = raw::string(node, "LedgerEntryType")?;
    if entry_type != expected {
        return Err(BridgeError::malformed(
            "LedgerEntryType",
            format!("expected {expected}, got {entry_type}"),
        ));
    }
    Ok((node, raw::string(result, "index")?))
}

/// `ledger_entry` for an escrow → [`EscrowRecord`].
pub fn parse_escrow_entry(response: &Value) -> Result<EscrowRecord> {
    let (node, index) = entry_node(response, "Escrow")?;
    escrow(node, index)
}

/// `ledger_entry` for a check → [`CheckRecord`].
pub fn parse_check_entry(response: &Value) -> Result<CheckRecord> {
    let (node, index) = entry_node(response, "Check")?;
    check(node, index)
}

/// `account_objects` entries of one `LedgerEntryType`, with the owner.
fn owned_objects<'a>(
    response: &'a Value,
    entry_type: &'a str,
) -> Result<(&'a str, impl Iterator<Item = &'a Map<String, Value>>)> {
    let result = raw::result(response)?;
    let owner = raw::string(result, "account")?;
    let entries = raw::objects(result, "account_objects")?;
    let matching = entries.into_iter().filter(move |o| {
        let found = o.get("LedgerEntryType").and_then(Value::as_str);
        if found != Some(entry_type) {
            tracing::debug!(
                expected = entry_type,
                found = found.unwrap_or_default(),
                "Skipping account object of another type"
            );
            return false;
        }
        true
    });
    Ok((owner, matching))
}

/// `account_objects` (type `check`) → checks split into sent / received.
pub fn parse_account_checks(response: &Value) -> Result<Directional<CheckRecord>> {
    let (owner, entries) = owned_objects(response, "Check")?;
    let mut checks = Directional::default();
    for node in entries {
        let record = check(node, raw::string(node, "index")?)?;
        let sender = record.sender.clone();
        checks.push(owner, &sender, record);
    }
    Ok(checks)
}

/// `account_objects` (type `escrow`) → escrows split into sent / received.
pub fn parse_account_escrows(response: &Value) -> Result<Directional<EscrowRecord>> {
    let (owner, entries) = owned_objects(response, "Escrow")?;
    let mut escrows = Directional::default();
    for node in entries {
        let record = escrow(node, raw::string(node, "index")?)?;
        let sender = record.sender.clone();
        escrows.push(owner, &sender, record);
    }
    Ok(escrows)
}

/// `account_objects` (type `nft_offer`) → offers the account created,
/// split on the sell bit.
pub fn parse_account_nft_offers(response: &Value) -> Result<NftOfferBook> {
    let (_, entries) = owned_objects(response, "NFTokenOffer")?;
    let mut book = NftOfferBook::default();
    for node in entries {
        book.push(nft_offer_object(node, raw::string(node, "index")?)?);
    }
    Ok(book)
}

fn token_offers(response: &Value) -> Result<Vec<NftOfferRecord>> {
    let Some(result) = raw::result_or_not_found(response)? else {
        return Ok(Vec::new());
    };
    let nftoken_id = raw::string(result, "nft_id")?;
    raw::objects(result, "offers")?
        .into_iter()
        .map(|offer| {
            Ok(NftOfferRecord {
                offer_id: raw::string(offer, "nft_offer_index")?.to_string(),
                nftoken_id: nftoken_id.to_string(),
                owner: raw::string(offer, "owner")?.to_string(),
                flags: raw::flags(offer, "flags")?,
                amount: raw::amount(offer, "amount")?,
                receiver: raw::opt_string(offer, "destination")?,
                expiry_date: raw::opt_time(offer, "expiration")?,
            })
        })
        .collect()
}

/// `nft_buy_offers` and `nft_sell_offers` for one token → all its offers.
/// A token with no offers on one side comes back as `objectNotFound`,
/// which yields an empty list.
pub fn parse_nft_offers(buy_offers: &Value, sell_offers: &Value) -> Result<NftTokenOffers> {
    Ok(NftTokenOffers {
        buy: token_offers(buy_offers)?,
        sell: token_offers(sell_offers)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    const TOKEN: &str = "000B013A95F14B0044F78A264E41713C64B5F89242540EE208C3098E00000D65";

    fn escrow_node(sender: &str, receiver: &str) -> Value {
        json!({
            "Account": sender,
            "Destination": receiver,
            "Amount": "10000000",
            "FinishAfter": 725_846_400,
            "CancelAfter": 725_932_800,
            "LedgerEntryType": "Escrow",
            "PreviousTxnID": "C44F2EB84196B9AD820313DBEBA6316A15C9A2D35787579ED172B87A30131DA7",
            "index": format!("ESCROW-{sender}")
        })
    }

    #[test]
    fn escrow_entry() {
        let raw = json!({"result": {"index": "E1", "node": escrow_node("rAlice", "rBob")}});
        let escrow = parse_escrow_entry(&raw).unwrap();
        assert_eq!(escrow.escrow_id, "E1");
        assert_eq!(escrow.amount.value(), Decimal::TEN);
        assert_eq!(
            escrow.redeem_date,
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(!escrow.is_conditional());
    }

    #[test]
    fn check_entry_wrong_type() {
        let raw = json!({"result": {"index": "E1", "node": escrow_node("rAlice", "rBob")}});
        assert!(matches!(
            parse_check_entry(&raw),
            Err(BridgeError::MalformedLedgerResponse { field, .. }) if field == "LedgerEntryType"
        ));
    }

    #[test]
    fn escrows_split_by_direction() {
        let raw = json!({"result": {
            "account": "rAlice",
            "account_objects": [
                escrow_node("rAlice", "rBob"),
                escrow_node("rCarol", "rAlice"),
                {"LedgerEntryType": "RippleState", "index": "LINE"}
            ]
        }});
        let escrows = parse_account_escrows(&raw).unwrap();
        assert_eq!(escrows.sent.len(), 1);
        assert_eq!(escrows.received.len(), 1);
        assert_eq!(escrows.received[0].sender, "rCarol");
    }

    #[test]
    fn checks_split_by_direction() {
        let raw = json!({
            "account": "rBob",
            "account_objects": [
                {"LedgerEntryType": "Check", "Account": "rAlice", "Destination": "rBob",
                 "SendMax": {"currency": "USD", "issuer": "rIssuer", "value": "5"},
                 "Sequence": 12, "index": "CHECK1"},
                {"LedgerEntryType": "Check", "Account": "rBob", "Destination": "rAlice",
                 "SendMax": "1000000", "Sequence": 3, "Expiration": 725_846_400,
                 "index": "CHECK2"}
            ]
        });
        let checks = parse_account_checks(&raw).unwrap();
        assert_eq!(checks.received[0].check_id, "CHECK1");
        assert_eq!(checks.received[0].sequence, Some(12));
        assert_eq!(checks.sent[0].amount.value(), Decimal::ONE);
        assert!(checks.sent[0].expiry_date.is_some());
    }

    #[test]
    fn created_nft_offers_split_on_sell_bit() {
        let raw = json!({
            "account": "rAlice",
            "account_objects": [
                {"LedgerEntryType": "NFTokenOffer", "Owner": "rAlice", "NFTokenID": TOKEN,
                 "Flags": 1, "Amount": "0", "Destination": "rBob", "index": "SELL"},
                {"LedgerEntryType": "NFTokenOffer", "Owner": "rAlice", "NFTokenID": TOKEN,
                 "Flags": 0, "Amount": "2000000", "index": "BUY"}
            ]
        });
        let book = parse_account_nft_offers(&raw).unwrap();
        assert_eq!(book.created_sell[0].offer_id, "SELL");
        assert_eq!(book.created_sell[0].receiver.as_deref(), Some("rBob"));
        assert_eq!(book.created_buy[0].offer_id, "BUY");
    }

    #[test]
    fn token_offers_with_empty_side() {
        let sell = json!({"result": {
            "nft_id": TOKEN,
            "offers": [{"amount": "1000000", "flags": 1,
                        "nft_offer_index": "OFFER", "owner": "rAlice"}]
        }});
        let buy = json!({"result": {"error": "objectNotFound", "status": "error"}});
        let offers = parse_nft_offers(&buy, &sell).unwrap();
        assert!(offers.buy.is_empty());
        assert_eq!(offers.sell[0].nftoken_id, TOKEN);
        assert!(offers.sell[0].is_sell());
    }
}
