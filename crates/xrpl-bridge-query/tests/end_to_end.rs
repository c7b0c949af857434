//! End-to-end tests across the three crates.
//!
//! Each test walks a realistic round trip: configuration -> builder ->
//! unsigned intent -> the ledger's JSON answer (a fixture derived from the
//! intent) -> normalizer -> the next builder call. The transport and
//! signer are not involved; their place is taken by `json!` fixtures.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use xrpl_bridge_query::{
    LedgerQuery, PaymentFilter, RankSide, parse_account_payments, parse_book_offers,
    parse_escrow_entry, parse_escrow_sequence, parse_submit_result, rank_book,
};
use xrpl_bridge_txbuild::{
    CreateEscrowParams, EscrowCondition, LiquidityOfferParams, SendXrpParams, SettleEscrowParams,
    TxBuilder,
};
use xrpl_bridge_types::flags::TF_PASSIVE;
use xrpl_bridge_types::{AmountSpec, Asset, BridgeConfig, BridgeError, Network};

const ISSUER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn builder() -> TxBuilder {
    let config = BridgeConfig::from_json(r#"{"network": "testnet", "source_tag": 42}"#)
        .expect("config should parse");
    TxBuilder::new(&config)
}

fn usd(value: i64) -> AmountSpec {
    AmountSpec::issued("USD", ISSUER, Decimal::from(value)).expect("valid USD amount")
}

fn xrp(value: i64) -> AmountSpec {
    AmountSpec::native(Decimal::from(value)).expect("valid XRP amount")
}

/// What `book_offers` would return for a resting `OfferCreate`.
fn as_book_entry(intent: &Value, sequence: u32, owner_funds: &str) -> Value {
    json!({
        "Account": intent["Account"],
        "Flags": intent["Flags"],
        "LedgerEntryType": "Offer",
        "Sequence": sequence,
        "TakerGets": intent["TakerGets"],
        "TakerPays": intent["TakerPays"],
        "index": format!("OFFER-{sequence}"),
        "owner_funds": owner_funds
    })
}

#[test]
fn liquidity_offers_rank_cheapest_first() {
    init_tracing();
    let builder = builder();

    // Three makers sell 10 USD each for different XRP prices.
    let makers = [("rMakerA", 100), ("rMakerB", 50), ("rMakerC", 80)];
    let entries: Vec<Value> = makers
        .iter()
        .zip(1_u32..)
        .map(|((maker, price), seq)| {
            let intent = builder
                .order_book_liquidity(&LiquidityOfferParams {
                    account: (*maker).to_string(),
                    buy: xrp(*price),
                    sell: usd(10),
                    expiration: None,
                    fee_drops: Some(12),
                })
                .expect("offer should build");
            assert!(intent.has_flag(TF_PASSIVE));
            assert_eq!(intent.source_tag(), Some(42));
            as_book_entry(&intent.to_json().unwrap(), seq, "25")
        })
        .collect();

    let request = LedgerQuery::BookOffers {
        taker_gets: Asset::Issued {
            currency: "USD".into(),
            issuer: ISSUER.into(),
        },
        taker_pays: Asset::Native,
        limit: Some(10),
        taker: None,
    }
    .to_request()
    .unwrap();
    assert_eq!(request["method"], "book_offers");

    let offers = parse_book_offers(&json!({"result": {"offers": entries}})).unwrap();
    assert_eq!(offers.len(), 3);
    assert!(offers.iter().all(|o| o.is_passive()));
    assert_eq!(offers[0].creator_liquidity, Some(Decimal::from(25)));

    let book = rank_book(&offers, &[RankSide::BestBuy, RankSide::BestSell], Some(2));
    let best_buy = book.best_buy.unwrap();
    let creators: Vec<&str> = best_buy.values().map(|o| o.creator.as_str()).collect();
    assert_eq!(creators, vec!["rMakerB", "rMakerC"]);
    // 50 XRP in drops per 10 USD.
    assert_eq!(best_buy[&1].quality, Decimal::from(5_000_000));

    let best_sell = book.best_sell.unwrap();
    assert_eq!(best_sell[&1].creator, "rMakerA");
    assert_eq!(best_sell.len(), 2);
}

#[test]
fn conditional_escrow_create_lookup_finish() {
    init_tracing();
    let builder = builder();
    let release = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let condition = EscrowCondition::from_preimage([7_u8; 32]);

    let create = builder
        .create_escrow(&CreateEscrowParams {
            account: "rAlice".into(),
            destination: "rBob".into(),
            amount: Decimal::from(25),
            finish_after: Some(release),
            cancel_after: Some(release + Duration::days(7)),
            condition: Some(condition.condition.clone()),
            destination_tag: None,
            fee_drops: Some(12),
        })
        .unwrap()
        .to_json()
        .unwrap();
    assert_eq!(create["Amount"], "25000000");

    // The validated transaction, as `tx` returns it.
    let mut tx = create.clone();
    tx["Sequence"] = json!(21);
    tx["hash"] = json!("CREATEHASH");
    let tx_response = json!({"result": {
        "tx_json": tx,
        "meta": {"TransactionResult": "tesSUCCESS"},
        "validated": true
    }});
    let sequence = parse_escrow_sequence(&tx_response).unwrap();
    assert_eq!(sequence.effective(), Some(21));

    // The escrow object, as `ledger_entry` returns it.
    let entry_response = json!({"result": {
        "index": "ESCROW-INDEX",
        "node": {
            "Account": create["Account"],
            "Destination": create["Destination"],
            "Amount": create["Amount"],
            "FinishAfter": create["FinishAfter"],
            "CancelAfter": create["CancelAfter"],
            "Condition": create["Condition"],
            "LedgerEntryType": "Escrow",
            "PreviousTxnID": "CREATEHASH"
        }
    }});
    let escrow = parse_escrow_entry(&entry_response).unwrap();
    assert_eq!(escrow.redeem_date, Some(release));
    assert!(escrow.is_conditional());

    let mut settle = SettleEscrowParams {
        account: "rBob".into(),
        escrow,
        sequence: sequence.effective(),
        now: release + Duration::hours(1),
        fulfillment: None,
        fee_drops: None,
    };
    assert!(matches!(
        builder.finish_escrow(&settle),
        Err(BridgeError::EscrowNotReady { .. })
    ));

    settle.fulfillment = Some(condition.fulfillment.clone());
    let finish = builder.finish_escrow(&settle).unwrap().to_json().unwrap();
    assert_eq!(finish["TransactionType"], "EscrowFinish");
    assert_eq!(finish["Owner"], "rAlice");
    assert_eq!(finish["OfferSequence"], 21);
    assert_eq!(finish["Condition"], json!(condition.condition));
    assert_eq!(finish["Fulfillment"], json!(condition.fulfillment));

    // Cancelling is refused until CancelAfter has passed.
    assert!(builder.cancel_escrow(&settle).is_err());
    settle.now = release + Duration::days(8);
    assert!(builder.cancel_escrow(&settle).is_ok());
}

#[test]
fn unknown_escrow_sequence_blocks_settlement() {
    let builder = builder();
    let escrow = xrpl_bridge_types::EscrowRecord::dummy(
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        None,
        None,
    );
    let settle = SettleEscrowParams {
        account: "rReceiver".into(),
        escrow,
        sequence: None,
        now: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        fulfillment: None,
        fee_drops: None,
    };
    assert!(matches!(
        builder.finish_escrow(&settle),
        Err(BridgeError::EscrowNotReady { .. })
    ));
}

#[test]
fn payment_submit_and_history() {
    init_tracing();
    let config = BridgeConfig::for_network(Network::Mainnet);
    let profile = config.profile().unwrap();
    let builder = TxBuilder::new(&config);

    let payment = builder
        .send_xrp(&SendXrpParams {
            account: "rAlice".into(),
            destination: "rBob".into(),
            amount: Decimal::new(15, 1),
            destination_tag: Some(9),
            memo: None,
            fee_drops: Some(12),
        })
        .unwrap()
        .to_json()
        .unwrap();
    assert_eq!(payment["Amount"], "1500000");
    assert_eq!(payment["Memos"].as_array().map(Vec::len), Some(1));

    let submitted = parse_submit_result(&json!({"result": {
        "engine_result": "tesSUCCESS",
        "engine_result_message": "The transaction was applied.",
        "tx_json": {"hash": "PAYHASH"}
    }}))
    .unwrap();
    assert!(submitted.is_success());
    let hash = submitted.transaction_hash.unwrap();
    assert_eq!(
        profile.transaction_link(&hash),
        "https://livenet.xrpl.org/transactions/PAYHASH"
    );

    let mut tx = payment.clone();
    tx["hash"] = json!(hash);
    tx["date"] = json!(770_000_000);
    let history = json!({"result": {
        "account": "rBob",
        "transactions": [{
            "tx": tx,
            "meta": {"TransactionResult": "tesSUCCESS", "delivered_amount": "1500000"},
            "validated": true
        }]
    }});
    let payments = parse_account_payments(&history, PaymentFilter::Native).unwrap();
    assert!(payments.sent.is_empty());
    assert_eq!(payments.received.len(), 1);
    let received = &payments.received[0];
    assert_eq!(received.sender, "rAlice");
    assert_eq!(received.delivered.value(), Decimal::new(15, 1));
    assert_eq!(received.fee, Decimal::new(12, 6));

    let issued_only = parse_account_payments(&history, PaymentFilter::Issued).unwrap();
    assert!(issued_only.is_empty());
}
