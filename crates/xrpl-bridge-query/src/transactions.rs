//! Normalizers for transactions: `tx`, `account_tx` and `submit`.
//!
//! Both transaction layouts are accepted: fields inline with `meta`
//! alongside, or wrapped in `tx_json` with `hash` and `meta` as siblings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use xrpl_bridge_types::{
    AmountSpec, BridgeError, Directional, EscrowSequence, PaymentRecord, Result, SubmitOutcome,
    drops_to_xrp, from_protocol_time,
};

use crate::raw;

/// Which payments [`parse_account_payments`] keeps, by delivered asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFilter {
    #[default]
    All,
    Native,
    Issued,
}

impl PaymentFilter {
    #[must_use]
    pub fn accepts(self, amount: &AmountSpec) -> bool {
        match self {
            Self::All => true,
            Self::Native => amount.is_native(),
            Self::Issued => !amount.is_native(),
        }
    }
}

/// A transaction with the envelope fields that may live beside it.
struct TxView<'a> {
    tx: &'a Map<String, Value>,
    outer: &'a Map<String, Value>,
}

impl<'a> TxView<'a> {
    fn new(outer: &'a Map<String, Value>) -> Result<Self> {
        let tx = match outer.get("tx_json").or_else(|| outer.get("tx")) {
            Some(inner) => inner
                .as_object()
                .ok_or_else(|| BridgeError::malformed("tx_json", "expected an object"))?,
            None => outer,
        };
        Ok(Self { tx, outer })
    }

    fn tx_type(&self) -> Result<&'a str> {
        raw::string(self.tx, "TransactionType")
    }

    fn hash(&self) -> Result<&'a str> {
        raw::string(self.tx, "hash").or_else(|_| raw::string(self.outer, "hash"))
    }

    fn meta(&self) -> Result<&'a Map<String, Value>> {
        raw::object(self.outer, "meta").or_else(|_| raw::object(self.tx, "meta"))
    }

    fn opt_uint(&self, key: &str) -> Result<Option<u32>> {
        match raw::opt_uint(self.tx, key)? {
            Some(v) => Ok(Some(v)),
            None => raw::opt_uint(self.outer, key),
        }
    }

    fn validated(&self) -> Result<bool> {
        Ok(raw::opt_bool(self.outer, "validated")? || raw::opt_bool(self.tx, "validated")?)
    }
}

/// `delivered_amount` is the string `"unavailable"` for payments from before
/// it was recorded; fall back to the requested amount.
fn delivered(view: &TxView<'_>, meta: &Map<String, Value>) -> Result<AmountSpec> {
    for key in ["delivered_amount", "DeliveredAmount"] {
        match meta.get(key) {
            Some(Value::String(s)) if s == "unavailable" => {}
            Some(v) => return AmountSpec::from_wire(v, key),
            None => {}
        }
    }
    match raw::opt_amount(view.tx, "Amount")? {
        Some(amount) => Ok(amount),
        None => raw::amount(view.tx, "DeliverMax"),
    }
}

fn payment_record(view: &TxView<'_>) -> Result<PaymentRecord> {
    let tx_type = view.tx_type()?;
    if tx_type != "Payment" {
        return Err(BridgeError::malformed(
            "TransactionType",
            format!("expected Payment, got {tx_type}"),
        ));
    }
    let meta = view.meta()?;
    Ok(PaymentRecord {
        tx_hash: view.hash()?.to_string(),
        tx_type: tx_type.to_string(),
        sender: raw::string(view.tx, "Account")?.to_string(),
        receiver: raw::string(view.tx, "Destination")?.to_string(),
        delivered: delivered(view, meta)?,
        fee: drops_to_xrp(raw::drops(view.tx, "Fee")?),
        timestamp: view.opt_uint("date")?.map(from_protocol_time),
        result: raw::string(meta, "TransactionResult")?.to_string(),
        flags: raw::flags(view.tx, "Flags")?,
        sequence: raw::opt_uint(view.tx, "Sequence")?,
        ledger_index: view.opt_uint("ledger_index")?,
        validated: view.validated()?,
    })
}

/// `tx` for an `EscrowCreate` → the sequence needed to finish or cancel
/// the escrow.
pub fn parse_escrow_sequence(response: &Value) -> Result<EscrowSequence> {
    let view = TxView::new(raw::result(response)?)?;
    let tx_type = view.tx_type()?;
    if tx_type != "EscrowCreate" {
        return Err(BridgeError::malformed(
            "TransactionType",
            format!("expected EscrowCreate, got {tx_type}"),
        ));
    }
    Ok(EscrowSequence {
        sequence: raw::opt_uint(view.tx, "Sequence")?,
        ticket_sequence: raw::opt_uint(view.tx, "TicketSequence")?,
    })
}

/// `tx` for a payment → [`PaymentRecord`].
pub fn parse_payment_tx(response: &Value) -> Result<PaymentRecord> {
    payment_record(&TxView::new(raw::result(response)?)?)
}

/// `account_tx` → the account's payments split into sent / received.
/// Other transaction types are skipped.
pub fn parse_account_payments(
    response: &Value,
    filter: PaymentFilter,
) -> Result<Directional<PaymentRecord>> {
    let result = raw::result(response)?;
    let account = raw::string(result, "account")?;
    let mut payments = Directional::default();
    for entry in raw::objects(result, "transactions")? {
        let view = TxView::new(entry)?;
        let tx_type = view.tx_type()?;
        if tx_type != "Payment" {
            tracing::debug!(tx_type, "Skipping non-payment transaction");
            continue;
        }
        let record = payment_record(&view)?;
        if !filter.accepts(&record.delivered) {
            continue;
        }
        let sender = record.sender.clone();
        payments.push(account, &sender, record);
    }
    Ok(payments)
}

/// `submit` → [`SubmitOutcome`]. The engine result is passed through
/// unchanged; only a missing result code is an error.
pub fn parse_submit_result(response: &Value) -> Result<SubmitOutcome> {
    let result = raw::result(response)?;
    let transaction_hash = match result.get("tx_json") {
        Some(Value::Object(tx)) => raw::opt_string(tx, "hash")?,
        _ => None,
    };
    let outcome = SubmitOutcome {
        result_code: raw::string(result, "engine_result")?.to_string(),
        transaction_hash,
        message: raw::opt_string(result, "engine_result_message")?,
    };
    if !outcome.is_success() {
        tracing::warn!(
            result_code = %outcome.result_code,
            retryable = outcome.is_retryable(),
            "Submission not applied"
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn payment(sender: &str, receiver: &str, amount: Value, delivered: Value) -> Value {
        json!({
            "tx": {
                "Account": sender,
                "Destination": receiver,
                "Amount": amount,
                "Fee": "12",
                "Flags": 0,
                "Sequence": 5,
                "TransactionType": "Payment",
                "date": 725_846_400,
                "hash": format!("HASH-{sender}")
            },
            "meta": {"TransactionResult": "tesSUCCESS", "delivered_amount": delivered},
            "validated": true
        })
    }

    #[test]
    fn payment_tx_v1_layout() {
        let raw = json!({"result": {
            "Account": "rAlice",
            "Destination": "rBob",
            "Amount": {"currency": "USD", "issuer": "rIssuer", "value": "10"},
            "Fee": "10",
            "Flags": 131_072,
            "TransactionType": "Payment",
            "hash": "ABC",
            "ledger_index": 100,
            "date": 725_846_400,
            "meta": {
                "TransactionResult": "tesSUCCESS",
                "delivered_amount": {"currency": "USD", "issuer": "rIssuer", "value": "7.5"}
            },
            "validated": true
        }});
        let record = parse_payment_tx(&raw).unwrap();
        assert_eq!(record.tx_hash, "ABC");
        assert_eq!(record.delivered.value(), Decimal::new(75, 1));
        assert_eq!(record.fee, Decimal::new(1, 5));
        assert_eq!(record.ledger_index, Some(100));
        assert!(record.is_success());
        assert!(record.validated);
        assert_eq!(record.decoded_flags()[0].name, "tfPartialPayment");
    }

    #[test]
    fn payment_tx_v2_layout_unavailable_delivery() {
        let raw = json!({"result": {
            "tx_json": {
                "Account": "rAlice",
                "Destination": "rBob",
                "DeliverMax": "3000000",
                "Fee": "12",
                "TransactionType": "Payment"
            },
            "hash": "DEF",
            "meta": {"TransactionResult": "tesSUCCESS", "delivered_amount": "unavailable"},
            "validated": false
        }});
        let record = parse_payment_tx(&raw).unwrap();
        assert_eq!(record.tx_hash, "DEF");
        assert_eq!(record.delivered.value(), Decimal::new(3, 0));
        assert!(!record.validated);
    }

    #[test]
    fn escrow_sequence_from_ticket() {
        let raw = json!({
            "Account": "rAlice",
            "TransactionType": "EscrowCreate",
            "Sequence": 0,
            "TicketSequence": 77
        });
        assert_eq!(parse_escrow_sequence(&raw).unwrap().effective(), Some(77));

        let wrong = json!({"TransactionType": "Payment"});
        assert!(parse_escrow_sequence(&wrong).is_err());
    }

    #[test]
    fn account_payments_filtered_and_split() {
        let raw = json!({"result": {
            "account": "rAlice",
            "transactions": [
                payment("rAlice", "rBob", json!("1000000"), json!("1000000")),
                payment("rCarol", "rAlice",
                        json!({"currency": "USD", "issuer": "rIssuer", "value": "2"}),
                        json!({"currency": "USD", "issuer": "rIssuer", "value": "2"})),
                {"tx": {"TransactionType": "OfferCreate", "Account": "rAlice"},
                 "meta": {"TransactionResult": "tesSUCCESS"}}
            ]
        }});
        let all = parse_account_payments(&raw, PaymentFilter::All).unwrap();
        assert_eq!(all.sent.len(), 1);
        assert_eq!(all.received.len(), 1);

        let native = parse_account_payments(&raw, PaymentFilter::Native).unwrap();
        assert_eq!(native.len(), 1);
        assert!(native.sent[0].delivered.is_native());

        let issued = parse_account_payments(&raw, PaymentFilter::Issued).unwrap();
        assert_eq!(issued.received[0].sender, "rCarol");
    }

    #[test]
    fn submit_results_pass_through() {
        let ok = json!({"result": {
            "engine_result": "tesSUCCESS",
            "engine_result_message": "The transaction was applied.",
            "tx_json": {"hash": "H1"}
        }});
        let outcome = parse_submit_result(&ok).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.transaction_hash.as_deref(), Some("H1"));

        let killed = json!({"engine_result": "tecKILLED"});
        let outcome = parse_submit_result(&killed).unwrap();
        assert_eq!(outcome.result_code, "tecKILLED");
        assert!(!outcome.is_retryable());

        assert!(parse_submit_result(&json!({"tx_json": {}})).is_err());
    }
}
