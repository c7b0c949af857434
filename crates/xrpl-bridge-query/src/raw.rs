//! Typed access to raw JSON ledger responses.
//!
//! Every accessor takes the name of the field it reads so a shape mismatch
//! surfaces as [`BridgeError::MalformedLedgerResponse`] naming that field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use xrpl_bridge_types::{
    AmountSpec, BridgeError, Result, from_protocol_time, hex_to_text, parse_drops,
    parse_issued_value,
};

/// The `result` object of a JSON-RPC answer, or `raw` itself when it is
/// already unwrapped.
pub fn result(raw: &Value) -> Result<&Map<String, Value>> {
    let inner = raw.get("result").unwrap_or(raw);
    let obj = inner
        .as_object()
        .ok_or_else(|| BridgeError::malformed("result", "expected an object"))?;
    if let Some(err) = obj.get("error").and_then(Value::as_str) {
        let message = obj
            .get("error_message")
            .and_then(Value::as_str)
            .unwrap_or(err);
        return Err(BridgeError::malformed("error", format!("{err}: {message}")));
    }
    Ok(obj)
}

/// Like [`result`], but a ledger `objectNotFound` error yields `None`.
pub fn result_or_not_found(raw: &Value) -> Result<Option<&Map<String, Value>>> {
    let inner = raw.get("result").unwrap_or(raw);
    if inner.is_null() || inner.get("error").and_then(Value::as_str) == Some("objectNotFound") {
        return Ok(None);
    }
    result(raw).map(Some)
}

pub fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    obj.get(key)
        .ok_or_else(|| BridgeError::malformed(key, "missing"))
}

pub fn object<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Map<String, Value>> {
    field(obj, key)?
        .as_object()
        .ok_or_else(|| BridgeError::malformed(key, "expected an object"))
}

pub fn array<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a [Value]> {
    field(obj, key)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| BridgeError::malformed(key, "expected an array"))
}

/// Array entries that must themselves be objects.
pub fn objects<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<Vec<&'a Map<String, Value>>> {
    array(obj, key)?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_object()
                .ok_or_else(|| BridgeError::malformed(format!("{key}[{i}]"), "expected an object"))
        })
        .collect()
}

pub fn string<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    field(obj, key)?
        .as_str()
        .ok_or_else(|| BridgeError::malformed(key, "expected a string"))
}

pub fn opt_string(obj: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(BridgeError::malformed(key, "expected a string")),
    }
}

fn to_u32(key: &str, v: &Value) -> Result<u32> {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| BridgeError::malformed(key, "expected a 32-bit unsigned integer"))
}

pub fn uint(obj: &Map<String, Value>, key: &str) -> Result<u32> {
    to_u32(key, field(obj, key)?)
}

pub fn opt_uint(obj: &Map<String, Value>, key: &str) -> Result<Option<u32>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => to_u32(key, v).map(Some),
    }
}

/// `Flags` defaults to 0 when absent.
pub fn flags(obj: &Map<String, Value>, key: &str) -> Result<u32> {
    Ok(opt_uint(obj, key)?.unwrap_or(0))
}

pub fn opt_bool(obj: &Map<String, Value>, key: &str) -> Result<bool> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(BridgeError::malformed(key, "expected a boolean")),
    }
}

/// A decimal sent as a string (`"12.5"`) or, occasionally, a number.
pub fn decimal(obj: &Map<String, Value>, key: &str) -> Result<Decimal> {
    let parsed = match field(obj, key)? {
        Value::String(s) => parse_issued_value(s),
        Value::Number(n) => parse_issued_value(&n.to_string()),
        _ => return Err(BridgeError::malformed(key, "expected a decimal string")),
    };
    parsed.map_err(|e| BridgeError::malformed(key, e.to_string()))
}

pub fn opt_decimal(obj: &Map<String, Value>, key: &str) -> Result<Option<Decimal>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => decimal(obj, key).map(Some),
    }
}

/// A drops string (`"1000000"`).
pub fn drops(obj: &Map<String, Value>, key: &str) -> Result<u64> {
    parse_drops(string(obj, key)?).map_err(|e| BridgeError::malformed(key, e.to_string()))
}

pub fn amount(obj: &Map<String, Value>, key: &str) -> Result<AmountSpec> {
    AmountSpec::from_wire(field(obj, key)?, key)
}

pub fn opt_amount(obj: &Map<String, Value>, key: &str) -> Result<Option<AmountSpec>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => AmountSpec::from_wire(v, key).map(Some),
    }
}

/// A ledger-epoch timestamp field.
pub fn opt_time(obj: &Map<String, Value>, key: &str) -> Result<Option<DateTime<Utc>>> {
    Ok(opt_uint(obj, key)?.map(from_protocol_time))
}

/// A hex-encoded text field (`Domain`, `URI`). Undecodable content is kept
/// as `None` and logged rather than failing the whole record.
pub fn opt_hex_text(obj: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    let Some(encoded) = opt_string(obj, key)? else {
        return Ok(None);
    };
    match hex_to_text(&encoded) {
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            tracing::warn!(field = key, error = %e, "Undecodable hex text field");
            Ok(None)
        }
    }
}
