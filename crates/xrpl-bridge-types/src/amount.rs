//! Amount model and the native-amount codec.
//!
//! Every amount on the ledger is one of two shapes:
//! - **Native** XRP, sent on the wire as a string of drops (`"1000000"`).
//! - **Issued** currency, sent as `{ currency, issuer, value }`.
//!
//! [`AmountSpec`] is the validated domain value; [`WireAmount`] is the exact
//! protocol encoding. Conversions between XRP and drops are exact decimal
//! arithmetic, never binary floating point.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{BASE_RESERVE_XRP, DROPS_PER_XRP, MAX_XRP, NATIVE_CODE, OWNER_RESERVE_XRP};
use crate::currency::{display_symbol, normalize_currency_code};
use crate::{BridgeError, Result};

// ---------------------------------------------------------------------------
// Native codec
// ---------------------------------------------------------------------------

/// Convert whole XRP to drops.
///
/// Fails on negative values, on more than six decimal places (fractional
/// drops) and on values above the total XRP supply.
pub fn xrp_to_drops(xrp: Decimal) -> Result<u64> {
    if xrp.is_sign_negative() && !xrp.is_zero() {
        return Err(BridgeError::invalid_amount(format!("negative XRP amount {xrp}")));
    }
    if xrp > Decimal::from(MAX_XRP) {
        return Err(BridgeError::invalid_amount(format!(
            "{xrp} XRP exceeds the total supply"
        )));
    }
    let drops = xrp * Decimal::from(DROPS_PER_XRP);
    if !drops.fract().is_zero() {
        return Err(BridgeError::invalid_amount(format!(
            "{xrp} XRP has more than 6 decimal places"
        )));
    }
    drops
        .to_u64()
        .ok_or_else(|| BridgeError::invalid_amount(format!("{xrp} XRP not representable")))
}

/// Convert drops to whole XRP.
#[must_use]
pub fn drops_to_xrp(drops: u64) -> Decimal {
    (Decimal::from(drops) / Decimal::from(DROPS_PER_XRP)).normalize()
}

/// Parse a drops string as delivered by the ledger (`"1000000"`).
pub fn parse_drops(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|_| BridgeError::invalid_amount(format!("{raw:?} is not a drops amount")))
}

/// Parse an issued-currency value (`"12.5"`, `"1e-3"`).
///
/// The ledger's issued range (about `1e-81` to `9999999999999999e80`) is
/// wider than [`Decimal`]. Values too small for 28 decimal places round
/// toward zero; values too large saturate at [`Decimal::MAX`] or
/// [`Decimal::MIN`]. Only malformed text is an error.
pub fn parse_issued_value(raw: &str) -> Result<Decimal> {
    let malformed = || BridgeError::invalid_amount(format!("{raw:?} is not a decimal value"));
    let (mantissa, exponent) = match raw.find(['e', 'E']) {
        Some(i) => (
            &raw[..i],
            raw[i + 1..].parse::<i32>().map_err(|_| malformed())?,
        ),
        None => (raw, 0),
    };
    let mut value = Decimal::from_str(mantissa).map_err(|_| malformed())?;
    // Each step is exact until the scale limit; the loop ends once the
    // value underflows to zero or overflows.
    for _ in 0..exponent.unsigned_abs() {
        if value.is_zero() {
            break;
        }
        value = if exponent > 0 {
            match value.checked_mul(Decimal::TEN) {
                Some(v) => v,
                None if value.is_sign_negative() => return Ok(Decimal::MIN),
                None => return Ok(Decimal::MAX),
            }
        } else {
            value / Decimal::TEN
        };
    }
    Ok(value.normalize())
}

/// XRP an account can actually spend once reserves are set aside.
///
/// `spendable = balance - base_reserve - owner_count * owner_reserve`
#[must_use]
pub fn spendable_balance(balance_drops: u64, owner_count: u32) -> Decimal {
    drops_to_xrp(balance_drops)
        - Decimal::from(BASE_RESERVE_XRP)
        - Decimal::from(owner_count) * Decimal::from(OWNER_RESERVE_XRP)
}

// ---------------------------------------------------------------------------
// Wire encodings
// ---------------------------------------------------------------------------

/// An issued-currency amount exactly as the ledger encodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAmount {
    pub currency: String,
    pub issuer: String,
    pub value: String,
}

/// A ledger amount: drops string or issued object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireAmount {
    Drops(String),
    Issued(IssuedAmount),
}

/// A ledger asset identifier (currency without value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAsset {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

// ---------------------------------------------------------------------------
// AmountSpec
// ---------------------------------------------------------------------------

/// A validated amount of either the native asset or an issued currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmountSpec {
    /// Native XRP, `value` in whole XRP (up to six decimals).
    Native { value: Decimal },
    /// Issued currency. `currency` is a symbol or a 40-hex code.
    Issued {
        currency: String,
        issuer: String,
        value: Decimal,
    },
}

impl AmountSpec {
    /// Native amount in whole XRP.
    pub fn native(value: Decimal) -> Result<Self> {
        let spec = Self::Native { value };
        spec.validate()?;
        Ok(spec)
    }

    /// Issued-currency amount.
    pub fn issued(
        currency: impl Into<String>,
        issuer: impl Into<String>,
        value: Decimal,
    ) -> Result<Self> {
        let spec = Self::Issued {
            currency: currency.into(),
            issuer: issuer.into(),
            value,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the tag invariants: native values fit in drops; issued amounts
    /// carry a well-formed code and a non-empty issuer; nothing is negative.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Native { value } => xrp_to_drops(*value).map(|_| ()),
            Self::Issued {
                currency,
                issuer,
                value,
            } => {
                validate_issued_code(currency)?;
                if issuer.trim().is_empty() {
                    return Err(BridgeError::invalid_amount(format!(
                        "issued amount of {currency} has no issuer"
                    )));
                }
                if value.is_sign_negative() && !value.is_zero() {
                    return Err(BridgeError::invalid_amount(format!(
                        "negative {currency} amount {value}"
                    )));
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }

    /// The amount in human units (XRP for native).
    #[must_use]
    pub fn value(&self) -> Decimal {
        match self {
            Self::Native { value } | Self::Issued { value, .. } => *value,
        }
    }

    /// Symbolic currency code (`"XRP"` for native).
    #[must_use]
    pub fn currency(&self) -> &str {
        match self {
            Self::Native { .. } => NATIVE_CODE,
            Self::Issued { currency, .. } => currency,
        }
    }

    /// Issuer address, absent for native amounts.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        match self {
            Self::Native { .. } => None,
            Self::Issued { issuer, .. } => Some(issuer),
        }
    }

    /// The asset this amount is denominated in.
    #[must_use]
    pub fn asset(&self) -> Asset {
        match self {
            Self::Native { .. } => Asset::Native,
            Self::Issued {
                currency, issuer, ..
            } => Asset::Issued {
                currency: currency.clone(),
                issuer: issuer.clone(),
            },
        }
    }

    /// Encode for the wire: drops string or issued object with the
    /// currency code normalized.
    pub fn to_wire(&self) -> Result<WireAmount> {
        self.validate()?;
        match self {
            Self::Native { value } => Ok(WireAmount::Drops(xrp_to_drops(*value)?.to_string())),
            Self::Issued {
                currency,
                issuer,
                value,
            } => Ok(WireAmount::Issued(IssuedAmount {
                currency: normalize_currency_code(currency)?,
                issuer: issuer.clone(),
                value: value.normalize().to_string(),
            })),
        }
    }

    /// Decode a polymorphic raw ledger amount.
    ///
    /// `field` names the raw field and is carried by
    /// [`BridgeError::MalformedLedgerResponse`] on failure.
    pub fn from_wire(raw: &Value, field: &str) -> Result<Self> {
        match raw {
            Value::String(drops) => {
                let drops = parse_drops(drops)
                    .map_err(|e| BridgeError::malformed(field, e.to_string()))?;
                Ok(Self::Native {
                    value: drops_to_xrp(drops),
                })
            }
            Value::Object(obj) => {
                let get = |key: &str| {
                    obj.get(key).and_then(Value::as_str).ok_or_else(|| {
                        BridgeError::malformed(format!("{field}.{key}"), "missing or not a string")
                    })
                };
                let code = get("currency")?;
                let currency = display_symbol(code)
                    .map_err(|e| BridgeError::malformed(format!("{field}.currency"), e.to_string()))?;
                let value = parse_issued_value(get("value")?)
                    .map_err(|e| BridgeError::malformed(format!("{field}.value"), e.to_string()))?;
                // Issued amounts always carry an issuer; XRP objects do not.
                if code == NATIVE_CODE {
                    return Err(BridgeError::malformed(field, "XRP encoded as an object"));
                }
                Ok(Self::Issued {
                    currency,
                    issuer: get("issuer")?.to_string(),
                    value,
                })
            }
            _ => Err(BridgeError::malformed(field, "expected drops string or amount object")),
        }
    }
}

fn validate_issued_code(code: &str) -> Result<()> {
    normalize_currency_code(code).map(|_| ())
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// An asset without an amount: the native asset or an issued currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Asset {
    Native,
    Issued { currency: String, issuer: String },
}

impl Asset {
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Encode for the wire (`{"currency": "XRP"}` for native).
    pub fn to_wire(&self) -> Result<WireAsset> {
        match self {
            Self::Native => Ok(WireAsset {
                currency: NATIVE_CODE.to_string(),
                issuer: None,
            }),
            Self::Issued { currency, issuer } => {
                validate_issued_code(currency)?;
                if issuer.trim().is_empty() {
                    return Err(BridgeError::invalid_amount(format!(
                        "asset {currency} has no issuer"
                    )));
                }
                Ok(WireAsset {
                    currency: normalize_currency_code(currency)?,
                    issuer: Some(issuer.clone()),
                })
            }
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "{NATIVE_CODE}"),
            Self::Issued { currency, issuer } => write!(f, "{currency}.{issuer}"),
        }
    }
}
