//! Error types for the XRP Ledger bridge.
//!
//! All errors use the `XB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Amount errors
//! - 2xx: Currency code errors
//! - 3xx: Fee encoding errors
//! - 4xx: Transaction building errors
//! - 5xx: Escrow errors
//! - 6xx: Ledger response errors
//! - 7xx: Flag / timestamp errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::FeeKind;

/// Central error enum for all bridge operations.
///
/// Nothing in the bridge performs I/O, so none of these are retried
/// internally: they are returned to the caller as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    // =================================================================
    // Amount Errors (1xx)
    // =================================================================
    /// An amount failed validation (bad value, missing issuer, ...).
    #[error("XB_ERR_100: Invalid amount: {reason}")]
    InvalidAmountSpec { reason: String },

    /// A pair of amounts or assets the operation cannot express.
    #[error("XB_ERR_101: Unsupported amount combination: {reason}")]
    UnsupportedAmountCombination { reason: String },

    // =================================================================
    // Currency Errors (2xx)
    // =================================================================
    /// A currency symbol or hex code could not be encoded/decoded.
    #[error("XB_ERR_200: Invalid currency code {code:?}: {reason}")]
    InvalidCurrencyCode { code: String, reason: String },

    // =================================================================
    // Fee Errors (3xx)
    // =================================================================
    /// A fee percentage or encoded fee value is outside its domain.
    #[error("XB_ERR_300: {kind} out of range: {value} (allowed {min}..={max})")]
    FeeOutOfRange {
        kind: FeeKind,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },

    // =================================================================
    // Transaction Errors (4xx)
    // =================================================================
    /// The requested offer flags cannot be combined.
    #[error("XB_ERR_400: Invalid offer flags: {reason}")]
    InvalidOfferFlags { reason: String },

    /// A builder parameter failed validation.
    #[error("XB_ERR_401: Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// An NFTokenID is malformed or does not permit the operation.
    #[error("XB_ERR_402: Invalid NFToken: {reason}")]
    InvalidNfToken { reason: String },

    // =================================================================
    // Escrow Errors (5xx)
    // =================================================================
    /// The escrow cannot be finished or cancelled (yet).
    #[error("XB_ERR_500: Escrow not ready: {reason}")]
    EscrowNotReady { reason: String },

    // =================================================================
    // Ledger Response Errors (6xx)
    // =================================================================
    /// A raw ledger response did not have the expected shape.
    #[error("XB_ERR_600: Malformed ledger response at `{field}`: {reason}")]
    MalformedLedgerResponse { field: String, reason: String },

    // =================================================================
    // Flag / Timestamp Errors (7xx)
    // =================================================================
    /// No flag with this name exists in the registry.
    #[error("XB_ERR_700: Unknown flag: {0}")]
    UnknownFlag(String),

    /// A calendar time has no representation in ledger time.
    #[error("XB_ERR_701: Timestamp out of range: {0}")]
    TimestampOutOfRange(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid config document, empty endpoint, ...).
    #[error("XB_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("XB_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

impl BridgeError {
    /// Shorthand for a [`BridgeError::MalformedLedgerResponse`].
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedLedgerResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`BridgeError::InvalidAmountSpec`].
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmountSpec {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`BridgeError::InvalidParameter`].
    pub fn invalid_param(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_names_field() {
        let err = BridgeError::malformed("TakerPays", "expected string or object");
        let msg = format!("{err}");
        assert!(msg.starts_with("XB_ERR_600"), "Got: {msg}");
        assert!(msg.contains("TakerPays"));
    }

    #[test]
    fn fee_out_of_range_display() {
        let err = BridgeError::FeeOutOfRange {
            kind: FeeKind::NftTransfer,
            value: Decimal::new(51, 0),
            min: Decimal::ZERO,
            max: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("XB_ERR_300"));
        assert!(msg.contains("51"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn all_errors_have_xb_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(BridgeError::invalid_amount("neg")),
            Box::new(BridgeError::InvalidCurrencyCode {
                code: "ZZ".into(),
                reason: "bad".into(),
            }),
            Box::new(BridgeError::InvalidOfferFlags { reason: "x".into() }),
            Box::new(BridgeError::EscrowNotReady { reason: "x".into() }),
            Box::new(BridgeError::UnsupportedAmountCombination { reason: "x".into() }),
            Box::new(BridgeError::UnknownFlag("lsfNope".into())),
            Box::new(BridgeError::Configuration("x".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("XB_ERR_"),
                "Error missing XB_ERR_ prefix: {msg}"
            );
        }
    }

    #[test]
    fn serde_json_error_converts() {
        let err: BridgeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, BridgeError::Serialization(_)));
    }
}
