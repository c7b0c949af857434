//! Currency code codec.
//!
//! The ledger knows two currency code shapes:
//! - **Standard** codes of up to three characters (`"USD"`), sent as-is.
//! - **Non-standard** codes: 20 raw bytes rendered as 40 uppercase hex
//!   characters. Longer symbols are UTF-8 encoded and right-padded with
//!   zero bytes to fill the 20 bytes.
//!
//! Decoding never falls back to the raw input: malformed hex or non-UTF-8
//! bytes are reported as [`BridgeError::InvalidCurrencyCode`].

use crate::constants::{CURRENCY_HEX_LEN, LP_TOKEN_PREFIX, NATIVE_CODE, STANDARD_CODE_MAX_LEN};
use crate::{BridgeError, Result};

fn invalid(code: &str, reason: impl Into<String>) -> BridgeError {
    BridgeError::InvalidCurrencyCode {
        code: code.to_string(),
        reason: reason.into(),
    }
}

/// Encode a symbol as a ledger currency code.
///
/// Symbols of three characters or fewer are returned unchanged. Longer
/// symbols become 40 uppercase hex characters, right-padded with `'0'`.
pub fn symbol_to_hex(symbol: &str) -> Result<String> {
    if symbol.is_empty() {
        return Err(invalid(symbol, "empty symbol"));
    }
    if symbol.len() <= STANDARD_CODE_MAX_LEN {
        return Ok(symbol.to_string());
    }
    let encoded = hex::encode_upper(symbol.as_bytes());
    if encoded.len() > CURRENCY_HEX_LEN {
        return Err(invalid(
            symbol,
            format!("symbol is {} bytes, at most 20 fit", symbol.len()),
        ));
    }
    Ok(format!("{encoded:0<width$}", width = CURRENCY_HEX_LEN))
}

/// Decode a ledger currency code back to its symbol.
///
/// Codes of three characters or fewer are returned unchanged. Longer codes
/// are hex-decoded, UTF-8 decoded and stripped of trailing NUL bytes.
pub fn hex_to_symbol(code: &str) -> Result<String> {
    if code.len() <= STANDARD_CODE_MAX_LEN {
        return Ok(code.to_string());
    }
    let bytes = hex::decode(code).map_err(|e| invalid(code, format!("bad hex: {e}")))?;
    let text = String::from_utf8(bytes).map_err(|_| invalid(code, "not valid UTF-8"))?;
    Ok(text.trim_end_matches('\0').to_string())
}

/// Returns `true` if `code` is exactly 40 hex digits.
#[must_use]
pub fn is_hex_currency_code(code: &str) -> bool {
    code.len() == CURRENCY_HEX_LEN && code.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Returns `true` if `code` is an AMM LP-token code (40 hex, leading `0x03`).
///
/// LP-token codes are hashes, not text, and have no symbol.
#[must_use]
pub fn is_lp_token_code(code: &str) -> bool {
    is_hex_currency_code(code)
        && u8::from_str_radix(&code[..2], 16).is_ok_and(|b| b == LP_TOKEN_PREFIX)
}

/// Normalize a caller-supplied issued-currency code for the wire.
///
/// Accepts a standard code, an already-encoded 40-hex code (uppercased), or
/// a longer symbol (encoded with [`symbol_to_hex`]). `"XRP"` is reserved for
/// the native asset and rejected.
pub fn normalize_currency_code(code: &str) -> Result<String> {
    if code.eq_ignore_ascii_case(NATIVE_CODE) {
        return Err(invalid(code, "XRP is not an issued currency"));
    }
    if is_hex_currency_code(code) {
        return Ok(code.to_ascii_uppercase());
    }
    symbol_to_hex(code)
}

/// Human-facing symbol for a wire currency code.
///
/// LP-token codes are kept as their raw hex; everything else is decoded
/// with [`hex_to_symbol`].
pub fn display_symbol(code: &str) -> Result<String> {
    if is_lp_token_code(code) {
        return Ok(code.to_ascii_uppercase());
    }
    hex_to_symbol(code)
}

/// Hex-encode free text (domain, URI, memo) without padding.
#[must_use]
pub fn text_to_hex(text: &str) -> String {
    hex::encode_upper(text.as_bytes())
}

/// Decode hex-encoded free text.
pub fn hex_to_text(encoded: &str) -> Result<String> {
    let bytes = hex::decode(encoded).map_err(|e| invalid(encoded, format!("bad hex: {e}")))?;
    String::from_utf8(bytes).map_err(|_| invalid(encoded, "not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn standard_code_unchanged() {
        assert_eq!(symbol_to_hex("USD").unwrap(), "USD");
        assert_eq!(hex_to_symbol("USD").unwrap(), "USD");
    }

    #[test]
    fn long_symbol_padded_to_40() {
        let code = symbol_to_hex("BTCX").unwrap();
        assert_eq!(code.len(), 40);
        assert_eq!(code, "4254435800000000000000000000000000000000");
        assert_eq!(code, code.to_uppercase());
        assert_eq!(hex_to_symbol(&code).unwrap(), "BTCX");
    }

    #[test]
    fn symbol_over_20_bytes_rejected() {
        let err = symbol_to_hex("ABCDEFGHIJKLMNOPQRSTU").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCurrencyCode { .. }));
        assert!(symbol_to_hex("ABCDEFGHIJKLMNOPQRST").is_ok());
    }

    #[test]
    fn empty_symbol_rejected() {
        assert!(symbol_to_hex("").is_err());
    }

    #[test]
    fn malformed_hex_is_an_error_not_a_fallback() {
        let err = hex_to_symbol("ZZZZ").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCurrencyCode { .. }));
    }

    #[test]
    fn non_utf8_is_an_error() {
        assert!(hex_to_symbol("FFFE000000000000000000000000000000000000").is_err());
    }

    #[test]
    fn lp_token_detection() {
        let lp = "030ADB868027B0185A6577C34F857236E359E88D";
        assert!(is_lp_token_code(lp));
        assert_eq!(display_symbol(lp).unwrap(), lp);
        assert!(!is_lp_token_code("4254435800000000000000000000000000000000"));
        assert!(!is_lp_token_code("USD"));
    }

    #[test]
    fn normalize_accepts_hex_and_rejects_xrp() {
        let hex = "4254435800000000000000000000000000000000";
        assert_eq!(normalize_currency_code(&hex.to_lowercase()).unwrap(), hex);
        assert_eq!(normalize_currency_code("BTCX").unwrap(), hex);
        assert_eq!(normalize_currency_code("EUR").unwrap(), "EUR");
        assert!(normalize_currency_code("xrp").is_err());
    }

    #[test]
    fn free_text_roundtrip() {
        let encoded = text_to_hex("example.com");
        assert_eq!(encoded, "6578616D706C652E636F6D");
        assert_eq!(hex_to_text(&encoded).unwrap(), "example.com");
    }

    #[test]
    fn random_symbols_roundtrip() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let len = rng.gen_range(1..=20);
            let symbol: String = (0..len)
                .map(|_| char::from(rng.gen_range(b'!'..=b'~')))
                .collect();
            let code = symbol_to_hex(&symbol).unwrap();
            assert_eq!(hex_to_symbol(&code).unwrap(), symbol, "code {code}");
        }
    }
}
