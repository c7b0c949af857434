//! Ledger epoch conversion.
//!
//! Ledger timestamps count seconds since 2000-01-01T00:00:00Z and are
//! stored as unsigned 32-bit integers.

use chrono::{DateTime, Utc};

use crate::constants::RIPPLE_EPOCH_OFFSET;
use crate::{BridgeError, Result};

/// Convert a calendar time to ledger time.
///
/// Sub-second precision is truncated. Instants before the ledger epoch or
/// past the 32-bit range fail with [`BridgeError::TimestampOutOfRange`].
pub fn to_protocol_time(t: DateTime<Utc>) -> Result<u32> {
    let secs = t.timestamp() - RIPPLE_EPOCH_OFFSET;
    u32::try_from(secs).map_err(|_| BridgeError::TimestampOutOfRange(t.to_rfc3339()))
}

/// Convert ledger time to a calendar time.
#[must_use]
pub fn from_protocol_time(v: u32) -> DateTime<Utc> {
    // Every u32 offset from 2000 lands well inside chrono's range.
    DateTime::from_timestamp(i64::from(v) + RIPPLE_EPOCH_OFFSET, 0).unwrap_or_default()
}
