//! The transaction builder and helpers shared by every builder module.

use std::fmt;

use chrono::{DateTime, Utc};
use xrpl_bridge_types::{
    AmountSpec, BridgeConfig, BridgeError, Memo, MemoConfig, Result, TransactionIntent,
    TransactionKind, WireAmount, to_protocol_time,
};

/// Immutable factory for transaction intents.
///
/// Holds the source tag and default memo from [`BridgeConfig`]; every
/// builder method is a pure function of `self` and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxBuilder {
    source_tag: Option<u32>,
    default_memo: Option<Memo>,
}

impl TxBuilder {
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            source_tag: Some(config.source_tag),
            default_memo: config.default_memo.as_ref().map(Memo::from),
        }
    }

    /// A builder that stamps neither source tag nor memo.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            source_tag: None,
            default_memo: None,
        }
    }

    #[must_use]
    pub fn source_tag(&self) -> Option<u32> {
        self.source_tag
    }

    /// Assemble the intent with the configured source tag and memo.
    pub(crate) fn finish(
        &self,
        account: &str,
        kind: TransactionKind,
        fee_drops: Option<u64>,
        flags: u32,
    ) -> Result<TransactionIntent> {
        self.finish_with_memo(account, kind, fee_drops, flags, None)
    }

    /// Like [`finish`](Self::finish), with `memo` replacing the default.
    pub(crate) fn finish_with_memo(
        &self,
        account: &str,
        kind: TransactionKind,
        fee_drops: Option<u64>,
        flags: u32,
        memo: Option<&MemoConfig>,
    ) -> Result<TransactionIntent> {
        require_address("account", account)?;
        let memos = memo
            .map(Memo::from)
            .or_else(|| self.default_memo.clone())
            .into_iter()
            .collect();
        let intent =
            TransactionIntent::new(account, kind, fee_drops, flags, memos, self.source_tag);
        tracing::debug!(
            tx_type = intent.type_tag(),
            account = %account,
            flags = flags,
            "Transaction intent built"
        );
        Ok(intent)
    }
}

impl Default for TxBuilder {
    fn default() -> Self {
        Self::new(&BridgeConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Amount pairs
// ---------------------------------------------------------------------------

/// The four tag combinations of a two-amount transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    NativeNative,
    NativeIssued,
    IssuedNative,
    IssuedIssued,
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NativeNative => write!(f, "XRP/XRP"),
            Self::NativeIssued => write!(f, "XRP/IOU"),
            Self::IssuedNative => write!(f, "IOU/XRP"),
            Self::IssuedIssued => write!(f, "IOU/IOU"),
        }
    }
}

#[must_use]
pub fn pair_kind(first: &AmountSpec, second: &AmountSpec) -> PairKind {
    match (first, second) {
        (AmountSpec::Native { .. }, AmountSpec::Native { .. }) => PairKind::NativeNative,
        (AmountSpec::Native { .. }, AmountSpec::Issued { .. }) => PairKind::NativeIssued,
        (AmountSpec::Issued { .. }, AmountSpec::Native { .. }) => PairKind::IssuedNative,
        (AmountSpec::Issued { .. }, AmountSpec::Issued { .. }) => PairKind::IssuedIssued,
    }
}

/// Wire-encode both legs of a two-amount transaction.
pub(crate) fn encode_pair(
    first: &AmountSpec,
    second: &AmountSpec,
) -> Result<(PairKind, WireAmount, WireAmount)> {
    let kind = pair_kind(first, second);
    Ok((kind, first.to_wire()?, second.to_wire()?))
}

// ---------------------------------------------------------------------------
// Parameter checks
// ---------------------------------------------------------------------------

pub(crate) fn require_address(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BridgeError::invalid_param(field, "address is empty"));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, amount: &AmountSpec) -> Result<()> {
    if amount.value() <= rust_decimal::Decimal::ZERO {
        return Err(BridgeError::invalid_param(
            field,
            format!("{} {} is not positive", amount.value(), amount.currency()),
        ));
    }
    Ok(())
}

pub(crate) fn require_distinct(field: &'static str, a: &str, b: &str) -> Result<()> {
    if a == b {
        return Err(BridgeError::invalid_param(
            field,
            format!("{b} is the sending account"),
        ));
    }
    Ok(())
}

/// Check a fixed-length hex identifier (ledger object ids, hashes).
pub(crate) fn require_hex(field: &'static str, value: &str, len: usize) -> Result<()> {
    if value.len() != len || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(BridgeError::invalid_param(
            field,
            format!("expected {len} hex characters, got {value:?}"),
        ));
    }
    Ok(())
}

pub(crate) fn protocol_time(t: Option<DateTime<Utc>>) -> Result<Option<u32>> {
    t.map(to_protocol_time).transpose()
}
