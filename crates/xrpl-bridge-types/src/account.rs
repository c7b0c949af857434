//! Account-level records: account root, balances, trust lines, NFTs,
//! issued tokens, payments and submit results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::flags::{self, FlagDescriptor, FlagRegistry};
use crate::{AmountSpec, amount};

/// An account root entry (`account_info`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub index: String,
    pub address: String,
    /// Balance in XRP.
    pub balance: Decimal,
    pub object_type: String,
    pub owner_count: u32,
    pub sequence: u32,
    pub flags: u32,
    pub tick_size: Option<u8>,
    /// Transfer fee percentage charged on tokens this account issues.
    pub transfer_fee: Option<Decimal>,
    /// Decoded `Domain`.
    pub domain: Option<String>,
    /// `EmailHash`, hex as stored.
    pub email_hash: Option<String>,
}

impl AccountInfo {
    #[must_use]
    pub fn is_amm(&self) -> bool {
        flags::is_amm(self.flags)
    }

    /// Account flags that are set.
    #[must_use]
    pub fn decoded_flags(&self) -> Vec<&'static FlagDescriptor> {
        flags::decode(self.flags, FlagRegistry::Account)
    }

    /// XRP left after base and owner reserves.
    #[must_use]
    pub fn spendable(&self) -> Decimal {
        self.balance
            - Decimal::from(crate::constants::BASE_RESERVE_XRP)
            - Decimal::from(self.owner_count) * Decimal::from(crate::constants::OWNER_RESERVE_XRP)
    }
}

/// XRP balance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub address: String,
    pub balance: Decimal,
    pub owner_count: u32,
    pub spendable: Decimal,
}

impl AccountBalance {
    #[must_use]
    pub fn from_drops(address: impl Into<String>, balance_drops: u64, owner_count: u32) -> Self {
        Self {
            address: address.into(),
            balance: amount::drops_to_xrp(balance_drops),
            owner_count,
            spendable: amount::spendable_balance(balance_drops, owner_count),
        }
    }
}

/// One trust line (`account_lines`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLine {
    /// Symbol, or raw hex for LP tokens.
    pub currency: String,
    /// The counterparty (issuer from the holder's point of view).
    pub issuer: String,
    /// Negative when the queried account owes the counterparty.
    pub balance: Decimal,
    pub limit: Decimal,
    pub no_ripple: bool,
    pub freeze: bool,
    pub is_lp_token: bool,
}

/// An NFToken held by an account (`account_nfts`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftRecord {
    pub nftoken_id: String,
    pub issuer: String,
    pub flags: u32,
    pub taxon: u32,
    pub serial: u32,
    /// Decoded `URI`, when present and valid UTF-8.
    pub uri: Option<String>,
    /// Royalty percentage.
    pub transfer_fee: Decimal,
}

impl NftRecord {
    #[must_use]
    pub fn decoded_flags(&self) -> Vec<&'static FlagDescriptor> {
        flags::decode(self.flags, FlagRegistry::NfToken)
    }
}

/// A token an account has issued, with its outstanding supply
/// (`gateway_balances.obligations`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub currency: String,
    pub issuer: String,
    pub outstanding: Decimal,
}

/// A token an issuing account holds from another issuer
/// (`gateway_balances.assets`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldToken {
    pub currency: String,
    pub issuer: String,
    pub holder: String,
    pub amount: Decimal,
}

/// A validated payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub tx_hash: String,
    pub tx_type: String,
    pub sender: String,
    pub receiver: String,
    /// `meta.delivered_amount`, which may be less than `Amount` for partial
    /// payments.
    pub delivered: AmountSpec,
    /// Fee in XRP.
    pub fee: Decimal,
    pub timestamp: Option<DateTime<Utc>>,
    pub result: String,
    pub flags: u32,
    pub sequence: Option<u32>,
    pub ledger_index: Option<u32>,
    pub validated: bool,
}

impl PaymentRecord {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == SUCCESS_CODE
    }

    #[must_use]
    pub fn decoded_flags(&self) -> Vec<&'static FlagDescriptor> {
        flags::decode(self.flags, FlagRegistry::Payment)
    }
}

/// Sequence numbers of an escrow's creating transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowSequence {
    pub sequence: Option<u32>,
    pub ticket_sequence: Option<u32>,
}

impl EscrowSequence {
    /// The `OfferSequence` to use in `EscrowFinish`/`EscrowCancel`:
    /// `Sequence`, or `TicketSequence` when the escrow was created from a
    /// ticket (`Sequence` is then 0).
    #[must_use]
    pub fn effective(&self) -> Option<u32> {
        self.sequence
            .filter(|s| *s != 0)
            .or(self.ticket_sequence)
    }
}

pub const SUCCESS_CODE: &str = "tesSUCCESS";

/// What the ledger said about a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// Engine result code (`tesSUCCESS`, `tecKILLED`, ...), passed through.
    pub result_code: String,
    pub transaction_hash: Option<String>,
    pub message: Option<String>,
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result_code == SUCCESS_CODE
    }

    /// `ter*` codes: not applied yet, may still succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.result_code.starts_with("ter")
    }
}
