//! Transaction intents.
//!
//! A [`TransactionIntent`] is an unsigned transaction in the ledger's JSON
//! shape. It is built once by a builder, then only inspected or serialized
//! and handed to an external signer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::text_to_hex;
use crate::{IssuedAmount, MemoConfig, Result, WireAmount, WireAsset};

/// Hex-encoded memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    #[serde(rename = "MemoType", skip_serializing_if = "Option::is_none")]
    pub memo_type: Option<String>,
    #[serde(rename = "MemoData", skip_serializing_if = "Option::is_none")]
    pub memo_data: Option<String>,
}

impl Memo {
    /// Hex-encode a plain-text memo. Empty parts are omitted.
    #[must_use]
    pub fn from_text(memo_type: &str, memo_data: &str) -> Self {
        let encode = |s: &str| (!s.is_empty()).then(|| text_to_hex(s));
        Self {
            memo_type: encode(memo_type),
            memo_data: encode(memo_data),
        }
    }
}

impl From<&MemoConfig> for Memo {
    fn from(cfg: &MemoConfig) -> Self {
        Self::from_text(&cfg.memo_type, &cfg.memo_data)
    }
}

/// `{"Memo": {...}}` wrapper used by the `Memos` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoEntry {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

/// `{"AuthAccount": {"Account": ...}}` wrapper used by `AMMBid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAccountEntry {
    #[serde(rename = "AuthAccount")]
    pub auth_account: AuthAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAccount {
    #[serde(rename = "Account")]
    pub account: String,
}

impl AuthAccountEntry {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            auth_account: AuthAccount {
                account: account.into(),
            },
        }
    }
}

/// Type-specific fields of each supported transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "TransactionType")]
pub enum TransactionKind {
    OfferCreate {
        #[serde(rename = "TakerGets")]
        taker_gets: WireAmount,
        #[serde(rename = "TakerPays")]
        taker_pays: WireAmount,
        #[serde(rename = "Expiration", skip_serializing_if = "Option::is_none")]
        expiration: Option<u32>,
        /// Offer to replace, if any.
        #[serde(rename = "OfferSequence", skip_serializing_if = "Option::is_none")]
        offer_sequence: Option<u32>,
    },
    OfferCancel {
        #[serde(rename = "OfferSequence")]
        offer_sequence: u32,
    },
    TrustSet {
        #[serde(rename = "LimitAmount")]
        limit_amount: IssuedAmount,
    },
    Payment {
        #[serde(rename = "Destination")]
        destination: String,
        #[serde(rename = "Amount")]
        amount: WireAmount,
        #[serde(rename = "DestinationTag", skip_serializing_if = "Option::is_none")]
        destination_tag: Option<u32>,
        #[serde(rename = "SendMax", skip_serializing_if = "Option::is_none")]
        send_max: Option<WireAmount>,
    },
    CheckCreate {
        #[serde(rename = "Destination")]
        destination: String,
        #[serde(rename = "SendMax")]
        send_max: WireAmount,
        #[serde(rename = "Expiration", skip_serializing_if = "Option::is_none")]
        expiration: Option<u32>,
        #[serde(rename = "DestinationTag", skip_serializing_if = "Option::is_none")]
        destination_tag: Option<u32>,
        #[serde(rename = "InvoiceID", skip_serializing_if = "Option::is_none")]
        invoice_id: Option<String>,
    },
    CheckCash {
        #[serde(rename = "CheckID")]
        check_id: String,
        #[serde(rename = "Amount")]
        amount: WireAmount,
    },
    CheckCancel {
        #[serde(rename = "CheckID")]
        check_id: String,
    },
    EscrowCreate {
        #[serde(rename = "Destination")]
        destination: String,
        #[serde(rename = "Amount")]
        amount: WireAmount,
        #[serde(rename = "FinishAfter", skip_serializing_if = "Option::is_none")]
        finish_after: Option<u32>,
        #[serde(rename = "CancelAfter", skip_serializing_if = "Option::is_none")]
        cancel_after: Option<u32>,
        #[serde(rename = "Condition", skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
        #[serde(rename = "DestinationTag", skip_serializing_if = "Option::is_none")]
        destination_tag: Option<u32>,
    },
    EscrowFinish {
        #[serde(rename = "Owner")]
        owner: String,
        #[serde(rename = "OfferSequence")]
        offer_sequence: u32,
        #[serde(rename = "Condition", skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
        #[serde(rename = "Fulfillment", skip_serializing_if = "Option::is_none")]
        fulfillment: Option<String>,
    },
    EscrowCancel {
        #[serde(rename = "Owner")]
        owner: String,
        #[serde(rename = "OfferSequence")]
        offer_sequence: u32,
    },
    #[serde(rename = "NFTokenMint")]
    NfTokenMint {
        #[serde(rename = "NFTokenTaxon")]
        taxon: u32,
        #[serde(rename = "URI", skip_serializing_if = "Option::is_none")]
        uri: Option<String>,
        #[serde(rename = "TransferFee", skip_serializing_if = "Option::is_none")]
        transfer_fee: Option<u32>,
        #[serde(rename = "Issuer", skip_serializing_if = "Option::is_none")]
        issuer: Option<String>,
    },
    #[serde(rename = "NFTokenBurn")]
    NfTokenBurn {
        #[serde(rename = "NFTokenID")]
        nftoken_id: String,
        #[serde(rename = "Owner", skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
    },
    #[serde(rename = "NFTokenCreateOffer")]
    NfTokenCreateOffer {
        #[serde(rename = "NFTokenID")]
        nftoken_id: String,
        #[serde(rename = "Amount")]
        amount: WireAmount,
        #[serde(rename = "Owner", skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
        #[serde(rename = "Destination", skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
        #[serde(rename = "Expiration", skip_serializing_if = "Option::is_none")]
        expiration: Option<u32>,
    },
    #[serde(rename = "NFTokenCancelOffer")]
    NfTokenCancelOffer {
        #[serde(rename = "NFTokenOffers")]
        offers: Vec<String>,
    },
    #[serde(rename = "NFTokenAcceptOffer")]
    NfTokenAcceptOffer {
        #[serde(rename = "NFTokenSellOffer", skip_serializing_if = "Option::is_none")]
        sell_offer: Option<String>,
        #[serde(rename = "NFTokenBuyOffer", skip_serializing_if = "Option::is_none")]
        buy_offer: Option<String>,
        #[serde(rename = "NFTokenBrokerFee", skip_serializing_if = "Option::is_none")]
        broker_fee: Option<WireAmount>,
    },
    #[serde(rename = "AMMCreate")]
    AmmCreate {
        #[serde(rename = "Amount")]
        amount: WireAmount,
        #[serde(rename = "Amount2")]
        amount2: WireAmount,
        #[serde(rename = "TradingFee")]
        trading_fee: u32,
    },
    #[serde(rename = "AMMVote")]
    AmmVote {
        #[serde(rename = "Asset")]
        asset: WireAsset,
        #[serde(rename = "Asset2")]
        asset2: WireAsset,
        #[serde(rename = "TradingFee")]
        trading_fee: u32,
    },
    #[serde(rename = "AMMBid")]
    AmmBid {
        #[serde(rename = "Asset")]
        asset: WireAsset,
        #[serde(rename = "Asset2")]
        asset2: WireAsset,
        #[serde(rename = "BidMin", skip_serializing_if = "Option::is_none")]
        bid_min: Option<WireAmount>,
        #[serde(rename = "BidMax", skip_serializing_if = "Option::is_none")]
        bid_max: Option<WireAmount>,
        #[serde(rename = "AuthAccounts", default, skip_serializing_if = "Vec::is_empty")]
        auth_accounts: Vec<AuthAccountEntry>,
    },
    AccountSet {
        #[serde(rename = "SetFlag", skip_serializing_if = "Option::is_none")]
        set_flag: Option<u32>,
        #[serde(rename = "ClearFlag", skip_serializing_if = "Option::is_none")]
        clear_flag: Option<u32>,
        #[serde(rename = "Domain", skip_serializing_if = "Option::is_none")]
        domain: Option<String>,
        #[serde(rename = "EmailHash", skip_serializing_if = "Option::is_none")]
        email_hash: Option<String>,
        #[serde(rename = "TransferRate", skip_serializing_if = "Option::is_none")]
        transfer_rate: Option<u64>,
        #[serde(rename = "TickSize", skip_serializing_if = "Option::is_none")]
        tick_size: Option<u8>,
        #[serde(rename = "NFTokenMinter", skip_serializing_if = "Option::is_none")]
        nftoken_minter: Option<String>,
    },
    AccountDelete {
        #[serde(rename = "Destination")]
        destination: String,
        #[serde(rename = "DestinationTag", skip_serializing_if = "Option::is_none")]
        destination_tag: Option<u32>,
    },
}

impl TransactionKind {
    /// The `TransactionType` string.
    #[must_use]
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::OfferCreate { .. } => "OfferCreate",
            Self::OfferCancel { .. } => "OfferCancel",
            Self::TrustSet { .. } => "TrustSet",
            Self::Payment { .. } => "Payment",
            Self::CheckCreate { .. } => "CheckCreate",
            Self::CheckCash { .. } => "CheckCash",
            Self::CheckCancel { .. } => "CheckCancel",
            Self::EscrowCreate { .. } => "EscrowCreate",
            Self::EscrowFinish { .. } => "EscrowFinish",
            Self::EscrowCancel { .. } => "EscrowCancel",
            Self::NfTokenMint { .. } => "NFTokenMint",
            Self::NfTokenBurn { .. } => "NFTokenBurn",
            Self::NfTokenCreateOffer { .. } => "NFTokenCreateOffer",
            Self::NfTokenCancelOffer { .. } => "NFTokenCancelOffer",
            Self::NfTokenAcceptOffer { .. } => "NFTokenAcceptOffer",
            Self::AmmCreate { .. } => "AMMCreate",
            Self::AmmVote { .. } => "AMMVote",
            Self::AmmBid { .. } => "AMMBid",
            Self::AccountSet { .. } => "AccountSet",
            Self::AccountDelete { .. } => "AccountDelete",
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &u32) -> bool {
    *v == 0
}

/// An unsigned transaction ready for an external signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIntent {
    #[serde(rename = "Account")]
    account: String,
    #[serde(flatten)]
    kind: TransactionKind,
    /// Fee in drops; the signer autofills when absent.
    #[serde(rename = "Fee", skip_serializing_if = "Option::is_none")]
    fee: Option<String>,
    #[serde(rename = "Flags", default, skip_serializing_if = "is_zero")]
    flags: u32,
    #[serde(rename = "Memos", default, skip_serializing_if = "Vec::is_empty")]
    memos: Vec<MemoEntry>,
    #[serde(rename = "SourceTag", skip_serializing_if = "Option::is_none")]
    source_tag: Option<u32>,
}

impl TransactionIntent {
    /// Assemble an intent. Only builders should call this; everything after
    /// construction is read-only.
    pub fn new(
        account: impl Into<String>,
        kind: TransactionKind,
        fee_drops: Option<u64>,
        flags: u32,
        memos: Vec<Memo>,
        source_tag: Option<u32>,
    ) -> Self {
        Self {
            account: account.into(),
            kind,
            fee: fee_drops.map(|d| d.to_string()),
            flags,
            memos: memos.into_iter().map(|memo| MemoEntry { memo }).collect(),
            source_tag,
        }
    }

    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    #[must_use]
    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    #[must_use]
    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }

    /// Fee in drops, as sent on the wire.
    #[must_use]
    pub fn fee(&self) -> Option<&str> {
        self.fee.as_deref()
    }

    #[must_use]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Whether every bit of `mask` is set.
    #[must_use]
    pub fn has_flag(&self, mask: u32) -> bool {
        self.flags & mask == mask
    }

    pub fn memos(&self) -> impl Iterator<Item = &Memo> {
        self.memos.iter().map(|e| &e.memo)
    }

    #[must_use]
    pub fn source_tag(&self) -> Option<u32> {
        self.source_tag
    }

    /// Protocol JSON for the signer.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
