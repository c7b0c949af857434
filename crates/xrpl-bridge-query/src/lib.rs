//! # xrpl-bridge-query
//!
//! The read side of the bridge: requests for ledger state, normalizers that
//! turn raw JSON-RPC answers into the records of `xrpl-bridge-types`, and
//! the order-book ranking engine.
//!
//! Normalizers accept either the full `{"result": {...}}` envelope or the
//! bare result object. A missing or mistyped field is reported as
//! [`BridgeError::MalformedLedgerResponse`](xrpl_bridge_types::BridgeError)
//! naming the field.
//!
//! ## Modules
//!
//! - [`query`]: [`LedgerQuery`] request bodies
//! - [`account`]: account info, trust lines, NFTs, gateway balances
//! - [`offers`]: order-book and account offers
//! - [`objects`]: escrows, checks, NFToken offers
//! - [`transactions`]: payments, escrow sequence, submit results
//! - [`ranking`]: best-buy / best-sell ranking

pub mod account;
pub mod objects;
pub mod offers;
pub mod query;
pub mod ranking;
pub mod transactions;

mod raw;

pub use account::{
    parse_account_balance, parse_account_info, parse_account_lines, parse_account_nfts,
    parse_gateway_assets, parse_gateway_obligations,
};
pub use objects::{
    parse_account_checks, parse_account_escrows, parse_account_nft_offers, parse_check_entry,
    parse_escrow_entry, parse_nft_offers,
};
pub use offers::{parse_account_offers, parse_book_offers, parse_offer_entry, passive_only};
pub use query::LedgerQuery;
pub use ranking::{RankSide, RankedBook, RankedOffers, rank_book, rank_offers};
pub use transactions::{
    PaymentFilter, parse_account_payments, parse_escrow_sequence, parse_payment_tx,
    parse_submit_result,
};
