//! # xrpl-bridge-types
//!
//! Shared codecs, records and configuration for the **xrpl-bridge**
//! translation layer between wallet/trading intents and the XRP Ledger.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Amounts**: [`AmountSpec`], [`Asset`], [`WireAmount`], drops codec
//! - **Codecs**: currency codes ([`symbol_to_hex`]), fees ([`FeeKind`]),
//!   ledger time ([`to_protocol_time`])
//! - **Flags**: [`FlagRegistry`], [`FlagDescriptor`], [`AccountSetFlag`]
//! - **Intents**: [`TransactionIntent`], [`TransactionKind`]
//! - **Records**: [`LedgerOffer`], [`EscrowRecord`], [`CheckRecord`],
//!   [`NftOfferRecord`], [`AccountInfo`], [`TrustLine`], [`PaymentRecord`], ...
//! - **Network**: [`Network`], [`NetworkProfile`]
//! - **Configuration**: [`BridgeConfig`]
//! - **Errors**: [`BridgeError`] with `XB_ERR_` prefix codes

pub mod account;
pub mod amount;
pub mod config;
pub mod constants;
pub mod currency;
pub mod error;
pub mod fee;
pub mod flags;
pub mod intent;
pub mod network;
pub mod nftoken;
pub mod objects;
pub mod offer;
pub mod time;

// Re-export all primary types at crate root:
//   use xrpl_bridge_types::{AmountSpec, TransactionIntent, LedgerOffer, ...};

pub use account::*;
pub use amount::*;
pub use config::*;
pub use currency::*;
pub use error::*;
pub use fee::*;
pub use flags::{AccountSetFlag, AccountSetToggle, FlagDescriptor, FlagRegistry, encode_toggle};
pub use intent::*;
pub use network::*;
pub use nftoken::*;
pub use objects::*;
pub use offer::*;
pub use time::*;

// Constants and flag masks are accessed via `xrpl_bridge_types::constants::FOO`
// and `xrpl_bridge_types::flags::TF_FOO` (not re-exported to avoid name
// collisions).
