//! # xrpl-bridge-txbuild
//!
//! Pure constructors for XRP Ledger transaction intents.
//!
//! Every builder is a method on [`TxBuilder`], takes a typed parameter
//! struct, validates it with the codecs in `xrpl-bridge-types` and returns
//! a [`TransactionIntent`](xrpl_bridge_types::TransactionIntent) ready for
//! an external signer. Nothing here performs I/O.
//!
//! ## Modules
//!
//! - [`offers`]: order-book offers (passive liquidity, swaps, cancel)
//! - [`trustlines`]: trust lines and freezes
//! - [`payments`]: XRP and issued-token payments
//! - [`checks`]: deferred payments
//! - [`escrow`]: time-locked and conditional escrows
//! - [`nft`]: NFToken mint, burn, offers and transfers
//! - [`amm`]: AMM pools
//! - [`account`]: account settings and deletion

pub mod account;
pub mod amm;
pub mod builder;
pub mod checks;
pub mod escrow;
pub mod nft;
pub mod offers;
pub mod payments;
pub mod trustlines;

pub use account::{AccountDeleteParams, IssuerSettingsParams, ManagerSettingsParams};
pub use amm::{AmmBidParams, AmmCreateParams, AmmVoteParams};
pub use builder::{PairKind, TxBuilder, pair_kind};
pub use checks::{CashCheckParams, CreateCheckParams};
pub use escrow::{
    CreateEscrowParams, EscrowCondition, SchedulePaymentParams, SettleEscrowParams,
};
pub use nft::{
    AcceptNftOfferParams, BurnNftParams, MintNftParams, NftBuyOfferParams, NftSellOfferParams,
    SendNftParams,
};
pub use offers::{CreateOfferParams, LiquidityOfferParams, SwapParams, offer_flags};
pub use payments::{SendTokenParams, SendXrpParams, TokenTransferParams};
pub use trustlines::{FreezeParams, TrustlineParams};
