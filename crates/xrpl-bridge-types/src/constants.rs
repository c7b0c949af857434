//! Protocol-wide constants for the XRP Ledger bridge.

/// Drops in one XRP.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Decimal places of the native asset (1 drop = 0.000001 XRP).
pub const XRP_DECIMALS: u32 = 6;

/// Total native supply in XRP. No native amount may exceed this.
pub const MAX_XRP: u64 = 100_000_000_000;

/// Symbolic currency code of the native asset.
pub const NATIVE_CODE: &str = "XRP";

/// Base reserve every account must hold, in XRP.
pub const BASE_RESERVE_XRP: u64 = 10;

/// Owner reserve charged per owned ledger object, in XRP.
pub const OWNER_RESERVE_XRP: u64 = 2;

/// Seconds between the Unix epoch and the ledger epoch (2000-01-01T00:00:00Z).
pub const RIPPLE_EPOCH_OFFSET: i64 = 946_684_800;

/// Length of an encoded non-standard currency code, in hex characters.
pub const CURRENCY_HEX_LEN: usize = 40;

/// Maximum length of a symbol that is sent as-is (standard ISO-style code).
pub const STANDARD_CODE_MAX_LEN: usize = 3;

/// Leading byte of AMM LP-token currency codes.
pub const LP_TOKEN_PREFIX: u8 = 0x03;

/// `TransferRate` value meaning 0 % (rates are expressed relative to 1e9).
pub const TRANSFER_RATE_BASE: u64 = 1_000_000_000;

/// Highest NFT `TransferFee` value (50 %).
pub const NFT_TRANSFER_FEE_MAX: u32 = 50_000;

/// Highest AMM `TradingFee` value (1 %).
pub const AMM_TRADING_FEE_MAX: u32 = 1_000;

/// Valid non-zero `TickSize` bounds for `AccountSet`.
pub const TICK_SIZE_MIN: u8 = 3;
pub const TICK_SIZE_MAX: u8 = 15;

/// Trustline limit used when a wallet opts in to hold a token.
pub const DEFAULT_TRUSTLINE_LIMIT: &str = "1000000000";

/// Maximum number of accounts an `AMMBid` may authorize.
pub const MAX_AMM_AUTH_ACCOUNTS: usize = 4;

/// Source tag stamped on every transaction built by this library.
pub const DEFAULT_SOURCE_TAG: u32 = 10_011_001;

/// Default memo attached to built transactions.
pub const DEFAULT_MEMO_TYPE: &str = "Done-with-Myrkle";
pub const DEFAULT_MEMO_DATA: &str = "https://myrkle.app";

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
