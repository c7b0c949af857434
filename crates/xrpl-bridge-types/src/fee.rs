//! Fee-rate codecs.
//!
//! The ledger encodes three unrelated fee percentages as integers:
//!
//! | Kind          | Percent range | Encoded range              | Step     |
//! |---------------|---------------|----------------------------|----------|
//! | Transfer      | 0 ..= 100     | 1_000_000_000 ..= 2e9      | 1e-7 %   |
//! | NFT transfer  | 0 ..= 50      | 0 ..= 50_000               | 0.001 %  |
//! | AMM trading   | 0 ..= 1       | 0 ..= 1_000                | 0.001 %  |
//!
//! Out-of-range input is rejected with [`BridgeError::FeeOutOfRange`],
//! never clamped.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::{AMM_TRADING_FEE_MAX, NFT_TRANSFER_FEE_MAX, TRANSFER_RATE_BASE};
use crate::{BridgeError, Result};

/// The three fee encodings the ledger uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeKind {
    /// Issuer transfer fee (`AccountSet.TransferRate`).
    Transfer,
    /// NFT royalty (`NFTokenMint.TransferFee`).
    NftTransfer,
    /// AMM pool trading fee (`AMMCreate/AMMVote.TradingFee`).
    AmmTrading,
}

impl fmt::Display for FeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => write!(f, "TRANSFER_FEE"),
            Self::NftTransfer => write!(f, "NFT_TRANSFER_FEE"),
            Self::AmmTrading => write!(f, "AMM_TRADING_FEE"),
        }
    }
}

impl FeeKind {
    /// Highest accepted percentage.
    #[must_use]
    pub fn max_percent(self) -> Decimal {
        match self {
            Self::Transfer => Decimal::ONE_HUNDRED,
            Self::NftTransfer => Decimal::new(50, 0),
            Self::AmmTrading => Decimal::ONE,
        }
    }

    /// Inclusive bounds of the encoded integer.
    #[must_use]
    pub fn encoded_bounds(self) -> (u64, u64) {
        match self {
            Self::Transfer => (TRANSFER_RATE_BASE, 2 * TRANSFER_RATE_BASE),
            Self::NftTransfer => (0, u64::from(NFT_TRANSFER_FEE_MAX)),
            Self::AmmTrading => (0, u64::from(AMM_TRADING_FEE_MAX)),
        }
    }

    fn check_percent(self, percent: Decimal) -> Result<()> {
        let max = self.max_percent();
        if percent < Decimal::ZERO || percent > max {
            return Err(BridgeError::FeeOutOfRange {
                kind: self,
                value: percent,
                min: Decimal::ZERO,
                max,
            });
        }
        Ok(())
    }

    /// Encode a percentage (`20` = 20 %) to the ledger integer.
    pub fn encode(self, percent: Decimal) -> Result<u64> {
        self.check_percent(percent)?;
        let raw = match self {
            Self::Transfer => (Decimal::from(TRANSFER_RATE_BASE)
                * (Decimal::ONE + percent / Decimal::ONE_HUNDRED))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            Self::NftTransfer => {
                (Decimal::from(NFT_TRANSFER_FEE_MAX) * percent / Decimal::new(50, 0)).floor()
            }
            Self::AmmTrading => (Decimal::from(AMM_TRADING_FEE_MAX) * percent).floor(),
        };
        raw.to_u64().ok_or(BridgeError::FeeOutOfRange {
            kind: self,
            value: percent,
            min: Decimal::ZERO,
            max: self.max_percent(),
        })
    }

    /// Decode a ledger integer back to a percentage.
    ///
    /// A `TransferRate` of `0` is the ledger's "no fee" value and decodes
    /// to 0 %.
    pub fn decode(self, encoded: u64) -> Result<Decimal> {
        if self == Self::Transfer && encoded == 0 {
            return Ok(Decimal::ZERO);
        }
        let (lo, hi) = self.encoded_bounds();
        if encoded < lo || encoded > hi {
            return Err(BridgeError::FeeOutOfRange {
                kind: self,
                value: Decimal::from(encoded),
                min: Decimal::from(lo),
                max: Decimal::from(hi),
            });
        }
        let value = Decimal::from(encoded);
        let percent = match self {
            Self::Transfer => {
                let base = Decimal::from(TRANSFER_RATE_BASE);
                (value - base) / base * Decimal::ONE_HUNDRED
            }
            Self::NftTransfer => Decimal::new(50, 0) * value / Decimal::from(NFT_TRANSFER_FEE_MAX),
            Self::AmmTrading => value / Decimal::from(AMM_TRADING_FEE_MAX),
        };
        Ok(percent.normalize())
    }
}

/// `20` → `1_200_000_000`.
pub fn transfer_fee_to_xrp_format(percent: Decimal) -> Result<u64> {
    FeeKind::Transfer.encode(percent)
}

/// `1_200_000_000` → `20`.
pub fn xrp_format_to_transfer_fee(encoded: u64) -> Result<Decimal> {
    FeeKind::Transfer.decode(encoded)
}

/// `20` → `20_000`.
pub fn nft_fee_to_xrp_format(percent: Decimal) -> Result<u32> {
    FeeKind::NftTransfer.encode(percent).map(narrow)
}

/// `20_000` → `20`.
pub fn xrp_format_to_nft_fee(encoded: u32) -> Result<Decimal> {
    FeeKind::NftTransfer.decode(u64::from(encoded))
}

/// `1` → `1_000`.
pub fn amm_fee_to_xrp_format(percent: Decimal) -> Result<u32> {
    FeeKind::AmmTrading.encode(percent).map(narrow)
}

/// `1_000` → `1`.
pub fn xrp_format_to_amm_fee(encoded: u32) -> Result<Decimal> {
    FeeKind::AmmTrading.decode(u64::from(encoded))
}

// NFT and AMM encodings are bounded by 50_000.
#[allow(clippy::cast_possible_truncation)]
fn narrow(v: u64) -> u32 {
    v as u32
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn transfer_fee_twenty_percent() {
        let encoded = transfer_fee_to_xrp_format(Decimal::new(20, 0)).unwrap();
        assert_eq!(encoded, 1_200_000_000);
        assert_eq!(xrp_format_to_transfer_fee(encoded).unwrap(), Decimal::new(20, 0));
    }

    #[test]
    fn transfer_fee_bounds_enforced() {
        assert!(transfer_fee_to_xrp_format(Decimal::new(-1, 0)).is_err());
        assert!(transfer_fee_to_xrp_format(Decimal::new(1001, 1)).is_err());
        assert_eq!(transfer_fee_to_xrp_format(Decimal::ZERO).unwrap(), 1_000_000_000);
        assert_eq!(
            transfer_fee_to_xrp_format(Decimal::ONE_HUNDRED).unwrap(),
            2_000_000_000
        );
    }

    #[test]
    fn transfer_rate_zero_means_no_fee() {
        assert_eq!(xrp_format_to_transfer_fee(0).unwrap(), Decimal::ZERO);
        assert!(xrp_format_to_transfer_fee(999_999_999).is_err());
    }

    #[test]
    fn nft_fee_encoding() {
        assert_eq!(nft_fee_to_xrp_format(Decimal::new(20, 0)).unwrap(), 20_000);
        assert_eq!(nft_fee_to_xrp_format(Decimal::new(50, 0)).unwrap(), 50_000);
        // floor, not round
        assert_eq!(nft_fee_to_xrp_format(Decimal::new(12_345, 4)).unwrap(), 1_234);
        assert_eq!(xrp_format_to_nft_fee(25_000).unwrap(), Decimal::new(25, 0));
    }

    #[test]
    fn nft_fee_out_of_range() {
        let err = nft_fee_to_xrp_format(Decimal::new(51, 0)).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::FeeOutOfRange { kind: FeeKind::NftTransfer, .. }
        ));
        assert!(xrp_format_to_nft_fee(50_001).is_err());
    }

    #[test]
    fn amm_fee_encoding() {
        assert_eq!(amm_fee_to_xrp_format(Decimal::ONE).unwrap(), 1_000);
        assert_eq!(amm_fee_to_xrp_format(Decimal::new(5, 1)).unwrap(), 500);
        assert_eq!(xrp_format_to_amm_fee(1).unwrap(), Decimal::new(1, 3));
        assert!(amm_fee_to_xrp_format(Decimal::new(11, 1)).is_err());
        assert!(xrp_format_to_amm_fee(1_001).is_err());
    }

    #[test]
    fn random_percentages_roundtrip_within_step() {
        let mut rng = rand::thread_rng();
        let cases = [
            (FeeKind::Transfer, Decimal::new(1, 7)),
            (FeeKind::NftTransfer, Decimal::new(1, 3)),
            (FeeKind::AmmTrading, Decimal::new(1, 3)),
        ];
        for (kind, step) in cases {
            let max_units = (kind.max_percent() / step).to_i64().unwrap();
            for _ in 0..500 {
                let units = rng.gen_range(0..=max_units);
                let percent = Decimal::from(units) * step;
                let back = kind.decode(kind.encode(percent).unwrap()).unwrap();
                assert!(
                    (back - percent).abs() < step,
                    "{kind}: {percent} -> {back}"
                );
            }
        }
    }
}
