//! NFTokenID layout.
//!
//! An NFTokenID is 32 bytes, rendered as 64 hex characters:
//!
//! ```text
//! | flags (2) | transfer fee (2) | issuer account id (20) | taxon (4) | sequence (4) |
//! ```
//!
//! The taxon is stored scrambled with a linear congruential generator
//! seeded by the sequence, so tokens of one taxon do not cluster.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::flags::{TF_BURNABLE, TF_ONLY_XRP, TF_TRANSFERABLE};
use crate::{BridgeError, Result, fee};

const NFTOKEN_ID_BYTES: usize = 32;
const TAXON_MULTIPLIER: u32 = 384_160_001;
const TAXON_INCREMENT: u32 = 2_459;

/// The fields packed into an NFTokenID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfTokenId {
    pub flags: u16,
    /// Raw `TransferFee` (0..=50_000).
    pub transfer_fee: u16,
    /// Issuer account id, 40 uppercase hex characters.
    pub issuer_account_id: String,
    pub taxon: u32,
    pub sequence: u32,
}

fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

fn be_u16(b: &[u8]) -> u16 {
    u16::from_be_bytes([b[0], b[1]])
}

impl NfTokenId {
    pub fn parse(id: &str) -> Result<Self> {
        let bytes = hex::decode(id).map_err(|e| BridgeError::InvalidNfToken {
            reason: format!("{id:?} is not hex: {e}"),
        })?;
        if bytes.len() != NFTOKEN_ID_BYTES {
            return Err(BridgeError::InvalidNfToken {
                reason: format!("expected {NFTOKEN_ID_BYTES} bytes, got {}", bytes.len()),
            });
        }
        let sequence = be_u32(&bytes[28..32]);
        let scrambled = be_u32(&bytes[24..28]);
        Ok(Self {
            flags: be_u16(&bytes[0..2]),
            transfer_fee: be_u16(&bytes[2..4]),
            issuer_account_id: hex::encode_upper(&bytes[4..24]),
            taxon: scrambled ^ taxon_cipher(sequence),
            sequence,
        })
    }

    fn has(&self, mask: u32) -> bool {
        u32::from(self.flags) & mask == mask
    }

    /// The issuer may burn the token while someone else holds it.
    #[must_use]
    pub fn is_burnable(&self) -> bool {
        self.has(TF_BURNABLE)
    }

    #[must_use]
    pub fn is_only_xrp(&self) -> bool {
        self.has(TF_ONLY_XRP)
    }

    #[must_use]
    pub fn is_transferable(&self) -> bool {
        self.has(TF_TRANSFERABLE)
    }

    /// Royalty as a percentage.
    pub fn transfer_fee_percent(&self) -> Result<Decimal> {
        fee::xrp_format_to_nft_fee(u32::from(self.transfer_fee))
    }
}

fn taxon_cipher(sequence: u32) -> u32 {
    TAXON_MULTIPLIER
        .wrapping_mul(sequence)
        .wrapping_add(TAXON_INCREMENT)
}
