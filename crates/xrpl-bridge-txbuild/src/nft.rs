//! NFTokens: minting, burning, trading and direct transfers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use xrpl_bridge_types::flags::{TF_BURNABLE, TF_ONLY_XRP, TF_SELL_NFTOKEN, TF_TRANSFERABLE};
use xrpl_bridge_types::{
    AmountSpec, BridgeError, NfTokenId, Result, TransactionIntent, TransactionKind, WireAmount,
    nft_fee_to_xrp_format, text_to_hex,
};

use crate::TxBuilder;
use crate::builder::{protocol_time, require_address, require_distinct, require_hex};

const NFTOKEN_ID_HEX_LEN: usize = 64;
const OFFER_ID_HEX_LEN: usize = 64;
const MAX_URI_BYTES: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintNftParams {
    pub account: String,
    pub taxon: u32,
    /// Plain-text URI; hex-encoded on the wire.
    pub uri: Option<String>,
    /// Royalty percentage (0..=50) paid to the issuer on resale.
    pub transfer_fee: Option<Decimal>,
    #[serde(default)]
    pub transferable: bool,
    #[serde(default)]
    pub only_xrp: bool,
    #[serde(default)]
    pub burnable: bool,
    /// Mint on behalf of this issuer (the account is its authorized minter).
    pub issuer: Option<String>,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnNftParams {
    pub account: String,
    pub nftoken_id: String,
    /// Current holder when it is not `account`.
    pub holder: Option<String>,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftSellOfferParams {
    pub account: String,
    pub nftoken_id: String,
    pub amount: AmountSpec,
    /// Only this account may accept.
    pub destination: Option<String>,
    pub expiration: Option<DateTime<Utc>>,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftBuyOfferParams {
    pub account: String,
    pub nftoken_id: String,
    pub amount: AmountSpec,
    /// Current holder of the token.
    pub owner: String,
    pub expiration: Option<DateTime<Utc>>,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptNftOfferParams {
    pub account: String,
    pub sell_offer: Option<String>,
    pub buy_offer: Option<String>,
    /// Brokered mode only: the broker's cut, from the buyer's payment.
    pub broker_fee: Option<AmountSpec>,
    pub fee_drops: Option<u64>,
}

/// Give a token to `destination` for free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendNftParams {
    pub account: String,
    pub nftoken_id: String,
    pub destination: String,
    pub fee_drops: Option<u64>,
}

fn parse_token(nftoken_id: &str) -> Result<NfTokenId> {
    require_hex("nftoken_id", nftoken_id, NFTOKEN_ID_HEX_LEN)?;
    NfTokenId::parse(nftoken_id)
}

fn require_offer_id(field: &'static str, id: &str) -> Result<()> {
    require_hex(field, id, OFFER_ID_HEX_LEN)
}

fn mint_flags(p: &MintNftParams) -> u32 {
    let mut flags = 0;
    for (set, mask) in [
        (p.burnable, TF_BURNABLE),
        (p.only_xrp, TF_ONLY_XRP),
        (p.transferable, TF_TRANSFERABLE),
    ] {
        if set {
            flags |= mask;
        }
    }
    flags
}

impl TxBuilder {
    pub fn mint_nft(&self, p: &MintNftParams) -> Result<TransactionIntent> {
        let transfer_fee = match p.transfer_fee {
            Some(fee) if !fee.is_zero() && !p.transferable => {
                return Err(BridgeError::invalid_param(
                    "transfer_fee",
                    "a royalty needs a transferable token",
                ));
            }
            Some(fee) => Some(nft_fee_to_xrp_format(fee)?),
            None => None,
        };
        if p.uri.as_ref().is_some_and(|u| u.len() > MAX_URI_BYTES) {
            return Err(BridgeError::invalid_param(
                "uri",
                format!("longer than {MAX_URI_BYTES} bytes"),
            ));
        }
        let uri = p.uri.as_deref().map(text_to_hex);
        self.finish(
            &p.account,
            TransactionKind::NfTokenMint {
                taxon: p.taxon,
                uri,
                transfer_fee,
                issuer: p.issuer.clone(),
            },
            p.fee_drops,
            mint_flags(p),
        )
    }

    /// Burn a token. The issuer may burn a token someone else holds only
    /// when it was minted burnable.
    pub fn burn_nft(&self, p: &BurnNftParams) -> Result<TransactionIntent> {
        let token = parse_token(&p.nftoken_id)?;
        let owner = p.holder.as_ref().filter(|h| **h != p.account);
        if owner.is_some() && !token.is_burnable() {
            return Err(BridgeError::InvalidNfToken {
                reason: format!("{} is not burnable by its issuer", p.nftoken_id),
            });
        }
        self.finish(
            &p.account,
            TransactionKind::NfTokenBurn {
                nftoken_id: p.nftoken_id.clone(),
                owner: owner.cloned(),
            },
            p.fee_drops,
            0,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn nft_offer(
        &self,
        account: &str,
        nftoken_id: &str,
        amount: WireAmount,
        owner: Option<String>,
        destination: Option<String>,
        expiration: Option<DateTime<Utc>>,
        flags: u32,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        self.finish(
            account,
            TransactionKind::NfTokenCreateOffer {
                nftoken_id: nftoken_id.to_string(),
                amount,
                owner,
                destination,
                expiration: protocol_time(expiration)?,
            },
            fee_drops,
            flags,
        )
    }

    pub fn create_nft_sell_offer(&self, p: &NftSellOfferParams) -> Result<TransactionIntent> {
        let token = parse_token(&p.nftoken_id)?;
        if token.is_only_xrp() && !p.amount.is_native() {
            return Err(BridgeError::InvalidNfToken {
                reason: format!("{} can only be sold for XRP", p.nftoken_id),
            });
        }
        if let Some(d) = &p.destination {
            require_distinct("destination", &p.account, d)?;
        }
        self.nft_offer(
            &p.account,
            &p.nftoken_id,
            p.amount.to_wire()?,
            None,
            p.destination.clone(),
            p.expiration,
            TF_SELL_NFTOKEN,
            p.fee_drops,
        )
    }

    pub fn create_nft_buy_offer(&self, p: &NftBuyOfferParams) -> Result<TransactionIntent> {
        let token = parse_token(&p.nftoken_id)?;
        require_address("owner", &p.owner)?;
        require_distinct("owner", &p.account, &p.owner)?;
        if p.amount.value().is_zero() {
            return Err(BridgeError::invalid_param("amount", "a buy offer must offer something"));
        }
        if token.is_only_xrp() && !p.amount.is_native() {
            return Err(BridgeError::InvalidNfToken {
                reason: format!("{} can only be bought with XRP", p.nftoken_id),
            });
        }
        self.nft_offer(
            &p.account,
            &p.nftoken_id,
            p.amount.to_wire()?,
            Some(p.owner.clone()),
            None,
            p.expiration,
            0,
            p.fee_drops,
        )
    }

    pub fn cancel_nft_offers(
        &self,
        account: &str,
        offer_ids: &[String],
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        if offer_ids.is_empty() {
            return Err(BridgeError::invalid_param("offers", "nothing to cancel"));
        }
        for id in offer_ids {
            require_offer_id("offers", id)?;
        }
        self.finish(
            account,
            TransactionKind::NfTokenCancelOffer {
                offers: offer_ids.to_vec(),
            },
            fee_drops,
            0,
        )
    }

    /// Accept a buy or sell offer directly, or match both as a broker.
    pub fn accept_nft_offer(&self, p: &AcceptNftOfferParams) -> Result<TransactionIntent> {
        match (&p.sell_offer, &p.buy_offer) {
            (None, None) => {
                return Err(BridgeError::invalid_param(
                    "sell_offer",
                    "accept needs a sell offer, a buy offer or both",
                ));
            }
            (Some(_), Some(_)) => {}
            _ if p.broker_fee.is_some() => {
                return Err(BridgeError::invalid_param(
                    "broker_fee",
                    "a broker fee is only valid when matching both offers",
                ));
            }
            _ => {}
        }
        for id in p.sell_offer.iter().chain(&p.buy_offer) {
            require_offer_id("offer", id)?;
        }
        self.finish(
            &p.account,
            TransactionKind::NfTokenAcceptOffer {
                sell_offer: p.sell_offer.clone(),
                buy_offer: p.buy_offer.clone(),
                broker_fee: p.broker_fee.as_ref().map(AmountSpec::to_wire).transpose()?,
            },
            p.fee_drops,
            0,
        )
    }

    /// Free sell offer only `destination` can accept.
    pub fn send_nft(&self, p: &SendNftParams) -> Result<TransactionIntent> {
        parse_token(&p.nftoken_id)?;
        require_address("destination", &p.destination)?;
        require_distinct("destination", &p.account, &p.destination)?;
        self.nft_offer(
            &p.account,
            &p.nftoken_id,
            WireAmount::Drops("0".to_string()),
            None,
            Some(p.destination.clone()),
            None,
            TF_SELL_NFTOKEN,
            p.fee_drops,
        )
    }

    /// Accept the sell offer created by [`send_nft`](Self::send_nft).
    pub fn receive_nft(
        &self,
        account: &str,
        sell_offer: &str,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        self.accept_nft_offer(&AcceptNftOfferParams {
            account: account.to_string(),
            sell_offer: Some(sell_offer.to_string()),
            buy_offer: None,
            broker_fee: None,
            fee_drops,
        })
    }
}
