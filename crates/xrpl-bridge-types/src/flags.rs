//! Flag registry.
//!
//! Six static tables describe the bit flags the bridge reads and writes:
//! account state (`lsf*`), `OfferCreate` transactions, offer ledger objects
//! (`lsf*`), NFToken mints, NFToken offers and payments. Offer objects get
//! their own table because their bits differ from the transaction's:
//! `lsfSell` shares its mask with `tfImmediateOrCancel`. Each descriptor carries its mask and, for account flags, the
//! `AccountSet` toggle that sets or clears it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BridgeError, Result};

// ===========================================================================
// Transaction flag constants
// ===========================================================================

// OfferCreate
pub const TF_PASSIVE: u32 = 0x0001_0000;
pub const TF_IMMEDIATE_OR_CANCEL: u32 = 0x0002_0000;
pub const TF_FILL_OR_KILL: u32 = 0x0004_0000;
pub const TF_SELL: u32 = 0x0008_0000;

// NFTokenMint
pub const TF_BURNABLE: u32 = 0x0000_0001;
pub const TF_ONLY_XRP: u32 = 0x0000_0002;
pub const TF_TRANSFERABLE: u32 = 0x0000_0008;

// NFTokenCreateOffer
pub const TF_SELL_NFTOKEN: u32 = 0x0000_0001;

// Payment
pub const TF_NO_DIRECT_RIPPLE: u32 = 0x0001_0000;
pub const TF_PARTIAL_PAYMENT: u32 = 0x0002_0000;
pub const TF_LIMIT_QUALITY: u32 = 0x0004_0000;

// TrustSet
pub const TF_SETF_AUTH: u32 = 0x0001_0000;
pub const TF_SET_NO_RIPPLE: u32 = 0x0002_0000;
pub const TF_CLEAR_NO_RIPPLE: u32 = 0x0004_0000;
pub const TF_SET_FREEZE: u32 = 0x0010_0000;
pub const TF_CLEAR_FREEZE: u32 = 0x0020_0000;

/// Ledger `Flags` bit marking an account as an AMM instance.
pub const LSF_AMM: u32 = 0x0200_0000;

/// Ledger `Flags` bit on an offer object created as passive.
pub const LSF_PASSIVE: u32 = 0x0001_0000;

/// Ledger `Flags` bit on an offer object created with `tfSell`.
pub const LSF_SELL: u32 = 0x0002_0000;

// ===========================================================================
// AccountSet toggles
// ===========================================================================

/// `AccountSet` flag numbers (`SetFlag` / `ClearFlag` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountSetFlag {
    RequireDest,
    RequireAuth,
    DisallowXrp,
    DisableMaster,
    AccountTxnId,
    NoFreeze,
    GlobalFreeze,
    DefaultRipple,
    DepositAuth,
    AuthorizedNfTokenMinter,
    DisallowIncomingNfTokenOffer,
    DisallowIncomingCheck,
    DisallowIncomingPayChan,
    DisallowIncomingTrustline,
}

impl AccountSetFlag {
    pub const ALL: [Self; 14] = [
        Self::RequireDest,
        Self::RequireAuth,
        Self::DisallowXrp,
        Self::DisableMaster,
        Self::AccountTxnId,
        Self::NoFreeze,
        Self::GlobalFreeze,
        Self::DefaultRipple,
        Self::DepositAuth,
        Self::AuthorizedNfTokenMinter,
        Self::DisallowIncomingNfTokenOffer,
        Self::DisallowIncomingCheck,
        Self::DisallowIncomingPayChan,
        Self::DisallowIncomingTrustline,
    ];

    /// Numeric value sent in `SetFlag` / `ClearFlag`.
    #[must_use]
    pub fn value(self) -> u32 {
        match self {
            Self::RequireDest => 1,
            Self::RequireAuth => 2,
            Self::DisallowXrp => 3,
            Self::DisableMaster => 4,
            Self::AccountTxnId => 5,
            Self::NoFreeze => 6,
            Self::GlobalFreeze => 7,
            Self::DefaultRipple => 8,
            Self::DepositAuth => 9,
            Self::AuthorizedNfTokenMinter => 10,
            Self::DisallowIncomingNfTokenOffer => 12,
            Self::DisallowIncomingCheck => 13,
            Self::DisallowIncomingPayChan => 14,
            Self::DisallowIncomingTrustline => 15,
        }
    }

    /// Protocol name (`asfDefaultRipple`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RequireDest => "asfRequireDest",
            Self::RequireAuth => "asfRequireAuth",
            Self::DisallowXrp => "asfDisallowXRP",
            Self::DisableMaster => "asfDisableMaster",
            Self::AccountTxnId => "asfAccountTxnID",
            Self::NoFreeze => "asfNoFreeze",
            Self::GlobalFreeze => "asfGlobalFreeze",
            Self::DefaultRipple => "asfDefaultRipple",
            Self::DepositAuth => "asfDepositAuth",
            Self::AuthorizedNfTokenMinter => "asfAuthorizedNFTokenMinter",
            Self::DisallowIncomingNfTokenOffer => "asfDisallowIncomingNFTokenOffer",
            Self::DisallowIncomingCheck => "asfDisallowIncomingCheck",
            Self::DisallowIncomingPayChan => "asfDisallowIncomingPayChan",
            Self::DisallowIncomingTrustline => "asfDisallowIncomingTrustline",
        }
    }
}

impl fmt::Display for AccountSetFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccountSetFlag {
    type Err = BridgeError;

    /// Accepts the `asf*` spelling or the `lsf*` name of the ledger bit
    /// the toggle controls.
    fn from_str(s: &str) -> Result<Self> {
        if let Some(flag) = Self::ALL.into_iter().find(|f| f.name() == s) {
            return Ok(flag);
        }
        ACCOUNT_FLAGS
            .iter()
            .find(|d| d.name == s)
            .and_then(|d| d.toggle)
            .ok_or_else(|| BridgeError::UnknownFlag(s.to_string()))
    }
}

/// The `SetFlag` / `ClearFlag` half of an `AccountSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSetToggle {
    Set(AccountSetFlag),
    Clear(AccountSetFlag),
}

impl AccountSetToggle {
    #[must_use]
    pub fn flag(self) -> AccountSetFlag {
        match self {
            Self::Set(f) | Self::Clear(f) => f,
        }
    }
}

/// Resolve a flag name to the `AccountSet` operation that enables or
/// disables it.
pub fn encode_toggle(name: &str, enable: bool) -> Result<AccountSetToggle> {
    let flag = name.parse::<AccountSetFlag>()?;
    Ok(if enable {
        AccountSetToggle::Set(flag)
    } else {
        AccountSetToggle::Clear(flag)
    })
}

// ===========================================================================
// Descriptors
// ===========================================================================

/// Static metadata for one flag bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagDescriptor {
    pub name: &'static str,
    pub mask: u32,
    /// `AccountSet` toggle for account flags that can be changed.
    pub toggle: Option<AccountSetFlag>,
    pub description: &'static str,
}

const fn flag(
    name: &'static str,
    mask: u32,
    toggle: Option<AccountSetFlag>,
    description: &'static str,
) -> FlagDescriptor {
    FlagDescriptor {
        name,
        mask,
        toggle,
        description,
    }
}

pub static ACCOUNT_FLAGS: [FlagDescriptor; 14] = [
    flag(
        "lsfDefaultRipple",
        0x0080_0000,
        Some(AccountSetFlag::DefaultRipple),
        "Enable rippling on this account's trust lines by default.",
    ),
    flag(
        "lsfDepositAuth",
        0x0100_0000,
        Some(AccountSetFlag::DepositAuth),
        "Only accept payments from preauthorized senders.",
    ),
    flag(
        "lsfDisableMaster",
        0x0010_0000,
        Some(AccountSetFlag::DisableMaster),
        "The master key pair cannot sign transactions.",
    ),
    flag(
        "lsfDisallowIncomingCheck",
        0x0800_0000,
        Some(AccountSetFlag::DisallowIncomingCheck),
        "Block incoming checks.",
    ),
    flag(
        "lsfDisallowIncomingNFTokenOffer",
        0x0400_0000,
        Some(AccountSetFlag::DisallowIncomingNfTokenOffer),
        "Block incoming NFToken offers.",
    ),
    flag(
        "lsfDisallowIncomingPayChan",
        0x1000_0000,
        Some(AccountSetFlag::DisallowIncomingPayChan),
        "Block incoming payment channels.",
    ),
    flag(
        "lsfDisallowIncomingTrustline",
        0x2000_0000,
        Some(AccountSetFlag::DisallowIncomingTrustline),
        "Block incoming trust lines.",
    ),
    flag(
        "lsfDisallowXRP",
        0x0008_0000,
        Some(AccountSetFlag::DisallowXrp),
        "Client applications should not send XRP to this account.",
    ),
    flag(
        "lsfGlobalFreeze",
        0x0040_0000,
        Some(AccountSetFlag::GlobalFreeze),
        "All assets issued by this account are frozen.",
    ),
    flag(
        "lsfNoFreeze",
        0x0020_0000,
        Some(AccountSetFlag::NoFreeze),
        "This account has permanently given up the ability to freeze trust lines.",
    ),
    flag(
        "lsfPasswordSpent",
        0x0001_0000,
        None,
        "The account has used its free SetRegularKey transaction.",
    ),
    flag(
        "lsfRequireAuth",
        0x0004_0000,
        Some(AccountSetFlag::RequireAuth),
        "Trust lines to this account must be authorized.",
    ),
    flag(
        "lsfRequireDestTag",
        0x0002_0000,
        Some(AccountSetFlag::RequireDest),
        "Incoming payments must carry a destination tag.",
    ),
    flag(
        "lsfAMM",
        LSF_AMM,
        None,
        "This account is an Automated Market Maker instance.",
    ),
];

pub static OFFER_FLAGS: [FlagDescriptor; 4] = [
    flag(
        "tfPassive",
        TF_PASSIVE,
        None,
        "Do not consume offers that exactly match; rest in the book instead.",
    ),
    flag(
        "tfImmediateOrCancel",
        TF_IMMEDIATE_OR_CANCEL,
        None,
        "Trade what crosses now and never rest in the book.",
    ),
    flag(
        "tfFillOrKill",
        TF_FILL_OR_KILL,
        None,
        "Cancel unless the full amount can be filled immediately.",
    ),
    flag(
        "tfSell",
        TF_SELL,
        None,
        "Exchange the entire TakerGets amount, even for more than TakerPays.",
    ),
];

pub static OFFER_OBJECT_FLAGS: [FlagDescriptor; 2] = [
    flag(
        "lsfPassive",
        LSF_PASSIVE,
        None,
        "The offer was placed as passive and does not cross equal-quality offers.",
    ),
    flag(
        "lsfSell",
        LSF_SELL,
        None,
        "The offer was placed as a sell offer.",
    ),
];

pub static NFTOKEN_FLAGS: [FlagDescriptor; 3] = [
    flag(
        "tfBurnable",
        TF_BURNABLE,
        None,
        "The issuer may destroy the token.",
    ),
    flag(
        "tfOnlyXRP",
        TF_ONLY_XRP,
        None,
        "The token can only be traded for XRP.",
    ),
    flag(
        "tfTransferable",
        TF_TRANSFERABLE,
        None,
        "The token can be transferred between third parties.",
    ),
];

pub static NFTOKEN_OFFER_FLAGS: [FlagDescriptor; 1] = [flag(
    "tfSellNFToken",
    TF_SELL_NFTOKEN,
    None,
    "The offer is a sell offer; otherwise it is a buy offer.",
)];

pub static PAYMENT_FLAGS: [FlagDescriptor; 3] = [
    flag(
        "tfNoDirectRipple",
        TF_NO_DIRECT_RIPPLE,
        None,
        "Only use the paths in the Paths field.",
    ),
    flag(
        "tfPartialPayment",
        TF_PARTIAL_PAYMENT,
        None,
        "Deliver less than Amount rather than exceed SendMax.",
    ),
    flag(
        "tfLimitQuality",
        TF_LIMIT_QUALITY,
        None,
        "Only take paths at or better than the Amount:SendMax ratio.",
    ),
];

// ===========================================================================
// Registry
// ===========================================================================

/// The six flag tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagRegistry {
    Account,
    Offer,
    OfferObject,
    NfToken,
    NfTokenOffer,
    Payment,
}

impl fmt::Display for FlagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => write!(f, "ACCOUNT"),
            Self::Offer => write!(f, "OFFER"),
            Self::OfferObject => write!(f, "OFFER_OBJECT"),
            Self::NfToken => write!(f, "NFTOKEN"),
            Self::NfTokenOffer => write!(f, "NFTOKEN_OFFER"),
            Self::Payment => write!(f, "PAYMENT"),
        }
    }
}

impl FlagRegistry {
    #[must_use]
    pub fn descriptors(self) -> &'static [FlagDescriptor] {
        match self {
            Self::Account => &ACCOUNT_FLAGS,
            Self::Offer => &OFFER_FLAGS,
            Self::OfferObject => &OFFER_OBJECT_FLAGS,
            Self::NfToken => &NFTOKEN_FLAGS,
            Self::NfTokenOffer => &NFTOKEN_OFFER_FLAGS,
            Self::Payment => &PAYMENT_FLAGS,
        }
    }

    /// OR of every mask in the table.
    #[must_use]
    pub fn union_mask(self) -> u32 {
        self.descriptors().iter().fold(0, |acc, d| acc | d.mask)
    }

    /// Look up a descriptor by name.
    pub fn lookup(self, name: &str) -> Result<&'static FlagDescriptor> {
        self.descriptors()
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| BridgeError::UnknownFlag(format!("{name} ({self})")))
    }
}

/// Every descriptor of `registry` whose mask is fully set in `bits`.
/// Bits not described by the registry are ignored.
#[must_use]
pub fn decode(bits: u32, registry: FlagRegistry) -> Vec<&'static FlagDescriptor> {
    registry
        .descriptors()
        .iter()
        .filter(|d| bits & d.mask == d.mask)
        .collect()
}

/// OR the masks of `descriptors`.
#[must_use]
pub fn encode_from(descriptors: &[&FlagDescriptor]) -> u32 {
    descriptors.iter().fold(0, |acc, d| acc | d.mask)
}

/// Whether account `Flags` mark an AMM instance.
#[must_use]
pub fn is_amm(bits: u32) -> bool {
    bits & LSF_AMM == LSF_AMM
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    const ALL_REGISTRIES: [FlagRegistry; 6] = [
        FlagRegistry::Account,
        FlagRegistry::Offer,
        FlagRegistry::OfferObject,
        FlagRegistry::NfToken,
        FlagRegistry::NfTokenOffer,
        FlagRegistry::Payment,
    ];

    #[test]
    fn amm_account_decodes_exactly() {
        let bits = 0x0200_0000 | 0x0080_0000;
        let names: Vec<&str> = decode(bits, FlagRegistry::Account)
            .iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"lsfDefaultRipple"));
        assert!(names.contains(&"lsfAMM"));
        assert!(is_amm(bits));
        assert!(!is_amm(0x0080_0000));
    }

    #[test]
    fn decode_then_encode_masks_unknown_bits() {
        let mut rng = rand::thread_rng();
        for registry in ALL_REGISTRIES {
            for _ in 0..200 {
                let bits: u32 = rng.r#gen();
                let decoded = decode(bits, registry);
                assert_eq!(encode_from(&decoded), bits & registry.union_mask());
            }
        }
    }

    #[test]
    fn masks_unique_within_registry() {
        for registry in ALL_REGISTRIES {
            let descriptors = registry.descriptors();
            for (i, a) in descriptors.iter().enumerate() {
                for b in &descriptors[i + 1..] {
                    assert_ne!(a.mask, b.mask, "{registry}: {} vs {}", a.name, b.name);
                }
            }
        }
    }

    #[test]
    fn toggle_by_asf_or_lsf_name() {
        assert_eq!(
            encode_toggle("asfDefaultRipple", true).unwrap(),
            AccountSetToggle::Set(AccountSetFlag::DefaultRipple)
        );
        assert_eq!(
            encode_toggle("lsfRequireDestTag", false).unwrap(),
            AccountSetToggle::Clear(AccountSetFlag::RequireDest)
        );
        assert_eq!(
            encode_toggle("asfAuthorizedNFTokenMinter", true)
                .unwrap()
                .flag()
                .value(),
            10
        );
    }

    #[test]
    fn toggle_unknown_or_read_only_flag() {
        assert!(matches!(
            encode_toggle("lsfAMM", true),
            Err(BridgeError::UnknownFlag(_))
        ));
        assert!(matches!(
            encode_toggle("asfNope", true),
            Err(BridgeError::UnknownFlag(_))
        ));
    }

    #[test]
    fn account_descriptors_link_to_toggles() {
        for d in &ACCOUNT_FLAGS {
            if let Some(toggle) = d.toggle {
                assert_eq!(d.name.parse::<AccountSetFlag>().unwrap(), toggle);
            }
        }
    }

    #[test]
    fn offer_object_bits_differ_from_transaction_bits() {
        let names: Vec<&str> = decode(LSF_SELL, FlagRegistry::OfferObject)
            .iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["lsfSell"]);
        assert_eq!(decode(LSF_SELL, FlagRegistry::Offer)[0].name, "tfImmediateOrCancel");
        assert_eq!(
            decode(LSF_PASSIVE | LSF_SELL, FlagRegistry::OfferObject).len(),
            2
        );
    }

    #[test]
    fn registry_lookup() {
        assert_eq!(FlagRegistry::Offer.lookup("tfSell").unwrap().mask, TF_SELL);
        assert!(FlagRegistry::Payment.lookup("tfSell").is_err());
    }
}
