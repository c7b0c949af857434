//! Account settings (`AccountSet`) and account deletion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use xrpl_bridge_types::constants::{TICK_SIZE_MAX, TICK_SIZE_MIN};
use xrpl_bridge_types::{
    AccountSetFlag, AccountSetToggle, BridgeError, Result, TransactionIntent, TransactionKind,
    encode_toggle, text_to_hex, transfer_fee_to_xrp_format,
};

use crate::TxBuilder;
use crate::builder::{require_address, require_distinct, require_hex};

const MAX_DOMAIN_BYTES: usize = 256;
const EMAIL_HASH_HEX_LEN: usize = 32;

/// One-shot setup of a token issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerSettingsParams {
    pub account: String,
    pub domain: String,
    pub tick_size: Option<u8>,
    /// Percentage charged when holders transfer the issuer's tokens.
    pub transfer_fee: Option<Decimal>,
    pub fee_drops: Option<u64>,
}

/// One-shot setup of an account that manages an issuer's tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSettingsParams {
    pub account: String,
    pub domain: String,
    pub fee_drops: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDeleteParams {
    pub account: String,
    /// Receives the remaining XRP.
    pub destination: String,
    pub destination_tag: Option<u32>,
    pub fee_drops: Option<u64>,
}

/// The optional fields of an `AccountSet`.
#[derive(Debug, Default)]
struct AccountSetFields {
    set_flag: Option<AccountSetFlag>,
    clear_flag: Option<AccountSetFlag>,
    domain: Option<String>,
    email_hash: Option<String>,
    transfer_rate: Option<u64>,
    tick_size: Option<u8>,
    nftoken_minter: Option<String>,
}

fn encode_domain(domain: &str) -> Result<String> {
    if domain.len() > MAX_DOMAIN_BYTES {
        return Err(BridgeError::invalid_param(
            "domain",
            format!("{} bytes, at most {MAX_DOMAIN_BYTES}", domain.len()),
        ));
    }
    Ok(text_to_hex(&domain.to_ascii_lowercase()))
}

fn check_tick_size(tick_size: u8) -> Result<u8> {
    // 0 clears the setting.
    if tick_size != 0 && !(TICK_SIZE_MIN..=TICK_SIZE_MAX).contains(&tick_size) {
        return Err(BridgeError::invalid_param(
            "tick_size",
            format!("{tick_size} is outside 0 or {TICK_SIZE_MIN}..={TICK_SIZE_MAX}"),
        ));
    }
    Ok(tick_size)
}

impl TxBuilder {
    fn account_set(
        &self,
        account: &str,
        fields: AccountSetFields,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        self.finish(
            account,
            TransactionKind::AccountSet {
                set_flag: fields.set_flag.map(AccountSetFlag::value),
                clear_flag: fields.clear_flag.map(AccountSetFlag::value),
                domain: fields.domain,
                email_hash: fields.email_hash,
                transfer_rate: fields.transfer_rate,
                tick_size: fields.tick_size,
                nftoken_minter: fields.nftoken_minter,
            },
            fee_drops,
            0,
        )
    }

    /// Enable rippling and set domain, tick size and transfer fee.
    pub fn accountset_issuer(&self, p: &IssuerSettingsParams) -> Result<TransactionIntent> {
        let fields = AccountSetFields {
            set_flag: Some(AccountSetFlag::DefaultRipple),
            domain: Some(encode_domain(&p.domain)?),
            tick_size: p.tick_size.map(check_tick_size).transpose()?,
            transfer_rate: p.transfer_fee.map(transfer_fee_to_xrp_format).transpose()?,
            ..AccountSetFields::default()
        };
        self.account_set(&p.account, fields, p.fee_drops)
    }

    /// Require authorization for trust lines and set the domain.
    pub fn accountset_manager(&self, p: &ManagerSettingsParams) -> Result<TransactionIntent> {
        let fields = AccountSetFields {
            set_flag: Some(AccountSetFlag::RequireAuth),
            domain: Some(encode_domain(&p.domain)?),
            ..AccountSetFields::default()
        };
        self.account_set(&p.account, fields, p.fee_drops)
    }

    /// An empty domain clears it.
    pub fn modify_domain(
        &self,
        account: &str,
        domain: &str,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        let fields = AccountSetFields {
            domain: Some(encode_domain(domain)?),
            ..AccountSetFields::default()
        };
        self.account_set(account, fields, fee_drops)
    }

    pub fn modify_transfer_fee(
        &self,
        account: &str,
        percent: Decimal,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        let fields = AccountSetFields {
            transfer_rate: Some(transfer_fee_to_xrp_format(percent)?),
            ..AccountSetFields::default()
        };
        self.account_set(account, fields, fee_drops)
    }

    pub fn modify_tick_size(
        &self,
        account: &str,
        tick_size: u8,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        let fields = AccountSetFields {
            tick_size: Some(check_tick_size(tick_size)?),
            ..AccountSetFields::default()
        };
        self.account_set(account, fields, fee_drops)
    }

    /// `email_hash` is the 128-bit MD5 of the address, as hex.
    pub fn modify_email_hash(
        &self,
        account: &str,
        email_hash: &str,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        require_hex("email_hash", email_hash, EMAIL_HASH_HEX_LEN)?;
        let fields = AccountSetFields {
            email_hash: Some(email_hash.to_ascii_uppercase()),
            ..AccountSetFields::default()
        };
        self.account_set(account, fields, fee_drops)
    }

    /// Set or clear an account flag by its `asf`/`lsf` name.
    /// Enabling `asfAuthorizedNFTokenMinter` needs the minter's address.
    pub fn toggle_account_flag(
        &self,
        account: &str,
        flag_name: &str,
        enable: bool,
        minter: Option<&str>,
        fee_drops: Option<u64>,
    ) -> Result<TransactionIntent> {
        let toggle = encode_toggle(flag_name, enable)?;
        let nftoken_minter = match (toggle, minter) {
            (AccountSetToggle::Set(AccountSetFlag::AuthorizedNfTokenMinter), None) => {
                return Err(BridgeError::invalid_param(
                    "minter",
                    "asfAuthorizedNFTokenMinter needs the minter's address",
                ));
            }
            (AccountSetToggle::Set(AccountSetFlag::AuthorizedNfTokenMinter), Some(m)) => {
                require_address("minter", m)?;
                Some(m.to_string())
            }
            _ => None,
        };
        let fields = match toggle {
            AccountSetToggle::Set(f) => AccountSetFields {
                set_flag: Some(f),
                nftoken_minter,
                ..AccountSetFields::default()
            },
            AccountSetToggle::Clear(f) => AccountSetFields {
                clear_flag: Some(f),
                ..AccountSetFields::default()
            },
        };
        self.account_set(account, fields, fee_drops)
    }

    /// Remove the account and send its XRP to `destination`.
    pub fn delete_account(&self, p: &AccountDeleteParams) -> Result<TransactionIntent> {
        require_address("destination", &p.destination)?;
        require_distinct("destination", &p.account, &p.destination)?;
        self.finish(
            &p.account,
            TransactionKind::AccountDelete {
                destination: p.destination.clone(),
                destination_tag: p.destination_tag,
            },
            p.fee_drops,
            0,
        )
    }
}
