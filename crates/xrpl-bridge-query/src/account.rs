//! Normalizers for account-level queries: `account_info`,
//! `account_lines`, `account_nfts` and `gateway_balances`.

use serde_json::{Map, Value};
use xrpl_bridge_types::{
    AccountBalance, AccountInfo, BridgeError, HeldToken, IssuedToken, NftRecord, Result,
    TrustLine, display_symbol, drops_to_xrp, is_lp_token_code, xrp_format_to_nft_fee,
    xrp_format_to_transfer_fee,
};

use crate::raw;

fn currency(obj: &Map<String, Value>, key: &str) -> Result<String> {
    display_symbol(raw::string(obj, key)?).map_err(|e| BridgeError::malformed(key, e.to_string()))
}

/// `account_info` → [`AccountInfo`].
pub fn parse_account_info(response: &Value) -> Result<AccountInfo> {
    let data = raw::object(raw::result(response)?, "account_data")?;
    let transfer_fee = match raw::opt_uint(data, "TransferRate")? {
        Some(rate) => Some(
            xrp_format_to_transfer_fee(u64::from(rate))
                .map_err(|e| BridgeError::malformed("TransferRate", e.to_string()))?,
        ),
        None => None,
    };
    let tick_size = raw::opt_uint(data, "TickSize")?
        .map(|t| u8::try_from(t).map_err(|_| BridgeError::malformed("TickSize", "out of range")))
        .transpose()?;
    Ok(AccountInfo {
        index: raw::string(data, "index")?.to_string(),
        address: raw::string(data, "Account")?.to_string(),
        balance: drops_to_xrp(raw::drops(data, "Balance")?),
        object_type: raw::string(data, "LedgerEntryType")?.to_string(),
        owner_count: raw::uint(data, "OwnerCount")?,
        sequence: raw::uint(data, "Sequence")?,
        flags: raw::flags(data, "Flags")?,
        tick_size,
        transfer_fee,
        domain: raw::opt_hex_text(data, "Domain")?,
        email_hash: raw::opt_string(data, "EmailHash")?,
    })
}

/// `account_info` → [`AccountBalance`] with the spendable amount.
pub fn parse_account_balance(response: &Value) -> Result<AccountBalance> {
    let data = raw::object(raw::result(response)?, "account_data")?;
    Ok(AccountBalance::from_drops(
        raw::string(data, "Account")?,
        raw::drops(data, "Balance")?,
        raw::uint(data, "OwnerCount")?,
    ))
}

/// `account_lines` → one [`TrustLine`] per line. LP-token lines keep their
/// raw hex code.
pub fn parse_account_lines(response: &Value) -> Result<Vec<TrustLine>> {
    raw::objects(raw::result(response)?, "lines")?
        .into_iter()
        .map(|line| {
            let code = raw::string(line, "currency")?;
            Ok(TrustLine {
                currency: currency(line, "currency")?,
                issuer: raw::string(line, "account")?.to_string(),
                balance: raw::decimal(line, "balance")?,
                limit: raw::decimal(line, "limit")?,
                no_ripple: raw::opt_bool(line, "no_ripple")?,
                freeze: raw::opt_bool(line, "freeze")?,
                is_lp_token: is_lp_token_code(code),
            })
        })
        .collect()
}

/// `account_nfts` → [`NftRecord`]s.
pub fn parse_account_nfts(response: &Value) -> Result<Vec<NftRecord>> {
    raw::objects(raw::result(response)?, "account_nfts")?
        .into_iter()
        .map(|nft| {
            let fee = raw::opt_uint(nft, "TransferFee")?.unwrap_or(0);
            Ok(NftRecord {
                nftoken_id: raw::string(nft, "NFTokenID")?.to_string(),
                issuer: raw::string(nft, "Issuer")?.to_string(),
                flags: raw::flags(nft, "Flags")?,
                taxon: raw::uint(nft, "NFTokenTaxon")?,
                serial: raw::uint(nft, "nft_serial")?,
                uri: raw::opt_hex_text(nft, "URI")?,
                transfer_fee: xrp_format_to_nft_fee(fee)
                    .map_err(|e| BridgeError::malformed("TransferFee", e.to_string()))?,
            })
        })
        .collect()
}

/// `gateway_balances.obligations` → tokens the account has issued.
pub fn parse_gateway_obligations(response: &Value) -> Result<Vec<IssuedToken>> {
    let result = raw::result(response)?;
    let issuer = raw::string(result, "account")?;
    let Some(obligations) = result.get("obligations") else {
        return Ok(Vec::new());
    };
    let obligations = obligations
        .as_object()
        .ok_or_else(|| BridgeError::malformed("obligations", "expected an object"))?;
    obligations
        .keys()
        .map(|code| {
            Ok(IssuedToken {
                currency: display_symbol(code)
                    .map_err(|e| BridgeError::malformed("obligations", e.to_string()))?,
                issuer: issuer.to_string(),
                outstanding: raw::decimal(obligations, code)?,
            })
        })
        .collect()
}

/// `gateway_balances.assets` → tokens from other issuers the account holds.
pub fn parse_gateway_assets(response: &Value) -> Result<Vec<HeldToken>> {
    let result = raw::result(response)?;
    let holder = raw::string(result, "account")?;
    let Some(assets) = result.get("assets") else {
        return Ok(Vec::new());
    };
    let assets = assets
        .as_object()
        .ok_or_else(|| BridgeError::malformed("assets", "expected an object"))?;
    let mut held = Vec::new();
    for issuer in assets.keys() {
        for balance in raw::objects(assets, issuer)? {
            held.push(HeldToken {
                currency: currency(balance, "currency")?,
                issuer: issuer.clone(),
                holder: holder.to_string(),
                amount: raw::decimal(balance, "value")?,
            });
        }
    }
    Ok(held)
}
