//! Network selection and explorer links.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BridgeError, Result};

pub const TESTNET_QUERY_ENDPOINT: &str = "https://s.altnet.rippletest.net:51234";
pub const TESTNET_ACCOUNT_EXPLORER: &str = "https://testnet.xrpl.org/accounts/";
pub const TESTNET_TX_EXPLORER: &str = "https://testnet.xrpl.org/transactions/";

pub const MAINNET_QUERY_ENDPOINT: &str = "https://xrplcluster.com";
pub const MAINNET_ACCOUNT_EXPLORER: &str = "https://livenet.xrpl.org/accounts/";
pub const MAINNET_TX_EXPLORER: &str = "https://livenet.xrpl.org/transactions/";

/// Which ledger network a client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Testnet => write!(f, "testnet"),
            Self::Mainnet => write!(f, "mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(BridgeError::Configuration(format!(
                "unknown network {other:?} (expected testnet or mainnet)"
            ))),
        }
    }
}

/// Endpoints for one network. Immutable once built; switching network
/// means building a new profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    network: Network,
    query_endpoint: String,
    account_explorer_url: String,
    tx_explorer_url: String,
}

impl NetworkProfile {
    /// The public endpoints of `network`.
    #[must_use]
    pub fn for_network(network: Network) -> Self {
        let (query, accounts, txs) = match network {
            Network::Testnet => (
                TESTNET_QUERY_ENDPOINT,
                TESTNET_ACCOUNT_EXPLORER,
                TESTNET_TX_EXPLORER,
            ),
            Network::Mainnet => (
                MAINNET_QUERY_ENDPOINT,
                MAINNET_ACCOUNT_EXPLORER,
                MAINNET_TX_EXPLORER,
            ),
        };
        Self {
            network,
            query_endpoint: query.to_string(),
            account_explorer_url: accounts.to_string(),
            tx_explorer_url: txs.to_string(),
        }
    }

    /// A profile with caller-chosen endpoints (e.g. a private node).
    pub fn custom(
        network: Network,
        query_endpoint: impl Into<String>,
        account_explorer_url: impl Into<String>,
        tx_explorer_url: impl Into<String>,
    ) -> Result<Self> {
        let profile = Self {
            network,
            query_endpoint: query_endpoint.into(),
            account_explorer_url: account_explorer_url.into(),
            tx_explorer_url: tx_explorer_url.into(),
        };
        for (name, value) in [
            ("query_endpoint", &profile.query_endpoint),
            ("account_explorer_url", &profile.account_explorer_url),
            ("tx_explorer_url", &profile.tx_explorer_url),
        ] {
            if value.trim().is_empty() {
                return Err(BridgeError::Configuration(format!("{name} is empty")));
            }
        }
        Ok(profile)
    }

    #[must_use]
    pub fn network(&self) -> Network {
        self.network
    }

    #[must_use]
    pub fn query_endpoint(&self) -> &str {
        &self.query_endpoint
    }

    #[must_use]
    pub fn account_explorer_url(&self) -> &str {
        &self.account_explorer_url
    }

    #[must_use]
    pub fn tx_explorer_url(&self) -> &str {
        &self.tx_explorer_url
    }

    /// Explorer link for an account.
    #[must_use]
    pub fn account_link(&self, address: &str) -> String {
        format!("{}{address}", self.account_explorer_url)
    }

    /// Explorer link for a transaction hash.
    #[must_use]
    pub fn transaction_link(&self, hash: &str) -> String {
        format!("{}{hash}", self.tx_explorer_url)
    }
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self::for_network(Network::default())
    }
}
