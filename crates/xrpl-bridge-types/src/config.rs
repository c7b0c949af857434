//! Configuration types for bridge clients.

use serde::{Deserialize, Serialize};

use crate::{BridgeError, Network, NetworkProfile, Result, constants};

/// Configuration for a bridge client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Network selector (`"testnet"` / `"mainnet"`).
    pub network: Network,
    /// `SourceTag` stamped on every built transaction.
    pub source_tag: u32,
    /// Memo attached to every built transaction, if any.
    pub default_memo: Option<MemoConfig>,
    /// Endpoint overrides; the network's public endpoints are used otherwise.
    pub endpoints: Option<NetworkConfig>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            source_tag: constants::DEFAULT_SOURCE_TAG,
            default_memo: Some(MemoConfig::default()),
            endpoints: None,
        }
    }
}

/// Plain-text memo; hex-encoded when attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoConfig {
    pub memo_type: String,
    pub memo_data: String,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            memo_type: constants::DEFAULT_MEMO_TYPE.to_string(),
            memo_data: constants::DEFAULT_MEMO_DATA.to_string(),
        }
    }
}

/// Custom endpoints, e.g. a private node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub query_endpoint: String,
    pub account_explorer_url: String,
    pub tx_explorer_url: String,
}

impl BridgeConfig {
    /// Config for `network` with every other setting at its default.
    #[must_use]
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Parse a JSON config document. Missing keys take their defaults.
    pub fn from_json(doc: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(doc)
            .map_err(|e| BridgeError::Configuration(format!("invalid config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(memo) = &self.default_memo {
            if memo.memo_type.is_empty() && memo.memo_data.is_empty() {
                return Err(BridgeError::Configuration(
                    "default_memo has neither type nor data".into(),
                ));
            }
        }
        self.profile().map(|_| ())
    }

    /// The immutable network profile this config selects.
    pub fn profile(&self) -> Result<NetworkProfile> {
        match &self.endpoints {
            None => Ok(NetworkProfile::for_network(self.network)),
            Some(ep) => NetworkProfile::custom(
                self.network,
                ep.query_endpoint.clone(),
                ep.account_explorer_url.clone(),
                ep.tx_explorer_url.clone(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.network, Network::Testnet);
        assert_eq!(cfg.source_tag, 10_011_001);
        assert_eq!(
            cfg.default_memo.as_ref().unwrap().memo_type,
            "Done-with-Myrkle"
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_partial_document() {
        let cfg = BridgeConfig::from_json(r#"{"network": "mainnet"}"#).unwrap();
        assert_eq!(cfg.network, Network::Mainnet);
        assert_eq!(cfg.source_tag, constants::DEFAULT_SOURCE_TAG);
        assert_eq!(cfg.profile().unwrap().query_endpoint(), "https://xrplcluster.com");
    }

    #[test]
    fn from_json_custom_endpoints() {
        let cfg = BridgeConfig::from_json(
            r#"{
                "network": "mainnet",
                "source_tag": 7,
                "default_memo": null,
                "endpoints": {
                    "query_endpoint": "http://127.0.0.1:5005",
                    "account_explorer_url": "http://explorer/a/",
                    "tx_explorer_url": "http://explorer/t/"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.source_tag, 7);
        assert!(cfg.default_memo.is_none());
        let profile = cfg.profile().unwrap();
        assert_eq!(profile.query_endpoint(), "http://127.0.0.1:5005");
        assert_eq!(profile.transaction_link("H"), "http://explorer/t/H");
    }

    #[test]
    fn empty_endpoint_rejected() {
        let err = BridgeConfig::from_json(
            r#"{"endpoints": {"query_endpoint": "", "account_explorer_url": "a", "tx_explorer_url": "t"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
    }

    #[test]
    fn bad_json_is_configuration_error() {
        assert!(matches!(
            BridgeConfig::from_json("{"),
            Err(BridgeError::Configuration(_))
        ));
        assert!(BridgeConfig::from_json(r#"{"network": "devnet"}"#).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = BridgeConfig::for_network(Network::Mainnet);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
