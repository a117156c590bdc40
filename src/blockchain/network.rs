//! Network profiles for the four supported Immutable networks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a supported network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NetworkId {
    ZkevmMainnet,
    #[default]
    ZkevmTestnet,
    ImxMainnet,
    ImxTestnet,
}

impl NetworkId {
    /// All networks, in declaration order.
    pub const ALL: [NetworkId; 4] = [
        NetworkId::ZkevmMainnet,
        NetworkId::ZkevmTestnet,
        NetworkId::ImxMainnet,
        NetworkId::ImxTestnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::ZkevmMainnet => "zkevmMainnet",
            NetworkId::ZkevmTestnet => "zkevmTestnet",
            NetworkId::ImxMainnet => "imxMainnet",
            NetworkId::ImxTestnet => "imxTestnet",
        }
    }

    /// Built-in profile for this network.
    pub fn profile(&self) -> NetworkProfile {
        let (rpc_url, api_url, chain_id, chain_name) = match self {
            NetworkId::ZkevmMainnet => (
                Some("https://rpc.immutable.com"),
                "https://api.immutable.com",
                13371,
                "imtbl-zkevm-mainnet",
            ),
            NetworkId::ZkevmTestnet => (
                Some("https://rpc.testnet.immutable.com"),
                "https://api.sandbox.immutable.com",
                13473,
                "imtbl-zkevm-testnet",
            ),
            NetworkId::ImxMainnet => (None, "https://api.x.immutable.com", 1, "imx-mainnet"),
            NetworkId::ImxTestnet => (
                None,
                "https://api.sandbox.x.immutable.com",
                5,
                "imx-testnet",
            ),
        };

        NetworkProfile {
            network: *self,
            rpc_url: rpc_url.map(str::to_string),
            api_url: api_url.to_string(),
            chain_id,
            chain_name: chain_name.to_string(),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown network '{}'", s))
    }
}

/// Immutable endpoint description, resolved once per batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    pub network: NetworkId,
    /// JSON-RPC endpoint; absent for REST-only networks.
    pub rpc_url: Option<String>,
    /// REST API base URL.
    pub api_url: String,
    pub chain_id: u64,
    /// Chain slug used in `/v1/chains/{chain}` paths.
    pub chain_name: String,
}

impl NetworkProfile {
    /// Apply configured endpoint overrides.
    ///
    /// An RPC override is ignored for networks without JSON-RPC.
    pub fn with_overrides(mut self, api_url: Option<&str>, rpc_url: Option<&str>) -> Self {
        if let Some(api) = api_url.filter(|u| !u.is_empty()) {
            self.api_url = api.trim_end_matches('/').to_string();
        }
        if let Some(rpc) = rpc_url.filter(|u| !u.is_empty()) {
            if self.rpc_url.is_some() {
                self.rpc_url = Some(rpc.to_string());
            } else {
                tracing::warn!(
                    network = %self.network,
                    "Ignoring RPC URL override for REST-only network"
                );
            }
        }
        self
    }

    pub fn supports_rpc(&self) -> bool {
        self.rpc_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_profiles_have_rest_endpoint() {
        for id in NetworkId::ALL {
            let profile = id.profile();
            assert!(profile.api_url.starts_with("https://"));
            assert!(!profile.chain_name.is_empty());
        }
    }

    #[test]
    fn test_only_zkevm_has_rpc() {
        let with_rpc: Vec<NetworkId> = NetworkId::ALL
            .into_iter()
            .filter(|id| id.profile().supports_rpc())
            .collect();
        assert_eq!(with_rpc, vec![NetworkId::ZkevmMainnet, NetworkId::ZkevmTestnet]);
    }

    #[test]
    fn test_profile_values() {
        let profile = NetworkId::ZkevmMainnet.profile();
        assert_eq!(profile.chain_id, 13371);
        assert_eq!(profile.chain_name, "imtbl-zkevm-mainnet");
        assert_eq!(profile.rpc_url.as_deref(), Some("https://rpc.immutable.com"));

        let profile = NetworkId::ImxTestnet.profile();
        assert_eq!(profile.chain_id, 5);
        assert_eq!(profile.api_url, "https://api.sandbox.x.immutable.com");
    }

    #[test]
    fn test_parse_round_trip() {
        for id in NetworkId::ALL {
            assert_eq!(id.as_str().parse::<NetworkId>().unwrap(), id);
        }
        assert!("mainnet".parse::<NetworkId>().is_err());
        assert_eq!(NetworkId::default(), NetworkId::ZkevmTestnet);
    }

    #[test]
    fn test_overrides() {
        let profile = NetworkId::ZkevmTestnet
            .profile()
            .with_overrides(Some("http://127.0.0.1:9000/"), Some("http://127.0.0.1:8545"));
        assert_eq!(profile.api_url, "http://127.0.0.1:9000");
        assert_eq!(profile.rpc_url.as_deref(), Some("http://127.0.0.1:8545"));

        let profile = NetworkId::ImxMainnet
            .profile()
            .with_overrides(None, Some("http://127.0.0.1:8545"));
        assert!(!profile.supports_rpc());
    }
}
