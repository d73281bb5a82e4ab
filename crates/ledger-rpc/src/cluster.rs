use std::fmt;
use std::str::FromStr;

use crate::error::RpcError;

/// Public Solana clusters and their API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cluster {
    #[default]
    MainnetBeta,
    Devnet,
    Testnet,
}

impl Cluster {
    /// Cluster moniker as used by the Solana tooling.
    pub fn name(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
        }
    }

    /// Public JSON-RPC endpoint for the cluster.
    pub fn api_url(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
        }
    }
}

impl FromStr for Cluster {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            other => Err(RpcError::UnknownCluster(other.to_string())),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_mainnet_beta() {
        assert_eq!(Cluster::default(), Cluster::MainnetBeta);
        assert_eq!(
            Cluster::default().api_url(),
            "https://api.mainnet-beta.solana.com"
        );
    }

    #[test]
    fn all_urls_are_https() {
        for cluster in [Cluster::MainnetBeta, Cluster::Devnet, Cluster::Testnet] {
            assert!(cluster.api_url().starts_with("https://api."));
            assert!(cluster.api_url().contains(cluster.name()));
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("mainnet".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert_eq!(
            " testnet ".parse::<Cluster>().unwrap(),
            Cluster::Testnet
        );
        assert!(matches!(
            "localnet".parse::<Cluster>(),
            Err(RpcError::UnknownCluster(_))
        ));
    }

    #[test]
    fn display_uses_moniker() {
        assert_eq!(Cluster::Devnet.to_string(), "devnet");
    }
}
