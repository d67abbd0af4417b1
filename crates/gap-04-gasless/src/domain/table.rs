//! Chain → provider table.

use serde::{Deserialize, Serialize};
use shared_types::ChainId;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GaslessError;

/// Sponsoring infrastructure provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaslessProviderKind {
    ZeroDev,
    Alchemy,
}

impl GaslessProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroDev => "zerodev",
            Self::Alchemy => "alchemy",
        }
    }
}

impl fmt::Display for GaslessProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GaslessProviderKind {
    type Err = GaslessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zerodev" => Ok(Self::ZeroDev),
            "alchemy" => Ok(Self::Alchemy),
            _ => Err(GaslessError::UnknownProvider(s.to_string())),
        }
    }
}

/// Gasless settings for one chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainGaslessConfig {
    pub enabled: bool,
    pub provider: GaslessProviderKind,
}

/// Static chain → provider table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaslessTable {
    chains: HashMap<ChainId, ChainGaslessConfig>,
}

impl Default for GaslessTable {
    /// Chains the platform sponsors out of the box.
    fn default() -> Self {
        use GaslessProviderKind::*;

        let entries = [
            (ChainId::OPTIMISM, true, ZeroDev),
            (ChainId::ARBITRUM, true, ZeroDev),
            (ChainId::BASE, true, ZeroDev),
            (ChainId::CELO, true, Alchemy),
            (ChainId::LISK, false, Alchemy),
            (ChainId::SEPOLIA, true, ZeroDev),
            (ChainId::OPTIMISM_SEPOLIA, true, ZeroDev),
            (ChainId::BASE_SEPOLIA, true, ZeroDev),
        ];
        Self {
            chains: entries
                .into_iter()
                .map(|(chain, enabled, provider)| (chain, ChainGaslessConfig { enabled, provider }))
                .collect(),
        }
    }
}

impl GaslessTable {
    pub fn empty() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    pub fn get(&self, chain: ChainId) -> Option<ChainGaslessConfig> {
        self.chains.get(&chain).copied()
    }

    /// Provider for `chain` if present and enabled.
    pub fn enabled_provider(&self, chain: ChainId) -> Option<GaslessProviderKind> {
        self.get(chain)
            .filter(|config| config.enabled)
            .map(|config| config.provider)
    }

    pub fn set(&mut self, chain: ChainId, config: ChainGaslessConfig) {
        self.chains.insert(chain, config);
    }

    /// Keep the entry but stop sponsoring on `chain`.
    pub fn disable(&mut self, chain: ChainId) {
        if let Some(config) = self.chains.get_mut(&chain) {
            config.enabled = false;
        }
    }

    /// Enabled chains, sorted.
    pub fn enabled_chains(&self) -> Vec<ChainId> {
        let mut chains: Vec<_> = self
            .chains
            .iter()
            .filter(|(_, config)| config.enabled)
            .map(|(chain, _)| *chain)
            .collect();
        chains.sort();
        chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = GaslessTable::default();
        assert_eq!(
            table.enabled_provider(ChainId::OPTIMISM),
            Some(GaslessProviderKind::ZeroDev)
        );
        assert_eq!(
            table.enabled_provider(ChainId::CELO),
            Some(GaslessProviderKind::Alchemy)
        );
        // Present but disabled
        assert!(table.get(ChainId::LISK).is_some());
        assert_eq!(table.enabled_provider(ChainId::LISK), None);
        // Absent
        assert!(table.get(ChainId::SEI).is_none());
    }

    #[test]
    fn test_disable() {
        let mut table = GaslessTable::default();
        table.disable(ChainId::BASE);
        assert_eq!(table.enabled_provider(ChainId::BASE), None);
        assert!(!table.enabled_chains().contains(&ChainId::BASE));
        // Disabling an absent chain is a no-op
        table.disable(ChainId::SEI);
        assert!(table.get(ChainId::SEI).is_none());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(
            "ZeroDev".parse::<GaslessProviderKind>().unwrap(),
            GaslessProviderKind::ZeroDev
        );
        assert!("biconomy".parse::<GaslessProviderKind>().is_err());
    }
}
