/// Session configuration: required chain, contract address, and the network table.
use std::collections::BTreeMap;
use std::path::Path;

use alloy_primitives::{Address, ChainId};
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetworkEntry {
    pub chain_id: ChainId,
}

/// Chain ids keyed by network name. Names are stored lowercase.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct NetworkTable(BTreeMap<String, NetworkEntry>);

impl NetworkTable {
    /// Well-known EVM networks.
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (name, chain_id) in [
            ("mainnet", 1),
            ("ropsten", 3),
            ("rinkeby", 4),
            ("goerli", 5),
            ("kovan", 42),
            ("polygon", 137),
            ("mumbai", 80_001),
            ("sepolia", 11_155_111),
            ("localhost", 31_337),
        ] {
            table.insert(name, chain_id);
        }
        table
    }

    pub fn insert(&mut self, name: &str, chain_id: ChainId) {
        self.0.insert(name.to_lowercase(), NetworkEntry { chain_id });
    }

    /// Parse a JSON object of the form `{"mainnet": {"chain_id": 1}, ...}`.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let raw: BTreeMap<String, NetworkEntry> =
            serde_json::from_str(json).context("Failed to parse network table")?;
        let mut table = Self::default();
        for (name, entry) in raw {
            table.insert(&name, entry.chain_id);
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read network table from {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Chain id configured for a network name (case-insensitive).
    pub fn chain_id(&self, name: &str) -> Result<ChainId> {
        self.0
            .get(&name.to_lowercase())
            .map(|e| e.chain_id)
            .ok_or_else(|| SessionError::UnrecognizedChain(format!("unknown network '{name}'")))
    }

    /// Reverse lookup, used for display.
    pub fn name_of(&self, chain_id: ChainId) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, e)| e.chain_id == chain_id)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ChainId)> {
        self.0.iter().map(|(name, e)| (name.as_str(), e.chain_id))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub required_chain_id: ChainId,
    pub contract_address: Address,
    pub networks: NetworkTable,
}

impl SessionConfig {
    pub fn new(required_chain_id: ChainId, contract_address: Address) -> Self {
        Self {
            required_chain_id,
            contract_address,
            networks: NetworkTable::builtin(),
        }
    }

    pub fn with_networks(mut self, networks: NetworkTable) -> Self {
        self.networks = networks;
        self
    }

    /// Parse a contract address from configuration input.
    pub fn parse_contract_address(input: &str) -> Result<Address> {
        input
            .trim()
            .parse::<Address>()
            .map_err(|e| SessionError::Config(format!("Invalid contract address '{input}': {e}")))
    }

    /// Name of the required network, if the table knows it.
    pub fn required_network_name(&self) -> Option<&str> {
        self.networks.name_of(self.required_chain_id)
    }
}
