use std::path::PathBuf;

use anyhow::Context;

pub mod commands;
pub mod config;
pub mod contract;
pub mod display;
pub mod error;
pub mod provider;
pub mod session;
pub mod state;
pub mod survey;

pub use commands::Command;
pub use config::{NetworkTable, SessionConfig};
pub use contract::ContractProxy;
pub use error::SessionError;
pub use provider::{DetachedWallet, JsonRpcWallet, TransactionRequest, WalletProvider};
pub use session::WalletSession;
pub use state::{NetworkReadiness, SessionState};

pub use alloy_primitives::{Address, ChainId, TxHash, U256};

/// XDG-compliant configuration directory.
/// Linux: `~/.config/survey-wallet/`, macOS: `~/Library/Application Support/survey-wallet/`
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("Cannot determine configuration directory")?
        .join("survey-wallet");
    Ok(dir)
}

/// Default location of the network table file.
pub fn default_networks_file() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("networks.json"))
}
