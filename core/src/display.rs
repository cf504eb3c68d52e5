/// Output formatting: base-unit conversion and session state rendering.
///
/// The token uses 18 decimal places. 1 token = 10^18 base units.
use alloy_primitives::{Address, TxHash, U256};

use crate::config::{NetworkTable, SessionConfig};
use crate::state::SessionState;

pub const TOKEN_DECIMALS: u8 = 18;

/// Convert base units to a human-scale decimal string with trailing zeros trimmed.
/// Examples: 10^18 -> "1", 12.5 * 10^18 -> "12.5", 0 -> "0"
#[must_use]
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let base = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / base;
    let frac = value % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Normalize a raw token balance for display.
#[must_use]
pub fn format_token_balance(raw: U256) -> String {
    format_units(raw, TOKEN_DECIMALS)
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn format_chain(chain_id: u64, networks: &NetworkTable) -> String {
    match networks.name_of(chain_id) {
        Some(name) => format!("{chain_id} ({name})"),
        None => chain_id.to_string(),
    }
}

/// Format the session state for display.
#[must_use]
pub fn format_state(state: &SessionState, config: &SessionConfig) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "  Wallet:    {}",
        match (state.wallet_installed, state.wallet_connected) {
            (false, _) => "not installed",
            (true, false) => "installed, not connected",
            (true, true) => "connected",
        }
    ));
    lines.push(format!("  Address:   {}", or_dash(state.wallet_address)));
    lines.push(format!(
        "  Chain:     {}",
        state
            .network_id
            .map(|id| format_chain(id, &config.networks))
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.push(format!(
        "  Network:   {} (required {})",
        state.network,
        format_chain(config.required_chain_id, &config.networks)
    ));
    lines.push(format!("  Contract:  {}", config.contract_address));
    if state.correct_network() {
        let symbol = state.token_symbol.as_deref().unwrap_or("");
        lines.push(format!("  Token:     {}", or_dash(state.token_name.as_deref())));
        lines.push(format!(
            "  Balance:   {} {symbol}",
            or_dash(state.token_balance.as_deref())
        ));
    }
    lines.join("\n")
}

/// Format the session state as JSON.
#[must_use]
pub fn format_state_json(state: &SessionState) -> String {
    serde_json::to_string(state).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("Failed to serialize state: {e}") }).to_string()
    })
}

/// Format the network table, marking the required chain.
#[must_use]
pub fn format_networks(config: &SessionConfig) -> String {
    if config.networks.is_empty() {
        return "No networks configured.".to_string();
    }
    config
        .networks
        .iter()
        .map(|(name, chain_id)| {
            let marker = if chain_id == config.required_chain_id { "*" } else { " " };
            format!("{marker} {name:<12} {chain_id}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a submitted survey transaction as JSON.
#[must_use]
pub fn format_submission_json(tx_hash: &TxHash, from: Option<Address>) -> String {
    serde_json::json!({
        "tx_hash": tx_hash.to_string(),
        "from": from.map(|a| a.to_string()),
    })
    .to_string()
}
