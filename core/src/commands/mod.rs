/// Command definitions and parsing for the session REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use std::time::Duration;

use alloy_primitives::U256;

use crate::state::SessionState;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the session state
    Status,
    /// Probe for an installed wallet
    Detect,
    /// Request account authorization from the wallet
    Connect,
    /// Check the wallet's chain against the required one
    Network,
    /// Ask the wallet to switch networks: switch <network>
    Switch { network: String },
    /// Refresh token name, symbol, and balance
    Token,
    /// Refresh the token balance
    Balance,
    /// Poll the balance: watch [seconds] [max_checks]
    Watch { interval: Duration, max_ticks: u32 },
    /// Stop balance polling
    Unwatch,
    /// Submit survey answers: submit <answer> [answer...]
    Submit { answers: Vec<U256> },
    /// List configured networks
    Networks,
    /// Print help
    Help { command: Option<String> },
    /// Exit
    Exit,
}

impl Command {
    /// Returns a confirmation prompt if this command should ask before executing.
    pub fn confirmation_prompt(&self, state: &SessionState) -> Option<String> {
        match self {
            Command::Submit { answers } => {
                let from = state
                    .wallet_address
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "(not connected)".to_string());
                Some(format!(
                    "Submit survey with {} answer{} from {from}?",
                    answers.len(),
                    if answers.len() == 1 { "" } else { "s" },
                ))
            }
            _ => None,
        }
    }
}
