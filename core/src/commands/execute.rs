use anyhow::{bail, Result};

use super::help::help_text;
use super::Command;
use crate::display;
use crate::session::WalletSession;
use crate::state::NetworkReadiness;

impl Command {
    /// Execute a command against the session and return the output string.
    /// Session commands log their own failures; this reports the resulting state.
    pub async fn execute(&self, session: &WalletSession, json_output: bool) -> Result<String> {
        match self {
            Command::Status => Ok(render_state(session, json_output)),

            Command::Detect => {
                let present = session.detect_wallet();
                if json_output {
                    Ok(serde_json::json!({ "wallet_installed": present }).to_string())
                } else if present {
                    Ok("Wallet provider detected.".to_string())
                } else {
                    Ok("No wallet provider installed.".to_string())
                }
            }

            Command::Connect => {
                session.connect().await;
                let state = session.state();
                match state.wallet_address {
                    Some(_) if json_output => Ok(display::format_state_json(&state)),
                    Some(address) => Ok(format!("Connected: {address}")),
                    None => bail!("Could not connect to the wallet. See the log for details."),
                }
            }

            Command::Network => {
                session.check_network().await;
                Ok(render_readiness(session, json_output))
            }

            Command::Switch { network } => {
                session.switch_network(network).await;
                if !json_output && session.state().network == NetworkReadiness::Incorrect {
                    bail!("Could not switch to '{network}'. See the log for details.");
                }
                Ok(render_readiness(session, json_output))
            }

            Command::Token => {
                session.refresh_token_info().await;
                Ok(render_state(session, json_output))
            }

            Command::Balance => {
                session.refresh_balance().await;
                let state = session.state();
                if json_output {
                    return Ok(serde_json::json!({
                        "balance": state.token_balance,
                        "symbol": state.token_symbol,
                    })
                    .to_string());
                }
                match state.token_balance {
                    Some(balance) => Ok(format!(
                        "{balance} {}",
                        state.token_symbol.as_deref().unwrap_or("")
                    )
                    .trim_end()
                    .to_string()),
                    None => bail!("Balance unavailable. Connect and switch to the required network first."),
                }
            }

            Command::Watch {
                interval,
                max_ticks,
            } => {
                session.start_balance_polling(*interval, *max_ticks);
                Ok(format!(
                    "Watching balance every {:.1}s (at most {max_ticks} checks).",
                    interval.as_secs_f64()
                ))
            }

            Command::Unwatch => {
                if session.is_polling() {
                    session.stop_balance_polling();
                    Ok("Balance polling stopped.".to_string())
                } else {
                    Ok("No balance polling active.".to_string())
                }
            }

            Command::Submit { answers } => match session.submit_survey(answers).await {
                Some(hash) if json_output => Ok(display::format_submission_json(
                    &hash,
                    session.state().wallet_address,
                )),
                Some(hash) => Ok(format!("Survey submitted!\n  Tx hash: {hash}")),
                None => bail!("Survey submission failed. See the log for details."),
            },

            Command::Networks => Ok(display::format_networks(session.config())),

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}

fn render_state(session: &WalletSession, json_output: bool) -> String {
    let state = session.state();
    if json_output {
        display::format_state_json(&state)
    } else {
        display::format_state(&state, session.config())
    }
}

fn render_readiness(session: &WalletSession, json_output: bool) -> String {
    let state = session.state();
    if json_output {
        return display::format_state_json(&state);
    }
    match state.network {
        NetworkReadiness::Correct => "On the required network.".to_string(),
        NetworkReadiness::Incorrect => format!(
            "Wrong network (chain {}). Required chain: {}.",
            state
                .network_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            session.config().required_chain_id
        ),
        NetworkReadiness::Unknown => "Network not checked yet.".to_string(),
    }
}
