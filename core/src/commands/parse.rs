use std::time::Duration;

use alloy_primitives::U256;
use anyhow::{bail, Context, Result};

use super::Command;
use crate::session::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_MAX_TICKS};

/// Parse answers separated by whitespace and/or commas. Accepts decimal or 0x-hex.
fn parse_answers(input: &str) -> Result<Vec<U256>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<U256>()
                .with_context(|| format!("Invalid answer '{s}'. Answers must be unsigned integers."))
        })
        .collect()
}

fn parse_interval(input: &str) -> Result<Duration> {
    let secs: f64 = input
        .parse()
        .with_context(|| format!("Invalid interval '{input}'"))?;
    if !secs.is_finite() || secs <= 0.0 {
        bail!("Interval must be a positive number of seconds.");
    }
    let interval = Duration::try_from_secs_f64(secs).context("Interval too large.")?;
    if interval.is_zero() {
        bail!("Interval is too small to be represented.");
    }
    Ok(interval)
}

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (input.to_lowercase(), ""),
        };
        let mut args = rest.split_whitespace();

        match cmd.as_str() {
            "status" | "st" => Ok(Command::Status),

            "detect" => Ok(Command::Detect),

            "connect" | "conn" => Ok(Command::Connect),

            "network" | "net" => Ok(Command::Network),

            "switch" => {
                let network = args.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing network name. Usage: switch <network>")
                })?;
                Ok(Command::Switch {
                    network: network.to_lowercase(),
                })
            }

            "token" | "info" => Ok(Command::Token),

            "balance" | "bal" => Ok(Command::Balance),

            "watch" => {
                let interval = match args.next() {
                    Some(s) => parse_interval(s)?,
                    None => DEFAULT_POLL_INTERVAL,
                };
                let max_ticks = match args.next() {
                    Some(s) => s
                        .parse::<u32>()
                        .with_context(|| format!("Invalid number of checks '{s}'"))?,
                    None => DEFAULT_POLL_MAX_TICKS,
                };
                if max_ticks == 0 {
                    bail!("Number of checks must be at least 1.");
                }
                Ok(Command::Watch {
                    interval,
                    max_ticks,
                })
            }

            "unwatch" | "stop" => Ok(Command::Unwatch),

            "submit" => {
                if rest.is_empty() {
                    bail!("Missing answers. Usage: submit <answer> [answer...]");
                }
                let answers = parse_answers(rest)?;
                Ok(Command::Submit { answers })
            }

            "networks" => Ok(Command::Networks),

            "help" | "h" | "?" => Ok(Command::Help {
                command: args.next().map(|s| s.to_lowercase()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}
