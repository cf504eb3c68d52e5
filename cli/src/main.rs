mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use survey_wallet_core::commands::Command;
use survey_wallet_core::config::{NetworkTable, SessionConfig};
use survey_wallet_core::provider::{DetachedWallet, JsonRpcWallet, WalletProvider};
use survey_wallet_core::session::WalletSession;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "survey-wallet", about = "Survey token wallet session", version)]
pub(crate) struct Cli {
    /// Wallet JSON-RPC endpoint. Without it the session runs with no wallet installed.
    #[arg(long, env = "WALLET_RPC_URL")]
    rpc_url: Option<String>,

    /// Chain id the contract is deployed on
    #[arg(long, env = "CHAIN_ID")]
    chain_id: u64,

    /// Survey token contract address
    #[arg(long, env = "CONTRACT_ADDRESS")]
    contract: String,

    /// Network table JSON file (default: <config dir>/survey-wallet/networks.json if present)
    #[arg(long, env = "NETWORKS_FILE")]
    networks: Option<PathBuf>,

    /// Run commands and exit, separated by ';' (e.g. "connect; network; status")
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,

    /// Allow connecting to non-HTTPS RPC URLs
    #[arg(long)]
    insecure: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y')]
    yes: bool,
}

impl Cli {
    fn network_table(&self) -> Result<NetworkTable> {
        if let Some(path) = &self.networks {
            return NetworkTable::load(path);
        }
        match survey_wallet_core::default_networks_file() {
            Ok(path) if path.exists() => NetworkTable::load(&path),
            _ => Ok(NetworkTable::builtin()),
        }
    }

    fn session_config(&self) -> Result<SessionConfig> {
        let contract = SessionConfig::parse_contract_address(&self.contract)?;
        Ok(SessionConfig::new(self.chain_id, contract).with_networks(self.network_table()?))
    }

    fn provider(&self) -> Result<Arc<dyn WalletProvider>> {
        match &self.rpc_url {
            Some(url) => Ok(Arc::new(JsonRpcWallet::new(url, self.insecure)?)),
            None => Ok(Arc::new(DetachedWallet)),
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survey_wallet=info,survey_wallet_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.session_config()?;
    tracing::debug!(
        chain_id = config.required_chain_id,
        contract = %config.contract_address,
        wallet = cli.rpc_url.as_deref().unwrap_or("none"),
        "starting session"
    );
    let session = WalletSession::start(cli.provider()?, config);

    if let Some(cmd_str) = &cli.cmd {
        // One-shot mode
        run_oneshot(&cli, &session, cmd_str).await
    } else {
        // REPL mode
        repl::run_repl(&cli, &session).await
    }
}

async fn run_oneshot(cli: &Cli, session: &WalletSession, cmd_str: &str) -> Result<()> {
    for part in cmd_str.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let command = Command::parse(part)?;
        if command == Command::Exit {
            break;
        }
        if let Some(prompt) = command.confirmation_prompt(&session.state()) {
            if !cli.yes {
                anyhow::bail!("{prompt}\nConfirmation required: re-run with --yes.");
            }
        }
        let output = command
            .execute(session, cli.json)
            .await
            .with_context(|| format!("'{part}' failed"))?;
        if !output.is_empty() {
            println!("{output}");
        }
    }

    // A one-shot watch keeps running until its window closes.
    let mut last = session.state().token_balance;
    while session.is_polling() {
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;
        let balance = session.state().token_balance;
        if balance != last {
            if let Some(b) = &balance {
                println!("Balance: {b}");
            }
            last = balance;
        }
    }
    Ok(())
}
