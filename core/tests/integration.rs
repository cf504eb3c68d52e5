/// Integration tests against a local dev node with unlocked accounts
/// (e.g. `anvil` on 127.0.0.1:8545, chain id 31337).
/// Run with: cargo test -- --ignored
use std::sync::Arc;
use std::time::Duration;

use survey_wallet_core::provider::{JsonRpcWallet, WalletProvider};
use survey_wallet_core::{Address, SessionConfig, WalletSession};

const DEV_NODE: &str = "http://127.0.0.1:8545";
const DEV_CHAIN: u64 = 31_337;

fn dev_wallet() -> Arc<JsonRpcWallet> {
    Arc::new(
        JsonRpcWallet::new(DEV_NODE, true)
            .expect("failed to create dev node client")
            .with_watch_interval(Duration::from_millis(200)),
    )
}

#[tokio::test]
#[ignore]
async fn dev_node_reports_chain_id() {
    let chain_id = dev_wallet().chain_id().await.expect("eth_chainId failed");
    assert_eq!(chain_id, DEV_CHAIN);
}

#[tokio::test]
#[ignore]
async fn dev_node_returns_accounts() {
    let accounts = dev_wallet()
        .request_accounts()
        .await
        .expect("eth_requestAccounts failed");
    assert!(!accounts.is_empty(), "dev node should expose unlocked accounts");
}

#[tokio::test]
#[ignore]
async fn session_connects_and_checks_network() {
    let config = SessionConfig::new(DEV_CHAIN, Address::ZERO);
    let session = WalletSession::start(dev_wallet(), config);

    session.connect().await;
    session.check_network().await;

    let state = session.state();
    assert!(state.wallet_installed);
    assert!(state.wallet_connected);
    assert!(state.correct_network());
    // No contract at the zero address: token reads fail softly.
    assert!(state.token_name.is_none());
}

#[tokio::test]
#[ignore]
async fn session_flags_wrong_required_chain() {
    let config = SessionConfig::new(1, Address::ZERO);
    let session = WalletSession::start(dev_wallet(), config);

    session.check_network().await;
    let state = session.state();
    assert!(!state.correct_network());
    assert_eq!(state.network_id, Some(DEV_CHAIN));
}
