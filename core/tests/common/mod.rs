//! In-memory wallet used as the provider test double.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, ChainId, TxHash, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use survey_wallet_core::contract::ISurveyToken;
use survey_wallet_core::error::{Result, SessionError};
use survey_wallet_core::provider::{TransactionRequest, WalletProvider};
use survey_wallet_core::{SessionConfig, WalletSession};

pub const REQUIRED_CHAIN: ChainId = 1;
pub const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

pub fn user() -> Address {
    "0xABC0000000000000000000000000000000000001"
        .parse()
        .expect("valid address")
}

pub fn contract_address() -> Address {
    Address::repeat_byte(0xc0)
}

pub fn config() -> SessionConfig {
    SessionConfig::new(REQUIRED_CHAIN, contract_address())
}

pub struct MockState {
    pub accounts: Vec<Address>,
    pub reject_accounts: bool,
    pub chain_id: ChainId,
    pub fail_chain_id: bool,
    pub reject_switch: bool,
    pub token_name: String,
    pub token_symbol: String,
    pub raw_balance: U256,
    pub fail_name: bool,
    pub fail_symbol: bool,
    pub fail_balance: bool,
    pub fail_send: bool,
    pub sent: Vec<TransactionRequest>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            accounts: vec![user()],
            reject_accounts: false,
            chain_id: REQUIRED_CHAIN,
            fail_chain_id: false,
            reject_switch: false,
            token_name: "Survey Token".into(),
            token_symbol: "SRV".into(),
            raw_balance: U256::from(ONE_TOKEN),
            fail_name: false,
            fail_symbol: false,
            fail_balance: false,
            fail_send: false,
            sent: Vec::new(),
        }
    }
}

pub struct MockWallet {
    present: bool,
    state: Mutex<MockState>,
    chain_events: broadcast::Sender<ChainId>,
    subscriptions: AtomicUsize,
    name_calls: AtomicUsize,
    balance_calls: AtomicUsize,
}

impl MockWallet {
    pub fn new() -> Arc<Self> {
        Self::build(true)
    }

    pub fn absent() -> Arc<Self> {
        Self::build(false)
    }

    fn build(present: bool) -> Arc<Self> {
        let (chain_events, _) = broadcast::channel(16);
        Arc::new(Self {
            present,
            state: Mutex::new(MockState::default()),
            chain_events,
            subscriptions: AtomicUsize::new(0),
            name_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
        })
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock())
    }

    /// Move the wallet to another chain and notify listeners.
    pub fn emit_chain_changed(&self, chain_id: ChainId) {
        self.state.lock().chain_id = chain_id;
        let _ = self.chain_events.send(chain_id);
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    pub fn name_calls(&self) -> usize {
        self.name_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn reset_balance_calls(&self) {
        self.balance_calls.store(0, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state.lock().sent.clone()
    }
}

fn rpc_failure(what: &str) -> SessionError {
    SessionError::Rpc(format!("{what} failed"))
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn is_present(&self) -> bool {
        self.present
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let state = self.state.lock();
        if state.reject_accounts {
            return Err(SessionError::UserRejected("User rejected the request.".into()));
        }
        Ok(state.accounts.clone())
    }

    async fn chain_id(&self) -> Result<ChainId> {
        let state = self.state.lock();
        if state.fail_chain_id {
            return Err(rpc_failure("eth_chainId"));
        }
        Ok(state.chain_id)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.reject_switch {
                return Err(SessionError::SwitchRejected("User rejected the request.".into()));
            }
            state.chain_id = chain_id;
        }
        let _ = self.chain_events.send(chain_id);
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let mut state = self.state.lock();
        if state.fail_send {
            return Err(rpc_failure("eth_sendTransaction"));
        }
        state.sent.push(tx);
        Ok(TxHash::repeat_byte(state.sent.len() as u8))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        assert_eq!(to, contract_address(), "calls must target the configured contract");
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| SessionError::Encoding("call data too short".into()))?;
        let state = self.state.lock();
        let output = if selector == ISurveyToken::nameCall::SELECTOR {
            self.name_calls.fetch_add(1, Ordering::SeqCst);
            if state.fail_name {
                return Err(rpc_failure("name()"));
            }
            ISurveyToken::nameCall::abi_encode_returns(&(state.token_name.clone(),))
        } else if selector == ISurveyToken::symbolCall::SELECTOR {
            if state.fail_symbol {
                return Err(rpc_failure("symbol()"));
            }
            ISurveyToken::symbolCall::abi_encode_returns(&(state.token_symbol.clone(),))
        } else if selector == ISurveyToken::balanceOfCall::SELECTOR {
            self.balance_calls.fetch_add(1, Ordering::SeqCst);
            if state.fail_balance {
                return Err(rpc_failure("balanceOf()"));
            }
            ISurveyToken::balanceOfCall::abi_encode_returns(&(state.raw_balance,))
        } else {
            return Err(SessionError::Rpc("execution reverted".into()));
        };
        Ok(Bytes::from(output))
    }

    fn subscribe_chain_changed(&self) -> Option<broadcast::Receiver<ChainId>> {
        if !self.present {
            return None;
        }
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        Some(self.chain_events.subscribe())
    }
}

pub fn session(wallet: &Arc<MockWallet>) -> WalletSession {
    WalletSession::start(wallet.clone(), config())
}

/// Session that is connected and has passed a network check.
pub async fn ready_session(wallet: &Arc<MockWallet>) -> WalletSession {
    let session = session(wallet);
    session.connect().await;
    session.check_network().await;
    session
}
