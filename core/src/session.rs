//! Wallet session controller.
//!
//! Tracks wallet, network, and contract readiness for one application session
//! and publishes every state change on a watch channel. Commands never return
//! errors: failures are logged and leave the state degraded but consistent, so
//! the UI renders state instead of handling errors.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use alloy_primitives::{TxHash, U256};
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::contract::ContractProxy;
use crate::display;
use crate::error::SessionError;
use crate::provider::{TransactionRequest, WalletProvider};
use crate::state::{NetworkReadiness, SessionState};
use crate::survey::SurveyIdGenerator;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_POLL_MAX_TICKS: u32 = 60;
/// Shortest accepted poll interval; shorter ones are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

struct PollHandle {
    generation: u64,
    task: JoinHandle<()>,
}

struct SessionInner {
    provider: Arc<dyn WalletProvider>,
    contract: ContractProxy,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    poll: Mutex<Option<PollHandle>>,
    poll_generation: AtomicU64,
    listener: Mutex<Option<JoinHandle<()>>>,
    survey_ids: SurveyIdGenerator,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Some(poll) = self.poll.get_mut().take() {
            poll.task.abort();
        }
        if let Some(listener) = self.listener.get_mut().take() {
            listener.abort();
        }
    }
}

#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<SessionInner>,
}

impl WalletSession {
    pub fn new(provider: Arc<dyn WalletProvider>, config: SessionConfig) -> Self {
        let contract = ContractProxy::new(provider.clone(), config.contract_address);
        let (state, _) = watch::channel(SessionState::default());
        Self {
            inner: Arc::new(SessionInner {
                provider,
                contract,
                config,
                state,
                poll: Mutex::new(None),
                poll_generation: AtomicU64::new(0),
                listener: Mutex::new(None),
                survey_ids: SurveyIdGenerator::new(),
            }),
        }
    }

    /// Create a session and run the initialization sequence.
    /// Must be called from within a tokio runtime.
    pub fn start(provider: Arc<dyn WalletProvider>, config: SessionConfig) -> Self {
        let session = Self::new(provider, config);
        session.initialize();
        session
    }

    /// Detect the wallet and register the chain-changed listener. Safe to call
    /// repeatedly; the listener is registered at most once.
    pub fn initialize(&self) {
        self.detect_wallet();
        self.register_chain_listener();
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Apply one atomic transition to the state.
    fn update<R: Default>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut out = R::default();
        self.inner.state.send_modify(|state| out = f(state));
        out
    }

    pub fn detect_wallet(&self) -> bool {
        let present = self.inner.provider.is_present();
        self.update(|s| s.wallet_installed = present);
        debug!(present, "wallet detection");
        present
    }

    pub async fn connect(&self) {
        self.connect_then(|_| async {}).await;
    }

    /// Request account authorization; on success run `on_success` with the
    /// authorized address.
    pub async fn connect_then<F, Fut>(&self, on_success: F)
    where
        F: FnOnce(alloy_primitives::Address) -> Fut,
        Fut: Future<Output = ()>,
    {
        let result = if self.inner.provider.is_present() {
            self.inner.provider.request_accounts().await
        } else {
            Err(SessionError::ProviderAbsent)
        };
        let accounts = result.and_then(|accounts| {
            accounts
                .first()
                .copied()
                .ok_or_else(|| SessionError::Rpc("Wallet returned no accounts".into()))
        });
        match accounts {
            Ok(address) => {
                self.update(|s| s.set_connected(address));
                info!(%address, "wallet connected");
                on_success(address).await;
            }
            Err(e) => {
                error!(error = %e, "cannot connect to the wallet");
                self.update(SessionState::set_disconnected);
            }
        }
    }

    /// Compare the wallet's chain with the required one.
    pub async fn check_network(&self) {
        let chain_id = match self.inner.provider.chain_id().await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "cannot check the network");
                return;
            }
        };
        let required = self.inner.config.required_chain_id;
        let entered_correct = self.update(|s| {
            s.network_id = Some(chain_id);
            if chain_id == required {
                s.enter_correct()
            } else {
                s.enter_incorrect();
                false
            }
        });
        if chain_id != required {
            let mismatch = SessionError::NetworkMismatch {
                expected: required,
                actual: chain_id,
            };
            warn!(error = %mismatch, "wrong network");
        }
        if entered_correct {
            self.refresh_token_info().await;
        }
    }

    /// Ask the wallet to switch to the named network. Success is taken at face
    /// value; the chain-changed event that follows re-validates it.
    pub async fn switch_network(&self, network: &str) {
        let result = match self.inner.config.networks.chain_id(network) {
            Ok(chain_id) => {
                debug!(network, chain_id, "requesting chain switch");
                self.inner.provider.switch_chain(chain_id).await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                info!(network, "switched network");
                if self.update(SessionState::enter_correct) {
                    self.refresh_token_info().await;
                }
            }
            Err(e) => {
                error!(network, error = %e, "cannot switch network");
                self.update(SessionState::enter_incorrect);
            }
        }
    }

    /// Fetch name, symbol, and balance in order. Each read fails on its own.
    pub async fn refresh_token_info(&self) {
        match self.inner.contract.name().await {
            Ok(name) => self.set_token_field(|s| s.token_name = Some(name)),
            Err(e) => error!(error = %e, "cannot read token name"),
        }
        match self.inner.contract.symbol().await {
            Ok(symbol) => self.set_token_field(|s| s.token_symbol = Some(symbol)),
            Err(e) => error!(error = %e, "cannot read token symbol"),
        }
        self.refresh_balance().await;
    }

    pub async fn refresh_balance(&self) {
        let address = self.inner.state.borrow().wallet_address;
        let Some(address) = address else {
            warn!("cannot read token balance: wallet not connected");
            return;
        };
        match self.inner.contract.balance_of(address).await {
            Ok(raw) => {
                let balance = display::format_token_balance(raw);
                debug!(%address, %balance, "token balance");
                self.set_token_field(|s| s.token_balance = Some(balance));
            }
            Err(e) => error!(error = %e, "cannot read token balance"),
        }
    }

    /// Write a token field only while on the correct network. A read that
    /// completes after the network changed is discarded.
    fn set_token_field(&self, f: impl FnOnce(&mut SessionState)) {
        let applied = self.inner.state.send_if_modified(|s| {
            if s.network != NetworkReadiness::Correct {
                return false;
            }
            f(s);
            true
        });
        if !applied {
            debug!("discarding token read: not on the required network");
        }
    }

    pub fn start_default_balance_polling(&self) {
        self.start_balance_polling(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_MAX_TICKS);
    }

    /// Refresh the balance every `interval`, at most `max_ticks` times.
    /// Replaces any poll already running.
    pub fn start_balance_polling(&self, interval: Duration, max_ticks: u32) {
        let interval = if interval < MIN_POLL_INTERVAL {
            warn!(?interval, min = ?MIN_POLL_INTERVAL, "poll interval too short; clamping");
            MIN_POLL_INTERVAL
        } else {
            interval
        };
        let mut slot = self.inner.poll.lock();
        if let Some(previous) = slot.take() {
            debug!(generation = previous.generation, "superseding balance poll");
            previous.task.abort();
        }
        let generation = self.inner.poll_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let weak = Arc::downgrade(&self.inner);
        let task = tokio::spawn(poll_balance(weak, generation, interval, max_ticks));
        info!(generation, ?interval, max_ticks, "balance polling started");
        *slot = Some(PollHandle { generation, task });
    }

    pub fn stop_balance_polling(&self) {
        let mut slot = self.inner.poll.lock();
        if let Some(poll) = slot.take() {
            self.inner.poll_generation.fetch_add(1, Ordering::SeqCst);
            poll.task.abort();
            info!(generation = poll.generation, "balance polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.inner
            .poll
            .lock()
            .as_ref()
            .is_some_and(|poll| !poll.task.is_finished())
    }

    /// Encode `submit(surveyId, answers)` and hand it to the wallet.
    pub async fn submit_survey(&self, answers: &[U256]) -> Option<TxHash> {
        let state = self.state();
        let Some(from) = state.wallet_address else {
            let e = SessionError::InvalidState("Wallet not connected. Run 'connect' first.".into());
            error!(error = %e, "cannot submit the survey");
            return None;
        };
        if state.network == NetworkReadiness::Incorrect {
            let e = SessionError::NetworkMismatch {
                expected: self.inner.config.required_chain_id,
                actual: state.network_id.unwrap_or_default(),
            };
            error!(error = %e, "cannot submit the survey");
            return None;
        }

        let survey_id = self.inner.survey_ids.next_id();
        let tx = TransactionRequest {
            from,
            to: self.inner.contract.address(),
            data: self.inner.contract.encode_submit(survey_id, answers),
        };
        match self.inner.provider.send_transaction(tx).await {
            Ok(hash) => {
                info!(%hash, %survey_id, answers = answers.len(), "survey submitted");
                Some(hash)
            }
            Err(e) => {
                error!(%survey_id, error = %e, "error submitting the survey");
                None
            }
        }
    }

    fn register_chain_listener(&self) {
        let mut slot = self.inner.listener.lock();
        if slot.is_some() {
            debug!("chain listener already registered");
            return;
        }
        let Some(events) = self.inner.provider.subscribe_chain_changed() else {
            debug!("no wallet present; chain listener not registered");
            return;
        };
        let weak = Arc::downgrade(&self.inner);
        *slot = Some(tokio::spawn(listen_chain_changes(weak, events)));
    }
}

async fn poll_balance(
    session: Weak<SessionInner>,
    generation: u64,
    interval: Duration,
    max_ticks: u32,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    for tick in 1..=max_ticks {
        ticker.tick().await;
        let Some(inner) = session.upgrade() else {
            return;
        };
        if inner.poll_generation.load(Ordering::SeqCst) != generation {
            return;
        }
        debug!(tick, max_ticks, "polling token balance");
        WalletSession { inner }.refresh_balance().await;
    }
    if let Some(inner) = session.upgrade() {
        let mut slot = inner.poll.lock();
        if slot.as_ref().is_some_and(|p| p.generation == generation) {
            *slot = None;
            info!(generation, max_ticks, "balance polling finished");
        }
    }
}

async fn listen_chain_changes(
    session: Weak<SessionInner>,
    mut events: broadcast::Receiver<alloy_primitives::ChainId>,
) {
    loop {
        match events.recv().await {
            Ok(chain_id) => debug!(chain_id, "chain changed"),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "missed chain-changed events; re-checking network");
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
        let Some(inner) = session.upgrade() else {
            return;
        };
        WalletSession { inner }.check_network().await;
    }
}
