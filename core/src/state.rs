/// Session state: the read-only projection the UI layer renders.
use alloy_primitives::{Address, ChainId};
use serde::Serialize;

/// Network readiness as last observed by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkReadiness {
    /// No network check has completed yet.
    #[default]
    Unknown,
    Correct,
    Incorrect,
}

impl std::fmt::Display for NetworkReadiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Correct => write!(f, "correct"),
            Self::Incorrect => write!(f, "incorrect"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub wallet_installed: bool,
    pub wallet_connected: bool,
    pub wallet_address: Option<Address>,
    pub network_id: Option<ChainId>,
    pub network: NetworkReadiness,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    /// Balance in whole tokens, e.g. `"12.5"`.
    pub token_balance: Option<String>,
}

impl SessionState {
    pub fn correct_network(&self) -> bool {
        self.network == NetworkReadiness::Correct
    }

    pub(crate) fn set_connected(&mut self, address: Address) {
        self.wallet_connected = true;
        self.wallet_address = Some(address);
    }

    pub(crate) fn set_disconnected(&mut self) {
        self.wallet_connected = false;
        self.wallet_address = None;
    }

    /// Returns `true` when this call moved the session into `Correct`.
    pub(crate) fn enter_correct(&mut self) -> bool {
        let entered = self.network != NetworkReadiness::Correct;
        self.network = NetworkReadiness::Correct;
        entered
    }

    /// Token fields are cleared in the same step as the readiness change.
    pub(crate) fn enter_incorrect(&mut self) {
        self.token_name = None;
        self.token_symbol = None;
        self.token_balance = None;
        self.network = NetworkReadiness::Incorrect;
    }
}
