//! Domain error type for wallet session operations.

use alloy_primitives::ChainId;
use thiserror::Error;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED_CODE: i64 = 4001;
/// EIP-3326: the requested chain has not been added to the wallet.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Typed error enum for session operations, allowing callers to match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No wallet provider is installed in the host environment.
    #[error("No wallet provider available")]
    ProviderAbsent,

    /// The user explicitly denied the request in the wallet.
    #[error("Request rejected by the user: {0}")]
    UserRejected(String),

    /// The wallet is connected to a different chain than the one required.
    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    NetworkMismatch { expected: ChainId, actual: ChainId },

    /// The wallet refused to switch chains.
    #[error("Chain switch rejected: {0}")]
    SwitchRejected(String),

    /// The chain (or network name) is not known to the wallet or configuration.
    #[error("Unrecognized chain: {0}")]
    UnrecognizedChain(String),

    /// Adapter or contract call failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Malformed call data or undecodable return data.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Operation not valid in the current session state.
    #[error("{0}")]
    InvalidState(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SessionError {
    /// Map a JSON-RPC / EIP-1193 error object to a session error.
    pub fn from_rpc_code(code: i64, message: &str) -> Self {
        match code {
            USER_REJECTED_CODE => Self::UserRejected(message.to_string()),
            UNRECOGNIZED_CHAIN_CODE => Self::UnrecognizedChain(message.to_string()),
            _ => Self::Rpc(format!("{message} (code {code})")),
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(e: reqwest::Error) -> Self {
        Self::Rpc(e.to_string())
    }
}

impl From<alloy_sol_types::Error> for SessionError {
    fn from(e: alloy_sol_types::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

/// Alias for `std::result::Result<T, SessionError>`.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_eip1193_codes() {
        assert!(matches!(
            SessionError::from_rpc_code(4001, "User denied"),
            SessionError::UserRejected(_)
        ));
        assert!(matches!(
            SessionError::from_rpc_code(4902, "Unknown chain"),
            SessionError::UnrecognizedChain(_)
        ));
        let other = SessionError::from_rpc_code(-32603, "Internal error");
        assert!(matches!(other, SessionError::Rpc(_)));
        assert!(other.to_string().contains("-32603"));
    }

    #[test]
    fn network_mismatch_names_both_chains() {
        let err = SessionError::NetworkMismatch {
            expected: 1,
            actual: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected chain 1"));
        assert!(msg.contains("chain 4"));
    }
}
