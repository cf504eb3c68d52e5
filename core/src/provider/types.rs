use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// Parameters for `eth_sendTransaction`. Gas and nonce are left to the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

/// Parameters for `eth_call`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRequest {
    pub to: Address,
    pub data: Bytes,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// JSON-RPC 2.0 response envelope. `result` is `null` for methods such as
/// `wallet_switchEthereumChain` that succeed without a value.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: serde_json::Value,
    pub error: Option<RpcErrorObject>,
}
