/// EIP-1193 method calls carried as JSON-RPC 2.0 over HTTP.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, Bytes, ChainId, TxHash};
use anyhow::bail;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{CallRequest, RpcResponse, TransactionRequest, WalletProvider};
use crate::error::{Result, SessionError};

/// How often the chain watcher polls `eth_chainId` for changes.
pub const DEFAULT_CHAIN_WATCH_INTERVAL: Duration = Duration::from_secs(1);

const CHAIN_EVENT_CAPACITY: usize = 16;

/// Reject non-HTTPS endpoints unless `allow_insecure` is set.
fn validate_rpc_url(url: &str, allow_insecure: bool) -> anyhow::Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if url.starts_with("http://") {
        if allow_insecure {
            return Ok(());
        }
        bail!("Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections.");
    }
    bail!("Invalid RPC URL scheme: {url}\nExpected an https:// URL.");
}

fn rpc_request(id: u64, method: &str, params: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Parse a hex quantity such as `"0x1"` into an integer.
fn parse_hex_quantity(value: &str) -> Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| SessionError::Encoding(format!("Expected hex quantity, got '{value}'")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| SessionError::Encoding(format!("Invalid hex quantity '{value}': {e}")))
}

fn decode_response<T: DeserializeOwned>(method: &str, response: RpcResponse) -> Result<T> {
    if let Some(err) = response.error {
        return Err(SessionError::from_rpc_code(err.code, &err.message));
    }
    serde_json::from_value(response.result)
        .map_err(|e| SessionError::Encoding(format!("Unexpected result for {method}: {e}")))
}

async fn post_rpc<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    id: u64,
    method: &str,
    params: serde_json::Value,
) -> Result<T> {
    let response: RpcResponse = client
        .post(url)
        .json(&rpc_request(id, method, params))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    decode_response(method, response)
}

/// Poll `eth_chainId` and broadcast every change after the first observation.
async fn watch_chain(
    client: reqwest::Client,
    url: String,
    interval: Duration,
    events: broadcast::Sender<ChainId>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<ChainId> = None;
    loop {
        ticker.tick().await;
        let observed = post_rpc::<String>(&client, &url, 0, "eth_chainId", serde_json::json!([]))
            .await
            .and_then(|s| parse_hex_quantity(&s));
        match observed {
            Ok(chain_id) => {
                if last.is_some_and(|prev| prev != chain_id) {
                    debug!(chain_id, "chain changed");
                    // No receivers is fine; the next subscriber starts fresh.
                    let _ = events.send(chain_id);
                }
                last = Some(chain_id);
            }
            Err(e) => debug!(error = %e, "chain watch poll failed"),
        }
    }
}

/// Wallet adapter backed by a JSON-RPC endpoint (a wallet bridge or a dev node
/// with unlocked accounts).
pub struct JsonRpcWallet {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
    watch_interval: Duration,
    chain_events: broadcast::Sender<ChainId>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl JsonRpcWallet {
    pub fn new(url: &str, allow_insecure: bool) -> anyhow::Result<Self> {
        validate_rpc_url(url, allow_insecure)?;
        let (chain_events, _) = broadcast::channel(CHAIN_EVENT_CAPACITY);
        Ok(Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            next_id: AtomicU64::new(1),
            watch_interval: DEFAULT_CHAIN_WATCH_INTERVAL,
            chain_events,
            watcher: Mutex::new(None),
        })
    }

    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        self.watch_interval = interval;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "rpc request");
        post_rpc(&self.client, &self.url, id, method, params).await
    }
}

impl Drop for JsonRpcWallet {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.get_mut().take() {
            watcher.abort();
        }
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    fn is_present(&self) -> bool {
        true
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_requestAccounts", serde_json::json!([])).await
    }

    async fn chain_id(&self) -> Result<ChainId> {
        let hex: String = self.request("eth_chainId", serde_json::json!([])).await?;
        parse_hex_quantity(&hex)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<()> {
        let params = serde_json::json!([{ "chainId": format!("{chain_id:#x}") }]);
        match self
            .request::<serde_json::Value>("wallet_switchEthereumChain", params)
            .await
        {
            Ok(_) => Ok(()),
            Err(SessionError::UserRejected(msg)) => Err(SessionError::SwitchRejected(msg)),
            Err(e) => Err(e),
        }
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        self.request("eth_sendTransaction", serde_json::json!([tx]))
            .await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let call = CallRequest { to, data };
        self.request("eth_call", serde_json::json!([call, "latest"]))
            .await
    }

    fn subscribe_chain_changed(&self) -> Option<broadcast::Receiver<ChainId>> {
        let rx = self.chain_events.subscribe();
        let mut watcher = self.watcher.lock();
        if watcher.is_none() {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    *watcher = Some(handle.spawn(watch_chain(
                        self.client.clone(),
                        self.url.clone(),
                        self.watch_interval,
                        self.chain_events.clone(),
                    )));
                }
                Err(_) => warn!("No async runtime; chain-change notifications disabled"),
            }
        }
        Some(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> RpcResponse {
        serde_json::from_str(body).expect("valid response body")
    }

    #[test]
    fn rejects_http_url_without_insecure() {
        let err = JsonRpcWallet::new("http://127.0.0.1:8545", false)
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("--insecure"));
    }

    #[test]
    fn accepts_http_url_with_insecure() {
        let wallet = JsonRpcWallet::new("http://127.0.0.1:8545", true).unwrap();
        assert_eq!(wallet.url(), "http://127.0.0.1:8545");
        assert!(wallet.is_present());
    }

    #[test]
    fn rejects_invalid_url_scheme() {
        let err = JsonRpcWallet::new("ws://example.com", false)
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("Invalid RPC URL scheme"));
    }

    #[test]
    fn parses_hex_chain_ids() {
        assert_eq!(parse_hex_quantity("0x1").unwrap(), 1);
        assert_eq!(parse_hex_quantity("0xaa36a7").unwrap(), 11_155_111);
        assert_eq!(parse_hex_quantity("0X7A69").unwrap(), 31_337);
        assert!(parse_hex_quantity("1").is_err());
        assert!(parse_hex_quantity("0xzz").is_err());
    }

    #[test]
    fn request_envelope_shape() {
        let req = rpc_request(7, "eth_chainId", serde_json::json!([]));
        assert_eq!(req["jsonrpc"], "2.0");
        assert_eq!(req["id"], 7);
        assert_eq!(req["method"], "eth_chainId");
        assert!(req["params"].as_array().unwrap().is_empty());
    }

    #[test]
    fn decodes_success_result() {
        let body = response(r#"{"jsonrpc":"2.0","id":1,"result":"0x4"}"#);
        let hex: String = decode_response("eth_chainId", body).unwrap();
        assert_eq!(hex, "0x4");
    }

    #[test]
    fn null_result_decodes_as_unit_value() {
        let body = response(r#"{"jsonrpc":"2.0","id":1,"result":null}"#);
        let value: serde_json::Value =
            decode_response("wallet_switchEthereumChain", body).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn maps_error_object_to_user_rejected() {
        let body = response(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#,
        );
        let err = decode_response::<Vec<Address>>("eth_requestAccounts", body).unwrap_err();
        assert!(matches!(err, SessionError::UserRejected(_)));
    }

    #[test]
    fn wrong_result_type_is_encoding_error() {
        let body = response(r#"{"jsonrpc":"2.0","id":1,"result":42}"#);
        let err = decode_response::<Vec<Address>>("eth_requestAccounts", body).unwrap_err();
        assert!(matches!(err, SessionError::Encoding(_)));
    }

    #[test]
    fn transaction_params_serialize_as_hex() {
        let tx = TransactionRequest {
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            data: Bytes::from(vec![0xde, 0xad]),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["data"], "0xdead");
        assert!(json["from"].as_str().unwrap().starts_with("0x"));
    }
}
