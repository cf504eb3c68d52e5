/// Wallet provider abstraction: the capability surface of an injected EIP-1193 wallet.
mod detached;
mod rpc;
mod types;

pub use detached::DetachedWallet;
pub use rpc::{JsonRpcWallet, DEFAULT_CHAIN_WATCH_INTERVAL};
pub use types::*;

use alloy_primitives::{Address, Bytes, ChainId, TxHash};
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether a wallet is present in the host environment.
    fn is_present(&self) -> bool;

    /// Ask the wallet to authorize accounts (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// The chain the wallet is currently connected to (`eth_chainId`).
    async fn chain_id(&self) -> Result<ChainId>;

    /// Ask the wallet to switch chains (`wallet_switchEthereumChain`).
    /// Fails with `SwitchRejected` or `UnrecognizedChain`.
    async fn switch_chain(&self, chain_id: ChainId) -> Result<()>;

    /// Hand a transaction to the wallet for signing and broadcast.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Read-only contract call (`eth_call` against the latest block).
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// Subscribe to chain-changed notifications. `None` when no wallet is present.
    fn subscribe_chain_changed(&self) -> Option<broadcast::Receiver<ChainId>>;
}
