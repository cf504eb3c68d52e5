use alloy_primitives::{Address, Bytes, ChainId, TxHash};
use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{TransactionRequest, WalletProvider};
use crate::error::{Result, SessionError};

/// Stand-in for a host environment without any wallet installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedWallet;

#[async_trait]
impl WalletProvider for DetachedWallet {
    fn is_present(&self) -> bool {
        false
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Err(SessionError::ProviderAbsent)
    }

    async fn chain_id(&self) -> Result<ChainId> {
        Err(SessionError::ProviderAbsent)
    }

    async fn switch_chain(&self, _chain_id: ChainId) -> Result<()> {
        Err(SessionError::ProviderAbsent)
    }

    async fn send_transaction(&self, _tx: TransactionRequest) -> Result<TxHash> {
        Err(SessionError::ProviderAbsent)
    }

    async fn call(&self, _to: Address, _data: Bytes) -> Result<Bytes> {
        Err(SessionError::ProviderAbsent)
    }

    fn subscribe_chain_changed(&self) -> Option<broadcast::Receiver<ChainId>> {
        None
    }
}
