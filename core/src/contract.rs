//! Typed proxy for the survey token contract.
//!
//! Reads go through the wallet provider's `eth_call` transport; writes are only
//! encoded here and handed to the wallet for signing.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::error::{Result, SessionError};
use crate::provider::WalletProvider;

sol! {
    interface ISurveyToken {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function balanceOf(address account) external view returns (uint256);
        function submit(uint256 surveyId, uint256[] answers) external;
    }
}

pub struct ContractProxy {
    provider: Arc<dyn WalletProvider>,
    address: Address,
}

impl ContractProxy {
    pub fn new(provider: Arc<dyn WalletProvider>, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Encode a view call, run it, and decode the returns.
    async fn call_view<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let output = self
            .provider
            .call(self.address, Bytes::from(call.abi_encode()))
            .await?;
        if output.is_empty() {
            return Err(SessionError::Rpc(format!(
                "Empty result from {} (is {} a contract on this chain?)",
                C::SIGNATURE,
                self.address
            )));
        }
        Ok(C::abi_decode_returns(&output, true)?)
    }

    pub async fn name(&self) -> Result<String> {
        Ok(self.call_view(ISurveyToken::nameCall {}).await?._0)
    }

    pub async fn symbol(&self) -> Result<String> {
        Ok(self.call_view(ISurveyToken::symbolCall {}).await?._0)
    }

    /// Raw balance in base units.
    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        Ok(self
            .call_view(ISurveyToken::balanceOfCall { account })
            .await?
            ._0)
    }

    /// Call data for `submit(surveyId, answers)`.
    pub fn encode_submit(&self, survey_id: U256, answers: &[U256]) -> Bytes {
        ISurveyToken::submitCall {
            surveyId: survey_id,
            answers: answers.to_vec(),
        }
        .abi_encode()
        .into()
    }
}
