//! Facade over the execution client and the bundler used while building user operations
use crate::{bundler::BundlerClient, error::ProviderError};
use async_trait::async_trait;
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use std::sync::Arc;
use tracing::trace;
use trampoline_contracts::{contract_error_message, EntryPointAPI, SimpleAccountFactoryAPI};
use trampoline_primitives::{
    constants::entry_point::NONCE_KEY, SignedUserOperation, UserOperation,
    UserOperationGasEstimation, UserOperationHash,
};

/// External collaborators of the user operation builder
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Counterfactual address of the account `factory` deploys for `owner` with salt `index`
    async fn get_sender_address(
        &self,
        factory: Address,
        owner: Address,
        index: U256,
    ) -> Result<Address, ProviderError>;

    /// Next sequential nonce of the account at the entry point
    async fn get_nonce(&self, sender: Address) -> Result<U256, ProviderError>;

    /// Whether the account contract already has code
    async fn is_deployed(&self, sender: Address) -> Result<bool, ProviderError>;

    /// Current `(max_fee_per_gas, max_priority_fee_per_gas)`
    async fn estimate_fees(&self) -> Result<(U256, U256), ProviderError>;

    /// Gas limits of a user operation carrying a dummy signature
    async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationGasEstimation, ProviderError>;

    /// Submits a signed user operation
    async fn send_user_operation(
        &self,
        uo: &SignedUserOperation,
    ) -> Result<UserOperationHash, ProviderError>;
}

/// [AccountProvider] backed by an ethers middleware and a bundler client
pub struct EthersAccountProvider<M: Middleware> {
    eth_client: Arc<M>,
    entry_point: EntryPointAPI<M>,
    bundler: BundlerClient,
}

impl<M: Middleware + 'static> EthersAccountProvider<M> {
    pub fn new(eth_client: Arc<M>, entry_point: Address, bundler: BundlerClient) -> Self {
        Self {
            entry_point: EntryPointAPI::new(entry_point, eth_client.clone()),
            eth_client,
            bundler,
        }
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point.address()
    }

    pub fn bundler(&self) -> &BundlerClient {
        &self.bundler
    }
}

#[async_trait]
impl<M: Middleware + 'static> AccountProvider for EthersAccountProvider<M> {
    async fn get_sender_address(
        &self,
        factory: Address,
        owner: Address,
        index: U256,
    ) -> Result<Address, ProviderError> {
        let factory = SimpleAccountFactoryAPI::new(factory, self.eth_client.clone());
        factory
            .get_address(owner, index)
            .call()
            .await
            .map_err(|e| ProviderError::Contract { inner: contract_error_message(e) })
    }

    async fn get_nonce(&self, sender: Address) -> Result<U256, ProviderError> {
        self.entry_point
            .get_nonce(sender, U256::from(NONCE_KEY))
            .call()
            .await
            .map_err(|e| ProviderError::Contract { inner: contract_error_message(e) })
    }

    async fn is_deployed(&self, sender: Address) -> Result<bool, ProviderError> {
        let code = self
            .eth_client
            .get_code(sender, None)
            .await
            .map_err(|e| ProviderError::Provider { inner: e.to_string() })?;
        trace!(?sender, code_len = code.len(), "fetched account code");
        Ok(!code.is_empty())
    }

    async fn estimate_fees(&self) -> Result<(U256, U256), ProviderError> {
        self.eth_client
            .estimate_eip1559_fees(None)
            .await
            .map_err(|e| ProviderError::Provider { inner: e.to_string() })
    }

    async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationGasEstimation, ProviderError> {
        self.bundler.estimate_user_operation_gas(uo).await
    }

    async fn send_user_operation(
        &self,
        uo: &SignedUserOperation,
    ) -> Result<UserOperationHash, ProviderError> {
        self.bundler.send(uo).await
    }
}
