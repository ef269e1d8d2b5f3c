//! JSON-RPC client of an ERC-4337 bundler
use crate::error::ProviderError;
use ethers::types::{Address, U64};
use jsonrpsee::{
    http_client::{HttpClient, HttpClientBuilder},
    proc_macros::rpc,
};
use tracing::debug;
use trampoline_primitives::{
    SignedUserOperation, UserOperation, UserOperationGasEstimation, UserOperationHash,
};

/// The ERC-4337 `eth` namespace methods the wallet calls on a bundler
#[rpc(client, namespace = "eth")]
pub trait BundlerApi {
    /// Retrieve the [EIP-155](https://eips.ethereum.org/EIPS/eip-155) chain ID of the bundler.
    #[method(name = "chainId")]
    async fn chain_id(&self) -> jsonrpsee::core::RpcResult<U64>;

    /// Send a signed [UserOperation](UserOperation) to the bundler's mempool.
    ///
    /// # Arguments
    /// * `user_operation: UserOperation` - The signed user operation.
    /// * `entry_point: Address` - The address of the entry point.
    ///
    /// # Returns
    /// * `UserOperationHash` - The hash of the sent user operation.
    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        user_operation: UserOperation,
        entry_point: Address,
    ) -> jsonrpsee::core::RpcResult<UserOperationHash>;

    /// Estimate the gas limits of a user operation. The signature only has to be well formed.
    #[method(name = "estimateUserOperationGas")]
    async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperation,
        entry_point: Address,
    ) -> jsonrpsee::core::RpcResult<UserOperationGasEstimation>;
}

/// Bundler client bound to one entry point
#[derive(Clone, Debug)]
pub struct BundlerClient {
    client: HttpClient,
    entry_point: Address,
}

fn bundler_error<E: ToString>(err: E) -> ProviderError {
    ProviderError::Bundler { inner: err.to_string() }
}

impl BundlerClient {
    /// Creates a client for the bundler at `url`; no request is made until the first call
    pub fn new(url: &str, entry_point: Address) -> Result<Self, ProviderError> {
        let client = HttpClientBuilder::default().build(url).map_err(bundler_error)?;
        Ok(Self { client, entry_point })
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    pub async fn chain_id(&self) -> Result<U64, ProviderError> {
        BundlerApiClient::chain_id(&self.client).await.map_err(bundler_error)
    }

    pub async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationGasEstimation, ProviderError> {
        BundlerApiClient::estimate_user_operation_gas(&self.client, uo.clone(), self.entry_point)
            .await
            .map_err(bundler_error)
    }

    /// Submits the signed user operation and returns the hash reported by the bundler
    pub async fn send(&self, uo: &SignedUserOperation) -> Result<UserOperationHash, ProviderError> {
        let hash = BundlerApiClient::send_user_operation(
            &self.client,
            uo.user_operation().clone(),
            self.entry_point,
        )
        .await
        .map_err(bundler_error)?;

        if hash != uo.hash() {
            debug!(local = %uo.hash(), remote = %hash, "bundler returned a different user operation hash");
        }
        Ok(hash)
    }
}
