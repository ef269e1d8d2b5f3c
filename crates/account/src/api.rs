//! Capabilities a smart contract wallet account offers to the wallet UI
use crate::{
    builder::{PaymasterContext, UserOperationBuilder},
    config::DeploymentConfig,
    dispatcher::CalldataDispatcher,
    error::{AccountError, AccountResult},
    identity::{AccountIdentity, SerializedIdentityState},
    provider::AccountProvider,
    signer::UserOperationSigner,
};
use async_trait::async_trait;
use ethers::types::{Address, Bytes};
use std::sync::Arc;
use trampoline_primitives::{SignedUserOperation, TransactionIntent, UserOperation};

/// Account facing API of the wallet
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Counterfactual address of the account
    async fn address(&self) -> AccountResult<Address>;

    /// Key state to persist
    fn serialize(&self) -> SerializedIdentityState;

    /// Builds the unsigned user operation of `intent`, dispatch and paymaster included
    async fn build_unsigned(
        &self,
        intent: &TransactionIntent,
        context: Option<&PaymasterContext>,
    ) -> AccountResult<UserOperation>;

    /// Builds the user operation of `intent` without dispatch and signs it
    async fn sign_direct(
        &self,
        intent: &TransactionIntent,
        context: Option<&PaymasterContext>,
    ) -> AccountResult<SignedUserOperation>;

    /// Signs an operation returned by [build_unsigned](Self::build_unsigned)
    async fn sign_with_context(&self, uo: UserOperation) -> AccountResult<SignedUserOperation>;

    /// Signing arbitrary messages is not supported by the account
    async fn sign_message(&self, message: &[u8]) -> AccountResult<Bytes>;
}

/// [AccountApi] of a simple account deployed by the configured factory
pub struct SimpleAccountApi<P: AccountProvider + ?Sized> {
    identity: AccountIdentity,
    provider: Arc<P>,
    config: DeploymentConfig,
    builder: UserOperationBuilder<P>,
    signer: UserOperationSigner,
}

impl<P: AccountProvider + ?Sized> SimpleAccountApi<P> {
    pub fn new(identity: AccountIdentity, provider: Arc<P>, config: DeploymentConfig) -> Self {
        let builder =
            UserOperationBuilder::new(provider.clone(), CalldataDispatcher::from_config(&config));
        let signer = UserOperationSigner::new(config.entry_point_address, config.chain_id);
        Self { identity, provider, config, builder, signer }
    }

    pub fn identity(&self) -> &AccountIdentity {
        &self.identity
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    pub fn signer(&self) -> &UserOperationSigner {
        &self.signer
    }
}

#[async_trait]
impl<P: AccountProvider + ?Sized> AccountApi for SimpleAccountApi<P> {
    async fn address(&self) -> AccountResult<Address> {
        self.identity.address(self.provider.as_ref()).await
    }

    fn serialize(&self) -> SerializedIdentityState {
        self.identity.serialize()
    }

    async fn build_unsigned(
        &self,
        intent: &TransactionIntent,
        context: Option<&PaymasterContext>,
    ) -> AccountResult<UserOperation> {
        self.builder.build_unsigned(&self.identity, intent, context).await
    }

    async fn sign_direct(
        &self,
        intent: &TransactionIntent,
        context: Option<&PaymasterContext>,
    ) -> AccountResult<SignedUserOperation> {
        let uo = self.builder.build_passthrough(&self.identity, intent, context).await?;
        self.signer.sign(uo, &self.identity).await
    }

    async fn sign_with_context(&self, uo: UserOperation) -> AccountResult<SignedUserOperation> {
        self.signer.sign(uo, &self.identity).await
    }

    async fn sign_message(&self, _message: &[u8]) -> AccountResult<Bytes> {
        Err(AccountError::NotImplemented { method: "signMessage".into() })
    }
}
