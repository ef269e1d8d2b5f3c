//! Account abstraction (ERC-4337) smart contract wallet
//!
//! Turns transaction intents into signed user operations: the account identity, the user
//! operation builder with its calldata dispatcher, the signer, and the provider facade that talks
//! to the execution client and the bundler.

mod api;
mod builder;
mod bundler;
mod config;
mod dispatcher;
mod error;
mod identity;
mod provider;
mod signer;

pub use api::{AccountApi, SimpleAccountApi};
pub use builder::{PaymasterContext, UserOperationBuilder};
pub use bundler::{BundlerApiClient, BundlerClient};
pub use config::{BridgeConfig, DeploymentConfig, DispatchPolicy};
pub use dispatcher::CalldataDispatcher;
pub use error::{AccountError, AccountResult, ConfigError, ProviderError};
pub use identity::{AccountIdentity, SerializedIdentityState};
pub use provider::{AccountProvider, EthersAccountProvider};
pub use signer::UserOperationSigner;
