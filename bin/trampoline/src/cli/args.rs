use crate::utils::{
    parse_address, parse_bytes, parse_dispatch_policy, parse_u256, validate_private_key,
};
use clap::Parser;
use ethers::types::{Address, Bytes, U256};
use expanded_pathbuf::ExpandedPathBuf;
use std::path::PathBuf;
use trampoline_account::{DeploymentConfig, DispatchPolicy, PaymasterContext};
use trampoline_primitives::{BridgeParams, GasHints, TransactionIntent};

/// Deployment CLI args; flags take precedence over the config file
#[derive(Debug, Clone, Parser)]
pub struct DeploymentArgs {
    /// Data directory holding the account identity.
    ///
    /// By default, this option is set to `~/.trampoline`.
    #[clap(long)]
    pub datadir: Option<ExpandedPathBuf>,

    /// Path to a JSON deployment config file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Ethereum execution client RPC endpoint.
    #[clap(long)]
    pub eth_client_address: Option<String>,

    /// Bundler RPC endpoint.
    #[clap(long)]
    pub bundler_address: Option<String>,

    /// Entry point address.
    #[clap(long, value_parser=parse_address)]
    pub entry_point: Option<Address>,

    /// Simple account factory address.
    #[clap(long, value_parser=parse_address)]
    pub factory: Option<Address>,

    /// The chain id user operations are signed for.
    #[clap(long)]
    pub chain_id: Option<u64>,

    /// Handling of unknown action discriminators (`permissive` or `strict`).
    #[clap(long, value_parser=parse_dispatch_policy)]
    pub dispatch_policy: Option<DispatchPolicy>,
}

impl DeploymentArgs {
    /// Loads the config file (or the defaults) and applies the flags on top of it
    pub fn deployment_config(&self) -> eyre::Result<DeploymentConfig> {
        let mut config = match &self.config {
            Some(path) => DeploymentConfig::from_file(path)?,
            None => DeploymentConfig::default(),
        };

        if let Some(eth_client_address) = &self.eth_client_address {
            config.eth_client_address = eth_client_address.clone();
        }
        if let Some(bundler_address) = &self.bundler_address {
            config.bundler_address = bundler_address.clone();
        }
        if let Some(entry_point) = self.entry_point {
            config.entry_point_address = entry_point;
        }
        if let Some(factory) = self.factory {
            config.factory_address = factory;
        }
        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
        if let Some(dispatch_policy) = self.dispatch_policy {
            config.dispatch_policy = dispatch_policy;
        }

        Ok(config)
    }
}

/// Transaction intent CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct IntentArgs {
    /// Call target.
    #[clap(long, value_parser=parse_address)]
    pub target: Address,

    /// Value (wei) sent along with the call.
    #[clap(long, default_value = "0", value_parser=parse_u256)]
    pub value: U256,

    /// Call payload; `0x01` selects the bridge action.
    #[clap(long, default_value = "0x", value_parser=parse_bytes)]
    pub data: Bytes,

    /// Call gas limit, instead of the bundler estimate.
    #[clap(long, value_parser=parse_u256)]
    pub call_gas_limit: Option<U256>,

    /// Verification gas limit, instead of the bundler estimate.
    #[clap(long, value_parser=parse_u256)]
    pub verification_gas_limit: Option<U256>,

    /// Pre-verification gas, instead of the bundler estimate.
    #[clap(long, value_parser=parse_u256)]
    pub pre_verification_gas: Option<U256>,

    /// Max fee per gas, instead of the execution client estimate.
    #[clap(long, value_parser=parse_u256)]
    pub max_fee_per_gas: Option<U256>,

    /// Max priority fee per gas, instead of the execution client estimate.
    #[clap(long, value_parser=parse_u256)]
    pub max_priority_fee_per_gas: Option<U256>,

    /// Recipient of the bridge action.
    #[clap(long, value_parser=parse_address)]
    pub bridge_recipient: Option<Address>,

    /// Amount of the bridge action; defaults to the prefund of the user operation.
    #[clap(long, value_parser=parse_u256)]
    pub bridge_amount: Option<U256>,

    /// Paymaster address and data sponsoring the user operation.
    #[clap(long, value_parser=parse_bytes)]
    pub paymaster_and_data: Option<Bytes>,
}

impl IntentArgs {
    pub fn intent(&self) -> TransactionIntent {
        let intent = TransactionIntent::new(self.target, self.value, self.data.clone()).gas_hints(
            GasHints {
                call_gas_limit: self.call_gas_limit,
                verification_gas_limit: self.verification_gas_limit,
                pre_verification_gas: self.pre_verification_gas,
                max_fee_per_gas: self.max_fee_per_gas,
                max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            },
        );

        if self.bridge_recipient.is_some() || self.bridge_amount.is_some() {
            intent.bridge(BridgeParams {
                recipient: self.bridge_recipient,
                amount: self.bridge_amount,
            })
        } else {
            intent
        }
    }

    pub fn paymaster_context(&self) -> Option<PaymasterContext> {
        self.paymaster_and_data.clone().map(PaymasterContext::new)
    }
}

/// Create account CLI args
#[derive(Debug, Clone, Parser)]
pub struct CreateAccountArgs {
    /// Data directory the identity is written to.
    ///
    /// By default, this option is set to `~/.trampoline`.
    #[clap(long)]
    pub datadir: Option<ExpandedPathBuf>,

    /// Existing private key to import instead of generating a new one.
    #[clap(long, value_parser=validate_private_key)]
    pub private_key: Option<String>,

    /// Simple account factory address.
    #[clap(long, value_parser=parse_address)]
    pub factory: Option<Address>,
}

/// Prefund CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct PrefundArgs {
    /// Pre-verification gas (decimal or hex).
    #[clap(long)]
    pub pre_verification_gas: String,

    /// Verification gas limit (decimal or hex).
    #[clap(long)]
    pub verification_gas_limit: String,

    /// Call gas limit (decimal or hex).
    #[clap(long)]
    pub call_gas_limit: String,
}
