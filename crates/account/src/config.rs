//! Deployment configuration consumed by the account pipeline

use crate::error::ConfigError;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use strum_macros::{EnumString, EnumVariantNames};
use trampoline_primitives::constants::{
    account::FACTORY_ADDRESS,
    dispatch::BRIDGE_RECIPIENT,
    entry_point,
    network::{BUNDLER_ADDRESS, CHAIN_ID, ETH_CLIENT_ADDRESS},
};

/// How the calldata dispatcher treats payloads with an unknown discriminator
#[derive(
    Clone, Copy, Debug, Default, EnumString, EnumVariantNames, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab_case")]
#[serde(rename_all = "kebab-case")]
pub enum DispatchPolicy {
    /// Leave the call data untouched; ordinary contract calls take this path
    #[default]
    Permissive,
    /// Reject the intent.
    ///
    /// Only empty payloads (plain transfers) and the bridge discriminator pass, so every
    /// contract call, ERC-20 transfers included, is refused.
    Strict,
}

/// Static parameters of the bridge action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Receiver of the bridged amount unless the intent names one
    pub recipient: Address,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            recipient: parse_const(BRIDGE_RECIPIENT),
        }
    }
}

/// Network and contract addresses the wallet runs against
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentConfig {
    /// Simple account factory
    pub factory_address: Address,
    /// Entry point contract
    pub entry_point_address: Address,
    /// Chain the user operations are signed for
    pub chain_id: u64,
    /// Ethereum execution client RPC endpoint
    pub eth_client_address: String,
    /// Bundler RPC endpoint
    pub bundler_address: String,
    /// Bridge action parameters
    pub bridge: BridgeConfig,
    /// Handling of unknown discriminators
    pub dispatch_policy: DispatchPolicy,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            factory_address: parse_const(FACTORY_ADDRESS),
            entry_point_address: parse_const(entry_point::ADDRESS),
            chain_id: CHAIN_ID,
            eth_client_address: ETH_CLIENT_ADDRESS.into(),
            bundler_address: BUNDLER_ADDRESS.into(),
            bridge: BridgeConfig::default(),
            dispatch_policy: DispatchPolicy::default(),
        }
    }
}

impl DeploymentConfig {
    /// Loads the configuration from a JSON file; missing fields take the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn parse_const(addr: &str) -> Address {
    addr.parse().expect("Address constants valid")
}
