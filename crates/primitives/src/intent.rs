//! High-level transaction intents and the actions they select

use crate::constants::dispatch::BRIDGE_SENTINEL;
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Action selected by the discriminator at the start of an intent payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Empty payload (`0x`): plain call of the target with the value
    Default,
    /// Bridge sentinel (`0x01`): call data is replaced with the bridge call
    BridgeDispatch,
    /// Any other payload
    Unrecognized(Bytes),
}

impl ActionKind {
    /// Classifies a payload by its discriminator
    pub fn from_payload(payload: &[u8]) -> Self {
        match payload {
            [] => Self::Default,
            p if p == BRIDGE_SENTINEL => Self::BridgeDispatch,
            p => Self::Unrecognized(Bytes::from(p.to_vec())),
        }
    }
}

/// Payload did not start with a known discriminator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown action discriminator in payload {payload}")]
pub struct UnknownActionError {
    pub payload: Bytes,
}

/// Optional gas values that take precedence over provider estimates
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_verification_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
}

/// Caller supplied parameters for the bridge action; unset fields fall back to the deployment
/// configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<U256>,
}

/// Transaction intent, as requested by a dapp through `eth_sendTransaction`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionIntent {
    /// Call target
    pub target: Address,
    /// Native value sent along
    #[serde(default)]
    pub value: U256,
    /// Discriminator plus optional arguments; passed to the target as-is on the default path
    #[serde(default)]
    pub data: Bytes,
    #[serde(default)]
    pub gas_hints: GasHints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge: Option<BridgeParams>,
}

impl TransactionIntent {
    pub fn new(target: Address, value: U256, data: Bytes) -> Self {
        Self { target, value, data, ..Default::default() }
    }

    /// Action selected by the payload, without validation
    pub fn action_kind(&self) -> ActionKind {
        ActionKind::from_payload(&self.data)
    }

    /// Action selected by the payload; unknown discriminators are rejected
    pub fn action(&self) -> Result<ActionKind, UnknownActionError> {
        match self.action_kind() {
            ActionKind::Unrecognized(payload) => Err(UnknownActionError { payload }),
            kind => Ok(kind),
        }
    }

    /// Sets the gas hints of the intent
    pub fn gas_hints(mut self, gas_hints: GasHints) -> Self {
        self.gas_hints = gas_hints;
        self
    }

    /// Sets the bridge parameters of the intent
    pub fn bridge(mut self, bridge: BridgeParams) -> Self {
        self.bridge = Some(bridge);
        self
    }
}
