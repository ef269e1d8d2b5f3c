//! Rewrites the call data of a user operation according to the action its intent selects
use crate::{
    config::{BridgeConfig, DeploymentConfig, DispatchPolicy},
    error::AccountResult,
};
use tracing::debug;
use trampoline_contracts::bridge_call_data;
use trampoline_primitives::{
    prefund, ActionKind, TransactionIntent, UnknownActionError, UserOperation,
};

/// Maps the discriminator of an intent payload to the call the account executes
#[derive(Clone, Debug, Default)]
pub struct CalldataDispatcher {
    bridge: BridgeConfig,
    policy: DispatchPolicy,
}

impl CalldataDispatcher {
    pub fn new(bridge: BridgeConfig, policy: DispatchPolicy) -> Self {
        Self { bridge, policy }
    }

    pub fn from_config(config: &DeploymentConfig) -> Self {
        Self::new(config.bridge.clone(), config.dispatch_policy)
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Applies the action selected by `intent` to `uo`.
    ///
    /// * [ActionKind::Default] keeps the call data untouched.
    /// * [ActionKind::BridgeDispatch] replaces it with `test(recipient, amount)`, where the amount
    ///   defaults to the prefund of the gas fields already set on `uo`. Intent target and value
    ///   are ignored.
    /// * [ActionKind::Unrecognized] covers every other payload, ordinary contract calls included.
    ///   It keeps the call data, or fails under [DispatchPolicy::Strict].
    pub fn dispatch(
        &self,
        intent: &TransactionIntent,
        uo: UserOperation,
    ) -> AccountResult<UserOperation> {
        match intent.action_kind() {
            ActionKind::Default => Ok(uo),
            ActionKind::BridgeDispatch => {
                let params = intent.bridge.clone().unwrap_or_default();
                let recipient = params.recipient.unwrap_or(self.bridge.recipient);
                let amount = params.amount.unwrap_or_else(|| {
                    prefund(uo.pre_verification_gas, uo.verification_gas_limit, uo.call_gas_limit)
                });
                debug!(?recipient, %amount, "dispatching bridge call");
                Ok(uo.call_data(bridge_call_data(recipient, amount)))
            }
            ActionKind::Unrecognized(payload) => match self.policy {
                DispatchPolicy::Permissive => {
                    debug!(%payload, "no action for payload, leaving call data untouched");
                    Ok(uo)
                }
                DispatchPolicy::Strict => Err(UnknownActionError { payload }.into()),
            },
        }
    }
}
