//! Construction of unsigned user operations from transaction intents
use crate::{
    dispatcher::CalldataDispatcher, error::AccountResult, identity::AccountIdentity,
    provider::AccountProvider,
};
use ethers::types::{Bytes, U256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use trampoline_contracts::execute_call_data;
use trampoline_primitives::{
    constants::{
        account::DUMMY_SIGNATURE,
        gas::{CREATION_VERIFICATION_GAS, DEFAULT_CALL_GAS_LIMIT, DEFAULT_VERIFICATION_GAS_LIMIT},
    },
    GasHints, Overhead, TransactionIntent, UserOperation,
};

/// Caller supplied sponsorship of a user operation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterContext {
    /// Paymaster address followed by paymaster specific data
    pub paymaster_and_data: Bytes,
}

impl PaymasterContext {
    pub fn new(paymaster_and_data: Bytes) -> Self {
        Self { paymaster_and_data }
    }
}

/// Builds unsigned [UserOperation]s, asking the provider for every chain dependent field
pub struct UserOperationBuilder<P: AccountProvider + ?Sized> {
    provider: Arc<P>,
    dispatcher: CalldataDispatcher,
    overhead: Overhead,
}

impl<P: AccountProvider + ?Sized> UserOperationBuilder<P> {
    pub fn new(provider: Arc<P>, dispatcher: CalldataDispatcher) -> Self {
        Self { provider, dispatcher, overhead: Overhead::default() }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn dispatcher(&self) -> &CalldataDispatcher {
        &self.dispatcher
    }

    /// Builds the user operation of `intent`, dispatching its action before attaching the
    /// paymaster. The returned operation is unsigned.
    ///
    /// Provider failures abort the construction with
    /// [BuilderFailure](crate::AccountError::BuilderFailure).
    pub async fn build_unsigned(
        &self,
        identity: &AccountIdentity,
        intent: &TransactionIntent,
        context: Option<&PaymasterContext>,
    ) -> AccountResult<UserOperation> {
        let uo = self.draft(identity, intent).await?;
        let uo = self.dispatcher.dispatch(intent, uo)?;
        Ok(Self::attach_paymaster(uo, context))
    }

    /// Same as [build_unsigned](Self::build_unsigned) without the dispatch stage
    pub async fn build_passthrough(
        &self,
        identity: &AccountIdentity,
        intent: &TransactionIntent,
        context: Option<&PaymasterContext>,
    ) -> AccountResult<UserOperation> {
        let uo = self.draft(identity, intent).await?;
        Ok(Self::attach_paymaster(uo, context))
    }

    async fn draft(
        &self,
        identity: &AccountIdentity,
        intent: &TransactionIntent,
    ) -> AccountResult<UserOperation> {
        let sender = identity.address(self.provider.as_ref()).await?;
        debug!(?sender, owner = ?identity.owner(), "resolved sender");

        let nonce = self.provider.get_nonce(sender).await?;
        debug!(?sender, %nonce, "fetched nonce");

        let deployed = self.provider.is_deployed(sender).await?;
        let init_code = if deployed { Bytes::default() } else { identity.init_code() };
        debug!(?sender, deployed, "checked deployment");

        let uo = UserOperation::default()
            .sender(sender)
            .nonce(nonce)
            .init_code(init_code)
            .call_data(execute_call_data(intent.target, intent.value, intent.data.clone()));

        self.estimate_gas(uo, &intent.gas_hints).await
    }

    /// Sets the fee and gas fields. Hints win over estimates; zero estimates are replaced with
    /// local defaults.
    async fn estimate_gas(&self, uo: UserOperation, hints: &GasHints) -> AccountResult<UserOperation> {
        let (max_fee_per_gas, max_priority_fee_per_gas) = self.provider.estimate_fees().await?;
        let uo = uo
            .max_fee_per_gas(hints.max_fee_per_gas.unwrap_or(max_fee_per_gas))
            .max_priority_fee_per_gas(
                hints.max_priority_fee_per_gas.unwrap_or(max_priority_fee_per_gas),
            );

        let estimation = self
            .provider
            .estimate_user_operation_gas(&uo.clone().signature(dummy_signature()))
            .await?;
        debug!(?estimation, "estimated user operation gas");

        let call_gas_limit = hints.call_gas_limit.unwrap_or(if estimation.call_gas_limit.is_zero() {
            U256::from(DEFAULT_CALL_GAS_LIMIT)
        } else {
            estimation.call_gas_limit
        });

        let verification_gas_limit = hints.verification_gas_limit.unwrap_or(
            if estimation.verification_gas_limit.is_zero() {
                let mut gas = U256::from(DEFAULT_VERIFICATION_GAS_LIMIT);
                if !uo.init_code.is_empty() {
                    gas += U256::from(CREATION_VERIFICATION_GAS);
                }
                gas
            } else {
                estimation.verification_gas_limit
            },
        );

        let uo = uo.call_gas_limit(call_gas_limit).verification_gas_limit(verification_gas_limit);

        let pre_verification_gas = match hints.pre_verification_gas {
            Some(gas) => gas,
            None if estimation.pre_verification_gas.is_zero() => {
                self.overhead.calculate_pre_verification_gas(&uo)
            }
            None => estimation.pre_verification_gas,
        };

        Ok(uo.pre_verification_gas(pre_verification_gas))
    }

    fn attach_paymaster(uo: UserOperation, context: Option<&PaymasterContext>) -> UserOperation {
        match context {
            Some(context) => uo.paymaster_and_data(context.paymaster_and_data.clone()),
            None => uo.paymaster_and_data(Bytes::default()),
        }
    }
}

fn dummy_signature() -> Bytes {
    DUMMY_SIGNATURE.parse().expect("Dummy signature valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_signature_is_65_bytes() {
        assert_eq!(dummy_signature().len(), 65);
    }

    #[test]
    fn paymaster_defaults_to_empty() {
        let uo = UserOperation::default().paymaster_and_data("0x1234".parse().unwrap());
        type Builder = UserOperationBuilder<dyn AccountProvider>;

        assert_eq!(Builder::attach_paymaster(uo.clone(), None).paymaster_and_data, Bytes::default());

        let context = PaymasterContext::new("0xabcd".parse().unwrap());
        assert_eq!(
            Builder::attach_paymaster(uo, Some(&context)).paymaster_and_data,
            context.paymaster_and_data
        );
    }
}
