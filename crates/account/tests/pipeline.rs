mod common;

use common::{MockAccountProvider, Stage, KEY};
use ethers::{
    types::{Address, Bytes, Signature, U256},
    utils::hash_message,
};
use std::sync::Arc;
use trampoline_account::{
    AccountApi, AccountError, AccountIdentity, AccountProvider, DeploymentConfig, DispatchPolicy,
    PaymasterContext, ProviderError, SimpleAccountApi,
};
use trampoline_contracts::{bridge_call_data, execute_call_data};
use trampoline_primitives::{
    prefund, BridgeParams, GasHints, Overhead, TransactionIntent, UserOperationGasEstimation,
};

fn account(provider: Arc<MockAccountProvider>) -> eyre::Result<SimpleAccountApi<MockAccountProvider>> {
    account_with_config(provider, DeploymentConfig::default())
}

fn account_with_config(
    provider: Arc<MockAccountProvider>,
    config: DeploymentConfig,
) -> eyre::Result<SimpleAccountApi<MockAccountProvider>> {
    let identity = AccountIdentity::from_private_key(KEY, config.factory_address)?;
    Ok(SimpleAccountApi::new(identity, provider, config))
}

fn transfer() -> TransactionIntent {
    TransactionIntent::new(
        "0x35806F904851fc2e101Ef1B2B11E600219F45da8".parse().unwrap(),
        U256::from(1_000_000_000_000_000_u64),
        Bytes::default(),
    )
}

fn bridge() -> TransactionIntent {
    TransactionIntent::new(transfer().target, U256::zero(), "0x01".parse().unwrap())
}

#[tokio::test]
async fn restored_identity_keeps_address() -> eyre::Result<()> {
    let provider = Arc::new(MockAccountProvider::default());
    let config = DeploymentConfig::default();

    let identity = AccountIdentity::create(None, config.factory_address)?;
    let state = identity.serialize();
    let a = SimpleAccountApi::new(identity, provider.clone(), config.clone());
    let b = SimpleAccountApi::new(
        AccountIdentity::create(Some(&state), config.factory_address)?,
        provider.clone(),
        config,
    );

    assert_eq!(a.address().await?, b.address().await?);
    assert_eq!(a.serialize(), b.serialize());

    let other = SimpleAccountApi::new(
        AccountIdentity::random(DeploymentConfig::default().factory_address),
        provider,
        DeploymentConfig::default(),
    );
    assert_ne!(a.address().await?, other.address().await?);
    Ok(())
}

#[tokio::test]
async fn build_transfer() -> eyre::Result<()> {
    let provider = Arc::new(MockAccountProvider::default());
    let account = account(provider.clone())?;
    let intent = transfer();

    let uo = account.build_unsigned(&intent, None).await?;

    assert_eq!(uo.sender, account.address().await?);
    assert_eq!(uo.nonce, U256::zero());
    assert_eq!(uo.init_code, account.identity().init_code());
    assert_eq!(uo.call_data, execute_call_data(intent.target, intent.value, intent.data.clone()));
    assert_eq!(uo.call_gas_limit, provider.estimation.call_gas_limit);
    assert_eq!(uo.verification_gas_limit, provider.estimation.verification_gas_limit);
    assert_eq!(uo.pre_verification_gas, provider.estimation.pre_verification_gas);
    assert_eq!(uo.max_fee_per_gas, provider.fees.0);
    assert_eq!(uo.max_priority_fee_per_gas, provider.fees.1);
    assert_eq!(uo.paymaster_and_data, Bytes::default());
    assert!(!uo.is_signed());

    // gas is estimated with a placeholder signature only
    let estimated = provider.estimated();
    assert_eq!(estimated.len(), 1);
    assert_eq!(estimated[0].signature.len(), 65);
    Ok(())
}

#[tokio::test]
async fn paymaster_context() -> eyre::Result<()> {
    let account = account(Arc::new(MockAccountProvider::default()))?;

    let uo = account.build_unsigned(&transfer(), None).await?;
    let json = serde_json::to_value(&uo)?;
    assert_eq!(json["paymasterAndData"], "0x");

    let context = PaymasterContext::new("0xe93eca6595fe94091dc1af46aac2a8b5d79907700102".parse()?);
    let uo = account.build_unsigned(&transfer(), Some(&context)).await?;
    assert_eq!(uo.paymaster_and_data, context.paymaster_and_data);
    Ok(())
}

#[tokio::test]
async fn init_code_only_until_deployed() -> eyre::Result<()> {
    let provider = Arc::new(MockAccountProvider::default());
    let account = account(provider.clone())?;

    let uo = account.build_unsigned(&transfer(), None).await?;
    assert!(!uo.init_code.is_empty());

    provider.deploy(uo.sender);
    let uo = account.build_unsigned(&transfer(), None).await?;
    assert!(uo.init_code.is_empty());
    Ok(())
}

#[tokio::test]
async fn provider_failures_abort_the_build() -> eyre::Result<()> {
    for stage in [Stage::Sender, Stage::Nonce, Stage::Deployment, Stage::Fees, Stage::Estimation] {
        let provider = Arc::new(MockAccountProvider::default());
        let cause = ProviderError::Provider { inner: format!("{stage:?} unavailable") };
        provider.fail_on(stage, cause.clone());
        let account = account(provider.clone())?;

        match account.build_unsigned(&bridge(), None).await {
            Err(AccountError::BuilderFailure { cause: err }) => assert_eq!(err, cause),
            res => panic!("{stage:?}: expected builder failure, got {res:?}"),
        }
        assert!(matches!(
            account.sign_direct(&transfer(), None).await,
            Err(AccountError::BuilderFailure { .. })
        ));
        assert!(provider.sent().is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn gas_hints_override_estimates() -> eyre::Result<()> {
    let provider = Arc::new(MockAccountProvider::default());
    let account = account(provider.clone())?;
    let hints = GasHints {
        call_gas_limit: Some(200_000.into()),
        verification_gas_limit: Some(400_000.into()),
        pre_verification_gas: None,
        max_fee_per_gas: Some(10_000_000_000_u64.into()),
        max_priority_fee_per_gas: None,
    };

    let uo = account.build_unsigned(&transfer().gas_hints(hints), None).await?;
    assert_eq!(uo.call_gas_limit, 200_000.into());
    assert_eq!(uo.verification_gas_limit, 400_000.into());
    assert_eq!(uo.pre_verification_gas, provider.estimation.pre_verification_gas);
    assert_eq!(uo.max_fee_per_gas, 10_000_000_000_u64.into());
    assert_eq!(uo.max_priority_fee_per_gas, provider.fees.1);
    Ok(())
}

#[tokio::test]
async fn zero_estimates_fall_back_to_local_defaults() -> eyre::Result<()> {
    let provider = Arc::new(MockAccountProvider::with_estimation(UserOperationGasEstimation::default()));
    let account = account(provider)?;

    let uo = account.build_unsigned(&transfer(), None).await?;
    assert_eq!(uo.call_gas_limit, 35_000.into());
    // account creation included
    assert_eq!(uo.verification_gas_limit, 400_000.into());
    assert_eq!(
        uo.pre_verification_gas,
        Overhead::default().calculate_pre_verification_gas(&uo.clone().pre_verification_gas(U256::zero()))
    );
    assert!(!uo.pre_verification_gas.is_zero());
    Ok(())
}

#[tokio::test]
async fn bridge_intent_rewrites_call_data() -> eyre::Result<()> {
    let provider = Arc::new(MockAccountProvider::default());
    let account = account(provider)?;

    let uo = account.build_unsigned(&bridge(), None).await?;
    let amount = prefund(uo.pre_verification_gas, uo.verification_gas_limit, uo.call_gas_limit);
    assert_eq!(amount, U256::from(50_000 + 150_000 * 3 + 80_000));
    assert_eq!(
        uo.call_data,
        bridge_call_data(account.config().bridge.recipient, amount)
    );

    let recipient = Address::random();
    let intent = bridge().bridge(BridgeParams { recipient: Some(recipient), amount: None });
    let uo = account.build_unsigned(&intent, None).await?;
    assert_eq!(uo.call_data, bridge_call_data(recipient, amount));
    Ok(())
}

#[tokio::test]
async fn sign_direct_skips_dispatch() -> eyre::Result<()> {
    let account = account(Arc::new(MockAccountProvider::default()))?;
    let intent = bridge();

    let signed = account.sign_direct(&intent, None).await?;
    assert_eq!(
        signed.call_data,
        execute_call_data(intent.target, intent.value, intent.data.clone())
    );
    assert_eq!(signed.paymaster_and_data, Bytes::default());
    Ok(())
}

#[tokio::test]
async fn unknown_action() -> eyre::Result<()> {
    let intent = TransactionIntent::new(transfer().target, U256::zero(), "0xdeadbeef".parse()?);

    let account = account(Arc::new(MockAccountProvider::default()))?;
    let uo = account.build_unsigned(&intent, None).await?;
    assert_eq!(uo.call_data, execute_call_data(intent.target, intent.value, intent.data.clone()));

    let config = DeploymentConfig { dispatch_policy: DispatchPolicy::Strict, ..Default::default() };
    let account = account_with_config(Arc::new(MockAccountProvider::default()), config)?;
    assert!(matches!(
        account.build_unsigned(&intent, None).await,
        Err(AccountError::UnknownAction(_))
    ));
    Ok(())
}

#[tokio::test]
async fn signature_recovers_owner() -> eyre::Result<()> {
    let account = account(Arc::new(MockAccountProvider::default()))?;
    let config = account.config().clone();

    let uo = account.build_unsigned(&bridge(), None).await?;
    let signed = account.sign_with_context(uo.clone()).await?;

    assert_eq!(signed.hash(), uo.hash(&config.entry_point_address, config.chain_id));
    assert_eq!(signed.clone().into_inner().signature(Bytes::default()), uo);

    let sig = Signature::try_from(signed.signature.to_vec().as_slice())?;
    assert_eq!(sig.recover(hash_message(signed.hash().as_bytes()))?, account.identity().owner());
    Ok(())
}

#[tokio::test]
async fn signed_operations_are_not_resigned() -> eyre::Result<()> {
    let account = account(Arc::new(MockAccountProvider::default()))?;
    let signed = account.sign_direct(&transfer(), None).await?;
    assert!(matches!(
        account.sign_with_context(signed.into_inner()).await,
        Err(AccountError::AlreadySigned)
    ));
    Ok(())
}

#[tokio::test]
async fn sign_message_not_implemented() -> eyre::Result<()> {
    let account = account(Arc::new(MockAccountProvider::default()))?;
    assert!(matches!(
        account.sign_message(b"hello").await,
        Err(AccountError::NotImplemented { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn nonces_increase_across_submissions() -> eyre::Result<()> {
    let provider = Arc::new(MockAccountProvider::default());
    let account = account(provider.clone())?;

    let mut nonces = vec![];
    for _ in 0..3 {
        let uo = account.build_unsigned(&transfer(), None).await?;
        let signed = account.sign_with_context(uo).await?;
        nonces.push(signed.nonce);
        assert_eq!(provider.send_user_operation(&signed).await?, signed.hash());
    }

    assert_eq!(nonces, vec![U256::zero(), U256::one(), U256::from(2)]);
    let sent = provider.sent();
    assert!(!sent[0].init_code.is_empty());
    assert!(sent[1..].iter().all(|uo| uo.init_code.is_empty()));
    Ok(())
}
