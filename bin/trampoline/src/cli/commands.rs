use super::args::{CreateAccountArgs, DeploymentArgs, IntentArgs, PrefundArgs};
use crate::utils::{load_identity, store_identity, unwrap_path_or_home};
use clap::Parser;
use ethers::providers::{Http, Provider};
use std::sync::Arc;
use tracing::info;
use trampoline_account::{
    AccountApi, AccountIdentity, AccountProvider, BundlerClient, DeploymentConfig,
    EthersAccountProvider, SimpleAccountApi,
};
use trampoline_primitives::{prefund_from_str, to_hex_string, SignedUserOperation};

type EthersAccountApi = SimpleAccountApi<EthersAccountProvider<Provider<Http>>>;

/// Connects the stored identity to the configured execution client and bundler
fn account_api(args: &DeploymentArgs) -> eyre::Result<(EthersAccountApi, DeploymentConfig)> {
    let config = args.deployment_config()?;
    let datadir = unwrap_path_or_home(args.datadir.clone())?;
    let identity = load_identity(&datadir, config.factory_address)?;

    let eth_client = Arc::new(Provider::<Http>::try_from(config.eth_client_address.clone())?);
    let bundler = BundlerClient::new(&config.bundler_address, config.entry_point_address)?;
    let provider = Arc::new(EthersAccountProvider::new(
        eth_client,
        config.entry_point_address,
        bundler,
    ));

    Ok((SimpleAccountApi::new(identity, provider, config.clone()), config))
}

fn print_signed(uo: &SignedUserOperation) -> eyre::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "userOpHash": uo.hash(),
            "userOperation": uo.user_operation(),
        }))?
    );
    Ok(())
}

/// Create the account identity
#[derive(Debug, Parser)]
pub struct CreateAccountCommand {
    #[clap(flatten)]
    create_account: CreateAccountArgs,
}

impl CreateAccountCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let args = self.create_account;
        let factory = match args.factory {
            Some(factory) => factory,
            None => DeploymentConfig::default().factory_address,
        };

        let identity = match &args.private_key {
            Some(key) => AccountIdentity::from_private_key(key, factory)?,
            None => AccountIdentity::random(factory),
        };

        let datadir = unwrap_path_or_home(args.datadir)?;
        store_identity(&datadir, &identity)?;
        info!("Account owner {:?}, identity stored in {:?}", identity.owner(), datadir);
        Ok(())
    }
}

/// Print the counterfactual account address
#[derive(Debug, Parser)]
pub struct AddressCommand {
    #[clap(flatten)]
    deployment: DeploymentArgs,
}

impl AddressCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let (account, _) = account_api(&self.deployment)?;
        println!("{:?}", account.address().await?);
        Ok(())
    }
}

/// Build the unsigned user operation of an intent
#[derive(Debug, Parser)]
pub struct BuildCommand {
    #[clap(flatten)]
    deployment: DeploymentArgs,

    #[clap(flatten)]
    intent: IntentArgs,
}

impl BuildCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let (account, _) = account_api(&self.deployment)?;
        let context = self.intent.paymaster_context();
        let uo = account.build_unsigned(&self.intent.intent(), context.as_ref()).await?;
        println!("{}", serde_json::to_string_pretty(&uo)?);
        Ok(())
    }
}

/// Build and sign the user operation of an intent
#[derive(Debug, Parser)]
pub struct SignCommand {
    #[clap(flatten)]
    deployment: DeploymentArgs,

    #[clap(flatten)]
    intent: IntentArgs,

    /// Sign the payload as-is, without dispatching its action.
    #[clap(long)]
    direct: bool,
}

impl SignCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let (account, _) = account_api(&self.deployment)?;
        let signed = sign(&account, &self.intent, self.direct).await?;
        print_signed(&signed)
    }
}

/// Build, sign and send the user operation of an intent to the bundler
#[derive(Debug, Parser)]
pub struct SendCommand {
    #[clap(flatten)]
    deployment: DeploymentArgs,

    #[clap(flatten)]
    intent: IntentArgs,

    /// Sign the payload as-is, without dispatching its action.
    #[clap(long)]
    direct: bool,
}

impl SendCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let (account, config) = account_api(&self.deployment)?;

        let chain_id = account.provider().bundler().chain_id().await?;
        if chain_id.as_u64() != config.chain_id {
            return Err(eyre::eyre!(
                "Bundler serves chain {chain_id}, user operations are signed for chain {}",
                config.chain_id
            ));
        }

        let signed = sign(&account, &self.intent, self.direct).await?;
        let hash = account.provider().send_user_operation(&signed).await?;
        info!("User operation {hash} sent to {}", config.bundler_address);
        print_signed(&signed)
    }
}

async fn sign(
    account: &EthersAccountApi,
    args: &IntentArgs,
    direct: bool,
) -> eyre::Result<SignedUserOperation> {
    let intent = args.intent();
    let context = args.paymaster_context();

    let signed = if direct {
        account.sign_direct(&intent, context.as_ref()).await?
    } else {
        let uo = account.build_unsigned(&intent, context.as_ref()).await?;
        account.sign_with_context(uo).await?
    };
    Ok(signed)
}

/// Compute the prefund of gas values
#[derive(Debug, Parser)]
pub struct PrefundCommand {
    #[clap(flatten)]
    prefund: PrefundArgs,
}

impl PrefundCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let args = self.prefund;
        let prefund = prefund_from_str(
            &args.pre_verification_gas,
            &args.verification_gas_limit,
            &args.call_gas_limit,
        )?;
        println!("{}", to_hex_string(prefund));
        Ok(())
    }
}
