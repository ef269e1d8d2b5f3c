use async_trait::async_trait;
use ethers::{
    abi::{encode, Token},
    types::{Address, U256},
    utils::{get_create2_address, keccak256},
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use trampoline_account::{AccountProvider, ProviderError};
use trampoline_primitives::{
    SignedUserOperation, UserOperation, UserOperationGasEstimation, UserOperationHash,
};

pub const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// Provider call that can be made to fail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Sender,
    Nonce,
    Deployment,
    Fees,
    Estimation,
}

#[derive(Debug, Default)]
struct State {
    nonces: HashMap<Address, U256>,
    deployed: HashSet<Address>,
    fail: Option<(Stage, ProviderError)>,
    estimated: Vec<UserOperation>,
    sent: Vec<SignedUserOperation>,
}

/// In-memory entry point, factory and bundler
#[derive(Debug)]
pub struct MockAccountProvider {
    state: Mutex<State>,
    pub fees: (U256, U256),
    pub estimation: UserOperationGasEstimation,
}

impl Default for MockAccountProvider {
    fn default() -> Self {
        Self {
            state: Mutex::new(State::default()),
            fees: (U256::from(3_000_000_000_u64), U256::from(1_000_000_000)),
            estimation: UserOperationGasEstimation {
                pre_verification_gas: 50_000.into(),
                verification_gas_limit: 150_000.into(),
                call_gas_limit: 80_000.into(),
            },
        }
    }
}

impl MockAccountProvider {
    pub fn with_estimation(estimation: UserOperationGasEstimation) -> Self {
        Self { estimation, ..Default::default() }
    }

    pub fn fail_on(&self, stage: Stage, err: ProviderError) {
        self.state.lock().fail = Some((stage, err));
    }

    pub fn deploy(&self, sender: Address) {
        self.state.lock().deployed.insert(sender);
    }

    /// Operations passed to the gas estimation, in call order
    pub fn estimated(&self) -> Vec<UserOperation> {
        self.state.lock().estimated.clone()
    }

    pub fn sent(&self) -> Vec<SignedUserOperation> {
        self.state.lock().sent.clone()
    }

    fn check(&self, stage: Stage) -> Result<(), ProviderError> {
        match &self.state.lock().fail {
            Some((failing, err)) if *failing == stage => Err(err.clone()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AccountProvider for MockAccountProvider {
    async fn get_sender_address(
        &self,
        factory: Address,
        owner: Address,
        index: U256,
    ) -> Result<Address, ProviderError> {
        self.check(Stage::Sender)?;
        let salt = keccak256(encode(&[Token::Address(owner), Token::Uint(index)]));
        Ok(get_create2_address(factory, salt, b"SimpleAccount"))
    }

    async fn get_nonce(&self, sender: Address) -> Result<U256, ProviderError> {
        self.check(Stage::Nonce)?;
        Ok(self.state.lock().nonces.get(&sender).copied().unwrap_or_default())
    }

    async fn is_deployed(&self, sender: Address) -> Result<bool, ProviderError> {
        self.check(Stage::Deployment)?;
        Ok(self.state.lock().deployed.contains(&sender))
    }

    async fn estimate_fees(&self) -> Result<(U256, U256), ProviderError> {
        self.check(Stage::Fees)?;
        Ok(self.fees)
    }

    async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationGasEstimation, ProviderError> {
        self.check(Stage::Estimation)?;
        self.state.lock().estimated.push(uo.clone());
        Ok(self.estimation.clone())
    }

    /// Includes the operation right away: bumps the nonce and deploys the account
    async fn send_user_operation(
        &self,
        uo: &SignedUserOperation,
    ) -> Result<UserOperationHash, ProviderError> {
        let mut state = self.state.lock();
        let nonce = state.nonces.entry(uo.sender).or_default();
        *nonce += U256::one();
        state.deployed.insert(uo.sender);
        state.sent.push(uo.clone());
        Ok(uo.hash())
    }
}
