//! An `AccountIdentity` owns the key of a smart contract wallet owner
use crate::{
    error::{AccountError, AccountResult},
    provider::AccountProvider,
};
use ethers::{
    prelude::{k256::ecdsa::SigningKey, rand},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, U256},
    utils::hex,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use trampoline_contracts::create_account_call_data;
use trampoline_primitives::{constants::account::INDEX, pack_factory_data};

/// Persisted key state of an identity
///
/// The private key is stored in clear; encrypting it at rest is left to the store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedIdentityState {
    /// `0x` prefixed 32 byte private key
    pub private_key: String,
}

impl fmt::Debug for SerializedIdentityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializedIdentityState").field("private_key", &"<redacted>").finish()
    }
}

/// Owner key of exactly one simple account, deployed by `factory` with salt 0
#[derive(Clone)]
pub struct AccountIdentity {
    /// Signing key of the owner
    signer: ethers::signers::Wallet<SigningKey>,
    /// Factory deploying the account
    factory: Address,
}

impl fmt::Debug for AccountIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountIdentity")
            .field("owner", &self.owner())
            .field("factory", &self.factory)
            .field("index", &INDEX)
            .finish()
    }
}

impl AccountIdentity {
    /// Restores the identity from `existing` state, or generates a new key if there is none
    ///
    /// # Arguments
    /// * `existing` - Previously serialized state
    /// * `factory` - The address of the account factory
    ///
    /// # Returns
    /// * `Self` - A new `AccountIdentity` instance
    pub fn create(
        existing: Option<&SerializedIdentityState>,
        factory: Address,
    ) -> AccountResult<Self> {
        match existing {
            Some(state) => Self::from_state(state, factory),
            None => Ok(Self::random(factory)),
        }
    }

    /// Builds an identity from a randomly generated key
    pub fn random(factory: Address) -> Self {
        let mut rng = rand::thread_rng();
        Self { signer: LocalWallet::new(&mut rng), factory }
    }

    /// Restores an identity from serialized state
    pub fn from_state(state: &SerializedIdentityState, factory: Address) -> AccountResult<Self> {
        Self::from_private_key(&state.private_key, factory)
    }

    /// Restores an identity from a hex private key (with or without `0x`)
    pub fn from_private_key(private_key: &str, factory: Address) -> AccountResult<Self> {
        let signer = private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| AccountError::InvalidKeyMaterial { inner: e.to_string() })?;
        Ok(Self { signer, factory })
    }

    /// Returns the state to persist for a later [from_state](Self::from_state)
    pub fn serialize(&self) -> SerializedIdentityState {
        SerializedIdentityState {
            private_key: format!("0x{}", hex::encode(self.signer.signer().to_bytes())),
        }
    }

    /// Address of the owner key (EOA)
    pub fn owner(&self) -> Address {
        self.signer.address()
    }

    /// Address of the account factory
    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Factory salt; always 0
    pub fn index(&self) -> U256 {
        U256::from(INDEX)
    }

    /// Init code that deploys the account through the factory
    pub fn init_code(&self) -> Bytes {
        pack_factory_data(self.factory, create_account_call_data(self.owner(), self.index()))
            .into()
    }

    /// Counterfactual address of the account, as computed by the factory
    pub async fn address<P: AccountProvider + ?Sized>(&self, provider: &P) -> AccountResult<Address> {
        Ok(provider.get_sender_address(self.factory, self.owner(), self.index()).await?)
    }

    /// Signs a 32 byte digest as an Ethereum signed message
    pub(crate) async fn sign_hash(&self, hash: &[u8]) -> AccountResult<Bytes> {
        let sig = self
            .signer
            .sign_message(hash)
            .await
            .map_err(|e| AccountError::Signing { inner: e.to_string() })?;
        Ok(sig.to_vec().into())
    }
}
