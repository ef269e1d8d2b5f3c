use crate::{
    error::{AccountError, AccountResult},
    identity::AccountIdentity,
};
use ethers::types::Address;
use tracing::debug;
use trampoline_primitives::{SignedUserOperation, UserOperation};

/// Signs user operations for one entry point and chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserOperationSigner {
    entry_point: Address,
    chain_id: u64,
}

impl UserOperationSigner {
    pub fn new(entry_point: Address, chain_id: u64) -> Self {
        Self { entry_point, chain_id }
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Signs the [hash](UserOperation::hash) of `uo` as an Ethereum signed message.
    ///
    /// Signing is terminal: an operation that already carries a signature is rejected.
    pub async fn sign(
        &self,
        uo: UserOperation,
        identity: &AccountIdentity,
    ) -> AccountResult<SignedUserOperation> {
        if uo.is_signed() {
            return Err(AccountError::AlreadySigned);
        }

        let hash = uo.hash(&self.entry_point, self.chain_id);
        let signature = identity.sign_hash(hash.as_bytes()).await?;
        debug!(%hash, sender = ?uo.sender, "signed user operation");

        SignedUserOperation::new(hash, uo.signature(signature)).ok_or_else(|| {
            AccountError::Signing { inner: "signer returned an empty signature".into() }
        })
    }
}
