//! Basic transaction type for account abstraction (ERC-4337)

mod hash;

use crate::utils::as_checksum_addr;
use ethers::{
    abi::{self, AbiEncode, Token},
    contract::{EthAbiCodec, EthAbiType},
    types::{Address, Bytes, H256, U256},
    utils::keccak256,
};
pub use hash::UserOperationHash;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// User operation
///
/// Drafts travel through the builder with an empty signature; a signed operation is only
/// handed out wrapped in [SignedUserOperation].
#[derive(
    Default, Clone, Debug, PartialEq, Eq, EthAbiCodec, EthAbiType, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    /// The smart contract account executing the operation
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,

    /// Entry point nonce of the account
    pub nonce: U256,

    /// Factory address followed by its calldata, empty once the account is deployed
    pub init_code: Bytes,

    /// Calldata the entry point sends to the account
    pub call_data: Bytes,

    pub call_gas_limit: U256,

    pub verification_gas_limit: U256,

    /// Gas paid to the bundler for calldata and the work outside of the two limits above
    pub pre_verification_gas: U256,

    pub max_fee_per_gas: U256,

    pub max_priority_fee_per_gas: U256,

    /// Sponsoring paymaster followed by its data, empty when the account pays
    pub paymaster_and_data: Bytes,

    /// Owner signature over the user operation hash
    pub signature: Bytes,
}

impl UserOperation {
    /// ABI encoding of every field, signature included
    pub fn pack(&self) -> Bytes {
        self.clone().encode().into()
    }

    /// Encoding the hash commits to: the dynamic fields are replaced by their keccak256 and
    /// the signature is left out
    pub fn pack_without_signature(&self) -> Bytes {
        let digest = |data: &Bytes| Token::FixedBytes(keccak256(data).to_vec());
        abi::encode(&[
            Token::Address(self.sender),
            Token::Uint(self.nonce),
            digest(&self.init_code),
            digest(&self.call_data),
            Token::Uint(self.call_gas_limit),
            Token::Uint(self.verification_gas_limit),
            Token::Uint(self.pre_verification_gas),
            Token::Uint(self.max_fee_per_gas),
            Token::Uint(self.max_priority_fee_per_gas),
            digest(&self.paymaster_and_data),
        ])
        .into()
    }

    /// Hash the account signs, bound to one entry point on one chain
    pub fn hash(&self, entry_point: &Address, chain_id: u64) -> UserOperationHash {
        let packed = keccak256(self.pack_without_signature());
        let digest = keccak256(abi::encode(&[
            Token::FixedBytes(packed.to_vec()),
            Token::Address(*entry_point),
            Token::Uint(U256::from(chain_id)),
        ]));
        H256::from(digest).into()
    }

    /// Whether the user operation carries a signature
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

macro_rules! setters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        impl UserOperation {
            $(
                #[doc = concat!("Replaces `", stringify!($field), "`")]
                pub fn $field(mut self, $field: $ty) -> Self {
                    self.$field = $field;
                    self
                }
            )*
        }
    };
}

setters! {
    sender: Address,
    nonce: U256,
    init_code: Bytes,
    call_data: Bytes,
    call_gas_limit: U256,
    verification_gas_limit: U256,
    pre_verification_gas: U256,
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    paymaster_and_data: Bytes,
    signature: Bytes,
}

/// Signed user operation together with its hash
///
/// This is the terminal state of the construction pipeline: there are no setters, and the only
/// way to change the operation is to take it apart with [into_inner](Self::into_inner) and build
/// a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUserOperation {
    hash: UserOperationHash,
    user_operation: UserOperation,
}

impl SignedUserOperation {
    /// Wraps a user operation that carries a signature, `None` if the signature is empty
    pub fn new(hash: UserOperationHash, user_operation: UserOperation) -> Option<Self> {
        if user_operation.is_signed() {
            Some(Self { hash, user_operation })
        } else {
            None
        }
    }

    /// Hash the signature was produced over
    pub fn hash(&self) -> UserOperationHash {
        self.hash
    }

    /// The signed user operation
    pub fn user_operation(&self) -> &UserOperation {
        &self.user_operation
    }

    pub fn into_inner(self) -> UserOperation {
        self.user_operation
    }
}

impl Deref for SignedUserOperation {
    type Target = UserOperation;

    fn deref(&self) -> &Self::Target {
        &self.user_operation
    }
}

impl From<SignedUserOperation> for UserOperation {
    fn from(value: SignedUserOperation) -> Self {
        value.user_operation
    }
}

/// Gas estimations for user operation (returned from the RPC endpoint eth_estimateUserOperationGas)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationGasEstimation {
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
}
