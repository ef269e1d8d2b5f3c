//! Account abstraction (ERC-4337) primitive types
//!
//! This crate contains the user operation types, transaction intents and the gas arithmetic shared
//! by the trampoline account crates.

pub mod constants;
pub mod gas;
mod intent;
mod user_operation;
mod utils;

pub use gas::{prefund, prefund_from_str, to_hex_string, GasError, Overhead};
pub use intent::{ActionKind, BridgeParams, GasHints, TransactionIntent, UnknownActionError};
pub use user_operation::{
    SignedUserOperation, UserOperation, UserOperationGasEstimation, UserOperationHash,
};
pub use utils::pack_factory_data;
