//! Account abstraction (ERC-4337) smart contract interfaces
//!
//! Bindings for the entry point, the simple account factory, the simple account and the swap
//! account, plus helpers for encoding the calls the wallet makes through them.

mod calls;
mod error;
mod gen;

pub use calls::{bridge_call_data, create_account_call_data, execute_call_data};
pub use error::{contract_error_message, decode_revert_string};
pub use gen::{
    entry_point_api, simple_account_api, simple_account_factory_api, swap_account_api,
    EntryPointAPI, SimpleAccountAPI, SimpleAccountFactoryAPI, SwapAccountAPI,
};
