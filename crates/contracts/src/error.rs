use ethers::{
    abi::AbiDecode,
    prelude::ContractError,
    providers::{Middleware, MiddlewareError},
    types::Bytes,
};

// ethers-rs could not handle `require (true, "reason")` or `revert("test failed")` well in this
// case revert with `require` error would ends up with error event signature `0x08c379a0`
// we need to handle it manually
pub fn decode_revert_string(data: Bytes) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (error_sig, reason) = data.split_at(4);
    if error_sig == [0x08, 0xc3, 0x79, 0xa0] {
        <String as AbiDecode>::decode(reason).ok()
    } else {
        None
    }
}

/// Human readable message of a failed contract call, with revert reasons decoded
pub fn contract_error_message<M: Middleware>(err: ContractError<M>) -> String {
    match err {
        ContractError::Revert(data) => match decode_revert_string(data.clone()) {
            Some(reason) => format!("execution reverted: {reason}"),
            None => format!("execution reverted: {data}"),
        },
        ContractError::MiddlewareError { e } => match e.as_error_response() {
            Some(rpc_err) => format!("json-rpc error: {rpc_err}"),
            None => format!("middleware error: {e:?}"),
        },
        ContractError::ProviderError { e } => format!("provider error: {e:?}"),
        ContractError::DecodingError(e) => format!("decode error: {e}"),
        ContractError::AbiError(e) => format!("abi error: {e}"),
        _ => err.to_string(),
    }
}
