//! Gas arithmetic: prefund and pre-verification gas

use crate::{constants::gas::VERIFICATION_GAS_MULTIPLIER, utils::div_ceil, UserOperation};
use ethers::types::U256;
use std::ops::Deref;
use thiserror::Error;

/// Gas value errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GasError {
    /// Gas field is negative, empty or not a number
    #[error("invalid gas value {value:?}: {inner}")]
    InvalidGasValue {
        /// The rejected input
        value: String,
        /// The inner error message
        inner: String,
    },
}

/// Computes the native-currency amount a user operation must have prefunded.
///
/// `prefund = pre_verification_gas + verification_gas_limit * 3 + call_gas_limit`
///
/// The verification gas is counted three times to cover the account validation, the factory
/// deployment and the paymaster post-op path. Values saturate at `U256::MAX`.
pub fn prefund(
    pre_verification_gas: U256,
    verification_gas_limit: U256,
    call_gas_limit: U256,
) -> U256 {
    pre_verification_gas
        .saturating_add(verification_gas_limit.saturating_mul(VERIFICATION_GAS_MULTIPLIER.into()))
        .saturating_add(call_gas_limit)
}

/// Same as [prefund] for gas fields received as strings (decimal or `0x` prefixed hex).
pub fn prefund_from_str(
    pre_verification_gas: &str,
    verification_gas_limit: &str,
    call_gas_limit: &str,
) -> Result<U256, GasError> {
    Ok(prefund(
        parse_gas_value(pre_verification_gas)?,
        parse_gas_value(verification_gas_limit)?,
        parse_gas_value(call_gas_limit)?,
    ))
}

/// Parses a non-negative gas value from decimal or `0x` prefixed hex
pub fn parse_gas_value(value: &str) -> Result<U256, GasError> {
    let invalid = |inner: &str| GasError::InvalidGasValue {
        value: value.to_string(),
        inner: inner.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty value"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("gas values can't be negative"));
    }

    match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some("") => Err(invalid("missing hex digits")),
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| invalid(&format!("{e:?}"))),
        None => U256::from_dec_str(trimmed).map_err(|e| invalid(&format!("{e:?}"))),
    }
}

/// Encodes the value as big-endian hex without padding (`0x0` for zero)
pub fn to_hex_string(value: U256) -> String {
    format!("{value:#x}")
}

/// Struct to calculate the pre-verification gas of a user operation
// https://github.com/eth-infinitism/bundler/blob/main/packages/sdk/src/calcPreVerificationGas.ts#L44-L51
#[derive(Clone, Debug)]
pub struct Overhead {
    pub fixed: U256,
    pub per_user_op: U256,
    pub per_user_op_word: U256,
    pub zero_byte: U256,
    pub non_zero_byte: U256,
    pub bundle_size: U256,
    pub sig_size: U256,
}

impl Default for Overhead {
    fn default() -> Self {
        Self {
            fixed: U256::from(21000),
            per_user_op: U256::from(18300),
            per_user_op_word: U256::from(4),
            zero_byte: U256::from(4),
            non_zero_byte: U256::from(16),
            bundle_size: U256::from(1),
            sig_size: U256::from(65),
        }
    }
}

impl Overhead {
    /// Calculates the pre-verification gas of a [UserOperation](UserOperation).
    ///
    /// An empty signature is replaced with `sig_size` non-zero bytes before packing, so the
    /// result does not change once the operation gets signed.
    pub fn calculate_pre_verification_gas(&self, uo: &UserOperation) -> U256 {
        let uo = if uo.signature.is_empty() {
            uo.clone().signature(vec![1u8; self.sig_size.as_usize()].into())
        } else {
            uo.clone()
        };
        let uo_pack = uo.pack();

        let call_data = uo_pack.deref().iter().fold(U256::zero(), |acc, &x| {
            let byte_cost = if x == 0 { &self.zero_byte } else { &self.non_zero_byte };
            acc.saturating_add(*byte_cost)
        });

        // per_user_op_word * (uo_pack.len() + 31) / 32
        let word_cost = div_ceil(
            self.per_user_op_word.saturating_mul(U256::from(uo_pack.len() + 31)),
            U256::from(32),
        );

        let fixed_divided_by_bundle_size = div_ceil(self.fixed, self.bundle_size);

        fixed_divided_by_bundle_size
            .saturating_add(call_data)
            .saturating_add(self.per_user_op)
            .saturating_add(word_cost)
    }
}
