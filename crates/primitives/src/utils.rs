//! Misc utils

use ethers::{
    types::{Address, Bytes, U256},
    utils::to_checksum,
};

/// Converts address to checksum address
pub fn as_checksum_addr<S>(val: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&to_checksum(val, None))
}

/// Concatenates factory address and factory calldata into init code
pub fn pack_factory_data(factory: Address, factory_data: Bytes) -> Vec<u8> {
    if factory.is_zero() {
        vec![]
    } else {
        [factory.0.to_vec(), factory_data.to_vec()].concat()
    }
}

/// Performs division and rounds up to the nearest integer.
pub(crate) fn div_ceil(numerator: U256, denominator: U256) -> U256 {
    let (quotient, remainder) = numerator.div_mod(denominator);
    if remainder.is_zero() {
        quotient
    } else {
        quotient.saturating_add(U256::one())
    }
}
