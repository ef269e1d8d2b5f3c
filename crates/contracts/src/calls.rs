use crate::gen::{
    simple_account_api::ExecuteCall, simple_account_factory_api::CreateAccountCall,
    swap_account_api::TestCall,
};
use ethers::{
    abi::AbiEncode,
    types::{Address, Bytes, U256},
};

/// Call data of `SimpleAccount.execute(dest, value, func)`
pub fn execute_call_data(dest: Address, value: U256, func: Bytes) -> Bytes {
    ExecuteCall { dest, value, func }.encode().into()
}

/// Call data of `SimpleAccountFactory.createAccount(owner, salt)`
pub fn create_account_call_data(owner: Address, salt: U256) -> Bytes {
    CreateAccountCall { owner, salt }.encode().into()
}

/// Call data of the swap account bridge entry `test(recipient, amount)`
pub fn bridge_call_data(recipient: Address, amount: U256) -> Bytes {
    TestCall { recipient, amount }.encode().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{
        abi::{encode, Token},
        utils::id,
    };

    #[test]
    fn bridge_call_data_matches_declared_signature() -> eyre::Result<()> {
        let recipient: Address = "0xb16F35c0Ae2912430DAc15764477E179D9B9EbEa".parse()?;
        let amount = U256::from(450_000);

        let expected = [
            id("test(address,uint256)").to_vec(),
            encode(&[Token::Address(recipient), Token::Uint(amount)]),
        ]
        .concat();

        assert_eq!(bridge_call_data(recipient, amount).to_vec(), expected);
        Ok(())
    }

    #[test]
    fn execute_call_data_selector() {
        // execute(address,uint256,bytes)
        let call_data = execute_call_data(Address::zero(), U256::zero(), Bytes::default());
        assert_eq!(&call_data[0..4], &[0xb6, 0x1d, 0x27, 0xf6]);
        assert_eq!(call_data.len(), 4 + 32 * 4);
    }

    #[test]
    fn create_account_call_data_selector() {
        // createAccount(address,uint256)
        let call_data = create_account_call_data(Address::zero(), U256::zero());
        assert_eq!(&call_data[0..4], &[0x5f, 0xbf, 0xb9, 0xcf]);
        assert_eq!(call_data.len(), 4 + 32 * 2);
    }
}
