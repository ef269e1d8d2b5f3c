//! Account abstraction (ERC-4337)-related constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract the wallet is deployed against
    pub const ADDRESS: &str = "0x0576a174D229E3cFA37253523E645A78A0C91B57";
    /// Version of the entry point smart contract
    pub const VERSION: &str = "0.6.0";
    /// Nonce key used for all user operations (sequential nonces)
    pub const NONCE_KEY: u64 = 0;
}

/// Smart contract wallet (simple account) deployment
pub mod account {
    /// Address of the account factory
    pub const FACTORY_ADDRESS: &str = "0xa6f8B5ECB00cddf5326c1C269f4B4444b50E077D";
    /// Salt passed to the factory; one account per owner key
    pub const INDEX: u64 = 0;
    /// Signature used while estimating gas, so the account's ECDSA recovery does not revert
    pub const DUMMY_SIGNATURE: &str = "0xfffffffffffffffffffffffffffffff0000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c";
}

/// Gas accounting
pub mod gas {
    /// Multiplier applied to the verification gas limit when computing the prefund
    pub const VERIFICATION_GAS_MULTIPLIER: u64 = 3;
    /// Base verification gas of a deployed simple account
    pub const DEFAULT_VERIFICATION_GAS_LIMIT: u64 = 100_000;
    /// Extra verification gas when the account has to be created by the factory
    pub const CREATION_VERIFICATION_GAS: u64 = 300_000;
    /// Call gas limit used when nothing better is known
    pub const DEFAULT_CALL_GAS_LIMIT: u64 = 35_000;
}

/// Calldata dispatch discriminators (first bytes of the intent payload)
pub mod dispatch {
    /// Discriminator selecting the cross-chain bridge action
    pub const BRIDGE_SENTINEL: &[u8] = &[0x01];
    /// Recipient of bridged funds
    pub const BRIDGE_RECIPIENT: &str = "0xb16F35c0Ae2912430DAc15764477E179D9B9EbEa";
}

/// Network defaults
pub mod network {
    /// Goerli
    pub const CHAIN_ID: u64 = 5;
    /// Default execution client endpoint
    pub const ETH_CLIENT_ADDRESS: &str = "http://127.0.0.1:8545";
    /// Default bundler endpoint
    pub const BUNDLER_ADDRESS: &str = "https://api.blocknative.com/v1/goerli/bundler";
}
