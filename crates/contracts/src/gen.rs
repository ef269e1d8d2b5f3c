use ethers::contract::abigen;

abigen!(
    EntryPointAPI,
    r#"[
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce)
    ]"#
);

abigen!(
    SimpleAccountFactoryAPI,
    r#"[
        function createAccount(address owner, uint256 salt) external returns (address ret)
        function getAddress(address owner, uint256 salt) external view returns (address)
    ]"#
);

abigen!(
    SimpleAccountAPI,
    r#"[
        function execute(address dest, uint256 value, bytes func) external
    ]"#
);

abigen!(
    SwapAccountAPI,
    r#"[
        function test(address recipient, uint256 amount) external
    ]"#
);
