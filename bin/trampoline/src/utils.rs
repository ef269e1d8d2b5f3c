use dirs::home_dir;
use ethers::types::{Address, Bytes, U256};
use expanded_pathbuf::ExpandedPathBuf;
use std::{fs, io::Write, path::Path, str::FromStr};
use trampoline_account::{AccountIdentity, DispatchPolicy, SerializedIdentityState};
use trampoline_primitives::gas::parse_gas_value;

/// File in the data directory holding the identity key state
pub const IDENTITY_FILE: &str = "identity.json";

/// Unwrap path or returns home directory
pub fn unwrap_path_or_home(path: Option<ExpandedPathBuf>) -> eyre::Result<ExpandedPathBuf> {
    if let Some(path) = path {
        Ok(path)
    } else {
        home_dir()
            .map(|h| h.join(".trampoline"))
            .ok_or_else(|| eyre::eyre!("Get Home directory error"))
            .map(ExpandedPathBuf)
    }
}

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Parses U256 from decimal or `0x` prefixed hex string
pub fn parse_u256(s: &str) -> Result<U256, String> {
    parse_gas_value(s).map_err(|_| format!("String {s} is not a valid U256"))
}

/// Parses hex bytes (`0x` for empty)
pub fn parse_bytes(s: &str) -> Result<Bytes, String> {
    Bytes::from_str(s).map_err(|_| format!("String {s} is not valid hex data"))
}

/// Parses DispatchPolicy from string
pub fn parse_dispatch_policy(s: &str) -> Result<DispatchPolicy, String> {
    DispatchPolicy::from_str(s).map_err(|_| format!("String {s} is not a valid DispatchPolicy"))
}

pub fn validate_private_key(hex_string: &str) -> Result<String, String> {
    let stripped = hex_string.strip_prefix("0x").unwrap_or(hex_string);

    if stripped.len() != 64 {
        return Err(format!("{hex_string} is not a valid private key"));
    }

    if !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{hex_string} is not a valid hexadecimal string"));
    }

    Ok(String::from(hex_string))
}

/// Writes the identity state into `datadir`, refusing to overwrite an existing one.
///
/// The file holds the private key and is only readable by its owner on unix.
pub fn store_identity(datadir: &Path, identity: &AccountIdentity) -> eyre::Result<()> {
    let path = datadir.join(IDENTITY_FILE);
    if path.exists() {
        return Err(eyre::eyre!("Identity already exists at {}", path.display()));
    }

    fs::create_dir_all(datadir)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(&path)
        .map_err(|e| eyre::eyre!("Failed to create identity at {}: {e}", path.display()))?;
    file.write_all(serde_json::to_string_pretty(&identity.serialize())?.as_bytes())?;
    Ok(())
}

/// Reads the identity state from `datadir`
pub fn load_identity(datadir: &Path, factory: Address) -> eyre::Result<AccountIdentity> {
    let path = datadir.join(IDENTITY_FILE);
    let content = fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("Failed to read identity from {}: {e}", path.display()))?;
    let state: SerializedIdentityState = serde_json::from_str(&content)?;
    Ok(AccountIdentity::from_state(&state, factory)?)
}
