use thiserror::Error;
use trampoline_primitives::{GasError, UnknownActionError};

pub type AccountResult<T> = Result<T, AccountError>;

/// Errors of the account pipeline (identity, construction, dispatch and signing)
#[derive(Debug, Error)]
pub enum AccountError {
    /// Restore material is not a valid secp256k1 private key
    #[error("invalid key material: {inner}")]
    InvalidKeyMaterial {
        /// The inner error message
        inner: String,
    },

    /// Gas field is negative or not a number
    #[error(transparent)]
    InvalidGasValue(#[from] GasError),

    /// External provider failed while constructing the user operation
    #[error("failed to build user operation: {cause}")]
    BuilderFailure {
        /// The provider error, unmodified
        #[source]
        cause: ProviderError,
    },

    /// Intent payload starts with an unknown discriminator (strict dispatch only)
    #[error(transparent)]
    UnknownAction(#[from] UnknownActionError),

    /// User operation already carries a signature
    #[error("user operation is already signed")]
    AlreadySigned,

    /// Signer failed
    #[error("signing error: {inner}")]
    Signing {
        /// The inner error message
        inner: String,
    },

    /// Capability the account does not offer
    #[error("{method} method not implemented")]
    NotImplemented {
        /// Name of the method
        method: String,
    },
}

impl From<ProviderError> for AccountError {
    fn from(cause: ProviderError) -> Self {
        Self::BuilderFailure { cause }
    }
}

/// Errors of the external provider facade
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Execution client error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// Contract call failed or reverted
    #[error("contract error: {inner}")]
    Contract {
        /// The inner error message
        inner: String,
    },

    /// Bundler JSON-RPC error
    #[error("bundler error: {inner}")]
    Bundler {
        /// The inner error message
        inner: String,
    },
}

/// Errors when loading the deployment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
