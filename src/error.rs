use thiserror::Error;

/// Every way a signing request can abort. The message names the offending
/// field or stage and is safe to hand back to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// Malformed or missing request field.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Wallet or account missing from the key store.
    #[error("not found: {0}")]
    NotFound(String),
    /// Key material or transaction rejected by the signer.
    #[error("signing failed: {0}")]
    Signing(String),
    /// Storage backend or runtime failure; the caller may retry the whole request.
    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

impl SignerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Stable label used in logs and in the CLI error body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Signing(_) => "signing",
            Self::Collaborator(_) => "collaborator",
        }
    }

    /// The bare reason, without the kind prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::Validation(m) | Self::NotFound(m) | Self::Signing(m) | Self::Collaborator(m) => m,
        }
    }
}

pub type Result<T, E = SignerError> = std::result::Result<T, E>;
