//!
//! Error types for authentication and access control schema loading.

use crate::primitives::AccessControlId;

/// Failure of an `authenticate` call. These are the only two ways it can fail:
/// access control data problems never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    /// The credential verifier rejected the login. `reason` is the verifier's message,
    /// never the secret itself.
    #[error("Authentication failed: {reason}")]
    InvalidCredentials { reason: String },
    /// No internal identity exists for the username.
    #[error("No principal found for login {0}")]
    PrincipalNotFound(String),
}

/// Raised by a credential verifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct CredentialError {
    pub reason: String,
}

impl CredentialError {
    pub fn new(reason: impl Into<String>) -> Self {
        CredentialError { reason: reason.into() }
    }
}

impl From<CredentialError> for AuthenticationError {
    fn from(err: CredentialError) -> Self {
        AuthenticationError::InvalidCredentials { reason: err.reason }
    }
}

/// Problems with an access control schema document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The document is not valid JSON, does not match the schema layout, or uses an unknown key.
    #[error("Access control schema could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    /// The schema file could not be opened or read.
    #[error("Access control schema could not be read: {0}")]
    Io(#[from] std::io::Error),
    /// An id is declared more than once, across groups and permissions alike.
    #[error("Duplicate access control id {0}")]
    DuplicateId(AccessControlId),
    /// A group, permission or inherited id is the empty string. `context` names the
    /// enclosing group, if any.
    #[error("Access control id must not be empty (in group {context:?})")]
    EmptyId { context: Option<AccessControlId> },
}
