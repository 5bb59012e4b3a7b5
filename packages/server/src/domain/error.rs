//! Domain-level error types.

use thiserror::Error;

/// Errors raised by identity value-object validation and registry lookups
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The supplied string is not a valid identity id
    #[error("invalid identity id: '{0}'")]
    InvalidIdentityId(String),
}
