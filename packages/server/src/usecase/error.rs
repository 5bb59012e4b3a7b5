//! UseCase error definitions.

use thiserror::Error;

/// Errors raised by SendMessageUseCase
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// The sender has no display name yet; the event is dropped by the
    /// caller (state-machine precondition, not a client-visible failure)
    #[error("sender has no display name yet")]
    NotJoined,
}

/// Errors raised by UpdateAvatarUseCase
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateAvatarError {
    /// The caller's source address has no identity binding
    #[error("no identity for this address")]
    UnknownAddress,
}
