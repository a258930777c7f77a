//! # Error
//!
//! Centralized error taxonomy for the hanami client engine.
//! Validation errors are caught before any remote call; `Rejected` carries a
//! collaborator domain error verbatim; `Transport`/`Timeout` cover the wire.

use thiserror::Error;

/// The primary error type for all engine operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Caught locally, never reaches the network (empty text, missing rating,
    /// self-friend-request).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource missing on the collaborator side.
    #[error("not found: {0}")]
    NotFound(String),

    /// Session missing or not permitted for the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Domain rejection from the collaborator, surfaced verbatim to the user.
    #[error("{0}")]
    Rejected(String),

    /// Invalid state transition known locally (e.g. friend request while
    /// already friends).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A reaction for this item has not settled yet; one request per item
    /// at a time.
    #[error("a reaction for item {0} is already in flight")]
    InFlight(i64),

    /// Network-level failure; state is left unchanged.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The remote call exceeded the configured deadline.
    #[error("request timed out")]
    Timeout,
}

/// A specialized Result type for engine logic.
pub type Result<T> = std::result::Result<T, Error>;
