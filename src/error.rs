//! Error types for the bridge.
//!
//! Internal code reports failures as [`BridgeError`]; the conversion to the
//! fixed-width success/failure codes of the C interface happens only in
//! [`crate::capi`].

use thiserror::Error;

/// Failure kinds surfaced by the sender and server bridges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The platform sharing SDK is not present on this system or target.
    #[error("texture sharing SDK not available on this platform")]
    Unavailable,

    /// The supplied name was null, empty after fallback, or contained an
    /// interior NUL byte.
    #[error("invalid sender/server name")]
    InvalidName,

    /// A sharing surface with this name already exists; callers fall back to
    /// an update of the existing surface.
    #[error("a sender with this name already exists")]
    AlreadyExists,

    /// Operation requires an initialized sender and none exists.
    #[error("sender not initialized")]
    NotInitialized,

    /// The server handle does not refer to a live server.
    #[error("unknown or stale server handle")]
    UnknownHandle,

    /// The underlying SDK reported a failure.
    #[error("sharing SDK error: {0}")]
    Sdk(String),
}
