//! C-callable bridge for publishing OpenGL textures to other local
//! processes via the platform texture sharing SDKs:
//! - Spout on Windows (sender interface)
//! - Syphon on macOS (server interface)
//!
//! The SDKs do the actual cross-process texture sharing; this crate provides
//! the lifecycle and concurrency discipline around them: a single
//! mutex-guarded sender replaced on rename, a typed-handle server registry,
//! size clamping, and a panic-proof C boundary ([`capi`]).
//!
//! Build as `cdylib` or `staticlib` and call the exported functions, or use
//! [`SenderBridge`] / [`ServerRegistry`] directly from Rust with a custom
//! [`backend::SenderBackend`] / [`backend::ServerBackend`].

pub mod backend;
pub mod capi;
pub mod error;
pub mod platform;
pub mod sender;
pub mod server;

pub use backend::{SenderBackend, ServerBackend, SurfaceSize};
pub use error::BridgeError;
pub use sender::SenderBridge;
pub use server::{ServerId, ServerRegistry};
