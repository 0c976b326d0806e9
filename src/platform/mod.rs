//! Platform-specific texture sharing backends.
//!
//! - Windows: Spout, via `SpoutLibrary.dll` loaded at runtime
//! - macOS: Syphon, via `Syphon.framework`

#[cfg(target_os = "windows")]
pub mod spout;
#[cfg(target_os = "windows")]
pub mod spout_ffi;

#[cfg(target_os = "macos")]
pub mod syphon;
#[cfg(target_os = "macos")]
pub mod syphon_ffi;
