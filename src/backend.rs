//! Platform-agnostic seams to the texture sharing SDKs.
//!
//! The sender and server bridges are written against these traits so the
//! lifecycle logic is identical on every platform; only the backend behind
//! the trait differs. On macOS the server backend is Syphon, on Windows the
//! sender backend is Spout, everywhere else the stub backends report the SDK
//! as unavailable.

use crate::error::BridgeError;

/// OpenGL `GL_TEXTURE_2D` target, the only texture target the bridge sends.
pub const GL_TEXTURE_2D: u32 = 0x0DE1;

/// Dimensions of the shared surface.
///
/// The SDKs take unsigned non-zero sizes, so construction clamps anything
/// non-positive to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Build a size from the signed values crossing the C boundary,
    /// clamping each dimension to a minimum of 1.
    pub fn clamped(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1) as u32,
            height: height.max(1) as u32,
        }
    }
}

/// Seam to the platform sender SDK (Spout on Windows).
///
/// One backend instance corresponds to one live SDK sender object. The
/// bridge opens a backend lazily on the first `init` and replaces it when
/// the sender name changes.
pub trait SenderBackend: Send + Sized {
    /// Construct the SDK sender object. This may touch graphics-driver and
    /// OS resources and is therefore never done from static initializers.
    fn open() -> Result<Self, BridgeError>;

    /// Bind the sender to a name before the surface exists.
    fn set_name(&mut self, name: &str);

    /// Create the sharing surface. Reports [`BridgeError::AlreadyExists`]
    /// when a surface of this name is already registered, in which case the
    /// caller falls back to [`SenderBackend::update_surface`].
    fn create_surface(&mut self, name: &str, size: SurfaceSize) -> Result<(), BridgeError>;

    /// Resize or refresh an existing sharing surface.
    fn update_surface(&mut self, name: &str, size: SurfaceSize) -> Result<(), BridgeError>;

    /// Publish a GL texture as the current frame.
    fn send_texture(&mut self, tex_id: u32, size: SurfaceSize, invert: bool)
        -> Result<(), BridgeError>;

    /// Release the SDK sender. Best effort; called on replacement and
    /// shutdown.
    fn release(&mut self);
}

/// Seam to the platform server SDK (Syphon on macOS).
pub trait ServerBackend: Send + Sized {
    /// Construct and announce a server under `name`.
    fn open(name: &str) -> Result<Self, BridgeError>;

    /// Publish a GL texture as the server's current frame.
    fn publish_texture(&mut self, tex_id: u32, size: SurfaceSize) -> Result<(), BridgeError>;

    /// Stop the server and withdraw it from discovery.
    fn stop(&mut self);
}

/// Sender backend for targets without a sender SDK.
#[derive(Debug)]
pub struct UnavailableSender;

impl SenderBackend for UnavailableSender {
    fn open() -> Result<Self, BridgeError> {
        Err(BridgeError::Unavailable)
    }

    fn set_name(&mut self, _name: &str) {}

    fn create_surface(&mut self, _name: &str, _size: SurfaceSize) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable)
    }

    fn update_surface(&mut self, _name: &str, _size: SurfaceSize) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable)
    }

    fn send_texture(
        &mut self,
        _tex_id: u32,
        _size: SurfaceSize,
        _invert: bool,
    ) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable)
    }

    fn release(&mut self) {}
}

/// Server backend for targets without a server SDK.
#[derive(Debug)]
pub struct UnavailableServer;

impl ServerBackend for UnavailableServer {
    fn open(_name: &str) -> Result<Self, BridgeError> {
        Err(BridgeError::Unavailable)
    }

    fn publish_texture(&mut self, _tex_id: u32, _size: SurfaceSize) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable)
    }

    fn stop(&mut self) {}
}

#[cfg(target_os = "windows")]
pub type PlatformSender = crate::platform::spout::SpoutSender;
#[cfg(not(target_os = "windows"))]
pub type PlatformSender = UnavailableSender;

#[cfg(target_os = "macos")]
pub type PlatformServer = crate::platform::syphon::SyphonServer;
#[cfg(not(target_os = "macos"))]
pub type PlatformServer = UnavailableServer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_passes_positive_sizes_through() {
        let size = SurfaceSize::clamped(1920, 1080);
        assert_eq!(size.width, 1920);
        assert_eq!(size.height, 1080);
    }

    #[test]
    fn test_clamped_raises_non_positive_to_one() {
        let size = SurfaceSize::clamped(0, -5);
        assert_eq!(size.width, 1);
        assert_eq!(size.height, 1);
    }

    #[test]
    fn test_unavailable_sender_fails_to_open() {
        assert_eq!(UnavailableSender::open().unwrap_err(), BridgeError::Unavailable);
    }

    #[test]
    fn test_unavailable_server_fails_to_open() {
        assert_eq!(
            UnavailableServer::open("test").unwrap_err(),
            BridgeError::Unavailable
        );
    }
}
