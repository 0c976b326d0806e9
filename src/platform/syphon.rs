//! Syphon server backend for macOS.
//!
//! Implements [`ServerBackend`] over [`SyphonGlServerWrapper`]. One backend
//! instance corresponds to one announced Syphon server; the registry in
//! [`crate::server`] may hold several at once.

#![cfg(target_os = "macos")]

use super::syphon_ffi::{is_syphon_available, SyphonGlServerWrapper};
use crate::backend::{ServerBackend, SurfaceSize, GL_TEXTURE_2D};
use crate::error::BridgeError;

/// A live Syphon OpenGL server.
pub struct SyphonServer {
    server: SyphonGlServerWrapper,
}

impl ServerBackend for SyphonServer {
    fn open(name: &str) -> Result<Self, BridgeError> {
        if !is_syphon_available() {
            log::warn!("Syphon: framework not available");
            return Err(BridgeError::Unavailable);
        }

        match SyphonGlServerWrapper::new(name) {
            Ok(server) => {
                log::info!("Syphon: serving as '{}'", name);
                Ok(Self { server })
            }
            Err(err) => Err(BridgeError::Sdk(err)),
        }
    }

    fn publish_texture(&mut self, tex_id: u32, size: SurfaceSize) -> Result<(), BridgeError> {
        // GL textures have their origin at the bottom left, which is what
        // Syphon receivers expect; no flip needed.
        unsafe {
            self.server
                .publish_frame_texture(tex_id, GL_TEXTURE_2D, size.width, size.height, false);
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.server.stop();
    }
}
