//! Spout sender backend for Windows.
//!
//! Implements [`SenderBackend`] over [`SpoutLibrary`]. Spout creates the
//! shared surface on the first texture sent and resizes it whenever the sent
//! dimensions change, so surface create/update map to binding the sender
//! name and format.

#![cfg(target_os = "windows")]

use super::spout_ffi::{DxgiFormat, SpoutLibrary};
use crate::backend::{SenderBackend, SurfaceSize, GL_TEXTURE_2D};
use crate::error::BridgeError;

/// A live Spout sender.
pub struct SpoutSender {
    library: SpoutLibrary,
}

impl SenderBackend for SpoutSender {
    fn open() -> Result<Self, BridgeError> {
        match SpoutLibrary::new() {
            Ok(library) => Ok(Self { library }),
            Err(err) => {
                log::warn!("Spout: {}", err);
                Err(BridgeError::Unavailable)
            }
        }
    }

    fn set_name(&mut self, name: &str) {
        self.library.set_sender_name(name);
    }

    fn create_surface(&mut self, name: &str, _size: SurfaceSize) -> Result<(), BridgeError> {
        self.library.set_sender_name(name);
        self.library.set_sender_format(DxgiFormat::B8G8R8A8Unorm);
        Ok(())
    }

    fn update_surface(&mut self, name: &str, _size: SurfaceSize) -> Result<(), BridgeError> {
        // The surface tracks the dimensions of the next texture sent.
        self.library.set_sender_name(name);
        Ok(())
    }

    fn send_texture(
        &mut self,
        tex_id: u32,
        size: SurfaceSize,
        invert: bool,
    ) -> Result<(), BridgeError> {
        if self
            .library
            .send_texture(tex_id, GL_TEXTURE_2D, size.width, size.height, invert, 0)
        {
            Ok(())
        } else {
            Err(BridgeError::Sdk("Spout SendTexture failed".to_string()))
        }
    }

    fn release(&mut self) {
        self.library.release_sender();
    }
}
