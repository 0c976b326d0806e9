//! Low-level FFI bindings to Syphon.framework for macOS.
//!
//! Syphon is a macOS framework for sharing GPU textures between applications.
//! This module provides Objective-C bindings to `SyphonOpenGLServer` which
//! allows publishing OpenGL textures that can be received by other
//! Syphon-compatible apps.
//!
//! Reference: https://github.com/Syphon/Syphon-Framework

#![cfg(target_os = "macos")]

use objc2::msg_send;
use objc2::rc::Retained;
use objc2::runtime::{AnyClass, AnyObject, Bool};
use objc2_foundation::NSString;
use std::ffi::{c_void, CStr};

// CGPoint, CGSize, CGRect types for NSRect/NSSize construction
// These are core graphics types used by Syphon's publishFrameTexture API
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct CGPoint {
    pub x: f64,
    pub y: f64,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct CGSize {
    pub width: f64,
    pub height: f64,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct CGRect {
    pub origin: CGPoint,
    pub size: CGSize,
}

impl CGRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: CGPoint { x, y },
            size: CGSize { width, height },
        }
    }
}

// Encode implementations for objc2 messaging
unsafe impl objc2::Encode for CGPoint {
    const ENCODING: objc2::Encoding = objc2::Encoding::Struct(
        "CGPoint",
        &[objc2::Encoding::Double, objc2::Encoding::Double],
    );
}

unsafe impl objc2::Encode for CGSize {
    const ENCODING: objc2::Encoding = objc2::Encoding::Struct(
        "CGSize",
        &[objc2::Encoding::Double, objc2::Encoding::Double],
    );
}

unsafe impl objc2::Encode for CGRect {
    const ENCODING: objc2::Encoding =
        objc2::Encoding::Struct("CGRect", &[CGPoint::ENCODING, CGSize::ENCODING]);
}

unsafe impl objc2::RefEncode for CGPoint {
    const ENCODING_REF: objc2::Encoding = objc2::Encoding::Pointer(&Self::ENCODING);
}

unsafe impl objc2::RefEncode for CGSize {
    const ENCODING_REF: objc2::Encoding = objc2::Encoding::Pointer(&Self::ENCODING);
}

unsafe impl objc2::RefEncode for CGRect {
    const ENCODING_REF: objc2::Encoding = objc2::Encoding::Pointer(&Self::ENCODING);
}

extern "C" {
    /// CGLGetCurrentContext from the OpenGL framework. The Syphon GL server
    /// must be created on a thread with a current GL context.
    fn CGLGetCurrentContext() -> *mut c_void;
}

/// Wrapper around the SyphonOpenGLServer Objective-C class.
///
/// This provides a safe Rust interface to the Syphon OpenGL server
/// functionality.
pub struct SyphonGlServerWrapper {
    /// The underlying Objective-C SyphonOpenGLServer object
    server: Retained<AnyObject>,
}

// SyphonOpenGLServer is documented as thread-safe
unsafe impl Send for SyphonGlServerWrapper {}

impl SyphonGlServerWrapper {
    /// Create a new Syphon OpenGL server bound to the current GL context.
    ///
    /// # Arguments
    /// * `name` - The human-readable name for this server (visible to clients)
    pub fn new(name: &str) -> Result<Self, String> {
        // Get the SyphonOpenGLServer class
        let class = match get_syphon_gl_server_class() {
            Some(c) => c,
            None => {
                return Err(
                    "SyphonOpenGLServer class not found. Is Syphon.framework linked?".to_string(),
                )
            }
        };

        let context = unsafe { CGLGetCurrentContext() };
        if context.is_null() {
            return Err("No current CGL context on this thread".to_string());
        }

        // Create NSString for the name
        let ns_name = NSString::from_str(name);

        // Call [[SyphonOpenGLServer alloc] initWithName:context:options:]
        let server: *mut AnyObject = unsafe { msg_send![class, alloc] };
        if server.is_null() {
            return Err("Failed to allocate SyphonOpenGLServer".to_string());
        }

        let server: *mut AnyObject = unsafe {
            msg_send![
                server,
                initWithName: &*ns_name,
                context: context,
                options: std::ptr::null::<AnyObject>()
            ]
        };

        if server.is_null() {
            return Err("Failed to initialize SyphonOpenGLServer".to_string());
        }

        // Wrap in Retained for memory management
        let server = unsafe { Retained::from_raw(server) }
            .ok_or_else(|| "Failed to create Retained wrapper".to_string())?;

        Ok(Self { server })
    }

    /// Publish a frame texture to connected clients.
    ///
    /// # Arguments
    /// * `texture_id` - The GL texture name to publish
    /// * `texture_target` - The GL texture target (GL_TEXTURE_2D)
    /// * `width`/`height` - Texture dimensions
    /// * `flipped` - Whether the texture is vertically flipped
    ///
    /// # Safety
    /// The texture must belong to the GL context the server was created on.
    pub unsafe fn publish_frame_texture(
        &self,
        texture_id: u32,
        texture_target: u32,
        width: u32,
        height: u32,
        flipped: bool,
    ) {
        let region = CGRect::new(0.0, 0.0, width as f64, height as f64);
        let dimensions = CGSize {
            width: width as f64,
            height: height as f64,
        };

        // Call publishFrameTexture:textureTarget:imageRegion:textureDimensions:flipped:
        let _: () = msg_send![
            &*self.server,
            publishFrameTexture: texture_id,
            textureTarget: texture_target,
            imageRegion: region,
            textureDimensions: dimensions,
            flipped: Bool::new(flipped)
        ];
    }

    /// Check if any clients are connected to this server.
    pub fn has_clients(&self) -> bool {
        unsafe {
            let result: Bool = msg_send![&*self.server, hasClients];
            result.as_bool()
        }
    }

    /// Stop the server and release resources.
    pub fn stop(&self) {
        unsafe {
            let _: () = msg_send![&*self.server, stop];
        }
    }

    /// Get the server name.
    pub fn name(&self) -> Option<String> {
        unsafe {
            let name: *mut NSString = msg_send![&*self.server, name];
            if name.is_null() {
                None
            } else {
                Some((*name).to_string())
            }
        }
    }
}

impl Drop for SyphonGlServerWrapper {
    fn drop(&mut self) {
        // Stop the server when dropped
        self.stop();
    }
}

/// Get the SyphonOpenGLServer class, if available.
///
/// Older framework builds expose the GL server as plain `SyphonServer`.
fn get_syphon_gl_server_class() -> Option<&'static AnyClass> {
    // SAFETY: The strings are null-terminated and valid UTF-8
    let modern = unsafe { CStr::from_bytes_with_nul_unchecked(b"SyphonOpenGLServer\0") };
    let legacy = unsafe { CStr::from_bytes_with_nul_unchecked(b"SyphonServer\0") };
    AnyClass::get(modern).or_else(|| AnyClass::get(legacy))
}

/// Check if Syphon.framework is available.
pub fn is_syphon_available() -> bool {
    get_syphon_gl_server_class().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syphon_availability() {
        // This test checks if we can detect Syphon availability
        // The actual result depends on whether the framework is linked
        let available = is_syphon_available();
        println!("Syphon available: {}", available);
    }
}
