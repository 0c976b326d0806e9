//! Low-level FFI bindings to the Spout2 SDK for Windows.
//!
//! Spout is a Windows framework for sharing GPU textures between applications
//! using DirectX shared textures. This module provides bindings to
//! SpoutLibrary.dll's COM-like interface.
//!
//! Reference: https://github.com/leadedge/Spout2

#![cfg(target_os = "windows")]

use std::ffi::{c_void, CString};

/// DXGI_FORMAT values for texture formats
#[repr(u32)]
#[derive(Clone, Copy, Debug)]
pub enum DxgiFormat {
    Unknown = 0,
    R8G8B8A8Unorm = 28,
    B8G8R8A8Unorm = 87,
}

/// Spout library handle - wraps the COM-like interface
pub struct SpoutLibrary {
    /// Handle to the SPOUTLIBRARY interface
    handle: *mut c_void,
    /// DLL handle to keep it loaded
    _dll: libloading::Library,
}

// SpoutLibrary is thread-safe per documentation
unsafe impl Send for SpoutLibrary {}

impl SpoutLibrary {
    /// Load SpoutLibrary.dll and get the interface handle.
    pub fn new() -> Result<Self, String> {
        unsafe {
            let dll = Self::load_dll()?;

            // Get the factory function
            let get_spout: libloading::Symbol<unsafe extern "C" fn() -> *mut c_void> = dll
                .get(b"GetSpout")
                .map_err(|e| format!("Failed to find GetSpout function: {}", e))?;

            let handle = get_spout();
            if handle.is_null() {
                return Err("GetSpout returned null".to_string());
            }

            Ok(Self { handle, _dll: dll })
        }
    }

    /// Try to load SpoutLibrary.dll from various locations
    unsafe fn load_dll() -> Result<libloading::Library, String> {
        // Try paths in order of preference
        let paths = ["SpoutLibrary.dll", "./SpoutLibrary.dll"];

        for path in &paths {
            if let Ok(dll) = libloading::Library::new(path) {
                log::info!("Spout: Loaded SpoutLibrary.dll from {}", path);
                return Ok(dll);
            }
        }

        Err(
            "Failed to load SpoutLibrary.dll - ensure it's in PATH or application directory"
                .to_string(),
        )
    }

    /// Get the vtable pointer for calling virtual methods
    fn vtable(&self) -> *const *const c_void {
        // The handle points to an object whose first member is the vtable pointer
        self.handle as *const *const c_void
    }

    // === Sender Methods ===
    // VTable indices based on SpoutLibrary.h interface order

    /// SetSenderName (index 0)
    pub fn set_sender_name(&self, name: &str) {
        unsafe {
            let c_name = CString::new(name).unwrap_or_default();
            let vtable = *self.vtable();
            let method: unsafe extern "C" fn(*mut c_void, *const i8) =
                std::mem::transmute(*vtable.add(0));
            method(self.handle, c_name.as_ptr());
        }
    }

    /// SetSenderFormat (index 1)
    pub fn set_sender_format(&self, format: DxgiFormat) {
        unsafe {
            let vtable = *self.vtable();
            let method: unsafe extern "C" fn(*mut c_void, u32) =
                std::mem::transmute(*vtable.add(1));
            method(self.handle, format as u32);
        }
    }

    /// ReleaseSender (index 2)
    pub fn release_sender(&self) {
        unsafe {
            let vtable = *self.vtable();
            let method: unsafe extern "C" fn(*mut c_void, u32) =
                std::mem::transmute(*vtable.add(2));
            method(self.handle, 0);
        }
    }

    /// SendTexture (index 4, after SendFbo=3) - Send an OpenGL texture.
    ///
    /// The sender surface is created on the first send and resized whenever
    /// the dimensions change.
    pub fn send_texture(
        &self,
        texture_id: u32,
        texture_target: u32,
        width: u32,
        height: u32,
        invert: bool,
        host_fbo: u32,
    ) -> bool {
        unsafe {
            let vtable = *self.vtable();
            let method: unsafe extern "C" fn(
                *mut c_void,
                u32,
                u32,
                u32,
                u32,
                bool,
                u32,
            ) -> bool = std::mem::transmute(*vtable.add(4));
            method(
                self.handle,
                texture_id,
                texture_target,
                width,
                height,
                invert,
                host_fbo,
            )
        }
    }

    /// IsInitialized (index 6)
    pub fn is_initialized(&self) -> bool {
        unsafe {
            let vtable = *self.vtable();
            let method: unsafe extern "C" fn(*mut c_void) -> bool =
                std::mem::transmute(*vtable.add(6));
            method(self.handle)
        }
    }

    /// GetWidth (index 8)
    pub fn get_width(&self) -> u32 {
        unsafe {
            let vtable = *self.vtable();
            let method: unsafe extern "C" fn(*mut c_void) -> u32 =
                std::mem::transmute(*vtable.add(8));
            method(self.handle)
        }
    }

    /// GetHeight (index 9)
    pub fn get_height(&self) -> u32 {
        unsafe {
            let vtable = *self.vtable();
            let method: unsafe extern "C" fn(*mut c_void) -> u32 =
                std::mem::transmute(*vtable.add(9));
            method(self.handle)
        }
    }
}

impl Drop for SpoutLibrary {
    fn drop(&mut self) {
        // Release sender resources
        self.release_sender();
    }
}

/// Check if Spout is available on this system
pub fn is_spout_available() -> bool {
    SpoutLibrary::new().is_ok()
}
