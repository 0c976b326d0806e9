//! Exported C interface.
//!
//! Fixed ABI: integer, pointer and UTF-8 C string parameters only. Failures
//! are reported as 1/0 (or a null pointer), and no panic is ever allowed to
//! unwind across the boundary; every entry point runs under `catch_unwind`.
//!
//! This is the only place with process-wide state: the C ABI has no context
//! parameter, so the single [`SenderBridge`] and [`ServerRegistry`] live in
//! statics here. The statics are const-constructed and the SDK objects
//! behind them open lazily, so nothing touches graphics-driver or OS
//! resources during library load.

use std::ffi::{c_char, c_void, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Once;

use crate::backend::{PlatformSender, PlatformServer};
use crate::sender::{SenderBridge, DEFAULT_SENDER_NAME};
use crate::server::{ServerId, ServerRegistry};

const OK: i32 = 1;
const FAIL: i32 = 0;

static SENDER: SenderBridge<PlatformSender> = SenderBridge::new();
static SERVERS: ServerRegistry<PlatformServer> = ServerRegistry::new();
static LOG_INIT: Once = Once::new();

/// Hosts load this as a plain C library and never call a Rust init hook, so
/// logging is wired up on the first boundary crossing instead.
fn ensure_logging() {
    LOG_INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("warn"),
        )
        .try_init();
    });
}

/// Run a boundary closure, converting any panic into `fallback`.
fn guarded<R>(fallback: R, f: impl FnOnce() -> R) -> R {
    ensure_logging();
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            log::error!("panic caught at texture bridge boundary");
            fallback
        }
    }
}

/// Copy a caller-supplied name out of C memory. Null and invalid UTF-8 are
/// tolerated; an empty result falls back to the default sender name later.
unsafe fn name_from(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Ensure a sender bound to `name` exists with a sharing surface at the
/// given size (clamped to at least 1x1). Returns 1 on success, 0 on failure.
#[no_mangle]
pub unsafe extern "C" fn init_sender(name: *const c_char, width: i32, height: i32) -> i32 {
    let name = name_from(name);
    guarded(FAIL, move || match SENDER.init(&name, width, height) {
        Ok(()) => OK,
        Err(err) => {
            log::warn!("init_sender failed: {}", err);
            FAIL
        }
    })
}

/// Publish a `GL_TEXTURE_2D` texture through the active sender. Returns 1 on
/// success, 0 when no sender is initialized or the SDK rejects the frame.
#[no_mangle]
pub extern "C" fn send_gl_texture(tex_id: u32, width: i32, height: i32, invert: i32) -> i32 {
    guarded(FAIL, || {
        match SENDER.send(tex_id, width, height, invert != 0) {
            Ok(()) => OK,
            Err(err) => {
                log::warn!("send_gl_texture failed: {}", err);
                FAIL
            }
        }
    })
}

/// Rename the active sender. Returns 1 on success, 0 when no sender exists.
#[no_mangle]
pub unsafe extern "C" fn set_sender_name(name: *const c_char) -> i32 {
    let name = name_from(name);
    guarded(FAIL, move || match SENDER.set_name(&name) {
        Ok(()) => OK,
        Err(err) => {
            log::warn!("set_sender_name failed: {}", err);
            FAIL
        }
    })
}

/// Release the sender if one exists. Safe to call repeatedly.
#[no_mangle]
pub extern "C" fn shutdown_sender() {
    guarded((), || SENDER.shutdown());
}

/// Create a server announced under `name`. Returns an opaque handle, or null
/// on failure. The handle is only meaningful to `server_publish_texture` and
/// `server_destroy`.
#[no_mangle]
pub unsafe extern "C" fn server_create(name: *const c_char) -> *mut c_void {
    let mut name = name_from(name);
    if name.is_empty() {
        name = DEFAULT_SENDER_NAME.to_string();
    }
    guarded(std::ptr::null_mut(), move || {
        match SERVERS.create(&name) {
            Ok(id) => id.to_raw(),
            Err(err) => {
                log::warn!("server_create('{}') failed: {}", name, err);
                std::ptr::null_mut()
            }
        }
    })
}

/// Destroy a server created by `server_create`. Null, stale and garbage
/// handles are ignored.
#[no_mangle]
pub extern "C" fn server_destroy(handle: *mut c_void) {
    guarded((), || {
        if let Some(id) = ServerId::from_raw(handle) {
            SERVERS.destroy(id);
        }
    })
}

/// Publish a `GL_TEXTURE_2D` texture as the current frame of the given
/// server. Invalid handles and SDK failures are logged and dropped.
#[no_mangle]
pub extern "C" fn server_publish_texture(
    handle: *mut c_void,
    tex_id: u32,
    width: i32,
    height: i32,
) {
    guarded((), || {
        let Some(id) = ServerId::from_raw(handle) else {
            log::warn!("server_publish_texture on null handle");
            return;
        };
        if let Err(err) = SERVERS.publish(id, tex_id, width, height) {
            log::warn!("server_publish_texture failed: {}", err);
        }
    })
}
