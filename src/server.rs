//! Server bridge: a typed-handle registry over the platform server SDK.
//!
//! The C interface hands out pointer-sized opaque handles. Instead of raw
//! pointers into the heap, a handle encodes a [`ServerId`] looked up in an
//! internal table, so a stale or garbage handle fails the lookup instead of
//! dereferencing freed memory. Ids are never reused.

use std::collections::BTreeMap;
use std::ffi::c_void;
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::backend::{ServerBackend, SurfaceSize};
use crate::error::BridgeError;

/// Identifier of a live server, valid from `create` until `destroy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerId(NonZeroUsize);

impl ServerId {
    /// Encode the id as the opaque pointer handed across the C boundary.
    pub fn to_raw(self) -> *mut c_void {
        self.0.get() as *mut c_void
    }

    /// Decode an opaque pointer back into an id. Null maps to `None`; any
    /// other value is validated against the registry on use.
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(Self)
    }
}

struct RegistryState<B> {
    servers: BTreeMap<ServerId, B>,
    next_id: usize,
}

/// Mutex-guarded table of live servers.
pub struct ServerRegistry<B: ServerBackend> {
    state: Mutex<RegistryState<B>>,
}

impl<B: ServerBackend> ServerRegistry<B> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                servers: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Open a backend server announced under `name` and register it.
    pub fn create(&self, name: &str) -> Result<ServerId, BridgeError> {
        let backend = B::open(name)?;

        let mut state = self.state.lock();
        let id = NonZeroUsize::new(state.next_id)
            .map(ServerId)
            .ok_or_else(|| BridgeError::Sdk("server id space exhausted".into()))?;
        state.next_id += 1;
        state.servers.insert(id, backend);

        log::info!("server '{}' created (handle {:?})", name, id.to_raw());
        Ok(id)
    }

    /// Stop and remove the server. Unknown or stale ids are ignored.
    pub fn destroy(&self, id: ServerId) {
        let removed = self.state.lock().servers.remove(&id);
        match removed {
            Some(mut backend) => {
                backend.stop();
                log::info!("server destroyed (handle {:?})", id.to_raw());
            }
            None => log::warn!("destroy of unknown server handle {:?}", id.to_raw()),
        }
    }

    /// Publish a GL texture as the current frame of the given server.
    pub fn publish(
        &self,
        id: ServerId,
        tex_id: u32,
        width: i32,
        height: i32,
    ) -> Result<(), BridgeError> {
        let size = SurfaceSize::clamped(width, height);
        let mut state = self.state.lock();
        let backend = state
            .servers
            .get_mut(&id)
            .ok_or(BridgeError::UnknownHandle)?;
        backend.publish_texture(tex_id, size)
    }

    /// Number of live servers.
    pub fn len(&self) -> usize {
        self.state.lock().servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: ServerBackend> Default for ServerRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ServerBackend> Drop for ServerRegistry<B> {
    fn drop(&mut self) {
        for backend in self.state.lock().servers.values_mut() {
            backend.stop();
        }
    }
}
