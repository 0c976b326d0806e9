//! Sender bridge: lifecycle management for the single shared sender.
//!
//! The calling application may invoke init/send/shutdown from different
//! threads, so every operation holds the state mutex for its whole duration.
//! The bridge owns at most one live sender at a time, keyed by name; an init
//! with a new name releases the old sender and opens a fresh one.

use parking_lot::Mutex;

use crate::backend::{SenderBackend, SurfaceSize};
use crate::error::BridgeError;

/// Sender name used when the caller passes a null or empty name.
pub const DEFAULT_SENDER_NAME: &str = "texture-bridge";

struct SenderState<B> {
    /// The live SDK sender, opened lazily on the first successful init.
    backend: Option<B>,
    /// Name the live sender is bound to; empty when no sender exists.
    name: String,
    /// Last surface size requested from the SDK.
    surface: Option<SurfaceSize>,
}

/// Mutex-guarded owner of the single sender object.
///
/// Context-owned rather than process-global: the C boundary in
/// [`crate::capi`] holds the one process-wide instance, everything else
/// (including tests) constructs its own.
pub struct SenderBridge<B: SenderBackend> {
    state: Mutex<SenderState<B>>,
}

impl<B: SenderBackend> SenderBridge<B> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(SenderState {
                backend: None,
                name: String::new(),
                surface: None,
            }),
        }
    }

    /// Idempotently ensure a sender bound to `name` exists and has a sharing
    /// surface of the clamped size.
    ///
    /// A name change tears down the current sender and opens a new one. If
    /// the surface already exists under this name, falls back to resizing it.
    pub fn init(&self, name: &str, width: i32, height: i32) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        let name = normalized(name);
        let size = SurfaceSize::clamped(width, height);

        Self::ensure_backend(&mut state, &name)?;
        Self::bind_surface(&mut state, size)?;

        log::info!(
            "sender '{}' ready at {}x{}",
            state.name,
            size.width,
            size.height
        );
        Ok(())
    }

    /// Publish a GL texture through the active sender, refreshing the
    /// surface to the clamped dimensions first.
    ///
    /// Fails with [`BridgeError::NotInitialized`] when no sender exists.
    pub fn send(
        &self,
        tex_id: u32,
        width: i32,
        height: i32,
        invert: bool,
    ) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        let size = SurfaceSize::clamped(width, height);
        let name = state.name.clone();

        let backend = state.backend.as_mut().ok_or(BridgeError::NotInitialized)?;

        // Keep the shared surface in step with the frame being sent. A
        // failed resize is not fatal here; the send itself decides.
        if !name.is_empty() {
            let _ = backend.update_surface(&name, size);
        }

        backend.send_texture(tex_id, size, invert)?;
        state.surface = Some(size);
        Ok(())
    }

    /// Rebind the active sender under a new name, keeping the last surface
    /// size. Fails when no sender is initialized.
    pub fn set_name(&self, name: &str) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        if state.backend.is_none() {
            return Err(BridgeError::NotInitialized);
        }

        let name = normalized(name);
        if state.name == name {
            return Ok(());
        }

        let size = state
            .surface
            .unwrap_or(SurfaceSize { width: 1, height: 1 });
        Self::ensure_backend(&mut state, &name)?;
        Self::bind_surface(&mut state, size)?;

        log::info!("sender renamed to '{}'", state.name);
        Ok(())
    }

    /// Release and drop the sender if one exists. Safe to call repeatedly.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        if let Some(mut backend) = state.backend.take() {
            backend.release();
            log::info!("sender '{}' shut down", state.name);
        }
        state.name.clear();
        state.surface = None;
    }

    /// Whether a sender is currently live.
    pub fn is_active(&self) -> bool {
        self.state.lock().backend.is_some()
    }

    /// Name of the live sender, if any.
    pub fn current_name(&self) -> Option<String> {
        let state = self.state.lock();
        state.backend.as_ref().map(|_| state.name.clone())
    }

    /// Release the current backend and open a fresh one when no sender
    /// exists or the requested name differs. Caller holds the lock.
    fn ensure_backend(state: &mut SenderState<B>, name: &str) -> Result<(), BridgeError> {
        if state.backend.is_some() && state.name == name {
            return Ok(());
        }

        if let Some(mut old) = state.backend.take() {
            // Best-effort cleanup of the replaced sender.
            old.release();
        }

        match B::open() {
            Ok(mut backend) => {
                backend.set_name(name);
                state.backend = Some(backend);
                state.name = name.to_string();
                Ok(())
            }
            Err(err) => {
                state.name.clear();
                state.surface = None;
                Err(err)
            }
        }
    }

    /// Create the sharing surface, falling back to an update when a surface
    /// of this name already exists. Caller holds the lock.
    fn bind_surface(state: &mut SenderState<B>, size: SurfaceSize) -> Result<(), BridgeError> {
        let name = state.name.clone();
        let backend = state.backend.as_mut().ok_or(BridgeError::NotInitialized)?;

        match backend.create_surface(&name, size) {
            Ok(()) => {}
            Err(BridgeError::AlreadyExists) => backend.update_surface(&name, size)?,
            Err(err) => return Err(err),
        }

        state.surface = Some(size);
        Ok(())
    }
}

impl<B: SenderBackend> Default for SenderBridge<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SenderBackend> Drop for SenderBridge<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn normalized(name: &str) -> String {
    if name.is_empty() {
        DEFAULT_SENDER_NAME.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    thread_local! {
        /// Per-test log of backend calls.
        static EVENTS: RefCell<Vec<String>> = RefCell::new(Vec::new());
        /// Surface names registered with the fake SDK.
        static SURFACES: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
    }

    fn record(event: String) {
        EVENTS.with(|e| e.borrow_mut().push(event));
    }

    fn events() -> Vec<String> {
        EVENTS.with(|e| e.borrow().clone())
    }

    fn reset_mock() {
        EVENTS.with(|e| e.borrow_mut().clear());
        SURFACES.with(|s| s.borrow_mut().clear());
    }

    // Mock sender mimicking the SDK's surface registry: creating a surface
    // that already exists fails, releasing a sender unregisters its surfaces.
    struct MockSender {
        surfaces: Vec<String>,
    }

    impl SenderBackend for MockSender {
        fn open() -> Result<Self, BridgeError> {
            record("open".to_string());
            Ok(Self { surfaces: Vec::new() })
        }

        fn set_name(&mut self, name: &str) {
            record(format!("set_name {}", name));
        }

        fn create_surface(&mut self, name: &str, size: SurfaceSize) -> Result<(), BridgeError> {
            let exists = SURFACES.with(|s| !s.borrow_mut().insert(name.to_string()));
            if exists {
                return Err(BridgeError::AlreadyExists);
            }
            self.surfaces.push(name.to_string());
            record(format!("create {} {}x{}", name, size.width, size.height));
            Ok(())
        }

        fn update_surface(&mut self, name: &str, size: SurfaceSize) -> Result<(), BridgeError> {
            let known = SURFACES.with(|s| s.borrow().contains(name));
            if !known {
                return Err(BridgeError::Sdk("no such surface".to_string()));
            }
            record(format!("update {} {}x{}", name, size.width, size.height));
            Ok(())
        }

        fn send_texture(
            &mut self,
            tex_id: u32,
            size: SurfaceSize,
            invert: bool,
        ) -> Result<(), BridgeError> {
            record(format!(
                "send {} {}x{} invert={}",
                tex_id, size.width, size.height, invert
            ));
            Ok(())
        }

        fn release(&mut self) {
            record("release".to_string());
            SURFACES.with(|s| {
                let mut s = s.borrow_mut();
                for name in self.surfaces.drain(..) {
                    s.remove(&name);
                }
            });
        }
    }

    #[test]
    fn test_send_before_init_fails_without_touching_backend() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        let err = bridge.send(42, 640, 480, false).unwrap_err();
        assert_eq!(err, BridgeError::NotInitialized);
        assert!(events().is_empty());
    }

    #[test]
    fn test_init_creates_sender_and_surface() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("main-out", 1280, 720).unwrap();
        assert!(bridge.is_active());
        assert_eq!(bridge.current_name().as_deref(), Some("main-out"));
        assert_eq!(
            events(),
            vec!["open", "set_name main-out", "create main-out 1280x720"]
        );
    }

    #[test]
    fn test_reinit_same_name_updates_in_place() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("main-out", 640, 480).unwrap();
        bridge.init("main-out", 1920, 1080).unwrap();

        let events = events();
        assert_eq!(events.iter().filter(|e| *e == "open").count(), 1);
        assert!(events.contains(&"update main-out 1920x1080".to_string()));
    }

    #[test]
    fn test_init_with_new_name_replaces_sender() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("first", 640, 480).unwrap();
        bridge.init("second", 640, 480).unwrap();

        assert_eq!(bridge.current_name().as_deref(), Some("second"));
        assert_eq!(
            events(),
            vec![
                "open",
                "set_name first",
                "create first 640x480",
                "release",
                "open",
                "set_name second",
                "create second 640x480",
            ]
        );
    }

    #[test]
    fn test_empty_name_falls_back_to_default() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("", 640, 480).unwrap();
        assert_eq!(bridge.current_name().as_deref(), Some(DEFAULT_SENDER_NAME));
    }

    #[test]
    fn test_non_positive_dimensions_clamp_to_one() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("tiny", 0, -5).unwrap();
        assert!(events().contains(&"create tiny 1x1".to_string()));
    }

    #[test]
    fn test_send_refreshes_surface_then_publishes() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("main-out", 640, 480).unwrap();
        bridge.send(7, 800, 600, true).unwrap();

        let events = events();
        assert!(events.contains(&"update main-out 800x600".to_string()));
        assert_eq!(events.last().unwrap(), "send 7 800x600 invert=true");
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("main-out", 640, 480).unwrap();
        bridge.shutdown();
        bridge.shutdown();

        assert!(!bridge.is_active());
        assert_eq!(bridge.current_name(), None);
        assert_eq!(events().iter().filter(|e| *e == "release").count(), 1);
    }

    #[test]
    fn test_set_name_requires_active_sender() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        assert_eq!(
            bridge.set_name("renamed").unwrap_err(),
            BridgeError::NotInitialized
        );
    }

    #[test]
    fn test_set_name_rebinds_at_last_size() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("before", 1024, 768).unwrap();
        bridge.set_name("after").unwrap();

        assert_eq!(bridge.current_name().as_deref(), Some("after"));
        assert!(events().contains(&"create after 1024x768".to_string()));
    }

    #[test]
    fn test_set_name_same_name_is_noop() {
        reset_mock();
        let bridge: SenderBridge<MockSender> = SenderBridge::new();

        bridge.init("same", 640, 480).unwrap();
        let before = events().len();
        bridge.set_name("same").unwrap();
        assert_eq!(events().len(), before);
    }

    // Backend that checks the at-most-one-live-sender invariant across
    // threads; usable from any thread, unlike MockSender.
    struct StressSender;

    static STRESS_LIVE: AtomicUsize = AtomicUsize::new(0);

    impl SenderBackend for StressSender {
        fn open() -> Result<Self, BridgeError> {
            let prev = STRESS_LIVE.fetch_add(1, Ordering::SeqCst);
            assert_eq!(prev, 0, "more than one live sender");
            Ok(Self)
        }

        fn set_name(&mut self, _name: &str) {}

        fn create_surface(&mut self, _name: &str, _size: SurfaceSize) -> Result<(), BridgeError> {
            assert_eq!(STRESS_LIVE.load(Ordering::SeqCst), 1);
            Ok(())
        }

        fn update_surface(&mut self, _name: &str, _size: SurfaceSize) -> Result<(), BridgeError> {
            assert_eq!(STRESS_LIVE.load(Ordering::SeqCst), 1);
            Ok(())
        }

        fn send_texture(
            &mut self,
            _tex_id: u32,
            _size: SurfaceSize,
            _invert: bool,
        ) -> Result<(), BridgeError> {
            assert_eq!(STRESS_LIVE.load(Ordering::SeqCst), 1);
            Ok(())
        }

        fn release(&mut self) {
            let prev = STRESS_LIVE.fetch_sub(1, Ordering::SeqCst);
            assert_eq!(prev, 1, "release without a live sender");
        }
    }

    #[test]
    fn test_concurrent_lifecycle_keeps_single_sender() {
        let bridge: Arc<SenderBridge<StressSender>> = Arc::new(SenderBridge::new());

        let mut handles = Vec::new();
        for worker in 0..4 {
            let bridge = Arc::clone(&bridge);
            handles.push(std::thread::spawn(move || {
                for i in 0..200 {
                    match (worker + i) % 4 {
                        0 => {
                            let _ = bridge.init("stress-a", 640, 480);
                        }
                        1 => {
                            let _ = bridge.init("stress-b", 1280, 720);
                        }
                        2 => {
                            let _ = bridge.send(i as u32, 640, 480, false);
                        }
                        _ => bridge.shutdown(),
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        bridge.shutdown();
        assert_eq!(STRESS_LIVE.load(Ordering::SeqCst), 0);
    }
}
