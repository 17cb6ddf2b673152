//=========================================================================
// Headless Platform
//=========================================================================
//
// In-memory display and input backend.
//
// The engine owns the platform, so the caller keeps a `HeadlessHandle`
// (shared with the platform) to script input and inspect what the engine
// did: presents, drains, teardowns.
//
// Used by the engine's own tests and by hosts that run scenes without a
// window (servers, replays).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{DisplayBackend, DisplayFlags, InputBackend, PlatformError, Resolution};
use crate::core::input::{InputEvent, KeyCode, MouseButton};

//=== Shared State ========================================================

/// Everything the headless backend records or replays.
#[derive(Debug, Default)]
pub struct HeadlessState {
    //--- Scripted input ---------------------------------------------------
    pub queue: Vec<InputEvent>,
    pub pointer: (f32, f32),
    pub buttons: HashMap<MouseButton, bool>,
    pub keys: HashSet<KeyCode>,

    //--- Injected failures ------------------------------------------------
    pub fail_init: Option<String>,
    pub fail_create: Option<String>,
    pub fail_present: Option<String>,

    //--- Observations -----------------------------------------------------
    pub initialized: bool,
    pub display_open: bool,
    pub created: u32,
    pub presented: u64,
    pub drains: u64,
    pub teardowns: u32,
}

//=== HeadlessHandle ======================================================

/// Caller-side handle to a [`HeadlessPlatform`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessHandle {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessHandle {
    /// Queues an event for the next drain.
    pub fn push_event(&self, event: InputEvent) {
        self.state.borrow_mut().queue.push(event);
    }

    /// Sets the polled pointer position.
    pub fn set_pointer(&self, x: f32, y: f32) {
        self.state.borrow_mut().pointer = (x, y);
    }

    /// Sets the polled state of one pointer button.
    pub fn set_button(&self, button: MouseButton, pressed: bool) {
        self.state.borrow_mut().buttons.insert(button, pressed);
    }

    /// Sets the polled state of one key.
    pub fn set_key(&self, key: KeyCode, pressed: bool) {
        let mut state = self.state.borrow_mut();
        if pressed {
            state.keys.insert(key);
        } else {
            state.keys.remove(&key);
        }
    }

    /// Makes the next `init` fail.
    pub fn fail_init(&self, reason: impl Into<String>) {
        self.state.borrow_mut().fail_init = Some(reason.into());
    }

    /// Makes the next `create` fail.
    pub fn fail_create(&self, reason: impl Into<String>) {
        self.state.borrow_mut().fail_create = Some(reason.into());
    }

    /// Makes the next `present` fail.
    pub fn fail_present(&self, reason: impl Into<String>) {
        self.state.borrow_mut().fail_present = Some(reason.into());
    }

    /// Read access to the recorded state.
    pub fn state(&self) -> Ref<'_, HeadlessState> {
        self.state.borrow()
    }
}

//=== HeadlessSurface =====================================================

/// Surface handed to scenes by the headless backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub resolution: Resolution,
    pub flags: DisplayFlags,
    pub depth: Option<u8>,
    pub frames_presented: u64,
}

//=== HeadlessPlatform ====================================================

/// Display and input backend with no OS behind it.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    handle: HeadlessHandle,
}

impl HeadlessPlatform {
    /// Creates a platform and the handle that scripts it.
    pub fn new() -> (Self, HeadlessHandle) {
        let handle = HeadlessHandle::default();
        (Self { handle: handle.clone() }, handle)
    }

    /// Another handle to the same state.
    pub fn handle(&self) -> HeadlessHandle {
        self.handle.clone()
    }
}

impl DisplayBackend for HeadlessPlatform {
    type Surface = HeadlessSurface;

    fn create(
        &mut self,
        resolution: Resolution,
        flags: DisplayFlags,
        depth: Option<u8>,
    ) -> Result<HeadlessSurface, PlatformError> {
        let mut state = self.handle.state.borrow_mut();
        if let Some(reason) = state.fail_create.take() {
            return Err(PlatformError::WindowCreation(reason));
        }

        state.created += 1;
        state.display_open = true;
        debug!(target: "platform", "Headless display created: {}", resolution);

        Ok(HeadlessSurface {
            resolution,
            flags,
            depth,
            frames_presented: 0,
        })
    }

    fn present(&mut self, surface: &mut HeadlessSurface) -> Result<(), PlatformError> {
        let mut state = self.handle.state.borrow_mut();
        if let Some(reason) = state.fail_present.take() {
            return Err(PlatformError::Present(reason));
        }
        state.presented += 1;
        surface.frames_presented += 1;
        Ok(())
    }

    fn teardown(&mut self) {
        let mut state = self.handle.state.borrow_mut();
        state.teardowns += 1;
        state.display_open = false;
        state.initialized = false;
    }
}

impl InputBackend for HeadlessPlatform {
    fn init(&mut self) -> Result<(), PlatformError> {
        let mut state = self.handle.state.borrow_mut();
        if let Some(reason) = state.fail_init.take() {
            return Err(PlatformError::InputInit(reason));
        }
        state.initialized = true;
        Ok(())
    }

    fn poll_pointer_position(&self) -> (f32, f32) {
        self.handle.state.borrow().pointer
    }

    fn poll_pointer_buttons(&self) -> HashMap<MouseButton, bool> {
        self.handle.state.borrow().buttons.clone()
    }

    fn poll_pressed_keys(&self) -> HashSet<KeyCode> {
        self.handle.state.borrow().keys.clone()
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        let mut state = self.handle.state.borrow_mut();
        state.drains += 1;
        std::mem::take(&mut state.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
