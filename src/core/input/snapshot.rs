//=========================================================================
// Input Snapshot
//
// Point-in-time capture of polled device state.
//
// Responsibilities:
// - Hold pointer position, pointer button states and held keys
// - Rebuild itself wholesale from an `InputBackend` poll
// - Offer read-only queries to scenes
//
// Notes:
// A snapshot is never patched in place. Each refresh replaces it entirely,
// so scenes observe one coherent poll per simulation step.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::{HashMap, HashSet};
use std::fmt;

//=== Internal Modules ====================================================
use crate::core::input::event::{KeyCode, MouseButton};
use crate::platform::InputBackend;

//=== InputSnapshot =======================================================

/// Polled input state for the current simulation step.
///
/// The button map always contains [`MouseButton::TRACKED`], whatever the
/// backend reports, so `button(Left)` is never "unknown".
#[derive(Clone, PartialEq)]
pub struct InputSnapshot {
    pointer: (f32, f32),
    buttons: HashMap<MouseButton, bool>,
    keys: HashSet<KeyCode>,
}

impl InputSnapshot {
    //--- Construction -----------------------------------------------------

    /// Creates an empty snapshot: pointer at origin, nothing pressed.
    pub fn new() -> Self {
        Self::from_parts((0.0, 0.0), HashMap::new(), HashSet::new())
    }

    /// Builds a snapshot from raw polled values.
    pub fn from_parts(
        pointer: (f32, f32),
        mut buttons: HashMap<MouseButton, bool>,
        keys: HashSet<KeyCode>,
    ) -> Self {
        for button in MouseButton::TRACKED {
            buttons.entry(button).or_insert(false);
        }
        Self { pointer, buttons, keys }
    }

    /// Polls `backend` and returns a fresh snapshot.
    pub fn capture<B: InputBackend + ?Sized>(backend: &B) -> Self {
        Self::from_parts(
            backend.poll_pointer_position(),
            backend.poll_pointer_buttons(),
            backend.poll_pressed_keys(),
        )
    }

    //--- Queries ----------------------------------------------------------

    /// Pointer position `(x, y)` in surface pixels.
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Returns `true` if `button` was held at capture time.
    pub fn button(&self, button: MouseButton) -> bool {
        self.buttons.get(&button).copied().unwrap_or(false)
    }

    /// Full button map (button → pressed).
    pub fn buttons(&self) -> &HashMap<MouseButton, bool> {
        &self.buttons
    }

    /// Returns `true` if `key` was held at capture time.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Held keys at capture time.
    pub fn keys(&self) -> &HashSet<KeyCode> {
        &self.keys
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

//=== Debug Trait =========================================================
//
// Prints only pressed buttons, in a stable order.
//
// ```text
// InputSnapshot { pointer: (420.0, 255.0), buttons: [Left], keys: 2 }
// ```
//
impl fmt::Debug for InputSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pressed: Vec<_> = self
            .buttons
            .iter()
            .filter(|(_, down)| **down)
            .map(|(button, _)| *button)
            .collect();
        pressed.sort();

        f.debug_struct("InputSnapshot")
            .field("pointer", &self.pointer)
            .field("buttons", &pressed)
            .field("keys", &self.keys.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
