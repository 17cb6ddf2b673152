//=========================================================================
// Input Event Types
//
// Defines the internal representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. Winit) into a
// unified, engine-friendly format delivered to scenes through
// `Scene::handle_event`.
//
// Responsibilities:
// - Represent keyboard and mouse inputs in a stable, portable way
// - Carry modifier state alongside discrete events
// - Report window-level requests (close) as ordinary events
//
// Event Flow:
// ```text
// Platform Layer (Winit / Headless)
//         ↓
//    InputEvent (this module)
//         ↓
//    Engine loop (drained once per simulation step)
//         ↓
//    Scene::handle_event
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Middle button (wheel click).
    Middle,

    /// Secondary button (typically right).
    Right,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

impl MouseButton {
    /// Buttons always present in an [`InputSnapshot`](super::InputSnapshot).
    pub const TRACKED: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Keys the platform reported but the engine does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left/right variants are not distinguished. On macOS, Command is
/// reported as `ctrl` and Option as `alt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };

    /// Ctrl only.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// Returns `true` if no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== InputEvent ==========================================================

/// Low-level input event handed to the active scene.
///
/// Events are delivered in arrival order. Unlike the platform's internal
/// buffering, equality here is structural: two `MouseMoved` events at
/// different coordinates are different events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Key released.
    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Mouse button pressed.
    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Mouse button released.
    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Pointer moved. Coordinates are in surface pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// The user or the OS asked the display to close.
    ///
    /// The engine does not act on this itself; scenes decide whether it
    /// means `quit`.
    CloseRequested,

    /// Unrecognized or unsupported event.
    Unidentified,
}

impl InputEvent {
    /// Returns `true` for pointer motion events.
    pub fn is_pointer_motion(&self) -> bool {
        matches!(self, Self::MouseMoved { .. })
    }

    /// Modifier state carried by the event, if any.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => Some(*modifiers),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
