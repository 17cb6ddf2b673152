//=========================================================================
// Input Processor
//=========================================================================
//
// Translates Winit window events into engine `InputEvent`s and keeps the
// live device state the engine polls between drains.
//
// Architecture:
//   WindowEvent → InputProcessor ─┬─> InputEvent → InputBuffer (drained)
//                                 └─> pointer / buttons / keys (polled)
//
// Modifier state is sticky: it is cached from `ModifiersChanged` and
// stamped onto every following key or button event.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

/// Winit → engine event translation plus pollable device state.
pub(crate) struct InputProcessor {
    modifiers: Modifiers,
    pointer: (f32, f32),
    buttons: HashMap<MouseButton, bool>,
    keys: HashSet<KeyCode>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
            pointer: (0.0, 0.0),
            buttons: HashMap::new(),
            keys: HashSet::new(),
        }
    }

    //--- Polled State -----------------------------------------------------

    pub(crate) fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub(crate) fn buttons(&self) -> &HashMap<MouseButton, bool> {
        &self.buttons
    }

    pub(crate) fn keys(&self) -> &HashSet<KeyCode> {
        &self.keys
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Event Processing -------------------------------------------------

    /// Updates device state from `event` and returns the engine event to
    /// queue, if the window event maps to one.
    pub(crate) fn process(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::CloseRequested),

            WindowEvent::ModifiersChanged(state) => {
                self.set_modifiers(state.state());
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                Some(self.pointer_moved(position.x as f32, position.y as f32))
            }

            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.button_changed(MouseButton::from(*button), *state))
            }

            WindowEvent::KeyboardInput { event, .. } => self.key_changed(event),

            _ => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    fn pointer_moved(&mut self, x: f32, y: f32) -> InputEvent {
        self.pointer = (x, y);
        InputEvent::MouseMoved { x, y }
    }

    fn button_changed(&mut self, button: MouseButton, state: ElementState) -> InputEvent {
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => {
                self.buttons.insert(button, true);
                InputEvent::MouseButtonDown { button, modifiers }
            }
            ElementState::Released => {
                self.buttons.insert(button, false);
                InputEvent::MouseButtonUp { button, modifiers }
            }
        }
    }

    // Auto-repeat is dropped: the key is already reported as held.
    fn key_changed(&mut self, event: &KeyEvent) -> Option<InputEvent> {
        if event.repeat {
            return None;
        }

        let key = match event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => return None,
        };
        if key == KeyCode::Unidentified {
            return None;
        }

        Some(self.apply_key(key, event.state))
    }

    fn apply_key(&mut self, key: KeyCode, state: ElementState) -> InputEvent {
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => {
                self.keys.insert(key);
                InputEvent::KeyDown { key, modifiers }
            }
            ElementState::Released => {
                self.keys.remove(&key);
                InputEvent::KeyUp { key, modifiers }
            }
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Maps A-Z, 0-9, arrows and common editing keys. Everything else
/// (function keys, numpad, media keys) becomes `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            W::Digit0 => Self::Digit0, W::Digit1 => Self::Digit1, W::Digit2 => Self::Digit2,
            W::Digit3 => Self::Digit3, W::Digit4 => Self::Digit4, W::Digit5 => Self::Digit5,
            W::Digit6 => Self::Digit6, W::Digit7 => Self::Digit7, W::Digit8 => Self::Digit8,
            W::Digit9 => Self::Digit9,

            W::KeyA => Self::KeyA, W::KeyB => Self::KeyB, W::KeyC => Self::KeyC,
            W::KeyD => Self::KeyD, W::KeyE => Self::KeyE, W::KeyF => Self::KeyF,
            W::KeyG => Self::KeyG, W::KeyH => Self::KeyH, W::KeyI => Self::KeyI,
            W::KeyJ => Self::KeyJ, W::KeyK => Self::KeyK, W::KeyL => Self::KeyL,
            W::KeyM => Self::KeyM, W::KeyN => Self::KeyN, W::KeyO => Self::KeyO,
            W::KeyP => Self::KeyP, W::KeyQ => Self::KeyQ, W::KeyR => Self::KeyR,
            W::KeyS => Self::KeyS, W::KeyT => Self::KeyT, W::KeyU => Self::KeyU,
            W::KeyV => Self::KeyV, W::KeyW => Self::KeyW, W::KeyX => Self::KeyX,
            W::KeyY => Self::KeyY, W::KeyZ => Self::KeyZ,

            W::ArrowUp => Self::ArrowUp,
            W::ArrowDown => Self::ArrowDown,
            W::ArrowLeft => Self::ArrowLeft,
            W::ArrowRight => Self::ArrowRight,

            W::Space => Self::Space,
            W::Enter => Self::Enter,
            W::Escape => Self::Escape,
            W::Tab => Self::Tab,
            W::Backspace => Self::Backspace,
            W::Delete => Self::Delete,

            _ => Self::Unidentified,
        }
    }
}

/// Back/Forward/Other(n) all collapse to `MouseButton::Other`.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => Self::Left,
            WinitMouseButton::Right => Self::Right,
            WinitMouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
