//=========================================================================
// Platform Subsystem
//
// Narrow interface between the engine loop and the host: a display that
// hands out a drawable surface, and an input backend that is polled and
// drained.
//
// Architecture:
// ```text
//   Engine loop ──create/present/teardown──> DisplayBackend
//        │
//        └──poll/drain──────────────────────> InputBackend
//
//   WinitPlatform    : real window + OS events (desktop targets)
//   HeadlessPlatform : scripted, in-memory (tests, servers)
// ```
//
// Key Design Decisions:
// - **Pull, not push**: the loop drains events once per simulation step,
//   so backends queue everything in between and never call into scenes
// - **One object, two roles**: windowing systems tie the display and the
//   input queue to the same event loop, so a platform implements both
//   traits and the engine owns it whole
//
//=========================================================================

//=== Submodules ==========================================================

mod headless;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
mod input_buffer;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
mod input_processor;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
mod winit_window;

//=== Standard Library Imports ============================================

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

//=== External Crates =====================================================

use thiserror::Error;

//=== Internal Imports ====================================================

use crate::core::input::{InputEvent, KeyCode, MouseButton};

//=== Public API ==========================================================

pub use headless::{HeadlessHandle, HeadlessPlatform, HeadlessState, HeadlessSurface};
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use winit_window::{WinitPlatform, WinitSurface};

//=== Resolution ==========================================================

/// Display size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    /// 600×400.
    fn default() -> Self {
        Self::new(600, 400)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

//=== DisplayFlags ========================================================

/// Display creation flags.
///
/// The engine passes these through untouched; each backend decides which
/// bits it honours and ignores the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DisplayFlags(u32);

impl DisplayFlags {
    pub const NONE: Self = Self(0);
    pub const FULLSCREEN: Self = Self(1 << 0);
    pub const RESIZABLE: Self = Self(1 << 1);
    pub const NOFRAME: Self = Self(1 << 2);
    pub const HIDDEN: Self = Self(1 << 3);

    /// Wraps raw bits, including ones this crate has no name for.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for DisplayFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DisplayFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

//=== PlatformError =======================================================

/// Display and input backend failures.
///
/// Raised from `Engine::enter` (acquisition) or from `present` while the
/// loop runs. All of them are fatal to the current run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The OS event loop could not be created.
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// The window or surface could not be created.
    #[error("display creation failed: {0}")]
    WindowCreation(String),

    /// The input backend failed to initialize.
    #[error("input backend initialization failed: {0}")]
    InputInit(String),

    /// Presenting a frame failed.
    #[error("present failed: {0}")]
    Present(String),

    /// The backend is gone (e.g. the OS closed the event loop).
    #[error("platform unavailable: {0}")]
    Unavailable(String),
}

//=== DisplayBackend ======================================================

/// Surface creation and presentation.
pub trait DisplayBackend {
    /// Handle scenes draw into.
    type Surface;

    /// Creates the display surface.
    ///
    /// `depth` is `None` when the backend should pick the color depth.
    fn create(
        &mut self,
        resolution: Resolution,
        flags: DisplayFlags,
        depth: Option<u8>,
    ) -> Result<Self::Surface, PlatformError>;

    /// Shows what was drawn into `surface` since the last present.
    fn present(&mut self, surface: &mut Self::Surface) -> Result<(), PlatformError>;

    /// Releases the display. Must be safe to call more than once.
    fn teardown(&mut self);
}

//=== InputBackend ========================================================

/// Device polling and event queue.
pub trait InputBackend {
    /// Brings the backend up. Called by `Engine::enter` before the display
    /// is created.
    fn init(&mut self) -> Result<(), PlatformError>;

    /// Instantaneous pointer position.
    fn poll_pointer_position(&self) -> (f32, f32);

    /// Instantaneous pointer button states.
    fn poll_pointer_buttons(&self) -> HashMap<MouseButton, bool>;

    /// Keys currently held. Backends without a keyboard keep the default.
    fn poll_pressed_keys(&self) -> HashSet<KeyCode> {
        HashSet::new()
    }

    /// Takes every event queued since the previous call, oldest first.
    ///
    /// The returned batch is all the backend has; events not returned here
    /// are lost.
    fn drain_events(&mut self) -> Vec<InputEvent>;
}

//=== Platform ============================================================

/// A backend providing both display and input.
pub trait Platform: DisplayBackend + InputBackend {}

impl<T: DisplayBackend + InputBackend> Platform for T {}

//=========================================================================
// Unit Tests
//=========================================================================
