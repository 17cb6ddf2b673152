//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_loop::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{
    Clock, ConfigError, Engine, EngineBuilder, EngineConfig, EngineError, ManualClock, Session,
    SystemClock,
};

// Scenes
pub use crate::core::{scene_factory, Context, Scene, SceneControl, SceneFactory};

// Input
pub use crate::core::{InputEvent, InputSnapshot, KeyCode, Modifiers, MouseButton};

// Platform
pub use crate::platform::{
    DisplayBackend, DisplayFlags, HeadlessPlatform, HeadlessSurface, InputBackend, Platform,
    Resolution,
};

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use crate::platform::{WinitPlatform, WinitSurface};
