//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy of the engine:
//
//   ConfigError    → rejected at `EngineBuilder::build`, no engine exists
//   PlatformError  → display/input acquisition or presentation failed
//   EngineError    → everything `enter` / `run` can report, including
//                    scene hook faults and lifecycle misuse
//
// Nothing is swallowed: every failure reaches the caller of `build`,
// `enter` or `run`.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::platform::PlatformError;

//=== ConfigError =========================================================

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `fixed_step` must be finite and strictly positive, otherwise the
    /// accumulator loop would never drain.
    #[error("fixed step must be a positive, finite number of seconds (got {0})")]
    InvalidFixedStep(f64),

    /// Both dimensions must be non-zero.
    #[error("resolution must be non-zero (got {width}x{height})")]
    InvalidResolution { width: u32, height: u32 },

    /// `max_frame_delta`, when set, must be strictly positive.
    #[error("max frame delta must be a positive, finite number of seconds (got {0})")]
    InvalidMaxFrameDelta(f64),

    /// No first scene was supplied.
    #[error("a first scene factory is required")]
    MissingFirstScene,
}

//=== SceneHook ===========================================================

/// Scene hook that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneHook {
    Simulate,
    Render,
    HandleEvent,
}

impl std::fmt::Display for SceneHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Simulate => "simulate",
            Self::Render => "render",
            Self::HandleEvent => "handle_event",
        };
        f.write_str(name)
    }
}

//=== EngineError =========================================================

/// Errors surfaced by [`Engine`](super::Engine).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// `run()` was called outside an `enter`/`exit` scope.
    #[error("engine must be entered before run()")]
    NotEntered,

    /// `enter()` was called while already entered.
    #[error("engine is already entered")]
    AlreadyEntered,

    /// A scene hook failed. The scene stack is left as it was.
    #[error("scene `{scene}` failed in {hook}")]
    Scene {
        scene: String,
        hook: SceneHook,
        #[source]
        source: anyhow::Error,
    },
}

//=========================================================================
// Unit Tests
//=========================================================================
