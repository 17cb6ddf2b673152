//=========================================================================
// Engine Configuration
//=========================================================================
//
// `EngineConfig` (validated values) and `EngineBuilder` (fluent setup).
//
// Usage:
// ```text
//   EngineBuilder::new()
//       .with_fixed_step(1.0 / 60.0)
//       .with_resolution(800, 600)
//       .with_first_scene(|ctx| Menu::new(ctx))
//       .build(platform)?
// ```
//
// Only `first_scene` is required. Everything is validated at `build`, so
// an `Engine` never exists with a bad configuration.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::time::Duration;

use log::LevelFilter;

//=== Internal Dependencies ===============================================

use super::clock::{Clock, SystemClock};
use super::error::ConfigError;
use super::Engine;
use crate::core::{Context, Scene};
use crate::logging::{init_logging, LoggingConfig};
use crate::platform::{DisplayFlags, Platform, Resolution};

//=== Defaults ============================================================

/// Default simulation step in seconds.
pub const DEFAULT_FIXED_STEP: f64 = 0.016;

//=== EngineConfig ========================================================

/// Validated engine settings, readable by scenes through
/// [`Context::config`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub fixed_step: Duration,
    pub resolution: Resolution,
    pub display_flags: DisplayFlags,
    /// `None` lets the display backend choose.
    pub color_depth: Option<u8>,
    pub log_level: LevelFilter,
    /// Upper bound on the wall-clock time banked per frame. `None` banks
    /// everything.
    pub max_frame_delta: Option<Duration>,
}

impl EngineConfig {
    /// The fixed step in seconds, as passed to `Scene::simulate`.
    pub fn fixed_step_secs(&self) -> f64 {
        self.fixed_step.as_secs_f64()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_step: Duration::from_secs_f64(DEFAULT_FIXED_STEP),
            resolution: Resolution::default(),
            display_flags: DisplayFlags::NONE,
            color_depth: None,
            log_level: LevelFilter::Warn,
            max_frame_delta: None,
        }
    }
}

//=== First Scene =========================================================

/// Constructor for the scene `run()` starts with.
///
/// Unlike a [`SceneFactory`](crate::core::SceneFactory) it can be called
/// again, once per `run()`.
pub(crate) type FirstScene<S> = Box<dyn Fn(&Context) -> Box<dyn Scene<S>>>;

//=== EngineBuilder =======================================================

/// Fluent engine setup.
///
/// `S` is the surface type of the platform the engine will be built for.
pub struct EngineBuilder<S, C = SystemClock> {
    fixed_step: f64,
    resolution: Resolution,
    display_flags: DisplayFlags,
    color_depth: Option<u8>,
    log_level: LevelFilter,
    max_frame_delta: Option<f64>,
    first_scene: Option<FirstScene<S>>,
    clock: C,
}

impl<S> EngineBuilder<S, SystemClock> {
    /// Builder with every option at its default.
    pub fn new() -> Self {
        Self {
            fixed_step: DEFAULT_FIXED_STEP,
            resolution: Resolution::default(),
            display_flags: DisplayFlags::NONE,
            color_depth: None,
            log_level: LevelFilter::Warn,
            max_frame_delta: None,
            first_scene: None,
            clock: SystemClock::new(),
        }
    }
}

impl<S> Default for EngineBuilder<S, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C: Clock> EngineBuilder<S, C> {
    //--- Options ----------------------------------------------------------

    /// Simulation step in seconds. Must be finite and positive.
    pub fn with_fixed_step(mut self, seconds: f64) -> Self {
        self.fixed_step = seconds;
        self
    }

    /// Display size in pixels. Both dimensions must be non-zero.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = Resolution::new(width, height);
        self
    }

    /// Backend display flags.
    pub fn with_display_flags(mut self, flags: DisplayFlags) -> Self {
        self.display_flags = flags;
        self
    }

    /// Requested color depth in bits per pixel.
    pub fn with_color_depth(mut self, depth: u8) -> Self {
        self.color_depth = Some(depth);
        self
    }

    /// Log level used when the logger is installed by `build`.
    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// Caps the wall-clock time banked per frame, in seconds.
    pub fn with_max_frame_delta(mut self, seconds: f64) -> Self {
        self.max_frame_delta = Some(seconds);
        self
    }

    /// Scene pushed at the start of every `run()`.
    pub fn with_first_scene<T, F>(mut self, build: F) -> Self
    where
        T: Scene<S> + 'static,
        F: Fn(&Context) -> T + 'static,
    {
        self.first_scene = Some(Box::new(move |context: &Context| {
            Box::new(build(context)) as Box<dyn Scene<S>>
        }));
        self
    }

    /// Replaces the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> EngineBuilder<S, C2> {
        EngineBuilder {
            fixed_step: self.fixed_step,
            resolution: self.resolution,
            display_flags: self.display_flags,
            color_depth: self.color_depth,
            log_level: self.log_level,
            max_frame_delta: self.max_frame_delta,
            first_scene: self.first_scene,
            clock,
        }
    }

    //--- Build ------------------------------------------------------------

    /// Validates the options, installs logging and creates the engine.
    ///
    /// Nothing is acquired from `platform` until [`Engine::enter`].
    pub fn build<P>(self, platform: P) -> Result<Engine<P, C>, ConfigError>
    where
        P: Platform<Surface = S>,
    {
        let config = self.validate()?;
        let first_scene = self.first_scene.ok_or(ConfigError::MissingFirstScene)?;

        init_logging(LoggingConfig::from(config.log_level));
        log::debug!(
            "Engine configured: step {:?}, resolution {}, flags {:?}",
            config.fixed_step,
            config.resolution,
            config.display_flags
        );

        Ok(Engine::new(config, platform, self.clock, first_scene))
    }

    fn validate(&self) -> Result<EngineConfig, ConfigError> {
        let fixed_step = positive_duration(self.fixed_step)
            .ok_or(ConfigError::InvalidFixedStep(self.fixed_step))?;

        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.resolution.width,
                height: self.resolution.height,
            });
        }

        let max_frame_delta = match self.max_frame_delta {
            Some(seconds) => {
                Some(positive_duration(seconds).ok_or(ConfigError::InvalidMaxFrameDelta(seconds))?)
            }
            None => None,
        };

        Ok(EngineConfig {
            fixed_step,
            resolution: self.resolution,
            display_flags: self.display_flags,
            color_depth: self.color_depth,
            log_level: self.log_level,
            max_frame_delta,
        })
    }
}

impl<S, C> fmt::Debug for EngineBuilder<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("fixed_step", &self.fixed_step)
            .field("resolution", &self.resolution)
            .field("display_flags", &self.display_flags)
            .field("color_depth", &self.color_depth)
            .field("log_level", &self.log_level)
            .field("max_frame_delta", &self.max_frame_delta)
            .field("first_scene", &self.first_scene.is_some())
            .finish_non_exhaustive()
    }
}

// Rejects NaN, infinities, non-positive values and values too small to be
// represented as a non-zero `Duration`.
fn positive_duration(seconds: f64) -> Option<Duration> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(seconds)
        .ok()
        .filter(|duration| !duration.is_zero())
}

//=========================================================================
// Unit Tests
//=========================================================================
