//=========================================================================
// Scene Context
//=========================================================================
//
// Engine state visible to scenes.
//
// Every scene hook and every scene factory receives `&Context`. It stands
// in for a back-reference to the engine: scenes read configuration, the
// current input snapshot and loop counters from it, but cannot reach the
// scene stack or the platform.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::input::InputSnapshot;
use crate::engine::EngineConfig;
use crate::platform::Resolution;

//=== Context =============================================================

/// Read-only view of the engine handed to scenes.
#[derive(Debug, Clone)]
pub struct Context {
    config: EngineConfig,
    input: InputSnapshot,
    frame_index: u64,
    tick_index: u64,
}

impl Context {
    pub(crate) fn new(config: EngineConfig) -> Self {
        Self {
            config,
            input: InputSnapshot::new(),
            frame_index: 0,
            tick_index: 0,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Simulation step every `simulate` call receives.
    pub fn fixed_step(&self) -> Duration {
        self.config.fixed_step
    }

    /// Configured display resolution.
    pub fn resolution(&self) -> Resolution {
        self.config.resolution
    }

    /// Input state captured for the current simulation step.
    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    /// Number of frames rendered since `run()` started.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Number of simulation steps executed since `run()` started.
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    //--- Engine-side Mutation ---------------------------------------------

    pub(crate) fn set_input(&mut self, input: InputSnapshot) {
        self.input = input;
    }

    pub(crate) fn reset_counters(&mut self) {
        self.frame_index = 0;
        self.tick_index = 0;
    }

    pub(crate) fn advance_frame(&mut self) {
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick_index = self.tick_index.wrapping_add(1);
    }
}
