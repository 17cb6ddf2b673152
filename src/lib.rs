//=========================================================================
// Aetheric Loop: Library Root
//
// A fixed-timestep application loop driving a stack of scenes.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`, `Session`)
// - Expose the scene contract and the input types scenes consume
// - Expose the platform seam (`DisplayBackend`, `InputBackend`) with a
//   Winit backend for desktops and a headless one for tests and servers
//
// Typical usage:
// ```no_run
// use aetheric_loop::prelude::*;
//
// fn main() -> anyhow::Result<()> {
//     let mut engine = EngineBuilder::new()
//         .with_fixed_step(1.0 / 60.0)
//         .with_first_scene(|ctx| MainMenu::new(ctx))
//         .build(WinitPlatform::new("demo"))?;
//
//     engine.enter()?.run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds what scenes see: the `Scene` trait, `SceneControl`,
// `Context` and the input types.
//
// `platform` holds the display/input seam and the provided backends.
//
// `engine` holds the loop, its configuration, clocks and errors.
//
pub mod core;
pub mod engine;
pub mod logging;
pub mod platform;
pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// The facade types, so applications can `use aetheric_loop::Engine;`
// without knowing the module layout.
//
pub use engine::{
    Clock, ConfigError, Engine, EngineBuilder, EngineConfig, EngineError, ManualClock, SceneHook,
    Session, SystemClock,
};
