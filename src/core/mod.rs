//=========================================================================
// Core
//
// Platform-independent pieces of the engine: the scene contract and
// stack, the input types scenes consume, and the context handed to them.
//
// Notes:
// Nothing here owns time or drives the loop; that is `engine`'s job.
// Nothing here touches the OS; that is `platform`'s job.
//
//=========================================================================

//=== Submodules ==========================================================
mod context;
pub mod input;
pub mod scene;

//=== Public API ==========================================================
pub use context::Context;
pub use input::{InputEvent, InputSnapshot, KeyCode, Modifiers, MouseButton};
pub use scene::{scene_factory, Scene, SceneControl, SceneFactory, SceneStack};
