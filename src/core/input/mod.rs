//=========================================================================
// Input
//
// Engine-side input types.
//
// Responsibilities:
// - `event`: the events drained from the platform and routed to scenes
// - `snapshot`: the polled device state refreshed once per simulation step
//
// Notes:
// Raw device access lives behind `platform::InputBackend`. Nothing in this
// module talks to the OS directly.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod event;
mod snapshot;

//=== Public API ==========================================================
pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use snapshot::InputSnapshot;
