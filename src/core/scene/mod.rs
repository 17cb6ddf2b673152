//=========================================================================
// Scene System
//=========================================================================
//
// Scene contract and stack.
//
// Architecture:
//   SceneStack
//     └─ scenes: Vec<Box<dyn Scene<S>>>   (top = last = active)
//
// Scenes never touch the stack. They raise intent through their
// `SceneControl` (running / quit / next) and the engine loop acts on it
// at the start of the following iteration.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::Context;

//=== Module Declarations =================================================

mod stack;

//=== Public API ==========================================================

pub use stack::SceneStack;

//=== Scene Factory =======================================================

/// Deferred scene constructor.
///
/// Stored in [`SceneControl::next`] until the engine resolves it, so the
/// successor is only built once its predecessor's frame is over.
pub type SceneFactory<S> = Box<dyn FnOnce(&Context) -> Box<dyn Scene<S>>>;

/// Boxes a constructor closure into a [`SceneFactory`].
///
/// ```
/// # use aetheric_loop::prelude::*;
/// # struct Menu { control: SceneControl<()> }
/// # impl Scene<()> for Menu {
/// #     fn control(&self) -> &SceneControl<()> { &self.control }
/// #     fn control_mut(&mut self) -> &mut SceneControl<()> { &mut self.control }
/// #     fn simulate(&mut self, _: &Context, _: f64) -> anyhow::Result<()> { Ok(()) }
/// #     fn render(&mut self, _: &Context, _: &mut ()) -> anyhow::Result<()> { Ok(()) }
/// # }
/// let factory: SceneFactory<()> = scene_factory(|_ctx| Menu { control: SceneControl::new() });
/// ```
pub fn scene_factory<S, T, F>(build: F) -> SceneFactory<S>
where
    T: Scene<S> + 'static,
    F: FnOnce(&Context) -> T + 'static,
{
    Box::new(move |context: &Context| Box::new(build(context)) as Box<dyn Scene<S>>)
}

//=== Scene Control =======================================================

/// Control fields every scene carries.
///
/// - `running == false`: pop this scene at the next iteration.
/// - `quit == true`: stop the engine before any further hook call.
/// - `next == Some(..)`: construct and push a successor at the next
///   iteration. The current scene is *not* popped unless `running` is also
///   false (push-without-pop is the default, e.g. pause over gameplay).
pub struct SceneControl<S> {
    pub running: bool,
    pub quit: bool,
    pub next: Option<SceneFactory<S>>,
}

impl<S> SceneControl<S> {
    /// Fresh control state: running, no quit, no pending transition.
    pub fn new() -> Self {
        Self {
            running: true,
            quit: false,
            next: None,
        }
    }

    /// Requests that this scene be popped.
    pub fn finish(&mut self) {
        self.running = false;
    }

    /// Requests engine shutdown.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Requests a successor pushed on top of this scene.
    pub fn push<T, F>(&mut self, build: F)
    where
        T: Scene<S> + 'static,
        F: FnOnce(&Context) -> T + 'static,
    {
        self.next = Some(scene_factory(build));
    }

    /// Requests that this scene be replaced by a successor.
    pub fn replace_with<T, F>(&mut self, build: F)
    where
        T: Scene<S> + 'static,
        F: FnOnce(&Context) -> T + 'static,
    {
        self.push(build);
        self.finish();
    }

    /// Returns `true` if a successor is waiting to be pushed.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub(crate) fn take_next(&mut self) -> Option<SceneFactory<S>> {
        self.next.take()
    }
}

impl<S> Default for SceneControl<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for SceneControl<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneControl")
            .field("running", &self.running)
            .field("quit", &self.quit)
            .field("next", &self.next.is_some())
            .finish()
    }
}

//=== Scene Trait =========================================================

/// A self-contained interactive state (menu, gameplay, pause...).
///
/// `S` is the platform's surface type, the value `render` draws into.
/// Only the top of the stack receives calls; suspended scenes keep their
/// state until they are exposed again.
///
/// Hooks return `anyhow::Result`: an error aborts `run()` and is surfaced
/// to its caller as [`EngineError::Scene`](crate::EngineError::Scene).
/// Scenes must tolerate being simulated zero or many times between two
/// renders.
///
/// # Minimal Implementation
///
/// ```rust
/// # use aetheric_loop::prelude::*;
/// struct Splash {
///     control: SceneControl<()>,
///     elapsed: f64,
/// }
///
/// impl Scene<()> for Splash {
///     fn control(&self) -> &SceneControl<()> { &self.control }
///     fn control_mut(&mut self) -> &mut SceneControl<()> { &mut self.control }
///
///     fn simulate(&mut self, _ctx: &Context, dt: f64) -> anyhow::Result<()> {
///         self.elapsed += dt;
///         if self.elapsed > 2.0 {
///             self.control.finish();
///         }
///         Ok(())
///     }
///
///     fn render(&mut self, _ctx: &Context, _surface: &mut ()) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Scene<S> {
    /// Control fields read by the engine.
    fn control(&self) -> &SceneControl<S>;

    /// Mutable control fields; the engine takes `next` through this.
    fn control_mut(&mut self) -> &mut SceneControl<S>;

    /// Advances the scene by exactly `dt` seconds (the fixed step).
    fn simulate(&mut self, context: &Context, dt: f64) -> anyhow::Result<()>;

    /// Draws the scene into the shared surface.
    fn render(&mut self, context: &Context, surface: &mut S) -> anyhow::Result<()>;

    /// Receives one drained input event.
    ///
    /// Default implementation ignores the event.
    fn handle_event(&mut self, _context: &Context, _event: &InputEvent) -> anyhow::Result<()> {
        Ok(())
    }

    /// Short name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
