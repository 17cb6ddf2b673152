//=========================================================================
// Engine
//=========================================================================
//
// Fixed-timestep application loop over a scene stack.
//
// Architecture:
// ```text
//   EngineBuilder ──build──> Engine ──enter──> Session (guard) ──run──> loop
//                                                 │
//                                                 └─ Drop → exit (teardown)
//
//   iteration:
//     1. stop if the stack is empty or the top scene asked to quit
//     2. pop the top if it finished; push its successor if it named one
//     3. render the (new) top, present the surface
//     4. bank the elapsed wall-clock time
//     5. per due step: drain + dispatch events, snapshot input, simulate
// ```
//
// Key Design Decisions:
// - **Scenes signal, the engine acts**: scenes only touch their own
//   `SceneControl`; the stack changes at step 2 of the next iteration
// - **Quit is immediate**: it is checked after every hook call, so no
//   render or simulate follows it
// - **Events follow the simulation cadence**: a frame with no due step
//   leaves the queue untouched
// - **Release on every path**: `Session` tears the display down on
//   return, `?` and unwind
//
//=========================================================================

//=== Module Declarations =================================================

mod clock;
mod config;
mod error;
mod timestep;

//=== Public API ==========================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineBuilder, EngineConfig, DEFAULT_FIXED_STEP};
pub use error::{ConfigError, EngineError, SceneHook};

//=== External Dependencies ===============================================

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::{Context, InputSnapshot, Scene, SceneStack};
use crate::platform::Platform;
use config::FirstScene;
use timestep::FixedTimestep;

//=== Loop Control ========================================================

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickControl {
    Continue,
    Exit,
}

//=== Engine ==============================================================

/// Owns the platform, the clock and the scene stack, and drives them.
///
/// Build one with [`EngineBuilder`], then:
///
/// ```no_run
/// # use aetheric_loop::prelude::*;
/// # struct Menu { control: SceneControl<WinitSurface> }
/// # impl Scene<WinitSurface> for Menu {
/// #     fn control(&self) -> &SceneControl<WinitSurface> { &self.control }
/// #     fn control_mut(&mut self) -> &mut SceneControl<WinitSurface> { &mut self.control }
/// #     fn simulate(&mut self, _: &Context, _: f64) -> anyhow::Result<()> { Ok(()) }
/// #     fn render(&mut self, _: &Context, _: &mut WinitSurface) -> anyhow::Result<()> { Ok(()) }
/// # }
/// # fn main() -> anyhow::Result<()> {
/// let mut engine = EngineBuilder::new()
///     .with_first_scene(|_ctx| Menu { control: SceneControl::new() })
///     .build(WinitPlatform::new("demo"))?;
///
/// let mut session = engine.enter()?;
/// session.run()?;
/// # Ok(())
/// # }
/// ```
pub struct Engine<P: Platform, C: Clock = SystemClock> {
    config: EngineConfig,
    platform: P,
    clock: C,
    first_scene: FirstScene<P::Surface>,
    stack: SceneStack<P::Surface>,
    context: Context,
    timestep: FixedTimestep,
    surface: Option<P::Surface>,
}

impl<P: Platform, C: Clock> Engine<P, C> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        config: EngineConfig,
        platform: P,
        clock: C,
        first_scene: FirstScene<P::Surface>,
    ) -> Self {
        let timestep = FixedTimestep::new(config.fixed_step, config.max_frame_delta);
        Self {
            context: Context::new(config.clone()),
            config,
            platform,
            clock,
            first_scene,
            stack: SceneStack::new(),
            timestep,
            surface: None,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Acquires input and display and returns the guard that releases them.
    ///
    /// On failure nothing stays acquired and the engine is left un-entered.
    pub fn enter(&mut self) -> Result<Session<'_, P, C>, EngineError> {
        if self.surface.is_some() {
            return Err(EngineError::AlreadyEntered);
        }

        info!("Entering engine context");

        if let Err(e) = self.platform.init() {
            error!("Input initialization failed: {}", e);
            self.platform.teardown();
            return Err(e.into());
        }

        let surface = match self.platform.create(
            self.config.resolution,
            self.config.display_flags,
            self.config.color_depth,
        ) {
            Ok(surface) => surface,
            Err(e) => {
                error!("Display creation failed: {}", e);
                self.platform.teardown();
                return Err(e.into());
            }
        };

        self.surface = Some(surface);
        self.refresh_input();
        Ok(Session { engine: self })
    }

    /// Releases the display and input backend.
    ///
    /// Safe to call any number of times, entered or not.
    pub fn exit(&mut self) {
        if self.surface.take().is_some() {
            info!("Exiting engine context");
        }
        self.platform.teardown();
    }

    //--- Loop -------------------------------------------------------------

    /// Runs until the stack empties or the top scene quits.
    ///
    /// Starts from a fresh stack holding only the first scene. Scene hook
    /// errors abort the loop and are returned as [`EngineError::Scene`];
    /// the stack is left as it was at the failure.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if self.surface.is_none() {
            return Err(EngineError::NotEntered);
        }

        self.begin_run();
        while self.iterate()? == TickControl::Continue {}

        info!(
            "Engine loop finished after {} frames and {} steps",
            self.context.frame_index(),
            self.context.tick_index()
        );
        Ok(())
    }

    fn begin_run(&mut self) {
        self.stack.clear();
        self.context.reset_counters();
        self.timestep.reset(self.clock.now());

        let scene = (self.first_scene)(&self.context);
        info!("Running with first scene `{}`", scene.name());
        self.stack.push(scene);
    }

    fn iterate(&mut self) -> Result<TickControl, EngineError> {
        //--- Stop check ---------------------------------------------------
        match self.stack.top() {
            None => {
                debug!("Scene stack empty; stopping");
                return Ok(TickControl::Exit);
            }
            Some(top) if top.control().quit => {
                info!("Scene `{}` requested quit", top.name());
                return Ok(TickControl::Exit);
            }
            Some(_) => {}
        }

        self.resolve_transitions();

        let Some(surface) = self.surface.as_mut() else {
            return Err(EngineError::NotEntered);
        };
        let Some(top) = self.stack.top_mut() else {
            return Ok(TickControl::Continue);
        };

        //--- Render -------------------------------------------------------
        top.render(&self.context, surface)
            .map_err(|source| scene_error(&*top, SceneHook::Render, source))?;
        self.platform.present(surface)?;
        self.context.advance_frame();

        if top.control().quit {
            return Ok(TickControl::Exit);
        }

        //--- Accumulate ---------------------------------------------------
        let frame_delta = self.timestep.accumulate(self.clock.now());
        trace!("Frame {} delta {:?}", self.context.frame_index(), frame_delta);

        //--- Fixed steps --------------------------------------------------
        let dt = self.timestep.step().as_secs_f64();
        while self.timestep.step_due() {
            for event in self.platform.drain_events() {
                top.handle_event(&self.context, &event)
                    .map_err(|source| scene_error(&*top, SceneHook::HandleEvent, source))?;
                if top.control().quit {
                    return Ok(TickControl::Exit);
                }
            }

            self.context.set_input(InputSnapshot::capture(&self.platform));
            top.simulate(&self.context, dt)
                .map_err(|source| scene_error(&*top, SceneHook::Simulate, source))?;
            self.context.advance_tick();
            self.timestep.consume_step();

            if top.control().quit {
                return Ok(TickControl::Exit);
            }
        }

        Ok(TickControl::Continue)
    }

    // Pops a finished top scene and pushes the successor it named. The
    // retired scene is dropped after its successor has been built.
    fn resolve_transitions(&mut self) {
        let Some(top) = self.stack.top_mut() else {
            return;
        };
        let finished = !top.control().running;
        let next = top.control_mut().take_next();

        let _retired = if finished { self.stack.pop() } else { None };

        if let Some(factory) = next {
            let scene = factory(&self.context);
            self.stack.push(scene);
        }
    }

    fn refresh_input(&mut self) {
        self.context.set_input(InputSnapshot::capture(&self.platform));
    }

    //--- Queries ----------------------------------------------------------

    /// Validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// State shared with scenes (input snapshot, counters).
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Returns `true` between a successful `enter` and `exit`.
    pub fn is_entered(&self) -> bool {
        self.surface.is_some()
    }

    /// Number of scenes on the stack.
    pub fn scene_count(&self) -> usize {
        self.stack.len()
    }

    /// Scene names, bottom first.
    pub fn scene_names(&self) -> Vec<&str> {
        self.stack.names()
    }

    /// Banked time not yet consumed by a simulation step.
    pub fn unused_time(&self) -> Duration {
        self.timestep.unused()
    }
}

impl<P: Platform, C: Clock> fmt::Debug for Engine<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("entered", &self.is_entered())
            .field("scenes", &self.stack)
            .field("unused_time", &self.timestep.unused())
            .finish_non_exhaustive()
    }
}

fn scene_error<S>(scene: &dyn Scene<S>, hook: SceneHook, source: anyhow::Error) -> EngineError {
    error!("Scene `{}` failed in {}: {:#}", scene.name(), hook, source);
    EngineError::Scene {
        scene: scene.name().to_owned(),
        hook,
        source,
    }
}

//=== Session =============================================================

/// Entered engine. Dropping it calls [`Engine::exit`].
///
/// Dereferences to the engine for queries.
pub struct Session<'a, P: Platform, C: Clock = SystemClock> {
    engine: &'a mut Engine<P, C>,
}

impl<P: Platform, C: Clock> Session<'_, P, C> {
    /// Runs the loop; see [`Engine::run`].
    pub fn run(&mut self) -> Result<(), EngineError> {
        self.engine.run()
    }
}

impl<P: Platform, C: Clock> Deref for Session<'_, P, C> {
    type Target = Engine<P, C>;

    fn deref(&self) -> &Self::Target {
        self.engine
    }
}

impl<P: Platform, C: Clock> DerefMut for Session<'_, P, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine
    }
}

impl<P: Platform, C: Clock> Drop for Session<'_, P, C> {
    fn drop(&mut self) {
        self.engine.exit();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InputEvent, KeyCode, MouseButton, SceneControl};
    use crate::platform::{HeadlessHandle, HeadlessPlatform, HeadlessSurface, PlatformError};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    //=== Probe Scene =====================================================

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Render(&'static str),
        Simulate(&'static str, f64),
        Event(&'static str, InputEvent),
    }

    type Journal = Rc<RefCell<Vec<Call>>>;
    type Hook = Box<dyn FnMut(&mut SceneControl<HeadlessSurface>, &Context, u32)>;

    /// Scene that journals its calls and moves the shared clock forward by
    /// one scripted delta per render. With the script exhausted, the next
    /// render quits without being journaled.
    struct Probe {
        name: &'static str,
        control: SceneControl<HeadlessSurface>,
        journal: Journal,
        clock: ManualClock,
        deltas: VecDeque<f64>,
        renders: u32,
        simulates: u32,
        on_render: Option<Hook>,
        on_simulate: Option<Hook>,
        on_event: Option<Hook>,
        fail_in: Option<SceneHook>,
    }

    impl Probe {
        fn new(name: &'static str, journal: &Journal, clock: &ManualClock, deltas: &[f64]) -> Self {
            Self {
                name,
                control: SceneControl::new(),
                journal: Rc::clone(journal),
                clock: clock.clone(),
                deltas: deltas.iter().copied().collect(),
                renders: 0,
                simulates: 0,
                on_render: None,
                on_simulate: None,
                on_event: None,
                fail_in: None,
            }
        }

        fn on_render(mut self, hook: impl FnMut(&mut SceneControl<HeadlessSurface>, &Context, u32) + 'static) -> Self {
            self.on_render = Some(Box::new(hook));
            self
        }

        fn on_simulate(mut self, hook: impl FnMut(&mut SceneControl<HeadlessSurface>, &Context, u32) + 'static) -> Self {
            self.on_simulate = Some(Box::new(hook));
            self
        }

        fn on_event(mut self, hook: impl FnMut(&mut SceneControl<HeadlessSurface>, &Context, u32) + 'static) -> Self {
            self.on_event = Some(Box::new(hook));
            self
        }

        fn failing_in(mut self, hook: SceneHook) -> Self {
            self.fail_in = Some(hook);
            self
        }
    }

    impl Scene<HeadlessSurface> for Probe {
        fn control(&self) -> &SceneControl<HeadlessSurface> {
            &self.control
        }

        fn control_mut(&mut self) -> &mut SceneControl<HeadlessSurface> {
            &mut self.control
        }

        fn simulate(&mut self, context: &Context, dt: f64) -> anyhow::Result<()> {
            if self.fail_in == Some(SceneHook::Simulate) {
                anyhow::bail!("simulate exploded");
            }
            self.simulates += 1;
            self.journal.borrow_mut().push(Call::Simulate(self.name, dt));
            if let Some(hook) = self.on_simulate.as_mut() {
                hook(&mut self.control, context, self.simulates);
            }
            Ok(())
        }

        fn render(&mut self, context: &Context, surface: &mut HeadlessSurface) -> anyhow::Result<()> {
            if self.fail_in == Some(SceneHook::Render) {
                panic!("render panicked");
            }
            let Some(delta) = self.deltas.pop_front() else {
                self.control.quit();
                return Ok(());
            };
            assert_eq!(surface.resolution, context.resolution());

            self.renders += 1;
            self.clock.advance_secs(delta);
            self.journal.borrow_mut().push(Call::Render(self.name));
            if let Some(hook) = self.on_render.as_mut() {
                hook(&mut self.control, context, self.renders);
            }
            Ok(())
        }

        fn handle_event(&mut self, context: &Context, event: &InputEvent) -> anyhow::Result<()> {
            if self.fail_in == Some(SceneHook::HandleEvent) {
                anyhow::bail!("bad event");
            }
            self.journal.borrow_mut().push(Call::Event(self.name, *event));
            if let Some(hook) = self.on_event.as_mut() {
                let count = self.journal.borrow().iter().filter(|c| matches!(c, Call::Event(..))).count();
                hook(&mut self.control, context, count as u32);
            }
            Ok(())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    //=== Fixture =========================================================

    struct Fixture {
        engine: Engine<HeadlessPlatform, ManualClock>,
        handle: HeadlessHandle,
        journal: Journal,
    }

    fn fixture<F>(step: f64, first: F) -> Fixture
    where
        F: Fn(&Context, &Journal, &ManualClock) -> Probe + 'static,
    {
        let (platform, handle) = HeadlessPlatform::new();
        let journal: Journal = Rc::default();
        let clock = ManualClock::new();

        let scene_journal = Rc::clone(&journal);
        let scene_clock = clock.clone();
        let engine = EngineBuilder::new()
            .with_fixed_step(step)
            .with_clock(clock)
            .with_first_scene(move |ctx| first(ctx, &scene_journal, &scene_clock))
            .build(platform)
            .expect("valid configuration");

        Fixture { engine, handle, journal }
    }

    fn calls(journal: &Journal) -> Vec<Call> {
        journal.borrow().clone()
    }

    fn count_simulates(journal: &Journal, name: &str) -> usize {
        journal
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Simulate(n, _) if *n == name))
            .count()
    }

    fn run(fixture: &mut Fixture) -> Result<(), EngineError> {
        let mut session = fixture.engine.enter().expect("enter succeeds");
        session.run()
    }

    //=== Timing ==========================================================

    #[test]
    fn one_frame_of_25ms_runs_two_10ms_steps() {
        let mut fx = fixture(0.01, |_, journal, clock| Probe::new("a", journal, clock, &[0.025]));
        run(&mut fx).expect("run succeeds");

        assert_eq!(
            calls(&fx.journal),
            vec![Call::Render("a"), Call::Simulate("a", 0.01), Call::Simulate("a", 0.01)]
        );
        assert_eq!(fx.engine.unused_time(), Duration::from_millis(5));
    }

    #[test]
    fn simulate_count_matches_elapsed_time() {
        let deltas = [0.003, 0.017, 0.040, 0.001, 0.0, 0.099, 0.016, 0.033];
        let mut fx = fixture(0.016, move |_, journal, clock| Probe::new("a", journal, clock, &deltas));
        run(&mut fx).expect("run succeeds");

        // 209ms of frames over a 16ms step.
        assert_eq!(count_simulates(&fx.journal, "a"), 13);
        assert_eq!(fx.engine.unused_time(), Duration::from_millis(1));
        assert!(calls(&fx.journal)
            .iter()
            .all(|c| !matches!(c, Call::Simulate(_, dt) if *dt != 0.016)));
    }

    #[test]
    fn leftover_time_stays_below_one_step() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.004, 0.013, 0.029, 0.0]).on_render(|_, ctx, _| {
                assert!(ctx.fixed_step() == Duration::from_millis(10));
            })
        });
        run(&mut fx).expect("run succeeds");

        assert!(fx.engine.unused_time() < Duration::from_millis(10));
        assert_eq!(count_simulates(&fx.journal, "a"), 4);
        assert_eq!(fx.engine.unused_time(), Duration::from_millis(6));
    }

    #[test]
    fn max_frame_delta_caps_banked_time() {
        let (platform, _handle) = HeadlessPlatform::new();
        let journal: Journal = Rc::default();
        let clock = ManualClock::new();
        let (scene_journal, scene_clock) = (Rc::clone(&journal), clock.clone());

        let mut engine = EngineBuilder::new()
            .with_fixed_step(0.01)
            .with_max_frame_delta(0.05)
            .with_clock(clock)
            .with_first_scene(move |_| Probe::new("a", &scene_journal, &scene_clock, &[0.5]))
            .build(platform)
            .expect("valid configuration");

        engine.enter().expect("enter succeeds").run().expect("run succeeds");
        assert_eq!(count_simulates(&journal, "a"), 5);
    }

    #[test]
    fn context_counters_track_frames_and_steps() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.02, 0.01]).on_simulate(|_, ctx, n| {
                assert_eq!(ctx.tick_index(), u64::from(n) - 1);
            })
        });
        run(&mut fx).expect("run succeeds");

        // Two scripted frames plus the quitting one.
        assert_eq!(fx.engine.context().frame_index(), 3);
        assert_eq!(fx.engine.context().tick_index(), 3);
        assert_eq!(fx.handle.state().presented, 3);
    }

    //=== Scene Stack =====================================================

    #[test]
    fn first_scene_already_quitting_gets_no_calls() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            let mut probe = Probe::new("a", journal, clock, &[0.1]);
            probe.control.quit();
            probe
        });
        run(&mut fx).expect("run succeeds");

        assert!(calls(&fx.journal).is_empty());
        assert_eq!(fx.handle.state().presented, 0);
    }

    #[test]
    fn push_without_pop_suspends_the_pusher() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            let (journal_b, clock_b) = (Rc::clone(journal), clock.clone());
            Probe::new("a", journal, clock, &[0.01, 0.01]).on_simulate(move |control, _, n| {
                if n == 1 {
                    let (journal, clock) = (Rc::clone(&journal_b), clock_b.clone());
                    control.push(move |_| Probe::new("b", &journal, &clock, &[0.02]));
                }
            })
        });
        run(&mut fx).expect("run succeeds");

        assert_eq!(fx.engine.scene_names(), vec!["a", "b"]);
        assert_eq!(
            calls(&fx.journal),
            vec![
                Call::Render("a"),
                Call::Simulate("a", 0.01),
                Call::Render("b"),
                Call::Simulate("b", 0.01),
                Call::Simulate("b", 0.01),
            ]
        );
    }

    #[test]
    fn replace_swaps_the_top_scene() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            let (journal_b, clock_b) = (Rc::clone(journal), clock.clone());
            Probe::new("a", journal, clock, &[0.01]).on_simulate(move |control, _, _| {
                let (journal, clock) = (Rc::clone(&journal_b), clock_b.clone());
                control.replace_with(move |_| Probe::new("b", &journal, &clock, &[0.01]));
            })
        });
        run(&mut fx).expect("run succeeds");

        assert_eq!(fx.engine.scene_names(), vec!["b"]);
        assert_eq!(count_simulates(&fx.journal, "b"), 1);
    }

    #[test]
    fn finishing_the_last_scene_empties_the_stack() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.01, 0.01]).on_simulate(|control, _, _| control.finish())
        });
        run(&mut fx).expect("run succeeds");

        assert_eq!(fx.engine.scene_count(), 0);
        assert_eq!(calls(&fx.journal), vec![Call::Render("a"), Call::Simulate("a", 0.01)]);
        assert_eq!(fx.handle.state().presented, 1);
    }

    #[test]
    fn flags_raised_mid_batch_apply_next_iteration() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.03]).on_simulate(|control, _, n| {
                if n == 1 {
                    control.finish();
                }
            })
        });
        run(&mut fx).expect("run succeeds");

        assert_eq!(count_simulates(&fx.journal, "a"), 3);
        assert_eq!(fx.engine.scene_count(), 0);
    }

    #[test]
    fn first_scene_factory_receives_context() {
        let mut fx = fixture(0.01, |ctx, journal, clock| {
            assert_eq!(ctx.resolution().width, 600);
            Probe::new("a", journal, clock, &[])
        });
        run(&mut fx).expect("run succeeds");
        assert!(calls(&fx.journal).is_empty());
    }

    #[test]
    fn run_restarts_from_the_first_scene() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.01]).on_simulate(|control, _, _| control.finish())
        });
        run(&mut fx).expect("first run");
        run(&mut fx).expect("second run");

        assert_eq!(count_simulates(&fx.journal, "a"), 2);
        assert_eq!(fx.handle.state().created, 2);
    }

    //=== Quit ============================================================

    #[test]
    fn quit_in_simulate_abandons_remaining_steps() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.05, 0.05]).on_simulate(|control, _, _| control.quit())
        });
        run(&mut fx).expect("run succeeds");

        assert_eq!(calls(&fx.journal), vec![Call::Render("a"), Call::Simulate("a", 0.01)]);
    }

    #[test]
    fn quit_in_render_skips_simulation() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.05]).on_render(|control, _, _| control.quit())
        });
        run(&mut fx).expect("run succeeds");

        assert_eq!(calls(&fx.journal), vec![Call::Render("a")]);
        assert_eq!(fx.handle.state().presented, 1);
    }

    #[test]
    fn quit_in_event_handler_stops_before_simulate() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.01]).on_event(|control, _, _| control.quit())
        });
        fx.handle.push_event(InputEvent::CloseRequested);
        fx.handle.push_event(InputEvent::MouseMoved { x: 1.0, y: 1.0 });
        run(&mut fx).expect("run succeeds");

        assert_eq!(
            calls(&fx.journal),
            vec![Call::Render("a"), Call::Event("a", InputEvent::CloseRequested)]
        );
    }

    //=== Input ===========================================================

    #[test]
    fn events_are_drained_once_per_step_in_order() {
        let mut fx = fixture(0.01, |_, journal, clock| Probe::new("a", journal, clock, &[0.005, 0.01]));
        let down = InputEvent::KeyDown { key: KeyCode::Space, modifiers: Default::default() };
        let up = InputEvent::KeyUp { key: KeyCode::Space, modifiers: Default::default() };
        fx.handle.push_event(down);
        fx.handle.push_event(up);

        run(&mut fx).expect("run succeeds");

        assert_eq!(
            calls(&fx.journal),
            vec![
                Call::Render("a"),
                Call::Render("a"),
                Call::Event("a", down),
                Call::Event("a", up),
                Call::Simulate("a", 0.01),
            ]
        );
        assert_eq!(fx.handle.state().drains, 1, "No drain on frames without a due step");
    }

    #[test]
    fn snapshot_is_refreshed_before_each_simulate() {
        let seen: Rc<RefCell<Vec<(f32, f32, bool)>>> = Rc::default();
        let seen_in_scene = Rc::clone(&seen);

        let mut fx = fixture(0.01, move |_, journal, clock| {
            let seen = Rc::clone(&seen_in_scene);
            Probe::new("a", journal, clock, &[0.01, 0.01]).on_simulate(move |_, ctx, _| {
                let input = ctx.input();
                seen.borrow_mut().push((input.pointer().0, input.pointer().1, input.button(MouseButton::Left)));
            })
        });

        fx.handle.set_pointer(3.0, 4.0);
        {
            let mut session = fx.engine.enter().expect("enter succeeds");
            assert_eq!(session.context().input().pointer(), (3.0, 4.0), "Snapshot taken on enter");
            assert!(!session.context().input().button(MouseButton::Left));

            fx.handle.set_button(MouseButton::Left, true);
            fx.handle.set_pointer(5.0, 6.0);
            session.run().expect("run succeeds");
        }

        assert_eq!(*seen.borrow(), vec![(5.0, 6.0, true), (5.0, 6.0, true)]);
    }

    //=== Lifecycle =======================================================

    #[test]
    fn run_before_enter_is_rejected() {
        let mut fx = fixture(0.01, |_, journal, clock| Probe::new("a", journal, clock, &[0.01]));
        assert!(matches!(fx.engine.run(), Err(EngineError::NotEntered)));
        assert!(calls(&fx.journal).is_empty());
    }

    #[test]
    fn entering_twice_is_rejected() {
        let mut fx = fixture(0.01, |_, journal, clock| Probe::new("a", journal, clock, &[]));
        let mut session = fx.engine.enter().expect("enter succeeds");
        assert!(matches!(session.enter(), Err(EngineError::AlreadyEntered)));
        assert!(session.is_entered());
    }

    #[test]
    fn failed_enter_holds_nothing() {
        let mut fx = fixture(0.01, |_, journal, clock| Probe::new("a", journal, clock, &[]));
        fx.handle.fail_create("no display");

        let result = fx.engine.enter().map(|_| ());
        assert!(matches!(result, Err(EngineError::Platform(PlatformError::WindowCreation(_)))));
        assert!(!fx.engine.is_entered());
        {
            let state = fx.handle.state();
            assert!(!state.display_open);
            assert!(!state.initialized);
        }

        fx.handle.fail_init("no devices");
        assert!(matches!(
            fx.engine.enter().map(|_| ()),
            Err(EngineError::Platform(PlatformError::InputInit(_)))
        ));
        assert!(!fx.engine.is_entered());

        run(&mut fx).expect("third attempt succeeds");
    }

    #[test]
    fn session_drop_releases_display() {
        let mut fx = fixture(0.01, |_, journal, clock| Probe::new("a", journal, clock, &[0.01]));
        {
            let mut session = fx.engine.enter().expect("enter succeeds");
            assert!(fx_display_open(&fx.handle));
            session.run().expect("run succeeds");
        }
        assert!(!fx.engine.is_entered());
        assert!(!fx_display_open(&fx.handle));

        fx.engine.exit();
        fx.engine.exit();
        assert!(!fx.engine.is_entered());
    }

    fn fx_display_open(handle: &HeadlessHandle) -> bool {
        handle.state().display_open
    }

    //=== Errors ==========================================================

    #[test]
    fn scene_error_propagates_and_releases_display() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.02]).failing_in(SceneHook::Simulate)
        });

        let err = run(&mut fx).expect_err("simulate fails");
        match err {
            EngineError::Scene { scene, hook, source } => {
                assert_eq!(scene, "a");
                assert_eq!(hook, SceneHook::Simulate);
                assert_eq!(source.to_string(), "simulate exploded");
            }
            other => panic!("Expected scene error, got {:?}", other),
        }
        assert!(!fx_display_open(&fx.handle));
        assert_eq!(fx.engine.scene_count(), 1, "Stack left as it was");
    }

    #[test]
    fn event_handler_error_names_the_hook() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.01]).failing_in(SceneHook::HandleEvent)
        });
        fx.handle.push_event(InputEvent::Unidentified);

        let err = run(&mut fx).expect_err("handle_event fails");
        assert!(matches!(err, EngineError::Scene { hook: SceneHook::HandleEvent, .. }));
    }

    #[test]
    fn present_failure_is_reported() {
        let mut fx = fixture(0.01, |_, journal, clock| Probe::new("a", journal, clock, &[0.01]));
        fx.handle.fail_present("surface lost");

        let err = run(&mut fx).expect_err("present fails");
        assert!(matches!(err, EngineError::Platform(PlatformError::Present(_))));
        assert!(!fx_display_open(&fx.handle));
    }

    #[test]
    fn panic_in_scene_still_releases_display() {
        let mut fx = fixture(0.01, |_, journal, clock| {
            Probe::new("a", journal, clock, &[0.01]).failing_in(SceneHook::Render)
        });

        let engine = &mut fx.engine;
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut session = engine.enter().expect("enter succeeds");
            let _ = session.run();
        }));

        assert!(outcome.is_err());
        assert!(!fx.engine.is_entered());
        assert!(!fx_display_open(&fx.handle));
    }
}
