//=========================================================================
// Winit Platform
//=========================================================================
//
// Desktop display and input backend built on Winit's pump-events API.
//
// Architecture:
// ```text
//  Engine loop (owns the thread)
//    │
//    ├─ create()        → pump until the window exists
//    ├─ drain_events()  → pump once (non-blocking)
//    │                      WindowEvent → InputProcessor → InputBuffer
//    │                    → InputBuffer::drain()
//    ├─ poll_*()        → InputProcessor's live state
//    ├─ present()       → pre_present_notify + request_redraw
//    └─ teardown()      → drop the window
// ```
//
// Key Design Decisions:
// - **Pumped, not run**: `EventLoop::run_app` would take over the thread;
//   pumping keeps the engine loop in charge of time
// - **Event loop outlives the window**: Winit allows one event loop per
//   process, so teardown releases the window and keeps the loop for a
//   later `enter`
// - **Close is an event**: a close request is queued as
//   `InputEvent::CloseRequested`; scenes decide whether it means quit
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

//=== External Crates =====================================================

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use super::input_buffer::InputBuffer;
use super::input_processor::InputProcessor;
use super::{DisplayBackend, DisplayFlags, InputBackend, PlatformError, Resolution};
use crate::core::input::{InputEvent, KeyCode, MouseButton};

//=== WinitSurface ========================================================

/// Surface handed to scenes: the window itself.
///
/// Scenes (or the renderer they own) build their GPU or software surface
/// from [`WinitSurface::window`].
#[derive(Debug, Clone)]
pub struct WinitSurface {
    window: Arc<Window>,
}

impl WinitSurface {
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Current inner size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }
}

//=== WinitApp ============================================================
//
// The `ApplicationHandler` Winit calls back into while pumping.
//
struct WinitApp {
    pending: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    create_error: Option<String>,
    processor: InputProcessor,
    buffer: InputBuffer,
}

impl WinitApp {
    fn new() -> Self {
        Self {
            pending: None,
            window: None,
            create_error: None,
            processor: InputProcessor::new(),
            buffer: InputBuffer::new(),
        }
    }

    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attributes) = self.pending.take() else {
            return;
        };

        match event_loop.create_window(attributes) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.create_error = Some(e.to_string());
            }
        }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            info!(target: "platform", "Window close requested");
        }

        match self.processor.process(&event) {
            Some(input) => self.buffer.push(input),
            None => trace!(target: "platform::input", "Ignored window event: {:?}", event),
        }
    }
}

//=== WinitPlatform =======================================================

/// Window and OS input through Winit.
///
/// Must be driven from the main thread on macOS.
pub struct WinitPlatform {
    title: String,
    event_loop: Option<EventLoop<()>>,
    app: WinitApp,
}

impl WinitPlatform {
    //--- Construction -----------------------------------------------------

    /// Creates an idle platform. Nothing is acquired until `init`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            event_loop: None,
            app: WinitApp::new(),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn attributes(&self, resolution: Resolution, flags: DisplayFlags) -> WindowAttributes {
        let mut attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(resolution.width, resolution.height))
            .with_resizable(flags.contains(DisplayFlags::RESIZABLE))
            .with_decorations(!flags.contains(DisplayFlags::NOFRAME))
            .with_visible(!flags.contains(DisplayFlags::HIDDEN));

        if flags.contains(DisplayFlags::FULLSCREEN) {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        attributes
    }

    fn pump(&mut self, timeout: Duration) -> Result<(), PlatformError> {
        let event_loop = self
            .event_loop
            .as_mut()
            .ok_or_else(|| PlatformError::Unavailable("event loop not initialized".into()))?;

        match event_loop.pump_app_events(Some(timeout), &mut self.app) {
            PumpStatus::Continue => Ok(()),
            PumpStatus::Exit(code) => {
                warn!(target: "platform", "Event loop exited with code {}", code);
                Err(PlatformError::Unavailable(format!("event loop exited ({})", code)))
            }
        }
    }
}

impl DisplayBackend for WinitPlatform {
    type Surface = WinitSurface;

    fn create(
        &mut self,
        resolution: Resolution,
        flags: DisplayFlags,
        depth: Option<u8>,
    ) -> Result<WinitSurface, PlatformError> {
        const MAX_PUMPS: usize = 64;
        const PUMP_TIMEOUT: Duration = Duration::from_millis(5);

        if let Some(depth) = depth {
            debug!(target: "platform", "Color depth {} requested; Winit picks the surface format", depth);
        }

        self.app.create_error = None;
        self.app.pending = Some(self.attributes(resolution, flags));

        for _ in 0..MAX_PUMPS {
            self.pump(PUMP_TIMEOUT)
                .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

            if let Some(reason) = self.app.create_error.take() {
                return Err(PlatformError::WindowCreation(reason));
            }
            if let Some(window) = &self.app.window {
                window.request_redraw();
                return Ok(WinitSurface { window: Arc::clone(window) });
            }
        }

        self.app.pending = None;
        Err(PlatformError::WindowCreation(
            "window was not created before the event loop went idle".into(),
        ))
    }

    fn present(&mut self, surface: &mut WinitSurface) -> Result<(), PlatformError> {
        surface.window.pre_present_notify();
        surface.window.request_redraw();
        Ok(())
    }

    fn teardown(&mut self) {
        if self.app.window.take().is_some() {
            info!(target: "platform", "Window released");
        }
        self.app.pending = None;
        self.app.buffer.clear();
    }
}

impl InputBackend for WinitPlatform {
    fn init(&mut self) -> Result<(), PlatformError> {
        if self.event_loop.is_none() {
            let event_loop = EventLoop::new()
                .map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;
            debug!(target: "platform", "Winit event loop created");
            self.event_loop = Some(event_loop);
        }
        Ok(())
    }

    fn poll_pointer_position(&self) -> (f32, f32) {
        self.app.processor.pointer()
    }

    fn poll_pointer_buttons(&self) -> HashMap<MouseButton, bool> {
        self.app.processor.buttons().clone()
    }

    fn poll_pressed_keys(&self) -> HashSet<KeyCode> {
        self.app.processor.keys().clone()
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        if let Err(e) = self.pump(Duration::ZERO) {
            // The loop is gone; whatever was queued is still delivered and
            // the scene sees a close request.
            warn!(target: "platform::input", "{}", e);
            self.app.buffer.push(InputEvent::CloseRequested);
        }

        let events = self.app.buffer.drain();
        if !events.is_empty() {
            trace!(target: "platform::input", "Drained {} events", events.len());
        }
        events
    }
}
