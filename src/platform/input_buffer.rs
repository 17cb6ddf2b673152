//=========================================================================
// Input Buffer
//
// Queues normalized input events between two drains of the engine loop.
//
// Responsibilities:
// - Store incoming platform events in arrival order
// - Coalesce runs of pointer motion (last position wins)
// - Hand the whole queue over via `drain()`
//
// Notes:
// Motion is only merged with an immediately preceding motion event, so a
// click between two moves keeps its position in the sequence.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocated so a typical step's worth of input never reallocates.
    //
    pub(crate) fn new() -> Self {
        const EVENTS_BASE: usize = 128;

        Self {
            events: Vec::with_capacity(EVENTS_BASE),
        }
    }

    //--- push() -----------------------------------------------------------
    //
    // Appends an event. Consecutive `MouseMoved` events collapse into the
    // most recent one.
    //
    pub(crate) fn push(&mut self, event: InputEvent) {
        if event.is_pointer_motion() {
            if let Some(last) = self.events.last_mut() {
                if last.is_pointer_motion() {
                    *last = event;
                    return;
                }
            }
        }
        self.events.push(event);
    }

    //--- drain() ----------------------------------------------------------
    //
    // Returns every queued event, oldest first, and leaves the buffer
    // empty with its capacity intact.
    //
    pub(crate) fn drain(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }

    //--- Utilities --------------------------------------------------------
    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
