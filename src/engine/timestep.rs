//=========================================================================
// Fixed Timestep
//=========================================================================
//
// Accumulator that banks real time and pays it out in whole fixed steps.
//
// Architecture:
// ```text
//   accumulate(now)  : unused += now - last_tick
//   consume_step()   : while unused >= step { unused -= step; simulate }
// ```
//
// Time is kept as `Duration` (integer nanoseconds), so repeated
// subtraction never drifts: 25ms banked against a 10ms step pays out two
// steps and leaves exactly 5ms.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::trace;

//=== FixedTimestep =======================================================

/// Fixed-step accumulator.
#[derive(Debug, Clone)]
pub(crate) struct FixedTimestep {
    step: Duration,
    unused: Duration,
    last_tick: Duration,
    max_frame_delta: Option<Duration>,
}

impl FixedTimestep {
    /// `step` must be non-zero; the builder guarantees it.
    pub(crate) fn new(step: Duration, max_frame_delta: Option<Duration>) -> Self {
        debug_assert!(!step.is_zero());
        Self {
            step,
            unused: Duration::ZERO,
            last_tick: Duration::ZERO,
            max_frame_delta,
        }
    }

    /// Starts timing from `now` with nothing banked.
    pub(crate) fn reset(&mut self, now: Duration) {
        self.unused = Duration::ZERO;
        self.last_tick = now;
    }

    /// Banks the time elapsed since the previous call and returns the raw
    /// frame delta.
    pub(crate) fn accumulate(&mut self, now: Duration) -> Duration {
        let frame_delta = now.saturating_sub(self.last_tick);
        self.last_tick = now;

        let banked = match self.max_frame_delta {
            Some(max) if frame_delta > max => {
                trace!("Frame delta {:?} clamped to {:?}", frame_delta, max);
                max
            }
            _ => frame_delta,
        };
        self.unused += banked;
        frame_delta
    }

    /// Returns `true` if a whole step is banked.
    pub(crate) fn step_due(&self) -> bool {
        self.unused >= self.step
    }

    /// Pays out one step. Call only when [`step_due`](Self::step_due).
    pub(crate) fn consume_step(&mut self) {
        self.unused = self.unused.saturating_sub(self.step);
    }

    pub(crate) fn step(&self) -> Duration {
        self.step
    }

    pub(crate) fn unused(&self) -> Duration {
        self.unused
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn drain_steps(timestep: &mut FixedTimestep) -> u32 {
        let mut steps = 0;
        while timestep.step_due() {
            timestep.consume_step();
            steps += 1;
        }
        steps
    }

    #[test]
    fn pays_out_whole_steps_and_keeps_remainder() {
        let mut timestep = FixedTimestep::new(ms(10), None);
        timestep.reset(Duration::ZERO);

        let delta = timestep.accumulate(ms(25));
        assert_eq!(delta, ms(25));
        assert_eq!(drain_steps(&mut timestep), 2);
        assert_eq!(timestep.unused(), ms(5));
    }

    #[test]
    fn remainder_carries_into_next_frame() {
        let mut timestep = FixedTimestep::new(ms(10), None);
        timestep.reset(Duration::ZERO);

        timestep.accumulate(ms(7));
        assert_eq!(drain_steps(&mut timestep), 0);

        timestep.accumulate(ms(14));
        assert_eq!(drain_steps(&mut timestep), 1);
        assert_eq!(timestep.unused(), ms(4));
    }

    #[test]
    fn step_count_matches_total_elapsed() {
        let mut timestep = FixedTimestep::new(ms(16), None);
        timestep.reset(Duration::ZERO);

        let deltas = [3u64, 17, 40, 1, 0, 99, 16, 33];
        let mut now = Duration::ZERO;
        let mut steps = 0;

        for delta in deltas {
            now += ms(delta);
            timestep.accumulate(now);
            steps += drain_steps(&mut timestep);
            assert!(timestep.unused() < timestep.step());
        }

        let total: u64 = deltas.iter().sum();
        assert_eq!(steps as u64, total / 16);
        assert_eq!(timestep.unused(), ms(total % 16));
    }

    #[test]
    fn clamp_limits_banked_time_only() {
        let mut timestep = FixedTimestep::new(ms(10), Some(ms(50)));
        timestep.reset(Duration::ZERO);

        let delta = timestep.accumulate(ms(500));
        assert_eq!(delta, ms(500), "Raw delta is reported unclamped");
        assert_eq!(drain_steps(&mut timestep), 5);
    }

    #[test]
    fn reset_discards_banked_time() {
        let mut timestep = FixedTimestep::new(ms(10), None);
        timestep.reset(Duration::ZERO);
        timestep.accumulate(ms(9));

        timestep.reset(ms(100));
        assert_eq!(timestep.unused(), Duration::ZERO);
        timestep.accumulate(ms(105));
        assert_eq!(timestep.unused(), ms(5));
    }
}
