//! Fixed-timestep simulation clock.
//!
//! Rendering runs at whatever rate the platform delivers frames; the
//! simulation advances in constant-size increments. [`FixedTimestep`]
//! accumulates real elapsed time and hands out whole simulation steps,
//! carrying the remainder forward to the next frame.
//!
//! ```text
//! frame dt ──▶ accumulator ──▶ floor(accumulator / step) sim steps
//!                       └────▶ accumulator mod step carried over
//! ```
//!
//! There is no upper bound on catch-up: a very long frame produces as many
//! steps as fit in it, which keeps the simulation deterministic but means a
//! multi-second stall replays every missed tick at once.

/// Default simulation step: 60 ticks per second.
pub const DEFAULT_STEP: f32 = 1.0 / 60.0;

/// Accumulator that converts variable frame time into fixed simulation steps.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create a clock with the default 1/60 s step.
    pub fn new() -> Self {
        Self::with_step(DEFAULT_STEP)
    }

    /// Create a clock with a custom step size, in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not strictly positive.
    pub fn with_step(step: f32) -> Self {
        assert!(step > 0.0, "timestep must be positive, got {step}");
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// The fixed step size in seconds.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time currently buffered but not yet large enough for a whole step.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Feed `elapsed` seconds of real time and return the number of whole
    /// simulation steps to run. Negative input is treated as zero.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);
        let steps = (self.accumulator / self.step).floor();
        self.accumulator -= steps * self.step;
        steps as u32
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn short_frame_buffers_without_stepping() {
        let mut clock = FixedTimestep::with_step(0.1);
        assert_eq!(clock.advance(0.04), 0);
        assert_relative_eq!(clock.accumulator(), 0.04);
    }

    #[test]
    fn long_frame_yields_multiple_steps() {
        let mut clock = FixedTimestep::with_step(0.1);
        assert_eq!(clock.advance(0.35), 3);
        assert_relative_eq!(clock.accumulator(), 0.05, epsilon = 1e-5);
    }

    #[test]
    fn remainder_carries_across_frames() {
        let mut clock = FixedTimestep::with_step(0.1);
        assert_eq!(clock.advance(0.07), 0);
        assert_eq!(clock.advance(0.07), 1);
        assert_relative_eq!(clock.accumulator(), 0.04, epsilon = 1e-5);
    }

    #[test]
    fn floor_mod_property_holds() {
        // steps == floor((acc + T) / S) and new acc == (acc + T) mod S.
        let step = 1.0 / 60.0;
        let mut clock = FixedTimestep::with_step(step);
        let mut expected_acc = 0.0f32;
        for &elapsed in &[0.011, 0.02, 0.0, 0.3, 0.0166, 0.005, 1.23] {
            let total = expected_acc + elapsed;
            let expected_steps = (total / step).floor();
            expected_acc = total - expected_steps * step;

            let steps = clock.advance(elapsed);
            assert_eq!(steps, expected_steps as u32);
            assert_relative_eq!(clock.accumulator(), expected_acc, epsilon = 1e-4);
        }
    }

    #[test]
    fn negative_elapsed_is_ignored() {
        let mut clock = FixedTimestep::with_step(0.1);
        clock.advance(0.05);
        assert_eq!(clock.advance(-1.0), 0);
        assert_relative_eq!(clock.accumulator(), 0.05);
    }

    #[test]
    #[should_panic]
    fn zero_step_rejected() {
        let _ = FixedTimestep::with_step(0.0);
    }
}
