//! Logical animation clock.
//!
//! Converts per-frame callbacks into one monotonically advancing time scalar.
//! The accumulator is kept in `f64`; modulators reduce it into their own
//! period with [`Clock::phase`] before dropping to `f32`, so long sessions
//! do not lose precision in the trigonometric inputs.

/// Logical time source driven by the host's frame callback.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    time: f64,
    paused: bool,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds scaled by `speed`. Returns the new time.
    ///
    /// Paused clocks and non-finite or negative steps leave time unchanged.
    pub fn advance(&mut self, dt: f64, speed: f64) -> f64 {
        if self.paused {
            return self.time;
        }
        let step = dt * speed;
        if step.is_finite() && step > 0.0 {
            self.time += step;
        }
        self.time
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip the paused flag and return the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `(time * rate) mod period`, reduced in `f64` and returned as `f32`.
    pub fn phase(&self, rate: f64, period: f64) -> f32 {
        reduce_phase(self.time, rate, period)
    }
}

/// Reduce `time * rate` into `[0, period)`.
pub fn reduce_phase(time: f64, rate: f64, period: f64) -> f32 {
    let scaled = time * rate;
    if !scaled.is_finite() || period <= 0.0 {
        return 0.0;
    }
    let reduced = scaled.rem_euclid(period);
    // rem_euclid may round up to `period` itself for tiny negative inputs
    if reduced >= period {
        0.0
    } else {
        reduced as f32
    }
}
