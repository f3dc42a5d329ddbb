//! Simulation time, accumulated from the per-frame `dt`.
//!
//! Every timer in the core reads this clock rather than the wall clock, so
//! a run driven by the same inputs and seed replays identically.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimClock {
    now: f64,
    frame: u64,
}

impl SimClock {
    pub fn new() -> Self {
        SimClock::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += f64::from(dt.max(0.0));
        self.frame += 1;
    }

    /// Seconds since the session started.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
