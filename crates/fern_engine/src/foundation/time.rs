//! Time management utilities

use std::time::Instant;

/// Frame clock driving the scene update loop
///
/// `delta_time` is scaled by `time_scale`; `total_time` accumulates the raw,
/// unscaled time of every unpaused frame.
#[derive(Debug, Clone)]
pub struct Time {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    time_scale: f32,
    paused: bool,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            time_scale: 1.0,
            paused: false,
        }
    }

    /// Update the clock from the monotonic system clock (once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(raw_delta);
    }

    /// Advance the clock by an explicit raw delta in seconds
    ///
    /// While paused the frame is not counted and `delta_time` reads zero.
    pub fn advance(&mut self, raw_delta: f32) {
        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = raw_delta * self.time_scale;
        self.total_time += raw_delta;
        self.frame_count += 1;
    }

    /// Scaled time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total unscaled time since the clock started
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames counted so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Multiplier applied to raw frame deltas
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the multiplier applied to raw frame deltas
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    /// Whether the clock is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop counting frames; `delta_time` reads zero until resumed
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume counting frames
    pub fn resume(&mut self) {
        self.last_frame = Instant::now();
        self.paused = false;
    }

    /// Frames per second derived from the last delta
    pub fn fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }

    /// Run `step` once per whole fixed step contained in `accumulator + delta_time`
    ///
    /// Returns the leftover accumulator to carry into the next frame.
    pub fn step_fixed<F: FnMut(f32)>(&self, accumulator: f32, fixed_step: f32, mut step: F) -> f32 {
        let mut acc = accumulator + self.delta_time;
        if fixed_step <= 0.0 {
            return acc;
        }
        while acc >= fixed_step {
            step(fixed_step);
            acc -= fixed_step;
        }
        acc
    }

    /// Reset to a freshly started clock
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
