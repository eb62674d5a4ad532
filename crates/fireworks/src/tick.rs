//! # Frame Clock
//!
//! Fixed-timestep pacing for hosts without a display refresh to follow.
//! The browser host lets `requestAnimationFrame` pace it; the headless
//! binary uses [`FixedTick`] when asked to run in real time.

use std::time::{Duration, Instant};

use fireworks_shared::TICK_RATE;

/// Fixed-timestep accumulator.
#[derive(Debug)]
pub struct FixedTick {
    /// Budget for a single frame.
    frame_budget: Duration,
    /// When `should_tick` last sampled the clock.
    last_sample: Instant,
    /// Time owed to the simulation.
    owed: Duration,
    /// Frame timing statistics.
    stats: FrameStats,
}

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames measured.
    pub frames: u64,
    /// Fastest frame (microseconds).
    pub min_frame_us: u64,
    /// Slowest frame (microseconds).
    pub max_frame_us: u64,
    /// Exponential moving average, 1/16 weight per frame (microseconds).
    pub avg_frame_us: u64,
    /// Frames that overran the budget.
    pub overruns: u64,
}

impl FrameStats {
    fn empty(budget: Duration) -> Self {
        Self {
            frames: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            avg_frame_us: budget.as_micros() as u64,
            overruns: 0,
        }
    }
}

impl FixedTick {
    /// Creates a clock ticking `rate` times per second.
    ///
    /// A rate of zero is treated as one.
    #[must_use]
    pub fn new(rate: u32) -> Self {
        let frame_budget = Duration::from_micros(1_000_000 / u64::from(rate.max(1)));
        Self {
            frame_budget,
            last_sample: Instant::now(),
            owed: Duration::ZERO,
            stats: FrameStats::empty(frame_budget),
        }
    }

    /// Returns true if at least one frame is due.
    #[must_use]
    pub fn should_tick(&mut self) -> bool {
        let now = Instant::now();
        self.owed += now.duration_since(self.last_sample);
        self.last_sample = now;
        self.owed >= self.frame_budget
    }

    /// Pays for one frame and returns its start time.
    #[must_use]
    pub fn begin_tick(&mut self) -> Instant {
        self.owed = self.owed.saturating_sub(self.frame_budget);
        Instant::now()
    }

    /// Records the duration of a frame started with [`Self::begin_tick`].
    pub fn end_tick(&mut self, started: Instant) {
        let elapsed = started.elapsed();
        let elapsed_us = elapsed.as_micros() as u64;
        let stats = &mut self.stats;

        stats.frames += 1;
        stats.min_frame_us = stats.min_frame_us.min(elapsed_us);
        stats.max_frame_us = stats.max_frame_us.max(elapsed_us);
        stats.avg_frame_us = (stats.avg_frame_us * 15 + elapsed_us) / 16;

        if elapsed > self.frame_budget {
            stats.overruns += 1;
            tracing::warn!(
                "Frame {} took {}us, budget is {}us",
                stats.frames,
                elapsed_us,
                self.frame_budget.as_micros()
            );
        }
    }

    /// Sleeps until the next frame is due.
    pub fn wait_for_next_tick(&self) {
        let due = self.frame_budget.saturating_sub(self.owed);
        let since_sample = self.last_sample.elapsed();
        if due > since_sample {
            std::thread::sleep(due - since_sample);
        }
    }

    /// Budget for a single frame.
    #[must_use]
    pub const fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Frame timing statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }
}

impl Default for FixedTick {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}
