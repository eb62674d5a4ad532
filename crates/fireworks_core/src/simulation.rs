//! # Simulation Manager
//!
//! Owns every live firework and runs one frame per [`SimulationManager::tick`]:
//!
//! ```text
//! Frame N:
//! ┌────────────────────────────────────────────────────────────────┐
//! │ 1. POLL SCORE        read the latest score report, if any     │
//! │ 2. FADE              translucent black fill (trails)          │
//! │ 3. SPAWN / CLEAR     celebrating: maybe launch a firework     │
//! │                      otherwise: drop every firework at once   │
//! │ 4. UPDATE + RENDER   each firework in launch order, retire    │
//! │                      the ones whose sparks have all died      │
//! │ 5. REPORT            Continuous while celebrating, else Paused│
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Score reports are written by a message listener and read here once at the
//! top of every tick, never cached across a decision.

use fireworks_shared::{ScoreReport, ScoreState, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SimulationConfig;
use crate::emitter::Emitter;
use crate::error::CoreResult;
use crate::render::{FrameBatch, Hsba, RenderCommand};

/// Seed used when neither the config nor the host provides one.
pub const DEFAULT_SEED: u64 = 0x5EED_F12E;

/// Provider of the latest score, polled at the start of every tick.
pub trait ScoreSource {
    /// Takes the newest unread report, if one arrived since the last poll.
    fn poll(&self) -> Option<ScoreReport>;
}

impl<T: ScoreSource + ?Sized> ScoreSource for &T {
    fn poll(&self) -> Option<ScoreReport> {
        (**self).poll()
    }
}

/// A source that never reports anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScores;

impl ScoreSource for NoScores {
    fn poll(&self) -> Option<ScoreReport> {
        None
    }
}

/// What the frame loop should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Keep requesting frames.
    Continuous,
    /// Stop after this frame.
    Paused,
}

/// What the frame loop should do right after a score arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopRequest {
    /// (Re)start continuous ticking.
    StartContinuous,
    /// Draw a single frame to show the new score.
    RedrawOnce,
}

impl LoopRequest {
    /// Request matching a score.
    #[must_use]
    pub fn for_score(score: &ScoreState, threshold: f64) -> Self {
        if score.is_celebration(threshold) {
            Self::StartContinuous
        } else {
            Self::RedrawOnce
        }
    }
}

/// Size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Statistics for the last tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Ticks run so far.
    pub frame: u64,
    /// Fireworks launched this tick.
    pub spawned_this_frame: u32,
    /// Fireworks that exploded this tick.
    pub explosions_this_frame: u32,
    /// Fireworks retired this tick after their sparks died.
    pub retired_this_frame: u32,
    /// Fireworks dropped this tick because celebration ended.
    pub cleared_this_frame: u32,
    /// Fireworks alive after this tick.
    pub active_emitters: u32,
    /// Particles alive after this tick.
    pub live_particles: u32,
    /// Fireworks launched since creation.
    pub total_spawned: u64,
}

/// Owner of all fireworks.
pub struct SimulationManager {
    /// Configuration.
    config: SimulationConfig,
    /// Live fireworks, in launch order.
    emitters: Vec<Emitter>,
    /// Drawing surface size.
    viewport: Viewport,
    /// Latest score.
    score: ScoreState,
    /// Derived from `score` on every update.
    celebration_active: bool,
    /// Spawn and burst randomness.
    rng: ChaCha8Rng,
    /// Statistics for the last tick.
    stats: SimulationStats,
}

impl SimulationManager {
    /// Creates a manager with no score and no fireworks.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: SimulationConfig, viewport: Viewport) -> CoreResult<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));

        Ok(Self {
            config,
            emitters: Vec::new(),
            viewport,
            score: ScoreState::default(),
            celebration_active: false,
            rng,
            stats: SimulationStats::default(),
        })
    }

    /// Stores a new score and recomputes celebration mode.
    ///
    /// Returns how the frame loop should react. Non-finite values are
    /// ignored and the current score is kept.
    pub fn on_score_update(&mut self, score: f64, max_score: f64) -> LoopRequest {
        if !(score.is_finite() && max_score.is_finite()) {
            tracing::debug!("Ignoring non-finite score {}/{}", score, max_score);
            return LoopRequest::for_score(&self.score, self.config.celebration_threshold);
        }

        self.score = ScoreState::new(score, max_score);
        let was_active = self.celebration_active;
        self.celebration_active = self.score.is_celebration(self.config.celebration_threshold);

        if self.celebration_active != was_active {
            tracing::info!(
                "Celebration {} at {:.1}%",
                if self.celebration_active { "started" } else { "ended" },
                self.score.percentage()
            );
        }

        LoopRequest::for_score(&self.score, self.config.celebration_threshold)
    }

    /// Runs one frame, appending its draw commands to `batch`.
    pub fn tick(&mut self, source: &(impl ScoreSource + ?Sized), batch: &mut FrameBatch) -> LoopState {
        if let Some(report) = source.poll() {
            self.on_score_update(report.score, report.max_score);
        }

        let total_spawned = self.stats.total_spawned;
        self.stats = SimulationStats {
            frame: self.stats.frame + 1,
            total_spawned,
            ..SimulationStats::default()
        };

        batch.push(RenderCommand::Fade {
            color: Hsba::BLACK.with_alpha(self.config.trail_fade_alpha),
        });

        let state = if self.celebration_active {
            if self.rng.gen_bool(self.config.spawn_probability) {
                self.spawn();
            }
            LoopState::Continuous
        } else {
            if !self.emitters.is_empty() {
                tracing::debug!("Clearing {} fireworks, celebration is over", self.emitters.len());
                self.stats.cleared_this_frame = self.emitters.len() as u32;
            }
            self.emitters.clear();
            LoopState::Paused
        };

        let Self {
            config,
            emitters,
            rng,
            stats,
            ..
        } = self;
        let diameter = config.particle.diameter;
        emitters.retain_mut(|emitter| {
            if emitter.update(config, rng) {
                stats.explosions_this_frame += 1;
            }
            emitter.render(batch, diameter);

            let done = emitter.is_done();
            if done {
                stats.retired_this_frame += 1;
            }
            !done
        });

        self.stats.active_emitters = self.emitters.len() as u32;
        self.stats.live_particles = self.live_particles() as u32;

        tracing::trace!(
            "Tick {}: {} fireworks, {} particles",
            self.stats.frame,
            self.stats.active_emitters,
            self.stats.live_particles
        );

        state
    }

    /// Launches a firework from the bottom edge, inside the spawn band.
    fn spawn(&mut self) {
        let [lo, hi] = self.config.spawn_band;
        let x = self
            .rng
            .gen_range(self.viewport.width * lo..=self.viewport.width * hi);
        let hue = self.rng.gen_range(0.0..360.0);
        let origin = Vec2::new(x, self.viewport.height);

        self.emitters
            .push(Emitter::launch(origin, hue, &self.config, &mut self.rng));
        self.stats.spawned_this_frame += 1;
        self.stats.total_spawned += 1;

        tracing::debug!("Launched firework at x={:.1} hue {:.0}", x, hue);
    }

    /// Resizes the drawing surface. Live fireworks keep their positions.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Reseeds the spawn/burst RNG.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Returns true while the score meets the celebration threshold.
    #[inline]
    #[must_use]
    pub const fn celebration_active(&self) -> bool {
        self.celebration_active
    }

    /// Score as a percentage, 0 when no score is known.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.score.percentage()
    }

    /// Latest score.
    #[must_use]
    pub const fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Live fireworks, in launch order.
    #[must_use]
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    /// Particles alive across every firework.
    #[must_use]
    pub fn live_particles(&self) -> usize {
        self.emitters.iter().map(Emitter::particle_count).sum()
    }

    /// Statistics for the last tick.
    #[must_use]
    pub const fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Drawing surface size.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
