//! Simulation configuration.
//!
//! Every field has a default matching the classic look, so an empty TOML
//! file (or no file at all) gives the stock fireworks:
//!
//! ```toml
//! spawn_probability = 0.05
//! spark_count = 100
//! gravity = { x = 0.0, y = 0.2 }
//!
//! [particle]
//! lifespan = 255.0
//! decay = 4.0
//! spark_speed = [2.0, 10.0]
//! ```

use std::path::Path;

use fireworks_shared::constants::{
    CELEBRATION_THRESHOLD, DEFAULT_GRAVITY, FUSE_SPEED, INITIAL_LIFESPAN, LIFESPAN_DECAY,
    PARTICLE_DIAMETER, SPARK_COUNT, SPARK_DRAG, SPARK_SPEED, SPAWN_BAND, SPAWN_PROBABILITY,
    TRAIL_FADE_ALPHA,
};
use fireworks_shared::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Per-particle tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Lifespan every particle starts with (also its alpha, out of 255).
    pub lifespan: f32,
    /// Lifespan lost per tick.
    pub decay: f32,
    /// Velocity multiplier applied to sparks after every step.
    pub spark_drag: f32,
    /// Fuse launch speed range `[min, max]`, upwards.
    pub fuse_speed: [f32; 2],
    /// Spark burst speed range `[min, max]`.
    pub spark_speed: [f32; 2],
    /// Diameter of the disc drawn per particle.
    pub diameter: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            lifespan: INITIAL_LIFESPAN,
            decay: LIFESPAN_DECAY,
            spark_drag: SPARK_DRAG,
            fuse_speed: FUSE_SPEED,
            spark_speed: SPARK_SPEED,
            diameter: PARTICLE_DIAMETER,
        }
    }
}

/// Configuration for the simulation manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Constant force applied to every particle each tick.
    pub gravity: Vec2,
    /// Chance per tick of launching a firework while celebrating.
    pub spawn_probability: f64,
    /// Sparks produced per explosion.
    pub spark_count: usize,
    /// Score ratio that switches celebration mode on.
    pub celebration_threshold: f64,
    /// Horizontal launch band as fractions of the viewport width.
    pub spawn_band: [f32; 2],
    /// Alpha (0-1) of the black fill drawn at the start of every frame.
    pub trail_fade_alpha: f32,
    /// Seed for the spawn/burst RNG. Hosts fill this in when absent.
    pub seed: Option<u64>,
    /// Per-particle tuning.
    pub particle: ParticleConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            spawn_probability: SPAWN_PROBABILITY,
            spark_count: SPARK_COUNT,
            celebration_threshold: CELEBRATION_THRESHOLD,
            spawn_band: SPAWN_BAND,
            trail_fade_alpha: TRAIL_FADE_ALPHA,
            seed: None,
            particle: ParticleConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or fails validation.
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks that every value keeps the simulation well-formed.
    ///
    /// Gravity must pull down, otherwise a fuse never reaches its apex and
    /// its emitter is never retired. Decay must be positive, otherwise sparks
    /// never die.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return invalid(format!(
                "spawn_probability must be within [0, 1], got {}",
                self.spawn_probability
            ));
        }
        if !(self.celebration_threshold.is_finite() && self.celebration_threshold > 0.0) {
            return invalid(format!(
                "celebration_threshold must be positive, got {}",
                self.celebration_threshold
            ));
        }
        if !(self.gravity.y.is_finite() && self.gravity.y > 0.0 && self.gravity.x.is_finite()) {
            return invalid(format!(
                "gravity must be finite and point down (y > 0), got ({}, {})",
                self.gravity.x, self.gravity.y
            ));
        }
        let [lo, hi] = self.spawn_band;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return invalid(format!("spawn_band must be ordered within [0, 1], got [{lo}, {hi}]"));
        }
        if !(0.0..=1.0).contains(&self.trail_fade_alpha) {
            return invalid(format!(
                "trail_fade_alpha must be within [0, 1], got {}",
                self.trail_fade_alpha
            ));
        }
        self.particle.validate()
    }
}

impl ParticleConfig {
    fn validate(&self) -> CoreResult<()> {
        if !(self.lifespan.is_finite() && self.lifespan >= 0.0) {
            return invalid(format!("particle.lifespan must be >= 0, got {}", self.lifespan));
        }
        if !(self.decay.is_finite() && self.decay > 0.0) {
            return invalid(format!("particle.decay must be > 0, got {}", self.decay));
        }
        if !(self.spark_drag > 0.0 && self.spark_drag <= 1.0) {
            return invalid(format!(
                "particle.spark_drag must be within (0, 1], got {}",
                self.spark_drag
            ));
        }
        check_range("particle.fuse_speed", self.fuse_speed)?;
        check_range("particle.spark_speed", self.spark_speed)?;
        if !(self.diameter.is_finite() && self.diameter > 0.0) {
            return invalid(format!("particle.diameter must be > 0, got {}", self.diameter));
        }
        Ok(())
    }
}

fn check_range(name: &str, [min, max]: [f32; 2]) -> CoreResult<()> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        invalid(format!("{name} must be an ordered non-negative range, got [{min}, {max}]"))
    }
}

fn invalid(reason: String) -> CoreResult<()> {
    Err(CoreError::InvalidConfig(reason))
}
