//! # Firework Emitter
//!
//! One firework: a fuse that rises until its apex, then a burst of sparks
//! that fall and fade.
//!
//! ## States
//!
//! - **ASCENDING**: the fuse is alive and rising. The fuse is stored inside
//!   this state, so it cannot be reached once the firework has exploded.
//! - **EXPLODED**: terminal. Sparks are updated until they have all died;
//!   the manager then drops the emitter.
//!
//! The transition fires on the first tick after which the fuse's vertical
//! velocity is no longer negative (it has stopped rising).

use fireworks_shared::Vec2;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::particle::{Particle, ParticleKind};
use crate::render::FrameBatch;

/// Emitter phase.
#[derive(Debug, Clone, PartialEq)]
pub enum EmitterPhase {
    /// Fuse is rising.
    Ascending {
        /// The fuse particle.
        fuse: Particle,
    },
    /// Fuse has burst into sparks.
    Exploded,
}

/// A single firework.
#[derive(Debug, Clone)]
pub struct Emitter {
    /// Launch position.
    origin: Vec2,
    /// Hue shared by the fuse and every spark.
    hue: f32,
    /// Current phase.
    phase: EmitterPhase,
    /// Live sparks, empty until the explosion.
    sparks: Vec<Particle>,
}

impl Emitter {
    /// Launches a firework from `origin` with a random fuse speed.
    #[must_use]
    pub fn launch<R: Rng + ?Sized>(
        origin: Vec2,
        hue: f32,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Self {
        let fuse = Particle::create(origin, hue, ParticleKind::Fuse, &config.particle, rng);
        Self::with_fuse(origin, hue, fuse)
    }

    /// Creates a firework around an existing fuse.
    #[must_use]
    pub const fn with_fuse(origin: Vec2, hue: f32, fuse: Particle) -> Self {
        Self {
            origin,
            hue,
            phase: EmitterPhase::Ascending { fuse },
            sparks: Vec::new(),
        }
    }

    /// Advances the firework by one tick.
    ///
    /// Returns true on the tick the fuse explodes.
    pub fn update<R: Rng + ?Sized>(&mut self, config: &SimulationConfig, rng: &mut R) -> bool {
        let apex = match &mut self.phase {
            EmitterPhase::Ascending { fuse } => {
                fuse.apply_force(config.gravity);
                fuse.advance(&config.particle);
                (fuse.velocity().y >= 0.0).then(|| fuse.position())
            }
            EmitterPhase::Exploded => None,
        };

        if let Some(apex) = apex {
            self.explode(apex, config, rng);
        }

        // Sparks born this tick take their first step right away
        self.sparks.retain_mut(|spark| {
            spark.apply_force(config.gravity);
            spark.advance(&config.particle);
            !spark.is_dead()
        });

        apex.is_some()
    }

    /// Replaces the fuse with `spark_count` sparks at `apex`.
    fn explode<R: Rng + ?Sized>(&mut self, apex: Vec2, config: &SimulationConfig, rng: &mut R) {
        self.phase = EmitterPhase::Exploded;
        self.sparks.reserve(config.spark_count);
        for _ in 0..config.spark_count {
            self.sparks.push(Particle::create(
                apex,
                self.hue,
                ParticleKind::Spark,
                &config.particle,
                rng,
            ));
        }

        tracing::debug!(
            "Firework exploded at ({:.1}, {:.1}) hue {:.0} with {} sparks",
            apex.x,
            apex.y,
            self.hue,
            config.spark_count
        );
    }

    /// Returns true once the firework has exploded and every spark has died.
    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.is_exploded() && self.sparks.is_empty()
    }

    /// Draws the fuse while ascending, otherwise every spark.
    pub fn render(&self, batch: &mut FrameBatch, diameter: f32) {
        match &self.phase {
            EmitterPhase::Ascending { fuse } => fuse.render(batch, diameter),
            EmitterPhase::Exploded => {
                for spark in &self.sparks {
                    spark.render(batch, diameter);
                }
            }
        }
    }

    /// Returns true after the explosion.
    #[inline]
    #[must_use]
    pub fn is_exploded(&self) -> bool {
        matches!(self.phase, EmitterPhase::Exploded)
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &EmitterPhase {
        &self.phase
    }

    /// The fuse, while ascending.
    #[must_use]
    pub fn fuse(&self) -> Option<&Particle> {
        match &self.phase {
            EmitterPhase::Ascending { fuse } => Some(fuse),
            EmitterPhase::Exploded => None,
        }
    }

    /// Live sparks.
    #[must_use]
    pub fn sparks(&self) -> &[Particle] {
        &self.sparks
    }

    /// Particles currently alive in this firework.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        match self.phase {
            EmitterPhase::Ascending { .. } => 1 + self.sparks.len(),
            EmitterPhase::Exploded => self.sparks.len(),
        }
    }

    /// Launch position.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Hue.
    #[must_use]
    pub const fn hue(&self) -> f32 {
        self.hue
    }
}
