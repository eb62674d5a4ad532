//! Point-mass particles.
//!
//! Two variants share one representation:
//! - **Fuse**: shot straight up, undamped, slows under gravity until its apex.
//! - **Spark**: burst outwards in a random direction, loses 5% speed per tick.
//!
//! Integration is explicit Euler with a unit time step:
//!
//! ```text
//! velocity += acceleration
//! position += velocity
//! acceleration = 0
//! lifespan -= decay
//! velocity *= drag        (sparks only)
//! ```

use std::f32::consts::TAU;

use fireworks_shared::Vec2;
use rand::Rng;

use crate::config::ParticleConfig;
use crate::render::{FrameBatch, Hsba};

/// Particle variant. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Rising particle before the explosion.
    Fuse,
    /// Post-explosion particle.
    Spark,
}

/// A single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position (y grows downwards).
    position: Vec2,
    /// Velocity per tick.
    velocity: Vec2,
    /// Force accumulated since the last step.
    acceleration: Vec2,
    /// Hue in degrees, constant for the particle's life.
    hue: f32,
    /// Remaining life, also the alpha out of 255.
    lifespan: f32,
    /// Fuse or spark.
    kind: ParticleKind,
}

impl Particle {
    /// Creates a particle with a randomly drawn launch velocity.
    ///
    /// Fuses get `(0, -U)` with `U` drawn from `tuning.fuse_speed`; sparks
    /// get a random direction scaled by a speed drawn from
    /// `tuning.spark_speed`.
    #[must_use]
    pub fn create<R: Rng + ?Sized>(
        position: Vec2,
        hue: f32,
        kind: ParticleKind,
        tuning: &ParticleConfig,
        rng: &mut R,
    ) -> Self {
        let velocity = match kind {
            ParticleKind::Fuse => {
                let [min, max] = tuning.fuse_speed;
                Vec2::new(0.0, -rng.gen_range(min..=max))
            }
            ParticleKind::Spark => {
                let [min, max] = tuning.spark_speed;
                Vec2::from_angle(rng.gen_range(0.0..TAU)) * rng.gen_range(min..=max)
            }
        };
        Self::with_velocity(position, velocity, hue, kind, tuning.lifespan)
    }

    /// Creates a particle with an explicit velocity.
    #[must_use]
    pub const fn with_velocity(
        position: Vec2,
        velocity: Vec2,
        hue: f32,
        kind: ParticleKind,
        lifespan: f32,
    ) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            hue,
            lifespan,
            kind,
        }
    }

    /// Accumulates a force, consumed by the next [`Particle::advance`].
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Integrates one tick.
    pub fn advance(&mut self, tuning: &ParticleConfig) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
        self.lifespan -= tuning.decay;

        if self.kind == ParticleKind::Spark {
            self.velocity *= tuning.spark_drag;
        }
    }

    /// Is this particle dead?
    #[inline]
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.lifespan < 0.0
    }

    /// Alpha out of 255: the lifespan clamped to `[0, 255]`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.lifespan.clamp(0.0, 255.0)
    }

    /// Draws the particle as a filled disc.
    pub fn render(&self, batch: &mut FrameBatch, diameter: f32) {
        batch.disc(
            self.position,
            diameter,
            Hsba::vivid(self.hue, self.alpha() / 255.0),
        );
    }

    /// Position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Pending acceleration.
    #[must_use]
    pub const fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Hue in degrees.
    #[must_use]
    pub const fn hue(&self) -> f32 {
        self.hue
    }

    /// Remaining lifespan.
    #[must_use]
    pub const fn lifespan(&self) -> f32 {
        self.lifespan
    }

    /// Fuse or spark.
    #[must_use]
    pub const fn kind(&self) -> ParticleKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderCommand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tuning() -> ParticleConfig {
        ParticleConfig::default()
    }

    #[test]
    fn test_fuse_launch_velocity() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            let p = Particle::create(Vec2::new(50.0, 100.0), 30.0, ParticleKind::Fuse, &tuning(), &mut rng);
            assert_eq!(p.velocity().x, 0.0);
            assert!((-15.0..=-10.0).contains(&p.velocity().y), "{:?}", p.velocity());
            assert_eq!(p.lifespan(), 255.0);
            assert_eq!(p.acceleration(), Vec2::ZERO);
        }
    }

    #[test]
    fn test_spark_launch_speed() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..500 {
            let p = Particle::create(Vec2::ZERO, 200.0, ParticleKind::Spark, &tuning(), &mut rng);
            let speed = p.velocity().length();
            assert!((2.0 - 1e-4..=10.0 + 1e-4).contains(&speed), "speed {speed}");
            assert_eq!(p.hue(), 200.0);
        }
    }

    #[test]
    fn test_apply_force_is_deferred() {
        let mut p = Particle::with_velocity(Vec2::ZERO, Vec2::ZERO, 0.0, ParticleKind::Fuse, 255.0);
        p.apply_force(Vec2::new(0.0, 0.2));
        p.apply_force(Vec2::new(0.0, 0.2));
        assert_eq!(p.position(), Vec2::ZERO);
        assert_eq!(p.velocity(), Vec2::ZERO);

        p.advance(&tuning());
        assert!((p.velocity().y - 0.4).abs() < 1e-6);
        assert!((p.position().y - 0.4).abs() < 1e-6);
        assert_eq!(p.acceleration(), Vec2::ZERO);
    }

    #[test]
    fn test_fuse_is_not_damped() {
        let mut p = Particle::with_velocity(Vec2::ZERO, Vec2::new(0.0, -12.0), 0.0, ParticleKind::Fuse, 255.0);
        p.advance(&tuning());
        assert_eq!(p.velocity(), Vec2::new(0.0, -12.0));
        assert_eq!(p.position(), Vec2::new(0.0, -12.0));
    }

    #[test]
    fn test_spark_drag_after_move() {
        let mut p = Particle::with_velocity(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.0, ParticleKind::Spark, 255.0);
        p.advance(&tuning());
        // Moves with the undamped velocity, then slows down
        assert_eq!(p.position(), Vec2::new(10.0, 0.0));
        assert!((p.velocity().x - 9.5).abs() < 1e-6);
    }

    #[test]
    fn test_spark_speed_non_increasing() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut p = Particle::create(Vec2::ZERO, 0.0, ParticleKind::Spark, &tuning(), &mut rng);
        let mut last = p.velocity().length();
        while !p.is_dead() {
            p.advance(&tuning());
            let speed = p.velocity().length();
            assert!(speed <= last);
            last = speed;
        }
    }

    #[test]
    fn test_lifespan_decays_monotonically() {
        let mut p = Particle::with_velocity(Vec2::ZERO, Vec2::ZERO, 0.0, ParticleKind::Spark, 255.0);
        let mut ticks = 0;
        while !p.is_dead() {
            let before = p.lifespan();
            p.advance(&tuning());
            assert_eq!(p.lifespan(), before - 4.0);
            ticks += 1;
        }
        // 255 - 4 * 64 = -1
        assert_eq!(ticks, 64);

        // No resurrection
        for _ in 0..10 {
            p.advance(&tuning());
            assert!(p.is_dead());
        }
    }

    #[test]
    fn test_alpha_clamped() {
        let p = Particle::with_velocity(Vec2::ZERO, Vec2::ZERO, 0.0, ParticleKind::Spark, -3.0);
        assert_eq!(p.alpha(), 0.0);
        let p = Particle::with_velocity(Vec2::ZERO, Vec2::ZERO, 0.0, ParticleKind::Spark, 400.0);
        assert_eq!(p.alpha(), 255.0);
    }

    #[test]
    fn test_render_disc() {
        let p = Particle::with_velocity(Vec2::new(3.0, 4.0), Vec2::ZERO, 90.0, ParticleKind::Spark, 255.0);
        let mut batch = FrameBatch::new();
        p.render(&mut batch, 4.0);

        assert_eq!(
            batch.commands(),
            &[RenderCommand::Disc {
                center: Vec2::new(3.0, 4.0),
                diameter: 4.0,
                color: Hsba::vivid(90.0, 1.0),
            }]
        );
    }
}
