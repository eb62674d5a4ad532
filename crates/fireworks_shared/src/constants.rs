//! # Simulation Constants
//!
//! Default tuning for the fireworks. Every value here is only a default:
//! `fireworks_core::SimulationConfig` can override all of them at startup.

use crate::math::Vec2;

// =============================================================================
// PROTOCOL
// =============================================================================

/// `type` field value of the only inbound message that affects state.
pub const SCORE_MESSAGE_TYPE: &str = "H5P_SCORE_RESULT";

/// Score ratio at or above which celebration mode is active.
///
/// Slightly below 1.0 so a perfect score survives float rounding.
pub const CELEBRATION_THRESHOLD: f64 = 0.999;

// =============================================================================
// FRAME CLOCK
// =============================================================================

/// Tick rate (simulation steps per second).
pub const TICK_RATE: u32 = 60;

// =============================================================================
// PHYSICS (unit distance per tick, y grows downwards)
// =============================================================================

/// Constant gravity applied to every particle each tick.
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 0.2);

/// Lifespan every particle starts with. Doubles as its alpha.
pub const INITIAL_LIFESPAN: f32 = 255.0;

/// Lifespan lost per tick.
pub const LIFESPAN_DECAY: f32 = 4.0;

/// Velocity multiplier applied to sparks after every step.
pub const SPARK_DRAG: f32 = 0.95;

/// Fuse launch speed range (upwards).
pub const FUSE_SPEED: [f32; 2] = [10.0, 15.0];

/// Spark burst speed range.
pub const SPARK_SPEED: [f32; 2] = [2.0, 10.0];

/// Diameter of the disc drawn for each particle.
pub const PARTICLE_DIAMETER: f32 = 4.0;

// =============================================================================
// SPAWNING
// =============================================================================

/// Chance per tick that a new firework is launched while celebrating.
pub const SPAWN_PROBABILITY: f64 = 0.05;

/// Sparks produced by a single explosion.
pub const SPARK_COUNT: usize = 100;

/// Horizontal launch band, as fractions of the viewport width.
pub const SPAWN_BAND: [f32; 2] = [0.25, 0.75];

/// Alpha of the black fill drawn at the start of every frame (leaves trails).
pub const TRAIL_FADE_ALPHA: f32 = 0.1;
