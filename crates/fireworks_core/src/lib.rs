//! # Fireworks Core
//!
//! The particle simulation behind the scorecard fireworks.
//!
//! ## Design Principles
//!
//! 1. **One tick, one frame** - `SimulationManager::tick` is the only entry point per frame
//! 2. **No drawing** - frames are described as `RenderCommand`s; hosts paint them
//! 3. **No ambient state** - the score arrives through a `ScoreSource`, the loop
//!    state leaves as a `LoopState`
//! 4. **External configuration** - every tuning constant lives in `SimulationConfig`
//!
//! ## Example
//!
//! ```rust
//! use fireworks_core::{FrameBatch, LoopState, NoScores, SimulationConfig, SimulationManager, Viewport};
//!
//! let mut sim = SimulationManager::new(SimulationConfig::default(), Viewport::new(640.0, 360.0))?;
//! sim.on_score_update(10.0, 10.0);
//!
//! let mut batch = FrameBatch::new();
//! assert_eq!(sim.tick(&NoScores, &mut batch), LoopState::Continuous);
//! # Ok::<(), fireworks_core::CoreError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::perf)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod emitter;
pub mod error;
pub mod particle;
pub mod render;
pub mod simulation;

pub use config::{ParticleConfig, SimulationConfig};
pub use emitter::{Emitter, EmitterPhase};
pub use error::{CoreError, CoreResult};
pub use particle::{Particle, ParticleKind};
pub use render::{Canvas, FrameBatch, Hsba, RenderCommand};
pub use simulation::{
    LoopRequest, LoopState, NoScores, ScoreSource, SimulationManager, SimulationStats, Viewport,
};

// Re-export the shared types the API is expressed in
pub use fireworks_shared as shared;
