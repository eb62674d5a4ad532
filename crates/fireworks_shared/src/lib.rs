//! # Fireworks Shared
//!
//! Common types used by the simulation core and by every host.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `web-sys` / `wasm-bindgen`
//! - Any canvas, window or terminal crate
//!
//! If you need drawing types, put them in `fireworks_core::render`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;
pub mod protocol;
pub mod score;

pub use constants::{
    CELEBRATION_THRESHOLD, DEFAULT_GRAVITY, SCORE_MESSAGE_TYPE, SPARK_COUNT, SPAWN_PROBABILITY,
    TICK_RATE,
};
pub use math::Vec2;
pub use protocol::{decode_score_message, ProtocolError, ProtocolResult, ScoreReport};
pub use score::{ScoreState, ScoreTier};
