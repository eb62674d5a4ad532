//! # Fireworks
//!
//! Score-driven fireworks over a scorecard.
//!
//! A quiz posts `{ "type": "H5P_SCORE_RESULT", "score": s, "maxScore": m }`.
//! A perfect score starts a continuous fireworks animation; any other score
//! draws the scorecard once and stops.
//!
//! ## Layout
//!
//! - [`driver`] - reacts to score messages and host frames
//! - [`inbox`] - latest-score slot shared with the listener
//! - [`scorecard`] - headline, score line and star
//! - [`tick`] - fixed-timestep clock for hosts without vsync
//! - [`settings`] - TOML host configuration
//! - `web` - browser host (wasm32 only)
//!
//! The `fireworks-headless` binary runs the same driver from stdin.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod driver;
pub mod error;
pub mod inbox;
pub mod scorecard;
pub mod settings;
pub mod tick;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::{AnimationDriver, FrameLoopControl};
pub use error::{HostError, HostResult};
pub use inbox::ScoreInbox;
pub use scorecard::{Scorecard, ScorecardText};
pub use settings::HostConfig;
pub use tick::{FixedTick, FrameStats};
