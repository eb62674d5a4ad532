//! # Animation Driver
//!
//! Glue between the score listener, the simulation and a host's frame loop.
//!
//! ```text
//! message ──► on_message ──► ScoreInbox ──► tick() ──► FrameBatch ──► Canvas
//!                 │                           │
//!                 ▼                           ▼
//!         start loop / redraw          Paused: stop loop
//! ```
//!
//! The driver never schedules anything itself. Hosts implement
//! [`FrameLoopControl`] and call [`AnimationDriver::frame`] whenever their
//! loop fires.

use fireworks_core::{
    FrameBatch, LoopRequest, LoopState, SimulationConfig, SimulationManager, Viewport,
};
use fireworks_shared::{decode_score_message, ScoreReport, ScoreState};

use crate::error::HostResult;
use crate::inbox::ScoreInbox;
use crate::scorecard::{Scorecard, ScorecardText};

/// Frame loop operations a host provides.
pub trait FrameLoopControl {
    /// Starts (or keeps) requesting a frame every display refresh.
    fn start_continuous_loop(&mut self);

    /// Requests exactly one more frame.
    fn request_single_redraw(&mut self);

    /// Stops requesting frames after the current one.
    fn stop_continuous_loop(&mut self);
}

/// Drives the simulation from score messages and host frames.
pub struct AnimationDriver<C: FrameLoopControl> {
    simulation: SimulationManager,
    inbox: ScoreInbox,
    scorecard: Scorecard,
    control: C,
    batch: FrameBatch,
    looping: bool,
    frames: u64,
}

impl<C: FrameLoopControl> AnimationDriver<C> {
    /// Creates a driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulation configuration is invalid.
    pub fn new(
        config: SimulationConfig,
        text: ScorecardText,
        viewport: Viewport,
        control: C,
    ) -> HostResult<Self> {
        Ok(Self {
            simulation: SimulationManager::new(config, viewport)?,
            inbox: ScoreInbox::new(),
            scorecard: Scorecard::new(text),
            control,
            batch: FrameBatch::new(),
            looping: false,
            frames: 0,
        })
    }

    /// Handles a raw inbound message.
    ///
    /// Returns true if it was a valid score report.
    pub fn on_message(&mut self, raw: &str) -> bool {
        match decode_score_message(raw) {
            Ok(report) => self.on_report(report),
            Err(err) => {
                tracing::debug!("Ignoring message: {}", err);
                false
            }
        }
    }

    /// Handles a decoded score report.
    ///
    /// Reports with a non-finite value are dropped without a redraw.
    /// Returns true if the report was accepted.
    pub fn on_report(&mut self, report: ScoreReport) -> bool {
        if !(report.score.is_finite() && report.max_score.is_finite()) {
            tracing::debug!(
                "Ignoring non-finite score {}/{}",
                report.score,
                report.max_score
            );
            return false;
        }

        let score = ScoreState::from(report);
        tracing::info!("score received: {}/{}", score.score, score.max_score);

        self.scorecard.record(&score);
        self.inbox.post(report);

        let threshold = self.simulation.config().celebration_threshold;
        match LoopRequest::for_score(&score, threshold) {
            LoopRequest::StartContinuous => {
                self.looping = true;
                self.control.start_continuous_loop();
            }
            LoopRequest::RedrawOnce => self.control.request_single_redraw(),
        }
        true
    }

    /// Runs one frame and returns its draw commands.
    pub fn frame(&mut self) -> &FrameBatch {
        self.batch.clear();
        let state = self.simulation.tick(&self.inbox, &mut self.batch);
        self.scorecard
            .render(self.simulation.score(), self.simulation.viewport(), &mut self.batch);
        self.frames += 1;

        if state == LoopState::Paused && self.looping {
            self.looping = false;
            self.control.stop_continuous_loop();
        }

        &self.batch
    }

    /// Resizes the drawing surface.
    pub fn resize(&mut self, viewport: Viewport) {
        tracing::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.simulation.set_viewport(viewport);
    }

    /// Returns true while the continuous loop is running.
    #[must_use]
    pub const fn is_looping(&self) -> bool {
        self.looping
    }

    /// Frames run so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw commands of the last frame.
    #[must_use]
    pub const fn batch(&self) -> &FrameBatch {
        &self.batch
    }

    /// The simulation.
    #[must_use]
    pub const fn simulation(&self) -> &SimulationManager {
        &self.simulation
    }

    /// Mutable access to the simulation.
    pub fn simulation_mut(&mut self) -> &mut SimulationManager {
        &mut self.simulation
    }

    /// The scorecard.
    #[must_use]
    pub const fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    /// The host's loop control.
    #[must_use]
    pub const fn control(&self) -> &C {
        &self.control
    }

    /// Mutable access to the host's loop control.
    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Start,
        Redraw,
        Stop,
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl FrameLoopControl for Recorder {
        fn start_continuous_loop(&mut self) {
            self.0.push(Call::Start);
        }
        fn request_single_redraw(&mut self) {
            self.0.push(Call::Redraw);
        }
        fn stop_continuous_loop(&mut self) {
            self.0.push(Call::Stop);
        }
    }

    fn driver() -> AnimationDriver<Recorder> {
        AnimationDriver::new(
            SimulationConfig::default(),
            ScorecardText::default(),
            Viewport::new(640.0, 360.0),
            Recorder::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_perfect_score_starts_loop() {
        let mut driver = driver();
        assert!(driver.on_message(r#"{"type":"H5P_SCORE_RESULT","score":10,"maxScore":10}"#));
        assert_eq!(driver.control().0, vec![Call::Start]);
        assert!(driver.is_looping());

        driver.frame();
        assert!(driver.simulation().celebration_active());
        assert!(driver.is_looping());
    }

    #[test]
    fn test_partial_score_redraws_once() {
        let mut driver = driver();
        assert!(driver.on_message(r#"{"type":"H5P_SCORE_RESULT","score":99,"maxScore":100}"#));
        assert_eq!(driver.control().0, vec![Call::Redraw]);

        driver.frame();
        assert!(!driver.simulation().celebration_active());
        assert_eq!(driver.control().0, vec![Call::Redraw]);
    }

    #[test]
    fn test_rejected_message_has_no_effect() {
        let mut driver = driver();
        assert!(!driver.on_message("not json"));
        assert!(!driver.on_message(r#"{"type":"OTHER","score":1,"maxScore":1}"#));
        assert!(driver.control().0.is_empty());
        assert_eq!(driver.scorecard().last_received(), "");
    }

    #[test]
    fn test_non_finite_report_is_dropped() {
        let mut driver = driver();
        driver.on_report(ScoreReport::new(7.0, 10.0));

        let cases = [
            (f64::NAN, 10.0),
            (f64::INFINITY, 10.0),
            (f64::NEG_INFINITY, 10.0),
            (10.0, f64::NAN),
            (f64::INFINITY, f64::INFINITY),
        ];
        for (score, max_score) in cases {
            assert!(!driver.on_report(ScoreReport::new(score, max_score)));
        }
        assert_eq!(driver.control().0, vec![Call::Redraw]);
        assert_eq!(driver.scorecard().last_received(), "Final score: 7/10");

        let batch = driver.frame();
        for command in batch.commands() {
            if let fireworks_core::RenderCommand::Text { text, .. } = command {
                assert!(!text.contains("NaN") && !text.contains("inf"), "{text}");
            }
        }
        assert!((driver.simulation().percentage() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_celebration_end_stops_loop() {
        let mut driver = driver();
        driver.on_report(ScoreReport::new(5.0, 5.0));
        for _ in 0..10 {
            driver.frame();
        }

        driver.on_report(ScoreReport::new(1.0, 5.0));
        driver.frame();

        assert_eq!(driver.control().0, vec![Call::Start, Call::Redraw, Call::Stop]);
        assert!(!driver.is_looping());
        assert!(driver.simulation().emitters().is_empty());
    }

    #[test]
    fn test_frame_ends_with_scorecard() {
        let mut driver = driver();
        driver.on_report(ScoreReport::new(3.0, 4.0));
        let batch = driver.frame();

        assert!(matches!(
            batch.commands().last(),
            Some(fireworks_core::RenderCommand::Text { text, .. }) if text == "Score: 3/4"
        ));
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_resize_moves_spawn_band() {
        let mut driver = driver();
        driver.resize(Viewport::new(100.0, 50.0));
        assert_eq!(driver.simulation().viewport(), Viewport::new(100.0, 50.0));
    }
}
