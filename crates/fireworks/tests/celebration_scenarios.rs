//! # Celebration Scenarios
//!
//! End-to-end runs of the animation driver: raw score messages in, frames
//! and loop control calls out.
//!
//! Run with: cargo test --package fireworks --test celebration_scenarios

use fireworks::{AnimationDriver, FrameLoopControl, ScorecardText};
use fireworks_core::{EmitterPhase, RenderCommand, SimulationConfig, Viewport};

const PERFECT: &str = r#"{"type":"H5P_SCORE_RESULT","score":10,"maxScore":10}"#;
const ALMOST: &str = r#"{"type":"H5P_SCORE_RESULT","score":99,"maxScore":100}"#;
const LOW: &str = r#"{"type":"H5P_SCORE_RESULT","score":2,"maxScore":10}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Start,
    Redraw,
    Stop,
}

#[derive(Default)]
struct RecordingLoop {
    calls: Vec<Call>,
}

impl FrameLoopControl for RecordingLoop {
    fn start_continuous_loop(&mut self) {
        self.calls.push(Call::Start);
    }

    fn request_single_redraw(&mut self) {
        self.calls.push(Call::Redraw);
    }

    fn stop_continuous_loop(&mut self) {
        self.calls.push(Call::Stop);
    }
}

fn driver_with(config: SimulationConfig) -> AnimationDriver<RecordingLoop> {
    AnimationDriver::new(
        config,
        ScorecardText::default(),
        Viewport::new(800.0, 600.0),
        RecordingLoop::default(),
    )
    .unwrap()
}

fn seeded(seed: u64, spawn_probability: f64) -> SimulationConfig {
    SimulationConfig {
        seed: Some(seed),
        spawn_probability,
        ..SimulationConfig::default()
    }
}

// ============================================================================
// LOOP CONTROL
// ============================================================================

#[test]
fn test_perfect_score_starts_continuous_loop() {
    let mut driver = driver_with(SimulationConfig::default());

    assert!(driver.on_message(PERFECT));
    assert_eq!(driver.control().calls, vec![Call::Start]);

    for _ in 0..30 {
        driver.frame();
    }
    assert!(driver.is_looping());
    assert_eq!(driver.control().calls, vec![Call::Start]);
}

#[test]
fn test_near_perfect_score_redraws_once() {
    let mut driver = driver_with(SimulationConfig::default());

    assert!(driver.on_message(ALMOST));
    assert_eq!(driver.control().calls, vec![Call::Redraw]);

    driver.frame();
    assert!(!driver.simulation().celebration_active());
    assert!(driver.simulation().emitters().is_empty());
    assert!((driver.simulation().percentage() - 99.0).abs() < 1e-9);
}

#[test]
fn test_celebration_end_clears_and_stops() {
    let mut driver = driver_with(seeded(11, 1.0));

    driver.on_message(PERFECT);
    for _ in 0..40 {
        driver.frame();
    }
    assert_eq!(driver.simulation().emitters().len(), 40);

    driver.on_message(LOW);
    let batch = driver.frame();
    assert_eq!(batch.disc_count(), 0);

    assert!(driver.simulation().emitters().is_empty());
    assert_eq!(driver.simulation().stats().cleared_this_frame, 40);
    assert_eq!(
        driver.control().calls,
        vec![Call::Start, Call::Redraw, Call::Stop]
    );
    assert!(!driver.is_looping());
}

#[test]
fn test_celebration_can_restart() {
    let mut driver = driver_with(seeded(5, 1.0));

    driver.on_message(PERFECT);
    driver.frame();
    driver.on_message(LOW);
    driver.frame();
    driver.on_message(PERFECT);
    driver.frame();

    assert_eq!(
        driver.control().calls,
        vec![Call::Start, Call::Redraw, Call::Stop, Call::Start]
    );
    assert_eq!(driver.simulation().emitters().len(), 1);
}

// ============================================================================
// INBOUND MESSAGES
// ============================================================================

#[test]
fn test_malformed_messages_are_ignored() {
    let mut driver = driver_with(SimulationConfig::default());
    driver.on_message(ALMOST);

    let rejected = [
        "",
        "[]",
        "not json at all",
        r#"{"type":"H5P_XAPI","score":10,"maxScore":10}"#,
        r#"{"type":"H5P_SCORE_RESULT","maxScore":10}"#,
        r#"{"type":"H5P_SCORE_RESULT","score":"ten","maxScore":10}"#,
        r#"{"score":10,"maxScore":10}"#,
    ];
    for raw in rejected {
        assert!(!driver.on_message(raw), "accepted {raw:?}");
    }

    driver.frame();
    assert_eq!(driver.control().calls, vec![Call::Redraw]);
    assert_eq!(*driver.simulation().score(), fireworks_shared::ScoreState::new(99.0, 100.0));
}

#[test]
fn test_zero_max_score_never_celebrates() {
    let mut driver = driver_with(SimulationConfig::default());

    assert!(driver.on_message(r#"{"type":"H5P_SCORE_RESULT","score":0,"maxScore":0}"#));
    driver.frame();

    let percentage = driver.simulation().percentage();
    assert_eq!(percentage, 0.0);
    assert!(!percentage.is_nan());
    assert!(!driver.simulation().celebration_active());
    assert_eq!(driver.control().calls, vec![Call::Redraw]);
}

#[test]
fn test_non_finite_reports_never_reach_the_scorecard() {
    use fireworks_shared::ScoreReport;

    let mut driver = driver_with(SimulationConfig::default());
    let cases = [
        (f64::NAN, 10.0),
        (f64::INFINITY, 10.0),
        (f64::NEG_INFINITY, 10.0),
        (f64::INFINITY, f64::INFINITY),
    ];
    for (score, max_score) in cases {
        assert!(!driver.on_report(ScoreReport::new(score, max_score)));
    }
    assert!(driver.control().calls.is_empty());

    driver.frame();
    let percentage = driver.simulation().percentage();
    assert_eq!(percentage, 0.0);
    for command in driver.batch().commands() {
        if let RenderCommand::Text { text, .. } = command {
            assert!(!text.contains("NaN") && !text.contains("inf"), "{text}");
        }
    }
}

// ============================================================================
// SIMULATION THROUGH THE DRIVER
// ============================================================================

#[test]
fn test_fifty_seeded_ticks_spawn_at_most_one_per_tick() {
    let mut driver = driver_with(seeded(42, 0.05));
    driver.on_message(PERFECT);

    for _ in 0..50 {
        driver.frame();
    }
    let spawned = driver.simulation().stats().total_spawned;
    assert!(spawned <= 50);
    assert_eq!(driver.simulation().emitters().len() as u64, spawned);

    // Same seed, same show
    let mut replay = driver_with(seeded(42, 0.05));
    replay.on_message(PERFECT);
    for _ in 0..50 {
        replay.frame();
    }
    assert_eq!(replay.simulation().stats().total_spawned, spawned);
}

#[test]
fn test_fireworks_explode_independently() {
    let mut driver = driver_with(seeded(9, 1.0));
    driver.on_message(PERFECT);

    let mut explosions = 0;
    for _ in 0..100 {
        driver.frame();
        explosions += driver.simulation().stats().explosions_this_frame;
    }

    let emitters = driver.simulation().emitters();
    assert_eq!(emitters.len(), 100);

    let mut exploded = 0;
    for emitter in emitters {
        match emitter.phase() {
            EmitterPhase::Ascending { fuse } => {
                assert!(fuse.velocity().y < 0.0);
                assert!(emitter.sparks().is_empty());
            }
            EmitterPhase::Exploded => {
                exploded += 1;
                assert_eq!(emitter.sparks().len(), 100);
                assert!(emitter.sparks().iter().all(|s| s.hue() == emitter.hue()));
            }
        }
    }
    assert_eq!(exploded, explosions);
    assert!(exploded > 0 && exploded < 100);
}

#[test]
fn test_no_finished_firework_survives_a_frame() {
    let mut driver = driver_with(seeded(23, 0.2));
    driver.on_message(PERFECT);

    let mut retired = 0;
    for _ in 0..400 {
        driver.frame();
        retired += driver.simulation().stats().retired_this_frame;
        assert!(driver.simulation().emitters().iter().all(|e| !e.is_done()));
    }
    assert!(retired > 0);
}

#[test]
fn test_frame_draws_particles_under_scorecard() {
    let mut driver = driver_with(seeded(4, 1.0));
    driver.on_message(PERFECT);
    for _ in 0..5 {
        driver.frame();
    }

    driver.frame();
    let live = driver.simulation().live_particles();
    let batch = driver.batch();
    let commands = batch.commands();

    assert!(matches!(commands[0], RenderCommand::Fade { .. }));
    assert_eq!(batch.disc_count(), live);
    assert!(live > 0);

    let texts: Vec<&str> = commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["Congratulations! Outstanding score!", "Score: 10/10"]);

    // Scorecard is painted last
    assert!(matches!(commands.last(), Some(RenderCommand::Text { .. })));
}
