//! Headless fireworks host.
//!
//! Runs the animation driver without a display. Score messages come from
//! `--score/--max-score` or, with `--stdin`, one JSON message per line:
//!
//! ```text
//! echo '{"type":"H5P_SCORE_RESULT","score":10,"maxScore":10}' \
//!     | fireworks-headless --stdin --ticks 300
//! ```
//!
//! Set `RUST_LOG=debug` to see launches and explosions.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use crossbeam_channel::{Receiver, TryRecvError};
#[cfg(not(target_arch = "wasm32"))]
use fireworks::{AnimationDriver, FixedTick, FrameLoopControl, HostConfig, HostResult};
#[cfg(not(target_arch = "wasm32"))]
use fireworks_core::Viewport;
#[cfg(not(target_arch = "wasm32"))]
use fireworks_shared::ScoreReport;
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "fireworks-headless", version, about = "Run the scorecard fireworks without a display")]
struct Args {
    /// Maximum frames to draw
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// RNG seed (overrides the config file; random when absent everywhere)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML host configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width
    #[arg(long, default_value_t = 960, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Viewport height
    #[arg(long, default_value_t = 540, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Score to report before the first frame
    #[arg(long, requires = "max_score", value_parser = parse_finite)]
    score: Option<f64>,

    /// Maximum score to report before the first frame
    #[arg(long = "max-score", requires = "score", value_parser = parse_finite)]
    max_score: Option<f64>,

    /// Read JSON score messages from stdin, one per line
    #[arg(long)]
    stdin: bool,

    /// Pace frames at 60 Hz instead of running flat out
    #[arg(long)]
    realtime: bool,
}

/// Parses a finite number; `NaN` and infinities are refused.
#[cfg(not(target_arch = "wasm32"))]
fn parse_finite(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(value) => Err(format!("{value} is not a finite number")),
        Err(err) => Err(err.to_string()),
    }
}

/// Frame loop of the headless host: flags polled by the run loop.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct HeadlessLoop {
    continuous: bool,
    redraw_requested: bool,
    starts: u32,
    stops: u32,
}

#[cfg(not(target_arch = "wasm32"))]
impl HeadlessLoop {
    /// Returns true if no frame is wanted.
    fn is_idle(&self) -> bool {
        !self.continuous && !self.redraw_requested
    }

    /// Returns true if a frame should run now, consuming a single redraw.
    fn frame_due(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested) || self.continuous
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FrameLoopControl for HeadlessLoop {
    fn start_continuous_loop(&mut self) {
        if !self.continuous {
            self.starts += 1;
        }
        self.continuous = true;
    }

    fn request_single_redraw(&mut self) {
        self.redraw_requested = true;
    }

    fn stop_continuous_loop(&mut self) {
        if self.continuous {
            self.stops += 1;
        }
        self.continuous = false;
    }
}

/// What the run did.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Summary {
    frames: u64,
    messages: u64,
    rejected: u64,
    peak_particles: usize,
    draw_commands: usize,
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        tracing::debug!("stdin closed");
    });
    rx
}

#[cfg(not(target_arch = "wasm32"))]
fn handle_message(driver: &mut AnimationDriver<HeadlessLoop>, summary: &mut Summary, raw: &str) {
    summary.messages += 1;
    if !driver.on_message(raw) {
        summary.rejected += 1;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn fallback_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(fireworks_core::simulation::DEFAULT_SEED, |elapsed| {
            elapsed.as_nanos() as u64
        })
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &Args) -> HostResult<(Summary, AnimationDriver<HeadlessLoop>)> {
    let mut config = match &args.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    let seed = args
        .seed
        .or(config.simulation.seed)
        .unwrap_or_else(fallback_seed);
    config.simulation.seed = Some(seed);
    tracing::info!("Seed {}", seed);

    let viewport = Viewport::new(args.width as f32, args.height as f32);
    let mut driver = AnimationDriver::new(
        config.simulation,
        config.scorecard,
        viewport,
        HeadlessLoop::default(),
    )?;

    let mut summary = Summary::default();
    if let (Some(score), Some(max_score)) = (args.score, args.max_score) {
        summary.messages += 1;
        if !driver.on_report(ScoreReport::new(score, max_score)) {
            summary.rejected += 1;
        }
    }

    let mut input = args.stdin.then(spawn_stdin_reader);
    let mut clock = args.realtime.then(FixedTick::default);

    while summary.frames < args.ticks {
        if let Some(rx) = input.take() {
            let mut open = true;
            if driver.control().is_idle() {
                // Nothing to draw until the next message
                match rx.recv() {
                    Ok(raw) => handle_message(&mut driver, &mut summary, &raw),
                    Err(_) => open = false,
                }
            }
            while open {
                match rx.try_recv() {
                    Ok(raw) => handle_message(&mut driver, &mut summary, &raw),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => open = false,
                }
            }
            if open {
                input = Some(rx);
            }
        }

        if !driver.control_mut().frame_due() {
            if input.is_none() {
                break;
            }
            continue;
        }

        let started = clock.as_mut().map(|clock| {
            while !clock.should_tick() {
                clock.wait_for_next_tick();
            }
            clock.begin_tick()
        });

        summary.draw_commands = driver.frame().len();
        summary.frames += 1;
        summary.peak_particles = summary
            .peak_particles
            .max(driver.simulation().live_particles());

        if let (Some(clock), Some(started)) = (clock.as_mut(), started) {
            clock.end_tick(started);
        }
    }

    Ok((summary, driver))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok((summary, driver)) => {
            let sim = driver.simulation();
            let stats = sim.stats();
            println!("frames drawn:      {}", summary.frames);
            println!("messages:          {} ({} rejected)", summary.messages, summary.rejected);
            println!("score:             {:.1}%", sim.percentage());
            println!("celebrating:       {}", sim.celebration_active());
            println!("loop starts/stops: {}/{}", driver.control().starts, driver.control().stops);
            println!("launched:          {}", stats.total_spawned);
            println!("fireworks alive:   {}", stats.active_emitters);
            println!("particles alive:   {}", stats.live_particles);
            println!("peak particles:    {}", summary.peak_particles);
            println!("last frame draws:  {}", summary.draw_commands);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_score_flags_refuse_non_finite() {
        assert_eq!(parse_finite("7.5"), Ok(7.5));
        for raw in ["NaN", "inf", "-inf", "infinity", "ten"] {
            assert!(parse_finite(raw).is_err(), "{raw}");
        }

        let parsed = Args::try_parse_from(["fireworks-headless", "--score", "NaN", "--max-score", "10"]);
        assert!(parsed.is_err());
        let parsed =
            Args::try_parse_from(["fireworks-headless", "--score", "9", "--max-score", "10"]).unwrap();
        assert_eq!((parsed.score, parsed.max_score), (Some(9.0), Some(10.0)));
    }
}
