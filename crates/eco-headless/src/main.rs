//! Headless runner: plays one toy for a fixed time and prints its final
//! snapshot as JSON.

mod autoplay;
mod telemetry;

use anyhow::{bail, Context, Result};
use autoplay::Autoplay;
use clap::Parser;
use eco_core::{ToyConfig, ToyKind};
use eco_world::{Playground, PlaygroundSnapshot, ToySnapshot};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "eco-headless")]
#[command(about = "Run an eco toy without a screen")]
struct Args {
    /// Toy to run: food-chain, collecting-rain or spilling-paint
    #[arg(short, long, default_value = "food-chain")]
    toy: ToyKind,

    /// Simulated seconds
    #[arg(short, long, default_value_t = 30.0)]
    seconds: f32,

    /// Frames per simulated second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seed for every toy and the scripted player
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not feed scripted pointer input
    #[arg(long)]
    no_autoplay: bool,

    /// Write the final snapshot here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.json_logs)?;

    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", args.fps);
    }
    if !(args.seconds.is_finite() && args.seconds >= 0.0) {
        bail!("--seconds must not be negative, got {}", args.seconds);
    }

    let mut config = match &args.config {
        Some(path) => ToyConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ToyConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut autoplay = if args.no_autoplay {
        None
    } else {
        Some(Autoplay::new(args.seed.unwrap_or(config.food_chain.seed), &config))
    };
    let mut playground = Playground::new(args.toy, config);

    let dt = 1.0 / args.fps;
    let frames = (args.seconds * args.fps).round() as u64;
    let report_every = (args.fps.round() as u64).max(1) * 5;
    info!(toy = %args.toy, frames, dt, "Running headless");

    for frame in 1..=frames {
        if let Some(autoplay) = autoplay.as_mut() {
            autoplay.step(&mut playground, dt);
        }
        playground.update(dt);
        if frame % report_every == 0 {
            report(frame, &playground.snapshot());
        }
    }

    let snapshot = playground.snapshot();
    let json = serde_json::to_string_pretty(&snapshot)?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?,
        None => println!("{}", json),
    }

    info!(
        frames = playground.frames(),
        gestures = autoplay.as_ref().map(Autoplay::gestures).unwrap_or(0),
        "Run complete"
    );
    Ok(())
}

fn report(frame: u64, snapshot: &PlaygroundSnapshot) {
    match &snapshot.toy {
        ToySnapshot::FoodChain(grid) => info!(
            frame,
            tick = grid.tick,
            vines = grid.counts.vines,
            colonies = grid.counts.colonies,
            migrators = grid.counts.migrators,
            draw_meter = grid.draw_meter,
            "Food chain progress"
        ),
        ToySnapshot::CollectingRain(rain) => info!(
            frame,
            shapes = rain.shapes.len(),
            active_buckets = rain.buckets.iter().filter(|b| b.active).count(),
            goals = rain.goals.iter().filter(|g| g.achieved).count(),
            celebration = snapshot.celebration_alpha,
            "Rain progress"
        ),
        ToySnapshot::SpillingPaint(paint) => info!(
            frame,
            circles = paint.circles.len(),
            goals = paint.goals.iter().filter(|&&g| g).count(),
            passes = paint.passes,
            celebration = snapshot.celebration_alpha,
            "Paint progress"
        ),
    }
}
