//! Headless orb runner: builds a scene, optionally breaks it, and steps the
//! frame loop at a fixed 60 Hz, logging shell state as it goes.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use orbshell::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orbshell", version, about = "Run the orb simulation without a window")]
struct Args {
    /// Shape to generate (Sphere, Cube, Torus, Spiral).
    #[arg(long, default_value = "Sphere")]
    shape: String,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seed for every random draw.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Break the shell around the origin with this radius before running.
    #[arg(long)]
    break_radius: Option<f32>,

    /// Global hue shift in degrees.
    #[arg(long)]
    hue: Option<f32>,
}

fn run(args: Args) -> OrbResult<()> {
    let mut config = match &args.config {
        Some(path) => OrbConfig::load(path)?,
        None => OrbConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let shape: Shape = args.shape.parse()?;

    let mut scene = Scene::new(config)?;
    scene.regenerate_shape(shape);
    if let Some(hue) = args.hue {
        scene.set_hue(hue);
    }
    if let Some(radius) = args.break_radius {
        let broken = scene.break_near(Vec3::ZERO, radius);
        info!(broken, "initial break");
    }

    let mut clock = SimulationClock::fixed_step(Duration::from_secs_f64(1.0 / 60.0));
    let mut settled_at = scene.is_settled().then_some(0);

    for _ in 0..args.frames {
        scene.tick(clock.advance());
        if settled_at.is_none() && scene.is_settled() {
            settled_at = Some(clock.frame());
            info!(frame = clock.frame(), "shell settled");
        }
        if clock.frame() % 60 == 0 {
            info!(
                frame = clock.frame(),
                triangles = scene.shell().len(),
                broken = scene.shell().broken_count(),
                settled = scene.is_settled(),
                "progress"
            );
        }
    }

    info!(
        shape = %scene.shape(),
        frames = clock.frame(),
        nodes = scene.nodes().len(),
        triangles = scene.shell().len(),
        settled = scene.is_settled(),
        settled_at = ?settled_at,
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
