#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the grid explorer in a terminal.

mod config;
mod session;
mod terminal;

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use grid_explorer_core::{GridDimensions, ViewportSize};
use grid_explorer_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use grid_explorer_system_bootstrap::Bootstrap;
use grid_explorer_world::MapConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{FileConfig, DEFAULT_MAP_EXTENT, DEFAULT_VIEWPORT_EXTENT},
    session::Session,
    terminal::TerminalBackend,
};

/// Command-line arguments accepted by the grid explorer binary.
#[derive(Debug, Parser)]
#[command(
    name = "grid-explorer",
    about = "Explore a procedurally generated grid from the terminal"
)]
struct CliArgs {
    /// TOML file providing map, viewport, and generation settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for map generation. A random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of map columns.
    #[arg(long)]
    width: Option<u32>,
    /// Number of map rows.
    #[arg(long)]
    height: Option<u32>,
    /// Number of visible columns.
    #[arg(long)]
    viewport_width: Option<u32>,
    /// Number of visible rows.
    #[arg(long)]
    viewport_height: Option<u32>,
    /// Script of player actions. Standard input is read when omitted.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Simulated frame length in milliseconds used while waiting.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Draw tiles with 24-bit ANSI colors.
    #[arg(long)]
    color: bool,
    /// Play waits back at wall-clock speed instead of instantly.
    #[arg(long)]
    realtime: bool,
}

/// Entry point for the grid explorer command-line interface.
fn main() {
    init_tracing();

    if let Err(err) = run(CliArgs::parse()) {
        error!(error = ?err, "explorer_failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(args: CliArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => config::load(path)?,
        None => FileConfig::default(),
    };

    let dimensions = GridDimensions::new(
        args.width.or(file.map.width).unwrap_or(DEFAULT_MAP_EXTENT),
        args.height.or(file.map.height).unwrap_or(DEFAULT_MAP_EXTENT),
    );
    let viewport = ViewportSize::new(
        args.viewport_width
            .or(file.viewport.width)
            .unwrap_or(DEFAULT_VIEWPORT_EXTENT),
        args.viewport_height
            .or(file.viewport.height)
            .unwrap_or(DEFAULT_VIEWPORT_EXTENT),
    );
    let map_config = MapConfig::new(dimensions, viewport).context("invalid map configuration")?;
    let seed = args.seed.or(file.seed).unwrap_or_else(rand::random::<u64>);

    let bootstrap = Bootstrap::new(file.generation.resolve());
    let mut launch_events = Vec::new();
    let world = bootstrap
        .launch(map_config, seed, &mut launch_events)
        .with_context(|| format!("failed to launch session with seed {seed}"))?;
    info!(
        seed,
        columns = dimensions.columns(),
        rows = dimensions.rows(),
        "explorer_started"
    );

    let script = match &args.script {
        Some(path) => Some(
            File::open(path)
                .with_context(|| format!("failed to open script at {}", path.display()))?,
        ),
        None => None,
    };

    let mut session = Session::new(world, launch_events);
    let presentation = Presentation::new(
        bootstrap.welcome_banner(),
        bootstrap.controls_hint(),
        Color::from_rgb_u8(0x33, 0x33, 0x33),
        session.scene(),
    );
    let update = |dt: Duration, input: FrameInput, scene: &mut Scene| {
        session.advance(dt, input);
        *scene = session.scene();
    };

    let frame_interval = Duration::from_millis(args.frame_ms);
    let output = io::stdout().lock();
    let outcome = match script {
        Some(script) => {
            TerminalBackend::new(BufReader::new(script), output, frame_interval, args.color)
                .with_realtime(args.realtime)
                .run(presentation, update)
        }
        None => TerminalBackend::new(io::stdin().lock(), output, frame_interval, args.color)
            .with_realtime(args.realtime)
            .run(presentation, update),
    };

    session.dispose();
    outcome
}
