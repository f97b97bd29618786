//! # Animated Background Demo
//!
//! Opens a window with the animated background running in it. Move the pointer
//! to push the panels around; resize the window to see the projection follow.
//!
//! ## Usage:
//! ```bash
//! cargo run --example backdrop
//! cargo run --example backdrop -- --variant geometric --seed 7
//! ```
//!
//! Press Escape or close the window to quit.

use clap::Parser;
use codescape::{BackdropApp, SceneConfig, VariantKind};

#[derive(Parser)]
#[command(name = "backdrop")]
#[command(about = "Procedural animated background", long_about = None)]
struct Cli {
    /// Scene theme: "network" or "geometric"
    #[arg(short, long, default_value = "network")]
    variant: VariantKind,

    /// Fixed RNG seed for a reproducible layout
    #[arg(short, long)]
    seed: Option<u64>,

    /// Clock increment per frame
    #[arg(long, default_value_t = 0.01)]
    clock_step: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let mut config = SceneConfig::default()
        .with_variant(cli.variant)
        .with_clock_step(cli.clock_step);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    log::info!("starting {:?} backdrop", cli.variant);
    BackdropApp::new(config)?.with_title("codescape").run()
}
