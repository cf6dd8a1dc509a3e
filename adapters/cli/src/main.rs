#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Raycrawl experience.

mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use raycrawl_rendering::{Presentation, RenderingBackend};
use raycrawl_rendering_macroquad::MacroquadBackend;

use crate::{config::GameConfig, simulation::Simulation};

/// Command-line arguments accepted by the Raycrawl binary.
#[derive(Debug, Parser)]
#[command(name = "raycrawl", about = "First-person dungeon crawler")]
struct CliArgs {
    /// TOML file overriding tuning values and the level list.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for monster placement and behavior; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// One-based level to start on.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    level: Option<u32>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, conflicts_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible.
    #[arg(long = "no-vsync")]
    no_vsync: bool,
    /// Print frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Skip loading sprite frames and draw fallback shapes.
    #[arg(long)]
    no_sprites: bool,
}

/// Entry point for the Raycrawl command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let config = GameConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let start_level = args.level.map_or(0, |level| level as usize - 1);
    log::info!("starting on level {} with seed {seed}", start_level + 1);

    let mut simulation =
        Simulation::new(&config, seed, start_level).context("failed to build the campaign")?;
    let scene = simulation.initial_scene();
    let presentation = Presentation::new(
        "Raycrawl",
        config.projection.window_width,
        config.projection.window_height,
        scene,
    )?;

    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);
    if args.vsync {
        backend = backend.with_vsync(true);
    } else if args.no_vsync {
        backend = backend.with_vsync(false);
    }

    backend.run(presentation, move |dt, input, scene| {
        simulation.step(dt, &input);
        simulation.populate_scene(scene);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let args = CliArgs::try_parse_from([
            "raycrawl",
            "--seed",
            "9",
            "--level",
            "2",
            "--no-vsync",
            "--no-sprites",
        ])
        .expect("valid flags");
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.level, Some(2));
        assert!(args.no_vsync && args.no_sprites && !args.vsync);
    }

    #[test]
    fn level_zero_and_conflicting_vsync_are_rejected() {
        assert!(CliArgs::try_parse_from(["raycrawl", "--level", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["raycrawl", "--vsync", "--no-vsync"]).is_err());
    }
}
