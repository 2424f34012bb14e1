use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use foundation::math::Vec2;
use serde::Serialize;
use tools::{Scene, pick_report, run_frames};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Project panorama HUD markers from a JSON scene")]
struct Args {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run projection frames and print one JSON report per frame
    Project {
        /// Scene file (viewer, config and markers)
        scene: PathBuf,

        /// Number of frames to report
        #[arg(long, default_value_t = 1)]
        frames: u32,

        /// Camera yaw between frames, in degrees
        #[arg(long, default_value_t = 0.0)]
        yaw_step: f64,

        /// Frame interval in milliseconds
        #[arg(long, default_value_t = 16)]
        dt_ms: u64,
    },

    /// Resolve a screen position to the marker under it
    Pick {
        /// Scene file (viewer, config and markers)
        scene: PathBuf,

        /// Pixels from the left edge
        #[arg(long)]
        x: f64,

        /// Pixels from the top edge
        #[arg(long)]
        y: f64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    match args.command {
        Command::Project {
            scene,
            frames,
            yaw_step,
            dt_ms,
        } => {
            let mut hud = Scene::load(&scene)?.build_hud()?;
            for report in run_frames(&mut hud, frames, yaw_step, Duration::from_millis(dt_ms)) {
                print_json(&report, args.pretty)?;
            }
        }
        Command::Pick { scene, x, y } => {
            let hud = Scene::load(&scene)?.build_hud()?;
            print_json(&pick_report(&hud, Vec2::new(x, y)), args.pretty)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| format!("json: {e}"))?;
    println!("{text}");
    Ok(())
}
