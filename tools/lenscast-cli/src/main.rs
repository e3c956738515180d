//! Lenscast CLI: developer tooling around the focus-zoom pipeline.
//!
//! Usage:
//!   lenscast check             Report input hook capabilities
//!   lenscast config            Print (or write) the configuration
//!   lenscast cycle             Print the camera curve of one zoom cycle
//!   lenscast demo              Run a live session on synthetic frames

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lenscast_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "lenscast",
    about = "Real-time focus zoom for screen captures",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which input backend is usable and what it can observe
    Check {
        /// Source width in screen pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Source height in screen pixels
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// Print the effective configuration
    Config {
        /// Render configuration file (defaults to the one named in the app config)
        #[arg(long)]
        render: Option<PathBuf>,

        /// Write the default app configuration to the config path
        #[arg(long)]
        write: bool,
    },

    /// Print the camera transforms of one zoom cycle
    Cycle {
        /// Trigger position (screen pixels)
        #[arg(long, default_value = "480")]
        x: f64,

        /// Trigger position (screen pixels)
        #[arg(long, default_value = "270")]
        y: f64,

        /// Source width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Source height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,

        /// Samples per second
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Maximum zoom scale
        #[arg(long)]
        strength: Option<f64>,
    },

    /// Run a live session over synthetic frames and write PNG snapshots
    Demo {
        /// Output directory for snapshots
        #[arg(short, long, default_value = "lenscast-demo")]
        output: PathBuf,

        /// Demo length in seconds
        #[arg(long, default_value = "4.0")]
        seconds: f64,

        /// Write every Nth frame
        #[arg(long, default_value = "10")]
        every: u64,

        /// Render configuration file
        #[arg(long)]
        render: Option<PathBuf>,

        /// JSONL input event script (defaults to a built-in click sequence)
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app = AppConfig::load();
    let mut logging = app.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    lenscast_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Check { width, height } => commands::check::run(width, height),
        Commands::Config { render, write } => commands::config::run(&app, render, write),
        Commands::Cycle {
            x,
            y,
            width,
            height,
            fps,
            strength,
        } => commands::cycle::run(x, y, width, height, fps, strength),
        Commands::Demo {
            output,
            seconds,
            every,
            render,
            script,
        } => commands::demo::run(&app, output, seconds, every, render, script).await,
    }
}
