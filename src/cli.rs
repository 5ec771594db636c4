//! Command-line interface for CursedArena
//!
//! Supports both graphical (default) and headless modes.

use clap::Parser;
use std::path::PathBuf;

/// Boss arena combat prototype
#[derive(Parser, Debug)]
#[command(name = "cursedarena")]
#[command(about = "Boss arena combat prototype")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the arena report (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum run duration in seconds (headless mode only)
    #[arg(long, value_name = "SECS")]
    pub max_duration: Option<f32>,

    /// Random seed for deterministic simulation
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
