//! CursedArena - Boss Arena Combat Prototype
//!
//! Graphical mode by default; `--headless <config.json>` runs the
//! windowless simulation and writes a JSON arena report.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use cursedarena::cli;
use cursedarena::headless::{run_headless_arena, HeadlessArenaConfig};
use cursedarena::states::arena::{EncounterConfigPlugin, RngSeed};
use cursedarena::states::{GameState, StatesPlugin};

fn main() {
    let args = cli::parse_args();

    if let Some(config_path) = args.headless {
        let mut config = match HeadlessArenaConfig::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Invalid headless config: {}", e);
                std::process::exit(1);
            }
        };

        // CLI flags override the config file
        if let Some(output) = args.output {
            config.output_path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(max_duration) = args.max_duration {
            config.max_duration_secs = max_duration;
        }
        if let Some(seed) = args.seed {
            config.random_seed = Some(seed);
        }

        match run_headless_arena(config) {
            Ok(result) => {
                println!(
                    "Outcome: {:?} after {:.1}s ({}/{} enemies defeated)",
                    result.summary.outcome,
                    result.summary.elapsed,
                    result.summary.enemies_defeated,
                    result.summary.enemies_total
                );
            }
            Err(e) => {
                eprintln!("Headless run failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "CursedArena".to_string(),
                resolution: (1280.0, 720.0).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((EguiPlugin, EncounterConfigPlugin, StatesPlugin))
        .insert_resource(RngSeed(args.seed))
        .init_state::<GameState>()
        .run();
}
