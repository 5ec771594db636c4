//! Headless arena execution
//!
//! Runs arena simulations without any graphical output, suitable for
//! automated testing. The schedule steps a fixed 60 Hz simulated timestep
//! as fast as the host allows, so a 60-second run finishes in a fraction
//! of a second of wall time, and seeded runs are reproducible.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::combat::log::{CombatLog, CombatLogEntry, CombatLogEventType};
use crate::states::arena::{
    self, build_summary, ArenaOutcome, ArenaRoster, ArenaSummary, CursedEnergy, Enemy, GameRng,
    Health, PlayerCombat,
};
use crate::states::arena::components::{ActiveGravityOrb, GravityOrb, PlayerIntent};
use crate::states::arena::encounter::EncounterConfig;
use crate::states::arena::CombatPhase;

use super::config::HeadlessArenaConfig;

/// Fixed simulated timestep for headless runs (60 Hz).
const HEADLESS_TIMESTEP: f64 = 1.0 / 60.0;

/// Result of a completed headless run, for programmatic access in tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaRunResult {
    pub summary: ArenaSummary,
    /// Per-enemy final state
    pub enemies: Vec<EnemyResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Final state of one enemy after the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyResult {
    pub name: String,
    pub max_health: f32,
    pub final_health: f32,
    pub survived: bool,
}

/// The full arena report written to disk: the run result plus the
/// complete combat log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaReport {
    pub result: ArenaRunResult,
    pub log: Vec<CombatLogEntry>,
}

/// Resource tracking headless run state
#[derive(Resource)]
pub struct HeadlessArenaState {
    /// Maximum run duration before declaring a timeout
    pub max_duration: f32,
    /// Elapsed simulated time
    pub elapsed_time: f32,
    /// Custom output path for the arena report
    pub output_path: Option<String>,
    /// Whether the run has completed
    pub run_complete: bool,
    /// Random seed for deterministic simulation (if provided)
    pub random_seed: Option<u64>,
    /// Run result (populated when the run completes)
    pub result: Option<ArenaRunResult>,
}

/// Whether the autopilot drives the player this run.
#[derive(Resource)]
pub struct AutopilotEnabled(pub bool);

/// Plugin for headless arena execution
pub struct HeadlessPlugin {
    pub config: HeadlessArenaConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let encounter = self
            .config
            .load_encounter()
            .expect("Invalid encounter configuration");

        app.insert_resource(encounter)
            .insert_resource(HeadlessArenaState {
                max_duration: self.config.max_duration_secs,
                elapsed_time: 0.0,
                output_path: self.config.output_path.clone(),
                run_complete: false,
                random_seed: self.config.random_seed,
                result: None,
            })
            .insert_resource(AutopilotEnabled(self.config.autopilot))
            .init_resource::<CombatLog>();

        // Combat phase ordering and the shared simulation systems
        arena::configure_combat_phase_ordering(app);
        arena::add_core_combat_systems(app, || true);

        app.add_systems(Startup, headless_setup)
            .add_systems(
                Update,
                autopilot_player
                    .before(CombatPhase::PlayerActions)
                    .run_if(|enabled: Res<AutopilotEnabled>| enabled.0),
            )
            .add_systems(
                Update,
                (headless_track_time, headless_check_end)
                    .chain()
                    .after(CombatPhase::HazardSweep),
            )
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

/// Setup system: seed the RNG and spawn the combatants.
fn headless_setup(
    mut commands: Commands,
    encounter: Res<EncounterConfig>,
    state: Res<HeadlessArenaState>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::ArenaEvent,
        "Run started (headless mode)".to_string(),
    );

    let mut rng = match state.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };

    arena::spawn_combatants(&mut commands, &encounter, &mut rng, &mut combat_log);

    commands.insert_resource(ArenaRoster {
        total_enemies: encounter.minions.count + 1,
    });
    commands.insert_resource(rng);

    info!(
        "Headless setup complete: encounter '{}', {} minions, autopilot player",
        encounter.name, encounter.minions.count
    );
}

/// Scripted player driver for headless runs.
///
/// A simple aggressive policy: close on the nearest living enemy, strike
/// in range (punch when the strike is cooling), open the gravity orb when
/// several enemies cluster, and steer any live orb toward the nearest
/// enemy.
fn autopilot_player(
    mut intent: ResMut<PlayerIntent>,
    active_orb: Res<ActiveGravityOrb>,
    players: Query<
        (&Transform, &PlayerCombat, &CursedEnergy, &Health),
        (With<PlayerCombat>, Without<Enemy>),
    >,
    enemies: Query<(&Transform, &Health), (With<Enemy>, Without<PlayerCombat>)>,
    orbs: Query<&Transform, (With<GravityOrb>, Without<Enemy>, Without<PlayerCombat>)>,
) {
    let Ok((player_transform, combat, energy, health)) = players.get_single() else {
        return;
    };
    if health.eliminated {
        *intent = PlayerIntent::default();
        return;
    }

    let player_pos = player_transform.translation;

    let mut nearest: Option<(Vec3, f32)> = None;
    let mut close_by = 0;
    for (enemy_transform, enemy_health) in enemies.iter() {
        if !enemy_health.is_alive() {
            continue;
        }
        let pos = enemy_transform.translation;
        let distance = player_pos.distance(pos);
        if distance < 12.0 {
            close_by += 1;
        }
        if nearest.map_or(true, |(_, d)| distance < d) {
            nearest = Some((pos, distance));
        }
    }

    let Some((target_pos, distance)) = nearest else {
        *intent = PlayerIntent::default();
        return;
    };

    // World-aligned input mapping (no camera in headless): +y is -Z
    let to_target = |from: Vec3, to: Vec3| -> Vec2 {
        let d = to - from;
        Vec2::new(d.x, -d.z).normalize_or_zero()
    };

    intent.move_input = if distance > combat.attack_range * 0.8 {
        to_target(player_pos, target_pos)
    } else {
        Vec2::ZERO
    };

    intent.strike = distance <= combat.attack_range && combat.attack_cooldown_left <= 0.0;
    intent.punch = !intent.strike
        && distance <= combat.punch_range
        && combat.punch_cooldown_left <= 0.0;

    // The orb is worth its cost when enemies bunch up
    intent.activate_skill = active_orb.0.is_none()
        && close_by >= 2
        && combat.skill_cooldown_left <= 0.0
        && energy.can_afford(combat.skill_cost);

    intent.orb_steer = match orbs.get_single() {
        Ok(orb_transform) => to_target(orb_transform.translation, target_pos),
        Err(_) => Vec2::ZERO,
    };
}

/// Track elapsed simulated time for timeout detection.
fn headless_track_time(time: Res<Time>, mut state: ResMut<HeadlessArenaState>) {
    if !state.run_complete {
        state.elapsed_time += time.delta_secs();
    }
}

/// Check whether the run has ended (defeat, victory, or timeout).
fn headless_check_end(
    mut state: ResMut<HeadlessArenaState>,
    mut combat_log: ResMut<CombatLog>,
    roster: Res<ArenaRoster>,
    players: Query<(&Health, &CursedEnergy, &PlayerCombat), Without<Enemy>>,
    enemies: Query<(&Enemy, &Health)>,
) {
    if state.run_complete {
        return;
    }

    let player = players.get_single().ok();
    let enemies_alive = enemies.iter().filter(|(_, h)| h.is_alive()).count();

    let outcome = if state.elapsed_time >= state.max_duration {
        Some(ArenaOutcome::Timeout)
    } else if player.map_or(true, |(health, _, _)| !health.is_alive()) {
        Some(ArenaOutcome::PlayerDefeat)
    } else if enemies_alive == 0 {
        Some(ArenaOutcome::PlayerVictory)
    } else {
        None
    };

    let Some(outcome) = outcome else {
        return;
    };

    info!(
        "Run ended after {:.1}s: {:?} ({} enemies alive)",
        state.elapsed_time, outcome, enemies_alive
    );
    combat_log.log(
        CombatLogEventType::ArenaEvent,
        format!("Run ended: {:?}", outcome),
    );

    let summary = build_summary(
        outcome,
        state.elapsed_time,
        &roster,
        player,
        enemies_alive,
    );

    let enemy_results = enemies
        .iter()
        .map(|(enemy, health)| EnemyResult {
            name: enemy.config.name.clone(),
            max_health: health.max,
            final_health: health.current,
            survived: health.is_alive(),
        })
        .collect();

    let result = ArenaRunResult {
        summary,
        enemies: enemy_results,
        random_seed: state.random_seed,
    };

    if let Some(path) = state.output_path.clone() {
        let report = ArenaReport {
            result: result.clone(),
            log: combat_log.entries.clone(),
        };
        match save_report(&report, &path) {
            Ok(()) => println!("Run complete. Report saved to: {}", path),
            Err(e) => eprintln!("Failed to save arena report: {}", e),
        }
    }

    state.result = Some(result);
    state.run_complete = true;
}

/// Serialize the arena report to a JSON file.
fn save_report(report: &ArenaReport, path: &str) -> Result<(), String> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| format!("Failed to serialize report: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path, e))
}

/// Exit the app when the run is complete
fn headless_exit_on_complete(state: Res<HeadlessArenaState>, mut exit: EventWriter<AppExit>) {
    if state.run_complete {
        exit.send(AppExit::Success);
    }
}

/// Run a headless arena simulation to completion.
pub fn run_headless_arena(config: HeadlessArenaConfig) -> Result<ArenaRunResult, String> {
    config.validate()?;

    let mut app = App::new();
    app
        // Minimal plugins - no window, no rendering; step as fast as possible
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)),
        )
        // Transform and hierarchy plugins needed for entity positions
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin)
        // Fixed simulated timestep, decoupled from wall-clock time
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            HEADLESS_TIMESTEP,
        )))
        .add_plugins(HeadlessPlugin { config });

    // Drive the fixed-timestep schedule to completion manually rather than
    // via App::run(). run() moves the app into the runner and leaves an empty
    // App behind, so the run result could not be read back out of the world
    // afterwards. This mirrors what ScheduleRunnerPlugin's loop does
    // (finish + cleanup, then update) and stops once the run is complete.
    while app.plugins_state() == bevy::app::PluginsState::Adding {}
    app.finish();
    app.cleanup();
    while !app.world().resource::<HeadlessArenaState>().run_complete {
        app.update();
    }

    let state = app.world().resource::<HeadlessArenaState>();
    state
        .result
        .clone()
        .ok_or_else(|| "Headless run exited without a result".to_string())
}
