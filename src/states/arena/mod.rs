//! Arena Scene - Boss Combat Simulation
//!
//! The active combat simulation: one player against a boss and a ring of
//! minions, driven by the encounter configuration.
//!
//! ## Combat System
//! - **Player actions**: cooldown-gated strike and punch, an energy-gated
//!   steerable gravity orb, jumping, and a circular arena boundary
//! - **Enemy AI**: a per-enemy state machine (idle / chase / evade /
//!   melee / dismantle / domain) with strict transition priority
//! - **Hazards**: straight bolts, dismantle slashes, and the gravity orb,
//!   all with terminal active-to-resolved lifecycles
//!
//! ## Flow
//! 1. `setup_arena`: reads `EncounterConfig`, seeds the RNG, and spawns
//!    the player, the boss, and the minion ring
//! 2. The four combat phases run each frame (see `systems`)
//! 3. `check_arena_end` detects victory/defeat and transitions to Results
//! 4. `cleanup_arena`: despawns every arena entity when exiting

// Submodules
pub mod arena_flow;
pub mod camera;
pub mod components;
pub mod effects;
pub mod encounter;
pub mod enemy_ai;
pub mod hazards;
pub mod input;
pub mod player;
pub mod rendering;
pub mod systems;
pub mod utils;

// Re-exports
pub use arena_flow::*;
pub use components::*;
pub use effects::{EffectOptions, EffectRequest};
pub use encounter::{EncounterConfig, EncounterConfigPlugin, EnemyArchetype};
pub use systems::{add_core_combat_systems, configure_combat_phase_ordering, CombatPhase};

use bevy::prelude::*;
use std::f32::consts::TAU;

use crate::combat::log::{CombatLog, CombatLogEventType};

// ============================================================================
// Constants
// ============================================================================

/// Player starting health.
pub const PLAYER_MAX_HEALTH: f32 = 250.0;
/// Cursed-energy pool size.
pub const PLAYER_MAX_ENERGY: f32 = 100.0;
/// Cursed energy restored per second.
pub const PLAYER_ENERGY_REGEN: f32 = 8.0;
/// The boss spawns this far in front of the player, across the arena.
const BOSS_SPAWN_OFFSET: f32 = -15.0;

// ============================================================================
// Resources
// ============================================================================

/// Optional RNG seed carried from the command line into arena setup.
#[derive(Resource, Default)]
pub struct RngSeed(pub Option<u64>);

// ============================================================================
// Setup & Cleanup
// ============================================================================

/// Spawn the player, the boss, and the minion ring from the encounter
/// definition. Shared by the graphical and headless setups.
///
/// Returns the player entity.
pub fn spawn_combatants(
    commands: &mut Commands,
    encounter: &EncounterConfig,
    rng: &mut GameRng,
    combat_log: &mut CombatLog,
) -> Entity {
    combat_log.log(
        CombatLogEventType::ArenaEvent,
        format!("Encounter '{}' begins", encounter.name),
    );

    let player = commands
        .spawn((
            Transform::from_xyz(0.0, 0.0, 0.0),
            PlayerCombat::default(),
            Health::new(PLAYER_MAX_HEALTH),
            CursedEnergy::new(PLAYER_MAX_ENERGY, PLAYER_ENERGY_REGEN),
            InfinityGuard::default(),
            Visible(true),
            ArenaEntity,
        ))
        .id();

    // Boss across the arena from the player
    let boss = encounter.boss.clone();
    let boss_y = boss.size / 2.0;
    commands.spawn((
        Transform::from_xyz(0.0, boss_y, BOSS_SPAWN_OFFSET),
        Enemy::new(boss.clone(), rng),
        Health::new(boss.max_health),
        Visible(true),
        ArenaEntity,
    ));

    // Minions scattered on a ring around the player
    let wave = &encounter.minions;
    for _ in 0..wave.count {
        let angle = rng.random_f32() * TAU;
        let reach = wave.spawn_radius * (0.5 + rng.random_f32() * 0.5);
        let minion = wave.archetype.clone();
        let y = minion.size / 2.0;
        commands.spawn((
            Transform::from_xyz(angle.cos() * reach, y, angle.sin() * reach),
            Enemy::new(minion.clone(), rng),
            Health::new(minion.max_health),
            Visible(true),
            ArenaEntity,
        ));
    }

    player
}

/// Setup system for the graphical arena scene.
pub fn setup_arena(
    mut commands: Commands,
    encounter: Res<EncounterConfig>,
    seed: Option<Res<RngSeed>>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();

    let mut rng = match seed.and_then(|s| s.0) {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => GameRng::from_entropy(),
    };

    spawn_combatants(&mut commands, &encounter, &mut rng, &mut combat_log);

    commands.insert_resource(ArenaRoster {
        total_enemies: encounter.minions.count + 1,
    });
    commands.insert_resource(rng);
    commands.insert_resource(PlayerIntent::default());
    commands.insert_resource(ActiveGravityOrb::default());
    // A leftover summary from the previous run would block outcome checks
    commands.remove_resource::<ArenaSummary>();

    info!(
        "Arena setup complete: '{}' with {} minions",
        encounter.name, encounter.minions.count
    );
}

/// Cleanup system: despawn every arena entity when leaving the scene.
pub fn cleanup_arena(mut commands: Commands, query: Query<Entity, With<ArenaEntity>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }

    commands.remove_resource::<ArenaRoster>();
    // The summary stays - the Results screen reads it
}
