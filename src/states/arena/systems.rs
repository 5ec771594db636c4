//! Combat Systems API
//!
//! This module provides a stable API for the combat simulation systems.
//! Both graphical and headless modes should import from here rather than
//! directly from internal modules, allowing internal refactoring without
//! breaking external consumers.
//!
//! ## Tick Phases
//!
//! Combat systems run in four ordered phases each frame:
//!
//! 1. **PlayerActions** - player timer/energy ticking, queued action
//!    resolution, movement
//! 2. **SkillHazard** - the active gravity orb (steering, pull, damage,
//!    expiry/explosion)
//! 3. **EnemyAi** - per-enemy state selection and action, then hazard
//!    spawn requests
//! 4. **HazardSweep** - bolt/dismantle motion and hits, cosmetic effects,
//!    and the liveness sweep that removes resolved hazards and eliminated
//!    enemies
//!
//! Damage applied in an earlier phase is visible to every later check in
//! the same frame.

use bevy::prelude::*;

// Re-export combat systems and types from internal modules.
// This provides a stable API - internal renames only require updating
// these re-exports.

// === Phase 1: Player Actions ===
pub use super::player::move_player;
pub use super::player::resolve_player_actions;
pub use super::player::tick_player_combat;

// === Phase 2: Skill Hazard ===
pub use super::hazards::update_gravity_orb;

// === Phase 3: Enemy AI ===
pub use super::enemy_ai::update_enemy_ai;
pub use super::hazards::spawn_hazards;

// === Phase 4: Hazard Sweep ===
pub use super::effects::play_effects;
pub use super::effects::update_cosmetic_effects;
pub use super::hazards::sweep_hazards;
pub use super::hazards::update_bolts;
pub use super::hazards::update_dismantle_bolts;

// === Components and Resources ===
pub use super::components::{
    ActiveGravityOrb, ArenaCamera, ArenaEntity, Bolt, CursedEnergy, DismantleBolt, Enemy,
    EnemyState, GameRng, GravityOrb, Health, InfinityGuard, PlayerCombat, PlayerIntent,
    SpawnHazardEvent, Visible,
};
pub use super::effects::EffectRequest;

/// System set labels for combat phase ordering.
///
/// Use these to order custom systems relative to the combat loop (e.g.,
/// input before `PlayerActions`, outcome checks after `HazardSweep`).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatPhase {
    /// Phase 1: player timers, action resolution, movement
    PlayerActions,
    /// Phase 2: gravity orb tick
    SkillHazard,
    /// Phase 3: enemy state selection and actions
    EnemyAi,
    /// Phase 4: bolt motion, effects, liveness sweep
    HazardSweep,
}

/// Configures the ordering between combat phases.
///
/// Call this once during app setup before adding combat systems.
pub fn configure_combat_phase_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CombatPhase::PlayerActions,
            CombatPhase::SkillHazard,
            CombatPhase::EnemyAi,
            CombatPhase::HazardSweep,
        )
            .chain(),
    );
}

/// Adds the core combat simulation systems and their events to the app.
///
/// These are the systems needed for the combat loop to function. Both
/// graphical and headless modes need these.
///
/// # Arguments
/// * `app` - The Bevy App to add systems to
/// * `run_condition` - A run condition (e.g., `in_state(GameState::Arena)`)
///
/// # Example
/// ```ignore
/// // For graphical mode
/// add_core_combat_systems(&mut app, in_state(GameState::Arena));
///
/// // For headless mode (always run)
/// add_core_combat_systems(&mut app, || true);
/// ```
pub fn add_core_combat_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_event::<SpawnHazardEvent>()
        .add_event::<EffectRequest>()
        .init_resource::<PlayerIntent>()
        .init_resource::<ActiveGravityOrb>();

    // Phase 1: Player Actions
    app.add_systems(
        Update,
        (tick_player_combat, resolve_player_actions, move_player)
            .chain()
            .in_set(CombatPhase::PlayerActions)
            .run_if(run_condition.clone()),
    );

    // Phase 2: Skill Hazard
    app.add_systems(
        Update,
        update_gravity_orb
            .in_set(CombatPhase::SkillHazard)
            .run_if(run_condition.clone()),
    );

    // Phase 3: Enemy AI
    app.add_systems(
        Update,
        (update_enemy_ai, spawn_hazards)
            .chain()
            .in_set(CombatPhase::EnemyAi)
            .run_if(run_condition.clone()),
    );

    // Phase 4: Hazard Sweep
    app.add_systems(
        Update,
        (
            update_bolts,
            update_dismantle_bolts,
            play_effects,
            update_cosmetic_effects,
            sweep_hazards,
        )
            .chain()
            .in_set(CombatPhase::HazardSweep)
            .run_if(run_condition),
    );
}
