//! Arena Flow
//!
//! Outcome detection and the end-of-run summary:
//! - Player eliminated: defeat
//! - Every enemy eliminated: victory
//! - (Headless only) duration budget exhausted: timeout
//!
//! When the run ends in graphical mode, an `ArenaSummary` resource is
//! inserted and the game transitions to the Results screen.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::states::GameState;

use super::components::{CursedEnergy, Enemy, Health, PlayerCombat};

/// How an arena run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaOutcome {
    PlayerVictory,
    PlayerDefeat,
    Timeout,
}

/// Number of enemies the encounter started with, set at spawn time.
#[derive(Resource, Default)]
pub struct ArenaRoster {
    pub total_enemies: usize,
}

/// Final statistics of a completed run, consumed by the Results screen
/// and embedded in the headless arena report.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSummary {
    pub outcome: ArenaOutcome,
    pub elapsed: f32,
    pub player_health: f32,
    pub player_max_health: f32,
    pub player_energy: f32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub enemies_defeated: usize,
    pub enemies_total: usize,
}

/// Build the run summary from current world state.
pub fn build_summary(
    outcome: ArenaOutcome,
    elapsed: f32,
    roster: &ArenaRoster,
    player: Option<(&Health, &CursedEnergy, &PlayerCombat)>,
    enemies_alive: usize,
) -> ArenaSummary {
    let (player_health, player_max_health, player_energy, damage_dealt, damage_taken) =
        match player {
            Some((health, energy, combat)) => (
                health.current,
                health.max,
                energy.current,
                combat.damage_dealt,
                combat.damage_taken,
            ),
            None => (0.0, 0.0, 0.0, 0.0, 0.0),
        };

    ArenaSummary {
        outcome,
        elapsed,
        player_health,
        player_max_health,
        player_energy,
        damage_dealt,
        damage_taken,
        enemies_defeated: roster.total_enemies.saturating_sub(enemies_alive),
        enemies_total: roster.total_enemies,
    }
}

/// Detect the end of a graphical run and transition to Results.
pub fn check_arena_end(
    mut commands: Commands,
    mut combat_log: ResMut<CombatLog>,
    mut next_state: ResMut<NextState<GameState>>,
    roster: Res<ArenaRoster>,
    summary: Option<Res<ArenaSummary>>,
    players: Query<(&Health, &CursedEnergy, &PlayerCombat), Without<Enemy>>,
    enemies: Query<&Health, With<Enemy>>,
) {
    // Already decided - waiting on the state transition
    if summary.is_some() {
        return;
    }

    let Ok((player_health, player_energy, player_combat)) = players.get_single() else {
        return;
    };

    let enemies_alive = enemies.iter().filter(|h| h.is_alive()).count();

    let outcome = if !player_health.is_alive() {
        Some(ArenaOutcome::PlayerDefeat)
    } else if enemies_alive == 0 {
        Some(ArenaOutcome::PlayerVictory)
    } else {
        None
    };

    let Some(outcome) = outcome else {
        return;
    };

    let message = match outcome {
        ArenaOutcome::PlayerVictory => "Arena cleared!",
        ArenaOutcome::PlayerDefeat => "The player has fallen",
        ArenaOutcome::Timeout => "Run timed out",
    };
    combat_log.log(CombatLogEventType::ArenaEvent, message.to_string());
    info!("{}", message);

    let summary = build_summary(
        outcome,
        combat_log.arena_time,
        &roster,
        Some((player_health, player_energy, player_combat)),
        enemies_alive,
    );
    commands.insert_resource(summary);
    next_state.set(GameState::Results);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_defeated_enemies() {
        let roster = ArenaRoster { total_enemies: 6 };
        let health = Health::new(250.0);
        let energy = CursedEnergy::new(100.0, 8.0);
        let combat = PlayerCombat::default();

        let summary = build_summary(
            ArenaOutcome::PlayerVictory,
            42.0,
            &roster,
            Some((&health, &energy, &combat)),
            0,
        );
        assert_eq!(summary.enemies_defeated, 6);
        assert_eq!(summary.enemies_total, 6);
        assert_eq!(summary.outcome, ArenaOutcome::PlayerVictory);
    }

    #[test]
    fn test_summary_without_player_reports_zeroes() {
        let roster = ArenaRoster { total_enemies: 3 };
        let summary = build_summary(ArenaOutcome::Timeout, 300.0, &roster, None, 2);
        assert_eq!(summary.player_health, 0.0);
        assert_eq!(summary.enemies_defeated, 1);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let roster = ArenaRoster { total_enemies: 1 };
        let summary = build_summary(ArenaOutcome::PlayerDefeat, 10.0, &roster, None, 1);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("PlayerDefeat"));
    }
}
