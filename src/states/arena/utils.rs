//! Shared Utility Functions
//!
//! Helpers used by multiple combat modules. Having them here breaks
//! circular dependencies between the player controller, the enemy AI,
//! and the hazard simulation.

use bevy::prelude::*;

use crate::combat::log::CombatLog;

use super::components::{DamageOutcome, Enemy, EnemyState, Health, Visible};

/// Display name used for the player in combat log messages.
pub const PLAYER_NAME: &str = "Player";

/// Apply damage from the player to an enemy, with full bookkeeping.
///
/// Logs the hit, and on a killing blow runs elimination cleanup: any active
/// domain is force-ended, the body is hidden so later attacks this frame
/// cannot connect, and the death is logged. Returns the outcome so callers
/// can track damage statistics.
pub fn strike_enemy(
    commands: &mut Commands,
    combat_log: &mut CombatLog,
    action: &str,
    enemy: &mut Enemy,
    health: &mut Health,
    visible: &mut Visible,
    damage: f32,
) -> DamageOutcome {
    let outcome = health.take_damage(damage);
    match outcome {
        DamageOutcome::Ignored => {}
        DamageOutcome::Damaged => {
            combat_log.log_damage(PLAYER_NAME, &enemy.config.name, action, damage);
        }
        DamageOutcome::Eliminated => {
            combat_log.log_damage(PLAYER_NAME, &enemy.config.name, action, damage);
            finish_enemy_elimination(commands, enemy, visible);
            combat_log.log_death(&enemy.config.name, Some(PLAYER_NAME));
        }
    }
    outcome
}

/// Elimination cleanup for an enemy. Idempotent: safe to call on an enemy
/// whose domain already ended.
pub fn finish_enemy_elimination(commands: &mut Commands, enemy: &mut Enemy, visible: &mut Visible) {
    if enemy.state == EnemyState::UsingDomain {
        end_domain(commands, enemy);
    }
    visible.0 = false;
}

/// End an active domain: despawn the area markers and leave the domain
/// state. The remaining-duration timer is zeroed so a re-entry starts clean.
pub fn end_domain(commands: &mut Commands, enemy: &mut Enemy) {
    for marker in enemy.domain_markers.drain(..) {
        commands.entity(marker).despawn_recursive();
    }
    enemy.state = EnemyState::Chasing;
    enemy.timers.domain_left = 0.0;
}

/// Camera-relative movement basis projected onto the XZ plane.
///
/// Returns (forward, right) unit vectors. Falls back to world axes
/// (forward = -Z) when no camera exists, which is the headless case.
pub fn movement_basis(camera: Option<&Transform>) -> (Vec3, Vec3) {
    let forward = match camera {
        Some(cam) => {
            let mut forward = cam.rotation * -Vec3::Z;
            forward.y = 0.0;
            let forward = forward.normalize_or_zero();
            if forward == Vec3::ZERO {
                // Camera looking straight down; keep controls usable
                Vec3::NEG_Z
            } else {
                forward
            }
        }
        None => Vec3::NEG_Z,
    };
    let right = forward.cross(Vec3::Y);
    (forward, right)
}

/// Yaw-only rotation facing along `direction` in the XZ plane.
pub fn yaw_toward(direction: Vec3) -> Quat {
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_basis_without_camera_is_world_aligned() {
        let (forward, right) = movement_basis(None);
        assert_eq!(forward, Vec3::NEG_Z);
        assert_eq!(right, Vec3::X);
    }

    #[test]
    fn test_movement_basis_ignores_camera_pitch() {
        // Camera looking down at the arena from behind the player
        let camera = Transform::from_xyz(0.0, 12.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y);
        let (forward, right) = movement_basis(Some(&camera));
        assert!(forward.y.abs() < 1e-6);
        assert!((forward.length() - 1.0).abs() < 1e-5);
        assert!(right.y.abs() < 1e-6);
    }

    #[test]
    fn test_yaw_toward_faces_direction() {
        let rotation = yaw_toward(Vec3::new(1.0, 0.0, 0.0));
        let facing = rotation * Vec3::Z;
        assert!((facing - Vec3::X).length() < 1e-5);
    }
}
