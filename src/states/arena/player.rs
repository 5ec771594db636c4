//! Player Action Controller
//!
//! Resolves the player's queued inputs each tick:
//! - Basic strike and punch, gated by independent cooldowns and mutual
//!   exclusion while either is active
//! - Gravity orb activation, gated by the skill cooldown and the cursed
//!   energy pool (atomic: cooldown reset + energy cost + orb spawn, or
//!   nothing)
//! - Movement, jumping, and the circular arena boundary
//!
//! All gating failures are silent no-ops; refusals are reported through
//! `info!` diagnostics, never as errors.

use bevy::prelude::*;

use crate::combat::log::{CombatLog, CombatLogEventType};

use super::components::*;
use super::effects::{EffectOptions, EffectRequest};
use super::encounter::EncounterConfig;
use super::utils::{movement_basis, strike_enemy, yaw_toward, PLAYER_NAME};

/// Downward acceleration applied to the player while airborne.
const GRAVITY: f32 = -20.0;

/// The gravity orb spawns this far in front of the player...
const ORB_SPAWN_DISTANCE: f32 = 3.0;
/// ...at this height above the player's feet.
const ORB_SPAWN_HEIGHT: f32 = 1.5;

/// Forward offset factor for the punch impact effect.
const PUNCH_EFFECT_OFFSET: f32 = 0.7;

/// Tick player timers and the cursed-energy pool, and advance arena time.
///
/// Runs first in the player phase so that cooldowns finishing this tick can
/// gate actions resolved in the same tick.
pub fn tick_player_combat(
    time: Res<Time>,
    mut combat_log: ResMut<CombatLog>,
    mut players: Query<(&mut PlayerCombat, &mut CursedEnergy, &Health)>,
) {
    let dt = time.delta_secs();
    combat_log.arena_time += dt;

    for (mut combat, mut energy, health) in players.iter_mut() {
        if health.eliminated {
            continue;
        }
        energy.regenerate(dt);
        combat.tick(dt);
        energy.debug_validate();
        health.debug_validate();
    }
}

/// Resolve queued player actions against the current world state.
pub fn resolve_player_actions(
    mut commands: Commands,
    mut combat_log: ResMut<CombatLog>,
    mut intent: ResMut<PlayerIntent>,
    mut active_orb: ResMut<ActiveGravityOrb>,
    mut effects: EventWriter<EffectRequest>,
    mut players: Query<
        (
            &Transform,
            &mut PlayerCombat,
            &mut CursedEnergy,
            &Health,
            &mut InfinityGuard,
        ),
        Without<Enemy>,
    >,
    mut enemies: Query<
        (&Transform, &mut Enemy, &mut Health, &mut Visible),
        (With<Enemy>, Without<PlayerCombat>),
    >,
) {
    let Ok((player_transform, mut combat, mut energy, health, mut guard)) =
        players.get_single_mut()
    else {
        intent.clear_actions();
        return;
    };

    guard.active = intent.guard;

    let player_pos = player_transform.translation;
    let facing = player_transform.rotation * Vec3::Z;

    // Basic strike: hits every opponent in range, no single-target
    // restriction and no liveness filter (damage application itself
    // ignores the eliminated).
    if intent.strike && combat.try_begin_strike(health.eliminated) {
        combat_log.log(
            CombatLogEventType::AbilityUsed,
            format!("{} strikes", PLAYER_NAME),
        );
        for (enemy_transform, mut enemy, mut enemy_health, mut visible) in enemies.iter_mut() {
            let distance = player_pos.distance(enemy_transform.translation);
            if distance <= combat.attack_range {
                let outcome = strike_enemy(
                    &mut commands,
                    &mut combat_log,
                    "Strike",
                    &mut enemy,
                    &mut enemy_health,
                    &mut visible,
                    combat.attack_damage,
                );
                if outcome != DamageOutcome::Ignored {
                    combat.damage_dealt += combat.attack_damage;
                }
            }
        }
    }

    // Punch: shorter range, heavier hit, only connects with visible
    // living opponents.
    if intent.punch && combat.try_begin_punch(health.eliminated) {
        combat_log.log(
            CombatLogEventType::AbilityUsed,
            format!("{} punches", PLAYER_NAME),
        );

        let effect_pos =
            player_pos + facing * (combat.punch_range * PUNCH_EFFECT_OFFSET) + Vec3::Y;
        effects.send(EffectRequest {
            name: "impact_ring".to_string(),
            position: effect_pos,
            options: EffectOptions {
                color: Color::WHITE,
                duration: 0.15,
                scale: 1.5,
            },
        });

        for (enemy_transform, mut enemy, mut enemy_health, mut visible) in enemies.iter_mut() {
            if !enemy_health.is_alive() || !visible.0 {
                continue;
            }
            let distance = player_pos.distance(enemy_transform.translation);
            if distance <= combat.punch_range {
                let outcome = strike_enemy(
                    &mut commands,
                    &mut combat_log,
                    "Punch",
                    &mut enemy,
                    &mut enemy_health,
                    &mut visible,
                    combat.punch_damage,
                );
                if outcome != DamageOutcome::Ignored {
                    combat.damage_dealt += combat.punch_damage;
                }
            }
        }
    }

    // Gravity orb activation. The single-instance rule is enforced here,
    // by the owner of the hazard collection, not by the gate itself.
    if intent.activate_skill {
        if active_orb.0.is_some() {
            info!("Gravity orb already active - activation refused");
        } else {
            match combat.skill_gate(&energy, health.eliminated) {
                SkillGate::Ready => {
                    if combat.commit_skill(&mut energy) {
                        let spawn_pos =
                            player_pos + facing * ORB_SPAWN_DISTANCE + Vec3::Y * ORB_SPAWN_HEIGHT;
                        let orb = commands
                            .spawn((
                                GravityOrb::default(),
                                Transform::from_translation(spawn_pos),
                                ArenaEntity,
                            ))
                            .id();
                        active_orb.0 = Some(orb);
                        combat_log.log(
                            CombatLogEventType::HazardSpawned,
                            format!("{} unleashes a gravity orb", PLAYER_NAME),
                        );
                    }
                }
                SkillGate::OnCooldown => {
                    info!(
                        "Gravity orb on cooldown ({:.1}s remaining)",
                        combat.skill_cooldown_left
                    );
                }
                SkillGate::NotEnoughEnergy => {
                    info!(
                        "Not enough cursed energy for the gravity orb ({:.0}/{:.0})",
                        energy.current, combat.skill_cost
                    );
                }
                SkillGate::Eliminated => {}
            }
        }
    }

    if intent.jump && !health.eliminated && combat.grounded {
        combat.vertical_velocity = combat.jump_force;
        combat.grounded = false;
    }

    intent.clear_actions();
}

/// Apply player movement, vertical physics, and the arena boundary.
pub fn move_player(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    encounter: Res<EncounterConfig>,
    camera: Query<&Transform, (With<ArenaCamera>, Without<PlayerCombat>)>,
    mut players: Query<(&mut Transform, &mut PlayerCombat, &Health), Without<ArenaCamera>>,
) {
    let dt = time.delta_secs();
    let (forward, right) = movement_basis(camera.get_single().ok());

    for (mut transform, mut combat, health) in players.iter_mut() {
        if health.eliminated {
            continue;
        }

        let mut direction = forward * intent.move_input.y + right * intent.move_input.x;
        if direction.length_squared() > 0.01 {
            direction = direction.normalize();
            transform.translation += direction * combat.move_speed * dt;
            transform.rotation = yaw_toward(direction);
        }

        // Vertical integration and ground snap
        combat.vertical_velocity += GRAVITY * dt;
        transform.translation.y += combat.vertical_velocity * dt;
        if transform.translation.y <= 0.0 {
            transform.translation.y = 0.0;
            combat.vertical_velocity = 0.0;
            combat.grounded = true;
        }

        // Circular arena boundary
        let xz = Vec2::new(transform.translation.x, transform.translation.z);
        if xz.length() > encounter.arena_radius {
            let clamped = xz.normalize() * encounter.arena_radius;
            transform.translation.x = clamped.x;
            transform.translation.z = clamped.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldowns_recover_after_full_cycle() {
        let mut combat = PlayerCombat::default();
        assert!(combat.try_begin_strike(false));
        assert!(!combat.try_begin_punch(false));

        // Ride out the longest cooldown; both actions come back
        combat.tick(combat.punch_cooldown.max(combat.attack_cooldown) + 0.01);
        assert!(!combat.is_attacking);
        assert!(combat.try_begin_punch(false));
    }

    #[test]
    fn test_skill_cooldown_may_undershoot_zero() {
        // Gating only checks > 0, so ticking far past expiry is harmless
        let mut combat = PlayerCombat::default();
        let mut energy = CursedEnergy::new(100.0, 8.0);
        assert!(combat.commit_skill(&mut energy));
        combat.tick(combat.skill_cooldown * 3.0);
        assert_eq!(combat.skill_gate(&energy, false), SkillGate::Ready);
    }
}
