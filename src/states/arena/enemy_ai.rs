//! Enemy AI Controller
//!
//! Each enemy runs a six-state machine, evaluated once per tick with a
//! strict priority:
//!
//! 1. `UsingDomain` is sticky: while active the enemy only channels area
//!    damage and counts down the duration - no movement, no attacks.
//! 2. Domain trigger: health at or below the trigger fraction with the
//!    cooldown elapsed enters the domain and ends the tick.
//! 3. Distance reassessment picks `Idle` / `AttackingDismantle` /
//!    `AttackingMelee` / `Evading` / `Chasing`, first match wins.
//! 4. The chosen state's action executes in the same tick.
//!
//! An invalid target (missing or eliminated player) drops the enemy to
//! `Idle` immediately, before any evaluation.

use bevy::prelude::*;

use crate::combat::log::{CombatLog, CombatLogEventType};

use super::components::*;
use super::encounter::EnemyArchetype;
use super::utils::{end_domain, yaw_toward, PLAYER_NAME};

/// Per-tick probability of breaking a chase into a strafe.
const STRAFE_CHANCE: f32 = 0.05;
/// Strafe duration bounds in seconds.
const STRAFE_MIN_SECS: f32 = 0.5;
const STRAFE_MAX_SECS: f32 = 1.5;
/// Facing lock after a melee hit (matches the swing animation).
const MELEE_LOCK_SECS: f32 = 0.3;

/// Outcome of the distance-based reassessment (priority step 3).
///
/// Deterministic given config, timers, and distance; the strafe roll that
/// turns `MaybeEvade` into `Evading` or `Chasing` happens in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDecision {
    Idle,
    RangedAttack,
    MeleeAttack,
    MaybeEvade,
    Chase,
}

/// Distance-based reassessment, checked in strict order.
pub fn assess_range(config: &EnemyArchetype, timers: &EnemyTimers, distance: f32) -> RangeDecision {
    if distance > config.max_chase_distance {
        return RangeDecision::Idle;
    }
    if let Some(ranged) = &config.ranged {
        if distance <= ranged.range && timers.since_ranged >= ranged.cooldown {
            return RangeDecision::RangedAttack;
        }
    }
    if config.attack_kind.includes_melee()
        && distance <= config.melee.range
        && timers.since_melee >= config.melee.cooldown
    {
        return RangeDecision::MeleeAttack;
    }
    if (config.attack_kind.includes_melee() && distance > config.min_chase_distance)
        || (config.attack_kind.is_pure_ranged() && distance < config.max_chase_distance)
    {
        return RangeDecision::MaybeEvade;
    }
    RangeDecision::Chase
}

/// Whether the domain trigger condition holds (priority step 2).
pub fn domain_ready(config: &EnemyArchetype, timers: &EnemyTimers, health_fraction: f32) -> bool {
    match &config.domain {
        Some(domain) => {
            timers.since_domain >= domain.cooldown && health_fraction <= domain.trigger_fraction
        }
        None => false,
    }
}

/// Enter the domain state: start the duration, reset the cooldown, and
/// spawn the two area markers whose lifetime is bound to the state.
fn start_domain(
    commands: &mut Commands,
    combat_log: &mut CombatLog,
    enemy_entity: Entity,
    enemy: &mut Enemy,
    position: Vec3,
) {
    let Some(domain) = enemy.config.domain.clone() else {
        return;
    };

    enemy.state = EnemyState::UsingDomain;
    enemy.timers.domain_left = domain.duration;
    enemy.timers.since_domain = 0.0;

    let mut dome_pos = position;
    dome_pos.y = 0.1;
    let dome = commands
        .spawn((
            DomainDome {
                owner: enemy_entity,
                radius: domain.radius,
            },
            Transform::from_translation(dome_pos),
            ArenaEntity,
        ))
        .id();

    let mut ring_pos = position;
    ring_pos.y = 0.2;
    let ring = commands
        .spawn((
            DomainRing {
                owner: enemy_entity,
                radius: domain.radius,
            },
            Transform::from_translation(ring_pos),
            ArenaEntity,
        ))
        .id();

    enemy.domain_markers.push(dome);
    enemy.domain_markers.push(ring);

    combat_log.log(
        CombatLogEventType::AbilityUsed,
        format!("{} unleashes its domain", enemy.config.name),
    );
}

/// The per-tick enemy AI system: timers, state selection, action execution.
pub fn update_enemy_ai(
    time: Res<Time>,
    mut commands: Commands,
    mut combat_log: ResMut<CombatLog>,
    mut rng: ResMut<GameRng>,
    mut hazards: EventWriter<SpawnHazardEvent>,
    mut players: Query<(Entity, &Transform, &mut Health, &mut PlayerCombat), Without<Enemy>>,
    mut enemies: Query<(Entity, &mut Transform, &mut Enemy, &Health), (With<Enemy>, Without<PlayerCombat>)>,
) {
    let dt = time.delta_secs();

    let player = players.get_single_mut().ok();
    let (player_entity, target_pos, mut player_health, mut player_combat) = match player {
        Some((entity, transform, health, combat)) => {
            (Some(entity), transform.translation, Some(health), Some(combat))
        }
        None => (None, Vec3::ZERO, None, None),
    };

    for (enemy_entity, mut transform, mut enemy, health) in enemies.iter_mut() {
        if health.eliminated {
            continue;
        }

        // Cooldown timers accumulate every tick, before evaluation
        enemy.timers.since_melee += dt;
        enemy.timers.since_ranged += dt;
        enemy.timers.since_domain += dt;
        if enemy.timers.melee_lock > 0.0 {
            enemy.timers.melee_lock -= dt;
        }

        // Invalid target: drop to Idle, no further evaluation this tick.
        // Re-checked per enemy so a mid-frame elimination is visible to
        // every enemy evaluated after it.
        let target_alive = player_health.as_ref().map_or(false, |h| h.is_alive());
        if player_entity.is_none() || !target_alive {
            enemy.state = EnemyState::Idle;
            continue;
        }

        let distance = transform.translation.distance(target_pos);

        // Continuously face the target unless the melee swing locks facing
        if enemy.timers.melee_lock <= 0.0 {
            let mut to_target = target_pos - transform.translation;
            to_target.y = 0.0;
            let to_target = to_target.normalize_or_zero();
            if to_target != Vec3::ZERO {
                transform.rotation = yaw_toward(to_target);
            }
        }

        // 1. Sticky domain state
        if enemy.state == EnemyState::UsingDomain {
            if let Some(domain) = enemy.config.domain.clone() {
                enemy.timers.domain_left -= dt;

                if distance <= domain.radius {
                    let amount = domain.damage_per_second * dt;
                    if let (Some(health), Some(combat)) =
                        (player_health.as_mut(), player_combat.as_mut())
                    {
                        let outcome = health.take_damage(amount);
                        if outcome != DamageOutcome::Ignored {
                            combat.damage_taken += amount;
                        }
                        if outcome == DamageOutcome::Eliminated {
                            combat_log.log_death(PLAYER_NAME, Some(&enemy.config.name));
                        }
                    }
                }

                if enemy.timers.domain_left <= 0.0 {
                    end_domain(&mut commands, &mut enemy);
                    combat_log.log(
                        CombatLogEventType::AbilityUsed,
                        format!("{}'s domain collapses", enemy.config.name),
                    );
                }
            } else {
                // State without the ability should be unreachable; recover
                end_domain(&mut commands, &mut enemy);
            }
            continue;
        }

        // 2. Domain trigger
        if domain_ready(&enemy.config, &enemy.timers, health.fraction()) {
            start_domain(
                &mut commands,
                &mut combat_log,
                enemy_entity,
                &mut enemy,
                transform.translation,
            );
            continue;
        }

        // 3. Distance reassessment
        match assess_range(&enemy.config, &enemy.timers, distance) {
            RangeDecision::Idle => enemy.state = EnemyState::Idle,
            RangeDecision::RangedAttack => enemy.state = EnemyState::AttackingDismantle,
            RangeDecision::MeleeAttack => enemy.state = EnemyState::AttackingMelee,
            RangeDecision::MaybeEvade => {
                let already_strafing =
                    enemy.state == EnemyState::Evading && enemy.timers.strafe_left > 0.0;
                if already_strafing {
                    // Keep strafing until the timer elapses
                } else if rng.random_f32() < STRAFE_CHANCE {
                    enemy.state = EnemyState::Evading;
                    enemy.timers.strafe_left = rng.random_range(STRAFE_MIN_SECS, STRAFE_MAX_SECS);
                    enemy.timers.strafe_direction = rng.random_sign();
                } else {
                    enemy.state = EnemyState::Chasing;
                }
            }
            RangeDecision::Chase => enemy.state = EnemyState::Chasing,
        }

        // 4. Execute the chosen state's action
        match enemy.state {
            EnemyState::Chasing => {
                if enemy.config.move_speed > 0.0 {
                    let mut direction = target_pos - transform.translation;
                    direction.y = 0.0;
                    let direction = direction.normalize_or_zero();
                    let step = direction * enemy.config.move_speed * dt;
                    transform.translation.x += step.x;
                    transform.translation.z += step.z;
                }
            }
            EnemyState::Evading => {
                if enemy.timers.strafe_left > 0.0 {
                    enemy.timers.strafe_left -= dt;
                    let right = transform.rotation * Vec3::X;
                    let step =
                        right * enemy.config.strafe_speed() * enemy.timers.strafe_direction * dt;
                    transform.translation.x += step.x;
                    transform.translation.z += step.z;
                } else {
                    enemy.state = EnemyState::Chasing;
                }
            }
            EnemyState::AttackingMelee => {
                // Guaranteed connect: range was verified during selection
                enemy.timers.since_melee = 0.0;
                enemy.timers.melee_lock = MELEE_LOCK_SECS;
                let damage = enemy.config.melee.damage;
                if let (Some(health), Some(combat)) =
                    (player_health.as_mut(), player_combat.as_mut())
                {
                    let outcome = health.take_damage(damage);
                    if outcome != DamageOutcome::Ignored {
                        combat.damage_taken += damage;
                        combat_log.log_damage(&enemy.config.name, PLAYER_NAME, "Melee", damage);
                    }
                    if outcome == DamageOutcome::Eliminated {
                        combat_log.log_death(PLAYER_NAME, Some(&enemy.config.name));
                    }
                }
                enemy.state = EnemyState::Chasing;
            }
            EnemyState::AttackingDismantle => {
                if let (Some(ranged), Some(target)) = (enemy.config.ranged.clone(), player_entity) {
                    enemy.timers.since_ranged = 0.0;
                    let direction =
                        (target_pos - transform.translation).normalize_or_zero();
                    hazards.send(SpawnHazardEvent {
                        position: transform.translation,
                        direction,
                        kind: ranged.hazard,
                        damage: ranged.damage,
                        speed: ranged.speed,
                        target,
                    });
                    let action = match ranged.hazard {
                        HazardKind::Dismantle => "Dismantle",
                        HazardKind::Bolt => "a bolt",
                    };
                    combat_log.log(
                        CombatLogEventType::AbilityUsed,
                        format!("{} looses {}", enemy.config.name, action),
                    );
                }
                enemy.state = EnemyState::Chasing;
            }
            EnemyState::Idle | EnemyState::UsingDomain => {}
        }
    }
}
