//! Hazard Simulation
//!
//! Three hazard families, all with the same terminal lifecycle
//! (active-to-resolved, despawned by the sweep):
//!
//! - **Bolt**: straight minion shot; decelerates quadratically near a
//!   target holding the infinity guard
//! - **Dismantle bolt**: straight slash that damages once at proximity
//!   and goes visually inert
//! - **Gravity orb**: the player's steerable hazard; pulls and burns
//!   nearby enemies, then explodes exactly once when its duration elapses

use bevy::prelude::*;

use crate::combat::log::{CombatLog, CombatLogEventType};

use super::components::*;
use super::effects::{EffectOptions, EffectRequest};
use super::utils::{finish_enemy_elimination, movement_basis, strike_enemy, PLAYER_NAME};

/// Seconds before an unresolved bolt or dismantle expires as a miss.
pub const BOLT_LIFETIME: f32 = 3.0;
/// A bolt connects inside this distance (the player's body radius).
pub const BOLT_HIT_RADIUS: f32 = 1.5;
/// A dismantle slash connects inside this distance.
pub const DISMANTLE_HIT_RADIUS: f32 = 1.0;
/// Distance at which the infinity guard starts decelerating bolts.
pub const GUARD_AURA_RADIUS: f32 = 5.0;

/// Speed multiplier for a bolt approaching a guarded target.
///
/// Quadratic-feel falloff: full speed at the aura edge, zero at the hit
/// radius, so a guarded bolt stalls just short of connecting.
pub fn guard_speed_factor(distance: f32, hit_radius: f32, aura_radius: f32) -> f32 {
    ((distance - hit_radius) / (aura_radius - hit_radius)).max(0.0)
}

/// Consume `SpawnHazardEvent`s emitted by the enemy AI and materialize the
/// hazard entities.
pub fn spawn_hazards(
    mut commands: Commands,
    mut combat_log: ResMut<CombatLog>,
    mut requests: EventReader<SpawnHazardEvent>,
) {
    for request in requests.read() {
        match request.kind {
            HazardKind::Bolt => {
                commands.spawn((
                    Bolt {
                        direction: request.direction,
                        speed: request.speed,
                        damage: request.damage,
                        age: 0.0,
                        lifetime: BOLT_LIFETIME,
                        target: request.target,
                        resolved: false,
                    },
                    Transform::from_translation(request.position),
                    ArenaEntity,
                ));
                combat_log.log(
                    CombatLogEventType::HazardSpawned,
                    "Bolt loosed at the player".to_string(),
                );
            }
            HazardKind::Dismantle => {
                commands.spawn((
                    DismantleBolt {
                        direction: request.direction,
                        speed: request.speed,
                        damage: request.damage,
                        age: 0.0,
                        lifetime: BOLT_LIFETIME,
                        target: request.target,
                        hit: false,
                        resolved: false,
                    },
                    Transform::from_translation(request.position),
                    ArenaEntity,
                ));
                combat_log.log(
                    CombatLogEventType::HazardSpawned,
                    "Dismantle slash loosed at the player".to_string(),
                );
            }
        }
    }
}

/// Advance the gravity orb: steering, cosmetic spin, pull, damage over
/// time, and the single delayed explosion.
pub fn update_gravity_orb(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    mut commands: Commands,
    mut combat_log: ResMut<CombatLog>,
    mut effects: EventWriter<EffectRequest>,
    camera: Query<&Transform, (With<ArenaCamera>, Without<GravityOrb>, Without<Enemy>)>,
    mut orbs: Query<(&mut Transform, &mut GravityOrb), (Without<Enemy>, Without<ArenaCamera>)>,
    mut enemies: Query<
        (&mut Transform, &mut Enemy, &mut Health, &mut Visible),
        (With<Enemy>, Without<GravityOrb>, Without<ArenaCamera>),
    >,
    mut players: Query<&mut PlayerCombat>,
) {
    let dt = time.delta_secs();
    let (forward, right) = movement_basis(camera.get_single().ok());

    for (mut orb_transform, mut orb) in orbs.iter_mut() {
        if orb.resolved {
            continue;
        }
        orb.age += dt;

        // Player-steered drift, camera-relative like regular movement
        let mut steer = forward * intent.orb_steer.y + right * intent.orb_steer.x;
        if steer.length_squared() > 0.01 {
            steer = steer.normalize();
            orb_transform.translation += steer * orb.move_speed * dt;
        }

        // Cosmetic spin only; no gameplay effect
        orb_transform.rotate_y(orb.spin_speed * dt);
        orb_transform.rotate_x(orb.spin_speed * 0.6 * dt);

        let orb_pos = orb_transform.translation;

        // Pull and burn every living enemy inside the gravity radius
        for (mut enemy_transform, mut enemy, mut health, mut visible) in enemies.iter_mut() {
            if !health.is_alive() || !visible.0 {
                continue;
            }
            let distance = orb_pos.distance(enemy_transform.translation);
            if distance > orb.gravity_radius {
                continue;
            }

            let pull_direction = (orb_pos - enemy_transform.translation).normalize_or_zero();
            let pull_force = orb.gravity_strength / (distance * distance + 1.0);
            enemy_transform.translation += pull_direction * pull_force * dt;

            let amount = orb.damage_per_second * dt;
            let outcome = health.take_damage(amount);
            if outcome != DamageOutcome::Ignored {
                if let Ok(mut combat) = players.get_single_mut() {
                    combat.damage_dealt += amount;
                }
            }
            if outcome == DamageOutcome::Eliminated {
                // Pull damage is not logged per tick, only the kill
                finish_enemy_elimination(&mut commands, &mut enemy, &mut visible);
                combat_log.log_death(&enemy.config.name, Some(PLAYER_NAME));
            }
        }

        // Delayed explosion, applied exactly once, then resolution
        if orb.age >= orb.duration && !orb.exploded {
            orb.exploded = true;

            effects.send(EffectRequest {
                name: "orb_burst".to_string(),
                position: orb_pos,
                options: EffectOptions {
                    color: Color::srgb(0.0, 0.67, 1.0),
                    duration: 0.5,
                    scale: orb.explosion_radius * 1.5,
                },
            });

            for (enemy_transform, mut enemy, mut health, mut visible) in enemies.iter_mut() {
                if !health.is_alive() || !visible.0 {
                    continue;
                }
                let distance = orb_pos.distance(enemy_transform.translation);
                if distance <= orb.explosion_radius {
                    let outcome = strike_enemy(
                        &mut commands,
                        &mut combat_log,
                        "Gravity burst",
                        &mut enemy,
                        &mut health,
                        &mut visible,
                        orb.explosion_damage,
                    );
                    if outcome != DamageOutcome::Ignored {
                        if let Ok(mut combat) = players.get_single_mut() {
                            combat.damage_dealt += orb.explosion_damage;
                        }
                    }
                }
            }

            combat_log.log(
                CombatLogEventType::AbilityUsed,
                "Gravity orb detonates".to_string(),
            );
            orb.resolved = true;
        }
    }
}

/// Advance straight bolts: guard deceleration, motion, hit detection,
/// lifetime expiry.
pub fn update_bolts(
    time: Res<Time>,
    mut combat_log: ResMut<CombatLog>,
    mut bolts: Query<(&mut Transform, &mut Bolt), Without<PlayerCombat>>,
    mut players: Query<
        (&Transform, &mut Health, &mut PlayerCombat, &InfinityGuard),
        Without<Bolt>,
    >,
) {
    let dt = time.delta_secs();

    for (mut transform, mut bolt) in bolts.iter_mut() {
        if bolt.resolved {
            continue;
        }

        bolt.age += dt;
        if bolt.age > bolt.lifetime {
            bolt.resolved = true;
            continue;
        }

        // A vanished target never stops the clock: the bolt keeps flying
        // and expires on lifetime
        let Ok((player_transform, mut health, mut combat, guard)) = players.get_mut(bolt.target)
        else {
            transform.translation += bolt.direction * bolt.speed * dt;
            continue;
        };

        let mut speed = bolt.speed;
        let distance = transform.translation.distance(player_transform.translation);
        if guard.active && distance < GUARD_AURA_RADIUS {
            speed *= guard_speed_factor(distance, BOLT_HIT_RADIUS, GUARD_AURA_RADIUS);
        }

        transform.translation += bolt.direction * speed * dt;

        let distance = transform.translation.distance(player_transform.translation);
        if distance < BOLT_HIT_RADIUS {
            let outcome = health.take_damage(bolt.damage);
            if outcome != DamageOutcome::Ignored {
                combat.damage_taken += bolt.damage;
                combat_log.log_damage("Bolt", PLAYER_NAME, "hit", bolt.damage);
            }
            if outcome == DamageOutcome::Eliminated {
                combat_log.log_death(PLAYER_NAME, Some("a bolt"));
            }
            bolt.resolved = true;
        }
    }
}

/// Advance dismantle bolts: motion, single-application damage, inertness.
pub fn update_dismantle_bolts(
    time: Res<Time>,
    mut combat_log: ResMut<CombatLog>,
    mut bolts: Query<(&mut Transform, &mut DismantleBolt), Without<PlayerCombat>>,
    mut players: Query<(&Transform, &mut Health, &mut PlayerCombat), Without<DismantleBolt>>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut bolt) in bolts.iter_mut() {
        if bolt.resolved {
            continue;
        }

        bolt.age += dt;
        if bolt.age > bolt.lifetime {
            bolt.resolved = true;
            continue;
        }

        transform.translation += bolt.direction * bolt.speed * dt;

        // Defensive target check: a missing or eliminated player means no
        // damage, but the slash still ages out above
        let Ok((player_transform, mut health, mut combat)) = players.get_mut(bolt.target) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let distance = transform.translation.distance(player_transform.translation);
        if distance < DISMANTLE_HIT_RADIUS {
            let outcome = health.take_damage(bolt.damage);
            if outcome != DamageOutcome::Ignored {
                combat.damage_taken += bolt.damage;
                combat_log.log_damage("Dismantle", PLAYER_NAME, "slash", bolt.damage);
            }
            if outcome == DamageOutcome::Eliminated {
                combat_log.log_death(PLAYER_NAME, Some("a dismantle slash"));
            }
            // Damage applies exactly once; the slash goes inert instantly
            bolt.hit = true;
            bolt.resolved = true;
        }
    }
}

/// End-of-tick liveness sweep: despawn resolved hazards and eliminated
/// enemies, and release the single-orb slot.
pub fn sweep_hazards(
    mut commands: Commands,
    mut active_orb: ResMut<ActiveGravityOrb>,
    bolts: Query<(Entity, &Bolt)>,
    dismantles: Query<(Entity, &DismantleBolt)>,
    orbs: Query<(Entity, &GravityOrb)>,
    mut enemies: Query<(Entity, &mut Enemy, &Health)>,
) {
    for (entity, bolt) in bolts.iter() {
        if bolt.resolved {
            commands.entity(entity).despawn_recursive();
        }
    }
    for (entity, bolt) in dismantles.iter() {
        if bolt.resolved {
            commands.entity(entity).despawn_recursive();
        }
    }
    for (entity, orb) in orbs.iter() {
        if orb.resolved {
            commands.entity(entity).despawn_recursive();
            if active_orb.0 == Some(entity) {
                active_orb.0 = None;
            }
        }
    }
    for (entity, mut enemy, health) in enemies.iter_mut() {
        if health.eliminated {
            // Markers are normally ended at the point of elimination; this
            // also catches any path that only flagged the health pool
            for marker in enemy.domain_markers.drain(..) {
                commands.entity(marker).despawn_recursive();
            }
            commands.entity(entity).despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_factor_full_speed_at_aura_edge() {
        let factor = guard_speed_factor(GUARD_AURA_RADIUS, BOLT_HIT_RADIUS, GUARD_AURA_RADIUS);
        assert!((factor - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_guard_factor_zero_at_hit_radius() {
        let factor = guard_speed_factor(BOLT_HIT_RADIUS, BOLT_HIT_RADIUS, GUARD_AURA_RADIUS);
        assert_eq!(factor, 0.0);
    }

    #[test]
    fn test_guard_factor_clamped_inside_hit_radius() {
        // Never negative, even if the bolt somehow slips inside the body
        let factor = guard_speed_factor(0.5, BOLT_HIT_RADIUS, GUARD_AURA_RADIUS);
        assert_eq!(factor, 0.0);
    }

    #[test]
    fn test_guard_factor_midpoint() {
        let midpoint = (BOLT_HIT_RADIUS + GUARD_AURA_RADIUS) / 2.0;
        let factor = guard_speed_factor(midpoint, BOLT_HIT_RADIUS, GUARD_AURA_RADIUS);
        assert!((factor - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_orb_defaults_explode_bigger_than_they_pull_close() {
        // Explosion reaches beyond the immediate pull well floor but stays
        // inside the gravity radius, matching the intended burst feel
        let orb = GravityOrb::default();
        assert!(orb.explosion_radius < orb.gravity_radius);
        assert!(orb.explosion_damage > orb.damage_per_second);
    }
}
