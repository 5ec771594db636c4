//! Simulation tests for the combat core
//!
//! These drive the real combat systems inside a minimal Bevy app with a
//! manually stepped clock, verifying the frame-level behavior the spec of
//! the game depends on: hazard lifecycles, domain activation, and
//! simultaneous melee hits.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use cursedarena::combat::log::CombatLog;
use cursedarena::states::arena::encounter::{
    AttackKind, DomainAbility, EncounterConfig, EnemyArchetype, MeleeAttack,
};
use cursedarena::states::arena::{
    add_core_combat_systems, configure_combat_phase_ordering, ActiveGravityOrb, Bolt, CursedEnergy,
    DomainDome, Enemy, EnemyState, GameRng, GravityOrb, Health, InfinityGuard, PlayerCombat,
    Visible,
};

/// Fixed step used by these tests (10 Hz keeps iteration counts small).
const STEP: f64 = 0.1;

/// Build a minimal app with the combat systems and a manual clock.
fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            STEP,
        )))
        .init_resource::<CombatLog>()
        .insert_resource(GameRng::from_seed(7))
        .insert_resource(EncounterConfig::default());

    configure_combat_phase_ordering(&mut app);
    add_core_combat_systems(&mut app, || true);

    // First update initializes the clock (delta = 0); subsequent updates
    // advance by STEP
    app.update();
    app
}

fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            PlayerCombat::default(),
            Health::new(250.0),
            CursedEnergy::new(100.0, 8.0),
            InfinityGuard::default(),
            Visible(true),
        ))
        .id()
}

/// A melee-only brawler archetype with cooldowns ready to fire.
fn brawler() -> EnemyArchetype {
    EnemyArchetype {
        name: "Brawler".to_string(),
        max_health: 60.0,
        size: 1.5,
        color: [0.8, 0.2, 0.2],
        move_speed: 3.0,
        strafe_speed: None,
        min_chase_distance: 1.0,
        max_chase_distance: 30.0,
        attack_kind: AttackKind::Melee,
        melee: MeleeAttack {
            range: 2.5,
            damage: 15.0,
            cooldown: 1.5,
        },
        ranged: None,
        domain: None,
    }
}

fn spawn_enemy(app: &mut App, archetype: EnemyArchetype, position: Vec3) -> Entity {
    let max_health = archetype.max_health;
    let mut enemy = {
        let mut rng = GameRng::from_seed(0);
        Enemy::new(archetype, &mut rng)
    };
    // Cooldowns start elapsed so the first eligible tick fires
    enemy.timers.since_melee = enemy.config.melee.cooldown;
    if let Some(ranged) = &enemy.config.ranged {
        enemy.timers.since_ranged = ranged.cooldown;
    }
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            enemy,
            Health::new(max_health),
            Visible(true),
        ))
        .id()
}

// =============================================================================
// Hazard lifecycles
// =============================================================================

#[test]
fn test_bolt_expires_as_miss_without_damage() {
    let mut app = test_app();
    let player = spawn_player(&mut app, Vec3::ZERO);

    // Bolt aimed away from the player: it can never connect
    let bolt = app
        .world_mut()
        .spawn((
            Transform::from_xyz(10.0, 1.0, 0.0),
            Bolt {
                direction: Vec3::X,
                speed: 25.0,
                damage: 10.0,
                age: 0.0,
                lifetime: 3.0,
                target: player,
                resolved: false,
            },
        ))
        .id();

    // Tick past the lifetime (3.1 simulated seconds)
    for _ in 0..31 {
        app.update();
    }

    assert!(
        app.world().get::<Bolt>(bolt).is_none(),
        "expired bolt should be swept"
    );
    let health = app.world().get::<Health>(player).unwrap();
    assert_eq!(health.current, 250.0, "a miss deals no damage");
}

#[test]
fn test_bolt_hit_applies_damage_once() {
    let mut app = test_app();
    let player = spawn_player(&mut app, Vec3::ZERO);

    let bolt = app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 0.0, -5.0),
            Bolt {
                direction: Vec3::Z,
                speed: 25.0,
                damage: 10.0,
                age: 0.0,
                lifetime: 3.0,
                target: player,
                resolved: false,
            },
        ))
        .id();

    for _ in 0..10 {
        app.update();
    }

    assert!(app.world().get::<Bolt>(bolt).is_none(), "hit bolt resolves");
    let health = app.world().get::<Health>(player).unwrap();
    assert_eq!(health.current, 240.0, "hit damage applies exactly once");
}

#[test]
fn test_gravity_orb_explodes_exactly_once() {
    let mut app = test_app();
    spawn_player(&mut app, Vec3::new(15.0, 0.0, 15.0)); // out of the way

    // Enemy parked inside the blast radius; pull damage disabled so the
    // explosion is the only source
    let enemy = spawn_enemy(&mut app, brawler(), Vec3::new(3.0, 0.75, 0.0));

    let orb = app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 1.5, 0.0),
            GravityOrb {
                duration: 0.25,
                damage_per_second: 0.0,
                gravity_strength: 0.0,
                ..Default::default()
            },
        ))
        .id();
    app.world_mut().resource_mut::<ActiveGravityOrb>().0 = Some(orb);

    for _ in 0..10 {
        app.update();
    }

    let health = app.world().get::<Health>(enemy).unwrap();
    assert_eq!(
        health.current,
        60.0 - 40.0,
        "explosion damage applies exactly once"
    );
    assert!(
        app.world().get::<GravityOrb>(orb).is_none(),
        "exploded orb is swept"
    );
    assert!(
        app.world().resource::<ActiveGravityOrb>().0.is_none(),
        "the orb slot frees up for the next activation"
    );
}

// =============================================================================
// Enemy AI
// =============================================================================

#[test]
fn test_two_enemies_melee_the_same_tick() {
    let mut app = test_app();
    let player = spawn_player(&mut app, Vec3::ZERO);

    // Both in range with cooldowns ready: no single-target exclusivity
    spawn_enemy(&mut app, brawler(), Vec3::new(1.5, 0.75, 0.0));
    spawn_enemy(&mut app, brawler(), Vec3::new(-1.5, 0.75, 0.0));

    app.update();

    let health = app.world().get::<Health>(player).unwrap();
    assert_eq!(health.current, 250.0 - 2.0 * 15.0, "both hits register");
}

#[test]
fn test_wounded_boss_enters_its_domain() {
    let mut app = test_app();
    spawn_player(&mut app, Vec3::ZERO);

    let mut archetype = brawler();
    archetype.name = "Warden".to_string();
    archetype.max_health = 350.0;
    archetype.domain = Some(DomainAbility {
        trigger_fraction: 0.6,
        duration: 5.0,
        cooldown: 25.0,
        radius: 15.0,
        damage_per_second: 10.0,
    });
    let enemy = spawn_enemy(&mut app, archetype, Vec3::new(0.0, 1.75, -8.0));

    // Wound to 200/350 ≈ 0.571 and make the domain cooldown elapsed
    {
        let world = app.world_mut();
        world.get_mut::<Health>(enemy).unwrap().take_damage(150.0);
        let mut e = world.get_mut::<Enemy>(enemy).unwrap();
        e.timers.since_domain = 25.0;
        e.timers.since_melee = 0.0;
    }

    app.update();

    let e = app.world().get::<Enemy>(enemy).unwrap();
    assert_eq!(e.state, EnemyState::UsingDomain);
    assert_eq!(e.domain_markers.len(), 2, "dome and ring markers spawn");

    let mut query = app.world_mut().query::<&DomainDome>();
    assert_eq!(query.iter(app.world()).count(), 1);
}

#[test]
fn test_domain_markers_despawn_when_owner_dies() {
    let mut app = test_app();
    spawn_player(&mut app, Vec3::ZERO);

    let mut archetype = brawler();
    archetype.max_health = 350.0;
    archetype.domain = Some(DomainAbility {
        trigger_fraction: 0.6,
        duration: 5.0,
        cooldown: 25.0,
        radius: 15.0,
        damage_per_second: 10.0,
    });
    let enemy = spawn_enemy(&mut app, archetype, Vec3::new(0.0, 1.75, -8.0));

    {
        let world = app.world_mut();
        world.get_mut::<Health>(enemy).unwrap().take_damage(150.0);
        world.get_mut::<Enemy>(enemy).unwrap().timers.since_domain = 25.0;
    }
    app.update();
    assert_eq!(
        app.world().get::<Enemy>(enemy).unwrap().state,
        EnemyState::UsingDomain
    );

    // Kill the owner mid-domain: the sweep must take the markers with it
    app.world_mut()
        .get_mut::<Health>(enemy)
        .unwrap()
        .take_damage(1000.0);
    app.update();

    assert!(app.world().get::<Enemy>(enemy).is_none(), "body swept");
    let mut query = app.world_mut().query::<&DomainDome>();
    assert_eq!(
        query.iter(app.world()).count(),
        0,
        "no orphaned domain markers"
    );
}

#[test]
fn test_enemy_idles_when_player_eliminated() {
    let mut app = test_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    let enemy = spawn_enemy(&mut app, brawler(), Vec3::new(5.0, 0.75, 0.0));

    app.world_mut()
        .get_mut::<Health>(player)
        .unwrap()
        .take_damage(250.0);

    app.update();

    let e = app.world().get::<Enemy>(enemy).unwrap();
    assert_eq!(e.state, EnemyState::Idle);
}
