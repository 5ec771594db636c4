//! Tests for the shipped encounter definitions
//!
//! These tests verify that:
//! - The shipped RON file parses and validates
//! - The built-in fallback matches the shipped values
//! - All archetype values are sane for simulation

use cursedarena::states::arena::encounter::{AttackKind, EncounterConfig};
use cursedarena::states::arena::HazardKind;

/// Load the shipped encounter file, as the game does at startup.
fn load_shipped_encounter() -> EncounterConfig {
    let contents = std::fs::read_to_string("assets/config/encounter.ron")
        .expect("assets/config/encounter.ron should exist");
    let config: EncounterConfig =
        ron::from_str(&contents).expect("shipped encounter should parse");
    config
}

#[test]
fn test_shipped_encounter_parses_and_validates() {
    let config = load_shipped_encounter();
    assert!(config.validate().is_ok());
}

#[test]
fn test_shipped_encounter_matches_builtin_fallback() {
    let shipped = load_shipped_encounter();
    let builtin = EncounterConfig::default();

    assert_eq!(shipped.name, builtin.name);
    assert_eq!(shipped.arena_radius, builtin.arena_radius);
    assert_eq!(shipped.boss.name, builtin.boss.name);
    assert_eq!(shipped.boss.max_health, builtin.boss.max_health);
    assert_eq!(shipped.minions.count, builtin.minions.count);
    assert_eq!(
        shipped.minions.archetype.max_health,
        builtin.minions.archetype.max_health
    );
}

#[test]
fn test_boss_has_all_three_attack_families() {
    let config = load_shipped_encounter();
    let boss = &config.boss;

    assert_eq!(boss.attack_kind, AttackKind::Mixed);
    assert!(boss.melee.damage > 0.0);

    let ranged = boss.ranged.as_ref().expect("boss should have a ranged attack");
    assert_eq!(ranged.hazard, HazardKind::Dismantle);
    assert!(ranged.range > boss.melee.range);

    let domain = boss.domain.as_ref().expect("boss should have a domain");
    assert!(domain.trigger_fraction > 0.0 && domain.trigger_fraction <= 1.0);
    assert!(domain.duration > 0.0);
    assert!(domain.radius > 0.0);
}

#[test]
fn test_minions_cannot_melee() {
    let config = load_shipped_encounter();
    let minion = &config.minions.archetype;

    assert_eq!(minion.attack_kind, AttackKind::Ranged);
    assert!(!minion.attack_kind.includes_melee());
    let ranged = minion.ranged.as_ref().expect("minions fire bolts");
    assert_eq!(ranged.hazard, HazardKind::Bolt);
}

#[test]
fn test_chase_bands_are_ordered() {
    let config = load_shipped_encounter();
    for archetype in [&config.boss, &config.minions.archetype] {
        assert!(
            archetype.min_chase_distance <= archetype.max_chase_distance,
            "{}: chase band inverted",
            archetype.name
        );
    }
}

#[test]
fn test_attack_ranges_fit_inside_chase_range() {
    // An attack whose range exceeds the chase ceiling could never fire:
    // the enemy idles before it gets close enough
    let config = load_shipped_encounter();
    for archetype in [&config.boss, &config.minions.archetype] {
        if archetype.attack_kind.includes_melee() {
            assert!(archetype.melee.range <= archetype.max_chase_distance);
        }
        if let Some(ranged) = &archetype.ranged {
            assert!(ranged.range <= archetype.max_chase_distance);
        }
    }
}
