//! Data-Driven Encounter Configuration
//!
//! Enemy archetypes and the arena layout are defined in
//! `assets/config/encounter.ron` rather than hardcoded in Rust.
//!
//! ## Benefits
//! - Balance changes don't require recompilation
//! - Easier to review and modify enemy values
//! - Validated once at startup
//!
//! A built-in default mirrors the shipped file so tests and the headless
//! runner work without touching the filesystem.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::components::HazardKind;

/// Which attack families an enemy may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Melee,
    Ranged,
    Mixed,
}

impl AttackKind {
    pub fn includes_melee(&self) -> bool {
        matches!(self, AttackKind::Melee | AttackKind::Mixed)
    }

    pub fn is_pure_ranged(&self) -> bool {
        matches!(self, AttackKind::Ranged)
    }
}

/// Melee attack parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeleeAttack {
    #[serde(default = "default_melee_range")]
    pub range: f32,
    #[serde(default = "default_melee_damage")]
    pub damage: f32,
    #[serde(default = "default_melee_cooldown")]
    pub cooldown: f32,
}

fn default_melee_range() -> f32 {
    2.5
}
fn default_melee_damage() -> f32 {
    15.0
}
fn default_melee_cooldown() -> f32 {
    1.5
}

impl Default for MeleeAttack {
    fn default() -> Self {
        Self {
            range: default_melee_range(),
            damage: default_melee_damage(),
            cooldown: default_melee_cooldown(),
        }
    }
}

/// Ranged attack parameters. The boss fires `Dismantle` slashes; minions
/// fire plain `Bolt`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangedAttack {
    pub hazard: HazardKind,
    pub range: f32,
    pub damage: f32,
    pub cooldown: f32,
    #[serde(default = "default_bolt_speed")]
    pub speed: f32,
}

fn default_bolt_speed() -> f32 {
    25.0
}

/// Domain ability parameters: a sticky area-damage state triggered when the
/// owner's health fraction drops to `trigger_fraction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainAbility {
    #[serde(default = "default_domain_trigger")]
    pub trigger_fraction: f32,
    #[serde(default = "default_domain_duration")]
    pub duration: f32,
    #[serde(default = "default_domain_cooldown")]
    pub cooldown: f32,
    #[serde(default = "default_domain_radius")]
    pub radius: f32,
    #[serde(default = "default_domain_dps")]
    pub damage_per_second: f32,
}

fn default_domain_trigger() -> f32 {
    0.5
}
fn default_domain_duration() -> f32 {
    5.0
}
fn default_domain_cooldown() -> f32 {
    30.0
}
fn default_domain_radius() -> f32 {
    15.0
}
fn default_domain_dps() -> f32 {
    10.0
}

/// Immutable per-enemy configuration, fixed at spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub max_health: f32,
    /// Body edge length; also sets spawn height (size / 2)
    pub size: f32,
    /// Base color as linear RGB
    pub color: [f32; 3],
    pub move_speed: f32,
    /// Defaults to 0.7 × move_speed when absent
    #[serde(default)]
    pub strafe_speed: Option<f32>,
    #[serde(default = "default_min_chase")]
    pub min_chase_distance: f32,
    #[serde(default = "default_max_chase")]
    pub max_chase_distance: f32,
    pub attack_kind: AttackKind,
    #[serde(default)]
    pub melee: MeleeAttack,
    #[serde(default)]
    pub ranged: Option<RangedAttack>,
    #[serde(default)]
    pub domain: Option<DomainAbility>,
}

fn default_min_chase() -> f32 {
    5.0
}
fn default_max_chase() -> f32 {
    30.0
}

impl EnemyArchetype {
    /// Effective strafe speed (0.7 × move speed unless overridden).
    pub fn strafe_speed(&self) -> f32 {
        self.strafe_speed.unwrap_or(self.move_speed * 0.7)
    }

    /// Validate the archetype values.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("enemy archetype must have a name".to_string());
        }
        if self.max_health <= 0.0 {
            return Err(format!("{}: max_health must be positive", self.name));
        }
        if self.size <= 0.0 {
            return Err(format!("{}: size must be positive", self.name));
        }
        if self.move_speed < 0.0 {
            return Err(format!("{}: move_speed cannot be negative", self.name));
        }
        if self.min_chase_distance > self.max_chase_distance {
            return Err(format!(
                "{}: min_chase_distance ({}) exceeds max_chase_distance ({})",
                self.name, self.min_chase_distance, self.max_chase_distance
            ));
        }
        if self.melee.cooldown < 0.0 || self.melee.damage < 0.0 {
            return Err(format!("{}: melee values cannot be negative", self.name));
        }
        if let Some(ranged) = &self.ranged {
            if ranged.cooldown < 0.0 || ranged.damage < 0.0 || ranged.speed <= 0.0 {
                return Err(format!("{}: invalid ranged attack values", self.name));
            }
        }
        if let Some(domain) = &self.domain {
            if domain.trigger_fraction <= 0.0 || domain.trigger_fraction > 1.0 {
                return Err(format!(
                    "{}: domain trigger_fraction must be in (0, 1], got {}",
                    self.name, domain.trigger_fraction
                ));
            }
            if domain.duration <= 0.0 || domain.cooldown < 0.0 || domain.radius <= 0.0 {
                return Err(format!("{}: invalid domain values", self.name));
            }
        }
        Ok(())
    }
}

/// Minion wave layout: one archetype spawned `count` times on a ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionWave {
    pub archetype: EnemyArchetype,
    pub count: usize,
    pub spawn_radius: f32,
}

/// Complete encounter definition, loaded from RON at startup.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    pub name: String,
    /// Circular boundary the player is clamped to
    pub arena_radius: f32,
    pub boss: EnemyArchetype,
    pub minions: MinionWave,
}

impl EncounterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.arena_radius <= 0.0 {
            return Err("arena_radius must be positive".to_string());
        }
        self.boss.validate()?;
        self.minions.archetype.validate()?;
        if self.minions.spawn_radius <= 0.0 {
            return Err("minion spawn_radius must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for EncounterConfig {
    /// Built-in encounter matching `assets/config/encounter.ron`:
    /// a mixed-attack boss with dismantle and a domain, plus a ring of
    /// stationary ranged minions.
    fn default() -> Self {
        Self {
            name: "Shrine Gate".to_string(),
            arena_radius: 20.0,
            boss: EnemyArchetype {
                name: "Shrine Warden".to_string(),
                max_health: 350.0,
                size: 3.5,
                color: [0.55, 0.0, 0.0],
                move_speed: 3.5,
                strafe_speed: None,
                min_chase_distance: 4.0,
                max_chase_distance: 30.0,
                attack_kind: AttackKind::Mixed,
                melee: MeleeAttack {
                    range: 4.0,
                    damage: 25.0,
                    cooldown: 1.8,
                },
                ranged: Some(RangedAttack {
                    hazard: HazardKind::Dismantle,
                    range: 20.0,
                    damage: 30.0,
                    cooldown: 5.0,
                    speed: 25.0,
                }),
                domain: Some(DomainAbility {
                    trigger_fraction: 0.6,
                    duration: 5.0,
                    cooldown: 25.0,
                    radius: 15.0,
                    damage_per_second: 10.0,
                }),
            },
            minions: MinionWave {
                archetype: EnemyArchetype {
                    name: "Husk".to_string(),
                    max_health: 20.0,
                    size: 1.0,
                    color: [1.0, 0.65, 0.0],
                    move_speed: 0.0,
                    strafe_speed: None,
                    min_chase_distance: 5.0,
                    max_chase_distance: 30.0,
                    attack_kind: AttackKind::Ranged,
                    melee: MeleeAttack::default(),
                    ranged: Some(RangedAttack {
                        hazard: HazardKind::Bolt,
                        range: 30.0,
                        damage: 10.0,
                        cooldown: 3.0,
                        speed: 25.0,
                    }),
                    domain: None,
                },
                count: 5,
                spawn_radius: 15.0,
            },
        }
    }
}

/// Load the encounter definition from `assets/config/encounter.ron`.
pub fn load_encounter_config() -> Result<EncounterConfig, String> {
    let config_path = "assets/config/encounter.ron";

    let contents = std::fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read {}: {}", config_path, e))?;

    let config: EncounterConfig =
        ron::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", config_path, e))?;

    config.validate()?;

    info!(
        "Loaded encounter '{}' from {} ({} minions)",
        config.name, config_path, config.minions.count
    );

    Ok(config)
}

/// Bevy plugin for encounter configuration loading.
///
/// Falls back to the built-in default (with a warning) when the file is
/// missing, so headless runs work from any working directory.
pub struct EncounterConfigPlugin;

impl Plugin for EncounterConfigPlugin {
    fn build(&self, app: &mut App) {
        match load_encounter_config() {
            Ok(config) => {
                app.insert_resource(config);
            }
            Err(e) => {
                warn!("{} - using built-in encounter", e);
                app.insert_resource(EncounterConfig::default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encounter_is_valid() {
        let config = EncounterConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_boss_is_mixed_with_dismantle_and_domain() {
        let config = EncounterConfig::default();
        assert!(config.boss.attack_kind.includes_melee());
        let ranged = config.boss.ranged.as_ref().unwrap();
        assert_eq!(ranged.hazard, HazardKind::Dismantle);
        let domain = config.boss.domain.as_ref().unwrap();
        assert!((domain.trigger_fraction - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_minions_are_stationary_bolt_turrets() {
        let config = EncounterConfig::default();
        let minion = &config.minions.archetype;
        assert_eq!(minion.move_speed, 0.0);
        assert!(minion.attack_kind.is_pure_ranged());
        assert_eq!(minion.ranged.as_ref().unwrap().hazard, HazardKind::Bolt);
    }

    #[test]
    fn test_strafe_speed_defaults_to_seven_tenths() {
        let config = EncounterConfig::default();
        let boss = &config.boss;
        assert!((boss.strafe_speed() - boss.move_speed * 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_validation_rejects_bad_trigger_fraction() {
        let mut config = EncounterConfig::default();
        config.boss.domain.as_mut().unwrap().trigger_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_chase_band() {
        let mut config = EncounterConfig::default();
        config.boss.min_chase_distance = 50.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ron_round_trip() {
        let config = EncounterConfig::default();
        let text = ron::ser::to_string(&config).unwrap();
        let parsed: EncounterConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed.name, config.name);
        assert_eq!(parsed.minions.count, config.minions.count);
    }
}
