//! Component Definitions for the Arena
//!
//! This module contains all ECS components, resources, and data structures
//! used during the arena simulation:
//!
//! - `Health` / `CursedEnergy`: the shared combat model
//! - `PlayerCombat` / `PlayerIntent`: player action state and queued inputs
//! - `Enemy` / `EnemyState` / `EnemyTimers`: the enemy AI state machine data
//! - Hazard components: `Bolt`, `DismantleBolt`, `GravityOrb`
//! - `GameRng`: seeded random number generator for deterministic runs

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use smallvec::SmallVec;

use super::encounter::EnemyArchetype;

// ============================================================================
// Resources
// ============================================================================

/// Seeded random number generator for deterministic arena simulation.
///
/// When a seed is provided (e.g., via headless config), the same seed will
/// always produce the same run. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Randomly return -1.0 or +1.0 (used for strafe direction)
    pub fn random_sign(&mut self) -> f32 {
        if self.random_f32() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Tracks the single live gravity orb, if any.
///
/// At most one orb may exist at a time: skill activation is refused while
/// this holds an entity, and the hazard sweep clears it when the orb resolves.
#[derive(Resource, Default)]
pub struct ActiveGravityOrb(pub Option<Entity>);

/// Queued player inputs for the current tick.
///
/// Written by the input system in graphical mode and by the autopilot in
/// headless mode; consumed (action flags cleared) by the player action
/// resolution system each tick.
#[derive(Resource, Default)]
pub struct PlayerIntent {
    /// Movement input in the XZ plane (camera-relative), each axis in [-1, 1]
    pub move_input: Vec2,
    /// Gravity orb steering input (camera-relative), each axis in [-1, 1]
    pub orb_steer: Vec2,
    /// Request a basic strike this tick
    pub strike: bool,
    /// Request a punch this tick
    pub punch: bool,
    /// Request gravity orb activation this tick
    pub activate_skill: bool,
    /// Request a jump this tick
    pub jump: bool,
    /// Hold the defensive aura active
    pub guard: bool,
}

impl PlayerIntent {
    /// Clear one-shot action requests after they have been resolved.
    /// Movement/steering/guard are held states and persist until re-written.
    pub fn clear_actions(&mut self) {
        self.strike = false;
        self.punch = false;
        self.activate_skill = false;
        self.jump = false;
    }
}

// ============================================================================
// Marker Components
// ============================================================================

/// Marker component for all entities spawned in the arena scene.
/// Used for cleanup when exiting the scene.
#[derive(Component)]
pub struct ArenaEntity;

/// Marker component for the arena camera
#[derive(Component)]
pub struct ArenaCamera;

/// Whether an entity may currently be hit by proximity attacks.
///
/// Cleared on elimination, before the sweep removes the entity, so that
/// attacks resolving later in the same frame cannot hit a corpse.
#[derive(Component)]
pub struct Visible(pub bool);

// ============================================================================
// Shared Combat Model
// ============================================================================

/// Result of a damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already eliminated; nothing changed
    Ignored,
    /// Health was reduced, target survives
    Damaged,
    /// This application dropped health to zero. Returned exactly once per
    /// entity; the caller must run elimination cleanup (end an active
    /// domain, hide the body, log the death).
    Eliminated,
}

/// Health pool shared by the player and all enemies.
///
/// Elimination is terminal: once `eliminated` is set, health never changes
/// again and further damage is ignored. Health never regenerates.
#[derive(Component, Clone, Debug)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub eliminated: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        debug_assert!(max > 0.0, "Health max must be positive, got {}", max);
        Self {
            current: max,
            max,
            eliminated: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.eliminated
    }

    /// Fraction of health remaining, in [0, 1].
    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    /// Apply damage, clamping health at zero.
    ///
    /// No-op after elimination. Returns `Eliminated` exactly once, on the
    /// application that drops health to zero.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        debug_assert!(amount >= 0.0, "damage cannot be negative, got {}", amount);

        if self.eliminated {
            return DamageOutcome::Ignored;
        }

        self.current = (self.current - amount).max(0.0);
        if self.current <= 0.0 {
            self.current = 0.0;
            self.eliminated = true;
            DamageOutcome::Eliminated
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Validate health invariants. Panics in debug builds on violation.
    #[inline]
    pub fn debug_validate(&self) {
        debug_assert!(
            self.current >= 0.0,
            "health cannot be negative: {}",
            self.current
        );
        debug_assert!(
            self.current <= self.max,
            "health ({}) cannot exceed max ({})",
            self.current,
            self.max
        );
        debug_assert!(
            !(self.current == 0.0 && !self.eliminated),
            "zero health without elimination flag"
        );
    }
}

/// The player's regenerating cursed-energy pool, gating the gravity orb.
#[derive(Component, Clone, Debug)]
pub struct CursedEnergy {
    pub current: f32,
    pub max: f32,
    /// Energy restored per second
    pub regen_rate: f32,
}

impl CursedEnergy {
    pub fn new(max: f32, regen_rate: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
        }
    }

    /// Regenerate toward max. Never overshoots.
    pub fn regenerate(&mut self, dt: f32) {
        if self.current < self.max {
            self.current = (self.current + self.regen_rate * dt).min(self.max);
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// Deduct `cost` if affordable. Rejection leaves the pool untouched -
    /// there is no partial spend.
    pub fn spend(&mut self, cost: f32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost;
        true
    }

    #[inline]
    pub fn debug_validate(&self) {
        debug_assert!(
            self.current >= 0.0,
            "energy cannot be negative: {}",
            self.current
        );
        debug_assert!(
            self.current <= self.max,
            "energy ({}) cannot exceed max ({})",
            self.current,
            self.max
        );
    }
}

// ============================================================================
// Player Components
// ============================================================================

/// Reason a skill activation was refused (or `Ready` if it may proceed).
/// Refusals are reported distinctly in the log but both yield no orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillGate {
    Ready,
    Eliminated,
    OnCooldown,
    NotEnoughEnergy,
}

/// Core player action-controller state.
///
/// The strike and the punch each have an independent active-duration timer
/// and cooldown timer; the two actions are mutually exclusive while active.
/// Cooldowns may count below zero internally - gating only checks `> 0`.
#[derive(Component, Clone)]
pub struct PlayerCombat {
    // Basic strike
    pub is_attacking: bool,
    pub attack_duration: f32,
    pub attack_cooldown: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub attack_time_left: f32,
    pub attack_cooldown_left: f32,

    // Punch
    pub is_punching: bool,
    pub punch_duration: f32,
    pub punch_cooldown: f32,
    pub punch_range: f32,
    pub punch_damage: f32,
    pub punch_time_left: f32,
    pub punch_cooldown_left: f32,

    // Gravity orb skill
    pub skill_cooldown: f32,
    pub skill_cost: f32,
    pub skill_cooldown_left: f32,

    // Movement and vertical physics
    pub move_speed: f32,
    pub jump_force: f32,
    pub vertical_velocity: f32,
    pub grounded: bool,

    // Run statistics
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

impl Default for PlayerCombat {
    fn default() -> Self {
        Self {
            is_attacking: false,
            attack_duration: 0.4,
            attack_cooldown: 0.6,
            attack_range: 2.5,
            attack_damage: 10.0,
            attack_time_left: 0.0,
            attack_cooldown_left: 0.0,

            is_punching: false,
            punch_duration: 0.2,
            punch_cooldown: 0.8,
            punch_range: 1.8,
            punch_damage: 15.0,
            punch_time_left: 0.0,
            punch_cooldown_left: 0.0,

            skill_cooldown: 15.0,
            skill_cost: 40.0,
            skill_cooldown_left: 0.0,

            move_speed: 5.0,
            jump_force: 8.0,
            vertical_velocity: 0.0,
            grounded: true,

            damage_dealt: 0.0,
            damage_taken: 0.0,
        }
    }
}

impl PlayerCombat {
    /// Advance all action timers and clear finished action flags.
    pub fn tick(&mut self, dt: f32) {
        if self.attack_cooldown_left > 0.0 {
            self.attack_cooldown_left -= dt;
        }
        if self.attack_time_left > 0.0 {
            self.attack_time_left -= dt;
            if self.attack_time_left <= 0.0 {
                self.is_attacking = false;
            }
        }

        if self.punch_cooldown_left > 0.0 {
            self.punch_cooldown_left -= dt;
        }
        if self.punch_time_left > 0.0 {
            self.punch_time_left -= dt;
            if self.punch_time_left <= 0.0 {
                self.is_punching = false;
            }
        }

        if self.skill_cooldown_left > 0.0 {
            self.skill_cooldown_left -= dt;
        }
    }

    /// Gate a basic strike. On success the active and cooldown timers start.
    pub fn try_begin_strike(&mut self, eliminated: bool) -> bool {
        if eliminated || self.is_attacking || self.is_punching || self.attack_cooldown_left > 0.0 {
            return false;
        }
        self.is_attacking = true;
        self.attack_time_left = self.attack_duration;
        self.attack_cooldown_left = self.attack_cooldown;
        true
    }

    /// Gate a punch. Mutually exclusive with the basic strike.
    pub fn try_begin_punch(&mut self, eliminated: bool) -> bool {
        if eliminated || self.is_punching || self.is_attacking || self.punch_cooldown_left > 0.0 {
            return false;
        }
        self.is_punching = true;
        self.punch_time_left = self.punch_duration;
        self.punch_cooldown_left = self.punch_cooldown;
        true
    }

    /// Check whether the gravity orb may be activated right now.
    pub fn skill_gate(&self, energy: &CursedEnergy, eliminated: bool) -> SkillGate {
        if eliminated {
            SkillGate::Eliminated
        } else if self.skill_cooldown_left > 0.0 {
            SkillGate::OnCooldown
        } else if !energy.can_afford(self.skill_cost) {
            SkillGate::NotEnoughEnergy
        } else {
            SkillGate::Ready
        }
    }

    /// Commit a skill activation: reset the cooldown and deduct the cost.
    ///
    /// Atomic with the gate: callers must check `skill_gate` first; this
    /// only mutates state when the energy spend succeeds.
    pub fn commit_skill(&mut self, energy: &mut CursedEnergy) -> bool {
        if !energy.spend(self.skill_cost) {
            return false;
        }
        self.skill_cooldown_left = self.skill_cooldown;
        true
    }
}

/// The player's defensive aura. While active, incoming straight bolts
/// decelerate quadratically as they approach (see `hazards::update_bolts`).
#[derive(Component, Default)]
pub struct InfinityGuard {
    pub active: bool,
}

// ============================================================================
// Enemy AI
// ============================================================================

/// The six states of the enemy AI controller.
///
/// Transition priority is evaluated in `enemy_ai::update_enemy_ai` once per
/// tick; `UsingDomain` is sticky and outranks everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Idle,
    Chasing,
    Evading,
    AttackingMelee,
    AttackingDismantle,
    UsingDomain,
}

/// Mutable per-enemy timers, separate from the immutable archetype config.
#[derive(Clone, Debug)]
pub struct EnemyTimers {
    /// Seconds since the last melee hit (counts up; compared to cooldown)
    pub since_melee: f32,
    /// Seconds since the last ranged attack
    pub since_ranged: f32,
    /// Seconds since the last domain activation
    pub since_domain: f32,
    /// Brief melee animation lock; facing is frozen while this runs
    pub melee_lock: f32,
    /// Remaining strafe time while evading
    pub strafe_left: f32,
    /// Strafe direction: +1.0 (right) or -1.0 (left)
    pub strafe_direction: f32,
    /// Remaining domain duration while `UsingDomain`
    pub domain_left: f32,
}

impl EnemyTimers {
    /// Initial timers. Melee/ranged start at a random fraction of their
    /// cooldown so identical minions don't fire in lockstep; the domain
    /// starts off cooldown so a wounded boss can open with it.
    pub fn new(archetype: &EnemyArchetype, rng: &mut GameRng) -> Self {
        let ranged_cooldown = archetype.ranged.as_ref().map_or(0.0, |r| r.cooldown);
        let domain_cooldown = archetype.domain.as_ref().map_or(0.0, |d| d.cooldown);
        Self {
            since_melee: rng.random_f32() * archetype.melee.cooldown,
            since_ranged: rng.random_f32() * ranged_cooldown,
            since_domain: domain_cooldown,
            melee_lock: 0.0,
            strafe_left: 0.0,
            strafe_direction: 1.0,
            domain_left: 0.0,
        }
    }
}

/// An enemy combatant: immutable archetype plus mutable AI state.
#[derive(Component)]
pub struct Enemy {
    pub config: EnemyArchetype,
    pub state: EnemyState,
    pub timers: EnemyTimers,
    /// Domain area markers (dome + range ring) spawned while `UsingDomain`.
    /// Their lifetime is bound to the state: force-despawned on expiry or
    /// elimination.
    pub domain_markers: SmallVec<[Entity; 2]>,
}

impl Enemy {
    pub fn new(config: EnemyArchetype, rng: &mut GameRng) -> Self {
        let timers = EnemyTimers::new(&config, rng);
        Self {
            config,
            state: EnemyState::Chasing,
            timers,
            domain_markers: SmallVec::new(),
        }
    }
}

/// Marker for the dark dome spawned while a domain is active.
#[derive(Component)]
pub struct DomainDome {
    pub owner: Entity,
    pub radius: f32,
}

/// Marker for the ground ring showing a domain's damage radius.
#[derive(Component)]
pub struct DomainRing {
    pub owner: Entity,
    pub radius: f32,
}

// ============================================================================
// Hazards
// ============================================================================

/// The kinds of enemy-spawned hazards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HazardKind {
    /// Straight bolt (minion shot); decelerates near a guarded target
    Bolt,
    /// Dismantle slash; applies damage once at proximity then goes inert
    Dismantle,
}

/// Request to spawn an enemy hazard, emitted by the AI controller and
/// consumed by `hazards::spawn_hazards`. Decouples the AI decision from
/// hazard lifecycle ownership.
#[derive(Event)]
pub struct SpawnHazardEvent {
    pub position: Vec3,
    pub direction: Vec3,
    pub kind: HazardKind,
    pub damage: f32,
    pub speed: f32,
    pub target: Entity,
}

/// Straight-line bolt fired at the player.
///
/// Lifecycle: active until it hits (damage once) or its lifetime expires
/// (miss, no damage). `resolved` is terminal; the sweep despawns it.
#[derive(Component)]
pub struct Bolt {
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub age: f32,
    pub lifetime: f32,
    pub target: Entity,
    pub resolved: bool,
}

/// Dismantle slash projectile. Same straight-line motion as `Bolt`, but it
/// turns visually inert the instant it connects.
#[derive(Component)]
pub struct DismantleBolt {
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub age: f32,
    pub lifetime: f32,
    pub target: Entity,
    pub hit: bool,
    pub resolved: bool,
}

/// The player's steerable gravity orb.
///
/// Pulls and damages nearby enemies every tick, then explodes exactly once
/// when its duration elapses.
#[derive(Component)]
pub struct GravityOrb {
    pub age: f32,
    pub duration: f32,
    pub gravity_radius: f32,
    pub gravity_strength: f32,
    /// Cosmetic spin rate (radians/second around Y)
    pub spin_speed: f32,
    pub damage_per_second: f32,
    pub move_speed: f32,
    pub explosion_radius: f32,
    pub explosion_damage: f32,
    pub exploded: bool,
    pub resolved: bool,
}

impl Default for GravityOrb {
    fn default() -> Self {
        Self {
            age: 0.0,
            duration: 10.0,
            gravity_radius: 10.0,
            gravity_strength: 50.0,
            spin_speed: 0.5,
            damage_per_second: 5.0,
            move_speed: 8.0,
            explosion_radius: 8.0,
            explosion_damage: 40.0,
            exploded: false,
            resolved: false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::arena::encounter::EncounterConfig;

    // =========================================================================
    // GameRng Tests
    // =========================================================================

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let seed = 42;
        let mut rng1 = GameRng::from_seed(seed);
        let mut rng2 = GameRng::from_seed(seed);

        // Both RNGs should produce identical sequences
        for _ in 0..100 {
            assert_eq!(rng1.random_f32(), rng2.random_f32());
        }
    }

    #[test]
    fn test_different_seeds_produce_different_results() {
        let mut rng1 = GameRng::from_seed(1);
        let mut rng2 = GameRng::from_seed(2);

        assert_ne!(rng1.random_f32(), rng2.random_f32());
    }

    #[test]
    fn test_random_range() {
        let mut rng = GameRng::from_seed(123);

        for _ in 0..100 {
            let value = rng.random_range(0.5, 1.5);
            assert!(value >= 0.5, "Value {} should be >= 0.5", value);
            assert!(value < 1.5, "Value {} should be < 1.5", value);
        }
    }

    #[test]
    fn test_random_sign_is_unit() {
        let mut rng = GameRng::from_seed(7);
        for _ in 0..50 {
            let sign = rng.random_sign();
            assert!(sign == 1.0 || sign == -1.0);
        }
    }

    // =========================================================================
    // Health Tests
    // =========================================================================

    #[test]
    fn test_take_damage_reduces_health() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(30.0), DamageOutcome::Damaged);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());
        health.debug_validate();
    }

    #[test]
    fn test_take_damage_clamps_at_zero_and_eliminates() {
        let mut health = Health::new(50.0);
        assert_eq!(health.take_damage(80.0), DamageOutcome::Eliminated);
        assert_eq!(health.current, 0.0);
        assert!(health.eliminated);
        health.debug_validate();
    }

    #[test]
    fn test_eliminated_is_returned_exactly_once() {
        let mut health = Health::new(10.0);
        assert_eq!(health.take_damage(10.0), DamageOutcome::Eliminated);
        // Every further application is ignored - no double elimination
        assert_eq!(health.take_damage(10.0), DamageOutcome::Ignored);
        assert_eq!(health.take_damage(0.0), DamageOutcome::Ignored);
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_damage_is_monotonic_non_increasing() {
        let mut health = Health::new(100.0);
        let mut previous = health.current;
        for amount in [5.0, 0.0, 12.5, 80.0, 3.0, 40.0] {
            health.take_damage(amount);
            assert!(health.current <= previous);
            previous = health.current;
        }
    }

    #[test]
    fn test_exact_lethal_damage_sets_flag() {
        let mut health = Health::new(25.0);
        assert_eq!(health.take_damage(25.0), DamageOutcome::Eliminated);
        assert!(health.eliminated);
    }

    #[test]
    fn test_health_fraction() {
        let mut health = Health::new(350.0);
        health.take_damage(150.0);
        // 200/350 ≈ 0.571
        assert!((health.fraction() - 200.0 / 350.0).abs() < 1e-6);
    }

    // =========================================================================
    // CursedEnergy Tests
    // =========================================================================

    #[test]
    fn test_energy_regen_caps_at_max() {
        let mut energy = CursedEnergy::new(100.0, 8.0);
        energy.current = 96.0;
        energy.regenerate(1.0); // would be 104 uncapped
        assert_eq!(energy.current, 100.0);
        energy.debug_validate();
    }

    #[test]
    fn test_energy_spend_rejected_leaves_pool_untouched() {
        let mut energy = CursedEnergy::new(100.0, 8.0);
        energy.current = 30.0;
        assert!(!energy.spend(40.0));
        assert_eq!(energy.current, 30.0);
    }

    #[test]
    fn test_energy_never_negative_under_spend_sequences() {
        let mut energy = CursedEnergy::new(100.0, 8.0);
        for _ in 0..10 {
            energy.spend(40.0);
            energy.regenerate(0.5);
            assert!(energy.current >= 0.0);
            assert!(energy.current <= energy.max);
        }
    }

    // =========================================================================
    // PlayerCombat Tests
    // =========================================================================

    #[test]
    fn test_strike_rejected_while_on_cooldown() {
        let mut combat = PlayerCombat::default();
        assert!(combat.try_begin_strike(false));
        // Active and cooling down - second request is a no-op
        assert!(!combat.try_begin_strike(false));
    }

    #[test]
    fn test_strike_and_punch_are_mutually_exclusive() {
        let mut combat = PlayerCombat::default();
        assert!(combat.try_begin_strike(false));
        assert!(!combat.try_begin_punch(false));

        let mut combat = PlayerCombat::default();
        assert!(combat.try_begin_punch(false));
        assert!(!combat.try_begin_strike(false));
    }

    #[test]
    fn test_punch_has_independent_cooldown() {
        let mut combat = PlayerCombat::default();
        assert!(combat.try_begin_strike(false));
        // Let the strike finish but keep its cooldown running
        combat.tick(combat.attack_duration + 0.01);
        assert!(!combat.is_attacking);
        assert!(combat.attack_cooldown_left > 0.0);
        // Punch is gated by its own timers, not the strike's
        assert!(combat.try_begin_punch(false));
    }

    #[test]
    fn test_actions_rejected_when_eliminated() {
        let mut combat = PlayerCombat::default();
        assert!(!combat.try_begin_strike(true));
        assert!(!combat.try_begin_punch(true));
    }

    #[test]
    fn test_tick_clears_action_flags() {
        let mut combat = PlayerCombat::default();
        combat.try_begin_strike(false);
        combat.tick(0.2);
        assert!(combat.is_attacking, "strike lasts 0.4s");
        combat.tick(0.25);
        assert!(!combat.is_attacking);
    }

    #[test]
    fn test_skill_gate_distinguishes_cooldown_from_energy() {
        let combat = PlayerCombat::default();
        let energy = CursedEnergy::new(100.0, 8.0);
        assert_eq!(combat.skill_gate(&energy, false), SkillGate::Ready);
        assert_eq!(combat.skill_gate(&energy, true), SkillGate::Eliminated);

        let mut cooling = PlayerCombat::default();
        cooling.skill_cooldown_left = 5.0;
        assert_eq!(cooling.skill_gate(&energy, false), SkillGate::OnCooldown);

        let combat = PlayerCombat::default();
        let mut poor = CursedEnergy::new(100.0, 8.0);
        poor.current = 30.0;
        assert_eq!(combat.skill_gate(&poor, false), SkillGate::NotEnoughEnergy);
    }

    #[test]
    fn test_skill_activation_is_atomic() {
        // Insufficient energy: neither the cooldown nor the pool changes
        let mut combat = PlayerCombat::default();
        let mut energy = CursedEnergy::new(100.0, 8.0);
        energy.current = 30.0;
        assert_ne!(combat.skill_gate(&energy, false), SkillGate::Ready);
        assert!(!combat.commit_skill(&mut energy));
        assert_eq!(energy.current, 30.0);
        assert_eq!(combat.skill_cooldown_left, 0.0);

        // Sufficient energy: both change together
        energy.current = 100.0;
        assert!(combat.commit_skill(&mut energy));
        assert_eq!(energy.current, 60.0);
        assert_eq!(combat.skill_cooldown_left, combat.skill_cooldown);
    }

    // =========================================================================
    // Enemy Timer Tests
    // =========================================================================

    #[test]
    fn test_enemy_timers_domain_starts_off_cooldown() {
        let mut rng = GameRng::from_seed(99);
        let boss = EncounterConfig::default().boss;
        let timers = EnemyTimers::new(&boss, &mut rng);
        let cooldown = boss.domain.as_ref().unwrap().cooldown;
        assert_eq!(timers.since_domain, cooldown);
    }

    #[test]
    fn test_enemy_timers_attacks_start_jittered() {
        let mut rng = GameRng::from_seed(3);
        let boss = EncounterConfig::default().boss;
        let timers = EnemyTimers::new(&boss, &mut rng);
        assert!(timers.since_melee >= 0.0);
        assert!(timers.since_melee <= boss.melee.cooldown);
    }
}
