//! Combat logging
//!
//! Records all combat events for HUD display and post-run analysis.
//! In headless mode the full log is embedded in the JSON arena report.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in arena time (seconds since the run started)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Player or enemy action resolved (strike, punch, dismantle, domain)
    AbilityUsed,
    /// Hazard spawned (bolt, dismantle, gravity orb)
    HazardSpawned,
    /// Combatant eliminated
    Death,
    /// Arena event (run start, outcome, etc.)
    ArenaEvent,
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current arena time
    pub arena_time: f32,
}

impl CombatLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
        self.arena_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.arena_time,
            event_type,
            message,
        });
    }

    /// Log a damage application.
    pub fn log_damage(&mut self, source: &str, target: &str, action: &str, amount: f32) {
        let message = format!(
            "{}'s {} hits {} for {:.0} damage",
            source, action, target, amount
        );
        self.log(CombatLogEventType::Damage, message);
    }

    /// Log an elimination.
    pub fn log_death(&mut self, target: &str, killer: Option<&str>) {
        let message = match killer {
            Some(killer) => format!("{} has been eliminated by {}", target, killer),
            None => format!("{} has been eliminated", target),
        };
        self.log(CombatLogEventType::Death, message);
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }
}
