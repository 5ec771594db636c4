//! JSON configuration parsing for headless mode
//!
//! Parses JSON run configurations for the windowless simulation used by
//! automated testing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::states::arena::encounter::{load_encounter_config, EncounterConfig};

/// Headless run configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessArenaConfig {
    /// Path to an encounter RON file (default: the shipped encounter,
    /// falling back to the built-in definition)
    #[serde(default)]
    pub encounter_path: Option<String>,
    /// Maximum run duration in simulated seconds before a timeout
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic run reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the arena report (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Drive the player with the built-in autopilot (default: true).
    /// With the autopilot off the player stands still and the run ends
    /// in defeat or timeout - useful for AI-only soak tests.
    #[serde(default = "default_autopilot")]
    pub autopilot: bool,
}

fn default_max_duration() -> f32 {
    300.0
}

fn default_autopilot() -> bool {
    true
}

impl Default for HeadlessArenaConfig {
    fn default() -> Self {
        Self {
            encounter_path: None,
            max_duration_secs: default_max_duration(),
            random_seed: None,
            output_path: None,
            autopilot: default_autopilot(),
        }
    }
}

impl HeadlessArenaConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: HeadlessArenaConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }
        Ok(())
    }

    /// Resolve the encounter this run uses.
    pub fn load_encounter(&self) -> Result<EncounterConfig, String> {
        match &self.encounter_path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read {}: {}", path, e))?;
                let config: EncounterConfig = ron::from_str(&contents)
                    .map_err(|e| format!("Failed to parse {}: {}", path, e))?;
                config.validate()?;
                Ok(config)
            }
            // Shipped encounter when present, built-in otherwise
            None => Ok(load_encounter_config().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config: HeadlessArenaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_duration_secs, 300.0);
        assert!(config.autopilot);
        assert!(config.random_seed.is_none());
    }

    #[test]
    fn test_full_json_round_trips() {
        let config = HeadlessArenaConfig {
            encounter_path: Some("assets/config/encounter.ron".to_string()),
            max_duration_secs: 60.0,
            random_seed: Some(42),
            output_path: Some("report.json".to_string()),
            autopilot: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: HeadlessArenaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.random_seed, Some(42));
        assert!(!parsed.autopilot);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = HeadlessArenaConfig {
            max_duration_secs: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_encounter_resolves() {
        let config = HeadlessArenaConfig::default();
        let encounter = config.load_encounter().unwrap();
        assert!(encounter.validate().is_ok());
    }
}
