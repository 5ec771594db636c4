//! Keybinding system for remappable controls
//!
//! Allows players to customize game controls and save their preferences.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All possible actions that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    // Navigation
    Back,
    Confirm,

    // Movement
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,

    // Combat
    Strike,
    Punch,
    ActivateSkill,
    Guard,

    // Gravity orb steering
    OrbSteerForward,
    OrbSteerBackward,
    OrbSteerLeft,
    OrbSteerRight,
}

impl GameAction {
    pub fn description(&self) -> &'static str {
        match self {
            GameAction::Back => "Back / Quit",
            GameAction::Confirm => "Confirm / Restart",
            GameAction::MoveForward => "Move Forward",
            GameAction::MoveBackward => "Move Backward",
            GameAction::MoveLeft => "Move Left",
            GameAction::MoveRight => "Move Right",
            GameAction::Jump => "Jump",
            GameAction::Strike => "Basic Strike",
            GameAction::Punch => "Punch",
            GameAction::ActivateSkill => "Gravity Orb",
            GameAction::Guard => "Infinity Guard (hold)",
            GameAction::OrbSteerForward => "Steer Orb Forward",
            GameAction::OrbSteerBackward => "Steer Orb Backward",
            GameAction::OrbSteerLeft => "Steer Orb Left",
            GameAction::OrbSteerRight => "Steer Orb Right",
        }
    }

    pub fn all() -> Vec<GameAction> {
        vec![
            GameAction::Back,
            GameAction::Confirm,
            GameAction::MoveForward,
            GameAction::MoveBackward,
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::Jump,
            GameAction::Strike,
            GameAction::Punch,
            GameAction::ActivateSkill,
            GameAction::Guard,
            GameAction::OrbSteerForward,
            GameAction::OrbSteerBackward,
            GameAction::OrbSteerLeft,
            GameAction::OrbSteerRight,
        ]
    }
}

/// Serializable wrapper for KeyCode (stores as string)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SerializableKeyCode(String);

impl From<KeyCode> for SerializableKeyCode {
    fn from(key: KeyCode) -> Self {
        Self(format!("{:?}", key))
    }
}

impl From<SerializableKeyCode> for KeyCode {
    fn from(sk: SerializableKeyCode) -> Self {
        match sk.0.as_str() {
            "Escape" => KeyCode::Escape,
            "Enter" => KeyCode::Enter,
            "Space" => KeyCode::Space,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "KeyA" => KeyCode::KeyA,
            "KeyD" => KeyCode::KeyD,
            "KeyE" => KeyCode::KeyE,
            "KeyF" => KeyCode::KeyF,
            "KeyG" => KeyCode::KeyG,
            "KeyQ" => KeyCode::KeyQ,
            "KeyS" => KeyCode::KeyS,
            "KeyW" => KeyCode::KeyW,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            _ => KeyCode::F24, // Unknown key falls through to an unused code
        }
    }
}

/// Player keybinding preferences, persisted to `keybindings.ron`.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Keybindings {
    bindings: HashMap<GameAction, SerializableKeyCode>,
}

impl Default for Keybindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        let mut bind = |action: GameAction, key: KeyCode| {
            bindings.insert(action, SerializableKeyCode::from(key));
        };

        bind(GameAction::Back, KeyCode::Escape);
        bind(GameAction::Confirm, KeyCode::Enter);

        bind(GameAction::MoveForward, KeyCode::KeyW);
        bind(GameAction::MoveBackward, KeyCode::KeyS);
        bind(GameAction::MoveLeft, KeyCode::KeyA);
        bind(GameAction::MoveRight, KeyCode::KeyD);
        bind(GameAction::Jump, KeyCode::Space);

        bind(GameAction::Strike, KeyCode::KeyE);
        bind(GameAction::Punch, KeyCode::KeyQ);
        bind(GameAction::ActivateSkill, KeyCode::KeyF);
        bind(GameAction::Guard, KeyCode::KeyG);

        bind(GameAction::OrbSteerForward, KeyCode::ArrowUp);
        bind(GameAction::OrbSteerBackward, KeyCode::ArrowDown);
        bind(GameAction::OrbSteerLeft, KeyCode::ArrowLeft);
        bind(GameAction::OrbSteerRight, KeyCode::ArrowRight);

        Self { bindings }
    }
}

impl Keybindings {
    /// Get the key bound to an action
    pub fn key_for(&self, action: GameAction) -> Option<KeyCode> {
        self.bindings.get(&action).cloned().map(KeyCode::from)
    }

    /// Rebind an action to a new key
    pub fn set(&mut self, action: GameAction, key: KeyCode) {
        self.bindings.insert(action, SerializableKeyCode::from(key));
    }

    /// Check if an action is currently held
    pub fn action_pressed(&self, action: GameAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.key_for(action)
            .map_or(false, |key| keyboard.pressed(key))
    }

    /// Check if an action was just pressed this frame
    pub fn action_just_pressed(&self, action: GameAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.key_for(action)
            .map_or(false, |key| keyboard.just_pressed(key))
    }

    /// Load keybindings from disk, falling back to defaults.
    pub fn load() -> Self {
        match std::fs::read_to_string("keybindings.ron") {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(bindings) => bindings,
                Err(e) => {
                    warn!("Failed to parse keybindings.ron: {} - using defaults", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save keybindings to disk.
    pub fn save(&self) -> Result<(), String> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| format!("Failed to serialize keybindings: {}", e))?;
        std::fs::write("keybindings.ron", contents)
            .map_err(|e| format!("Failed to write keybindings.ron: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_has_a_default_binding() {
        let bindings = Keybindings::default();
        for action in GameAction::all() {
            assert!(
                bindings.key_for(action).is_some(),
                "{:?} should have a default binding",
                action
            );
        }
    }

    #[test]
    fn test_keycode_round_trips_through_string() {
        for key in [
            KeyCode::KeyW,
            KeyCode::Space,
            KeyCode::ArrowLeft,
            KeyCode::Escape,
        ] {
            let serialized = SerializableKeyCode::from(key);
            assert_eq!(KeyCode::from(serialized), key);
        }
    }

    #[test]
    fn test_rebind_overrides_default() {
        let mut bindings = Keybindings::default();
        bindings.set(GameAction::Strike, KeyCode::KeyF);
        assert_eq!(bindings.key_for(GameAction::Strike), Some(KeyCode::KeyF));
    }
}
