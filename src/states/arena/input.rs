//! Keyboard Input
//!
//! Translates raw key state into the `PlayerIntent` resource consumed by
//! the player phase. This is the only place the simulation touches the
//! keyboard; the headless autopilot writes the same resource instead.

use bevy::prelude::*;

use crate::keybindings::{GameAction, Keybindings};

use super::components::PlayerIntent;

/// Read held and just-pressed keys into the player intent for this tick.
///
/// Runs before `CombatPhase::PlayerActions` so actions resolve the same
/// frame they are pressed.
pub fn read_player_input(
    keybindings: Res<Keybindings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<PlayerIntent>,
) {
    let axis = |negative: GameAction, positive: GameAction| -> f32 {
        let mut value = 0.0;
        if keybindings.action_pressed(negative, &keyboard) {
            value -= 1.0;
        }
        if keybindings.action_pressed(positive, &keyboard) {
            value += 1.0;
        }
        value
    };

    intent.move_input = Vec2::new(
        axis(GameAction::MoveLeft, GameAction::MoveRight),
        axis(GameAction::MoveBackward, GameAction::MoveForward),
    );
    intent.orb_steer = Vec2::new(
        axis(GameAction::OrbSteerLeft, GameAction::OrbSteerRight),
        axis(GameAction::OrbSteerBackward, GameAction::OrbSteerForward),
    );

    intent.guard = keybindings.action_pressed(GameAction::Guard, &keyboard);

    if keybindings.action_just_pressed(GameAction::Strike, &keyboard) {
        intent.strike = true;
    }
    if keybindings.action_just_pressed(GameAction::Punch, &keyboard) {
        intent.punch = true;
    }
    if keybindings.action_just_pressed(GameAction::ActivateSkill, &keyboard) {
        intent.activate_skill = true;
    }
    if keybindings.action_just_pressed(GameAction::Jump, &keyboard) {
        intent.jump = true;
    }
}

/// ESC returns to the results screen (forfeiting the run) or quits.
pub fn handle_back_key(
    keybindings: Res<Keybindings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keybindings.action_just_pressed(GameAction::Back, &keyboard) {
        exit.send(AppExit::Success);
    }
}
