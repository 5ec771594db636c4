//! Game state management
//!
//! Defines the core game states and transitions between them.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub mod arena;

pub use arena::{EncounterConfig, EncounterConfigPlugin};

use crate::keybindings::{GameAction, Keybindings};

use arena::{ArenaOutcome, ArenaSummary, CombatPhase};

/// The core game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Active boss fight
    #[default]
    Arena,
    /// Post-run results and restart prompt
    Results,
}

/// Plugin wiring the arena simulation and the results screen into the
/// graphical app.
pub struct StatesPlugin;

impl Plugin for StatesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<crate::combat::log::CombatLog>()
            .insert_resource(Keybindings::load());

        arena::configure_combat_phase_ordering(app);
        arena::add_core_combat_systems(app, in_state(GameState::Arena));

        app.add_systems(
            OnEnter(GameState::Arena),
            (arena::setup_arena, arena::rendering::setup_scene).chain(),
        )
        .add_systems(OnExit(GameState::Arena), arena::cleanup_arena)
        .add_systems(
            Update,
            (
                arena::input::read_player_input.before(CombatPhase::PlayerActions),
                arena::input::handle_back_key,
                arena::check_arena_end.after(CombatPhase::HazardSweep),
                arena::camera::follow_player.after(CombatPhase::HazardSweep),
            )
                .run_if(in_state(GameState::Arena)),
        )
        .add_systems(
            Update,
            (
                arena::rendering::attach_player_visuals,
                arena::rendering::attach_enemy_visuals,
                arena::rendering::attach_hazard_visuals,
                arena::rendering::apply_visibility_flags,
                arena::rendering::render_health_bars,
                arena::rendering::render_hud,
            )
                .run_if(in_state(GameState::Arena)),
        )
        .add_systems(
            Update,
            (results_ui, results_input).run_if(in_state(GameState::Results)),
        );
    }
}

/// Results screen: outcome, run statistics, restart prompt.
fn results_ui(mut contexts: EguiContexts, summary: Option<Res<ArenaSummary>>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let Some(summary) = summary else {
        return;
    };

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);

            let (headline, color) = match summary.outcome {
                ArenaOutcome::PlayerVictory => ("VICTORY", egui::Color32::from_rgb(120, 220, 120)),
                ArenaOutcome::PlayerDefeat => ("DEFEATED", egui::Color32::from_rgb(230, 80, 80)),
                ArenaOutcome::Timeout => ("TIME UP", egui::Color32::from_rgb(220, 200, 90)),
            };
            ui.label(egui::RichText::new(headline).size(42.0).color(color).strong());

            ui.add_space(30.0);
            ui.label(format!("Run time: {:.1}s", summary.elapsed));
            ui.label(format!(
                "Enemies defeated: {}/{}",
                summary.enemies_defeated, summary.enemies_total
            ));
            ui.label(format!("Damage dealt: {:.0}", summary.damage_dealt));
            ui.label(format!("Damage taken: {:.0}", summary.damage_taken));
            ui.label(format!(
                "Health remaining: {:.0}/{:.0}",
                summary.player_health, summary.player_max_health
            ));

            ui.add_space(40.0);
            ui.label("ENTER to fight again - ESC to quit");
        });
    });
}

/// Restart or quit from the results screen.
fn results_input(
    keybindings: Res<Keybindings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    if keybindings.action_just_pressed(GameAction::Confirm, &keyboard) {
        next_state.set(GameState::Arena);
    }
    if keybindings.action_just_pressed(GameAction::Back, &keyboard) {
        exit.send(AppExit::Success);
    }
}
