//! Cosmetic Effect Playback
//!
//! Fire-and-forget visual effects with no gameplay impact. Combat code
//! emits `EffectRequest`s by name; unknown names are logged and ignored,
//! never fatal, and nothing here feeds back into AI or combat state.

use bevy::prelude::*;

use super::components::ArenaEntity;

/// Presentation options for a cosmetic effect.
#[derive(Clone, Debug)]
pub struct EffectOptions {
    pub color: Color,
    pub duration: f32,
    /// Final scale the effect expands to
    pub scale: f32,
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            duration: 0.15,
            scale: 1.5,
        }
    }
}

/// Request to play a named cosmetic effect at a world position.
#[derive(Event)]
pub struct EffectRequest {
    pub name: String,
    pub position: Vec3,
    pub options: EffectOptions,
}

/// A live expanding-ring effect. Grows from near zero to its final scale
/// while it ages out.
#[derive(Component)]
pub struct CosmeticEffect {
    pub age: f32,
    pub duration: f32,
    pub final_scale: f32,
    pub color: Color,
}

/// Materialize requested effects. Unknown effect names are warned about
/// and dropped.
pub fn play_effects(mut commands: Commands, mut requests: EventReader<EffectRequest>) {
    for request in requests.read() {
        match request.name.as_str() {
            "impact_ring" | "orb_burst" => {
                commands.spawn((
                    CosmeticEffect {
                        age: 0.0,
                        duration: request.options.duration,
                        final_scale: request.options.scale,
                        color: request.options.color,
                    },
                    Transform::from_translation(request.position).with_scale(Vec3::splat(0.05)),
                    ArenaEntity,
                ));
            }
            other => {
                warn!("Ignoring unknown effect '{}'", other);
            }
        }
    }
}

/// Age live effects, expanding them toward their final scale, and despawn
/// the finished ones.
pub fn update_cosmetic_effects(
    time: Res<Time>,
    mut commands: Commands,
    mut effects: Query<(Entity, &mut CosmeticEffect, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut effect, mut transform) in effects.iter_mut() {
        effect.age += dt;
        if effect.age >= effect.duration {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let progress = (effect.age / effect.duration).clamp(0.0, 1.0);
        transform.scale = Vec3::splat(0.05 + (effect.final_scale - 0.05) * progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_brief() {
        let options = EffectOptions::default();
        assert!(options.duration < 1.0);
        assert!(options.scale > 0.0);
    }
}
