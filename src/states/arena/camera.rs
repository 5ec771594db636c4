//! Arena Camera
//!
//! A simple smoothed follow camera behind and above the player. The
//! combat core only ever reads the camera transform (for camera-relative
//! movement and orb steering); nothing here feeds back into simulation
//! state.

use bevy::prelude::*;

use super::components::{ArenaCamera, PlayerCombat};

/// Camera offset from the player, in world space.
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 12.0, 14.0);
/// Smoothing factor per second for camera position.
const FOLLOW_LERP: f32 = 4.0;

/// Keep the camera trailing the player, looking at them.
pub fn follow_player(
    time: Res<Time>,
    players: Query<&Transform, (With<PlayerCombat>, Without<ArenaCamera>)>,
    mut cameras: Query<&mut Transform, (With<ArenaCamera>, Without<PlayerCombat>)>,
) {
    let Ok(player_transform) = players.get_single() else {
        return;
    };
    let Ok(mut camera_transform) = cameras.get_single_mut() else {
        return;
    };

    let target = player_transform.translation + CAMERA_OFFSET;
    let t = (FOLLOW_LERP * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target, t);

    let look_at = player_transform.translation + Vec3::Y;
    camera_transform.look_at(look_at, Vec3::Y);
}
