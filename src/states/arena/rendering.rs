//! Arena Rendering
//!
//! Visuals for the 3D scene and the egui HUD. Everything here is
//! presentation only:
//!
//! - Scene setup (camera, lights, floor)
//! - Meshes attached to newly spawned combatants, hazards, and domain
//!   markers (`Added<T>` pattern, so headless mode never touches meshes)
//! - World-space health bars, the player status panel, and the combat log

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::combat::log::CombatLog;

use super::components::*;
use super::effects::CosmeticEffect;
use super::encounter::EncounterConfig;

/// Height of world-space health bars above a combatant's head.
const HEALTH_BAR_LIFT: f32 = 1.2;

/// Spawn the camera, lights, and arena floor.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    encounter: Res<EncounterConfig>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 12.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
        ArenaCamera,
        ArenaEntity,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 18000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        ArenaEntity,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.4, 0.4, 0.5),
        brightness: 250.0,
    });

    // Arena floor, slightly larger than the playable circle
    let floor_size = encounter.arena_radius * 2.0 + 10.0;
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(floor_size, floor_size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.16, 0.19, 0.23),
            perceptual_roughness: 0.9,
            ..default()
        })),
        ArenaEntity,
    ));
}

/// Attach a capsule mesh to the newly spawned player.
pub fn attach_player_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    players: Query<Entity, (Added<PlayerCombat>, Without<Mesh3d>)>,
) {
    for entity in players.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Capsule3d::new(0.5, 1.2))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.25, 0.55, 1.0),
                perceptual_roughness: 0.5,
                metallic: 0.2,
                ..default()
            })),
        ));
    }
}

/// Attach a cuboid mesh to each newly spawned enemy, sized and colored by
/// its archetype.
pub fn attach_enemy_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    enemies: Query<(Entity, &Enemy), (Added<Enemy>, Without<Mesh3d>)>,
) {
    for (entity, enemy) in enemies.iter() {
        let size = enemy.config.size;
        let [r, g, b] = enemy.config.color;
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(size, size, size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(r, g, b),
                perceptual_roughness: 0.6,
                ..default()
            })),
        ));
    }
}

/// Attach meshes to newly spawned hazards and domain markers.
pub fn attach_hazard_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    bolts: Query<Entity, (Added<Bolt>, Without<Mesh3d>)>,
    dismantles: Query<Entity, (Added<DismantleBolt>, Without<Mesh3d>)>,
    orbs: Query<Entity, (Added<GravityOrb>, Without<Mesh3d>)>,
    mut domes: Query<(Entity, &DomainDome, &mut Transform), (Added<DomainDome>, Without<Mesh3d>)>,
    rings: Query<(Entity, &DomainRing), (Added<DomainRing>, Without<Mesh3d>)>,
    effects: Query<(Entity, &CosmeticEffect), (Added<CosmeticEffect>, Without<Mesh3d>)>,
) {
    for entity in bolts.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(0.3))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.98, 0.69, 0.02),
                emissive: LinearRgba::rgb(1.2, 0.9, 0.1),
                ..default()
            })),
        ));
    }

    for entity in dismantles.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(0.08, 0.08, 1.5))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.1, 0.1),
                emissive: LinearRgba::rgb(1.5, 0.2, 0.2),
                unlit: true,
                ..default()
            })),
        ));
    }

    for entity in orbs.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(1.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(0.0, 0.67, 1.0, 0.7),
                emissive: LinearRgba::rgb(0.2, 0.8, 1.4),
                alpha_mode: AlphaMode::Blend,
                ..default()
            })),
        ));
    }

    for (entity, dome, mut transform) in domes.iter_mut() {
        // Squashed sphere: wide and low, like a dome over the ground
        transform.scale = Vec3::new(dome.radius * 1.5, dome.radius * 0.8, dome.radius * 1.5);
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(1.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(0.1, 0.0, 0.0, 0.4),
                alpha_mode: AlphaMode::Blend,
                cull_mode: None,
                unlit: true,
                ..default()
            })),
        ));
    }

    for (entity, ring) in rings.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Torus {
                minor_radius: 0.1,
                major_radius: ring.radius,
            })),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(1.0, 0.0, 0.0, 0.7),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
        ));
    }

    for (entity, effect) in effects.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Torus {
                minor_radius: 0.08,
                major_radius: 1.0,
            })),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: effect.color,
                unlit: true,
                ..default()
            })),
        ));
    }
}

/// Hide bodies the simulation has flagged invisible (inert dismantle
/// slashes, enemies eliminated earlier this frame).
pub fn apply_visibility_flags(
    mut flagged: Query<(&Visible, &mut Visibility), Changed<Visible>>,
    mut dismantles: Query<(&DismantleBolt, &mut Visibility), Without<Visible>>,
) {
    for (visible, mut visibility) in flagged.iter_mut() {
        *visibility = if visible.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for (bolt, mut visibility) in dismantles.iter_mut() {
        if bolt.hit {
            *visibility = Visibility::Hidden;
        }
    }
}

/// World-space health bars over every living combatant.
pub fn render_health_bars(
    mut contexts: EguiContexts,
    players: Query<(&Transform, &Health), (With<PlayerCombat>, Without<Enemy>)>,
    enemies: Query<(&Transform, &Health, &Enemy), Without<PlayerCombat>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<ArenaCamera>>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };

    egui::Area::new(egui::Id::new("health_bars"))
        .fixed_pos(egui::pos2(0.0, 0.0))
        .show(ctx, |ui| {
            let draw_bar = |world_pos: Vec3, fraction: f32, width: f32| {
                let Ok(screen_pos) = camera.world_to_viewport(camera_transform, world_pos) else {
                    return;
                };
                let bar_height = 6.0;
                let bar_pos = egui::pos2(screen_pos.x - width / 2.0, screen_pos.y);

                ui.painter().rect_filled(
                    egui::Rect::from_min_size(bar_pos, egui::vec2(width, bar_height)),
                    2.0,
                    egui::Color32::from_rgb(30, 30, 30),
                );

                let color = if fraction > 0.5 {
                    egui::Color32::from_rgb(0, 200, 0)
                } else if fraction > 0.25 {
                    egui::Color32::from_rgb(255, 200, 0)
                } else {
                    egui::Color32::from_rgb(200, 0, 0)
                };
                ui.painter().rect_filled(
                    egui::Rect::from_min_size(bar_pos, egui::vec2(width * fraction, bar_height)),
                    2.0,
                    color,
                );
            };

            for (transform, health) in players.iter() {
                if health.is_alive() {
                    let lift = Vec3::Y * (2.0 + HEALTH_BAR_LIFT);
                    draw_bar(transform.translation + lift, health.fraction(), 50.0);
                }
            }
            for (transform, health, enemy) in enemies.iter() {
                if health.is_alive() {
                    let lift = Vec3::Y * (enemy.config.size / 2.0 + HEALTH_BAR_LIFT);
                    draw_bar(transform.translation + lift, health.fraction(), 44.0);
                }
            }
        });
}

/// The player status panel: health, cursed energy, skill cooldown, and
/// the recent combat log.
pub fn render_hud(
    mut contexts: EguiContexts,
    players: Query<(&Health, &CursedEnergy, &PlayerCombat, &InfinityGuard)>,
    combat_log: Res<CombatLog>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let Ok((health, energy, combat, guard)) = players.get_single() else {
        return;
    };

    egui::Window::new("Player")
        .anchor(egui::Align2::LEFT_BOTTOM, [10.0, -10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .show(ctx, |ui| {
            ui.set_width(220.0);

            ui.add(
                egui::ProgressBar::new(health.fraction())
                    .fill(egui::Color32::from_rgb(200, 40, 40))
                    .text(format!("HP {:.0}/{:.0}", health.current, health.max)),
            );
            ui.add(
                egui::ProgressBar::new(energy.current / energy.max)
                    .fill(egui::Color32::from_rgb(60, 120, 230))
                    .text(format!(
                        "Cursed Energy {:.0}/{:.0}",
                        energy.current, energy.max
                    )),
            );

            let skill_text = if combat.skill_cooldown_left > 0.0 {
                format!("Gravity orb: {:.1}s", combat.skill_cooldown_left)
            } else {
                "Gravity orb: ready".to_string()
            };
            ui.label(skill_text);
            if guard.active {
                ui.colored_label(egui::Color32::from_rgb(140, 200, 255), "Infinity guard");
            }
        });

    egui::Window::new("Combat Log")
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .show(ctx, |ui| {
            ui.set_width(320.0);
            for entry in combat_log.recent(8) {
                ui.label(
                    egui::RichText::new(format!("[{:>6.1}] {}", entry.timestamp, entry.message))
                        .size(11.0)
                        .color(egui::Color32::from_rgb(190, 190, 190)),
                );
            }
        });
}
