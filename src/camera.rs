//! The single 2D camera. It persists across all states so UI is always visible, and follows
//! the player while a run is active.

use bevy::camera::ScalingMode;
use bevy::prelude::*;

use crate::GameSet;
use crate::gameplay::sim::SimulationContext;

/// World units visible vertically, whatever the window size.
const VIEW_HEIGHT: f32 = 900.0;

/// Marker for the global camera.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MainCamera;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<MainCamera>();
    app.add_systems(Startup, spawn_camera);
    app.add_systems(
        Update,
        follow_player
            .in_set(GameSet::Ui)
            .run_if(resource_exists::<SimulationContext>),
    );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Main Camera"),
        MainCamera,
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEW_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));
}

/// Camera center that keeps `target` in view without showing past the world edge. Worlds
/// smaller than the view are centered instead.
#[must_use]
pub fn camera_center(target: Vec2, half_view: Vec2, world: Vec2) -> Vec2 {
    let axis = |target: f32, half: f32, extent: f32| {
        if extent <= half * 2.0 {
            extent / 2.0
        } else {
            target.clamp(half, extent - half)
        }
    };
    Vec2::new(
        axis(target.x, half_view.x, world.x),
        axis(target.y, half_view.y, world.y),
    )
}

fn follow_player(
    ctx: Res<SimulationContext>,
    windows: Query<&Window>,
    mut camera: Single<&mut Transform, With<MainCamera>>,
) {
    let aspect = windows
        .iter()
        .next()
        .map_or(16.0 / 9.0, |window| window.width() / window.height().max(1.0));
    let half_view = Vec2::new(VIEW_HEIGHT * aspect, VIEW_HEIGHT) / 2.0;
    let center = camera_center(ctx.player.body.center(), half_view, ctx.config.world_size);
    camera.translation.x = center.x;
    camera.translation.y = center.y;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WORLD: Vec2 = Vec2::new(3200.0, 2400.0);
    const HALF_VIEW: Vec2 = Vec2::new(800.0, 450.0);

    #[test]
    fn camera_tracks_player_in_open_field() {
        let target = Vec2::new(1600.0, 1200.0);
        assert_eq!(camera_center(target, HALF_VIEW, WORLD), target);
    }

    #[test]
    fn camera_stops_at_world_edge() {
        assert_eq!(
            camera_center(Vec2::new(10.0, 2390.0), HALF_VIEW, WORLD),
            Vec2::new(800.0, 1950.0)
        );
    }

    #[test]
    fn small_world_is_centered() {
        let world = Vec2::new(1000.0, 600.0);
        assert_eq!(
            camera_center(Vec2::ZERO, HALF_VIEW, world),
            Vec2::new(500.0, 300.0)
        );
    }
}
