//! Keyboard and mouse input gathered into [`PlayerIntents`] for the next tick.

use bevy::prelude::*;

use super::actions::Intent;
use super::structures::StructureKind;
use crate::{GameSet, gameplay_running};

/// Skill upgrade keys, by slot.
const SKILL_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

/// What the player asked for since the last tick: held movement plus discrete intents.
/// The simulation reads it once per tick; the host clears `intents` afterwards.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PlayerIntents {
    /// Raw movement axes in `[-1, 1]`, y up.
    pub movement: Vec2,
    pub intents: Vec<Intent>,
}

/// WASD and arrow keys as a movement vector (y up, not normalized).
#[must_use]
pub fn movement_from_keys(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let axis = |positive: [KeyCode; 2], negative: [KeyCode; 2]| {
        let pos = if keyboard.any_pressed(positive) { 1.0 } else { 0.0 };
        let neg = if keyboard.any_pressed(negative) { 1.0 } else { 0.0 };
        pos - neg
    };
    Vec2::new(
        axis(
            [KeyCode::KeyD, KeyCode::ArrowRight],
            [KeyCode::KeyA, KeyCode::ArrowLeft],
        ),
        axis(
            [KeyCode::KeyW, KeyCode::ArrowUp],
            [KeyCode::KeyS, KeyCode::ArrowDown],
        ),
    )
}

fn gather_keyboard(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerIntents>) {
    input.movement = movement_from_keys(&keyboard);

    // Held Space keeps attacking; the weapon cooldown paces it.
    if keyboard.pressed(KeyCode::Space) {
        input.intents.push(Intent::AttackInteract);
    }
    if keyboard.any_just_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        input.intents.push(Intent::Dash);
    }
    for (index, key) in SKILL_KEYS.into_iter().enumerate() {
        if keyboard.just_pressed(key) {
            input.intents.push(Intent::UpgradeSkill(index));
        }
    }
    if keyboard.just_pressed(KeyCode::KeyU) {
        input.intents.push(Intent::UpgradeWeapon);
    }
    if keyboard.just_pressed(KeyCode::KeyO) {
        input.intents.push(Intent::UpgradeDodge);
    }
}

/// Left click builds a fence, right click a tower, at the world point under the cursor.
fn gather_mouse(
    mouse: Res<ButtonInput<MouseButton>>,
    window: Single<&Window>,
    camera: Single<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut input: ResMut<PlayerIntents>,
) {
    let kind = if mouse.just_pressed(MouseButton::Left) {
        StructureKind::Fence
    } else if mouse.just_pressed(MouseButton::Right) {
        StructureKind::Tower
    } else {
        return;
    };
    let (camera, camera_global) = *camera;
    let Some(at) = window
        .cursor_position()
        .and_then(|screen_pos| camera.viewport_to_world_2d(camera_global, screen_pos).ok())
    else {
        return;
    };
    input.intents.push(Intent::Build { kind, at });
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PlayerIntents>();
    app.add_systems(
        Update,
        (gather_keyboard, gather_mouse)
            .in_set(GameSet::Input)
            .run_if(gameplay_running),
    );
}
