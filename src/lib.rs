//! Bastion survival: a top-down survival game around a safe zone.
//!
//! The rules live in [`gameplay`] as a deterministic simulation; the rest of the crate hosts
//! it in Bevy (screens, overlays, input, sprites, HUD).

mod camera;
#[cfg(feature = "dev")]
mod dev_tools;
pub mod gameplay;
pub mod menus;
pub mod screens;
#[cfg(test)]
pub mod testing;
pub mod theme;

use bevy::prelude::*;

use crate::menus::Menu;
use crate::screens::GameState;

// === Z-Layers ===

pub const Z_BACKGROUND: f32 = -10.0;
pub const Z_ZONE: f32 = -5.0;
pub const Z_TREE: f32 = 0.0;
pub const Z_STRUCTURE: f32 = 1.0;
pub const Z_TROPHY: f32 = 2.0;
pub const Z_ENEMY: f32 = 3.0;
pub const Z_PLAYER: f32 = 4.0;
pub const Z_PROJECTILE: f32 = 5.0;
pub const Z_HEALTH_BAR: f32 = 6.0;
pub const Z_EFFECT: f32 = 7.0;

/// Per-frame ordering. Input feeds the simulation, the simulation decides the outcome,
/// and the UI mirrors whatever state results.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Simulation,
    Endgame,
    Ui,
}

/// True while a run is on screen with no overlay open.
pub fn gameplay_running(game_state: Res<State<GameState>>, menu: Res<State<Menu>>) -> bool {
    *game_state.get() == GameState::InGame && *menu.get() == Menu::None
}

pub fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GameSet::Input,
            GameSet::Simulation,
            GameSet::Endgame,
            GameSet::Ui,
        )
            .chain(),
    );

    app.add_plugins((
        screens::plugin,
        menus::plugin,
        theme::plugin,
        gameplay::plugin,
        camera::plugin,
    ));

    #[cfg(feature = "dev")]
    app.add_plugins(dev_tools::plugin);
}
