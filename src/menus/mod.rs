//! Menu overlays shown on top of a run.
//!
//! The `Menu` state is orthogonal to `GameState`: `Menu::Pause` and the endgame overlays
//! appear while `GameState::InGame` is active and freeze the run underneath.

mod endgame;
mod pause;

use bevy::prelude::*;

use crate::screens::GameState;

/// Menu overlay states. Orthogonal to `GameState`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[states(scoped_entities)]
pub enum Menu {
    /// No menu overlay is active.
    #[default]
    None,
    /// Pause menu (shown in-game).
    Pause,
    /// Victory overlay (trophy brought home).
    Victory,
    /// Defeat overlay (player died).
    Defeat,
}

pub fn plugin(app: &mut App) {
    app.init_state::<Menu>();
    app.add_plugins((pause::plugin, endgame::plugin));

    // Any overlay stops the clock that drives the simulation.
    app.add_systems(OnExit(Menu::None), pause_virtual_time);
    app.add_systems(OnEnter(Menu::None), unpause_virtual_time);
    app.add_systems(OnExit(GameState::InGame), close_menu);
}

fn pause_virtual_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

fn unpause_virtual_time(mut time: ResMut<Time<Virtual>>) {
    time.unpause();
}

fn close_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::None);
}
