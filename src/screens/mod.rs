//! Screen plugins for each game state.

mod in_game;
pub mod loading;

use bevy::prelude::*;

/// Primary game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[states(scoped_entities)]
pub enum GameState {
    /// Sprite sheets are loading (or failing over to colored rectangles).
    #[default]
    Loading,
    /// A run is active.
    InGame,
}

pub fn plugin(app: &mut App) {
    app.init_state::<GameState>();
    app.add_plugins((loading::plugin, in_game::plugin));
}
