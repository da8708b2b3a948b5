//! Tests for game state transitions through the full app plugin.

use bastion_survival::gameplay::sim::SimulationContext;
use bastion_survival::menus::Menu;
use bastion_survival::screens::GameState;
use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use pretty_assertions::assert_eq;

fn create_game_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.add_plugins(InputPlugin);
    app.add_plugins(bastion_survival::plugin);
    app
}

/// Without an asset server every sprite sheet is missing, so loading settles at once.
fn enter_game(app: &mut App) {
    app.update();
    app.update();
}

#[test]
fn game_initializes_in_loading_state() {
    let app = create_game_app();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Loading);
}

#[test]
fn loading_falls_through_to_a_fresh_run() {
    let mut app = create_game_app();
    enter_game(&mut app);

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::InGame);
    assert!(app.world().get_resource::<SimulationContext>().is_some());
}

#[test]
fn pause_overlay_freezes_the_run() {
    let mut app = create_game_app();
    enter_game(&mut app);

    app.world_mut()
        .resource_mut::<NextState<Menu>>()
        .set(Menu::Pause);
    app.update();
    let paused_at = app.world().resource::<SimulationContext>().clock;
    app.update();
    app.update();

    assert_eq!(*app.world().resource::<State<Menu>>().get(), Menu::Pause);
    assert_eq!(app.world().resource::<SimulationContext>().clock, paused_at);
}

#[test]
fn restart_builds_a_new_run() {
    let mut app = create_game_app();
    enter_game(&mut app);
    app.world_mut()
        .resource_mut::<SimulationContext>()
        .player
        .gold = 999;

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Loading);
    app.update();
    assert!(app.world().get_resource::<SimulationContext>().is_none());

    enter_game(&mut app);
    let ctx = app.world().resource::<SimulationContext>();
    assert_eq!(ctx.player.gold, 0);
}
