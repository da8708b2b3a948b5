//! Testing utilities for Bevy systems and simulation fixtures.

#![cfg(test)]

use bevy::ecs::query::QueryFilter;
use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::gameplay::body::EntityId;
use crate::gameplay::config::SimConfig;
use crate::gameplay::enemy::{Enemy, EnemyKind};
use crate::gameplay::sim::SimulationContext;
use crate::menus::Menu;
use crate::screens::GameState;

// === Bevy apps ===

/// Minimal app with states, input, and both state machines initialized.
pub fn create_base_test_app() -> App {
    let mut app = create_base_test_app_no_input();
    app.add_plugins(InputPlugin);
    app
}

/// Like [`create_base_test_app`] but without `InputPlugin`, so tests can press keys
/// without the input systems clearing them mid-frame.
pub fn create_base_test_app_no_input() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app.init_state::<Menu>();
    app
}

/// Inserts keyboard and mouse resources for apps without `InputPlugin`.
pub fn init_input_resources(app: &mut App) {
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_resource::<ButtonInput<MouseButton>>();
}

/// Moves the app into `GameState::InGame` and lets `OnEnter` systems run.
pub fn transition_to_ingame(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app.update();
}

/// Asserts the number of entities matching `F`.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let mut query = app.world_mut().query_filtered::<Entity, F>();
    let actual = query.iter(app.world()).count();
    assert_eq!(
        actual,
        expected,
        "expected {expected} entities matching {}, found {actual}",
        std::any::type_name::<F>()
    );
}

// === Simulation fixtures ===

/// A fresh run on the default map with the forest and any enemies cleared, so tests
/// control exactly what is on the field. The player stands in the safe zone.
pub fn test_context() -> SimulationContext {
    let mut ctx = SimulationContext::new(SimConfig::default());
    ctx.trees.clear();
    ctx.enemies.clear();
    ctx
}

/// Adds a level-1 enemy of `kind` centered at `center`. Returns its id.
pub fn spawn_test_enemy(ctx: &mut SimulationContext, kind: EnemyKind, center: Vec2) -> EntityId {
    let id = ctx.ids.next_id();
    let enemy = Enemy::spawn(id, kind, 1, center, &mut ctx.rng);
    ctx.enemies.push(enemy);
    id
}
