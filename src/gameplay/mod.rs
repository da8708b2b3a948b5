//! Gameplay: the deterministic simulation core and the Bevy systems that drive and draw it.
//!
//! Everything under `sim` and its helpers is plain Rust over [`sim::SimulationContext`]. The
//! plugin here owns the context's lifetime (one per run) and advances it once per frame.

pub mod actions;
pub mod body;
pub mod combat;
pub mod config;
pub mod effects;
pub mod enemy;
mod endgame;
pub mod error;
pub mod geometry;
mod hud;
pub mod input;
pub mod messages;
pub mod objective;
pub mod player;
pub mod projectile;
mod render;
pub mod sim;
pub mod spawn;
pub mod structures;
pub mod trees;

use bevy::prelude::*;

use self::config::SimConfig;
use self::input::PlayerIntents;
use self::sim::SimulationContext;
use crate::screens::GameState;
use crate::{GameSet, gameplay_running};

/// Configuration used for the next run. Seeded with the default seed unless overridden.
#[derive(Resource, Debug, Default, Clone)]
pub struct RunConfig(pub SimConfig);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<RunConfig>();
    app.add_systems(OnEnter(GameState::InGame), start_run)
        .add_systems(OnExit(GameState::InGame), end_run);

    app.add_plugins((input::plugin, render::plugin, hud::plugin, endgame::plugin));

    app.add_systems(
        Update,
        run_simulation
            .in_set(GameSet::Simulation)
            .run_if(gameplay_running.and(resource_exists::<SimulationContext>)),
    );
}

/// Fresh context for every run, so a restart starts from the seed again.
fn start_run(mut commands: Commands, config: Res<RunConfig>) {
    commands.insert_resource(SimulationContext::new(config.0.clone()));
}

fn end_run(mut commands: Commands) {
    commands.remove_resource::<SimulationContext>();
}

/// Advances the simulation by one frame and consumes the frame's intents.
fn run_simulation(
    time: Res<Time>,
    mut ctx: ResMut<SimulationContext>,
    mut input: ResMut<PlayerIntents>,
) {
    sim::tick(&mut ctx, &input, time.delta_secs());
    input.intents.clear();
}
