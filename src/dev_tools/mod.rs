//! Development tools, only included with `cargo run --features dev`.
//!
//! F1 grants a bundle of resources, F2 drops a boss into the field.

use bevy::prelude::*;

use crate::gameplay::enemy::EnemyKind;
use crate::gameplay::sim::SimulationContext;
use crate::gameplay::spawn;
use crate::{GameSet, gameplay_running};

/// Resources granted per F1 press.
const GRANT_WOOD: u32 = 50;
const GRANT_GOLD: u32 = 500;
const GRANT_GEMS: u32 = 10;

fn grant_resources(keyboard: Res<ButtonInput<KeyCode>>, mut ctx: ResMut<SimulationContext>) {
    if !keyboard.just_pressed(KeyCode::F1) {
        return;
    }
    let player = &mut ctx.player;
    player.wood += GRANT_WOOD;
    player.gold += GRANT_GOLD;
    player.gems += GRANT_GEMS;
    info!("dev: granted {GRANT_WOOD} wood, {GRANT_GOLD} gold, {GRANT_GEMS} gems");
}

fn force_spawn_boss(keyboard: Res<ButtonInput<KeyCode>>, mut ctx: ResMut<SimulationContext>) {
    if !keyboard.just_pressed(KeyCode::F2) {
        return;
    }
    match spawn::spawn_enemy(&mut ctx, EnemyKind::Boss) {
        Ok(id) => info!("dev: spawned boss {id:?}"),
        Err(err) => warn!("dev: boss spawn failed: {err}"),
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (grant_resources, force_spawn_boss)
            .in_set(GameSet::Input)
            .run_if(gameplay_running.and(resource_exists::<SimulationContext>)),
    );
}
