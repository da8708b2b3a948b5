//! Endgame detection: turns the run outcome into the victory or defeat overlay.

use bevy::prelude::*;

use crate::gameplay::sim::{Outcome, SimulationContext};
use crate::menus::Menu;
use crate::{GameSet, gameplay_running};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        detect_endgame
            .in_set(GameSet::Endgame)
            .run_if(gameplay_running.and(resource_exists::<SimulationContext>)),
    );
}

/// Opens the matching overlay once the simulation has decided the run.
fn detect_endgame(ctx: Res<SimulationContext>, mut next_menu: ResMut<NextState<Menu>>) {
    match ctx.outcome {
        Some(Outcome::Victory) => next_menu.set(Menu::Victory),
        Some(Outcome::Defeat(_)) => next_menu.set(Menu::Defeat),
        None => {}
    }
}
