//! Shared UI theme: color palette, button feedback, and reusable widget constructors.

pub mod palette;
pub mod widget;

use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.register_type::<widget::InteractionPalette>();
    app.add_systems(Update, widget::apply_interaction_palette);
}
