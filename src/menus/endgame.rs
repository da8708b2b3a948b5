//! Victory/Defeat overlay: run summary in a bordered panel with restart and quit buttons.

use bevy::prelude::*;

use super::Menu;
use crate::gameplay::sim::{DefeatReason, Outcome, RunStats, SimulationContext};
use crate::screens::GameState;
use crate::theme::{palette, widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Victory), spawn_victory_screen);
    app.add_systems(OnEnter(Menu::Defeat), spawn_defeat_screen);
}

/// Summary lines for the overlay: time survived, danger level, and kills.
#[must_use]
pub fn summary_text(stats: &RunStats, outcome: Option<&Outcome>) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_secs = stats.elapsed.max(0.0) as u32;
    let mut lines = vec![
        format!("Survived {:02}:{:02}", total_secs / 60, total_secs % 60),
        format!("Danger level {}", stats.level_reached),
        format!("Enemies defeated: {}", stats.total_kills()),
    ];
    lines.extend(
        stats
            .kills
            .iter()
            .filter(|(kind, _)| kind.is_boss() || kind.is_mini_boss())
            .map(|(kind, count)| format!("  {} x{count}", kind.display_name())),
    );
    if let Some(Outcome::Defeat(DefeatReason::Fault(fault))) = outcome {
        lines.push(format!("Run aborted: {fault}"));
    }
    lines.join("\n")
}

fn spawn_victory_screen(mut commands: Commands, ctx: Option<Res<SimulationContext>>) {
    spawn_endgame_overlay(
        &mut commands,
        "VICTORY!",
        palette::VICTORY_TEXT,
        Menu::Victory,
        ctx.as_deref(),
    );
}

fn spawn_defeat_screen(mut commands: Commands, ctx: Option<Res<SimulationContext>>) {
    spawn_endgame_overlay(
        &mut commands,
        "DEFEAT",
        palette::DEFEAT_TEXT,
        Menu::Defeat,
        ctx.as_deref(),
    );
}

/// Shared overlay spawning for both victory and defeat screens.
fn spawn_endgame_overlay(
    commands: &mut Commands,
    title: &str,
    title_color: Color,
    menu: Menu,
    ctx: Option<&SimulationContext>,
) {
    let summary = ctx.map_or_else(String::new, |ctx| {
        summary_text(&ctx.stats, ctx.outcome.as_ref())
    });
    commands.spawn((
        widget::ui_root("Endgame Screen"),
        BackgroundColor(palette::OVERLAY_BACKGROUND),
        GlobalZIndex(1),
        DespawnOnExit(menu),
        children![(
            Name::new("Endgame Panel"),
            Node {
                width: Val::Px(500.0),
                min_height: Val::Px(360.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::SpaceEvenly,
                row_gap: Val::Px(16.0),
                padding: UiRect::all(Val::Px(40.0)),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(palette::PANEL_BACKGROUND),
            BorderColor::all(palette::PANEL_BORDER),
            children![
                (
                    Text::new(title),
                    TextFont::from_font_size(palette::FONT_SIZE_HEADER),
                    TextColor(title_color),
                ),
                (
                    Text::new(summary),
                    TextFont::from_font_size(palette::FONT_SIZE_BODY),
                    TextColor(palette::BODY_TEXT),
                ),
                widget::button(
                    "Play Again",
                    |_: On<Pointer<Click>>, mut next_game: ResMut<NextState<GameState>>| {
                        next_game.set(GameState::Loading);
                    },
                ),
                widget::button(
                    "Quit",
                    |_: On<Pointer<Click>>, mut exit: MessageWriter<AppExit>| {
                        exit.write(AppExit::Success);
                    },
                ),
            ],
        )],
    ));
}
