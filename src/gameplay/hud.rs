//! In-game HUD: a stats panel (top left) and the message banner (top center).

use bevy::prelude::*;

use super::player::weapons::upgrade_cost;
use super::player::{Player, dodge_upgrade_cost, xp_to_next};
use super::sim::SimulationContext;
use crate::screens::GameState;
use crate::theme::{palette, widget};
use crate::{GameSet, gameplay_running};

// === Layout Constants ===

const PANEL_PADDING: f32 = 10.0;
const LINE_GAP: f32 = 4.0;
const BANNER_TOP: f32 = 24.0;

// === Components ===

/// One line of the stats panel. Text is rebuilt from the context every frame.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudLine {
    Health,
    Progress,
    Resources,
    Weapon,
    Dodge,
    Skills,
    Danger,
    Objective,
}

impl HudLine {
    pub const ALL: [Self; 8] = [
        Self::Health,
        Self::Progress,
        Self::Resources,
        Self::Weapon,
        Self::Dodge,
        Self::Skills,
        Self::Danger,
        Self::Objective,
    ];

    const fn color(self) -> Color {
        match self {
            Self::Resources => palette::GOLD_TEXT,
            Self::Danger => palette::DEFEAT_TEXT,
            _ => palette::HEADER_TEXT,
        }
    }
}

/// Marker for the transient message banner.
#[derive(Component, Debug, Clone, Copy)]
pub struct MessageBanner;

// === Text ===

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clock_text(secs: f32) -> String {
    let total = secs.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn weapon_text(player: &Player) -> String {
    let active = player.weapons.active_tier();
    let current = format!(
        "{} Lv {}",
        active.display_name(),
        player.weapons.level(active)
    );
    match player.weapons.next_upgrade() {
        Some(next) => {
            let cost = upgrade_cost(next, player.weapons.level(next));
            format!("{current}  [U] {} +1: {cost}g", next.display_name())
        }
        None => format!("{current}  (max)"),
    }
}

fn skills_text(player: &Player) -> String {
    player
        .skills
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let name = slot.kind.display_name();
            if slot.level == 0 {
                format!("[{}] {name} -", index + 1)
            } else {
                format!("[{}] {name} {}", index + 1, slot.level)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn objective_text(ctx: &SimulationContext) -> String {
    if ctx.player.carrying_trophy {
        "Carry the trophy to the safe zone!".to_string()
    } else if ctx.trophy.is_some() {
        "The trophy is on the ground: pick it up".to_string()
    } else {
        "Survive. Defeat the boss to claim its trophy".to_string()
    }
}

/// Current text of one HUD line.
#[must_use]
pub fn hud_line_text(line: HudLine, ctx: &SimulationContext) -> String {
    let player = &ctx.player;
    match line {
        HudLine::Health => format!(
            "HP {:.0}/{:.0}",
            player.health.current.ceil(),
            player.health.max
        ),
        HudLine::Progress => format!(
            "Level {}  XP {}/{}",
            player.level,
            player.xp,
            xp_to_next(player.level)
        ),
        HudLine::Resources => format!(
            "Wood {}  Gold {}  Gems {}",
            player.wood, player.gold, player.gems
        ),
        HudLine::Weapon => weapon_text(player),
        HudLine::Dodge => format!(
            "Dodge {:.0}%  [O] +1: {}g",
            player.dodge_chance() * 100.0,
            dodge_upgrade_cost(player.dodge_level)
        ),
        HudLine::Skills => skills_text(player),
        HudLine::Danger => format!(
            "Danger {}  {}",
            ctx.director.level(),
            clock_text(ctx.stats.elapsed)
        ),
        HudLine::Objective => objective_text(ctx),
    }
}

// === Systems ===

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HUD Panel"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(PANEL_PADDING),
            left: Val::Px(PANEL_PADDING),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(LINE_GAP),
            padding: UiRect::all(Val::Px(PANEL_PADDING)),
            ..default()
        },
        BackgroundColor(palette::HUD_BACKGROUND),
        DespawnOnExit(GameState::InGame),
        Children::spawn(SpawnWith(|parent: &mut ChildSpawner| {
            for line in HudLine::ALL {
                parent.spawn((
                    Name::new(format!("HUD {line:?}")),
                    line,
                    widget::hud_text("", line.color()),
                ));
            }
        })),
    ));

    commands.spawn((
        Name::new("Message Banner"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(BANNER_TOP),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        DespawnOnExit(GameState::InGame),
        children![(
            MessageBanner,
            Text::new(""),
            TextFont::from_font_size(palette::FONT_SIZE_PROMPT),
            TextColor(palette::HEADER_TEXT),
        )],
    ));
}

fn update_hud(ctx: Res<SimulationContext>, mut lines: Query<(&HudLine, &mut Text)>) {
    for (line, mut text) in &mut lines {
        let updated = hud_line_text(*line, &ctx);
        if text.0 != updated {
            text.0 = updated;
        }
    }
}

fn update_banner(
    ctx: Res<SimulationContext>,
    mut banner: Single<&mut Text, With<MessageBanner>>,
) {
    let updated = ctx
        .messages
        .current()
        .map_or_else(String::new, |message| message.text.clone());
    if banner.0 != updated {
        banner.0 = updated;
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud);
    app.add_systems(
        Update,
        (update_hud, update_banner)
            .in_set(GameSet::Ui)
            .run_if(gameplay_running.and(resource_exists::<SimulationContext>)),
    );
}
