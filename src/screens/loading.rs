//! Loading screen: waits for every sprite sheet to load or fail, then starts the run.
//!
//! A sheet that fails to load is recorded as missing and the renderer draws colored
//! rectangles in its place, so a missing image never blocks the game.

use std::collections::BTreeMap;

use bevy::asset::LoadState;
use bevy::prelude::*;

use super::GameState;

/// One image file per group of sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteSheet {
    Player,
    Enemies,
    Bosses,
    Structures,
    Trees,
    Projectiles,
}

impl SpriteSheet {
    pub const ALL: [Self; 6] = [
        Self::Player,
        Self::Enemies,
        Self::Bosses,
        Self::Structures,
        Self::Trees,
        Self::Projectiles,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Player => "sprites/player.png",
            Self::Enemies => "sprites/enemies.png",
            Self::Bosses => "sprites/bosses.png",
            Self::Structures => "sprites/structures.png",
            Self::Trees => "sprites/trees.png",
            Self::Projectiles => "sprites/projectiles.png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetStatus {
    Loading(Handle<Image>),
    Ready(Handle<Image>),
    /// Failed or no asset server: draw colored rectangles instead.
    Missing,
}

/// Ready flag per sprite sheet.
#[derive(Resource, Debug, Default, Clone)]
pub struct AssetReadiness {
    sheets: BTreeMap<SpriteSheet, SheetStatus>,
}

impl AssetReadiness {
    /// True once no sheet is still loading.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        SpriteSheet::ALL.iter().all(|sheet| {
            self.sheets
                .get(sheet)
                .is_some_and(|status| !matches!(status, SheetStatus::Loading(_)))
        })
    }

    /// The loaded image for `sheet`, or `None` when the renderer should fall back.
    #[must_use]
    pub fn image(&self, sheet: SpriteSheet) -> Option<Handle<Image>> {
        match self.sheets.get(&sheet) {
            Some(SheetStatus::Ready(handle)) => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, sheet: SpriteSheet, status: SheetStatus) {
        self.sheets.insert(sheet, status);
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<AssetReadiness>();
    app.add_systems(
        OnEnter(GameState::Loading),
        (setup_loading_screen, start_loading),
    )
    .add_systems(
        Update,
        check_loading_complete.run_if(in_state(GameState::Loading)),
    );
}

fn setup_loading_screen(mut commands: Commands) {
    commands.spawn((
        crate::theme::widget::header("Loading..."),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            ..default()
        },
        DespawnOnExit(GameState::Loading),
    ));
}

fn start_loading(asset_server: Option<Res<AssetServer>>, mut readiness: ResMut<AssetReadiness>) {
    for sheet in SpriteSheet::ALL {
        let status = match asset_server.as_deref() {
            Some(server) => SheetStatus::Loading(server.load(sheet.path())),
            None => SheetStatus::Missing,
        };
        readiness.set(sheet, status);
    }
}

fn check_loading_complete(
    asset_server: Option<Res<AssetServer>>,
    mut readiness: ResMut<AssetReadiness>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if let Some(server) = asset_server.as_deref() {
        for sheet in SpriteSheet::ALL {
            let Some(SheetStatus::Loading(handle)) = readiness.sheets.get(&sheet).cloned() else {
                continue;
            };
            match server.load_state(handle.id()) {
                LoadState::Loaded => readiness.set(sheet, SheetStatus::Ready(handle)),
                LoadState::Failed(err) => {
                    warn!("{} unavailable, using colored rectangles: {err}", sheet.path());
                    readiness.set(sheet, SheetStatus::Missing);
                }
                LoadState::NotLoaded | LoadState::Loading => {}
            }
        }
    }

    if readiness.is_settled() {
        info!("assets settled, starting run");
        next_state.set(GameState::InGame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn readiness_waits_for_every_sheet() {
        let mut readiness = AssetReadiness::default();
        assert!(!readiness.is_settled());
        for sheet in SpriteSheet::ALL {
            readiness.set(sheet, SheetStatus::Missing);
        }
        assert!(readiness.is_settled());
        readiness.set(SpriteSheet::Trees, SheetStatus::Loading(Handle::default()));
        assert!(!readiness.is_settled());
    }

    #[test]
    fn missing_sheet_has_no_image() {
        let mut readiness = AssetReadiness::default();
        readiness.set(SpriteSheet::Player, SheetStatus::Missing);
        assert_eq!(readiness.image(SpriteSheet::Player), None);
    }

    #[test]
    fn without_asset_server_loading_falls_through_to_game() {
        let mut app = crate::testing::create_base_test_app();
        app.add_plugins(plugin);
        app.update();
        app.update();

        let state = app.world().resource::<State<GameState>>();
        assert_eq!(*state.get(), GameState::InGame);
    }
}
