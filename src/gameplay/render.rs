//! Draws the simulation: one sprite per simulated object, re-synced every frame.
//!
//! The simulation never touches ECS entities. [`collect_visuals`] turns the context into a flat
//! list keyed by [`SimKey`]; the sync system then moves existing sprites, spawns new ones, and
//! despawns sprites whose object is gone. Effects are short-lived, so they are rebuilt from
//! scratch each frame instead of being tracked.

use std::collections::HashMap;

use bevy::prelude::*;

use super::RunConfig;
use super::body::EntityId;
use super::effects::{Effect, EffectKind};
use super::enemy::EnemyKind;
use super::projectile::Tint;
use super::sim::SimulationContext;
use super::structures::{ShopKind, StructureKind};
use crate::screens::GameState;
use crate::screens::loading::{AssetReadiness, SpriteSheet};
use crate::theme::palette;
use crate::{
    GameSet, Z_BACKGROUND, Z_EFFECT, Z_ENEMY, Z_HEALTH_BAR, Z_PLAYER, Z_PROJECTILE, Z_STRUCTURE,
    Z_TREE, Z_TROPHY, Z_ZONE,
};

// === Constants ===

/// Health bar height (pixels).
const HEALTH_BAR_HEIGHT: f32 = 4.0;

/// Gap between an object's top edge and its health bar (pixels).
const HEALTH_BAR_GAP: f32 = 6.0;

/// Damage numbers float up this far over their lifetime (pixels).
const DAMAGE_NUMBER_RISE: f32 = 30.0;

/// Extra margin drawn around the world background (pixels).
const BACKGROUND_MARGIN: f32 = 128.0;

// === Components ===

/// Which simulated object a sprite mirrors.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimKey {
    Player,
    Enemy(EntityId),
    Projectile(EntityId),
    Structure(EntityId),
    Tree(EntityId),
    Shop(usize),
    Trophy,
    HealthBarBack(EntityId),
    HealthBarFill(EntityId),
}

/// Marker: a sprite or label rebuilt every frame from the effect list.
#[derive(Component, Debug, Clone, Copy)]
struct EffectVisual;

/// Marker: static world backdrop (background and safe zone).
#[derive(Component, Debug, Clone, Copy)]
struct Backdrop;

// === Visual list ===

/// What one sprite should look like this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub key: SimKey,
    pub center: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub z: f32,
    /// Image to use when loaded; `None` always draws a colored rectangle.
    pub sheet: Option<SpriteSheet>,
}

const fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Normal => palette::ENEMY,
        EnemyKind::Fast => palette::ENEMY_FAST,
        EnemyKind::Tank => palette::ENEMY_TANK,
        EnemyKind::Ranged => palette::ENEMY_RANGED,
        EnemyKind::Explosive => palette::ENEMY_EXPLOSIVE,
        EnemyKind::Teleporter => palette::ENEMY_TELEPORTER,
        EnemyKind::Summoner => palette::ENEMY_SUMMONER,
        EnemyKind::MiniBoss | EnemyKind::MiniBossA | EnemyKind::MiniBossB => palette::MINI_BOSS,
        EnemyKind::Boss | EnemyKind::NewBoss => palette::BOSS,
    }
}

const fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Gold => palette::TINT_GOLD,
        Tint::Cyan => palette::TINT_CYAN,
        Tint::Red => palette::TINT_RED,
        Tint::Violet => palette::TINT_VIOLET,
    }
}

/// Background and fill bars above an object, fill left-aligned and scaled by `ratio`.
fn health_bar(id: EntityId, center: Vec2, size: Vec2, ratio: f32) -> [Visual; 2] {
    let y = center.y + size.y * 0.5 + HEALTH_BAR_GAP;
    let fill_width = size.x * ratio.clamp(0.0, 1.0);
    [
        Visual {
            key: SimKey::HealthBarBack(id),
            center: Vec2::new(center.x, y),
            size: Vec2::new(size.x, HEALTH_BAR_HEIGHT),
            color: palette::HEALTH_BAR_BG,
            z: Z_HEALTH_BAR,
            sheet: None,
        },
        Visual {
            key: SimKey::HealthBarFill(id),
            center: Vec2::new(center.x - (size.x - fill_width) * 0.5, y),
            size: Vec2::new(fill_width, HEALTH_BAR_HEIGHT),
            color: palette::HEALTH_BAR_FILL,
            z: Z_HEALTH_BAR + 0.1,
            sheet: None,
        },
    ]
}

/// Every active object as a sprite description. Damaged enemies and fences get a health bar.
#[must_use]
pub fn collect_visuals(ctx: &SimulationContext) -> Vec<Visual> {
    let mut visuals = Vec::new();

    let player = &ctx.player;
    if player.is_alive() {
        visuals.push(Visual {
            key: SimKey::Player,
            center: player.body.center(),
            size: player.body.size,
            color: if player.is_invincible() {
                palette::PLAYER_INVINCIBLE
            } else {
                palette::PLAYER
            },
            z: Z_PLAYER,
            sheet: Some(SpriteSheet::Player),
        });
    }

    for tree in ctx.trees.iter().filter(|tree| tree.body.active) {
        visuals.push(Visual {
            key: SimKey::Tree(tree.id),
            center: tree.body.center(),
            size: tree.body.size,
            color: palette::TREE,
            z: Z_TREE,
            sheet: Some(SpriteSheet::Trees),
        });
    }

    for (index, shop) in ctx.shops.iter().enumerate() {
        visuals.push(Visual {
            key: SimKey::Shop(index),
            center: shop.body.center(),
            size: shop.body.size,
            color: match shop.kind {
                ShopKind::WeaponSmith => palette::WEAPON_SHOP,
                ShopKind::Armory => palette::ARMORY,
            },
            z: Z_STRUCTURE,
            sheet: Some(SpriteSheet::Structures),
        });
    }

    for structure in ctx.structures.iter().filter(|s| s.body.active) {
        let center = structure.body.center();
        visuals.push(Visual {
            key: SimKey::Structure(structure.id),
            center,
            size: structure.body.size,
            color: match structure.kind {
                StructureKind::Fence => palette::FENCE,
                StructureKind::Tower => palette::TOWER,
            },
            z: Z_STRUCTURE,
            sheet: Some(SpriteSheet::Structures),
        });
        if let Some(health) = structure.health.filter(|h| h.ratio() < 1.0) {
            visuals.extend(health_bar(structure.id, center, structure.body.size, health.ratio()));
        }
    }

    if let Some(trophy) = &ctx.trophy {
        visuals.push(Visual {
            key: SimKey::Trophy,
            center: trophy.body.center(),
            size: trophy.body.size,
            color: palette::TROPHY,
            z: Z_TROPHY,
            sheet: None,
        });
    }

    for enemy in ctx.enemies.iter().filter(|enemy| enemy.body.active) {
        let center = enemy.body.center();
        visuals.push(Visual {
            key: SimKey::Enemy(enemy.id),
            center,
            size: enemy.body.size,
            color: enemy_color(enemy.kind),
            z: Z_ENEMY,
            sheet: Some(if enemy.kind.is_regular() {
                SpriteSheet::Enemies
            } else {
                SpriteSheet::Bosses
            }),
        });
        if enemy.health.ratio() < 1.0 {
            visuals.extend(health_bar(enemy.id, center, enemy.body.size, enemy.health.ratio()));
        }
    }

    for projectile in ctx.projectiles.iter().filter(|p| p.body.active) {
        visuals.push(Visual {
            key: SimKey::Projectile(projectile.id),
            center: projectile.body.center(),
            size: projectile.body.size,
            color: tint_color(projectile.tint),
            z: Z_PROJECTILE,
            sheet: Some(SpriteSheet::Projectiles),
        });
    }

    visuals
}

/// Sprite for a visual: the sheet image when loaded, a colored rectangle otherwise.
fn make_sprite(visual: &Visual, readiness: Option<&AssetReadiness>) -> Sprite {
    let image = visual
        .sheet
        .and_then(|sheet| readiness.and_then(|r| r.image(sheet)));
    match image {
        Some(image) => Sprite {
            image,
            custom_size: Some(visual.size),
            color: Color::WHITE.with_alpha(visual.color.alpha()),
            ..default()
        },
        None => Sprite::from_color(visual.color, visual.size),
    }
}

// === Systems ===

fn spawn_backdrop(mut commands: Commands, config: Res<RunConfig>) {
    let world = config.0.world_rect();
    let zone = config.0.safe_zone;
    commands.spawn((
        Name::new("World Background"),
        Backdrop,
        Sprite::from_color(
            palette::BACKGROUND,
            world.size() + Vec2::splat(BACKGROUND_MARGIN),
        ),
        Transform::from_translation(world.center().extend(Z_BACKGROUND)),
        DespawnOnExit(GameState::InGame),
    ));
    commands.spawn((
        Name::new("Safe Zone"),
        Backdrop,
        Sprite::from_color(palette::SAFE_ZONE, zone.size()),
        Transform::from_translation(zone.center().extend(Z_ZONE)),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Moves, spawns, and despawns sprites so they match the simulation.
fn sync_sprites(
    mut commands: Commands,
    ctx: Res<SimulationContext>,
    readiness: Option<Res<AssetReadiness>>,
    mut sprites: Query<(Entity, &SimKey, &mut Transform, &mut Sprite)>,
) {
    let mut wanted: HashMap<SimKey, Visual> = collect_visuals(&ctx)
        .into_iter()
        .map(|visual| (visual.key, visual))
        .collect();

    for (entity, key, mut transform, mut sprite) in &mut sprites {
        match wanted.remove(key) {
            Some(visual) => {
                transform.translation = visual.center.extend(visual.z);
                sprite.custom_size = Some(visual.size);
                sprite.color = if visual.sheet.is_some() && sprite.image != Handle::default() {
                    Color::WHITE.with_alpha(visual.color.alpha())
                } else {
                    visual.color
                };
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for visual in wanted.into_values() {
        commands.spawn((
            visual.key,
            make_sprite(&visual, readiness.as_deref()),
            Transform::from_translation(visual.center.extend(visual.z)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Text and color for an effect drawn as a label, `None` for shape effects.
fn effect_label(effect: &Effect) -> Option<(String, Color)> {
    match effect.kind {
        EffectKind::DamageNumber { amount, on_player } => Some((
            format!("{}", amount.round()),
            if on_player {
                palette::DAMAGE_ON_PLAYER
            } else {
                palette::DAMAGE_ON_ENEMY
            },
        )),
        EffectKind::Miss => Some(("Miss".to_string(), palette::MISS_TEXT)),
        EffectKind::LevelUp => Some(("LEVEL UP!".to_string(), palette::LEVEL_UP_TEXT)),
        EffectKind::Shockwave { .. } | EffectKind::Explosion { .. } => None,
    }
}

fn redraw_effects(
    mut commands: Commands,
    ctx: Res<SimulationContext>,
    old: Query<Entity, With<EffectVisual>>,
) {
    for entity in &old {
        commands.entity(entity).despawn();
    }

    for effect in ctx.effects.iter() {
        let fade = effect.fade();
        if let Some((text, color)) = effect_label(effect) {
            let rise = DAMAGE_NUMBER_RISE * (1.0 - fade);
            commands.spawn((
                EffectVisual,
                Text2d::new(text),
                TextFont::from_font_size(palette::FONT_SIZE_WORLD),
                TextColor(color.with_alpha(color.alpha() * fade)),
                Transform::from_translation((effect.position + Vec2::Y * rise).extend(Z_EFFECT)),
                DespawnOnExit(GameState::InGame),
            ));
            continue;
        }
        let (radius, color) = match effect.kind {
            EffectKind::Shockwave { radius } => (radius, palette::SHOCKWAVE),
            EffectKind::Explosion { radius } => (radius, palette::EXPLOSION),
            _ => continue,
        };
        commands.spawn((
            EffectVisual,
            Sprite::from_color(
                color.with_alpha(color.alpha() * fade),
                Vec2::splat(radius * 2.0),
            ),
            Transform::from_translation(effect.position.extend(Z_EFFECT)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_backdrop);
    app.add_systems(
        Update,
        (sync_sprites, redraw_effects)
            .in_set(GameSet::Ui)
            .run_if(in_state(GameState::InGame).and(resource_exists::<SimulationContext>)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::structures::Structure;
    use crate::testing::{assert_entity_count, spawn_test_enemy, test_context};
    use pretty_assertions::assert_eq;

    fn visual_for(visuals: &[Visual], key: SimKey) -> Option<&Visual> {
        visuals.iter().find(|visual| visual.key == key)
    }

    #[test]
    fn fresh_run_shows_player_and_shops() {
        let ctx = test_context();
        let visuals = collect_visuals(&ctx);

        let player = visual_for(&visuals, SimKey::Player).expect("player drawn");
        assert_eq!(player.center, ctx.player.body.center());
        assert!(visual_for(&visuals, SimKey::Shop(0)).is_some());
        assert!(visual_for(&visuals, SimKey::Shop(1)).is_some());
    }

    #[test]
    fn damaged_enemy_gets_a_left_aligned_health_bar() {
        let mut ctx = test_context();
        let id = spawn_test_enemy(&mut ctx, EnemyKind::Tank, Vec2::new(400.0, 400.0));
        let visuals = collect_visuals(&ctx);
        assert!(visual_for(&visuals, SimKey::HealthBarFill(id)).is_none());

        let max = ctx.enemies[0].health.max;
        ctx.enemies[0].take_damage(max * 0.5);
        let visuals = collect_visuals(&ctx);

        let back = visual_for(&visuals, SimKey::HealthBarBack(id)).expect("bar background");
        let fill = visual_for(&visuals, SimKey::HealthBarFill(id)).expect("bar fill");
        assert!((fill.size.x - back.size.x * 0.5).abs() < 1e-3);
        let back_left = back.center.x - back.size.x * 0.5;
        let fill_left = fill.center.x - fill.size.x * 0.5;
        assert!((back_left - fill_left).abs() < 1e-3);
    }

    #[test]
    fn inactive_objects_are_not_drawn() {
        let mut ctx = test_context();
        let id = spawn_test_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(400.0, 400.0));
        ctx.enemies[0].body.active = false;
        let mut fence = Structure::new(EntityId(900), StructureKind::Fence, Vec2::new(300.0, 300.0));
        fence.destroy();
        ctx.structures.push(fence);

        let visuals = collect_visuals(&ctx);
        assert!(visual_for(&visuals, SimKey::Enemy(id)).is_none());
        assert!(visual_for(&visuals, SimKey::Structure(EntityId(900))).is_none());
    }

    #[test]
    fn missing_sheet_falls_back_to_colored_rect() {
        let ctx = test_context();
        let visuals = collect_visuals(&ctx);
        let player = visual_for(&visuals, SimKey::Player).expect("player drawn");

        let sprite = make_sprite(player, Some(&AssetReadiness::default()));
        assert_eq!(sprite.image, Handle::default());
        assert_eq!(sprite.color, palette::PLAYER);
    }

    fn create_render_test_app(ctx: SimulationContext) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(ctx);
        app.add_systems(Update, (sync_sprites, redraw_effects));
        app
    }

    #[test]
    fn sprites_follow_the_simulation() {
        let mut ctx = test_context();
        spawn_test_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(400.0, 400.0));
        let mut app = create_render_test_app(ctx);
        app.update();

        // Player, two shops, one enemy
        assert_entity_count::<With<SimKey>>(&mut app, 4);

        app.world_mut().resource_mut::<SimulationContext>().enemies.clear();
        app.update();

        assert_entity_count::<With<SimKey>>(&mut app, 3);
    }

    #[test]
    fn effects_are_redrawn_each_frame() {
        let mut ctx = test_context();
        ctx.effects.push(EffectKind::Miss, Vec2::new(100.0, 100.0));
        ctx.effects
            .push(EffectKind::Shockwave { radius: 50.0 }, Vec2::new(200.0, 200.0));
        let mut app = create_render_test_app(ctx);
        app.update();
        app.update();

        assert_entity_count::<With<EffectVisual>>(&mut app, 2);

        app.world_mut()
            .resource_mut::<SimulationContext>()
            .effects
            .update(10.0);
        app.update();

        assert_entity_count::<With<EffectVisual>>(&mut app, 0);
    }
}
