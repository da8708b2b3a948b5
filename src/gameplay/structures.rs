//! Player-built structures (fences, towers) and the two static shops.

use bevy::log::debug;
use bevy::math::{Rect, Vec2};

use super::body::{Body, EntityId, Health};
use super::config::SimConfig;
use super::geometry::{aabb_overlap, nearest_in_range};
use super::projectile::{Aim, ProjectileKind, ProjectileOptions, Shooter, TargetRef, spawn_projectile};
use super::sim::SimulationContext;

// === Constants ===

pub const STRUCTURE_SIZE: Vec2 = Vec2::new(40.0, 40.0);

/// Fences fall to a single touch.
pub const FENCE_HP: f32 = 1.0;

pub const TOWER_RANGE: f32 = 300.0;
pub const TOWER_COOLDOWN: f32 = 0.9;

/// Builds must be placed within this distance of the player (pixels).
pub const BUILD_REACH: f32 = 260.0;

pub const SHOP_SIZE: Vec2 = Vec2::new(80.0, 80.0);

/// Shops sit this far outside the safe-zone edge (center to edge, pixels).
pub const SHOP_OFFSET: f32 = 100.0;

/// Purchases require the player this close to the shop's center (pixels).
pub const SHOP_REACH: f32 = 140.0;

// === Structures ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Fence,
    Tower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildCost {
    pub wood: u32,
    pub gold: u32,
}

impl StructureKind {
    #[must_use]
    pub const fn cost(self) -> BuildCost {
        match self {
            Self::Fence => BuildCost { wood: 4, gold: 0 },
            Self::Tower => BuildCost { wood: 15, gold: 30 },
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Fence => "Fence",
            Self::Tower => "Tower",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub id: EntityId,
    pub kind: StructureKind,
    pub body: Body,
    /// `None` for indestructible structures.
    pub health: Option<Health>,
    /// Seconds until a tower may fire again.
    pub cooldown: f32,
}

impl Structure {
    #[must_use]
    pub fn new(id: EntityId, kind: StructureKind, center: Vec2) -> Self {
        Self {
            id,
            kind,
            body: Body::centered_at(center, STRUCTURE_SIZE),
            health: match kind {
                StructureKind::Fence => Some(Health::new(FENCE_HP)),
                StructureKind::Tower => None,
            },
            cooldown: 0.0,
        }
    }

    /// Knocks the structure down unless it is indestructible.
    pub fn destroy(&mut self) {
        if let Some(health) = self.health.as_mut() {
            health.damage(health.max);
            self.body.active = false;
            debug!("{:?} {:?} destroyed", self.kind, self.id);
        }
    }
}

/// Towers autofire homing bullets at the nearest enemy in range.
pub fn update_tower(tower: &mut Structure, ctx: &mut SimulationContext, dt: f32) {
    if tower.kind != StructureKind::Tower || !tower.body.active {
        return;
    }
    tower.cooldown = (tower.cooldown - dt).max(0.0);
    if tower.cooldown > 0.0 {
        return;
    }
    let origin = tower.body.center();
    let target = nearest_in_range(
        origin,
        TOWER_RANGE,
        ctx.enemies
            .iter()
            .filter(|enemy| enemy.body.active)
            .map(|enemy| (enemy.id, enemy.body.center())),
    );
    let Some(target) = target else {
        return;
    };
    spawn_projectile(
        ctx,
        ProjectileKind::Bullet,
        Shooter::Tower(tower.id),
        origin,
        Aim::Target(TargetRef::Enemy(target)),
        ProjectileOptions::default(),
    );
    tower.cooldown = TOWER_COOLDOWN;
}

// === Shops ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopKind {
    /// Sells weapon upgrades.
    WeaponSmith,
    /// Sells dodge upgrades.
    Armory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    pub kind: ShopKind,
    pub body: Body,
}

/// One shop on each side of the safe zone, just outside it.
#[must_use]
pub fn default_shops(config: &SimConfig) -> Vec<Shop> {
    let zone = config.safe_zone;
    let y = zone.center().y;
    vec![
        Shop {
            kind: ShopKind::WeaponSmith,
            body: Body::centered_at(Vec2::new(zone.min.x - SHOP_OFFSET, y), SHOP_SIZE),
        },
        Shop {
            kind: ShopKind::Armory,
            body: Body::centered_at(Vec2::new(zone.max.x + SHOP_OFFSET, y), SHOP_SIZE),
        },
    ]
}

// === Build validation ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildBlocked {
    OutsideWorld,
    TooFar,
    InSafeZone,
    Occupied,
}

impl BuildBlocked {
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::OutsideWorld => "Can't build outside the map",
            Self::TooFar => "Too far away to build there",
            Self::InSafeZone => "Can't build inside the safe zone",
            Self::Occupied => "That spot is taken",
        }
    }
}

/// Validates a build request at world point `at`. Returns the tile-snapped center.
pub fn check_build_site(ctx: &SimulationContext, at: Vec2) -> Result<Vec2, BuildBlocked> {
    let center = ctx.config.snap_to_tile(at);
    let footprint = Rect::from_center_size(center, STRUCTURE_SIZE);
    let world = ctx.config.world_rect();
    if !world.contains(footprint.min) || !world.contains(footprint.max) {
        return Err(BuildBlocked::OutsideWorld);
    }
    if center.distance(ctx.player.body.center()) > BUILD_REACH {
        return Err(BuildBlocked::TooFar);
    }
    if aabb_overlap(footprint, ctx.config.safe_zone) {
        return Err(BuildBlocked::InSafeZone);
    }
    let occupied = ctx
        .structures
        .iter()
        .filter(|s| s.body.active)
        .map(|s| s.body.rect())
        .chain(ctx.shops.iter().map(|shop| shop.body.rect()))
        .chain(ctx.trees.iter().filter(|t| t.body.active).map(|t| t.body.rect()))
        .any(|rect| aabb_overlap(footprint, rect));
    if occupied {
        return Err(BuildBlocked::Occupied);
    }
    Ok(center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::enemy::EnemyKind;
    use crate::gameplay::projectile::Heading;
    use crate::testing::{spawn_test_enemy, test_context};
    use pretty_assertions::assert_eq;

    fn outside_zone_context() -> SimulationContext {
        let mut ctx = test_context();
        ctx.player.body.set_center(Vec2::new(600.0, 600.0));
        ctx
    }

    #[test]
    fn fences_break_and_towers_do_not() {
        let mut fence = Structure::new(EntityId(1), StructureKind::Fence, Vec2::ZERO);
        let mut tower = Structure::new(EntityId(2), StructureKind::Tower, Vec2::ZERO);
        fence.destroy();
        tower.destroy();
        assert!(!fence.body.active);
        assert!(tower.body.active);
    }

    #[test]
    fn shops_sit_outside_the_safe_zone() {
        let config = SimConfig::default();
        for shop in default_shops(&config) {
            assert!(!aabb_overlap(shop.body.rect(), config.safe_zone), "{:?}", shop.kind);
        }
    }

    #[test]
    fn tower_fires_at_nearest_enemy_on_cooldown() {
        let mut ctx = outside_zone_context();
        let near = spawn_test_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(800.0, 600.0));
        spawn_test_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(900.0, 600.0));
        let mut tower = Structure::new(EntityId(100), StructureKind::Tower, Vec2::new(700.0, 600.0));

        update_tower(&mut tower, &mut ctx, 0.016);
        assert_eq!(ctx.projectiles.len(), 1);
        assert!(matches!(
            ctx.projectiles[0].heading,
            Heading::Homing { target: TargetRef::Enemy(id), .. } if id == near
        ));
        assert_eq!(ctx.projectiles[0].shooter, Shooter::Tower(EntityId(100)));

        update_tower(&mut tower, &mut ctx, 0.016);
        assert_eq!(ctx.projectiles.len(), 1);
    }

    #[test]
    fn tower_ignores_enemies_out_of_range() {
        let mut ctx = outside_zone_context();
        spawn_test_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(1200.0, 600.0));
        let mut tower = Structure::new(EntityId(100), StructureKind::Tower, Vec2::new(700.0, 600.0));
        update_tower(&mut tower, &mut ctx, 0.016);
        assert!(ctx.projectiles.is_empty());
    }

    #[test]
    fn build_site_snaps_to_tile() {
        let ctx = outside_zone_context();
        assert_eq!(check_build_site(&ctx, Vec2::new(705.0, 611.0)), Ok(Vec2::new(700.0, 620.0)));
    }

    #[test]
    fn build_site_rules() {
        let mut ctx = outside_zone_context();
        assert_eq!(check_build_site(&ctx, Vec2::new(1000.0, 600.0)), Err(BuildBlocked::TooFar));
        assert_eq!(check_build_site(&ctx, Vec2::new(-30.0, 600.0)), Err(BuildBlocked::OutsideWorld));

        let id = ctx.ids.next_id();
        ctx.structures
            .push(Structure::new(id, StructureKind::Fence, Vec2::new(660.0, 620.0)));
        assert_eq!(check_build_site(&ctx, Vec2::new(665.0, 615.0)), Err(BuildBlocked::Occupied));

        ctx.player.body.set_center(ctx.config.safe_zone.center());
        assert_eq!(
            check_build_site(&ctx, ctx.config.safe_zone.center() + Vec2::new(40.0, 0.0)),
            Err(BuildBlocked::InSafeZone)
        );
    }
}
