//! Projectiles: single-hit bullets/arrows and piercing energy bolts/beams.
//!
//! Single-hit projectiles either home on a target or fly a fixed heading, deal damage once,
//! and disappear. Piercing projectiles fly a fixed heading for a fixed range and damage every
//! enemy they cross, each at most once per flight.

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use bevy::math::Vec2;

use super::body::{Body, EntityId};
use super::combat;
use super::error::{SimError, SimResult};
use super::geometry::{bounding_radius, circle_overlaps_rect, direction_to, in_world, is_finite};
use super::sim::SimulationContext;

// === Constants ===

/// Fraction of an enemy's contact damage its bullets deal by default.
pub const ENEMY_BULLET_DAMAGE_FACTOR: f32 = 0.6;

pub const PLAYER_DEFAULT_DAMAGE: f32 = 10.0;
pub const TOWER_DEFAULT_DAMAGE: f32 = 14.0;

// === Types ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    Bullet,
    Arrow,
    EnergyBolt,
    EnergyBeam,
}

impl ProjectileKind {
    #[must_use]
    pub const fn is_piercing(self) -> bool {
        matches!(self, Self::EnergyBolt | Self::EnergyBeam)
    }

    #[must_use]
    pub const fn size(self) -> Vec2 {
        match self {
            Self::Bullet => Vec2::new(8.0, 8.0),
            Self::Arrow => Vec2::new(14.0, 6.0),
            Self::EnergyBolt => Vec2::new(16.0, 16.0),
            Self::EnergyBeam => Vec2::new(40.0, 40.0),
        }
    }

    /// Default speed (pixels per second).
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Bullet => 420.0,
            Self::Arrow => 520.0,
            Self::EnergyBolt => 480.0,
            Self::EnergyBeam => 900.0,
        }
    }

    /// Default lifetime (seconds).
    #[must_use]
    pub const fn lifetime(self) -> f32 {
        match self {
            Self::Bullet | Self::Arrow => 3.0,
            Self::EnergyBolt | Self::EnergyBeam => 5.0,
        }
    }

    /// Default travel range for piercing kinds (pixels).
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::EnergyBolt => 420.0,
            Self::EnergyBeam => 600.0,
            Self::Bullet | Self::Arrow => f32::INFINITY,
        }
    }
}

/// Render tint, chosen from the shooter unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Gold,
    Cyan,
    Red,
    Violet,
}

/// Who fired the projectile. Decides default damage, tint, and which side it can hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shooter {
    Player,
    Tower(EntityId),
    Enemy { id: EntityId, damage: f32 },
}

impl Shooter {
    #[must_use]
    pub fn default_damage(self) -> f32 {
        match self {
            Self::Player => PLAYER_DEFAULT_DAMAGE,
            Self::Tower(_) => TOWER_DEFAULT_DAMAGE,
            Self::Enemy { damage, .. } => damage * ENEMY_BULLET_DAMAGE_FACTOR,
        }
    }

    #[must_use]
    pub const fn default_tint(self) -> Tint {
        match self {
            Self::Player => Tint::Gold,
            Self::Tower(_) => Tint::Cyan,
            Self::Enemy { .. } => Tint::Red,
        }
    }

    /// Enemy-owned projectiles target the player; everything else targets enemies.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::Enemy { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    Enemy(EntityId),
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heading {
    /// Re-aims at the live target every tick. `turn_rate` (radians per second) limits how
    /// sharply it can steer; `None` snaps straight at the target.
    Homing {
        target: TargetRef,
        direction: Vec2,
        turn_rate: Option<f32>,
    },
    /// Fixed unit direction.
    Ballistic(Vec2),
}

impl Heading {
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        match *self {
            Self::Homing { direction, .. } | Self::Ballistic(direction) => direction,
        }
    }
}

/// What to aim a new projectile at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    Target(TargetRef),
    Direction(Vec2),
}

/// Per-spawn overrides. `None` falls back to the kind/shooter defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectileOptions {
    pub damage: Option<f32>,
    pub tint: Option<Tint>,
    pub speed: Option<f32>,
    pub lifetime: Option<f32>,
    pub range: Option<f32>,
    pub turn_rate: Option<f32>,
    pub size: Option<Vec2>,
    /// Initial heading for homing shots (defaults to straight at the target).
    pub initial_direction: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub shooter: Shooter,
    pub body: Body,
    pub heading: Heading,
    pub speed: f32,
    pub damage: f32,
    pub tint: Tint,
    /// Seconds of flight left.
    pub lifetime: f32,
    pub max_range: f32,
    pub traveled: f32,
    /// Enemies a piercing projectile has already damaged.
    pub hit_set: HashSet<EntityId>,
}

impl Projectile {
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.body.size.x.max(self.body.size.y) * 0.5
    }
}

// === Spawning ===

/// Creates a projectile at `origin` and adds it to the context. Returns its id.
pub fn spawn_projectile(
    ctx: &mut SimulationContext,
    kind: ProjectileKind,
    shooter: Shooter,
    origin: Vec2,
    aim: Aim,
    options: ProjectileOptions,
) -> EntityId {
    let target_center = match aim {
        Aim::Target(target) => ctx.target_center(target),
        Aim::Direction(_) => None,
    };
    let straight = match aim {
        Aim::Direction(direction) => direction.try_normalize(),
        Aim::Target(_) => target_center.and_then(|center| direction_to(origin, center)),
    }
    .unwrap_or(Vec2::X);

    let heading = match aim {
        Aim::Target(target) if !kind.is_piercing() => Heading::Homing {
            target,
            direction: options
                .initial_direction
                .and_then(Vec2::try_normalize)
                .unwrap_or(straight),
            turn_rate: options.turn_rate,
        },
        _ => Heading::Ballistic(straight),
    };

    let id = ctx.ids.next_id();
    ctx.projectiles.push(Projectile {
        id,
        kind,
        shooter,
        body: Body::centered_at(origin, options.size.unwrap_or_else(|| kind.size())),
        heading,
        speed: options.speed.unwrap_or_else(|| kind.speed()),
        damage: options.damage.unwrap_or_else(|| shooter.default_damage()),
        tint: options.tint.unwrap_or_else(|| shooter.default_tint()),
        lifetime: options.lifetime.unwrap_or_else(|| kind.lifetime()),
        max_range: options.range.unwrap_or_else(|| kind.range()),
        traveled: 0.0,
        hit_set: HashSet::new(),
    });
    id
}

/// Rotates `current` toward `desired` by at most `max_angle` radians.
fn steer(current: Vec2, desired: Vec2, max_angle: f32) -> Vec2 {
    let from = current.y.atan2(current.x);
    let to = desired.y.atan2(desired.x);
    let delta = (to - from + PI).rem_euclid(TAU) - PI;
    Vec2::from_angle(from + delta.clamp(-max_angle, max_angle))
}

// === Update ===

/// Advances one projectile by `dt` and resolves its collisions.
///
/// `live_enemies` is the set of enemy ids active at the start of the projectile step; the
/// piercing hit-set is pruned against it so it cannot grow without bound.
pub fn update_projectile(
    projectile: &mut Projectile,
    ctx: &mut SimulationContext,
    live_enemies: &HashSet<EntityId>,
    dt: f32,
) -> SimResult<()> {
    if !projectile.body.active {
        return Ok(());
    }
    projectile.hit_set.retain(|id| live_enemies.contains(id));

    let center = projectile.body.center();
    let live_target = match projectile.heading {
        Heading::Homing { target, .. } => ctx.target_center(target).map(|c| (target, c)),
        Heading::Ballistic(_) => None,
    };

    // Re-aim, or fall back to ballistic flight along the last heading.
    if let Heading::Homing {
        target,
        direction,
        turn_rate,
    } = projectile.heading
    {
        projectile.heading = match live_target {
            Some((_, target_center)) => {
                let desired = direction_to(center, target_center).unwrap_or(direction);
                Heading::Homing {
                    target,
                    direction: match turn_rate {
                        Some(rate) => steer(direction, desired, rate * dt),
                        None => desired,
                    },
                    turn_rate,
                }
            }
            None => Heading::Ballistic(direction),
        };
    }

    let direction = projectile.heading.direction();
    if !is_finite(center) || !is_finite(direction) {
        return Err(SimError::InvalidNumeric {
            entity: projectile.id,
            what: "projectile heading",
        });
    }

    let step = direction * projectile.speed * dt;
    let next_center = center + step;

    // The safe zone is projectile-proof for enemy fire coming from outside.
    if projectile.shooter.is_hostile()
        && !ctx.config.in_safe_zone(center)
        && ctx.config.in_safe_zone(next_center)
    {
        projectile.body.active = false;
        return Ok(());
    }

    projectile.body.set_center(next_center);
    projectile.traveled += step.length();
    projectile.lifetime -= dt;

    if projectile.kind.is_piercing() {
        resolve_piercing_hits(projectile, ctx);
    } else {
        resolve_single_hit(projectile, ctx, live_target);
    }

    if projectile.lifetime <= 0.0
        || projectile.traveled >= projectile.max_range
        || !in_world(projectile.body.center(), ctx.config.world_size)
    {
        projectile.body.active = false;
    }
    Ok(())
}

fn resolve_piercing_hits(projectile: &mut Projectile, ctx: &mut SimulationContext) {
    let center = projectile.body.center();
    let radius = projectile.radius();
    let victims: Vec<EntityId> = ctx
        .enemies
        .iter()
        .filter(|enemy| enemy.body.active && !projectile.hit_set.contains(&enemy.id))
        .filter(|enemy| circle_overlaps_rect(center, radius, enemy.body.rect()))
        .map(|enemy| enemy.id)
        .collect();

    for id in victims {
        projectile.hit_set.insert(id);
        if let Some(index) = ctx.enemy_index(id) {
            combat::damage_enemy(ctx, index, projectile.damage);
        }
    }
}

fn resolve_single_hit(
    projectile: &mut Projectile,
    ctx: &mut SimulationContext,
    live_target: Option<(TargetRef, Vec2)>,
) {
    let center = projectile.body.center();
    let radius = projectile.radius();

    // Homing shot with a live target: hit when within the combined radii.
    if let (Heading::Homing { .. }, Some((target, _))) = (projectile.heading, live_target) {
        let Some((target_center, target_size)) = ctx.target_footprint(target) else {
            return;
        };
        if center.distance(target_center) <= bounding_radius(target_size) + radius {
            apply_hit(projectile, ctx, target);
        }
        return;
    }

    // Ballistic: first opposing body overlapped.
    if projectile.shooter.is_hostile() {
        if circle_overlaps_rect(center, radius, ctx.player.body.rect()) {
            apply_hit(projectile, ctx, TargetRef::Player);
        }
        return;
    }
    let victim = ctx
        .enemies
        .iter()
        .find(|enemy| enemy.body.active && circle_overlaps_rect(center, radius, enemy.body.rect()))
        .map(|enemy| enemy.id);
    if let Some(id) = victim {
        apply_hit(projectile, ctx, TargetRef::Enemy(id));
    }
}

fn apply_hit(projectile: &mut Projectile, ctx: &mut SimulationContext, target: TargetRef) {
    match target {
        TargetRef::Player => {
            combat::damage_player(ctx, projectile.damage);
        }
        TargetRef::Enemy(id) => {
            if let Some(index) = ctx.enemy_index(id) {
                combat::damage_enemy(ctx, index, projectile.damage);
            }
        }
    }
    projectile.body.active = false;
}
