//! Per-kind enemy attacks, keyed by [`EnemyKind`] through a dispatch table.
//!
//! Every enemy gets melee contact damage. Kinds with a special attack map to one behavior
//! function; the attack cooldowns are rolled per enemy at spawn so a wave never fires in
//! lockstep.

use std::f32::consts::TAU;

use bevy::log::debug;
use bevy::math::Vec2;
use rand::Rng;

use super::{AiState, Enemy, EnemyKind};
use crate::gameplay::combat;
use crate::gameplay::effects::EffectKind;
use crate::gameplay::geometry::{aabb_overlap_with_tolerance, direction_to, in_world};
use crate::gameplay::projectile::{
    Aim, ProjectileKind, ProjectileOptions, Shooter, TargetRef, spawn_projectile,
};
use crate::gameplay::sim::SimulationContext;

// === Cooldowns ===

/// `base + uniform(0, jitter)` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownSpec {
    pub base: f32,
    pub jitter: f32,
}

impl CooldownSpec {
    pub fn roll(self, rng: &mut impl Rng) -> f32 {
        self.jitter.mul_add(rng.random::<f32>(), self.base)
    }
}

const fn cd(base: f32, jitter: f32) -> CooldownSpec {
    CooldownSpec { base, jitter }
}

pub const CONTACT_COOLDOWN: CooldownSpec = cd(1.0, 0.5);
pub const MINI_BOSS_RING_COOLDOWN: CooldownSpec = cd(3.2, 1.2);
pub const BOSS_RING_COOLDOWN: CooldownSpec = cd(4.0, 1.0);
pub const BOSS_VOLLEY_COOLDOWN: CooldownSpec = cd(2.4, 0.8);
pub const STALKER_DASH_COOLDOWN: CooldownSpec = cd(5.0, 1.5);
pub const STALKER_VOLLEY_COOLDOWN: CooldownSpec = cd(3.0, 1.0);
pub const BROOD_SUMMON_COOLDOWN: CooldownSpec = cd(6.0, 2.0);
pub const SUMMONER_COOLDOWN: CooldownSpec = cd(7.0, 2.0);
pub const ANCIENT_PHASE_COOLDOWN: CooldownSpec = cd(3.5, 1.0);
pub const RANGED_COOLDOWN: CooldownSpec = cd(2.0, 1.0);
pub const TELEPORT_COOLDOWN: CooldownSpec = cd(4.0, 2.0);

/// Main and secondary attack cooldowns for `kind`.
#[must_use]
pub const fn cooldown_profile(kind: EnemyKind) -> (Option<CooldownSpec>, Option<CooldownSpec>) {
    match kind {
        EnemyKind::MiniBoss => (Some(MINI_BOSS_RING_COOLDOWN), None),
        EnemyKind::Boss => (Some(BOSS_RING_COOLDOWN), Some(BOSS_VOLLEY_COOLDOWN)),
        EnemyKind::MiniBossA => (Some(STALKER_DASH_COOLDOWN), Some(STALKER_VOLLEY_COOLDOWN)),
        EnemyKind::MiniBossB => (Some(BROOD_SUMMON_COOLDOWN), None),
        EnemyKind::Summoner => (Some(SUMMONER_COOLDOWN), None),
        EnemyKind::NewBoss => (Some(ANCIENT_PHASE_COOLDOWN), None),
        EnemyKind::Ranged => (Some(RANGED_COOLDOWN), None),
        EnemyKind::Teleporter => (Some(TELEPORT_COOLDOWN), None),
        EnemyKind::Normal | EnemyKind::Fast | EnemyKind::Tank | EnemyKind::Explosive => {
            (None, None)
        }
    }
}

// === Constants ===

/// Contact reach: the enemy box is grown by this much before the overlap test.
pub const CONTACT_TOLERANCE: f32 = 4.0;

pub const MINI_BOSS_RING_BULLETS: usize = 12;
pub const BOSS_RING_BULLETS: usize = 16;
pub const BOSS_VOLLEY_BULLETS: usize = 5;
/// Total angular width of the boss cone volley (radians).
pub const BOSS_VOLLEY_SPREAD: f32 = 0.5;

pub const STALKER_DASH_SECS: f32 = 0.6;
pub const STALKER_DASH_MULTIPLIER: f32 = 2.6;
pub const STALKER_VOLLEY_BULLETS: usize = 3;
/// Aim jitter for each tracking bullet (radians, either side).
pub const STALKER_AIM_JITTER: f32 = 0.25;
/// Steering limit of tracking bullets (radians per second).
pub const TRACKING_TURN_RATE: f32 = 1.5;

pub const BROOD_MINIONS_PER_SUMMON: usize = 2;
pub const BROOD_MAX_MINIONS: usize = 6;
pub const SUMMONER_MINIONS_PER_SUMMON: usize = 1;
pub const SUMMONER_MAX_MINIONS: usize = 4;
/// Minions land this far from the player (pixels, min and extra spread).
pub const MINION_DISTANCE: f32 = 160.0;
pub const MINION_DISTANCE_SPREAD: f32 = 80.0;
const MINION_PLACEMENT_ATTEMPTS: usize = 8;

pub const SHOCKWAVE_RADIUS: f32 = 190.0;
pub const SHOCKWAVE_DAMAGE_FACTOR: f32 = 1.5;
pub const SCATTER_BULLETS: usize = 24;

pub const RANGED_REACH: f32 = 360.0;

pub const TELEPORT_REACH: f32 = 480.0;
/// Teleporters stay put when already this close.
pub const TELEPORT_MIN_DISTANCE: f32 = 90.0;
pub const TELEPORT_LANDING_DISTANCE: f32 = 70.0;

pub const EXPLOSION_RADIUS: f32 = 110.0;

pub const ENEMY_BULLET_SPEED: f32 = 240.0;
pub const ENEMY_BULLET_RADIUS: f32 = 6.0;
pub const ENEMY_BULLET_LIFETIME: f32 = 4.0;

// === Dispatch ===

pub type BehaviorFn = fn(&mut Enemy, &mut SimulationContext, f32);

/// The special attack for `kind`, if it has one.
#[must_use]
pub const fn special_behavior(kind: EnemyKind) -> Option<BehaviorFn> {
    match kind {
        EnemyKind::MiniBoss => Some(mini_boss_ring),
        EnemyKind::Boss => Some(boss_barrage),
        EnemyKind::MiniBossA => Some(stalker_dash_and_volley),
        EnemyKind::MiniBossB | EnemyKind::Summoner => Some(summon_minions),
        EnemyKind::NewBoss => Some(ancient_phase),
        EnemyKind::Ranged => Some(ranged_shot),
        EnemyKind::Teleporter => Some(teleport),
        EnemyKind::Normal | EnemyKind::Fast | EnemyKind::Tank | EnemyKind::Explosive => None,
    }
}

/// Runs contact damage and the kind's special attack for one tick.
pub fn run_attacks(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    melee_contact(enemy, ctx, dt);
    if let Some(behavior) = special_behavior(enemy.kind) {
        behavior(enemy, ctx, dt);
    }
}

/// Ticks the main special cooldown and reports whether it fired (re-arming it).
fn special_ready(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) -> bool {
    let chasing = enemy.state == AiState::Chasing;
    let Some(cooldown) = enemy.special.as_mut() else {
        return false;
    };
    if !cooldown.tick(dt) || !chasing {
        return false;
    }
    cooldown.rearm(&mut ctx.rng);
    true
}

fn secondary_ready(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) -> bool {
    let chasing = enemy.state == AiState::Chasing;
    let Some(cooldown) = enemy.secondary.as_mut() else {
        return false;
    };
    if !cooldown.tick(dt) || !chasing {
        return false;
    }
    cooldown.rearm(&mut ctx.rng);
    true
}

// === Attacks ===

/// Deals contact damage while chasing and touching the player, on a jittered cooldown.
pub fn melee_contact(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    if !enemy.contact.tick(dt) || enemy.state != AiState::Chasing {
        return;
    }
    if !aabb_overlap_with_tolerance(enemy.body.rect(), ctx.player.body.rect(), CONTACT_TOLERANCE) {
        return;
    }
    combat::damage_player(ctx, enemy.damage);
    enemy.contact.rearm(&mut ctx.rng);
}

fn enemy_bullet_options() -> ProjectileOptions {
    ProjectileOptions {
        speed: Some(ENEMY_BULLET_SPEED),
        lifetime: Some(ENEMY_BULLET_LIFETIME),
        size: Some(Vec2::splat(ENEMY_BULLET_RADIUS * 2.0)),
        ..Default::default()
    }
}

fn fire_bullet(enemy: &Enemy, ctx: &mut SimulationContext, direction: Vec2) {
    spawn_projectile(
        ctx,
        ProjectileKind::Bullet,
        Shooter::Enemy {
            id: enemy.id,
            damage: enemy.damage,
        },
        enemy.body.center(),
        Aim::Direction(direction),
        enemy_bullet_options(),
    );
}

#[allow(clippy::cast_precision_loss)]
fn fire_ring(enemy: &Enemy, ctx: &mut SimulationContext, count: usize, angular_jitter: f32) {
    let step = TAU / count as f32;
    for i in 0..count {
        let jitter = if angular_jitter > 0.0 {
            (ctx.rng.random::<f32>() * 2.0 - 1.0) * angular_jitter
        } else {
            0.0
        };
        fire_bullet(enemy, ctx, Vec2::from_angle(step.mul_add(i as f32, jitter)));
    }
}

fn aim_at_player(enemy: &Enemy, ctx: &SimulationContext) -> Option<Vec2> {
    direction_to(enemy.body.center(), ctx.player.body.center())
}

fn mini_boss_ring(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    if special_ready(enemy, ctx, dt) {
        fire_ring(enemy, ctx, MINI_BOSS_RING_BULLETS, 0.0);
    }
}

/// Ring burst on the main cooldown plus a narrow cone aimed at the player.
#[allow(clippy::cast_precision_loss)]
fn boss_barrage(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    if special_ready(enemy, ctx, dt) {
        fire_ring(enemy, ctx, BOSS_RING_BULLETS, 0.0);
    }
    if secondary_ready(enemy, ctx, dt) {
        let Some(aim) = aim_at_player(enemy, ctx) else {
            return;
        };
        let base = aim.y.atan2(aim.x) - BOSS_VOLLEY_SPREAD * 0.5;
        let step = BOSS_VOLLEY_SPREAD / (BOSS_VOLLEY_BULLETS - 1) as f32;
        for i in 0..BOSS_VOLLEY_BULLETS {
            fire_bullet(enemy, ctx, Vec2::from_angle(step.mul_add(i as f32, base)));
        }
    }
}

/// Short speed boost toward the player plus a loosely aimed homing volley.
fn stalker_dash_and_volley(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    if special_ready(enemy, ctx, dt) {
        enemy.boost = STALKER_DASH_SECS;
    }
    if secondary_ready(enemy, ctx, dt) {
        let Some(aim) = aim_at_player(enemy, ctx) else {
            return;
        };
        for _ in 0..STALKER_VOLLEY_BULLETS {
            let jitter = (ctx.rng.random::<f32>() * 2.0 - 1.0) * STALKER_AIM_JITTER;
            spawn_projectile(
                ctx,
                ProjectileKind::Bullet,
                Shooter::Enemy {
                    id: enemy.id,
                    damage: enemy.damage,
                },
                enemy.body.center(),
                Aim::Target(TargetRef::Player),
                ProjectileOptions {
                    turn_rate: Some(TRACKING_TURN_RATE),
                    initial_direction: Some(Vec2::from_angle(jitter).rotate(aim)),
                    ..enemy_bullet_options()
                },
            );
        }
    }
}

fn summon_minions(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    let (per_summon, max_alive, minion_kind) = match enemy.kind {
        EnemyKind::MiniBossB => (BROOD_MINIONS_PER_SUMMON, BROOD_MAX_MINIONS, EnemyKind::Fast),
        _ => (SUMMONER_MINIONS_PER_SUMMON, SUMMONER_MAX_MINIONS, EnemyKind::Normal),
    };
    if !special_ready(enemy, ctx, dt) {
        return;
    }
    // `minions` was pruned of dead ids before this tick's enemy pass.
    let room = max_alive.saturating_sub(enemy.minions.len());
    for _ in 0..per_summon.min(room) {
        let Some(center) = minion_position(ctx) else {
            break;
        };
        let id = ctx.ids.next_id();
        let level = ctx.director.level();
        let mut minion = Enemy::spawn(id, minion_kind, level, center, &mut ctx.rng);
        minion.summoned_by = Some(enemy.id);
        minion.state = AiState::Chasing;
        ctx.enemies.push(minion);
        enemy.minions.push(id);
        debug!("{:?} {:?} summoned minion {:?}", enemy.kind, enemy.id, id);
    }
}

/// A spot near the player, inside the world and outside the safe zone.
fn minion_position(ctx: &mut SimulationContext) -> Option<Vec2> {
    let player = ctx.player.body.center();
    for _ in 0..MINION_PLACEMENT_ATTEMPTS {
        let angle = ctx.rng.random::<f32>() * TAU;
        let distance = MINION_DISTANCE_SPREAD.mul_add(ctx.rng.random::<f32>(), MINION_DISTANCE);
        let candidate = player + Vec2::from_angle(angle) * distance;
        if in_world(candidate, ctx.config.world_size) && !ctx.config.in_safe_zone(candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Alternates a close-range shockwave with a jittered scatter ring.
fn ancient_phase(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    if !special_ready(enemy, ctx, dt) {
        return;
    }
    let center = enemy.body.center();
    if enemy.shockwave_next {
        ctx.effects.push(
            EffectKind::Shockwave {
                radius: SHOCKWAVE_RADIUS,
            },
            center,
        );
        if center.distance(ctx.player.body.center()) <= SHOCKWAVE_RADIUS {
            combat::damage_player(ctx, enemy.damage * SHOCKWAVE_DAMAGE_FACTOR);
        }
    } else {
        #[allow(clippy::cast_precision_loss)]
        let half_step = TAU / SCATTER_BULLETS as f32 * 0.5;
        fire_ring(enemy, ctx, SCATTER_BULLETS, half_step);
    }
    enemy.shockwave_next = !enemy.shockwave_next;
}

fn ranged_shot(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    let Some(cooldown) = enemy.special.as_mut() else {
        return;
    };
    if !cooldown.tick(dt) || enemy.state != AiState::Chasing {
        return;
    }
    let center = enemy.body.center();
    if center.distance(ctx.player.body.center()) > RANGED_REACH {
        return;
    }
    cooldown.rearm(&mut ctx.rng);
    if let Some(aim) = aim_at_player(enemy, ctx) {
        fire_bullet(enemy, ctx, aim);
    }
}

/// Hops to just outside melee range of the player.
fn teleport(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    let Some(cooldown) = enemy.special.as_mut() else {
        return;
    };
    if !cooldown.tick(dt) || enemy.state != AiState::Chasing {
        return;
    }
    let player = ctx.player.body.center();
    let center = enemy.body.center();
    let distance = center.distance(player);
    if distance > TELEPORT_REACH || distance <= TELEPORT_MIN_DISTANCE {
        return;
    }
    cooldown.rearm(&mut ctx.rng);

    let from_player = direction_to(player, center).unwrap_or(Vec2::X);
    let landing = player + from_player * TELEPORT_LANDING_DISTANCE;
    if ctx.config.in_safe_zone(landing) || !in_world(landing, ctx.config.world_size) {
        return;
    }
    enemy.body.set_center(landing);
    debug!("{:?} teleported next to the player", enemy.id);
}

/// Death blast of an explosive enemy. Triggered by the kill, not by a timer.
pub fn explode(ctx: &mut SimulationContext, center: Vec2, damage: f32) {
    ctx.effects.push(
        EffectKind::Explosion {
            radius: EXPLOSION_RADIUS,
        },
        center,
    );
    if center.distance(ctx.player.body.center()) <= EXPLOSION_RADIUS {
        combat::damage_player(ctx, damage);
    }
}
