//! The spawn director: difficulty clock, enemy and tree placement, boss cadence, and the
//! tree respawn queue.
//!
//! Placement is rejection sampling. A failed placement never puts an entity somewhere
//! invalid; the caller reschedules instead.

use bevy::log::{debug, info, warn};
use bevy::math::{Rect, Vec2};
use rand::Rng;

use super::body::EntityId;
use super::enemy::{Enemy, EnemyKind};
use super::error::{SimError, SimResult};
use super::geometry::aabb_overlap;
use super::sim::SimulationContext;
use super::trees::{RespawnQueue, TREE_SIZE, Tree};

// === Constants ===

/// Seconds of play per difficulty level.
pub const TIME_PER_LEVEL: f32 = 60.0;

pub const BASE_SPAWN_INTERVAL: f32 = 2.2;
pub const SPAWN_INTERVAL_DECAY: f32 = 0.9;
pub const MIN_SPAWN_INTERVAL: f32 = 0.35;

pub const BASE_ENEMY_CAP: usize = 14;
pub const ENEMY_CAP_PER_LEVEL: usize = 4;

/// Delay before retrying after a failed placement (seconds).
pub const PLACEMENT_RETRY_SECS: f32 = 0.25;

pub const BOSS_EVERY: u32 = 5;
pub const NEW_BOSS_EVERY: u32 = 10;
pub const MINI_BOSS_EVERY: u32 = 3;

pub const INITIAL_TREES: usize = 45;

// === Difficulty ===

/// `floor(elapsed / time_per_level) + 1`. Negative or NaN elapsed time counts as zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn level_for_time(elapsed: f32, time_per_level: f32) -> u32 {
    let elapsed = if elapsed.is_nan() { 0.0 } else { elapsed.max(0.0) };
    (elapsed / time_per_level).floor() as u32 + 1
}

/// Seconds between regular spawns at `level`.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn spawn_interval(level: u32) -> f32 {
    let steps = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    (BASE_SPAWN_INTERVAL * SPAWN_INTERVAL_DECAY.powi(steps)).max(MIN_SPAWN_INTERVAL)
}

/// Most regular enemies alive at once at `level`.
#[must_use]
pub const fn enemy_cap(level: u32) -> usize {
    BASE_ENEMY_CAP + ENEMY_CAP_PER_LEVEL * level.saturating_sub(1) as usize
}

/// The boss-class spawn a level calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossCadence {
    Boss(EnemyKind),
    MiniBoss,
}

/// Every 5th level brings a boss (every 10th the ancient), every 3rd a mini-boss. A level
/// that qualifies for both only gets the boss.
#[must_use]
pub const fn scheduled_boss(level: u32) -> Option<BossCadence> {
    if level % BOSS_EVERY == 0 {
        let kind = if level % NEW_BOSS_EVERY == 0 {
            EnemyKind::NewBoss
        } else {
            EnemyKind::Boss
        };
        return Some(BossCadence::Boss(kind));
    }
    if level % MINI_BOSS_EVERY == 0 {
        return Some(BossCadence::MiniBoss);
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnDirector {
    level: u32,
    spawn_timer: f32,
    boss_spawned: bool,
    mini_boss_spawned: bool,
    mini_boss_turn: usize,
    pub respawns: RespawnQueue,
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self {
            level: 1,
            spawn_timer: spawn_interval(1),
            boss_spawned: false,
            mini_boss_spawned: false,
            mini_boss_turn: 0,
            respawns: RespawnQueue::default(),
        }
    }
}

impl SpawnDirector {
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Moves the difficulty level up to match `clock`. Returns the new level on a level-up;
    /// the level never goes down.
    pub fn advance(&mut self, clock: f32) -> Option<u32> {
        let level = level_for_time(clock, TIME_PER_LEVEL);
        if level <= self.level {
            return None;
        }
        self.level = level;
        self.boss_spawned = false;
        self.mini_boss_spawned = false;
        Some(level)
    }
}

// === Placement ===

/// Constraints for one rejection-sampled placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
    pub label: &'static str,
    pub size: Vec2,
    pub attempts: u32,
    pub min_player_distance: f32,
    /// Minimum center distance to other active entities of the same kind.
    pub min_spacing: f32,
    /// Skip the safe-zone rejection.
    pub allow_anywhere: bool,
}

impl PlacementRules {
    #[must_use]
    pub const fn enemy(size: Vec2) -> Self {
        Self {
            label: "enemy",
            size,
            attempts: 50,
            min_player_distance: 320.0,
            min_spacing: 36.0,
            allow_anywhere: false,
        }
    }

    #[must_use]
    pub const fn tree() -> Self {
        Self {
            label: "tree",
            size: TREE_SIZE,
            attempts: 30,
            min_player_distance: 120.0,
            min_spacing: 90.0,
            allow_anywhere: false,
        }
    }
}

/// Draws uniform candidate centers until one passes every rule.
pub fn find_position(
    ctx: &mut SimulationContext,
    rules: &PlacementRules,
    same_kind: &[Vec2],
) -> SimResult<Vec2> {
    let half = rules.size * 0.5;
    let span = (ctx.config.world_size - rules.size).max(Vec2::ZERO);
    let player = ctx.player.body.center();
    let blockers: Vec<Rect> = ctx
        .structures
        .iter()
        .filter(|s| s.body.active)
        .map(|s| s.body.rect())
        .chain(ctx.shops.iter().map(|shop| shop.body.rect()))
        .collect();

    for _ in 0..rules.attempts {
        let candidate = half
            + Vec2::new(
                ctx.rng.random::<f32>() * span.x,
                ctx.rng.random::<f32>() * span.y,
            );
        let footprint = Rect::from_center_size(candidate, rules.size);
        if !rules.allow_anywhere && aabb_overlap(footprint, ctx.config.safe_zone) {
            continue;
        }
        if candidate.distance(player) < rules.min_player_distance {
            continue;
        }
        if same_kind
            .iter()
            .any(|other| other.distance(candidate) < rules.min_spacing)
        {
            continue;
        }
        if blockers.iter().any(|&rect| aabb_overlap(footprint, rect)) {
            continue;
        }
        return Ok(candidate);
    }
    Err(SimError::PlacementExhausted {
        kind: rules.label,
        attempts: rules.attempts,
    })
}

/// Places a new enemy of `kind` at the current difficulty level.
pub fn spawn_enemy(ctx: &mut SimulationContext, kind: EnemyKind) -> SimResult<EntityId> {
    let rules = PlacementRules::enemy(Vec2::splat(kind.stats().size));
    let same_kind: Vec<Vec2> = ctx
        .enemies
        .iter()
        .filter(|e| e.body.active && e.kind == kind)
        .map(|e| e.body.center())
        .collect();
    let center = find_position(ctx, &rules, &same_kind)?;
    let id = ctx.ids.next_id();
    let level = ctx.director.level();
    let enemy = Enemy::spawn(id, kind, level, center, &mut ctx.rng);
    ctx.enemies.push(enemy);
    debug!("spawned {kind:?} {id:?} at {center} (level {level})");
    Ok(id)
}

pub fn spawn_tree(ctx: &mut SimulationContext) -> SimResult<EntityId> {
    let same_kind: Vec<Vec2> = ctx
        .trees
        .iter()
        .filter(|t| t.body.active)
        .map(|t| t.body.center())
        .collect();
    let center = find_position(ctx, &PlacementRules::tree(), &same_kind)?;
    let id = ctx.ids.next_id();
    ctx.trees.push(Tree::new(id, center));
    Ok(id)
}

/// Plants the starting forest. Some trees may not fit; returns how many were placed.
pub fn spawn_initial_trees(ctx: &mut SimulationContext) -> usize {
    (0..INITIAL_TREES)
        .filter(|_| spawn_tree(ctx).is_ok())
        .count()
}

/// Regrows every tree whose respawn time has passed. Trees that cannot be placed are
/// retried shortly after.
pub fn process_respawns(ctx: &mut SimulationContext) {
    let due = ctx.director.respawns.pop_due(ctx.clock);
    for _ in 0..due {
        if let Err(err) = spawn_tree(ctx) {
            debug!("tree respawn deferred: {err}");
            let retry = ctx.clock + PLACEMENT_RETRY_SECS;
            ctx.director.respawns.schedule(retry);
        }
    }
}

/// Boss cadence check plus the regular spawn timer.
pub fn update_spawning(ctx: &mut SimulationContext, dt: f32) {
    spawn_scheduled_boss(ctx);

    ctx.director.spawn_timer -= dt;
    if ctx.director.spawn_timer > 0.0 {
        return;
    }
    let level = ctx.director.level();
    let regular_alive = ctx
        .enemies
        .iter()
        .filter(|e| e.body.active && e.kind.is_regular())
        .count();
    if regular_alive >= enemy_cap(level) {
        ctx.director.spawn_timer = spawn_interval(level);
        return;
    }

    let pool: Vec<EnemyKind> = EnemyKind::REGULAR
        .into_iter()
        .filter(|kind| kind.unlock_level().is_some_and(|unlock| unlock <= level))
        .collect();
    if pool.is_empty() {
        ctx.director.spawn_timer = spawn_interval(level);
        return;
    }
    let kind = pool[ctx.rng.random_range(0..pool.len())];
    ctx.director.spawn_timer = match spawn_enemy(ctx, kind) {
        Ok(_) => spawn_interval(level),
        Err(err) => {
            debug!("regular spawn skipped: {err}");
            PLACEMENT_RETRY_SECS
        }
    };
}

fn spawn_scheduled_boss(ctx: &mut SimulationContext) {
    let level = ctx.director.level();
    match scheduled_boss(level) {
        Some(BossCadence::Boss(kind)) if !ctx.director.boss_spawned => {
            match spawn_enemy(ctx, kind) {
                Ok(_) => {
                    ctx.director.boss_spawned = true;
                    ctx.messages
                        .set_message(format!("{} has appeared!", kind.display_name()), 4.0);
                    info!("{kind:?} spawned at level {level}");
                }
                // Flag stays unset so the next tick tries again.
                Err(err) => warn!("boss placement failed: {err}"),
            }
        }
        Some(BossCadence::MiniBoss) if !ctx.director.mini_boss_spawned => {
            let rotation = EnemyKind::MINI_BOSSES;
            let kind = rotation[ctx.director.mini_boss_turn % rotation.len()];
            match spawn_enemy(ctx, kind) {
                Ok(_) => {
                    ctx.director.mini_boss_spawned = true;
                    ctx.director.mini_boss_turn += 1;
                    ctx.messages
                        .set_message(format!("{} approaches!", kind.display_name()), 3.0);
                    info!("{kind:?} spawned at level {level}");
                }
                Err(err) => warn!("mini-boss placement failed: {err}"),
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::config::SimConfig;
    use crate::gameplay::sim::SimulationContext;
    use crate::testing::test_context;
    use pretty_assertions::assert_eq;

    #[test]
    fn level_is_monotonic_in_time() {
        let mut previous = 0;
        for step in 0..2_000 {
            #[allow(clippy::cast_precision_loss)]
            let level = level_for_time(step as f32 * 0.37, TIME_PER_LEVEL);
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(level_for_time(0.0, TIME_PER_LEVEL), 1);
        assert_eq!(level_for_time(59.9, TIME_PER_LEVEL), 1);
        assert_eq!(level_for_time(60.0, TIME_PER_LEVEL), 2);
        assert_eq!(level_for_time(f32::NAN, TIME_PER_LEVEL), 1);
    }

    #[test]
    fn interval_shrinks_to_floor_and_cap_grows() {
        assert_eq!(spawn_interval(1), BASE_SPAWN_INTERVAL);
        assert!(spawn_interval(2) < spawn_interval(1));
        assert_eq!(spawn_interval(100), MIN_SPAWN_INTERVAL);
        assert_eq!(enemy_cap(1), 14);
        assert_eq!(enemy_cap(3), 22);
    }

    #[test]
    fn boss_and_mini_boss_never_share_a_level() {
        for level in 1..=120 {
            let scheduled = scheduled_boss(level);
            if level % BOSS_EVERY == 0 {
                assert!(matches!(scheduled, Some(BossCadence::Boss(_))), "level {level}");
            }
        }
        assert_eq!(scheduled_boss(15), Some(BossCadence::Boss(EnemyKind::Boss)));
        assert_eq!(scheduled_boss(10), Some(BossCadence::Boss(EnemyKind::NewBoss)));
        assert_eq!(scheduled_boss(6), Some(BossCadence::MiniBoss));
        assert_eq!(scheduled_boss(7), None);
    }

    #[test]
    fn level_up_resets_boss_flags() {
        let mut director = SpawnDirector::default();
        director.boss_spawned = true;
        director.mini_boss_spawned = true;
        assert_eq!(director.advance(30.0), None);
        assert!(director.boss_spawned);
        assert_eq!(director.advance(125.0), Some(3));
        assert!(!director.boss_spawned && !director.mini_boss_spawned);
        assert_eq!(director.advance(10.0), None, "level never goes down");
        assert_eq!(director.level(), 3);
    }

    #[test]
    fn placements_never_land_in_safe_zone() {
        let mut ctx = test_context();
        let rules = PlacementRules::enemy(Vec2::splat(28.0));
        for _ in 0..300 {
            let center = find_position(&mut ctx, &rules, &[]).unwrap();
            let footprint = Rect::from_center_size(center, rules.size);
            assert!(!aabb_overlap(footprint, ctx.config.safe_zone));
            assert!(center.distance(ctx.player.body.center()) >= rules.min_player_distance);
        }
    }

    #[test]
    fn allow_anywhere_ignores_the_safe_zone() {
        let mut config = SimConfig::default();
        config.safe_zone = config.world_rect();
        let mut ctx = SimulationContext::new(config);
        ctx.trees.clear();
        ctx.enemies.clear();

        let rules = PlacementRules {
            allow_anywhere: true,
            ..PlacementRules::enemy(Vec2::splat(32.0))
        };
        let center = find_position(&mut ctx, &rules, &[]).unwrap();
        assert!(ctx.config.in_safe_zone(center));
        assert!(center.distance(ctx.player.body.center()) >= rules.min_player_distance);
    }

    #[test]
    fn exhausted_placement_creates_nothing() {
        let mut config = SimConfig::default();
        config.safe_zone = config.world_rect();
        let mut ctx = SimulationContext::new(config);
        ctx.trees.clear();
        ctx.enemies.clear();

        let result = spawn_enemy(&mut ctx, EnemyKind::Normal);
        assert_eq!(
            result,
            Err(SimError::PlacementExhausted {
                kind: "enemy",
                attempts: 50
            })
        );
        assert!(ctx.enemies.is_empty());
    }

    #[test]
    fn failed_boss_placement_retries_next_tick() {
        let mut config = SimConfig::default();
        config.safe_zone = config.world_rect();
        let mut ctx = SimulationContext::new(config);
        ctx.director.advance(TIME_PER_LEVEL * 4.0);
        assert_eq!(ctx.director.level(), 5);

        spawn_scheduled_boss(&mut ctx);
        assert!(!ctx.director.boss_spawned);

        ctx.config.safe_zone = SimConfig::default().safe_zone;
        spawn_scheduled_boss(&mut ctx);
        assert!(ctx.director.boss_spawned);
        assert_eq!(ctx.enemies.iter().filter(|e| e.kind == EnemyKind::Boss).count(), 1);

        spawn_scheduled_boss(&mut ctx);
        assert_eq!(ctx.enemies.iter().filter(|e| e.kind == EnemyKind::Boss).count(), 1);
    }

    #[test]
    fn mini_bosses_rotate() {
        let mut ctx = test_context();
        let mut seen = Vec::new();
        for level_start in [3.0, 6.0, 9.0] {
            ctx.director.advance(TIME_PER_LEVEL * (level_start - 1.0));
            spawn_scheduled_boss(&mut ctx);
            seen.push(ctx.enemies.last().unwrap().kind);
        }
        assert_eq!(seen, EnemyKind::MINI_BOSSES.to_vec());
    }

    #[test]
    fn regular_spawns_respect_the_cap() {
        let mut ctx = test_context();
        for _ in 0..200 {
            update_spawning(&mut ctx, 1.0);
        }
        let regular = ctx.enemies.iter().filter(|e| e.kind.is_regular()).count();
        assert_eq!(regular, enemy_cap(1));
        assert!(ctx.enemies.iter().all(|e| e.kind == EnemyKind::Normal));
    }

    #[test]
    fn respawn_queue_regrows_trees_when_due() {
        let mut ctx = test_context();
        ctx.director.respawns.schedule(30.0);
        ctx.clock = 10.0;
        process_respawns(&mut ctx);
        assert!(ctx.trees.is_empty());
        ctx.clock = 30.0;
        process_respawns(&mut ctx);
        assert_eq!(ctx.trees.len(), 1);
    }

    #[test]
    fn initial_forest_keeps_spacing() {
        let mut ctx = test_context();
        let planted = spawn_initial_trees(&mut ctx);
        assert!(planted > 0 && planted <= INITIAL_TREES);
        for (i, a) in ctx.trees.iter().enumerate() {
            for b in &ctx.trees[i + 1..] {
                assert!(a.body.center().distance(b.body.center()) >= 90.0);
            }
        }
    }
}
