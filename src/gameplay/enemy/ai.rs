//! Enemy movement: the chasing/wandering state machine and safe-zone avoidance.

use bevy::math::{Rect, Vec2};
use rand::Rng;

use super::behaviors::STALKER_DASH_MULTIPLIER;
use super::{AiState, Enemy, WANDER_RETARGET_JITTER, WANDER_RETARGET_SECS};
use crate::gameplay::config::SimConfig;
use crate::gameplay::error::{SimError, SimResult};
use crate::gameplay::geometry::{aabb_overlap, clamp_to_world, direction_to, is_finite};
use crate::gameplay::sim::SimulationContext;
use crate::gameplay::structures::StructureKind;

// === Constants ===

/// Rejection-sampling attempts for a wander target outside the safe zone.
pub const WANDER_TARGET_ATTEMPTS: usize = 10;

/// Forced wander targets land this far outside the safe-zone edge (pixels).
const SAFE_ZONE_MARGIN: f32 = 40.0;

// === State machine ===

/// Picks a uniform wander target outside the safe zone. After `WANDER_TARGET_ATTEMPTS`
/// misses the last candidate is pushed out across the nearest safe-zone edge.
pub fn pick_wander_target(config: &SimConfig, rng: &mut impl Rng) -> Vec2 {
    let mut candidate = Vec2::ZERO;
    for _ in 0..WANDER_TARGET_ATTEMPTS {
        candidate = Vec2::new(
            rng.random::<f32>() * config.world_size.x,
            rng.random::<f32>() * config.world_size.y,
        );
        if !config.in_safe_zone(candidate) {
            return candidate;
        }
    }
    push_out_of_zone(candidate, config.safe_zone, config.world_size)
}

/// Moves `point` to just outside the nearest edge of `zone`, staying inside the world.
fn push_out_of_zone(point: Vec2, zone: Rect, world: Vec2) -> Vec2 {
    let exits = [
        (point.x - zone.min.x, Vec2::new(zone.min.x - SAFE_ZONE_MARGIN, point.y)),
        (zone.max.x - point.x, Vec2::new(zone.max.x + SAFE_ZONE_MARGIN, point.y)),
        (point.y - zone.min.y, Vec2::new(point.x, zone.min.y - SAFE_ZONE_MARGIN)),
        (zone.max.y - point.y, Vec2::new(point.x, zone.max.y + SAFE_ZONE_MARGIN)),
    ];
    let inside_world = |p: &Vec2| p.x >= 0.0 && p.y >= 0.0 && p.x <= world.x && p.y <= world.y;
    exits
        .iter()
        .filter(|(_, exit)| inside_world(exit))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map_or(Vec2::ZERO, |(_, exit)| *exit)
}

fn retarget(enemy: &mut Enemy, ctx: &mut SimulationContext) {
    enemy.wander_target = pick_wander_target(&ctx.config, &mut ctx.rng);
    enemy.wander_timer = WANDER_RETARGET_JITTER.mul_add(ctx.rng.random::<f32>(), WANDER_RETARGET_SECS);
}

/// Evaluates the chasing/wandering transitions for one tick.
pub fn update_state(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) {
    let player = ctx.player.body.center();
    let center = enemy.body.center();
    let player_sheltered = ctx.config.in_safe_zone(player);

    match enemy.state {
        AiState::Chasing if player_sheltered => {
            enemy.state = AiState::Wandering;
            retarget(enemy, ctx);
        }
        AiState::Chasing => {}
        AiState::Wandering => {
            if !player_sheltered && center.distance_squared(player) < enemy.sight_range * enemy.sight_range {
                enemy.state = AiState::Chasing;
                return;
            }
            enemy.wander_timer -= dt;
            let arrived = center.distance(enemy.wander_target) < ctx.config.tile_size * 1.5;
            if enemy.wander_timer <= 0.0 || arrived {
                retarget(enemy, ctx);
            }
        }
    }
}

// === Movement ===

/// Moves the enemy toward its state's target, keeping it out of the safe zone and inside the
/// world. Destroys any fence it touches.
pub fn step_movement(enemy: &mut Enemy, ctx: &mut SimulationContext, dt: f32) -> SimResult<()> {
    enemy.boost = (enemy.boost - dt).max(0.0);
    if enemy.stun > 0.0 {
        enemy.stun = (enemy.stun - dt).max(0.0);
        return Ok(());
    }

    let center = enemy.body.center();
    let (target, mut speed) = match enemy.state {
        AiState::Chasing => (ctx.player.body.center(), enemy.speed),
        AiState::Wandering => (enemy.wander_target, enemy.wander_speed()),
    };
    if enemy.boost > 0.0 {
        speed *= STALKER_DASH_MULTIPLIER;
    }
    let Some(direction) = direction_to(center, target) else {
        return Ok(());
    };

    let step = direction * speed * dt;
    let mut next = center + step;
    if ctx.config.in_safe_zone(next) && !ctx.config.in_safe_zone(center) {
        match enemy.state {
            // Bounce back along the approach instead of entering.
            AiState::Chasing => next = center - step,
            AiState::Wandering => {
                retarget(enemy, ctx);
                return Ok(());
            }
        }
    }

    if !is_finite(next) {
        return Err(SimError::InvalidNumeric {
            entity: enemy.id,
            what: "enemy position",
        });
    }
    enemy.body.set_center(next);
    enemy.body.position = clamp_to_world(enemy.body.position, enemy.body.size, ctx.config.world_size);

    trample_fences(enemy, ctx);
    Ok(())
}

/// Fences give way the moment an enemy touches them.
fn trample_fences(enemy: &Enemy, ctx: &mut SimulationContext) {
    let rect = enemy.body.rect();
    for structure in &mut ctx.structures {
        if structure.kind == StructureKind::Fence
            && structure.body.active
            && aabb_overlap(rect, structure.body.rect())
        {
            structure.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::enemy::EnemyKind;
    use crate::gameplay::structures::Structure;
    use crate::testing::{spawn_test_enemy, test_context};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 1.0 / 60.0;

    fn take_enemy(ctx: &mut SimulationContext, kind: EnemyKind, center: Vec2) -> Enemy {
        let id = spawn_test_enemy(ctx, kind, center);
        let index = ctx.enemy_index(id).unwrap();
        ctx.enemies.remove(index)
    }

    #[test]
    fn wander_targets_avoid_safe_zone() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let target = pick_wander_target(&config, &mut rng);
            assert!(!config.in_safe_zone(target), "{target}");
        }
    }

    #[test]
    fn forced_wander_target_leaves_a_zone_covering_most_of_the_world() {
        let mut config = SimConfig::default();
        config.safe_zone = Rect::new(100.0, 100.0, config.world_size.x - 100.0, config.world_size.y - 100.0);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let target = pick_wander_target(&config, &mut rng);
            assert!(!config.in_safe_zone(target), "{target}");
        }
    }

    #[test]
    fn chasing_enemy_stops_chasing_when_player_shelters() {
        let mut ctx = test_context();
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(1300.0, 1200.0));
        enemy.state = AiState::Chasing;
        update_state(&mut enemy, &mut ctx, DT);
        assert_eq!(enemy.state, AiState::Wandering);
        assert!(!ctx.config.in_safe_zone(enemy.wander_target));
    }

    #[test]
    fn wandering_enemy_chases_player_in_sight() {
        let mut ctx = test_context();
        ctx.player.body.set_center(Vec2::new(600.0, 600.0));
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(800.0, 600.0));
        update_state(&mut enemy, &mut ctx, DT);
        assert_eq!(enemy.state, AiState::Chasing);

        let mut far = take_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(1500.0, 600.0));
        update_state(&mut far, &mut ctx, DT);
        assert_eq!(far.state, AiState::Wandering);
    }

    #[test]
    fn expired_wander_timer_picks_a_new_target() {
        let mut ctx = test_context();
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(600.0, 600.0));
        let old_target = Vec2::new(2800.0, 2000.0);
        enemy.wander_target = old_target;
        enemy.wander_timer = 0.0;

        update_state(&mut enemy, &mut ctx, DT);

        assert_eq!(enemy.state, AiState::Wandering);
        assert_ne!(enemy.wander_target, old_target);
        assert!(enemy.wander_timer >= WANDER_RETARGET_SECS);
    }

    #[test]
    fn arriving_near_the_target_retargets_early() {
        let mut ctx = test_context();
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(600.0, 600.0));
        let near = enemy.body.center() + Vec2::new(ctx.config.tile_size, 0.0);
        enemy.wander_target = near;
        enemy.wander_timer = 100.0;

        update_state(&mut enemy, &mut ctx, DT);

        assert_ne!(enemy.wander_target, near);
        assert!(enemy.wander_timer <= WANDER_RETARGET_SECS + WANDER_RETARGET_JITTER);
    }

    #[test]
    fn distant_target_with_time_left_is_kept() {
        let mut ctx = test_context();
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(600.0, 600.0));
        let far = Vec2::new(2800.0, 2000.0);
        enemy.wander_target = far;
        enemy.wander_timer = 2.0;

        update_state(&mut enemy, &mut ctx, DT);

        assert_eq!(enemy.wander_target, far);
        assert!((enemy.wander_timer - (2.0 - DT)).abs() < 1e-6);
    }

    #[test]
    fn chasing_enemy_is_pushed_back_at_safe_zone_edge() {
        let mut ctx = test_context();
        let edge = ctx.config.safe_zone.min.x;
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Fast, Vec2::new(edge - 1.0, 1200.0));
        enemy.state = AiState::Chasing;
        step_movement(&mut enemy, &mut ctx, DT).unwrap();
        assert!(enemy.body.center().x < edge - 1.0);
        assert!(!ctx.config.in_safe_zone(enemy.body.center()));
    }

    #[test]
    fn wandering_enemy_retargets_instead_of_entering() {
        let mut ctx = test_context();
        let edge = ctx.config.safe_zone.min.x;
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Fast, Vec2::new(edge - 1.0, 1200.0));
        enemy.state = AiState::Wandering;
        enemy.wander_target = ctx.config.safe_zone.center();
        let before = enemy.body.center();
        step_movement(&mut enemy, &mut ctx, DT).unwrap();
        assert_eq!(enemy.body.center(), before);
        assert_ne!(enemy.wander_target, ctx.config.safe_zone.center());
    }

    #[test]
    fn movement_is_clamped_to_world() {
        let mut ctx = test_context();
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Fast, Vec2::new(5.0, 5.0));
        enemy.state = AiState::Wandering;
        enemy.wander_target = Vec2::new(-500.0, -500.0);
        step_movement(&mut enemy, &mut ctx, 0.1).unwrap();
        assert_eq!(enemy.body.position, Vec2::ZERO);
    }

    #[test]
    fn stunned_enemy_does_not_move() {
        let mut ctx = test_context();
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(600.0, 600.0));
        enemy.stun = 0.5;
        let before = enemy.body.position;
        step_movement(&mut enemy, &mut ctx, DT).unwrap();
        assert_eq!(enemy.body.position, before);
    }

    #[test]
    fn touching_a_fence_destroys_it() {
        let mut ctx = test_context();
        let fence_id = ctx.ids.next_id();
        ctx.structures
            .push(Structure::new(fence_id, StructureKind::Fence, Vec2::new(620.0, 600.0)));
        let mut enemy = take_enemy(&mut ctx, EnemyKind::Tank, Vec2::new(600.0, 600.0));
        enemy.state = AiState::Wandering;
        enemy.wander_target = Vec2::new(900.0, 600.0);
        step_movement(&mut enemy, &mut ctx, DT).unwrap();
        assert!(!ctx.structures[0].body.active);
    }
}
