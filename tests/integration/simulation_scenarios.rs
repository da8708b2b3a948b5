//! Whole runs driven through the public simulation API with fixed seeds.

use bastion_survival::gameplay::actions::Intent;
use bastion_survival::gameplay::body::Health;
use bastion_survival::gameplay::config::SimConfig;
use bastion_survival::gameplay::enemy::EnemyKind;
use bastion_survival::gameplay::input::PlayerIntents;
use bastion_survival::gameplay::objective::drop_trophy;
use bastion_survival::gameplay::sim::{Outcome, SimulationContext, tick};
use bastion_survival::gameplay::spawn::enemy_cap;
use bastion_survival::gameplay::structures::StructureKind;
use bastion_survival::gameplay::trees::{TREE_WOOD, Tree};
use bevy::math::Vec2;
use pretty_assertions::assert_eq;

const DT: f32 = 1.0 / 60.0;

/// A run whose player cannot die, so long scenarios never stop early.
fn sturdy_run(seed: u64) -> SimulationContext {
    let mut ctx = SimulationContext::new(SimConfig::with_seed(seed));
    ctx.player.health = Health::new(1.0e9);
    ctx
}

/// Removes everything hostile so a scenario only exercises the player's own actions.
fn clear_threats(ctx: &mut SimulationContext) {
    ctx.enemies.clear();
    ctx.projectiles.clear();
}

fn snapshot(ctx: &SimulationContext) -> Vec<(EnemyKind, Vec2)> {
    ctx.enemies
        .iter()
        .map(|enemy| (enemy.kind, enemy.body.center()))
        .collect()
}

#[test]
fn same_seed_replays_the_same_run() {
    let mut first = sturdy_run(42);
    let mut second = sturdy_run(42);
    let idle = PlayerIntents::default();

    for _ in 0..(30.0 / DT) as usize {
        tick(&mut first, &idle, DT);
        tick(&mut second, &idle, DT);
    }

    assert!(!first.enemies.is_empty(), "30 seconds should bring enemies");
    assert_eq!(snapshot(&first), snapshot(&second));
    assert_eq!(first.clock, second.clock);
}

#[test]
fn difficulty_climbs_with_time_and_regulars_respect_the_cap() {
    let mut ctx = sturdy_run(7);
    let idle = PlayerIntents::default();

    for _ in 0..650 {
        tick(&mut ctx, &idle, 0.1);
        let regulars = ctx
            .enemies
            .iter()
            .filter(|enemy| enemy.body.active && enemy.kind.is_regular())
            .count();
        assert!(regulars <= enemy_cap(ctx.director.level()));
    }

    assert_eq!(ctx.director.level(), 2);
    assert_eq!(ctx.stats.level_reached, 2);
    assert!(ctx.outcome.is_none());
}

#[test]
fn chopped_wood_pays_for_a_fence() {
    let mut ctx = sturdy_run(3);
    ctx.trees.clear();
    let zone = ctx.config.safe_zone;
    let start = zone.min - Vec2::new(200.0, 200.0);
    ctx.player.body.set_center(start);
    let tree_id = ctx.ids.next_id();
    ctx.trees.push(Tree::new(tree_id, start + Vec2::new(40.0, 0.0)));

    let chop = PlayerIntents {
        movement: Vec2::ZERO,
        intents: vec![Intent::AttackInteract],
    };
    for _ in 0..600 {
        clear_threats(&mut ctx);
        tick(&mut ctx, &chop, DT);
        if ctx.player.wood > 0 {
            break;
        }
    }
    assert_eq!(ctx.player.wood, TREE_WOOD);

    let build = PlayerIntents {
        movement: Vec2::ZERO,
        intents: vec![Intent::Build {
            kind: StructureKind::Fence,
            at: start + Vec2::new(0.0, -100.0),
        }],
    };
    clear_threats(&mut ctx);
    tick(&mut ctx, &build, DT);

    assert_eq!(ctx.structures.len(), 1);
    assert_eq!(ctx.structures[0].kind, StructureKind::Fence);
    assert_eq!(ctx.player.wood, TREE_WOOD - StructureKind::Fence.cost().wood);
}

#[test]
fn carrying_the_trophy_home_wins() {
    let mut ctx = sturdy_run(11);
    ctx.trees.clear();
    let home = ctx.config.player_start();
    let drop_at = Vec2::new(home.x, ctx.config.safe_zone.min.y - 150.0);
    drop_trophy(&mut ctx, drop_at);

    let south = PlayerIntents {
        movement: Vec2::new(0.0, -1.0),
        intents: Vec::new(),
    };
    for _ in 0..600 {
        clear_threats(&mut ctx);
        tick(&mut ctx, &south, DT);
        if ctx.player.carrying_trophy {
            break;
        }
    }
    assert!(ctx.player.carrying_trophy);
    assert!(ctx.trophy.is_none());

    let north = PlayerIntents {
        movement: Vec2::new(0.0, 1.0),
        intents: Vec::new(),
    };
    for _ in 0..600 {
        clear_threats(&mut ctx);
        tick(&mut ctx, &north, DT);
        if ctx.is_over() {
            break;
        }
    }
    assert_eq!(ctx.outcome, Some(Outcome::Victory));

    // A finished run no longer advances.
    let clock = ctx.clock;
    tick(&mut ctx, &north, DT);
    assert_eq!(ctx.clock, clock);
}
