//! Damage resolution for both sides, and kill rewards.
//!
//! Every hit on the player or an enemy goes through here, so the safe-zone and invincibility
//! rules, the dodge roll, and the once-per-kill reward hold no matter where the damage came
//! from.

use bevy::log::{debug, info};
use bevy::math::Vec2;
use rand::Rng;

use super::body::EntityId;
use super::effects::EffectKind;
use super::enemy::{EnemyKind, behaviors};
use super::geometry::circle_overlaps_rect;
use super::objective::drop_trophy;
use super::player::Reward;
use super::sim::SimulationContext;

/// What happened to a hit aimed at the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerHit {
    /// No effect: sheltered, invincible, already dead, or a non-positive amount.
    Ignored,
    Dodged,
    Hit,
    Killed,
}

/// Applies `amount` damage to the player.
pub fn damage_player(ctx: &mut SimulationContext, amount: f32) -> PlayerHit {
    let center = ctx.player.body.center();
    if !ctx.player.is_alive() || amount.is_nan() || amount <= 0.0 {
        return PlayerHit::Ignored;
    }
    if ctx.config.in_safe_zone(center) || ctx.player.is_invincible() {
        return PlayerHit::Ignored;
    }
    if ctx.rng.random::<f32>() < ctx.player.dodge_chance() {
        ctx.effects.push(EffectKind::Miss, center);
        return PlayerHit::Dodged;
    }

    ctx.player.health.damage(amount);
    ctx.effects.push(
        EffectKind::DamageNumber {
            amount,
            on_player: true,
        },
        center,
    );
    if ctx.player.is_alive() {
        return PlayerHit::Hit;
    }

    info!("player was killed");
    if ctx.player.carrying_trophy {
        ctx.player.carrying_trophy = false;
        drop_trophy(ctx, center);
    }
    PlayerHit::Killed
}

/// Damages the enemy at `index`. Returns `true` only on the killing hit, after the kill
/// has been rewarded.
pub fn damage_enemy(ctx: &mut SimulationContext, index: usize, amount: f32) -> bool {
    let Some(enemy) = ctx.enemies.get_mut(index) else {
        return false;
    };
    if !enemy.body.active {
        return false;
    }
    let kill = Kill {
        id: enemy.id,
        kind: enemy.kind,
        center: enemy.body.center(),
        damage: enemy.damage,
        reward: enemy.reward,
    };
    let killed = enemy.take_damage(amount);
    ctx.effects.push(
        EffectKind::DamageNumber {
            amount,
            on_player: false,
        },
        kill.center,
    );
    if killed {
        on_enemy_killed(ctx, kill);
    }
    killed
}

/// Damages every active enemy whose body touches the circle. Returns the ids hit.
pub fn damage_enemies_in_radius(
    ctx: &mut SimulationContext,
    center: Vec2,
    radius: f32,
    amount: f32,
) -> Vec<EntityId> {
    let targets: Vec<(usize, EntityId)> = ctx
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| enemy.body.active && circle_overlaps_rect(center, radius, enemy.body.rect()))
        .map(|(index, enemy)| (index, enemy.id))
        .collect();
    for &(index, _) in &targets {
        damage_enemy(ctx, index, amount);
    }
    targets.into_iter().map(|(_, id)| id).collect()
}

/// What the reward and death effects need from an enemy that just died.
#[derive(Debug, Clone, Copy)]
struct Kill {
    id: EntityId,
    kind: EnemyKind,
    center: Vec2,
    damage: f32,
    reward: Reward,
}

fn on_enemy_killed(ctx: &mut SimulationContext, kill: Kill) {
    let levels = ctx.player.credit(kill.reward);
    if levels > 0 {
        ctx.messages
            .set_message(format!("Level up! You are level {}", ctx.player.level), 2.0);
        ctx.effects.push(EffectKind::LevelUp, ctx.player.body.center());
    }
    ctx.stats.record_kill(kill.kind);

    if kill.kind.is_boss() || kill.kind.is_mini_boss() {
        info!("{} {:?} defeated", kill.kind.display_name(), kill.id);
    } else {
        debug!("{:?} {:?} killed", kill.kind, kill.id);
    }

    match kill.kind {
        EnemyKind::Explosive => behaviors::explode(ctx, kill.center, kill.damage),
        // Only one trophy exists per run.
        EnemyKind::NewBoss if !ctx.player.carrying_trophy && ctx.trophy.is_none() => {
            drop_trophy(ctx, kill.center);
        }
        _ => {}
    }
}
