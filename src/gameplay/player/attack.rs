//! Weapon attacks, tree chopping, and automatic skill casts.

use bevy::log::debug;
use bevy::math::Vec2;

use super::skills::{QUAKE_STUN_SECS, SkillKind, SkillShape};
use super::weapons::{Delivery, weapon_stats};
use crate::gameplay::combat::{damage_enemies_in_radius, damage_enemy};
use crate::gameplay::effects::EffectKind;
use crate::gameplay::geometry::{direction_to, k_nearest_in_range, nearest_in_range};
use crate::gameplay::projectile::{
    Aim, ProjectileKind, ProjectileOptions, Shooter, TargetRef, Tint, spawn_projectile,
};
use crate::gameplay::sim::SimulationContext;
use crate::gameplay::trees::{CHOP_REACH, TREE_RESPAWN_SECS};

/// What a press of the attack key ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Still on cooldown, or nothing in reach.
    Idle,
    /// Struck or fired at this many enemies.
    Attacked(usize),
    Chopped,
    Felled { wood: u32 },
}

fn live_enemy_positions(ctx: &SimulationContext) -> impl Iterator<Item = (usize, Vec2)> + '_ {
    ctx.enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| enemy.body.active)
        .map(|(index, enemy)| (index, enemy.body.center()))
}

/// Attacks with the active weapon. With no enemy in reach, chops the nearest tree instead.
pub fn attack_or_gather(ctx: &mut SimulationContext) -> AttackOutcome {
    if ctx.player.attack_cooldown > 0.0 || !ctx.player.is_alive() {
        return AttackOutcome::Idle;
    }
    let tier = ctx.player.weapons.active_tier();
    let stats = weapon_stats(tier, ctx.player.weapons.level(tier));
    let origin = ctx.player.body.center();

    let targets: Vec<usize> = if stats.shots > 1 {
        k_nearest_in_range(origin, stats.range, stats.shots, live_enemy_positions(ctx))
    } else {
        nearest_in_range(origin, stats.range, live_enemy_positions(ctx))
            .into_iter()
            .collect()
    };

    if targets.is_empty() {
        return chop_nearest_tree(ctx);
    }

    ctx.player.attack_cooldown = stats.cooldown;
    match stats.delivery {
        Delivery::Instant => {
            for &index in &targets {
                damage_enemy(ctx, index, stats.damage);
            }
        }
        Delivery::Projectile(kind) => {
            let ids: Vec<_> = targets.iter().map(|&index| ctx.enemies[index].id).collect();
            for id in ids {
                spawn_projectile(
                    ctx,
                    kind,
                    Shooter::Player,
                    origin,
                    Aim::Target(TargetRef::Enemy(id)),
                    ProjectileOptions {
                        damage: Some(stats.damage),
                        ..ProjectileOptions::default()
                    },
                );
            }
        }
    }
    AttackOutcome::Attacked(targets.len())
}

fn chop_nearest_tree(ctx: &mut SimulationContext) -> AttackOutcome {
    let origin = ctx.player.body.center();
    let nearest = nearest_in_range(
        origin,
        CHOP_REACH,
        ctx.trees
            .iter()
            .enumerate()
            .filter(|(_, tree)| tree.body.active)
            .map(|(index, tree)| (index, tree.body.center())),
    );
    let Some(index) = nearest else {
        return AttackOutcome::Idle;
    };

    let tier = ctx.player.weapons.active_tier();
    ctx.player.attack_cooldown = weapon_stats(tier, ctx.player.weapons.level(tier)).cooldown;
    let Some(wood) = ctx.trees[index].chop() else {
        return AttackOutcome::Chopped;
    };

    ctx.player.wood += wood;
    ctx.director.respawns.schedule(ctx.clock + TREE_RESPAWN_SECS);
    ctx.messages.set_message(format!("+{wood} wood"), 1.5);
    debug!("tree {:?} felled", ctx.trees[index].id);
    AttackOutcome::Felled { wood }
}

/// Casts a skill that came off cooldown this tick.
pub fn fire_skill(ctx: &mut SimulationContext, kind: SkillKind, level: u32) {
    let spec = kind.spec();
    let damage = spec.damage(level);
    let reach = spec.reach(level);
    let origin = ctx.player.body.center();

    match kind.shape() {
        SkillShape::Area => {
            let hit = damage_enemies_in_radius(ctx, origin, reach, damage);
            ctx.effects.push(EffectKind::Shockwave { radius: reach }, origin);
            if kind == SkillKind::Quake {
                for enemy in ctx.enemies.iter_mut().filter(|e| hit.contains(&e.id) && e.body.active) {
                    enemy.stun = enemy.stun.max(QUAKE_STUN_SECS);
                }
            }
        }
        SkillShape::Linear => {
            let direction = nearest_in_range(origin, reach, live_enemy_positions(ctx))
                .and_then(|index| direction_to(origin, ctx.enemies[index].body.center()))
                .unwrap_or(ctx.player.facing);
            let projectile = match kind {
                SkillKind::EnergyBeam => ProjectileKind::EnergyBeam,
                _ => ProjectileKind::EnergyBolt,
            };
            spawn_projectile(
                ctx,
                projectile,
                Shooter::Player,
                origin,
                Aim::Direction(direction),
                ProjectileOptions {
                    damage: Some(damage),
                    range: Some(reach),
                    tint: Some(Tint::Violet),
                    ..ProjectileOptions::default()
                },
            );
        }
    }
    debug!("{} cast at level {level}", kind.display_name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::enemy::EnemyKind;
    use crate::gameplay::player::weapons::{MAX_WEAPON_LEVEL, WeaponLevels};
    use crate::gameplay::projectile::Heading;
    use crate::gameplay::trees::{TREE_CHOPS, TREE_WOOD, Tree};
    use crate::testing::{spawn_test_enemy, test_context};
    use pretty_assertions::assert_eq;

    fn field_context() -> SimulationContext {
        let mut ctx = test_context();
        ctx.player.body.set_center(Vec2::new(600.0, 600.0));
        ctx
    }

    #[test]
    fn melee_hits_nearest_enemy_instantly() {
        let mut ctx = field_context();
        spawn_test_enemy(&mut ctx, EnemyKind::Tank, Vec2::new(650.0, 600.0));
        spawn_test_enemy(&mut ctx, EnemyKind::Tank, Vec2::new(640.0, 600.0));
        assert_eq!(attack_or_gather(&mut ctx), AttackOutcome::Attacked(1));
        assert_eq!(ctx.enemies[0].health.current, ctx.enemies[0].health.max);
        assert!(ctx.enemies[1].health.current < ctx.enemies[1].health.max);
        assert!(ctx.projectiles.is_empty());
    }

    #[test]
    fn attack_respects_cooldown() {
        let mut ctx = field_context();
        spawn_test_enemy(&mut ctx, EnemyKind::Tank, Vec2::new(650.0, 600.0));
        attack_or_gather(&mut ctx);
        assert_eq!(attack_or_gather(&mut ctx), AttackOutcome::Idle);
    }

    #[test]
    fn gun_fires_homing_bullets_at_several_targets() {
        let mut ctx = field_context();
        ctx.player.weapons = WeaponLevels {
            melee: MAX_WEAPON_LEVEL,
            bow: MAX_WEAPON_LEVEL,
            gun: 1,
        };
        for x in [700.0, 750.0, 800.0] {
            spawn_test_enemy(&mut ctx, EnemyKind::Normal, Vec2::new(x, 600.0));
        }
        assert_eq!(attack_or_gather(&mut ctx), AttackOutcome::Attacked(2));
        assert_eq!(ctx.projectiles.len(), 2);
        for projectile in &ctx.projectiles {
            assert_eq!(projectile.kind, ProjectileKind::Bullet);
            assert!(matches!(projectile.heading, Heading::Homing { .. }));
        }
    }

    #[test]
    fn chopping_fells_tree_and_schedules_respawn() {
        let mut ctx = field_context();
        let id = ctx.ids.next_id();
        ctx.trees.push(Tree::new(id, Vec2::new(640.0, 600.0)));

        for _ in 1..TREE_CHOPS {
            assert_eq!(attack_or_gather(&mut ctx), AttackOutcome::Chopped);
            ctx.player.attack_cooldown = 0.0;
        }
        assert_eq!(attack_or_gather(&mut ctx), AttackOutcome::Felled { wood: TREE_WOOD });
        assert_eq!(ctx.player.wood, TREE_WOOD);
        assert_eq!(ctx.director.respawns.len(), 1);
    }

    #[test]
    fn nothing_in_reach_does_nothing() {
        let mut ctx = field_context();
        assert_eq!(attack_or_gather(&mut ctx), AttackOutcome::Idle);
        assert_eq!(ctx.player.attack_cooldown, 0.0);
    }

    #[test]
    fn quake_damages_and_stuns() {
        let mut ctx = field_context();
        spawn_test_enemy(&mut ctx, EnemyKind::Tank, Vec2::new(700.0, 600.0));
        fire_skill(&mut ctx, SkillKind::Quake, 1);
        let enemy = &ctx.enemies[0];
        assert_eq!(enemy.health.current, enemy.health.max - 40.0);
        assert_eq!(enemy.stun, QUAKE_STUN_SECS);
    }

    #[test]
    fn energy_bolt_flies_at_nearest_enemy() {
        let mut ctx = field_context();
        spawn_test_enemy(&mut ctx, EnemyKind::Tank, Vec2::new(600.0, 800.0));
        fire_skill(&mut ctx, SkillKind::EnergyBolt, 2);
        let bolt = &ctx.projectiles[0];
        assert_eq!(bolt.kind, ProjectileKind::EnergyBolt);
        assert_eq!(bolt.damage, 48.0);
        assert_eq!(bolt.max_range, 460.0);
        assert_eq!(bolt.heading, Heading::Ballistic(Vec2::Y));
    }

    #[test]
    fn energy_beam_without_targets_uses_facing() {
        let mut ctx = field_context();
        ctx.player.facing = Vec2::NEG_X;
        fire_skill(&mut ctx, SkillKind::EnergyBeam, 1);
        assert_eq!(ctx.projectiles[0].heading, Heading::Ballistic(Vec2::NEG_X));
    }
}
