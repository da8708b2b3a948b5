//! The simulation context and the fixed per-tick update order.
//!
//! One [`tick`] runs, in order: global timers and difficulty, the player, projectiles,
//! structures, enemies, transient effects, message timers, scheduled respawns, the spawn
//! check, the inactive-entity sweep, and finally the win/lose check. Objects created during
//! a step (a boss's bullets, a summoner's minions) join their container at the end of that
//! step and are first updated on the next tick.

use std::collections::{BTreeMap, HashSet};

use bevy::log::{error, info, warn};
use bevy::math::Vec2;
use bevy::prelude::Resource;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::actions::apply_intents;
use super::body::{EntityId, IdAllocator};
use super::config::{SimConfig, clamp_delta};
use super::effects::Effects;
use super::enemy::{Enemy, EnemyKind, ai, behaviors};
use super::error::{SimError, SimResult};
use super::geometry::is_finite;
use super::input::PlayerIntents;
use super::messages::MessageSink;
use super::objective::{self, Trophy};
use super::player::attack::fire_skill;
use super::player::{PLAYER_ID, Player};
use super::projectile::{Projectile, TargetRef, update_projectile};
use super::spawn::{self, SpawnDirector, spawn_initial_trees};
use super::structures::{Shop, Structure, default_shops, update_tower};
use super::trees::Tree;

/// Seconds the difficulty level-up banner stays up.
const LEVEL_UP_MESSAGE_SECS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefeatReason {
    /// Player health reached zero.
    Killed,
    /// The player's own state became invalid; carries the fault description.
    Fault(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat(DefeatReason),
}

/// End-of-run summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub elapsed: f32,
    pub level_reached: u32,
    pub kills: BTreeMap<EnemyKind, u32>,
}

impl RunStats {
    pub fn record_kill(&mut self, kind: EnemyKind) {
        *self.kills.entry(kind).or_default() += 1;
    }

    #[must_use]
    pub fn total_kills(&self) -> u32 {
        self.kills.values().sum()
    }

    #[must_use]
    pub fn kills_of(&self, kind: EnemyKind) -> u32 {
        self.kills.get(&kind).copied().unwrap_or(0)
    }
}

/// Every piece of mutable run state. The host owns one of these as a resource and only
/// touches it through [`tick`].
#[derive(Resource)]
pub struct SimulationContext {
    pub config: SimConfig,
    pub rng: StdRng,
    pub ids: IdAllocator,
    /// Simulated seconds since the run began.
    pub clock: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub structures: Vec<Structure>,
    pub shops: Vec<Shop>,
    pub trees: Vec<Tree>,
    /// The trophy while it lies on the ground.
    pub trophy: Option<Trophy>,
    pub effects: Effects,
    pub messages: MessageSink,
    pub director: SpawnDirector,
    pub stats: RunStats,
    /// Set once; the run is over from then on.
    pub outcome: Option<Outcome>,
}

impl SimulationContext {
    /// A fresh run: player in the safe zone, shops placed, starting forest planted.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let player = Player::new(config.player_start());
        let shops = default_shops(&config);
        let mut ctx = Self {
            config,
            rng,
            ids: IdAllocator::default(),
            clock: 0.0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            structures: Vec::new(),
            shops,
            trees: Vec::new(),
            trophy: None,
            effects: Effects::default(),
            messages: MessageSink::default(),
            director: SpawnDirector::default(),
            stats: RunStats {
                level_reached: 1,
                ..RunStats::default()
            },
            outcome: None,
        };
        let planted = spawn_initial_trees(&mut ctx);
        info!("new run with seed {:#x}: {planted} trees planted", ctx.config.seed);
        ctx
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Index of the active enemy with `id`.
    #[must_use]
    pub fn enemy_index(&self, id: EntityId) -> Option<usize> {
        self.enemies
            .iter()
            .position(|enemy| enemy.id == id && enemy.body.active)
    }

    /// Center and size of a live target. Dead or pruned targets resolve to `None`.
    #[must_use]
    pub fn target_footprint(&self, target: TargetRef) -> Option<(Vec2, Vec2)> {
        match target {
            TargetRef::Player => self
                .player
                .is_alive()
                .then(|| (self.player.body.center(), self.player.body.size)),
            TargetRef::Enemy(id) => self.enemy_index(id).map(|index| {
                let body = &self.enemies[index].body;
                (body.center(), body.size)
            }),
        }
    }

    #[must_use]
    pub fn target_center(&self, target: TargetRef) -> Option<Vec2> {
        self.target_footprint(target).map(|(center, _)| center)
    }

    fn live_enemy_ids(&self) -> HashSet<EntityId> {
        self.enemies
            .iter()
            .filter(|enemy| enemy.body.active)
            .map(|enemy| enemy.id)
            .collect()
    }
}

/// Advances the run by one frame. `raw_dt` is clamped first; a finished run is left as is.
pub fn tick(ctx: &mut SimulationContext, input: &PlayerIntents, raw_dt: f32) {
    if ctx.is_over() {
        return;
    }
    let dt = clamp_delta(raw_dt);

    advance_timers(ctx, dt);
    if let Err(err) = update_player(ctx, input, dt) {
        error!("player fault, ending run: {err}");
        ctx.outcome = Some(Outcome::Defeat(DefeatReason::Fault(err.to_string())));
        return;
    }
    update_projectiles(ctx, dt);
    update_structures(ctx, dt);
    update_enemies(ctx, dt);
    ctx.effects.update(dt);
    ctx.messages.update(dt);
    spawn::process_respawns(ctx);
    spawn::update_spawning(ctx, dt);
    prune_inactive(ctx);
    evaluate_outcome(ctx);
}

fn advance_timers(ctx: &mut SimulationContext, dt: f32) {
    ctx.clock += dt;
    ctx.stats.elapsed = ctx.clock;
    if let Some(level) = ctx.director.advance(ctx.clock) {
        ctx.stats.level_reached = level;
        ctx.messages
            .set_message(format!("Danger rises! Level {level}"), LEVEL_UP_MESSAGE_SECS);
        info!("difficulty level {level} at {:.0}s", ctx.clock);
    }
}

fn update_player(ctx: &mut SimulationContext, input: &PlayerIntents, dt: f32) -> SimResult<()> {
    if !ctx.player.is_alive() {
        return Ok(());
    }
    check_player_position(&ctx.player)?;
    ctx.player.tick_timers(dt);
    apply_intents(ctx, &input.intents, input.movement);

    let world = ctx.config.world_size;
    ctx.player.step_movement(input.movement, dt, world);
    check_player_position(&ctx.player)?;

    for (kind, level) in ctx.player.skills.tick(dt) {
        fire_skill(ctx, kind, level);
    }
    Ok(())
}

fn check_player_position(player: &Player) -> SimResult<()> {
    if is_finite(player.body.position) {
        return Ok(());
    }
    Err(SimError::InvalidNumeric {
        entity: PLAYER_ID,
        what: "player position",
    })
}

fn update_projectiles(ctx: &mut SimulationContext, dt: f32) {
    let live = ctx.live_enemy_ids();
    let mut projectiles = std::mem::take(&mut ctx.projectiles);
    for projectile in &mut projectiles {
        if let Err(err) = update_projectile(projectile, ctx, &live, dt) {
            warn!("dropping projectile: {err}");
            projectile.body.active = false;
        }
    }
    projectiles.append(&mut ctx.projectiles);
    ctx.projectiles = projectiles;
}

fn update_structures(ctx: &mut SimulationContext, dt: f32) {
    let mut structures = std::mem::take(&mut ctx.structures);
    for structure in &mut structures {
        update_tower(structure, ctx, dt);
    }
    structures.append(&mut ctx.structures);
    ctx.structures = structures;
}

fn update_enemies(ctx: &mut SimulationContext, dt: f32) {
    let live = ctx.live_enemy_ids();
    for enemy in &mut ctx.enemies {
        enemy.minions.retain(|id| live.contains(id));
    }

    let mut enemies = std::mem::take(&mut ctx.enemies);
    for enemy in &mut enemies {
        if !enemy.body.active {
            continue;
        }
        ai::update_state(enemy, ctx, dt);
        if let Err(err) = ai::step_movement(enemy, ctx, dt) {
            warn!("dropping {:?}: {err}", enemy.kind);
            enemy.body.active = false;
            continue;
        }
        behaviors::run_attacks(enemy, ctx, dt);
    }
    enemies.append(&mut ctx.enemies);
    ctx.enemies = enemies;
}

fn prune_inactive(ctx: &mut SimulationContext) {
    ctx.enemies.retain(|enemy| enemy.body.active);
    ctx.projectiles.retain(|projectile| projectile.body.active);
    ctx.structures.retain(|structure| structure.body.active);
    ctx.trees.retain(|tree| tree.body.active);
}

fn evaluate_outcome(ctx: &mut SimulationContext) {
    objective::try_pickup(ctx);
    if objective::delivered(ctx) {
        info!("victory after {:.0}s", ctx.clock);
        ctx.outcome = Some(Outcome::Victory);
    } else if !ctx.player.is_alive() {
        info!("defeat after {:.0}s", ctx.clock);
        ctx.outcome = Some(Outcome::Defeat(DefeatReason::Killed));
    }
}
