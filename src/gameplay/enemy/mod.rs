//! Enemies: the kind/stat table, difficulty scaling, and the per-enemy record.
//!
//! Stats are looked up from a data table and frozen at the difficulty level the enemy
//! spawned at. Per-kind attacks live in [`behaviors`], movement in [`ai`].

pub mod ai;
pub mod behaviors;

use bevy::math::Vec2;
use rand::Rng;

use self::behaviors::CooldownSpec;
use super::body::{Body, EntityId, Health};
use super::player::Reward;

// === Constants ===

/// Sight range of regular enemies and mini-bosses (pixels).
pub const SIGHT_RANGE: f32 = 420.0;

/// Sight range of the two boss kinds (pixels).
pub const BOSS_SIGHT_RANGE: f32 = 900.0;

/// Wandering moves at this fraction of chase speed.
pub const WANDER_SPEED_FACTOR: f32 = 0.45;

/// Wander retarget interval: `base + random * jitter` seconds.
pub const WANDER_RETARGET_SECS: f32 = 2.0;
pub const WANDER_RETARGET_JITTER: f32 = 2.0;

/// Speed scaling stops at this multiple of the base speed.
pub const MAX_SPEED_SCALE: f32 = 1.6;

// === Kinds ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemyKind {
    Normal,
    Fast,
    Tank,
    Ranged,
    Explosive,
    Teleporter,
    Summoner,
    MiniBoss,
    MiniBossA,
    MiniBossB,
    Boss,
    NewBoss,
}

/// Base stats at difficulty level 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
    pub size: f32,
    pub reward: Reward,
}

const fn stats(hp: f32, damage: f32, speed: f32, size: f32, gold: u32, xp: u32, gems: u32) -> EnemyStats {
    EnemyStats {
        hp,
        damage,
        speed,
        size,
        reward: Reward { gold, xp, gems },
    }
}

impl EnemyKind {
    /// Kinds the regular spawn timer draws from, in unlock order.
    pub const REGULAR: [Self; 7] = [
        Self::Normal,
        Self::Fast,
        Self::Tank,
        Self::Ranged,
        Self::Explosive,
        Self::Teleporter,
        Self::Summoner,
    ];

    /// Mini-boss spawn rotation.
    pub const MINI_BOSSES: [Self; 3] = [Self::MiniBoss, Self::MiniBossA, Self::MiniBossB];

    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Normal => stats(30.0, 8.0, 85.0, 28.0, 3, 5, 0),
            Self::Fast => stats(20.0, 6.0, 150.0, 24.0, 4, 6, 0),
            Self::Tank => stats(110.0, 15.0, 55.0, 40.0, 8, 12, 0),
            Self::Ranged => stats(25.0, 7.0, 70.0, 28.0, 6, 9, 0),
            Self::Explosive => stats(35.0, 25.0, 95.0, 30.0, 6, 9, 0),
            Self::Teleporter => stats(35.0, 10.0, 80.0, 28.0, 8, 12, 0),
            Self::Summoner => stats(60.0, 6.0, 60.0, 32.0, 12, 18, 0),
            Self::MiniBoss => stats(450.0, 18.0, 70.0, 56.0, 60, 80, 2),
            Self::MiniBossA => stats(380.0, 20.0, 90.0, 52.0, 60, 80, 2),
            Self::MiniBossB => stats(420.0, 16.0, 65.0, 56.0, 60, 80, 2),
            Self::Boss => stats(1600.0, 28.0, 60.0, 80.0, 200, 300, 5),
            Self::NewBoss => stats(2600.0, 34.0, 65.0, 88.0, 350, 500, 8),
        }
    }

    /// Difficulty level from which the regular spawn pool includes this kind.
    #[must_use]
    pub const fn unlock_level(self) -> Option<u32> {
        match self {
            Self::Normal => Some(1),
            Self::Fast => Some(2),
            Self::Tank | Self::Ranged => Some(3),
            Self::Explosive => Some(4),
            Self::Teleporter => Some(5),
            Self::Summoner => Some(6),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss | Self::NewBoss)
    }

    #[must_use]
    pub const fn is_mini_boss(self) -> bool {
        matches!(self, Self::MiniBoss | Self::MiniBossA | Self::MiniBossB)
    }

    /// Bosses and mini-bosses do not count toward the regular enemy cap.
    #[must_use]
    pub const fn is_regular(self) -> bool {
        !self.is_boss() && !self.is_mini_boss()
    }

    #[must_use]
    pub const fn sight_range(self) -> f32 {
        if self.is_boss() {
            BOSS_SIGHT_RANGE
        } else {
            SIGHT_RANGE
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "Grunt",
            Self::Fast => "Runner",
            Self::Tank => "Brute",
            Self::Ranged => "Archer",
            Self::Explosive => "Bomber",
            Self::Teleporter => "Blinker",
            Self::Summoner => "Caller",
            Self::MiniBoss => "Warden",
            Self::MiniBossA => "Stalker",
            Self::MiniBossB => "Broodmother",
            Self::Boss => "Overlord",
            Self::NewBoss => "Ancient",
        }
    }
}

/// Stats for `kind` at difficulty `level`. Rewards are not scaled.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scaled_stats(kind: EnemyKind, level: u32) -> EnemyStats {
    let base = kind.stats();
    let steps = level.max(1).saturating_sub(1) as f32;
    EnemyStats {
        hp: base.hp * 0.25f32.mul_add(steps, 1.0),
        damage: base.damage * 0.12f32.mul_add(steps, 1.0),
        speed: base.speed * 0.03f32.mul_add(steps, 1.0).min(MAX_SPEED_SCALE),
        ..base
    }
}

// === Enemy ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    Chasing,
    Wandering,
}

/// A countdown that re-arms to `base + random * jitter`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    pub remaining: f32,
    pub spec: CooldownSpec,
}

impl Cooldown {
    /// A freshly randomized cooldown.
    pub fn armed(spec: CooldownSpec, rng: &mut impl Rng) -> Self {
        Self {
            remaining: spec.roll(rng),
            spec,
        }
    }

    /// Counts down (stopping at zero) and reports whether the cooldown is ready.
    /// Does not re-arm.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }

    pub fn rearm(&mut self, rng: &mut impl Rng) {
        self.remaining = self.spec.roll(rng);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    /// Difficulty level the stats were frozen at.
    pub spawn_level: u32,
    pub body: Body,
    pub health: Health,
    pub damage: f32,
    pub speed: f32,
    pub sight_range: f32,
    pub reward: Reward,
    pub state: AiState,
    pub wander_target: Vec2,
    /// Seconds until the wander target is re-picked.
    pub wander_timer: f32,
    pub contact: Cooldown,
    /// The kind's main special attack, if any.
    pub special: Option<Cooldown>,
    /// A second independent attack (boss cone volley, mini-boss-a tracking volley).
    pub secondary: Option<Cooldown>,
    /// New-boss alternation: `true` means the next phase is the shockwave.
    pub shockwave_next: bool,
    /// Seconds of dash speed boost left.
    pub boost: f32,
    /// Seconds of movement stun left.
    pub stun: f32,
    /// Live minions this enemy summoned.
    pub minions: Vec<EntityId>,
    pub summoned_by: Option<EntityId>,
}

impl Enemy {
    /// A new enemy of `kind` centered at `center`, with stats frozen at `level` and every
    /// cooldown independently jittered.
    pub fn spawn(id: EntityId, kind: EnemyKind, level: u32, center: Vec2, rng: &mut impl Rng) -> Self {
        let stats = scaled_stats(kind, level);
        let (special, secondary) = behaviors::cooldown_profile(kind);
        Self {
            id,
            kind,
            spawn_level: level,
            body: Body::centered_at(center, Vec2::splat(stats.size)),
            health: Health::new(stats.hp),
            damage: stats.damage,
            speed: stats.speed,
            sight_range: kind.sight_range(),
            reward: stats.reward,
            state: AiState::Wandering,
            wander_target: center,
            wander_timer: 0.0,
            contact: Cooldown::armed(behaviors::CONTACT_COOLDOWN, rng),
            special: special.map(|spec| Cooldown::armed(spec, rng)),
            secondary: secondary.map(|spec| Cooldown::armed(spec, rng)),
            shockwave_next: true,
            boost: 0.0,
            stun: 0.0,
            minions: Vec::new(),
            summoned_by: None,
        }
    }

    /// Applies damage. Returns `true` only on the hit that kills: the enemy deactivates
    /// exactly once, and later hits are ignored.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.body.active {
            return false;
        }
        self.health.damage(amount);
        if self.health.is_depleted() {
            self.body.active = false;
            return true;
        }
        false
    }

    #[must_use]
    pub fn wander_speed(&self) -> f32 {
        self.speed * WANDER_SPEED_FACTOR
    }
}
