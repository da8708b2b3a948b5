//! The player character: resources, progression, movement, dash, and dodge.

pub mod attack;
pub mod skills;
pub mod weapons;

use bevy::math::Vec2;

use self::skills::SkillSlots;
use self::weapons::WeaponLevels;
use super::body::{Body, EntityId, Health};
use super::geometry::clamp_to_world;

// === Constants ===

/// Id used when reporting player faults. The allocator never reaches it.
pub const PLAYER_ID: EntityId = EntityId(u32::MAX);

pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 32.0);
pub const PLAYER_MAX_HP: f32 = 100.0;

/// Walking speed (pixels per second).
pub const PLAYER_SPEED: f32 = 220.0;

pub const DASH_COOLDOWN: f32 = 1.2;
pub const DASH_DURATION: f32 = 0.18;
pub const DASH_SPEED_MULTIPLIER: f32 = 3.2;
pub const DASH_INVINCIBILITY: f32 = 0.35;

/// Dodge chance by upgrade level. Levels past the table keep climbing by `DODGE_STEP`.
pub const DODGE_TABLE: [f32; 7] = [0.0, 0.05, 0.10, 0.15, 0.20, 0.25, 0.30];
pub const DODGE_STEP: f32 = 0.05;

/// Hard ceiling on dodge chance.
pub const MAX_DODGE_CHANCE: f32 = 0.9;

/// Max HP gained per player level.
pub const HP_PER_LEVEL: f32 = 10.0;

/// Gold price of the next dodge upgrade.
#[must_use]
pub const fn dodge_upgrade_cost(current_level: u32) -> u32 {
    60 * (current_level + 1)
}

/// Dodge chance at `level`, always within `[0, MAX_DODGE_CHANCE]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn dodge_chance_for_level(level: u32) -> f32 {
    let last = DODGE_TABLE.len() - 1;
    let chance = DODGE_TABLE.get(level as usize).copied().unwrap_or_else(|| {
        let beyond = level as usize - last;
        DODGE_STEP.mul_add(beyond as f32, DODGE_TABLE[last])
    });
    chance.clamp(0.0, MAX_DODGE_CHANCE)
}

/// Experience needed to advance from `level` to the next.
#[must_use]
pub const fn xp_to_next(level: u32) -> u32 {
    100 * level
}

/// Currency and experience handed out for a kill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reward {
    pub gold: u32,
    pub xp: u32,
    pub gems: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashState {
    pub is_dashing: bool,
    /// Seconds left in the current dash burst.
    pub timer: f32,
    /// Seconds until another dash is allowed.
    pub cooldown: f32,
    pub direction: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    pub health: Health,
    pub wood: u32,
    pub gold: u32,
    pub gems: u32,
    pub xp: u32,
    pub level: u32,
    pub weapons: WeaponLevels,
    pub attack_cooldown: f32,
    pub skills: SkillSlots,
    pub dodge_level: u32,
    pub dash: DashState,
    /// Seconds of damage immunity left (granted by dashing).
    pub invincibility: f32,
    /// Last non-zero movement direction.
    pub facing: Vec2,
    /// Carrying the end-game trophy.
    pub carrying_trophy: bool,
}

impl Player {
    #[must_use]
    pub fn new(center: Vec2) -> Self {
        Self {
            body: Body::centered_at(center, PLAYER_SIZE),
            health: Health::new(PLAYER_MAX_HP),
            wood: 0,
            gold: 0,
            gems: 0,
            xp: 0,
            level: 1,
            weapons: WeaponLevels::default(),
            attack_cooldown: 0.0,
            skills: SkillSlots::default(),
            dodge_level: 0,
            dash: DashState::default(),
            invincibility: 0.0,
            facing: Vec2::X,
            carrying_trophy: false,
        }
    }

    #[must_use]
    pub fn dodge_chance(&self) -> f32 {
        dodge_chance_for_level(self.dodge_level)
    }

    #[must_use]
    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Counts down attack, dash, and invincibility timers.
    pub fn tick_timers(&mut self, dt: f32) {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.invincibility = (self.invincibility - dt).max(0.0);
        self.dash.cooldown = (self.dash.cooldown - dt).max(0.0);
    }

    /// Starts a dash if it is off cooldown. Dashes along `input` when moving, else along
    /// the facing direction.
    pub fn try_dash(&mut self, input: Vec2) -> bool {
        if self.dash.cooldown > 0.0 || self.dash.is_dashing {
            return false;
        }
        self.dash = DashState {
            is_dashing: true,
            timer: DASH_DURATION,
            cooldown: DASH_COOLDOWN,
            direction: input.try_normalize().unwrap_or(self.facing),
        };
        self.invincibility = self.invincibility.max(DASH_INVINCIBILITY);
        true
    }

    /// Moves by one tick of walking or dashing, then clamps to the world.
    pub fn step_movement(&mut self, input: Vec2, dt: f32, world: Vec2) {
        let walk = input.normalize_or_zero();
        if walk != Vec2::ZERO {
            self.facing = walk;
        }

        let velocity = if self.dash.is_dashing {
            self.dash.timer -= dt;
            if self.dash.timer <= 0.0 {
                self.dash.is_dashing = false;
                self.dash.timer = 0.0;
            }
            self.dash.direction * PLAYER_SPEED * DASH_SPEED_MULTIPLIER
        } else {
            walk * PLAYER_SPEED
        };

        self.body.position = clamp_to_world(self.body.position + velocity * dt, self.body.size, world);
    }

    /// Adds experience and applies any level-ups. Returns the number of levels gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= xp_to_next(self.level) {
            self.xp -= xp_to_next(self.level);
            self.level += 1;
            self.health.raise_max(HP_PER_LEVEL);
            gained += 1;
        }
        gained
    }

    /// Credits a kill reward. Returns the number of player levels gained.
    pub fn credit(&mut self, reward: Reward) -> u32 {
        self.gold += reward.gold;
        self.gems += reward.gems;
        self.gain_xp(reward.xp)
    }
}
