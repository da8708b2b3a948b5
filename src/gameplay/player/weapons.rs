//! Weapon tiers: melee, bow, and gun, unlocked in sequence.

use crate::gameplay::projectile::ProjectileKind;

// === Constants ===

/// Highest level any weapon tier can reach.
pub const MAX_WEAPON_LEVEL: u32 = 5;

/// Bow level from which each shot looses several arrows.
pub const BOW_MULTISHOT_LEVEL: u32 = 3;

// === Types ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponTier {
    Melee,
    Bow,
    Gun,
}

impl WeaponTier {
    pub const ALL: &[Self] = &[Self::Melee, Self::Bow, Self::Gun];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Melee => "Sword",
            Self::Bow => "Bow",
            Self::Gun => "Gun",
        }
    }

    /// The tier that must be maxed before this one can be unlocked.
    #[must_use]
    pub const fn prerequisite(self) -> Option<Self> {
        match self {
            Self::Melee => None,
            Self::Bow => Some(Self::Melee),
            Self::Gun => Some(Self::Bow),
        }
    }
}

/// How a weapon delivers its damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Damage lands immediately on the chosen target.
    Instant,
    /// Fires homing projectiles at the chosen targets.
    Projectile(ProjectileKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub damage: f32,
    pub range: f32,
    pub cooldown: f32,
    /// Targets engaged per attack. Above one, targets come from a k-nearest query.
    pub shots: usize,
    pub delivery: Delivery,
}

/// Why an upgrade could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeBlocked {
    Locked { requires: WeaponTier },
    Maxed,
}

/// Current level per tier. Melee starts at level 1 and is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponLevels {
    pub melee: u32,
    pub bow: u32,
    pub gun: u32,
}

impl Default for WeaponLevels {
    fn default() -> Self {
        Self {
            melee: 1,
            bow: 0,
            gun: 0,
        }
    }
}

impl WeaponLevels {
    #[must_use]
    pub const fn level(&self, tier: WeaponTier) -> u32 {
        match tier {
            WeaponTier::Melee => self.melee,
            WeaponTier::Bow => self.bow,
            WeaponTier::Gun => self.gun,
        }
    }

    const fn level_mut(&mut self, tier: WeaponTier) -> &mut u32 {
        match tier {
            WeaponTier::Melee => &mut self.melee,
            WeaponTier::Bow => &mut self.bow,
            WeaponTier::Gun => &mut self.gun,
        }
    }

    /// The weapon used when attacking: gun > bow > melee, first one with a level.
    #[must_use]
    pub const fn active_tier(&self) -> WeaponTier {
        if self.gun > 0 {
            WeaponTier::Gun
        } else if self.bow > 0 {
            WeaponTier::Bow
        } else {
            WeaponTier::Melee
        }
    }

    /// The tier the next weapon purchase applies to, or `None` when everything is maxed.
    #[must_use]
    pub fn next_upgrade(&self) -> Option<WeaponTier> {
        WeaponTier::ALL
            .iter()
            .copied()
            .find(|&tier| self.level(tier) < MAX_WEAPON_LEVEL)
    }

    /// Checks the tier-gating rule without changing anything.
    pub fn check_upgrade(&self, tier: WeaponTier) -> Result<(), UpgradeBlocked> {
        if let Some(requires) = tier.prerequisite() {
            if self.level(requires) < MAX_WEAPON_LEVEL {
                return Err(UpgradeBlocked::Locked { requires });
            }
        }
        if self.level(tier) >= MAX_WEAPON_LEVEL {
            return Err(UpgradeBlocked::Maxed);
        }
        Ok(())
    }

    /// Raises `tier` by one level, returning the new level.
    pub fn upgrade(&mut self, tier: WeaponTier) -> Result<u32, UpgradeBlocked> {
        self.check_upgrade(tier)?;
        let level = self.level_mut(tier);
        *level += 1;
        Ok(*level)
    }
}

// === Stat Tables ===

/// Stats for `tier` at `level` (level 0 is treated as level 1).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weapon_stats(tier: WeaponTier, level: u32) -> WeaponStats {
    let steps = level.max(1) - 1;
    let l = steps as f32;
    match tier {
        WeaponTier::Melee => WeaponStats {
            damage: 6.0f32.mul_add(l, 12.0),
            range: 70.0,
            cooldown: 0.45,
            shots: 1,
            delivery: Delivery::Instant,
        },
        WeaponTier::Bow => WeaponStats {
            damage: 7.0f32.mul_add(l, 16.0),
            range: 380.0,
            cooldown: 0.75,
            shots: if level >= BOW_MULTISHOT_LEVEL {
                steps as usize
            } else {
                1
            },
            delivery: Delivery::Projectile(ProjectileKind::Arrow),
        },
        WeaponTier::Gun => WeaponStats {
            damage: 9.0f32.mul_add(l, 22.0),
            range: 460.0,
            cooldown: 0.35,
            shots: 2 + steps as usize / 2,
            delivery: Delivery::Projectile(ProjectileKind::Bullet),
        },
    }
}

/// Gold price of raising `tier` from `current_level` to the next level.
#[must_use]
pub const fn upgrade_cost(tier: WeaponTier, current_level: u32) -> u32 {
    match tier {
        WeaponTier::Melee => 25 * current_level,
        WeaponTier::Bow => 40 * (current_level + 1),
        WeaponTier::Gun => 70 * (current_level + 1),
    }
}
