//! Automatic skills: two area bursts and two piercing lines, each on its own cooldown.
//!
//! A skill with level > 0 fires by itself whenever its cooldown has run out. Firing
//! re-arms the cooldown from the stats at the current level, so an upgrade bought
//! mid-cooldown only changes the next interval.

// === Constants ===

/// Number of skill slots.
pub const SKILL_COUNT: usize = 4;

/// Highest level a skill can reach.
pub const MAX_SKILL_LEVEL: u32 = 5;

/// Seconds enemies stay rooted after a Quake.
pub const QUAKE_STUN_SECS: f32 = 0.5;

// === Types ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillKind {
    Nova,
    Quake,
    EnergyBolt,
    EnergyBeam,
}

/// Area skills hit everything around the player; linear skills fire a piercing projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillShape {
    Area,
    Linear,
}

/// Level-scaling parameters for one skill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillSpec {
    pub base_damage: f32,
    pub damage_per_level: f32,
    pub base_cooldown: f32,
    pub cooldown_multiplier: f32,
    /// Radius for area skills, range for linear skills.
    pub base_reach: f32,
    pub reach_per_level: f32,
}

#[allow(clippy::cast_precision_loss)]
fn steps(level: u32) -> f32 {
    level.saturating_sub(1) as f32
}

impl SkillSpec {
    /// `base + (level - 1) * per_level`. Unlearned skills deal nothing.
    #[must_use]
    pub fn damage(&self, level: u32) -> f32 {
        if level == 0 {
            return 0.0;
        }
        self.damage_per_level.mul_add(steps(level), self.base_damage)
    }

    /// `base * multiplier^(level - 1)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn cooldown(&self, level: u32) -> f32 {
        self.base_cooldown * self.cooldown_multiplier.powi(steps(level) as i32)
    }

    /// `base + (level - 1) * per_level`.
    #[must_use]
    pub fn reach(&self, level: u32) -> f32 {
        self.reach_per_level.mul_add(steps(level), self.base_reach)
    }
}

impl SkillKind {
    pub const ALL: [Self; SKILL_COUNT] = [Self::Nova, Self::Quake, Self::EnergyBolt, Self::EnergyBeam];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Nova => "Nova",
            Self::Quake => "Quake",
            Self::EnergyBolt => "Energy Bolt",
            Self::EnergyBeam => "Energy Beam",
        }
    }

    #[must_use]
    pub const fn shape(self) -> SkillShape {
        match self {
            Self::Nova | Self::Quake => SkillShape::Area,
            Self::EnergyBolt | Self::EnergyBeam => SkillShape::Linear,
        }
    }

    #[must_use]
    pub const fn spec(self) -> SkillSpec {
        match self {
            Self::Nova => SkillSpec {
                base_damage: 25.0,
                damage_per_level: 15.0,
                base_cooldown: 4.0,
                cooldown_multiplier: 0.9,
                base_reach: 140.0,
                reach_per_level: 20.0,
            },
            Self::Quake => SkillSpec {
                base_damage: 40.0,
                damage_per_level: 25.0,
                base_cooldown: 7.0,
                cooldown_multiplier: 0.88,
                base_reach: 220.0,
                reach_per_level: 25.0,
            },
            Self::EnergyBolt => SkillSpec {
                base_damage: 30.0,
                damage_per_level: 18.0,
                base_cooldown: 2.5,
                cooldown_multiplier: 0.9,
                base_reach: 420.0,
                reach_per_level: 40.0,
            },
            Self::EnergyBeam => SkillSpec {
                base_damage: 30.0,
                damage_per_level: 120.0,
                base_cooldown: 9.0,
                cooldown_multiplier: 0.85,
                base_reach: 600.0,
                reach_per_level: 60.0,
            },
        }
    }
}

/// Gem price of raising a skill from `current_level`.
#[must_use]
pub const fn upgrade_cost(current_level: u32) -> u32 {
    current_level + 1
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillSlot {
    pub kind: SkillKind,
    pub level: u32,
    /// Seconds until the skill may fire again.
    pub cooldown: f32,
}

impl SkillSlot {
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.kind.spec().damage(self.level)
    }

    #[must_use]
    pub fn reach(&self) -> f32 {
        self.kind.spec().reach(self.level)
    }

    /// Counts down and reports whether the skill fires this tick. Firing re-arms the
    /// cooldown from the current level's stats.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.level == 0 {
            return false;
        }
        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return false;
        }
        self.cooldown = self.kind.spec().cooldown(self.level);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillUpgradeBlocked {
    Maxed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillSlots {
    slots: [SkillSlot; SKILL_COUNT],
}

impl Default for SkillSlots {
    fn default() -> Self {
        Self {
            slots: SkillKind::ALL.map(|kind| SkillSlot {
                kind,
                level: 0,
                cooldown: 0.0,
            }),
        }
    }
}

impl SkillSlots {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SkillSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillSlot> {
        self.slots.iter()
    }

    /// Ticks every slot and returns the skills that fire this tick, with their level.
    pub fn tick(&mut self, dt: f32) -> Vec<(SkillKind, u32)> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.tick(dt).then_some((slot.kind, slot.level)))
            .collect()
    }

    /// Raises the slot at `index`, returning the new level. `None` for an unknown slot.
    pub fn upgrade(&mut self, index: usize) -> Option<Result<u32, SkillUpgradeBlocked>> {
        let slot = self.slots.get_mut(index)?;
        if slot.level >= MAX_SKILL_LEVEL {
            return Some(Err(SkillUpgradeBlocked::Maxed));
        }
        slot.level += 1;
        Some(Ok(slot.level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn damage_formula_matches_level_three_example() {
        let spec = SkillSpec {
            base_damage: 30.0,
            damage_per_level: 120.0,
            base_cooldown: 1.0,
            cooldown_multiplier: 1.0,
            base_reach: 0.0,
            reach_per_level: 0.0,
        };
        assert_eq!(spec.damage(3), 270.0);
        assert_eq!(SkillKind::EnergyBeam.spec().damage(3), 270.0);
    }

    #[test]
    fn cooldown_shrinks_geometrically() {
        let spec = SkillKind::Nova.spec();
        assert_eq!(spec.cooldown(1), 4.0);
        assert!((spec.cooldown(3) - 4.0 * 0.81).abs() < 1e-5);
    }

    #[test]
    fn reach_grows_linearly() {
        let spec = SkillKind::Quake.spec();
        assert_eq!(spec.reach(1), 220.0);
        assert_eq!(spec.reach(4), 295.0);
    }

    #[test]
    fn unlearned_skill_never_fires() {
        let mut slots = SkillSlots::default();
        assert!(slots.tick(100.0).is_empty());
    }

    #[test]
    fn learned_skill_fires_then_waits_its_cooldown() {
        let mut slots = SkillSlots::default();
        assert_eq!(slots.upgrade(0), Some(Ok(1)));
        assert_eq!(slots.tick(0.016), vec![(SkillKind::Nova, 1)]);
        assert!(slots.tick(1.0).is_empty());
        assert!(slots.tick(3.0).len() == 1);
    }

    #[test]
    fn upgrade_mid_cooldown_changes_next_interval_only() {
        let mut slots = SkillSlots::default();
        slots.upgrade(0);
        slots.tick(0.0);
        let armed = slots.get(0).unwrap().cooldown;
        assert_eq!(armed, 4.0);

        slots.upgrade(0);
        assert_eq!(slots.get(0).unwrap().cooldown, armed);

        slots.tick(4.0);
        assert!((slots.get(0).unwrap().cooldown - 3.6).abs() < 1e-5);
    }

    #[test]
    fn upgrade_stops_at_max_and_rejects_unknown_slot() {
        let mut slots = SkillSlots::default();
        for _ in 0..MAX_SKILL_LEVEL {
            assert!(matches!(slots.upgrade(2), Some(Ok(_))));
        }
        assert_eq!(slots.upgrade(2), Some(Err(SkillUpgradeBlocked::Maxed)));
        assert_eq!(slots.upgrade(SKILL_COUNT), None);
    }
}
