//! Short-lived visual effects emitted by combat (damage numbers, misses, blasts).
//!
//! Effects carry no gameplay weight. The simulation ages them each tick and the renderer
//! draws whatever is still alive.

use bevy::math::Vec2;

// === Constants ===

pub const DAMAGE_NUMBER_SECS: f32 = 0.8;
pub const MISS_SECS: f32 = 0.8;
pub const SHOCKWAVE_SECS: f32 = 0.5;
pub const EXPLOSION_SECS: f32 = 0.4;
pub const LEVEL_UP_SECS: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    DamageNumber { amount: f32, on_player: bool },
    Miss,
    Shockwave { radius: f32 },
    Explosion { radius: f32 },
    LevelUp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vec2,
    pub remaining: f32,
    pub duration: f32,
}

impl Effect {
    /// Fraction of lifetime left, 1.0 when fresh.
    #[must_use]
    pub fn fade(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Effects {
    items: Vec<Effect>,
}

impl Effects {
    pub fn push(&mut self, kind: EffectKind, position: Vec2) {
        let duration = match kind {
            EffectKind::DamageNumber { .. } => DAMAGE_NUMBER_SECS,
            EffectKind::Miss => MISS_SECS,
            EffectKind::Shockwave { .. } => SHOCKWAVE_SECS,
            EffectKind::Explosion { .. } => EXPLOSION_SECS,
            EffectKind::LevelUp => LEVEL_UP_SECS,
        };
        // Effects are cosmetic; a bad position is dropped rather than drawn.
        if !position.is_finite() {
            return;
        }
        self.items.push(Effect {
            kind,
            position,
            remaining: duration,
            duration,
        });
    }

    /// Ages every effect and drops the expired ones.
    pub fn update(&mut self, dt: f32) {
        for effect in &mut self.items {
            effect.remaining -= dt;
        }
        self.items.retain(|effect| effect.remaining > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
