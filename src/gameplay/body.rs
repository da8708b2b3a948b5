//! The base record every simulated object carries: identity, footprint, liveness, and health.

use bevy::math::{Rect, Vec2};

/// Stable identifier for a simulated object. Never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Hands out fresh [`EntityId`]s.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub const fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Position (top-left corner), size, and the soft-delete flag.
///
/// `active == false` marks the body for removal in the end-of-tick cleanup pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl Body {
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            active: true,
        }
    }

    /// Builds a body whose center sits at `center`.
    #[must_use]
    pub fn centered_at(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.position = center - self.size * 0.5;
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.position, self.position + self.size)
    }
}

/// Hit points with `0 <= current <= max` maintained by every mutator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtracts `amount` (negative amounts are ignored) and clamps at zero.
    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    /// Raises the maximum and heals by the same amount.
    pub fn raise_max(&mut self, amount: f32) {
        self.max += amount;
        self.heal(amount);
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}
