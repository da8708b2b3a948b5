//! Read-only world configuration and the tick-timing constants.

use bevy::math::{Rect, Vec2};

// === Constants ===

/// World width (pixels).
pub const WORLD_WIDTH: f32 = 3200.0;

/// World height (pixels).
pub const WORLD_HEIGHT: f32 = 2400.0;

/// Size of one grid tile (pixels). Structures snap to this grid.
pub const TILE_SIZE: f32 = 40.0;

/// Safe-zone corners (pixels).
pub const SAFE_ZONE_MIN: Vec2 = Vec2::new(1400.0, 1000.0);
pub const SAFE_ZONE_MAX: Vec2 = Vec2::new(1800.0, 1400.0);

/// Largest delta (seconds) a single tick will simulate. Longer frame hitches are truncated.
pub const MAX_TICK_SECS: f32 = 0.1;

/// Default RNG seed for a fresh run.
pub const DEFAULT_SEED: u64 = 0x5AFE_2017;

/// Clamps a raw frame delta to `[0, MAX_TICK_SECS]`. NaN and negative deltas become zero.
#[must_use]
pub fn clamp_delta(delta_secs: f32) -> f32 {
    if delta_secs.is_nan() {
        return 0.0;
    }
    delta_secs.clamp(0.0, MAX_TICK_SECS)
}

/// World layout for one run. Never mutated once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub world_size: Vec2,
    pub tile_size: f32,
    pub safe_zone: Rect,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_size: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            tile_size: TILE_SIZE,
            safe_zone: Rect::from_corners(SAFE_ZONE_MIN, SAFE_ZONE_MAX),
            seed: DEFAULT_SEED,
        }
    }
}

impl SimConfig {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn world_rect(&self) -> Rect {
        Rect::from_corners(Vec2::ZERO, self.world_size)
    }

    /// Where the player spawns: the middle of the safe zone.
    #[must_use]
    pub fn player_start(&self) -> Vec2 {
        self.safe_zone.center()
    }

    /// True when `point` lies inside the safe zone (edges included).
    #[must_use]
    pub fn in_safe_zone(&self, point: Vec2) -> bool {
        self.safe_zone.contains(point)
    }

    /// Snaps a world point to the center of the tile containing it.
    #[must_use]
    pub fn snap_to_tile(&self, point: Vec2) -> Vec2 {
        (point / self.tile_size).floor() * self.tile_size + Vec2::splat(self.tile_size * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[allow(clippy::assertions_on_constants)]
    #[test]
    fn constants_are_valid() {
        assert!(WORLD_WIDTH > SAFE_ZONE_MAX.x);
        assert!(WORLD_HEIGHT > SAFE_ZONE_MAX.y);
        assert!(SAFE_ZONE_MIN.x < SAFE_ZONE_MAX.x);
        assert!(MAX_TICK_SECS > 0.0);
    }

    #[test]
    fn clamp_delta_absorbs_hitches_and_garbage() {
        assert_eq!(clamp_delta(0.016), 0.016);
        assert_eq!(clamp_delta(2.5), MAX_TICK_SECS);
        assert_eq!(clamp_delta(-1.0), 0.0);
        assert_eq!(clamp_delta(f32::NAN), 0.0);
    }

    #[test]
    fn safe_zone_contains_its_center() {
        let config = SimConfig::default();
        assert!(config.in_safe_zone(config.safe_zone.center()));
        assert!(!config.in_safe_zone(Vec2::ZERO));
    }

    #[test]
    fn snap_to_tile_centers_point() {
        let config = SimConfig::default();
        assert_eq!(config.snap_to_tile(Vec2::new(41.0, 79.0)), Vec2::new(60.0, 60.0));
    }
}
