//! Trees: the wood source. Chopped-down trees come back through the respawn queue.

use bevy::math::Vec2;

use super::body::{Body, EntityId};

// === Constants ===

pub const TREE_SIZE: Vec2 = Vec2::new(40.0, 40.0);

/// Chops needed to fell a tree.
pub const TREE_CHOPS: u32 = 3;

/// Wood granted when a tree falls.
pub const TREE_WOOD: u32 = 6;

/// The player must be this close (center to center) to chop.
pub const CHOP_REACH: f32 = 60.0;

/// Seconds until a felled tree grows back somewhere.
pub const TREE_RESPAWN_SECS: f32 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub id: EntityId,
    pub body: Body,
    pub chops_left: u32,
}

impl Tree {
    #[must_use]
    pub fn new(id: EntityId, center: Vec2) -> Self {
        Self {
            id,
            body: Body::centered_at(center, TREE_SIZE),
            chops_left: TREE_CHOPS,
        }
    }

    /// One chop. Returns the wood yield when this chop fells the tree.
    pub fn chop(&mut self) -> Option<u32> {
        if !self.body.active {
            return None;
        }
        self.chops_left = self.chops_left.saturating_sub(1);
        if self.chops_left > 0 {
            return None;
        }
        self.body.active = false;
        Some(TREE_WOOD)
    }
}

/// Pending respawn times, kept sorted ascending so the earliest is always first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RespawnQueue {
    due: Vec<f32>,
}

impl RespawnQueue {
    pub fn schedule(&mut self, due: f32) {
        let index = self.due.partition_point(|&t| t <= due);
        self.due.insert(index, due);
    }

    /// Removes and counts every entry due at or before `now`.
    pub fn pop_due(&mut self, now: f32) -> usize {
        let ready = self.due.partition_point(|&t| t <= now);
        self.due.drain(..ready);
        ready
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.due.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }
}
