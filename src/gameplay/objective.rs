//! The end-game trophy: dropped by the ancient boss, carried home to win.

use bevy::log::info;
use bevy::math::Vec2;

use super::body::Body;
use super::geometry::aabb_overlap;
use super::sim::SimulationContext;

pub const TROPHY_SIZE: Vec2 = Vec2::new(24.0, 24.0);

/// The trophy while it lies on the ground. Carried trophies live on the player as a flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Trophy {
    pub body: Body,
}

/// Places the trophy on the ground at `center`.
pub fn drop_trophy(ctx: &mut SimulationContext, center: Vec2) {
    ctx.trophy = Some(Trophy {
        body: Body::centered_at(center, TROPHY_SIZE),
    });
    ctx.messages.set_message("The trophy has dropped!", 3.0);
    info!("trophy dropped at {center}");
}

/// Picks the trophy up when the living player overlaps it. Returns `true` on pickup.
pub fn try_pickup(ctx: &mut SimulationContext) -> bool {
    if !ctx.player.is_alive() {
        return false;
    }
    let Some(trophy) = ctx.trophy.as_ref() else {
        return false;
    };
    if !aabb_overlap(trophy.body.rect(), ctx.player.body.rect()) {
        return false;
    }
    ctx.trophy = None;
    ctx.player.carrying_trophy = true;
    ctx.messages
        .set_message("You have the trophy! Bring it to the safe zone.", 4.0);
    info!("trophy picked up");
    true
}

/// Victory condition: carrying the trophy inside the safe zone.
#[must_use]
pub fn delivered(ctx: &SimulationContext) -> bool {
    ctx.player.carrying_trophy && ctx.config.in_safe_zone(ctx.player.body.center())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_context;

    #[test]
    fn pickup_needs_overlap() {
        let mut ctx = test_context();
        ctx.player.body.set_center(Vec2::new(600.0, 600.0));
        drop_trophy(&mut ctx, Vec2::new(700.0, 600.0));
        assert!(!try_pickup(&mut ctx));

        ctx.player.body.set_center(Vec2::new(690.0, 600.0));
        assert!(try_pickup(&mut ctx));
        assert!(ctx.trophy.is_none());
        assert!(ctx.player.carrying_trophy);
    }

    #[test]
    fn delivery_requires_safe_zone() {
        let mut ctx = test_context();
        ctx.player.carrying_trophy = true;
        ctx.player.body.set_center(Vec2::new(600.0, 600.0));
        assert!(!delivered(&ctx));
        ctx.player.body.set_center(ctx.config.safe_zone.center());
        assert!(delivered(&ctx));
    }
}
