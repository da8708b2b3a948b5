//! Distance, overlap, and target-acquisition helpers shared by every simulation module.

use bevy::math::{Rect, Vec2};

/// Distance between the centers of two rectangles.
#[must_use]
pub fn center_distance(a: Rect, b: Rect) -> f32 {
    a.center().distance(b.center())
}

/// Strict axis-aligned overlap. Rectangles that only touch along an edge do not overlap.
#[must_use]
pub fn aabb_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Overlap test with `a` grown by `tolerance` on every side.
#[must_use]
pub fn aabb_overlap_with_tolerance(a: Rect, b: Rect, tolerance: f32) -> bool {
    aabb_overlap(a.inflate(tolerance), b)
}

/// True when a circle intersects a rectangle (closest-point test).
#[must_use]
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: Rect) -> bool {
    let closest = center.clamp(rect.min, rect.max);
    closest.distance_squared(center) < radius * radius
}

/// Radius of the circle that encloses a body of `size` (half its diagonal).
#[must_use]
pub fn bounding_radius(size: Vec2) -> f32 {
    size.length() * 0.5
}

/// Clamps a top-left position so a body of `size` stays inside `[0, world]`.
#[must_use]
pub fn clamp_to_world(position: Vec2, size: Vec2, world: Vec2) -> Vec2 {
    position.clamp(Vec2::ZERO, (world - size).max(Vec2::ZERO))
}

/// True when the point lies inside the world rectangle `[0, world]`.
#[must_use]
pub fn in_world(point: Vec2, world: Vec2) -> bool {
    point.x >= 0.0 && point.y >= 0.0 && point.x <= world.x && point.y <= world.y
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide.
#[must_use]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// True when both components are finite.
#[must_use]
pub fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Nearest candidate whose position lies within `range` of `origin`.
///
/// Ties keep the first candidate seen, so iteration order decides equal distances.
pub fn nearest_in_range<T>(
    origin: Vec2,
    range: f32,
    candidates: impl IntoIterator<Item = (T, Vec2)>,
) -> Option<T> {
    let range_sq = range * range;
    let mut nearest: Option<(T, f32)> = None;
    for (candidate, position) in candidates {
        let dist_sq = origin.distance_squared(position);
        if dist_sq > range_sq {
            continue;
        }
        if nearest.as_ref().is_none_or(|(_, d)| dist_sq < *d) {
            nearest = Some((candidate, dist_sq));
        }
    }
    nearest.map(|(candidate, _)| candidate)
}

/// Up to `k` candidates within `range` of `origin`, closest first.
pub fn k_nearest_in_range<T>(
    origin: Vec2,
    range: f32,
    k: usize,
    candidates: impl IntoIterator<Item = (T, Vec2)>,
) -> Vec<T> {
    if k == 0 {
        return Vec::new();
    }
    let range_sq = range * range;
    let mut in_range: Vec<(T, f32)> = candidates
        .into_iter()
        .map(|(candidate, position)| (candidate, origin.distance_squared(position)))
        .filter(|(_, dist_sq)| *dist_sq <= range_sq)
        .collect();
    in_range.sort_by(|a, b| a.1.total_cmp(&b.1));
    in_range.truncate(k);
    in_range.into_iter().map(|(candidate, _)| candidate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_corners(Vec2::new(x, y), Vec2::new(x + w, y + h))
    }

    #[test]
    fn center_distance_between_offset_squares() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(30.0, 40.0, 10.0, 10.0);
        assert!((center_distance(a, b) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 10.0, 10.0);
        assert!(!aabb_overlap(a, b));
        assert!(aabb_overlap_with_tolerance(a, b, 1.0));
    }

    #[test]
    fn circle_rect_overlap_uses_closest_point() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(circle_overlaps_rect(Vec2::new(12.0, 5.0), 3.0, r));
        assert!(!circle_overlaps_rect(Vec2::new(14.0, 14.0), 3.0, r));
    }

    #[test]
    fn clamp_keeps_body_inside_world() {
        let clamped = clamp_to_world(Vec2::new(-5.0, 990.0), Vec2::splat(20.0), Vec2::splat(1000.0));
        assert_eq!(clamped, Vec2::new(0.0, 980.0));
    }

    #[test]
    fn nearest_respects_range() {
        let candidates = [(1, Vec2::new(50.0, 0.0)), (2, Vec2::new(20.0, 0.0))];
        assert_eq!(nearest_in_range(Vec2::ZERO, 30.0, candidates), Some(2));
        assert_eq!(nearest_in_range(Vec2::ZERO, 10.0, candidates), None);
    }

    #[test]
    fn k_nearest_returns_closest_first() {
        let candidates = [
            (1, Vec2::new(90.0, 0.0)),
            (2, Vec2::new(10.0, 0.0)),
            (3, Vec2::new(40.0, 0.0)),
            (4, Vec2::new(500.0, 0.0)),
        ];
        assert_eq!(k_nearest_in_range(Vec2::ZERO, 100.0, 2, candidates), vec![2, 3]);
        assert_eq!(k_nearest_in_range(Vec2::ZERO, 100.0, 10, candidates), vec![2, 3, 1]);
        assert!(k_nearest_in_range(Vec2::ZERO, 100.0, 0, candidates).is_empty());
    }

    #[test]
    fn direction_to_same_point_is_none() {
        assert_eq!(direction_to(Vec2::ONE, Vec2::ONE), None);
        assert_eq!(direction_to(Vec2::ZERO, Vec2::new(0.0, 5.0)), Some(Vec2::Y));
    }
}
