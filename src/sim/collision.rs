//! Collision detection for circular entities
//!
//! Every gameplay test in the arcade reduces to "are two centers closer than
//! some reach": asteroid vs ship, core vs hand cursor.

use glam::Vec2;

/// True if two circles overlap (strictly closer than the sum of radii).
///
/// Euclidean distance, symmetric in its two circles.
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// True if `point` lies strictly within `reach` of `center`.
#[inline]
pub fn within_reach(center: Vec2, reach: f32, point: Vec2) -> bool {
    center.distance(point) < reach
}

/// True if `x` lies within half of `width` of `center_x`.
#[inline]
pub fn within_half_width(center_x: f32, width: f32, x: f32) -> bool {
    (x - center_x).abs() <= width / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_boundary_is_exclusive() {
        // Centers exactly r + 14 apart do not collide
        let ship = Vec2::new(80.0, 160.0);
        let rock = Vec2::new(80.0 + 34.0, 160.0);
        assert!(!circles_overlap(rock, 20.0, ship, 14.0));
        assert!(circles_overlap(rock - Vec2::X * 0.01, 20.0, ship, 14.0));
    }

    #[test]
    fn test_within_reach() {
        let core = Vec2::new(310.0, 150.0);
        assert!(within_reach(core, 42.0, Vec2::new(310.0, 150.0)));
        assert!(within_reach(core, 42.0, Vec2::new(340.0, 170.0)));
        assert!(!within_reach(core, 42.0, Vec2::new(360.0, 150.0)));
    }

    #[test]
    fn test_within_half_width() {
        assert!(within_half_width(130.0, 200.0, 220.0));
        assert!(!within_half_width(310.0, 200.0, 130.0));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -700.0f32..700.0, ay in -300.0f32..300.0,
            bx in -700.0f32..700.0, by in -300.0f32..300.0,
            ra in 0.0f32..60.0, rb in 0.0f32..60.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_overlap(a, ra, b, rb), circles_overlap(b, rb, a, ra));
        }

        #[test]
        fn overlap_matches_euclidean_formula(
            ox in -100.0f32..800.0, oy in -100.0f32..400.0,
            py in 0.0f32..300.0, r in 18.0f32..38.0,
        ) {
            let expected = ((ox - 80.0).powi(2) + (oy - py).powi(2)).sqrt() < r + 14.0;
            prop_assert_eq!(
                circles_overlap(Vec2::new(ox, oy), r, Vec2::new(80.0, py), 14.0),
                expected
            );
        }
    }
}
