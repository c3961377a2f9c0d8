//! Collision tests for axis-aligned grid geometry
//!
//! Everything in the game is either an axis-aligned rectangle (player,
//! tiles) or a circle (cannonballs, turret bullets), so two tests cover
//! all hazard contact: AABB overlap and closest-point circle-vs-rect.

use glam::Vec2;

/// A circle by center and radius
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// An axis-aligned rectangle by center and full extents
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }
}

/// Circle-vs-rectangle overlap: clamp the circle center into the rect and
/// compare the distance to the radius. A zero radius degenerates to a
/// point-in-rect test (used for turret bullets).
pub fn circle_vs_rect(circle: Circle, rect: Rect) -> bool {
    let half = Vec2::new(rect.width / 2.0, rect.height / 2.0);
    let offset = circle.center - rect.center;
    let closest = rect.center + offset.clamp(-half, half);
    circle.center.distance(closest) <= circle.radius
}

/// AABB overlap by center distance against summed half extents
pub fn rect_vs_rect(a: Rect, b: Rect) -> bool {
    let x_diff = (a.center.x - b.center.x).abs();
    let y_diff = (a.center.y - b.center.y).abs();
    x_diff < (a.width + b.width) * 0.5 && y_diff < (a.height + b.height) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_vs_rect_overlap() {
        let rect = Rect::new(Vec2::ZERO, 1.0, 1.0);

        // circle center inside the rect
        assert!(circle_vs_rect(
            Circle {
                center: Vec2::new(0.2, 0.1),
                radius: 0.0
            },
            rect
        ));
        // touching the right edge from outside
        assert!(circle_vs_rect(
            Circle {
                center: Vec2::new(0.9, 0.0),
                radius: 0.45
            },
            rect
        ));
        // clear miss
        assert!(!circle_vs_rect(
            Circle {
                center: Vec2::new(2.0, 2.0),
                radius: 0.45
            },
            rect
        ));
    }

    #[test]
    fn test_circle_vs_rect_corner() {
        let rect = Rect::new(Vec2::ZERO, 1.0, 1.0);
        // diagonal from the corner: corner is at (0.5, 0.5)
        let near = Circle {
            center: Vec2::new(0.8, 0.8),
            radius: 0.5,
        };
        let far = Circle {
            center: Vec2::new(0.9, 0.9),
            radius: 0.5,
        };
        assert!(circle_vs_rect(near, rect));
        assert!(!circle_vs_rect(far, rect));
    }

    #[test]
    fn test_rect_vs_rect() {
        let a = Rect::new(Vec2::ZERO, 0.8, 1.2);
        assert!(rect_vs_rect(a, Rect::new(Vec2::new(0.5, 0.0), 1.0, 1.0)));
        assert!(!rect_vs_rect(a, Rect::new(Vec2::new(1.0, 0.0), 1.0, 1.0)));
        // edge contact is not overlap
        assert!(!rect_vs_rect(a, Rect::new(Vec2::new(0.9, 0.0), 1.0, 1.0)));
    }

    proptest! {
        // A zero-radius circle overlaps a rect exactly when its center is
        // inside (closed) bounds.
        #[test]
        fn prop_point_test_matches_bounds(x in -3.0f32..3.0, y in -3.0f32..3.0) {
            let rect = Rect::new(Vec2::ZERO, 1.0, 1.0);
            let hit = circle_vs_rect(Circle { center: Vec2::new(x, y), radius: 0.0 }, rect);
            let inside = x.abs() <= 0.5 && y.abs() <= 0.5;
            prop_assert_eq!(hit, inside);
        }

        // rect_vs_rect is symmetric
        #[test]
        fn prop_rect_overlap_symmetric(
            ax in -2.0f32..2.0, ay in -2.0f32..2.0,
            bx in -2.0f32..2.0, by in -2.0f32..2.0,
        ) {
            let a = Rect::new(Vec2::new(ax, ay), 0.8, 1.2);
            let b = Rect::new(Vec2::new(bx, by), 1.0, 1.0);
            prop_assert_eq!(rect_vs_rect(a, b), rect_vs_rect(b, a));
        }
    }
}
