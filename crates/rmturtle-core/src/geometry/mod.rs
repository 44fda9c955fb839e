//! Geometry kernel: pure point generators used by the drawing API.
//!
//! All angles are in radians. Closed shapes repeat their first point as
//! their last, exactly.

mod bezier;
mod fill;
mod primitives;

pub use bezier::{sample_cubic, sample_quad};
pub use fill::{Chord, fill_ellipse, fill_polygon, fill_rect, scanline_spacing};
pub use primitives::{
    arc, circle, ellipse, rectangle, regular_polygon, rounded_rect, star, triangle,
};

use kurbo::{Point, Vec2};

/// Point at `angle` on the circle of `radius` around `center`.
pub fn polar(center: Point, radius: f64, angle: f64) -> Point {
    center + Vec2::from_angle(angle) * radius
}

/// Append the first point if the sequence does not already end on it.
pub fn close(points: &mut Vec<Point>) {
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last {
            points.push(first);
        }
    }
}

pub fn is_closed(points: &[Point]) -> bool {
    points.len() > 1 && points.first() == points.last()
}
