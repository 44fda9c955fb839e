use kurbo::{Affine, Point, Vec2};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::polar;

/// Axis-aligned rectangle: top-left, top-right, bottom-right, bottom-left,
/// top-left.
pub fn rectangle(x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
    let tl = Point::new(x, y);
    vec![
        tl,
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
        tl,
    ]
}

/// Equilateral triangle with side `size` centered on its centroid, apex up.
pub fn triangle(center: Point, size: f64) -> Vec<Point> {
    let height = size * 3f64.sqrt() / 2.0;
    let apex = center - Vec2::new(0.0, height * 2.0 / 3.0);
    vec![
        apex,
        center + Vec2::new(size / 2.0, height / 3.0),
        center + Vec2::new(-size / 2.0, height / 3.0),
        apex,
    ]
}

/// Closed regular n-gon; empty for `n < 3`.
pub fn regular_polygon(n: usize, center: Point, radius: f64, rotation: f64) -> Vec<Point> {
    if n < 3 {
        return Vec::new();
    }
    let mut points: Vec<Point> = (0..n)
        .map(|i| polar(center, radius, rotation + TAU * i as f64 / n as f64))
        .collect();
    points.push(points[0]);
    points
}

/// Closed star alternating outer and inner vertices; `points` is clamped to 2.
pub fn star(points: usize, center: Point, radius: f64, inner_ratio: f64, rotation: f64) -> Vec<Point> {
    let n = points.max(2);
    let mut out: Vec<Point> = (0..2 * n)
        .map(|i| {
            let r = if i % 2 == 0 { radius } else { radius * inner_ratio };
            polar(center, r, rotation + PI * i as f64 / n as f64)
        })
        .collect();
    out.push(out[0]);
    out
}

/// Closed ellipse rotated about its center; at least 8 segments.
pub fn ellipse(center: Point, rx: f64, ry: f64, rotation: f64, segments: usize) -> Vec<Point> {
    let seg = segments.max(8);
    let frame = Affine::translate(center.to_vec2()) * Affine::rotate(rotation);
    let mut points: Vec<Point> = (0..seg)
        .map(|i| {
            let theta = TAU * i as f64 / seg as f64;
            frame * Point::new(rx * theta.cos(), ry * theta.sin())
        })
        .collect();
    points.push(points[0]);
    points
}

pub fn circle(center: Point, radius: f64, segments: usize) -> Vec<Point> {
    ellipse(center, radius, radius, 0.0, segments)
}

/// Open arc of `segments + 1` points from `start` through `sweep`.
pub fn arc(center: Point, radius: f64, start: f64, sweep: f64, segments: usize) -> Vec<Point> {
    let seg = segments.max(1);
    (0..=seg)
        .map(|i| polar(center, radius, start + sweep * i as f64 / seg as f64))
        .collect()
}

/// Closed rounded rectangle, clockwise from the top edge.
///
/// The radius is clamped to half the shorter side and each corner is sampled
/// with `segments` points. Non-positive sizes yield no points.
pub fn rounded_rect(x: f64, y: f64, w: f64, h: f64, radius: f64, segments: usize) -> Vec<Point> {
    if w <= 0.0 || h <= 0.0 {
        return Vec::new();
    }
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let k = segments.max(1);
    let corner = |points: &mut Vec<Point>, center: Point, from: f64| {
        points.extend((1..=k).map(|i| polar(center, r, from + FRAC_PI_2 * i as f64 / k as f64)));
    };

    let start = Point::new(x + r, y);
    let mut points = vec![start, Point::new(x + w - r, y)];
    corner(&mut points, Point::new(x + w - r, y + r), -FRAC_PI_2);
    points.push(Point::new(x + w, y + h - r));
    corner(&mut points, Point::new(x + w - r, y + h - r), 0.0);
    points.push(Point::new(x + r, y + h));
    corner(&mut points, Point::new(x + r, y + h - r), FRAC_PI_2);
    points.push(Point::new(x, y + r));
    corner(&mut points, Point::new(x + r, y + r), PI);
    points.push(start);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_rectangle_corners() {
        let points = rectangle(10.0, 20.0, 30.0, 40.0);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], points[4]);
        assert_eq!(points[2], Point::new(40.0, 60.0));
    }

    #[test]
    fn test_triangle_closed_and_centered() {
        let center = Point::new(100.0, 100.0);
        let points = triangle(center, 60.0);
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], points[3]);
        let centroid = (points[0].to_vec2() + points[1].to_vec2() + points[2].to_vec2()) / 3.0;
        assert!((centroid.x - center.x).abs() < EPS);
        assert!((centroid.y - center.y).abs() < EPS);
        assert!((points[1].distance(points[2]) - 60.0).abs() < EPS);
        assert!((points[0].distance(points[1]) - 60.0).abs() < EPS);
    }

    #[test]
    fn test_regular_polygon() {
        let center = Point::new(5.0, -5.0);
        let points = regular_polygon(6, center, 10.0, 0.3);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], points[6]);
        for p in &points[..6] {
            assert!((p.distance(center) - 10.0).abs() < EPS);
        }
        assert!(regular_polygon(2, center, 10.0, 0.0).is_empty());
    }

    #[test]
    fn test_star_alternates_radii() {
        let points = star(5, Point::ZERO, 10.0, 0.5, 0.0);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0], points[10]);
        for (i, p) in points[..10].iter().enumerate() {
            let expected = if i % 2 == 0 { 10.0 } else { 5.0 };
            assert!((p.distance(Point::ZERO) - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_star_clamps_points() {
        assert_eq!(star(1, Point::ZERO, 4.0, 0.5, 0.0).len(), 5);
    }

    #[test]
    fn test_ellipse_min_segments_and_rotation() {
        let points = ellipse(Point::ZERO, 20.0, 10.0, FRAC_PI_2, 3);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], points[8]);
        // the major axis now points along +y
        assert!(points[0].x.abs() < EPS);
        assert!((points[0].y - 20.0).abs() < EPS);
    }

    #[test]
    fn test_circle_radius() {
        let center = Point::new(1.0, 2.0);
        let points = circle(center, 3.0, 64);
        assert_eq!(points.len(), 65);
        assert!(points.iter().all(|p| (p.distance(center) - 3.0).abs() < EPS));
    }

    #[test]
    fn test_arc_not_closed() {
        let points = arc(Point::ZERO, 10.0, 0.0, PI, 4);
        assert_eq!(points.len(), 5);
        assert!((points[0].x - 10.0).abs() < EPS);
        assert!((points[4].x + 10.0).abs() < EPS);
        assert!(points[2].y > 9.999);
        assert_ne!(points[0], points[4]);
    }

    #[test]
    fn test_rounded_rect() {
        let points = rounded_rect(0.0, 0.0, 100.0, 40.0, 50.0, 4);
        // start, top edge end, four 4-sample corners, three edge points, close
        assert_eq!(points.len(), 2 + 4 * 4 + 3 + 1);
        assert_eq!(points[0], *points.last().unwrap());
        // radius clamped to 20
        assert!((points[0].x - 20.0).abs() < EPS);
        for p in &points {
            assert!(p.x > -EPS && p.x < 100.0 + EPS);
            assert!(p.y > -EPS && p.y < 40.0 + EPS);
        }
    }

    #[test]
    fn test_rounded_rect_degenerate() {
        assert!(rounded_rect(0.0, 0.0, 0.0, 10.0, 2.0, 8).is_empty());
        assert!(rounded_rect(0.0, 0.0, 10.0, -1.0, 2.0, 8).is_empty());
    }
}
