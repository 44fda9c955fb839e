use kurbo::{CubicBez, ParamCurve, Point, QuadBez};

/// Sample a quadratic Bezier at `t = i / samples` for `i = 1..=samples`.
///
/// The start point is not included; the last sample is `p2` exactly.
pub fn sample_quad(p0: Point, p1: Point, p2: Point, samples: usize) -> Vec<Point> {
    let curve = QuadBez::new(p0, p1, p2);
    sample(samples, |t| curve.eval(t))
}

/// Sample a cubic Bezier at `t = i / samples` for `i = 1..=samples`.
pub fn sample_cubic(p0: Point, p1: Point, p2: Point, p3: Point, samples: usize) -> Vec<Point> {
    let curve = CubicBez::new(p0, p1, p2, p3);
    sample(samples, |t| curve.eval(t))
}

fn sample(samples: usize, eval: impl Fn(f64) -> Point) -> Vec<Point> {
    let samples = samples.max(1);
    (1..=samples)
        .map(|i| eval(i as f64 / samples as f64))
        .collect()
}
