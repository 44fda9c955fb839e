use kurbo::{Affine, Point};

/// A straight fill segment.
pub type Chord = (Point, Point);

const MIN_CHORD: f64 = 1e-9;

/// Spacing between neighbouring scanlines for a pen of `width`.
pub fn scanline_spacing(width: f64, spacing_factor: f64) -> f64 {
    (width * spacing_factor).max(1.0)
}

/// Evenly spread scanline offsets covering `[min, max]` at most `spacing`
/// apart.
fn scan_offsets(min: f64, max: f64, spacing: f64) -> Vec<f64> {
    let extent = max - min;
    if extent.is_nan() || extent <= 0.0 {
        return vec![min];
    }
    let count = (extent / spacing.max(1.0)).ceil().max(1.0) as usize;
    (0..=count)
        .map(|i| min + extent * i as f64 / count as f64)
        .collect()
}

fn keep(chord: Chord) -> Option<Chord> {
    (chord.0.distance(chord.1) > MIN_CHORD).then_some(chord)
}

/// Horizontal chords covering an axis-aligned rectangle.
pub fn fill_rect(x: f64, y: f64, w: f64, h: f64, spacing: f64) -> Vec<Chord> {
    if w <= 0.0 || h <= 0.0 {
        return Vec::new();
    }
    scan_offsets(y, y + h, spacing)
        .into_iter()
        .filter_map(|sy| keep((Point::new(x, sy), Point::new(x + w, sy))))
        .collect()
}

/// Chords parallel to the ellipse's rotated x axis.
pub fn fill_ellipse(center: Point, rx: f64, ry: f64, rotation: f64, spacing: f64) -> Vec<Chord> {
    if rx <= 0.0 || ry <= 0.0 {
        return Vec::new();
    }
    let frame = Affine::translate(center.to_vec2()) * Affine::rotate(rotation);
    scan_offsets(-ry, ry, spacing)
        .into_iter()
        .filter_map(|ly| {
            let t = ly / ry;
            let half = rx * (1.0 - t * t).max(0.0).sqrt();
            keep((frame * Point::new(-half, ly), frame * Point::new(half, ly)))
        })
        .collect()
}

/// Even-odd scanline fill of a polygon with chords at `angle` from the x
/// axis. The polygon is treated as closed whether or not its last point
/// repeats the first.
pub fn fill_polygon(points: &[Point], spacing: f64, angle: f64) -> Vec<Chord> {
    if points.len() < 3 {
        return Vec::new();
    }
    let to_local = Affine::rotate(-angle);
    let to_world = Affine::rotate(angle);
    let local: Vec<Point> = points.iter().map(|&p| to_local * p).collect();

    let (min_y, max_y) = local
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    let mut chords = Vec::new();
    let mut crossings = Vec::new();
    for sy in scan_offsets(min_y, max_y, spacing) {
        crossings.clear();
        for (i, a) in local.iter().enumerate() {
            let b = local[(i + 1) % local.len()];
            // half-open so a shared vertex is counted once
            let spans = (a.y <= sy && sy < b.y) || (b.y <= sy && sy < a.y);
            if spans {
                let t = (sy - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let chord = (
                to_world * Point::new(pair[0], sy),
                to_world * Point::new(pair[1], sy),
            );
            chords.extend(keep(chord));
        }
    }
    chords
}
