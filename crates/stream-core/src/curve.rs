// File: crates/stream-core/src/curve.rs
// Summary: Uniform cubic B-spline ("basis") smoothing and closed area paths.

use kurbo::{BezPath, Point};

/// Append a basis curve through `pts` to `path`.
///
/// The first and last points are hit exactly; interior points act as B-spline control
/// points. With `connect` the curve starts with a line from the current point instead of
/// a new subpath. One point emits only the start, two points a straight segment.
pub fn basis_into(path: &mut BezPath, pts: &[Point], connect: bool) {
    let Some(&first) = pts.first() else { return };
    if connect { path.line_to(first) } else { path.move_to(first) }
    match pts.len() {
        1 => return,
        2 => {
            path.line_to(pts[1]);
            return;
        }
        _ => {}
    }

    let (mut p0, mut p1) = (pts[0], pts[1]);
    path.line_to(Point::new((5.0 * p0.x + p1.x) / 6.0, (5.0 * p0.y + p1.y) / 6.0));
    for &p in &pts[2..] {
        segment(path, p0, p1, p);
        p0 = p1;
        p1 = p;
    }
    segment(path, p0, p1, p1);
    path.line_to(p1);
}

fn segment(path: &mut BezPath, p0: Point, p1: Point, p: Point) {
    path.curve_to(
        Point::new((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0),
        Point::new((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0),
        Point::new((p0.x + 4.0 * p1.x + p.x) / 6.0, (p0.y + 4.0 * p1.y + p.y) / 6.0),
    );
}

/// Open basis curve through `pts`.
pub fn basis_line(pts: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    basis_into(&mut path, pts, false);
    path
}

/// Closed area between a `top` and a `bottom` boundary sampled at the same x positions.
/// The top runs forward, the bottom backward, both smoothed.
pub fn basis_area(top: &[Point], bottom: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if top.is_empty() {
        return path;
    }
    basis_into(&mut path, top, false);
    let reversed: Vec<Point> = bottom.iter().rev().copied().collect();
    basis_into(&mut path, &reversed, true);
    path.close_path();
    path
}
