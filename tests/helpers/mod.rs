//! Invariant checks shared by the integration tests.
#![allow(dead_code)]

use sweephull::{next_halfedge, prev_halfedge, Point, Triangulation, INVALID_INDEX};

const ORIENT_THRESHOLD: f64 = 3.330_669_073_875_471_6e-16;

/// Orientation determinant of (`a`, `b`, `c`), zeroed when the sign is not certain under
/// double-precision rounding. Negative for the winding this library emits.
pub fn orient(a: Point, b: Point, c: Point) -> f64 {
    let l = (b.y - a.y) * (c.x - a.x);
    let r = (b.x - a.x) * (c.y - a.y);
    let det = r - l;

    if det.abs() >= ORIENT_THRESHOLD * (l + r).abs() {
        det
    } else {
        0.0
    }
}

/// Raw in-circle determinant: true if `p` is strictly inside the circumcircle of (`a`, `b`, `c`).
pub fn in_circle(a: Point, b: Point, c: Point, p: Point) -> bool {
    let dx = a.x - p.x;
    let dy = a.y - p.y;
    let ex = b.x - p.x;
    let ey = b.y - p.y;
    let fx = c.x - p.x;
    let fy = c.y - p.y;

    let ap = dx * dx + dy * dy;
    let bp = ex * ex + ey * ey;
    let cp = fx * fx + fy * fy;

    dx * (ey * cp - bp * fy) - dy * (ex * cp - bp * fx) + ap * (ex * fy - ey * fx) < 0.0
}

/// Kahan-Babuska summation (Neumaier variant).
pub fn sum(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let mut total = x[0];
    let mut err = 0.0;
    for &k in &x[1..] {
        let m = total + k;
        err += if total.abs() >= k.abs() {
            total - m + k
        } else {
            k - m + total
        };
        total = m;
    }
    total + err
}

/// Checks the structural invariants of a triangulation: halfedge involution, consistent
/// triangle winding, hull convexity and conservation of area between the triangles and the
/// hull polygon.
pub fn validate(points: &[Point], t: &Triangulation) {
    let len = t.triangles.len();
    assert_eq!(t.halfedges.len(), len, "mesh arrays must have equal length");
    assert_eq!(len % 3, 0, "triangles length must be a multiple of 3");

    // halfedge involution
    for e in 0..len {
        let twin = t.halfedges[e];
        if twin == INVALID_INDEX {
            continue;
        }
        assert!(twin < len, "halfedge {} points out of bounds: {}", e, twin);
        assert_ne!(twin, e, "halfedge {} is its own twin", e);
        assert_eq!(
            t.halfedges[twin], e,
            "halfedge involution broken at {} <-> {}",
            e, twin
        );
        assert_eq!(
            t.triangles[e],
            t.triangles[next_halfedge(twin)],
            "twin halfedges {} and {} disagree on their shared edge",
            e,
            twin
        );
    }

    // consistent winding
    for i in (0..len).step_by(3) {
        let a = points[t.triangles[i]];
        let b = points[t.triangles[i + 1]];
        let c = points[t.triangles[i + 2]];
        assert!(
            orient(a, b, c) <= 0.0,
            "triangle {} winds the wrong way",
            i / 3
        );
    }

    // hull convexity: every consecutive triple turns the same way (or is collinear)
    let h = t.hull.len();
    for i in 0..h {
        let a = points[t.hull[i]];
        let b = points[t.hull[(i + 1) % h]];
        let c = points[t.hull[(i + 2) % h]];
        assert!(
            orient(a, b, c) <= 0.0,
            "hull is not convex at position {}",
            i
        );
    }

    if t.triangles.is_empty() {
        return;
    }

    // area conservation: the triangles partition the hull polygon
    let hull_area = {
        let mut areas = Vec::with_capacity(h);
        let mut j = h - 1;
        for i in 0..h {
            let p0 = points[t.hull[j]];
            let p = points[t.hull[i]];
            areas.push((p.x - p0.x) * (p.y + p0.y));
            j = i;
        }
        sum(&areas)
    };
    let triangles_area = {
        let mut areas = Vec::with_capacity(len / 3);
        for i in (0..len).step_by(3) {
            let a = points[t.triangles[i]];
            let b = points[t.triangles[i + 1]];
            let c = points[t.triangles[i + 2]];
            areas.push(((b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y)).abs());
        }
        sum(&areas)
    };
    assert!(
        approx::relative_eq!(hull_area, triangles_area, max_relative = f64::EPSILON * 2.0),
        "area mismatch: hull {} vs triangles {}",
        hull_area,
        triangles_area
    );
}

/// Checks the local Delaunay property on every interior edge.
pub fn assert_delaunay(points: &[Point], t: &Triangulation) {
    for a in 0..t.triangles.len() {
        let b = t.halfedges[a];
        if b == INVALID_INDEX || b < a {
            continue;
        }

        let ar = prev_halfedge(a);
        let al = next_halfedge(a);
        let bl = prev_halfedge(b);

        let p0 = points[t.triangles[ar]];
        let pr = points[t.triangles[a]];
        let pl = points[t.triangles[al]];
        let p1 = points[t.triangles[bl]];

        assert!(
            !in_circle(p0, pr, pl, p1),
            "illegal edge between halfedges {} and {}",
            a,
            b
        );
    }
}

/// Asserts the Euler identity T = 2N - H - 2 for inputs where no point was dropped.
pub fn assert_count_identity(n: usize, t: &Triangulation) {
    assert_eq!(
        t.triangles.len(),
        3 * (2 * n - t.hull.len() - 2),
        "triangle count does not match 2N - H - 2 (N = {}, H = {})",
        n,
        t.hull.len()
    );
}

/// Builds a `Point` list from interleaved x,y coordinates.
pub fn points_from(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks(2)
        .map(|c| Point { x: c[0], y: c[1] })
        .collect()
}
