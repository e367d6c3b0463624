//! Geometric predicates underpinning the sweep: orientation, in-circle, circumcircle and the
//! pseudo-angle used by the hull hash.

use crate::Coord;

/// Error bound for the double-precision 2D orientation determinant (J. Shewchuk).
const ORIENT_THRESHOLD: f64 = 3.330_669_073_875_471_6e-16;

/// Returns the orientation determinant of (`p`, `r`, `q`) when its sign is certain under
/// double-precision rounding, `0.0` otherwise.
#[inline]
fn orient_if_sure(px: f64, py: f64, rx: f64, ry: f64, qx: f64, qy: f64) -> f64 {
    let l = (ry - py) * (qx - px);
    let r = (rx - px) * (qy - py);

    if (l - r).abs() >= ORIENT_THRESHOLD * (l + r).abs() {
        l - r
    } else {
        0.0
    }
}

/// Robust counter-clockwise test for the triple (`r`, `q`, `p`).
///
/// Evaluates the error-bounded determinant for all three cyclic rotations of the arguments and
/// uses the first sure sign, which keeps the answer stable under rotation of a single triangle.
pub(crate) fn orient<C: Coord>(r: &C, q: &C, p: &C) -> bool {
    let mut sign = orient_if_sure(p.x(), p.y(), r.x(), r.y(), q.x(), q.y());
    if sign == 0.0 {
        sign = orient_if_sure(r.x(), r.y(), q.x(), q.y(), p.x(), p.y());
    }
    if sign == 0.0 {
        sign = orient_if_sure(q.x(), q.y(), p.x(), p.y(), r.x(), r.y());
    }

    sign < 0.0
}

/// Returns true if `p` lies inside the circumcircle of the triangle (`a`, `b`, `c`).
///
/// The plain determinant form is sufficient here: the flip loop only consults it for triangles
/// the robust `orient` has already validated, and converges even when individual answers sit on
/// the rounding edge.
#[inline]
pub(crate) fn in_circle<C: Coord>(a: &C, b: &C, c: &C, p: &C) -> bool {
    let dx = a.x() - p.x();
    let dy = a.y() - p.y();
    let ex = b.x() - p.x();
    let ey = b.y() - p.y();
    let fx = c.x() - p.x();
    let fy = c.y() - p.y();

    let ap = dx * dx + dy * dy;
    let bp = ex * ex + ey * ey;
    let cp = fx * fx + fy * fy;

    #[rustfmt::skip]
    let res = dx * (ey * cp - bp * fy) -
              dy * (ex * cp - bp * fx) +
              ap * (ex * fy - ey * fx);

    res < 0.0
}

/// Vector from `a` to the circumcenter of (`a`, `b`, `c`), or (+∞, +∞) for collinear input.
#[inline]
pub(crate) fn circumdelta<C: Coord>(a: &C, b: &C, c: &C) -> (f64, f64) {
    let dx = b.x() - a.x();
    let dy = b.y() - a.y();
    let ex = c.x() - a.x();
    let ey = c.y() - a.y();

    let bl = dx * dx + dy * dy;
    let cl = ex * ex + ey * ey;
    let det = dx * ey - dy * ex;

    if det == 0.0 {
        return (f64::INFINITY, f64::INFINITY);
    }

    let d = 0.5 / det;
    ((ey * bl - dy * cl) * d, (dx * cl - ex * bl) * d)
}

/// Squared distance from `a` to the circumcenter of (`a`, `b`, `c`); +∞ for collinear input.
#[inline]
pub(crate) fn circumradius2<C: Coord>(a: &C, b: &C, c: &C) -> f64 {
    let (x, y) = circumdelta(a, b, c);
    x * x + y * y
}

/// Calculates the circumcenter of a triangle, given its three vertices
///
/// Returns `None` when the vertices are collinear and no circumcircle exists.
///
/// # Arguments
///
/// * `a` - The first vertex of the triangle
/// * `b` - The second vertex of the triangle
/// * `c` - The third vertex of the triangle
pub fn circumcenter<C: Coord>(a: &C, b: &C, c: &C) -> Option<C> {
    let (x, y) = circumdelta(a, b, c);

    if x.is_finite() && y.is_finite() {
        Some(C::from_xy(a.x() + x, a.y() + y))
    } else {
        None
    }
}

/// Monotonically increases with the real angle; avoids trigonometry. Range [0, 1).
#[inline]
pub(crate) fn pseudo_angle(dx: f64, dy: f64) -> f64 {
    let p = dx / (dx.abs() + dy.abs());

    if dy > 0.0 {
        (3.0 - p) / 4.0
    } else {
        (1.0 + p) / 4.0
    }
}

/// Squared Euclidean distance between `a` and `b`.
#[inline]
pub(crate) fn dist2<C: Coord>(a: &C, b: &C) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    dx * dx + dy * dy
}
