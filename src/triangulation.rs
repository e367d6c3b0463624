//! Construction of the triangulation: seed selection, radial sweep, edge legalization and the
//! public build entry points.

use rayon::prelude::*;
use thiserror::Error;

use crate::hull::Hull;
use crate::predicates::{circumdelta, circumradius2, dist2, in_circle, orient};
use crate::sort::quicksort;
use crate::{next_halfedge, prev_halfedge, Coord, Point, EPSILON, INVALID_INDEX};

/// Capacity of the legalization work stack. Edges pushed past this bound are dropped; only
/// adversarial inputs reach it, and later insertions re-legalize the affected region.
const EDGE_STACK_CAPACITY: usize = 512;

/// Reasons a triangulation cannot be built.
///
/// All-collinear input is not an error: it produces a [`Triangulation`] with empty `triangles`
/// and `halfedges` and the ordered point ids as `hull`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TriangulateError {
    /// The input contains fewer than three distinct points.
    #[error("triangulation needs at least 3 distinct points, got {0}")]
    InsufficientPoints(usize),
    /// The point at the contained index has a NaN or infinite coordinate, or is incomplete in a
    /// flat coordinate buffer of odd length.
    #[error("point {0} has a non-finite or incomplete coordinate")]
    InvalidInput(usize),
}

/// Represents a Delaunay triangulation for a given set of points. See the [crate] docs for the
/// meaning of the three output vectors.
///
/// The working buffers used during construction are kept inside the value, so [`update`] can
/// rebuild the triangulation after the caller moved some points without allocating, as long as
/// the point count is unchanged.
///
/// [`update`]: ./struct.Triangulation.html#method.update
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Contains the point indices for each vertex of a triangle. All triangles are directed
    /// counter-clockwise.
    pub triangles: Vec<usize>,
    /// The twin halfedge for every halfedge, or [`INVALID_INDEX`] on the convex hull.
    pub halfedges: Vec<usize>,
    /// Indices of the points on the convex hull of the input, counter-clockwise.
    pub hull: Vec<usize>,

    // working state, retained across update() calls
    hull_state: Hull,
    ids: Vec<usize>,
    dists: Vec<f64>,
    edge_stack: Vec<usize>,
    triangles_len: usize,
}

impl Triangulation {
    /// Builds the Delaunay triangulation of `points`.
    ///
    /// # Arguments
    ///
    /// * `points` - The input points; at least three, all coordinates finite
    pub fn new<C: Coord>(points: &[C]) -> Result<Triangulation, TriangulateError> {
        let mut triangulation = Triangulation::with_capacity(points.len());
        triangulation.update(points)?;
        Ok(triangulation)
    }

    fn with_capacity(n: usize) -> Triangulation {
        let max_triangles = if n > 2 { 2 * n - 5 } else { 0 };

        Triangulation {
            triangles: Vec::with_capacity(3 * max_triangles),
            halfedges: Vec::with_capacity(3 * max_triangles),
            hull: Vec::new(),
            hull_state: Hull::with_capacity(n),
            ids: Vec::with_capacity(n),
            dists: Vec::with_capacity(n),
            edge_stack: Vec::with_capacity(EDGE_STACK_CAPACITY),
            triangles_len: 0,
        }
    }

    /// Returns the number of triangles in the triangulation. Same as `triangles.len() / 3`.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Returns true if the triangulation contains no triangles, which happens exactly when the
    /// input was all-collinear.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Rebuilds the triangulation from `points`, typically after the caller mutated some of the
    /// coordinates (e.g. one iteration of Lloyd relaxation).
    ///
    /// The coordinate buffer is only read. When the point count matches the previous build no
    /// allocation is performed; a changed count re-sizes the working buffers. On error the
    /// previous `triangles`/`halfedges`/`hull` are left untouched.
    pub fn update<C: Coord>(&mut self, points: &[C]) -> Result<(), TriangulateError> {
        let n = points.len();

        if n < 3 {
            return Err(TriangulateError::InsufficientPoints(n));
        }
        if let Some(i) = points
            .iter()
            .position(|p| !p.x().is_finite() || !p.y().is_finite())
        {
            return Err(TriangulateError::InvalidInput(i));
        }

        self.ids.clear();
        self.ids.extend(0..n);
        self.dists.resize(n, 0.0);

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points.iter() {
            min_x = min_x.min(p.x());
            min_y = min_y.min(p.y());
            max_x = max_x.max(p.x());
            max_y = max_y.max(p.y());
        }

        // pick a seed point close to the bbox center
        let bbox_center = C::from_xy((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
        let mut i0 = 0;
        let mut min_dist = f64::INFINITY;
        for (i, p) in points.iter().enumerate() {
            let d = dist2(&bbox_center, p);
            if d < min_dist {
                i0 = i;
                min_dist = d;
            }
        }
        let p0 = points[i0].clone();

        // find the point closest to the seed; d > 0 skips exact duplicates of it
        let mut i1 = INVALID_INDEX;
        let mut min_dist = f64::INFINITY;
        for (i, p) in points.iter().enumerate() {
            if i == i0 {
                continue;
            }
            let d = dist2(&p0, p);
            if d > 0.0 && d < min_dist {
                i1 = i;
                min_dist = d;
            }
        }
        if i1 == INVALID_INDEX {
            // every input point coincides with the seed
            return Err(TriangulateError::InsufficientPoints(n));
        }
        let p1 = points[i1].clone();

        // find the third point which forms the smallest circumcircle with the first two
        let mut i2 = INVALID_INDEX;
        let mut min_radius = f64::INFINITY;
        for (i, p) in points.iter().enumerate() {
            if i == i0 || i == i1 {
                continue;
            }
            let r = circumradius2(&p0, &p1, p);
            if r < min_radius {
                i2 = i;
                min_radius = r;
            }
        }

        if min_radius == f64::INFINITY {
            return self.update_collinear(points);
        }

        // swap the order of the seed points for counter-clockwise orientation
        let (i1, i2) = if orient(&p0, &p1, &points[i2]) {
            (i2, i1)
        } else {
            (i1, i2)
        };
        let p1 = points[i1].clone();
        let p2 = points[i2].clone();

        // the circumcenter of the seed triangle becomes the origin of the radial order
        let (cdx, cdy) = circumdelta(&p0, &p1, &p2);
        let center = C::from_xy(p0.x() + cdx, p0.y() + cdy);

        self.dists
            .par_iter_mut()
            .zip(points.par_iter())
            .for_each(|(d, p)| *d = dist2(&center, p));
        quicksort(&mut self.ids, &self.dists, 0, n - 1);

        self.hull_state
            .reset(Point::from_xy(center.x(), center.y()), i0, i1, i2, points);
        let mut hull_size = 3;

        let max_triangles = 2 * n - 5;
        self.triangles.resize(3 * max_triangles, 0);
        self.halfedges.resize(3 * max_triangles, INVALID_INDEX);
        self.triangles_len = 0;

        self.add_triangle(i0, i1, i2, INVALID_INDEX, INVALID_INDEX, INVALID_INDEX);

        let mut xp = 0.0;
        let mut yp = 0.0;

        for k in 0..n {
            let i = self.ids[k];
            let x = points[i].x();
            let y = points[i].y();

            // skip near-duplicates of the previously accepted point
            if k > 0 && (x - xp).abs() <= EPSILON && (y - yp).abs() <= EPSILON {
                continue;
            }
            xp = x;
            yp = y;

            // skip seed triangle points
            if i == i0 || i == i1 || i == i2 {
                continue;
            }

            let (mut e, walk_back) = self.hull_state.find_visible_edge(&points[i], points);
            if e == INVALID_INDEX {
                continue; // likely a near-duplicate point; skip it
            }

            // add the first triangle from the point
            let t = self.add_triangle(
                e,
                i,
                self.hull_state.next[e],
                INVALID_INDEX,
                INVALID_INDEX,
                self.hull_state.tri[e],
            );

            // flip from the new point until the Delaunay condition is restored, then keep track
            // of the boundary triangles on the hull
            self.hull_state.tri[i] = self.legalize(t + 2, points);
            self.hull_state.tri[e] = t;
            hull_size += 1;

            // walk forward through the hull, adding more triangles and flipping
            let mut nxt = self.hull_state.next[e];
            loop {
                let q = self.hull_state.next[nxt];
                if !orient(&points[i], &points[nxt], &points[q]) {
                    break;
                }
                let t = self.add_triangle(
                    nxt,
                    i,
                    q,
                    self.hull_state.tri[i],
                    INVALID_INDEX,
                    self.hull_state.tri[nxt],
                );
                self.hull_state.tri[i] = self.legalize(t + 2, points);
                self.hull_state.next[nxt] = nxt; // mark as removed
                hull_size -= 1;
                nxt = q;
            }

            // walk backward from the other side, adding more triangles and flipping
            if walk_back {
                loop {
                    let q = self.hull_state.prev[e];
                    if !orient(&points[i], &points[q], &points[e]) {
                        break;
                    }
                    let t = self.add_triangle(
                        q,
                        i,
                        e,
                        INVALID_INDEX,
                        self.hull_state.tri[e],
                        self.hull_state.tri[q],
                    );
                    self.legalize(t + 2, points);
                    self.hull_state.tri[q] = t;
                    self.hull_state.next[e] = e; // mark as removed
                    hull_size -= 1;
                    e = q;
                }
            }

            // splice the new point into the hull
            self.hull_state.prev[i] = e;
            self.hull_state.next[e] = i;
            self.hull_state.prev[nxt] = i;
            self.hull_state.next[i] = nxt;
            self.hull_state.start = e;

            // save the two new edges in the hash table
            self.hull_state.hash_edge(x, y, i);
            self.hull_state.hash_edge(points[e].x(), points[e].y(), e);
        }

        self.hull.clear();
        self.hull.reserve(hull_size);
        let mut e = self.hull_state.start;
        for _ in 0..hull_size {
            self.hull.push(e);
            e = self.hull_state.next[e];
        }

        // trim the mesh arrays to the emitted triangles
        self.triangles.truncate(self.triangles_len);
        self.halfedges.truncate(self.triangles_len);

        Ok(())
    }

    /// All points lie on one line: order them along the dominant axis and expose that order as
    /// the hull, with no triangles.
    fn update_collinear<C: Coord>(&mut self, points: &[C]) -> Result<(), TriangulateError> {
        let n = points.len();

        for (i, p) in points.iter().enumerate() {
            let dx = p.x() - points[0].x();
            self.dists[i] = if dx != 0.0 { dx } else { p.y() - points[0].y() };
        }
        quicksort(&mut self.ids, &self.dists, 0, n - 1);

        self.hull.clear();
        let mut d0 = f64::NEG_INFINITY;
        for k in 0..n {
            let id = self.ids[k];
            if self.dists[id] > d0 {
                self.hull.push(id);
                d0 = self.dists[id];
            }
        }

        self.triangles.clear();
        self.halfedges.clear();
        self.triangles_len = 0;

        Ok(())
    }

    fn add_triangle(
        &mut self,
        i0: usize,
        i1: usize,
        i2: usize,
        a: usize,
        b: usize,
        c: usize,
    ) -> usize {
        let t = self.triangles_len;

        self.triangles[t] = i0;
        self.triangles[t + 1] = i1;
        self.triangles[t + 2] = i2;

        self.link(t, a);
        self.link(t + 1, b);
        self.link(t + 2, c);

        self.triangles_len = t + 3;
        t
    }

    fn link(&mut self, a: usize, b: usize) {
        self.halfedges[a] = b;
        if b != INVALID_INDEX {
            self.halfedges[b] = a;
        }
    }

    fn legalize<C: Coord>(&mut self, a: usize, points: &[C]) -> usize {
        /* if the pair of triangles doesn't satisfy the Delaunay condition
         * (p1 is inside the circumcircle of [p0, pl, pr]), flip them,
         * then do the same check/flip recursively for the new pair of triangles
         *
         *           pl                    pl
         *          /||\                  /  \
         *       al/ || \bl            al/    \a
         *        /  ||  \              /      \
         *       /  a||b  \    flip    /___ar___\
         *     p0\   ||   /p1   =>   p0\---bl---/p1
         *        \  ||  /              \      /
         *       ar\ || /br             b\    /br
         *          \||/                  \  /
         *           pr                    pr
         */
        let mut i: usize = 0;
        let mut ar;
        let mut a = a;

        self.edge_stack.clear();

        loop {
            let b = self.halfedges[a];
            ar = prev_halfedge(a);

            if b == INVALID_INDEX {
                if i > 0 {
                    i -= 1;
                    a = self.edge_stack[i];
                    continue;
                } else {
                    break;
                }
            }

            let al = next_halfedge(a);
            let bl = prev_halfedge(b);

            let p0 = self.triangles[ar];
            let pr = self.triangles[a];
            let pl = self.triangles[al];
            let p1 = self.triangles[bl];

            let illegal = in_circle(&points[p0], &points[pr], &points[pl], &points[p1]);
            if illegal {
                self.triangles[a] = p1;
                self.triangles[b] = p0;

                let hbl = self.halfedges[bl];

                // the swapped edge sat on the hull (rare); re-point the hull map at the
                // surviving halfedge
                if hbl == INVALID_INDEX {
                    let mut e = self.hull_state.start;
                    let mut found = false;
                    loop {
                        if self.hull_state.tri[e] == bl {
                            self.hull_state.tri[e] = a;
                            found = true;
                            break;
                        }
                        e = self.hull_state.prev[e];
                        if e == self.hull_state.start {
                            break;
                        }
                    }
                    debug_assert!(found, "swapped hull edge {} missing from the hull map", bl);
                    if !found {
                        tracing::warn!(
                            edge = bl,
                            "swapped hull edge not found in the hull map; hull incidence is stale"
                        );
                    }
                }

                self.link(a, hbl);
                self.link(b, self.halfedges[ar]);
                self.link(ar, bl);

                let br = next_halfedge(b);

                // the work stack has a fixed capacity; on overflow the edge is dropped
                if i < EDGE_STACK_CAPACITY {
                    if i < self.edge_stack.len() {
                        self.edge_stack[i] = br;
                    } else {
                        self.edge_stack.push(br);
                    }
                    i += 1;
                }
            } else if i > 0 {
                i -= 1;
                a = self.edge_stack[i];
                continue;
            } else {
                break;
            }
        }

        ar
    }
}

/// Calculates the Delaunay triangulation, if it exists, for a given set of 2D points
///
/// # Arguments
///
/// * `points` - The set of points
pub fn triangulate<C: Coord>(points: &[C]) -> Result<Triangulation, TriangulateError> {
    Triangulation::new(points)
}

/// Calculates the Delaunay triangulation, if it exists, for a given set of 2D points.
///
/// Points are passed as a flat array of `f64` of size `2n`, where n is the number of points and
/// for each point `i`, `{x = 2i, y = 2i + 1}`. It returns both the triangulation and the vector
/// of [`Coord`]s built from the buffer, to be used if desired.
///
/// # Arguments
///
/// * `coords` - A slice of `f64` of size `2n`, where for each point `i`, `x = 2i` and `y = 2i + 1`
pub fn triangulate_from_arr<C: Coord>(
    coords: &[f64],
) -> Result<(Triangulation, Vec<C>), TriangulateError> {
    if coords.len() % 2 != 0 {
        return Err(TriangulateError::InvalidInput(coords.len() / 2));
    }

    let points: Vec<C> = coords
        .chunks(2)
        .map(|tuple| C::from_xy(tuple[0], tuple[1]))
        .collect();
    let triangulation = triangulate(&points)?;

    Ok((triangulation, points))
}

/// Calculates the Delaunay triangulation, if it exists, for a given set of 2D points.
///
/// Points are passed as tuples, `(f64, f64)`. It returns both the triangulation and the vector
/// of [`Coord`]s built from the tuples, to be used if desired.
///
/// # Arguments
///
/// * `coords` - A slice of tuples, where each tuple is a `(f64, f64)`
pub fn triangulate_from_tuple<C: Coord>(
    coords: &[(f64, f64)],
) -> Result<(Triangulation, Vec<C>), TriangulateError> {
    let points: Vec<C> = coords.iter().map(|&(x, y)| C::from_xy(x, y)).collect();

    let triangulation = triangulate(&points)?;

    Ok((triangulation, points))
}
