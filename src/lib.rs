#![warn(missing_docs)]

//! Fast 2D Delaunay triangulation over a compact half-edge mesh.
//!
//! Given a set of points in the plane, [`triangulate`] produces a [`Triangulation`] with three
//! components: [`triangles`], [`halfedges`] and [`hull`]:
//!
//! - `triangles`: a `Vec<usize>` where each consecutive triple holds the point indices of one
//!   Delaunay triangle. All triangles are directed counter-clockwise.
//! - `halfedges`: a `Vec<usize>` of twin half-edge indices that allows you to traverse the
//!   triangulation. The i-th half-edge starts at vertex `triangles[i]`; `halfedges[i]` is the
//!   index of the twin half-edge in the adjacent triangle, or [`INVALID_INDEX`] for outer
//!   half-edges on the convex hull. The flat index-based representation might be
//!   counterintuitive, but it is one of the key reasons this library is fast.
//! - `hull`: a `Vec<usize>` of point indices on the convex hull of the input, counter-clockwise.
//!
//! # Example
//!
//! ```
//! use sweephull::{triangulate_from_tuple, Point};
//!
//! let points = vec![(0., 0.), (1., 0.), (1., 1.), (0., 1.)];
//!
//! let (t, _) = triangulate_from_tuple::<Point>(&points)
//!     .expect("no triangulation exists for this input");
//!
//! for i in 0..t.len() {
//!     let i0 = t.triangles[3 * i];
//!     let i1 = t.triangles[3 * i + 1];
//!     let i2 = t.triangles[3 * i + 2];
//!
//!     println!("triangle {}: [{}, {}, {}]", i, i0, i1, i2);
//! }
//! ```
//!
//! # Re-triangulation
//!
//! A [`Triangulation`] keeps its working buffers, so iterative algorithms such as Lloyd
//! relaxation can mutate the coordinates and rebuild without reallocating:
//!
//! ```
//! use sweephull::{Point, Triangulation};
//!
//! let mut points = vec![
//!     Point { x: 0., y: 0. },
//!     Point { x: 1., y: 0. },
//!     Point { x: 1., y: 1. },
//!     Point { x: 0., y: 1. },
//! ];
//!
//! let mut t = Triangulation::new(&points).unwrap();
//! assert_eq!(t.len(), 2);
//!
//! points[2].y = 1.25;
//! t.update(&points).unwrap();
//! assert_eq!(t.len(), 2);
//! ```
//!
//! [`triangles`]: ./struct.Triangulation.html#structfield.triangles
//! [`halfedges`]: ./struct.Triangulation.html#structfield.halfedges
//! [`hull`]: ./struct.Triangulation.html#structfield.hull

use std::fmt::Debug;

mod hull;
mod predicates;
mod sort;
mod triangulation;

pub use crate::predicates::circumcenter;
pub use crate::triangulation::{
    triangulate, triangulate_from_arr, triangulate_from_tuple, TriangulateError, Triangulation,
};

/// Threshold under which two points are considered duplicates of each other.
///
/// Points whose `x` and `y` coordinates both differ from the previously accepted point by no
/// more than this value are dropped during triangulation; they appear in neither `triangles`
/// nor `hull`.
pub const EPSILON: f64 = f64::EPSILON;

/// Sentinel for an invalid index in the [`Triangulation`] vectors, marking half-edges on the
/// convex hull that have no twin.
pub const INVALID_INDEX: usize = usize::MAX;

/// Trait for a 2D coordinate consumed by the triangulator. The provided [`Point`] struct is the
/// default implementation.
///
/// Coordinates are IEEE-754 doubles; the robust orientation predicate depends on
/// double-precision rounding behaviour.
pub trait Coord: Clone + Send + Sync + Debug {
    /// Create a coordinate from (x, y) positions
    fn from_xy(x: f64, y: f64) -> Self;
    /// Return x coordinate
    fn x(&self) -> f64;
    /// Return y coordinate
    fn y(&self) -> f64;

    /// Return the squared magnitude of the 2D vector represented by (x, y)
    #[inline]
    fn magnitude2(&self) -> f64 {
        self.x() * self.x() + self.y() * self.y()
    }
}

/// Represents a point in the 2D space.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    /// X coordinate of the point
    pub x: f64,
    /// Y coordinate of the point
    pub y: f64,
}

impl Coord for Point {
    // Inline these methods as otherwise we incur a heavy performance penalty
    #[inline(always)]
    fn from_xy(x: f64, y: f64) -> Self {
        Point { x, y }
    }
    #[inline(always)]
    fn x(&self) -> f64 {
        self.x
    }
    #[inline(always)]
    fn y(&self) -> f64 {
        self.y
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Point { x, y }
    }
}

/// Returns the next halfedge for a given halfedge
///
/// # Arguments
///
/// * `i` - The current halfedge index
#[inline]
pub fn next_halfedge(i: usize) -> usize {
    if i % 3 == 2 {
        i - 2
    } else {
        i + 1
    }
}

/// Returns the previous halfedge for a given halfedge
///
/// # Arguments
///
/// * `i` - The current halfedge index
#[inline]
pub fn prev_halfedge(i: usize) -> usize {
    if i % 3 == 0 {
        i + 2
    } else {
        i - 1
    }
}

/// Returns the indices of the 3 halfedges of a triangle
///
/// # Arguments
///
/// * `t` - The triangle index
#[inline]
pub fn edges_of_triangle(t: usize) -> [usize; 3] {
    [3 * t, 3 * t + 1, 3 * t + 2]
}

/// Returns the triangle associated with the given halfedge
///
/// # Arguments
///
/// * `e` - The halfedge index
#[inline]
pub fn triangle_of_edge(e: usize) -> usize {
    e / 3
}

/// Returns the indices of the corners of the given triangle
///
/// # Arguments
///
/// * `t` - The triangle index
/// * `delaunay` - A reference to a fully constructed [`Triangulation`]
#[inline]
pub fn points_of_triangle(t: usize, delaunay: &Triangulation) -> [usize; 3] {
    let edges = edges_of_triangle(t);
    [
        delaunay.triangles[edges[0]],
        delaunay.triangles[edges[1]],
        delaunay.triangles[edges[2]],
    ]
}

/// Returns the indices of the triangles adjacent to the given triangle
///
/// # Arguments
///
/// * `t` - The triangle index
/// * `delaunay` - A reference to a fully constructed [`Triangulation`]
pub fn triangles_adjacent_to_triangle(t: usize, delaunay: &Triangulation) -> Vec<usize> {
    let mut adjacent_triangles: Vec<usize> = vec![];
    for &e in edges_of_triangle(t).iter() {
        let opposite = delaunay.halfedges[e];
        if opposite != INVALID_INDEX {
            adjacent_triangles.push(triangle_of_edge(opposite));
        }
    }
    adjacent_triangles
}

/// Returns all halfedges pointing into the point that `start` points into
///
/// # Arguments
///
/// * `start` - An incoming halfedge of the point
/// * `delaunay` - A reference to a fully constructed [`Triangulation`]
pub fn edges_around_point(start: usize, delaunay: &Triangulation) -> Vec<usize> {
    let mut result: Vec<usize> = vec![];

    if start == INVALID_INDEX {
        return result;
    }

    let mut incoming = start;
    loop {
        result.push(incoming);
        let outgoing = next_halfedge(incoming);
        incoming = delaunay.halfedges[outgoing];
        if incoming == INVALID_INDEX || incoming == start {
            break;
        }
    }
    result
}
