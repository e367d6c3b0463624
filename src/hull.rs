//! The advancing convex hull: a doubly linked list over point ids plus a lossy angular hash
//! used to find a visible edge in O(1) on average.

use crate::predicates::{orient, pseudo_angle};
use crate::{Coord, Point, INVALID_INDEX};

// https://stackoverflow.com/questions/33333363
#[inline]
fn fast_mod(i: usize, c: usize) -> usize {
    if i >= c {
        i % c
    } else {
        i
    }
}

/// State of the hull while the sweep advances. The linked list is the source of truth; the hash
/// is a hint that may point at removed vertices and must be validated on every read.
#[derive(Debug, Clone)]
pub(crate) struct Hull {
    /// Maps point id to the previous hull point id
    pub prev: Vec<usize>,
    /// Maps point id to the next hull point id; an id `x` with `next[x] == x` has been removed
    pub next: Vec<usize>,
    /// Maps a hull point id to the halfedge of the triangle edge incident to it on the hull side
    pub tri: Vec<usize>,
    /// Angular hash table over pseudo-angle buckets
    hash: Vec<usize>,
    /// Entry point into the linked list
    pub start: usize,
    /// Circumcenter of the seed triangle, the origin of all pseudo-angles
    center: Point,
}

impl Hull {
    pub fn with_capacity(n: usize) -> Hull {
        let hash_len = (n as f64).sqrt().ceil() as usize;

        Hull {
            prev: vec![0; n],
            next: vec![0; n],
            tri: vec![0; n],
            hash: vec![INVALID_INDEX; hash_len],
            start: 0,
            center: Point::default(),
        }
    }

    /// Re-seeds the hull with the initial triangle, reusing the existing buffers. Stale
    /// `prev`/`next`/`tri` entries are left in place; only ids reachable from `start` are ever
    /// read back.
    pub fn reset<C: Coord>(&mut self, center: Point, i0: usize, i1: usize, i2: usize, points: &[C]) {
        let n = points.len();
        let hash_len = (n as f64).sqrt().ceil() as usize;

        self.prev.resize(n, 0);
        self.next.resize(n, 0);
        self.tri.resize(n, 0);
        self.hash.clear();
        self.hash.resize(hash_len, INVALID_INDEX);
        self.start = i0;
        self.center = center;

        self.next[i0] = i1;
        self.prev[i2] = i1;
        self.next[i1] = i2;
        self.prev[i0] = i2;
        self.next[i2] = i0;
        self.prev[i1] = i0;

        self.tri[i0] = 0;
        self.tri[i1] = 1;
        self.tri[i2] = 2;

        self.hash_edge(points[i0].x(), points[i0].y(), i0);
        self.hash_edge(points[i1].x(), points[i1].y(), i1);
        self.hash_edge(points[i2].x(), points[i2].y(), i2);
    }

    #[inline]
    fn hash_key(&self, x: f64, y: f64) -> usize {
        let angle = pseudo_angle(x - self.center.x, y - self.center.y);
        let len = self.hash.len();
        fast_mod((angle * len as f64).floor() as usize, len)
    }

    /// Records `i` as the hull vertex for the angular bucket of (`x`, `y`). Last writer wins.
    #[inline]
    pub fn hash_edge(&mut self, x: f64, y: f64, i: usize) {
        let key = self.hash_key(x, y);
        self.hash[key] = i;
    }

    /// Returns the first hull edge visible from `p` and whether the preceding edge may be
    /// visible too. Returns `INVALID_INDEX` when no live hash entry exists or the walk wraps
    /// around without finding a visible edge; the caller skips the point as a near-duplicate.
    pub fn find_visible_edge<C: Coord>(&self, p: &C, points: &[C]) -> (usize, bool) {
        let mut start = INVALID_INDEX;
        let key = self.hash_key(p.x(), p.y());
        let len = self.hash.len();

        for j in 0..len {
            start = self.hash[fast_mod(key + j, len)];
            if start != INVALID_INDEX && start != self.next[start] {
                break;
            }
        }

        if start == INVALID_INDEX || start == self.next[start] {
            return (INVALID_INDEX, false);
        }

        // the hash points near the target; walk forward until an edge is visible
        let start = self.prev[start];
        let mut e = start;

        loop {
            let q = self.next[e];
            if orient(p, &points[e], &points[q]) {
                break;
            }
            e = q;
            if e == start {
                return (INVALID_INDEX, false);
            }
        }

        (e, e == start)
    }
}
