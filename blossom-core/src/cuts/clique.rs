//! Interval-encoded vertex sets.

use std::fmt;

use crate::error::{SepError, SepResult};

/// Closed vertex interval `[lo, hi]`.
///
/// Bounds are signed so that malformed oracle output stays representable
/// until the verifier rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    /// Lower bound (inclusive).
    pub lo: i32,

    /// Upper bound (inclusive).
    pub hi: i32,
}

impl Interval {
    /// Create an interval.
    pub const fn new(lo: i32, hi: i32) -> Self {
        Self { lo, hi }
    }

    /// Single-vertex interval.
    pub const fn point(v: i32) -> Self {
        Self { lo: v, hi: v }
    }

    /// Check if `v` lies inside the interval.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        let v = v as i64;
        (self.lo as i64) <= v && v <= (self.hi as i64)
    }

    /// Check if either bound is negative.
    pub fn has_negative_bound(&self) -> bool {
        self.lo < 0 || self.hi < 0
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// Borrowed view of one clique (handle or tooth).
#[derive(Debug, Clone, Copy)]
pub struct CliqueRef<'a> {
    intervals: &'a [Interval],
}

impl<'a> CliqueRef<'a> {
    pub(crate) fn new(intervals: &'a [Interval]) -> Self {
        Self { intervals }
    }

    /// Intervals making up the clique.
    pub fn intervals(&self) -> &'a [Interval] {
        self.intervals
    }

    /// Number of intervals.
    pub fn segcount(&self) -> usize {
        self.intervals.len()
    }

    /// Check if vertex `v` is a member.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.intervals.iter().any(|iv| iv.contains(v))
    }

    /// Check if edge `(u, v)` crosses the clique boundary.
    #[inline]
    pub fn crosses(&self, u: usize, v: usize) -> bool {
        self.contains(u) != self.contains(v)
    }

    /// Expand into vertices, in interval order.
    ///
    /// Negative bounds are clamped away.
    pub fn vertices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for iv in self.intervals {
            let lo = iv.lo.max(0);
            if iv.hi < lo {
                continue;
            }
            out.extend((lo as usize)..=(iv.hi as usize));
        }
        out
    }
}

/// Compress a vertex set into sorted, maximal intervals.
///
/// Fails on a vertex id that does not fit an `i32` bound.
pub fn intervals_from_vertices(vertices: &[usize]) -> SepResult<Vec<Interval>> {
    let mut sorted = vertices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut out: Vec<Interval> = Vec::new();
    for v in sorted {
        let v = i32::try_from(v).map_err(|_| {
            SepError::InvalidInput(format!("vertex {} does not fit an interval bound", v))
        })?;
        match out.last_mut() {
            Some(last) if last.hi.checked_add(1) == Some(v) => last.hi = v,
            _ => out.push(Interval::point(v)),
        }
    }
    Ok(out)
}
