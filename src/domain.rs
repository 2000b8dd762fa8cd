//! The interval domain: a weighted, piecewise-constant function from wall
//! clock time to a non-negative integer weight, represented as an ordered,
//! disjoint list of `(Interval, weight)` pairs.
//!
//! This is the load-bearing data structure of the solver. Every constraint —
//! a task's eligibility window, an event carving out busy time, the summed
//! demand pressure across all tasks — is an `IntervalDomain`, and every
//! placement decision reduces to algebra on these values.
//!
//! # Reference
//!
//! Operation semantics are ported directly from the `TimeDomain` class in
//! the original Python implementation this crate's scheduling model is
//! based on, which in turn wraps an interval-to-value map (there: a
//! `portion.IntervalDict`). No such crate is used here: all operations are a
//! single linear merge-walk over two sorted piece lists, which is both
//! simpler and asymptotically no worse for the piece counts this solver
//! produces.

use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;

/// A half-open-like wall-clock interval `[lo, hi)`. `lo == hi` is a
/// degenerate, zero-length interval and is never produced by any operation
/// on [`IntervalDomain`] (zero-length pieces are dropped during combination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    pub lo: DateTime<Utc>,
    pub hi: DateTime<Utc>,
}

impl Interval {
    /// Construct an interval. `lo` must not exceed `hi`; callers that accept
    /// external input should validate this themselves (see
    /// [`crate::validation`]) rather than relying on a panic here.
    pub fn new(lo: DateTime<Utc>, hi: DateTime<Utc>) -> Self {
        debug_assert!(lo <= hi, "interval lo must not exceed hi");
        Interval { lo, hi }
    }

    pub fn duration(&self) -> Duration {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.lo >= self.hi
    }

    /// Two intervals overlap when they share more than a single instant.
    /// Matches the solver's "ending exactly where another starts is not a
    /// conflict" tie-break rule.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.lo < other.hi && other.lo < self.hi
    }

    /// The overlap of two intervals, if any (strict, non-degenerate).
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        if lo < hi {
            Some(Interval { lo, hi })
        } else {
            None
        }
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lo.cmp(&other.lo).then_with(|| self.hi.cmp(&other.hi))
    }
}

/// An ordered, disjoint set of weighted intervals.
///
/// Invariants maintained by every public constructor/combinator:
/// - pieces are sorted ascending by `lo`
/// - pieces are pairwise disjoint (no two overlap, and adjacent pieces with
///   equal weight are coalesced into one)
/// - every piece has non-zero length
///
/// A piece's weight *may* be zero: [`IntervalDomain::subtract`] only ever
/// decrements weight within the receiver's own support and never drops a
/// key, so a region that has been fully claimed still counts toward
/// [`IntervalDomain::total_time`] even though it no longer contributes to
/// [`IntervalDomain::total_weighted_time_seconds`]. Only [`IntervalDomain::remove`]
/// and [`IntervalDomain::difference`] drop support outright.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalDomain {
    pieces: Vec<(Interval, u32)>,
}

impl IntervalDomain {
    pub fn empty() -> Self {
        IntervalDomain { pieces: Vec::new() }
    }

    /// A domain with a single weighted interval. A zero-length interval
    /// produces the empty domain.
    pub fn single(iv: Interval, weight: u32) -> Self {
        if iv.is_empty() {
            IntervalDomain::empty()
        } else {
            IntervalDomain { pieces: vec![(iv, weight)] }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Iterate the atomic (maximal, disjoint) pieces in ascending order.
    pub fn iter_atomic(&self) -> impl Iterator<Item = (Interval, u32)> + '_ {
        self.pieces.iter().copied()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Sum of piece durations, independent of weight (zero-weight pieces
    /// still count — see the type-level note on why).
    pub fn total_time(&self) -> Duration {
        self.pieces.iter().fold(Duration::zero(), |acc, (iv, _)| acc + iv.duration())
    }

    /// Σ weight · duration over every piece, in seconds.
    pub fn total_weighted_time_seconds(&self) -> f64 {
        self.pieces
            .iter()
            .map(|(iv, w)| *w as f64 * iv.duration().num_seconds() as f64)
            .sum()
    }

    /// Σ weight · |overlap with `iv`| over every piece, in seconds. Used by
    /// the placement loop's overlap score without materializing an
    /// intersection domain.
    pub fn weighted_time_within(&self, iv: Interval) -> f64 {
        self.pieces
            .iter()
            .filter_map(|(piece, w)| piece.intersect(&iv).map(|ov| *w as f64 * ov.duration().num_seconds() as f64))
            .sum()
    }

    /// Pointwise sum of weights. Used to build the demand-overlap domain `O`
    /// from every task's eligibility domain.
    pub fn add(&self, other: &IntervalDomain) -> IntervalDomain {
        self.combine(other, |a, b| match (a, b) {
            (Some(x), Some(y)) => Some(x + y),
            (Some(x), None) => Some(x),
            (None, Some(y)) => Some(y),
            (None, None) => None,
        })
    }

    /// Decrement this domain's weights by `other`'s, saturating at zero.
    /// Restricted to `self`'s support: never introduces a key that wasn't
    /// already present.
    pub fn subtract(&self, other: &IntervalDomain) -> IntervalDomain {
        self.combine(other, |a, b| match (a, b) {
            (Some(x), Some(y)) => Some(x.saturating_sub(y)),
            (Some(x), None) => Some(x),
            (None, _) => None,
        })
    }

    /// Union of supports, keeping `self`'s weight wherever `self` has
    /// support at all and falling back to `other`'s weight elsewhere.
    pub fn union(&self, other: &IntervalDomain) -> IntervalDomain {
        self.combine(other, |a, b| match (a, b) {
            (Some(x), _) => Some(x),
            (None, Some(y)) => Some(y),
            (None, None) => None,
        })
    }

    /// Restrict `self` to the instants where `other` also has support,
    /// keeping `self`'s weight.
    pub fn intersection(&self, other: &IntervalDomain) -> IntervalDomain {
        self.combine(other, |a, b| match (a, b) {
            (Some(x), Some(_)) => Some(x),
            _ => None,
        })
    }

    /// Remove from `self`'s support every instant where `other` has
    /// support, regardless of `other`'s weight.
    pub fn difference(&self, other: &IntervalDomain) -> IntervalDomain {
        self.combine(other, |a, b| match (a, b) {
            (Some(x), None) => Some(x),
            _ => None,
        })
    }

    /// Restrict support to `[from, +inf)`. A piece straddling `from` is
    /// clipped rather than dropped; its weight is unchanged.
    pub fn trim_left(&self, from: DateTime<Utc>) -> IntervalDomain {
        let mut out = Vec::with_capacity(self.pieces.len());
        for (iv, w) in &self.pieces {
            let new_lo = iv.lo.max(from);
            if new_lo < iv.hi {
                out.push((Interval::new(new_lo, iv.hi), *w));
            }
        }
        IntervalDomain { pieces: coalesce(out) }
    }

    /// Restrict support to `(-inf, until]`. Symmetric to [`trim_left`](Self::trim_left).
    pub fn trim_right(&self, until: DateTime<Utc>) -> IntervalDomain {
        let mut out = Vec::with_capacity(self.pieces.len());
        for (iv, w) in &self.pieces {
            let new_hi = iv.hi.min(until);
            if iv.lo < new_hi {
                out.push((Interval::new(iv.lo, new_hi), *w));
            }
        }
        IntervalDomain { pieces: coalesce(out) }
    }

    /// Drop the portion of support covered by `iv` outright, splitting a
    /// straddled piece into its left and right remainders (same weight).
    pub fn remove(&self, iv: Interval) -> IntervalDomain {
        let mut out = Vec::with_capacity(self.pieces.len() + 1);
        for (piece, w) in &self.pieces {
            if !piece.overlaps(&iv) {
                out.push((*piece, *w));
                continue;
            }
            if piece.lo < iv.lo {
                out.push((Interval::new(piece.lo, iv.lo.min(piece.hi)), *w));
            }
            if piece.hi > iv.hi {
                out.push((Interval::new(iv.hi.max(piece.lo), piece.hi), *w));
            }
        }
        IntervalDomain { pieces: coalesce(out) }
    }

    /// Drop every piece shorter than `min_len`. Used before scoring to
    /// enforce a task's effective minimum session length.
    pub fn prune_shorter_than(&self, min_len: Duration) -> IntervalDomain {
        IntervalDomain {
            pieces: self.pieces.iter().filter(|(iv, _)| iv.duration() >= min_len).copied().collect(),
        }
    }

    fn combine(&self, other: &IntervalDomain, f: impl Fn(Option<u32>, Option<u32>) -> Option<u32>) -> IntervalDomain {
        let boundaries = merge_boundaries(&self.pieces, &other.pieces);
        let mut out = Vec::with_capacity(boundaries.len());
        let mut ia = 0usize;
        let mut ib = 0usize;
        for w in boundaries.windows(2) {
            let seg = Interval::new(w[0], w[1]);
            let wa = weight_covering(&self.pieces, &mut ia, seg);
            let wb = weight_covering(&other.pieces, &mut ib, seg);
            if let Some(weight) = f(wa, wb) {
                out.push((seg, weight));
            }
        }
        IntervalDomain { pieces: coalesce(out) }
    }
}

fn merge_boundaries(a: &[(Interval, u32)], b: &[(Interval, u32)]) -> Vec<DateTime<Utc>> {
    let mut points = Vec::with_capacity(2 * (a.len() + b.len()));
    for (iv, _) in a {
        points.push(iv.lo);
        points.push(iv.hi);
    }
    for (iv, _) in b {
        points.push(iv.lo);
        points.push(iv.hi);
    }
    points.sort();
    points.dedup();
    points
}

/// Find the weight of the piece that fully contains `seg`, advancing `idx`
/// monotonically. Valid only when `seg`'s bounds are themselves boundary
/// points of `pieces` (guaranteed by `merge_boundaries`), so `seg` is either
/// fully inside exactly one piece or inside none.
fn weight_covering(pieces: &[(Interval, u32)], idx: &mut usize, seg: Interval) -> Option<u32> {
    while *idx < pieces.len() && pieces[*idx].0.hi <= seg.lo {
        *idx += 1;
    }
    if *idx < pieces.len() {
        let (iv, w) = pieces[*idx];
        if iv.lo <= seg.lo && seg.hi <= iv.hi {
            return Some(w);
        }
    }
    None
}

fn coalesce(mut pieces: Vec<(Interval, u32)>) -> Vec<(Interval, u32)> {
    pieces.sort_by_key(|(iv, _)| iv.lo);
    let mut out: Vec<(Interval, u32)> = Vec::with_capacity(pieces.len());
    for (iv, w) in pieces {
        if iv.is_empty() {
            continue;
        }
        if let Some(last) = out.last_mut() {
            if last.0.hi == iv.lo && last.1 == w {
                last.0.hi = iv.hi;
                continue;
            }
        }
        out.push((iv, w));
    }
    out
}
