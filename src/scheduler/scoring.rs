//! Scoring functions used by the presolver (task pressure, for heap seeding
//! and re-seeding) and the placement loop (per-slot composite score).
//!
//! # Reference
//! `calculate_overlap_metric` and the per-slot weighting scheme are ported
//! from `missminutes.constraint_solver`; the three composite weights below
//! are this crate's own tuning constants (the original scores slots by
//! overlap alone) kept private since spec.md treats their exact values as
//! an implementation detail covered by regression tests, not a public
//! contract.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Interval, IntervalDomain};

const WEIGHT_OVERLAP: f64 = 0.4;
const WEIGHT_LENGTH_FIT: f64 = 0.3;
const WEIGHT_DEADLINE: f64 = 1.0;

/// How much of a task's eligible time is already contended by other tasks'
/// eligible time, as a weighted average. `domain` is always a subset of the
/// domain that contributed to `overlap` (every task's own domain is one of
/// the summands of `overlap`), so the intersection of the two is simply
/// `domain` itself and the formula reduces to a weighted average of
/// `overlap` over `domain`'s support.
pub(crate) fn overlap_metric(domain: &IntervalDomain, overlap: &IntervalDomain) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (iv, _) in domain.iter_atomic() {
        weighted += overlap.weighted_time_within(iv);
        total += iv.duration().num_seconds() as f64;
    }
    if total <= 0.0 {
        0.0
    } else {
        weighted / total
    }
}

/// A task's scheduling pressure: how contended its remaining eligible time
/// is, scaled by how much of that time it still needs.
pub(crate) fn pressure(domain: &IntervalDomain, overlap: &IntervalDomain, remaining: Duration) -> f64 {
    let total_seconds = domain.total_time().num_seconds() as f64;
    if total_seconds <= 0.0 {
        return 0.0;
    }
    overlap_metric(domain, overlap) * remaining.num_seconds() as f64 / total_seconds
}

fn overlap_score(slot: Interval, overlap: &IntervalDomain) -> f64 {
    let slot_seconds = slot.duration().num_seconds() as f64;
    if slot_seconds <= 0.0 {
        return 0.0;
    }
    overlap.weighted_time_within(slot) / slot_seconds
}

fn length_fit_score(slot: Interval, ideal: Duration) -> f64 {
    let ideal_seconds = ideal.num_seconds() as f64;
    if ideal_seconds <= 0.0 {
        return 0.0;
    }
    let slot_seconds = slot.duration().num_seconds() as f64;
    ((slot_seconds - ideal_seconds) / ideal_seconds).abs()
}

/// `1 / max(1 day, due - slot.hi)`, in days. A task with no due date is
/// treated as infinitely far from its deadline, i.e. a score of zero.
fn deadline_proximity_score(slot: Interval, due: Option<DateTime<Utc>>) -> f64 {
    match due {
        None => 0.0,
        Some(due) => {
            let days_to_due = (due - slot.hi).num_seconds() as f64 / 86_400.0;
            1.0 / days_to_due.max(1.0)
        }
    }
}

/// The composite slot score the placement loop sorts candidate atomic
/// slots by, ascending — lower is tried first. Weighted overlap favors
/// placing into less-contended time, leaving contended time free for other
/// tasks; weighted length-fit favors slots close to the task's ideal
/// session length; weighted deadline proximity favors slots with slack
/// before the task's due date over slots hugging it.
pub(crate) fn composite(slot: Interval, overlap: &IntervalDomain, ideal_length: Duration, due: Option<DateTime<Utc>>) -> f64 {
    WEIGHT_OVERLAP * overlap_score(slot, overlap)
        + WEIGHT_LENGTH_FIT * length_fit_score(slot, ideal_length)
        + WEIGHT_DEADLINE * deadline_proximity_score(slot, due)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, 0, 0).unwrap()
    }

    #[test]
    fn overlap_metric_of_disjoint_domain_is_zero() {
        let domain = IntervalDomain::single(Interval::new(t(9), t(10)), 1);
        let overlap = IntervalDomain::single(Interval::new(t(14), t(15)), 5);
        assert_eq!(overlap_metric(&domain, &overlap), 0.0);
    }

    #[test]
    fn overlap_metric_matches_weight_when_fully_covered() {
        let domain = IntervalDomain::single(Interval::new(t(9), t(10)), 1);
        let overlap = IntervalDomain::single(Interval::new(t(9), t(10)), 3);
        assert_eq!(overlap_metric(&domain, &overlap), 3.0);
    }

    #[test]
    fn deadline_proximity_is_zero_with_no_due_date() {
        let slot = Interval::new(t(9), t(10));
        assert_eq!(deadline_proximity_score(slot, None), 0.0);
    }

    #[test]
    fn deadline_proximity_increases_as_due_date_nears() {
        let slot = Interval::new(t(9), t(10));
        let far = deadline_proximity_score(slot, Some(t(10) + Duration::days(10)));
        let near = deadline_proximity_score(slot, Some(t(10) + Duration::hours(2)));
        assert!(near > far);
    }

    #[test]
    fn length_fit_is_zero_at_the_ideal_length() {
        let slot = Interval::new(t(9), t(10));
        assert_eq!(length_fit_score(slot, Duration::hours(1)), 0.0);
    }
}
