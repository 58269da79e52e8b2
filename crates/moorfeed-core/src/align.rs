//! Nearest-neighbour alignment of sorted series.
//!
//! Observation timestamps from the external feeds never land exactly on the
//! engineering tables' `hdrtime` grid, so uploads match each grid time to
//! the nearest observation within a tolerance. The functions here are
//! generic over any ordered, subtractable element type; in practice that is
//! `chrono::NaiveDateTime` (distances are `TimeDelta`) and integers in
//! tests.

use std::cmp::Ordering;
use std::ops::Sub;

/// Absolute distance between two ordered values without requiring a
/// signed/`abs` bound on the difference type.
fn distance<T, D>(a: T, b: T) -> D
where
    T: Copy + PartialOrd + Sub<Output = D>,
{
    if a >= b { a - b } else { b - a }
}

/// Finds the value closest to `pivot` in a sorted slice.
///
/// Uses binary search, then compares the two neighbouring candidates. Ties
/// resolve to the earlier (smaller) value. Returns `None` only for an empty
/// slice.
///
/// # Examples
///
/// ```
/// use moorfeed_core::align::find_closest;
///
/// let sorted = [10i64, 20, 30];
/// assert_eq!(find_closest(&sorted, 24), Some(20));
/// assert_eq!(find_closest(&sorted, 26), Some(30));
/// assert_eq!(find_closest(&sorted, -5), Some(10));
/// assert_eq!(find_closest::<i64, i64>(&[], 1), None);
/// ```
pub fn find_closest<T, D>(sorted: &[T], pivot: T) -> Option<T>
where
    T: Copy + PartialOrd + Sub<Output = D>,
    D: PartialOrd,
{
    if sorted.is_empty() {
        return None;
    }
    let idx = sorted.partition_point(|x| *x < pivot);
    if idx == 0 {
        return Some(sorted[0]);
    }
    if idx == sorted.len() {
        return Some(sorted[idx - 1]);
    }
    let before = sorted[idx - 1];
    let after = sorted[idx];
    if distance(pivot, before) <= distance(after, pivot) {
        Some(before)
    } else {
        Some(after)
    }
}

/// Finds the value closest to `pivot`, but only if it lies within
/// `max_dist` of the pivot.
pub fn closest_within<T, D>(sorted: &[T], pivot: T, max_dist: D) -> Option<T>
where
    T: Copy + PartialOrd + Sub<Output = D>,
    D: PartialOrd,
{
    let nearest = find_closest(sorted, pivot)?;
    if distance(nearest, pivot) <= max_dist {
        Some(nearest)
    } else {
        None
    }
}

/// Aligns every pivot to its nearest search value.
///
/// For each element of `pivots`, returns the closest element of `search`
/// (within `max_dist`, when given). The output always has one entry per
/// pivot; unmatched pivots yield `None`. `search` does not need to be
/// pre-sorted — it is copied and stably sorted internally.
///
/// # Examples
///
/// ```
/// use moorfeed_core::align::align;
///
/// let observations = [100i64, 200, 305];
/// let grid = [95, 210, 400];
/// assert_eq!(
///     align(&observations, &grid, Some(20)),
///     vec![Some(100), Some(200), None]
/// );
/// ```
pub fn align<T, D>(search: &[T], pivots: &[T], max_dist: Option<D>) -> Vec<Option<T>>
where
    T: Copy + PartialOrd + Sub<Output = D>,
    D: PartialOrd + Copy,
{
    let mut sorted = search.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    pivots
        .iter()
        .map(|&p| match max_dist {
            Some(d) => closest_within(&sorted, p, d),
            None => find_closest(&sorted, p),
        })
        .collect()
}
