//! Truncation policies that bound response size.
//!
//! Two policies, kept deliberately separate:
//!
//! - [`top_n`] keeps a prefix (peak search).
//! - [`head_tail`] keeps both ends of a long list (route steps).

/// Number of peaks returned by a peak search.
pub const PEAK_LIMIT: usize = 3;

/// Route steps kept from the start of a long route.
pub const STEP_HEAD: usize = 5;

/// Route steps kept from the end of a long route.
pub const STEP_TAIL: usize = 5;

/// Routes with more steps than this are truncated.
pub const STEP_THRESHOLD: usize = 10;

/// Keep the first `n` items, in their original order.
///
/// # Example
///
/// ```
/// use wayfinder::shape::top_n;
///
/// assert_eq!(top_n(vec![1, 2, 3, 4, 5, 6, 7], 3), vec![1, 2, 3]);
/// assert_eq!(top_n(vec![1, 2], 3), vec![1, 2]);
/// ```
pub fn top_n<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    items.truncate(n);
    items
}

/// Keep the first `head` and last `tail` items once the list exceeds `threshold`.
///
/// Lists of `threshold` items or fewer, or too short to have a gap between
/// the two ends, come back unchanged.
///
/// # Example
///
/// ```
/// use wayfinder::shape::head_tail;
///
/// let steps: Vec<u32> = (0..12).collect();
/// assert_eq!(head_tail(steps, 5, 5, 10), vec![0, 1, 2, 3, 4, 7, 8, 9, 10, 11]);
/// ```
pub fn head_tail<T>(mut items: Vec<T>, head: usize, tail: usize, threshold: usize) -> Vec<T> {
    let len = items.len();
    if len <= threshold || head.saturating_add(tail) >= len {
        return items;
    }
    items.drain(head..len - tail);
    items
}

/// Apply the route-step policy: first [`STEP_HEAD`] and last [`STEP_TAIL`]
/// steps when there are more than [`STEP_THRESHOLD`].
pub fn route_steps<T>(steps: Vec<T>) -> Vec<T> {
    head_tail(steps, STEP_HEAD, STEP_TAIL, STEP_THRESHOLD)
}

/// Apply the peak policy: the first [`PEAK_LIMIT`] peaks.
pub fn peaks<T>(peaks: Vec<T>) -> Vec<T> {
    top_n(peaks, PEAK_LIMIT)
}
