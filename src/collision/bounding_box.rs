//! Current-state collision check
//!
//! Axis-aligned bounding boxes, compared pairwise. No spatial index: every
//! unordered pair is tested exactly once.

use crate::types::geometry::Rect;

/// Interval overlap on one axis.
///
/// The interval with the smaller minimum is taken as `first`; the two
/// overlap iff `first` ends strictly after `second` starts.
pub fn intervals_overlap(a: (f64, f64), b: (f64, f64)) -> bool {
    let a = (a.0.min(a.1), a.0.max(a.1));
    let b = (b.0.min(b.1), b.0.max(b.1));
    let (first, second) = if a.0 <= b.0 { (a, b) } else { (b, a) };
    first.1 > second.0
}

/// True when the two boxes overlap on both axes.
pub fn bounding_box_overlap(a: &Rect, b: &Rect) -> bool {
    intervals_overlap(a.x_interval(), b.x_interval())
        && intervals_overlap(a.y_interval(), b.y_interval())
}

/// All overlapping unordered pairs `(i, j)` with `i < j`.
pub fn overlapping_pairs(boxes: &[Rect]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            if bounding_box_overlap(&boxes[i], &boxes[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}
