//! Bulk class assignment.

use std::collections::{BTreeMap, BTreeSet};

use crate::ir::{BoundingBox, BoxClass, BoxId};

/// Sets (or clears, when `class` is `None`) the class of every box whose id
/// is in `ids`. Other boxes are untouched.
///
/// Returns the number of boxes that matched. Ids with no matching box are
/// ignored.
pub fn assign_class(
    boxes: &mut [BoundingBox],
    ids: &BTreeSet<BoxId>,
    class: Option<BoxClass>,
) -> usize {
    let mut matched = 0;
    for b in boxes.iter_mut().filter(|b| ids.contains(&b.id())) {
        b.set_class(class);
        matched += 1;
    }
    tracing::debug!(matched, requested = ids.len(), ?class, "class assigned");
    matched
}

/// Counts boxes per class; untagged boxes are counted under `None`.
pub fn class_histogram(boxes: &[BoundingBox]) -> BTreeMap<Option<BoxClass>, usize> {
    let mut counts = BTreeMap::new();
    for b in boxes {
        *counts.entry(b.class()).or_insert(0) += 1;
    }
    counts
}
