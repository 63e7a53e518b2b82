//! Region filter and diacritic merge.
//!
//! Turns raw connected-component statistics into text-unit boxes:
//! components large and square enough become primaries, small nearby
//! components (dots, accents, hamzas) are folded into the primary they
//! touch, and every resulting box is padded uniformly.
//!
//! # Claim order
//!
//! Primaries are processed in input order and a diacritic belongs to the
//! first primary whose padded reach touches it. When two primaries could
//! both claim the same diacritic, the earlier one wins; there is no
//! distance-based priority.

mod report;

pub use report::MergeReport;

use std::collections::HashSet;

use crate::ir::{BoundingBox, BoxClass, Pixel, RawComponent, Rect};

/// Thresholds for one merge pass, snapshotted from [`Settings`](crate::settings::Settings).
#[derive(Clone, Debug, PartialEq)]
pub struct MergeParams {
    /// Primary area must be strictly above this.
    pub area_lower: u64,
    /// Primary area must be strictly below this.
    pub area_upper: u64,
    /// Primary `h/w` and `w/h` must both be strictly below this.
    pub aspect_bound: f64,
    /// Diacritic area must be strictly above this (and below `area_lower`).
    pub overlap_area_lower: u64,
    /// Diacritic `h/w` and `w/h` must both be strictly below this.
    pub overlap_aspect_bound: f64,
    pub tolerance_left: f64,
    pub tolerance_right: f64,
    pub tolerance_upper: f64,
    pub tolerance_lower: f64,
    /// Uniform padding applied to every merged extent.
    pub padding: f64,
}

impl Default for MergeParams {
    fn default() -> Self {
        crate::settings::Settings::default().merge_params()
    }
}

impl MergeParams {
    /// Returns true if `c` qualifies as a primary candidate.
    pub fn is_primary(&self, c: &RawComponent) -> bool {
        self.area_lower < c.area
            && c.area < self.area_upper
            && within_aspect(c, self.aspect_bound)
    }

    /// Returns true if `c` qualifies as a diacritic candidate.
    pub fn is_diacritic(&self, c: &RawComponent) -> bool {
        self.overlap_area_lower < c.area
            && c.area < self.area_lower
            && within_aspect(c, self.overlap_aspect_bound)
    }

    /// The primary's rectangle grown by the four directional tolerances.
    fn reach(&self, primary: &RawComponent) -> Rect<Pixel> {
        primary.rect().expand(
            self.tolerance_left,
            self.tolerance_right,
            self.tolerance_upper,
            self.tolerance_lower,
        )
    }
}

fn within_aspect(c: &RawComponent, bound: f64) -> bool {
    match c.aspect_ratio() {
        Some(aspect) => aspect < bound && aspect.recip() < bound,
        None => false,
    }
}

/// Result of a merge pass.
#[derive(Clone, Debug, Default)]
pub struct MergeOutcome {
    /// One box per primary, in primary order.
    pub boxes: Vec<BoundingBox>,
    pub report: MergeReport,
}

/// Filters raw components and merges diacritics into their primaries.
///
/// `components` must already exclude the background component. Box ids are
/// the 1-based position of the primary in `components`, so they are unique
/// within one pass but not stable across passes with different input.
///
/// The pass is side-effect free: consumed components are tracked in a
/// visited set, the input slice is never modified.
pub fn merge_regions(components: &[RawComponent], params: &MergeParams) -> MergeOutcome {
    let mut visited: HashSet<usize> = HashSet::new();
    let mut boxes = Vec::new();
    let mut report = MergeReport {
        components: components.len(),
        ..Default::default()
    };

    for (i, primary) in components.iter().enumerate() {
        if visited.contains(&i) || !params.is_primary(primary) {
            continue;
        }
        visited.insert(i);

        let reach = params.reach(primary);
        let mut extent = primary.rect();
        let mut absorbed = 0usize;

        for (j, candidate) in components.iter().enumerate() {
            if j == i || visited.contains(&j) || !params.is_diacritic(candidate) {
                continue;
            }
            let rect = candidate.rect();
            if reach.intersects(&rect) {
                visited.insert(j);
                extent = extent.union(&rect);
                absorbed += 1;
            }
        }

        let area = if absorbed == 0 { primary.area } else { 0 };
        let padded = extent.pad(params.padding);
        match BoundingBox::new((i + 1) as u64, padded, area, Some(BoxClass::DEFAULT)) {
            Some(b) => {
                boxes.push(b);
                report.primaries += 1;
                report.diacritics_merged += absorbed;
            }
            None => {
                tracing::warn!(component = i, ?padded, "padding collapsed a merged box, dropping");
                report.rejected += 1 + absorbed;
            }
        }
    }

    for (i, c) in components.iter().enumerate() {
        if visited.contains(&i) {
            continue;
        }
        if params.is_diacritic(c) {
            report.orphan_diacritics += 1;
        } else {
            report.rejected += 1;
        }
    }

    tracing::debug!(
        components = report.components,
        boxes = boxes.len(),
        merged = report.diacritics_merged,
        orphans = report.orphan_diacritics,
        rejected = report.rejected,
        "merge pass complete"
    );

    MergeOutcome { boxes, report }
}
