//! Merge report types.
//!
//! Summarizes what a filter/merge pass did with each raw component so the
//! CLI can print it and tests can assert on it.

use serde::Serialize;
use std::fmt;

/// Counts produced by one [`merge_regions`](super::merge_regions) pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Raw components examined.
    pub components: usize,
    /// Components accepted as primary candidates (one output box each).
    pub primaries: usize,
    /// Diacritic candidates absorbed into a primary.
    pub diacritics_merged: usize,
    /// Diacritic candidates no primary claimed; dropped.
    pub orphan_diacritics: usize,
    /// Components matching neither predicate; dropped.
    pub rejected: usize,
}

impl MergeReport {
    /// Number of output boxes.
    pub fn boxes(&self) -> usize {
        self.primaries
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Merged {} component(s) into {} box(es):",
            self.components,
            self.boxes()
        )?;
        writeln!(f, "  primaries:          {}", self.primaries)?;
        writeln!(f, "  diacritics merged:  {}", self.diacritics_merged)?;
        writeln!(f, "  orphan diacritics:  {}", self.orphan_diacritics)?;
        writeln!(f, "  rejected:           {}", self.rejected)
    }
}
