//! The closed set of box classes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScanlabelError;

/// Semantic class of a labeled box.
///
/// A box carries at most one class; assigning a new one replaces the old.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoxClass {
    /// A base text unit (glyph, word or line, depending on the page).
    PrimarySubject,
    /// A secondary mark such as a stamp, signature or marginal note.
    SecondaryMark,
    /// A frame, border or decorative region.
    FrameRegion,
}

impl BoxClass {
    /// Every class, in declaration order.
    pub const ALL: [BoxClass; 3] = [
        BoxClass::PrimarySubject,
        BoxClass::SecondaryMark,
        BoxClass::FrameRegion,
    ];

    /// The class given to boxes produced by merging or drawing.
    pub const DEFAULT: BoxClass = BoxClass::PrimarySubject;

    /// Label written to the export file.
    pub fn label(&self) -> &'static str {
        match self {
            BoxClass::PrimarySubject => "PrimarySubject",
            BoxClass::SecondaryMark => "SecondaryMark",
            BoxClass::FrameRegion => "FrameRegion",
        }
    }

    /// Short name accepted on the command line.
    pub fn short_name(&self) -> &'static str {
        match self {
            BoxClass::PrimarySubject => "primary",
            BoxClass::SecondaryMark => "secondary",
            BoxClass::FrameRegion => "frame",
        }
    }
}

impl fmt::Display for BoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BoxClass {
    type Err = ScanlabelError;

    /// Accepts the export label or its short form (`primary`, `secondary`,
    /// `frame`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        BoxClass::ALL
            .into_iter()
            .find(|c| c.label().to_ascii_lowercase() == lowered || c.short_name() == lowered)
            .ok_or_else(|| {
                ScanlabelError::UnsupportedClass(format!(
                    "'{}' (supported: primary, secondary, frame)",
                    s
                ))
            })
    }
}
