//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! between different coordinate systems at compile time.

use std::fmt;

/// Marker type for source-image pixel coordinates.
///
/// (0, 0) is the top-left corner of the scanned page. All box geometry,
/// merge tolerances and editor size limits are expressed in this space.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for normalized coordinates (0.0 to 1.0).
///
/// Used only on the export path, where pixel quantities are divided by the
/// image dimensions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

/// Marker type for viewport (screen) coordinates.
///
/// Pointer events arrive in this space and must go through
/// [`Viewport::to_image`](crate::editor::Viewport::to_image) before they are
/// compared against box geometry.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Pixel has no variants
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Normalized has no variants
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
