//! Axis-aligned rectangles in XYWH form.

use super::coord::Coord;
use super::{Normalized, Pixel};

/// An axis-aligned rectangle stored as top-left corner plus extent.
///
/// The `TSpace` parameter is one of the marker types in [`space`](super::space).
///
/// Note: the constructor does NOT enforce positive extents. Merge padding and
/// in-progress draws produce transient rectangles with negative origins or
/// negative extents; callers that surface a rectangle check
/// [`Rect::has_positive_extent`] first.
#[derive(Clone, Copy, PartialEq)]
pub struct Rect<TSpace> {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    _space: std::marker::PhantomData<TSpace>,
}

impl<TSpace> Rect<TSpace> {
    /// Creates a rectangle from its top-left corner and extent.
    #[inline]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            _space: std::marker::PhantomData,
        }
    }

    /// Creates a rectangle from explicit edges.
    #[inline]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Creates the normalized (non-negative extent) rectangle spanned by two
    /// opposite corners, in any order.
    pub fn from_corners(a: Coord<TSpace>, b: Coord<TSpace>) -> Self {
        Self::from_edges(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Returns the right edge (`x + w`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Returns the bottom edge (`y + h`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Returns the center point.
    #[inline]
    pub fn center(&self) -> Coord<TSpace> {
        Coord::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Returns `h / w`.
    ///
    /// Infinite or NaN for zero-width rectangles.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.h / self.w
    }

    /// Returns true if all values are finite and both extents are > 0.
    #[inline]
    pub fn has_positive_extent(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && self.w > 0.0
            && self.h > 0.0
    }

    /// Returns true if `point` lies inside or on the border.
    pub fn contains(&self, point: &Coord<TSpace>) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Returns true if the two rectangles overlap or touch along an edge.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Grows each side independently.
    pub fn expand(&self, left: f64, right: f64, upper: f64, lower: f64) -> Self {
        Self::from_edges(
            self.x - left,
            self.y - upper,
            self.right() + right,
            self.bottom() + lower,
        )
    }

    /// Grows every side by `p`: `x -= p; y -= p; w += 2p; h += 2p`.
    pub fn pad(&self, p: f64) -> Self {
        Self::new(self.x - p, self.y - p, self.w + 2.0 * p, self.h + 2.0 * p)
    }

    /// Returns the smallest rectangle covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Moves the rectangle without changing its extent.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Returns the top-left corner.
    #[inline]
    pub fn origin(&self) -> Coord<TSpace> {
        Coord::new(self.x, self.y)
    }
}

impl<TSpace> std::fmt::Debug for Rect<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rect")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

impl<TSpace> Default for Rect<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Rect<Pixel> {
    /// Converts pixel geometry to normalized geometry.
    ///
    /// # Arguments
    /// * `image_width` - The width of the image in pixels
    /// * `image_height` - The height of the image in pixels
    pub fn to_normalized(&self, image_width: f64, image_height: f64) -> Rect<Normalized> {
        Rect::new(
            self.x / image_width,
            self.y / image_height,
            self.w / image_width,
            self.h / image_height,
        )
    }
}

impl Rect<Normalized> {
    /// Returns `[x_center, y_center, width, height]`, each clamped to `[0, 1]`.
    ///
    /// NaN and negative zero both map to `0.0`.
    pub fn clamped_cxcywh(&self) -> [f64; 4] {
        let center = self.center();
        [center.x, center.y, self.w, self.h].map(|v| if v > 0.0 { v.min(1.0) } else { 0.0 })
    }
}
