//! Typed coordinate values using PhantomData for compile-time safety.

use std::marker::PhantomData;

/// A 2D point with a type-level marker for the coordinate space.
///
/// The `TSpace` parameter is one of [`Pixel`](super::Pixel),
/// [`Normalized`](super::Normalized) or [`Screen`](super::Screen), so a raw
/// pointer position can never be compared against box geometry without
/// going through the viewport mapping first.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns `(self.x - other.x, self.y - other.y)`.
    #[inline]
    pub fn delta(&self, other: &Self) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TSpace> Default for Coord<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
