//! Core box model for scanlabel.
//!
//! Raw connected-component statistics come in as [`RawComponent`]s; every
//! later stage (merge, editor, tagging, ordering, export) works on
//! [`BoundingBox`] values.

use serde::{Deserialize, Serialize};

use super::class::BoxClass;
use super::ids::BoxId;
use super::rect::Rect;
use super::space::Pixel;

/// One connected component as reported by the labeling collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComponent {
    /// Left edge in pixels.
    pub left: u32,
    /// Top edge in pixels.
    pub top: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of foreground pixels in the component.
    pub area: u64,
}

impl RawComponent {
    /// Creates a component from its statistics.
    pub fn new(left: u32, top: u32, width: u32, height: u32, area: u64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            area,
        }
    }

    /// Returns the component's bounding rectangle.
    pub fn rect(&self) -> Rect<Pixel> {
        Rect::new(
            self.left as f64,
            self.top as f64,
            self.width as f64,
            self.height as f64,
        )
    }

    /// Returns `height / width`, or `None` for a degenerate component.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.height as f64 / self.width as f64)
        }
    }
}

/// A labeled box in source-image pixel space.
///
/// Construction goes through [`BoundingBox::new`], which refuses rectangles
/// without a positive extent, so every live box has `w > 0 && h > 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoxRecord", into = "BoxRecord")]
pub struct BoundingBox {
    id: BoxId,
    rect: Rect<Pixel>,
    area: u64,
    class: Option<BoxClass>,
}

impl BoundingBox {
    /// Creates a box, or `None` if `rect` has a zero, negative or non-finite
    /// extent.
    ///
    /// `area` is the originating component's pixel count; pass 0 for
    /// synthetic boxes.
    pub fn new(
        id: impl Into<BoxId>,
        rect: Rect<Pixel>,
        area: u64,
        class: Option<BoxClass>,
    ) -> Option<Self> {
        rect.has_positive_extent().then(|| Self {
            id: id.into(),
            rect,
            area,
            class,
        })
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn rect(&self) -> Rect<Pixel> {
        self.rect
    }

    pub fn area(&self) -> u64 {
        self.area
    }

    pub fn class(&self) -> Option<BoxClass> {
        self.class
    }

    /// Returns the center point; derived, never stored.
    pub fn center(&self) -> super::Coord<Pixel> {
        self.rect.center()
    }

    /// Replaces the geometry.
    ///
    /// Returns false and leaves the box untouched when `rect` has no positive
    /// extent.
    pub fn set_rect(&mut self, rect: Rect<Pixel>) -> bool {
        if !rect.has_positive_extent() {
            return false;
        }
        self.rect = rect;
        true
    }

    /// Sets or clears the class. A box never holds more than one class.
    pub fn set_class(&mut self, class: Option<BoxClass>) {
        self.class = class;
    }

    /// Builder-style variant of [`BoundingBox::set_class`].
    pub fn with_class(mut self, class: Option<BoxClass>) -> Self {
        self.class = class;
        self
    }
}

/// Flat on-disk representation of a [`BoundingBox`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct BoxRecord {
    id: BoxId,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    #[serde(default)]
    area: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class: Option<BoxClass>,
}

impl TryFrom<BoxRecord> for BoundingBox {
    type Error = String;

    fn try_from(record: BoxRecord) -> Result<Self, Self::Error> {
        let rect = Rect::new(record.x, record.y, record.w, record.h);
        BoundingBox::new(record.id, rect, record.area, record.class).ok_or_else(|| {
            format!(
                "box {} has a non-positive extent ({}x{})",
                record.id, record.w, record.h
            )
        })
    }
}

impl From<BoundingBox> for BoxRecord {
    fn from(b: BoundingBox) -> Self {
        Self {
            id: b.id,
            x: b.rect.x,
            y: b.rect.y,
            w: b.rect.w,
            h: b.rect.h,
            area: b.area,
            class: b.class,
        }
    }
}
