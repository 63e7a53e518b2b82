//! Letterboxed viewport mapping between screen and image pixels.

use crate::ir::{Coord, Pixel, Rect, Screen};

/// A uniformly scaled, centered view of the source image.
///
/// `scale = min(viewport_w / image_w, viewport_h / image_h)` and the image is
/// centered on both axes, so one of the two offsets is always zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    image_width: u32,
    image_height: u32,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    /// Fits an image into a viewport.
    ///
    /// Returns `None` if any dimension is zero or not finite.
    pub fn fit(viewport_width: f64, viewport_height: f64, image_width: u32, image_height: u32) -> Option<Self> {
        let usable = viewport_width.is_finite()
            && viewport_height.is_finite()
            && viewport_width > 0.0
            && viewport_height > 0.0
            && image_width > 0
            && image_height > 0;
        if !usable {
            return None;
        }
        let (iw, ih) = (image_width as f64, image_height as f64);
        let scale = (viewport_width / iw).min(viewport_height / ih);
        Some(Self {
            image_width,
            image_height,
            scale,
            offset_x: (viewport_width - iw * scale) / 2.0,
            offset_y: (viewport_height - ih * scale) / 2.0,
        })
    }

    /// A 1:1 viewport with no letterboxing, for headless use and tests.
    pub fn identity(image_width: u32, image_height: u32) -> Option<Self> {
        Self::fit(image_width as f64, image_height as f64, image_width, image_height)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Coord<Screen> {
        Coord::new(self.offset_x, self.offset_y)
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// `(screen - offset) / scale`.
    pub fn to_image(&self, p: Coord<Screen>) -> Coord<Pixel> {
        Coord::new((p.x - self.offset_x) / self.scale, (p.y - self.offset_y) / self.scale)
    }

    pub fn to_screen(&self, p: Coord<Pixel>) -> Coord<Screen> {
        Coord::new(p.x * self.scale + self.offset_x, p.y * self.scale + self.offset_y)
    }

    /// Maps box geometry onto the screen, for renderers.
    pub fn rect_to_screen(&self, r: &Rect<Pixel>) -> Rect<Screen> {
        let origin = self.to_screen(r.origin());
        Rect::new(origin.x, origin.y, r.w * self.scale, r.h * self.scale)
    }

    /// Converts a screen-space distance to image pixels.
    pub fn screen_distance_to_image(&self, d: f64) -> f64 {
        d / self.scale
    }
}
