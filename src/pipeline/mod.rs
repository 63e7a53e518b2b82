//! Detection pipeline over an external image-processing library.
//!
//! Decoding, thresholding, morphology and connected-component labeling are
//! not implemented here. They are reached through [`ImageProcessor`], and
//! [`run_detection`] sequences the calls:
//!
//! ```text
//! crop -> binarize -> open/close -> dilate -> connected components -> merge
//! ```
//!
//! Each stage is awaited before the next starts. The first failure aborts
//! the run and nothing is returned, so a caller's working set is only ever
//! replaced by the output of a complete run.

use crate::error::{InputError, ProcessingError, ScanlabelError};
use crate::ir::{BoundingBox, RawComponent};
use crate::merge::merge_regions;
use crate::settings::Settings;

/// Pixel connectivity used for component labeling.
pub const CONNECTIVITY: u8 = 8;

/// A crop rectangle in source-image pixels with a positive extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl CropRect {
    /// Returns `None` for a zero-width or zero-height crop.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Builds a crop from possibly signed, possibly inverted corner input
    /// (e.g. a rubber-band selection). Returns `None` when it degenerates.
    pub fn from_signed(x: i64, y: i64, width: i64, height: i64) -> Option<Self> {
        let (left, right) = (x.min(x + width), x.max(x + width));
        let (top, bottom) = (y.min(y + height), y.max(y + height));
        let left = u32::try_from(left.max(0)).ok()?;
        let top = u32::try_from(top.max(0)).ok()?;
        let right = u32::try_from(right.max(0)).ok()?;
        let bottom = u32::try_from(bottom.max(0)).ok()?;
        Self::new(left, top, right.checked_sub(left)?, bottom.checked_sub(top)?)
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fails unless the crop lies entirely inside a `width x height` image.
    pub fn check_within(&self, image_width: u32, image_height: u32) -> Result<(), InputError> {
        let fits = u64::from(self.x) + u64::from(self.width) <= u64::from(image_width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(image_height);
        if fits {
            Ok(())
        } else {
            Err(InputError::CropOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                image_width,
                image_height,
            })
        }
    }
}

/// The image-processing collaborator.
///
/// Implementations own their image representation. Stage failures are
/// reported as [`ProcessingError`] and tagged with the stage name.
#[allow(async_fn_in_trait)]
pub trait ImageProcessor {
    type Image;

    /// `(width, height)` of `image`; `(0, 0)` if there is no usable image.
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    async fn crop(&self, image: &Self::Image, rect: CropRect) -> Result<Self::Image, ProcessingError>;

    /// Grayscale conversion plus adaptive mean thresholding.
    async fn binarize(
        &self,
        image: &Self::Image,
        block_size: u32,
        constant: f64,
    ) -> Result<Self::Image, ProcessingError>;

    async fn morphology_open_close(
        &self,
        image: &Self::Image,
        open_width: u32,
        close_width: u32,
    ) -> Result<Self::Image, ProcessingError>;

    async fn dilate(&self, image: &Self::Image, width: u32) -> Result<Self::Image, ProcessingError>;

    /// Component statistics; index 0 is the background.
    async fn connected_components(
        &self,
        image: &Self::Image,
        connectivity: u8,
    ) -> Result<Vec<RawComponent>, ProcessingError>;
}

/// Strips the background component from a labeling result.
pub fn foreground_components(components: &[RawComponent]) -> &[RawComponent] {
    components.get(1..).unwrap_or(&[])
}

/// Runs one detection pass and returns boxes in source-image coordinates.
///
/// When `crop` is given, only that region is processed and the resulting
/// boxes are shifted back by the crop origin.
pub async fn run_detection<P: ImageProcessor>(
    processor: &P,
    image: &P::Image,
    crop: Option<CropRect>,
    settings: &Settings,
) -> Result<Vec<BoundingBox>, ScanlabelError> {
    let (width, height) = processor.dimensions(image);
    if width == 0 || height == 0 {
        return Err(InputError::MissingImage.into());
    }

    let cropped;
    let (source, origin) = match crop {
        Some(rect) => {
            rect.check_within(width, height)?;
            tracing::debug!(?rect, "cropping");
            cropped = processor.crop(image, rect).await?;
            (&cropped, (rect.x() as f64, rect.y() as f64))
        }
        None => (image, (0.0, 0.0)),
    };

    tracing::debug!(
        block_size = settings.binarize.block_size,
        constant = settings.binarize.constant,
        "binarizing"
    );
    let binary = processor
        .binarize(source, settings.binarize.block_size, settings.binarize.constant)
        .await?;

    let cleaned = processor
        .morphology_open_close(
            &binary,
            settings.morphology.open_width,
            settings.morphology.close_width,
        )
        .await?;

    let dilated = processor
        .dilate(&cleaned, settings.detection.dilation_width)
        .await?;

    let components = processor
        .connected_components(&dilated, CONNECTIVITY)
        .await?;
    tracing::debug!(labels = components.len(), "components labeled");

    let outcome = merge_regions(foreground_components(&components), &settings.merge_params());
    tracing::info!(
        boxes = outcome.report.boxes(),
        merged = outcome.report.diacritics_merged,
        orphans = outcome.report.orphan_diacritics,
        rejected = outcome.report.rejected,
        "detection complete"
    );

    let (dx, dy) = origin;
    let boxes = outcome
        .boxes
        .into_iter()
        .map(|mut b| {
            let shifted = b.rect().translate(dx, dy);
            b.set_rect(shifted);
            b
        })
        .collect();
    Ok(boxes)
}
