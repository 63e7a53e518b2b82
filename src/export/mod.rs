//! Export encoder for detection training data.
//!
//! # Wire Format
//!
//! UTF-8 CSV with a single header line followed by one record per box:
//!
//! ```text
//! filename,class,x_center,y_center,width,height
//! page-001.png,PrimarySubject,0.250000,0.125000,0.100000,0.050000
//! ```
//!
//! Coordinates are the box center and extent divided by the image width
//! and height, clamped to `[0, 1]` and printed with six decimals. Untagged
//! boxes get an empty class field. Records are `\n`-joined with no trailing
//! newline.
//!
//! # Ordering
//!
//! The encoder writes boxes in the order given. [`export_session`] applies
//! the usual preparation first: drop excluded boxes, then sort into reading
//! order.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{ExportError, ScanlabelError};
use crate::ir::{BoundingBox, BoxId};
use crate::order::reading_order;

/// A single record in the export file.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    filename: &'a str,
    class: &'static str,
    x_center: String,
    y_center: String,
    width: String,
    height: String,
}

/// Encodes `boxes`, in the given order, for an image of the given size.
///
/// # Errors
/// - [`ExportError::NoBoxes`] if `boxes` is empty; a header-only file is
///   never produced.
/// - [`ExportError::DimensionsUnavailable`] if either dimension is zero.
pub fn encode_export(
    filename: &str,
    boxes: &[BoundingBox],
    image_width: u32,
    image_height: u32,
) -> Result<String, ExportError> {
    if image_width == 0 || image_height == 0 {
        return Err(ExportError::DimensionsUnavailable {
            width: image_width,
            height: image_height,
        });
    }
    if boxes.is_empty() {
        return Err(ExportError::NoBoxes);
    }

    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    for b in boxes {
        let [cx, cy, w, h] = b
            .rect()
            .to_normalized(image_width as f64, image_height as f64)
            .clamped_cxcywh();
        let row = ExportRow {
            filename,
            class: b.class().map(|c| c.label()).unwrap_or(""),
            x_center: format!("{cx:.6}"),
            y_center: format!("{cy:.6}"),
            width: format!("{w:.6}"),
            height: format!("{h:.6}"),
        };
        csv_writer.serialize(&row).map_err(|e| ExportError::Encode {
            message: e.to_string(),
        })?;
    }

    let bytes = csv_writer.into_inner().map_err(|e| ExportError::Encode {
        message: e.error().to_string(),
    })?;
    let mut text = String::from_utf8(bytes).map_err(|e| ExportError::Encode {
        message: format!("Invalid UTF-8 in output: {}", e),
    })?;
    if text.ends_with('\n') {
        text.pop();
    }

    tracing::debug!(records = boxes.len(), filename, "export encoded");
    Ok(text)
}

/// Drops excluded boxes, orders the rest for reading, and encodes them.
pub fn export_session(
    filename: &str,
    boxes: Vec<BoundingBox>,
    excluded: &BTreeSet<BoxId>,
    image_width: u32,
    image_height: u32,
) -> Result<String, ExportError> {
    let kept: Vec<BoundingBox> = boxes
        .into_iter()
        .filter(|b| !excluded.contains(&b.id()))
        .collect();
    let ordered = reading_order(kept);
    encode_export(filename, &ordered, image_width, image_height)
}

/// Writes an encoded export to disk.
pub fn write_export(path: &Path, encoded: &str) -> Result<(), ScanlabelError> {
    fs::write(path, encoded).map_err(ScanlabelError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BoxClass, Rect};

    fn bx(id: u64, rect: Rect<crate::ir::Pixel>, class: Option<BoxClass>) -> BoundingBox {
        BoundingBox::new(id, rect, 0, class).unwrap()
    }

    #[test]
    fn test_full_image_box() {
        let boxes = [bx(1, Rect::new(0.0, 0.0, 640.0, 480.0), Some(BoxClass::PrimarySubject))];
        let out = encode_export("page.png", &boxes, 640, 480).expect("encode");

        assert_eq!(
            out,
            "filename,class,x_center,y_center,width,height\n\
             page.png,PrimarySubject,0.500000,0.500000,1.000000,1.000000"
        );
    }

    #[test]
    fn test_overflow_is_clamped() {
        let boxes = [bx(1, Rect::new(600.0, -40.0, 200.0, 40.0), None)];
        let out = encode_export("page.png", &boxes, 640, 480).expect("encode");
        let record = out.lines().nth(1).expect("record line");

        assert_eq!(record, "page.png,,1.000000,0.000000,0.312500,0.083333");
    }

    #[test]
    fn test_untagged_class_is_empty() {
        let boxes = [bx(1, Rect::new(10.0, 10.0, 10.0, 10.0), None)];
        let out = encode_export("a.png", &boxes, 100, 100).expect("encode");
        assert!(out.ends_with("a.png,,0.150000,0.150000,0.100000,0.100000"));
    }

    #[test]
    fn test_empty_set_is_an_error() {
        assert_eq!(
            encode_export("a.png", &[], 100, 100),
            Err(ExportError::NoBoxes)
        );
    }

    #[test]
    fn test_zero_dimensions_are_an_error() {
        let boxes = [bx(1, Rect::new(10.0, 10.0, 10.0, 10.0), None)];
        assert!(matches!(
            encode_export("a.png", &boxes, 0, 100),
            Err(ExportError::DimensionsUnavailable { .. })
        ));
    }

    #[test]
    fn test_session_export_orders_and_excludes() {
        let boxes = vec![
            bx(1, Rect::new(60.0, 0.0, 20.0, 20.0), Some(BoxClass::PrimarySubject)),
            bx(2, Rect::new(0.0, 50.0, 20.0, 20.0), Some(BoxClass::SecondaryMark)),
            bx(3, Rect::new(0.0, 0.0, 20.0, 20.0), Some(BoxClass::FrameRegion)),
        ];
        let excluded = BTreeSet::new();
        let out = export_session("p.png", boxes.clone(), &excluded, 100, 100).expect("encode");
        let classes: Vec<&str> = out
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(classes, vec!["FrameRegion", "SecondaryMark", "PrimarySubject"]);

        let excluded = BTreeSet::from([BoxId(2)]);
        let out = export_session("p.png", boxes.clone(), &excluded, 100, 100).expect("encode");
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains("SecondaryMark"));

        let everything = BTreeSet::from([BoxId(1), BoxId(2), BoxId(3)]);
        assert_eq!(
            export_session("p.png", boxes, &everything, 100, 100),
            Err(ExportError::NoBoxes)
        );
    }
}
