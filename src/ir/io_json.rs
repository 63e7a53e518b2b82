//! JSON serialization for components and box sets.
//!
//! Two files flow through the CLI:
//! - a components file: the labeling collaborator's output, an array of
//!   `{left, top, width, height, area}` objects where index 0 is the
//!   background component;
//! - a boxes file: an array of `{id, x, y, w, h, area, class?}` objects, the
//!   working set handed between merge, tagging, ordering and export.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::model::{BoundingBox, RawComponent};
use crate::error::ScanlabelError;

/// Reads connected-component statistics from a JSON file.
///
/// The background component at index 0 is kept; dropping it is the
/// caller's job (see [`crate::pipeline::foreground_components`]).
pub fn read_components_json(path: &Path) -> Result<Vec<RawComponent>, ScanlabelError> {
    let file = File::open(path).map_err(ScanlabelError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| ScanlabelError::ComponentsJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a box set from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, if any box has a
/// non-positive extent, or if two boxes share an id.
pub fn read_boxes_json(path: &Path) -> Result<Vec<BoundingBox>, ScanlabelError> {
    let file = File::open(path).map_err(ScanlabelError::Io)?;
    let reader = BufReader::new(file);

    let boxes: Vec<BoundingBox> =
        serde_json::from_reader(reader).map_err(|source| ScanlabelError::BoxesJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    check_unique_ids(&boxes, path)?;
    Ok(boxes)
}

/// Writes a box set to a JSON file.
pub fn write_boxes_json(path: &Path, boxes: &[BoundingBox]) -> Result<(), ScanlabelError> {
    let file = File::create(path).map_err(ScanlabelError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, boxes).map_err(|source| ScanlabelError::BoxesJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a box set from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_boxes_json_str(json: &str) -> Result<Vec<BoundingBox>, ScanlabelError> {
    from_boxes_json_slice(json.as_bytes())
}

/// Reads a box set from JSON bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_boxes_json_slice(bytes: &[u8]) -> Result<Vec<BoundingBox>, ScanlabelError> {
    let dummy_path = Path::new("<bytes>");
    let boxes: Vec<BoundingBox> =
        serde_json::from_slice(bytes).map_err(|source| ScanlabelError::BoxesJsonParse {
            path: dummy_path.to_path_buf(),
            source,
        })?;
    check_unique_ids(&boxes, dummy_path)?;
    Ok(boxes)
}

/// Writes a box set to a JSON string.
pub fn to_boxes_json_string(boxes: &[BoundingBox]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(boxes)
}

fn check_unique_ids(boxes: &[BoundingBox], path: &Path) -> Result<(), ScanlabelError> {
    let mut seen = HashSet::with_capacity(boxes.len());
    for b in boxes {
        if !seen.insert(b.id()) {
            return Err(ScanlabelError::BoxesInvalid {
                path: path.to_path_buf(),
                message: format!("duplicate box id {}", b.id()),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BoxClass, BoxId, Rect};

    fn sample_boxes() -> Vec<BoundingBox> {
        vec![
            BoundingBox::new(1u64, Rect::new(10.0, 20.0, 30.0, 40.0), 900, None).unwrap(),
            BoundingBox::new(
                2u64,
                Rect::new(-2.0, 3.0, 12.0, 8.0),
                0,
                Some(BoxClass::FrameRegion),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_boxes_json_format() {
        let json = to_boxes_json_string(&sample_boxes()).expect("serialization failed");

        assert!(json.contains("\"id\": 1"));
        assert!(json.contains("\"class\": \"FrameRegion\""));
        assert!(json.contains("\"w\": 30.0"));
    }

    #[test]
    fn test_boxes_json_reads_back() {
        let json = to_boxes_json_string(&sample_boxes()).expect("serialization failed");
        let restored = from_boxes_json_str(&json).expect("deserialization failed");

        assert_eq!(restored, sample_boxes());
    }

    #[test]
    fn test_missing_area_and_class_default() {
        let boxes = from_boxes_json_str(r#"[{"id": 4, "x": 1, "y": 2, "w": 3, "h": 4}]"#)
            .expect("parse failed");
        assert_eq!(boxes[0].id(), BoxId(4));
        assert_eq!(boxes[0].area(), 0);
        assert_eq!(boxes[0].class(), None);
    }

    #[test]
    fn test_degenerate_box_is_rejected() {
        let result = from_boxes_json_str(r#"[{"id": 1, "x": 0, "y": 0, "w": 0, "h": 4}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = from_boxes_json_str(
            r#"[{"id": 1, "x": 0, "y": 0, "w": 5, "h": 5},
                {"id": 1, "x": 9, "y": 9, "w": 5, "h": 5}]"#,
        );
        assert!(matches!(result, Err(ScanlabelError::BoxesInvalid { .. })));
    }
}
