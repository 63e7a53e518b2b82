//! Reading-order reconstruction.
//!
//! Orders a finished box set column by column: left-to-right across
//! columns, top-to-bottom within a column. Columns are found with a single
//! greedy pass over boxes sorted by horizontal center; a box joins the
//! first column whose running mean center-x lies within half the mean box
//! width. Columns are never split or merged after the fact.

use crate::ir::BoundingBox;

/// A group of boxes sharing a column, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Column {
    boxes: Vec<BoundingBox>,
    center_x_sum: f64,
}

impl Column {
    fn push(&mut self, b: BoundingBox) {
        self.center_x_sum += b.center().x;
        self.boxes.push(b);
    }

    /// Running mean of member center-x values.
    pub fn mean_center_x(&self) -> f64 {
        self.center_x_sum / self.boxes.len() as f64
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Half the mean box width, or `None` for an empty set.
pub fn column_threshold(boxes: &[BoundingBox]) -> Option<f64> {
    if boxes.is_empty() {
        return None;
    }
    let total: f64 = boxes.iter().map(|b| b.rect().w).sum();
    Some(0.5 * total / boxes.len() as f64)
}

/// Groups boxes into columns sorted left to right.
///
/// Boxes inside each column are sorted top to bottom by `y`. Both sorts are
/// stable, so ties keep their input order.
pub fn columns(mut boxes: Vec<BoundingBox>) -> Vec<Column> {
    let Some(threshold) = column_threshold(&boxes) else {
        return Vec::new();
    };

    boxes.sort_by(|a, b| a.center().x.total_cmp(&b.center().x));

    let mut columns: Vec<Column> = Vec::new();
    for b in boxes {
        let cx = b.center().x;
        match columns
            .iter_mut()
            .find(|col| (col.mean_center_x() - cx).abs() <= threshold)
        {
            Some(col) => col.push(b),
            None => {
                let mut col = Column::default();
                col.push(b);
                columns.push(col);
            }
        }
    }

    columns.sort_by(|a, b| a.mean_center_x().total_cmp(&b.mean_center_x()));
    for col in &mut columns {
        col.boxes.sort_by(|a, b| a.rect().y.total_cmp(&b.rect().y));
    }

    tracing::debug!(columns = columns.len(), threshold, "column grouping complete");
    columns
}

/// Returns the boxes in column-major reading order.
///
/// Storage order of the caller's working set is unaffected; this consumes
/// its own copy.
pub fn reading_order(boxes: Vec<BoundingBox>) -> Vec<BoundingBox> {
    columns(boxes)
        .into_iter()
        .flat_map(|col| col.boxes)
        .collect()
}
