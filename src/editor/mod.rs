//! Interactive box editor.
//!
//! The editor owns one working set of boxes plus the selection, hover and
//! exclusion state around it. Input arrives as discrete [`Event`]s; each is
//! run through the pure [`transition`] function and the resulting
//! [`Delta`]s are applied before the next event is accepted.
//!
//! # Selection rules
//!
//! - A plain click on a box selects only that box; clicking the sole
//!   selected box again deselects it.
//! - A click with the multi-select modifier toggles the box's membership.
//! - Move and resize work only while exactly one box is selected.
//! - Hover previews only apply while nothing is selected.
//!
//! Rendering is not handled here: [`Editor::boxes`], [`Editor::draft`],
//! [`Editor::hover`] and [`Viewport::rect_to_screen`] expose what a
//! renderer needs.

mod state;
mod viewport;

pub use state::{
    transition, Delta, EditState, EditorView, Event, Handle, Outcome, HANDLE_RADIUS, MIN_BOX_SIZE,
};
pub use viewport::Viewport;

use std::collections::{BTreeSet, HashSet};

use crate::error::{ExportError, ScanlabelError};
use crate::export::export_session;
use crate::ir::{BoundingBox, BoxClass, BoxId, Pixel, Rect};
use crate::tagging;

/// An editing session over one page's working set.
#[derive(Clone, Debug)]
pub struct Editor {
    boxes: Vec<BoundingBox>,
    selection: BTreeSet<BoxId>,
    hover: Option<BoxId>,
    excluded: BTreeSet<BoxId>,
    state: EditState,
    viewport: Viewport,
    next_id: BoxId,
}

impl Editor {
    /// Starts a session over `boxes`, kept in the given order.
    ///
    /// # Errors
    /// Returns [`ScanlabelError::DuplicateBoxId`] if two boxes share an id.
    pub fn new(boxes: Vec<BoundingBox>, viewport: Viewport) -> Result<Self, ScanlabelError> {
        let mut seen = HashSet::with_capacity(boxes.len());
        for b in &boxes {
            if !seen.insert(b.id()) {
                return Err(ScanlabelError::DuplicateBoxId(b.id()));
            }
        }
        let next_id = match boxes.iter().map(|b| b.id()).max() {
            Some(highest) => next_free_id(&boxes, highest),
            None => BoxId(1),
        };

        Ok(Self {
            boxes,
            selection: BTreeSet::new(),
            hover: None,
            excluded: BTreeSet::new(),
            state: EditState::Idle,
            viewport,
            next_id,
        })
    }

    /// Processes one input event and returns the deltas that were applied.
    pub fn handle(&mut self, event: Event) -> Vec<Delta> {
        let view = EditorView {
            boxes: &self.boxes,
            selection: &self.selection,
            hover: self.hover,
            viewport: &self.viewport,
            next_id: self.next_id,
        };
        let Outcome { state, deltas } = transition(&self.state, &view, &event);
        self.state = state;
        for delta in &deltas {
            self.apply(delta);
        }
        deltas
    }

    fn apply(&mut self, delta: &Delta) {
        match delta {
            Delta::Insert(b) => {
                tracing::debug!(id = %b.id(), rect = ?b.rect(), "box drawn");
                self.boxes.push(b.clone());
                self.next_id = next_free_id(&self.boxes, self.next_id.max(b.id()));
            }
            Delta::SetRect { id, rect } => {
                if let Some(b) = self.boxes.iter_mut().find(|b| b.id() == *id) {
                    b.set_rect(*rect);
                }
            }
            Delta::Remove(ids) => {
                tracing::debug!(count = ids.len(), "boxes deleted");
                self.boxes.retain(|b| !ids.contains(&b.id()));
                self.excluded.retain(|id| !ids.contains(id));
            }
            Delta::Select(selection) => self.selection = selection.clone(),
            Delta::Hover(target) => self.hover = *target,
        }
    }

    /// The working set in storage (insertion) order.
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn selection(&self) -> &BTreeSet<BoxId> {
        &self.selection
    }

    pub fn hover(&self) -> Option<BoxId> {
        self.hover
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Swaps the viewport, e.g. after the window is resized. Box geometry is
    /// in image pixels and is unaffected.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// True when direct manipulation (move/resize) is available.
    pub fn can_manipulate(&self) -> bool {
        self.selection.len() == 1
    }

    /// The in-progress rubber-band rectangle while drawing.
    pub fn draft(&self) -> Option<Rect<Pixel>> {
        match &self.state {
            EditState::Drawing { origin, current } => Some(Rect::from_corners(*origin, *current)),
            _ => None,
        }
    }

    /// Assigns (or clears) a class on every box in `ids`, then clears the
    /// selection. Returns how many boxes matched.
    pub fn assign_class(&mut self, ids: &BTreeSet<BoxId>, class: Option<BoxClass>) -> usize {
        let matched = tagging::assign_class(&mut self.boxes, ids, class);
        self.selection.clear();
        matched
    }

    /// [`Editor::assign_class`] applied to the current selection.
    pub fn tag_selection(&mut self, class: Option<BoxClass>) -> usize {
        let ids = std::mem::take(&mut self.selection);
        self.assign_class(&ids, class)
    }

    /// Marks a box as left out of (or back in) the export. Returns false if
    /// no such box exists.
    pub fn set_excluded(&mut self, id: BoxId, excluded: bool) -> bool {
        if !self.boxes.iter().any(|b| b.id() == id) {
            return false;
        }
        if excluded {
            self.excluded.insert(id);
        } else {
            self.excluded.remove(&id);
        }
        true
    }

    pub fn excluded(&self) -> &BTreeSet<BoxId> {
        &self.excluded
    }

    /// Encodes the non-excluded boxes in reading order.
    pub fn export(&self, filename: &str) -> Result<String, ExportError> {
        let (width, height) = self.viewport.image_size();
        export_session(filename, self.boxes.clone(), &self.excluded, width, height)
    }

    /// Ends the session and hands back the working set.
    pub fn into_boxes(self) -> Vec<BoundingBox> {
        self.boxes
    }
}

/// The id after `after`, or the lowest id no box holds once that one is
/// taken or the id space is exhausted.
fn next_free_id(boxes: &[BoundingBox], after: BoxId) -> BoxId {
    let taken = |id: &BoxId| boxes.iter().any(|b| b.id() == *id);
    match after.checked_next() {
        Some(id) if !taken(&id) => id,
        _ => (1..=u64::MAX)
            .map(BoxId)
            .find(|id| !taken(id))
            .unwrap_or(BoxId(0)),
    }
}

/// Fuzz-only entrypoint: replays bytes as input events on an empty
/// 256x256 page and panics if a box ever drops below the minimum size.
#[cfg(feature = "fuzzing")]
pub fn fuzz_replay(data: &[u8]) {
    use crate::ir::Coord;

    let Some(viewport) = Viewport::identity(256, 256) else {
        return;
    };
    let Ok(mut editor) = Editor::new(Vec::new(), viewport) else {
        return;
    };
    for chunk in data.chunks_exact(3) {
        let at = Coord::new(f64::from(chunk[1]), f64::from(chunk[2]));
        let event = match chunk[0] % 6 {
            0 => Event::PointerDown { at, multi: false },
            1 => Event::PointerDown { at, multi: true },
            2 => Event::PointerMove { at },
            3 => Event::PointerUp { at },
            4 => Event::Delete,
            _ => Event::ClearSelection,
        };
        editor.handle(event);
        for b in editor.boxes() {
            let r = b.rect();
            assert!(r.w >= MIN_BOX_SIZE && r.h >= MIN_BOX_SIZE, "undersized box {r:?}");
        }
    }
}
