//! Editor state machine.
//!
//! [`transition`] is a pure function from `(state, view, event)` to the next
//! state plus the [`Delta`]s that event causes. It never mutates anything;
//! [`Editor`](super::Editor) applies the deltas to its working set.

use std::collections::BTreeSet;

use super::viewport::Viewport;
use crate::ir::{BoundingBox, BoxClass, BoxId, Coord, Pixel, Rect, Screen};

/// Smallest extent, in source pixels, a drawn or resized box may have.
pub const MIN_BOX_SIZE: f64 = 5.0;

/// Grab radius around a resize handle, in screen pixels.
pub const HANDLE_RADIUS: f64 = 6.0;

/// A resize grip on a selected box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    /// Where the grip sits on `rect`.
    pub fn position(&self, rect: &Rect<Pixel>) -> Coord<Pixel> {
        let (cx, cy) = (rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
        let (x, y) = match self {
            Handle::TopLeft => (rect.x, rect.y),
            Handle::Top => (cx, rect.y),
            Handle::TopRight => (rect.right(), rect.y),
            Handle::Right => (rect.right(), cy),
            Handle::BottomRight => (rect.right(), rect.bottom()),
            Handle::Bottom => (cx, rect.bottom()),
            Handle::BottomLeft => (rect.x, rect.bottom()),
            Handle::Left => (rect.x, cy),
        };
        Coord::new(x, y)
    }

    /// The rectangle produced by dragging this grip to `p`; edges the grip
    /// does not own stay put. May have a negative extent.
    pub fn resize(&self, rect: &Rect<Pixel>, p: Coord<Pixel>) -> Rect<Pixel> {
        let (mut left, mut top, mut right, mut bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
        match self {
            Handle::TopLeft | Handle::Left | Handle::BottomLeft => left = p.x,
            Handle::TopRight | Handle::Right | Handle::BottomRight => right = p.x,
            Handle::Top | Handle::Bottom => {}
        }
        match self {
            Handle::TopLeft | Handle::Top | Handle::TopRight => top = p.y,
            Handle::BottomLeft | Handle::Bottom | Handle::BottomRight => bottom = p.y,
            Handle::Left | Handle::Right => {}
        }
        Rect::from_edges(left, top, right, bottom)
    }
}

/// The editor's interaction state.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    /// A rubber-band rectangle from `origin` to `current`.
    Drawing {
        origin: Coord<Pixel>,
        current: Coord<Pixel>,
    },
    /// Moving the sole selected box. `anchor` is the pointer's offset from
    /// the box origin at press time.
    Dragging {
        id: BoxId,
        anchor: (f64, f64),
        moved: bool,
    },
    /// Resizing the sole selected box. `grab` is the pointer's offset from
    /// the handle at press time, so the handle follows pointer displacement.
    Resizing {
        id: BoxId,
        handle: Handle,
        grab: (f64, f64),
        moved: bool,
    },
}

/// A discrete input event. Pointer positions are in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    PointerDown { at: Coord<Screen>, multi: bool },
    PointerMove { at: Coord<Screen> },
    PointerUp { at: Coord<Screen> },
    /// Keyboard delete.
    Delete,
    ClearSelection,
}

/// One change to the editor's data caused by an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Delta {
    Insert(BoundingBox),
    SetRect { id: BoxId, rect: Rect<Pixel> },
    Remove(BTreeSet<BoxId>),
    Select(BTreeSet<BoxId>),
    Hover(Option<BoxId>),
}

/// Read-only snapshot of everything a transition looks at.
#[derive(Clone, Copy, Debug)]
pub struct EditorView<'a> {
    pub boxes: &'a [BoundingBox],
    pub selection: &'a BTreeSet<BoxId>,
    pub hover: Option<BoxId>,
    pub viewport: &'a Viewport,
    /// Id a newly drawn box would receive.
    pub next_id: BoxId,
}

impl EditorView<'_> {
    fn find(&self, id: BoxId) -> Option<&BoundingBox> {
        self.boxes.iter().find(|b| b.id() == id)
    }

    /// The selected box, when exactly one is selected.
    fn sole_selected(&self) -> Option<&BoundingBox> {
        if self.selection.len() != 1 {
            return None;
        }
        self.selection.first().and_then(|id| self.find(*id))
    }

    /// Topmost box under `p`; later boxes are drawn over earlier ones.
    fn hit(&self, p: &Coord<Pixel>) -> Option<BoxId> {
        self.boxes
            .iter()
            .rev()
            .find(|b| b.rect().contains(p))
            .map(|b| b.id())
    }

    /// The handle nearest `p` within the grab radius. Inside a box too
    /// small to fit two grab radii, the interior wins.
    fn hit_handle(&self, b: &BoundingBox, p: &Coord<Pixel>) -> Option<Handle> {
        let radius = self.viewport.screen_distance_to_image(HANDLE_RADIUS);
        let rect = b.rect();
        let small = rect.w <= 2.0 * radius || rect.h <= 2.0 * radius;
        if small && rect.contains(p) {
            return None;
        }
        Handle::ALL
            .into_iter()
            .filter_map(|h| {
                let (dx, dy) = p.delta(&h.position(&rect));
                (dx.abs() <= radius && dy.abs() <= radius).then_some((h, dx.hypot(dy)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(h, _)| h)
    }
}

/// The result of one transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub state: EditState,
    pub deltas: Vec<Delta>,
}

impl Outcome {
    fn stay(state: EditState) -> Self {
        Self {
            state,
            deltas: Vec::new(),
        }
    }

    fn with(state: EditState, deltas: Vec<Delta>) -> Self {
        Self { state, deltas }
    }
}

/// Computes the next state and the deltas an event produces.
pub fn transition(state: &EditState, view: &EditorView<'_>, event: &Event) -> Outcome {
    match (state, *event) {
        (EditState::Idle, Event::PointerDown { at, multi }) => {
            press(view, view.viewport.to_image(at), multi)
        }
        (EditState::Idle, Event::PointerMove { at }) => hover(view, view.viewport.to_image(at)),
        (EditState::Idle, Event::Delete) => delete_selection(view),
        (EditState::Idle, Event::ClearSelection) => {
            let mut deltas = Vec::new();
            if !view.selection.is_empty() {
                deltas.push(Delta::Select(BTreeSet::new()));
            }
            Outcome::with(EditState::Idle, deltas)
        }

        (EditState::Drawing { origin, .. }, Event::PointerMove { at }) => {
            Outcome::stay(EditState::Drawing {
                origin: *origin,
                current: view.viewport.to_image(at),
            })
        }
        (EditState::Drawing { origin, .. }, Event::PointerUp { at }) => {
            commit_draw(view, *origin, view.viewport.to_image(at))
        }

        (EditState::Dragging { id, anchor, moved }, Event::PointerMove { at }) => {
            let (delta, did_move) = drag_to(view, *id, *anchor, view.viewport.to_image(at));
            Outcome::with(
                EditState::Dragging {
                    id: *id,
                    anchor: *anchor,
                    moved: *moved || did_move,
                },
                delta.into_iter().collect(),
            )
        }
        (EditState::Dragging { id, anchor, moved }, Event::PointerUp { at }) => {
            let (delta, did_move) = drag_to(view, *id, *anchor, view.viewport.to_image(at));
            let mut deltas: Vec<Delta> = delta.into_iter().collect();
            if !(*moved || did_move) {
                // A press and release on the sole selected box is a click: deselect it.
                deltas.push(Delta::Select(BTreeSet::new()));
            }
            Outcome::with(EditState::Idle, deltas)
        }

        (
            EditState::Resizing {
                id,
                handle,
                grab,
                moved,
            },
            Event::PointerMove { at },
        ) => {
            let (delta, did_move) = resize_to(view, *id, *handle, *grab, view.viewport.to_image(at));
            Outcome::with(
                EditState::Resizing {
                    id: *id,
                    handle: *handle,
                    grab: *grab,
                    moved: *moved || did_move,
                },
                delta.into_iter().collect(),
            )
        }
        (
            EditState::Resizing {
                id,
                handle,
                grab,
                moved,
            },
            Event::PointerUp { at },
        ) => {
            let (delta, did_move) = resize_to(view, *id, *handle, *grab, view.viewport.to_image(at));
            let mut deltas: Vec<Delta> = delta.into_iter().collect();
            if !(*moved || did_move) {
                // Pressing a grip and letting go in place is a click on the box.
                deltas.push(Delta::Select(BTreeSet::new()));
            }
            Outcome::with(EditState::Idle, deltas)
        }

        // Anything else (a stray release while idle, keys mid-gesture, a
        // second press before release) leaves the editor as it is.
        _ => Outcome::stay(state.clone()),
    }
}

fn press(view: &EditorView<'_>, p: Coord<Pixel>, multi: bool) -> Outcome {
    if let Some(sole) = view.sole_selected().filter(|_| !multi) {
        if let Some(handle) = view.hit_handle(sole, &p) {
            return Outcome::stay(EditState::Resizing {
                id: sole.id(),
                handle,
                grab: p.delta(&handle.position(&sole.rect())),
                moved: false,
            });
        }
    }

    let mut deltas = Vec::new();
    if view.hover.is_some() {
        deltas.push(Delta::Hover(None));
    }

    let Some(hit) = view.hit(&p) else {
        if !multi && !view.selection.is_empty() {
            deltas.push(Delta::Select(BTreeSet::new()));
        }
        return Outcome::with(
            EditState::Drawing {
                origin: p,
                current: p,
            },
            deltas,
        );
    };

    if multi {
        let mut selection = view.selection.clone();
        if !selection.remove(&hit) {
            selection.insert(hit);
        }
        deltas.push(Delta::Select(selection));
        return Outcome::with(EditState::Idle, deltas);
    }

    match view.sole_selected() {
        Some(sole) if sole.id() == hit => {
            let origin = sole.rect().origin();
            Outcome::with(
                EditState::Dragging {
                    id: hit,
                    anchor: p.delta(&origin),
                    moved: false,
                },
                deltas,
            )
        }
        _ => {
            deltas.push(Delta::Select(BTreeSet::from([hit])));
            Outcome::with(EditState::Idle, deltas)
        }
    }
}

fn hover(view: &EditorView<'_>, p: Coord<Pixel>) -> Outcome {
    let target = if view.selection.is_empty() {
        view.hit(&p)
    } else {
        None
    };
    let deltas = if target != view.hover {
        vec![Delta::Hover(target)]
    } else {
        Vec::new()
    };
    Outcome::with(EditState::Idle, deltas)
}

fn delete_selection(view: &EditorView<'_>) -> Outcome {
    if view.selection.is_empty() {
        return Outcome::stay(EditState::Idle);
    }
    let mut deltas = vec![
        Delta::Remove(view.selection.clone()),
        Delta::Select(BTreeSet::new()),
    ];
    if view.hover.is_some_and(|id| view.selection.contains(&id)) {
        deltas.push(Delta::Hover(None));
    }
    Outcome::with(EditState::Idle, deltas)
}

fn commit_draw(view: &EditorView<'_>, origin: Coord<Pixel>, end: Coord<Pixel>) -> Outcome {
    let (dx, dy) = end.delta(&origin);
    if dx.abs() <= MIN_BOX_SIZE || dy.abs() <= MIN_BOX_SIZE {
        return Outcome::stay(EditState::Idle);
    }
    let rect = Rect::from_corners(origin, end);
    let deltas = BoundingBox::new(view.next_id, rect, 0, Some(BoxClass::DEFAULT))
        .map(Delta::Insert)
        .into_iter()
        .collect();
    Outcome::with(EditState::Idle, deltas)
}

/// Returns the move delta (if the box actually moves) and whether it moved.
fn drag_to(
    view: &EditorView<'_>,
    id: BoxId,
    anchor: (f64, f64),
    p: Coord<Pixel>,
) -> (Option<Delta>, bool) {
    let Some(b) = view.find(id) else {
        return (None, false);
    };
    let current = b.rect();
    let (dx, dy) = (p.x - anchor.0 - current.x, p.y - anchor.1 - current.y);
    if dx == 0.0 && dy == 0.0 {
        return (None, false);
    }
    (
        Some(Delta::SetRect {
            id,
            rect: current.translate(dx, dy),
        }),
        true,
    )
}

/// Returns the resize delta (if the result is large enough) and whether the
/// grip was moved off its current position.
fn resize_to(
    view: &EditorView<'_>,
    id: BoxId,
    handle: Handle,
    grab: (f64, f64),
    p: Coord<Pixel>,
) -> (Option<Delta>, bool) {
    let Some(b) = view.find(id) else {
        return (None, false);
    };
    let current = b.rect();
    let target = Coord::new(p.x - grab.0, p.y - grab.1);
    if target == handle.position(&current) {
        return (None, false);
    }
    let candidate = handle.resize(&current, target);
    let too_small = !candidate.has_positive_extent()
        || candidate.w < MIN_BOX_SIZE
        || candidate.h < MIN_BOX_SIZE;
    if too_small || candidate == current {
        return (None, true);
    }
    (
        Some(Delta::SetRect {
            id,
            rect: candidate,
        }),
        true,
    )
}
