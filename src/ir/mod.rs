//! Data model for scanlabel.
//!
//! This module defines the geometry and box types every stage of the
//! pipeline shares: raw connected-component statistics, labeled boxes,
//! and the typed coordinate spaces they live in.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: Marker types keep pixel, normalized and screen
//!    coordinates apart at compile time.
//!
//! 2. **Valid at Creation**: A [`BoundingBox`] cannot be built with a zero or
//!    negative extent; intermediate [`Rect`]s may be, so merge padding and
//!    in-progress draws can be represented.
//!
//! # Example
//!
//! ```
//! use scanlabel::ir::{BoundingBox, BoxClass, Pixel, Rect};
//!
//! let b = BoundingBox::new(
//!     1u64,
//!     Rect::<Pixel>::new(10.0, 20.0, 50.0, 30.0),
//!     900,
//!     Some(BoxClass::PrimarySubject),
//! )
//! .expect("positive extent");
//! assert_eq!(b.center().x, 35.0);
//! ```

mod class;
mod coord;
mod ids;
pub mod io_json;
mod model;
mod rect;
mod space;

// Re-export core types for convenient access
pub use class::BoxClass;
pub use coord::Coord;
pub use ids::BoxId;
pub use model::{BoundingBox, RawComponent};
pub use rect::Rect;
pub use space::{Normalized, Pixel, Screen};
