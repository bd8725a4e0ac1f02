//! Drag-to-reorder widget for browser lists, built on `web-sys`.
//!
//! Point a [`Sortable`] at a container, press one of its drag items, and the
//! list reorders live under the pointer; configure `animation` to get a
//! floating preview and a FLIP-style settle on drop.
//!
//! ```no_run
//! use naraberu::{Sortable, SortableOptions};
//!
//! let mut options = SortableOptions::new(".drag-list");
//! options.drag_selector = Some(".drag-item".to_string());
//! options.animation = Some(150.0);
//! let sortable = Sortable::new(options);
//! # drop(sortable);
//! ```

mod animate;
mod direction;
mod geometry;
mod query;
mod sortable;

pub use animate::AnimationManager;
pub use direction::{drag_direction, Direction};
pub use geometry::{
    boundary_overflow, bounding_box, rects_equal, sibling_index, BoundaryOverflow, Point, Rect,
};
pub use sortable::{
    ContainerRef, SortEnd, Sortable, SortableOptions, CONTAINER_CLASS, PREVIEW_CLASS,
};
