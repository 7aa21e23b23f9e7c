//! Masonry layout.
//!
//! | Module | Role |
//! |--------|------|
//! | [`masonry`] | Breakpoints, column widths, shortest-column packing (pure) |
//! | [`engine`] | `MasonryGrid`: signal handling and frame-coalesced passes |
//! | [`boxes`] | `BoxContainer`: in-memory container of fixed or aspect-ratio boxes |

pub mod boxes;
pub mod engine;
pub mod masonry;

pub use boxes::{BoxContainer, BoxItem, BoxSizing};
pub use engine::{FrameQueue, FrameScheduler, FrameToken, MasonryContainer, MasonryGrid};
pub use masonry::{
    Breakpoint, Breakpoints, ColumnSpec, DEFAULT_GAP, MasonryConfig, MasonryLayout, Placement,
    column_width, pack, shortest_column,
};
