//! Render Model - Page plan to draw commands
//!
//! This crate converts the pages of a `PagePlan` into backend-neutral draw
//! commands (rectangles, lines, text runs and images) that an export backend
//! replays onto its drawing surface.

mod columns;
mod context;
mod error;
mod render_item;
mod renderer;

pub use columns::*;
pub use context::*;
pub use error::*;
pub use render_item::*;
pub use renderer::*;
