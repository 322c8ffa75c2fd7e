//! Layout Engine - Page metrics, measurement, and pagination
//!
//! This crate turns a report `Document` into a `PagePlan`: an ordered list of
//! pages, each holding the content blocks assigned to it with their vertical
//! offsets. Planning is a pure, deterministic, single forward pass.

mod error;
mod font_metrics;
mod measure;
mod metrics;
mod paginator;

pub use error::*;
pub use font_metrics::*;
pub use measure::*;
pub use metrics::*;
pub use paginator::*;
