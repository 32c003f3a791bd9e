//! Application services

pub mod composition;
pub mod pipeline;

pub use composition::{CompositionError, CompositionService};
pub use pipeline::build_overlay_pipeline;
