//! The tagging pipeline and the report it produces.

mod pipeline;
mod report;

pub use pipeline::{RunOptions, Tagger};
pub use report::{RunReport, SkipReason, TaggedFile};
