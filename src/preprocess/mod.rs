pub mod catalog;
pub mod step;

pub use catalog::PipelineCatalog;
pub use step::{Pipeline, PipelineStep};
