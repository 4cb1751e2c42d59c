pub mod batch;
pub mod core;
pub mod engines;
pub mod matchers;
pub mod preprocess;
pub mod validator;

pub use crate::core::{
    ClaimedIdentity, DocumentReport, Error, FieldStatuses, Outcome, ValidationStatus,
};
pub use crate::preprocess::{Pipeline, PipelineCatalog, PipelineStep};
pub use crate::validator::{Orientation, Validator};
