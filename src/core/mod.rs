pub mod errors;
pub mod identity;
pub mod report;
pub mod status;

pub use errors::Error;
pub use identity::ClaimedIdentity;
pub use report::{DocumentReport, FieldStatuses, Outcome};
pub use status::ValidationStatus;
