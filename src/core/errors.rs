use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for the validation engine.
///
/// `Config` and `Decode` exclude a document from the search entirely;
/// `Collaborator` is caught at the task boundary so one faulty document
/// never aborts a batch.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing input: malformed info file, a claimed name with fewer
    /// than two usable tokens, missing/ambiguous document files.
    #[error("configuration error: {0}")]
    Config(String),

    /// An input image could not be decoded. Fatal for that document only.
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An external engine (OCR or face) failed mid-run.
    #[error("collaborator failure: {0}")]
    Collaborator(#[from] anyhow::Error),
}

impl Error {
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Decode { .. })
    }
}
