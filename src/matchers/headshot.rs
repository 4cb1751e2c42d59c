use image::DynamicImage;

use crate::core::errors::Error;
use crate::core::status::ValidationStatus;
use crate::engines::{FaceEncoding, FaceEngine};

/// Compares faces on the document against a reference headshot.
///
/// The reference encoding is extracted exactly once at construction. If the
/// headshot contains no detectable face, the matcher stays Failed for the
/// whole document; once a comparison succeeds the status is Complete and no
/// further encodings are attempted.
#[derive(Debug)]
pub struct HeadshotMatcher {
    reference: Option<FaceEncoding>,
    tolerance: f64,
    status: ValidationStatus,
}

impl HeadshotMatcher {
    pub fn new(
        face: &dyn FaceEngine,
        headshot: &DynamicImage,
        tolerance: f64,
    ) -> Result<Self, Error> {
        let reference = face.encode(headshot)?;
        Ok(Self {
            reference,
            tolerance,
            status: ValidationStatus::Failed,
        })
    }

    /// Try to match a face in the given orientation of the id image.
    /// No face in the id image is a miss, not an error.
    pub fn observe(&mut self, face: &dyn FaceEngine, id_image: &DynamicImage) -> Result<(), Error> {
        if self.status.is_complete() {
            return Ok(());
        }
        let Some(reference) = &self.reference else {
            return Ok(());
        };
        let Some(candidate) = face.encode(id_image)? else {
            return Ok(());
        };
        if face.compare(reference, &candidate, self.tolerance) {
            self.status.advance(ValidationStatus::Complete);
        }
        Ok(())
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }
}
