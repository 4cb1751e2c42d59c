use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::core::errors::Error;
use crate::core::identity::ClaimedIdentity;
use crate::core::report::{DocumentReport, FieldStatuses, Outcome};
use crate::engines::{pdf, FaceEngine, TextEngine};
use crate::matchers::{DobMatcher, HeadshotMatcher, NameMatcher};
use crate::preprocess::Pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    /// Search order: most documents are upright, sideways scans come in
    /// both rotations.
    pub const ALL: [Orientation; 3] = [
        Orientation::Normal,
        Orientation::Clockwise,
        Orientation::CounterClockwise,
    ];
}

/// Per-document orchestrator. Owns the decoded images and all matcher
/// state; nothing here is shared across documents.
pub struct Validator<'a> {
    doc_id: String,
    id_image: DynamicImage,
    id_clockwise: DynamicImage,
    id_counter_clockwise: DynamicImage,
    name: NameMatcher,
    dob: DobMatcher,
    headshot: HeadshotMatcher,
    pipelines: &'a [Pipeline],
    ocr: &'a dyn TextEngine,
    face: &'a dyn FaceEngine,
}

impl<'a> Validator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        doc_id: &str,
        identity: &ClaimedIdentity,
        id_path: &Path,
        headshot_path: &Path,
        pipelines: &'a [Pipeline],
        ocr: &'a dyn TextEngine,
        face: &'a dyn FaceEngine,
        tolerance: f64,
    ) -> Result<Self, Error> {
        let id_image = decode(id_path)?;
        let headshot_image = decode(headshot_path)?;

        let id_clockwise = id_image.rotate90();
        let id_counter_clockwise = id_image.rotate270();

        let headshot = HeadshotMatcher::new(face, &headshot_image, tolerance)?;

        Ok(Self {
            doc_id: doc_id.to_string(),
            id_image,
            id_clockwise,
            id_counter_clockwise,
            name: NameMatcher::new(identity),
            dob: DobMatcher::new(identity.dob()),
            headshot,
            pipelines,
            ocr,
            face,
        })
    }

    /// Run the search: orientations in order, pipelines within each,
    /// stopping at the first point the document validates. Matcher state
    /// accumulates across orientations and is never reset.
    pub fn run(&mut self) -> Result<(), Error> {
        for orientation in Orientation::ALL {
            self.attempt(orientation)?;
            if self.is_valid() {
                break;
            }
        }
        debug!(doc = %self.doc_id, valid = self.is_valid(), "{}", self.statuses());
        Ok(())
    }

    fn attempt(&mut self, orientation: Orientation) -> Result<(), Error> {
        debug!(doc = %self.doc_id, ?orientation, "attempting orientation");

        let image = match orientation {
            Orientation::Normal => &self.id_image,
            Orientation::Clockwise => &self.id_clockwise,
            Orientation::CounterClockwise => &self.id_counter_clockwise,
        };

        if !self.headshot.status().is_complete() {
            self.headshot.observe(self.face, image)?;
        }

        // The text fields may already be sufficient from an earlier
        // orientation; only the headshot needed this one.
        if self.id_fields_valid() {
            return Ok(());
        }

        for pipeline in self.pipelines {
            let processed = pipeline.apply(image);
            let text = self.ocr.extract_text(&processed)?;

            if !self.name.status().is_complete() {
                self.name.observe(&text);
            }
            if !self.dob.status().is_complete() {
                self.dob.observe(&text);
            }

            if self.id_fields_valid() {
                debug!(doc = %self.doc_id, %pipeline, "text fields satisfied");
                return Ok(());
            }
        }

        Ok(())
    }

    /// Whether the two text fields alone are sufficient: both Complete, or
    /// one Complete and the other at least Partial.
    fn id_fields_valid(&self) -> bool {
        let dob = self.dob.status();
        let name = self.name.status();
        (dob.is_complete() && name.is_complete())
            || (dob.is_partial() && name.is_complete())
            || (dob.is_complete() && name.is_partial())
    }

    pub fn is_valid(&self) -> bool {
        self.headshot.status().is_complete() && self.id_fields_valid()
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn statuses(&self) -> FieldStatuses {
        FieldStatuses {
            headshot: self.headshot.status(),
            dob: self.dob.status(),
            name: self.name.status(),
        }
    }

    pub fn report(&self) -> DocumentReport {
        DocumentReport {
            outcome: if self.is_valid() {
                Outcome::Valid
            } else {
                Outcome::Invalid
            },
            statuses: self.statuses(),
            reason: None,
        }
    }

    /// Report for a run interrupted by a collaborator fault, keeping
    /// whatever field statuses were reached before it.
    pub fn report_failed(&self, reason: String) -> DocumentReport {
        DocumentReport {
            outcome: Outcome::Failed,
            statuses: self.statuses(),
            reason: Some(reason),
        }
    }
}

fn decode(path: &Path) -> Result<DynamicImage, Error> {
    if pdf::is_pdf(path) {
        return pdf::render_first_page(path)
            .map_err(|e| Error::Config(format!("cannot render {}: {e:#}", path.display())));
    }
    image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}
