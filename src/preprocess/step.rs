use std::fmt;

use image::DynamicImage;
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::bilateral_filter;
use imageproc::morphology::{dilate, erode};

/// One preprocessing operation. Parameters are integral so steps can be
/// hashed and compared, which is what gives the catalog set semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineStep {
    Grayscale,
    Invert,
    Threshold {
        level: u8,
    },
    /// Edge-preserving smoothing standing in for OpenCV's non-local-means:
    /// `search_window` bounds the neighborhood, `strength` the intensity
    /// sigma, `template_window` the spatial sigma.
    Denoise {
        strength: u32,
        search_window: u32,
        template_window: u32,
    },
    Erode {
        kernel: u8,
    },
    Dilate {
        kernel: u8,
    },
}

impl PipelineStep {
    /// Apply this step to an image, yielding a new image.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match *self {
            PipelineStep::Grayscale => image.grayscale(),
            PipelineStep::Invert => {
                let mut out = image.clone();
                out.invert();
                out
            }
            PipelineStep::Threshold { level } => DynamicImage::ImageLuma8(threshold(
                &image.to_luma8(),
                level,
                ThresholdType::Binary,
            )),
            PipelineStep::Denoise {
                strength,
                search_window,
                template_window,
            } => DynamicImage::ImageLuma8(bilateral_filter(
                &image.to_luma8(),
                search_window,
                strength as f32,
                template_window as f32,
            )),
            // A k x k square kernel is an L-inf ball of radius k / 2.
            PipelineStep::Erode { kernel } => {
                DynamicImage::ImageLuma8(erode(&image.to_luma8(), Norm::LInf, kernel / 2))
            }
            PipelineStep::Dilate { kernel } => {
                DynamicImage::ImageLuma8(dilate(&image.to_luma8(), Norm::LInf, kernel / 2))
            }
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PipelineStep::Grayscale => write!(f, "grayscale"),
            PipelineStep::Invert => write!(f, "invert"),
            PipelineStep::Threshold { level } => write!(f, "threshold({level})"),
            PipelineStep::Denoise {
                strength,
                search_window,
                template_window,
            } => write!(f, "denoise({strength},{search_window},{template_window})"),
            PipelineStep::Erode { kernel } => write!(f, "erode({kernel})"),
            PipelineStep::Dilate { kernel } => write!(f, "dilate({kernel})"),
        }
    }
}

/// An immutable ordered sequence of steps. Applying a pipeline never
/// mutates its input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
}

impl Pipeline {
    pub fn new(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        self.steps
            .iter()
            .fold(image.clone(), |acc, step| step.apply(&acc))
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for step in &self.steps {
            if !first {
                write!(f, " -> ")?;
            }
            write!(f, "{step}")?;
            first = false;
        }
        Ok(())
    }
}
