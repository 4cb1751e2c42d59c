use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::preprocess::step::{Pipeline, PipelineStep};

const THRESHOLD_LEVELS: [u8; 4] = [60, 80, 100, 120];
const DENOISE_STRENGTHS: [u32; 3] = [11, 15, 19];
const DENOISE_SEARCH_WINDOWS: [u32; 3] = [17, 21, 25];
const DENOISE_TEMPLATE_WINDOWS: [u32; 2] = [5, 7];
const MORPH_KERNELS: [u8; 1] = [5];

/// The deduplicated set of preprocessing pipelines the validator searches.
///
/// Generation is staged. Stage policies are fixed:
/// - grayscale: seed stage, every pipeline starts with it (1)
/// - invert: optional-add, unions inverted variants in (2)
/// - threshold: mandatory-branch, exclusive; un-thresholded variants do
///   not survive (8)
/// - denoise: mandatory-branch over the strength x search x template
///   cross-product, additive (152)
/// - erode/dilate: mandatory-branch over the two operations, additive (456)
///
/// The seed only shuffles iteration order for search diversity; the set of
/// pipelines is the same for every seed.
#[derive(Debug, Clone)]
pub struct PipelineCatalog {
    pipelines: Vec<Pipeline>,
}

impl PipelineCatalog {
    pub fn generate(seed: u64) -> Self {
        let mut set: HashSet<Vec<PipelineStep>> = HashSet::new();
        set.insert(vec![PipelineStep::Grayscale]);

        // Invert: union of with and without.
        let mut inverted = Vec::new();
        for steps in &set {
            let mut with = steps.clone();
            with.push(PipelineStep::Invert);
            inverted.push(with);
        }
        set.extend(inverted);

        // Threshold: every pipeline gets exactly one level.
        let mut thresholded = HashSet::new();
        for steps in &set {
            for level in THRESHOLD_LEVELS {
                let mut with = steps.clone();
                with.push(PipelineStep::Threshold { level });
                thresholded.insert(with);
            }
        }
        set = thresholded;

        // Denoise: union in every parameter combination.
        let mut denoised = Vec::new();
        for steps in &set {
            for strength in DENOISE_STRENGTHS {
                for search_window in DENOISE_SEARCH_WINDOWS {
                    for template_window in DENOISE_TEMPLATE_WINDOWS {
                        let mut with = steps.clone();
                        with.push(PipelineStep::Denoise {
                            strength,
                            search_window,
                            template_window,
                        });
                        denoised.push(with);
                    }
                }
            }
        }
        set.extend(denoised);

        // Erode or dilate: union in both morphological variants.
        let mut morphed = Vec::new();
        for steps in &set {
            for kernel in MORPH_KERNELS {
                for step in [
                    PipelineStep::Erode { kernel },
                    PipelineStep::Dilate { kernel },
                ] {
                    let mut with = steps.clone();
                    with.push(step);
                    morphed.push(with);
                }
            }
        }
        set.extend(morphed);

        let mut pipelines: Vec<Pipeline> = set.into_iter().map(Pipeline::new).collect();
        // HashSet iteration order is arbitrary; sort so a given seed always
        // produces the same ordering.
        pipelines.sort();
        let mut rng = StdRng::seed_from_u64(seed);
        pipelines.shuffle(&mut rng);

        Self { pipelines }
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    /// The first `max` pipelines in catalog order, or all of them when
    /// `max` is zero.
    pub fn capped(&self, max: usize) -> &[Pipeline] {
        if max == 0 || max >= self.pipelines.len() {
            &self.pipelines
        } else {
            &self.pipelines[..max]
        }
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cardinality_is_fixed() {
        // 1 grayscale, x2 invert, x4 threshold (exclusive),
        // +8*18 denoise, +152*2 erode/dilate.
        assert_eq!(PipelineCatalog::generate(0).len(), 456);
        assert_eq!(PipelineCatalog::generate(99).len(), 456);
    }

    #[test]
    fn no_duplicate_step_sequences() {
        let catalog = PipelineCatalog::generate(3);
        let unique: HashSet<&[PipelineStep]> =
            catalog.pipelines().iter().map(|p| p.steps()).collect();
        assert_eq!(unique.len(), catalog.len());
    }

    #[test]
    fn seed_is_reproducible_and_only_permutes() {
        let a = PipelineCatalog::generate(7);
        let b = PipelineCatalog::generate(7);
        assert_eq!(a.pipelines(), b.pipelines());

        let c = PipelineCatalog::generate(8);
        let mut sorted_a = a.pipelines.clone();
        let mut sorted_c = c.pipelines.clone();
        sorted_a.sort();
        sorted_c.sort();
        assert_eq!(sorted_a, sorted_c);
    }

    #[test]
    fn every_pipeline_starts_with_grayscale_and_carries_one_threshold() {
        let catalog = PipelineCatalog::generate(1);
        for pipeline in catalog.pipelines() {
            assert_eq!(pipeline.steps()[0], PipelineStep::Grayscale);
            let thresholds = pipeline
                .steps()
                .iter()
                .filter(|s| matches!(s, PipelineStep::Threshold { .. }))
                .count();
            assert_eq!(thresholds, 1);
        }
    }

    #[test]
    fn capped_limits_the_search() {
        let catalog = PipelineCatalog::generate(5);
        assert_eq!(catalog.capped(50).len(), 50);
        assert_eq!(catalog.capped(0).len(), 456);
        assert_eq!(catalog.capped(10_000).len(), 456);
    }
}
