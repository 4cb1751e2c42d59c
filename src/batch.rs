use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};

use crate::core::errors::Error;
use crate::core::identity::ClaimedIdentity;
use crate::core::report::{DocumentReport, Outcome};
use crate::engines::{FaceEngine, TextEngine};
use crate::preprocess::{Pipeline, PipelineCatalog};
use crate::validator::Validator;

/// Everything needed to start one document's validation.
#[derive(Debug)]
pub struct DocumentInput {
    pub doc_id: String,
    pub id_path: PathBuf,
    pub headshot_path: PathBuf,
    pub identity: ClaimedIdentity,
}

/// Discovery result: runnable documents plus the ones rejected up front.
#[derive(Debug)]
pub struct BatchPlan {
    pub inputs: Vec<DocumentInput>,
    pub rejected: Vec<(String, Error)>,
}

/// Knobs for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Worker threads; `None` uses available hardware concurrency.
    pub concurrency: Option<usize>,
    /// Catalog shuffle seed; affects search order only.
    pub seed: u64,
    /// Pipelines tried per orientation, 0 for the entire catalog.
    pub max_pipelines: usize,
    /// Face match distance tolerance.
    pub tolerance: f64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: None,
            seed: 0,
            max_pipelines: 50,
            tolerance: 0.6,
        }
    }
}

/// Walk `{root}/{doc_id}/` directories, requiring exactly one `id.*`, one
/// `headshot.*` and one `info.txt` each. A directory that violates the
/// layout, or whose info file does not parse, is rejected without touching
/// any image.
pub fn discover(root: &Path) -> Result<BatchPlan, Error> {
    let entries = fs::read_dir(root)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", root.display())))?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut inputs = Vec::new();
    let mut rejected = Vec::new();

    for dir in dirs {
        let doc_id = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match plan_document(&dir) {
            Ok((id_path, headshot_path, identity)) => inputs.push(DocumentInput {
                doc_id,
                id_path,
                headshot_path,
                identity,
            }),
            Err(e) => rejected.push((doc_id, e)),
        }
    }

    Ok(BatchPlan { inputs, rejected })
}

fn plan_document(dir: &Path) -> Result<(PathBuf, PathBuf, ClaimedIdentity), Error> {
    let id_path = require_one(dir, "id")?;
    let headshot_path = require_one(dir, "headshot")?;

    let info_path = dir.join("info.txt");
    if !info_path.is_file() {
        return Err(Error::Config(format!(
            "missing info.txt in {}",
            dir.display()
        )));
    }
    let identity = ClaimedIdentity::from_info_file(&info_path)?;

    Ok((id_path, headshot_path, identity))
}

/// Exactly one regular file named `{stem}.*` must exist in the directory.
fn require_one(dir: &Path, stem: &str) -> Result<PathBuf, Error> {
    let entries = fs::read_dir(dir)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", dir.display())))?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_stem()
                    .map(|s| s.to_string_lossy() == stem)
                    .unwrap_or(false)
        })
        .collect();
    matches.sort();

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(Error::Config(format!(
            "missing {stem}.* in {}",
            dir.display()
        ))),
        n => Err(Error::Config(format!(
            "expected one {stem}.* in {}, found {n}",
            dir.display()
        ))),
    }
}

/// Discover documents under `root` and validate them all.
pub fn run(
    root: &Path,
    ocr: &dyn TextEngine,
    face: &dyn FaceEngine,
    options: &BatchOptions,
) -> Result<HashMap<String, DocumentReport>, Error> {
    let plan = discover(root)?;
    let catalog = PipelineCatalog::generate(options.seed);
    run_plan(plan, &catalog, ocr, face, options)
}

/// Validate a discovered plan on a bounded worker pool, one task per
/// document. Results are collected per document id; a fault in one task is
/// recorded on that document's report and never aborts the batch.
pub fn run_plan(
    plan: BatchPlan,
    catalog: &PipelineCatalog,
    ocr: &dyn TextEngine,
    face: &dyn FaceEngine,
    options: &BatchOptions,
) -> Result<HashMap<String, DocumentReport>, Error> {
    let mut reports: HashMap<String, DocumentReport> = plan
        .rejected
        .into_iter()
        .map(|(doc_id, error)| {
            warn!(doc = %doc_id, %error, "rejected during discovery");
            (
                doc_id,
                DocumentReport::rejected(Outcome::ConfigError, error.to_string()),
            )
        })
        .collect();

    let pipelines = catalog.capped(options.max_pipelines);
    info!(
        documents = plan.inputs.len(),
        pipelines = pipelines.len(),
        "starting batch"
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(options.concurrency.unwrap_or(0))
        .build()
        .map_err(|e| Error::Config(format!("cannot build worker pool: {e}")))?;

    let processed: Vec<(String, DocumentReport)> = pool.install(|| {
        plan.inputs
            .into_par_iter()
            .map(|input| process_document(input, pipelines, ocr, face, options.tolerance))
            .collect()
    });

    reports.extend(processed);
    Ok(reports)
}

fn process_document(
    input: DocumentInput,
    pipelines: &[Pipeline],
    ocr: &dyn TextEngine,
    face: &dyn FaceEngine,
    tolerance: f64,
) -> (String, DocumentReport) {
    let DocumentInput {
        doc_id,
        id_path,
        headshot_path,
        identity,
    } = input;

    info!(doc = %doc_id, "validating");

    let mut validator = match Validator::new(
        &doc_id,
        &identity,
        &id_path,
        &headshot_path,
        pipelines,
        ocr,
        face,
        tolerance,
    ) {
        Ok(validator) => validator,
        Err(error) => {
            warn!(doc = %doc_id, %error, "rejected before the search");
            let outcome = if error.is_config() {
                Outcome::ConfigError
            } else {
                Outcome::Failed
            };
            return (doc_id, DocumentReport::rejected(outcome, error.to_string()));
        }
    };

    match validator.run() {
        Ok(()) => {
            let report = validator.report();
            info!(doc = %doc_id, outcome = %report.outcome, "{}", report.statuses);
            (doc_id, report)
        }
        Err(error) => {
            warn!(doc = %doc_id, %error, "collaborator fault during validation");
            (doc_id, validator.report_failed(error.to_string()))
        }
    }
}
