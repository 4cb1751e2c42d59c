use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use idcheck::batch::{self, BatchOptions};
use idcheck::engines::{FaceBridge, TesseractBridge};
use idcheck::preprocess::PipelineCatalog;
use idcheck::Outcome;

#[derive(Parser, Debug)]
#[command(name = "idcheck")]
#[command(version, about = "Validates identity documents against a claimed name, date of birth and headshot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate every document under a root directory
    Run {
        /// Root directory with one subdirectory per document
        /// (id.*, headshot.*, info.txt)
        root: PathBuf,

        /// Worker threads (default: available hardware concurrency)
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Shuffle seed for the pipeline catalog
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Pipelines tried per orientation (0 = entire catalog)
        #[arg(long, default_value_t = 50)]
        max_pipelines: usize,

        /// Face match distance tolerance (lower is stricter)
        #[arg(long, default_value_t = 0.6)]
        tolerance: f64,

        /// Tesseract language pack
        #[arg(long, default_value = "eng")]
        lang: String,

        /// Python helper script wrapping face_recognition
        #[arg(long, default_value = "scripts/face_encoding.py")]
        face_script: PathBuf,
    },

    /// Show what a run would process
    Info {
        /// Root directory with one subdirectory per document
        root: PathBuf,

        /// Shuffle seed for the pipeline catalog
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            root,
            concurrency,
            seed,
            max_pipelines,
            tolerance,
            lang,
            face_script,
        } => run(
            root,
            BatchOptions {
                concurrency,
                seed,
                max_pipelines,
                tolerance,
            },
            lang,
            face_script,
        ),
        Commands::Info { root, seed } => show_info(root, seed),
    }
}

fn run(root: PathBuf, options: BatchOptions, lang: String, face_script: PathBuf) -> Result<()> {
    if !root.is_dir() {
        anyhow::bail!("root is not a directory: {}", root.display());
    }

    let ocr = TesseractBridge::new().with_lang(lang);
    let face = FaceBridge::new().with_script(face_script);

    let reports = batch::run(&root, &ocr, &face, &options)?;
    let reports: BTreeMap<_, _> = reports.into_iter().collect();

    let mut not_valid = 0;
    for (doc_id, report) in &reports {
        println!("{} {} ({})", report.outcome, doc_id, report.statuses);
        if let Some(reason) = &report.reason {
            println!("    reason: {reason}");
        }
        if report.outcome != Outcome::Valid {
            not_valid += 1;
        }
    }

    println!(
        "\n[*] Summary: {} valid, {} not valid",
        reports.len() - not_valid,
        not_valid
    );

    if not_valid > 0 {
        anyhow::bail!("{not_valid} document(s) did not validate");
    }

    Ok(())
}

fn show_info(root: PathBuf, seed: u64) -> Result<()> {
    if !root.is_dir() {
        anyhow::bail!("root is not a directory: {}", root.display());
    }

    let catalog = PipelineCatalog::generate(seed);
    let plan = batch::discover(&root)?;

    println!("Validation plan");
    println!("===============");
    println!("Root: {}", root.display());
    println!("Catalog: {} pipelines", catalog.len());
    println!("Documents: {}", plan.inputs.len());
    for input in &plan.inputs {
        println!("  {} ({})", input.doc_id, input.id_path.display());
    }
    if !plan.rejected.is_empty() {
        println!("Rejected: {}", plan.rejected.len());
        for (doc_id, error) in &plan.rejected {
            println!("  {doc_id}: {error}");
        }
    }

    Ok(())
}
