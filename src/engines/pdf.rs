use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use image::DynamicImage;

const RENDER_DPI: u32 = 200;

/// Whether a document file needs rasterizing before it can be decoded.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Rasterize the first page of a PDF via `pdftoppm` and decode it.
///
/// Scanned ids and headshots sometimes arrive as single-page PDFs; only
/// the first page carries the document.
pub fn render_first_page(pdf_path: &Path) -> Result<DynamicImage> {
    let scratch = tempfile::tempdir().with_context(|| "failed to create scratch dir")?;
    let prefix = scratch.path().join("page");
    let prefix_str = prefix
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("non-UTF8 output path not supported"))?;

    let output = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(RENDER_DPI.to_string())
        .arg("-f")
        .arg("1")
        .arg("-l")
        .arg("1")
        .arg(pdf_path)
        .arg(prefix_str)
        .output()
        .with_context(|| "failed to invoke pdftoppm; is poppler-utils installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("pdftoppm failed on {}: {stderr}", pdf_path.display());
    }

    // pdftoppm picks its own page-number padding (`page-1.png`,
    // `page-01.png`, ...); with a single requested page the scratch dir
    // holds exactly one output file.
    let rendered = fs::read_dir(scratch.path())
        .with_context(|| "failed to read scratch dir")?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .find(|p| p.extension().and_then(|ext| ext.to_str()) == Some("png"))
        .ok_or_else(|| anyhow::anyhow!("pdftoppm produced no page for {}", pdf_path.display()))?;

    image::open(&rendered)
        .with_context(|| format!("failed to decode rendered page of {}", pdf_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_detected_case_insensitively() {
        assert!(is_pdf(Path::new("doc/id.pdf")));
        assert!(is_pdf(Path::new("doc/id.PDF")));
        assert!(!is_pdf(Path::new("doc/id.png")));
        assert!(!is_pdf(Path::new("doc/id")));
    }
}
