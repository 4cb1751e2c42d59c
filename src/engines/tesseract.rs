use std::process::Command;

use anyhow::{Context, Result};
use image::DynamicImage;

use crate::engines::TextEngine;

/// OCR via the `tesseract` binary. The processed image is written to a
/// scratch PNG and read back from stdout, lowercased.
#[derive(Debug, Clone)]
pub struct TesseractBridge {
    lang: String,
}

impl TesseractBridge {
    pub fn new() -> Self {
        Self {
            lang: "eng".to_string(),
        }
    }

    pub fn with_lang(mut self, lang: String) -> Self {
        self.lang = lang;
        self
    }
}

impl Default for TesseractBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine for TesseractBridge {
    fn extract_text(&self, image: &DynamicImage) -> Result<String> {
        let scratch = tempfile::tempdir().with_context(|| "failed to create scratch dir")?;
        let image_path = scratch.path().join("frame.png");
        image
            .save(&image_path)
            .with_context(|| "failed to write scratch image")?;

        let output = Command::new("tesseract")
            .arg(&image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .with_context(|| "failed to invoke tesseract; is it installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tesseract failed: {stderr}");
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_lowercase())
    }
}
