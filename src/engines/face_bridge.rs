use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use image::DynamicImage;
use serde::Deserialize;

use crate::engines::{FaceEncoding, FaceEngine};

#[derive(Debug, Deserialize)]
struct FaceResponse {
    /// Feature vector of the first face found, absent when none was.
    encoding: Option<Vec<f64>>,
}

/// Face encoding via a python helper wrapping `face_recognition`. The
/// helper prints a JSON object (`{"encoding": [...]}` or
/// `{"encoding": null}`) on stdout.
#[derive(Debug, Clone)]
pub struct FaceBridge {
    script_path: PathBuf,
    model: String,
}

impl FaceBridge {
    pub fn new() -> Self {
        Self {
            script_path: PathBuf::from("scripts/face_encoding.py"),
            model: "large".to_string(),
        }
    }

    pub fn with_script(mut self, script_path: PathBuf) -> Self {
        self.script_path = script_path;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

impl Default for FaceBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceEngine for FaceBridge {
    fn encode(&self, image: &DynamicImage) -> Result<Option<FaceEncoding>> {
        let scratch = tempfile::tempdir().with_context(|| "failed to create scratch dir")?;
        let image_path = scratch.path().join("face.png");
        image
            .save(&image_path)
            .with_context(|| "failed to write scratch image")?;

        let output = Command::new("python3")
            .arg(&self.script_path)
            .arg("--image")
            .arg(&image_path)
            .arg("--model")
            .arg(&self.model)
            .output()
            .with_context(|| "failed to invoke python face bridge")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("face bridge failed: {stderr}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let response: FaceResponse = serde_json::from_str(&stdout)
            .with_context(|| "failed to parse face bridge JSON response")?;
        Ok(response.encoding)
    }
}
