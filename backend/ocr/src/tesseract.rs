//! Tesseract OCR engine adapter.
//!
//! Spawns the `tesseract` binary once per call and reads the recognized
//! text from stdout. The child process is the engine session: it is
//! acquired at spawn and released when the process exits, so no engine
//! state survives a call.

use async_trait::async_trait;
use receipt_core::ReceiptError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::OcrEngine;

/// OCR adapter invoking the system `tesseract` binary.
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Override the engine binary path (used by tests and packaging).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn extract_text(&self, image_path: &Path) -> Result<String, ReceiptError> {
        // Fail before spawning if the upload never made it to disk.
        if !image_path.exists() {
            return Err(ReceiptError::Ocr(format!(
                "image file not found: {}",
                image_path.display()
            )));
        }

        info!(image = %image_path.display(), "Running OCR on image file");

        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ReceiptError::Ocr(format!("failed to launch tesseract: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReceiptError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!(chars = text.len(), "OCR extraction complete");
        Ok(text)
    }
}
