//! Audio file output.

use bytes::Bytes;
use receipt_core::ReceiptError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::info;

use crate::TtsProvider;

/// Renders text to an MP3 file under a dedicated output directory.
pub struct SpeechRenderer {
    provider: Arc<dyn TtsProvider>,
    output_dir: PathBuf,
}

impl SpeechRenderer {
    pub fn new(provider: Arc<dyn TtsProvider>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Synthesize `text` and write one audio file, returning its path.
    ///
    /// The filename is derived from a nanosecond clock reading so that
    /// concurrent requests never overwrite each other's output.
    pub async fn render(&self, text: &str) -> Result<PathBuf, ReceiptError> {
        let audio = self.provider.synthesize(text).await?;
        let path = self.output_dir.join(generate_filename());

        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ReceiptError::Storage(format!("failed to create audio dir: {e}")))?;
        write_audio(&path, &audio).await?;

        info!(path = %path.display(), bytes = audio.len(), "Rendered speech file");
        Ok(path)
    }
}

/// Unique filename based on the current timestamp.
fn generate_filename() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("output_{nanos}.mp3")
}

async fn write_audio(path: &Path, audio: &Bytes) -> Result<(), ReceiptError> {
    fs::write(path, audio)
        .await
        .map_err(|e| ReceiptError::Storage(format!("failed to write audio file: {e}")))
}
