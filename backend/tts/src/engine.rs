//! TTS provider trait and the Google Translate implementation.

use async_trait::async_trait;
use bytes::Bytes;
use receipt_core::ReceiptError;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

/// Per-request timeout for the speech engine call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns raw MP3 audio bytes for the given text.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Bytes, ReceiptError>;
}

/// Speech engine backed by the Google Translate TTS endpoint.
///
/// Unauthenticated GET returning MP3 bytes; the engine rejects very long
/// inputs, unsupported characters fail at the engine and surface as
/// `TtsFailure`.
pub struct GoogleTranslateTts {
    client: Client,
    language: String,
    base_url: String,
}

impl GoogleTranslateTts {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            language: language.into(),
            base_url: "https://translate.google.com/translate_tts".to_string(),
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TtsProvider for GoogleTranslateTts {
    async fn synthesize(&self, text: &str) -> Result<Bytes, ReceiptError> {
        info!(chars = text.len(), language = %self.language, "Synthesizing speech");

        let resp = self
            .client
            .get(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ReceiptError::Tts(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ReceiptError::Tts(format!(
                "speech engine returned status {}",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ReceiptError::Tts(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ReceiptError::Tts("speech engine returned no audio".to_string()));
        }

        Ok(bytes)
    }
}
