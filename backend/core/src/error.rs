use thiserror::Error;

/// Top-level error type for the receipt-scanner pipeline.
///
/// Every failure aborts the current request immediately; nothing here is
/// retried anywhere in the stack.
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("invalid input: {0}")]
    Input(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    /// The generative API answered with a non-success HTTP status.
    #[error("Gemini API request failed with status code: {0}")]
    ApiStatus(u16),

    /// The generative API could not be reached at all.
    #[error("Gemini API request failed: {0}")]
    ApiTransport(String),

    #[error("failed to parse model output: {0}")]
    Parse(String),

    #[error("speech synthesis failed: {0}")]
    Tts(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReceiptError {
    /// Whether this failure originated in the external generative API.
    pub fn is_api_failure(&self) -> bool {
        matches!(self, Self::ApiStatus(_) | Self::ApiTransport(_))
    }
}
