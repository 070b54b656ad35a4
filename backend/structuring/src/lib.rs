//! Receipt structuring client.
//!
//! Sends raw OCR text to the Gemini `generateContent` API together with a
//! configured instruction template and parses the model's reply into a
//! [`StructuredReceipt`].

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use receipt_core::{ReceiptError, StructuredReceipt};

/// Turns raw receipt text into a structured receipt plus spending
/// categories. Single attempt per call; failures are never retried here.
#[async_trait]
pub trait ReceiptStructurer: Send + Sync {
    async fn structure(&self, raw_text: &str) -> Result<StructuredReceipt, ReceiptError>;
}

pub use gemini::{strip_code_fences, GeminiStructurer};
pub use mock::MockStructurer;
