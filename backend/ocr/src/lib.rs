//! OCR adapter for the receipt-scanner backend.
//!
//! Bridges the external Tesseract engine to extract dense text from
//! uploaded receipt images.

pub mod tesseract;

use async_trait::async_trait;
use receipt_core::ReceiptError;
use std::path::Path;

/// Extracts UTF-8 text from an image on disk.
///
/// One engine session per call; implementations must not hold state across
/// calls.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn extract_text(&self, image_path: &Path) -> Result<String, ReceiptError>;
}

pub use tesseract::TesseractOcr;
