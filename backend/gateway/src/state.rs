use receipt_ocr::OcrEngine;
use receipt_structuring::ReceiptStructurer;
use receipt_tts::SpeechRenderer;
use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across routes.
///
/// Everything here is read-only after startup; components are injected so
/// tests can substitute stubs for the external engines.
#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<dyn OcrEngine>,
    pub structurer: Arc<dyn ReceiptStructurer>,
    pub renderer: Arc<SpeechRenderer>,
    pub image_dir: PathBuf,
}

impl AppState {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        structurer: Arc<dyn ReceiptStructurer>,
        renderer: Arc<SpeechRenderer>,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ocr,
            structurer,
            renderer,
            image_dir: image_dir.into(),
        }
    }
}
