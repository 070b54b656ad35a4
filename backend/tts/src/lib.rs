//! Speech rendering for the receipt-scanner backend.

pub mod engine;
pub mod format;
pub mod renderer;

pub use engine::{GoogleTranslateTts, TtsProvider};
pub use format::format_receipt_text;
pub use renderer::SpeechRenderer;
