//! Structured logging for the receipt-scanner backend.
//!
//! Handles log redaction and tracing initialization (console + rolling
//! NDJSON file output).

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
