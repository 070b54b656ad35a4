//! Receipt-scanner HTTP gateway.
//!
//! Orchestrates the per-request pipeline: upload → OCR → structuring →
//! (optional) speech rendering, and maps every failure to an
//! `{"error": message}` JSON response.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use server::start_server;
pub use state::AppState;
