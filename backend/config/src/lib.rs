//! `receipt-config` — runtime configuration for the receipt-scanner backend.
//!
//! Two sources, both read once at startup and never mutated afterwards:
//! - environment variables (bind address, API key, directories, log level)
//! - a small JSON file carrying the Gemini prompt template

pub mod io;
pub mod schema;

pub use io::{load_prompt_template, prompt_config_path};
pub use schema::{Config, PromptConfig, DEFAULT_PROMPT_TEMPLATE};
