use serde::Deserialize;

/// Instruction template appended to the raw OCR text when no prompt config
/// file is present. It dictates the JSON shape the model must return.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\n\nThe text above was extracted from a \
receipt image. Respond with only a JSON object of the shape \
{\"receipt\": {\"establishment\": string, \"date\": string, \"items\": \
[{\"name\": string, \"quantity\": integer, \"unitPrice\": number, \
\"totalPrice\": number}], \"tip\": number or null, \"total\": number}, \
\"categories\": [string]} where categories describes the spending types on \
the receipt. Do not wrap the JSON in markdown.";

/// Receipt-scanner runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Gemini API key (required for `/process`)
    pub gemini_api_key: Option<String>,
    /// Gemini model used for receipt structuring
    pub gemini_model: String,
    /// Language code passed to the speech engine
    pub tts_language: String,
    /// Directory uploaded receipt images are written to
    pub image_dir: String,
    /// Directory rendered audio files are written to
    pub audio_dir: String,
    /// Directory for rolling log files
    pub log_dir: String,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            tts_language: "en".to_string(),
            image_dir: "images".to_string(),
            audio_dir: "audio".to_string(),
            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: std::env::var("RECEIPT_BIND").unwrap_or(defaults.bind_address),
            port: std::env::var("RECEIPT_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            tts_language: std::env::var("RECEIPT_TTS_LANG").unwrap_or(defaults.tts_language),
            image_dir: std::env::var("RECEIPT_IMAGE_DIR").unwrap_or(defaults.image_dir),
            audio_dir: std::env::var("RECEIPT_AUDIO_DIR").unwrap_or(defaults.audio_dir),
            log_dir: std::env::var("RECEIPT_LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}

/// On-disk prompt configuration (`receipt-scanner.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    /// Instruction template concatenated after the raw OCR text.
    pub prompt: String,
}
