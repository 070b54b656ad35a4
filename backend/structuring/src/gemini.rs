//! Gemini `generateContent` client.
//!
//! The API key travels as a URL query parameter and the prompt rides in the
//! `contents[].parts[].text` envelope. The model's text output tends to
//! arrive wrapped in a markdown code fence, which is stripped before JSON
//! parsing.

use async_trait::async_trait;
use receipt_core::{ReceiptError, StructuredReceipt};
use receipt_logging::redact_sensitive_data;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::ReceiptStructurer;

/// Per-request timeout for the generative API call. The original service
/// waited forever; this bound is a deliberate deviation.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// --- request envelope ---

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

// --- response envelope ---

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// Receipt structurer backed by the Gemini generative-language API.
pub struct GeminiStructurer {
    client: Client,
    api_key: String,
    model: String,
    prompt_template: String,
    base_url: String,
}

impl GeminiStructurer {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            prompt_template: prompt_template.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ReceiptStructurer for GeminiStructurer {
    async fn structure(&self, raw_text: &str) -> Result<StructuredReceipt, ReceiptError> {
        // Raw text first, instruction template second.
        let prompt = format!("{raw_text}{}", self.prompt_template);

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        debug!(url = %redact_sensitive_data(&url), "Sending receipt text to Gemini");

        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ReceiptError::ApiTransport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ReceiptError::ApiStatus(resp.status().as_u16()));
        }

        let response: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ReceiptError::Parse(format!("invalid Gemini response envelope: {e}")))?;

        let structured = parse_model_output(response)?;
        info!(
            establishment = %structured.receipt.establishment,
            items = structured.receipt.items.len(),
            categories = structured.categories.len(),
            "Structured receipt from model output"
        );
        Ok(structured)
    }
}

/// Extract the first candidate's text and parse it into a structured
/// receipt. An empty candidate or parts list is a parse failure, never an
/// index panic.
pub(crate) fn parse_model_output(
    response: GenerateResponse,
) -> Result<StructuredReceipt, ReceiptError> {
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.as_str())
        .ok_or_else(|| {
            ReceiptError::Parse("Gemini response contained no candidates".to_string())
        })?;

    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned)
        .map_err(|e| ReceiptError::Parse(format!("model output is not valid receipt JSON: {e}")))
}

/// Strip markdown code-fence artifacts from model output.
///
/// Plain substring removal of backticks and the literal token `json`, not a
/// markdown parser. `json` occurring inside legitimate string values is
/// removed too; that false positive is accepted, documented behavior.
pub fn strip_code_fences(text: &str) -> String {
    text.replace('`', "").replace("json", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use receipt_core::{LineItem, Receipt};

    fn envelope(text: &str) -> GenerateResponse {
        serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": text}]}}
            ]
        }))
        .unwrap()
    }

    fn cafe_json() -> String {
        serde_json::json!({
            "receipt": {
                "establishment": "Cafe",
                "date": "2024-01-01",
                "items": [
                    {"name": "Coffee", "quantity": 1, "unitPrice": 3.5, "totalPrice": 3.5}
                ],
                "tip": 0.5,
                "total": 4.0
            },
            "categories": ["food", "beverages"]
        })
        .to_string()
    }

    fn cafe_receipt() -> StructuredReceipt {
        StructuredReceipt {
            receipt: Receipt {
                establishment: "Cafe".to_string(),
                date: "2024-01-01".to_string(),
                items: vec![LineItem {
                    name: "Coffee".to_string(),
                    quantity: 1,
                    unit_price: 3.5,
                    total_price: 3.5,
                }],
                tip: Some(0.5),
                total: 4.0,
            },
            categories: vec!["food".to_string(), "beverages".to_string()],
        }
    }

    #[test]
    fn parses_bare_json_output() {
        let parsed = parse_model_output(envelope(&cafe_json())).unwrap();
        assert_eq!(parsed, cafe_receipt());
    }

    #[test]
    fn parses_fenced_json_output() {
        let fenced = format!("```json\n{}\n```", cafe_json());
        let parsed = parse_model_output(envelope(&fenced)).unwrap();
        assert_eq!(parsed, cafe_receipt());
    }

    #[test]
    fn zero_candidates_is_parse_failure() {
        let response: GenerateResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        let err = parse_model_output(response).unwrap_err();
        assert!(matches!(err, ReceiptError::Parse(_)));
        assert!(err.to_string().contains("no candidates"));
    }

    #[test]
    fn missing_candidates_field_is_parse_failure() {
        let response: GenerateResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parse_model_output(response).is_err());
    }

    #[test]
    fn free_text_output_is_parse_failure() {
        let err = parse_model_output(envelope("Sorry, I cannot read this receipt.")).unwrap_err();
        assert!(matches!(err, ReceiptError::Parse(_)));
    }

    #[test]
    fn defencing_is_idempotent_on_fenced_output() {
        let fenced = format!("```json\n{}\n```", cafe_json());
        let once = strip_code_fences(&fenced);
        let twice = strip_code_fences(&once);
        assert_eq!(once, twice);
    }

    // Pins the documented limitation: the token is removed even inside
    // legitimate string values.
    #[test]
    fn defencing_eats_json_substring_in_values() {
        let cleaned = strip_code_fences(r#"{"establishment": "jsonbar"}"#);
        assert_eq!(cleaned, r#"{"establishment": "bar"}"#);
    }
}
