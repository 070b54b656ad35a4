//! HTTP routes for the receipt-scanner gateway.
//!
//! Every route runs its pipeline strictly sequentially and aborts on the
//! first failure; nothing is retried.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use receipt_core::{Receipt, ReceiptError};
use receipt_tts::format_receipt_text;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/process", post(process_image))
        .route("/tts", post(tts_text))
        .route("/tts/receipt", post(tts_receipt))
        .with_state(state)
}

async fn liveness() -> &'static str {
    "OK"
}

/// Response for `POST /process`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub receipt: Receipt,
    pub categories: Vec<String>,
    pub raw_text: String,
}

/// `POST /process` — multipart upload field `image`; runs OCR then
/// structuring and returns the combined result.
pub async fn process_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut multipart =
        multipart.map_err(|e| ApiError::bad_request(format!("invalid upload: {e}")))?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("image") {
            let file_name = field.file_name().map(str::to_owned);
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;
            image = Some((file_name, data));
            break;
        }
    }
    let (file_name, data) =
        image.ok_or_else(|| ApiError::bad_request("multipart field 'image' is required"))?;
    if data.is_empty() {
        return Err(ApiError::bad_request("uploaded image is empty"));
    }

    // Client filenames never touch the filesystem path; only the extension
    // survives, and only if it is a known image extension.
    let stored_name = format!(
        "{}.{}",
        Uuid::new_v4(),
        image_extension(file_name.as_deref())
    );
    let image_path = state.image_dir.join(&stored_name);

    tokio::fs::create_dir_all(&state.image_dir)
        .await
        .map_err(|e| ReceiptError::Storage(format!("failed to create image dir: {e}")))?;
    tokio::fs::write(&image_path, &data)
        .await
        .map_err(|e| ReceiptError::Storage(format!("failed to save upload: {e}")))?;

    info!(path = %image_path.display(), bytes = data.len(), "Saved uploaded receipt image");

    let raw_text = state.ocr.extract_text(&image_path).await?;
    let structured = state.structurer.structure(&raw_text).await?;

    Ok(Json(ProcessResponse {
        receipt: structured.receipt,
        categories: structured.categories,
        raw_text,
    }))
}

#[derive(Debug, Deserialize)]
pub struct TtsTextRequest {
    #[serde(default)]
    pub text: String,
}

/// `POST /tts` — render raw text to speech and return the audio bytes.
pub async fn tts_text(
    State(state): State<AppState>,
    payload: Result<Json<TtsTextRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("Invalid JSON payload"))?;

    if request.text.is_empty() {
        return Err(ApiError::bad_request("Text field is required"));
    }

    let path = state.renderer.render(&request.text).await?;
    serve_audio(&path).await
}

/// `POST /tts/receipt` — render a full receipt to speech.
pub async fn tts_receipt(
    State(state): State<AppState>,
    payload: Result<Json<Receipt>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(receipt) = payload.map_err(|_| ApiError::bad_request("Invalid JSON payload"))?;

    let text = format_receipt_text(&receipt);
    let path = state.renderer.render(&text).await?;
    serve_audio(&path).await
}

async fn serve_audio(path: &Path) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::internal(format!("failed to read audio file: {e}")))?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response())
}

/// Pick a storage extension from the client-supplied filename.
fn image_extension(file_name: Option<&str>) -> &'static str {
    let ext = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "jpg",
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        "bmp" => "bmp",
        "tiff" | "tif" => "tiff",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use bytes::Bytes;
    use receipt_core::{LineItem, StructuredReceipt};
    use receipt_ocr::OcrEngine;
    use receipt_structuring::{MockStructurer, ReceiptStructurer};
    use receipt_tts::{SpeechRenderer, TtsProvider};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// OCR stub that returns the saved file's content, which makes the
    /// upload→save→read path observable from the response body.
    struct FileEchoOcr;

    #[async_trait]
    impl OcrEngine for FileEchoOcr {
        async fn extract_text(&self, path: &Path) -> Result<String, ReceiptError> {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ReceiptError::Ocr(e.to_string()))?;
            Ok(String::from_utf8_lossy(&bytes).to_string())
        }
    }

    struct CountingTts(Arc<AtomicUsize>);

    #[async_trait]
    impl TtsProvider for CountingTts {
        async fn synthesize(&self, _text: &str) -> Result<Bytes, ReceiptError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(b"ID3fake-mp3-bytes"))
        }
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
            categories: vec!["food".to_string()],
        }
    }

    fn test_app(structurer: Arc<dyn ReceiptStructurer>, tts_calls: Arc<AtomicUsize>) -> Router {
        let work_dir = std::env::temp_dir().join(format!("receipt-gateway-test-{}", Uuid::new_v4()));
        let renderer = Arc::new(SpeechRenderer::new(
            Arc::new(CountingTts(tts_calls)),
            work_dir.join("audio"),
        ));
        router(AppState::new(
            Arc::new(FileEchoOcr),
            structurer,
            renderer,
            work_dir.join("images"),
        ))
    }

    fn multipart_request(content: &str, filename: &str) -> Request<Body> {
        let boundary = "receipt-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n\
             Content-Type: image/png\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn liveness_responds() {
        let app = test_app(
            Arc::new(MockStructurer::returning(cafe_receipt())),
            Arc::new(AtomicUsize::new(0)),
        );
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn process_returns_receipt_categories_and_raw_text() {
        let app = test_app(
            Arc::new(MockStructurer::returning(cafe_receipt())),
            Arc::new(AtomicUsize::new(0)),
        );
        let response = app
            .oneshot(multipart_request("receipt fixture text", "receipt.png"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "receipt": {
                    "establishment": "Cafe",
                    "date": "2024-01-01",
                    "items": [
                        {"name": "Coffee", "quantity": 1, "unitPrice": 3.5, "totalPrice": 3.5}
                    ],
                    "tip": 0.5,
                    "total": 4.0
                },
                "categories": ["food"],
                "rawText": "receipt fixture text"
            })
        );
    }

    #[tokio::test]
    async fn process_without_image_field_is_400() {
        let app = test_app(
            Arc::new(MockStructurer::returning(cafe_receipt())),
            Arc::new(AtomicUsize::new(0)),
        );
        let boundary = "receipt-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             hello\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("image"));
    }

    #[tokio::test]
    async fn process_structuring_failure_aborts_pipeline() {
        let app = test_app(
            Arc::new(MockStructurer::failing("model returned free text")),
            Arc::new(AtomicUsize::new(0)),
        );
        let response = app
            .oneshot(multipart_request("text", "receipt.jpg"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("free text"));
    }

    #[tokio::test]
    async fn concurrent_process_requests_do_not_interfere() {
        let app = test_app(
            Arc::new(MockStructurer::returning(cafe_receipt())),
            Arc::new(AtomicUsize::new(0)),
        );

        let (first, second) = tokio::join!(
            app.clone()
                .oneshot(multipart_request("receipt one text", "one.png")),
            app.clone()
                .oneshot(multipart_request("receipt two text", "two.jpg")),
        );

        let first = body_json(first.unwrap()).await;
        let second = body_json(second.unwrap()).await;
        assert_eq!(first["rawText"], "receipt one text");
        assert_eq!(second["rawText"], "receipt two text");
    }

    #[tokio::test]
    async fn tts_returns_audio_bytes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_app(
            Arc::new(MockStructurer::returning(cafe_receipt())),
            calls.clone(),
        );
        let response = app
            .oneshot(json_request("/tts", json!({"text": "hello receipt"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/mpeg"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn tts_empty_text_is_400_without_downstream_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_app(
            Arc::new(MockStructurer::returning(cafe_receipt())),
            calls.clone(),
        );
        let response = app
            .oneshot(json_request("/tts", json!({"text": ""})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Text field is required");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn tts_malformed_json_is_400() {
        let app = test_app(
            Arc::new(MockStructurer::returning(cafe_receipt())),
            Arc::new(AtomicUsize::new(0)),
        );
        let request = Request::builder()
            .method("POST")
            .uri("/tts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid JSON payload");
    }

    #[tokio::test]
    async fn tts_receipt_renders_formatted_receipt() {
        let app = test_app(
            Arc::new(MockStructurer::returning(cafe_receipt())),
            Arc::new(AtomicUsize::new(0)),
        );
        let response = app
            .oneshot(json_request(
                "/tts/receipt",
                json!({
                    "establishment": "Cafe",
                    "date": "2024-01-01",
                    "items": [
                        {"name": "Coffee", "quantity": 1, "unitPrice": 3.5, "totalPrice": 3.5}
                    ],
                    "tip": 0.5,
                    "total": 4.0
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn image_extension_is_allowlisted() {
        assert_eq!(image_extension(Some("receipt.JPG")), "jpg");
        assert_eq!(image_extension(Some("../../etc/passwd")), "png");
        assert_eq!(image_extension(Some("no-extension")), "png");
        assert_eq!(image_extension(None), "png");
        assert_eq!(image_extension(Some("scan.tif")), "tiff");
    }
}
