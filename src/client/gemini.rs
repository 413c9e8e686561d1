//! Gemini-backed restoration client

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};

use super::wire::{extract_image, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use super::{Restorer, RESTORE_PROMPT};
use crate::config::Config;
use crate::error::{RestoreError, Result};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Calls `generateContent` on a Gemini image model
pub struct GeminiClient {
    /// Full `...:generateContent` URL
    url: String,
    /// API key, sent as a header
    api_key: String,
    /// HTTP client
    client: Client,
}

impl GeminiClient {
    /// Create a client from resolved configuration
    pub fn new(config: &Config) -> Self {
        Self {
            url: generate_content_url(&config.endpoint, &config.model),
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }

    /// Target URL, for diagnostics
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn generate_content_url(endpoint: &str, model: &str) -> String {
    format!("{endpoint}/v1beta/models/{model}:generateContent")
}

/// Reject image data that cannot be decoded, so a broken answer is a failure
/// rather than a blank "complete" result
fn check_image_payload(result: Result<Option<String>>) -> Result<Option<String>> {
    if let Ok(Some(data)) = &result {
        if let Err(e) = STANDARD.decode(data.as_bytes()) {
            return Err(RestoreError::Transport(format!(
                "service returned an undecodable image: {e}"
            )));
        }
    }
    result
}

/// Turn a non-2xx response body into a readable message
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[async_trait]
impl Restorer for GeminiClient {
    async fn restore(&self, encoded_payload: &str, mime_type: &str) -> Result<Option<String>> {
        let image = STANDARD.decode(encoded_payload.as_bytes())?;
        let request = GenerateContentRequest::restoration(image, mime_type, RESTORE_PROMPT);

        tracing::info!("🪄 Sending {} image to {}", mime_type, self.url);

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ Error calling restoration service: {}", e);
                RestoreError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            tracing::error!("❌ Restoration service returned {}: {}", status, message);
            return Err(RestoreError::Transport(message));
        }

        let body: GenerateContentResponse = response.json().await?;
        let result = check_image_payload(extract_image(body));

        match &result {
            Ok(Some(data)) => {
                tracing::info!("✅ Received restored image ({} base64 chars)", data.len())
            }
            Ok(None) => tracing::warn!("⚠️  Response contained neither image nor text"),
            Err(e) => tracing::warn!("⚠️  {}", e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn config(endpoint: &str) -> Config {
        Config {
            api_key: "test-key".to_string(),
            model: "image-model".to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    /// One-shot HTTP server on loopback.
    ///
    /// Answers the first request with `status` and `body`, and hands back the
    /// raw request text through the join handle.
    async fn serve_once(
        status: &'static str,
        body: serde_json::Value,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 8192];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let body = body.to_string();
            let response = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (endpoint, handle)
    }

    /// Headers received and the whole body per Content-Length
    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    fn request_body(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn image_response(data: &str) -> serde_json::Value {
        json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is the restored photo." },
                { "inlineData": { "mimeType": "image/png", "data": data } }
            ]}}]
        })
    }

    #[test]
    fn test_url_includes_model() {
        let client = GeminiClient::new(&config("http://localhost:9999"));
        assert_eq!(
            client.url(),
            "http://localhost:9999/v1beta/models/image-model:generateContent"
        );
    }

    #[test]
    fn test_error_message_prefers_service_text() {
        let body = json!({
            "error": { "code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED" }
        });
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, &body.to_string()),
            "Permission denied"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "HTTP 502 Bad Gateway"
        );
    }

    #[tokio::test]
    async fn test_restore_posts_image_and_prompt() {
        let (endpoint, server) = serve_once("200 OK", image_response("UE5H")).await;
        let client = GeminiClient::new(&config(&endpoint));

        let result = client.restore("AQID", "image/jpeg").await;
        let request = server.await.unwrap();

        assert_eq!(result, Ok(Some("UE5H".to_string())));
        let request_line = request.lines().next().unwrap_or_default();
        assert_eq!(
            request_line,
            "POST /v1beta/models/image-model:generateContent HTTP/1.1"
        );
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key\r\n"));

        let body = request_body(&request);
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "AQID");
        assert_eq!(parts[1]["text"], RESTORE_PROMPT);
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            json!(["IMAGE", "TEXT"])
        );
    }

    #[tokio::test]
    async fn test_error_status_uses_service_message() {
        let envelope = json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        });
        let (endpoint, server) = serve_once("429 Too Many Requests", envelope).await;
        let client = GeminiClient::new(&config(&endpoint));

        let result = client.restore("AQID", "image/png").await;
        server.await.unwrap();

        assert_eq!(result, Err(RestoreError::Transport("Quota exceeded".to_string())));
    }

    #[tokio::test]
    async fn test_undecodable_image_is_transport_error() {
        let (endpoint, server) = serve_once("200 OK", image_response("***")).await;
        let client = GeminiClient::new(&config(&endpoint));

        let result = client.restore("AQID", "image/png").await;
        server.await.unwrap();

        assert!(matches!(result, Err(RestoreError::Transport(_))));
    }

    #[tokio::test]
    async fn test_text_answer_is_refusal() {
        let answer = json!({
            "candidates": [{ "content": { "parts": [{ "text": "unsafe content" }] } }]
        });
        let (endpoint, server) = serve_once("200 OK", answer).await;
        let client = GeminiClient::new(&config(&endpoint));

        let result = client.restore("AQID", "image/png").await;
        server.await.unwrap();

        assert_eq!(
            result,
            Err(RestoreError::ServiceRefusal("unsafe content".to_string()))
        );
    }

    #[test]
    fn test_check_image_payload_passes_valid_and_empty_outcomes() {
        let valid = Ok(Some("UE5H".to_string()));
        assert_eq!(check_image_payload(valid.clone()), valid);
        assert_eq!(check_image_payload(Ok(None)), Ok(None));
        assert_eq!(
            check_image_payload(Err(RestoreError::EmptyResult)),
            Err(RestoreError::EmptyResult)
        );
    }

    #[tokio::test]
    async fn test_invalid_payload_fails_before_sending() {
        // Nothing listens on port 9; reaching the network would surface as Transport
        let client = GeminiClient::new(&config("http://127.0.0.1:9"));
        let result = client.restore("%%% not base64 %%%", "image/png").await;
        assert!(matches!(result, Err(RestoreError::Encoding(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client = GeminiClient::new(&config("http://127.0.0.1:9"));
        let result = client.restore("AQID", "image/png").await;
        assert!(matches!(result, Err(RestoreError::Transport(_))));
    }
}
