//! Text rewriting through a local Ollama-compatible generate endpoint
//!
//! The rewrite is strictly best-effort: [`Rewriter::rewrite`] returns the
//! original text on any failure (network error, timeout, non-2xx status,
//! malformed reply). Nothing is retried and nothing reaches the user.
//!
//! # Example Configuration
//!
//! ```toml
//! [rewrite]
//! endpoint = "http://localhost:11434/api/generate"
//! model = "qwen2.5:3b"
//! timeout_ms = 30000
//! ```

use crate::config::RewriteConfig;
use crate::error::RewriteError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout for the one-off model listing request
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Turns text into improved text
pub trait Rewriter: Send + Sync {
    /// Rewrite `text`, or hand it back unchanged if that is not possible
    fn rewrite(&self, text: &str) -> String;
}

/// Body of a generate request
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

/// HTTP client for the rewrite service
#[derive(Debug, Clone)]
pub struct RewriteClient {
    endpoint: String,
    models_endpoint: String,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl RewriteClient {
    /// Create a new client from configuration
    pub fn new(config: &RewriteConfig) -> Result<Self, RewriteError> {
        for (field, url) in [
            ("endpoint", &config.endpoint),
            ("models_endpoint", &config.models_endpoint),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RewriteError::Config(format!(
                    "{} must start with http:// or https://, got: {}",
                    field, url
                )));
            }
        }

        // Warn about non-HTTPS for non-localhost endpoints
        if config.endpoint.starts_with("http://")
            && !config.endpoint.contains("localhost")
            && !config.endpoint.contains("127.0.0.1")
            && !config.endpoint.contains("[::1]")
        {
            tracing::warn!(
                "Rewrite endpoint uses HTTP without TLS. Selected text will be transmitted unencrypted!"
            );
        }

        let timeout = Duration::from_millis(config.timeout_ms);

        tracing::debug!(
            "Configured rewrite client: endpoint={}, model={}, timeout={}ms",
            config.endpoint,
            config.model,
            timeout.as_millis()
        );

        Ok(Self {
            endpoint: config.endpoint.clone(),
            models_endpoint: config.models_endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Instructional prompt wrapped around the selected text
    pub fn prompt(text: &str) -> String {
        format!(
            "Rewrite in proper English with all slang expanded:\n\n{}\n\nRewritten:",
            text
        )
    }

    fn request_body(&self, text: &str) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.model,
            prompt: Self::prompt(text),
            stream: false,
            temperature: self.temperature,
        }
    }

    /// Send one generate request and return the trimmed `response` field
    pub fn try_rewrite(&self, text: &str) -> Result<String, RewriteError> {
        let start = std::time::Instant::now();

        let response = ureq::post(&self.endpoint)
            .timeout(self.timeout)
            .send_json(self.request_body(text))
            .map_err(map_ureq_error)?;

        let reply: GenerateResponse = response.into_json().map_err(|e| {
            RewriteError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let rewritten = reply.response.trim().to_string();

        tracing::debug!(
            "Rewrite completed in {:.2}s ({} -> {} chars)",
            start.elapsed().as_secs_f32(),
            text.chars().count(),
            rewritten.chars().count()
        );

        Ok(rewritten)
    }

    /// List the models the service has installed
    pub fn probe(&self) -> Result<Vec<String>, RewriteError> {
        let response = ureq::get(&self.models_endpoint)
            .timeout(PROBE_TIMEOUT)
            .call()
            .map_err(map_ureq_error)?;

        let tags: TagsResponse = response.into_json().map_err(|e| {
            RewriteError::InvalidResponse(format!("Failed to parse model list: {}", e))
        })?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether any installed model name contains the configured model
    pub fn has_model(&self, installed: &[String]) -> bool {
        installed.iter().any(|name| name.contains(&self.model))
    }
}

fn map_ureq_error(e: ureq::Error) -> RewriteError {
    match e {
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            RewriteError::Status { code, body }
        }
        ureq::Error::Transport(t) => RewriteError::Network(format!("Request failed: {}", t)),
    }
}

impl Rewriter for RewriteClient {
    fn rewrite(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        match self.try_rewrite(text) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                tracing::warn!("Rewrite failed: {}, keeping original text", e);
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Serve `app` on a random local port from a background thread
    fn spawn_stub(app: Router) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        format!("http://{}", addr)
    }

    fn client_for(base: &str, timeout_ms: u64) -> RewriteClient {
        RewriteClient::new(&RewriteConfig {
            endpoint: format!("{}/api/generate", base),
            models_endpoint: format!("{}/api/tags", base),
            timeout_ms,
            ..RewriteConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_successful_rewrite_is_trimmed() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        let app = Router::new().route(
            "/api/generate",
            post(move |Json(body): Json<Value>| {
                let seen = seen_clone.clone();
                async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({ "response": "  Can you help?\n" }))
                }
            }),
        );
        let client = client_for(&spawn_stub(app), 5000);

        assert_eq!(client.rewrite("sup can u help"), "Can you help?");

        let body = seen.lock().unwrap().take().expect("request body");
        assert_eq!(body["model"], "qwen2.5:3b");
        assert_eq!(body["stream"], false);
        assert_eq!(body["temperature"], 0.3);
        let prompt = body["prompt"].as_str().unwrap();
        assert!(prompt.starts_with("Rewrite in proper English"));
        assert!(prompt.contains("\n\nsup can u help\n\n"));
        assert!(prompt.ends_with("Rewritten:"));
    }

    #[test]
    fn test_server_error_falls_back() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model exploded") }),
        );
        let client = client_for(&spawn_stub(app), 5000);

        assert_eq!(client.rewrite("original text"), "original text");
        match client.try_rewrite("original text") {
            Err(RewriteError::Status { code, body }) => {
                assert_eq!(code, 500);
                assert_eq!(body, "model exploded");
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_reply_falls_back() {
        let app = Router::new()
            .route("/api/generate", post(|| async { "definitely not json" }));
        let client = client_for(&spawn_stub(app), 5000);

        assert_eq!(client.rewrite("original text"), "original text");
    }

    #[test]
    fn test_missing_response_field_falls_back() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "done": true })) }),
        );
        let client = client_for(&spawn_stub(app), 5000);

        assert!(matches!(
            client.try_rewrite("original text"),
            Err(RewriteError::InvalidResponse(_))
        ));
        assert_eq!(client.rewrite("original text"), "original text");
    }

    #[test]
    fn test_timeout_falls_back() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "response": "too late" }))
            }),
        );
        let client = client_for(&spawn_stub(app), 200);

        assert_eq!(client.rewrite("original text"), "original text");
    }

    #[test]
    fn test_unreachable_service_falls_back() {
        // Nothing listens on the discard port
        let client = client_for("http://127.0.0.1:9", 1000);
        for text in ["original text", "", "   ", "Hello 世界! 🎉"] {
            assert_eq!(client.rewrite(text), text);
        }
    }

    #[test]
    fn test_blank_input_skips_request() {
        let hits = Arc::new(Mutex::new(0usize));
        let hits_clone = hits.clone();
        let app = Router::new().route(
            "/api/generate",
            post(move || {
                let hits = hits_clone.clone();
                async move {
                    *hits.lock().unwrap() += 1;
                    Json(json!({ "response": "something" }))
                }
            }),
        );
        let client = client_for(&spawn_stub(app), 5000);

        assert_eq!(client.rewrite(""), "");
        assert_eq!(client.rewrite(" \n\t"), " \n\t");
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn test_empty_response_is_returned_empty() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "response": "   " })) }),
        );
        let client = client_for(&spawn_stub(app), 5000);

        assert_eq!(client.rewrite("original text"), "");
    }

    #[test]
    fn test_probe_lists_models() {
        let app = Router::new().route(
            "/api/tags",
            get(|| async {
                Json(json!({
                    "models": [
                        { "name": "qwen2.5:3b", "size": 1 },
                        { "name": "llama3.2:1b", "size": 2 }
                    ]
                }))
            }),
        );
        let client = client_for(&spawn_stub(app), 5000);

        let models = client.probe().unwrap();
        assert_eq!(models, vec!["qwen2.5:3b", "llama3.2:1b"]);
        assert!(client.has_model(&models));
    }

    #[test]
    fn test_has_model_substring_match() {
        let client = client_for("http://localhost:11434", 5000);
        assert!(client.has_model(&["library/qwen2.5:3b-instruct".to_string()]));
        assert!(!client.has_model(&["llama3.2:1b".to_string()]));
        assert!(!client.has_model(&[]));
    }

    #[test]
    fn test_probe_unreachable() {
        let client = client_for("http://127.0.0.1:9", 1000);
        assert!(matches!(client.probe(), Err(RewriteError::Network(_))));
    }

    #[test]
    fn test_config_validation_invalid_url() {
        let config = RewriteConfig {
            endpoint: "localhost:11434/api/generate".to_string(),
            ..RewriteConfig::default()
        };
        let err = RewriteClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_custom_timeout() {
        let client = client_for("http://localhost:11434", 1234);
        assert_eq!(client.timeout, Duration::from_millis(1234));
    }
}
