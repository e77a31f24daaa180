//! Test utilities for bartab-core
//!
//! This module provides a mock Ollama server that answers vision requests with
//! a fixed transcription, for recognizer and end-to-end autofill tests.

use axum::{
    extract::Json,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Text returned by the mock for any image
pub const MOCK_TRANSCRIPTION: &str = "Alice\nBeer = 2\nChips = 1\nSoda = 1\n";

/// Models the mock pretends to have pulled
const KNOWN_MODELS: &[&str] = &["llava", "llama3.2-vision"];

/// Mock Ollama server for testing and development
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: KNOWN_MODELS
            .iter()
            .map(|name| ModelInfo {
                name: format!("{}:latest", name),
            })
            .collect(),
    })
}

/// Ollama generate endpoint
///
/// Unknown models get a 404 like a real server without the model pulled;
/// requests without an image get a 400.
async fn handle_generate(
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    if !KNOWN_MODELS.contains(&request.model.as_str()) {
        return Err(StatusCode::NOT_FOUND);
    }
    if request.images.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(Json(GenerateResponse {
        model: request.model,
        response: MOCK_TRANSCRIPTION.to_string(),
        done: true,
    }))
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    #[allow(dead_code)]
    prompt: String,
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
}
