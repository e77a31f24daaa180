//! Ollama vision-model recognizer
//!
//! Sends the image to `/api/generate` with a transcription prompt and returns
//! the model's answer verbatim. Works with any vision-capable model
//! (llama3.2-vision, llava, ...).

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProgressSink, RecognitionProgress, TextRecognizer};
use crate::error::{Error, Result};

const TRANSCRIBE_PROMPT: &str = "Transcribe all text in this image exactly as written. \
Keep one output line per line of text in the image. \
Output only the transcribed text, with no commentary.";

/// Ollama backend that only does transcription
#[derive(Clone)]
pub struct OllamaVisionRecognizer {
    http_client: Client,
    base_url: String,
    model: String,
}

/// Request to Ollama API with images (for vision models)
#[derive(Debug, Serialize)]
struct OllamaVisionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaVisionRecognizer {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextRecognizer for OllamaVisionRecognizer {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn recognize(&self, image: &[u8], progress: ProgressSink<'_>) -> Result<String> {
        if image.is_empty() {
            return Err(Error::Recognition("Image is empty".into()));
        }

        progress(RecognitionProgress::Started {
            engine: format!("{} ({})", self.name(), self.model),
        });

        let request = OllamaVisionRequest {
            model: &self.model,
            prompt: TRANSCRIBE_PROMPT,
            images: vec![base64::engine::general_purpose::STANDARD.encode(image)],
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        progress(RecognitionProgress::Recognizing { progress: 0.5 });

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Recognition(format!(
                "Ollama returned {} for model {}",
                status, self.model
            )));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama transcription: {}", ollama_response.response);

        let text = ollama_response.response;
        progress(RecognitionProgress::Recognizing { progress: 1.0 });
        progress(RecognitionProgress::Finished {
            chars: text.chars().count(),
        });
        Ok(text)
    }
}
