//! Text recognition engines
//!
//! Turning pixels into text is delegated to an external engine. Every engine
//! implements `TextRecognizer`: it takes raw image bytes, reports progress as a
//! stream of `RecognitionProgress` events, and returns the recognized text as a
//! single string. The autofill code only ever sees that final string.
//!
//! Engines:
//! - `TesseractRecognizer` - runs the local `tesseract` binary
//! - `OllamaVisionRecognizer` - asks an Ollama vision model to transcribe the image
//! - `MockRecognizer` - canned text for tests and dry runs

mod mock;
mod ollama;
mod tesseract;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

pub use mock::MockRecognizer;
pub use ollama::OllamaVisionRecognizer;
pub use tesseract::TesseractRecognizer;

/// Progress reported while an image is being recognized
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecognitionProgress {
    /// The engine accepted the image
    Started { engine: String },
    /// Fraction of work done, in `0.0..=1.0`
    Recognizing { progress: f32 },
    /// Recognition finished and produced `chars` characters
    Finished { chars: usize },
}

/// Sink for progress events
pub type ProgressSink<'a> = &'a (dyn Fn(RecognitionProgress) + Send + Sync);

/// A sink that drops every event
pub fn ignore_progress(_: RecognitionProgress) {}

/// An engine that turns an image into text
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Short engine name for logs and progress events
    fn name(&self) -> &str;

    /// Recognize the text in an image
    async fn recognize(&self, image: &[u8], progress: ProgressSink<'_>) -> Result<String>;
}
