//! Tesseract command-line recognizer

use std::io::Write;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{ProgressSink, RecognitionProgress, TextRecognizer};
use crate::error::{Error, Result};

/// Runs `<command> <image> stdout -l <language>` and returns its output
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    command: String,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(command: &str, language: &str) -> Self {
        Self {
            command: command.to_string(),
            language: language.to_string(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &[u8], progress: ProgressSink<'_>) -> Result<String> {
        if image.is_empty() {
            return Err(Error::Recognition("Image is empty".into()));
        }

        progress(RecognitionProgress::Started {
            engine: self.name().to_string(),
        });

        // Tesseract reads images from disk; it sniffs the format from content
        let mut file = tempfile::Builder::new().prefix("bartab-ocr-").tempfile()?;
        file.write_all(image)?;
        file.flush()?;

        progress(RecognitionProgress::Recognizing { progress: 0.1 });
        debug!(
            "Running {} on {} ({} bytes)",
            self.command,
            file.path().display(),
            image.len()
        );

        let output = Command::new(&self.command)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .await
            .map_err(|e| {
                Error::Recognition(format!("Failed to run '{}': {}", self.command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Recognition(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        progress(RecognitionProgress::Recognizing { progress: 1.0 });
        progress(RecognitionProgress::Finished {
            chars: text.chars().count(),
        });

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::ignore_progress;

    #[tokio::test]
    async fn test_missing_binary_is_recognition_error() {
        let recognizer = TesseractRecognizer::new("bartab-no-such-ocr-binary", "eng");
        let result = recognizer.recognize(b"not really a png", &ignore_progress).await;
        assert!(matches!(result, Err(Error::Recognition(_))));
    }

    #[tokio::test]
    async fn test_empty_image_rejected() {
        let result = TesseractRecognizer::default()
            .recognize(&[], &ignore_progress)
            .await;
        assert!(matches!(result, Err(Error::Recognition(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned() {
        // `echo` stands in for tesseract: it prints its arguments back
        let recognizer = TesseractRecognizer::new("echo", "eng");
        let text = recognizer.recognize(b"img", &ignore_progress).await.unwrap();
        assert!(text.contains("stdout -l eng"));
    }
}
