//! Canned recognizer for tests and dry runs

use async_trait::async_trait;

use super::{ProgressSink, RecognitionProgress, TextRecognizer};
use crate::error::{Error, Result};

/// Returns fixed text for any image, or fails on demand
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    text: String,
    fail: bool,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fail: false,
        }
    }

    /// A recognizer whose every call fails
    pub fn failing() -> Self {
        Self {
            text: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl TextRecognizer for MockRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(&self, image: &[u8], progress: ProgressSink<'_>) -> Result<String> {
        progress(RecognitionProgress::Started {
            engine: self.name().to_string(),
        });

        if self.fail || image.is_empty() {
            return Err(Error::Recognition("mock recognizer failure".into()));
        }

        progress(RecognitionProgress::Recognizing { progress: 1.0 });
        progress(RecognitionProgress::Finished {
            chars: self.text.chars().count(),
        });
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_mock_reports_progress_in_order() {
        let events = Mutex::new(Vec::new());
        let sink = |event: RecognitionProgress| events.lock().unwrap().push(event);

        let text = MockRecognizer::new("Alice\nBeer = 1")
            .recognize(b"img", &sink)
            .await
            .unwrap();

        assert_eq!(text, "Alice\nBeer = 1");
        let events = events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                RecognitionProgress::Started {
                    engine: "mock".into()
                },
                RecognitionProgress::Recognizing { progress: 1.0 },
                RecognitionProgress::Finished { chars: 14 },
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let result = MockRecognizer::failing()
            .recognize(b"img", &crate::recognizer::ignore_progress)
            .await;
        assert!(matches!(result, Err(Error::Recognition(_))));
    }
}
