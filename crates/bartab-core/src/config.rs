//! Recognizer configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/bartab/config/recognizer.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables are applied on top of whichever file was used.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::recognizer::{OllamaVisionRecognizer, TesseractRecognizer, TextRecognizer};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/recognizer.toml");

/// Which engine `build()` produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Tesseract,
    Ollama,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tesseract => "tesseract",
            Self::Ollama => "ollama",
        }
    }
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tesseract" => Ok(Self::Tesseract),
            "ollama" => Ok(Self::Ollama),
            _ => Err(format!("Unknown recognition engine: {}", s)),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved recognizer settings
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerConfig {
    pub engine: EngineKind,
    pub tesseract_command: String,
    pub tesseract_language: String,
    pub ollama_host: String,
    pub ollama_model: String,
    pub ollama_timeout: Duration,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Tesseract,
            tesseract_command: "tesseract".to_string(),
            tesseract_language: "eng".to_string(),
            ollama_host: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2-vision".to_string(),
            ollama_timeout: Duration::from_secs(120),
        }
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    recognizer: Option<RawRecognizer>,
    tesseract: Option<RawTesseract>,
    ollama: Option<RawOllama>,
}

#[derive(Debug, Deserialize)]
struct RawRecognizer {
    engine: Option<EngineKind>,
}

#[derive(Debug, Deserialize)]
struct RawTesseract {
    command: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOllama {
    host: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

/// Default override location for the recognizer config
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("bartab").join("config").join("recognizer.toml"))
}

impl RecognizerConfig {
    /// Load config from the override location (or embedded defaults) plus environment
    pub fn load() -> Result<Self> {
        let path = default_config_path();
        let config = Self::load_from(path.as_deref())?;
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Load config from a specific file, falling back to embedded defaults if it is missing
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(p) if p.exists() => {
                debug!("Loading recognizer config from {}", p.display());
                fs::read_to_string(p)
                    .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?
            }
            _ => DEFAULT_CONFIG.to_string(),
        };
        Self::from_toml(&content)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(engine) = raw.recognizer.and_then(|r| r.engine) {
            config.engine = engine;
        }
        if let Some(tesseract) = raw.tesseract {
            if let Some(command) = tesseract.command {
                config.tesseract_command = command;
            }
            if let Some(language) = tesseract.language {
                config.tesseract_language = language;
            }
        }
        if let Some(ollama) = raw.ollama {
            if let Some(host) = ollama.host {
                config.ollama_host = host;
            }
            if let Some(model) = ollama.model {
                config.ollama_model = model;
            }
            if let Some(secs) = ollama.timeout_secs {
                config.ollama_timeout = Duration::from_secs(secs);
            }
        }

        Ok(config)
    }

    /// Apply `BARTAB_OCR_ENGINE`, `TESSERACT_CMD`, `OLLAMA_HOST` and `OLLAMA_MODEL`
    ///
    /// An unparseable engine name is ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(engine) = lookup("BARTAB_OCR_ENGINE").and_then(|e| e.parse().ok()) {
            self.engine = engine;
        }
        if let Some(command) = lookup("TESSERACT_CMD") {
            self.tesseract_command = command;
        }
        if let Some(host) = lookup("OLLAMA_HOST") {
            self.ollama_host = host;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.ollama_model = model;
        }
        self
    }

    /// Build the configured recognizer
    pub fn build(&self) -> Result<Box<dyn TextRecognizer>> {
        Ok(match self.engine {
            EngineKind::Tesseract => Box::new(TesseractRecognizer::new(
                &self.tesseract_command,
                &self.tesseract_language,
            )),
            EngineKind::Ollama => Box::new(OllamaVisionRecognizer::new(
                &self.ollama_host,
                &self.ollama_model,
                self.ollama_timeout,
            )?),
        })
    }
}
