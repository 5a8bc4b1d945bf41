//! Configuration management for the Solace companion
//!
//! Defaults, overlaid by an optional TOML file
//! (`~/.config/solace/config.toml`, all fields optional), overlaid by
//! environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::voice::SpeechMode;
use crate::{Error, Result};

/// Default API base for the STT/TTS/LLM services
const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Solace companion configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Name the companion speaks as
    pub companion_name: String,

    /// Directory session ledgers are flushed to
    pub data_dir: PathBuf,

    /// Audio capture settings
    pub capture: CaptureConfig,

    /// Speech-to-text settings
    pub stt: SttConfig,

    /// Language model settings
    pub llm: LlmConfig,

    /// Text-to-speech settings
    pub tts: TtsConfig,

    /// Optional wake phrase gating session start (e.g. "hey solace")
    pub wake_phrase: Option<String>,

    /// Whether facial emotion estimation is attempted
    pub facial_emotion: bool,
}

/// Audio capture settings
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Clip length per turn
    pub duration: Duration,

    /// Capture sample rate in Hz
    pub sample_rate: u32,
}

/// Speech-to-text settings
#[derive(Debug, Clone)]
pub struct SttConfig {
    /// API base URL (Whisper-compatible)
    pub api_url: String,

    /// API key
    pub api_key: String,

    /// Model identifier (e.g. "whisper-1")
    pub model: String,

    /// Language hint passed to the service (e.g. "en-IN")
    pub language_hint: String,
}

/// Language model settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API base URL (chat-completions-compatible)
    pub api_url: String,

    /// API key
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Max tokens per reply
    pub max_tokens: u32,
}

/// Text-to-speech settings
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// API base URL (OpenAI-speech-compatible)
    pub api_url: String,

    /// API key
    pub api_key: String,

    /// Model identifier (e.g. "tts-1")
    pub model: String,

    /// Voice identifier
    pub voice: String,

    /// Speed multiplier (0.25 to 4.0)
    pub speed: f32,

    /// Whether speech blocks the turn or plays detached
    pub mode: SpeechMode,
}

/// Top-level TOML configuration file schema; every field is optional and
/// overlays the defaults
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    data_dir: Option<PathBuf>,

    #[serde(default)]
    wake_phrase: Option<String>,

    #[serde(default)]
    facial_emotion: Option<bool>,

    #[serde(default)]
    capture: CaptureFileConfig,

    #[serde(default)]
    stt: ServiceFileConfig,

    #[serde(default)]
    llm: LlmFileConfig,

    #[serde(default)]
    tts: TtsFileConfig,
}

#[derive(Debug, Default, Deserialize)]
struct CaptureFileConfig {
    duration_secs: Option<u64>,
    sample_rate: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceFileConfig {
    api_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    language_hint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmFileConfig {
    api_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct TtsFileConfig {
    api_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    voice: Option<String>,
    speed: Option<f32>,
    background: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            companion_name: "Solace".to_string(),
            data_dir: default_data_dir(),
            capture: CaptureConfig {
                duration: crate::voice::CAPTURE_DURATION,
                sample_rate: crate::voice::SAMPLE_RATE,
            },
            stt: SttConfig {
                api_url: DEFAULT_API_URL.to_string(),
                api_key: String::new(),
                model: "whisper-1".to_string(),
                language_hint: "en-IN".to_string(),
            },
            llm: LlmConfig {
                api_url: DEFAULT_API_URL.to_string(),
                api_key: String::new(),
                model: "gpt-4o-mini".to_string(),
                max_tokens: 512,
            },
            tts: TtsConfig {
                api_url: DEFAULT_API_URL.to_string(),
                api_key: String::new(),
                model: "tts-1".to_string(),
                voice: "alloy".to_string(),
                speed: 1.0,
                mode: SpeechMode::Blocking,
            },
            wake_phrase: None,
            facial_emotion: false,
        }
    }
}

impl Config {
    /// Load configuration: defaults ← config file ← environment
    ///
    /// # Errors
    ///
    /// Returns error if an existing config file cannot be read or parsed
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = default_config_path() {
            if path.exists() {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("reading {}: {e}", path.display())))?;
                let file: ConfigFile = toml::from_str(&raw)?;
                config.apply_file(file);
                tracing::debug!(path = %path.display(), "config file loaded");
            }
        }

        config.apply_env();
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(name) = file.name {
            self.companion_name = name;
        }
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
        if file.wake_phrase.is_some() {
            self.wake_phrase = file.wake_phrase;
        }
        if let Some(facial) = file.facial_emotion {
            self.facial_emotion = facial;
        }

        if let Some(secs) = file.capture.duration_secs {
            self.capture.duration = Duration::from_secs(secs);
        }
        if let Some(rate) = file.capture.sample_rate {
            self.capture.sample_rate = rate;
        }

        if let Some(url) = file.stt.api_url {
            self.stt.api_url = url;
        }
        if let Some(key) = file.stt.api_key {
            self.stt.api_key = key;
        }
        if let Some(model) = file.stt.model {
            self.stt.model = model;
        }
        if let Some(hint) = file.stt.language_hint {
            self.stt.language_hint = hint;
        }

        if let Some(url) = file.llm.api_url {
            self.llm.api_url = url;
        }
        if let Some(key) = file.llm.api_key {
            self.llm.api_key = key;
        }
        if let Some(model) = file.llm.model {
            self.llm.model = model;
        }
        if let Some(max) = file.llm.max_tokens {
            self.llm.max_tokens = max;
        }

        if let Some(url) = file.tts.api_url {
            self.tts.api_url = url;
        }
        if let Some(key) = file.tts.api_key {
            self.tts.api_key = key;
        }
        if let Some(model) = file.tts.model {
            self.tts.model = model;
        }
        if let Some(voice) = file.tts.voice {
            self.tts.voice = voice;
        }
        if let Some(speed) = file.tts.speed {
            self.tts.speed = speed;
        }
        if let Some(background) = file.tts.background {
            self.tts.mode = if background {
                SpeechMode::Background
            } else {
                SpeechMode::Blocking
            };
        }
    }

    fn apply_env(&mut self) {
        // One OpenAI key serves all three services unless overridden
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if self.stt.api_key.is_empty() {
                self.stt.api_key = key.clone();
            }
            if self.llm.api_key.is_empty() {
                self.llm.api_key = key.clone();
            }
            if self.tts.api_key.is_empty() {
                self.tts.api_key = key;
            }
        }

        if let Ok(name) = std::env::var("SOLACE_NAME") {
            self.companion_name = name;
        }
        if let Ok(dir) = std::env::var("SOLACE_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(phrase) = std::env::var("SOLACE_WAKE_PHRASE") {
            self.wake_phrase = (!phrase.is_empty()).then_some(phrase);
        }
        if let Ok(model) = std::env::var("SOLACE_LLM_MODEL") {
            self.llm.model = model;
        }
    }
}

/// Default config file path: `~/.config/solace/config.toml`
fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("solace").join("config.toml"))
}

/// Default data directory: platform data dir, falling back to `./DATA`
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("DATA"),
        |dirs| dirs.data_local_dir().join("solace"),
    )
}
