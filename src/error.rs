//! Error types for the Solace companion

use thiserror::Error;

/// Result type alias for Solace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Solace companion
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio capture error (device unavailable, too-quiet or invalid recording)
    #[error("capture error: {0}")]
    Capture(String),

    /// Audio processing error (encoding, decoding, playback)
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text service error. An empty transcription is not an error;
    /// this variant is for network/API failures only
    #[error("STT error: {0}")]
    Stt(String),

    /// Language model call failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Session ledger flush failure
    #[error("persistence error: {0}")]
    Persistence(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
