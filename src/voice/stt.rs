//! Speech-to-text (STT) processing
//!
//! Transcribes captured clips through a Whisper-compatible HTTP API. An
//! empty transcription means "no speech understood" and is not an error;
//! service failures surface as [`Error::Stt`] so the caller can tell the
//! two apart.

use async_trait::async_trait;

use crate::voice::capture::AudioClip;
use crate::{Error, Result};

/// Ambient-noise calibration window at the head of each clip
const CALIBRATION_WINDOW_MS: u32 = 500;

/// How far above the noise floor the rest of the clip must rise to count
/// as speech
const SPEECH_OVER_FLOOR_RATIO: f32 = 1.25;

/// Response from a Whisper-compatible transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// A transcription result with its best-guess language tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcription {
    /// Transcribed text; empty means no speech was understood
    pub text: String,
    /// Detected language name, or "unknown"
    pub language: String,
}

impl Transcription {
    /// The "no speech understood" result
    #[must_use]
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            language: "unknown".to_string(),
        }
    }

    /// Whether no speech was understood
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Detect the language of transcribed text
///
/// Returns the lowercase language name, or "unknown" when detection fails
/// or the text is empty.
#[must_use]
pub fn detect_language(text: &str) -> String {
    whatlang::detect_lang(text)
        .map_or_else(|| "unknown".to_string(), |lang| lang.eng_name().to_lowercase())
}

/// Converts one audio clip into text
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a clip, consuming it
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stt`] on service failure; an unintelligible clip is
    /// an `Ok` empty transcription, not an error
    async fn transcribe(&self, clip: AudioClip) -> Result<Transcription>;
}

/// Transcribes speech via a Whisper-compatible API
pub struct Transcriber {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    language_hint: String,
}

impl Transcriber {
    /// Create a new transcriber
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        language_hint: String,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("STT API key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
            language_hint,
        })
    }

    /// Ambient-noise calibration: measure the noise floor at the head of
    /// the clip and decide whether the rest ever rises above it
    fn has_speech_above_floor(clip: &AudioClip) -> bool {
        let calibration_samples = (clip.sample_rate * CALIBRATION_WINDOW_MS / 1000) as usize;
        if clip.samples.len() <= calibration_samples {
            return false;
        }

        let floor = clip.window_mean_abs(0, calibration_samples);
        let speech = clip.window_mean_abs(calibration_samples, clip.samples.len());

        tracing::debug!(floor, speech, "ambient noise calibration");
        speech > floor * SPEECH_OVER_FLOOR_RATIO
    }

    async fn request_transcription(&self, wav: Vec<u8>) -> Result<String> {
        tracing::debug!(audio_bytes = wav.len(), "starting transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav)
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language", self.language_hint.clone());

        let url = format!(
            "{}/audio/transcriptions",
            self.api_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                Error::Stt(e.to_string())
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Stt(format!("transcription API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse transcription response");
            Error::Stt(e.to_string())
        })?;

        Ok(result.text)
    }
}

#[async_trait]
impl SpeechToText for Transcriber {
    async fn transcribe(&self, clip: AudioClip) -> Result<Transcription> {
        if !Self::has_speech_above_floor(&clip) {
            tracing::debug!("clip never rises above noise floor, skipping service call");
            return Ok(Transcription::empty());
        }

        // Single-use WAV interchange; the temp file is removed when `wav`
        // drops, including on the error paths below
        let wav = clip.into_temp_wav()?;
        if !wav.is_valid() {
            return Err(Error::Capture(
                "recorded file is not a valid WAV".to_string(),
            ));
        }
        let bytes = wav.read()?;
        drop(wav);

        let text = self.request_transcription(bytes).await?;
        let text = text.trim().to_string();

        if text.is_empty() {
            tracing::debug!("no speech understood");
            return Ok(Transcription::empty());
        }

        let language = detect_language(&text);
        tracing::info!(transcript = %text, language = %language, "transcription complete");

        Ok(Transcription { text, language })
    }
}
