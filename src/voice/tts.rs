//! Text-to-speech (TTS) processing
//!
//! Sanitizes reply text and synthesizes it through an HTTP TTS API. The
//! synthesis backend on some platforms shells out to an OS voice command, so
//! unescaped quotes and ampersands are a correctness and injection concern —
//! sanitization is mandatory, not cosmetic.

use async_trait::async_trait;

use crate::voice::playback::AudioPlayback;
use crate::{Error, Result};

/// Contraction expansions applied before synthesis
///
/// Expansion runs before character stripping; stripping first would destroy
/// the apostrophes these patterns match on.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("I'm", "I am"),
    ("I've", "I have"),
    ("I'll", "I will"),
    ("don't", "do not"),
    ("Don't", "Do not"),
    ("can't", "cannot"),
    ("Can't", "Cannot"),
    ("won't", "will not"),
    ("Won't", "Will not"),
    ("it's", "it is"),
    ("It's", "It is"),
    ("that's", "that is"),
    ("That's", "That is"),
    ("you're", "you are"),
    ("You're", "You are"),
    ("isn't", "is not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("couldn't", "could not"),
    ("wouldn't", "would not"),
    ("let's", "let us"),
    ("Let's", "Let us"),
];

/// Sanitize text for the synthesis backend
///
/// Expands common contractions, then strips quote characters and replaces
/// ampersands with "and".
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    let mut out = text.to_string();
    for &(from, to) in CONTRACTIONS {
        out = out.replace(from, to);
    }
    out.replace('&', "and")
        .replace(['"', '\'', '`'], "")
        .trim()
        .to_string()
}

/// Turns text into audio bytes
#[async_trait]
pub trait SynthesizeSpeech: Send + Sync {
    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>>;
}

/// HTTP client for an OpenAI-speech-compatible TTS endpoint
pub struct TtsClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    voice: String,
    speed: f32,
}

impl TtsClient {
    /// Create a new TTS client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        voice: String,
        speed: f32,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("TTS API key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
            voice,
            speed,
        })
    }
}

#[async_trait]
impl SynthesizeSpeech for TtsClient {
    async fn synthesize(&self, text: &str, _language: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let url = format!("{}/audio/speech", self.api_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("TTS API error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}

/// Whether synthesis blocks the turn or runs detached
///
/// Blocking is the default: the orchestrator waits for speech to finish so
/// session pacing stays correct. Background playback is a valid alternate
/// configuration for latency-sensitive setups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpeechMode {
    #[default]
    Blocking,
    Background,
}

/// Speaks text aloud; best-effort, never fails the turn
#[async_trait(?Send)]
pub trait Speak {
    /// Sanitize, synthesize, and play. Failures are logged, not returned
    async fn speak(&mut self, text: &str, language: &str);
}

/// Production speaker: HTTP synthesis plus local audio playback
pub struct Speaker {
    tts: Box<dyn SynthesizeSpeech>,
    playback: AudioPlayback,
    mode: SpeechMode,
}

impl Speaker {
    /// Create a speaker with the given synthesis backend and mode
    pub fn new(tts: Box<dyn SynthesizeSpeech>, playback: AudioPlayback, mode: SpeechMode) -> Self {
        Self {
            tts,
            playback,
            mode,
        }
    }
}

#[async_trait(?Send)]
impl Speak for Speaker {
    async fn speak(&mut self, text: &str, language: &str) {
        let safe = sanitize_text(text);
        if safe.is_empty() {
            return;
        }

        tracing::debug!(chars = safe.len(), mode = ?self.mode, "speaking");

        let audio = match self.tts.synthesize(&safe, language).await {
            Ok(audio) if !audio.is_empty() => audio,
            Ok(_) => return,
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
                return;
            }
        };

        match self.mode {
            SpeechMode::Blocking => {
                if let Err(e) = self.playback.play_mp3(&audio).await {
                    tracing::warn!(error = %e, "speech playback failed");
                }
            }
            SpeechMode::Background => AudioPlayback::play_detached(audio),
        }
    }
}
