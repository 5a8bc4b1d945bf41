//! Voice processing module
//!
//! Handles audio capture, transcription, synthesis, playback, and the
//! optional wake-phrase gate.

pub mod capture;
pub mod playback;
pub mod stt;
pub mod tts;
pub mod wake;

pub use capture::{
    AudioCapture, AudioClip, CAPTURE_DURATION, ClipSource, SAMPLE_RATE, TempWav, is_valid_wav,
};
pub use playback::AudioPlayback;
pub use stt::{SpeechToText, Transcriber, Transcription, detect_language};
pub use tts::{Speak, Speaker, SpeechMode, SynthesizeSpeech, TtsClient, sanitize_text};
pub use wake::WakeGate;
