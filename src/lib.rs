//! Solace Companion - voice-driven emotional support companion
//!
//! This library provides the core functionality for the Solace companion:
//! - Voice processing (capture, STT, TTS, optional wake phrase)
//! - Intent classification (exit / off-topic)
//! - Background emotion estimation (text lexicon + optional facial frames)
//! - Response generation via an LLM
//! - The session ledger and turn orchestrator
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Turn Orchestrator                    │
//! │  Capture → Transcribe → Classify → Respond → Speak  │
//! │                      → Log → Continue / End          │
//! └──────┬──────────┬──────────┬──────────┬─────────────┘
//!        │          │          │          │
//! ┌──────▼───┐ ┌────▼────┐ ┌───▼────┐ ┌───▼───────────┐
//! │  Audio   │ │  STT /  │ │  LLM   │ │ Emotion (off  │
//! │  device  │ │  TTS    │ │ client │ │ critical path)│
//! └──────────┘ └─────────┘ └────────┘ └───────────────┘
//! ```

pub mod config;
pub mod emotion;
pub mod error;
pub mod intent;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod voice;

pub use config::Config;
pub use emotion::EmotionLabel;
pub use error::{Error, Result};
pub use llm::{ChatModel, LlmClient, ResponseGenerator};
pub use orchestrator::{Orchestrator, TurnOutcome};
pub use session::{Session, Turn};
