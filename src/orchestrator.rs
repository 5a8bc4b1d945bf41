//! Turn orchestration — the companion's core loop
//!
//! Sequences capture → transcribe → classify → respond → speak → log for
//! each turn and decides whether the session continues or ends. Every turn
//! completes with some spoken output; no collaborator failure crosses the
//! top of the loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::emotion::{self, EmotionLabel, FrameClassifier};
use crate::intent;
use crate::llm::ResponseGenerator;
use crate::session::{Session, Turn};
use crate::voice::{ClipSource, Speak, SpeechToText, WakeGate};
use crate::{Error, Result};

/// Spoken when a session starts
pub const GREETING: &str =
    "Hello, I'm here with you. Whenever you're ready, tell me how you're feeling.";

/// Spoken when audio capture fails
pub const CAPTURE_FALLBACK: &str =
    "I could not record any audio. Please check your microphone and try again.";

/// Spoken when speech was present but not understood
pub const UNCLEAR_FALLBACK: &str =
    "Sorry, I could not understand. Try speaking louder or more clearly.";

/// Spoken when the transcription service itself fails — distinct from
/// [`UNCLEAR_FALLBACK`] so "say it again" and "service is down" never blur
pub const SERVICE_FALLBACK: &str =
    "I'm having trouble hearing you right now. My transcription service seems to be unavailable.";

/// Spoken when the utterance drifts off-topic
pub const OFF_TOPIC_WARNING: &str =
    "I'm here to support your mental and emotional well-being. Let's stay focused on what \
     you're feeling. I can't answer questions outside of that.";

/// Spoken on the way out of an ending session
pub const GOODBYE: &str =
    "I'm really glad I could help. Remember, I'm always here when you need someone to talk \
     to. Take care of yourself!";

/// Language used for spoken fallbacks and when detection fails
const DEFAULT_LANGUAGE: &str = "english";

/// Pause between wake-listening attempts after a failed capture
const WAKE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Whether the session continues after a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Loop back to capturing
    Continue,
    /// Session ended; terminal, no further captures
    Ended,
}

/// Phases a turn moves through, traced at each transition
#[derive(Clone, Copy, Debug)]
enum TurnPhase {
    Capturing,
    Transcribing,
    Classifying,
    OffTopic,
    Responding,
    Speaking,
    Logging,
    Ending,
}

fn enter(phase: TurnPhase) {
    tracing::debug!(phase = ?phase, "turn phase");
}

/// The turn orchestrator: owns the session and all collaborators
pub struct Orchestrator {
    capture: Box<dyn ClipSource>,
    stt: Box<dyn SpeechToText>,
    generator: ResponseGenerator,
    speaker: Box<dyn Speak>,
    facial: Option<Arc<dyn FrameClassifier>>,
    session: Session,
    data_dir: PathBuf,
    /// Handle of the previous turn's emotion task; polled, never awaited
    pending_emotion: Option<JoinHandle<EmotionLabel>>,
}

impl Orchestrator {
    /// Create an orchestrator with a fresh, active session
    pub fn new(
        capture: Box<dyn ClipSource>,
        stt: Box<dyn SpeechToText>,
        generator: ResponseGenerator,
        speaker: Box<dyn Speak>,
        facial: Option<Arc<dyn FrameClassifier>>,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            capture,
            stt,
            generator,
            speaker,
            facial,
            session: Session::start(),
            data_dir,
            pending_emotion: None,
        }
    }

    /// The current session ledger
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the session until the user ends it or the process is interrupted
    ///
    /// # Errors
    ///
    /// Currently infallible at this level; collaborator failures are handled
    /// within each turn
    #[allow(clippy::future_not_send)]
    pub async fn run(&mut self, wake: Option<&WakeGate>) -> Result<()> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        if let Some(gate) = wake {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("shutdown requested while waiting for wake phrase");
                    return Ok(());
                }
                () = self.wait_for_wake(gate) => {}
            }
        }

        self.speaker.speak(GREETING, DEFAULT_LANGUAGE).await;

        while self.session.is_active() {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                outcome = self.process_turn() => {
                    if outcome == TurnOutcome::Ended {
                        break;
                    }
                }
            }
        }

        tracing::info!(turns = self.session.turns().len(), "session over");
        Ok(())
    }

    /// Listen until an utterance starts with the wake phrase
    #[allow(clippy::future_not_send)]
    async fn wait_for_wake(&mut self, gate: &WakeGate) {
        tracing::info!(phrase = gate.phrase(), "listening for wake phrase");

        loop {
            let clip = match self.capture.capture().await {
                Ok(clip) => clip,
                Err(e) => {
                    tracing::debug!(error = %e, "wake capture failed, retrying");
                    tokio::time::sleep(WAKE_RETRY_DELAY).await;
                    continue;
                }
            };

            match self.stt.transcribe(clip).await {
                Ok(t) if !t.is_empty() => {
                    tracing::debug!(heard = %t.text, "wake candidate");
                    if gate.matches(&t.text) {
                        tracing::info!("wake phrase detected");
                        return;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "wake transcription failed");
                    tokio::time::sleep(WAKE_RETRY_DELAY).await;
                }
            }
        }
    }

    /// Process one full turn
    ///
    /// Always produces spoken output; returns whether the session continues.
    #[allow(clippy::future_not_send)]
    pub async fn process_turn(&mut self) -> TurnOutcome {
        self.drain_emotion();

        enter(TurnPhase::Capturing);
        let clip = match self.capture.capture().await {
            Ok(clip) => clip,
            Err(e) => {
                tracing::warn!(error = %e, "capture failed");
                self.speaker.speak(CAPTURE_FALLBACK, DEFAULT_LANGUAGE).await;
                return TurnOutcome::Continue;
            }
        };

        enter(TurnPhase::Transcribing);
        let transcription = match self.stt.transcribe(clip).await {
            Ok(t) => t,
            Err(e @ Error::Stt(_)) => {
                tracing::error!(error = %e, "transcription service failed");
                self.speaker.speak(SERVICE_FALLBACK, DEFAULT_LANGUAGE).await;
                return TurnOutcome::Continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "recording was unusable");
                self.speaker.speak(CAPTURE_FALLBACK, DEFAULT_LANGUAGE).await;
                return TurnOutcome::Continue;
            }
        };

        if transcription.is_empty() {
            self.speaker.speak(UNCLEAR_FALLBACK, DEFAULT_LANGUAGE).await;
            return TurnOutcome::Continue;
        }

        let user_text = transcription.text;
        let language = if transcription.language == "unknown" {
            DEFAULT_LANGUAGE.to_string()
        } else {
            transcription.language
        };

        enter(TurnPhase::Classifying);
        if intent::is_off_topic(&user_text) {
            enter(TurnPhase::OffTopic);
            tracing::info!(text = %user_text, "off-topic utterance rejected");
            self.speaker.speak(OFF_TOPIC_WARNING, &language).await;
            return TurnOutcome::Continue;
        }

        enter(TurnPhase::Responding);
        // Fire-and-forget: the reply is generated with the neutral default so
        // the turn never waits on estimation
        self.pending_emotion = Some(emotion::spawn_estimate(
            user_text.clone(),
            self.facial.clone(),
        ));
        let reply = self
            .generator
            .generate(EmotionLabel::Neutral, &language, &user_text)
            .await;

        enter(TurnPhase::Speaking);
        self.speaker.speak(&reply, &language).await;

        enter(TurnPhase::Logging);
        self.session.append(Turn::new(
            user_text.clone(),
            reply,
            EmotionLabel::Neutral,
            language.clone(),
        ));

        if intent::is_exit_intent(&user_text) {
            enter(TurnPhase::Ending);
            self.speaker.speak(GOODBYE, &language).await;

            match self.session.flush(&self.data_dir) {
                Ok(path) => tracing::info!(path = %path.display(), "chat history saved"),
                Err(e) => {
                    // The in-memory ledger survives a failed flush
                    tracing::error!(error = %e, "failed to save chat history");
                }
            }

            self.session.end();
            return TurnOutcome::Ended;
        }

        TurnOutcome::Continue
    }

    /// Poll the previous turn's emotion task without blocking
    ///
    /// A finished estimate is logged and discarded — it is never retrofitted
    /// into an already-appended Turn. An unfinished task is dropped and left
    /// to complete detached.
    fn drain_emotion(&mut self) {
        if let Some(handle) = self.pending_emotion.take() {
            match handle.now_or_never() {
                Some(Ok(label)) => {
                    tracing::debug!(emotion = %label, "late emotion estimate discarded");
                }
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "emotion task failed");
                }
                None => {
                    tracing::debug!("emotion estimate still running, detaching");
                }
            }
        }
    }
}
