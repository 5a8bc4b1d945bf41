//! Shared test utilities
//!
//! Scripted stand-ins for the hardware- and network-backed collaborators so
//! the pipeline can run end-to-end in tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use solace_companion::llm::ChatModel;
use solace_companion::voice::{
    AudioClip, ClipSource, SAMPLE_RATE, Speak, SpeechToText, Transcription,
};
use solace_companion::{Error, Result};

/// A clearly audible clip
#[must_use]
pub fn loud_clip() -> AudioClip {
    AudioClip {
        sample_rate: SAMPLE_RATE,
        samples: vec![5000; SAMPLE_RATE as usize],
    }
}

/// Clip source playing back a script of capture results
pub struct ScriptedClips {
    script: Mutex<Vec<Result<AudioClip>>>,
}

impl ScriptedClips {
    #[must_use]
    pub fn new(script: Vec<Result<AudioClip>>) -> Self {
        Self {
            script: Mutex::new(script),
        }
    }
}

#[async_trait(?Send)]
impl ClipSource for ScriptedClips {
    async fn capture(&mut self) -> Result<AudioClip> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            Err(Error::Capture("clip script exhausted".to_string()))
        } else {
            script.remove(0)
        }
    }
}

/// STT playing back a script of transcription results, counting calls
pub struct ScriptedStt {
    script: Mutex<Vec<Result<Transcription>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedStt {
    #[must_use]
    pub fn new(script: Vec<Result<Transcription>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Convenience: a single successful transcription
    #[must_use]
    pub fn hearing(text: &str) -> Self {
        Self::new(vec![Ok(Transcription {
            text: text.to_string(),
            language: "english".to_string(),
        })])
    }

    /// Shareable call counter, readable after the stub moves into the
    /// orchestrator
    #[must_use]
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl SpeechToText for ScriptedStt {
    async fn transcribe(&self, _clip: AudioClip) -> Result<Transcription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            Err(Error::Stt("transcription script exhausted".to_string()))
        } else {
            script.remove(0)
        }
    }
}

/// Chat model returning a fixed reply, counting calls
pub struct CountingModel {
    reply: Result<String>,
    calls: Arc<AtomicUsize>,
}

impl CountingModel {
    #[must_use]
    pub fn replying(reply: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply: Ok(reply.to_string()),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    #[must_use]
    pub fn failing() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply: Err(Error::Llm("model unavailable".to_string())),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl ChatModel for CountingModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(_) => Err(Error::Llm("model unavailable".to_string())),
        }
    }
}

/// Speaker that records everything it is asked to say
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    #[must_use]
    pub fn with_log() -> (Self, Arc<Mutex<Vec<String>>>) {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                spoken: Arc::clone(&spoken),
            },
            spoken,
        )
    }
}

#[async_trait(?Send)]
impl Speak for RecordingSpeaker {
    async fn speak(&mut self, text: &str, _language: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}
