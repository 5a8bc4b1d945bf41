//! Emotion estimation
//!
//! Best-effort classification of the user's emotional tone from text and,
//! optionally, camera frames. Estimation never fails: any internal error
//! degrades to [`EmotionLabel::Neutral`]. It runs off the latency-critical
//! path — the orchestrator spawns it and never awaits it within the turn
//! that produced the utterance.

mod facial;
mod text;

pub use facial::{FACIAL_FRAMES, FrameClassifier, estimate_facial};
pub use text::estimate_text;

use std::sync::Arc;

use tokio::task::JoinHandle;

/// Emotional tone label with a fixed severity weighting
///
/// Severity expresses clinical urgency, not frequency: when multiple
/// estimates disagree, the more urgent signal wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Anger,
    Fear,
    Sadness,
    Disgust,
    Neutral,
    Trust,
    Content,
    Happy,
    Joy,
    Surprise,
}

impl EmotionLabel {
    /// All labels, in declaration order (used for deterministic argmax)
    pub const ALL: [Self; 10] = [
        Self::Anger,
        Self::Fear,
        Self::Sadness,
        Self::Disgust,
        Self::Neutral,
        Self::Trust,
        Self::Content,
        Self::Happy,
        Self::Joy,
        Self::Surprise,
    ];

    /// Severity weight (higher = more clinically urgent)
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Anger => 5,
            Self::Fear | Self::Sadness | Self::Disgust => 4,
            Self::Neutral => 3,
            Self::Trust | Self::Content | Self::Surprise => 2,
            Self::Happy | Self::Joy => 1,
        }
    }

    /// Parse a classifier output string, case-insensitively
    ///
    /// Accepts the adjectival synonyms facial backends tend to emit
    /// ("angry", "sad", "surprised"). Returns `None` for anything outside
    /// the vocabulary.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "anger" | "angry" => Some(Self::Anger),
            "fear" | "afraid" => Some(Self::Fear),
            "sadness" | "sad" => Some(Self::Sadness),
            "disgust" => Some(Self::Disgust),
            "neutral" => Some(Self::Neutral),
            "trust" => Some(Self::Trust),
            "content" => Some(Self::Content),
            "happy" | "happiness" => Some(Self::Happy),
            "joy" => Some(Self::Joy),
            "surprise" | "surprised" => Some(Self::Surprise),
            _ => None,
        }
    }

    /// Severity of a raw classifier output string; unknown outputs weigh 0
    #[must_use]
    pub fn severity_of_name(name: &str) -> u8 {
        Self::from_name(name).map_or(0, Self::severity)
    }

    /// Lowercase label name, as persisted in session records
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Sadness => "sadness",
            Self::Disgust => "disgust",
            Self::Neutral => "neutral",
            Self::Trust => "trust",
            Self::Content => "content",
            Self::Happy => "happy",
            Self::Joy => "joy",
            Self::Surprise => "surprise",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the most severe label from a set of estimates
///
/// Empty input yields `Neutral`. Ties keep the first estimate seen, so the
/// result is deterministic for a fixed input order.
#[must_use]
pub fn combine(estimates: &[EmotionLabel]) -> EmotionLabel {
    let mut best = None::<EmotionLabel>;
    for &label in estimates {
        match best {
            Some(current) if label.severity() <= current.severity() => {}
            _ => best = Some(label),
        }
    }
    best.unwrap_or(EmotionLabel::Neutral)
}

/// Estimate emotional tone from text and an optional facial source
///
/// Never fails; missing or erroring inputs degrade to `Neutral`.
#[must_use]
pub fn estimate(text: &str, facial: Option<&dyn FrameClassifier>) -> EmotionLabel {
    let mut estimates = Vec::with_capacity(2);

    if !text.trim().is_empty() {
        estimates.push(estimate_text(text));
    }

    if let Some(classifier) = facial {
        estimates.push(estimate_facial(classifier, FACIAL_FRAMES));
    }

    combine(&estimates)
}

/// Run estimation on a detached blocking task
///
/// The caller holds the handle but must not await it within the turn that
/// spawned it; a result that arrives after the turn was logged is discarded.
pub fn spawn_estimate(
    text: String,
    facial: Option<Arc<dyn FrameClassifier>>,
) -> JoinHandle<EmotionLabel> {
    tokio::task::spawn_blocking(move || {
        let label = estimate(&text, facial.as_deref());
        tracing::debug!(emotion = %label, "background emotion estimate complete");
        label
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_table_matches_vocabulary() {
        assert_eq!(EmotionLabel::Anger.severity(), 5);
        assert_eq!(EmotionLabel::Fear.severity(), 4);
        assert_eq!(EmotionLabel::Sadness.severity(), 4);
        assert_eq!(EmotionLabel::Disgust.severity(), 4);
        assert_eq!(EmotionLabel::Neutral.severity(), 3);
        assert_eq!(EmotionLabel::Trust.severity(), 2);
        assert_eq!(EmotionLabel::Content.severity(), 2);
        assert_eq!(EmotionLabel::Surprise.severity(), 2);
        assert_eq!(EmotionLabel::Happy.severity(), 1);
        assert_eq!(EmotionLabel::Joy.severity(), 1);
    }

    #[test]
    fn combine_prefers_more_severe() {
        assert_eq!(
            combine(&[EmotionLabel::Happy, EmotionLabel::Anger]),
            EmotionLabel::Anger
        );
        assert_eq!(
            combine(&[EmotionLabel::Neutral, EmotionLabel::Sadness]),
            EmotionLabel::Sadness
        );
    }

    #[test]
    fn combine_empty_is_neutral() {
        assert_eq!(combine(&[]), EmotionLabel::Neutral);
    }

    #[test]
    fn combine_tie_keeps_first() {
        assert_eq!(
            combine(&[EmotionLabel::Fear, EmotionLabel::Sadness]),
            EmotionLabel::Fear
        );
    }

    #[test]
    fn unknown_names_weigh_zero() {
        assert_eq!(EmotionLabel::severity_of_name("bewildered"), 0);
        assert_eq!(EmotionLabel::severity_of_name(""), 0);
        assert_eq!(EmotionLabel::severity_of_name("ANGRY"), 5);
    }

    #[test]
    fn estimate_empty_text_no_facial_is_neutral() {
        assert_eq!(estimate("", None), EmotionLabel::Neutral);
        assert_eq!(estimate("   ", None), EmotionLabel::Neutral);
    }

    #[test]
    fn label_round_trips_through_json() {
        let json = serde_json::to_string(&EmotionLabel::Sadness).unwrap();
        assert_eq!(json, "\"sadness\"");
        let back: EmotionLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EmotionLabel::Sadness);
    }
}
