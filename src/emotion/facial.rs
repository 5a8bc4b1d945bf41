//! Facial emotion estimation
//!
//! Samples frames from a camera-backed classifier and returns the most
//! frequent label. The actual camera and model live behind the
//! [`FrameClassifier`] trait; a machine without a camera simply runs without
//! one and estimation degrades to text-only.

use std::collections::HashMap;

use super::EmotionLabel;
use crate::Result;

/// Number of frames sampled per estimate
pub const FACIAL_FRAMES: usize = 5;

/// Captures and classifies a single camera frame
///
/// Implementations wrap whatever camera device and emotion model are
/// available. Every call may fail independently (dropped frame, no face in
/// view); callers skip failures rather than aborting.
pub trait FrameClassifier: Send + Sync {
    /// Grab one frame and classify its dominant emotion
    ///
    /// # Errors
    ///
    /// Returns error if the frame cannot be captured or classified
    fn classify_frame(&self) -> Result<EmotionLabel>;
}

/// Classify `frames` frames and return the mode label
///
/// Failed frames are skipped. Zero usable frames yields `Neutral`. A tie in
/// frequency resolves to the more severe label.
#[must_use]
pub fn estimate_facial(classifier: &dyn FrameClassifier, frames: usize) -> EmotionLabel {
    let mut counts: HashMap<EmotionLabel, usize> = HashMap::new();
    let mut usable = 0usize;

    for _ in 0..frames {
        match classifier.classify_frame() {
            Ok(label) => {
                *counts.entry(label).or_default() += 1;
                usable += 1;
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping unusable frame");
            }
        }
    }

    if usable == 0 {
        tracing::debug!("no usable frames, defaulting to neutral");
        return EmotionLabel::Neutral;
    }

    let mode = counts
        .into_iter()
        .max_by_key(|&(label, count)| (count, label.severity()))
        .map_or(EmotionLabel::Neutral, |(label, _)| label);

    tracing::debug!(emotion = %mode, frames = usable, "facial emotion estimate");
    mode
}
