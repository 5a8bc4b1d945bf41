//! Lexical emotion scoring
//!
//! Counts hits against a fixed emotion lexicon and returns the label with
//! the highest raw score. No stemming, no negation handling; words the
//! lexicon does not know contribute nothing.

use super::EmotionLabel;

/// Word → label associations, NRC-style
///
/// A word may appear under several labels (e.g. "alone" reads as both
/// sadness and fear in affect lexica).
const LEXICON: &[(&str, EmotionLabel)] = &[
    // anger
    ("angry", EmotionLabel::Anger),
    ("anger", EmotionLabel::Anger),
    ("furious", EmotionLabel::Anger),
    ("rage", EmotionLabel::Anger),
    ("annoyed", EmotionLabel::Anger),
    ("irritated", EmotionLabel::Anger),
    ("frustrated", EmotionLabel::Anger),
    ("hate", EmotionLabel::Anger),
    ("mad", EmotionLabel::Anger),
    ("resent", EmotionLabel::Anger),
    // fear
    ("afraid", EmotionLabel::Fear),
    ("scared", EmotionLabel::Fear),
    ("anxious", EmotionLabel::Fear),
    ("anxiety", EmotionLabel::Fear),
    ("nervous", EmotionLabel::Fear),
    ("worried", EmotionLabel::Fear),
    ("worry", EmotionLabel::Fear),
    ("panic", EmotionLabel::Fear),
    ("terrified", EmotionLabel::Fear),
    ("dread", EmotionLabel::Fear),
    ("alone", EmotionLabel::Fear),
    // sadness
    ("sad", EmotionLabel::Sadness),
    ("sadness", EmotionLabel::Sadness),
    ("unhappy", EmotionLabel::Sadness),
    ("depressed", EmotionLabel::Sadness),
    ("miserable", EmotionLabel::Sadness),
    ("lonely", EmotionLabel::Sadness),
    ("alone", EmotionLabel::Sadness),
    ("crying", EmotionLabel::Sadness),
    ("cry", EmotionLabel::Sadness),
    ("grief", EmotionLabel::Sadness),
    ("hopeless", EmotionLabel::Sadness),
    ("hurt", EmotionLabel::Sadness),
    ("lost", EmotionLabel::Sadness),
    ("tired", EmotionLabel::Sadness),
    ("empty", EmotionLabel::Sadness),
    // disgust
    ("disgusted", EmotionLabel::Disgust),
    ("disgust", EmotionLabel::Disgust),
    ("gross", EmotionLabel::Disgust),
    ("sick", EmotionLabel::Disgust),
    ("revolted", EmotionLabel::Disgust),
    ("awful", EmotionLabel::Disgust),
    // trust
    ("trust", EmotionLabel::Trust),
    ("safe", EmotionLabel::Trust),
    ("secure", EmotionLabel::Trust),
    ("reliable", EmotionLabel::Trust),
    ("support", EmotionLabel::Trust),
    ("supported", EmotionLabel::Trust),
    // content
    ("content", EmotionLabel::Content),
    ("calm", EmotionLabel::Content),
    ("peaceful", EmotionLabel::Content),
    ("relaxed", EmotionLabel::Content),
    ("okay", EmotionLabel::Content),
    ("fine", EmotionLabel::Content),
    // happy
    ("happy", EmotionLabel::Happy),
    ("glad", EmotionLabel::Happy),
    ("great", EmotionLabel::Happy),
    ("good", EmotionLabel::Happy),
    ("wonderful", EmotionLabel::Happy),
    ("better", EmotionLabel::Happy),
    // joy
    ("joy", EmotionLabel::Joy),
    ("joyful", EmotionLabel::Joy),
    ("excited", EmotionLabel::Joy),
    ("thrilled", EmotionLabel::Joy),
    ("delighted", EmotionLabel::Joy),
    ("love", EmotionLabel::Joy),
    // surprise
    ("surprised", EmotionLabel::Surprise),
    ("surprise", EmotionLabel::Surprise),
    ("shocked", EmotionLabel::Surprise),
    ("unexpected", EmotionLabel::Surprise),
    ("sudden", EmotionLabel::Surprise),
];

/// Score text against the lexicon and return the dominant label
///
/// Empty input or input with no lexicon hits yields `Neutral`. Ties resolve
/// to the earlier label in [`EmotionLabel::ALL`] order, so the result is
/// deterministic.
#[must_use]
pub fn estimate_text(text: &str) -> EmotionLabel {
    let mut scores = [0u32; EmotionLabel::ALL.len()];

    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let token = token.to_lowercase();
        for &(word, label) in LEXICON {
            if token == word {
                scores[label_index(label)] += 1;
            }
        }
    }

    let mut best = EmotionLabel::Neutral;
    let mut best_score = 0;
    for label in EmotionLabel::ALL {
        let score = scores[label_index(label)];
        if score > best_score {
            best = label;
            best_score = score;
        }
    }

    if best_score == 0 {
        return EmotionLabel::Neutral;
    }

    tracing::debug!(emotion = %best, score = best_score, "text emotion estimate");
    best
}

fn label_index(label: EmotionLabel) -> usize {
    EmotionLabel::ALL
        .iter()
        .position(|&l| l == label)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_hits_is_neutral() {
        assert_eq!(estimate_text("the quick brown fox"), EmotionLabel::Neutral);
        assert_eq!(estimate_text(""), EmotionLabel::Neutral);
    }

    #[test]
    fn dominant_label_wins() {
        assert_eq!(
            estimate_text("I feel anxious and nervous about the result"),
            EmotionLabel::Fear
        );
        assert_eq!(
            estimate_text("I am so sad and lonely, crying all day"),
            EmotionLabel::Sadness
        );
    }

    #[test]
    fn scoring_is_case_insensitive() {
        assert_eq!(estimate_text("I AM FURIOUS"), EmotionLabel::Anger);
    }

    #[test]
    fn punctuation_does_not_break_tokens() {
        assert_eq!(estimate_text("worried, scared... panic!"), EmotionLabel::Fear);
    }

    #[test]
    fn ambiguous_words_count_for_all_labels() {
        // "alone" scores both fear and sadness; one extra sadness hit tips it
        assert_eq!(estimate_text("alone and crying"), EmotionLabel::Sadness);
    }
}
