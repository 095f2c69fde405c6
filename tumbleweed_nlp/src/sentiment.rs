// Sentiment scoring.
//
// `SentimentModel` produces a compound polarity in [-1, 1] for a piece of
// text. The default binding, `ValenceLexicon`, sums per-token valences from
// an embedded word list (roughly a -4..4 scale) and squashes the sum with
// the standard compound normalization s / sqrt(s^2 + 15).
//
// Words outside the lexicon contribute nothing, so unseen vocabulary scores
// neutral rather than failing.

use crate::tokenize::tokenize;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Compound sentiment scoring interface.
pub trait SentimentModel {
    /// Compound polarity of `text` in [-1, 1]; 0.0 is neutral.
    fn score(&self, text: &str) -> f64;
}

/// The top-level JSON structure for the valence file.
#[derive(Debug, Deserialize)]
struct ValenceFile {
    valences: BTreeMap<String, f64>,
}

/// A valence word list with compound normalization.
#[derive(Debug, Clone)]
pub struct ValenceLexicon {
    valences: BTreeMap<String, f64>,
}

impl ValenceLexicon {
    /// Parse a valence lexicon from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: ValenceFile = serde_json::from_str(json)?;
        Ok(ValenceLexicon {
            valences: file.valences,
        })
    }

    /// Number of scored words.
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    /// True if the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl SentimentModel for ValenceLexicon {
    fn score(&self, text: &str) -> f64 {
        let sum: f64 = tokenize(text)
            .iter()
            .filter_map(|t| self.valences.get(&t.to_lowercase()))
            .sum();
        if sum == 0.0 {
            return 0.0;
        }
        (sum / (sum * sum + 15.0).sqrt()).clamp(-1.0, 1.0)
    }
}

/// Load the default valence lexicon embedded at compile time.
pub fn default_sentiment() -> ValenceLexicon {
    let json = include_str!("../../data/sentiment_lexicon.json");
    ValenceLexicon::from_json(json).expect("embedded sentiment_lexicon.json is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let model = default_sentiment();
        let score = model.score("sweet love and sunshine");
        assert!(score > 0.3, "Expected clearly positive, got {}", score);
    }

    #[test]
    fn test_negative_text() {
        let model = default_sentiment();
        let score = model.score("lonesome broken tears");
        assert!(score < -0.3, "Expected clearly negative, got {}", score);
    }

    #[test]
    fn test_neutral_unknown_words() {
        let model = default_sentiment();
        assert_eq!(model.score("the gravel road at noon"), 0.0);
        assert_eq!(model.score(""), 0.0);
    }

    #[test]
    fn test_score_in_range() {
        let model = default_sentiment();
        for text in ["love love love love love", "dead hell devil pain sorrow"] {
            let s = model.score(text);
            assert!((-1.0..=1.0).contains(&s), "score {} out of range", s);
        }
    }

    #[test]
    fn test_mixed_text_between_extremes() {
        let model = default_sentiment();
        let pos = model.score("sweet sunshine");
        let mixed = model.score("sweet sunshine and lonesome tears");
        assert!(mixed < pos, "Mixing in negatives should lower the score");
    }
}
