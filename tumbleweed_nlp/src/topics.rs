// Topic inference.
//
// `TopicModel` exposes the two calls the engine needs: infer a topic
// distribution over a bag of tokens, and list the top terms of a topic.
// The default binding, `ThemeTopics`, is a lexical topic model: eight
// curated country-music themes whose term weights are fitted from corpus
// frequency (a term seen often in the corpus dominates its theme).
//
// This stands in for a trained LDA-style model behind the same interface;
// swapping one in requires no engine changes.

use std::collections::BTreeMap;

/// Topic inference interface.
pub trait TopicModel {
    /// Topic distribution over a token bag: `(topic_id, weight)` pairs with
    /// weights summing to 1. Empty when nothing matches any topic.
    fn infer(&self, tokens: &[String]) -> Vec<(usize, f64)>;

    /// The `top_n` highest-weighted terms of a topic, heaviest first.
    /// Empty for an unknown topic id.
    fn terms(&self, topic: usize, top_n: usize) -> Vec<(String, f64)>;

    /// Total number of topics in the model.
    fn topic_count(&self) -> usize;
}

/// Curated themes with their seed terms. Weights are fitted from the corpus.
const THEME_SEEDS: &[(&str, &[&str])] = &[
    (
        "love",
        &["love", "heart", "kiss", "darling", "sweet", "mine", "hold", "close"],
    ),
    (
        "heartbreak",
        &["lonesome", "broken", "tears", "goodbyes", "gone", "blues", "heartache", "alone"],
    ),
    (
        "drinking",
        &["whiskey", "beer", "bottle", "wine", "jukebox", "neon", "bar", "drinking"],
    ),
    (
        "road",
        &["highway", "road", "roads", "truck", "miles", "train", "wheels", "driving"],
    ),
    (
        "home",
        &["home", "porch", "mama", "town", "pines", "county", "roots", "gravel"],
    ),
    (
        "faith",
        &["lord", "praying", "heaven", "church", "grace", "soul", "angels", "bless"],
    ),
    (
        "good_times",
        &["friday", "night", "dancing", "radio", "singing", "bonfire", "summer", "lights"],
    ),
    (
        "nature",
        &["moon", "stars", "rain", "river", "sun", "wind", "dust", "moonlight"],
    ),
];

#[derive(Debug, Clone)]
struct Theme {
    name: &'static str,
    /// Term -> weight, normalized to sum 1 within the theme.
    terms: BTreeMap<String, f64>,
}

/// A lexical topic model over curated country themes.
#[derive(Debug, Clone)]
pub struct ThemeTopics {
    themes: Vec<Theme>,
}

impl ThemeTopics {
    /// Fit theme term weights from tokenized corpus documents.
    ///
    /// Each seed term gets weight `1 + corpus_count`, then weights are
    /// normalized per theme. Terms the corpus never uses keep a small
    /// uniform weight so inference still works on out-of-corpus text.
    pub fn fit(docs: &[Vec<String>]) -> Self {
        let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
        for doc in docs {
            for token in doc {
                for (_, seeds) in THEME_SEEDS {
                    if let Some(&seed) = seeds.iter().find(|&&s| s == token.as_str()) {
                        *counts.entry(seed).or_insert(0.0) += 1.0;
                    }
                }
            }
        }

        let themes = THEME_SEEDS
            .iter()
            .map(|&(name, seeds)| {
                let raw: Vec<(String, f64)> = seeds
                    .iter()
                    .map(|&s| (s.to_string(), 1.0 + counts.get(s).copied().unwrap_or(0.0)))
                    .collect();
                let total: f64 = raw.iter().map(|(_, w)| w).sum();
                let terms = raw.into_iter().map(|(s, w)| (s, w / total)).collect();
                Theme { name, terms }
            })
            .collect();

        ThemeTopics { themes }
    }

    /// Human-readable theme name for a topic id.
    pub fn theme_name(&self, topic: usize) -> Option<&'static str> {
        self.themes.get(topic).map(|t| t.name)
    }
}

impl TopicModel for ThemeTopics {
    fn infer(&self, tokens: &[String]) -> Vec<(usize, f64)> {
        let mut scores: Vec<(usize, f64)> = Vec::new();
        for (id, theme) in self.themes.iter().enumerate() {
            let score: f64 = tokens
                .iter()
                .filter_map(|t| theme.terms.get(t.as_str()))
                .sum();
            if score > 0.0 {
                scores.push((id, score));
            }
        }
        let total: f64 = scores.iter().map(|(_, s)| s).sum();
        if total > 0.0 {
            for (_, s) in &mut scores {
                *s /= total;
            }
        }
        scores
    }

    fn terms(&self, topic: usize, top_n: usize) -> Vec<(String, f64)> {
        let Some(theme) = self.themes.get(topic) else {
            return Vec::new();
        };
        let mut terms: Vec<(String, f64)> =
            theme.terms.iter().map(|(t, &w)| (t.clone(), w)).collect();
        terms.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(top_n);
        terms
    }

    fn topic_count(&self) -> usize {
        self.themes.len()
    }
}
