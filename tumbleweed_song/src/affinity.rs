// Topic affinity maps.
//
// Given a seed text, build a word -> affinity map in [0, 1] from two
// sources: terms of the strongest inferred topics (weighted by topic and
// term weight) and embedding neighbors of each seed token (weighted by
// similarity). Overlapping sources max-combine, then the map is normalized
// by its maximum so the strongest word sits at exactly 1.0.

use crate::Services;
use std::collections::BTreeMap;
use tumbleweed_nlp::tokenize;

/// How many of the strongest inferred topics contribute terms.
const TOP_TOPICS: usize = 3;
/// How many terms each contributing topic supplies.
const TOPIC_TERMS: usize = 10;
/// How many embedding neighbors each seed token supplies.
const SEED_NEIGHBORS: usize = 5;

/// Build the affinity map for a seed text. Empty when the text matches no
/// topic and has no embedding neighbors.
pub fn topic_affinity(services: &Services<'_>, text: &str) -> BTreeMap<String, f64> {
    let tokens: Vec<String> = tokenize(text).iter().map(|t| t.to_lowercase()).collect();
    if tokens.is_empty() {
        return BTreeMap::new();
    }

    let mut map: BTreeMap<String, f64> = BTreeMap::new();
    let mut absorb = |word: String, score: f64| {
        let entry = map.entry(word).or_insert(0.0);
        if score > *entry {
            *entry = score;
        }
    };

    let mut dist = services.topics.infer(&tokens);
    dist.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for &(topic, topic_weight) in dist.iter().take(TOP_TOPICS) {
        for (term, term_weight) in services.topics.terms(topic, TOPIC_TERMS) {
            absorb(term, topic_weight * term_weight);
        }
    }

    for token in &tokens {
        for (word, similarity) in services.embedding.neighbors(token, SEED_NEIGHBORS) {
            absorb(word, similarity);
        }
    }

    let max = map.values().fold(0.0_f64, |acc, &v| acc.max(v));
    if max > 0.0 {
        for v in map.values_mut() {
            *v /= max;
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultServices;
    use crate::corpus::Corpus;

    #[test]
    fn test_affinity_normalized_to_unit_max() {
        let bundle = DefaultServices::fit(&Corpus::fallback());
        let map = topic_affinity(&bundle.services(), "whiskey");
        assert!(!map.is_empty(), "a corpus-known seed should match topics");
        let max = map.values().fold(0.0_f64, |acc, &v| acc.max(v));
        assert!((max - 1.0).abs() < 1e-9, "max affinity should be 1.0, got {}", max);
        for (word, &v) in &map {
            assert!((0.0..=1.0).contains(&v), "affinity of '{}' out of range: {}", word, v);
        }
    }

    #[test]
    fn test_seed_theme_terms_present() {
        let bundle = DefaultServices::fit(&Corpus::fallback());
        let map = topic_affinity(&bundle.services(), "whiskey and beer");
        assert!(
            map.contains_key("bottle"),
            "drinking-theme terms should appear in the affinity map"
        );
    }

    #[test]
    fn test_unmatched_seed_gives_empty_map() {
        let bundle = DefaultServices::fit(&Corpus::fallback());
        let map = topic_affinity(&bundle.services(), "qqqwxyz");
        assert!(map.is_empty());
        assert!(topic_affinity(&bundle.services(), "").is_empty());
    }
}
