// Single-line generation.
//
// A line grows word by word from a start word. At every step the three
// transition tables are blended into one candidate pool, constraint boosts
// reshape the scores (topic affinity, sentiment target, rhyme target on the
// final slot), and a temperature-weighted sample picks the next word.
//
// Seed placement is a bounded retry loop: when `force_seed` is set and the
// sampled line missed the seed, the line is rebuilt at a hotter temperature,
// and after the last attempt the seed is appended verbatim. The call always
// terminates.

use crate::Services;
use crate::corpus::CorpusIndex;
use crate::error::SongError;
use crate::markov::{Distribution, TransitionModel};
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Default cap on words per line.
pub const DEFAULT_MAX_WORDS: usize = 10;
/// Flat candidate weight that makes a reachable seed word nearly certain.
const SEED_OVERRIDE_WEIGHT: f64 = 100.0;
/// Rebuild attempts before the verbatim-append fallback.
const MAX_SEED_ATTEMPTS: usize = 6;
/// Temperature multiplier applied per failed seed attempt.
const SEED_RETRY_HEAT: f64 = 1.2;
/// Score multiplier for a bigram the song already used.
const USED_PHRASE_PENALTY: f64 = 0.5;
/// Strength of the topic-affinity boost.
const TOPIC_BOOST: f64 = 3.0;
/// Strength of the rhyme boost on the final slot.
const RHYME_BOOST: f64 = 2.0;

/// Per-order blending weight: order n contributes `1 + (n - 1) * 0.5`.
fn order_weight(order: usize) -> f64 {
    1.0 + (order as f64 - 1.0) * 0.5
}

/// Everything that shapes one generated line.
#[derive(Debug, Clone)]
pub struct LineRequest {
    /// Word to steer toward (and start from, when reachable).
    pub seed: Option<String>,
    /// Hard cap on the number of words.
    pub max_words: usize,
    /// Word the line's last word should rhyme with.
    pub rhyme_with: Option<String>,
    /// Word -> affinity map from `affinity::topic_affinity`.
    pub topic_words: Option<BTreeMap<String, f64>>,
    /// Target compound sentiment in [-1, 1].
    pub target_sentiment: Option<f64>,
    /// Target syllable count; growth stops at or just past it.
    pub syllable_target: Option<usize>,
    /// Sampling temperature; 1.0 is neutral, higher is flatter.
    pub temperature: f64,
    /// Guarantee the seed appears somewhere in the line.
    pub force_seed: bool,
}

impl Default for LineRequest {
    fn default() -> Self {
        LineRequest {
            seed: None,
            max_words: DEFAULT_MAX_WORDS,
            rhyme_with: None,
            topic_words: None,
            target_sentiment: None,
            syllable_target: None,
            temperature: 1.0,
            force_seed: false,
        }
    }
}

/// Per-transition quality averages for one line, each in [0, 1].
#[derive(Debug, Clone, Default, Serialize)]
pub struct LineMetrics {
    pub transition_prob: f64,
    pub topic_coherence: f64,
    pub sentiment_match: f64,
    pub syllable_match: f64,
}

/// A generated lyric line.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub words: Vec<String>,
    pub metrics: LineMetrics,
}

impl Line {
    /// The line as a space-joined string.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    fn placeholder() -> Self {
        Line {
            words: Vec::new(),
            metrics: LineMetrics::default(),
        }
    }
}

/// Words and phrases the current song has already spent, threaded through
/// every generation call explicitly.
#[derive(Debug, Clone, Default)]
pub struct UsageState {
    /// Words excluded from reuse (rhyme endings survive across sections).
    pub used_words: BTreeSet<String>,
    /// Space-joined phrases whose bigrams are discouraged.
    pub used_phrases: BTreeSet<String>,
}

/// Generate one line.
///
/// Returns `SongError::SeedRequired` when `force_seed` is set without a
/// seed, and an empty placeholder line when the model has no transitions.
pub fn generate_line(
    model: &TransitionModel,
    index: &CorpusIndex,
    services: &Services<'_>,
    req: &LineRequest,
    usage: &UsageState,
    rng: &mut impl Rng,
) -> Result<Line, SongError> {
    if req.force_seed && req.seed.is_none() {
        return Err(SongError::SeedRequired);
    }
    if model.is_empty() {
        return Ok(Line::placeholder());
    }

    let mut temperature = req.temperature;
    for attempt in 1..=MAX_SEED_ATTEMPTS {
        let (line, seed_placed) = build_line(model, index, services, req, temperature, usage, rng);
        if !req.force_seed || seed_placed {
            return Ok(line);
        }
        log::debug!(
            "seed '{}' missing after attempt {}, retrying hotter",
            req.seed.as_deref().unwrap_or(""),
            attempt
        );
        temperature *= SEED_RETRY_HEAT;
    }

    // Out of attempts: splice the seed in verbatim.
    let (mut line, _) = build_line(model, index, services, req, temperature, usage, rng);
    if let Some(seed) = &req.seed {
        if line.words.len() >= req.max_words {
            line.words.pop();
        }
        line.words.push(seed.to_lowercase());
    }
    Ok(line)
}

fn build_line(
    model: &TransitionModel,
    index: &CorpusIndex,
    services: &Services<'_>,
    req: &LineRequest,
    temperature: f64,
    usage: &UsageState,
    rng: &mut impl Rng,
) -> (Line, bool) {
    let seed = req.seed.as_ref().map(|s| s.to_lowercase());
    let (start, mut seed_placed) = pick_start(model, seed.as_deref(), req, usage, rng);

    let mut syllables = index.syllables_of(&start);
    let mut words = vec![start];
    let mut transitions = 0usize;
    let mut sums = LineMetrics::default();

    while words.len() < req.max_words
        && req.syllable_target.is_none_or(|target| syllables < target)
    {
        let mut candidates: Distribution = BTreeMap::new();
        let prev = words[words.len() - 1].clone();

        // Front-load the seed while two slots remain, so it never collides
        // with the rhyme slot.
        if let Some(seed_word) = &seed {
            if !seed_placed && words.len() + 2 <= req.max_words {
                if let Some(dist) = model.next_words(std::slice::from_ref(&prev)) {
                    if dist.contains_key(seed_word) {
                        candidates.insert(seed_word.clone(), SEED_OVERRIDE_WEIGHT);
                    }
                }
            }
        }

        // The word chosen now would land in the final slot.
        let final_slot = words.len() == req.max_words - 1;
        let rhyme_target = req.rhyme_with.as_deref().filter(|_| final_slot);

        for order in (1..=crate::markov::MAX_ORDER).rev() {
            if words.len() < order {
                continue;
            }
            let Some(dist) = model.next_words(&words[words.len() - order..]) else {
                continue;
            };
            for (word, &prob) in dist {
                if usage.used_words.contains(word) && rhyme_target.is_none() {
                    continue;
                }
                if let Some(target) = req.syllable_target {
                    if syllables + index.syllables_of(word) > target {
                        continue;
                    }
                }

                let mut score = prob * order_weight(order);
                if let Some(topics) = &req.topic_words {
                    if let Some(&affinity) = topics.get(word) {
                        score *= 1.0 + TOPIC_BOOST * affinity;
                    }
                }
                if let Some(target) = req.target_sentiment {
                    let diff = (services.sentiment.score(word) - target).abs();
                    score *= (1.0 - diff).max(0.1);
                }
                if let Some(rhyme) = rhyme_target {
                    score *=
                        1.0 + RHYME_BOOST * crate::constraint::rhyme_score(services.phonetics, word, rhyme);
                }
                if usage.used_phrases.contains(&format!("{} {}", prev, word)) {
                    score *= USED_PHRASE_PENALTY;
                }

                *candidates.entry(word.clone()).or_insert(0.0) += score;
            }
        }

        if candidates.is_empty() {
            // A forced seed beats a dead end.
            if let Some(seed_word) = &seed {
                if req.force_seed && !seed_placed {
                    syllables += index.syllables_of(seed_word);
                    words.push(seed_word.clone());
                    seed_placed = true;
                    continue;
                }
            }
            break;
        }

        let Some(next) = sample_weighted(&candidates, temperature, rng) else {
            break;
        };
        if Some(&next) == seed.as_ref() {
            seed_placed = true;
        }

        syllables += index.syllables_of(&next);
        transitions += 1;
        sums.transition_prob += model.order1_prob(&prev, &next);
        if let Some(topics) = &req.topic_words {
            sums.topic_coherence += topics.get(&next).copied().unwrap_or(0.0);
        }
        if let Some(target) = req.target_sentiment {
            let diff = (services.sentiment.score(&next) - target).abs();
            sums.sentiment_match += (1.0 - diff).max(0.0);
        }
        if let Some(target) = req.syllable_target {
            let overshoot = (target as f64 - syllables as f64).abs() / target as f64;
            sums.syllable_match += (1.0 - overshoot).max(0.0);
        }
        words.push(next);
    }

    let metrics = if transitions > 0 {
        let n = transitions as f64;
        LineMetrics {
            transition_prob: sums.transition_prob / n,
            topic_coherence: sums.topic_coherence / n,
            sentiment_match: sums.sentiment_match / n,
            syllable_match: sums.syllable_match / n,
        }
    } else {
        LineMetrics::default()
    };

    (Line { words, metrics }, seed_placed)
}

/// Choose the start word: a forced seed, a seed that can continue, an
/// unused topic word that can continue, then any unused start, then any
/// start at all.
fn pick_start(
    model: &TransitionModel,
    seed: Option<&str>,
    req: &LineRequest,
    usage: &UsageState,
    rng: &mut impl Rng,
) -> (String, bool) {
    if let Some(seed) = seed {
        if req.force_seed {
            return (seed.to_string(), true);
        }
        if model.next_words(std::slice::from_ref(&seed.to_string())).is_some() {
            return (seed.to_string(), true);
        }
    }

    if let Some(topics) = &req.topic_words {
        let options: Vec<&String> = topics
            .keys()
            .filter(|w| {
                !usage.used_words.contains(*w)
                    && model.next_words(std::slice::from_ref(*w)).is_some()
            })
            .collect();
        if !options.is_empty() {
            return (options[rng.random_range(0..options.len())].clone(), false);
        }
    }

    let unused: Vec<&str> = model
        .start_words()
        .filter(|w| !usage.used_words.contains(*w))
        .collect();
    let pool: Vec<&str> = if unused.is_empty() {
        model.start_words().collect()
    } else {
        unused
    };
    (pool[rng.random_range(0..pool.len())].to_string(), false)
}

/// Sample one key from a weighted candidate map after temperature scaling:
/// each weight is raised to `1 / temperature`, so low temperatures sharpen
/// the distribution and high temperatures flatten it. None when the map is
/// empty or all weights vanish.
pub fn sample_weighted(
    candidates: &BTreeMap<String, f64>,
    temperature: f64,
    rng: &mut impl Rng,
) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }
    let exponent = 1.0 / temperature.max(1e-6);
    let scaled: Vec<(&str, f64)> = candidates
        .iter()
        .map(|(word, &w)| (word.as_str(), w.max(0.0).powf(exponent)))
        .collect();
    let total: f64 = scaled.iter().map(|(_, w)| w).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    let target = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (word, w) in &scaled {
        cumulative += w;
        if cumulative > target {
            return Some((*word).to_string());
        }
    }
    scaled.last().map(|(word, _)| (*word).to_string())
}
