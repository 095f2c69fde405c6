// Song quality metrics.
//
// Seven component metrics, each clamped to [0, 1] and rounded to three
// decimals, plus a fixed-weight overall score. Scoring is pure: it reads
// the finished lines and chords and never touches the RNG, so scoring the
// same song twice gives identical numbers.

use crate::Services;
use crate::affinity::topic_affinity;
use crate::chords;
use crate::constraint;
use crate::corpus::CorpusIndex;
use crate::line::Line;
use crate::markov::TransitionModel;
use serde::Serialize;

/// Target syllables per line for the syllable metric.
const TARGET_LINE_SYLLABLES: f64 = 8.0;

/// Component weights for the overall score.
#[derive(Debug, Clone)]
pub struct MetricWeights {
    pub transition: f64,
    pub topic_coherence: f64,
    pub sentiment_consistency: f64,
    pub syllable: f64,
    pub rhyme: f64,
    pub topic_influence: f64,
    pub chord_match: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        MetricWeights {
            transition: 0.20,
            topic_coherence: 0.15,
            sentiment_consistency: 0.15,
            syllable: 0.15,
            rhyme: 0.15,
            topic_influence: 0.10,
            chord_match: 0.10,
        }
    }
}

/// The scored quality profile of a song.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SongMetrics {
    pub transition_probability: f64,
    pub topic_coherence: f64,
    pub sentiment_consistency: f64,
    pub syllable_score: f64,
    pub rhyme_score: f64,
    pub topic_influence: f64,
    pub chord_sentiment_match: f64,
    pub overall_score: f64,
}

/// Score a song with the default weights.
pub fn score_song(
    lines: &[Line],
    chord_seq: &[String],
    model: &TransitionModel,
    index: &CorpusIndex,
    services: &Services<'_>,
) -> SongMetrics {
    score_song_weighted(
        lines,
        chord_seq,
        model,
        index,
        services,
        &MetricWeights::default(),
    )
}

/// Score a song with explicit weights.
pub fn score_song_weighted(
    lines: &[Line],
    chord_seq: &[String],
    model: &TransitionModel,
    index: &CorpusIndex,
    services: &Services<'_>,
    weights: &MetricWeights,
) -> SongMetrics {
    let mut metrics = SongMetrics {
        transition_probability: component(transition_metric(lines, model)),
        topic_coherence: component(coherence_metric(lines, services)),
        sentiment_consistency: component(sentiment_metric(lines, services)),
        syllable_score: component(syllable_metric(lines, index)),
        rhyme_score: component(rhyme_metric(lines, services)),
        topic_influence: component(influence_metric(lines, services)),
        chord_sentiment_match: component(chord_metric(lines, chord_seq, services)),
        overall_score: 0.0,
    };
    metrics.overall_score = overall(weights, &metrics);
    metrics
}

/// The weighted overall score, rounded like every component.
pub fn overall(weights: &MetricWeights, m: &SongMetrics) -> f64 {
    round3(
        weights.transition * m.transition_probability
            + weights.topic_coherence * m.topic_coherence
            + weights.sentiment_consistency * m.sentiment_consistency
            + weights.syllable * m.syllable_score
            + weights.rhyme * m.rhyme_score
            + weights.topic_influence * m.topic_influence
            + weights.chord_match * m.chord_sentiment_match,
    )
}

fn component(value: f64) -> f64 {
    round3(value.clamp(0.0, 1.0))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Mean observed order-1 probability over the song's adjacent word pairs.
/// Pairs the corpus never produced contribute nothing.
fn transition_metric(lines: &[Line], model: &TransitionModel) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for line in lines {
        for pair in line.words.windows(2) {
            let p = model.order1_prob(&pair[0], &pair[1]);
            if p > 0.0 {
                sum += p;
                count += 1;
            }
        }
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Topic concentration over the whole song: 1 minus the normalized entropy
/// of the inferred topic distribution. A single dominant topic scores 1.0.
fn coherence_metric(lines: &[Line], services: &Services<'_>) -> f64 {
    let tokens: Vec<String> = lines
        .iter()
        .flat_map(|l| l.words.iter().cloned())
        .collect();
    let dist = services.topics.infer(&tokens);
    match dist.len() {
        0 => 0.0,
        1 => 1.0,
        k => {
            let entropy: f64 = dist
                .iter()
                .filter(|(_, p)| *p > 0.0)
                .map(|(_, p)| -p * p.log2())
                .sum();
            1.0 - entropy / (k as f64).log2()
        }
    }
}

/// 1 minus the population standard deviation of per-line sentiment,
/// floored at 0.
fn sentiment_metric(lines: &[Line], services: &Services<'_>) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let sentiments: Vec<f64> = lines
        .iter()
        .map(|l| services.sentiment.score(&l.text()))
        .collect();
    let n = sentiments.len() as f64;
    let mean = sentiments.iter().sum::<f64>() / n;
    let variance = sentiments.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    1.0 - variance.sqrt().min(1.0)
}

/// Mean closeness of each line's syllable count to the eight-syllable
/// target.
fn syllable_metric(lines: &[Line], index: &CorpusIndex) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let sum: f64 = lines
        .iter()
        .map(|l| {
            let count = index.line_syllables(&l.words) as f64;
            1.0 - ((count - TARGET_LINE_SYLLABLES) / TARGET_LINE_SYLLABLES)
                .abs()
                .min(1.0)
        })
        .sum();
    sum / lines.len() as f64
}

/// Mean rhyme strength of couplet end words: lines (0,1), (2,3), and so on.
fn rhyme_metric(lines: &[Line], services: &Services<'_>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for pair in lines.chunks(2) {
        if let [a, b] = pair {
            if let (Some(end_a), Some(end_b)) = (a.words.last(), b.words.last()) {
                sum += constraint::rhyme_score(services.phonetics, end_a, end_b);
                count += 1;
            }
        }
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// How much each line stays on its own topic: the fraction of its words
/// found in the line's affinity map, averaged over lines with a non-empty
/// map.
fn influence_metric(lines: &[Line], services: &Services<'_>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for line in lines {
        if line.words.is_empty() {
            continue;
        }
        let affinity = topic_affinity(services, &line.text());
        if affinity.is_empty() {
            continue;
        }
        let hits = line
            .words
            .iter()
            .filter(|w| affinity.contains_key(w.as_str()))
            .count();
        sum += hits as f64 / line.words.len() as f64;
        count += 1;
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Agreement between each line's sentiment and its chord's polarity
/// (minor chords read as -0.5, everything else as +0.5).
fn chord_metric(lines: &[Line], chord_seq: &[String], services: &Services<'_>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (line, chord) in lines.iter().zip(chord_seq) {
        let sentiment = services.sentiment.score(&line.text());
        let polarity = if chords::is_minor_chord(chord) { -0.5 } else { 0.5 };
        sum += (1.0 - (sentiment - polarity).abs()).clamp(0.0, 1.0);
        count += 1;
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}
