// Song composition.
//
// A song is one chorus and N verses arranged chorus-first: chorus, verse,
// chorus, verse, ..., final chorus, with the chorus reused verbatim at each
// repeat. Each section carries its own rhyme scheme, sentiment ramp,
// syllable pattern, and chord progression; song-level usage state keeps
// rhyme endings and frequent phrases from washing across sections
// unchecked.

use crate::Services;
use crate::affinity::topic_affinity;
use crate::chords;
use crate::corpus::CorpusIndex;
use crate::error::SongError;
use crate::line::{self, Line, LineRequest, UsageState};
use crate::markov::TransitionModel;
use crate::scoring::{self, SongMetrics};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

/// Lines per verse.
pub const VERSE_LINES: usize = 4;
/// Couplet scheme for choruses.
const CHORUS_SCHEME: &str = "AABB";
/// Alternating scheme for verses.
const VERSE_SCHEME: &str = "ABAB";
/// Per-line syllable targets, cycled.
const SYLLABLE_PATTERN: [usize; 4] = [8, 6, 8, 6];
/// Total sentiment rise across a section.
const SENTIMENT_RAMP: f64 = 0.4;
/// Base verse temperature; each later verse runs hotter.
const VERSE_BASE_TEMPERATURE: f64 = 1.2;
/// Temperature increase per verse index.
const VERSE_TEMPERATURE_STEP: f64 = 0.2;

/// What to compose.
#[derive(Debug, Clone)]
pub struct SongRequest {
    pub num_verses: usize,
    pub chorus_lines: usize,
    /// Thematic seed word; when set it is guaranteed to appear in the song.
    pub seed: Option<String>,
    /// Major key the chords resolve in.
    pub key: String,
}

impl Default for SongRequest {
    fn default() -> Self {
        SongRequest {
            num_verses: 3,
            chorus_lines: 4,
            seed: None,
            key: "G".to_string(),
        }
    }
}

/// A finished song: lines and chords in performance order, plus its score.
#[derive(Debug, Clone, Serialize)]
pub struct Song {
    pub lines: Vec<Line>,
    pub chords: Vec<String>,
    pub metrics: SongMetrics,
    /// How many times the seed guarantee had to regenerate a verse.
    pub seed_repairs: u32,
}

struct SectionConfig<'a> {
    num_lines: usize,
    seed: Option<&'a str>,
    rhyme_scheme: &'static str,
    is_chorus: bool,
    force_seed_first: bool,
    temperature: f64,
    key: &'a str,
}

/// Compose a full song.
pub fn compose(
    model: &TransitionModel,
    index: &CorpusIndex,
    services: &Services<'_>,
    req: &SongRequest,
    rng: &mut impl Rng,
) -> Result<Song, SongError> {
    let mut state = UsageState::default();

    // The chorus comes first so its phrases and endings are reserved
    // before any verse spends them.
    let chorus_cfg = SectionConfig {
        num_lines: req.chorus_lines,
        seed: req.seed.as_deref(),
        rhyme_scheme: CHORUS_SCHEME,
        is_chorus: true,
        force_seed_first: req.seed.is_some(),
        temperature: 1.0,
        key: &req.key,
    };
    let (chorus_lines, chorus_chords) =
        generate_section(model, index, services, &chorus_cfg, &state, rng)?;
    record_section(&mut state, &chorus_lines);

    let mut lines = chorus_lines.clone();
    let mut chord_seq = chorus_chords.clone();

    for verse in 0..req.num_verses {
        let cfg = SectionConfig {
            num_lines: VERSE_LINES,
            seed: if verse == 0 { req.seed.as_deref() } else { None },
            rhyme_scheme: VERSE_SCHEME,
            is_chorus: false,
            force_seed_first: verse == 0 && req.seed.is_some(),
            temperature: VERSE_BASE_TEMPERATURE + VERSE_TEMPERATURE_STEP * verse as f64,
            key: &req.key,
        };
        let (verse_lines, verse_chords) =
            generate_section(model, index, services, &cfg, &state, rng)?;
        record_section(&mut state, &verse_lines);
        lines.extend(verse_lines);
        chord_seq.extend(verse_chords);

        if verse + 1 < req.num_verses {
            lines.extend(chorus_lines.iter().cloned());
            chord_seq.extend(chorus_chords.iter().cloned());
        }
    }

    lines.extend(chorus_lines.iter().cloned());
    chord_seq.extend(chorus_chords.iter().cloned());

    // Seed guarantee: one repair pass, never a loop.
    let mut seed_repairs = 0;
    if let Some(seed) = &req.seed {
        let needle = seed.to_lowercase();
        if !lines.iter().any(|l| l.text().contains(&needle)) {
            log::debug!("seed '{}' absent from song, regenerating verse one", needle);
            seed_repairs = 1;
            let cfg = SectionConfig {
                num_lines: VERSE_LINES,
                seed: Some(seed),
                rhyme_scheme: VERSE_SCHEME,
                is_chorus: false,
                force_seed_first: true,
                temperature: 1.0,
                key: &req.key,
            };
            let (new_lines, new_chords) =
                generate_section(model, index, services, &cfg, &state, rng)?;
            // verse one sits right after the opening chorus
            let start = req.chorus_lines;
            for (offset, (l, c)) in new_lines.into_iter().zip(new_chords).enumerate() {
                if start + offset < lines.len() {
                    lines[start + offset] = l;
                    chord_seq[start + offset] = c;
                }
            }
        }
    }

    let metrics = scoring::score_song(&lines, &chord_seq, model, index, services);
    Ok(Song {
        lines,
        chords: chord_seq,
        metrics,
        seed_repairs,
    })
}

/// Generate one section's lines and its cycled chord progression.
fn generate_section(
    model: &TransitionModel,
    index: &CorpusIndex,
    services: &Services<'_>,
    cfg: &SectionConfig<'_>,
    state: &UsageState,
    rng: &mut impl Rng,
) -> Result<(Vec<Line>, Vec<String>), SongError> {
    let base_sentiment = rng.random_range(-0.3..0.3);
    let step = if cfg.num_lines > 1 {
        SENTIMENT_RAMP / (cfg.num_lines - 1) as f64
    } else {
        0.0
    };
    let topic_words = cfg
        .seed
        .map(|s| topic_affinity(services, s))
        .filter(|map| !map.is_empty());
    let progression = chords::progression(base_sentiment, cfg.is_chorus, cfg.key, rng);

    // Sections start from the song-level state so rhyme endings spent in
    // earlier sections stay off-limits, then accumulate their own words.
    let mut usage = state.clone();
    let mut endings: BTreeMap<char, String> = BTreeMap::new();
    let scheme: Vec<char> = cfg.rhyme_scheme.chars().collect();

    let mut lines = Vec::with_capacity(cfg.num_lines);
    let mut chord_seq = Vec::with_capacity(cfg.num_lines);
    for i in 0..cfg.num_lines {
        let letter = scheme[i % scheme.len()];
        let req = LineRequest {
            seed: cfg.seed.map(str::to_string),
            max_words: line::DEFAULT_MAX_WORDS,
            rhyme_with: endings.get(&letter).cloned(),
            topic_words: topic_words.clone(),
            target_sentiment: Some(base_sentiment + step * i as f64),
            syllable_target: Some(SYLLABLE_PATTERN[i % SYLLABLE_PATTERN.len()]),
            temperature: cfg.temperature,
            force_seed: cfg.force_seed_first && i == 0,
        };
        let line = line::generate_line(model, index, services, &req, &usage, rng)?;
        for word in &line.words {
            usage.used_words.insert(word.clone());
        }
        if let Some(last) = line.words.last() {
            endings.insert(letter, last.clone());
        }
        chord_seq.push(progression[i % progression.len()].clone());
        lines.push(line);
    }
    Ok((lines, chord_seq))
}

/// Fold a finished section into song-level state: line endings become
/// reserved rhyme words, and every 2-4 word run becomes a discouraged
/// phrase.
fn record_section(state: &mut UsageState, lines: &[Line]) {
    for line in lines {
        if let Some(last) = line.words.last() {
            state.used_words.insert(last.clone());
        }
        for i in 0..line.words.len() {
            for span in 2..=4 {
                if i + span > line.words.len() {
                    break;
                }
                state.used_phrases.insert(line.words[i..i + span].join(" "));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultServices;
    use crate::corpus::Corpus;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixture {
        model: TransitionModel,
        index: CorpusIndex,
        bundle: DefaultServices,
    }

    fn fixture() -> Fixture {
        let corpus = Corpus::fallback();
        let bundle = DefaultServices::fit(&corpus);
        let index = CorpusIndex::build(&corpus, &bundle.phonetics);
        let model = TransitionModel::build(&corpus.tokenized());
        Fixture {
            model,
            index,
            bundle,
        }
    }

    #[test]
    fn test_song_shape() {
        let f = fixture();
        let mut rng = StdRng::seed_from_u64(21);
        let req = SongRequest {
            num_verses: 2,
            chorus_lines: 4,
            seed: None,
            key: "G".to_string(),
        };
        let song = compose(&f.model, &f.index, &f.bundle.services(), &req, &mut rng).unwrap();
        // chorus, verse, chorus, verse, chorus
        let expected = 4 + 4 + 4 + 4 + 4;
        assert_eq!(song.lines.len(), expected);
        assert_eq!(song.chords.len(), expected);
    }

    #[test]
    fn test_chorus_repeats_verbatim() {
        let f = fixture();
        let mut rng = StdRng::seed_from_u64(33);
        let req = SongRequest {
            num_verses: 2,
            chorus_lines: 4,
            seed: Some("highway".to_string()),
            key: "G".to_string(),
        };
        let song = compose(&f.model, &f.index, &f.bundle.services(), &req, &mut rng).unwrap();
        let chorus: Vec<String> = song.lines[..4].iter().map(Line::text).collect();
        let middle: Vec<String> = song.lines[8..12].iter().map(Line::text).collect();
        let last: Vec<String> = song.lines[16..].iter().map(Line::text).collect();
        assert_eq!(chorus, middle, "middle chorus must repeat the opening one");
        assert_eq!(chorus, last, "final chorus must repeat the opening one");
    }

    #[test]
    fn test_seed_guaranteed_in_song() {
        let f = fixture();
        for rng_seed in [1u64, 2, 3, 4, 5] {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let req = SongRequest {
                seed: Some("highway".to_string()),
                ..SongRequest::default()
            };
            let song =
                compose(&f.model, &f.index, &f.bundle.services(), &req, &mut rng).unwrap();
            assert!(
                song.lines
                    .iter()
                    .any(|l| l.words.iter().any(|w| w == "highway")),
                "seed must appear somewhere in the song"
            );
            assert!(song.seed_repairs <= 1, "at most one repair pass");
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let f = fixture();
        let req = SongRequest {
            seed: Some("whiskey".to_string()),
            ..SongRequest::default()
        };
        let run = |s: u64| {
            let mut rng = StdRng::seed_from_u64(s);
            let song =
                compose(&f.model, &f.index, &f.bundle.services(), &req, &mut rng).unwrap();
            (
                song.lines.iter().map(Line::text).collect::<Vec<_>>(),
                song.chords,
            )
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_metrics_populated_and_in_range() {
        let f = fixture();
        let mut rng = StdRng::seed_from_u64(55);
        let song = compose(
            &f.model,
            &f.index,
            &f.bundle.services(),
            &SongRequest::default(),
            &mut rng,
        )
        .unwrap();
        let m = &song.metrics;
        for value in [
            m.transition_probability,
            m.topic_coherence,
            m.sentiment_consistency,
            m.syllable_score,
            m.rhyme_score,
            m.topic_influence,
            m.chord_sentiment_match,
            m.overall_score,
        ] {
            assert!((0.0..=1.0).contains(&value), "metric out of range: {}", value);
        }
    }

    #[test]
    fn test_record_section_tracks_endings_and_phrases() {
        let mut state = UsageState::default();
        let line = Line {
            words: ["down", "the", "road", "tonight"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            metrics: Default::default(),
        };
        record_section(&mut state, &[line]);
        assert!(state.used_words.contains("tonight"));
        assert!(!state.used_words.contains("down"));
        assert!(state.used_phrases.contains("down the"));
        assert!(state.used_phrases.contains("the road tonight"));
        assert!(state.used_phrases.contains("down the road tonight"));
        assert!(!state.used_phrases.contains("tonight"));
    }
}
