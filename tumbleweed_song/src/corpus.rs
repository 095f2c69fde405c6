// Corpus loading and indexing.
//
// A corpus is a list of song lyric strings loaded from a JSON array of
// `{"lyrics": "..."}` records. A small embedded fallback corpus keeps the
// engine usable when no file is supplied or the file is bad.
//
// `CorpusIndex` holds the derived lookup tables the generator consults on
// every candidate word: a multi-word phrase frequency table and a per-word
// syllable table.

use crate::error::SongError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tumbleweed_nlp::phonetic::{PhoneticLexicon, syllable_count};
use tumbleweed_nlp::tokenize;

/// Phrase spans counted by the index, in words.
const PHRASE_SPANS: std::ops::RangeInclusive<usize> = 2..=4;
/// Phrases seen fewer times than this are dropped from the table.
const MIN_PHRASE_COUNT: u32 = 3;

#[derive(Debug, Deserialize)]
struct SongRecord {
    lyrics: String,
}

/// A collection of song lyrics, one string per song.
#[derive(Debug, Clone)]
pub struct Corpus {
    songs: Vec<String>,
}

impl Corpus {
    /// Parse a corpus from a JSON array of `{"lyrics": ...}` records.
    pub fn from_json(json: &str) -> Result<Self, SongError> {
        let records: Vec<SongRecord> = serde_json::from_str(json)?;
        Ok(Corpus {
            songs: records.into_iter().map(|r| r.lyrics).collect(),
        })
    }

    /// Load a corpus file from disk.
    pub fn load(path: &Path) -> Result<Self, SongError> {
        let json = std::fs::read_to_string(path).map_err(|source| SongError::CorpusRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from `path` when given, falling back to the embedded corpus on a
    /// missing path, a read/parse failure, or an empty file.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::fallback();
        };
        match Self::load(path) {
            Ok(corpus) if !corpus.is_empty() => corpus,
            Ok(_) => {
                log::warn!("corpus file '{}' is empty; using fallback", path.display());
                Self::fallback()
            }
            Err(err) => {
                log::warn!("could not load corpus: {}; using fallback", err);
                Self::fallback()
            }
        }
    }

    /// The corpus embedded at compile time.
    pub fn fallback() -> Self {
        let json = include_str!("../../data/fallback_corpus.json");
        Self::from_json(json).expect("embedded fallback_corpus.json is malformed")
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Lowercased token sequence per song. Chains and co-occurrence windows
    /// run over the whole song, crossing line breaks, so line-final words
    /// still lead somewhere.
    pub fn tokenized(&self) -> Vec<Vec<String>> {
        self.songs
            .iter()
            .map(|song| {
                tokenize(song)
                    .iter()
                    .map(|t| t.to_lowercase())
                    .collect()
            })
            .collect()
    }
}

/// Derived corpus lookup tables.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    /// Space-joined phrase -> occurrence count, spans of 2-4 words, only
    /// phrases seen at least `MIN_PHRASE_COUNT` times.
    phrases: BTreeMap<String, u32>,
    /// Word -> syllable count. First estimate wins.
    syllables: BTreeMap<String, usize>,
}

impl CorpusIndex {
    /// Build the phrase and syllable tables from a corpus.
    pub fn build(corpus: &Corpus, phonetics: &dyn PhoneticLexicon) -> Self {
        let docs = corpus.tokenized();

        let mut phrases: BTreeMap<String, u32> = BTreeMap::new();
        for doc in &docs {
            for i in 0..doc.len() {
                for span in PHRASE_SPANS {
                    if i + span > doc.len() {
                        break;
                    }
                    *phrases.entry(doc[i..i + span].join(" ")).or_insert(0) += 1;
                }
            }
        }
        phrases.retain(|_, count| *count >= MIN_PHRASE_COUNT);

        let mut syllables: BTreeMap<String, usize> = BTreeMap::new();
        for doc in &docs {
            for word in doc {
                syllables
                    .entry(word.clone())
                    .or_insert_with(|| estimate_syllables(word, phonetics));
            }
        }

        CorpusIndex { phrases, syllables }
    }

    /// Syllable count for a word; unknown words default to 1.
    pub fn syllables_of(&self, word: &str) -> usize {
        self.syllables
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(1)
    }

    /// Total syllables across a word sequence.
    pub fn line_syllables(&self, words: &[String]) -> usize {
        words.iter().map(|w| self.syllables_of(w)).sum()
    }

    /// How often a space-joined phrase occurred, 0 if below threshold.
    pub fn phrase_count(&self, phrase: &str) -> u32 {
        self.phrases.get(phrase).copied().unwrap_or(0)
    }

    /// Number of distinct frequent phrases.
    pub fn phrase_len(&self) -> usize {
        self.phrases.len()
    }

    /// Number of distinct words with a syllable estimate.
    pub fn vocab_len(&self) -> usize {
        self.syllables.len()
    }

    /// Iterate the indexed vocabulary.
    pub fn vocab(&self) -> impl Iterator<Item = &str> {
        self.syllables.keys().map(String::as_str)
    }
}

/// Syllables from the primary pronunciation when the lexicon knows the word,
/// otherwise a vowel-letter count (a, e, i, o, u, y), never below 1.
fn estimate_syllables(word: &str, phonetics: &dyn PhoneticLexicon) -> usize {
    if let Some(prons) = phonetics.pronunciations(word) {
        if let Some(primary) = prons.first() {
            let count = syllable_count(primary);
            if count > 0 {
                return count;
            }
        }
    }
    word.chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
        .count()
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumbleweed_nlp::default_lexicon;

    #[test]
    fn test_fallback_corpus_loads() {
        let corpus = Corpus::fallback();
        assert!(corpus.len() >= 10, "fallback corpus should be non-trivial");
    }

    #[test]
    fn test_from_json_shape() {
        let corpus =
            Corpus::from_json(r#"[{"lyrics": "down the road"}, {"lyrics": "one more mile"}]"#)
                .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.tokenized()[0], vec!["down", "the", "road"]);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Corpus::from_json("not json").is_err());
        assert!(Corpus::from_json(r#"{"lyrics": "no outer array"}"#).is_err());
    }

    #[test]
    fn test_load_or_fallback_on_missing_file() {
        let corpus = Corpus::load_or_fallback(Some(Path::new("/nonexistent/corpus.json")));
        assert_eq!(corpus.len(), Corpus::fallback().len());
    }

    #[test]
    fn test_phrase_threshold() {
        let lexicon = default_lexicon();
        let corpus = Corpus::from_json(
            r#"[
                {"lyrics": "down the road again"},
                {"lyrics": "down the road tonight"},
                {"lyrics": "down the road forever"},
                {"lyrics": "up the creek once"}
            ]"#,
        )
        .unwrap();
        let index = CorpusIndex::build(&corpus, &lexicon);
        assert_eq!(index.phrase_count("down the road"), 3);
        assert_eq!(index.phrase_count("down the"), 3);
        // seen only once, below the threshold
        assert_eq!(index.phrase_count("up the creek"), 0);
    }

    #[test]
    fn test_syllables_every_word_at_least_one() {
        let lexicon = default_lexicon();
        let corpus = Corpus::fallback();
        let index = CorpusIndex::build(&corpus, &lexicon);
        for word in index.vocab() {
            assert!(
                index.syllables_of(word) >= 1,
                "word '{}' must have at least one syllable",
                word
            );
        }
    }

    #[test]
    fn test_syllable_fallback_counts_vowels() {
        let lexicon = default_lexicon();
        let corpus = Corpus::from_json(r#"[{"lyrics": "brrt zamboni sky"}]"#).unwrap();
        let index = CorpusIndex::build(&corpus, &lexicon);
        // no vowels at all still yields 1
        assert_eq!(index.syllables_of("brrt"), 1);
        // vowel-letter estimate for out-of-lexicon words
        assert_eq!(index.syllables_of("zamboni"), 3);
        // unknown to the index entirely
        assert_eq!(index.syllables_of("unindexed"), 1);
    }
}
