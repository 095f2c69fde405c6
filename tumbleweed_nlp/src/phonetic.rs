// Phonetic pronunciation lookup.
//
// `PhoneticLexicon` is the narrow interface the engine uses for rhyme
// detection and syllable counting. The default binding, `ArpabetLexicon`,
// is an embedded ARPAbet-style dictionary: each word maps to one or more
// pronunciations, each a sequence of phones where vowel phones carry a
// trailing stress digit ("AY1", "ER0").
//
// Absent words return `None`; callers convert that to a neutral fallback
// (rhyme 0.0, vowel-count syllable estimate).

use serde::Deserialize;
use std::collections::BTreeMap;

/// One pronunciation: an ordered sequence of ARPAbet phones.
pub type Pronunciation = Vec<String>;

/// Pronunciation lookup interface.
pub trait PhoneticLexicon {
    /// All known pronunciations for a word, primary first, or `None` if the
    /// word is not in the lexicon. Lookup is case-insensitive.
    fn pronunciations(&self, word: &str) -> Option<&[Pronunciation]>;
}

/// The top-level JSON structure for the lexicon file.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    words: BTreeMap<String, Vec<Pronunciation>>,
}

/// An ARPAbet pronunciation dictionary loaded from JSON.
#[derive(Debug, Clone)]
pub struct ArpabetLexicon {
    entries: BTreeMap<String, Vec<Pronunciation>>,
}

impl ArpabetLexicon {
    /// Parse a lexicon from a JSON string. Keys are stored lowercased.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: LexiconFile = serde_json::from_str(json)?;
        let entries = file
            .words
            .into_iter()
            .map(|(word, prons)| (word.to_lowercase(), prons))
            .collect();
        Ok(ArpabetLexicon { entries })
    }

    /// Number of words in the lexicon.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PhoneticLexicon for ArpabetLexicon {
    fn pronunciations(&self, word: &str) -> Option<&[Pronunciation]> {
        self.entries.get(&word.to_lowercase()).map(Vec::as_slice)
    }
}

/// Load the default lexicon embedded at compile time.
///
/// Panics if the embedded JSON is malformed (should never happen in a
/// released build).
pub fn default_lexicon() -> ArpabetLexicon {
    let json = include_str!("../../data/arpabet_lexicon.json");
    ArpabetLexicon::from_json(json).expect("embedded arpabet_lexicon.json is malformed")
}

/// True if a phone carries stress information (ends in a stress digit).
/// In ARPAbet only vowel phones do.
pub fn is_stressed_phone(phone: &str) -> bool {
    phone.chars().last().is_some_and(|c| c.is_ascii_digit())
}

/// Count syllables in a pronunciation: one per stress-carrying phone.
pub fn syllable_count(pron: &[String]) -> usize {
    pron.iter().filter(|p| is_stressed_phone(p)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_loads() {
        let lexicon = default_lexicon();
        assert!(
            lexicon.len() >= 80,
            "Expected >= 80 lexicon words, got {}",
            lexicon.len()
        );
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let lexicon = default_lexicon();
        assert!(lexicon.pronunciations("night").is_some());
        assert!(lexicon.pronunciations("Night").is_some());
        assert!(lexicon.pronunciations("NIGHT").is_some());
    }

    #[test]
    fn test_unknown_word_is_none() {
        let lexicon = default_lexicon();
        assert!(lexicon.pronunciations("zzzyx").is_none());
    }

    #[test]
    fn test_stressed_phone() {
        assert!(is_stressed_phone("AY1"));
        assert!(is_stressed_phone("ER0"));
        assert!(!is_stressed_phone("T"));
        assert!(!is_stressed_phone("NG"));
    }

    #[test]
    fn test_syllable_count() {
        let lexicon = default_lexicon();
        let prons = lexicon.pronunciations("whiskey").unwrap();
        assert_eq!(syllable_count(&prons[0]), 2);
        let prons = lexicon.pronunciations("night").unwrap();
        assert_eq!(syllable_count(&prons[0]), 1);
        let prons = lexicon.pronunciations("radio").unwrap();
        assert_eq!(syllable_count(&prons[0]), 3);
    }
}
