// Phonetic and sentiment constraint helpers.
//
// Rhyme strength compares the tails of two words' primary pronunciations,
// anchored at the last stress-marked phone. Stress digits are kept in the
// comparison, so only identically-stressed tails count as a perfect rhyme.
// Any missing data (unknown word, no stressed phone) scores 0.0 rather than
// erroring.

use tumbleweed_nlp::phonetic::{PhoneticLexicon, Pronunciation, is_stressed_phone};

/// Graded rhyme strength in {0.0, 0.6, 0.8, 1.0}. Symmetric in its
/// arguments.
pub fn rhyme_score(lexicon: &dyn PhoneticLexicon, a: &str, b: &str) -> f64 {
    let (Some(pron_a), Some(pron_b)) = (primary(lexicon, a), primary(lexicon, b)) else {
        return 0.0;
    };
    let (Some(ia), Some(ib)) = (last_stressed(pron_a), last_stressed(pron_b)) else {
        return 0.0;
    };
    let tail_a = &pron_a[ia..];
    let tail_b = &pron_b[ib..];
    if tail_a == tail_b {
        1.0
    } else if tail_a.last() == tail_b.last() {
        0.8
    } else if tail_a.first() == tail_b.first() {
        0.6
    } else {
        0.0
    }
}

/// Strict rhyme test used by song-level scoring: the last two phones of the
/// primary pronunciations match exactly.
pub fn do_rhyme(lexicon: &dyn PhoneticLexicon, a: &str, b: &str) -> bool {
    let (Some(pron_a), Some(pron_b)) = (primary(lexicon, a), primary(lexicon, b)) else {
        return false;
    };
    let tail = |p: &[String]| p[p.len().saturating_sub(2)..].to_vec();
    tail(pron_a) == tail(pron_b)
}

fn primary<'a>(lexicon: &'a dyn PhoneticLexicon, word: &str) -> Option<&'a [String]> {
    lexicon
        .pronunciations(word)
        .and_then(|prons| prons.first())
        .map(Pronunciation::as_slice)
}

/// Index of the last stress-marked phone, the rhyme anchor.
fn last_stressed(pron: &[String]) -> Option<usize> {
    pron.iter().rposition(|p| is_stressed_phone(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumbleweed_nlp::default_lexicon;

    #[test]
    fn test_perfect_rhyme() {
        let lexicon = default_lexicon();
        assert_eq!(rhyme_score(&lexicon, "night", "light"), 1.0);
        assert_eq!(rhyme_score(&lexicon, "me", "free"), 1.0);
    }

    #[test]
    fn test_self_rhyme_is_perfect() {
        let lexicon = default_lexicon();
        assert_eq!(rhyme_score(&lexicon, "night", "night"), 1.0);
    }

    #[test]
    fn test_symmetry() {
        let lexicon = default_lexicon();
        for (a, b) in [("night", "light"), ("night", "road"), ("night", "time")] {
            assert_eq!(
                rhyme_score(&lexicon, a, b),
                rhyme_score(&lexicon, b, a),
                "rhyme_score must be symmetric for ({}, {})",
                a,
                b
            );
        }
    }

    #[test]
    fn test_unknown_word_scores_zero() {
        let lexicon = default_lexicon();
        assert_eq!(rhyme_score(&lexicon, "night", "zzkrxx"), 0.0);
        assert_eq!(rhyme_score(&lexicon, "zzkrxx", "zzkrxx"), 0.0);
    }

    #[test]
    fn test_stress_digits_matter() {
        let lexicon = default_lexicon();
        // "way" ends in EY1, "highway" in EY2: same phones, different
        // stress marks, so the tails differ and the final-phone branch
        // does not fire either.
        assert_eq!(rhyme_score(&lexicon, "way", "highway"), 0.0);
    }

    #[test]
    fn test_do_rhyme_last_two_phones() {
        let lexicon = default_lexicon();
        assert!(do_rhyme(&lexicon, "night", "light"));
        assert!(!do_rhyme(&lexicon, "night", "road"));
        assert!(!do_rhyme(&lexicon, "night", "zzkrxx"));
    }
}
