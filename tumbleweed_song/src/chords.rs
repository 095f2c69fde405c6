// Chord progression selection.
//
// Curated four-chord numeral patterns, one pool for major and one for
// minor, resolved against a per-key degree table. Choruses always draw from
// the major pool; verses pick the pool by sentiment polarity, and minor
// progressions resolve in the relative minor of the requested key.

use rand::Rng;

/// Every progression is four chords long.
pub const PROGRESSION_LEN: usize = 4;

const MAJOR_PROGRESSIONS: [[&str; PROGRESSION_LEN]; 10] = [
    ["I", "IV", "V", "I"],
    ["I", "V", "vi", "IV"],
    ["I", "IV", "I", "V"],
    ["I", "vi", "IV", "V"],
    ["I", "IV", "vi", "V"],
    ["I", "V", "IV", "I"],
    ["vi", "IV", "I", "V"],
    ["I", "iii", "IV", "V"],
    ["IV", "I", "V", "vi"],
    ["I", "IV", "ii", "V"],
];

const MINOR_PROGRESSIONS: [[&str; PROGRESSION_LEN]; 10] = [
    ["i", "VI", "III", "VII"],
    ["i", "iv", "v", "i"],
    ["i", "VII", "VI", "VII"],
    ["i", "iv", "VII", "i"],
    ["i", "VI", "VII", "i"],
    ["i", "v", "iv", "VII"],
    ["i", "III", "VII", "iv"],
    ["i", "iv", "i", "v"],
    ["VI", "i", "VII", "III"],
    ["i", "VII", "iv", "VI"],
];

/// Degree chords I ii iii IV V vi vii° for the supported major keys.
/// Unrecognized keys fall back to G.
fn major_degrees(key: &str) -> [&'static str; 7] {
    match key {
        "C" => ["C", "Dm", "Em", "F", "G", "Am", "B°"],
        "D" => ["D", "Em", "F#m", "G", "A", "Bm", "C#°"],
        "A" => ["A", "Bm", "C#m", "D", "E", "F#m", "G#°"],
        "E" => ["E", "F#m", "G#m", "A", "B", "C#m", "D#°"],
        "F" => ["F", "Gm", "Am", "Bb", "C", "Dm", "E°"],
        _ => ["G", "Am", "Bm", "C", "D", "Em", "F#°"],
    }
}

/// Degree chords i ii° III iv v VI VII for the supported minor keys.
/// Unrecognized keys fall back to Em.
fn minor_degrees(key: &str) -> [&'static str; 7] {
    match key {
        "Am" => ["Am", "B°", "C", "Dm", "Em", "F", "G"],
        "Bm" => ["Bm", "C#°", "D", "Em", "F#m", "G", "A"],
        "F#m" => ["F#m", "G#°", "A", "Bm", "C#m", "D", "E"],
        "Dm" => ["Dm", "E°", "F", "Gm", "Am", "Bb", "C"],
        _ => ["Em", "F#°", "G", "Am", "Bm", "C", "D"],
    }
}

/// Relative minor of a supported major key, Em for anything else.
fn relative_minor(key: &str) -> &'static str {
    match key {
        "C" => "Am",
        "G" => "Em",
        "D" => "Bm",
        "A" => "F#m",
        "E" => "C#m",
        "F" => "Dm",
        _ => "Em",
    }
}

fn major_degree_index(numeral: &str) -> usize {
    match numeral {
        "ii" => 1,
        "iii" => 2,
        "IV" => 3,
        "V" => 4,
        "vi" => 5,
        "vii°" => 6,
        _ => 0,
    }
}

fn minor_degree_index(numeral: &str) -> usize {
    match numeral {
        "ii°" => 1,
        "III" => 2,
        "iv" => 3,
        "v" => 4,
        "VI" => 5,
        "VII" => 6,
        _ => 0,
    }
}

/// Pick a progression and resolve its numerals to chord names.
///
/// Choruses always resolve major in `key`; verses resolve major when
/// `sentiment` is non-negative, otherwise minor in the relative minor of
/// `key`.
pub fn progression(sentiment: f64, is_chorus: bool, key: &str, rng: &mut impl Rng) -> Vec<String> {
    if is_chorus || sentiment >= 0.0 {
        let pattern = MAJOR_PROGRESSIONS[rng.random_range(0..MAJOR_PROGRESSIONS.len())];
        let degrees = major_degrees(key);
        pattern
            .iter()
            .map(|n| degrees[major_degree_index(n)].to_string())
            .collect()
    } else {
        let pattern = MINOR_PROGRESSIONS[rng.random_range(0..MINOR_PROGRESSIONS.len())];
        let degrees = minor_degrees(relative_minor(key));
        pattern
            .iter()
            .map(|n| degrees[minor_degree_index(n)].to_string())
            .collect()
    }
}

/// A chord name spelled minor ("Am", "F#m"). Diminished chords are not
/// minor-marked.
pub fn is_minor_chord(name: &str) -> bool {
    name.ends_with('m')
}
