// Tumbleweed Song Generator — CLI entry point.
//
// Generates a country song (lyrics plus chord progressions) from a lyric
// corpus. The pipeline: corpus loading → model fitting → composition →
// quality metrics.
//
// Usage:
//   cargo run -p tumbleweed_song --bin generate -- [--verses N] [--chorus-lines N]
//     [--seed WORD] [--key KEY] [--corpus FILE] [--rng-seed N] [--json]
//
// Keys: C, G, D, A, E, F (anything else falls back to G)

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use tumbleweed_nlp::EmbeddingModel;
use tumbleweed_song::compose::VERSE_LINES;
use tumbleweed_song::corpus::{Corpus, CorpusIndex};
use tumbleweed_song::{DefaultServices, SongRequest, TransitionModel, compose};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse arguments
    let num_verses: usize = parse_flag(&args, "--verses").unwrap_or(3).clamp(1, 5);
    let chorus_lines: usize = parse_flag(&args, "--chorus-lines").unwrap_or(4).clamp(2, 8);
    let seed: Option<String> = parse_flag(&args, "--seed");
    let key: String = parse_flag(&args, "--key").unwrap_or_else(|| "G".to_string());
    let corpus_path: Option<String> = parse_flag(&args, "--corpus");
    let rng_seed: Option<u64> = parse_flag(&args, "--rng-seed");
    let as_json = args.iter().any(|a| a == "--json");

    println!("=== Tumbleweed Song Generator ===");
    println!("Verses: {}", num_verses);
    println!("Chorus lines: {}", chorus_lines);
    println!("Key: {}", key);
    if let Some(s) = &seed {
        println!("Seed word: {}", s);
    }
    if let Some(s) = rng_seed {
        println!("RNG seed: {}", s);
    }
    println!();

    // Initialize RNG
    let mut rng = if let Some(s) = rng_seed {
        StdRng::seed_from_u64(s)
    } else {
        StdRng::from_os_rng()
    };

    // Load corpus
    println!("[1/4] Loading corpus...");
    let corpus = Corpus::load_or_fallback(corpus_path.as_deref().map(Path::new));
    println!("  {} songs loaded.", corpus.len());

    // Fit models
    println!("[2/4] Fitting models...");
    let bundle = DefaultServices::fit(&corpus);
    let index = CorpusIndex::build(&corpus, &bundle.phonetics);
    let model = TransitionModel::build(&corpus.tokenized());
    println!(
        "  {} words, {} frequent phrases.",
        index.vocab_len(),
        index.phrase_len()
    );
    println!(
        "  Transition contexts: {} / {} / {} (orders 1-3).",
        model.context_count(1),
        model.context_count(2),
        model.context_count(3)
    );
    println!("  Embedding vocabulary: {} words.", bundle.embedding.vocab_len());

    // Compose
    println!("[3/4] Composing...");
    let req = SongRequest {
        num_verses,
        chorus_lines,
        seed: seed.clone(),
        key,
    };
    let song = match compose(&model, &index, &bundle.services(), &req, &mut rng) {
        Ok(song) => song,
        Err(e) => {
            eprintln!("  Error composing song: {}", e);
            std::process::exit(1);
        }
    };
    if song.seed_repairs > 0 {
        println!("  Seed repairs: {}", song.seed_repairs);
    }
    println!();

    if as_json {
        match serde_json::to_string_pretty(&song) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing song: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Section boundaries repeat: chorus, then verse/chorus pairs
    let section_lens = section_lengths(num_verses, chorus_lines);
    let mut cursor = 0;
    for len in section_lens {
        for i in cursor..cursor + len {
            println!("  [{:>4}] {}", song.chords[i], song.lines[i].text());
        }
        println!();
        cursor += len;
    }

    if let Some(s) = &seed {
        let similar = bundle.embedding.neighbors(s, 5);
        if !similar.is_empty() {
            let names: Vec<String> = similar
                .iter()
                .map(|(w, sim)| format!("{} ({:.2})", w, sim))
                .collect();
            println!("Similar to '{}': {}", s, names.join(", "));
        }
    }

    // Metrics
    println!("[4/4] Quality metrics:");
    match serde_json::to_string_pretty(&song.metrics) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing metrics: {}", e);
            std::process::exit(1);
        }
    }
}

/// Line counts per printed section: chorus, then verse and chorus
/// alternating, ending on the final chorus.
fn section_lengths(num_verses: usize, chorus_lines: usize) -> Vec<usize> {
    let mut lens = vec![chorus_lines];
    for _ in 0..num_verses {
        lens.push(VERSE_LINES);
        lens.push(chorus_lines);
    }
    lens
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
