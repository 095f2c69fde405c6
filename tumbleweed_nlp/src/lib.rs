// Shared NLP services for the Tumbleweed song engine.
//
// The generation engine (`tumbleweed_song`) never talks to a concrete model
// directly; it consumes the narrow traits defined here. Each service has one
// default binding, so alternative models can be substituted without touching
// generation logic.
//
// Architecture:
// - `tokenize.rs`: plain word tokenizer (case preserved; callers lowercase)
// - `phonetic.rs`: `PhoneticLexicon` trait + `ArpabetLexicon`, an embedded
//   ARPAbet-style pronunciation dictionary with stress-digit vowel phones
// - `sentiment.rs`: `SentimentModel` trait + `ValenceLexicon`, a compound
//   polarity scorer over a valence word list
// - `topics.rs`: `TopicModel` trait + `ThemeTopics`, eight country-music
//   themes with term weights fitted from a corpus
// - `embedding.rs`: `EmbeddingModel` trait + `CooccurrenceEmbedding`,
//   windowed co-occurrence vectors with cosine-similarity neighbors
//
// Lexicon data lives in `data/*.json` at the workspace root and is embedded
// at compile time via `include_str!` (JSON string in, typed struct out).
//
// Every lookup miss degrades to a neutral default (None, 0.0, or an empty
// list) — these services must never make the engine fail on an unseen word.

pub mod embedding;
pub mod phonetic;
pub mod sentiment;
pub mod tokenize;
pub mod topics;

pub use embedding::{CooccurrenceEmbedding, EmbeddingModel};
pub use phonetic::{ArpabetLexicon, PhoneticLexicon, Pronunciation, default_lexicon};
pub use sentiment::{SentimentModel, ValenceLexicon, default_sentiment};
pub use tokenize::tokenize;
pub use topics::{ThemeTopics, TopicModel};
