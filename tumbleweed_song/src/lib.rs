// Country song generation engine.
//
// Pipeline: a lyric corpus is tokenized into multi-order Markov transition
// tables (markov.rs) and lookup indexes (corpus.rs); lines grow word by
// word under constraint-blended sampling (line.rs) steered by phonetic,
// sentiment, and topic services (constraint.rs, affinity.rs); the composer
// arranges chorus and verses with chord progressions (compose.rs,
// chords.rs); and the finished song is graded on seven quality metrics
// (scoring.rs).
//
// All randomness flows through a caller-supplied `rand::Rng`, so a fixed
// seed reproduces a song exactly.

pub mod affinity;
pub mod chords;
pub mod compose;
pub mod constraint;
pub mod corpus;
pub mod error;
pub mod line;
pub mod markov;
pub mod scoring;

pub use compose::{Song, SongRequest, compose};
pub use error::SongError;
pub use line::{Line, LineRequest, UsageState, generate_line};
pub use markov::TransitionModel;
pub use scoring::{MetricWeights, SongMetrics, score_song};

use tumbleweed_nlp::{
    ArpabetLexicon, CooccurrenceEmbedding, EmbeddingModel, PhoneticLexicon, SentimentModel,
    ThemeTopics, TopicModel, ValenceLexicon,
};

/// Co-occurrence window for the default embedding.
const EMBEDDING_WINDOW: usize = 4;
/// Minimum corpus frequency for the default embedding vocabulary.
const EMBEDDING_MIN_COUNT: usize = 2;

/// The NLP services the engine consults, behind trait objects so any
/// binding can be swapped in.
pub struct Services<'a> {
    pub phonetics: &'a dyn PhoneticLexicon,
    pub sentiment: &'a dyn SentimentModel,
    pub topics: &'a dyn TopicModel,
    pub embedding: &'a dyn EmbeddingModel,
}

/// The default service bindings: embedded ARPAbet and valence lexicons plus
/// topic and embedding models fitted to the corpus.
pub struct DefaultServices {
    pub phonetics: ArpabetLexicon,
    pub sentiment: ValenceLexicon,
    pub topics: ThemeTopics,
    pub embedding: CooccurrenceEmbedding,
}

impl DefaultServices {
    /// Fit the corpus-derived services and load the embedded lexicons.
    pub fn fit(corpus: &corpus::Corpus) -> Self {
        let docs = corpus.tokenized();
        DefaultServices {
            phonetics: tumbleweed_nlp::default_lexicon(),
            sentiment: tumbleweed_nlp::default_sentiment(),
            topics: ThemeTopics::fit(&docs),
            embedding: CooccurrenceEmbedding::fit(&docs, EMBEDDING_WINDOW, EMBEDDING_MIN_COUNT),
        }
    }

    /// Borrow the bindings as a `Services` bundle.
    pub fn services(&self) -> Services<'_> {
        Services {
            phonetics: &self.phonetics,
            sentiment: &self.sentiment,
            topics: &self.topics,
            embedding: &self.embedding,
        }
    }
}
