// Engine error type.
//
// Only parameter validation and corpus I/O surface as errors. Missing
// NLP-service data (unknown words, absent pronunciations) never errors —
// every dependent computation degrades to a neutral default so the engine
// always produces output.

use thiserror::Error;

/// Errors surfaced by the song engine.
#[derive(Debug, Error)]
pub enum SongError {
    /// `force_seed` was requested without supplying a seed word.
    #[error("force_seed requires a seed word")]
    SeedRequired,

    /// The corpus file could not be read.
    #[error("failed to read corpus file '{path}': {source}")]
    CorpusRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The corpus file was not valid JSON of the expected shape.
    #[error("failed to parse corpus JSON: {0}")]
    CorpusParse(#[from] serde_json::Error),
}
