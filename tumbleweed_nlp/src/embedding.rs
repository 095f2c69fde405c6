// Word similarity via co-occurrence vectors.
//
// `EmbeddingModel` answers one question: which words are most similar to a
// given word? The default binding builds sparse windowed co-occurrence
// vectors from the corpus and ranks neighbors by cosine similarity. Unknown
// words return an empty list.

use std::collections::BTreeMap;

/// Word-similarity interface.
pub trait EmbeddingModel {
    /// Up to `top_n` most similar words, `(word, similarity)` with
    /// similarity in [-1, 1], most similar first. Empty for unknown words.
    fn neighbors(&self, word: &str, top_n: usize) -> Vec<(String, f64)>;
}

/// Sparse co-occurrence vectors with cosine-similarity lookup.
#[derive(Debug, Clone)]
pub struct CooccurrenceEmbedding {
    /// Word -> (context word -> co-occurrence count).
    vectors: BTreeMap<String, BTreeMap<String, f64>>,
    /// Precomputed vector norms.
    norms: BTreeMap<String, f64>,
}

impl CooccurrenceEmbedding {
    /// Fit from tokenized documents.
    ///
    /// Words seen fewer than `min_count` times are dropped from the
    /// vocabulary. Co-occurrence is counted symmetrically within `window`
    /// tokens.
    pub fn fit(docs: &[Vec<String>], window: usize, min_count: usize) -> Self {
        let mut freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in docs {
            for token in doc {
                *freq.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let mut vectors: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for doc in docs {
            for i in 0..doc.len() {
                if freq[doc[i].as_str()] < min_count {
                    continue;
                }
                let hi = (i + window + 1).min(doc.len());
                for j in (i + 1)..hi {
                    if doc[i] == doc[j] || freq[doc[j].as_str()] < min_count {
                        continue;
                    }
                    *vectors
                        .entry(doc[i].clone())
                        .or_default()
                        .entry(doc[j].clone())
                        .or_insert(0.0) += 1.0;
                    *vectors
                        .entry(doc[j].clone())
                        .or_default()
                        .entry(doc[i].clone())
                        .or_insert(0.0) += 1.0;
                }
            }
        }

        let norms = vectors
            .iter()
            .map(|(word, v)| {
                let norm = v.values().map(|c| c * c).sum::<f64>().sqrt();
                (word.clone(), norm)
            })
            .collect();

        CooccurrenceEmbedding { vectors, norms }
    }

    /// Vocabulary size after the `min_count` filter.
    pub fn vocab_len(&self) -> usize {
        self.vectors.len()
    }

    fn cosine(&self, a: &BTreeMap<String, f64>, norm_a: f64, word_b: &str) -> f64 {
        let Some(b) = self.vectors.get(word_b) else {
            return 0.0;
        };
        let norm_b = self.norms[word_b];
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        let dot: f64 = a
            .iter()
            .filter_map(|(ctx, &ca)| b.get(ctx).map(|&cb| ca * cb))
            .sum();
        dot / (norm_a * norm_b)
    }
}

impl EmbeddingModel for CooccurrenceEmbedding {
    fn neighbors(&self, word: &str, top_n: usize) -> Vec<(String, f64)> {
        let word = word.to_lowercase();
        let Some(vector) = self.vectors.get(&word) else {
            return Vec::new();
        };
        let norm = self.norms[&word];

        let mut sims: Vec<(String, f64)> = self
            .vectors
            .keys()
            .filter(|&other| other != &word)
            .map(|other| (other.clone(), self.cosine(vector, norm, other)))
            .filter(|(_, sim)| *sim > 0.0)
            .collect();
        sims.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sims.truncate(top_n);
        sims
    }
}
