// Word transition model.
//
// Three Markov tables, orders 1 through 3, built from the tokenized corpus.
// Context keys are space-joined lowercase words; each context maps to a
// probability distribution over the next word, normalized at build time.
// The line generator blends all three orders (see line.rs), so higher-order
// tables sharpen the chain without starving it when a long context is
// unseen.
//
// BTreeMap throughout so iteration order, and therefore sampling under a
// fixed RNG seed, is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Next-word probability distribution for one context.
pub type Distribution = BTreeMap<String, f64>;

/// The maximum chain order the model tracks.
pub const MAX_ORDER: usize = 3;

/// Multi-order word transition tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionModel {
    order1: BTreeMap<String, Distribution>,
    order2: BTreeMap<String, Distribution>,
    order3: BTreeMap<String, Distribution>,
}

/// Space-joined context key for a window of words.
fn context_key(words: &[String]) -> String {
    words.join(" ")
}

impl TransitionModel {
    /// Build all three tables from tokenized documents and normalize each
    /// context's counts into probabilities.
    pub fn build(docs: &[Vec<String>]) -> Self {
        let mut model = TransitionModel::default();
        for doc in docs {
            for order in 1..=MAX_ORDER {
                if doc.len() <= order {
                    continue;
                }
                let table = model.table_mut(order);
                for i in 0..doc.len() - order {
                    let ctx = context_key(&doc[i..i + order]);
                    let next = doc[i + order].clone();
                    *table.entry(ctx).or_default().entry(next).or_insert(0.0) += 1.0;
                }
            }
        }
        for order in 1..=MAX_ORDER {
            for dist in model.table_mut(order).values_mut() {
                let total: f64 = dist.values().sum();
                if total > 0.0 {
                    for p in dist.values_mut() {
                        *p /= total;
                    }
                }
            }
        }
        model
    }

    fn table_mut(&mut self, order: usize) -> &mut BTreeMap<String, Distribution> {
        match order {
            1 => &mut self.order1,
            2 => &mut self.order2,
            _ => &mut self.order3,
        }
    }

    fn table(&self, order: usize) -> Option<&BTreeMap<String, Distribution>> {
        match order {
            1 => Some(&self.order1),
            2 => Some(&self.order2),
            3 => Some(&self.order3),
            _ => None,
        }
    }

    /// The next-word distribution for an exact context window, chosen by the
    /// window's length. None when the context was never observed.
    pub fn next_words(&self, context: &[String]) -> Option<&Distribution> {
        let table = self.table(context.len())?;
        table.get(&context_key(context))
    }

    /// Observed order-1 probability of `next` following `prev`, 0.0 when the
    /// transition was never seen.
    pub fn order1_prob(&self, prev: &str, next: &str) -> f64 {
        self.order1
            .get(prev)
            .and_then(|dist| dist.get(next))
            .copied()
            .unwrap_or(0.0)
    }

    /// All words usable as a line start (order-1 contexts).
    pub fn start_words(&self) -> impl Iterator<Item = &str> {
        self.order1.keys().map(String::as_str)
    }

    /// Number of distinct contexts at a given order.
    pub fn context_count(&self, order: usize) -> usize {
        self.table(order).map_or(0, BTreeMap::len)
    }

    /// True when the model has no transitions at all.
    pub fn is_empty(&self) -> bool {
        self.order1.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|t| t.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_distributions_sum_to_one() {
        let model = TransitionModel::build(&docs(&[
            "down the road down the river down the line",
            "take me home tonight take me back",
        ]));
        for order in 1..=MAX_ORDER {
            let table = match order {
                1 => &model.order1,
                2 => &model.order2,
                _ => &model.order3,
            };
            for (ctx, dist) in table {
                let total: f64 = dist.values().sum();
                assert!(
                    (total - 1.0).abs() < 1e-9,
                    "order-{} context '{}' sums to {}",
                    order,
                    ctx,
                    total
                );
            }
        }
    }

    #[test]
    fn test_context_window_selects_order() {
        let model = TransitionModel::build(&docs(&["one two three four"]));
        let w = |s: &str| s.split(' ').map(str::to_string).collect::<Vec<_>>();
        assert!(model.next_words(&w("one")).is_some());
        assert!(model.next_words(&w("one two")).is_some());
        assert!(model.next_words(&w("one two three")).is_some());
        assert!(model.next_words(&w("never seen")).is_none());
    }

    #[test]
    fn test_order1_prob_reflects_counts() {
        let model = TransitionModel::build(&docs(&["a b a b a c"]));
        // "a" is followed by "b" twice and "c" once
        assert!((model.order1_prob("a", "b") - 2.0 / 3.0).abs() < 1e-9);
        assert!((model.order1_prob("a", "c") - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(model.order1_prob("a", "z"), 0.0);
        assert_eq!(model.order1_prob("z", "a"), 0.0);
    }

    #[test]
    fn test_empty_model() {
        let model = TransitionModel::default();
        assert!(model.is_empty());
        assert_eq!(model.context_count(1), 0);
        let built = TransitionModel::build(&docs(&["lone"]));
        // a single-word document yields no transitions
        assert!(built.is_empty());
    }

    #[test]
    fn test_short_document_skips_high_orders() {
        let model = TransitionModel::build(&docs(&["two words"]));
        assert_eq!(model.context_count(1), 1);
        assert_eq!(model.context_count(2), 0);
        assert_eq!(model.context_count(3), 0);
    }
}
