//! Token-length statistics over a corpus, used to pick `max_seq_len`.

use cs_common::{Error, Result};
use cs_math::Summary;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tokenizer::Tokenizer;
use crate::logging::event_names;

/// Token count summary; `std` is the population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeqLenStats {
    pub mean: f64,
    pub std: f64,
    pub max: usize,
    pub min: usize,
}

/// Summarize token counts of `texts`, tokenized `batch_size` at a time.
pub fn compute_seq_len_statistics(
    texts: &[String],
    tokenizer: &dyn Tokenizer,
    batch_size: usize,
) -> Result<SeqLenStats> {
    if texts.is_empty() {
        return Err(Error::EmptyInput("no texts to measure".to_string()));
    }
    if batch_size == 0 {
        return Err(Error::InvalidConfig {
            field: "embed.batch_size".to_string(),
            message: "must be > 0".to_string(),
        });
    }

    let n_batches = texts.len().div_ceil(batch_size);
    let mut counts = Vec::with_capacity(texts.len());
    for (i, batch) in texts.chunks(batch_size).enumerate() {
        counts.extend(batch.iter().map(|t| tokenizer.tokenize(t).len()));
        debug!(target: event_names::EMBED_BATCH, batch = i as u64 + 1, of = n_batches as u64, "tokenized batch");
    }

    let summary = Summary::from_counts(&counts)
        .ok_or_else(|| Error::Analysis("token counts could not be summarized".to_string()))?;
    Ok(SeqLenStats {
        mean: summary.mean,
        std: summary.std,
        max: counts.iter().copied().max().unwrap_or(0),
        min: counts.iter().copied().min().unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::tokenizer::WhitespaceTokenizer;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn population_statistics() {
        // Lengths 1, 2, 3, 6.
        let t = texts(&["a", "a b", "a b c", "a b c d e f"]);
        let stats = compute_seq_len_statistics(&t, &WhitespaceTokenizer, 3).unwrap();
        assert_eq!(stats.max, 6);
        assert_eq!(stats.min, 1);
        assert!((stats.mean - 3.0).abs() < 1e-12);
        // Population variance: (4 + 1 + 0 + 9) / 4 = 3.5
        assert!((stats.std - 3.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn batch_size_does_not_change_result() {
        let t = texts(&["x y", "z", "p q r s", ""]);
        let one = compute_seq_len_statistics(&t, &WhitespaceTokenizer, 1).unwrap();
        let all = compute_seq_len_statistics(&t, &WhitespaceTokenizer, 100).unwrap();
        assert_eq!(one, all);
        assert_eq!(one.min, 0);
    }

    #[test]
    fn empty_input_is_error() {
        let err = compute_seq_len_statistics(&[], &WhitespaceTokenizer, 8).unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }

    #[test]
    fn serializes_like_tweet_stat() {
        let stats = SeqLenStats {
            mean: 2.0,
            std: 0.5,
            max: 3,
            min: 1,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["max"], 3);
        assert_eq!(json["std"], 0.5);
    }
}
