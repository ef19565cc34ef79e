//! Text embedding behind a capability trait.
//!
//! Only the word2vec lookup runs in-process. Transformer models are known by
//! name so configs validate, but loading one reports
//! [`Error::BackendUnavailable`]; an external service implementing
//! [`TextEmbedder`] can stand in for them.

pub mod model;
pub mod stats;
pub mod tokenizer;
pub mod word2vec;

pub use model::{Embedding, ModelName};
pub use stats::{compute_seq_len_statistics, SeqLenStats};
pub use tokenizer::{tokenizer_for, CharTokenizer, Tokenizer, WhitespaceTokenizer};
pub use word2vec::Word2VecEmbedder;

use cs_common::{Error, Result};
use cs_config::analysis::EmbedConfig;

use crate::logging::event_names;

/// Maps texts to a `(texts, max_seq_len, embed_dim)` tensor.
pub trait TextEmbedder: Send + Sync {
    fn model(&self) -> ModelName;

    fn embed_dim(&self) -> usize;

    fn max_seq_len(&self) -> usize;

    /// Embeddings plus the (truncated) tokens each row was built from.
    fn embed_with_tokens(&self, texts: &[String]) -> Result<(Embedding, Vec<Vec<String>>)>;

    fn embed(&self, texts: &[String]) -> Result<Embedding> {
        self.embed_with_tokens(texts).map(|(embedding, _)| embedding)
    }
}

/// Build the embedder named by `config`.
pub fn load_embedder(config: &EmbedConfig) -> Result<Box<dyn TextEmbedder>> {
    let model: ModelName = config.model_name.parse()?;
    if config.max_seq_len == 0 {
        return Err(Error::InvalidConfig {
            field: "embed.max_seq_len".to_string(),
            message: "must be > 0".to_string(),
        });
    }
    match model {
        ModelName::Word2Vec => {
            let path = config.resolved_model_path();
            let embedder = Word2VecEmbedder::load(
                &path,
                config.max_seq_len,
                tokenizer_for(config.tokenizer),
            )?;
            tracing::info!(
                target: event_names::EMBED_MODEL_LOADED,
                model = %model,
                path = %path.display(),
                dim = embedder.embed_dim() as u64,
                "embedding model loaded"
            );
            Ok(Box::new(embedder))
        }
        other => Err(Error::BackendUnavailable {
            model: other.to_string(),
        }),
    }
}
