//! Word2vec text-format lookup embedder.
//!
//! File format: a header `<vocab_size> <dim>`, then one `<token> v1 … v_dim`
//! line per word.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cs_common::{Error, Result};
use tracing::warn;

use super::model::{Embedding, ModelName};
use super::tokenizer::Tokenizer;
use super::TextEmbedder;
use crate::logging::event_names;

/// Widest vector the loader accepts.
const MAX_EMBED_DIM: usize = 10_000;

pub struct Word2VecEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    vocab_size: usize,
    embed_dim: usize,
    max_seq_len: usize,
    tokenizer: Box<dyn Tokenizer>,
}

impl std::fmt::Debug for Word2VecEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Word2VecEmbedder")
            .field("vocab_size", &self.vocab_size)
            .field("embed_dim", &self.embed_dim)
            .field("max_seq_len", &self.max_seq_len)
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

fn parse_error(line: usize, message: impl std::fmt::Display) -> Error {
    Error::Embed(format!("word2vec line {}: {}", line, message))
}

impl Word2VecEmbedder {
    /// Load a model file from disk.
    pub fn load(path: &Path, max_seq_len: usize, tokenizer: Box<dyn Tokenizer>) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::DatasetNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_reader(BufReader::new(file), max_seq_len, tokenizer)
    }

    /// Parse a model from any buffered reader.
    pub fn from_reader<R: BufRead>(
        reader: R,
        max_seq_len: usize,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Result<Self> {
        let mut lines = reader.lines();
        let header = lines
            .next()
            .transpose()?
            .ok_or_else(|| parse_error(1, "missing header"))?;
        let mut fields = header.split_whitespace();
        let (Some(vocab), Some(dim), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(parse_error(1, "header must be `<vocab_size> <dim>`"));
        };
        let vocab_size: usize = vocab.parse().map_err(|e| parse_error(1, e))?;
        let embed_dim: usize = dim.parse().map_err(|e| parse_error(1, e))?;
        if embed_dim == 0 || embed_dim > MAX_EMBED_DIM {
            return Err(parse_error(
                1,
                format!("dimension must be in 1..={}, got {}", MAX_EMBED_DIM, embed_dim),
            ));
        }

        // The header count is advisory; size the table from the rows read.
        let mut vectors = HashMap::new();
        for (index, line) in lines.enumerate() {
            let line = line?;
            let line_no = index + 2;
            let mut parts = line.split_whitespace();
            let Some(token) = parts.next() else {
                continue;
            };
            let values = parts
                .map(|v| v.parse::<f32>().map_err(|e| parse_error(line_no, e)))
                .collect::<Result<Vec<f32>>>()?;
            if values.len() != embed_dim {
                return Err(parse_error(
                    line_no,
                    format!("expected {} values, got {}", embed_dim, values.len()),
                ));
            }
            vectors.insert(token.to_string(), values);
        }

        if vectors.len() != vocab_size {
            warn!(
                target: event_names::EMBED_MODEL_LOADED,
                declared = vocab_size as u64,
                loaded = vectors.len() as u64,
                "word2vec vocabulary size differs from header"
            );
        }

        Ok(Self {
            vectors,
            vocab_size,
            embed_dim,
            max_seq_len,
            tokenizer,
        })
    }

    /// Vocabulary size declared in the header.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }

    fn truncated_tokens(&self, text: &str) -> Vec<String> {
        let mut tokens = self.tokenizer.tokenize(text);
        tokens.truncate(self.max_seq_len);
        tokens
    }
}

impl TextEmbedder for Word2VecEmbedder {
    fn model(&self) -> ModelName {
        ModelName::Word2Vec
    }

    fn embed_dim(&self) -> usize {
        self.embed_dim
    }

    fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    fn embed_with_tokens(&self, texts: &[String]) -> Result<(Embedding, Vec<Vec<String>>)> {
        let mut out = Embedding::zeros(texts.len(), self.max_seq_len, self.embed_dim);
        let mut all_tokens = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            let tokens = self.truncated_tokens(text);
            for (j, token) in tokens.iter().enumerate() {
                // Unknown tokens keep their zero row.
                if let Some(vector) = self.vectors.get(token) {
                    out.set_row(i, j, vector);
                }
            }
            all_tokens.push(tokens);
        }
        Ok((out, all_tokens))
    }
}
