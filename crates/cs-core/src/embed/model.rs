//! Model names and the dense embedding tensor.

use std::fmt;
use std::str::FromStr;

use cs_common::Error;
use serde::{Deserialize, Serialize};

/// Text models the embedding layer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelName {
    #[serde(rename = "word2vec")]
    Word2Vec,
    #[serde(rename = "xlm-roberta-base")]
    XlmRobertaBase,
    #[serde(rename = "xlm-roberta-large")]
    XlmRobertaLarge,
    #[serde(rename = "bertweet-base")]
    BertweetBase,
    #[serde(rename = "t5-base-finetuned-summarize-news")]
    T5SummarizeNews,
    #[serde(rename = "buzz-article-gpt-2")]
    BuzzArticleGpt2,
}

impl ModelName {
    pub const ALL: &'static [ModelName] = &[
        ModelName::Word2Vec,
        ModelName::XlmRobertaBase,
        ModelName::XlmRobertaLarge,
        ModelName::BertweetBase,
        ModelName::T5SummarizeNews,
        ModelName::BuzzArticleGpt2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::Word2Vec => "word2vec",
            ModelName::XlmRobertaBase => "xlm-roberta-base",
            ModelName::XlmRobertaLarge => "xlm-roberta-large",
            ModelName::BertweetBase => "bertweet-base",
            ModelName::T5SummarizeNews => "t5-base-finetuned-summarize-news",
            ModelName::BuzzArticleGpt2 => "buzz-article-gpt-2",
        }
    }

    /// Whether the model needs a transformer runtime.
    pub fn is_transformer(&self) -> bool {
        !matches!(self, ModelName::Word2Vec)
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelName::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnknownModel(s.to_string()))
    }
}

/// Row-major `(texts, max_seq_len, embed_dim)` tensor, zero-padded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    shape: [usize; 3],
    data: Vec<f32>,
}

impl Embedding {
    pub fn zeros(texts: usize, seq_len: usize, dim: usize) -> Self {
        Self {
            shape: [texts, seq_len, dim],
            data: vec![0.0; texts * seq_len * dim],
        }
    }

    /// `[texts, max_seq_len, embed_dim]`
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    fn offset(&self, text: usize, position: usize) -> Option<usize> {
        let [n, seq, dim] = self.shape;
        (text < n && position < seq).then(|| (text * seq + position) * dim)
    }

    /// Vector at `(text, position)`.
    pub fn row(&self, text: usize, position: usize) -> Option<&[f32]> {
        let start = self.offset(text, position)?;
        Some(&self.data[start..start + self.shape[2]])
    }

    /// Overwrite the vector at `(text, position)`; `values` longer than the
    /// embedding dimension are truncated.
    pub fn set_row(&mut self, text: usize, position: usize, values: &[f32]) -> bool {
        let Some(start) = self.offset(text, position) else {
            return false;
        };
        let dim = self.shape[2];
        let n = values.len().min(dim);
        self.data[start..start + n].copy_from_slice(&values[..n]);
        true
    }

    /// All positions of one text, `max_seq_len × embed_dim` values.
    pub fn text(&self, text: usize) -> Option<&[f32]> {
        let start = self.offset(text, 0)?;
        let len = self.shape[1] * self.shape[2];
        Some(&self.data[start..start + len])
    }
}
