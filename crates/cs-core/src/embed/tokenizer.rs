//! Tokenizers feeding the word2vec lookup and length statistics.

use cs_config::analysis::TokenizerKind;

/// Splits text into lookup tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;

    fn name(&self) -> &'static str;
}

/// Splits on Unicode whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

/// One token per non-whitespace character, for unsegmented scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(String::from)
            .collect()
    }

    fn name(&self) -> &'static str {
        "char"
    }
}

pub fn tokenizer_for(kind: TokenizerKind) -> Box<dyn Tokenizer> {
    match kind {
        TokenizerKind::Whitespace => Box::new(WhitespaceTokenizer),
        TokenizerKind::Char => Box::new(CharTokenizer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_splits_runs() {
        let toks = WhitespaceTokenizer.tokenize("  I hate\tBrad\n Pitt. ");
        assert_eq!(toks, vec!["I", "hate", "Brad", "Pitt."]);
    }

    #[test]
    fn char_tokenizer_handles_cjk() {
        let toks = CharTokenizer.tokenize("转发 微博。");
        assert_eq!(toks, vec!["转", "发", "微", "博", "。"]);
    }

    #[test]
    fn factory_picks_kind() {
        assert_eq!(tokenizer_for(TokenizerKind::Char).name(), "char");
        assert_eq!(tokenizer_for(TokenizerKind::Whitespace).name(), "whitespace");
    }
}
