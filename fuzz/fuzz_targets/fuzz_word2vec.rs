//! Fuzz target for the word2vec text model reader.

#![no_main]

use cs_core::embed::{TextEmbedder, Word2VecEmbedder, WhitespaceTokenizer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(model) = Word2VecEmbedder::from_reader(data, 4, Box::new(WhitespaceTokenizer)) else {
        return;
    };
    let _ = model.embed(&["fuzz input text".to_string()]);
});
