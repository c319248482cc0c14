//! Token cleaning for extracted bibliography and document text.
//!
//! A [`Tokenizer`] takes the word lists produced by the extractors and turns
//! them into a cleaned token sequence: lowercased, stripped of trailing
//! punctuation, with stop words and one-character tokens removed and
//! near-synonyms merged through the [`Vocabulary`] mapping table.

mod tokenizer;
mod vocabulary;

pub use tokenizer::Tokenizer;
pub use vocabulary::{DEFAULT_MAPPINGS, DEFAULT_STOP_WORDS, Vocabulary};
