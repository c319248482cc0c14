//! Word-list flattening and per-word cleaning passes.
//!
//! Each raw word goes through, in order:
//! 1. lowercase
//! 2. stop-word check on the unstripped word
//! 3. trailing punctuation strip
//! 4. degenerate-length check
//! 5. stop-word check on the stripped word
//! 6. canonical substitution

use crate::vocabulary::Vocabulary;

/// Characters removed from the right end of every word, besides whitespace.
const TRAILING_PUNCTUATION: [char; 5] = [':', ',', '.', '-', '"'];

/// Flattens word lists into a cleaned token sequence.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    vocabulary: Vocabulary,
}

impl Tokenizer {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Clean every word of every list, preserving traversal order and
    /// duplicates.
    pub fn clean<L, W>(&self, word_lists: impl IntoIterator<Item = L>) -> Vec<String>
    where
        L: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        word_lists
            .into_iter()
            .flatten()
            .filter_map(|word| self.clean_word(word.as_ref()))
            .collect()
    }

    /// Clean and join with newlines, one token per line.
    pub fn clean_to_text<L, W>(&self, word_lists: impl IntoIterator<Item = L>) -> String
    where
        L: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        self.clean(word_lists).join("\n")
    }

    /// Clean a single raw word. `None` means the word is dropped.
    pub fn clean_word(&self, raw: &str) -> Option<String> {
        let lowered = raw.to_lowercase();
        if self.vocabulary.is_stop_word(&lowered) {
            return None;
        }

        let candidate = strip_trailing_punctuation(&lowered);
        if is_degenerate(candidate) || self.vocabulary.is_stop_word(candidate) {
            return None;
        }

        Some(self.vocabulary.canonical(candidate).to_string())
    }
}

/// Whether `c` is removed by [`strip_trailing_punctuation`].
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || TRAILING_PUNCTUATION.contains(&c)
}

/// Repeatedly drop trailing punctuation and whitespace.
pub(crate) fn strip_trailing_punctuation(word: &str) -> &str {
    word.trim_end_matches(is_strippable)
}

fn is_degenerate(candidate: &str) -> bool {
    candidate.chars().nth(1).is_none()
}
