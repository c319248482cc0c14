//! Token occurrence counts over a cleaned text blob.

use std::collections::HashMap;

use serde::Serialize;

/// One row of the frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Occurrence counts, most frequent first; ties are ordered by token.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    rows: Vec<TokenCount>,
    total: usize,
}

impl FrequencyTable {
    /// Count one token per line. Empty lines are ignored.
    pub fn from_text(text: &str) -> Self {
        Self::from_tokens(text.lines())
    }

    pub fn from_tokens<S: AsRef<str>>(tokens: impl IntoIterator<Item = S>) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total = 0;

        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }
            *counts.entry(token.to_string()).or_default() += 1;
            total += 1;
        }

        let mut rows: Vec<TokenCount> = counts
            .into_iter()
            .map(|(token, count)| TokenCount { token, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));

        Self { rows, total }
    }

    /// All rows in rank order.
    pub fn rows(&self) -> &[TokenCount] {
        &self.rows
    }

    /// The `n` most frequent rows (fewer if the table is smaller).
    pub fn top(&self, n: usize) -> &[TokenCount] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Occurrences of `token`, zero if absent.
    pub fn count(&self, token: &str) -> usize {
        self.rows
            .iter()
            .find(|r| r.token == token)
            .map_or(0, |r| r.count)
    }

    /// Total number of counted occurrences.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct tokens.
    pub fn distinct(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
