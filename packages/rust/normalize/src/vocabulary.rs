//! Stop-word set and canonical-mapping table.
//!
//! Both tables are immutable once built. Construction lowercases every entry,
//! resolves chained mappings to their final target, and rejects tables that
//! would let a second cleaning pass change its own output.

use std::collections::{HashMap, HashSet};

use bibcloud_shared::{BibcloudError, Result, VocabularyConfig};
use tracing::debug;

use crate::tokenizer::strip_trailing_punctuation;

/// Terms dropped from every token stream.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "of", "the", "and", "a", "an", "in", "for", "to", "is", "by", "this", "as", "are", "with",
    "that", "from", "on", "oxford", "handbook", "we", "between", "how", "using", "", "can", "it",
    "new", "-", "international", "conference", "be", "role", "has", "two", "through", "der",
    "which", "some", "its", "not", "towards", "introduction", "paper", "proceedings", "their",
    "und", "or", "more", "about", "one", "these", "have", "beyond", "use", "used", "different",
    "other", "most", "within", "across", "2021", "than", "cambridge", "into", "first", "at",
    "our", "https", "http", "doi", "pp", "et", "e. g.", "e.g.", "io", "pp.", "th", "mj", "css",
    "no.", "al.", "such", "also", "but", "they", "vol", "(pp", "all", "was", "r2", "ch", "pdf",
    "much",
];

/// `raw term -> canonical term` substitutions merging near-synonyms.
pub const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("studies", "study"),
    ("\"music,music\"", "music"),
    ("musical", "music"),
    ("harmonic", "harmony"),
    ("music psychology", "psychology"),
    ("music theory", "theory"),
    ("music perception", "perception"),
    ("music cognition", "cognition"),
    ("cognitive", "cognition"),
    ("modelling", "modeling"),
    ("syntactic", "syntax"),
    ("theory,music", "music theory"),
    ("theories", "theory"),
    ("sciences", "science"),
    ("melodies", "melody"),
    ("concepts", "concept"),
    ("nir", "mir"),
];

/// Immutable lookup tables injected into the tokenizer.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    stop_words: HashSet<String>,
    mappings: HashMap<String, String>,
}

impl Vocabulary {
    /// Build and validate a vocabulary from arbitrary tables.
    ///
    /// Keys that collide after lowercasing must agree on their target.
    pub fn new<S, K, V>(
        stop_words: impl IntoIterator<Item = S>,
        mappings: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let stop_words: HashSet<String> = stop_words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();

        let mut raw: HashMap<String, String> = HashMap::new();
        for (key, value) in mappings {
            insert_mapping(&mut raw, key.as_ref(), value.as_ref())?;
        }

        let mappings = resolve_chains(&raw)?;
        validate_targets(&mappings, &stop_words)?;

        for key in mappings.keys() {
            if key.chars().any(char::is_whitespace) {
                debug!(key = %key, "phrase mapping key only acts as a chaining target");
            } else if stop_words.contains(key.as_str()) {
                debug!(key = %key, "mapping key is also a stop word and never applies");
            }
        }

        Ok(Self {
            stop_words,
            mappings,
        })
    }

    /// The built-in tables.
    pub fn builtin() -> Result<Self> {
        Self::new(DEFAULT_STOP_WORDS.iter().copied(), DEFAULT_MAPPINGS.iter().copied())
    }

    /// Built-in tables merged with, or replaced by, the `[vocabulary]` config.
    ///
    /// A config mapping replaces the built-in mapping for the same lowercased
    /// key.
    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        let mut stop_words: Vec<&str> = Vec::new();
        let mut mappings: HashMap<String, String> = HashMap::new();

        if config.extend_defaults {
            stop_words.extend(DEFAULT_STOP_WORDS.iter().copied());
            for (key, value) in DEFAULT_MAPPINGS {
                insert_mapping(&mut mappings, key, value)?;
            }
        }
        stop_words.extend(config.stop_words.iter().map(String::as_str));

        let mut overrides: HashMap<String, String> = HashMap::new();
        for (key, value) in &config.mappings {
            insert_mapping(&mut overrides, key, value)?;
        }
        mappings.extend(overrides);

        Self::new(stop_words, mappings)
    }

    /// Whether `term` (already lowercased) is a stop word.
    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }

    /// Canonical form of `term`, or `term` itself when unmapped.
    pub fn canonical<'a>(&'a self, term: &'a str) -> &'a str {
        self.mappings.get(term).map_or(term, String::as_str)
    }

    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }
}

/// Add a lowercased `key -> value` pair, rejecting a key already mapped
/// elsewhere.
fn insert_mapping(table: &mut HashMap<String, String>, key: &str, value: &str) -> Result<()> {
    let key = key.to_lowercase();
    let value = value.to_lowercase();

    if let Some(existing) = table.get(&key) {
        if *existing != value {
            return Err(BibcloudError::validation(format!(
                "mapping {key:?} has conflicting targets {existing:?} and {value:?}"
            )));
        }
        return Ok(());
    }

    table.insert(key, value);
    Ok(())
}

/// Point every key at the end of its mapping chain.
fn resolve_chains(raw: &HashMap<String, String>) -> Result<HashMap<String, String>> {
    let mut resolved = HashMap::with_capacity(raw.len());

    for (key, value) in raw {
        let mut chain = vec![key.as_str()];
        let mut target = value.as_str();

        while let Some(next) = raw.get(target) {
            if next == target {
                break;
            }
            if chain.contains(&target) {
                chain.push(target);
                return Err(BibcloudError::validation(format!(
                    "mapping cycle: {}",
                    chain.join(" -> ")
                )));
            }
            chain.push(target);
            target = next.as_str();
        }

        resolved.insert(key.clone(), target.to_string());
    }

    Ok(resolved)
}

/// A canonical term must survive another cleaning pass unchanged.
fn validate_targets(mappings: &HashMap<String, String>, stop_words: &HashSet<String>) -> Result<()> {
    for (key, target) in mappings {
        if stop_words.contains(target) {
            return Err(BibcloudError::validation(format!(
                "mapping {key:?} -> {target:?} targets a stop word"
            )));
        }
        if target.chars().count() <= 1 {
            return Err(BibcloudError::validation(format!(
                "mapping {key:?} -> {target:?} targets a term shorter than two characters"
            )));
        }
        if strip_trailing_punctuation(target) != target {
            return Err(BibcloudError::validation(format!(
                "mapping {key:?} -> {target:?} targets a term ending in punctuation"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn builtin_tables_are_valid() {
        let vocab = Vocabulary::builtin().expect("builtin vocabulary");
        assert!(vocab.is_stop_word("the"));
        assert!(vocab.is_stop_word("e.g."));
        assert!(!vocab.is_stop_word("music"));
        assert_eq!(vocab.canonical("modelling"), "modeling");
        assert_eq!(vocab.canonical("rhythm"), "rhythm");
        assert_eq!(vocab.mapping_count(), DEFAULT_MAPPINGS.len());
    }

    #[test]
    fn chains_resolve_to_final_target() {
        let vocab = Vocabulary::builtin().expect("builtin vocabulary");
        // theory,music -> music theory -> theory
        assert_eq!(vocab.canonical("theory,music"), "theory");
        assert_eq!(vocab.canonical("music theory"), "theory");
    }

    #[test]
    fn entries_are_lowercased() {
        let vocab = Vocabulary::new(["The"], [("Harmonies", "Harmony")]).expect("vocab");
        assert!(vocab.is_stop_word("the"));
        assert_eq!(vocab.canonical("harmonies"), "harmony");
    }

    #[test]
    fn cycle_is_rejected() {
        let err = Vocabulary::new(Vec::<&str>::new(), [("tone", "pitch"), ("pitch", "tone")])
            .unwrap_err();
        assert!(err.to_string().contains("mapping cycle"));
    }

    #[test]
    fn self_mapping_is_allowed() {
        let vocab = Vocabulary::new(Vec::<&str>::new(), [("tone", "tone")]).expect("vocab");
        assert_eq!(vocab.canonical("tone"), "tone");
    }

    #[test]
    fn stop_word_target_is_rejected() {
        let err = Vocabulary::new(["the"], [("thee", "the")]).unwrap_err();
        assert!(err.to_string().contains("stop word"));
    }

    #[test]
    fn short_target_is_rejected() {
        let err = Vocabulary::new(Vec::<&str>::new(), [("ab", "a")]).unwrap_err();
        assert!(err.to_string().contains("shorter than two"));
    }

    #[test]
    fn punctuated_target_is_rejected() {
        let err = Vocabulary::new(Vec::<&str>::new(), [("etc", "etc.")]).unwrap_err();
        assert!(err.to_string().contains("punctuation"));
    }

    #[test]
    fn config_extends_defaults() {
        let config = VocabularyConfig {
            extend_defaults: true,
            stop_words: vec!["Review".into()],
            mappings: BTreeMap::from([("rhythms".to_string(), "rhythm".to_string())]),
        };
        let vocab = Vocabulary::from_config(&config).expect("vocab");
        assert!(vocab.is_stop_word("review"));
        assert!(vocab.is_stop_word("the"));
        assert_eq!(vocab.canonical("rhythms"), "rhythm");
        assert_eq!(vocab.canonical("studies"), "study");
    }

    #[test]
    fn case_variants_with_different_targets_are_rejected() {
        let err = Vocabulary::new(Vec::<&str>::new(), [("Tones", "tone"), ("tones", "pitch")])
            .unwrap_err();
        assert!(matches!(err, BibcloudError::Validation { .. }));
        assert!(err.to_string().contains("conflicting targets"));
    }

    #[test]
    fn case_variants_with_same_target_are_merged() {
        let vocab = Vocabulary::new(Vec::<&str>::new(), [("Tones", "Tone"), ("tones", "tone")])
            .expect("vocab");
        assert_eq!(vocab.mapping_count(), 1);
        assert_eq!(vocab.canonical("tones"), "tone");
    }

    #[test]
    fn config_stop_word_conflicting_with_default_target_is_rejected() {
        let config = VocabularyConfig {
            extend_defaults: true,
            stop_words: vec!["music".into()],
            mappings: BTreeMap::new(),
        };
        let err = Vocabulary::from_config(&config).unwrap_err();
        assert!(matches!(err, BibcloudError::Validation { .. }));
    }

    #[test]
    fn config_replaces_defaults() {
        let config = VocabularyConfig {
            extend_defaults: false,
            stop_words: vec!["tonal".into()],
            mappings: BTreeMap::new(),
        };
        let vocab = Vocabulary::from_config(&config).expect("vocab");
        assert!(vocab.is_stop_word("tonal"));
        assert!(!vocab.is_stop_word("the"));
        assert_eq!(vocab.mapping_count(), 0);
    }

    #[test]
    fn config_overrides_default_mapping() {
        let config = VocabularyConfig {
            extend_defaults: true,
            stop_words: Vec::new(),
            mappings: BTreeMap::from([("musical".to_string(), "musicality".to_string())]),
        };
        let vocab = Vocabulary::from_config(&config).expect("vocab");
        assert_eq!(vocab.canonical("musical"), "musicality");
    }

    #[test]
    fn mixed_case_config_key_overrides_default_mapping() {
        let config = VocabularyConfig {
            extend_defaults: true,
            stop_words: Vec::new(),
            mappings: BTreeMap::from([("Musical".to_string(), "Musicality".to_string())]),
        };

        // Each build hashes differently; the override must win every time.
        for _ in 0..64 {
            let vocab = Vocabulary::from_config(&config).expect("vocab");
            assert_eq!(vocab.canonical("musical"), "musicality");
            assert_eq!(vocab.mapping_count(), DEFAULT_MAPPINGS.len());
        }
    }

    #[test]
    fn conflicting_case_variants_in_config_are_rejected() {
        let config = VocabularyConfig {
            extend_defaults: false,
            stop_words: Vec::new(),
            mappings: BTreeMap::from([
                ("Rhythms".to_string(), "rhythm".to_string()),
                ("rhythms".to_string(), "meter".to_string()),
            ]),
        };
        let err = Vocabulary::from_config(&config).unwrap_err();
        assert!(matches!(err, BibcloudError::Validation { .. }));
    }
}
