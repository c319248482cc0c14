//! Core domain types for bibcloud extraction.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// A content field harvested from a bibliographic record.
///
/// Variant order is the harvest order: all titles come before all
/// booktitles, then abstracts, then keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Booktitle,
    Abstract,
    Keywords,
}

impl Field {
    /// Fixed traversal order used when flattening records into word lists.
    pub const HARVEST_ORDER: [Field; 4] = [
        Field::Title,
        Field::Booktitle,
        Field::Abstract,
        Field::Keywords,
    ];

    /// The field name as it appears in a bibliography source.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Booktitle => "booktitle",
            Field::Abstract => "abstract",
            Field::Keywords => "keywords",
        }
    }

    /// Whether the value is closed by its matching brace rather than by the
    /// next top-level comma.
    pub fn closes_on_brace(self) -> bool {
        matches!(self, Field::Abstract | Field::Keywords)
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One parsed bibliographic entry with optional named fields.
///
/// A record that matched nothing is still a valid (empty) record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Entry category, e.g. `article` or `inproceedings`.
    pub entry_type: Option<String>,
    /// Citation key.
    pub id: Option<String>,
    fields: BTreeMap<Field, String>,
}

impl Record {
    /// Create a record with an optional header and no content fields.
    pub fn new(entry_type: Option<String>, id: Option<String>) -> Self {
        Self {
            entry_type,
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Return the record with `field` set to `value`.
    pub fn with_field(mut self, field: Field, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Value of a content field, if the source had one.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// True when neither the header nor any content field matched.
    pub fn is_empty(&self) -> bool {
        self.entry_type.is_none() && self.id.is_none() && self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SourceFormat
// ---------------------------------------------------------------------------

/// Input format, selected once per file from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// `.bib` bibliography source, read as UTF-8 text.
    Bibliography,
    /// `.pdf` paginated document, read as binary.
    Document,
}

impl SourceFormat {
    /// Pick the format for a path. Returns `None` for unsupported extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "bib" => Some(Self::Bibliography),
            "pdf" => Some(Self::Document),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bibliography => f.write_str("bibliography"),
            Self::Document => f.write_str("document"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harvest_order_matches_ord() {
        let mut sorted = Field::HARVEST_ORDER;
        sorted.sort();
        assert_eq!(sorted, Field::HARVEST_ORDER);
    }

    #[test]
    fn record_builder_and_lookup() {
        let record = Record::new(Some("article".into()), Some("x1".into()))
            .with_field(Field::Keywords, "music, theory")
            .with_field(Field::Title, "Music Cognition");

        assert_eq!(record.get(Field::Title), Some("Music Cognition"));
        assert_eq!(record.get(Field::Abstract), None);
        assert_eq!(record.get(Field::Keywords), Some("music, theory"));
    }

    #[test]
    fn empty_record() {
        assert!(Record::default().is_empty());
        assert!(!Record::new(Some("misc".into()), None).is_empty());
    }

    #[test]
    fn source_format_serializes_lowercase() {
        let json = serde_json::to_value(SourceFormat::Bibliography).expect("serialize");
        assert_eq!(json, "bibliography");
        let json = serde_json::to_value(SourceFormat::Document).expect("serialize");
        assert_eq!(json, "document");
    }

    #[test]
    fn source_format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("refs/library.bib")),
            Some(SourceFormat::Bibliography)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("Paper.PDF")),
            Some(SourceFormat::Document)
        );
        assert_eq!(SourceFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(SourceFormat::from_path(Path::new("Makefile")), None);
    }
}
