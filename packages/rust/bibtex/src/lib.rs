//! Field extraction from `.bib` bibliography sources.
//!
//! Splits a loosely formatted bibliography into per-entry blocks, pulls the
//! `title`, `booktitle`, `abstract` and `keywords` fields out of each one, and
//! flattens them into word lists for the tokenizer. Partial extraction is the
//! normal failure mode: fields that do not match are simply absent.

mod parser;

use bibcloud_shared::{Field, Record};
use tracing::{debug, instrument};

/// Parse bibliography source text into records, in source order.
///
/// Preamble before the first `@` entry is ignored. Blocks that match no
/// pattern are kept as empty records.
pub fn parse_records(source: &str) -> Vec<Record> {
    let records = parser::parse_records(source);
    let empty = records.iter().filter(|r| r.is_empty()).count();
    debug!(records = records.len(), empty, "parsed bibliography");
    records
}

/// Flatten records into whitespace-split word lists, one per present field.
///
/// Traversal is field-major: every record's title, then every record's
/// booktitle, then abstracts, then keywords.
pub fn harvest_word_lists(records: &[Record]) -> Vec<Vec<String>> {
    Field::HARVEST_ORDER
        .iter()
        .flat_map(move |&field| {
            records
                .iter()
                .filter_map(move |record| record.get(field))
                .map(|value| value.split_whitespace().map(String::from).collect::<Vec<_>>())
        })
        .collect()
}

/// Decode raw `.bib` bytes and return their word lists.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
#[instrument(skip_all, fields(bytes = bytes.len()))]
pub fn word_lists_from_bytes(bytes: &[u8]) -> Vec<Vec<String>> {
    let source = String::from_utf8_lossy(bytes);

    let records = parse_records(&source);
    let word_lists = harvest_word_lists(&records);

    debug!(
        records = records.len(),
        word_lists = word_lists.len(),
        "extracted bibliography fields"
    );

    word_lists
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harvest_is_field_major() {
        let records = vec![
            Record::new(Some("article".into()), Some("a".into()))
                .with_field(Field::Title, "First Title")
                .with_field(Field::Keywords, "alpha"),
            Record::new(Some("article".into()), Some("b".into()))
                .with_field(Field::Abstract, "Second abstract")
                .with_field(Field::Title, "Second"),
        ];

        let lists = harvest_word_lists(&records);
        assert_eq!(
            lists,
            vec![
                vec!["First", "Title"],
                vec!["Second"],
                vec!["Second", "abstract"],
                vec!["alpha"],
            ]
        );
    }

    #[test]
    fn absent_fields_contribute_nothing() {
        let records = vec![Record::default(), Record::new(Some("misc".into()), None)];
        assert!(harvest_word_lists(&records).is_empty());
    }

    #[test]
    fn word_lists_from_source_bytes() {
        let bytes = b"@article{x1,\n\ttitle = {Music Cognition and the Brain},\n}\n";
        let lists = word_lists_from_bytes(bytes);
        assert_eq!(lists, vec![vec!["Music", "Cognition", "and", "the", "Brain"]]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut bytes = b"@article{l1, title = {Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b" Music},}");

        let lists = word_lists_from_bytes(&bytes);
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0][0], "Caf\u{FFFD}");
        assert_eq!(lists[0][1], "Music");
    }
}
