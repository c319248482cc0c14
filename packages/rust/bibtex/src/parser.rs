//! Record splitting and per-field matching for `.bib` sources.
//!
//! The grammar is deliberately small:
//! - Records: each `@` at the start of a line opens a new block; text before
//!   the first one is preamble.
//! - Header: `type{id,` at the start of a block.
//! - Fields: `name = {value}` anywhere in the block, each matched on its own.
//!   `abstract` and `keywords` close on their matching brace, `title` and
//!   `booktitle` run to the next comma outside braces.
//!
//! A block that matches nothing becomes an empty [`Record`]. Nothing here
//! returns an error.

use std::sync::LazyLock;

use bibcloud_shared::{Field, Record};
use regex::Regex;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches the `@` that opens a record at the start of a line.
static RECORD_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^@").expect("record start regex"));

/// Matches a line break plus the indentation around it.
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\r?\n[ \t]*").expect("line break regex"));

/// Matches `type{id,` at the start of a block.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<type>\w*)\s*\{\s*(?P<id>[^,\s{}]*)\s*,").expect("header regex")
});

/// Matches `name = {` for any harvested field.
static FIELD_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<name>title|booktitle|abstract|keywords)\s*=\s*\{")
        .expect("field head regex")
});

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a whole bibliography source into records, in source order.
pub(crate) fn parse_records(source: &str) -> Vec<Record> {
    split_blocks(source)
        .into_iter()
        .map(|block| parse_block(&collapse_line_breaks(block)))
        .collect()
}

/// Split on record markers and drop the preamble.
fn split_blocks(source: &str) -> Vec<&str> {
    let markers: Vec<_> = RECORD_START_RE.find_iter(source).collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers
                .get(i + 1)
                .map_or(source.len(), |next| next.start());
            &source[marker.end()..end]
        })
        .collect()
}

/// Join wrapped lines so each field value is contiguous.
fn collapse_line_breaks(block: &str) -> String {
    LINE_BREAK_RE.replace_all(block, " ").into_owned()
}

/// Build a record from one collapsed block.
fn parse_block(block: &str) -> Record {
    let (entry_type, id) = match HEADER_RE.captures(block) {
        Some(caps) => (
            non_empty(&caps["type"]),
            non_empty(&caps["id"]),
        ),
        None => (None, None),
    };

    Field::HARVEST_ORDER
        .into_iter()
        .fold(Record::new(entry_type, id), |record, field| {
            match extract_field(block, field) {
                Some(value) => record.with_field(field, value),
                None => record,
            }
        })
}

/// Match a single field. Only the first `name = {` head for the field is
/// considered; if its value does not terminate, the field is absent.
fn extract_field(block: &str, field: Field) -> Option<String> {
    let head = FIELD_HEAD_RE
        .captures_iter(block)
        .find(|caps| caps["name"].eq_ignore_ascii_case(field.name()))?;
    let rest = &block[head.get(0)?.end()..];

    let raw = if field.closes_on_brace() {
        scan_to_closing_brace(rest)?
    } else {
        scan_to_top_level_comma(rest)?
    };

    Some(strip_braces(raw))
}

/// Value up to the brace matching the already-consumed opening `{`.
fn scan_to_closing_brace(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Value up to the first comma outside any braces, counting the
/// already-consumed opening `{`. Hitting the entry's own closing brace first
/// means there is no terminator.
fn scan_to_top_level_comma(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            ',' if depth == 0 => return Some(&rest[..i]),
            _ => {}
        }
    }
    None
}

fn strip_braces(raw: &str) -> String {
    raw.replace(['{', '}'], "").trim().to_string()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
