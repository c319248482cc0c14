//! Output writer for a finished extraction run.
//!
//! Writes the following files into the output directory:
//! ```text
//! <out_dir>/
//! ├── text.txt       (cleaned tokens, one per line)
//! ├── counts.csv     (token,count in rank order)
//! └── summary.json   (run metadata and per-file outcomes)
//! ```
//! Each file is written to a dot-prefixed temp file first and then renamed.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use bibcloud_shared::{BibcloudError, Result};

use crate::frequency::{FrequencyTable, TokenCount};
use crate::pipeline::{ExtractReport, FileOutcome};

/// Current schema version for `summary.json`.
pub const SUMMARY_SCHEMA_VERSION: u32 = 1;

pub const TEXT_FILE_NAME: &str = "text.txt";
pub const COUNTS_FILE_NAME: &str = "counts.csv";
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Where and how to write outputs.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Directory receiving the output files (created if missing).
    pub out_dir: PathBuf,
    /// Number of top rows recorded in `summary.json`.
    pub top_words: usize,
    /// Tool version string.
    pub tool_version: String,
}

/// Paths of the files written by [`write_outputs`].
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub text: PathBuf,
    pub counts: PathBuf,
    pub summary: PathBuf,
}

/// The `summary.json` structure.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub schema_version: u32,
    pub tool_version: &'a str,
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub token_count: usize,
    pub distinct_tokens: usize,
    pub files: &'a [FileOutcome],
    pub top: &'a [TokenCount],
}

/// Write `text.txt`, `counts.csv` and `summary.json` for a run.
#[instrument(skip_all, fields(out_dir = %config.out_dir.display()))]
pub fn write_outputs(
    config: &OutputConfig,
    report: &ExtractReport,
    table: &FrequencyTable,
) -> Result<OutputPaths> {
    std::fs::create_dir_all(&config.out_dir)
        .map_err(|e| BibcloudError::io(&config.out_dir, e))?;

    let paths = OutputPaths {
        text: config.out_dir.join(TEXT_FILE_NAME),
        counts: config.out_dir.join(COUNTS_FILE_NAME),
        summary: config.out_dir.join(SUMMARY_FILE_NAME),
    };

    write_atomic(&paths.text, report.text.as_bytes())?;
    write_atomic(&paths.counts, &render_counts_csv(table)?)?;

    let summary = RunSummary {
        schema_version: SUMMARY_SCHEMA_VERSION,
        tool_version: &config.tool_version,
        generated_at: Utc::now(),
        elapsed_ms: u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        token_count: report.token_count,
        distinct_tokens: table.distinct(),
        files: &report.files,
        top: table.top(config.top_words),
    };
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| BibcloudError::Output(format!("JSON serialization failed: {e}")))?;
    write_atomic(&paths.summary, json.as_bytes())?;

    info!(
        tokens = report.token_count,
        distinct = table.distinct(),
        "outputs written"
    );

    Ok(paths)
}

/// Render the frequency table as CSV with a `token,count` header.
pub fn render_counts_csv(table: &FrequencyTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["token", "count"])
        .map_err(|e| BibcloudError::Output(format!("CSV write failed: {e}")))?;
    for row in table.rows() {
        writer
            .write_record([row.token.as_str(), row.count.to_string().as_str()])
            .map_err(|e| BibcloudError::Output(format!("CSV write failed: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| BibcloudError::Output(format!("CSV flush failed: {e}")))
}

/// Write to a temp file next to `target`, then rename it into place.
fn write_atomic(target: &Path, content: &[u8]) -> Result<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| BibcloudError::io(&temp, e))?;
    std::fs::rename(&temp, target).map_err(|e| BibcloudError::io(target, e))?;

    debug!(path = %target.display(), size = content.len(), "wrote output file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FileStatus;
    use std::time::Duration;

    fn report(text: &str, files: Vec<FileOutcome>) -> ExtractReport {
        ExtractReport {
            text: text.to_string(),
            token_count: text.lines().filter(|l| !l.is_empty()).count(),
            files,
            elapsed: Duration::from_millis(12),
        }
    }

    fn config(dir: &Path) -> OutputConfig {
        OutputConfig {
            out_dir: dir.join("out"),
            top_words: 2,
            tool_version: "0.1.0".into(),
        }
    }

    #[test]
    fn csv_has_header_and_rank_order() {
        let table = FrequencyTable::from_text("music\ntheory\nmusic");
        let csv = String::from_utf8(render_counts_csv(&table).expect("csv")).expect("utf8");
        assert_eq!(csv, "token,count\nmusic,2\ntheory,1\n");
    }

    #[test]
    fn csv_quotes_tokens_with_commas() {
        let table = FrequencyTable::from_tokens(["\"music,music"]);
        let csv = String::from_utf8(render_counts_csv(&table).expect("csv")).expect("utf8");
        assert_eq!(csv, "token,count\n\"\"\"music,music\",1\n");
    }

    #[test]
    fn writes_all_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let files = vec![FileOutcome {
            path: PathBuf::from("refs.bib"),
            status: FileStatus::Extracted {
                format: bibcloud_shared::SourceFormat::Bibliography,
                sha256: "00".into(),
                word_lists: 1,
                tokens: 3,
            },
        }];
        let report = report("music\nharmony\nmusic", files);
        let table = FrequencyTable::from_text(&report.text);

        let paths = write_outputs(&config(dir.path()), &report, &table).expect("write");

        let text = std::fs::read_to_string(&paths.text).expect("read text");
        assert_eq!(text, "music\nharmony\nmusic");

        let counts = std::fs::read_to_string(&paths.counts).expect("read counts");
        assert!(counts.starts_with("token,count\nmusic,2\n"));

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.summary).expect("read summary"))
                .expect("parse summary");
        assert_eq!(summary["schema_version"], SUMMARY_SCHEMA_VERSION);
        assert_eq!(summary["token_count"], 3);
        assert_eq!(summary["distinct_tokens"], 2);
        assert_eq!(summary["files"][0]["status"], "extracted");
        assert_eq!(summary["files"][0]["format"], "bibliography");
        assert_eq!(summary["top"].as_array().map(Vec::len), Some(2));

        // No temp files left behind
        let leftovers = std::fs::read_dir(dir.path().join("out"))
            .expect("read dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn empty_run_still_writes_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = report("", Vec::new());
        let table = FrequencyTable::from_text(&report.text);

        let paths = write_outputs(&config(dir.path()), &report, &table).expect("write");

        assert_eq!(std::fs::read_to_string(&paths.text).expect("text"), "");
        assert_eq!(
            std::fs::read_to_string(&paths.counts).expect("counts"),
            "token,count\n"
        );
    }
}
