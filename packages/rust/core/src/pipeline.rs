//! End-to-end extraction: input files → word lists → cleaned text blob.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use bibcloud_normalize::Tokenizer;
use bibcloud_shared::{BibcloudError, Result, SourceFormat};

/// What happened to one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// Path as given by the caller.
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Per-file result of the extraction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// The file was read, extracted and cleaned.
    Extracted {
        format: SourceFormat,
        /// SHA-256 of the raw input bytes.
        sha256: String,
        /// Number of word lists (fields or pages) handed to the tokenizer.
        word_lists: usize,
        /// Number of tokens that survived cleaning.
        tokens: usize,
    },
    /// The file was not processed and contributed nothing.
    Skipped { reason: String },
}

/// Result of [`extract_text`].
#[derive(Debug)]
pub struct ExtractReport {
    /// Cleaned tokens from every file, one per line, in input order.
    pub text: String,
    /// One entry per input path, in input order.
    pub files: Vec<FileOutcome>,
    /// Total number of tokens in `text`.
    pub token_count: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl ExtractReport {
    /// Files that were skipped, with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().filter_map(|f| match &f.status {
            FileStatus::Skipped { reason } => Some((f.path.as_path(), reason.as_str())),
            FileStatus::Extracted { .. } => None,
        })
    }

    /// Number of files that were actually extracted.
    pub fn extracted_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Extracted { .. }))
            .count()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called before a file is read.
    fn file_started(&self, path: &Path, current: usize, total: usize);
    /// Called when a file is skipped without being read.
    fn file_skipped(&self, path: &Path, reason: &str);
    /// Called when the pipeline completes.
    fn done(&self, report: &ExtractReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn file_started(&self, _path: &Path, _current: usize, _total: usize) {}
    fn file_skipped(&self, _path: &Path, _reason: &str) {}
    fn done(&self, _report: &ExtractReport) {}
}

/// Run every input through its extractor and the tokenizer.
///
/// Files are handled strictly in order. An unsupported extension is logged,
/// recorded as skipped, and does not stop the run. A file that cannot be read,
/// or a document that cannot be loaded, aborts the run with an error.
#[instrument(skip_all, fields(files = paths.len()))]
pub fn extract_text<P: AsRef<Path>>(
    paths: &[P],
    tokenizer: &Tokenizer,
    progress: &dyn ProgressReporter,
) -> Result<ExtractReport> {
    let start = Instant::now();
    let total = paths.len();

    let mut blobs: Vec<String> = Vec::with_capacity(total);
    let mut files = Vec::with_capacity(total);
    let mut token_count = 0;

    for (i, path) in paths.iter().enumerate() {
        let path = path.as_ref();

        let Some(format) = SourceFormat::from_path(path) else {
            let reason = "unrecognized file extension".to_string();
            warn!(path = %path.display(), "{reason}, skipping");
            progress.file_skipped(path, &reason);
            files.push(FileOutcome {
                path: path.to_path_buf(),
                status: FileStatus::Skipped { reason },
            });
            continue;
        };

        progress.file_started(path, i + 1, total);

        let (word_lists, sha256) = read_word_lists(path, format)?;
        let tokens = tokenizer.clean(&word_lists);

        debug!(
            path = %path.display(),
            %format,
            word_lists = word_lists.len(),
            tokens = tokens.len(),
            "cleaned file"
        );

        token_count += tokens.len();
        files.push(FileOutcome {
            path: path.to_path_buf(),
            status: FileStatus::Extracted {
                format,
                sha256,
                word_lists: word_lists.len(),
                tokens: tokens.len(),
            },
        });

        if !tokens.is_empty() {
            blobs.push(tokens.join("\n"));
        }
    }

    let report = ExtractReport {
        text: blobs.join("\n"),
        files,
        token_count,
        elapsed: start.elapsed(),
    };

    info!(
        extracted = report.extracted_count(),
        skipped = report.skipped().count(),
        tokens = report.token_count,
        "extraction complete"
    );

    progress.done(&report);
    Ok(report)
}

/// Read a file fully and hand its bytes to the extractor for `format`.
///
/// Returns the word lists and the hex SHA-256 of the bytes.
pub fn read_word_lists(path: &Path, format: SourceFormat) -> Result<(Vec<Vec<String>>, String)> {
    let bytes = std::fs::read(path).map_err(|e| BibcloudError::io(path, e))?;
    let sha256 = format!("{:x}", Sha256::digest(&bytes));

    let word_lists = match format {
        SourceFormat::Bibliography => bibcloud_bibtex::word_lists_from_bytes(&bytes),
        SourceFormat::Document => bibcloud_document::extract_page_words(&bytes, path)?,
    };

    Ok((word_lists, sha256))
}
