//! Pipeline orchestration for bibcloud.
//!
//! This crate ties together the bibliography and document extractors, the
//! tokenizer, frequency counting and output writing into end-to-end runs
//! (e.g., `extract_text`).

pub mod frequency;
pub mod output;
pub mod pipeline;
