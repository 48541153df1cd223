//! # alignlab-core
//!
//! Shared building blocks for annotating alignments between a natural-language
//! comment and a code snippet.
//!
//! ## Main Components
//!
//! - **`TokenRanges`**: the compact paired-endpoint encoding used to persist
//!   sets of token indices
//! - **`LabelingRecord` / `TeacherRecord`**: persisted line formats, validated
//!   field by field
//! - **`jsonl`**: the one place deciding whether a malformed line aborts a load
//! - **`Corpus`**: full text and tokenizer output per sample
//! - **`AnnotatorConfig`**: file locations, palette and toggles of a session
//!
//! ## Example
//!
//! ```rust
//! use alignlab_core::models::TokenRanges;
//!
//! let ranges = TokenRanges::reduce_from(&[1, 2, 3, 7, 8, 10]);
//! assert_eq!(ranges.value, vec![1, 3, 7, 8, 10, 10]);
//! assert_eq!(ranges.expand(), vec![1, 2, 3, 7, 8, 10]);
//! ```
//!
pub mod config;
pub mod corpus;
pub mod errors;
pub mod jsonl;
pub mod models;
pub mod utils;

pub use config::{AnnotatorConfig, AnnotatorSettings, ConfigField};
pub use corpus::Corpus;
pub use errors::*;
pub use jsonl::{LinePolicy, parse_json_lines};
