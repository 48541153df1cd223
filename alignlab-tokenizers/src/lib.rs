//! # alignlab-tokenizers
//!
//! Reconciles the output of a sub-word tokenizer with the text it was produced
//! from.
//!
//! ## Purpose
//!
//! Labels are stored as dense token indices. A token index only means something
//! once the token list has been matched back onto the source text, which is what
//! this crate does: special tokens are skipped, sub-word markers stripped,
//! docstrings and line comments stepped over, and every real token that is found
//! receives the next index together with its span in the text.
//!
//! ## Main Components
//!
//! - **`Reconciler`**: runs the matching pass with a `ReconcileConfig`
//! - **`Reconciliation`**: the resulting spans, ready to be annotated with labels
//! - **`utils`**: the token classification and text policies on their own
//!
//! ## Example
//!
//! ```rust
//! use alignlab_tokenizers::Reconciler;
//!
//! let reconciler = Reconciler::default();
//! let result = reconciler.reconcile("def add(a, b):", &["<s>", "def", "\u{0120}add", "(", "a"]);
//!
//! assert_eq!(result.num_tokens(), 4);
//! assert_eq!(result.token_text(1), Some("add"));
//! ```
//!
pub mod config;
pub mod error;
pub mod reconcile;
pub mod utils;

// re-exports
pub use config::{GroupPolicy, ReconcileConfig};
pub use error::TokenizerError;
pub use reconcile::{AnnotatedSpan, Reconciler, Reconciliation, TextSpan};

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::path::PathBuf;

    use alignlab_core::Corpus;
    use alignlab_core::models::Group;

    #[fixture]
    fn corpus() -> Corpus {
        Corpus::from_files(
            &PathBuf::from("../tests/data/train.jsonl"),
            &PathBuf::from("../tests/data/comment_tokens.jsonl"),
            &PathBuf::from("../tests/data/code_tokens.jsonl"),
        )
        .unwrap()
    }

    #[rstest]
    fn test_reconciler_from_config() {
        let reconciler = Reconciler::from_config("../tests/data/reconcile.toml").unwrap();
        assert_eq!(reconciler.config().remove_docstrings, true);
    }

    #[rstest]
    fn test_reconcile_corpus_sample(corpus: Corpus) {
        let reconciler = Reconciler::default();

        let comment = reconciler
            .reconcile_sample(&corpus, 0, Group::Comment)
            .unwrap();
        assert_eq!(comment.token_text(0), Some("Return"));
        assert_eq!(comment.dropped, Vec::<usize>::new());

        let code = reconciler.reconcile_sample(&corpus, 0, Group::Code).unwrap();
        assert_eq!(code.token_text(0), Some("def"));
        // the docstring inside the code does not take any index
        assert_eq!(code.text.contains("Return the sum"), false);
    }

    #[rstest]
    fn test_reconcile_missing_sample(corpus: Corpus) {
        let reconciler = Reconciler::default();
        assert_eq!(reconciler.reconcile_sample(&corpus, 42, Group::Code), None);
    }
}
