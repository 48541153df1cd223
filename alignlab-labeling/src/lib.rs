//! # alignlab-labeling
//!
//! In-memory store of which tokens of a sample belong to which alignment
//! label, per group, with load/save in the compact range format.
//!
//! ## Example
//!
//! ```rust
//! use alignlab_core::models::Group;
//! use alignlab_labeling::{LabelingEngine, LoadPolicy};
//!
//! let mut engine = LabelingEngine::from_content(
//!     r#"{"idx":5,"match":[[[0,2],[1,1]]]}"#,
//!     LoadPolicy::Abort,
//! ).unwrap();
//!
//! engine.change_tokens_to_label(5, Group::Comment, 1, &[2]);
//! assert_eq!(engine.get_tokens_on_group(5, Group::Comment), Some(vec![vec![0, 1], vec![2]]));
//! ```
//!
pub mod engine;
pub mod error;
pub mod shared;
pub mod store;

// re-exports
pub use alignlab_core::jsonl::LinePolicy as LoadPolicy;
pub use engine::{EngineState, LabelingEngine, SaveCallback};
pub use error::LabelingError;
pub use shared::SharedLabelingEngine;
pub use store::SampleLabeling;
