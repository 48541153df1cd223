//! # alignlab-refs
//!
//! Cross-references used around the labeling engine:
//!
//! - **`TeachersRelationshipProvider`**: which previously labeled samples are
//!   good examples for a given sample
//! - **`symbols`**: unique string forms of tokens, and conversion of alignments
//!   between those strings and token indices
//! - **`service`**: asking a model for an alignment suggestion, with the model
//!   behind the `AlignmentProvider` trait
//!
pub mod error;
pub mod service;
pub mod symbols;
pub mod teachers;

pub use error::{AlignmentError, TeachersError};
pub use service::{
    Alignment, AlignmentProvider, AlignmentRequest, AlignmentResponse, ReplayProvider,
    StreamCallbacks, TeacherExample, TokenAlignmentService, TokenPair, parse_alignment_response,
};
pub use symbols::{
    UniqueSymbols, to_alignment_with_indices, to_alignment_with_unique_tokens, to_unique_symbols,
    to_unique_symbols_with_marker,
};
pub use teachers::TeachersRelationshipProvider;
