use thiserror::Error;

use alignlab_core::JsonLinesError;

#[derive(Error, Debug)]
pub enum TeachersError {
    #[error("Invalid teacher file: {0}")]
    Parse(#[from] JsonLinesError),
}

#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("No valid JSON found in response")]
    NoJson,
    #[error("Malformed alignment response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("Alignment provider failed: {0}")]
    Provider(String),
}
