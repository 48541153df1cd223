use thiserror::Error;

use super::config::ReconcileConfigError;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error(transparent)]
    Config(#[from] ReconcileConfigError),
    #[error("Comment marker must not be whitespace, got {0:?}")]
    InvalidCommentMarker(char),
}
