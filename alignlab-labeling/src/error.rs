use thiserror::Error;

use alignlab_core::JsonLinesError;

#[derive(Error, Debug)]
pub enum LabelingError {
    #[error("Failed to load labeling: {0}")]
    Load(#[from] JsonLinesError),
    #[error("Failed to serialize labeling: {0}")]
    Serialize(#[from] serde_json::Error),
}
