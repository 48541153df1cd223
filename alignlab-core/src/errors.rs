use thiserror::Error;

#[derive(Error, Debug)]
#[error("Invalid group: {0}. Expected `comment` (0) or `code` (1)")]
pub struct GroupParseError(pub String);

///
/// Why a single persisted record was rejected.
///
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Line is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Missing field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl RecordError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RecordError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    ///
    /// Name of the offending field, if the error is tied to one.
    ///
    pub fn field(&self) -> Option<&'static str> {
        match self {
            RecordError::MissingField(field) => Some(field),
            RecordError::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
#[error("Cannot parse line {line}: {source}")]
pub struct JsonLinesError {
    pub line: usize,
    pub source: RecordError,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
