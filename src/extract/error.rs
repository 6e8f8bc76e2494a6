use std::fmt;

use thiserror::Error;

/// Which anchor a lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Start,
    End,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Start => write!(f, "Start"),
            Marker::End => write!(f, "End"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{marker} key '{key}' not found")]
    KeyNotFound { marker: Marker, key: String },

    #[error("No '{{' found before start key")]
    NoOpeningBrace,

    #[error("No complete JSON object found")]
    UnterminatedObject,

    #[error("Malformed JSON object: {0}")]
    MalformedJson(#[source] serde_json::Error),
}

impl ExtractError {
    pub(super) fn key_not_found(marker: Marker, key: &str) -> Self {
        ExtractError::KeyNotFound {
            marker,
            key: key.to_string(),
        }
    }
}
