//! Locates and parses the JSON verdict embedded in free-form model output.
//!
//! Model responses routinely wrap the requested object in prose, code
//! fences or an echo of the prompt's own schema. The extractor anchors on a
//! start key known to live inside the target object, walks back to the
//! nearest brace still open at that key and then matches braces forward to
//! find the end.

mod error;

pub use error::{ExtractError, Marker};

use serde_json::{Map, Value};

/// Default anchor: first key of the verdict schema.
pub const DEFAULT_START_KEY: &str = "\"entity_name false_prediction\"";
/// Default presence check for the tail of the verdict object.
pub const DEFAULT_END_KEY: &str = "\"true_positive_matches\"";

/// Extracts the JSON object that contains `start_key`, provided `end_key`
/// also appears somewhere after it.
///
/// Brace matching counts every `{` and `}` in the text, including those
/// inside string literals.
pub fn extract_json_between_keys(
    text: &str,
    start_key: &str,
    end_key: &str,
) -> Result<Map<String, Value>, ExtractError> {
    let start_key_idx = text
        .find(start_key)
        .ok_or_else(|| ExtractError::key_not_found(Marker::Start, start_key))?;

    let open_idx = enclosing_open(text, start_key_idx).ok_or(ExtractError::NoOpeningBrace)?;

    if !text[start_key_idx..].contains(end_key) {
        return Err(ExtractError::key_not_found(Marker::End, end_key));
    }

    let close_idx = matching_close(text, open_idx).ok_or(ExtractError::UnterminatedObject)?;
    let candidate = &text[open_idx..=close_idx];

    serde_json::from_str::<Map<String, Value>>(candidate).map_err(ExtractError::MalformedJson)
}

/// Nearest `{` before `pos` that is still open at `pos`. Objects that
/// open and close entirely before `pos` (nested siblings of the anchor)
/// are stepped over.
fn enclosing_open(text: &str, pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, byte) in text.as_bytes()[..pos].iter().enumerate().rev() {
        match byte {
            b'}' => depth += 1,
            b'{' if depth == 0 => return Some(idx),
            b'{' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Byte offset of the `}` closing the `{` at `open_idx`.
fn matching_close(text: &str, open_idx: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in text.as_bytes()[open_idx..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open_idx + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Start/end anchors bundled for repeated use across a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBounds {
    pub start_key: String,
    pub end_key: String,
}

impl KeyBounds {
    pub fn new(start_key: impl Into<String>, end_key: impl Into<String>) -> Self {
        Self {
            start_key: start_key.into(),
            end_key: end_key.into(),
        }
    }

    pub fn extract(&self, text: &str) -> Result<Map<String, Value>, ExtractError> {
        extract_json_between_keys(text, &self.start_key, &self.end_key)
    }
}

impl Default for KeyBounds {
    fn default() -> Self {
        Self::new(DEFAULT_START_KEY, DEFAULT_END_KEY)
    }
}

#[cfg(test)]
mod tests;
