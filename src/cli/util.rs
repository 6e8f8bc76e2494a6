use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

pub(crate) fn read_piped_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}

/// Contents of `file`, or piped stdin when no file is given.
pub(crate) fn read_text_input(file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    match read_piped_stdin()? {
        Some(text) => Ok(text),
        None => bail!("No input: pass a file or pipe model output on stdin"),
    }
}

pub(crate) fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }

    let visible = key.chars().take(8).collect::<String>();
    format!("{visible}***")
}
