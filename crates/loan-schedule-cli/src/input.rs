use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

type InputResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load a request document from `--input <file>` or, failing that, from
/// piped stdin. Returns `None` when neither is available so the command can
/// fall back to its individual flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> InputResult<Option<T>> {
    if let Some(path) = path {
        return read_file(path).map(Some);
    }
    match read_stdin()? {
        Some(text) => {
            let value: T = serde_json::from_str(&text)
                .map_err(|e| format!("Failed to parse stdin: {}", e))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Like `load`, for commands that have no flag fallback.
pub fn require<T: DeserializeOwned>(path: Option<&str>, what: &str) -> InputResult<T> {
    load(path)?.ok_or_else(|| format!("--input <file.json> or stdin required for {what}").into())
}

fn read_file<T: DeserializeOwned>(path: &str) -> InputResult<T> {
    let resolved = resolve_path(path)?;
    log::debug!("reading request from {}", resolved.display());
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
    Ok(value)
}

fn resolve_path(path: &str) -> InputResult<PathBuf> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("Not a readable file: {}", resolved.display()).into());
    }
    Ok(resolved)
}

/// Piped stdin contents, or `None` when stdin is a terminal or empty.
fn read_stdin() -> InputResult<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    log::debug!("read {} bytes of request from stdin", trimmed.len());
    Ok(Some(trimmed.to_string()))
}
