use std::{fs, path::Path};
use anyhow::{Context, Result};
use tracing::debug;

/// Load `key=value` pairs from an env file into the process environment.
///
/// Returns the number of variables applied.
pub fn load_env_file(path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read env file {}", path.display()))?;

    let pairs = parse_env_lines(&content);
    for (key, value) in &pairs {
        std::env::set_var(key, value);
    }
    debug!(path = %path.display(), variables = pairs.len(), "env file loaded");
    Ok(pairs.len())
}

/// Split on the first `=`, trimming both sides. Blank lines, `#` comments
/// and lines without `=` are skipped.
pub fn parse_env_lines(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .collect()
}
