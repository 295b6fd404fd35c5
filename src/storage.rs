//! JSON document persistence and file helpers.

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load a JSON document from a path.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a JSON document, treating a missing file as the default value.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if path.exists() {
        load_json(path)
    } else {
        Ok(T::default())
    }
}

/// Serialize a value as pretty JSON and write it to a path, creating parent
/// directories as needed. Overwrites any previous content.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

/// Read a URL batch file: one URL per line, blank lines and `#` comments
/// (whole-line or inline) ignored.
pub fn read_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut urls = Vec::new();
    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let url = line.split('#').next().unwrap_or("").trim();
        if !url.is_empty() {
            urls.push(url.to_string());
        }
    }
    Ok(urls)
}

/// Default snapshot filename for runs without a derivable title:
/// `[<prefix>_]urls_all_<timestamp>.json`, filename-restricted.
pub fn generate_snapshot_filename(prefix: Option<&str>) -> String {
    let mut prefix = prefix.unwrap_or("").to_string();
    if !prefix.is_empty() && !prefix.ends_with('_') {
        prefix.push('_');
    }
    let timestamp = chrono::Local::now().format("%Y-%m-%dT%H-%M-%S");
    restrict_filename(&format!("{}urls_all_{}.json", prefix, timestamp))
}

/// Restrict a string to a conservative filename-safe form: ASCII
/// alphanumerics, `.`, `-` and `_`; every other character (including
/// whitespace) becomes `_`, and runs of `_` are collapsed.
pub fn restrict_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;
    for c in name.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            c
        } else {
            '_'
        };
        if mapped == '_' {
            if !last_was_underscore {
                out.push('_');
            }
            last_was_underscore = true;
        } else {
            out.push(mapped);
            last_was_underscore = false;
        }
    }
    out.trim_matches('_').to_string()
}
