//! Serialization of finished key mappings to disk.
//!
//! Merging keeps every key already present in the destination file and
//! overwrites values the current run computed. A mangled value that shipped
//! in an earlier build is therefore replaced silently when the same key is
//! mangled differently now.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::key_table::Mapping;

/// Placeholder replaced by the entry name in per-entry output paths.
pub const NAME_PLACEHOLDER: &str = "[name]";

/// Output destination(s) as written in configuration: `false`, a path, or a list of paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OutputSetting {
    Flag(bool),
    Path(String),
    Paths(Vec<String>),
}

impl Default for OutputSetting {
    fn default() -> Self {
        OutputSetting::Flag(false)
    }
}

impl OutputSetting {
    /// All configured destination paths; empty when output is disabled.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            OutputSetting::Flag(_) => Vec::new(),
            OutputSetting::Path(path) => vec![path.as_str()],
            OutputSetting::Paths(paths) => paths.iter().map(String::as_str).collect(),
        }
    }

    /// True when any destination asks for one file per entry.
    pub fn is_per_entry(&self) -> bool {
        self.paths().iter().any(|path| is_per_entry_path(path))
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            OutputSetting::Flag(true) => {
                bail!("'output' must be false, a path, or a list of paths (got true)")
            }
            OutputSetting::Path(path) if path.trim().is_empty() => {
                bail!("'output' path must not be empty")
            }
            OutputSetting::Paths(paths) if paths.iter().any(|p| p.trim().is_empty()) => {
                bail!("'output' paths must not be empty")
            }
            _ => Ok(()),
        }
    }
}

pub fn is_per_entry_path(path: &str) -> bool {
    path.contains(NAME_PLACEHOLDER)
}

/// Substitute every placeholder occurrence in `path` with `entry`.
pub fn entry_path(path: &str, entry: &str) -> String {
    path.replace(NAME_PLACEHOLDER, entry)
}

/// Layout of written mapping files. Never affects content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFormat {
    /// Pretty-print with this many spaces; compact when `None`.
    pub indent: Option<usize>,
    pub trailing_newline: bool,
}

impl JsonFormat {
    pub fn render(&self, object: &Map<String, Value>) -> Result<String> {
        let mut rendered = match self.indent {
            None => serde_json::to_string(object).context("Failed to serialize JSON")?,
            Some(width) => {
                let indent = " ".repeat(width);
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut buf = Vec::new();
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                object
                    .serialize(&mut serializer)
                    .context("Failed to serialize JSON")?;
                String::from_utf8(buf).context("Serialized JSON is not valid UTF-8")?
            }
        };
        if self.trailing_newline {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

/// Writes mapping files, optionally merging into existing content.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingWriter {
    pub merge: bool,
    pub format: JsonFormat,
}

impl MappingWriter {
    pub fn new(merge: bool, format: JsonFormat) -> Self {
        Self { merge, format }
    }

    /// Build the object that will be written to `path`.
    pub fn prepare(&self, path: &Path, mapping: &Mapping) -> Result<Map<String, Value>> {
        let mut object = if self.merge && path.exists() {
            read_existing(path)?
        } else {
            Map::new()
        };
        for (key, value) in mapping {
            object.insert(key.clone(), Value::String(value.clone()));
        }
        Ok(object)
    }

    pub fn write(&self, path: &Path, mapping: &Mapping) -> Result<PathBuf> {
        let object = self.prepare(path, mapping)?;
        let content = self.format.render(&object)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        debug!(path = %path.display(), keys = object.len(), "wrote key mapping");

        Ok(path.to_path_buf())
    }
}

fn read_existing(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("Root of JSON file must be an object: {}", path.display()),
    }
}
