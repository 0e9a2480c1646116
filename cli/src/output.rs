use std::fmt::Write;

use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Human-readable text format
    Text,
}

/// Render `value` as JSON or YAML, or with `text` for the text format.
pub(crate) fn render<T, F>(value: &T, format: OutputFormat, compact: bool, text: F) -> Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> Result<String>,
{
    match format {
        OutputFormat::Json if compact => Ok(serde_json::to_string(value)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => {
            // Convert to JSON value first, then to YAML
            let json_value = serde_json::to_value(value)?;
            Ok(serde_yml::to_string(&json_value)?)
        }
        OutputFormat::Text => text(value),
    }
}

/// Append `label: value` indented by `depth` levels.
pub(crate) fn field(out: &mut String, depth: usize, label: &str, value: impl std::fmt::Display) -> Result<()> {
    writeln!(out, "{:indent$}{}: {}", "", label, value, indent = depth * 4)?;
    Ok(())
}
