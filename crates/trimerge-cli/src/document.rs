//! Reading and writing documents.
//!
//! The merge engine only sees [`Value`] trees; this module turns JSON and
//! TOML files into values and back.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use trimerge_types::{Mapping, TypeError, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Load a document, picking the format from the file extension.
pub fn load(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text, DocumentFormat::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse(text: &str, format: DocumentFormat) -> anyhow::Result<Value> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str::<Value>(text)?),
        DocumentFormat::Toml => {
            let table: toml::Table = text.parse()?;
            Ok(value_from_toml(toml::Value::Table(table))?)
        }
    }
}

/// Convert a TOML value. Datetimes and non-finite floats have no
/// counterpart in the value model.
pub fn value_from_toml(value: toml::Value) -> Result<Value, TypeError> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from_f64(f)?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => {
            return Err(TypeError::NotRepresentable(format!("datetime {d}")))
        }
        toml::Value::Array(items) => Value::Sequence(
            items
                .into_iter()
                .map(value_from_toml)
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| value_from_toml(v).map(|v| (k, v)))
                .collect::<Result<Mapping, TypeError>>()?,
        ),
    })
}

/// Render a merged document.
pub fn render(value: &Value, format: DocumentFormat) -> anyhow::Result<String> {
    if value.is_absent() {
        bail!("the merged document was removed");
    }
    match format {
        DocumentFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        DocumentFormat::Toml => {
            toml::to_string_pretty(value).context("result cannot be written as TOML")
        }
    }
}
