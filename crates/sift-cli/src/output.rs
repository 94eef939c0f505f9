//! Rendering filtered items.
//!
//! JSON and YAML serialize the result list as-is; `lines` writes one compact
//! JSON value per line; CSV flattens objects into columns; `count` prints
//! only the number of matches.

use clap::ValueEnum;
use serde_json::Value as Json;
use thiserror::Error;

/// Errors that can occur while rendering output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array.
    #[default]
    Json,
    /// YAML sequence.
    Yaml,
    /// One compact JSON value per line.
    Lines,
    /// Comma-separated values, one row per item.
    Csv,
    /// Number of matching items.
    Count,
}

/// Renders `results` in `format`. Non-empty text ends with a newline.
pub fn render(results: &[&Json], format: OutputFormat) -> Result<String, OutputError> {
    let mut text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(results)?,
        OutputFormat::Yaml => serde_yaml::to_string(results)?,
        OutputFormat::Lines => results
            .iter()
            .map(|item| serde_json::to_string(item))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
        OutputFormat::Csv => to_csv(results)?,
        OutputFormat::Count => results.len().to_string(),
    };
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Objects contribute their keys as columns, in first-seen order; any other
/// item is written to a `value` column.
fn to_csv(results: &[&Json]) -> Result<String, OutputError> {
    let mut headers: Vec<&str> = Vec::new();
    let mut has_scalars = false;
    for item in results {
        match item {
            Json::Object(map) => {
                for key in map.keys() {
                    if !headers.contains(&key.as_str()) {
                        headers.push(key);
                    }
                }
            }
            _ => has_scalars = true,
        }
    }
    if has_scalars && !headers.contains(&"value") {
        headers.push("value");
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    if !headers.is_empty() {
        writer.write_record(&headers)?;
    }
    for item in results {
        let row: Vec<String> = headers
            .iter()
            .map(|header| match item {
                Json::Object(map) => map.get(*header).map(cell).unwrap_or_default(),
                scalar if *header == "value" => cell(scalar),
                _ => String::new(),
            })
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn cell(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}
