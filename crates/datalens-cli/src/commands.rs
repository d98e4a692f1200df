//! Command implementations, independent of argument parsing.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use datalens_core::{DataLayer, DatasetRegistry, LoadOptions, Settings, summarize_bytes};
use datalens_ingest::CsvImportOptions;
use datalens_model::{DatasetFormat, DatasetKey, DatasetSummary};
use tracing::info;

/// Settings from `path`, or defaults with environment overrides.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(Settings::from_env()?),
    }
}

/// Fetches `key` from the configured bucket and summarizes it.
pub async fn summarize_key(
    key: &str,
    format: Option<DatasetFormat>,
    settings: Settings,
) -> Result<DatasetSummary> {
    let key = match format {
        Some(format) => DatasetKey::with_format(key, format)?,
        None => DatasetKey::parse(key)?,
    };
    let layer = DataLayer::new(settings)?;
    let (_, summary) = layer.load_and_summarize(&key).await?;
    Ok(summary)
}

/// Summarizes a local file without touching the store.
pub fn inspect_file(
    path: &Path,
    format: Option<DatasetFormat>,
    settings: &Settings,
    options: &LoadOptions,
) -> Result<DatasetSummary> {
    let name = path.display().to_string();
    let format = format
        .or_else(|| DatasetFormat::from_path(&name))
        .ok_or_else(|| anyhow!("cannot tell the format of {name}; pass --format"))?;
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    info!(file = %name, %format, bytes = bytes.len(), "Inspecting local file");
    let (_, summary) = summarize_bytes(&bytes, format, &name, settings, options)?;
    Ok(summary)
}

/// Applies command-line CSV flags on top of `base`.
///
/// Returns `None` when no flag is set so the configured options apply.
pub fn csv_overrides(
    base: &CsvImportOptions,
    encoding: Option<String>,
    delimiter: Option<char>,
    max_rows: Option<usize>,
) -> Option<CsvImportOptions> {
    if encoding.is_none() && delimiter.is_none() && max_rows.is_none() {
        return None;
    }
    let mut options = base.clone();
    if encoding.is_some() {
        options.encoding = encoding;
    }
    if delimiter.is_some() {
        options.delimiter = delimiter;
    }
    if max_rows.is_some() {
        options.max_rows = max_rows;
    }
    Some(options)
}

/// A dataset resolved from dashboard charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub dataset_id: String,
    pub key: DatasetKey,
}

/// Finds the single dataset read by `charts` of `dashboard`.
pub fn resolve(registry: &Path, dashboard: &str, charts: &[String]) -> Result<Resolution> {
    let registry = DatasetRegistry::load(registry)
        .with_context(|| format!("failed to load registry {}", registry.display()))?;
    let dataset_id = registry.resolve_single_dataset_id(dashboard, charts)?;
    Ok(Resolution {
        dataset_id: dataset_id.to_string(),
        key: registry.dataset_key(dataset_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_overrides_keep_base_fields() {
        let base = CsvImportOptions {
            null_values: vec!["-".to_string()],
            ..CsvImportOptions::default()
        };
        assert!(csv_overrides(&base, None, None, None).is_none());

        let options = csv_overrides(&base, Some("shift_jis".to_string()), Some(';'), None).unwrap();
        assert_eq!(options.encoding.as_deref(), Some("shift_jis"));
        assert_eq!(options.delimiter, Some(';'));
        assert_eq!(options.max_rows, None);
        assert_eq!(options.null_values, vec!["-"]);
    }
}
