//! Fetch, read, type, derive and summarize one dataset.

use std::sync::Arc;
use std::time::Instant;

use datalens_ingest::{CsvImportOptions, read_dataset};
use datalens_model::{DatasetFormat, DatasetKey, DatasetSummary, Frame};
use datalens_store::DatasetStore;
use datalens_summary::summarize;
use datalens_transform::{
    InferenceConfig, build_cadence_columns, infer_frame, normalize_durations,
};
use object_store::ObjectStore;
use tracing::{Instrument, debug, info, info_span};

use crate::error::DataError;
use crate::settings::Settings;

/// Per-request overrides.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Replaces the configured CSV options.
    pub csv: Option<CsvImportOptions>,
    /// Columns that must be present; added to the configured ones.
    pub required_columns: Vec<String>,
    /// Name for the summary. Defaults to the dataset key.
    pub name: Option<String>,
}

/// Entry point for callers that need a typed, summarized dataset.
pub struct DataLayer {
    store: DatasetStore,
    settings: Settings,
}

impl DataLayer {
    /// Connects to the store described by `settings.store`.
    ///
    /// # Errors
    ///
    /// Fails if the store configuration is unusable.
    pub fn new(settings: Settings) -> Result<Self, DataError> {
        let store = DatasetStore::new(&settings.store)?;
        Ok(Self { store, settings })
    }

    /// Uses an existing object store, keeping `settings.store` for bucket,
    /// retry and deadline.
    pub fn with_store(store: Arc<dyn ObjectStore>, settings: Settings) -> Self {
        Self {
            store: DatasetStore::with_store(store, &settings.store),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Loads `key` with the configured settings.
    ///
    /// Returns the typed frame, with its helper columns, and its summary.
    pub async fn load_and_summarize(
        &self,
        key: &DatasetKey,
    ) -> Result<(Frame, DatasetSummary), DataError> {
        self.load_and_summarize_with(key, &LoadOptions::default())
            .await
    }

    /// Loads `key` with request overrides.
    pub async fn load_and_summarize_with(
        &self,
        key: &DatasetKey,
        options: &LoadOptions,
    ) -> Result<(Frame, DatasetSummary), DataError> {
        let span = info_span!("load_and_summarize", key = %key, format = %key.format());
        async {
            let started = Instant::now();
            let bytes = self.store.fetch(key.path()).await?;
            let name = options.name.clone().unwrap_or_else(|| key.to_string());
            let (frame, summary) =
                summarize_bytes(&bytes, key.format(), &name, &self.settings, options)?;
            info!(
                rows = summary.row_count,
                columns = summary.column_count,
                bytes = bytes.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Dataset summarized"
            );
            Ok::<_, DataError>((frame, summary))
        }
        .instrument(span)
        .await
    }
}

/// Runs the CPU stages on bytes already in memory.
///
/// # Errors
///
/// Propagates read, inference and summary failures.
pub fn summarize_bytes(
    bytes: &[u8],
    format: DatasetFormat,
    name: &str,
    settings: &Settings,
    options: &LoadOptions,
) -> Result<(Frame, DatasetSummary), DataError> {
    let frame = prepare_frame(bytes, format, settings, options)?;
    let summary = summarize(&frame, name, &settings.summary)?;
    Ok((frame, summary))
}

/// Reads bytes into a typed frame with duration and cadence helpers.
pub fn prepare_frame(
    bytes: &[u8],
    format: DatasetFormat,
    settings: &Settings,
    options: &LoadOptions,
) -> Result<Frame, DataError> {
    let csv = options.csv.as_ref().unwrap_or(&settings.csv);
    let mut frame = read_dataset(bytes, format, csv)?;
    debug!(rows = frame.row_count(), columns = frame.width(), "Read dataset");

    let inference = with_required(&settings.inference, &options.required_columns);
    let warnings = infer_frame(&mut frame, &inference)?;
    let durations = normalize_durations(&mut frame)?;
    let cadences = build_cadence_columns(&mut frame, &settings.cadence)?;
    debug!(
        warnings = warnings.len(),
        durations, cadences, "Typed frame and derived helper columns"
    );
    Ok(frame)
}

fn with_required(config: &InferenceConfig, extra: &[String]) -> InferenceConfig {
    let mut config = config.clone();
    for column in extra {
        if !config.required_columns.contains(column) {
            config.required_columns.push(column.clone());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use datalens_model::ColumnKind;

    use super::*;

    #[test]
    fn test_prepare_csv_frame() {
        let csv = b"created_at,plays,platform\n2026-02-11,3,web\n2026-02-12,5,web\n";
        let frame = prepare_frame(
            csv,
            DatasetFormat::Csv,
            &Settings::default(),
            &LoadOptions::default(),
        )
        .unwrap();

        assert_eq!(frame.meta("plays").unwrap().kind, ColumnKind::Integer);
        assert_eq!(frame.meta("created_at").unwrap().kind, ColumnKind::Datetime);
        assert!(frame.meta("_created_at_week").is_some());
    }

    #[test]
    fn test_required_columns_merge() {
        let config = InferenceConfig {
            required_columns: vec!["a".to_string()],
            ..InferenceConfig::default()
        };
        let merged = with_required(&config, &["a".to_string(), "b".to_string()]);
        assert_eq!(merged.required_columns, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_required_column_is_type_inference_error() {
        let options = LoadOptions {
            required_columns: vec!["amount".to_string()],
            ..LoadOptions::default()
        };
        let err = prepare_frame(b"a,b\n1,2\n", DatasetFormat::Csv, &Settings::default(), &options)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TypeInference);
    }

    #[test]
    fn test_binary_csv_is_encoding_error() {
        let bytes = b"id,value\n1,\x00\x9F\xFF\x02\n";
        let err = prepare_frame(
            bytes,
            DatasetFormat::Csv,
            &Settings::default(),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Encoding);
        assert!(!err.is_retryable());
    }
}
