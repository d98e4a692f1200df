//! Data layer settings.
//!
//! Loaded from TOML; every section and field has a default, so an empty file
//! is valid. Store connection values can be overridden from the environment:
//!
//! | Variable                 | Field              |
//! |--------------------------|--------------------|
//! | `DATALENS_S3_ENDPOINT`   | `store.endpoint`   |
//! | `DATALENS_S3_REGION`     | `store.region`     |
//! | `DATALENS_S3_BUCKET`     | `store.bucket`     |
//! | `DATALENS_S3_ACCESS_KEY` | `store.access_key` |
//! | `DATALENS_S3_SECRET_KEY` | `store.secret_key` |

use std::path::{Path, PathBuf};

use datalens_ingest::CsvImportOptions;
use datalens_store::StoreConfig;
use datalens_summary::SummaryConfig;
use datalens_transform::{CadenceConfig, InferenceConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const ENV_ENDPOINT: &str = "DATALENS_S3_ENDPOINT";
pub const ENV_REGION: &str = "DATALENS_S3_REGION";
pub const ENV_BUCKET: &str = "DATALENS_S3_BUCKET";
pub const ENV_ACCESS_KEY: &str = "DATALENS_S3_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "DATALENS_S3_SECRET_KEY";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// All configuration of the data layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreConfig,
    /// Defaults for CSV reads; a request may override them.
    pub csv: CsvImportOptions,
    pub inference: InferenceConfig,
    pub cadence: CadenceConfig,
    pub summary: SummaryConfig,
}

impl Settings {
    /// Loads a TOML file, applies environment overrides and validates.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded settings file");
        let mut settings = Self::from_toml_str(&contents)?;
        settings.apply_env_overrides(|name| std::env::var(name).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults with environment overrides, for running without a file.
    pub fn from_env() -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        settings.apply_env_overrides(|name| std::env::var(name).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Parses TOML without overrides or validation.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Replaces store fields with values from `lookup`. Empty values are
    /// ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(endpoint) = var(ENV_ENDPOINT) {
            self.store.endpoint = Some(endpoint);
        }
        if let Some(region) = var(ENV_REGION) {
            self.store.region = region;
        }
        if let Some(bucket) = var(ENV_BUCKET) {
            self.store.bucket = bucket;
        }
        if let Some(access_key) = var(ENV_ACCESS_KEY) {
            self.store.access_key = Some(access_key);
        }
        if let Some(secret_key) = var(ENV_SECRET_KEY) {
            self.store.secret_key = Some(secret_key);
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.store.bucket.trim().is_empty() {
            return Err(invalid("store.bucket", "must not be empty"));
        }
        if self.store.request_timeout_secs == 0 {
            return Err(invalid("store.request_timeout_secs", "must be positive"));
        }
        check_fraction(
            "inference.success_threshold",
            self.inference.success_threshold,
        )?;
        check_fraction(
            "inference.categorical_ratio",
            self.inference.categorical_ratio,
        )?;
        if self.summary.top_k == 0 {
            return Err(invalid("summary.top_k", "must be at least 1"));
        }
        self.summary
            .validate()
            .map_err(|err| invalid("summary", &err.to_string()))?;
        self.csv
            .delimiter_byte()
            .map_err(|err| invalid("csv.delimiter", &err.to_string()))?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Accepts values in `(0, 1]`.
fn check_fraction(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: format!("{value} is outside (0, 1]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.validate().is_ok());
        assert_eq!(settings.store.bucket, "bi-datasets");
        assert_eq!(settings.summary.top_k, 10);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[store]
endpoint = "http://localhost:9000"
bucket = "staging"

[inference]
success_threshold = 0.9

[cadence]
source_columns = ["created_at"]

[summary]
top_k = 3
"#
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.inference.success_threshold, 0.9);
        assert_eq!(
            settings.cadence.source_columns,
            Some(vec!["created_at".to_string()])
        );
        assert_eq!(settings.summary.top_k, 3);
        assert!(settings.store.allows_http());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BUCKET, "prod-datasets"),
            (ENV_ACCESS_KEY, "AKIA"),
            (ENV_REGION, "  "),
        ]);
        let mut settings = Settings::default();
        settings.apply_env_overrides(|name| env.get(name).map(|v| (*v).to_string()));

        assert_eq!(settings.store.bucket, "prod-datasets");
        assert_eq!(settings.store.access_key.as_deref(), Some("AKIA"));
        // Blank values do not override.
        assert_eq!(settings.store.region, "ap-northeast-1");
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.inference.success_threshold = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "inference.success_threshold",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.inference.categorical_ratio = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.summary.top_k = 0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "summary.top_k",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.store.bucket = String::new();
        assert!(settings.validate().is_err());
    }
}
