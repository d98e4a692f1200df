//! Dataset and dashboard registry.
//!
//! Maps dataset ids to store keys and dashboard charts to dataset ids:
//!
//! ```toml
//! [datasets.daily_sales]
//! path = "sales/daily.csv"
//!
//! [datasets.video_events]
//! path = "events/videos"
//! format = "parquet"
//!
//! [dashboards.sales.charts]
//! revenue = "daily_sales"
//! orders = "daily_sales"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use datalens_model::{DatasetFormat, DatasetKey, DatasetKeyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or querying the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("dataset '{id}' is not registered")]
    UnknownDataset { id: String },

    #[error("dashboard '{id}' is not registered")]
    UnknownDashboard { id: String },

    #[error("chart '{chart}' has no dataset in dashboard '{dashboard}'")]
    UnknownChart { dashboard: String, chart: String },

    #[error("no charts given for dashboard '{dashboard}'")]
    NoCharts { dashboard: String },

    #[error("charts of dashboard '{dashboard}' use several datasets: {}", datasets.join(", "))]
    MultipleDatasets {
        dashboard: String,
        datasets: Vec<String>,
    },

    #[error("dataset '{id}' has an invalid path: {source}")]
    InvalidKey {
        id: String,
        #[source]
        source: DatasetKeyError,
    },
}

impl RegistryError {
    /// True when a looked-up id is not registered.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownDataset { .. } | Self::UnknownDashboard { .. } | Self::UnknownChart { .. }
        )
    }
}

/// Where a dataset lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub path: String,
    /// Overrides the format derived from the path's extension.
    #[serde(default)]
    pub format: Option<DatasetFormat>,
}

/// Chart id to dataset id for one dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardEntry {
    #[serde(default)]
    pub charts: BTreeMap<String, String>,
}

/// Registry of datasets and the dashboards that read them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetRegistry {
    pub datasets: BTreeMap<String, DatasetEntry>,
    pub dashboards: BTreeMap<String, DashboardEntry>,
}

impl DatasetRegistry {
    /// Loads a registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(contents)?)
    }

    /// The store key of a registered dataset.
    pub fn dataset_key(&self, id: &str) -> Result<DatasetKey, RegistryError> {
        let entry = self
            .datasets
            .get(id)
            .ok_or_else(|| RegistryError::UnknownDataset { id: id.to_string() })?;
        let key = match entry.format {
            Some(format) => DatasetKey::with_format(&entry.path, format),
            None => DatasetKey::parse(&entry.path),
        };
        key.map_err(|source| RegistryError::InvalidKey {
            id: id.to_string(),
            source,
        })
    }

    /// The dataset id a chart reads from.
    pub fn dataset_id(&self, dashboard: &str, chart: &str) -> Result<&str, RegistryError> {
        let entry = self
            .dashboards
            .get(dashboard)
            .ok_or_else(|| RegistryError::UnknownDashboard {
                id: dashboard.to_string(),
            })?;
        entry
            .charts
            .get(chart)
            .map(String::as_str)
            .ok_or_else(|| RegistryError::UnknownChart {
                dashboard: dashboard.to_string(),
                chart: chart.to_string(),
            })
    }

    /// The one dataset shared by all `charts` of a dashboard.
    ///
    /// # Errors
    ///
    /// Fails if `charts` is empty, a chart is unknown, or the charts read
    /// from more than one dataset.
    pub fn resolve_single_dataset_id<S: AsRef<str>>(
        &self,
        dashboard: &str,
        charts: &[S],
    ) -> Result<&str, RegistryError> {
        let ids = charts
            .iter()
            .map(|chart| self.dataset_id(dashboard, chart.as_ref()))
            .collect::<Result<BTreeSet<&str>, _>>()?;
        let mut iter = ids.iter();
        match (iter.next(), iter.next()) {
            (Some(id), None) => Ok(*id),
            (None, _) => Err(RegistryError::NoCharts {
                dashboard: dashboard.to_string(),
            }),
            (Some(_), Some(_)) => Err(RegistryError::MultipleDatasets {
                dashboard: dashboard.to_string(),
                datasets: ids.iter().map(ToString::to_string).collect(),
            }),
        }
    }
}
