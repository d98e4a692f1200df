//! The datalens data layer.
//!
//! [`DataLayer::load_and_summarize`] runs one request end to end:
//!
//! 1. fetch the object from the configured bucket
//! 2. read CSV or Parquet into a [`Frame`](datalens_model::Frame)
//! 3. infer column types
//! 4. derive `_X_seconds` and `_X_week` helper columns
//! 5. summarize every column
//!
//! Failures surface as a [`DataError`], classified by [`ErrorKind`].
//! Configuration comes from [`Settings`]; dashboards resolve their dataset
//! through a [`DatasetRegistry`].
//!
//! # Example
//!
//! ```ignore
//! use datalens_core::{DataLayer, Settings};
//! use datalens_model::DatasetKey;
//!
//! let layer = DataLayer::new(Settings::from_env()?)?;
//! let (frame, summary) = layer
//!     .load_and_summarize(&DatasetKey::parse("sales/daily.csv")?)
//!     .await?;
//! ```

mod error;
mod pipeline;
mod registry;
mod settings;

pub use error::{DataError, ErrorKind};
pub use pipeline::{DataLayer, LoadOptions, prepare_frame, summarize_bytes};
pub use registry::{DashboardEntry, DatasetEntry, DatasetRegistry, RegistryError};
pub use settings::{
    ENV_ACCESS_KEY, ENV_BUCKET, ENV_ENDPOINT, ENV_REGION, ENV_SECRET_KEY, Settings, SettingsError,
};
