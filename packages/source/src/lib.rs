#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime data fetching, record normalization, and synthetic fallback.
//!
//! The [`data_source::DataSource`] fetches raw records through a
//! [`RecordFetcher`], normalizes them with the field rules from the
//! embedded [`source_def::SourceDefinition`], and falls back to
//! [`synthetic::SyntheticGenerator`] output whenever no real incidents are
//! available.

pub mod ckan;
pub mod data_source;
pub mod normalize;
pub mod parsing;
pub mod source_def;
pub mod synthetic;
pub mod type_mapping;

use async_trait::async_trait;

/// Errors that can occur while fetching data from the open-data API.
///
/// None of these are fatal: the data source downgrades every variant to
/// synthetic data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or DNS failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP error status: {status}")]
    HttpStatus {
        /// The HTTP status code received.
        status: u16,
    },

    /// The response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response JSON lacked the success flag or the records list.
    #[error("Invalid API response structure: {message}")]
    Schema {
        /// Description of what was missing.
        message: String,
    },

    /// The embedded source definition could not be parsed.
    #[error("Invalid source definition: {0}")]
    Definition(#[from] toml::de::Error),
}

/// Something that can produce raw JSON records for normalization.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetches the raw records.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails, the server answers with
    /// a non-success status, or the response is structurally invalid.
    async fn fetch_records(&self) -> Result<Vec<serde_json::Value>, SourceError>;
}
