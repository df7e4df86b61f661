//! Config-driven source definition.
//!
//! [`SourceDefinition`] captures everything specific to the open-data
//! portal: the CKAN endpoint, the ordered field-name candidates used to
//! pull values out of heterogeneous records, and the bounds used for
//! synthetic fallback data. The Bogotá definition is embedded at compile
//! time.

use serde::Deserialize;

use crate::SourceError;

/// The embedded Bogotá open-data definition.
const BOGOTA_TOML: &str = include_str!("../sources/bogota.toml");

/// A complete, config-driven data source definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"bogota_datos_abiertos"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// City covered by this source.
    pub city: String,
    /// How to reach the CKAN datastore.
    pub fetcher: CkanFetcherConfig,
    /// Ordered field-name candidates for normalization.
    pub fields: FieldRules,
    /// Bounds and defaults for synthetic fallback data.
    pub synthetic: SyntheticConfig,
}

impl SourceDefinition {
    /// Returns the embedded Bogotá definition.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Definition`] if the embedded TOML is malformed.
    pub fn bogota() -> Result<Self, SourceError> {
        parse_source_toml(BOGOTA_TOML)
    }
}

/// CKAN datastore endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CkanFetcherConfig {
    /// Public API base URL (e.g.,
    /// `"https://datosabiertos.bogota.gov.co/api/3/action"`).
    pub api_url: String,
    /// Path of the development proxy on a local server (e.g., `"/api/proxy"`).
    pub local_api_path: String,
    /// CKAN resource ID of the crime dataset.
    pub resource_id: String,
    /// Maximum number of records requested.
    pub limit: u64,
}

/// An ordered list of candidate field names.
///
/// Candidates are tried in priority order and the first present, non-null,
/// non-empty value wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldRule(pub Vec<String>);

impl FieldRule {
    /// Returns the first candidate value that is present, non-null, and not
    /// an empty string.
    #[must_use]
    pub fn first_present<'a>(&self, record: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        self.0
            .iter()
            .filter_map(|field| record.get(field))
            .find(|value| match value {
                serde_json::Value::Null => false,
                serde_json::Value::String(s) => !s.is_empty(),
                _ => true,
            })
    }
}

impl<const N: usize> From<[&str; N]> for FieldRule {
    fn from(fields: [&str; N]) -> Self {
        Self(fields.iter().map(ToString::to_string).collect())
    }
}

/// Field rules for every canonical incident field.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRules {
    /// Latitude candidates.
    pub latitude: FieldRule,
    /// Longitude candidates.
    pub longitude: FieldRule,
    /// Crime type candidates; the value doubles as the description.
    pub crime_type: FieldRule,
    /// Occurrence date candidates.
    pub occurred_at: FieldRule,
    /// Street address candidates.
    pub address: FieldRule,
    /// Neighborhood candidates.
    pub neighborhood: FieldRule,
}

/// Bounds and defaults for synthetic incidents.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticConfig {
    /// Number of incidents generated per fallback.
    pub count: usize,
    /// Southern edge of the bounding box.
    pub lat_min: f64,
    /// Northern edge of the bounding box.
    pub lat_max: f64,
    /// Western edge of the bounding box.
    pub lng_min: f64,
    /// Eastern edge of the bounding box.
    pub lng_max: f64,
    /// Incidents are spread over this many days before "now".
    pub days_back: i64,
    /// Highest street number in generated addresses.
    pub street_max: u32,
    /// Highest block number in generated addresses.
    pub block_max: u32,
    /// Number of distinct generated neighborhoods.
    pub neighborhood_count: u32,
}

/// Parses a TOML string into a [`SourceDefinition`].
///
/// # Errors
///
/// Returns [`SourceError::Definition`] if the TOML is malformed or missing
/// required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, SourceError> {
    Ok(toml::de::from_str(toml_str)?)
}
