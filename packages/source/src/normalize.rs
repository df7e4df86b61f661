//! Raw record normalization.
//!
//! Converts heterogeneous JSON records from the open-data portal into
//! canonical [`Incident`] values using the ordered [`FieldRules`] of the
//! source definition.

use chrono::{DateTime, Utc};
use crime_heatmap_source_models::Incident;

use crate::parsing::{parse_coordinate, parse_incident_date, value_as_text};
use crate::source_def::{FieldRule, FieldRules};
use crate::type_mapping::map_crime_type;

/// Description used when a record carries no crime type at all.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

impl FieldRules {
    /// Normalizes one raw record, using the current time as the fallback
    /// occurrence date.
    ///
    /// Returns `None` when either coordinate is missing or not numeric.
    #[must_use]
    pub fn normalize(&self, record: &serde_json::Value) -> Option<Incident> {
        self.normalize_at(record, Utc::now())
    }

    /// Normalizes one raw record, using `now` as the fallback occurrence
    /// date.
    ///
    /// Returns `None` when either coordinate is missing or not numeric.
    #[must_use]
    pub fn normalize_at(&self, record: &serde_json::Value, now: DateTime<Utc>) -> Option<Incident> {
        let latitude = parse_coordinate(self.latitude.first_present(record)?)?;
        let longitude = parse_coordinate(self.longitude.first_present(record)?)?;

        let description =
            text_field(&self.crime_type, record).unwrap_or_else(|| UNKNOWN_DESCRIPTION.to_string());
        let category = map_crime_type(&description);

        let occurred_at = match text_field(&self.occurred_at, record) {
            Some(raw) => parse_incident_date(&raw).unwrap_or_else(|| {
                log::warn!("Could not parse date {raw:?}, using current time");
                now
            }),
            None => now,
        };

        Some(Incident {
            latitude,
            longitude,
            category,
            occurred_at,
            description,
            address: text_field(&self.address, record).unwrap_or_default(),
            neighborhood: text_field(&self.neighborhood, record).unwrap_or_default(),
        })
    }

    /// Normalizes a batch of raw records, dropping those without usable
    /// coordinates. Output preserves input order.
    #[must_use]
    pub fn normalize_all(&self, records: &[serde_json::Value]) -> Vec<Incident> {
        let now = Utc::now();
        let incidents: Vec<Incident> = records
            .iter()
            .filter_map(|record| self.normalize_at(record, now))
            .collect();

        let dropped = records.len() - incidents.len();
        if dropped > 0 {
            log::debug!(
                "Dropped {dropped} of {} records without usable coordinates",
                records.len()
            );
        }

        incidents
    }
}

/// First present candidate of `rule`, rendered as text.
fn text_field(rule: &FieldRule, record: &serde_json::Value) -> Option<String> {
    rule.first_present(record).and_then(value_as_text)
}
