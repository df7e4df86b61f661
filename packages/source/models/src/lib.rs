#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical incident format and dataset provenance types.
//!
//! Records fetched from the open-data portal and records produced by the
//! synthetic generator both end up as [`Incident`] values. A [`Dataset`]
//! tags a collection with where it came from so the two are never mixed.

use chrono::{DateTime, Utc};
use crime_heatmap_crime_models::IncidentCategory;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A crime incident normalized to the canonical schema.
///
/// Incidents are never mutated after creation. Coordinates are always
/// present; records without usable coordinates are dropped during
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Normalized crime category.
    pub category: IncidentCategory,
    /// When the crime occurred. Falls back to the normalization time when
    /// the source date is missing or unparseable.
    pub occurred_at: DateTime<Utc>,
    /// Free-text label, usually the raw source category.
    pub description: String,
    /// Street address, empty when unknown.
    pub address: String,
    /// Neighborhood (barrio), empty when unknown.
    pub neighborhood: String,
}

/// Where a [`Dataset`]'s incidents came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DataOrigin {
    /// Normalized records from the open-data API.
    Real,
    /// Generated placeholder records.
    Synthetic,
}

/// An incident collection together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Where the incidents came from.
    pub origin: DataOrigin,
    /// The incidents, in source order.
    pub incidents: Vec<Incident>,
}

impl Dataset {
    /// Wraps normalized API incidents.
    #[must_use]
    pub const fn real(incidents: Vec<Incident>) -> Self {
        Self {
            origin: DataOrigin::Real,
            incidents,
        }
    }

    /// Wraps generated incidents.
    #[must_use]
    pub const fn synthetic(incidents: Vec<Incident>) -> Self {
        Self {
            origin: DataOrigin::Synthetic,
            incidents,
        }
    }

    /// Returns `true` when the incidents were generated rather than fetched.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self.origin, DataOrigin::Synthetic)
    }

    /// Number of incidents in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Returns `true` when the collection holds no incidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}
