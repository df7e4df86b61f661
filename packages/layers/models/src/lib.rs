#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter criteria and rendered map layer types for the crime heatmap.
//!
//! These are the values handed to the external map widget: a density
//! layer, a marker layer, and the summary counts. They are plain data and
//! are rebuilt from scratch on every filter change.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Selector value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Default length of the date range, ending today.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Which categories pass the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Every incident matches.
    #[default]
    All,
    /// Only incidents whose category name equals this exactly.
    Named(String),
}

impl CategoryFilter {
    /// Returns `true` if an incident with category `name` passes.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(wanted) => wanted == name,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(value)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL_CATEGORIES.to_string(),
            CategoryFilter::Named(name) => name,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// The active filter: category plus an inclusive date range.
///
/// No validation is performed on the range; `from > to` simply matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Category selector.
    pub category: CategoryFilter,
    /// Inclusive lower bound.
    pub from: DateTime<Utc>,
    /// Inclusive upper bound.
    pub to: DateTime<Utc>,
}

impl FilterCriteria {
    /// The startup filter: all categories, from 30 days before `today`
    /// through `today`.
    #[must_use]
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            category: CategoryFilter::All,
            from: date_input_instant(today - Duration::days(DEFAULT_RANGE_DAYS)),
            to: date_input_instant(today),
        }
    }
}

/// Converts a date input value to the instant it filters on: midnight UTC
/// of that day.
#[must_use]
pub fn date_input_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// A single heat sample: `[latitude, longitude, intensity]`.
pub type HeatPoint = [f64; 3];

/// One color stop of the heat gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientStop {
    /// Position in `0.0..=1.0`.
    pub stop: f64,
    /// CSS color name.
    pub color: String,
}

/// Rendering options for the density layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatOptions {
    /// Point radius in pixels.
    pub radius: u32,
    /// Blur radius in pixels.
    pub blur: u32,
    /// Zoom level at which points reach full intensity.
    pub max_zoom: u8,
    /// Color gradient, ascending by stop.
    pub gradient: Vec<GradientStop>,
}

impl Default for HeatOptions {
    fn default() -> Self {
        let stop = |stop, color: &str| GradientStop {
            stop,
            color: color.to_string(),
        };
        Self {
            radius: 25,
            blur: 15,
            max_zoom: 17,
            gradient: vec![
                stop(0.4, "blue"),
                stop(0.6, "cyan"),
                stop(0.7, "lime"),
                stop(0.8, "yellow"),
                stop(1.0, "red"),
            ],
        }
    }
}

/// Density (heat) layer: one equal-weight sample per incident.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityLayer {
    /// Heat samples.
    pub points: Vec<HeatPoint>,
    /// Rendering options.
    pub options: HeatOptions,
}

impl DensityLayer {
    /// Returns `true` when the layer has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Circle marker styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    /// Circle radius in pixels.
    pub radius: u32,
    /// Stroke color.
    pub color: String,
    /// Fill color.
    pub fill_color: String,
    /// Fill opacity in `0.0..=1.0`.
    pub fill_opacity: f64,
    /// Stroke width in pixels.
    pub weight: u32,
}

/// Hover label attached to a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipLabel {
    /// Bold first line (the incident description).
    pub title: String,
    /// Formatted occurrence date.
    pub date: String,
    /// Optional address and neighborhood lines, empty ones omitted.
    pub details: Vec<String>,
}

/// One hoverable point on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Category display name.
    pub category: String,
    /// Circle styling.
    pub style: MarkerStyle,
    /// Hover label.
    pub tooltip: TooltipLabel,
}

/// Discrete per-incident markers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayer {
    /// Markers in incident order.
    pub markers: Vec<Marker>,
}

impl MarkerLayer {
    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` when the layer has no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Summary counts shown next to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// All incidents.
    pub total: u64,
    /// Incidents categorized exactly as homicide.
    pub homicides: u64,
    /// Incidents whose category name contains "Hurto" (every theft
    /// subcategory, plus unrecognized labels containing that text).
    pub thefts: u64,
    /// Personal injury incidents.
    pub injuries: u64,
    /// Kidnapping incidents.
    pub kidnappings: u64,
}

/// Everything rendered for one filter pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Heat layer.
    pub density: DensityLayer,
    /// Marker layer.
    pub markers: MarkerLayer,
    /// Counts over the presented incidents.
    pub summary: Summary,
}

/// Initial map viewport and base tile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// `[latitude, longitude]` of the initial center.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Tile URL template.
    pub tile_url: String,
    /// Attribution HTML for the tile layer.
    pub attribution: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [4.7110, -74.0721],
            zoom: 12,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn all_selector_parses_to_all() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("Secuestro"),
            CategoryFilter::Named("Secuestro".to_string())
        );
    }

    #[test]
    fn category_filter_serializes_as_selector_value() {
        assert_eq!(serde_json::to_string(&CategoryFilter::All).unwrap(), "\"all\"");
        let parsed: CategoryFilter = serde_json::from_str("\"Homicidio\"").unwrap();
        assert_eq!(parsed, CategoryFilter::Named("Homicidio".to_string()));
    }

    #[test]
    fn named_filter_requires_exact_match() {
        let filter = CategoryFilter::from("Hurto a Personas");
        assert!(filter.matches("Hurto a Personas"));
        assert!(!filter.matches("hurto a personas"));
        assert!(!filter.matches("Hurto a Personas "));
        assert!(CategoryFilter::All.matches("anything"));
    }

    #[test]
    fn default_range_spans_thirty_days_ending_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let criteria = FilterCriteria::default_for(today);
        assert_eq!(criteria.category, CategoryFilter::All);
        assert_eq!(criteria.from, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(criteria.to, Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn default_heat_options_match_renderer_settings() {
        let options = HeatOptions::default();
        assert_eq!((options.radius, options.blur, options.max_zoom), (25, 15, 17));
        assert_eq!(options.gradient.len(), 5);
        assert_eq!(options.gradient[4].color, "red");
    }
}
