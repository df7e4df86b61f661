#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime heatmap server.
//!
//! These types are serialized to JSON for the REST API consumed by the map
//! page. They are separate from the layer types to allow independent
//! evolution of the API contract.

use chrono::NaiveDate;
use crime_heatmap_crime_models::CrimeCategory;
use crime_heatmap_layers_models::{
    ALL_CATEGORIES, CategoryFilter, FilterCriteria, Presentation, Summary, date_input_instant,
};
use crime_heatmap_source_models::DataOrigin;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// One entry of the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategory {
    /// Selector value (a category name, or `"all"`).
    pub value: String,
    /// Marker color, `None` for the `"all"` entry.
    pub color: Option<String>,
}

impl ApiCategory {
    /// All selector entries: `"all"` first, then every category in
    /// taxonomy order.
    #[must_use]
    pub fn selector_options() -> Vec<Self> {
        std::iter::once(Self {
            value: ALL_CATEGORIES.to_string(),
            color: None,
        })
        .chain(CrimeCategory::all().iter().map(|category| Self {
            value: category.to_string(),
            color: Some(category.color().to_string()),
        }))
        .collect()
    }
}

/// The raw values of the three filter inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInputs {
    /// Category selector value.
    pub category: CategoryFilter,
    /// "From" date input.
    pub date_from: NaiveDate,
    /// "To" date input.
    pub date_to: NaiveDate,
}

impl FilterInputs {
    /// The startup inputs: all categories, today minus 30 days through
    /// today.
    #[must_use]
    pub fn default_for(today: NaiveDate) -> Self {
        let criteria = FilterCriteria::default_for(today);
        Self {
            category: criteria.category,
            date_from: criteria.from.date_naive(),
            date_to: criteria.to.date_naive(),
        }
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(date_from) = update.date_from {
            self.date_from = date_from;
        }
        if let Some(date_to) = update.date_to {
            self.date_to = date_to;
        }
    }

    /// The filter criteria these inputs select.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            category: self.category.clone(),
            from: date_input_instant(self.date_from),
            to: date_input_instant(self.date_to),
        }
    }
}

/// A change to one or more filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    /// New category selector value.
    pub category: Option<CategoryFilter>,
    /// New "from" date.
    pub date_from: Option<NaiveDate>,
    /// New "to" date.
    pub date_to: Option<NaiveDate>,
}

/// Everything the page needs to render the current session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Where the incidents came from, `None` before the first load.
    pub origin: Option<DataOrigin>,
    /// Whether a load is in progress.
    pub loading: bool,
    /// Advisory banner text, if any.
    pub notice: Option<String>,
    /// The active filter inputs.
    pub filter: FilterInputs,
    /// Freshly built layers for the filtered incidents.
    pub presentation: Presentation,
    /// Stats panel counts.
    pub stats: Summary,
}
