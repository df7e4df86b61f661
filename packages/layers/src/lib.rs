#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident filtering and map layer presentation.
//!
//! Both steps are pure functions over incident slices: [`filter::filter`]
//! selects the incidents matching a [`FilterCriteria`], and
//! [`present::present`] turns them into freshly built map layers and
//! summary counts.
//!
//! [`FilterCriteria`]: crime_heatmap_layers_models::FilterCriteria

pub mod filter;
pub mod geojson_export;
pub mod present;

pub use filter::filter;
pub use present::{present, summarize};
