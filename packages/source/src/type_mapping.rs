//! Crime type mapping utilities.
//!
//! Maps raw open-data crime descriptions to the fixed [`CrimeCategory`]
//! taxonomy by keyword containment.

use crime_heatmap_crime_models::{CrimeCategory, IncidentCategory};

/// Maps a raw crime description to its category.
///
/// The description is uppercased and checked for each category keyword in
/// the taxonomy's declared order; the first keyword contained anywhere in
/// the text wins. Descriptions matching no keyword are passed through
/// verbatim as [`IncidentCategory::Unrecognized`].
#[must_use]
pub fn map_crime_type(raw: &str) -> IncidentCategory {
    let upper = raw.to_uppercase();

    CrimeCategory::all()
        .iter()
        .copied()
        .find(|category| upper.contains(category.source_key()))
        .map_or_else(
            || IncidentCategory::Unrecognized(raw.to_string()),
            IncidentCategory::Known,
        )
}
