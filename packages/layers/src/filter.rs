//! Category and date-range filtering.

use crime_heatmap_layers_models::FilterCriteria;
use crime_heatmap_source_models::Incident;

/// Returns the incidents matching `criteria`, in input order.
///
/// An incident passes when its category name matches the category filter
/// and `from <= occurred_at <= to`. A reversed range (`from > to`) matches
/// nothing.
#[must_use]
pub fn filter(incidents: &[Incident], criteria: &FilterCriteria) -> Vec<Incident> {
    incidents
        .iter()
        .filter(|incident| {
            criteria.category.matches(incident.category.name())
                && criteria.from <= incident.occurred_at
                && incident.occurred_at <= criteria.to
        })
        .cloned()
        .collect()
}
