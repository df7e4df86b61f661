//! Map layer presentation.
//!
//! Every call builds brand new layers; nothing is diffed against a
//! previous render.

use crime_heatmap_crime_models::CrimeCategory;
use crime_heatmap_layers_models::{
    DensityLayer, HeatOptions, Marker, MarkerLayer, MarkerStyle, Presentation, Summary,
    TooltipLabel,
};
use crime_heatmap_source_models::Incident;

/// Intensity contributed by each incident to the density layer.
const HEAT_INTENSITY: f64 = 1.0;

/// Display format for tooltip dates (e.g. `15/1/2024`).
const TOOLTIP_DATE_FORMAT: &str = "%-d/%-m/%Y";

/// Substring that marks a theft category in the summary counts.
const THEFT_MARKER: &str = "Hurto";

/// Builds the density layer, marker layer, and summary for `incidents`.
#[must_use]
pub fn present(incidents: &[Incident]) -> Presentation {
    Presentation {
        density: density_layer(incidents),
        markers: marker_layer(incidents),
        summary: summarize(incidents),
    }
}

/// One equal-weight heat sample per incident.
#[must_use]
pub fn density_layer(incidents: &[Incident]) -> DensityLayer {
    DensityLayer {
        points: incidents
            .iter()
            .map(|i| [i.latitude, i.longitude, HEAT_INTENSITY])
            .collect(),
        options: HeatOptions::default(),
    }
}

/// One colored, labeled circle marker per incident.
#[must_use]
pub fn marker_layer(incidents: &[Incident]) -> MarkerLayer {
    MarkerLayer {
        markers: incidents.iter().map(marker).collect(),
    }
}

fn marker(incident: &Incident) -> Marker {
    let color = incident.category.color().to_string();
    Marker {
        latitude: incident.latitude,
        longitude: incident.longitude,
        category: incident.category.name().to_string(),
        style: MarkerStyle {
            radius: 4,
            fill_color: color.clone(),
            color,
            fill_opacity: 0.7,
            weight: 2,
        },
        tooltip: tooltip(incident),
    }
}

/// Builds the hover label for an incident.
#[must_use]
pub fn tooltip(incident: &Incident) -> TooltipLabel {
    TooltipLabel {
        title: incident.description.clone(),
        date: incident.occurred_at.format(TOOLTIP_DATE_FORMAT).to_string(),
        details: [&incident.address, &incident.neighborhood]
            .into_iter()
            .filter(|line| !line.is_empty())
            .cloned()
            .collect(),
    }
}

/// Renders a tooltip as the HTML snippet bound to a map marker. All text
/// is escaped.
#[must_use]
pub fn tooltip_html(label: &TooltipLabel) -> String {
    use std::fmt::Write as _;

    let mut html = format!(
        "<div style=\"font-weight: bold; margin-bottom: 5px;\">{}</div>\
         <div style=\"font-size: 0.9em; color: #666; margin-bottom: 3px;\">{}</div>",
        escape_html(&label.title),
        escape_html(&label.date),
    );
    for line in &label.details {
        let _ = write!(
            html,
            "<div style=\"font-size: 0.8em; color: #888;\">{}</div>",
            escape_html(line)
        );
    }
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Counts incidents for the summary panel.
///
/// Thefts are counted by substring, so every "Hurto a ..." category
/// contributes to the same counter.
#[must_use]
pub fn summarize(incidents: &[Incident]) -> Summary {
    Summary {
        total: incidents.len() as u64,
        homicides: count_where(incidents, |i| i.category.is(CrimeCategory::Homicidio)),
        thefts: count_where(incidents, |i| i.category.name().contains(THEFT_MARKER)),
        injuries: count_where(incidents, |i| {
            i.category.is(CrimeCategory::LesionesPersonales)
        }),
        kidnappings: count_where(incidents, |i| i.category.is(CrimeCategory::Secuestro)),
    }
}

fn count_where(incidents: &[Incident], pred: impl Fn(&Incident) -> bool) -> u64 {
    incidents.iter().filter(|i| pred(i)).count() as u64
}
