//! `GeoJSON` export of the marker layer.
//!
//! Map widgets that load vector sources directly can consume the marker
//! layer as a `FeatureCollection` of points, with the marker style and the
//! rendered tooltip carried in each feature's properties.

use crime_heatmap_layers_models::{Marker, MarkerLayer};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::present::tooltip_html;

/// Converts a marker layer to a `GeoJSON` `FeatureCollection`.
#[must_use]
pub fn markers_to_feature_collection(layer: &MarkerLayer) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: layer.markers.iter().map(marker_feature).collect(),
        foreign_members: None,
    }
}

fn marker_feature(marker: &Marker) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("category".to_string(), marker.category.clone().into());
    properties.insert("color".to_string(), marker.style.color.clone().into());
    properties.insert("radius".to_string(), marker.style.radius.into());
    properties.insert("fillOpacity".to_string(), marker.style.fill_opacity.into());
    properties.insert("title".to_string(), marker.tooltip.title.clone().into());
    properties.insert("date".to_string(), marker.tooltip.date.clone().into());
    properties.insert("tooltipHtml".to_string(), tooltip_html(&marker.tooltip).into());

    Feature {
        bbox: None,
        // GeoJSON positions are [lng, lat]
        geometry: Some(Geometry::new(Value::Point(vec![
            marker.longitude,
            marker.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
