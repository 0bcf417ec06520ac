use serde_json::{json, Value};

use crate::layers::poi::{DensityRange, WeightedPoi};

use super::color::HEATMAP_COLOR_RANGE;
use super::deck::{Deck, Layer, LayerType, Page, ViewState};
use super::error::Error;
use super::legend::GradientLegend;

pub const HEATMAP_VIEW: ViewState = ViewState::new(22.9, 120.1, 11.0).tilted(85.0, 45.0);
pub const HEATMAP_TOOLTIP: &str = "Concentration of POI";
pub const HEATMAP_TITLE: &str = "Crowd Heatmap based on Commercial POI in Tainan";
pub const OUTPUT_FILE_NAME: &str = "poi_heatmap_with_legend.html";
const OPACITY: f64 = 0.9;
const THRESHOLD: f64 = 0.75;

pub fn poi_rows(points: &[WeightedPoi]) -> Vec<Value> {
    points
        .iter()
        .map(|p| json!({ "lng": p.lng, "lat": p.lat, "weight": p.weight }))
        .collect()
}

pub fn heatmap_deck(points: &[WeightedPoi]) -> Deck {
    let layer = Layer::new(LayerType::HeatmapLayer, "poi-heatmap", poi_rows(points))
        .prop("opacity", json!(OPACITY))
        .prop("aggregation", json!("MEAN"))
        .prop("colorRange", json!(HEATMAP_COLOR_RANGE))
        .prop("threshold", json!(THRESHOLD))
        .prop("pickable", json!(true))
        .accessor("getPosition", json!(["lng", "lat"]))
        .accessor("getWeight", json!("weight"));
    Deck::new(HEATMAP_VIEW).layer(layer).tooltip(HEATMAP_TOOLTIP)
}

/// Render the heatmap page with its title and density colorbar.
pub fn render_heatmap_page(points: &[WeightedPoi]) -> Result<String, Error> {
    let range = DensityRange::of(points)?;
    let legend = GradientLegend {
        title: HEATMAP_TITLE,
        colors: &HEATMAP_COLOR_RANGE,
        low_label: format!("Low Density:{} people/area", range.min),
        high_label: format!("High Density:{} people/area", range.max),
    };
    let page = Page::new("Crowd Heatmap")
        .style(&legend.style())
        .overlay(&legend.overlay());
    heatmap_deck(points).to_html(&page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<WeightedPoi> {
        vec![
            WeightedPoi {
                lng: 120.2,
                lat: 23.0,
                weight: 4,
            },
            WeightedPoi {
                lng: 120.21,
                lat: 23.01,
                weight: 1,
            },
        ]
    }

    #[test]
    fn test_heatmap_layer_props() {
        let spec: Value =
            serde_json::from_str(&heatmap_deck(&points()).spec_json().unwrap()).unwrap();
        let layer = &spec["layers"][0];
        assert_eq!(layer["type"], "HeatmapLayer");
        assert_eq!(layer["props"]["aggregation"], "MEAN");
        assert_eq!(layer["props"]["threshold"], 0.75);
        assert_eq!(layer["props"]["colorRange"].as_array().unwrap().len(), 32);
        assert_eq!(layer["props"]["colorRange"][31], json!([3, 49, 122]));
        assert_eq!(layer["accessors"]["getPosition"], json!(["lng", "lat"]));
        assert_eq!(layer["data"][0]["weight"], 4);
        assert_eq!(spec["initialViewState"]["pitch"], 85.0);
        assert_eq!(spec["initialViewState"]["bearing"], 45.0);
    }

    #[test]
    fn test_render_heatmap_page() {
        let html = render_heatmap_page(&points()).unwrap();
        assert!(html.contains("<title>Crowd Heatmap</title>"));
        assert!(html.contains(">Crowd Heatmap based on Commercial POI in Tainan<"));
        assert!(html.contains(">Low Density:1 people/area<"));
        assert!(html.contains(">High Density:4 people/area<"));
        assert!(html.contains(".colorbar {"));
    }

    #[test]
    fn test_empty_heatmap_fails() {
        assert!(matches!(render_heatmap_page(&[]), Err(Error::Layers(_))));
    }
}
