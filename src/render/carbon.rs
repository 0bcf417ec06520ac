use chrono::{DateTime, TimeZone};
use serde_json::{json, Value};

use crate::layers::route_network::RouteNetwork;

use super::deck::{Deck, Layer, LayerType, Page, ViewState};
use super::error::Error;
use super::legend;

pub const CARBON_VIEW: ViewState = ViewState::new(23.0, 120.2, 10.0);
pub const CARBON_TOOLTIP: &str = "{length_km} km, {carbon_emissions_kg} kg CO2";
pub const CARBON_HEADING: &str = "Bus Carbon Emissions in Tainan";
const PATH_WIDTH: u32 = 5;

/// `bus_routes_carbon_emission_<YYYYmmdd_HHMMSS>.html`
pub fn output_file_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "bus_routes_carbon_emission_{}.html",
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// One deck.gl row per route: the feature's properties plus the derived fields.
pub fn route_rows(network: &RouteNetwork) -> Vec<Value> {
    network
        .routes
        .iter()
        .map(|route| {
            let mut row = route.properties.clone();
            row.insert("coordinates".to_string(), json!(route.path()));
            row.insert("length_km".to_string(), json!(round3(route.length_km)));
            row.insert(
                "carbon_emissions_kg".to_string(),
                json!(round3(route.carbon_emissions_kg)),
            );
            row.insert("color".to_string(), json!(route.level.rgb()));
            row.insert("emission_level".to_string(), json!(route.level));
            Value::Object(row)
        })
        .collect()
}

pub fn carbon_deck(network: &RouteNetwork) -> Result<Deck, Error> {
    let summary = network.emission_summary()?;
    let mut description = legend::render_legend(CARBON_HEADING, &legend::emission_labels())?;
    description.push('\n');
    description.push_str(&legend::observed_range(&summary));

    let layer = Layer::new(LayerType::PathLayer, "bus-routes", route_rows(network))
        .prop("pickable", json!(true))
        .prop("widthMinPixels", json!(1))
        .accessor("getPath", json!("coordinates"))
        .accessor("getWidth", json!(PATH_WIDTH))
        .accessor("getColor", json!("color"));

    Ok(Deck::new(CARBON_VIEW)
        .layer(layer)
        .tooltip(CARBON_TOOLTIP)
        .description(description))
}

/// Render the carbon emission map page for a route network.
pub fn render_carbon_map(network: &RouteNetwork) -> Result<String, Error> {
    carbon_deck(network)?.to_html(&Page::new(CARBON_HEADING))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::route_network::LengthMethod;
    use chrono::Utc;

    const ROUTES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"route_name": "Green 1"},
             "geometry": {"type": "LineString", "coordinates": [[120.20, 23.0], [120.24, 23.0]]}},
            {"type": "Feature", "properties": {"route_name": "Red 2"},
             "geometry": {"type": "MultiLineString", "coordinates": [
                [[120.0, 23.0], [120.5, 23.0]],
                [[120.5, 23.1], [120.9, 23.1]]]}}
        ]
    }"#;

    #[test]
    fn test_output_file_name() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            output_file_name(&timestamp),
            "bus_routes_carbon_emission_20240309_070501.html"
        );
    }

    #[test]
    fn test_route_rows() {
        let network = RouteNetwork::from_geojson_str(ROUTES, LengthMethod::WebMercator).unwrap();
        let rows = route_rows(&network);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["route_name"], "Green 1");
        assert_eq!(rows[0]["color"], json!([0, 128, 0]));
        assert_eq!(rows[0]["emission_level"], "Low");
        assert_eq!(rows[1]["color"], json!([255, 0, 0]));
        assert_eq!(rows[1]["coordinates"].as_array().unwrap().len(), 4);
        let length = rows[0]["length_km"].as_f64().unwrap();
        let emissions = rows[0]["carbon_emissions_kg"].as_f64().unwrap();
        assert!((emissions - length * 0.804).abs() < 0.01);
    }

    #[test]
    fn test_render_carbon_map() {
        let network = RouteNetwork::from_geojson_str(ROUTES, LengthMethod::WebMercator).unwrap();
        let html = render_carbon_map(&network).unwrap();
        assert!(html.contains("<h2>Bus Carbon Emissions in Tainan</h2>"));
        assert!(html.contains("\"type\":\"PathLayer\""));
        assert!(html.contains("{length_km} km, {carbon_emissions_kg} kg CO2"));
        assert!(html.contains("\"latitude\":23.0"));
    }

    #[test]
    fn test_empty_network_fails() {
        let network = RouteNetwork { routes: vec![] };
        assert!(matches!(render_carbon_map(&network), Err(Error::Layers(_))));
    }
}
