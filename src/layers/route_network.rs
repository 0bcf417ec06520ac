use std::path::Path;

use clap::ValueEnum;
use geo::MapCoords;
use geo_types::MultiLineString;
use geojson::{Feature, JsonObject};
use serde::Serialize;

use super::error::Error;
use super::features;
use super::geo_util;

/// Diesel burned per bus kilometre.
pub const FUEL_LITERS_PER_KM: f64 = 0.3;
/// CO2 released per litre of diesel.
pub const KG_CO2_PER_LITER: f64 = 2.68;
/// Upper bound (exclusive) of the low emission bucket.
pub const LOW_EMISSION_KG: f64 = 10.0;
/// Upper bound (exclusive) of the medium emission bucket.
pub const MEDIUM_EMISSION_KG: f64 = 30.0;

/// How route length is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LengthMethod {
    /// Euclidean length in EPSG:3857 meters.
    #[default]
    WebMercator,
    /// Great-circle length on the WGS84 mean sphere.
    Haversine,
}

/// Emission bucket of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EmissionLevel {
    Low,
    Medium,
    High,
}

impl EmissionLevel {
    pub fn classify(carbon_emissions_kg: f64) -> EmissionLevel {
        if carbon_emissions_kg < LOW_EMISSION_KG {
            EmissionLevel::Low
        } else if carbon_emissions_kg < MEDIUM_EMISSION_KG {
            EmissionLevel::Medium
        } else {
            EmissionLevel::High
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            EmissionLevel::Low => [0, 128, 0],
            EmissionLevel::Medium => [255, 165, 0],
            EmissionLevel::High => [255, 0, 0],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmissionLevel::Low => "Low Emissions",
            EmissionLevel::Medium => "Medium Emissions",
            EmissionLevel::High => "High Emissions",
        }
    }
}

/// Estimated kg of CO2 for a bus covering `length_km`.
pub fn emissions_kg(length_km: f64) -> f64 {
    length_km * FUEL_LITERS_PER_KM * KG_CO2_PER_LITER
}

/// Length of every part of a WGS84 geometry, summed, in kilometres.
///
/// Gaps between parts are not counted.
pub fn route_length_km(geometry: &MultiLineString, method: LengthMethod) -> f64 {
    let meters: f64 = match method {
        LengthMethod::WebMercator => geometry
            .map_coords(geo_util::web_mercator)
            .0
            .iter()
            .map(geo_util::euclidean_length)
            .sum(),
        LengthMethod::Haversine => geometry.0.iter().map(geo_util::haversine_length).sum(),
    };
    meters / 1000.0
}

/// Concatenates the parts of a geometry into one ordered `[lng, lat]` path.
pub fn flatten_parts(geometry: &MultiLineString) -> Vec<[f64; 2]> {
    geometry
        .0
        .iter()
        .flat_map(|line| line.coords().map(|c| [c.x, c.y]))
        .collect()
}

pub struct TransitRoute {
    pub geometry: MultiLineString,
    pub properties: JsonObject,
    pub length_km: f64,
    pub carbon_emissions_kg: f64,
    pub level: EmissionLevel,
}

impl TransitRoute {
    pub fn new(geometry: MultiLineString, properties: JsonObject, method: LengthMethod) -> Self {
        let length_km = route_length_km(&geometry, method);
        let carbon_emissions_kg = emissions_kg(length_km);
        TransitRoute {
            geometry,
            properties,
            length_km,
            carbon_emissions_kg,
            level: EmissionLevel::classify(carbon_emissions_kg),
        }
    }

    pub fn path(&self) -> Vec<[f64; 2]> {
        flatten_parts(&self.geometry)
    }

    pub fn point_count(&self) -> usize {
        self.geometry.0.iter().map(|line| line.0.len()).sum()
    }
}

/// Emission range over a set of routes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionSummary {
    pub min: f64,
    pub mid: f64,
    pub max: f64,
    pub total: f64,
}

/// The set of transit routes read from a line dataset
pub struct RouteNetwork {
    pub routes: Vec<TransitRoute>,
}

impl RouteNetwork {
    pub fn print_stats(&self) {
        log::info!("Route network:");
        log::info!("  Routes: {}", self.routes.len());
        log::info!(
            "  Points: {}",
            self.routes.iter().map(|r| r.point_count()).sum::<usize>()
        );
        for level in [EmissionLevel::Low, EmissionLevel::Medium, EmissionLevel::High] {
            log::info!(
                "  {}: {}",
                level.label(),
                self.routes.iter().filter(|r| r.level == level).count()
            );
        }
    }

    /// Load a route network from a GeoJSON file
    ///
    /// # Parameters
    /// - `path`: Path to a GeoJSON file of `LineString` / `MultiLineString` features
    /// - `method`: How route length is measured
    ///
    /// # Returns
    /// The routes with their length, emissions and bucket computed. Features without a
    /// line geometry are skipped.
    pub fn load<P: AsRef<Path>>(path: P, method: LengthMethod) -> Result<RouteNetwork, Error> {
        log::debug!("Reading routes from {}", path.as_ref().display());
        Ok(RouteNetwork::from_features(features::read_features(path)?, method))
    }

    pub fn from_geojson_str(contents: &str, method: LengthMethod) -> Result<RouteNetwork, Error> {
        Ok(RouteNetwork::from_features(features::parse_features(contents)?, method))
    }

    pub fn from_features(features: Vec<Feature>, method: LengthMethod) -> RouteNetwork {
        let mut routes = Vec::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            let Some(geometry) = &feature.geometry else {
                log::warn!("Skipping feature {}: no geometry", i);
                continue;
            };
            match features::line_geometry(&geometry.value) {
                Some(lines) => {
                    routes.push(TransitRoute::new(lines, features::properties(feature), method))
                }
                None => log::warn!(
                    "Skipping feature {}: unsupported geometry {}",
                    i,
                    features::geometry_type(&geometry.value)
                ),
            }
        }
        RouteNetwork { routes }
    }

    pub fn emission_summary(&self) -> Result<EmissionSummary, Error> {
        if self.routes.is_empty() {
            return Err(Error::EmptyDataset("route network".to_string()));
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut total = 0.0;
        for route in self.routes.iter() {
            min = min.min(route.carbon_emissions_kg);
            max = max.max(route.carbon_emissions_kg);
            total += route.carbon_emissions_kg;
        }
        Ok(EmissionSummary {
            min,
            mid: (min + max) / 2.0,
            max,
            total,
        })
    }
}
