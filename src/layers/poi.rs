use std::path::Path;

use geo_types::Point;
use geojson::{Feature, JsonObject};
use rayon::prelude::*;
use rstar::{Envelope, RTree, RTreeObject, AABB};

use super::error::Error;
use super::features;
use super::geo_util;

/// Neighbourhood radius used for the crowd density.
pub const SEARCH_RADIUS_METERS: f64 = 500.0;

pub struct PoiPoint {
    pub geom: Point,
    pub properties: JsonObject,
}

/// A POI with its neighbour count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoi {
    pub lng: f64,
    pub lat: f64,
    pub weight: usize,
}

/// Spatial index over POI positions.
pub struct PoiIndex {
    tree: RTree<RTreeNode>,
    positions: Vec<Point>,
}

struct RTreeNode {
    position: [f64; 2],
    index: usize,
}

impl RTreeObject for RTreeNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PoiIndex {
    pub fn build(positions: Vec<Point>) -> PoiIndex {
        let nodes = positions
            .iter()
            .enumerate()
            .map(|(index, p)| RTreeNode {
                position: [p.x(), p.y()],
                index,
            })
            .collect();
        PoiIndex {
            tree: RTree::bulk_load(nodes),
            positions,
        }
    }

    /// Count the other points within a great-circle radius of point `index`
    ///
    /// # Parameters
    /// - `index`: Position of the point in the indexed set
    /// - `radius_deg`: Central angle in degrees
    ///
    /// # Returns
    /// The number of points, excluding `index` itself, whose haversine central angle
    /// to `index` is at most `radius_deg`. Points sharing the same coordinate count,
    /// and so do points across the antimeridian.
    pub fn count_neighbors(&self, index: usize, radius_deg: f64) -> usize {
        let center = self.positions[index];
        let envelopes = geo_util::search_envelopes(center.y(), center.x(), radius_deg);
        let envelopes = &envelopes;
        envelopes
            .iter()
            .enumerate()
            .flat_map(|(i, envelope)| {
                // wrapped boxes may touch the primary one; keep each node once
                self.tree.locate_in_envelope(envelope).filter(move |node| {
                    envelopes[..i]
                        .iter()
                        .all(|earlier| !earlier.contains_point(&node.position))
                })
            })
            .filter(|node| node.index != index)
            .filter(|node| {
                geo_util::central_angle_deg(center, self.positions[node.index]) <= radius_deg
            })
            .count()
    }

    /// Neighbour count of every point, in input order.
    pub fn count_all_neighbors(&self, radius_deg: f64) -> Vec<usize> {
        (0..self.positions.len())
            .into_par_iter()
            .map(|index| self.count_neighbors(index, radius_deg))
            .collect()
    }
}

/// Min and max neighbour count over a weighted POI set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityRange {
    pub min: usize,
    pub max: usize,
}

impl DensityRange {
    pub fn of(points: &[WeightedPoi]) -> Result<DensityRange, Error> {
        let min = points.iter().map(|p| p.weight).min();
        let max = points.iter().map(|p| p.weight).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok(DensityRange { min, max }),
            _ => Err(Error::EmptyDataset("POI layer".to_string())),
        }
    }
}

/// The set of POIs read from a point dataset
pub struct PoiLayer {
    pub points: Vec<PoiPoint>,
}

impl PoiLayer {
    pub fn print_stats(&self) {
        log::info!("POI layer:");
        log::info!("  Points: {}", self.points.len());
    }

    /// Load POIs from a GeoJSON file
    ///
    /// `Point` features give one POI, `MultiPoint` features one per member. Anything
    /// else is skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PoiLayer, Error> {
        log::debug!("Reading POIs from {}", path.as_ref().display());
        Ok(PoiLayer::from_features(features::read_features(path)?))
    }

    pub fn from_geojson_str(contents: &str) -> Result<PoiLayer, Error> {
        Ok(PoiLayer::from_features(features::parse_features(contents)?))
    }

    pub fn from_features(features: Vec<Feature>) -> PoiLayer {
        let mut points = Vec::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            let Some(geometry) = &feature.geometry else {
                log::warn!("Skipping feature {}: no geometry", i);
                continue;
            };
            match features::point_geometry(&geometry.value) {
                Some(geoms) => points.extend(geoms.into_iter().map(|geom| PoiPoint {
                    geom,
                    properties: features::properties(feature),
                })),
                None => log::warn!(
                    "Skipping feature {}: unsupported geometry {}",
                    i,
                    features::geometry_type(&geometry.value)
                ),
            }
        }
        PoiLayer { points }
    }

    pub fn index(&self) -> PoiIndex {
        PoiIndex::build(self.points.iter().map(|p| p.geom).collect())
    }

    /// Weight every POI by how many other POIs lie within `radius_m` meters.
    ///
    /// The radius is turned into an angular radius with the equatorial
    /// meters-per-degree constant before querying the index.
    pub fn density(&self, radius_m: f64) -> Vec<WeightedPoi> {
        let radius_deg = geo_util::meters_to_degrees(radius_m);
        let counts = self.index().count_all_neighbors(radius_deg);
        self.points
            .iter()
            .zip(counts)
            .map(|(p, weight)| WeightedPoi {
                lng: p.geom.x(),
                lat: p.geom.y(),
                weight,
            })
            .collect()
    }
}
