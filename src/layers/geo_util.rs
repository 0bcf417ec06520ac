use std::f64::consts::FRAC_PI_4;

use geo::{Coord, Distance, Euclidean, Haversine, Line, LineString, Point};
use rstar::AABB;

const LONGITUDE_DEGREE_METERS: f64 = 111320.0;

/// Mean earth radius used by `geo`'s haversine distance.
const MEAN_EARTH_RADIUS: f64 = 6371008.8;
/// Sphere radius of EPSG:3857.
const WEB_MERCATOR_RADIUS: f64 = 6378137.0;
/// Latitude at which Web Mercator becomes a square world.
const WEB_MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Converts a distance in meters to angular degrees with the equatorial
/// meters-per-degree approximation.
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / LONGITUDE_DEGREE_METERS
}

/// Computes the envelope around a given latitude and longitude that holds every
/// point whose great-circle central angle is at most `radius_deg`.
///
/// # Parameters
/// - `lat`: Latitude in WGS84 coordinates.
/// - `lon`: Longitude in WGS84 coordinates.
/// - `radius_deg`: Central angle in degrees.
///
/// # Returns
/// An axis-aligned bounding box (AABB) in `[lon, lat]` order. The box does not
/// wrap around the antimeridian, see `search_envelopes`.
pub fn compute_envelope(lat: f64, lon: f64, radius_deg: f64) -> AABB<[f64; 2]> {
    // Small pad so points sitting exactly on the radius survive rounding.
    let lat_radius = radius_deg * (1.0 + 1e-9);
    let furthest_lat = (lat.abs() + lat_radius).min(90.0).to_radians();
    let half_angle = (radius_deg.to_radians() / 2.0).sin() / furthest_lat.cos();
    let lon_radius = if half_angle.is_finite() && half_angle < 1.0 {
        (2.0 * half_angle.asin()).to_degrees() * (1.0 + 1e-9)
    } else {
        180.0
    };
    AABB::from_corners(
        [lon - lon_radius, lat - lat_radius],
        [lon + lon_radius, lat + lat_radius],
    )
}

/// Envelopes to query for a radius search around `(lat, lon)`.
///
/// The first entry is `compute_envelope`. When it spills past ±180° longitude, the
/// same box shifted by 360° is added so neighbours across the antimeridian are found.
pub fn search_envelopes(lat: f64, lon: f64, radius_deg: f64) -> Vec<AABB<[f64; 2]>> {
    let envelope = compute_envelope(lat, lon, radius_deg);
    let [min_lon, min_lat] = envelope.lower();
    let [max_lon, max_lat] = envelope.upper();
    let mut envelopes = vec![envelope];
    if min_lon < -180.0 {
        envelopes.push(AABB::from_corners(
            [min_lon + 360.0, min_lat],
            [max_lon + 360.0, max_lat],
        ));
    }
    if max_lon > 180.0 {
        envelopes.push(AABB::from_corners(
            [min_lon - 360.0, min_lat],
            [max_lon - 360.0, max_lat],
        ));
    }
    envelopes
}

pub fn haversine(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    Haversine::distance(Point::new(x1, y1), Point::new(x2, y2))
}

/// Great-circle central angle between two `(lon, lat)` positions, in degrees.
pub fn central_angle_deg(a: Point, b: Point) -> f64 {
    (Haversine::distance(a, b) / MEAN_EARTH_RADIUS).to_degrees()
}

/// Projects a WGS84 `(lon, lat)` coordinate onto EPSG:3857 meters.
pub fn web_mercator(coord: Coord) -> Coord {
    let lat = coord
        .y
        .clamp(-WEB_MERCATOR_MAX_LATITUDE, WEB_MERCATOR_MAX_LATITUDE)
        .to_radians();
    Coord {
        x: WEB_MERCATOR_RADIUS * coord.x.to_radians(),
        y: WEB_MERCATOR_RADIUS * (FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

/// Planar length of a line string whose coordinates are already projected.
pub fn euclidean_length(line_string: &LineString) -> f64 {
    line_string
        .lines()
        .map(|Line { start, end }| Euclidean::distance(Point::from(start), Point::from(end)))
        .sum()
}

/// Great-circle length of a WGS84 line string, in meters.
pub fn haversine_length(line_string: &LineString) -> f64 {
    line_string
        .lines()
        .map(|Line { start, end }| haversine(start.x, start.y, end.x, end.y))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Destination;

    #[test]
    fn test_web_mercator_origin_and_degree() {
        let origin = web_mercator(Coord { x: 0.0, y: 0.0 });
        assert!(origin.x.abs() < 1e-9);
        assert!(origin.y.abs() < 1e-9);

        let one_degree = web_mercator(Coord { x: 1.0, y: 0.0 });
        assert!((one_degree.x - 111319.49).abs() < 0.01);
    }

    #[test]
    fn test_web_mercator_clamps_poles() {
        let pole = web_mercator(Coord { x: 0.0, y: 90.0 });
        assert!(pole.y.is_finite());
        assert!((pole.y - 20037508.34).abs() < 1.0);
    }

    #[test]
    fn test_meters_to_degrees() {
        assert!((meters_to_degrees(500.0) - 0.004491556).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_contains_radius_neighbors() {
        let radius = meters_to_degrees(500.0);
        for &(lat, lon) in &[(0.0, 0.0), (23.0, 120.2), (-60.0, 10.0), (80.0, -45.0)] {
            let envelope = compute_envelope(lat, lon, radius);
            let center = Point::new(lon, lat);
            for bearing in (0..360).step_by(15) {
                let edge = Haversine::destination(
                    center,
                    bearing as f64,
                    (radius * 0.999).to_radians() * MEAN_EARTH_RADIUS,
                );
                assert!(
                    rstar::Envelope::contains_point(&envelope, &[edge.x(), edge.y()]),
                    "missed bearing {} at ({}, {})",
                    bearing,
                    lat,
                    lon
                );
            }
        }
    }

    #[test]
    fn test_search_envelopes_wrap_antimeridian() {
        let radius = meters_to_degrees(500.0);
        assert_eq!(search_envelopes(23.0, 120.2, radius).len(), 1);

        let east = search_envelopes(0.0, 179.999, radius);
        assert_eq!(east.len(), 2);
        assert!(rstar::Envelope::contains_point(&east[1], &[-179.999, 0.0]));

        let west = search_envelopes(0.0, -179.999, radius);
        assert_eq!(west.len(), 2);
        assert!(rstar::Envelope::contains_point(&west[1], &[179.999, 0.0]));
    }

    #[test]
    fn test_central_angle_matches_haversine() {
        let a = Point::new(120.2, 23.0);
        let b = Point::new(120.21, 23.0);
        let angle = central_angle_deg(a, b);
        let meters = haversine(120.2, 23.0, 120.21, 23.0);
        assert!((angle.to_radians() * MEAN_EARTH_RADIUS - meters).abs() < 1e-6);
    }

    #[test]
    fn test_lengths_of_equatorial_degree() {
        let line = LineString::from(vec![(0.0, 0.0), (0.5, 0.0), (1.0, 0.0)]);
        let haversine_km = haversine_length(&line) / 1000.0;
        assert!((haversine_km - 111.195).abs() < 0.01);

        let projected: LineString = line.0.iter().map(|c| web_mercator(*c)).collect();
        let mercator_km = euclidean_length(&projected) / 1000.0;
        assert!((mercator_km - 111.319).abs() < 0.01);
    }
}
