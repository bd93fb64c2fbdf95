//! Coordinate type and geographic math.
//!
//! Two axis conventions meet in this crate: internal code is
//! latitude-first, the directions provider wants longitude-first.
//! Named fields plus explicit conversion points keep the two from
//! being swapped silently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds from a provider-order (lng, lat) pair, e.g. a GeoJSON
    /// position.
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self { lat, lng }
    }

    /// Provider wire order.
    pub fn lng_lat(&self) -> (f64, f64) {
        (self.lng, self.lat)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Serializes waypoints into the provider path segment: `lng,lat`
/// pairs at six decimal places, joined by `;`.
pub fn wire_path(coords: &[Coordinate]) -> String {
    coords
        .iter()
        .map(|c| format!("{:.6},{:.6}", c.lng, c.lat))
        .collect::<Vec<_>>()
        .join(";")
}

/// Great-circle distance between two coordinates in meters.
pub fn haversine_m(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c * 1000.0
}

/// Whether two coordinates lie within `radius_km` of each other.
pub fn is_near(a: Coordinate, b: Coordinate, radius_km: f64) -> bool {
    haversine_m(a, b) <= radius_km * 1000.0
}

/// Axis-aligned bounding box, grown by extending with coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl LatLngBounds {
    /// A degenerate box containing only `at`.
    pub fn new(at: Coordinate) -> Self {
        Self {
            min_lat: at.lat,
            max_lat: at.lat,
            min_lng: at.lng,
            max_lng: at.lng,
        }
    }

    /// Grows the box to include `at`.
    pub fn extend(&mut self, at: Coordinate) {
        self.min_lat = self.min_lat.min(at.lat);
        self.max_lat = self.max_lat.max(at.lat);
        self.min_lng = self.min_lng.min(at.lng);
        self.max_lng = self.max_lng.max(at.lng);
    }

    /// Bounding box over a coordinate list; `None` when it is empty.
    pub fn from_coordinates(coords: &[Coordinate]) -> Option<Self> {
        let (first, rest) = coords.split_first()?;
        let mut bounds = Self::new(*first);
        for coord in rest {
            bounds.extend(*coord);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    pub fn contains(&self, at: Coordinate) -> bool {
        at.lat >= self.min_lat
            && at.lat <= self.max_lat
            && at.lng >= self.min_lng
            && at.lng <= self.max_lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let at = Coordinate::new(36.1, -115.1);
        assert!(haversine_m(at, at) < 1.0, "same point should be ~0 m");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Las Vegas to Los Angeles, ~370 km.
        let vegas = Coordinate::new(36.17, -115.14);
        let la = Coordinate::new(34.05, -118.24);
        let dist = haversine_m(vegas, la);
        assert!(
            dist > 350_000.0 && dist < 400_000.0,
            "LV to LA should be ~370 km, got {} m",
            dist
        );
    }

    #[test]
    fn test_wire_path_axis_order() {
        // Internal (lat, lng) must serialize as lng,lat pairs.
        let coords = vec![
            Coordinate::new(37.7749, -122.4194),
            Coordinate::new(37.7760, -122.4180),
            Coordinate::new(37.7790, -122.4150),
        ];
        assert_eq!(
            wire_path(&coords),
            "-122.419400,37.774900;-122.418000,37.776000;-122.415000,37.779000"
        );
    }

    #[test]
    fn test_wire_path_empty() {
        assert_eq!(wire_path(&[]), "");
    }

    #[test]
    fn test_from_lng_lat_flips_axes() {
        let coord = Coordinate::from_lng_lat(-122.4194, 37.7749);
        assert_eq!(coord.lat, 37.7749);
        assert_eq!(coord.lng, -122.4194);
        assert_eq!(coord.lng_lat(), (-122.4194, 37.7749));
    }

    #[test]
    fn test_display_is_lat_first() {
        let coord = Coordinate::new(37.7749, -122.4194);
        assert_eq!(coord.to_string(), "37.7749, -122.4194");
    }

    #[test]
    fn test_is_near_radius() {
        let a = Coordinate::new(37.0, -122.0);
        let close = Coordinate::new(37.0005, -122.0); // ~55 m
        let far = Coordinate::new(37.002, -122.0); // ~220 m
        assert!(is_near(a, close, 0.1));
        assert!(!is_near(a, far, 0.1));
    }

    #[test]
    fn test_bounds_extend_and_contains() {
        let mut bounds = LatLngBounds::new(Coordinate::new(37.0, -122.0));
        bounds.extend(Coordinate::new(38.0, -121.0));

        assert!(bounds.contains(Coordinate::new(37.5, -121.5)));
        assert!(!bounds.contains(Coordinate::new(36.9, -121.5)));

        let center = bounds.center();
        assert!((center.lat - 37.5).abs() < 1e-9);
        assert!((center.lng - -121.5).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_from_empty_list() {
        assert!(LatLngBounds::from_coordinates(&[]).is_none());
    }
}
