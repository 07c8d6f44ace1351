//! Geographic primitives shared across the session.
//!
//! Provides the [`GeoPoint`] coordinate type and great-circle distance
//! math used by the danger-zone cache invalidation rule.

mod types;

pub use types::{GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two points in meters (haversine).
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
