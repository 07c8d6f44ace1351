//! Geocoding client trait and Nominatim implementation.
//!
//! The [`GeocodeClient`] trait abstracts over geocoding providers, letting
//! the session work with any endpoint that resolves free text to
//! coordinate candidates. The [`NominatimClient`] implementation queries an
//! OSM Nominatim-compatible search endpoint via `reqwest`.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use crate::geo::GeoPoint;

use super::error::GeocodeError;

/// Default public Nominatim search endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Default HTTP timeout for geocoding requests.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum candidates requested per query. Only the first is used, but a
/// couple of spares make the "not found" signal unambiguous.
const CANDIDATE_LIMIT: u8 = 5;

/// One geocoding candidate.
#[derive(Debug, Clone)]
pub struct PlaceCandidate {
    /// Resolved coordinates.
    pub point: GeoPoint,
    /// Provider's display label, if any.
    pub display_name: Option<String>,
}

/// Trait for resolving a free-text query to coordinate candidates.
pub trait GeocodeClient: Send + Sync {
    /// Resolve `query` to zero or more candidates, best first.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, GeocodeError>> + Send;
}

/// Nominatim wire record.
///
/// The API returns coordinates as strings and a long tail of fields we
/// ignore.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Geocoding client for Nominatim-compatible endpoints.
///
/// Uses a reusable `reqwest::Client` with connection pooling and timeouts.
pub struct NominatimClient {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// Search endpoint URL.
    search_url: String,
}

impl NominatimClient {
    /// Create a client against the default public endpoint.
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_url(DEFAULT_NOMINATIM_URL.to_string())
    }

    /// Create a client against a custom endpoint.
    pub fn with_url(search_url: String) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        Ok(Self { http, search_url })
    }

    fn parse_candidates(places: Vec<NominatimPlace>) -> Vec<PlaceCandidate> {
        places
            .into_iter()
            .filter_map(|place| {
                let latitude = place.lat.parse::<f64>().ok()?;
                let longitude = place.lon.parse::<f64>().ok()?;
                Some(PlaceCandidate {
                    point: GeoPoint::new(latitude, longitude),
                    display_name: place.display_name,
                })
            })
            .collect()
    }
}

impl GeocodeClient for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        let limit = CANDIDATE_LIMIT.to_string();
        let response = self
            .http
            .get(&self.search_url)
            .query(&[("format", "json"), ("limit", limit.as_str()), ("q", query)])
            .send()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        let places: Vec<NominatimPlace> =
            serde_json::from_slice(&bytes).map_err(|e| GeocodeError::Json(e.to_string()))?;

        let candidates = Self::parse_candidates(places);

        tracing::debug!(
            query,
            candidates = candidates.len(),
            "Geocode query resolved"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = NominatimClient::new().unwrap();
        assert_eq!(client.search_url, DEFAULT_NOMINATIM_URL);
    }

    #[test]
    fn test_place_deserialize_string_coordinates() {
        let json = r#"[{
            "lat": "40.75798",
            "lon": "-73.98554",
            "display_name": "Times Square, Manhattan, New York"
        }]"#;

        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        let candidates = NominatimClient::parse_candidates(places);

        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].point.latitude - 40.75798).abs() < 1e-9);
        assert!((candidates[0].point.longitude - (-73.98554)).abs() < 1e-9);
        assert_eq!(
            candidates[0].display_name.as_deref(),
            Some("Times Square, Manhattan, New York")
        );
    }

    #[test]
    fn test_place_deserialize_ignores_extra_fields() {
        // The real API returns many more fields per place - ensure we
        // tolerate them.
        let json = r#"[{
            "place_id": 123456,
            "licence": "Data (c) OpenStreetMap contributors",
            "osm_type": "node",
            "osm_id": 9876543,
            "boundingbox": ["40.7", "40.8", "-74.0", "-73.9"],
            "lat": "40.75798",
            "lon": "-73.98554",
            "display_name": "Times Square",
            "class": "tourism",
            "type": "attraction",
            "importance": 0.83
        }]"#;

        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].lat, "40.75798");
    }

    #[test]
    fn test_unparsable_coordinates_are_skipped() {
        let json = r#"[
            {"lat": "not-a-number", "lon": "-73.98554", "display_name": "Bad"},
            {"lat": "40.75798", "lon": "-73.98554", "display_name": "Good"}
        ]"#;

        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        let candidates = NominatimClient::parse_candidates(places);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display_name.as_deref(), Some("Good"));
    }

    #[test]
    fn test_empty_result_set() {
        let places: Vec<NominatimPlace> = serde_json::from_str("[]").unwrap();
        assert!(NominatimClient::parse_candidates(places).is_empty());
    }
}
