//! Wire types for the routing service.
//!
//! Field names follow the service's camelCase JSON. Response types are
//! deserialized tolerantly: optional metadata gets defaults so a record
//! with a sparse payload still decodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A coordinate pair as the service spells it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for LatLng {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

impl From<LatLng> for GeoPoint {
    fn from(value: LatLng) -> Self {
        GeoPoint::new(value.latitude, value.longitude)
    }
}

/// Severity of a reported danger zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DangerLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A reported hazardous-area record.
///
/// Owned by the service; the session holds a read-only cached snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DangerZone {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub danger_level: DangerLevel,

    pub location: LatLng,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub reported_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub report_count: u32,
}

/// `POST /routes/plan` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanRequest {
    pub start_location: LatLng,
    pub end_location: LatLng,
    /// 0.0 (shortest) to 1.0 (maximum danger avoidance).
    pub safety_preference: f64,
}

/// One leg of a planned route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSegment {
    /// Ordered polyline coordinates.
    pub coordinates: Vec<LatLng>,
}

/// A planned safe route.
///
/// Immutable once received; replaced wholesale on each new planning
/// request, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub segments: Vec<RouteSegment>,
    pub start_location: LatLng,
    pub end_location: LatLng,
}

impl Route {
    /// Total number of polyline points across all segments.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.coordinates.len()).sum()
    }
}

/// `POST /danger-zones/report` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DangerZoneReport {
    pub name: String,
    pub description: String,
    pub danger_level: DangerLevel,
    pub location: LatLng,
    pub tags: Vec<String>,
}

/// `POST /emergency/trigger` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable location string shown to emergency contacts.
    pub location: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_level_wire_names() {
        assert_eq!(serde_json::to_string(&DangerLevel::Low).unwrap(), "\"LOW\"");
        assert_eq!(
            serde_json::to_string(&DangerLevel::Critical).unwrap(),
            "\"CRITICAL\""
        );

        let level: DangerLevel = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(level, DangerLevel::High);
    }

    #[test]
    fn test_danger_zone_deserialize_full_record() {
        let json = r#"{
            "id": "dz-42",
            "name": "Dim underpass",
            "description": "Broken street lights",
            "dangerLevel": "HIGH",
            "location": {"latitude": 40.75, "longitude": -73.98},
            "tags": ["poor_lighting", "underpass"],
            "reportedAt": "2026-07-30T21:14:05Z",
            "reportCount": 4
        }"#;

        let zone: DangerZone = serde_json::from_str(json).unwrap();
        assert_eq!(zone.id, "dz-42");
        assert_eq!(zone.danger_level, DangerLevel::High);
        assert_eq!(zone.location.latitude, 40.75);
        assert_eq!(zone.tags.len(), 2);
        assert_eq!(zone.report_count, 4);
        assert!(zone.reported_at.is_some());
    }

    #[test]
    fn test_danger_zone_deserialize_sparse_record() {
        // Only id and location are guaranteed; the rest defaults.
        let json = r#"{
            "id": "dz-1",
            "location": {"latitude": 40.0, "longitude": -73.0}
        }"#;

        let zone: DangerZone = serde_json::from_str(json).unwrap();
        assert_eq!(zone.name, "");
        assert_eq!(zone.danger_level, DangerLevel::Medium);
        assert!(zone.tags.is_empty());
        assert!(zone.reported_at.is_none());
        assert_eq!(zone.report_count, 0);
    }

    #[test]
    fn test_route_plan_request_wire_shape() {
        let request = RoutePlanRequest {
            start_location: LatLng {
                latitude: 40.758,
                longitude: -73.9855,
            },
            end_location: LatLng {
                latitude: 40.7484,
                longitude: -73.9857,
            },
            safety_preference: 0.8,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["startLocation"]["latitude"], 40.758);
        assert_eq!(json["endLocation"]["longitude"], -73.9857);
        assert_eq!(json["safetyPreference"], 0.8);
    }

    #[test]
    fn test_route_deserialize() {
        let json = r#"{
            "segments": [
                {"coordinates": [
                    {"latitude": 40.758, "longitude": -73.9855},
                    {"latitude": 40.754, "longitude": -73.9856}
                ]},
                {"coordinates": [
                    {"latitude": 40.7484, "longitude": -73.9857}
                ]}
            ],
            "startLocation": {"latitude": 40.758, "longitude": -73.9855},
            "endLocation": {"latitude": 40.7484, "longitude": -73.9857}
        }"#;

        let route: Route = serde_json::from_str(json).unwrap();
        assert_eq!(route.segments.len(), 2);
        assert_eq!(route.point_count(), 3);
        assert_eq!(route.start_location.latitude, 40.758);
    }

    #[test]
    fn test_emergency_alert_omits_missing_audio() {
        let alert = EmergencyAlert {
            latitude: 40.758,
            longitude: -73.9855,
            location: "40.75800, -73.98550".to_string(),
            reason: "Emergency triggered from map".to_string(),
            audio_snippet: None,
        };

        let json = serde_json::to_value(&alert).unwrap();
        assert!(json.get("audioSnippet").is_none());
        assert_eq!(json["reason"], "Emergency triggered from map");
    }

    #[test]
    fn test_latlng_geopoint_round_trip() {
        let point = GeoPoint::new(40.758, -73.9855);
        let wire: LatLng = point.into();
        let back: GeoPoint = wire.into();
        assert_eq!(point, back);
    }
}
