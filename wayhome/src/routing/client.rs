//! Routing service trait and HTTP implementation.
//!
//! The [`RoutingApi`] trait abstracts the collaborator so the session can
//! be driven by a mock in tests. The [`HttpRoutingApi`] implementation
//! talks to the real service via `reqwest`, attaching the caller's bearer
//! token when one is configured (token acquisition and storage live
//! elsewhere).

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{DangerZone, DangerZoneReport, EmergencyAlert, Route, RoutePlanRequest};

/// Default HTTP timeout for routing service calls.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for the routing collaborator's four operations.
pub trait RoutingApi: Send + Sync {
    /// Request a safe route between two points.
    fn plan_route(
        &self,
        request: &RoutePlanRequest,
    ) -> impl Future<Output = Result<Route, ApiError>> + Send;

    /// Fetch hazard records within `radius_meters` of a position.
    fn nearby_danger_zones(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> impl Future<Output = Result<Vec<DangerZone>, ApiError>> + Send;

    /// Submit a new danger-zone report.
    fn report_danger_zone(
        &self,
        report: &DangerZoneReport,
    ) -> impl Future<Output = Result<DangerZone, ApiError>> + Send;

    /// Submit an emergency alert.
    fn trigger_emergency(
        &self,
        alert: &EmergencyAlert,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Routing service client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling and timeouts.
pub struct HttpRoutingApi {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// Service base URL, e.g. `https://host/api`.
    base_url: String,

    /// Bearer token attached to every request, if configured.
    bearer_token: Option<String>,
}

impl HttpRoutingApi {
    /// Create a client for the given base URL.
    pub fn new(base_url: String, bearer_token: Option<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Json(e.to_string()))
    }
}

impl RoutingApi for HttpRoutingApi {
    async fn plan_route(&self, request: &RoutePlanRequest) -> Result<Route, ApiError> {
        let response = self
            .request(reqwest::Method::POST, "/routes/plan")
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let route: Route = Self::decode(response).await?;

        tracing::debug!(
            segments = route.segments.len(),
            points = route.point_count(),
            "Route plan received"
        );

        Ok(route)
    }

    async fn nearby_danger_zones(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Vec<DangerZone>, ApiError> {
        let response = self
            .request(reqwest::Method::GET, "/danger-zones/nearby")
            .query(&[
                ("latitude", latitude),
                ("longitude", longitude),
                ("radius", radius_meters),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let zones: Vec<DangerZone> = Self::decode(response).await?;

        tracing::debug!(latitude, longitude, zones = zones.len(), "Nearby danger zones fetched");

        Ok(zones)
    }

    async fn report_danger_zone(&self, report: &DangerZoneReport) -> Result<DangerZone, ApiError> {
        let response = self
            .request(reqwest::Method::POST, "/danger-zones/report")
            .json(report)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Self::decode(response).await
    }

    async fn trigger_emergency(&self, alert: &EmergencyAlert) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::POST, "/emergency/trigger")
            .json(alert)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
            });
        }

        tracing::info!(
            latitude = alert.latitude,
            longitude = alert.longitude,
            "Emergency alert accepted by service"
        );

        Ok(())
    }
}
