//! Client for the safety routing collaborator service.
//!
//! One service hosts the four operations the map session consumes: safe
//! route planning, danger-zone proximity queries, danger-zone reporting,
//! and emergency triggering. This module provides the wire types, the
//! [`RoutingApi`] trait the session is generic over, and the production
//! [`HttpRoutingApi`] implementation.
//!
//! The route-planning and danger-zone algorithms themselves live on the
//! server; this client only shapes requests and decodes responses.

mod client;
mod error;
mod types;

pub use client::{HttpRoutingApi, RoutingApi};
pub use error::ApiError;
pub use types::{
    DangerLevel, DangerZone, DangerZoneReport, EmergencyAlert, LatLng, Route, RoutePlanRequest,
    RouteSegment,
};
