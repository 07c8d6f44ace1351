//! WayHome - live safety-map session engine
//!
//! This library provides the core session logic behind the safety-companion
//! map: it turns noisy, intermittently-available geolocation fixes into a
//! stable position estimate, keeps a danger-zone proximity snapshot fresh
//! around that estimate, plans safe routes against the routing collaborator,
//! and coordinates the danger-zone report and emergency trigger flows.
//!
//! # High-Level API
//!
//! The [`session`] module provides the orchestrator most consumers want:
//!
//! ```ignore
//! use wayhome::session::{MapSession, SessionConfig};
//! use wayhome::routing::HttpRoutingApi;
//! use wayhome::geocode::NominatimClient;
//!
//! let session = MapSession::start(
//!     location_source,
//!     HttpRoutingApi::new(base_url, Some(token))?,
//!     NominatimClient::new()?,
//!     SessionConfig::default(),
//! );
//!
//! session.search("Central Park").await?;
//! session.plan_route().await?;
//! ```

pub mod geo;
pub mod geocode;
pub mod location;
pub mod logging;
pub mod routing;
pub mod session;

/// Version of the WayHome library.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
