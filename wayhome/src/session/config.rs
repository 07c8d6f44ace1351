//! Configuration for the map session.

use std::time::Duration;

use crate::geo::GeoPoint;
use crate::location::{EstimatorConfig, WatchOptions};

/// Default fallback location (Times Square, NY) substituted when the
/// device never produces a fix.
pub const DEFAULT_FALLBACK_LOCATION: GeoPoint = GeoPoint::new(40.758, -73.9855);

/// Default periodic refresh cadence while the session is live.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Default danger-zone proximity query radius in meters.
pub const DEFAULT_DANGER_ZONE_RADIUS_M: f64 = 500.0;

/// Default route safety preference (0.0 shortest, 1.0 safest).
pub const DEFAULT_SAFETY_PREFERENCE: f64 = 0.8;

/// Default time-to-live for success notices.
pub const DEFAULT_SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(6);

/// Default capacity of the session event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 32;

/// Tunables for a map session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Coordinates substituted when geolocation is unsupported or denied
    /// before the first fix.
    pub fallback_location: GeoPoint,

    /// An estimate older than this is replaced by any fix.
    pub stale_estimate_after: Duration,

    /// A fix with accuracy below this many meters replaces a fresh
    /// estimate.
    pub good_accuracy_meters: f64,

    /// Cadence of the solicited one-shot refresh while the session is
    /// live.
    pub refresh_interval: Duration,

    /// Danger-zone proximity query radius in meters. Also the movement
    /// threshold that invalidates the cached snapshot.
    pub danger_zone_radius_meters: f64,

    /// Safety preference sent with route-planning requests.
    pub safety_preference: f64,

    /// How long success notices stay visible.
    pub success_notice_ttl: Duration,

    /// Parameters for the continuous watch and one-shot requests.
    pub watch_options: WatchOptions,

    /// Capacity of the session event broadcast channel.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fallback_location: DEFAULT_FALLBACK_LOCATION,
            stale_estimate_after: EstimatorConfig::DEFAULT_STALE_AFTER,
            good_accuracy_meters: EstimatorConfig::DEFAULT_GOOD_ACCURACY_METERS,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            danger_zone_radius_meters: DEFAULT_DANGER_ZONE_RADIUS_M,
            safety_preference: DEFAULT_SAFETY_PREFERENCE,
            success_notice_ttl: DEFAULT_SUCCESS_NOTICE_TTL,
            watch_options: WatchOptions::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Set the danger-zone query radius.
    pub fn with_danger_zone_radius(mut self, radius_meters: f64) -> Self {
        self.danger_zone_radius_meters = radius_meters;
        self
    }

    /// Set the periodic refresh cadence.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the fallback location.
    pub fn with_fallback_location(mut self, location: GeoPoint) -> Self {
        self.fallback_location = location;
        self
    }

    /// Estimator thresholds derived from this config.
    pub fn estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            stale_after: self.stale_estimate_after,
            good_accuracy_meters: self.good_accuracy_meters,
        }
    }
}
