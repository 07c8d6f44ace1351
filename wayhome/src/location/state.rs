//! Core state types for position tracking.
//!
//! This module defines the fundamental types used throughout location
//! tracking:
//!
//! - [`PositionFix`] - One raw geolocation reading with a quality figure
//! - [`PositionEstimate`] - The session's authoritative position
//! - [`WatchOptions`] - Parameters for watch and one-shot requests
//! - [`LocationError`] / [`LocationErrorKind`] - Source failure taxonomy

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::geo::GeoPoint;

/// One raw geolocation reading.
///
/// Produced by a [`LocationSource`](super::LocationSource); immutable and
/// ephemeral - it only exists while the acceptance policy evaluates it.
#[derive(Debug, Clone, Copy)]
pub struct PositionFix {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,

    /// Reported measurement accuracy in meters (lower is better).
    pub accuracy_meters: f64,

    /// When the device captured this reading.
    pub captured_at: Instant,
}

impl PositionFix {
    /// Create a fix captured now.
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
            captured_at: Instant::now(),
        }
    }

    /// Coordinates of this fix.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// The session's current authoritative position.
///
/// Mutated only by the [`PositionEstimator`](super::PositionEstimator);
/// read by every other component.
///
/// # Liveness
///
/// `is_live` is false when the most recent source event was an error. The
/// coordinates are still the best available (either the last good fix or
/// the configured fallback location) - consumers never handle "no
/// position" as a distinct state, only degraded liveness.
#[derive(Debug, Clone, Copy)]
pub struct PositionEstimate {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Accuracy of the accepted fix in meters.
    pub accuracy_meters: f64,

    /// When this estimate was accepted.
    pub accepted_at: Instant,

    /// False once the source reported an error and the coordinates are a
    /// carried-over fix or the fallback constant.
    pub is_live: bool,
}

impl PositionEstimate {
    /// Coordinates of this estimate.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Age of this estimate.
    pub fn age(&self) -> Duration {
        self.accepted_at.elapsed()
    }
}

/// Parameters for watch subscriptions and one-shot position requests.
///
/// Mirrors the platform geolocation API surface.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Request the high-accuracy positioning mode.
    pub high_accuracy: bool,

    /// Give up on a reading after this long.
    pub timeout: Duration,

    /// Accept a cached device fix up to this old. Zero demands a fresh
    /// reading.
    pub max_cached_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_cached_age: Duration::ZERO,
        }
    }
}

/// Why the location source failed.
///
/// All three kinds are recoverable: the watch stays subscribed so a later
/// recovery is still observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorKind {
    /// The user denied the location permission.
    PermissionDenied,
    /// The device could not produce a position.
    Unavailable,
    /// The reading did not arrive within the configured timeout.
    Timeout,
}

impl std::fmt::Display for LocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "PermissionDenied"),
            Self::Unavailable => write!(f, "Unavailable"),
            Self::Timeout => write!(f, "Timeout"),
        }
    }
}

/// A failure reported by the location source.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LocationError {
    /// Failure classification.
    pub kind: LocationErrorKind,
    /// Human-readable description for the status surface.
    pub message: String,
}

impl LocationError {
    /// Create an error of the given kind with a default message.
    pub fn new(kind: LocationErrorKind) -> Self {
        let message = match kind {
            LocationErrorKind::PermissionDenied => "Location permission denied.",
            LocationErrorKind::Unavailable => "Location unavailable. Try again later.",
            LocationErrorKind::Timeout => "Location request timed out.",
        };
        Self {
            kind,
            message: message.to_string(),
        }
    }

    /// Create an error with a custom message.
    pub fn with_message(kind: LocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
