//! Position estimator - maintains the best-known user position.
//!
//! The estimator is the single reducer through which every position
//! mutation flows: watch callbacks, periodic refresh results, and manual
//! refresh results all call [`PositionEstimator::apply_fix`], and source
//! failures call [`PositionEstimator::apply_error`]. Ordering and staleness
//! rules live here and nowhere else.
//!
//! # Acceptance Policy
//!
//! Applied to every raw fix, in order:
//!
//! 1. No estimate yet - accept unconditionally
//! 2. Solicited fix (refresh timer or manual refresh) - accept
//!    unconditionally, it was explicitly requested
//! 3. Estimate older than the stale threshold - accept
//! 4. Fix accuracy below the good-quality threshold - accept
//! 5. Otherwise reject, recording the fix's accuracy as diagnostic state
//!
//! Fixes can arrive out of temporal order (a delayed low-accuracy reading
//! after a fresh high-accuracy one), so the policy is based on estimate age
//! and fix quality, never on arrival order.
//!
//! # Error Policy
//!
//! If no estimate exists when an error arrives, the configured fallback
//! location is installed with `is_live = false`. If an estimate exists, it
//! is kept - only `is_live` drops - so a transient outage never discards
//! the last good fix. A later accepted fix restores `is_live = true`.

use std::time::{Duration, Instant};

use crate::geo::GeoPoint;

use super::state::{LocationError, PositionEstimate, PositionFix};

/// Thresholds for the acceptance policy.
#[derive(Debug, Clone, Copy)]
pub struct EstimatorConfig {
    /// An estimate older than this is replaced by any fix.
    pub stale_after: Duration,

    /// A fix with accuracy below this many meters replaces a fresh
    /// estimate.
    pub good_accuracy_meters: f64,
}

impl EstimatorConfig {
    /// Default stale-estimate override (120 seconds).
    pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(120);

    /// Default good-quality accuracy threshold (100 meters).
    pub const DEFAULT_GOOD_ACCURACY_METERS: f64 = 100.0;
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            stale_after: Self::DEFAULT_STALE_AFTER,
            good_accuracy_meters: Self::DEFAULT_GOOD_ACCURACY_METERS,
        }
    }
}

/// How a fix reached the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOrigin {
    /// Delivered by the continuous watch subscription.
    Watch,
    /// Result of an explicitly requested one-shot (periodic or manual
    /// refresh). Accepted unconditionally.
    Solicited,
}

/// Outcome of applying one fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixDecision {
    /// The fix became the new estimate.
    Accepted,
    /// The fix was discarded; its accuracy was recorded as diagnostics.
    Rejected {
        /// Accuracy of the discarded fix in meters.
        accuracy_meters: f64,
    },
}

impl FixDecision {
    /// True if the fix was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Maintains the best-known user position.
#[derive(Debug)]
pub struct PositionEstimator {
    /// Current estimate (None only before any fix or error was observed).
    estimate: Option<PositionEstimate>,

    /// Substituted when the source fails before ever producing a fix.
    fallback: GeoPoint,

    /// Accuracy of the most recently rejected fix, for diagnostics.
    last_rejected_accuracy: Option<f64>,

    /// Most recent source error, cleared by the next accepted fix.
    last_error: Option<LocationError>,

    /// Policy thresholds.
    config: EstimatorConfig,
}

impl PositionEstimator {
    /// Create an estimator with default thresholds.
    pub fn new(fallback: GeoPoint) -> Self {
        Self::with_config(fallback, EstimatorConfig::default())
    }

    /// Create an estimator with custom thresholds.
    pub fn with_config(fallback: GeoPoint, config: EstimatorConfig) -> Self {
        Self {
            estimate: None,
            fallback,
            last_rejected_accuracy: None,
            last_error: None,
            config,
        }
    }

    /// Get the current estimate (if any fix or error was observed).
    pub fn estimate(&self) -> Option<PositionEstimate> {
        self.estimate
    }

    /// Accuracy of the most recently rejected fix.
    pub fn last_rejected_accuracy(&self) -> Option<f64> {
        self.last_rejected_accuracy
    }

    /// Most recent source error, if the next fix has not cleared it yet.
    pub fn last_error(&self) -> Option<&LocationError> {
        self.last_error.as_ref()
    }

    /// Determine whether a fix should replace the current estimate.
    fn should_accept(&self, fix: &PositionFix, origin: FixOrigin) -> bool {
        let Some(estimate) = &self.estimate else {
            return true; // No estimate yet - accept anything
        };

        if origin == FixOrigin::Solicited {
            return true;
        }

        if estimate.accepted_at.elapsed() > self.config.stale_after {
            return true;
        }

        fix.accuracy_meters < self.config.good_accuracy_meters
    }

    /// Apply one fix through the acceptance policy.
    pub fn apply_fix(&mut self, fix: &PositionFix, origin: FixOrigin) -> FixDecision {
        if !self.should_accept(fix, origin) {
            self.last_rejected_accuracy = Some(fix.accuracy_meters);
            tracing::debug!(
                accuracy_m = fix.accuracy_meters,
                "Fix rejected (estimate fresh, accuracy insufficient)"
            );
            return FixDecision::Rejected {
                accuracy_meters: fix.accuracy_meters,
            };
        }

        self.estimate = Some(PositionEstimate {
            latitude: fix.latitude,
            longitude: fix.longitude,
            accuracy_meters: fix.accuracy_meters,
            accepted_at: Instant::now(),
            is_live: true,
        });
        self.last_error = None;

        tracing::debug!(
            latitude = fix.latitude,
            longitude = fix.longitude,
            accuracy_m = fix.accuracy_meters,
            origin = ?origin,
            "Fix accepted"
        );
        FixDecision::Accepted
    }

    /// Apply a source failure.
    ///
    /// Installs the fallback location when no estimate exists yet;
    /// otherwise keeps the estimate and only degrades liveness.
    pub fn apply_error(&mut self, error: LocationError) {
        match &mut self.estimate {
            None => {
                tracing::warn!(
                    kind = %error.kind,
                    "Location source failed before first fix, using fallback location"
                );
                self.estimate = Some(PositionEstimate {
                    latitude: self.fallback.latitude,
                    longitude: self.fallback.longitude,
                    accuracy_meters: f64::INFINITY,
                    accepted_at: Instant::now(),
                    is_live: false,
                });
            }
            Some(estimate) => {
                tracing::warn!(
                    kind = %error.kind,
                    "Location source failed, keeping last estimate"
                );
                estimate.is_live = false;
            }
        }
        self.last_error = Some(error);
    }
}
