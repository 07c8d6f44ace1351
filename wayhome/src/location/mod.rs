//! Device location tracking for the map session.
//!
//! This module provides a **single source of truth** for the user's
//! position, refined from a stream of raw geolocation fixes of varying
//! quality.
//!
//! # Architecture
//!
//! Three entry points deliver fixes, and all of them funnel through the
//! same acceptance policy:
//!
//! - **Continuous watch** → the platform's watch subscription, arbitrary
//!   cadence and quality
//! - **Periodic refresh** → a solicited one-shot high-accuracy request on
//!   a fixed cadence while the session is live
//! - **Manual refresh** → the same one-shot request on user demand,
//!   bypassing the cadence and any cached fix
//!
//! # Estimate Concept
//!
//! Instead of forwarding every raw fix to consumers, the estimator keeps a
//! persistent [`PositionEstimate`] and lets fixes compete for it:
//!
//! > **The estimate is the source of truth, not any single fix. Fixes
//! > refine the estimate based on their quality and the estimate's age.**
//!
//! Acceptance logic:
//! 1. The first fix always wins
//! 2. A solicited fix always wins (it was explicitly requested)
//! 3. A stale estimate is replaced by any fix
//! 4. A good-quality fix replaces a fresh estimate
//! 5. Anything else is rejected, with its accuracy recorded as diagnostics
//!
//! Source errors never erase a good estimate: the estimate survives with
//! `is_live = false` until the watch recovers, and a session that never got
//! a fix falls back to a constant location so consumers always have
//! coordinates to work with.
//!
//! # Components
//!
//! - [`state`] - Core types: `PositionFix`, `PositionEstimate`,
//!   `LocationError`, `WatchOptions`
//! - [`estimator`] - `PositionEstimator` with the acceptance policy
//! - [`source`] - `LocationSource` trait abstracting the platform
//!   geolocation capability

mod estimator;
mod source;
mod state;

pub use estimator::{EstimatorConfig, FixDecision, FixOrigin, PositionEstimator};
pub use source::{LocationSource, LocationUpdate};
pub use state::{LocationError, LocationErrorKind, PositionEstimate, PositionFix, WatchOptions};
