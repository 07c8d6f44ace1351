//! Session error taxonomy.
//!
//! Nothing here is fatal to the process: every variant degrades to a
//! visible status while the session stays usable.

use thiserror::Error;

use crate::geocode::GeocodeError;
use crate::routing::ApiError;

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `search()` was called with blank input; no network call was made.
    #[error("search query is empty")]
    EmptySearchQuery,

    /// The geocoder answered but produced no candidates.
    #[error("no results found for \"{query}\"")]
    PlaceNotFound {
        /// The trimmed query that found nothing.
        query: String,
    },

    /// The geocoding request itself failed; the prior search result is
    /// untouched.
    #[error("geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    /// Route planning requires a current position estimate.
    #[error("route planning requires a current position")]
    RouteMissingPosition,

    /// Route planning requires a resolved destination.
    #[error("route planning requires a destination")]
    RouteMissingDestination,

    /// The routing service rejected or failed the planning request; no
    /// route was applied.
    #[error("route planning failed: {0}")]
    RoutePlanning(#[source] ApiError),

    /// The result lost a last-request-wins race and was not applied.
    #[error("superseded by a newer request")]
    Superseded,

    /// A report was submitted while no map location was picked.
    #[error("no report location picked")]
    ReportNotReady,

    /// The danger-zone report submission failed; the draft is retained
    /// for retry.
    #[error("danger zone report failed: {0}")]
    ReportSubmit(#[source] ApiError),

    /// The emergency dialog is not open for confirmation.
    #[error("emergency dialog is not open")]
    EmergencyNotConfirming,

    /// Emergency confirmation requires a current position estimate.
    #[error("emergency trigger requires a current position")]
    EmergencyPositionMissing,

    /// The emergency submission failed; the dialog returns to confirming.
    #[error("emergency submission failed: {0}")]
    EmergencySubmit(#[source] ApiError),

    /// The session has been terminated.
    #[error("session terminated")]
    Terminated,
}
