//! Location source trait - abstracts the platform geolocation capability.
//!
//! The [`LocationSource`] trait is implemented over whatever the platform
//! provides (browser geolocation bridge, mobile shim, a replay file in
//! tests). It exposes the two shapes the platform API has:
//!
//! - a **continuous watch** that pushes [`LocationUpdate`]s into a channel
//!   until the session's cancellation token fires, and
//! - a **one-shot request** for a single fresh reading.
//!
//! Both are parameterized by [`WatchOptions`]. Watch errors are events,
//! not termination: the subscription stays alive after reporting one so a
//! later recovery is still observed.

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::state::{LocationError, PositionFix, WatchOptions};

/// One event from a continuous watch.
#[derive(Debug, Clone)]
pub enum LocationUpdate {
    /// A raw reading arrived.
    Fix(PositionFix),
    /// The source failed; the watch remains subscribed.
    Error(LocationError),
}

/// Trait for platform geolocation capabilities.
pub trait LocationSource: Send + Sync {
    /// Begin a continuous watch.
    ///
    /// Updates are pushed into `updates` until `cancel` fires or the
    /// receiver is dropped. Must not block: implementations spawn their
    /// own delivery task.
    fn start_watch(
        &self,
        options: WatchOptions,
        updates: mpsc::Sender<LocationUpdate>,
        cancel: CancellationToken,
    );

    /// Request a single reading.
    fn current_position(
        &self,
        options: WatchOptions,
    ) -> impl Future<Output = Result<PositionFix, LocationError>> + Send;
}
