//! The map session orchestrator.
//!
//! [`MapSession`] owns the position estimate and everything derived from
//! it. One background daemon funnels the three fix paths (continuous
//! watch, periodic refresh, manual refresh) through the single
//! [`PositionEstimator`] acceptance function, re-queries danger-zone
//! proximity when the estimate moves, and stops cleanly when the session's
//! cancellation token fires - even if initialization never completed, so
//! the platform watch subscription is never leaked.
//!
//! Network results are applied only when their [`RequestSequence`] ticket
//! is still current (last request wins) and the session is still active.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::geo::{distance_meters, GeoPoint};
use crate::geocode::GeocodeClient;
use crate::location::{
    FixOrigin, LocationError, LocationSource, LocationUpdate, PositionEstimate, PositionEstimator,
    PositionFix, WatchOptions,
};
use crate::routing::{
    DangerZone, EmergencyAlert, Route, RoutePlanRequest, RoutingApi,
};

use super::config::SessionConfig;
use super::emergency::{EmergencyDialogState, EmergencyFlow};
use super::error::SessionError;
use super::events::{Notice, SessionEvent};
use super::report::{DangerReportForm, ReportFlow, ReportFlowState};
use super::sequence::RequestSequence;

/// Capacity of the watch update channel.
const WATCH_CHANNEL_CAPACITY: usize = 16;

/// Capacity of the manual refresh signal channel.
const REFRESH_CHANNEL_CAPACITY: usize = 4;

/// Mutable session state, guarded by one lock.
struct SessionState {
    /// The single position reducer.
    estimator: PositionEstimator,

    /// Last resolved destination; overwritten on every successful search.
    search_result: Option<GeoPoint>,

    /// Current route, replaced wholesale on each planning request.
    route: Option<Route>,

    /// Cached danger-zone snapshot.
    danger_zones: Vec<DangerZone>,

    /// Position the snapshot was queried at; `None` before the first
    /// successful query.
    zones_queried_at: Option<GeoPoint>,

    /// Danger-zone report flow.
    report: ReportFlow,

    /// Emergency trigger flow.
    emergency: EmergencyFlow,
}

/// Shared guts of a session, kept alive by the handle and the daemon.
struct SessionInner<L, R, G> {
    location: L,
    routing: R,
    geocode: G,
    config: SessionConfig,
    state: RwLock<SessionState>,
    events_tx: broadcast::Sender<SessionEvent>,
    cancel: CancellationToken,
    refresh_tx: mpsc::Sender<()>,
    search_seq: RequestSequence,
    route_seq: RequestSequence,
}

/// Cancels the session when the last handle is dropped.
///
/// Held by handles only, never by the daemon, so an abandoned session is
/// torn down even if initialization never completed - the platform watch
/// subscription is not leaked.
struct SessionGuard {
    cancel: CancellationToken,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Session-scoped orchestrator for the safety map.
///
/// Cheap to clone; the session terminates when [`MapSession::shutdown`]
/// is called or the last handle is dropped.
pub struct MapSession<L, R, G> {
    inner: Arc<SessionInner<L, R, G>>,
    _guard: Arc<SessionGuard>,
}

impl<L, R, G> Clone for MapSession<L, R, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _guard: Arc::clone(&self._guard),
        }
    }
}

impl<L, R, G> MapSession<L, R, G>
where
    L: LocationSource + 'static,
    R: RoutingApi + 'static,
    G: GeocodeClient + 'static,
{
    /// Start a session: subscribe the continuous watch, start the refresh
    /// timer, and return the handle.
    pub fn start(location: L, routing: R, geocode: G, config: SessionConfig) -> Self {
        let cancel = CancellationToken::new();
        let (events_tx, _) = broadcast::channel(config.event_capacity);
        let (watch_tx, watch_rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_CHANNEL_CAPACITY);

        let estimator =
            PositionEstimator::with_config(config.fallback_location, config.estimator_config());

        let inner = Arc::new(SessionInner {
            location,
            routing,
            geocode,
            state: RwLock::new(SessionState {
                estimator,
                search_result: None,
                route: None,
                danger_zones: Vec::new(),
                zones_queried_at: None,
                report: ReportFlow::new(),
                emergency: EmergencyFlow::new(),
            }),
            events_tx,
            cancel: cancel.clone(),
            refresh_tx,
            search_seq: RequestSequence::new(),
            route_seq: RequestSequence::new(),
            config,
        });

        inner
            .location
            .start_watch(inner.config.watch_options, watch_tx, cancel.child_token());

        let daemon = Arc::clone(&inner);
        tokio::spawn(async move {
            run_position_daemon(daemon, watch_rx, refresh_rx).await;
        });

        Self {
            inner,
            _guard: Arc::new(SessionGuard { cancel }),
        }
    }

    /// Terminate the session.
    ///
    /// Synchronously cancels the watch subscription and the refresh timer.
    /// In-flight network requests may complete, but their results are
    /// discarded.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    /// True once the session has been terminated.
    pub fn is_terminated(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Current position estimate, if any fix or source error was observed.
    pub fn estimate(&self) -> Option<PositionEstimate> {
        self.inner.state.read().unwrap().estimator.estimate()
    }

    /// Last resolved destination.
    pub fn search_result(&self) -> Option<GeoPoint> {
        self.inner.state.read().unwrap().search_result
    }

    /// Current route, if one was planned.
    pub fn route(&self) -> Option<Route> {
        self.inner.state.read().unwrap().route.clone()
    }

    /// Cached danger-zone snapshot.
    pub fn danger_zones(&self) -> Vec<DangerZone> {
        self.inner.state.read().unwrap().danger_zones.clone()
    }

    /// Request an immediate fresh device fix, bypassing the refresh
    /// cadence and any cached reading. The result funnels through the
    /// same acceptance policy as every other fix and is accepted
    /// unconditionally.
    pub fn refresh_position(&self) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        if self.inner.refresh_tx.try_send(()).is_err() {
            tracing::debug!("Manual refresh already pending");
        }
    }

    /// Resolve a destination search.
    ///
    /// Blank input is rejected without a network call and without touching
    /// the previous result. The first candidate is authoritative. A newer
    /// search supersedes this one: a stale response is never applied.
    pub async fn search(&self, query: &str) -> Result<GeoPoint, SessionError> {
        if self.inner.cancel.is_cancelled() {
            return Err(SessionError::Terminated);
        }

        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptySearchQuery);
        }

        let ticket = self.inner.search_seq.begin();
        let candidates = self.inner.geocode.search(trimmed).await?;

        let Some(first) = candidates.into_iter().next() else {
            return Err(SessionError::PlaceNotFound {
                query: trimmed.to_string(),
            });
        };

        let mut state = self.inner.state.write().unwrap();
        if self.inner.cancel.is_cancelled() {
            return Err(SessionError::Terminated);
        }
        if !self.inner.search_seq.is_current(ticket) {
            tracing::debug!(query = trimmed, "Stale search response discarded");
            return Err(SessionError::Superseded);
        }
        state.search_result = Some(first.point);

        tracing::info!(
            query = trimmed,
            latitude = first.point.latitude,
            longitude = first.point.longitude,
            "Destination resolved"
        );
        Ok(first.point)
    }

    /// Plan a safe route from the current estimate to the last search
    /// result.
    ///
    /// Requires both; otherwise a validation error is returned and no
    /// network call is made. Overlapping calls are last-request-wins: a
    /// stale response is discarded instead of overwriting a newer route.
    pub async fn plan_route(&self) -> Result<(), SessionError> {
        if self.inner.cancel.is_cancelled() {
            return Err(SessionError::Terminated);
        }

        let (start, end) = {
            let state = self.inner.state.read().unwrap();
            let estimate = state
                .estimator
                .estimate()
                .ok_or(SessionError::RouteMissingPosition)?;
            let destination = state
                .search_result
                .ok_or(SessionError::RouteMissingDestination)?;
            (estimate.point(), destination)
        };

        let ticket = self.inner.route_seq.begin();
        let request = RoutePlanRequest {
            start_location: start.into(),
            end_location: end.into(),
            safety_preference: self.inner.config.safety_preference,
        };

        let route = self
            .inner
            .routing
            .plan_route(&request)
            .await
            .map_err(SessionError::RoutePlanning)?;

        {
            let mut state = self.inner.state.write().unwrap();
            if self.inner.cancel.is_cancelled() {
                return Err(SessionError::Terminated);
            }
            if !self.inner.route_seq.is_current(ticket) {
                tracing::debug!("Stale route response discarded");
                return Err(SessionError::Superseded);
            }
            state.route = Some(route);
        }

        let _ = self.inner.events_tx.send(SessionEvent::RouteUpdated);
        Ok(())
    }

    /// Re-query the danger-zone snapshot around the current estimate.
    pub async fn refresh_danger_zones(&self) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        let center = {
            let state = self.inner.state.read().unwrap();
            state.estimator.estimate().map(|e| e.point())
        };
        if let Some(center) = center {
            self.inner.query_danger_zones(center).await;
        }
    }

    /// Toggle "mark danger zone" mode on.
    pub fn enter_report_mode(&self) {
        self.inner.state.write().unwrap().report.arm();
    }

    /// Toggle "mark danger zone" mode off, discarding any draft.
    pub fn exit_report_mode(&self) {
        self.inner.state.write().unwrap().report.disarm();
    }

    /// Capture a map click while report mode is armed.
    ///
    /// Returns true if the click opened the report form.
    pub fn pick_report_location(&self, location: GeoPoint) -> bool {
        self.inner.state.write().unwrap().report.pick_location(location)
    }

    /// Current report flow state.
    pub fn report_state(&self) -> ReportFlowState {
        self.inner.state.read().unwrap().report.state().clone()
    }

    /// Submit the report form for the picked location.
    ///
    /// On success the flow deactivates and the danger-zone snapshot is
    /// re-queried; on failure the form stays open with the draft retained
    /// for retry.
    pub async fn submit_report(&self, form: DangerReportForm) -> Result<DangerZone, SessionError> {
        if self.inner.cancel.is_cancelled() {
            return Err(SessionError::Terminated);
        }

        let draft = self
            .inner
            .state
            .write()
            .unwrap()
            .report
            .begin_submit(form)
            .ok_or(SessionError::ReportNotReady)?;

        let request = draft.to_report();
        match self.inner.routing.report_danger_zone(&request).await {
            Ok(zone) => {
                let center = {
                    let mut state = self.inner.state.write().unwrap();
                    state.report.succeed();
                    state.estimator.estimate().map(|e| e.point())
                };
                let _ = self.inner.events_tx.send(SessionEvent::Notice(Notice::success(
                    "Danger zone reported",
                    self.inner.config.success_notice_ttl,
                )));

                if let Some(center) = center {
                    if !self.inner.cancel.is_cancelled() {
                        self.inner.query_danger_zones(center).await;
                    }
                }
                Ok(zone)
            }
            Err(error) => {
                let message = error.to_string();
                self.inner.state.write().unwrap().report.fail(&message);
                let _ = self
                    .inner
                    .events_tx
                    .send(SessionEvent::Notice(Notice::error(format!(
                        "Danger zone report failed: {message}"
                    ))));
                Err(SessionError::ReportSubmit(error))
            }
        }
    }

    /// Open the emergency confirmation dialog.
    pub fn open_emergency_dialog(&self) {
        self.inner.state.write().unwrap().emergency.open();
    }

    /// Dismiss the emergency dialog without submitting.
    pub fn cancel_emergency_dialog(&self) {
        self.inner.state.write().unwrap().emergency.cancel();
    }

    /// Acknowledge the emergency success notice.
    pub fn dismiss_emergency_notice(&self) {
        self.inner.state.write().unwrap().emergency.dismiss_success();
    }

    /// Current emergency dialog state.
    pub fn emergency_state(&self) -> EmergencyDialogState {
        self.inner.state.read().unwrap().emergency.state()
    }

    /// Confirm the emergency dialog and submit an alert with the current
    /// estimate.
    ///
    /// Fails immediately without a network call when no estimate exists;
    /// the dialog never reaches the submitting state in that case.
    pub async fn confirm_emergency(&self, reason: &str) -> Result<(), SessionError> {
        if self.inner.cancel.is_cancelled() {
            return Err(SessionError::Terminated);
        }

        let alert = {
            let mut state = self.inner.state.write().unwrap();
            if state.emergency.state() != EmergencyDialogState::Confirming {
                return Err(SessionError::EmergencyNotConfirming);
            }
            let Some(estimate) = state.estimator.estimate() else {
                return Err(SessionError::EmergencyPositionMissing);
            };
            state.emergency.begin_submit();
            EmergencyAlert {
                latitude: estimate.latitude,
                longitude: estimate.longitude,
                location: estimate.point().to_string(),
                reason: reason.to_string(),
                audio_snippet: None,
            }
        };

        match self.inner.routing.trigger_emergency(&alert).await {
            Ok(()) => {
                self.inner.state.write().unwrap().emergency.succeed();
                let _ = self.inner.events_tx.send(SessionEvent::Notice(Notice::success(
                    "Emergency alert sent",
                    self.inner.config.success_notice_ttl,
                )));
                Ok(())
            }
            Err(error) => {
                self.inner.state.write().unwrap().emergency.fail();
                let _ = self
                    .inner
                    .events_tx
                    .send(SessionEvent::Notice(Notice::error(format!(
                        "Emergency alert failed: {error}"
                    ))));
                Err(SessionError::EmergencySubmit(error))
            }
        }
    }
}

impl<L, R, G> SessionInner<L, R, G>
where
    L: LocationSource,
    R: RoutingApi,
    G: GeocodeClient,
{
    /// Apply one fix through the estimator and react to acceptance.
    async fn ingest_fix(&self, fix: PositionFix, origin: FixOrigin) {
        let (accepted, estimate, query_center) = {
            let mut state = self.state.write().unwrap();
            let decision = state.estimator.apply_fix(&fix, origin);
            let estimate = state.estimator.estimate();

            let query_center = if decision.is_accepted() {
                estimate.map(|e| e.point()).filter(|center| {
                    match state.zones_queried_at {
                        None => true,
                        Some(prev) => {
                            distance_meters(prev, *center) > self.config.danger_zone_radius_meters
                        }
                    }
                })
            } else {
                None
            };

            (decision.is_accepted(), estimate, query_center)
        };

        if accepted {
            if let Some(estimate) = estimate {
                let _ = self
                    .events_tx
                    .send(SessionEvent::PositionChanged(estimate));
            }
            if let Some(center) = query_center {
                self.query_danger_zones(center).await;
            }
        }
    }

    /// Apply a source failure.
    fn ingest_error(&self, error: LocationError) {
        let message = error.message.clone();
        self.state.write().unwrap().estimator.apply_error(error);
        let _ = self
            .events_tx
            .send(SessionEvent::PositionDegraded { message });
    }

    /// Issue a one-shot high-accuracy request and funnel the result
    /// through the acceptance policy as a solicited fix.
    async fn solicit_fix(&self) {
        let options = WatchOptions {
            max_cached_age: Duration::ZERO,
            ..self.config.watch_options
        };

        match self.location.current_position(options).await {
            Ok(fix) => {
                if !self.cancel.is_cancelled() {
                    self.ingest_fix(fix, FixOrigin::Solicited).await;
                }
            }
            Err(error) => {
                if !self.cancel.is_cancelled() {
                    self.ingest_error(error);
                }
            }
        }
    }

    /// Fetch the danger-zone snapshot around `center`.
    ///
    /// A failure keeps the previous snapshot - a transient outage never
    /// clears a good cache.
    async fn query_danger_zones(&self, center: GeoPoint) {
        match self
            .routing
            .nearby_danger_zones(
                center.latitude,
                center.longitude,
                self.config.danger_zone_radius_meters,
            )
            .await
        {
            Ok(zones) => {
                if self.cancel.is_cancelled() {
                    return;
                }
                let count = zones.len();
                {
                    let mut state = self.state.write().unwrap();
                    state.danger_zones = zones;
                    state.zones_queried_at = Some(center);
                }
                let _ = self
                    .events_tx
                    .send(SessionEvent::DangerZonesUpdated { count });
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    latitude = center.latitude,
                    longitude = center.longitude,
                    "Danger zone query failed, keeping cached snapshot"
                );
            }
        }
    }
}

/// The session's background daemon.
///
/// Selects over the continuous watch, the periodic refresh interval, and
/// manual refresh requests until the session is cancelled. All three paths
/// funnel into the same acceptance policy.
async fn run_position_daemon<L, R, G>(
    inner: Arc<SessionInner<L, R, G>>,
    mut watch_rx: mpsc::Receiver<LocationUpdate>,
    mut refresh_rx: mpsc::Receiver<()>,
) where
    L: LocationSource,
    R: RoutingApi,
    G: GeocodeClient,
{
    tracing::info!(
        refresh_interval_secs = inner.config.refresh_interval.as_secs(),
        "Map session daemon started"
    );

    let mut refresh = tokio::time::interval(inner.config.refresh_interval);
    // The first tick completes immediately; consume it so the cadence
    // starts one interval from now.
    refresh.tick().await;

    let mut watch_open = true;

    loop {
        tokio::select! {
            _ = inner.cancel.cancelled() => break,

            update = watch_rx.recv(), if watch_open => match update {
                Some(LocationUpdate::Fix(fix)) => inner.ingest_fix(fix, FixOrigin::Watch).await,
                Some(LocationUpdate::Error(error)) => inner.ingest_error(error),
                None => {
                    tracing::debug!("Watch channel closed");
                    watch_open = false;
                }
            },

            // The periodic refresh only runs while a live estimate exists;
            // a manual refresh is always honored.
            _ = refresh.tick() => {
                let live = {
                    let state = inner.state.read().unwrap();
                    state.estimator.estimate().is_some_and(|e| e.is_live)
                };
                if live {
                    inner.solicit_fix().await;
                }
            }

            Some(()) = refresh_rx.recv() => inner.solicit_fix().await,
        }
    }

    tracing::info!("Map session daemon stopped");
}
