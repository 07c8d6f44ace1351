//! Danger-zone report flow.
//!
//! A small state machine driven by the "mark danger zone" toggle and a map
//! click:
//!
//! ```text
//! Inactive ─arm()─► Armed ─pick_location()─► LocationPicked ─begin_submit()─► Submitting
//!     ▲                                          ▲   │                            │
//!     ├───────── disarm() from any state ────────┘   └────◄─ fail() (retry) ◄────┤
//!     └───────────────────────── succeed() ◄────────────────────────────────────┘
//! ```
//!
//! Disarming at any point discards the draft. A failed submission returns
//! to `LocationPicked` with the failure recorded so the form can offer a
//! retry without losing input.

use crate::geo::GeoPoint;
use crate::routing::{DangerLevel, DangerZoneReport, LatLng};

/// Form input collected from the report dialog.
///
/// Name and description may be empty; the danger level defaults to
/// medium; tags arrive as one comma-separated string.
#[derive(Debug, Clone, Default)]
pub struct DangerReportForm {
    pub name: String,
    pub description: String,
    pub danger_level: DangerLevel,
    pub tags_input: String,
}

/// A report in progress, created by a map click in armed mode.
#[derive(Debug, Clone)]
pub struct DangerReportDraft {
    /// Where the user clicked.
    pub location: GeoPoint,
    /// Form fields as last submitted (empty before the first attempt).
    pub form: DangerReportForm,
    /// Failure message of the last submission attempt, if any.
    pub last_failure: Option<String>,
}

impl DangerReportDraft {
    fn new(location: GeoPoint) -> Self {
        Self {
            location,
            form: DangerReportForm::default(),
            last_failure: None,
        }
    }

    /// Build the wire request for this draft.
    pub fn to_report(&self) -> DangerZoneReport {
        DangerZoneReport {
            name: self.form.name.clone(),
            description: self.form.description.clone(),
            danger_level: self.form.danger_level,
            location: LatLng::from(self.location),
            tags: parse_tags(&self.form.tags_input),
        }
    }
}

/// Where the report flow currently stands.
#[derive(Debug, Clone)]
pub enum ReportFlowState {
    /// Report mode off.
    Inactive,
    /// Report mode on, waiting for a map click.
    Armed,
    /// A location was picked; the form dialog is open.
    LocationPicked(DangerReportDraft),
    /// A submission is in flight.
    Submitting(DangerReportDraft),
}

impl ReportFlowState {
    /// Short name for logging.
    fn name(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Armed => "armed",
            Self::LocationPicked(_) => "location_picked",
            Self::Submitting(_) => "submitting",
        }
    }
}

/// Parse a comma-separated tag string into trimmed non-empty tokens.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Danger-zone report state machine.
#[derive(Debug)]
pub struct ReportFlow {
    state: ReportFlowState,
}

impl Default for ReportFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFlow {
    /// Create a flow in the inactive state.
    pub fn new() -> Self {
        Self {
            state: ReportFlowState::Inactive,
        }
    }

    /// Current state.
    pub fn state(&self) -> &ReportFlowState {
        &self.state
    }

    /// True while report mode is on (armed or further along).
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ReportFlowState::Inactive)
    }

    /// Turn report mode on. No-op when already active.
    pub fn arm(&mut self) {
        if matches!(self.state, ReportFlowState::Inactive) {
            self.state = ReportFlowState::Armed;
            tracing::debug!("Report mode armed");
        }
    }

    /// Turn report mode off, discarding any draft.
    pub fn disarm(&mut self) {
        if self.is_active() {
            tracing::debug!(state = self.state.name(), "Report mode disarmed");
            self.state = ReportFlowState::Inactive;
        }
    }

    /// Capture a map click. Only honored while armed.
    ///
    /// Returns true if the click opened the form dialog.
    pub fn pick_location(&mut self, location: GeoPoint) -> bool {
        match self.state {
            ReportFlowState::Armed => {
                self.state = ReportFlowState::LocationPicked(DangerReportDraft::new(location));
                tracing::debug!(
                    latitude = location.latitude,
                    longitude = location.longitude,
                    "Report location picked"
                );
                true
            }
            _ => false,
        }
    }

    /// Merge the form input and move to submitting.
    ///
    /// Returns the draft to submit, or `None` when no location is picked.
    pub fn begin_submit(&mut self, form: DangerReportForm) -> Option<DangerReportDraft> {
        match &self.state {
            ReportFlowState::LocationPicked(draft) => {
                let draft = DangerReportDraft {
                    location: draft.location,
                    form,
                    last_failure: None,
                };
                self.state = ReportFlowState::Submitting(draft.clone());
                Some(draft)
            }
            _ => None,
        }
    }

    /// Submission succeeded: the flow deactivates and the draft is gone.
    pub fn succeed(&mut self) {
        if matches!(self.state, ReportFlowState::Submitting(_)) {
            self.state = ReportFlowState::Inactive;
        }
    }

    /// Submission failed: keep the draft, reopen the form with the
    /// failure recorded.
    pub fn fail(&mut self, message: impl Into<String>) {
        if let ReportFlowState::Submitting(draft) = &self.state {
            let mut draft = draft.clone();
            draft.last_failure = Some(message.into());
            self.state = ReportFlowState::LocationPicked(draft);
        }
    }
}
