//! Emergency trigger flow.
//!
//! A confirmation-dialog state machine:
//!
//! ```text
//! Closed ─open()─► Confirming ─begin_submit()─► Submitting ─succeed()─► Succeeded
//!    ▲                 ▲ │                          │                      │
//!    │                 │ └──── cancel() ──► Closed  │                      │
//!    │                 └────────── fail() ◄─────────┘                      │
//!    └──────────────────────── dismiss_success() ◄─────────────────────────┘
//! ```
//!
//! Confirmation requires a current position estimate; without one the flow
//! fails before ever reaching `Submitting`. A failed submission returns to
//! `Confirming` so the attempted intent is not lost. The presentation
//! layer may hide the dialog while `Submitting` (optimistic close); the
//! flow keeps the truthful state.

/// Where the emergency dialog currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmergencyDialogState {
    /// Dialog not shown.
    #[default]
    Closed,
    /// Dialog open, waiting for the user to confirm.
    Confirming,
    /// An alert submission is in flight.
    Submitting,
    /// The alert was accepted; a success notice is showing.
    Succeeded,
}

impl std::fmt::Display for EmergencyDialogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Confirming => write!(f, "Confirming"),
            Self::Submitting => write!(f, "Submitting"),
            Self::Succeeded => write!(f, "Succeeded"),
        }
    }
}

/// Emergency trigger state machine.
#[derive(Debug, Default)]
pub struct EmergencyFlow {
    state: EmergencyDialogState,
}

impl EmergencyFlow {
    /// Create a flow with the dialog closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> EmergencyDialogState {
        self.state
    }

    /// Open the confirmation dialog. No-op unless closed.
    pub fn open(&mut self) {
        if self.state == EmergencyDialogState::Closed {
            self.state = EmergencyDialogState::Confirming;
        }
    }

    /// Dismiss the dialog without submitting.
    pub fn cancel(&mut self) {
        if self.state == EmergencyDialogState::Confirming {
            self.state = EmergencyDialogState::Closed;
        }
    }

    /// Move from confirming to submitting.
    ///
    /// Returns false when the dialog is not awaiting confirmation.
    pub fn begin_submit(&mut self) -> bool {
        if self.state == EmergencyDialogState::Confirming {
            self.state = EmergencyDialogState::Submitting;
            true
        } else {
            false
        }
    }

    /// The alert was accepted.
    pub fn succeed(&mut self) {
        if self.state == EmergencyDialogState::Submitting {
            self.state = EmergencyDialogState::Succeeded;
        }
    }

    /// The alert failed; return to confirming for a retry.
    pub fn fail(&mut self) {
        if self.state == EmergencyDialogState::Submitting {
            self.state = EmergencyDialogState::Confirming;
        }
    }

    /// Acknowledge the success notice and close the dialog.
    pub fn dismiss_success(&mut self) {
        if self.state == EmergencyDialogState::Succeeded {
            self.state = EmergencyDialogState::Closed;
        }
    }
}
