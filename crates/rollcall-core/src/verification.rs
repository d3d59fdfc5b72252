//! Session verification state and its persisted record.

use crate::biometric::BiometricKind;
use crate::identifiers::{ApprovalTicket, EmployeeId};
use serde::{Deserialize, Serialize};

/// Where a session currently stands in biometric verification.
///
/// ```text
/// Unverified ──match──────────▶ FaceMatched | FingerprintMatched
///     │
///     └──no match / skipped──▶ PendingAdminApproval ──▶ AdminApproved
///                                                   └──▶ AdminDenied
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    /// Session start; nothing verified yet
    #[default]
    Unverified,
    /// Face sample matched the enrolled reference
    FaceMatched,
    /// Fingerprint pattern matched the enrolled reference
    FingerprintMatched,
    /// Waiting on an administrator decision
    PendingAdminApproval,
    /// Administrator approved the session
    AdminApproved,
    /// Administrator denied the session
    AdminDenied,
}

impl VerificationState {
    /// Matched state for a biometric kind
    pub fn matched_by(kind: BiometricKind) -> Self {
        match kind {
            BiometricKind::Face => Self::FaceMatched,
            BiometricKind::Fingerprint => Self::FingerprintMatched,
        }
    }

    /// `true` for states reached through a biometric match
    pub fn is_biometric_match(&self) -> bool {
        matches!(self, Self::FaceMatched | Self::FingerprintMatched)
    }

    /// `true` for states that end verification successfully
    pub fn is_terminal_success(&self) -> bool {
        matches!(
            self,
            Self::FaceMatched | Self::FingerprintMatched | Self::AdminApproved
        )
    }

    /// `true` for states from which a new sample may be submitted
    pub fn accepts_samples(&self) -> bool {
        matches!(
            self,
            Self::Unverified | Self::AdminDenied | Self::PendingAdminApproval
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unverified => "Unverified",
            Self::FaceMatched => "Face matched",
            Self::FingerprintMatched => "Fingerprint matched",
            Self::PendingAdminApproval => "Pending admin approval",
            Self::AdminApproved => "Admin approved",
            Self::AdminDenied => "Admin denied",
        }
    }
}

impl std::fmt::Display for VerificationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Administrator verdict on a pending approval request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminDecision {
    Approved,
    Denied,
}

/// Call site that drove a verification attempt.
///
/// Login-time and dashboard-time capture share one gate; the entry point is
/// carried along for approval requests and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    Login,
    Dashboard,
}

/// What the session store keeps for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Employee that owns the session
    pub employee_id: EmployeeId,
    /// Current gate state
    pub state: VerificationState,
    /// Last time `state` changed (ms since epoch)
    pub updated_at_ms: u64,
    /// When the last biometric match happened, if any
    pub matched_at_ms: Option<u64>,
    /// Outstanding or last approval request
    pub approval_ticket: Option<ApprovalTicket>,
    /// Entry point of the last verification attempt
    pub entry_point: Option<EntryPoint>,
}

impl VerificationRecord {
    /// Fresh `Unverified` record for a new session
    pub fn new(employee_id: EmployeeId, now_ms: u64) -> Self {
        Self {
            employee_id,
            state: VerificationState::Unverified,
            updated_at_ms: now_ms,
            matched_at_ms: None,
            approval_ticket: None,
            entry_point: None,
        }
    }

    /// Move to `state` at `now_ms`, stamping the match time for biometric matches.
    pub fn transition(&mut self, state: VerificationState, now_ms: u64) {
        if state != self.state {
            self.updated_at_ms = now_ms;
        }
        if state.is_biometric_match() && !self.state.is_biometric_match() {
            self.matched_at_ms = Some(now_ms);
        }
        self.state = state;
    }
}
