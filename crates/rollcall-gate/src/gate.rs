//! Biometric verification gate
//!
//! Decides how a session's [`VerificationState`] moves in response to samples
//! and admin decisions, and combines the gate with the geofence into a single
//! attendance verdict. Every function here is pure and total.

use crate::geofence::{is_within_zone, Geofence};
use crate::guards::{GateCommand, GateFault, GateTransition};
use rollcall_core::effects::ApprovalReason;
use rollcall_core::{
    AdminDecision, AttendanceVerdict, BiometricSample, Coordinate, EntryPoint, GeoBoundingBox,
    MatchOutcome, OutsideZone, RollcallConfig, VerificationState,
};
use serde::{Deserialize, Serialize};

/// Policy knobs for the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePolicy {
    /// Treat `PendingAdminApproval` as open (attendance allowed while the
    /// request is outstanding)
    pub pending_is_open: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            pending_is_open: true,
        }
    }
}

impl GatePolicy {
    /// Policy that keeps the gate closed until an admin decides
    pub fn fail_closed() -> Self {
        Self {
            pending_is_open: false,
        }
    }
}

/// The gate shared by login-time and dashboard-time verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiometricGate {
    entry: EntryPoint,
    policy: GatePolicy,
}

impl BiometricGate {
    /// Gate for `entry` with the default (fail-open) policy
    pub fn for_entry(entry: EntryPoint) -> Self {
        Self {
            entry,
            policy: GatePolicy::default(),
        }
    }

    /// Gate for `entry` using the policy from `config`
    pub fn from_config(entry: EntryPoint, config: &RollcallConfig) -> Self {
        Self::for_entry(entry).with_policy(GatePolicy {
            pending_is_open: config.verification.pending_is_open,
        })
    }

    pub fn with_policy(mut self, policy: GatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn entry(&self) -> EntryPoint {
        self.entry
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Apply one capture attempt.
    ///
    /// `outcome` is the matching service's answer for `sample`; it is ignored
    /// when the sample is absent or empty. A match moves to the kind's matched
    /// state. Anything else routes to `PendingAdminApproval` with a request
    /// command, unless a request is already pending. Terminal-success states
    /// ignore further samples.
    pub fn submit_sample(
        &self,
        state: VerificationState,
        sample: Option<&BiometricSample>,
        outcome: MatchOutcome,
    ) -> GateTransition {
        if !state.accepts_samples() {
            tracing::debug!(%state, entry = ?self.entry, "sample ignored, already verified");
            return GateTransition::unchanged(state)
                .with_fault(GateFault::InvalidTransition { from: state });
        }

        let (reason, fault) = match sample {
            Some(sample) if sample.is_empty() => (
                ApprovalReason::EmptySample,
                Some(GateFault::EmptySample {
                    kind: sample.kind(),
                }),
            ),
            Some(sample) if outcome.matched => {
                let to = VerificationState::matched_by(sample.kind());
                tracing::info!(from = %state, %to, entry = ?self.entry, score = ?outcome.score, "biometric match");
                return GateTransition::moved(state, to);
            }
            Some(_) if !outcome.enrolled => (ApprovalReason::NotEnrolled, None),
            Some(_) => (ApprovalReason::NoMatch, None),
            None => (ApprovalReason::Skipped, None),
        };

        let mut transition = if state == VerificationState::PendingAdminApproval {
            tracing::debug!(?reason, entry = ?self.entry, "approval already requested");
            GateTransition::unchanged(state)
        } else {
            tracing::info!(from = %state, ?reason, entry = ?self.entry, "routing to admin approval");
            GateTransition::moved(state, VerificationState::PendingAdminApproval).with_command(
                GateCommand::RequestAdminApproval {
                    reason,
                    attempted: sample.map(BiometricSample::kind),
                    entry_point: self.entry,
                },
            )
        };
        if let Some(fault) = fault {
            tracing::debug!(%fault, "absorbed gate fault");
            transition = transition.with_fault(fault);
        }
        transition
    }

    /// Apply an admin decision; a no-op outside `PendingAdminApproval`.
    pub fn record_admin_decision(
        &self,
        state: VerificationState,
        decision: AdminDecision,
    ) -> VerificationState {
        self.apply_admin_decision(state, decision).to
    }

    /// [`Self::record_admin_decision`] that also reports the ignored case
    pub fn apply_admin_decision(
        &self,
        state: VerificationState,
        decision: AdminDecision,
    ) -> GateTransition {
        if state != VerificationState::PendingAdminApproval {
            tracing::debug!(%state, ?decision, "admin decision ignored outside pending approval");
            return GateTransition::unchanged(state)
                .with_fault(GateFault::InvalidTransition { from: state });
        }
        let to = match decision {
            AdminDecision::Approved => VerificationState::AdminApproved,
            AdminDecision::Denied => VerificationState::AdminDenied,
        };
        tracing::info!(from = %state, %to, "admin decision recorded");
        GateTransition::moved(state, to)
    }

    /// Whether attendance marking is reachable from `state`
    pub fn is_gate_open(&self, state: VerificationState) -> bool {
        match state {
            VerificationState::PendingAdminApproval => self.policy.pending_is_open,
            other => other.is_terminal_success(),
        }
    }

    /// Biometric check first, then the rectangle.
    pub fn evaluate_attendance_attempt(
        &self,
        state: VerificationState,
        coord: &Coordinate,
        bounds: &GeoBoundingBox,
    ) -> AttendanceVerdict {
        if !self.is_gate_open(state) {
            return self.deny_biometric(state);
        }
        if is_within_zone(coord, bounds) {
            tracing::debug!(%state, "attendance attempt allowed");
            return AttendanceVerdict::Allowed;
        }
        self.deny_location(bounds.locate(coord).unwrap_or(OutsideZone::InvalidCoordinate))
    }

    /// Attempt against any zone shape, with a possibly missing coordinate.
    pub fn evaluate_in_zone<Z: Geofence + ?Sized>(
        &self,
        state: VerificationState,
        coord: Option<&Coordinate>,
        zone: &Z,
    ) -> AttendanceVerdict {
        if !self.is_gate_open(state) {
            return self.deny_biometric(state);
        }
        let Some(coord) = coord else {
            return self.deny_location(OutsideZone::Unavailable);
        };
        match zone.locate(coord) {
            None => {
                tracing::debug!(%state, "attendance attempt allowed");
                AttendanceVerdict::Allowed
            }
            Some(outside) => self.deny_location(outside),
        }
    }

    fn deny_biometric(&self, state: VerificationState) -> AttendanceVerdict {
        tracing::warn!(%state, entry = ?self.entry, "attendance denied: biometric gate closed");
        AttendanceVerdict::DeniedBiometric
    }

    fn deny_location(&self, outside: OutsideZone) -> AttendanceVerdict {
        if outside == OutsideZone::InvalidCoordinate {
            tracing::debug!(fault = %GateFault::InvalidCoordinate, "absorbed gate fault");
        }
        tracing::warn!(?outside, entry = ?self.entry, "attendance denied: outside zone");
        AttendanceVerdict::denied_location(outside)
    }
}

impl Default for BiometricGate {
    fn default() -> Self {
        Self::for_entry(EntryPoint::Login)
    }
}

/// Gate-open check under the default fail-open policy
pub fn is_gate_open(state: VerificationState) -> bool {
    BiometricGate::default().is_gate_open(state)
}

/// Admin decision under the default gate
pub fn record_admin_decision(state: VerificationState, decision: AdminDecision) -> VerificationState {
    BiometricGate::default().record_admin_decision(state, decision)
}

/// Attendance verdict under the default fail-open policy
pub fn evaluate_attendance_attempt(
    state: VerificationState,
    coord: &Coordinate,
    bounds: &GeoBoundingBox,
) -> AttendanceVerdict {
    BiometricGate::default().evaluate_attendance_attempt(state, coord, bounds)
}
