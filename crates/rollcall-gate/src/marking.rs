//! Attendance marking decisions
//!
//! Combines the gate verdict with verification freshness: a mark is recorded
//! as `Present` only when backed by an admin approval or a biometric match
//! younger than the freshness window, and as `PendingApproval` otherwise.

use crate::gate::BiometricGate;
use crate::geofence::Geofence;
use rollcall_core::{
    AttendanceStatus, AttendanceVerdict, Coordinate, VerificationRecord, VerificationState,
};
use serde::{Deserialize, Serialize};

/// Status an allowed mark should be recorded with.
///
/// The window is exclusive: a match exactly `window_ms` old is stale.
pub fn attendance_status(record: &VerificationRecord, now_ms: u64, window_ms: u64) -> AttendanceStatus {
    match record.state {
        VerificationState::AdminApproved => AttendanceStatus::Present,
        state if state.is_biometric_match() => match record.matched_at_ms {
            Some(matched_at) if now_ms.saturating_sub(matched_at) < window_ms => {
                AttendanceStatus::Present
            }
            _ => AttendanceStatus::PendingApproval,
        },
        _ => AttendanceStatus::PendingApproval,
    }
}

/// Outcome of a mark-attendance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDecision {
    pub verdict: AttendanceVerdict,
    /// Set only when `verdict` is `Allowed`
    pub status: Option<AttendanceStatus>,
}

impl AttendanceDecision {
    pub fn is_allowed(&self) -> bool {
        self.verdict.is_allowed()
    }
}

/// Evaluate an attempt for `record` and, when allowed, how to record it.
pub fn decide_attendance<Z: Geofence + ?Sized>(
    gate: &BiometricGate,
    record: &VerificationRecord,
    coord: Option<&Coordinate>,
    zone: &Z,
    now_ms: u64,
    window_ms: u64,
) -> AttendanceDecision {
    let verdict = gate.evaluate_in_zone(record.state, coord, zone);
    let status = verdict
        .is_allowed()
        .then(|| attendance_status(record, now_ms, window_ms));
    if let Some(status) = status {
        tracing::info!(employee = %record.employee_id, ?status, "attendance allowed");
    }
    AttendanceDecision { verdict, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{EmployeeId, GeoBoundingBox};

    const WINDOW_MS: u64 = 600_000;

    fn matched_at(at_ms: u64) -> VerificationRecord {
        let mut record = VerificationRecord::new(EmployeeId::new(42), 0);
        record.transition(VerificationState::FaceMatched, at_ms);
        record
    }

    #[test]
    fn test_fresh_match_is_present() {
        let record = matched_at(1_000);
        assert_eq!(
            attendance_status(&record, 1_000 + WINDOW_MS - 1, WINDOW_MS),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn test_match_at_window_edge_is_stale() {
        let record = matched_at(1_000);
        assert_eq!(
            attendance_status(&record, 1_000 + WINDOW_MS, WINDOW_MS),
            AttendanceStatus::PendingApproval
        );
    }

    #[test]
    fn test_admin_paths() {
        let mut record = VerificationRecord::new(EmployeeId::new(42), 0);
        record.transition(VerificationState::PendingAdminApproval, 10);
        assert_eq!(
            attendance_status(&record, 20, WINDOW_MS),
            AttendanceStatus::PendingApproval
        );

        record.transition(VerificationState::AdminApproved, 30);
        assert_eq!(
            attendance_status(&record, u64::MAX, WINDOW_MS),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn test_decision_carries_status_only_when_allowed() {
        let bounds = GeoBoundingBox::new(33.60, 33.70, 72.95, 73.25).unwrap();
        let gate = BiometricGate::default();
        let record = matched_at(5_000);

        let allowed = decide_attendance(
            &gate,
            &record,
            Some(&Coordinate::at(33.643, 73.184)),
            &bounds,
            6_000,
            WINDOW_MS,
        );
        assert!(allowed.is_allowed());
        assert_eq!(allowed.status, Some(AttendanceStatus::Present));

        let outside = decide_attendance(
            &gate,
            &record,
            Some(&Coordinate::at(33.50, 73.184)),
            &bounds,
            6_000,
            WINDOW_MS,
        );
        assert!(!outside.is_allowed());
        assert_eq!(outside.status, None);
    }
}
