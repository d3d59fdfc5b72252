//! Admin-approval workflow effect
//!
//! When biometric verification fails or is skipped, the session falls back to
//! human review. The workflow service owns the request queue; the gate only
//! files requests and, later, reads back the decision.

use crate::biometric::BiometricKind;
use crate::identifiers::{ApprovalTicket, EmployeeId, SessionId};
use crate::verification::{AdminDecision, EntryPoint};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Why a session was routed to admin approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalReason {
    /// Sample was captured but did not match
    NoMatch,
    /// Capture produced zero bytes
    EmptySample,
    /// User chose to skip biometric capture
    Skipped,
    /// No reference of the attempted kind is enrolled for the employee
    NotEnrolled,
}

/// Request filed with the approval workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub employee_id: EmployeeId,
    pub session_id: SessionId,
    pub entry_point: EntryPoint,
    /// Kind of sample attempted, if any
    pub attempted: Option<BiometricKind>,
    pub reason: ApprovalReason,
    pub requested_at_ms: u64,
}

/// Acknowledgement for a filed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalReceipt {
    pub ticket: ApprovalTicket,
    /// `true` when the employee already had a pending request and that
    /// ticket was returned instead of opening a new one
    pub already_pending: bool,
}

/// Current status of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Decided(AdminDecision),
}

#[async_trait]
pub trait ApprovalEffects: Send + Sync {
    /// File an approval request. Idempotent per employee while a request is
    /// still pending.
    async fn request_approval(&self, request: ApprovalRequest) -> Result<ApprovalReceipt>;

    /// Look up the status of a filed request
    async fn approval_status(&self, ticket: ApprovalTicket) -> Result<ApprovalStatus>;
}
