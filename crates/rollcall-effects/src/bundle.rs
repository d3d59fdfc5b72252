//! Effects bundle wiring every in-memory handler together

use crate::approval::MemoryApprovalQueue;
use crate::matching::{CosineMatchingHandler, MemoryTemplateRegistry};
use crate::session::MemorySessionStore;
use crate::time::{FixedTimeHandler, RealTimeHandler};
use async_trait::async_trait;
use rollcall_core::effects::{
    ApprovalEffects, ApprovalReceipt, ApprovalRequest, ApprovalStatus, MatchingEffects,
    PhysicalTimeEffects, SessionStoreEffects,
};
use rollcall_core::{
    ApprovalTicket, BiometricKind, BiometricSample, EmployeeId, MatchOutcome, MatchThresholds,
    Result, SessionId, VerificationRecord,
};

/// All four effect handlers behind one value, generic over the clock
#[derive(Debug, Clone)]
pub struct MemoryEffects<T = RealTimeHandler> {
    sessions: MemorySessionStore,
    approvals: MemoryApprovalQueue,
    matcher: CosineMatchingHandler,
    clock: T,
}

impl<T: PhysicalTimeEffects> MemoryEffects<T> {
    /// Bundle with fresh stores, the given thresholds, and `clock`
    pub fn new(clock: T, thresholds: MatchThresholds) -> Self {
        Self {
            sessions: MemorySessionStore::new(),
            approvals: MemoryApprovalQueue::new(),
            matcher: CosineMatchingHandler::new(MemoryTemplateRegistry::new(), thresholds),
            clock,
        }
    }

    pub fn sessions(&self) -> &MemorySessionStore {
        &self.sessions
    }

    pub fn approvals(&self) -> &MemoryApprovalQueue {
        &self.approvals
    }

    pub fn templates(&self) -> &MemoryTemplateRegistry {
        self.matcher.registry()
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }
}

impl MemoryEffects<RealTimeHandler> {
    /// Wall-clock bundle with default thresholds
    pub fn with_real_time() -> Self {
        Self::new(RealTimeHandler::new(), MatchThresholds::default())
    }
}

impl MemoryEffects<FixedTimeHandler> {
    /// Deterministic bundle whose clock starts at `start_ms`
    pub fn for_testing(start_ms: u64) -> Self {
        Self::new(FixedTimeHandler::new(start_ms), MatchThresholds::default())
    }
}

#[async_trait]
impl<T: PhysicalTimeEffects> MatchingEffects for MemoryEffects<T> {
    async fn match_sample(
        &self,
        employee_id: EmployeeId,
        sample: &BiometricSample,
    ) -> Result<MatchOutcome> {
        self.matcher.match_sample(employee_id, sample).await
    }

    async fn is_enrolled(&self, employee_id: EmployeeId, kind: BiometricKind) -> Result<bool> {
        self.matcher.is_enrolled(employee_id, kind).await
    }
}

#[async_trait]
impl<T: PhysicalTimeEffects> ApprovalEffects for MemoryEffects<T> {
    async fn request_approval(&self, request: ApprovalRequest) -> Result<ApprovalReceipt> {
        self.approvals.request_approval(request).await
    }

    async fn approval_status(&self, ticket: ApprovalTicket) -> Result<ApprovalStatus> {
        self.approvals.approval_status(ticket).await
    }
}

#[async_trait]
impl<T: PhysicalTimeEffects> SessionStoreEffects for MemoryEffects<T> {
    async fn load_record(&self, session: SessionId) -> Result<Option<VerificationRecord>> {
        self.sessions.load_record(session).await
    }

    async fn save_record(&self, session: SessionId, record: &VerificationRecord) -> Result<()> {
        self.sessions.save_record(session, record).await
    }

    async fn clear_record(&self, session: SessionId) -> Result<bool> {
        self.sessions.clear_record(session).await
    }
}

#[async_trait]
impl<T: PhysicalTimeEffects> PhysicalTimeEffects for MemoryEffects<T> {
    async fn now_ms(&self) -> Result<u64> {
        self.clock.now_ms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::effects::AttendanceEffects;

    fn assert_attendance_effects<E: AttendanceEffects>(_: &E) {}

    #[tokio::test]
    async fn test_bundle_satisfies_attendance_effects() {
        let effects = MemoryEffects::for_testing(7);
        assert_attendance_effects(&effects);
        assert_eq!(effects.now_ms().await.unwrap(), 7);
        effects.clock().advance(3);
        assert_eq!(effects.now_ms().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_bundle_shares_registry_with_matcher() {
        let effects = MemoryEffects::for_testing(0);
        let employee = EmployeeId::new(5);
        let face = BiometricSample::Face(vec![3, 1, 4, 1, 5, 9, 2, 6]);
        effects.templates().enroll(employee, &face).await.unwrap();
        assert!(effects.is_enrolled(employee, BiometricKind::Face).await.unwrap());
        assert!(effects.match_sample(employee, &face).await.unwrap().matched);
    }
}
