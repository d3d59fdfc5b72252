//! In-memory admin-approval queue
//!
//! Stands in for the remote approval workflow. An employee has at most one
//! pending request at a time: filing again while one is pending returns the
//! existing ticket, matching the remote API's "already requested" answer.

use async_trait::async_trait;
use rollcall_core::effects::{ApprovalEffects, ApprovalReceipt, ApprovalRequest, ApprovalStatus};
use rollcall_core::{AdminDecision, ApprovalTicket, EmployeeId, Result, RollcallError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct QueueEntry {
    request: ApprovalRequest,
    status: ApprovalStatus,
}

#[derive(Debug, Default)]
struct QueueState {
    /// Decided tickets stay here until `prune_decided` so late polls still
    /// see the outcome
    entries: HashMap<ApprovalTicket, QueueEntry>,
    pending_by_employee: HashMap<EmployeeId, ApprovalTicket>,
}

/// Approval queue shared between the session service and an admin view
#[derive(Debug, Clone, Default)]
pub struct MemoryApprovalQueue {
    state: Arc<RwLock<QueueState>>,
}

impl MemoryApprovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an administrator's decision on a pending ticket
    pub async fn decide(&self, ticket: ApprovalTicket, decision: AdminDecision) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = state
            .entries
            .get_mut(&ticket)
            .ok_or_else(|| RollcallError::not_found(format!("unknown {ticket}")))?;
        if entry.status != ApprovalStatus::Pending {
            return Err(RollcallError::approval(format!("{ticket} was already decided")));
        }
        entry.status = ApprovalStatus::Decided(decision);
        let employee_id = entry.request.employee_id;
        state.pending_by_employee.remove(&employee_id);
        tracing::info!(%ticket, %employee_id, ?decision, "approval decided");
        Ok(())
    }

    pub async fn approve(&self, ticket: ApprovalTicket) -> Result<()> {
        self.decide(ticket, AdminDecision::Approved).await
    }

    pub async fn deny(&self, ticket: ApprovalTicket) -> Result<()> {
        self.decide(ticket, AdminDecision::Denied).await
    }

    /// Outstanding requests, oldest first
    pub async fn pending(&self) -> Vec<(ApprovalTicket, ApprovalRequest)> {
        let state = self.state.read().await;
        let mut pending: Vec<_> = state
            .pending_by_employee
            .values()
            .filter_map(|ticket| {
                state
                    .entries
                    .get(ticket)
                    .map(|entry| (*ticket, entry.request.clone()))
            })
            .collect();
        pending.sort_by_key(|(_, request)| request.requested_at_ms);
        pending
    }

    /// Drop decided tickets, returning how many were removed.
    ///
    /// Sessions still holding a pruned ticket get `NotFound` when polling.
    pub async fn prune_decided(&self) -> usize {
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| entry.status == ApprovalStatus::Pending);
        let pruned = before - state.entries.len();
        tracing::debug!(pruned, "pruned decided approvals");
        pruned
    }

    /// Pending ticket for `employee_id`, if any
    pub async fn pending_for(&self, employee_id: EmployeeId) -> Option<ApprovalTicket> {
        self.state
            .read()
            .await
            .pending_by_employee
            .get(&employee_id)
            .copied()
    }
}

#[async_trait]
impl ApprovalEffects for MemoryApprovalQueue {
    async fn request_approval(&self, request: ApprovalRequest) -> Result<ApprovalReceipt> {
        let mut state = self.state.write().await;
        if let Some(ticket) = state.pending_by_employee.get(&request.employee_id) {
            tracing::debug!(%ticket, employee_id = %request.employee_id, "approval already requested");
            return Ok(ApprovalReceipt {
                ticket: *ticket,
                already_pending: true,
            });
        }

        let ticket = ApprovalTicket::new();
        state.pending_by_employee.insert(request.employee_id, ticket);
        state.entries.insert(
            ticket,
            QueueEntry {
                request,
                status: ApprovalStatus::Pending,
            },
        );
        Ok(ApprovalReceipt {
            ticket,
            already_pending: false,
        })
    }

    async fn approval_status(&self, ticket: ApprovalTicket) -> Result<ApprovalStatus> {
        self.state
            .read()
            .await
            .entries
            .get(&ticket)
            .map(|entry| entry.status)
            .ok_or_else(|| RollcallError::not_found(format!("unknown {ticket}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rollcall_core::effects::ApprovalReason;
    use rollcall_core::{EntryPoint, SessionId};

    fn request(employee: u64, at_ms: u64) -> ApprovalRequest {
        ApprovalRequest {
            employee_id: EmployeeId::new(employee),
            session_id: SessionId::new(),
            entry_point: EntryPoint::Login,
            attempted: None,
            reason: ApprovalReason::Skipped,
            requested_at_ms: at_ms,
        }
    }

    #[tokio::test]
    async fn test_second_request_returns_existing_ticket() {
        let queue = MemoryApprovalQueue::new();
        let first = queue.request_approval(request(1, 10)).await.unwrap();
        let second = queue.request_approval(request(1, 20)).await.unwrap();
        assert!(!first.already_pending);
        assert!(second.already_pending);
        assert_eq!(first.ticket, second.ticket);
        assert_eq!(queue.pending().await.len(), 1);
    }

    #[tokio::test]
    async fn test_decision_frees_employee_for_new_request() {
        let queue = MemoryApprovalQueue::new();
        let first = queue.request_approval(request(1, 10)).await.unwrap();
        queue.deny(first.ticket).await.unwrap();
        assert_eq!(
            queue.approval_status(first.ticket).await.unwrap(),
            ApprovalStatus::Decided(AdminDecision::Denied)
        );
        assert_eq!(queue.pending_for(EmployeeId::new(1)).await, None);

        let second = queue.request_approval(request(1, 30)).await.unwrap();
        assert_ne!(first.ticket, second.ticket);
        assert!(!second.already_pending);
    }

    #[tokio::test]
    async fn test_decide_errors() {
        let queue = MemoryApprovalQueue::new();
        assert_matches!(
            queue.approve(ApprovalTicket::new()).await,
            Err(RollcallError::NotFound { .. })
        );

        let receipt = queue.request_approval(request(2, 0)).await.unwrap();
        queue.approve(receipt.ticket).await.unwrap();
        assert_matches!(
            queue.deny(receipt.ticket).await,
            Err(RollcallError::Approval { .. })
        );
    }

    #[tokio::test]
    async fn test_pending_is_oldest_first() {
        let queue = MemoryApprovalQueue::new();
        queue.request_approval(request(1, 50)).await.unwrap();
        queue.request_approval(request(2, 10)).await.unwrap();
        let pending = queue.pending().await;
        assert_eq!(pending[0].1.employee_id, EmployeeId::new(2));
        assert_eq!(pending[1].1.employee_id, EmployeeId::new(1));
    }

    #[tokio::test]
    async fn test_prune_keeps_only_pending_tickets() {
        let queue = MemoryApprovalQueue::new();
        let decided = queue.request_approval(request(1, 10)).await.unwrap();
        let open = queue.request_approval(request(2, 20)).await.unwrap();
        queue.approve(decided.ticket).await.unwrap();

        assert_eq!(queue.prune_decided().await, 1);
        assert_matches!(
            queue.approval_status(decided.ticket).await,
            Err(RollcallError::NotFound { .. })
        );
        assert_eq!(
            queue.approval_status(open.ticket).await.unwrap(),
            ApprovalStatus::Pending
        );
        assert_eq!(queue.prune_decided().await, 0);
    }
}
