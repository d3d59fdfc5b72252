//! Attendance Service
//!
//! Async coordinator that drives the pure gate against real collaborators.
//!
//! # Architecture
//!
//! 1. Load the session's `VerificationRecord` and read the clock
//! 2. Ask the matching service about the sample (when there is one to match)
//! 3. Evaluate the gate synchronously, producing a `GateTransition`
//! 4. Execute the transition's commands (approval requests)
//! 5. Persist the updated record
//!
//! A failing collaborator aborts the operation before step 5, so the stored
//! state is never advanced past work that did not happen. Mutating operations
//! on one session are serialized: a second one started while the first is in
//! flight fails with `RollcallError::Busy`.

use crate::gate::{BiometricGate, GatePolicy};
use crate::guards::{GateCommand, GateTransition};
use crate::marking::{decide_attendance, AttendanceDecision};
use parking_lot::Mutex;
use rollcall_core::effects::{ApprovalRequest, ApprovalStatus, AttendanceEffects};
use rollcall_core::{
    AdminDecision, BiometricSample, Coordinate, EmployeeId, EntryPoint, MatchOutcome, Result,
    RollcallConfig, RollcallError, SessionId, VerificationRecord, VerificationState,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Session-level attendance service over an effects bundle
pub struct AttendanceService<E> {
    effects: Arc<E>,
    config: RollcallConfig,
    in_flight: Mutex<HashSet<SessionId>>,
}

impl<E: AttendanceEffects> AttendanceService<E> {
    /// Create a new attendance service
    pub fn new(effects: Arc<E>, config: RollcallConfig) -> Self {
        Self {
            effects,
            config,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Get the effects bundle
    pub fn effects(&self) -> &Arc<E> {
        &self.effects
    }

    /// Get the service configuration
    pub fn config(&self) -> &RollcallConfig {
        &self.config
    }

    /// Policy the service's gates run with
    pub fn policy(&self) -> GatePolicy {
        self.gate(EntryPoint::Login).policy()
    }

    fn gate(&self, entry: EntryPoint) -> BiometricGate {
        BiometricGate::from_config(entry, &self.config)
    }

    /// Start verification for a freshly authenticated session.
    ///
    /// Any record left over from a previous login is replaced.
    pub async fn begin(&self, session: SessionId, employee_id: EmployeeId) -> Result<VerificationRecord> {
        let _claim = self.claim(session)?;
        let now_ms = self.effects.now_ms().await?;
        let record = VerificationRecord::new(employee_id, now_ms);
        self.effects.save_record(session, &record).await?;
        tracing::info!(%session, %employee_id, "verification session started");
        Ok(record)
    }

    /// Current state of `session`
    pub async fn current_state(&self, session: SessionId) -> Result<VerificationState> {
        Ok(self.load(session).await?.state)
    }

    /// Full stored record of `session`
    pub async fn record(&self, session: SessionId) -> Result<VerificationRecord> {
        self.load(session).await
    }

    /// Submit a capture attempt (or `None` to skip capture).
    pub async fn verify(
        &self,
        session: SessionId,
        entry: EntryPoint,
        sample: Option<BiometricSample>,
    ) -> Result<GateTransition> {
        let _claim = self.claim(session)?;
        let mut record = self.load(session).await?;
        let now_ms = self.effects.now_ms().await?;

        let outcome = match &sample {
            Some(sample) if record.state.accepts_samples() && !sample.is_empty() => {
                self.match_enrolled(record.employee_id, sample).await?
            }
            _ => MatchOutcome::no_match(),
        };

        let transition = self
            .gate(entry)
            .submit_sample(record.state, sample.as_ref(), outcome);
        if !record.state.accepts_samples() {
            return Ok(transition);
        }

        for command in &transition.commands {
            self.execute(session, &mut record, command, now_ms).await?;
        }
        record.entry_point = Some(entry);
        record.transition(transition.to, now_ms);
        self.effects.save_record(session, &record).await?;
        Ok(transition)
    }

    /// Check the approval workflow for a decision on a pending session.
    ///
    /// Returns the (possibly updated) state. Sessions that are not pending, or
    /// that have no ticket, are returned unchanged.
    pub async fn poll_approval(&self, session: SessionId) -> Result<VerificationState> {
        let _claim = self.claim(session)?;
        let mut record = self.load(session).await?;
        let ticket = match (record.state, record.approval_ticket) {
            (VerificationState::PendingAdminApproval, Some(ticket)) => ticket,
            _ => return Ok(record.state),
        };

        match self.effects.approval_status(ticket).await? {
            ApprovalStatus::Pending => {
                tracing::debug!(%session, %ticket, "approval still pending");
                Ok(record.state)
            }
            ApprovalStatus::Decided(decision) => {
                self.decide(session, &mut record, decision).await?;
                Ok(record.state)
            }
        }
    }

    /// Record an admin decision pushed directly to the session.
    pub async fn apply_admin_decision(
        &self,
        session: SessionId,
        decision: AdminDecision,
    ) -> Result<GateTransition> {
        let _claim = self.claim(session)?;
        let mut record = self.load(session).await?;
        self.decide(session, &mut record, decision).await
    }

    /// Evaluate a mark-attendance attempt against the configured zone.
    ///
    /// `coord` is `None` when the location source is unavailable.
    pub async fn mark_attendance(
        &self,
        session: SessionId,
        coord: Option<Coordinate>,
    ) -> Result<AttendanceDecision> {
        let record = self.load(session).await?;
        let now_ms = self.effects.now_ms().await?;
        let gate = self.gate(record.entry_point.unwrap_or(EntryPoint::Dashboard));
        Ok(decide_attendance(
            &gate,
            &record,
            coord.as_ref(),
            &self.config.zone.area,
            now_ms,
            self.config.freshness_window_ms(),
        ))
    }

    /// Drop the session's record (logout). Returns whether one existed.
    pub async fn end(&self, session: SessionId) -> Result<bool> {
        let _claim = self.claim(session)?;
        let existed = self.effects.clear_record(session).await?;
        tracing::info!(%session, existed, "verification session ended");
        Ok(existed)
    }

    async fn match_enrolled(
        &self,
        employee_id: EmployeeId,
        sample: &BiometricSample,
    ) -> Result<MatchOutcome> {
        let kind = sample.kind();
        if !self.effects.is_enrolled(employee_id, kind).await? {
            tracing::debug!(%employee_id, %kind, "no enrolled reference, skipping matcher");
            return Ok(MatchOutcome::not_enrolled());
        }
        self.effects.match_sample(employee_id, sample).await
    }

    async fn load(&self, session: SessionId) -> Result<VerificationRecord> {
        self.effects
            .load_record(session)
            .await?
            .ok_or_else(|| RollcallError::not_found(format!("no verification record for {session}")))
    }

    async fn decide(
        &self,
        session: SessionId,
        record: &mut VerificationRecord,
        decision: AdminDecision,
    ) -> Result<GateTransition> {
        let gate = self.gate(record.entry_point.unwrap_or(EntryPoint::Dashboard));
        let transition = gate.apply_admin_decision(record.state, decision);
        if transition.is_change() {
            let now_ms = self.effects.now_ms().await?;
            record.transition(transition.to, now_ms);
            self.effects.save_record(session, record).await?;
        }
        Ok(transition)
    }

    async fn execute(
        &self,
        session: SessionId,
        record: &mut VerificationRecord,
        command: &GateCommand,
        now_ms: u64,
    ) -> Result<()> {
        match *command {
            GateCommand::RequestAdminApproval {
                reason,
                attempted,
                entry_point,
            } => {
                let receipt = self
                    .effects
                    .request_approval(ApprovalRequest {
                        employee_id: record.employee_id,
                        session_id: session,
                        entry_point,
                        attempted,
                        reason,
                        requested_at_ms: now_ms,
                    })
                    .await?;
                tracing::info!(
                    %session,
                    ticket = %receipt.ticket,
                    already_pending = receipt.already_pending,
                    "admin approval requested"
                );
                record.approval_ticket = Some(receipt.ticket);
            }
        }
        Ok(())
    }

    fn claim(&self, session: SessionId) -> Result<SessionClaim<'_>> {
        if !self.in_flight.lock().insert(session) {
            tracing::warn!(%session, "rejected concurrent operation");
            return Err(RollcallError::busy(format!("{session} has an operation in flight")));
        }
        Ok(SessionClaim {
            in_flight: &self.in_flight,
            session,
        })
    }
}

/// Releases the session's in-flight marker on drop
struct SessionClaim<'a> {
    in_flight: &'a Mutex<HashSet<SessionId>>,
    session: SessionId,
}

impl Drop for SessionClaim<'_> {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.session);
    }
}
