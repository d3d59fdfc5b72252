//! Gate transition types
//!
//! Gate evaluation is pure and synchronous. Anything that needs a collaborator
//! (filing an approval request) comes back as a [`GateCommand`] for the caller
//! to execute; the gate never performs I/O.
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────┐     ┌──────────────────┐
//! │ state + sample + │ --> │  BiometricGate  │ --> │  GateTransition  │
//! │ match outcome    │     │  (pure, sync)   │     │ (state + cmds)   │
//! └──────────────────┘     └─────────────────┘     └──────────────────┘
//!                                                           │
//!                                                           v
//!                                                  ┌──────────────────┐
//!                                                  │ AttendanceService│
//!                                                  │ (async effects)  │
//!                                                  └──────────────────┘
//! ```

use rollcall_core::effects::ApprovalReason;
use rollcall_core::{BiometricKind, EntryPoint, VerificationState};
use serde::{Deserialize, Serialize};

/// Side effect requested by a gate transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateCommand {
    /// File an admin-approval request for the session
    RequestAdminApproval {
        reason: ApprovalReason,
        attempted: Option<BiometricKind>,
        entry_point: EntryPoint,
    },
}

/// Input problems the gate absorbs instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateFault {
    /// Coordinate was NaN, infinite, or out of range; treated as outside
    InvalidCoordinate,
    /// Operation not applicable in the current state; ignored
    InvalidTransition { from: VerificationState },
    /// Sample had no bytes; routed to admin approval
    EmptySample { kind: BiometricKind },
}

impl std::fmt::Display for GateFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateFault::InvalidCoordinate => write!(f, "invalid coordinate treated as outside zone"),
            GateFault::InvalidTransition { from } => {
                write!(f, "operation ignored in state {from}")
            }
            GateFault::EmptySample { kind } => {
                write!(f, "empty {kind} sample routed to admin approval")
            }
        }
    }
}

/// Outcome of one gate operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateTransition {
    /// State before the operation
    pub from: VerificationState,
    /// State after the operation
    pub to: VerificationState,
    /// Commands for the caller to execute
    pub commands: Vec<GateCommand>,
    /// Absorbed input problem, if any
    pub fault: Option<GateFault>,
}

impl GateTransition {
    /// Transition that leaves `state` as it was
    pub fn unchanged(state: VerificationState) -> Self {
        Self {
            from: state,
            to: state,
            commands: Vec::new(),
            fault: None,
        }
    }

    /// Plain move from one state to another
    pub fn moved(from: VerificationState, to: VerificationState) -> Self {
        Self {
            from,
            to,
            commands: Vec::new(),
            fault: None,
        }
    }

    pub fn with_command(mut self, command: GateCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_fault(mut self, fault: GateFault) -> Self {
        self.fault = Some(fault);
        self
    }

    /// `true` if the state actually changed
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }

    /// The approval request command, if this transition carries one
    pub fn approval_request(&self) -> Option<&GateCommand> {
        self.commands
            .iter()
            .find(|command| matches!(command, GateCommand::RequestAdminApproval { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_transition() {
        let transition = GateTransition::unchanged(VerificationState::FaceMatched);
        assert!(!transition.is_change());
        assert!(transition.commands.is_empty());
        assert!(transition.approval_request().is_none());
    }

    #[test]
    fn test_transition_builders() {
        let transition = GateTransition::moved(
            VerificationState::Unverified,
            VerificationState::PendingAdminApproval,
        )
        .with_command(GateCommand::RequestAdminApproval {
            reason: ApprovalReason::EmptySample,
            attempted: Some(BiometricKind::Face),
            entry_point: EntryPoint::Login,
        })
        .with_fault(GateFault::EmptySample {
            kind: BiometricKind::Face,
        });

        assert!(transition.is_change());
        assert!(transition.approval_request().is_some());
        assert_eq!(
            transition.fault.map(|f| f.to_string()),
            Some("empty Face sample routed to admin approval".to_string())
        );
    }
}
