//! Rollcall Gate - attendance eligibility engine
//!
//! Decides whether an employee may mark attendance right now, combining two
//! independent checks:
//!
//! - **Geofence**: is the reported coordinate inside the attendance zone?
//! - **Biometric gate**: has the session passed face or fingerprint matching,
//!   or been routed to (and not denied by) admin approval?
//!
//! # Architecture
//!
//! The engine is pure. `BiometricGate` returns a `GateTransition` carrying
//! `GateCommand`s; `AttendanceService` loads the session record, runs the
//! gate, executes its commands through the effect traits in
//! `rollcall_core::effects`, and persists the result.
//!
//! The biometric check always runs before the location check.

#![allow(missing_docs)]
#![forbid(unsafe_code)]

/// Biometric state machine and attendance verdicts
pub mod gate;

/// Zone membership and status messages
pub mod geofence;

/// Transition, command, and fault types
pub mod guards;

/// Present/pending decision for allowed marks
pub mod marking;

/// Async session service over effect handlers
pub mod service;

pub use gate::{
    evaluate_attendance_attempt, is_gate_open, record_admin_decision, BiometricGate, GatePolicy,
};
pub use geofence::{describe_status, is_within_zone, location_summary, Geofence};
pub use guards::{GateCommand, GateFault, GateTransition};
pub use marking::{attendance_status, decide_attendance, AttendanceDecision};
pub use service::AttendanceService;
