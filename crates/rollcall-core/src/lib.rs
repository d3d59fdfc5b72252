//! Rollcall Core - shared vocabulary and effect interfaces
//!
//! Foundation crate for the attendance gate. It holds the data model
//! (coordinates, zones, biometric samples, verification state, verdicts), the
//! unified error type, configuration, and the effect traits that the session
//! service is parameterized over. It contains no decision logic; that lives
//! in `rollcall-gate`.

#![allow(missing_docs)]
#![forbid(unsafe_code)]

/// Biometric samples, kinds, and match outcomes
pub mod biometric;

/// Layered configuration (defaults, TOML, environment)
pub mod config;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Coordinates and zone shapes
pub mod geo;

/// Session, employee, and approval identifiers
pub mod identifiers;

/// Attendance verdicts and statuses
pub mod verdict;

/// Verification state machine vocabulary
pub mod verification;

pub use biometric::{BiometricKind, BiometricSample, MatchOutcome, MatchThresholds};
pub use config::{RollcallConfig, VerificationConfig, ZoneConfig};
pub use errors::{Result, RollcallError};
pub use geo::{Coordinate, GeoBoundingBox, GeoCircle, GeoZone};
pub use identifiers::{ApprovalTicket, EmployeeId, SessionId};
pub use verdict::{AttendanceStatus, AttendanceVerdict, OutsideZone, ZoneStatus};
pub use verification::{AdminDecision, EntryPoint, VerificationRecord, VerificationState};
