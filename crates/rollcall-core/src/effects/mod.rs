//! Effect trait definitions
//!
//! Pure interfaces for every collaborator the attendance gate talks to. This
//! module defines **what** can be done; handlers in `rollcall-effects` define
//! **how**.
//!
//! - `MatchingEffects`: compare a sample against the enrolled reference
//! - `ApprovalEffects`: admin-approval workflow (request, poll)
//! - `SessionStoreEffects`: narrow load/save of the session's record
//! - `PhysicalTimeEffects`: wall-clock milliseconds
//!
//! All effect-using code is parameterized by these traits so tests can swap in
//! deterministic handlers.

pub mod approval;
pub mod matching;
pub mod session;
pub mod time;

pub use approval::{ApprovalEffects, ApprovalReason, ApprovalReceipt, ApprovalRequest, ApprovalStatus};
pub use matching::MatchingEffects;
pub use session::SessionStoreEffects;
pub use time::PhysicalTimeEffects;

/// Every effect an attendance session needs.
pub trait AttendanceEffects:
    MatchingEffects + ApprovalEffects + SessionStoreEffects + PhysicalTimeEffects
{
}

/// Automatic implementation for types that satisfy the required bounds
impl<T> AttendanceEffects for T where
    T: MatchingEffects + ApprovalEffects + SessionStoreEffects + PhysicalTimeEffects
{
}
