//! Rollcall Effects - handler implementations
//!
//! Concrete handlers for the effect traits in `rollcall_core::effects`:
//!
//! - `MemorySessionStore`: session records as JSON bytes in memory
//! - `MemoryApprovalQueue`: admin-approval queue with per-employee dedupe
//! - `CosineMatchingHandler`: reference matcher over enrolled feature frames
//! - `RealTimeHandler` / `FixedTimeHandler`: wall clock and controllable clock
//!
//! `MemoryEffects` bundles all four so it satisfies `AttendanceEffects`.

#![allow(missing_docs)]
#![forbid(unsafe_code)]

pub mod approval;
pub mod bundle;
pub mod matching;
pub mod session;
pub mod time;

pub use approval::MemoryApprovalQueue;
pub use bundle::MemoryEffects;
pub use matching::{cosine_similarity, CosineMatchingHandler, MemoryTemplateRegistry};
pub use session::MemorySessionStore;
pub use time::{FixedTimeHandler, RealTimeHandler};
