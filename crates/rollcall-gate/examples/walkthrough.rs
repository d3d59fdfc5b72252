//! Walk one session through skip, approval, and marking with in-memory handlers.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p rollcall-gate --example walkthrough
//! ```

use rollcall_core::{Coordinate, EmployeeId, EntryPoint, Result, RollcallConfig, SessionId};
use rollcall_effects::MemoryEffects;
use rollcall_gate::{describe_status, location_summary, AttendanceService};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RollcallConfig::load(None)?;
    let effects = Arc::new(MemoryEffects::with_real_time());
    let service = AttendanceService::new(effects.clone(), config);

    let session = SessionId::new();
    let employee = EmployeeId::new(1);
    service.begin(session, employee).await?;

    let transition = service.verify(session, EntryPoint::Login, None).await?;
    println!("after skipping capture: {}", transition.to);

    let here = Coordinate::new(33.643, 73.184, 18.0);
    println!("{}", location_summary(Some(&here)));
    println!(
        "{}",
        describe_status(&here, &rollcall_core::ZoneConfig::default_bounds()).message
    );

    let decision = service.mark_attendance(session, Some(here)).await?;
    println!("mark while pending: {:?} / {:?}", decision.verdict, decision.status);

    if let Some(ticket) = effects.approvals().pending_for(employee).await {
        effects.approvals().approve(ticket).await?;
    }
    let state = service.poll_approval(session).await?;
    println!("after admin review: {state}");

    let decision = service.mark_attendance(session, Some(here)).await?;
    println!("mark after approval: {:?} / {:?}", decision.verdict, decision.status);

    service.end(session).await?;
    Ok(())
}
