//! Biometric matching effect
//!
//! The enrolled reference template lives with the matching service (usually a
//! remote call). Callers hand over the captured sample and get a
//! [`MatchOutcome`] back; they never see the template.

use crate::biometric::{BiometricKind, BiometricSample, MatchOutcome};
use crate::identifiers::EmployeeId;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MatchingEffects: Send + Sync {
    /// Compare `sample` against the reference enrolled for `employee_id`.
    ///
    /// A missing enrollment for the sample's kind is reported as a no-match
    /// outcome, not as an error.
    async fn match_sample(
        &self,
        employee_id: EmployeeId,
        sample: &BiometricSample,
    ) -> Result<MatchOutcome>;

    /// Whether a reference of `kind` is enrolled for `employee_id`
    async fn is_enrolled(&self, employee_id: EmployeeId, kind: BiometricKind) -> Result<bool>;
}
