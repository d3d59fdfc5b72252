//! Reference biometric matcher
//!
//! Treats sample bytes as a frame of feature values. Enrolled and captured
//! frames are z-normalized and compared by cosine similarity, then the
//! kind-specific threshold from [`MatchThresholds`] decides the outcome.
//! Frames of different lengths, flat frames, and missing enrollments never
//! match.

use async_trait::async_trait;
use rollcall_core::effects::MatchingEffects;
use rollcall_core::{
    BiometricKind, BiometricSample, EmployeeId, MatchOutcome, MatchThresholds, Result,
    RollcallError,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Enrolled reference frames keyed by employee and kind
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateRegistry {
    templates: Arc<RwLock<HashMap<(EmployeeId, BiometricKind), Vec<f32>>>>,
}

impl MemoryTemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll `sample` as the reference for its kind, replacing any previous one
    pub async fn enroll(&self, employee_id: EmployeeId, sample: &BiometricSample) -> Result<()> {
        if sample.is_empty() {
            return Err(RollcallError::invalid("cannot enroll an empty sample"));
        }
        let features = features_of(sample);
        self.templates
            .write()
            .await
            .insert((employee_id, sample.kind()), features);
        tracing::debug!(%employee_id, kind = %sample.kind(), "template enrolled");
        Ok(())
    }

    pub async fn remove(&self, employee_id: EmployeeId, kind: BiometricKind) -> bool {
        self.templates
            .write()
            .await
            .remove(&(employee_id, kind))
            .is_some()
    }

    async fn get(&self, employee_id: EmployeeId, kind: BiometricKind) -> Option<Vec<f32>> {
        self.templates.read().await.get(&(employee_id, kind)).cloned()
    }
}

/// Cosine-similarity matcher over a template registry
#[derive(Debug, Clone, Default)]
pub struct CosineMatchingHandler {
    registry: MemoryTemplateRegistry,
    thresholds: MatchThresholds,
}

impl CosineMatchingHandler {
    pub fn new(registry: MemoryTemplateRegistry, thresholds: MatchThresholds) -> Self {
        Self {
            registry,
            thresholds,
        }
    }

    pub fn registry(&self) -> &MemoryTemplateRegistry {
        &self.registry
    }

    pub fn thresholds(&self) -> MatchThresholds {
        self.thresholds
    }
}

#[async_trait]
impl MatchingEffects for CosineMatchingHandler {
    async fn match_sample(
        &self,
        employee_id: EmployeeId,
        sample: &BiometricSample,
    ) -> Result<MatchOutcome> {
        let kind = sample.kind();
        let Some(reference) = self.registry.get(employee_id, kind).await else {
            tracing::debug!(%employee_id, %kind, "no enrolled template");
            return Ok(MatchOutcome::no_match());
        };

        let outcome = match cosine_similarity(&reference, &features_of(sample)) {
            Some(score) => MatchOutcome::from_score(score, self.thresholds.for_kind(kind)),
            None => MatchOutcome::no_match(),
        };
        tracing::debug!(%employee_id, %kind, score = ?outcome.score, matched = outcome.matched, "sample compared");
        Ok(outcome)
    }

    async fn is_enrolled(&self, employee_id: EmployeeId, kind: BiometricKind) -> Result<bool> {
        Ok(self.registry.get(employee_id, kind).await.is_some())
    }
}

fn features_of(sample: &BiometricSample) -> Vec<f32> {
    sample.bytes().iter().map(|&b| f32::from(b)).collect()
}

fn z_normalize(values: &[f32]) -> Option<Vec<f32>> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    let std_dev = variance.sqrt();
    if !std_dev.is_normal() {
        return None;
    }
    Some(values.iter().map(|v| (v - mean) / std_dev).collect())
}

/// Cosine similarity of two z-normalized frames, in `[-1, 1]`.
///
/// `None` when the frames differ in length, are empty, or have no variance.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }
    let a = z_normalize(a)?;
    let b = z_normalize(b)?;
    let dot: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let similarity = dot / (norm_a * norm_b);
    similarity.is_finite().then(|| similarity.clamp(-1.0, 1.0))
}
