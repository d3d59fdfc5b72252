//! Biometric samples and match outcomes
//!
//! Samples arrive from an external capture device (a camera frame for faces,
//! a line-drawing canvas for fingerprint patterns). Comparison against the
//! enrolled reference is owned by a matching service; this module only
//! describes what goes in and what comes back.

use serde::{Deserialize, Serialize};

/// Kinds of biometric evidence accepted at the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiometricKind {
    /// Camera-captured face image
    Face,
    /// Drawn fingerprint pattern
    Fingerprint,
}

impl BiometricKind {
    /// Get human-readable name for the biometric kind
    pub fn display_name(&self) -> &'static str {
        match self {
            BiometricKind::Face => "Face",
            BiometricKind::Fingerprint => "Fingerprint",
        }
    }
}

impl std::fmt::Display for BiometricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One captured biometric sample.
///
/// An attempt carries at most one sample. A missing sample (`None` at call
/// sites) and a sample with empty bytes both mean "skip verification".
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "bytes", rename_all = "snake_case")]
pub enum BiometricSample {
    /// Encoded face frame
    Face(#[serde(with = "serde_bytes")] Vec<u8>),
    /// Encoded fingerprint drawing
    FingerprintPattern(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl BiometricSample {
    pub fn kind(&self) -> BiometricKind {
        match self {
            BiometricSample::Face(_) => BiometricKind::Face,
            BiometricSample::FingerprintPattern(_) => BiometricKind::Fingerprint,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            BiometricSample::Face(bytes) | BiometricSample::FingerprintPattern(bytes) => bytes,
        }
    }

    /// `true` when the capture produced no data
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

// Sample bytes are biometric data; keep them out of logs.
impl std::fmt::Debug for BiometricSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiometricSample")
            .field("kind", &self.kind())
            .field("len", &self.bytes().len())
            .finish()
    }
}

/// Result reported by the matching service for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Whether the sample matched the enrolled reference
    pub matched: bool,
    /// Similarity score in `[0, 1]`, when the service reports one
    pub score: Option<f32>,
    /// `false` when no reference of the sample's kind is enrolled
    #[serde(default = "enrolled_by_default")]
    pub enrolled: bool,
}

fn enrolled_by_default() -> bool {
    true
}

impl MatchOutcome {
    /// Positive match without a score
    pub fn matched() -> Self {
        Self {
            matched: true,
            score: None,
            enrolled: true,
        }
    }

    /// Negative match without a score
    pub fn no_match() -> Self {
        Self {
            matched: false,
            score: None,
            enrolled: true,
        }
    }

    /// No reference enrolled for the sample's kind; never a match
    pub fn not_enrolled() -> Self {
        Self {
            matched: false,
            score: None,
            enrolled: false,
        }
    }

    /// Outcome derived from a similarity score and a threshold
    pub fn from_score(score: f32, threshold: f32) -> Self {
        Self {
            matched: score.is_finite() && score >= threshold,
            score: Some(score),
            enrolled: true,
        }
    }
}

/// Minimum similarity per biometric kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Minimum cosine similarity for a face match
    pub face: f32,
    /// Minimum cosine similarity for a fingerprint match
    pub fingerprint: f32,
}

impl MatchThresholds {
    /// Threshold for the given kind
    pub fn for_kind(&self, kind: BiometricKind) -> f32 {
        match kind {
            BiometricKind::Face => self.face,
            BiometricKind::Fingerprint => self.fingerprint,
        }
    }
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            face: 0.60,
            fingerprint: 0.85,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_kind_and_emptiness() {
        let face = BiometricSample::Face(vec![1, 2, 3]);
        assert_eq!(face.kind(), BiometricKind::Face);
        assert!(!face.is_empty());

        let drawing = BiometricSample::FingerprintPattern(Vec::new());
        assert_eq!(drawing.kind(), BiometricKind::Fingerprint);
        assert!(drawing.is_empty());
    }

    #[test]
    fn test_sample_debug_hides_bytes() {
        let face = BiometricSample::Face(vec![0xde, 0xad, 0xbe, 0xef]);
        let rendered = format!("{face:?}");
        assert!(rendered.contains("len: 4"));
        assert!(!rendered.contains("222"));
    }

    #[test]
    fn test_outcome_from_score_applies_threshold() {
        let thresholds = MatchThresholds::default();
        assert!(MatchOutcome::from_score(0.60, thresholds.for_kind(BiometricKind::Face)).matched);
        assert!(!MatchOutcome::from_score(0.59, thresholds.for_kind(BiometricKind::Face)).matched);
        assert!(
            !MatchOutcome::from_score(0.80, thresholds.for_kind(BiometricKind::Fingerprint))
                .matched
        );
        assert!(!MatchOutcome::from_score(f32::NAN, 0.0).matched);
    }

    #[test]
    fn test_outcome_enrollment_defaults_on_deserialize() {
        let outcome: MatchOutcome = serde_json::from_str(r#"{"matched":true,"score":0.9}"#).unwrap();
        assert!(outcome.enrolled);
        assert!(!MatchOutcome::not_enrolled().enrolled);
        assert!(!MatchOutcome::not_enrolled().matched);
    }
}
