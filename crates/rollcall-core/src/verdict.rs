//! Attendance verdict vocabulary shared by the gate and its callers.

use serde::{Deserialize, Serialize};

/// Why a coordinate failed the geofence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum OutsideZone {
    /// Valid coordinate beyond the zone boundary
    Outside {
        /// Great-circle distance to the nearest point of the zone (meters)
        distance_meters: f64,
        /// Accuracy reported with the sample (meters)
        accuracy_meters: f64,
    },
    /// NaN, infinite, or out-of-range latitude/longitude
    InvalidCoordinate,
    /// No coordinate was available (permission denied or unsupported)
    Unavailable,
}

impl OutsideZone {
    /// Distance to the zone, when one could be computed
    pub fn distance_meters(&self) -> Option<f64> {
        match self {
            OutsideZone::Outside {
                distance_meters, ..
            } => Some(*distance_meters),
            _ => None,
        }
    }
}

/// Result of evaluating one mark-attendance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum AttendanceVerdict {
    /// Attendance may be marked
    Allowed,
    /// Biometric gate passed but the location did not
    DeniedLocation {
        /// Detail about the failed location check
        outside: OutsideZone,
    },
    /// Biometric gate is closed
    DeniedBiometric,
}

impl AttendanceVerdict {
    pub fn denied_location(outside: OutsideZone) -> Self {
        Self::DeniedLocation { outside }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// How an allowed attendance mark should be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Backed by a recent biometric match or an admin approval
    Present,
    /// Recorded provisionally until an administrator reviews it
    PendingApproval,
}

/// Human-readable geofence status for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatus {
    pub in_zone: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serialization_shape() {
        let verdict = AttendanceVerdict::denied_location(OutsideZone::Unavailable);
        let json = serde_json::to_value(verdict).unwrap();
        assert_eq!(json["verdict"], "denied_location");
        assert_eq!(json["outside"]["reason"], "unavailable");
    }

    #[test]
    fn test_outside_distance_accessor() {
        let outside = OutsideZone::Outside {
            distance_meters: 120.0,
            accuracy_meters: 15.0,
        };
        assert_eq!(outside.distance_meters(), Some(120.0));
        assert_eq!(OutsideZone::InvalidCoordinate.distance_meters(), None);
    }
}
