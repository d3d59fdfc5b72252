//! Rollcall configuration
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `ROLLCALL_*` environment variables. The merged result is validated
//! before use.
//!
//! ```toml
//! [zone]
//! name = "NUST H-12 Islamabad"
//!
//! [zone.area]
//! shape = "box"
//! lat_min = 33.60
//! lat_max = 33.70
//! lon_min = 72.95
//! lon_max = 73.25
//!
//! [matching]
//! face = 0.60
//! fingerprint = 0.85
//!
//! [verification]
//! freshness_window_secs = 600
//! pending_is_open = true
//! ```

pub mod validation;

use crate::biometric::MatchThresholds;
use crate::geo::{GeoBoundingBox, GeoCircle, GeoZone};
use crate::{Coordinate, Result, RollcallError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use validation::{ConfigValidator, ValidationError};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "ROLLCALL_";

/// Attendance zone definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Display name recorded with attendance marks
    pub name: String,
    /// Zone shape and bounds
    pub area: GeoZone,
}

impl ZoneConfig {
    /// Campus rectangle used when no zone is configured
    pub fn default_bounds() -> GeoBoundingBox {
        DEFAULT_BOUNDS
    }

    /// Radius zone centered on the campus marker
    pub fn campus_radius(radius_meters: f64) -> Result<GeoCircle> {
        GeoCircle::new(Coordinate::at(33.643, 73.184), radius_meters)
    }
}

const DEFAULT_BOUNDS: GeoBoundingBox = GeoBoundingBox::from_trusted(33.60, 33.70, 72.95, 73.25);

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            name: "NUST H-12 Islamabad".to_string(),
            area: GeoZone::Box(DEFAULT_BOUNDS),
        }
    }
}

/// Verification policy knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// How long a biometric match counts as fresh for a `Present` mark
    pub freshness_window_secs: u64,
    /// Treat `PendingAdminApproval` as gate-open (fail-open)
    pub pending_is_open: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: 600,
            pending_is_open: true,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RollcallConfig {
    pub zone: ZoneConfig,
    pub matching: MatchThresholds,
    pub verification: VerificationConfig,
}

impl RollcallConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults, then `path` if given, then process environment; validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        tracing::debug!(zone = %config.zone.name, "configuration loaded");
        Ok(config)
    }

    /// Apply `ROLLCALL_*` variables from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `ROLLCALL_*` pairs from any source (e.g. `ROLLCALL_MATCHING_FACE=0.7`)
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            if let Some(rest) = key.as_ref().strip_prefix(ENV_PREFIX) {
                let config_key = rest.to_lowercase();
                self.set_from_string(&config_key, value.as_ref())?;
            }
        }
        Ok(())
    }

    /// Set a single value by flattened key (`section_field`)
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "zone_name" => self.zone.name = value.to_string(),
            "matching_face" => self.matching.face = parse_value(key, value)?,
            "matching_fingerprint" => self.matching.fingerprint = parse_value(key, value)?,
            "verification_freshness_window_secs" => {
                self.verification.freshness_window_secs = parse_value(key, value)?;
            }
            "verification_pending_is_open" => {
                self.verification.pending_is_open = parse_value(key, value)?;
            }
            other => {
                tracing::debug!(key = other, "ignoring unknown configuration override");
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut zone = ConfigValidator::for_section("zone");
        zone.non_empty("name", &self.zone.name);

        let mut matching = ConfigValidator::for_section("matching");
        matching
            .range("face", self.matching.face, Some(0.0), Some(1.0))
            .range("fingerprint", self.matching.fingerprint, Some(0.0), Some(1.0));

        let mut verification = ConfigValidator::for_section("verification");
        verification.check(
            "freshness_window_secs",
            self.verification.freshness_window_secs > 0,
            "must be greater than zero",
        );

        let mut validator = ConfigValidator::new();
        validator.absorb(zone).absorb(matching).absorb(verification);
        validator.finish()
    }

    /// Freshness window in milliseconds
    pub fn freshness_window_ms(&self) -> u64 {
        self.verification.freshness_window_secs.saturating_mul(1_000)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RollcallError::invalid(format!("cannot parse override {key}={value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = RollcallConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.matching.face, 0.60);
        assert_eq!(config.matching.fingerprint, 0.85);
        assert_eq!(config.freshness_window_ms(), 600_000);
        assert!(config.verification.pending_is_open);
    }

    #[test]
    fn test_parse_toml_with_radius_zone() {
        let config = RollcallConfig::from_toml_str(
            r#"
            [zone]
            name = "Campus"

            [zone.area]
            shape = "radius"
            center_latitude = 33.643
            center_longitude = 73.184
            radius_meters = 400.0

            [verification]
            freshness_window_secs = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.zone.name, "Campus");
        assert!(matches!(config.zone.area, GeoZone::Radius(_)));
        assert_eq!(config.verification.freshness_window_secs, 300);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.matching, MatchThresholds::default());
        assert!(config.verification.pending_is_open);
    }

    #[test]
    fn test_zone_name_alone_keeps_default_area() {
        let config = RollcallConfig::from_toml_str(
            r#"
            [zone]
            name = "Annex"
            "#,
        )
        .unwrap();
        assert_eq!(config.zone.name, "Annex");
        assert_eq!(config.zone.area, GeoZone::Box(ZoneConfig::default_bounds()));

        let config = RollcallConfig::from_toml_str(
            r#"
            [zone.area]
            shape = "radius"
            center_latitude = 33.643
            center_longitude = 73.184
            radius_meters = 250.0
            "#,
        )
        .unwrap();
        assert_eq!(config.zone.name, ZoneConfig::default().name);
    }

    #[test]
    fn test_inverted_bounds_rejected_at_parse() {
        let err = RollcallConfig::from_toml_str(
            r#"
            [zone]
            name = "Broken"
            [zone.area]
            shape = "box"
            lat_min = 33.70
            lat_max = 33.60
            lon_min = 72.95
            lon_max = 73.25
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RollcallError::Invalid { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RollcallConfig::default();
        config
            .merge_with_vars([
                ("ROLLCALL_MATCHING_FACE", "0.7"),
                ("ROLLCALL_VERIFICATION_PENDING_IS_OPEN", "false"),
                ("ROLLCALL_ZONE_NAME", "Annex"),
                ("UNRELATED", "x"),
            ])
            .unwrap();

        assert_eq!(config.matching.face, 0.7);
        assert!(!config.verification.pending_is_open);
        assert_eq!(config.zone.name, "Annex");
    }

    #[test]
    fn test_bad_override_is_invalid() {
        let mut config = RollcallConfig::default();
        let err = config
            .merge_with_vars([("ROLLCALL_MATCHING_FACE", "high")])
            .unwrap_err();
        assert!(matches!(err, RollcallError::Invalid { .. }));
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = RollcallConfig::default();
        config.zone.name = String::new();
        config.matching.fingerprint = 1.2;
        config.verification.freshness_window_secs = 0;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("zone.name"));
        assert!(message.contains("matching.fingerprint"));
        assert!(message.contains("verification.freshness_window_secs"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollcall.toml");
        std::fs::write(
            &path,
            "[matching]\nface = 0.65\n\n[verification]\nfreshness_window_secs = 120\n",
        )
        .unwrap();

        let config = RollcallConfig::load_from_file(&path).unwrap();
        assert_eq!(config.matching.face, 0.65);
        assert_eq!(config.freshness_window_ms(), 120_000);
        assert_eq!(config.zone, ZoneConfig::default());

        let missing = RollcallConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, RollcallError::NotFound { .. }));
    }

    #[test]
    fn test_campus_radius_helper() {
        let circle = ZoneConfig::campus_radius(250.0).unwrap();
        assert_eq!(circle.radius_meters(), 250.0);
        assert_eq!(ZoneConfig::default_bounds().lat_min(), 33.60);
    }
}
