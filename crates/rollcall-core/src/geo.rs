//! Geographic primitives: reported coordinates and attendance zone shapes.

use crate::errors::{Result, RollcallError};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances (meters).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A single geolocation sample.
///
/// Samples are immutable; a newer sample replaces the previous one rather than
/// being updated in place. Values are taken as reported, so NaN or out-of-range
/// numbers can appear here and must be handled by whoever evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Reported horizontal accuracy radius (meters)
    pub accuracy_meters: f64,
}

impl Coordinate {
    /// Create a coordinate sample
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
        }
    }

    /// Create a coordinate with unknown (zero) accuracy
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, 0.0)
    }

    /// `true` when latitude and longitude are finite and inside the
    /// WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in meters (haversine).
    ///
    /// Returns NaN when either coordinate is not finite.
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // Rounding can push `a` just past 1.0 for antipodal points.
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }
}

/// Unchecked wire shape of [`GeoBoundingBox`], validated on conversion.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawBoundingBox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

/// Rectangular attendance zone in latitude/longitude space.
///
/// Invariant: all bounds are finite, `lat_min < lat_max` and
/// `lon_min < lon_max`. Both [`GeoBoundingBox::new`] and deserialization
/// enforce it, so a held value is always well formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundingBox")]
pub struct GeoBoundingBox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl GeoBoundingBox {
    /// Create a bounding box, rejecting inverted, empty, or non-finite bounds.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Result<Self> {
        let bounds = [lat_min, lat_max, lon_min, lon_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(RollcallError::invalid(
                "bounding box bounds must be finite numbers",
            ));
        }
        if lat_min >= lat_max {
            return Err(RollcallError::invalid(format!(
                "bounding box requires lat_min < lat_max (got {lat_min} >= {lat_max})"
            )));
        }
        if lon_min >= lon_max {
            return Err(RollcallError::invalid(format!(
                "bounding box requires lon_min < lon_max (got {lon_min} >= {lon_max})"
            )));
        }
        if lat_min < -90.0 || lat_max > 90.0 {
            return Err(RollcallError::invalid("latitude bounds must lie in [-90, 90]"));
        }
        if lon_min < -180.0 || lon_max > 180.0 {
            return Err(RollcallError::invalid(
                "longitude bounds must lie in [-180, 180]",
            ));
        }
        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    /// Build from bounds already known to satisfy the invariant.
    pub(crate) const fn from_trusted(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }

    /// Geometric center of the box
    pub fn center(&self) -> Coordinate {
        Coordinate::at(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// Closest point of the box to `coord` (the coordinate itself when inside).
    pub fn clamp(&self, coord: &Coordinate) -> Coordinate {
        Coordinate::at(
            coord.latitude.clamp(self.lat_min, self.lat_max),
            coord.longitude.clamp(self.lon_min, self.lon_max),
        )
    }
}

impl TryFrom<RawBoundingBox> for GeoBoundingBox {
    type Error = RollcallError;

    fn try_from(raw: RawBoundingBox) -> Result<Self> {
        Self::new(raw.lat_min, raw.lat_max, raw.lon_min, raw.lon_max)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawCircle {
    center_latitude: f64,
    center_longitude: f64,
    radius_meters: f64,
}

/// Circular attendance zone measured by great-circle distance from a center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircle")]
pub struct GeoCircle {
    center_latitude: f64,
    center_longitude: f64,
    radius_meters: f64,
}

impl GeoCircle {
    /// Create a circular zone. The center must be a valid coordinate and the
    /// radius finite and positive.
    pub fn new(center: Coordinate, radius_meters: f64) -> Result<Self> {
        if !center.is_valid() {
            return Err(RollcallError::invalid("circle center must be a valid coordinate"));
        }
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(RollcallError::invalid(format!(
                "circle radius must be positive (got {radius_meters})"
            )));
        }
        Ok(Self {
            center_latitude: center.latitude,
            center_longitude: center.longitude,
            radius_meters,
        })
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::at(self.center_latitude, self.center_longitude)
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }
}

impl TryFrom<RawCircle> for GeoCircle {
    type Error = RollcallError;

    fn try_from(raw: RawCircle) -> Result<Self> {
        Self::new(
            Coordinate::at(raw.center_latitude, raw.center_longitude),
            raw.radius_meters,
        )
    }
}

/// Either supported zone shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GeoZone {
    /// Inclusive latitude/longitude rectangle
    Box(GeoBoundingBox),
    /// Great-circle radius around a center
    Radius(GeoCircle),
}

impl From<GeoBoundingBox> for GeoZone {
    fn from(bounds: GeoBoundingBox) -> Self {
        Self::Box(bounds)
    }
}

impl From<GeoCircle> for GeoZone {
    fn from(circle: GeoCircle) -> Self {
        Self::Radius(circle)
    }
}
