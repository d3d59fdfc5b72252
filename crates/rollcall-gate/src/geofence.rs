//! Geofence evaluation
//!
//! Pure, total membership checks for the attendance zone. Nothing here panics
//! or errors: NaN, infinite, and out-of-range coordinates are simply outside.
//! The rectangle check is the primary contract; the radius shape is available
//! for deployments that prefer a great-circle boundary.

use rollcall_core::{Coordinate, GeoBoundingBox, GeoCircle, GeoZone, OutsideZone, ZoneStatus};

/// Status message when the coordinate is inside the zone
pub const IN_ZONE_MESSAGE: &str = "You are inside the attendance zone. Ready to mark attendance.";

/// Status message when the coordinate is outside the zone (or unreadable)
pub const OUT_OF_ZONE_MESSAGE: &str =
    "You are outside the attendance zone. Move into the zone to mark attendance.";

/// A region that can decide coordinate membership.
pub trait Geofence {
    /// `true` iff `coord` lies in the region. Must be total.
    fn contains(&self, coord: &Coordinate) -> bool;

    /// Great-circle distance from `coord` to the nearest point of the region
    /// (zero inside, NaN when `coord` is not a valid WGS84 reading).
    fn distance_outside(&self, coord: &Coordinate) -> f64;

    /// Explain why `coord` failed the check, or `None` when it is inside.
    fn locate(&self, coord: &Coordinate) -> Option<OutsideZone> {
        if self.contains(coord) {
            return None;
        }
        if !coord.is_valid() {
            return Some(OutsideZone::InvalidCoordinate);
        }
        Some(OutsideZone::Outside {
            distance_meters: self.distance_outside(coord),
            accuracy_meters: coord.accuracy_meters,
        })
    }
}

impl Geofence for GeoBoundingBox {
    fn contains(&self, coord: &Coordinate) -> bool {
        is_within_zone(coord, self)
    }

    fn distance_outside(&self, coord: &Coordinate) -> f64 {
        if !coord.is_valid() {
            return f64::NAN;
        }
        coord.distance_meters(&self.clamp(coord))
    }
}

impl Geofence for GeoCircle {
    fn contains(&self, coord: &Coordinate) -> bool {
        if !coord.is_valid() {
            return false;
        }
        self.center().distance_meters(coord) <= self.radius_meters()
    }

    fn distance_outside(&self, coord: &Coordinate) -> f64 {
        // `f64::max` would swallow a NaN distance
        if !coord.is_valid() {
            return f64::NAN;
        }
        (self.center().distance_meters(coord) - self.radius_meters()).max(0.0)
    }
}

impl Geofence for GeoZone {
    fn contains(&self, coord: &Coordinate) -> bool {
        match self {
            GeoZone::Box(bounds) => bounds.contains(coord),
            GeoZone::Radius(circle) => circle.contains(coord),
        }
    }

    fn distance_outside(&self, coord: &Coordinate) -> f64 {
        match self {
            GeoZone::Box(bounds) => bounds.distance_outside(coord),
            GeoZone::Radius(circle) => circle.distance_outside(coord),
        }
    }
}

/// Inclusive bounding-box membership.
///
/// Comparisons against NaN are false, so malformed input is outside without
/// any special casing.
pub fn is_within_zone(coord: &Coordinate, bounds: &GeoBoundingBox) -> bool {
    bounds.lat_min() <= coord.latitude
        && coord.latitude <= bounds.lat_max()
        && bounds.lon_min() <= coord.longitude
        && coord.longitude <= bounds.lon_max()
}

/// Membership plus the fixed display message for that branch.
pub fn describe_status(coord: &Coordinate, bounds: &GeoBoundingBox) -> ZoneStatus {
    describe_zone_status(coord, bounds)
}

/// [`describe_status`] for any zone shape
pub fn describe_zone_status<Z: Geofence + ?Sized>(coord: &Coordinate, zone: &Z) -> ZoneStatus {
    let in_zone = zone.contains(coord);
    let message = if in_zone {
        IN_ZONE_MESSAGE
    } else {
        OUT_OF_ZONE_MESSAGE
    };
    ZoneStatus {
        in_zone,
        message: message.to_string(),
    }
}

/// One-line summary of the current location reading, including accuracy.
pub fn location_summary(coord: Option<&Coordinate>) -> String {
    match coord {
        Some(coord) if coord.is_valid() => {
            if coord.accuracy_meters.is_finite() && coord.accuracy_meters > 0.0 {
                format!("Location enabled (Accuracy: {:.0}m)", coord.accuracy_meters)
            } else {
                "Location enabled".to_string()
            }
        }
        Some(_) => "Location reading is invalid - please retry".to_string(),
        None => "Location disabled - enable location to mark attendance".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn campus() -> GeoBoundingBox {
        GeoBoundingBox::new(33.60, 33.70, 72.95, 73.25).unwrap()
    }

    #[test]
    fn test_campus_point_is_inside() {
        let coord = Coordinate::new(33.643, 73.184, 12.0);
        assert!(is_within_zone(&coord, &campus()));
    }

    #[test]
    fn test_south_of_campus_is_outside() {
        let coord = Coordinate::at(33.50, 73.184);
        assert!(!is_within_zone(&coord, &campus()));
    }

    #[test]
    fn test_corners_are_inclusive() {
        let bounds = campus();
        for lat in [bounds.lat_min(), bounds.lat_max()] {
            for lon in [bounds.lon_min(), bounds.lon_max()] {
                assert!(is_within_zone(&Coordinate::at(lat, lon), &bounds));
            }
        }
    }

    #[test]
    fn test_non_finite_input_is_outside() {
        let bounds = campus();
        for coord in [
            Coordinate::at(f64::NAN, 73.1),
            Coordinate::at(33.65, f64::NAN),
            Coordinate::at(f64::INFINITY, f64::NEG_INFINITY),
        ] {
            assert!(!is_within_zone(&coord, &bounds));
            assert_matches!(bounds.locate(&coord), Some(OutsideZone::InvalidCoordinate));
        }
    }

    #[test]
    fn test_describe_status_messages() {
        let bounds = campus();
        let inside = describe_status(&Coordinate::at(33.65, 73.0), &bounds);
        assert!(inside.in_zone);
        assert_eq!(inside.message, IN_ZONE_MESSAGE);

        let outside = describe_status(&Coordinate::at(33.80, 73.0), &bounds);
        assert!(!outside.in_zone);
        assert_eq!(outside.message, OUT_OF_ZONE_MESSAGE);
    }

    #[test]
    fn test_locate_reports_distance_to_nearest_edge() {
        let bounds = campus();
        // 0.1 degrees south of lat_min on an interior meridian: ~11.1 km.
        let coord = Coordinate::new(33.50, 73.10, 25.0);
        let outside = bounds.locate(&coord).unwrap();
        assert_matches!(
            outside,
            OutsideZone::Outside { distance_meters, accuracy_meters }
                if (distance_meters - 11_119.5).abs() < 25.0 && accuracy_meters == 25.0
        );
        assert_eq!(bounds.locate(&Coordinate::at(33.65, 73.10)), None);
    }

    #[test]
    fn test_radius_zone() {
        let circle = GeoCircle::new(Coordinate::at(33.643, 73.184), 500.0).unwrap();
        assert!(circle.contains(&Coordinate::at(33.643, 73.184)));
        // ~1.1 km north of the center
        assert!(!circle.contains(&Coordinate::at(33.653, 73.184)));
        assert!(!circle.contains(&Coordinate::at(f64::NAN, 73.184)));

        let zone = GeoZone::from(circle);
        let distance = zone.distance_outside(&Coordinate::at(33.653, 73.184));
        assert!((distance - 612.0).abs() < 5.0, "distance was {distance}");
    }

    #[test]
    fn test_distance_outside_is_nan_for_invalid_input() {
        let circle = GeoCircle::new(Coordinate::at(33.643, 73.184), 500.0).unwrap();
        for coord in [
            Coordinate::at(f64::NAN, 73.184),
            Coordinate::at(33.643, f64::INFINITY),
            Coordinate::at(91.0, 73.184),
        ] {
            assert!(circle.distance_outside(&coord).is_nan());
            assert!(campus().distance_outside(&coord).is_nan());
            assert!(GeoZone::from(circle).distance_outside(&coord).is_nan());
        }
    }

    #[test]
    fn test_location_summary() {
        assert_eq!(
            location_summary(Some(&Coordinate::new(33.6, 73.1, 14.6))),
            "Location enabled (Accuracy: 15m)"
        );
        assert_eq!(
            location_summary(None),
            "Location disabled - enable location to mark attendance"
        );
        assert!(location_summary(Some(&Coordinate::at(f64::NAN, 0.0))).contains("invalid"));
    }

    fn arb_box() -> impl Strategy<Value = GeoBoundingBox> {
        (-80.0f64..80.0, 0.001f64..5.0, -170.0f64..170.0, 0.001f64..5.0).prop_map(
            |(lat, lat_span, lon, lon_span)| {
                GeoBoundingBox::new(lat, lat + lat_span, lon, lon + lon_span)
                    .expect("strategy yields ordered bounds")
            },
        )
    }

    proptest! {
        /// Points on any edge of the box are inside.
        #[test]
        fn boundary_values_are_inside(bounds in arb_box(), t in 0.0f64..=1.0) {
            let lat = bounds.lat_min() + t * (bounds.lat_max() - bounds.lat_min());
            let lat = lat.clamp(bounds.lat_min(), bounds.lat_max());
            let lon = bounds.lon_min() + t * (bounds.lon_max() - bounds.lon_min());
            let lon = lon.clamp(bounds.lon_min(), bounds.lon_max());

            prop_assert!(is_within_zone(&Coordinate::at(bounds.lat_min(), lon), &bounds));
            prop_assert!(is_within_zone(&Coordinate::at(bounds.lat_max(), lon), &bounds));
            prop_assert!(is_within_zone(&Coordinate::at(lat, bounds.lon_min()), &bounds));
            prop_assert!(is_within_zone(&Coordinate::at(lat, bounds.lon_max()), &bounds));
        }

        /// Stepping past any single bound puts the point outside.
        #[test]
        fn strictly_outside_any_bound(bounds in arb_box(), step in 0.0001f64..1.0) {
            let center = bounds.center();
            let outside_points = [
                Coordinate::at(bounds.lat_min() - step, center.longitude),
                Coordinate::at(bounds.lat_max() + step, center.longitude),
                Coordinate::at(center.latitude, bounds.lon_min() - step),
                Coordinate::at(center.latitude, bounds.lon_max() + step),
            ];
            for point in outside_points {
                prop_assert!(!is_within_zone(&point, &bounds));
                prop_assert!(bounds.distance_outside(&point) > 0.0);
            }
        }

        /// Membership never panics and agrees with `locate`.
        #[test]
        fn membership_is_total(bounds in arb_box(), lat in any::<f64>(), lon in any::<f64>()) {
            let coord = Coordinate::at(lat, lon);
            let inside = is_within_zone(&coord, &bounds);
            prop_assert_eq!(inside, bounds.locate(&coord).is_none());
        }
    }
}
