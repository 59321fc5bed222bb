//! Geographic value objects: points and axis-aligned query regions.
//!
//! Value objects here are immutable and compared by value. `Region` carries
//! normalized corners so containment never depends on the order a caller
//! supplied them in.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A WGS84 coordinate pair.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> DomainResult<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(DomainError::validation("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::validation(format!(
                "latitude out of range: {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::validation(format!(
                "longitude out of range: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Axis-aligned bounding box over [`GeoPoint`]s.
///
/// Constructed from two opposite corners in **any** order; the constructor
/// normalizes them into south-west/north-east form. Containment is inclusive
/// of the boundary.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    south_west: GeoPoint,
    north_east: GeoPoint,
}

impl Region {
    /// Build a region from two opposite corners, swapping coordinates as
    /// needed. Callers are not required to pre-sort the corners.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        let south_west = GeoPoint {
            latitude: a.latitude.min(b.latitude),
            longitude: a.longitude.min(b.longitude),
        };
        let north_east = GeoPoint {
            latitude: a.latitude.max(b.latitude),
            longitude: a.longitude.max(b.longitude),
        };
        Self {
            south_west,
            north_east,
        }
    }

    pub fn south_west(&self) -> GeoPoint {
        self.south_west
    }

    pub fn north_east(&self) -> GeoPoint {
        self.north_east
    }

    /// Inclusive containment check.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.latitude >= self.south_west.latitude
            && point.latitude <= self.north_east.latitude
            && point.longitude >= self.south_west.longitude
            && point.longitude <= self.north_east.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(-91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 181.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn containment_is_inclusive_of_the_boundary() {
        let region = Region::from_corners(point(59.0, 24.0), point(61.0, 25.0));
        assert!(region.contains(point(59.0, 24.0)));
        assert!(region.contains(point(61.0, 25.0)));
        assert!(region.contains(point(60.0, 24.9)));
        assert!(!region.contains(point(58.999, 24.5)));
        assert!(!region.contains(point(60.0, 25.001)));
    }

    #[test]
    fn inverted_corners_are_normalized() {
        let a = Region::from_corners(point(61.0, 25.0), point(59.0, 24.0));
        let b = Region::from_corners(point(59.0, 24.0), point(61.0, 25.0));
        assert_eq!(a, b);
        assert!(a.contains(point(60.0, 24.5)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a point is inside a region iff each coordinate lies
        /// between the min and max of the corner coordinates, regardless of
        /// the order the corners were supplied in.
        #[test]
        fn containment_matches_coordinate_bounds(
            lat_a in -90.0f64..90.0,
            lon_a in -180.0f64..180.0,
            lat_b in -90.0f64..90.0,
            lon_b in -180.0f64..180.0,
            lat_p in -90.0f64..90.0,
            lon_p in -180.0f64..180.0,
        ) {
            let forward = Region::from_corners(point(lat_a, lon_a), point(lat_b, lon_b));
            let reversed = Region::from_corners(point(lat_b, lon_b), point(lat_a, lon_a));
            let p = point(lat_p, lon_p);

            let expected = lat_p >= lat_a.min(lat_b)
                && lat_p <= lat_a.max(lat_b)
                && lon_p >= lon_a.min(lon_b)
                && lon_p <= lon_a.max(lon_b);

            prop_assert_eq!(forward.contains(p), expected);
            prop_assert_eq!(reversed.contains(p), expected);
        }
    }
}
