use serde::Serialize;

use crate::error::{Error, Result};

/// A validated (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lng: f64,
    lat: f64,
}

impl Coordinate {
    pub fn new(lng: f64, lat: f64) -> Result<Self> {
        let reason = if !lng.is_finite() || !lat.is_finite() {
            Some("coordinates must be finite numbers")
        } else if !(-180.0..=180.0).contains(&lng) {
            Some("longitude must be between -180 and 180")
        } else if !(-90.0..=90.0).contains(&lat) {
            Some("latitude must be between -90 and 90")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidCoordinates { lng, lat, reason }),
            None => Ok(Coordinate { lng, lat }),
        }
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Euclidean distance on raw degree values. Ignores Earth curvature, so it is
    /// only meaningful at city/region scale.
    pub fn planar_distance(&self, other: &Coordinate) -> f64 {
        (self.lng - other.lng).hypot(self.lat - other.lat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafeZone {
    pub name: String,
    pub location: Coordinate,
    pub capacity: u32,
}

/// Path, distance and duration reported by a routing service for one origin/destination pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    pub path: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub target: SafeZone,
    pub path: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteResult {
    pub fn from_directions(target: SafeZone, directions: Directions) -> Self {
        RouteResult {
            target,
            path: directions.path,
            distance_meters: directions.distance_meters,
            duration_seconds: directions.duration_seconds,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Route to {}, Distance: {:.2} km - Estimated Time: {} min",
            self.target.name,
            self.distance_meters / 1000.0,
            (self.duration_seconds / 60.0).ceil()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_and_non_finite_values() {
        assert!(Coordinate::new(180.0, 90.0).is_ok());
        assert!(Coordinate::new(-180.0, -90.0).is_ok());
        assert!(matches!(
            Coordinate::new(180.5, 0.0),
            Err(Error::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            Coordinate::new(0.0, -90.01),
            Err(Error::InvalidCoordinates { .. })
        ));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn planar_distance_is_euclidean_on_degrees() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(3.0, 4.0).unwrap();
        assert_eq!(a.planar_distance(&b), 5.0);
        assert_eq!(b.planar_distance(&a), 5.0);
    }

    #[test]
    fn summary_rounds_distance_and_ceils_minutes() {
        let zone = SafeZone {
            name: "Safe Zone 2".to_string(),
            location: Coordinate::new(77.2, 28.6).unwrap(),
            capacity: 25,
        };
        let route = RouteResult {
            target: zone,
            path: vec![],
            distance_meters: 1234.0,
            duration_seconds: 61.0,
        };
        assert_eq!(
            route.summary(),
            "Route to Safe Zone 2, Distance: 1.23 km - Estimated Time: 2 min"
        );
    }
}
