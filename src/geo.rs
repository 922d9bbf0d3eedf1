use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in kilometers
    pub fn distance_km(&self, other: &Point) -> f64 {
        haversine_distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Calculate the distance between two points using the Haversine formula
/// Returns distance in kilometers
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether `point` lies within `radius_km` of `origin` (inclusive)
pub fn within_radius(origin: &Point, point: &Point, radius_km: f64) -> bool {
    origin.distance_km(point) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: Point = Point {
        latitude: 51.5074,
        longitude: -0.1278,
    };
    const HEATHROW: Point = Point {
        latitude: 51.47,
        longitude: -0.4543,
    };

    #[test]
    fn test_haversine_distance() {
        // Central London to Heathrow is roughly 23 km
        let distance = LONDON.distance_km(&HEATHROW);
        assert!(distance > 20.0 && distance < 26.0, "got {distance}");
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for point in [LONDON, HEATHROW, Point::new(-33.9, 151.2), Point::new(0.0, 180.0)] {
            assert_eq!(point.distance_km(&point), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let sydney = Point::new(-33.8688, 151.2093);
        let there = LONDON.distance_km(&sydney);
        let back = sydney.distance_km(&LONDON);
        assert!((there - back).abs() < 1e-9);
        // London to Sydney is about 17,000 km
        assert!(there > 16_900.0 && there < 17_100.0);
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(&LONDON, &HEATHROW, 50.0));
        assert!(!within_radius(&LONDON, &HEATHROW, 10.0));
        assert!(within_radius(&LONDON, &LONDON, 0.0));
    }
}
