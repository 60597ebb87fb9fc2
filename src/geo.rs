use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair, the unit of all route and distance math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two coordinates in kilometers.
///
/// Every distance comparison in the service goes through this function so
/// thresholds stay consistent across endpoints.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    // rounding can push h past 1.0 for near-antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Round to 2 decimals for response payloads.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn coincident_points_are_zero() {
        let p = GeoPoint::new(28.6139, 77.209);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111km() {
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert_relative_eq!(d, 111.19, epsilon = 0.1);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(28.6139, 77.209);
        let b = GeoPoint::new(19.076, 72.8777);
        assert_relative_eq!(haversine_km(a, b), haversine_km(b, a), epsilon = 1e-9);
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let d = haversine_km(GeoPoint::new(90.0, 0.0), GeoPoint::new(-90.0, 0.0));
        assert!(d.is_finite());
        assert_relative_eq!(d, std::f64::consts::PI * 6371.0, epsilon = 0.5);
    }

    #[test]
    fn delhi_to_mumbai_is_about_1150km() {
        let delhi = GeoPoint::new(28.6139, 77.209);
        let mumbai = GeoPoint::new(19.076, 72.8777);
        assert_relative_eq!(haversine_km(delhi, mumbai), 1153.0, epsilon = 10.0);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.678), 2.68);
        assert_eq!(round2(5.0), 5.0);
    }
}
