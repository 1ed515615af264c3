//! Small-distance geodesic helpers for the simulated walker.

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Great-circle distance between two coordinates (meters)
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Step `distance_m` from (lat, lng) along `bearing_rad`
///
/// Equirectangular approximation; adequate for the meter-scale steps the
/// walker takes per tick.
pub fn step(lat: f64, lng: f64, bearing_rad: f64, distance_m: f64) -> (f64, f64) {
    let dlat = distance_m * bearing_rad.cos() / METERS_PER_DEG_LAT;
    let dlng = distance_m * bearing_rad.sin() / (METERS_PER_DEG_LAT * lat.to_radians().cos());
    (lat + dlat, lng + dlng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_m(47.9, 106.9, 47.9, 106.9), 0.0);
    }

    #[test]
    fn test_one_degree_latitude_is_about_111km() {
        let d = haversine_m(47.0, 106.9, 48.0, 106.9);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn test_step_roundtrips_with_haversine() {
        let (lat, lng) = step(47.918, 106.917, 0.7, 25.0);
        let d = haversine_m(47.918, 106.917, lat, lng);
        assert!((d - 25.0).abs() < 0.1, "got {d}");
    }
}
