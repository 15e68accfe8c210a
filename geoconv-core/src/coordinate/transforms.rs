use log::trace;
use nalgebra::Vector3;

use crate::ellipsoid::Ellipsoid;
use crate::error::{CoordinateError, GeoconvError, Result, ensure_finite};

/// ECEF coordinates (Earth-Centered, Earth-Fixed)
pub type EcefCoord = Vector3<f64>;

/// LLA coordinates (Latitude, Longitude, Altitude)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LlaCoord {
    pub lat: f64, // degrees
    pub lon: f64, // degrees
    pub alt: f64, // meters above the ellipsoid
}

impl LlaCoord {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }
}

// Latitude iteration stops once the update falls below this many radians
const LAT_TOLERANCE: f64 = 1e-14;
const MAX_ITERATIONS: usize = 10;

/// Convert ECEF to LLA (Latitude, Longitude, Altitude)
pub fn ecef_to_lla(ecef: &EcefCoord, ellipsoid: &Ellipsoid) -> Result<LlaCoord> {
    let x = ensure_finite("ecef x", ecef.x)?;
    let y = ensure_finite("ecef y", ecef.y)?;
    let z = ensure_finite("ecef z", ecef.z)?;

    let e2 = ellipsoid.eccentricity_squared();
    let p = (x * x + y * y).sqrt();

    // Longitude
    let lon = y.atan2(x);

    // Fixed-point iteration on latitude, seeded with the h = 0 solution
    let mut lat = z.atan2(p * (1.0 - e2));
    let mut converged = false;
    for iter in 0..MAX_ITERATIONS {
        let n = ellipsoid.prime_vertical_radius(lat);
        let next = (z + e2 * n * lat.sin()).atan2(p);
        let delta = (next - lat).abs();
        lat = next;
        if delta < LAT_TOLERANCE {
            trace!("ECEF latitude converged after {} iterations", iter + 1);
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(CoordinateError::NoConvergence(MAX_ITERATIONS).into());
    }

    // Height that stays well conditioned at the poles
    let (sin_lat, cos_lat) = lat.sin_cos();
    let n = ellipsoid.prime_vertical_radius(lat);
    let alt = p * cos_lat + z * sin_lat - n * (1.0 - e2 * sin_lat * sin_lat);

    let lat_deg = lat.to_degrees();
    if !(-90.0..=90.0).contains(&lat_deg) {
        return Err(CoordinateError::InvalidLatitude(lat_deg).into());
    }
    if !alt.is_finite() {
        return Err(GeoconvError::Numerical(format!(
            "height is not finite for ECEF ({x}, {y}, {z})"
        )));
    }

    Ok(LlaCoord {
        lat: lat_deg,
        lon: lon.to_degrees(),
        alt,
    })
}

/// Convert LLA to ECEF
pub fn lla_to_ecef(lla: &LlaCoord, ellipsoid: &Ellipsoid) -> Result<EcefCoord> {
    ensure_finite("lat", lla.lat)?;
    ensure_finite("lon", lla.lon)?;
    ensure_finite("alt", lla.alt)?;
    if lla.lat < -90.0 || lla.lat > 90.0 {
        return Err(CoordinateError::InvalidLatitude(lla.lat).into());
    }

    let lat_rad = lla.lat.to_radians();
    let lon_rad = lla.lon.to_radians();

    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();

    let e2 = ellipsoid.eccentricity_squared();
    let n = ellipsoid.prime_vertical_radius(lat_rad);

    let x = (n + lla.alt) * cos_lat * cos_lon;
    let y = (n + lla.alt) * cos_lat * sin_lon;
    let z = (n * (1.0 - e2) + lla.alt) * sin_lat;

    Ok(Vector3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84: Ellipsoid = Ellipsoid::Wgs84;

    fn assert_roundtrip(lla: LlaCoord, alt_tol: f64) {
        let ecef = lla_to_ecef(&lla, &WGS84).unwrap();
        let lla2 = ecef_to_lla(&ecef, &WGS84).unwrap();

        assert!((lla.lat - lla2.lat).abs() < 1e-9, "lat {} vs {}", lla.lat, lla2.lat);
        assert!((lla.lon - lla2.lon).abs() < 1e-9, "lon {} vs {}", lla.lon, lla2.lon);
        assert!((lla.alt - lla2.alt).abs() < alt_tol, "alt {} vs {}", lla.alt, lla2.alt);
    }

    #[test]
    fn test_lla_ecef_roundtrip() {
        // Survey origin used by the vehicle logs
        assert_roundtrip(LlaCoord::new(36.5653323, 119.1605849, 0.0), 1e-6);
    }

    #[test]
    fn test_equator_prime_meridian() {
        let lla = LlaCoord::new(0.0, 0.0, 0.0);
        let ecef = lla_to_ecef(&lla, &WGS84).unwrap();

        // x is the semi-major axis, y and z vanish
        assert!((ecef.x - WGS84.semi_major_axis()).abs() < 1e-6);
        assert!(ecef.y.abs() < 1e-6);
        assert!(ecef.z.abs() < 1e-6);

        assert_roundtrip(lla, 1e-6);
    }

    #[test]
    fn test_north_pole() {
        let lla = LlaCoord::new(90.0, 0.0, 1000.0);
        let ecef = lla_to_ecef(&lla, &WGS84).unwrap();

        assert!(ecef.x.abs() < 1e-6);
        assert!(ecef.y.abs() < 1e-6);
        assert!((ecef.z - (WGS84.semi_minor_axis() + 1000.0)).abs() < 1e-6);

        let lla2 = ecef_to_lla(&ecef, &WGS84).unwrap();
        assert!((lla.lat - lla2.lat).abs() < 1e-9);
        assert!((lla.alt - lla2.alt).abs() < 1e-3);
    }

    #[test]
    fn test_south_pole_from_axis() {
        // Exactly on the rotation axis
        let ecef = Vector3::new(0.0, 0.0, -WGS84.semi_minor_axis());
        let lla = ecef_to_lla(&ecef, &WGS84).unwrap();
        assert!((lla.lat + 90.0).abs() < 1e-12);
        assert!(lla.alt.abs() < 1e-6);
    }

    #[test]
    fn test_high_altitude() {
        assert_roundtrip(LlaCoord::new(45.0, 90.0, 500000.0), 1e-6);
    }

    #[test]
    fn test_negative_altitude() {
        assert_roundtrip(LlaCoord::new(31.5, 35.5, -430.0), 1e-6);
    }

    #[test]
    fn test_southern_western_hemisphere() {
        assert_roundtrip(LlaCoord::new(-33.8688, -70.6693, 520.0), 1e-6);
    }

    #[test]
    fn test_other_ellipsoids_roundtrip() {
        let lla = LlaCoord::new(36.5653323, 119.1605849, 25.0);
        for ellipsoid in Ellipsoid::ALL {
            let ecef = lla_to_ecef(&lla, &ellipsoid).unwrap();
            let lla2 = ecef_to_lla(&ecef, &ellipsoid).unwrap();
            assert!((lla.lat - lla2.lat).abs() < 1e-9);
            assert!((lla.lon - lla2.lon).abs() < 1e-9);
            assert!((lla.alt - lla2.alt).abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_latitude() {
        let result = lla_to_ecef(&LlaCoord::new(95.0, 0.0, 0.0), &WGS84);
        assert!(matches!(result.unwrap_err(), GeoconvError::Coordinate(_)));

        let result = lla_to_ecef(&LlaCoord::new(-95.0, 0.0, 0.0), &WGS84);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = lla_to_ecef(&LlaCoord::new(f64::NAN, 0.0, 0.0), &WGS84);
        assert!(matches!(
            result.unwrap_err(),
            GeoconvError::Coordinate(CoordinateError::NonFinite { field: "lat", .. })
        ));

        let result = ecef_to_lla(&Vector3::new(f64::INFINITY, 0.0, 0.0), &WGS84);
        assert!(result.is_err());
    }

    #[test]
    fn test_near_center_does_not_converge() {
        // Deep inside the ellipsoid the latitude update is no longer a contraction
        let result = ecef_to_lla(&Vector3::new(20_000.0, 0.0, 10_000.0), &WGS84);
        assert!(matches!(
            result.unwrap_err(),
            GeoconvError::Coordinate(CoordinateError::NoConvergence(MAX_ITERATIONS))
        ));
    }

    #[test]
    fn test_longitude_wraparound() {
        // 181 degrees is the same meridian as -179
        let ecef1 = lla_to_ecef(&LlaCoord::new(40.0, 181.0, 100.0), &WGS84).unwrap();
        let ecef2 = lla_to_ecef(&LlaCoord::new(40.0, -179.0, 100.0), &WGS84).unwrap();

        assert!((ecef1 - ecef2).norm() < 1e-6);
    }
}
