use log::trace;

use crate::ellipsoid::Ellipsoid;
use crate::error::{CoordinateError, GeoconvError, ProjectionError, Result, ensure_finite};

/// False easting used by every Gauss-Krüger zone
pub const FALSE_EASTING: f64 = 500_000.0;

const SERIES_ORDER: usize = 6;
const MAX_ITERATIONS: usize = 10;
const TAU_TOLERANCE: f64 = 1e-12;

/// Ellipsoidal transverse Mercator using the 6th order Krüger series.
///
/// Accurate to a few nanometers within 30° of the central meridian, which
/// covers every 3° and 6° zone with a wide margin.
#[derive(Debug, Clone, Copy)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    central_meridian: f64,
    scale: f64,
    false_easting: f64,
    false_northing: f64,
    // Rectifying radius A
    radius: f64,
    alpha: [f64; SERIES_ORDER],
    beta: [f64; SERIES_ORDER],
}

impl TransverseMercator {
    pub fn new(
        ellipsoid: Ellipsoid,
        central_meridian: f64,
        scale: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self> {
        ensure_finite("central meridian", central_meridian)?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GeoconvError::InvalidInput(format!(
                "scale factor must be positive, got {scale}"
            )));
        }

        let n = ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let radius =
            ellipsoid.semi_major_axis() / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        Ok(Self {
            ellipsoid,
            central_meridian,
            scale,
            false_easting,
            false_northing,
            radius,
            alpha,
            beta,
        })
    }

    /// Gauss-Krüger parameters: unit scale, 500 km false easting, equator origin
    pub fn gauss_kruger(ellipsoid: Ellipsoid, central_meridian: f64) -> Result<Self> {
        Self::new(ellipsoid, central_meridian, 1.0, FALSE_EASTING, 0.0)
    }

    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Project (lon, lat) in degrees to (easting, northing) in meters
    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        ensure_finite("lon", lon)?;
        ensure_finite("lat", lat)?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::InvalidLatitude(lat).into());
        }

        let e = self.ellipsoid.eccentricity_squared().sqrt();
        let phi = lat.to_radians();
        let (sin_lam, cos_lam) = (lon - self.central_meridian).to_radians().sin_cos();

        // Conformal latitude as tan(chi)
        let tau = phi.tan();
        let sigma = (e * (e * tau / tau.hypot(1.0)).atanh()).sinh();
        let tau_prime = tau * sigma.hypot(1.0) - sigma * tau.hypot(1.0);

        let xi_prime = tau_prime.atan2(cos_lam);
        let eta_prime = (sin_lam / tau_prime.hypot(cos_lam)).asinh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += a * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        let x = self.scale * self.radius * eta + self.false_easting;
        let y = self.scale * self.radius * xi + self.false_northing;

        if !(x.is_finite() && y.is_finite()) {
            return Err(GeoconvError::Numerical(format!(
                "transverse Mercator diverged for lon {lon}, lat {lat}"
            )));
        }
        Ok((x, y))
    }

    /// Unproject (easting, northing) in meters to (lon, lat) in degrees
    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        ensure_finite("easting", x)?;
        ensure_finite("northing", y)?;

        let e2 = self.ellipsoid.eccentricity_squared();
        let e = e2.sqrt();

        let eta = (x - self.false_easting) / (self.scale * self.radius);
        let xi = (y - self.false_northing) / (self.scale * self.radius);

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta = eta_prime.sinh();
        let (sin_xi, cos_xi) = xi_prime.sin_cos();
        let tau_prime = sin_xi / sinh_eta.hypot(cos_xi);
        let lam = sinh_eta.atan2(cos_xi);

        // Newton iteration from conformal back to geodetic latitude
        let mut tau = tau_prime;
        let mut converged = false;
        for iter in 0..MAX_ITERATIONS {
            let sigma = (e * (e * tau / tau.hypot(1.0)).atanh()).sinh();
            let tau_i = tau * sigma.hypot(1.0) - sigma * tau.hypot(1.0);
            let delta = (tau_prime - tau_i) / tau_i.hypot(1.0) * (1.0 + (1.0 - e2) * tau * tau)
                / ((1.0 - e2) * tau.hypot(1.0));
            tau += delta;
            if !tau.is_finite() {
                break;
            }
            if delta.abs() <= TAU_TOLERANCE * tau.abs().max(1.0) {
                trace!("inverse transverse Mercator converged after {} iterations", iter + 1);
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(ProjectionError::NoConvergence(MAX_ITERATIONS).into());
        }

        let lat = tau.atan().to_degrees();
        let lon = wrap_longitude(self.central_meridian + lam.to_degrees());
        Ok((lon, lat))
    }
}

/// Wrap a longitude in degrees into (-180, 180]
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}
