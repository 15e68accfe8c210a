use nalgebra::Vector3;

use crate::error::{GeoconvError, Result, ensure_finite};

/// Radar-style detection: bearing, tilt and slant range from the sensor.
///
/// `azimuth` is a clockwise compass bearing in degrees. `elevation` is the
/// raw sensor reading, where 90° is level with the horizon and larger values
/// point below it. The Cartesian frame is forward-left-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorPolar {
    pub azimuth: f64,   // degrees, clockwise from forward
    pub elevation: f64, // degrees, 90 is horizontal
    pub range: f64,     // meters
}

impl SensorPolar {
    pub fn new(azimuth: f64, elevation: f64, range: f64) -> Self {
        Self {
            azimuth,
            elevation,
            range,
        }
    }

    /// Detection as a forward-left-up vector in meters
    pub fn to_cartesian(&self) -> Result<Vector3<f64>> {
        ensure_finite("azimuth", self.azimuth)?;
        ensure_finite("elevation", self.elevation)?;
        let range = ensure_finite("range", self.range)?;
        if range < 0.0 {
            return Err(GeoconvError::InvalidInput(format!("negative range {range}")));
        }

        // Counter-clockwise angle in (-180, 180]
        let azimuth = self.azimuth.rem_euclid(360.0);
        let m_azimuth = (if azimuth < 180.0 { -azimuth } else { 360.0 - azimuth }).to_radians();
        let m_elevation = (90.0 - self.elevation).to_radians();

        let (sin_az, cos_az) = m_azimuth.sin_cos();
        let (sin_el, cos_el) = m_elevation.sin_cos();

        Ok(Vector3::new(
            range * cos_el * cos_az,
            range * cos_el * sin_az,
            range * sin_el,
        ))
    }

    /// Inverse of [`SensorPolar::to_cartesian`]; azimuth comes back in [0, 360)
    pub fn from_cartesian(point: &Vector3<f64>) -> Result<Self> {
        ensure_finite("x", point.x)?;
        ensure_finite("y", point.y)?;
        ensure_finite("z", point.z)?;

        let range = point.norm();
        if range == 0.0 {
            return Ok(Self::new(0.0, 90.0, 0.0));
        }

        let m_elevation = (point.z / range).asin();
        let m_azimuth = point.y.atan2(point.x);

        let mut azimuth = (-m_azimuth.to_degrees()).rem_euclid(360.0);
        if azimuth >= 360.0 {
            azimuth = 0.0;
        }

        Ok(Self {
            azimuth,
            elevation: 90.0 - m_elevation.to_degrees(),
            range,
        })
    }
}
