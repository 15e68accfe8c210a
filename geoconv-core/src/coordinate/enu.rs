use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::{EcefCoord, LlaCoord};
use crate::error::{CoordinateError, Result, ensure_finite};
use crate::transform::EllipsoidalTransform;

/// Survey origin the vehicle logs are recorded against
pub const DEFAULT_ORIGIN: Origin = Origin {
    lat: 36.5653323,
    lon: 119.1605849,
    alt: 0.0,
};

/// Geodetic anchor of a local East-North-Up frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub lat: f64, // degrees
    pub lon: f64, // degrees
    pub alt: f64, // meters above the ellipsoid
}

impl Origin {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    pub fn as_lla(&self) -> LlaCoord {
        LlaCoord::new(self.lat, self.lon, self.alt)
    }
}

impl Default for Origin {
    fn default() -> Self {
        DEFAULT_ORIGIN
    }
}

/// Offsets in meters along local east, north and up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnuCoord {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl EnuCoord {
    pub fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }

    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.east, self.north, self.up)
    }
}

/// Tangent-plane frame bound to one origin.
///
/// The origin's ECEF position and the ENU-to-ECEF rotation are computed once
/// so repeated conversions against the same origin only pay for the
/// geodetic transform of the target point.
#[derive(Debug, Clone, Copy)]
pub struct LocalFrame<T: EllipsoidalTransform> {
    origin: Origin,
    origin_ecef: EcefCoord,
    enu_to_ecef: Matrix3<f64>,
    transform: T,
}

impl<T: EllipsoidalTransform> LocalFrame<T> {
    pub fn new(origin: Origin, transform: T) -> Result<Self> {
        let origin_ecef = transform.to_ecef(&origin.as_lla())?;

        let (sin_lam, cos_lam) = origin.lon.to_radians().sin_cos();
        let (sin_phi, cos_phi) = origin.lat.to_radians().sin_cos();

        // Columns are the east, north and up unit vectors in ECEF
        let enu_to_ecef = Matrix3::new(
            -sin_lam, -sin_phi * cos_lam, cos_phi * cos_lam,
            cos_lam, -sin_phi * sin_lam, cos_phi * sin_lam,
            0.0, cos_phi, sin_phi,
        );

        Ok(Self {
            origin,
            origin_ecef,
            enu_to_ecef,
            transform,
        })
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn origin_ecef(&self) -> &EcefCoord {
        &self.origin_ecef
    }

    /// ENU-to-ECEF rotation; its transpose maps ECEF offsets back to ENU
    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.enu_to_ecef
    }

    /// Local ENU offset to geodetic coordinates
    pub fn to_geodetic(&self, enu: &EnuCoord) -> Result<LlaCoord> {
        ensure_finite("east", enu.east)?;
        ensure_finite("north", enu.north)?;
        ensure_finite("up", enu.up)?;

        let ecef = self.origin_ecef + self.enu_to_ecef * enu.as_vector();
        self.transform.from_ecef(&ecef)
    }

    /// Geodetic coordinates to a local ENU offset
    pub fn to_enu(&self, lla: &LlaCoord) -> Result<EnuCoord> {
        let ecef = self.transform.to_ecef(lla)?;
        let enu = self.enu_to_ecef.transpose() * (ecef - self.origin_ecef);

        if !enu.iter().all(|v| v.is_finite()) {
            return Err(CoordinateError::TransformFailed(format!(
                "ENU offset is not finite for {lla:?}"
            ))
            .into());
        }

        Ok(EnuCoord::new(enu.x, enu.y, enu.z))
    }
}

/// Convert an ENU offset from `origin` to WGS84 (or the transform's ellipsoid)
pub fn enu_to_wgs84<T: EllipsoidalTransform>(
    enu: &EnuCoord,
    origin: &Origin,
    transform: T,
) -> Result<LlaCoord> {
    LocalFrame::new(*origin, transform)?.to_geodetic(enu)
}

/// Convert a geodetic point to its ENU offset from `origin`
pub fn wgs84_to_enu<T: EllipsoidalTransform>(
    lla: &LlaCoord,
    origin: &Origin,
    transform: T,
) -> Result<EnuCoord> {
    LocalFrame::new(*origin, transform)?.to_enu(lla)
}
