//! Seam between the converter and the ellipsoid math backing it

use crate::coordinate::{EcefCoord, LlaCoord, ecef_to_lla, lla_to_ecef};
use crate::ellipsoid::Ellipsoid;
use crate::error::Result;
use crate::projection::TransverseMercator;

/// Ellipsoidal transforms the converter is built on.
///
/// Everything above this trait is plain rotation and zone bookkeeping, so a
/// different numerical backend only has to provide these four operations.
pub trait EllipsoidalTransform {
    /// Geodetic coordinates to ECEF
    fn to_ecef(&self, lla: &LlaCoord) -> Result<EcefCoord>;

    /// ECEF to geodetic coordinates
    fn from_ecef(&self, ecef: &EcefCoord) -> Result<LlaCoord>;

    /// Transverse Mercator with 500 km false easting, unit scale and the
    /// equator as latitude of origin. Returns (easting, northing).
    fn project_transverse_mercator(
        &self,
        lon: f64,
        lat: f64,
        central_meridian: f64,
    ) -> Result<(f64, f64)>;

    /// Inverse of [`EllipsoidalTransform::project_transverse_mercator`].
    /// Returns (lon, lat) with lon wrapped to (-180, 180].
    fn unproject_transverse_mercator(
        &self,
        x: f64,
        y: f64,
        central_meridian: f64,
    ) -> Result<(f64, f64)>;
}

impl EllipsoidalTransform for Ellipsoid {
    fn to_ecef(&self, lla: &LlaCoord) -> Result<EcefCoord> {
        lla_to_ecef(lla, self)
    }

    fn from_ecef(&self, ecef: &EcefCoord) -> Result<LlaCoord> {
        ecef_to_lla(ecef, self)
    }

    fn project_transverse_mercator(
        &self,
        lon: f64,
        lat: f64,
        central_meridian: f64,
    ) -> Result<(f64, f64)> {
        TransverseMercator::gauss_kruger(*self, central_meridian)?.forward(lon, lat)
    }

    fn unproject_transverse_mercator(
        &self,
        x: f64,
        y: f64,
        central_meridian: f64,
    ) -> Result<(f64, f64)> {
        TransverseMercator::gauss_kruger(*self, central_meridian)?.inverse(x, y)
    }
}

impl<T: EllipsoidalTransform + ?Sized> EllipsoidalTransform for &T {
    fn to_ecef(&self, lla: &LlaCoord) -> Result<EcefCoord> {
        (**self).to_ecef(lla)
    }

    fn from_ecef(&self, ecef: &EcefCoord) -> Result<LlaCoord> {
        (**self).from_ecef(ecef)
    }

    fn project_transverse_mercator(
        &self,
        lon: f64,
        lat: f64,
        central_meridian: f64,
    ) -> Result<(f64, f64)> {
        (**self).project_transverse_mercator(lon, lat, central_meridian)
    }

    fn unproject_transverse_mercator(
        &self,
        x: f64,
        y: f64,
        central_meridian: f64,
    ) -> Result<(f64, f64)> {
        (**self).unproject_transverse_mercator(x, y, central_meridian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that offsets every northing by a constant
    #[derive(Debug)]
    struct ShiftedNorthing(Ellipsoid, f64);

    impl EllipsoidalTransform for ShiftedNorthing {
        fn to_ecef(&self, lla: &LlaCoord) -> Result<EcefCoord> {
            self.0.to_ecef(lla)
        }

        fn from_ecef(&self, ecef: &EcefCoord) -> Result<LlaCoord> {
            self.0.from_ecef(ecef)
        }

        fn project_transverse_mercator(&self, lon: f64, lat: f64, cm: f64) -> Result<(f64, f64)> {
            let (x, y) = self.0.project_transverse_mercator(lon, lat, cm)?;
            Ok((x, y + self.1))
        }

        fn unproject_transverse_mercator(&self, x: f64, y: f64, cm: f64) -> Result<(f64, f64)> {
            self.0.unproject_transverse_mercator(x, y - self.1, cm)
        }
    }

    #[test]
    fn test_native_backend_meridian_reference() {
        // Published WGS84 quarter meridian length
        let (x, y) = Ellipsoid::Wgs84.project_transverse_mercator(117.0, 90.0, 117.0).unwrap();
        assert!((x - 500000.0).abs() < 1e-6);
        assert!((y - 10001965.7293).abs() < 1e-3);
    }

    #[test]
    fn test_custom_backend_roundtrip() {
        let backend = ShiftedNorthing(Ellipsoid::Wgs84, 1000.0);
        let (x, y) = backend.project_transverse_mercator(119.5, 36.5, 117.0).unwrap();
        let (lon, lat) = backend.unproject_transverse_mercator(x, y, 117.0).unwrap();
        assert!((lon - 119.5).abs() < 1e-9);
        assert!((lat - 36.5).abs() < 1e-9);
    }

    #[test]
    fn test_reference_forwarding() {
        let ellipsoid = Ellipsoid::Cgcs2000;
        let by_ref = &ellipsoid;
        let lla = LlaCoord::new(36.0, 120.0, 10.0);
        let forwarded = <&Ellipsoid as EllipsoidalTransform>::to_ecef(&by_ref, &lla).unwrap();
        assert_eq!(forwarded, ellipsoid.to_ecef(&lla).unwrap());
    }
}
